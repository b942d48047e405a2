//! Hash-consed terms

use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;

use crate::hash::hash_term;
use crate::Var;

/// Product of distinct variables, ordered by strictly decreasing level
///
/// Terms are created via a [`TermTable`], which guarantees that structurally
/// equal terms are the same object. Equality is therefore a pointer
/// comparison. The constant term `1` is not represented by a `Term` but by
/// `None` wherever an `Option<Term>` is expected.
#[derive(Clone)]
pub struct Term(Rc<TermNode>);

struct TermNode {
    var: Var,
    rest: Option<Term>,
    hash: u64,
}

impl Term {
    /// Head variable (the one with the highest level)
    #[inline]
    pub fn var(&self) -> &Var {
        &self.0.var
    }

    /// The term without its head variable
    #[inline]
    pub fn rest(&self) -> Option<&Term> {
        self.0.rest.as_ref()
    }

    /// Hash value
    #[inline]
    pub fn hash_value(&self) -> u64 {
        self.0.hash
    }

    /// Iterate over the variables in decreasing level order
    #[inline]
    pub fn vars(&self) -> Vars<'_> {
        Vars { next: Some(self) }
    }

    /// Number of variables
    pub fn len(&self) -> usize {
        self.vars().count()
    }

    /// Always `false`, there are no empty terms (see [`Term`])
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Check whether `v` occurs in this term
    ///
    /// Stops as soon as the levels drop below the level of `v`.
    pub fn contains(&self, v: &Var) -> bool {
        for w in self.vars() {
            if w == v {
                return true;
            }
            if w.level() < v.level() {
                return false;
            }
        }
        false
    }

    /// Number of strong references, used for diagnostics and tests
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    #[inline]
    fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }
}

/// Iterator over the variables of a [`Term`]
pub struct Vars<'a> {
    next: Option<&'a Term>,
}

impl<'a> Iterator for Vars<'a> {
    type Item = &'a Var;

    #[inline]
    fn next(&mut self) -> Option<&'a Var> {
        let t = self.next?;
        self.next = t.rest();
        Some(t.var())
    }
}

impl PartialEq for Term {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
impl Eq for Term {}

impl Hash for Term {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.hash);
    }
}

impl Ord for Term {
    /// Level-wise lexicographic comparison. If one term is a prefix of the
    /// other, the longer term is greater.
    fn cmp(&self, other: &Self) -> Ordering {
        if self == other {
            return Ordering::Equal;
        }
        let mut l = self.vars();
        let mut r = other.vars();
        loop {
            match (l.next(), r.next()) {
                (Some(a), Some(b)) => match a.level().cmp(&b.level()) {
                    Ordering::Equal => {}
                    ord => return ord,
                },
                (Some(_), None) => return Ordering::Greater,
                (None, Some(_)) => return Ordering::Less,
                (None, None) => return Ordering::Equal,
            }
        }
    }
}

impl PartialOrd for Term {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut vars = self.vars();
        if let Some(v) = vars.next() {
            write!(f, "{v}")?;
        }
        for v in vars {
            write!(f, "*{v}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{self}]")
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
struct TermKey {
    var: usize,
    rest: usize,
    hash: u64,
}

impl Hash for TermKey {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

/// Unique table for [`Term`]s
///
/// The table only holds weak references. A term is reclaimed as soon as the
/// last [`Term`] handle (including the handles held by longer terms sharing
/// it as suffix) is dropped; from that moment on the table will not hand it
/// out again. The dead entry itself is purged by [`TermTable::gc()`], which is
/// also triggered automatically whenever the table doubled in size since the
/// last collection.
pub struct TermTable {
    table: RefCell<FxHashMap<TermKey, Weak<TermNode>>>,
    gc_threshold: Cell<usize>,
}

const INITIAL_GC_THRESHOLD: usize = 1 << 12;

impl Default for TermTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TermTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            table: RefCell::new(FxHashMap::default()),
            gc_threshold: Cell::new(INITIAL_GC_THRESHOLD),
        }
    }

    /// Get the unique term `var * rest`
    ///
    /// `var` must have a greater level than every variable in `rest`.
    pub fn new_term(&self, var: &Var, rest: Option<&Term>) -> Term {
        debug_assert!(
            rest.map_or(true, |r| r.var().level() < var.level()),
            "variables of a term must strictly decrease by level"
        );
        let rest_hash = rest.map_or(0, Term::hash_value);
        let key = TermKey {
            var: var.addr(),
            rest: rest.map_or(0, Term::addr),
            hash: hash_term(var.hash_value(), rest_hash),
        };

        let mut table = self.table.borrow_mut();
        if let Some(node) = table.get(&key).and_then(Weak::upgrade) {
            return Term(node);
        }

        let node = Rc::new(TermNode {
            var: var.clone(),
            rest: rest.cloned(),
            hash: key.hash,
        });
        table.insert(key, Rc::downgrade(&node));

        let len = table.len();
        drop(table);
        if len >= self.gc_threshold.get() {
            let live = self.gc();
            self.gc_threshold
                .set(std::cmp::max(2 * live, INITIAL_GC_THRESHOLD));
        }
        Term(node)
    }

    /// Build a term from variables given in strictly decreasing level order
    ///
    /// Returns `None` (the constant term) if `vars` is empty.
    pub fn from_vars<'a>(&self, vars: impl DoubleEndedIterator<Item = &'a Var>) -> Option<Term> {
        let mut res: Option<Term> = None;
        for v in vars.rev() {
            res = Some(self.new_term(v, res.as_ref()));
        }
        res
    }

    /// Product of two terms
    ///
    /// Merges the two variable chains by level, keeping one copy of shared
    /// variables.
    pub fn multiply(&self, t1: &Term, t2: &Term) -> Term {
        if t1 == t2 {
            return t1.clone();
        }
        let mut merged: Vec<&Var> = Vec::with_capacity(t1.len() + t2.len());
        let mut l = t1.vars().peekable();
        let mut r = t2.vars().peekable();
        loop {
            match (l.peek(), r.peek()) {
                (Some(a), Some(b)) => match a.level().cmp(&b.level()) {
                    Ordering::Greater => merged.extend(l.next()),
                    Ordering::Less => merged.extend(r.next()),
                    Ordering::Equal => {
                        merged.extend(l.next());
                        r.next();
                    }
                },
                (Some(_), None) => merged.extend(l.next()),
                (None, Some(_)) => merged.extend(r.next()),
                (None, None) => break,
            }
        }
        // `merged` is non-empty since `t1` is
        match self.from_vars(merged.into_iter()) {
            Some(t) => t,
            None => t1.clone(),
        }
    }

    /// Remove `v` from `t`
    ///
    /// Returns `None` if `t` consists of `v` only.
    pub fn remainder(&self, t: &Term, v: &Var) -> Option<Term> {
        let vars: Vec<&Var> = t.vars().filter(|&w| w != v).collect();
        self.from_vars(vars.into_iter())
    }

    /// Number of entries including dead ones
    pub fn len(&self) -> usize {
        self.table.borrow().len()
    }

    /// Whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.table.borrow().is_empty()
    }

    /// Number of terms that are still referenced
    pub fn live(&self) -> usize {
        self.table
            .borrow()
            .values()
            .filter(|w| w.strong_count() != 0)
            .count()
    }

    /// Remove all entries of reclaimed terms, returns the number of remaining
    /// entries
    pub fn gc(&self) -> usize {
        let mut table = self.table.borrow_mut();
        let before = table.len();
        table.retain(|_, w| w.strong_count() != 0);
        let after = table.len();
        if before != after {
            log::trace!("term table: collected {} of {before} entries", before - after);
        }
        after
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> [Var; 3] {
        [Var::new("x", 3, 0), Var::new("y", 2, 1), Var::new("z", 1, 2)]
    }

    #[test]
    fn hash_consing() {
        let table = TermTable::new();
        let [x, y, z] = vars();
        let tz = table.new_term(&z, None);
        let ty = table.new_term(&y, None);
        let t1 = table.new_term(&x, Some(&tz));
        let t2 = table.new_term(&x, Some(&tz));
        let t3 = table.new_term(&x, Some(&ty));
        assert_eq!(t1, t2);
        assert_ne!(t1, t3);
        assert_eq!(t1.to_string(), "x*z");
        assert_eq!(t1.len(), 2);
    }

    #[test]
    fn reclaimed_terms_leave_the_table() {
        let table = TermTable::new();
        let [x, y, _] = vars();
        {
            let ty = table.new_term(&y, None);
            let _txy = table.new_term(&x, Some(&ty));
            assert_eq!(table.live(), 2);
            assert_eq!(ty.ref_count(), 2);
        }
        assert_eq!(table.live(), 0);
        assert_eq!(table.gc(), 0);
        assert!(table.is_empty());
    }

    #[test]
    fn multiply_is_idempotent_and_sorted() {
        let table = TermTable::new();
        let [x, y, z] = vars();
        let txz = table.from_vars([&x, &z].into_iter()).unwrap();
        let tyz = table.from_vars([&y, &z].into_iter()).unwrap();
        let prod = table.multiply(&txz, &tyz);
        assert_eq!(prod.to_string(), "x*y*z");
        assert_eq!(table.multiply(&prod, &txz), prod);
        assert_eq!(table.multiply(&txz, &txz), txz);
    }

    #[test]
    fn remainder_removes_variable() {
        let table = TermTable::new();
        let [x, y, z] = vars();
        let t = table.from_vars([&x, &y, &z].into_iter()).unwrap();
        let r = table.remainder(&t, &y).unwrap();
        assert_eq!(r, table.from_vars([&x, &z].into_iter()).unwrap());
        let tx = table.new_term(&x, None);
        assert!(table.remainder(&tx, &x).is_none());
    }

    #[test]
    fn order() {
        let table = TermTable::new();
        let [x, y, z] = vars();
        let tx = table.new_term(&x, None);
        let txy = table.from_vars([&x, &y].into_iter()).unwrap();
        let tyz = table.from_vars([&y, &z].into_iter()).unwrap();
        assert!(txy > tx);
        assert!(tx > tyz);
        assert!(Some(tyz.clone()) > None);
        assert!(txy.contains(&y));
        assert!(!tyz.contains(&x));
    }
}
