use std::cmp::Ordering;
use std::fmt;

use num_bigint::BigInt;
use num_traits::{One, Zero};

use crate::monomial::is_minus_one;
use crate::{AlgebraError, Monomial, Term, TermTable, Var};

/// Sparse polynomial in canonical form
///
/// The monomials are sorted by strictly decreasing term, the constant
/// monomial (if any) comes last. The zero polynomial has no monomials.
///
/// Besides the monomials, a polynomial carries two numbers used by proof
/// emission: the index under which it is known in a certificate, and a level
/// used to balance sums of many polynomials. They are not considered by
/// [`PartialEq`].
#[derive(Clone)]
pub struct Polynomial {
    mons: Vec<Monomial>,
    idx: usize,
    level: u32,
}

impl Default for Polynomial {
    fn default() -> Self {
        Self::zero()
    }
}

impl Polynomial {
    /// The zero polynomial
    pub fn zero() -> Self {
        Self {
            mons: Vec::new(),
            idx: 0,
            level: 1,
        }
    }

    /// The constant polynomial `c`
    pub fn constant(c: BigInt) -> Self {
        let mut res = Self::zero();
        if !c.is_zero() {
            res.mons.push(Monomial::new(c, None));
        }
        res
    }

    /// The polynomial `v`
    pub fn var(table: &TermTable, v: &Var) -> Self {
        let mut res = Self::zero();
        res.mons
            .push(Monomial::new(BigInt::one(), Some(table.new_term(v, None))));
        res
    }

    /// The polynomial `1 - v`
    pub fn negated_var(table: &TermTable, v: &Var) -> Self {
        let mut res = Self::zero();
        res.mons
            .push(Monomial::new(-BigInt::one(), Some(table.new_term(v, None))));
        res.mons.push(Monomial::new(BigInt::one(), None));
        res
    }

    /// Whether this is the zero polynomial
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.mons.is_empty()
    }

    /// Whether this is the constant polynomial `1`
    pub fn is_one(&self) -> bool {
        match &self.mons[..] {
            [m] => m.term().is_none() && m.coeff().is_one(),
            _ => false,
        }
    }

    /// Number of monomials
    #[inline]
    pub fn len(&self) -> usize {
        self.mons.len()
    }

    /// Same as [`Self::is_zero()`]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mons.is_empty()
    }

    /// The monomials in canonical order
    #[inline]
    pub fn monomials(&self) -> &[Monomial] {
        &self.mons
    }

    /// Iterate over the monomials in canonical order
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Monomial> {
        self.mons.iter()
    }

    /// The leading monomial, `None` for the zero polynomial
    #[inline]
    pub fn leading_monomial(&self) -> Option<&Monomial> {
        self.mons.first()
    }

    /// The leading term, `None` if the polynomial is a constant
    #[inline]
    pub fn leading_term(&self) -> Option<&Term> {
        self.mons.first().and_then(Monomial::term)
    }

    /// Certificate index
    #[inline]
    pub fn idx(&self) -> usize {
        self.idx
    }

    /// Set the certificate index
    #[inline]
    pub fn set_idx(&mut self, idx: usize) {
        self.idx = idx;
    }

    /// Certificate level
    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Set the certificate level
    #[inline]
    pub fn set_level(&mut self, level: u32) {
        self.level = level;
    }

    /// Size of the smallest term, `None` for the zero polynomial
    pub fn min_term_size(&self) -> Option<usize> {
        self.mons.iter().map(Monomial::term_size).min()
    }

    /// Whether every variable occurring in this polynomial satisfies `pred`
    pub fn all_vars(&self, mut pred: impl FnMut(&Var) -> bool) -> bool {
        self.mons
            .iter()
            .filter_map(Monomial::term)
            .all(|t| t.vars().all(&mut pred))
    }

    /// Evaluate the polynomial under the Boolean assignment `assignment`
    pub fn eval(&self, mut assignment: impl FnMut(&Var) -> bool) -> BigInt {
        let mut res = BigInt::zero();
        for m in &self.mons {
            let val = match m.term() {
                Some(t) => t.vars().all(&mut assignment),
                None => true,
            };
            if val {
                res += m.coeff();
            }
        }
        res
    }

    /// Sum of `self` and `other`
    pub fn add(&self, other: &Polynomial) -> Polynomial {
        let (a, b) = (&self.mons, &other.mons);
        let mut mons = Vec::with_capacity(a.len() + b.len());
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            match a[i].term().cmp(&b[j].term()) {
                Ordering::Greater => {
                    mons.push(a[i].clone());
                    i += 1;
                }
                Ordering::Less => {
                    mons.push(b[j].clone());
                    j += 1;
                }
                Ordering::Equal => {
                    let coeff = a[i].coeff() + b[j].coeff();
                    if !coeff.is_zero() {
                        mons.push(Monomial::new(coeff, a[i].term().cloned()));
                    }
                    i += 1;
                    j += 1;
                }
            }
        }
        mons.extend_from_slice(&a[i..]);
        mons.extend_from_slice(&b[j..]);
        Polynomial {
            mons,
            ..Self::zero()
        }
    }

    /// Product of `self` and `other`
    pub fn multiply(&self, other: &Polynomial, table: &TermTable) -> Polynomial {
        let mut builder = PolyBuilder::with_capacity(self.len() * other.len());
        for m1 in &self.mons {
            for m2 in &other.mons {
                builder.push(m1.multiply(m2, table));
            }
        }
        builder.build()
    }

    /// Product of `self` and the constant `c`
    pub fn scale(&self, c: &BigInt) -> Polynomial {
        if c.is_zero() {
            return Self::zero();
        }
        let mons = self
            .mons
            .iter()
            .map(|m| {
                let coeff = if is_minus_one(c) {
                    -m.coeff()
                } else {
                    m.coeff() * c
                };
                Monomial::new(coeff, m.term().cloned())
            })
            .collect();
        Polynomial {
            mons,
            ..Self::zero()
        }
    }

    /// `-self`
    pub fn negate(&self) -> Polynomial {
        self.scale(&-BigInt::one())
    }

    /// Quotient of the division of `self` by the single-variable term `t`
    ///
    /// Collects every monomial containing the variable of `t`, with the
    /// variable removed. Since every term containing `v` is greater or equal
    /// to the term `v`, the scan stops at the first smaller term.
    ///
    /// Returns an error if `t` consists of more than one variable.
    pub fn divide_by_var_term(
        &self,
        t: &Term,
        table: &TermTable,
    ) -> Result<Polynomial, AlgebraError> {
        if t.rest().is_some() {
            return Err(AlgebraError::NotAVariable(t.to_string()));
        }
        let v = t.var();
        let mut builder = PolyBuilder::new();
        for m in &self.mons {
            let Some(mt) = m.term() else {
                continue;
            };
            if mt < t {
                break;
            }
            if mt.contains(v) {
                match table.remainder(mt, v) {
                    Some(rem) => builder.push(Monomial::new(m.coeff().clone(), Some(rem))),
                    None => {
                        builder.push(Monomial::new(m.coeff().clone(), None));
                        break;
                    }
                }
            }
        }
        Ok(builder.build())
    }

    /// Reduce every coefficient modulo `modulus`
    ///
    /// Returns the pair `(rem, quot)` of polynomials with
    /// `self = rem + modulus * quot`, where the coefficients of `rem` are the
    /// truncated remainders (keeping the sign of the original coefficient).
    pub fn mod_coefficients(&self, modulus: &BigInt) -> (Polynomial, Polynomial) {
        let mut rem = Vec::new();
        let mut quot = Vec::new();
        for m in &self.mons {
            let r = m.coeff() % modulus;
            let q = m.coeff() / modulus;
            if !r.is_zero() {
                rem.push(Monomial::new(r, m.term().cloned()));
            }
            if !q.is_zero() {
                quot.push(Monomial::new(q, m.term().cloned()));
            }
        }
        (
            Polynomial {
                mons: rem,
                ..Self::zero()
            },
            Polynomial {
                mons: quot,
                ..Self::zero()
            },
        )
    }

    /// Monomials with the smallest number of variables
    pub fn min_size_monomials(&self) -> impl Iterator<Item = &Monomial> {
        let min = self.min_term_size().unwrap_or(0);
        self.mons.iter().filter(move |m| m.term_size() == min)
    }

    /// Check the canonical form invariant
    pub fn is_canonical(&self) -> bool {
        let terms_ok = self.mons.iter().filter_map(Monomial::term).all(|t| {
            let levels: Vec<u32> = t.vars().map(Var::level).collect();
            levels.windows(2).all(|w| w[0] > w[1])
        });
        let order_ok = self
            .mons
            .windows(2)
            .all(|w| w[0].term() > w[1].term());
        let coeff_ok = self.mons.iter().all(|m| !m.coeff().is_zero());
        terms_ok && order_ok && coeff_ok
    }
}

impl PartialEq for Polynomial {
    fn eq(&self, other: &Self) -> bool {
        self.mons == other.mons
    }
}
impl Eq for Polynomial {}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut mons = self.mons.iter();
        match mons.next() {
            None => f.write_str("0"),
            Some(m) => {
                m.fmt_summand(f, true)?;
                for m in mons {
                    m.fmt_summand(f, false)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Debug for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

/// Staging buffer for assembling a [`Polynomial`] from unsorted monomials
#[derive(Default)]
pub struct PolyBuilder {
    mons: Vec<Monomial>,
}

impl PolyBuilder {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer with space for `capacity` monomials
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            mons: Vec::with_capacity(capacity),
        }
    }

    /// Whether the buffer is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mons.is_empty()
    }

    /// Number of monomials in the buffer
    #[inline]
    pub fn len(&self) -> usize {
        self.mons.len()
    }

    /// Insert `m` at its sorted position
    ///
    /// The buffer is scanned backwards from the end, so pushing monomials in
    /// (almost) canonical order is cheap. If a monomial with the same term is
    /// present, the coefficients are added, and the monomial is removed if the
    /// sum is zero.
    pub fn push(&mut self, m: Monomial) {
        if m.coeff().is_zero() {
            return;
        }
        let pos = self.mons.iter().rposition(|n| n.term() >= m.term());
        match pos {
            Some(i) if self.mons[i].term() == m.term() => {
                let coeff = self.mons[i].coeff() + m.coeff();
                if coeff.is_zero() {
                    self.mons.remove(i);
                } else {
                    self.mons[i] = Monomial::new(coeff, m.term().cloned());
                }
            }
            Some(i) => self.mons.insert(i + 1, m),
            None => self.mons.insert(0, m),
        }
    }

    /// Shorthand for pushing the monomial `coeff * term`
    ///
    /// Zero coefficients are ignored.
    pub fn push_term(&mut self, coeff: BigInt, term: Option<Term>) {
        if !coeff.is_zero() {
            self.push(Monomial::new(coeff, term));
        }
    }

    /// Append `m` without searching for its position
    ///
    /// The caller must ensure that `m`'s term is smaller than all terms in
    /// the buffer.
    pub fn push_back(&mut self, m: Monomial) {
        debug_assert!(self.mons.last().map_or(true, |n| n.term() > m.term()));
        self.mons.push(m);
    }

    /// Drain the buffer into a polynomial
    pub fn build(&mut self) -> Polynomial {
        Polynomial {
            mons: std::mem::take(&mut self.mons),
            ..Polynomial::zero()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Setup {
        table: TermTable,
        x: Var,
        y: Var,
        z: Var,
    }

    fn setup() -> Setup {
        Setup {
            table: TermTable::new(),
            x: Var::new("x", 3, 0),
            y: Var::new("y", 2, 1),
            z: Var::new("z", 1, 2),
        }
    }

    fn int(i: i64) -> BigInt {
        BigInt::from(i)
    }

    #[test]
    fn builder_sorts_and_cancels() {
        let s = setup();
        let tx = s.table.new_term(&s.x, None);
        let tz = s.table.new_term(&s.z, None);
        let txz = s.table.multiply(&tx, &tz);

        let mut b = PolyBuilder::new();
        b.push_term(int(3), None);
        b.push_term(int(2), Some(tz.clone()));
        b.push_term(int(-1), Some(txz.clone()));
        b.push_term(int(5), Some(tx.clone()));
        b.push_term(int(-2), Some(tz));
        b.push_term(int(4), None);
        let p = b.build();
        assert!(b.is_empty());
        assert!(p.is_canonical());
        assert_eq!(p.to_string(), "-x*z+5*x+7");
        assert_eq!(p.leading_term(), Some(&txz));
    }

    #[test]
    fn ring_laws() {
        let s = setup();
        let px = Polynomial::var(&s.table, &s.x);
        let py = Polynomial::negated_var(&s.table, &s.y);
        let pz = Polynomial::var(&s.table, &s.z).scale(&int(3));

        let a = px.add(&py);
        assert_eq!(a, py.add(&px));
        assert_eq!(a.add(&pz), px.add(&py.add(&pz)));
        assert_eq!(a.add(&Polynomial::zero()), a);
        assert_eq!(a.scale(&int(1)), a);
        assert!(a.scale(&int(0)).is_zero());
        assert!(a.add(&a.negate()).is_zero());

        let lhs = a.multiply(&pz.add(&px), &s.table);
        let rhs = a
            .multiply(&pz, &s.table)
            .add(&a.multiply(&px, &s.table));
        assert_eq!(lhs, rhs);
        assert!(lhs.is_canonical());
    }

    #[test]
    fn boolean_idempotence() {
        let s = setup();
        let px = Polynomial::var(&s.table, &s.x);
        let nx = Polynomial::negated_var(&s.table, &s.x);
        // x * (1 - x) = 0 for Boolean x
        assert!(px.multiply(&nx, &s.table).is_zero());
        assert_eq!(px.multiply(&px, &s.table), px);
    }

    #[test]
    fn division() {
        let s = setup();
        let px = Polynomial::var(&s.table, &s.x);
        let py = Polynomial::var(&s.table, &s.y);
        let pz = Polynomial::var(&s.table, &s.z);
        // p = -x + 2*y*z - y + 1
        let p = px
            .negate()
            .add(&py.multiply(&pz, &s.table).scale(&int(2)))
            .add(&py.negate())
            .add(&Polynomial::constant(int(1)));
        let ty = s.table.new_term(&s.y, None);
        let q = p.divide_by_var_term(&ty, &s.table).unwrap();
        assert_eq!(q.to_string(), "2*z-1");

        let tx = s.table.new_term(&s.x, None);
        let q = p.divide_by_var_term(&tx, &s.table).unwrap();
        assert_eq!(q.to_string(), "-1");
        // quotient times divisor reproduces the leading monomial
        let back = q.multiply(&px, &s.table);
        assert_eq!(back.leading_monomial(), p.leading_monomial());

        let tyz = s.table.multiply(&ty, &s.table.new_term(&s.z, None));
        assert_eq!(
            p.divide_by_var_term(&tyz, &s.table),
            Err(AlgebraError::NotAVariable("y*z".to_string()))
        );
    }

    #[test]
    fn modular_reduction() {
        let s = setup();
        let px = Polynomial::var(&s.table, &s.x);
        let p = px.scale(&int(-19)).add(&Polynomial::constant(int(16)));
        let (rem, quot) = p.mod_coefficients(&int(8));
        assert_eq!(rem.to_string(), "-3*x");
        assert_eq!(quot.to_string(), "-2*x+2");
        assert_eq!(rem.add(&quot.scale(&int(8))), p);
    }

    #[test]
    fn evaluation() {
        let s = setup();
        let px = Polynomial::var(&s.table, &s.x);
        let ny = Polynomial::negated_var(&s.table, &s.y);
        let p = px.multiply(&ny, &s.table).scale(&int(4));
        assert_eq!(p.eval(|v| *v == s.x), int(4));
        assert_eq!(p.eval(|_| true), int(0));
        assert!(p.all_vars(|v| v.level() >= 2));
        assert!(!p.all_vars(|v| v.level() >= 3));
    }

    #[test]
    fn printing() {
        let s = setup();
        assert_eq!(Polynomial::zero().to_string(), "0");
        assert_eq!(Polynomial::constant(int(-5)).to_string(), "-5");
        let p = Polynomial::negated_var(&s.table, &s.x).scale(&int(-1));
        assert_eq!(p.to_string(), "x-1");
        assert_eq!(p.min_term_size(), Some(0));
        assert_eq!(Polynomial::zero().min_term_size(), None);
    }
}
