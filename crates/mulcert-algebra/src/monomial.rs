use std::fmt;
use std::rc::Rc;

use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};

use crate::{Term, TermTable};

/// A non-zero coefficient times a term
///
/// Monomials are immutable and shared between polynomials, so cloning is
/// cheap.
#[derive(Clone)]
pub struct Monomial(Rc<MonomialData>);

struct MonomialData {
    coeff: BigInt,
    term: Option<Term>,
}

impl Monomial {
    /// Create a new monomial
    ///
    /// `coeff` must not be zero, `term` is `None` for constants.
    pub fn new(coeff: BigInt, term: Option<Term>) -> Self {
        debug_assert!(!coeff.is_zero(), "monomials must have non-zero coefficients");
        Self(Rc::new(MonomialData { coeff, term }))
    }

    /// The coefficient
    #[inline]
    pub fn coeff(&self) -> &BigInt {
        &self.0.coeff
    }

    /// The term, `None` if this monomial is a constant
    #[inline]
    pub fn term(&self) -> Option<&Term> {
        self.0.term.as_ref()
    }

    /// Number of variables
    pub fn term_size(&self) -> usize {
        self.0.term.as_ref().map_or(0, Term::len)
    }

    /// Product of two monomials
    pub fn multiply(&self, other: &Monomial, table: &TermTable) -> Monomial {
        let coeff = if is_minus_one(self.coeff()) {
            -other.coeff()
        } else if is_minus_one(other.coeff()) {
            -self.coeff()
        } else {
            self.coeff() * other.coeff()
        };
        let term = match (self.term(), other.term()) {
            (Some(t1), Some(t2)) => Some(table.multiply(t1, t2)),
            (Some(t), None) | (None, Some(t)) => Some(t.clone()),
            (None, None) => None,
        };
        Monomial::new(coeff, term)
    }

    /// Write the monomial as a summand
    ///
    /// The leading monomial of a polynomial is printed without a `+` sign.
    /// Coefficients `1` and `-1` of non-constant monomials are omitted.
    pub(crate) fn fmt_summand(&self, f: &mut fmt::Formatter<'_>, leading: bool) -> fmt::Result {
        let c = self.coeff();
        if !leading && c.is_positive() {
            f.write_str("+")?;
        }
        match self.term() {
            Some(t) => {
                if is_minus_one(c) {
                    f.write_str("-")?;
                } else if !c.is_one() {
                    write!(f, "{c}*")?;
                }
                write!(f, "{t}")
            }
            None => write!(f, "{c}"),
        }
    }
}

impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_summand(f, true)
    }
}

impl fmt::Debug for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_summand(f, true)
    }
}

impl PartialEq for Monomial {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
            || (self.0.term == other.0.term && self.0.coeff == other.0.coeff)
    }
}
impl Eq for Monomial {}

#[inline]
pub(crate) fn is_minus_one(c: &BigInt) -> bool {
    c.is_negative() && c.magnitude().is_one()
}
