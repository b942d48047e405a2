//! Multilinear polynomials with arbitrary-precision integer coefficients
//!
//! # Overview
//!
//! The building blocks are [`Var`]iables, [`Term`]s (products of distinct
//! variables), [`Monomial`]s (a coefficient times a term) and
//! [`Polynomial`]s (sums of monomials in canonical order).
//!
//! Every variable carries a *level*. Terms list their variables by strictly
//! decreasing level, and polynomials list their monomials by strictly
//! decreasing term (see [`Term::cmp()`][Ord::cmp]). Hence two polynomials are
//! equal iff their monomial sequences are equal.
//!
//! Terms are hash-consed in a [`TermTable`]: structurally equal terms are
//! represented by the same shared object, so term equality is a pointer
//! comparison. Because variables are Boolean, terms are square-free
//! (`x * x = x`).
//!
//! ```
//! use mulcert_algebra::{PolyBuilder, Polynomial, TermTable, Var, Monomial};
//! use num_bigint::BigInt;
//!
//! let table = TermTable::new();
//! let x = Var::new("x", 2, 0);
//! let y = Var::new("y", 1, 1);
//! let px = Polynomial::var(&table, &x);
//! let py = Polynomial::var(&table, &y);
//!
//! // (x + y) * (x + y) = x + 2*x*y + y over Boolean variables
//! let sum = px.add(&py);
//! let square = sum.multiply(&sum, &table);
//! assert_eq!(square.to_string(), "2*x*y+x+y");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
pub mod hash;
mod monomial;
mod polynomial;
mod term;
mod var;

pub use error::AlgebraError;
pub use monomial::Monomial;
pub use polynomial::{PolyBuilder, Polynomial};
pub use term::{Term, TermTable, Vars};
pub use var::Var;
