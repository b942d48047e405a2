//! Reader for combinational And-Inverter Graphs in the AIGER format
//!
//! Both the ASCII (`aag`) and the binary (`aig`) variant are supported. The
//! parsed [`Aig`] is normalized: inputs are the variables `1..=I`, latches
//! follow, and AND gates come last in topological order (every AND gate only
//! refers to variables with smaller numbers). Binary files already satisfy
//! this, ASCII files are re-encoded.
//!
//! ## Example
//!
//! ```no_run
//! # use mulcert_aiger::load_file::load_file;
//! # use mulcert_aiger::*;
//! let parse_options = ParseOptionsBuilder::default().build().unwrap();
//! let Some(aig) = load_file("mult.aig", &parse_options) else {
//!     return; // an error message has been printed to stderr
//! };
//! println!("{} inputs, {} AND gates", aig.num_inputs(), aig.num_ands());
//! ```
//!
//! ## Feature flags
#![doc = document_features::document_features!()]
#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::type_complexity)]

use std::fmt;
use std::ops::Not;

use derive_builder::Builder;

pub mod aiger;
mod shape;
mod util;

#[cfg(feature = "load-file")]
pub mod load_file;

pub use shape::{check_multiplier_shape, InputOrder, ShapeError};

/// AIGER literal: variable number times two, plus one if negated
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal(u32);

impl Literal {
    /// Constant false
    pub const FALSE: Self = Self(0);
    /// Constant true
    pub const TRUE: Self = Self(1);

    /// Create a literal from a variable number and a polarity
    #[inline]
    pub const fn new(var: u32, negated: bool) -> Self {
        Self(var << 1 | negated as u32)
    }

    /// Create a literal from its AIGER encoding
    #[inline]
    pub const fn from_code(code: u32) -> Self {
        Self(code)
    }

    /// The AIGER encoding
    #[inline]
    pub const fn code(self) -> u32 {
        self.0
    }

    /// The variable number (0 for the constants)
    #[inline]
    pub const fn var(self) -> u32 {
        self.0 >> 1
    }

    /// Whether the literal is negated
    #[inline]
    pub const fn is_negated(self) -> bool {
        self.0 & 1 != 0
    }

    /// Whether the literal is one of the constants
    #[inline]
    pub const fn is_constant(self) -> bool {
        self.0 < 2
    }

    /// The non-negated literal of the same variable
    #[inline]
    pub const fn positive(self) -> Self {
        Self(self.0 & !1)
    }
}

impl Not for Literal {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        Self(self.0 ^ 1)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negated() {
            write!(f, "!{}", self.var())
        } else {
            write!(f, "{}", self.var())
        }
    }
}

/// AND gate `lhs = rhs0 ∧ rhs1`
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct AndGate {
    /// The (non-negated) gate literal
    pub lhs: Literal,
    /// First fan-in
    pub rhs0: Literal,
    /// Second fan-in
    pub rhs1: Literal,
}

/// Latch with its next-state literal and initial value (`None` means
/// uninitialized)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Latch {
    /// The (non-negated) latch literal
    pub lit: Literal,
    /// Next state function
    pub next: Literal,
    /// Initial value
    pub init: Option<bool>,
}

/// Read-only view on a parsed AIG
///
/// This is the interface the verification engine consumes. Variables are
/// numbered such that inputs come first (`1..=num_inputs()`), followed by
/// latches and AND gates.
pub trait AigModel {
    /// The maximal variable number
    fn max_var(&self) -> u32;
    /// Number of primary inputs
    fn num_inputs(&self) -> usize;
    /// Number of latches
    fn num_latches(&self) -> usize;
    /// Number of outputs
    fn num_outputs(&self) -> usize;
    /// Number of AND gates
    fn num_ands(&self) -> usize;
    /// Literal of the `i`-th input
    fn input(&self, i: usize) -> Literal;
    /// Literal of the `i`-th output
    fn output(&self, i: usize) -> Literal;
    /// The AND gate defining the variable of `lit`, if any
    fn and_gate(&self, lit: Literal) -> Option<AndGate>;
    /// Whether the variable of `lit` is a primary input
    fn is_input(&self, lit: Literal) -> bool;

    /// Whether the variable of `lit` is defined by an AND gate
    fn is_and(&self, lit: Literal) -> bool {
        self.and_gate(lit).is_some()
    }
}

/// Combinational or sequential And-Inverter Graph
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Aig {
    num_inputs: usize,
    latches: Vec<Latch>,
    outputs: Vec<Literal>,
    ands: Vec<AndGate>,
    input_names: Vec<Option<String>>,
    output_names: Vec<Option<String>>,
}

impl Aig {
    /// Create an AIG from normalized parts
    ///
    /// Input `i` is variable `i + 1`, latch `j` must be variable
    /// `num_inputs + j + 1`, and AND gate `k` must be variable
    /// `num_inputs + latches.len() + k + 1` with fan-ins referring to smaller
    /// variables only. Returns `None` if this is violated.
    pub fn new(
        num_inputs: usize,
        latches: Vec<Latch>,
        outputs: Vec<Literal>,
        ands: Vec<AndGate>,
    ) -> Option<Self> {
        let first_and = num_inputs + latches.len() + 1;
        let max_var = (first_and - 1 + ands.len()) as u32;
        for (j, l) in latches.iter().enumerate() {
            if l.lit != Literal::new((num_inputs + j + 1) as u32, false) || l.next.var() > max_var
            {
                return None;
            }
        }
        for (k, g) in ands.iter().enumerate() {
            let var = (first_and + k) as u32;
            if g.lhs != Literal::new(var, false) || g.rhs0.var() >= var || g.rhs1.var() >= var {
                return None;
            }
        }
        if outputs.iter().any(|o| o.var() > max_var) {
            return None;
        }
        Some(Self {
            num_inputs,
            latches,
            outputs,
            ands,
            input_names: Vec::new(),
            output_names: Vec::new(),
        })
    }

    /// The latches
    pub fn latches(&self) -> &[Latch] {
        &self.latches
    }

    /// The output literals
    pub fn outputs(&self) -> &[Literal] {
        &self.outputs
    }

    /// The AND gates in topological order
    pub fn ands(&self) -> &[AndGate] {
        &self.ands
    }

    /// Name of input `i` from the symbol table
    pub fn input_name(&self, i: usize) -> Option<&str> {
        self.input_names.get(i)?.as_deref()
    }

    /// Name of output `i` from the symbol table
    pub fn output_name(&self, i: usize) -> Option<&str> {
        self.output_names.get(i)?.as_deref()
    }

    #[inline]
    fn first_and_var(&self) -> u32 {
        (self.num_inputs + self.latches.len() + 1) as u32
    }
}

impl AigModel for Aig {
    #[inline]
    fn max_var(&self) -> u32 {
        self.first_and_var() - 1 + self.ands.len() as u32
    }

    #[inline]
    fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    #[inline]
    fn num_latches(&self) -> usize {
        self.latches.len()
    }

    #[inline]
    fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    #[inline]
    fn num_ands(&self) -> usize {
        self.ands.len()
    }

    #[inline]
    fn input(&self, i: usize) -> Literal {
        debug_assert!(i < self.num_inputs);
        Literal::new(i as u32 + 1, false)
    }

    #[inline]
    fn output(&self, i: usize) -> Literal {
        self.outputs[i]
    }

    fn and_gate(&self, lit: Literal) -> Option<AndGate> {
        let first = self.first_and_var();
        let var = lit.var();
        if var < first {
            return None;
        }
        self.ands.get((var - first) as usize).copied()
    }

    #[inline]
    fn is_input(&self, lit: Literal) -> bool {
        let var = lit.var();
        var >= 1 && var as usize <= self.num_inputs
    }
}

/// Options for the parser
#[non_exhaustive]
#[derive(Clone, Builder, Debug)]
pub struct ParseOptions {
    /// Whether to read input and output names from the symbol table
    ///
    /// The names are only used for diagnostics, so reading them can be turned
    /// off for large circuits.
    #[builder(default = "true")]
    pub symbols: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals() {
        let l = Literal::new(3, true);
        assert_eq!(l.code(), 7);
        assert_eq!(l.var(), 3);
        assert!(l.is_negated());
        assert_eq!(!l, Literal::from_code(6));
        assert_eq!(l.positive(), !l);
        assert!(Literal::TRUE.is_constant());
        assert!(!Literal::new(1, false).is_constant());
    }

    #[test]
    fn normalized_construction() {
        let i0 = Literal::new(1, false);
        let i1 = Literal::new(2, false);
        let g = AndGate {
            lhs: Literal::new(3, false),
            rhs0: i1,
            rhs1: !i0,
        };
        let aig = Aig::new(2, Vec::new(), vec![!g.lhs], vec![g]).unwrap();
        assert_eq!(aig.max_var(), 3);
        assert!(aig.is_input(i1));
        assert!(!aig.is_input(g.lhs));
        assert_eq!(aig.and_gate(!g.lhs), Some(g));
        assert!(!aig.is_and(i0));

        // fan-in refers to the gate itself
        let cyclic = AndGate { rhs1: g.lhs, ..g };
        assert!(Aig::new(2, Vec::new(), vec![g.lhs], vec![cyclic]).is_none());
    }
}
