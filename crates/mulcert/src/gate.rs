//! Gates of the circuit graph

use std::collections::BTreeMap;
use std::fmt;

use mulcert_aiger::{AndGate, Literal};
use mulcert_algebra::{Polynomial, Var};

/// Index of a gate in the arena of a [`Context`][crate::context::Context]
///
/// For a circuit with maximal variable `M - 1` and `NN` outputs, index
/// `i < M - 1` belongs to AIG variable `i + 1` (inputs first, then AND
/// gates), and index `M - 1 + i` to output `s_i`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct GateId(pub(crate) usize);

impl fmt::Debug for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a gate is in the AIG
#[derive(Clone, Copy, Debug)]
pub(crate) enum GateKind {
    Input,
    And(AndGate),
    /// Output variable `s_i` with the literal it is connected to
    Output(Literal),
}

/// Role of a gate in a detected XOR pattern
///
/// An XOR `n = ¬l ∧ ¬r` with `l = ll ∧ lr` and `r = ¬ll ∧ ¬lr` (or the
/// mirrored fan-ins) has root `n` and the inner gates `l` and `r`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum XorRole {
    Plain,
    Root,
    Inner,
}

pub(crate) struct Gate {
    pub(crate) var: Var,
    pub(crate) kind: GateKind,
    /// Drives one of the AIG outputs
    pub(crate) aig_output: bool,
    /// Partial product `a_i ∧ b_j` of two (non-negated) inputs
    pub(crate) pp: bool,
    /// Part of a Booth pattern
    pub(crate) booth: bool,
    pub(crate) xor: XorRole,
    /// XOR reachable from the most significant output via XOR roots
    pub(crate) xor_chain: bool,
    /// Moved to a lower slice by XOR fixing
    pub(crate) moved: bool,
    /// Carry slice during XOR slicing, number of parents in higher slices
    /// during input-cone slicing
    pub(crate) carry: i32,
    /// Slice the gate is assigned to
    ///
    /// Note that `None` is ordered before every slice, which the slicing
    /// heuristics rely on when comparing slices of possibly unassigned gates.
    pub(crate) slice: Option<usize>,
    pub(crate) eliminated: bool,
    /// Current gate constraint, created on first use
    pub(crate) constraint: Option<Polynomial>,
    /// Nullstellensatz co-factor of the original gate constraint
    pub(crate) cofactor: Option<Polynomial>,
    /// Original gate constraints the current constraint is derived from,
    /// together with their factors
    pub(crate) ancestors: BTreeMap<GateId, Polynomial>,
    /// Gates using this gate (duplicates possible)
    pub(crate) parents: Vec<GateId>,
    /// Gates this gate uses (duplicates possible)
    pub(crate) children: Vec<GateId>,
}

impl Gate {
    pub(crate) fn new(var: Var, kind: GateKind) -> Self {
        Self {
            var,
            kind,
            aig_output: false,
            pp: false,
            booth: false,
            xor: XorRole::Plain,
            xor_chain: false,
            moved: false,
            carry: 0,
            slice: None,
            eliminated: false,
            constraint: None,
            cofactor: None,
            ancestors: BTreeMap::new(),
            parents: Vec::new(),
            children: Vec::new(),
        }
    }

    #[inline]
    pub(crate) fn is_input(&self) -> bool {
        matches!(self.kind, GateKind::Input)
    }

    #[inline]
    pub(crate) fn is_output(&self) -> bool {
        matches!(self.kind, GateKind::Output(_))
    }

    #[inline]
    pub(crate) fn and(&self) -> Option<AndGate> {
        match self.kind {
            GateKind::And(g) => Some(g),
            _ => None,
        }
    }

    /// Whether the constraint of this gate is still the original one (no
    /// other constraint has been eliminated into it)
    #[inline]
    pub(crate) fn is_original(&self) -> bool {
        self.ancestors.is_empty()
    }

    #[inline]
    pub(crate) fn is_sliced(&self) -> bool {
        self.slice.is_some()
    }

    #[inline]
    pub(crate) fn name(&self) -> &str {
        self.var.name()
    }
}
