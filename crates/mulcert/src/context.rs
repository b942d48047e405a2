//! Run state and construction of the gate graph

use std::ops::{Index, IndexMut, Range};

use log::{debug, info};
use num_bigint::BigInt;
use num_traits::One;

use mulcert_aiger::{check_multiplier_shape, AigModel, AndGate, InputOrder, Literal};
use mulcert_algebra::{PolyBuilder, Polynomial, Term, TermTable, Var};

use crate::gate::{Gate, GateId, GateKind, XorRole};
use crate::proof::ProofLog;
use crate::VerifyError;

/// State of a verification run
///
/// The gate graph is an arena indexed by [`GateId`]. Parent and child
/// relations are stored as id lists on both sides.
pub(crate) struct Context<'a> {
    pub(crate) gates: Vec<Gate>,
    /// Number of outputs (`NN`)
    pub(crate) nn: usize,
    /// Maximal AIG variable plus one (`M`)
    pub(crate) m: usize,
    /// Gates of the operand bits `a_i`
    pub(crate) a: Vec<GateId>,
    /// Gates of the operand bits `b_i`
    pub(crate) b: Vec<GateId>,
    pub(crate) input_order: InputOrder,
    pub(crate) slices: Vec<Vec<GateId>>,
    pub(crate) table: TermTable,
    /// `2^NN`
    pub(crate) modulus: BigInt,
    pub(crate) signed: bool,
    /// Whether the most significant output is driven by a chain of XORs,
    /// or, after input-cone slicing, whether remainders are reduced modulo
    /// `2^NN`
    pub(crate) xor_chain: bool,
    /// The number of partial products indicates a Booth encoding
    pub(crate) booth: bool,
    pub(crate) proof: Option<ProofLog<'a>>,
    /// Nullstellensatz factor of the modulus
    pub(crate) mod_factor: Polynomial,
}

impl Index<GateId> for Context<'_> {
    type Output = Gate;

    #[inline]
    fn index(&self, id: GateId) -> &Gate {
        &self.gates[id.0]
    }
}

impl IndexMut<GateId> for Context<'_> {
    #[inline]
    fn index_mut(&mut self, id: GateId) -> &mut Gate {
        &mut self.gates[id.0]
    }
}

impl<'a> Context<'a> {
    /// Build the gate graph of `aig`
    ///
    /// Variables are leveled such that `a_0 < … < a_{n-1} < b_0 < … <
    /// b_{n-1} <` AND gates in topological order `< s_0 < … < s_{NN-1}`.
    pub(crate) fn new<A: AigModel + ?Sized>(aig: &A, signed: bool) -> Result<Self, VerifyError> {
        let nn = check_multiplier_shape(aig)?;
        let m = aig.max_var() as usize + 1;
        check_normalized(aig, nn)?;

        let input_order = InputOrder::detect(aig);
        info!("input order: {input_order:?}");
        let (a_idx, b_idx) = input_order.operand_inputs(nn / 2);

        let num_gates = m + nn - 1;
        let mut names: Vec<(String, u32)> = vec![(String::new(), 0); nn];
        for (i, &k) in a_idx.iter().enumerate() {
            names[k] = (format!("a{i}"), i as u32 + 1);
        }
        for (i, &k) in b_idx.iter().enumerate() {
            names[k] = (format!("b{i}"), (nn / 2 + i) as u32 + 1);
        }

        let mut gates = Vec::with_capacity(num_gates);
        for (i, (name, level)) in names.into_iter().enumerate() {
            gates.push(Gate::new(Var::new(name, level, i), GateKind::Input));
        }
        for i in nn..m - 1 {
            let lit = Literal::new(i as u32 + 1, false);
            let Some(g) = aig.and_gate(lit) else {
                return Err(VerifyError::Unnormalized { var: lit.var() });
            };
            let var = Var::new(format!("l{}", lit.code()), i as u32 + 1, i);
            gates.push(Gate::new(var, GateKind::And(g)));
        }
        for i in 0..nn {
            let idx = m - 1 + i;
            let var = Var::new(format!("s{i}"), idx as u32 + 1, idx);
            let mut gate = Gate::new(var, GateKind::Output(aig.output(i)));
            gate.slice = Some(i);
            gates.push(gate);
        }

        let mut ctx = Context {
            gates,
            nn,
            m,
            a: a_idx.into_iter().map(GateId).collect(),
            b: b_idx.into_iter().map(GateId).collect(),
            input_order,
            slices: vec![Vec::new(); nn],
            table: TermTable::new(),
            modulus: BigInt::one() << nn,
            signed,
            xor_chain: false,
            booth: false,
            proof: None,
            mod_factor: Polynomial::zero(),
        };
        ctx.set_parents_and_children();
        ctx.mark_aig_outputs();
        ctx.set_xor();
        Ok(ctx)
    }

    /// Number of gates including the output gates
    #[inline]
    pub(crate) fn num_gates(&self) -> usize {
        self.gates.len()
    }

    /// Ids of the AND gates
    #[inline]
    pub(crate) fn internal_gates(&self) -> impl DoubleEndedIterator<Item = GateId> {
        let range: Range<usize> = self.nn..self.m - 1;
        range.map(GateId)
    }

    /// Gate of output `s_i`
    #[inline]
    pub(crate) fn output_gate(&self, i: usize) -> GateId {
        GateId(self.m - 1 + i)
    }

    /// Gate of the variable of `lit`, `None` for the constants
    #[inline]
    pub(crate) fn gate_of(&self, lit: Literal) -> Option<GateId> {
        if lit.is_constant() {
            None
        } else {
            Some(GateId(lit.var() as usize - 1))
        }
    }

    /// AND gate defining the first fan-in of `n`
    pub(crate) fn first_fan_in_and(&self, n: GateId) -> Option<AndGate> {
        let g = self[n].and()?;
        let l = self.gate_of(g.rhs0)?;
        self[l].and()
    }

    #[inline]
    pub(crate) fn is_child(&self, n: GateId, c: GateId) -> bool {
        self[n].children.contains(&c)
    }

    #[inline]
    pub(crate) fn is_parent(&self, n: GateId, p: GateId) -> bool {
        self[n].parents.contains(&p)
    }

    /// Number of parents of `n` in a slice above `n`'s slice
    pub(crate) fn parents_above(&self, n: GateId) -> i32 {
        let slice = self[n].slice;
        self[n]
            .parents
            .iter()
            .filter(|&&p| self[p].slice > slice)
            .count() as i32
    }

    fn set_parents_and_children(&mut self) {
        let mut pp = 0;
        for n in self.internal_gates() {
            let Some(g) = self[n].and() else { continue };
            let l = self.gate_of(g.rhs0);
            let r = self.gate_of(g.rhs1);
            for c in [l, r].into_iter().flatten() {
                self[n].children.push(c);
                self[c].parents.push(n);
            }

            if let (Some(l), Some(r)) = (l, r) {
                if self[l].is_input()
                    && self[r].is_input()
                    && !g.rhs0.is_negated()
                    && !g.rhs1.is_negated()
                {
                    self[n].pp = true;
                    pp += 1;
                }
            }
        }

        for i in 0..self.nn {
            let s = self.output_gate(i);
            let GateKind::Output(lit) = self[s].kind else { continue };
            if let Some(c) = self.gate_of(lit) {
                self[s].children.push(c);
                self[c].parents.push(s);
            }
        }

        if pp != self.nn * self.nn / 4 {
            self.booth = true;
            info!("found {pp} partial products, assuming Booth encoding");
        } else {
            debug!("found {pp} partial products");
        }
    }

    fn mark_aig_outputs(&mut self) {
        for i in 0..self.nn {
            let s = self.output_gate(i);
            if let GateKind::Output(lit) = self[s].kind {
                if let Some(c) = self.gate_of(lit) {
                    self[c].aig_output = true;
                }
            }
        }
    }

    /// Detect XORs built from three AND gates
    fn set_xor(&mut self) {
        let mut found = 0;
        for n in self.internal_gates() {
            if self[n].xor != XorRole::Plain {
                continue;
            }
            let Some(g) = self[n].and() else { continue };
            let (l, r) = (g.rhs0, g.rhs1);
            if !l.is_negated() || !r.is_negated() || l == r || l == !r {
                continue;
            }
            let (Some(lg), Some(rg)) = (self.gate_of(l), self.gate_of(r)) else {
                continue;
            };
            let (Some(land), Some(rand)) = (self[lg].and(), self[rg].and()) else {
                continue;
            };
            let (ll, lr, rl, rr) = (land.rhs0, land.rhs1, rand.rhs0, rand.rhs1);
            if (ll == !rl && lr == !rr) || (ll == !rr && lr == !rl) {
                self[lg].xor = XorRole::Inner;
                self[rg].xor = XorRole::Inner;
                self[n].xor = XorRole::Root;
                found += 1;
            }
        }
        debug!("found {found} XOR gates");
    }

    /// Whether every output but `s_{NN-1}` is driven by an XOR
    ///
    /// XOR based slicing is only attempted if this holds.
    pub(crate) fn upper_half_xor_output(&self) -> bool {
        for i in (self.m..self.num_gates() - 1).rev() {
            let Some(&c) = self.gates[i].children.first() else {
                return false;
            };
            if self[c].xor == XorRole::Plain {
                return false;
            }
        }
        !self.gates[self.m - 1].children.is_empty()
    }

    /// Mark the XORs reachable from the most significant output through
    /// first fan-ins of XOR roots
    pub(crate) fn mark_xor_chain_in_last_slice(&mut self) {
        let out = self.output_gate(self.nn - 1);
        let Some(&child) = self[out].children.first() else {
            return;
        };
        if self[child].is_input() {
            return;
        }
        let mut queue = Vec::new();
        if self[child].xor == XorRole::Root {
            queue.push(child);
        }
        let mut marked = 0;
        while let Some(n) = queue.pop() {
            if self[n].xor_chain {
                continue;
            }
            if let Some(land) = self.first_fan_in_and(n) {
                for lit in [land.rhs0, land.rhs1] {
                    if let Some(c) = self.gate_of(lit) {
                        if self[c].xor != XorRole::Plain {
                            queue.push(c);
                        }
                    }
                }
            }
            self[n].xor_chain = true;
            marked += 1;
        }
        if marked > 0 {
            self.xor_chain = true;
        }
        debug!("marked {marked} gates of the XOR chain in the last slice");
    }

    /// Polynomial of literal `lit`: `x`, `1 - x`, or a constant
    fn literal_poly(&self, lit: Literal) -> Polynomial {
        match self.gate_of(lit) {
            None if lit.is_negated() => Polynomial::constant(BigInt::one()),
            None => Polynomial::zero(),
            Some(g) if lit.is_negated() => Polynomial::negated_var(&self.table, &self[g].var),
            Some(g) => Polynomial::var(&self.table, &self[g].var),
        }
    }

    /// Original constraint of gate `n`, i.e. `-v + f` for `v = f`
    ///
    /// Its index in the certificate is `2 + n - NN`.
    pub(crate) fn gate_constraint(&self, n: GateId) -> Polynomial {
        let v = Polynomial::var(&self.table, &self[n].var).negate();
        let f = match self[n].kind {
            GateKind::Input => Polynomial::zero(),
            GateKind::And(g) => {
                self.literal_poly(g.rhs0)
                    .multiply(&self.literal_poly(g.rhs1), &self.table)
            }
            GateKind::Output(lit) => self.literal_poly(lit),
        };
        let mut p = v.add(&f);
        p.set_idx(self.constraint_idx(n));
        p
    }

    /// Index of the original constraint of `n`
    #[inline]
    pub(crate) fn constraint_idx(&self, n: GateId) -> usize {
        2 + n.0 - self.nn
    }

    /// The current constraint of `n`, created if necessary
    pub(crate) fn constraint(&mut self, n: GateId) -> &Polynomial {
        let p = match self[n].constraint.take() {
            Some(p) => p,
            None => self.gate_constraint(n),
        };
        self[n].constraint.insert(p)
    }

    /// Term consisting of the variable of `n`
    #[inline]
    pub(crate) fn var_term(&self, n: GateId) -> Term {
        self.table.new_term(&self[n].var, None)
    }

    /// The word-level specification
    ///
    /// `-Σ 2^i s_i + Σ 2^(i+j) a_i b_j`, for signed multipliers with the
    /// signs of `s_{NN-1}` and the products involving exactly one operand's
    /// most significant bit flipped.
    pub(crate) fn spec_polynomial(&self) -> Polynomial {
        let n = self.nn / 2;
        let mut builder = PolyBuilder::with_capacity(self.nn + n * n);
        for i in 0..self.nn {
            let mut c = -(BigInt::one() << i);
            if self.signed && i == self.nn - 1 {
                c = -c;
            }
            builder.push_term(c, Some(self.var_term(self.output_gate(i))));
        }
        for i in 0..n {
            for j in 0..n {
                let mut c = BigInt::one() << (i + j);
                if self.signed && (i == n - 1) != (j == n - 1) {
                    c = -c;
                }
                let term = self
                    .table
                    .from_vars([&self[self.b[j]].var, &self[self.a[i]].var].into_iter());
                builder.push_term(c, term);
            }
        }
        builder.build()
    }
}

/// Check that the variables `1..=nn` are inputs and all further variables
/// AND gates
fn check_normalized<A: AigModel + ?Sized>(aig: &A, nn: usize) -> Result<(), VerifyError> {
    for i in 0..nn {
        let lit = aig.input(i);
        if lit != Literal::new(i as u32 + 1, false) {
            return Err(VerifyError::Unnormalized { var: lit.var() });
        }
    }
    if aig.num_ands() + nn != aig.max_var() as usize {
        return Err(VerifyError::Unnormalized {
            var: (nn + 1) as u32,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use mulcert_aiger::Aig;
    use mulcert_test_utils::fixtures::{parse, MULT2_AAG};

    use super::*;

    fn mult2() -> Aig {
        parse(MULT2_AAG.as_bytes())
    }

    #[test]
    fn graph_structure() {
        let aig = mult2();
        let ctx = Context::new(&aig, false).unwrap();
        assert_eq!((ctx.nn, ctx.m, ctx.num_gates()), (4, 15, 18));
        assert_eq!(ctx.input_order, InputOrder::Abc);
        assert!(!ctx.booth);

        let names: Vec<&str> = ctx.gates.iter().map(Gate::name).collect();
        assert_eq!(&names[..5], ["a0", "a1", "b0", "b1", "l10"]);
        assert_eq!(&names[14..], ["s0", "s1", "s2", "s3"]);

        // l10 = a0 ∧ b0 is a partial product driving s0
        let l10 = GateId(4);
        assert!(ctx[l10].pp && ctx[l10].aig_output);
        assert_eq!(ctx[l10].children, [GateId(0), GateId(2)]);
        assert_eq!(ctx[l10].parents, [ctx.output_gate(0)]);
        assert_eq!(ctx[GateId(0)].parents.len(), 2);

        // the sum outputs are XOR roots
        assert_eq!(ctx[GateId(9)].xor, XorRole::Root);
        assert_eq!(ctx[GateId(7)].xor, XorRole::Inner);
        assert_eq!(ctx[GateId(8)].xor, XorRole::Inner);
        assert_eq!(ctx[GateId(13)].xor, XorRole::Root);
        assert!(ctx.upper_half_xor_output());
    }

    #[test]
    fn gate_constraints() {
        let aig = mult2();
        let ctx = Context::new(&aig, false).unwrap();
        let c = ctx.gate_constraint(GateId(8));
        assert_eq!(c.to_string(), "-l18+l14*l12-l14-l12+1");
        assert_eq!(c.idx(), 2 + 8 - 4);
        assert_eq!(ctx.gate_constraint(GateId(4)).to_string(), "-l10+b0*a0");
        assert_eq!(ctx.gate_constraint(ctx.output_gate(3)).to_string(), "-s3+l24");
    }

    #[test]
    fn specification() {
        let aig = mult2();
        let ctx = Context::new(&aig, false).unwrap();
        assert_eq!(
            ctx.spec_polynomial().to_string(),
            "-8*s3-4*s2-2*s1-s0+4*b1*a1+2*b1*a0+2*b0*a1+b0*a0"
        );
        let ctx = Context::new(&aig, true).unwrap();
        assert_eq!(
            ctx.spec_polynomial().to_string(),
            "8*s3-4*s2-2*s1-s0+4*b1*a1-2*b1*a0-2*b0*a1+b0*a0"
        );
    }

    #[test]
    fn constant_outputs() {
        let aig = Aig::new(2, Vec::new(), vec![Literal::TRUE, Literal::FALSE], Vec::new()).unwrap();
        let ctx = Context::new(&aig, false).unwrap();
        assert_eq!(ctx.gate_constraint(ctx.output_gate(0)).to_string(), "-s0+1");
        assert_eq!(ctx.gate_constraint(ctx.output_gate(1)).to_string(), "-s1");
        assert!(ctx[ctx.output_gate(0)].children.is_empty());
        assert!(!ctx.upper_half_xor_output());
    }
}
