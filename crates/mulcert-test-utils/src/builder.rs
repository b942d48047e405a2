//! Construction of normalized AIGs

use std::fmt::Write;

use rustc_hash::FxHashMap;

use mulcert_aiger::{Aig, AigModel, AndGate, Literal};

/// How XOR gates are decomposed into AND gates
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum XorStyle {
    /// `¬(a ∧ b) ∧ ¬(¬a ∧ ¬b)`, three AND gates whose two inner gates have
    /// complementary fan-ins (the pattern generators like ABC produce)
    Complementary,
    /// `(a ∧ ¬(a ∧ b)) ∨ (b ∧ ¬(a ∧ b))`, four AND gates
    SharedNand,
}

/// Incremental AIG construction with structural hashing and constant
/// propagation
///
/// Inputs are the variables `1..=num_inputs`, AND gates are numbered in
/// creation order. Hence the gates are topologically sorted by construction.
pub struct AigBuilder {
    num_inputs: usize,
    ands: Vec<AndGate>,
    unique: FxHashMap<(Literal, Literal), Literal>,
}

impl AigBuilder {
    /// Create a builder for a circuit with `num_inputs` inputs
    pub fn new(num_inputs: usize) -> Self {
        Self {
            num_inputs,
            ands: Vec::new(),
            unique: FxHashMap::default(),
        }
    }

    /// Literal of input `i`
    pub fn input(&self, i: usize) -> Literal {
        assert!(i < self.num_inputs, "input {i} out of range");
        Literal::new(i as u32 + 1, false)
    }

    /// Number of AND gates created so far (including unreachable ones)
    pub fn num_ands(&self) -> usize {
        self.ands.len()
    }

    /// Conjunction
    ///
    /// The fan-ins are stored such that `rhs0 >= rhs1`.
    pub fn and(&mut self, a: Literal, b: Literal) -> Literal {
        let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
        if lo == Literal::FALSE || hi == !lo {
            return Literal::FALSE;
        }
        if lo == Literal::TRUE || hi == lo {
            return hi;
        }
        if let Some(&lhs) = self.unique.get(&(hi, lo)) {
            return lhs;
        }
        let lhs = Literal::new((self.num_inputs + self.ands.len() + 1) as u32, false);
        self.ands.push(AndGate {
            lhs,
            rhs0: hi,
            rhs1: lo,
        });
        self.unique.insert((hi, lo), lhs);
        lhs
    }

    /// Disjunction
    pub fn or(&mut self, a: Literal, b: Literal) -> Literal {
        !self.and(!a, !b)
    }

    /// Exclusive or
    pub fn xor(&mut self, a: Literal, b: Literal, style: XorStyle) -> Literal {
        match style {
            XorStyle::Complementary => {
                let both = self.and(a, b);
                let none = self.and(!a, !b);
                self.and(!both, !none)
            }
            XorStyle::SharedNand => {
                let nand = !self.and(a, b);
                let only_a = self.and(a, nand);
                let only_b = self.and(b, nand);
                self.or(only_a, only_b)
            }
        }
    }

    /// Half adder, returns `(sum, carry)`
    pub fn half_adder(&mut self, x: Literal, y: Literal, style: XorStyle) -> (Literal, Literal) {
        let sum = self.xor(x, y, style);
        let carry = self.and(x, y);
        (sum, carry)
    }

    /// Full adder, returns `(sum, carry)`
    pub fn full_adder(
        &mut self,
        x: Literal,
        y: Literal,
        z: Literal,
        style: XorStyle,
    ) -> (Literal, Literal) {
        let xy = self.xor(x, y, style);
        let sum = self.xor(xy, z, style);
        let c1 = self.and(x, y);
        let c2 = self.and(xy, z);
        let carry = self.or(c1, c2);
        (sum, carry)
    }

    /// Create the AIG with the given outputs
    ///
    /// AND gates not reachable from any output are dropped, the remaining
    /// ones are renumbered consecutively (preserving their order).
    pub fn build(&self, outputs: &[Literal]) -> Aig {
        let first_and = self.num_inputs + 1;
        let mut live = vec![false; self.ands.len()];
        let mut stack: Vec<Literal> = outputs.to_vec();
        while let Some(l) = stack.pop() {
            let var = l.var() as usize;
            if var < first_and || live[var - first_and] {
                continue;
            }
            live[var - first_and] = true;
            let g = self.ands[var - first_and];
            stack.push(g.rhs0);
            stack.push(g.rhs1);
        }

        let mut new_var = vec![0u32; self.ands.len()];
        let map = |l: Literal, new_var: &[u32]| {
            let var = l.var() as usize;
            if var < first_and {
                l
            } else {
                Literal::new(new_var[var - first_and], l.is_negated())
            }
        };
        let mut ands = Vec::with_capacity(self.ands.len());
        for (k, g) in self.ands.iter().enumerate() {
            if !live[k] {
                continue;
            }
            let var = (first_and + ands.len()) as u32;
            new_var[k] = var;
            ands.push(AndGate {
                lhs: Literal::new(var, false),
                rhs0: map(g.rhs0, &new_var),
                rhs1: map(g.rhs1, &new_var),
            });
        }
        let outputs = outputs.iter().map(|&l| map(l, &new_var)).collect();
        Aig::new(self.num_inputs, Vec::new(), outputs, ands)
            .expect("builder only creates normalized AIGs")
    }
}

/// Serialize `aig` in the ASCII AIGER format (without symbol table)
pub fn to_aag(aig: &Aig) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "aag {} {} {} {} {}",
        aig.max_var(),
        aig.num_inputs(),
        aig.num_latches(),
        aig.num_outputs(),
        aig.num_ands()
    );
    for i in 0..aig.num_inputs() {
        let _ = writeln!(out, "{}", aig.input(i));
    }
    for l in aig.latches() {
        let _ = match l.init {
            Some(false) => writeln!(out, "{} {}", l.lit, l.next),
            Some(true) => writeln!(out, "{} {} 1", l.lit, l.next),
            None => writeln!(out, "{} {} {}", l.lit, l.next, l.lit),
        };
    }
    for &o in aig.outputs() {
        let _ = writeln!(out, "{o}");
    }
    for g in aig.ands() {
        let _ = writeln!(out, "{} {} {}", g.lhs, g.rhs0, g.rhs1);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::simulate;

    #[test]
    fn structural_hashing() {
        let mut b = AigBuilder::new(2);
        let (x, y) = (b.input(0), b.input(1));
        let g = b.and(x, y);
        assert_eq!(b.and(y, x), g);
        assert_eq!(b.and(x, !x), Literal::FALSE);
        assert_eq!(b.and(x, Literal::TRUE), x);
        assert_eq!(b.and(x, x), x);
        assert_eq!(b.num_ands(), 1);
    }

    #[test]
    fn xor_styles() {
        for style in [XorStyle::Complementary, XorStyle::SharedNand] {
            let mut b = AigBuilder::new(2);
            let (x, y) = (b.input(0), b.input(1));
            let o = b.xor(x, y, style);
            let aig = b.build(&[o]);
            for v in 0..4u32 {
                let inputs = [v & 1 != 0, v & 2 != 0];
                assert_eq!(simulate(&aig, &inputs), vec![inputs[0] ^ inputs[1]]);
            }
        }
    }

    #[test]
    fn unreachable_gates_are_dropped() {
        let mut b = AigBuilder::new(3);
        let (x, y, z) = (b.input(0), b.input(1), b.input(2));
        let _unused = b.and(x, z);
        let g = b.and(x, y);
        let aig = b.build(&[!g]);
        assert_eq!(aig.num_ands(), 1);
        assert_eq!(aig.outputs(), &[Literal::from_code(9)]);
        assert_eq!(to_aag(&aig), "aag 4 3 0 1 1\n2\n4\n6\n9\n8 4 2\n");
    }
}
