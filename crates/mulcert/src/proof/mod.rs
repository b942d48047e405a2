//! Certificates
//!
//! A certificate consists of three files: the polynomials of the circuit
//! (written by [`Context::write_circuit_polys()`]), the target polynomial
//! (the word-level specification, [`Context::write_spec()`]), and a proof
//! that the target is contained in the ideal generated by the circuit
//! polynomials and `2^NN`. The proof is either a sequence of Practical
//! Algebraic Calculus (PAC) rules or a single Nullstellensatz identity.
//!
//! PAC rules have the forms `N % <expr>, <poly>;` (derive polynomial `N`)
//! and `N d;` (delete polynomial `N`).

use std::io::{self, Write};

use mulcert_algebra::Polynomial;

use crate::context::Context;
use crate::gate::GateId;

mod nss;

/// Kind of certificate to produce
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum ProofFormat {
    /// PAC proof logging every multiplication and addition
    Expanded,
    /// PAC proof with one linear combination rule per slice
    #[default]
    Condensed,
    /// Nullstellensatz certificate
    Nullstellensatz,
}

/// Sink for proof rules
pub(crate) struct ProofLog<'a> {
    pub(crate) format: ProofFormat,
    out: &'a mut dyn Write,
    next_idx: usize,
}

impl<'a> ProofLog<'a> {
    /// Create a proof log whose derived polynomials are numbered from
    /// `first_idx` on
    pub(crate) fn new(format: ProofFormat, out: &'a mut dyn Write, first_idx: usize) -> Self {
        Self {
            format,
            out,
            next_idx: first_idx,
        }
    }

    /// Whether PAC rules are written
    #[inline]
    pub(crate) fn is_pac(&self) -> bool {
        self.format != ProofFormat::Nullstellensatz
    }

    fn derive(&mut self, res: &mut Polynomial) -> usize {
        let idx = self.next_idx;
        self.next_idx += 1;
        res.set_idx(idx);
        idx
    }

    /// `idx d;`
    pub(crate) fn del(&mut self, idx: usize) -> io::Result<()> {
        writeln!(self.out, "{idx} d;")
    }

    /// `N % p1 + p2, res;`
    pub(crate) fn add(
        &mut self,
        p1: &Polynomial,
        p2: &Polynomial,
        res: &mut Polynomial,
    ) -> io::Result<()> {
        let idx = self.derive(res);
        writeln!(self.out, "{idx} % {} + {}, {res};", p1.idx(), p2.idx())
    }

    /// `N % p *(q), res;`
    pub(crate) fn mul(
        &mut self,
        p: &Polynomial,
        q: &Polynomial,
        res: &mut Polynomial,
    ) -> io::Result<()> {
        let idx = self.derive(res);
        writeln!(self.out, "{idx} % {} *({q}), {res};", p.idx())
    }

    /// `N % p1 *(q) + p2, res;`
    pub(crate) fn combi(
        &mut self,
        p1: &Polynomial,
        q: &Polynomial,
        p2: &Polynomial,
        res: &mut Polynomial,
    ) -> io::Result<()> {
        let idx = self.derive(res);
        writeln!(self.out, "{idx} % {} *({q}) + {}, {res};", p1.idx(), p2.idx())
    }

    /// `N % 1 *(f), res;`, i.e. `res = f * 2^NN` derived from the modulus
    pub(crate) fn modulo(&mut self, f: &Polynomial, res: &mut Polynomial) -> io::Result<()> {
        let idx = self.derive(res);
        writeln!(self.out, "{idx} % 1 *({f}), {res};")
    }

    /// `N % i1 *(q1) + i2 *(q2) + …, res;` with the pairs taken from the
    /// back
    pub(crate) fn linear_combination(
        &mut self,
        indices: &[usize],
        factors: &[Polynomial],
        res: &mut Polynomial,
    ) -> io::Result<()> {
        debug_assert_eq!(indices.len(), factors.len());
        let idx = self.derive(res);
        write!(self.out, "{idx} % ")?;
        for (k, (i, q)) in indices.iter().zip(factors).rev().enumerate() {
            if k > 0 {
                self.out.write_all(b" + ")?;
            }
            if q.is_one() {
                write!(self.out, "{i}")?;
            } else {
                write!(self.out, "{i} *({q})")?;
            }
        }
        writeln!(self.out, ", {res};")
    }

    /// `N % i1 + i2 + …, res;` with the indices taken from the back
    pub(crate) fn sum(&mut self, indices: &[usize], res: &mut Polynomial) -> io::Result<()> {
        let idx = self.derive(res);
        write!(self.out, "{idx} % ")?;
        for (k, i) in indices.iter().rev().enumerate() {
            if k > 0 {
                self.out.write_all(b" + ")?;
            }
            write!(self.out, "{i}")?;
        }
        writeln!(self.out, ", {res};")
    }

    #[inline]
    pub(crate) fn writer(&mut self) -> &mut dyn Write {
        &mut *self.out
    }

    pub(crate) fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl<'a> Context<'a> {
    /// Write `1 2^NN;` followed by `idx poly;` for every gate constraint
    pub(crate) fn write_circuit_polys(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "1 {};", self.modulus)?;
        for i in self.nn..self.num_gates() {
            let p = self.gate_constraint(GateId(i));
            writeln!(out, "{} {p};", p.idx())?;
        }
        out.flush()
    }

    /// Write the word-level specification
    pub(crate) fn write_spec(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{};", self.spec_polynomial())?;
        out.flush()
    }

    /// Proof log, if PAC rules are requested
    #[inline]
    pub(crate) fn pac(&mut self) -> Option<&mut ProofLog<'a>> {
        match &mut self.proof {
            Some(log) if log.is_pac() => Some(log),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn proof_format(&self) -> Option<ProofFormat> {
        self.proof.as_ref().map(|log| log.format)
    }

    /// Log the deletion of the current constraint of `n`
    pub(crate) fn log_del(&mut self, n: GateId) -> io::Result<()> {
        let idx = match &self[n].constraint {
            Some(p) => p.idx(),
            None => self.constraint_idx(n),
        };
        match self.pac() {
            Some(log) => log.del(idx),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use mulcert_algebra::{TermTable, Var};
    use num_bigint::BigInt;

    use super::*;

    #[test]
    fn rule_syntax() {
        let table = TermTable::new();
        let x = Var::new("x", 2, 0);
        let y = Var::new("y", 1, 1);
        let mut px = Polynomial::var(&table, &x);
        px.set_idx(3);
        let mut py = Polynomial::negated_var(&table, &y);
        py.set_idx(4);

        let mut buf = Vec::new();
        let mut log = ProofLog::new(ProofFormat::Expanded, &mut buf, 10);
        let mut sum = px.add(&py);
        log.add(&px, &py, &mut sum).unwrap();
        let mut prod = py.multiply(&px, &table);
        log.mul(&py, &px, &mut prod).unwrap();
        let mut c = px.multiply(&py, &table).add(&px);
        log.combi(&py, &px, &px, &mut c).unwrap();
        let mut m = px.scale(&BigInt::from(16));
        log.modulo(&px, &mut m).unwrap();
        let mut lc = Polynomial::zero();
        log.linear_combination(&[3, 4], &[Polynomial::constant(BigInt::from(1)), px.clone()], &mut lc)
            .unwrap();
        let mut s = Polynomial::zero();
        log.sum(&[10, 11, 12], &mut s).unwrap();
        log.del(3).unwrap();
        assert_eq!(s.idx(), 15);

        let expected = "\
10 % 3 + 4, x-y+1;
11 % 4 *(x), -x*y+x;
12 % 4 *(x) + 3, -x*y+2*x;
13 % 1 *(x), 16*x;
14 % 4 *(x) + 3, 0;
15 % 12 + 11 + 10, 0;
3 d;
";
        assert_eq!(String::from_utf8(buf).unwrap(), expected);
    }
}
