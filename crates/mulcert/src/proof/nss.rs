//! Nullstellensatz certificates
//!
//! Instead of logging every step, the engine tracks for each gate constraint
//! which original constraints it is a combination of (its *ancestors*), and
//! accumulates the factor every original constraint is multiplied with
//! during reduction (its *co-factor*). The certificate is the identity
//! `Σ cofactor_g * p_g + modfactor * 2^NN = spec`.

use std::io;

use num_bigint::BigInt;
use num_traits::One;

use mulcert_algebra::Polynomial;

use crate::context::Context;
use crate::gate::GateId;

impl Context<'_> {
    /// Record that `q` times the constraint of `anc` was added to the
    /// constraint of `n`
    pub(crate) fn add_ancestors(&mut self, n: GateId, anc: GateId, q: &Polynomial) {
        self[n]
            .ancestors
            .entry(n)
            .or_insert_with(|| Polynomial::constant(BigInt::one()));

        let contributions: Vec<(GateId, Polynomial)> = if self[anc].is_original() {
            vec![(anc, q.clone())]
        } else {
            self[anc]
                .ancestors
                .iter()
                .map(|(&g, c)| (g, q.multiply(c, &self.table)))
                .collect()
        };
        for (g, f) in contributions {
            let entry = self[n].ancestors.entry(g).or_default();
            *entry = entry.add(&f);
        }
    }

    /// Add `q` times the current constraint of `n` to the co-factors
    pub(crate) fn add_cofactor(&mut self, n: GateId, q: &Polynomial) {
        let contributions: Vec<(GateId, Polynomial)> = if self[n].is_original() {
            vec![(n, q.clone())]
        } else {
            self[n]
                .ancestors
                .iter()
                .map(|(&g, c)| (g, c.multiply(q, &self.table)))
                .collect()
        };
        for (g, f) in contributions {
            let cofactor = match self[g].cofactor.take() {
                Some(c) => c.add(&f),
                None => f,
            };
            self[g].cofactor = Some(cofactor);
        }
    }

    /// Write `M+1 % idx *(cofactor) + … + 1 *(modfactor) , spec;`
    pub(crate) fn write_nss(&mut self) -> io::Result<()> {
        let spec = self.spec_polynomial();
        let Some(log) = self.proof.as_mut() else {
            return Ok(());
        };
        let out = log.writer();
        write!(out, "{} % ", self.m + 1)?;
        let mut first = true;
        for (i, gate) in self.gates.iter().enumerate().skip(self.nn).rev() {
            let Some(cofactor) = &gate.cofactor else {
                continue;
            };
            if cofactor.is_zero() {
                continue;
            }
            if !first {
                out.write_all(b" + ")?;
            }
            first = false;
            writeln!(out, "{} *({cofactor})", 2 + i - self.nn)?;
        }
        if !self.mod_factor.is_zero() {
            writeln!(out, " + 1 *({})", self.mod_factor)?;
        }
        writeln!(out, " , {spec};")?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use mulcert_test_utils::fixtures::{parse, MULT2_AAG};

    use super::*;

    #[test]
    fn ancestors_compose() {
        let aig = parse(MULT2_AAG.as_bytes());
        let mut ctx = Context::new(&aig, false).unwrap();
        let (g7, g9, g13) = (GateId(7), GateId(9), GateId(13));
        let q = Polynomial::var(&ctx.table, &ctx[GateId(0)].var);
        let r = Polynomial::var(&ctx.table, &ctx[GateId(1)].var);

        ctx.add_ancestors(g9, g7, &q);
        assert!(ctx[g9].ancestors[&g9].is_one());
        assert_eq!(ctx[g9].ancestors[&g7], q);

        ctx.add_ancestors(g13, g9, &r);
        assert_eq!(ctx[g13].ancestors.len(), 3);
        assert_eq!(ctx[g13].ancestors[&g9], r);
        assert_eq!(ctx[g13].ancestors[&g7].to_string(), "a1*a0");

        let f = Polynomial::constant(BigInt::from(3));
        ctx.add_cofactor(g13, &f);
        ctx.add_cofactor(g13, &f);
        assert_eq!(ctx[g13].cofactor.as_ref().unwrap().to_string(), "6");
        assert_eq!(ctx[g9].cofactor.as_ref().unwrap().to_string(), "6*a1");
        assert_eq!(ctx[g7].cofactor.as_ref().unwrap().to_string(), "6*a1*a0");
        assert!(ctx[GateId(8)].cofactor.is_none());
    }
}
