//! Reduction of the specification by the gate constraints
//!
//! The specification is built up slice by slice from the most significant
//! output downwards. After adding the part belonging to slice `i`, the
//! remainder is reduced by the constraints of the gates in slice `i`, which
//! eliminates their variables. For a correct multiplier, only zero (modulo
//! `2^NN`) remains.

use log::{debug, info, trace};
use num_bigint::BigInt;
use num_traits::{One, Signed};

use mulcert_algebra::{PolyBuilder, Polynomial};

use crate::context::Context;
use crate::gate::GateId;
use crate::proof::ProofFormat;
use crate::VerifyError;

/// Factors collected for the PAC proof during reduction
#[derive(Default)]
struct Factors {
    /// Products `q * p` of the current slice, merged like a binary counter
    products: Vec<Polynomial>,
    /// Quotients of the current slice (condensed proofs)
    quotients: Vec<Polynomial>,
    /// Indices of the constraints the quotients belong to
    indices: Vec<usize>,
    /// Per-slice sums
    slices: Vec<Polynomial>,
    /// Indices of the per-slice sums (condensed proofs)
    slice_indices: Vec<usize>,
}

impl<'a> Context<'a> {
    /// Part of the negated specification belonging to slice `i`
    ///
    /// `2^i s_i - Σ_{j+k=i} 2^i b_j a_k`, with sign flips for signed
    /// multipliers.
    pub(crate) fn inc_spec(&self, i: usize) -> Polynomial {
        let half = self.nn / 2;
        let mut builder = PolyBuilder::new();
        let mut coeff = BigInt::one() << i;
        if i == self.nn - 1 && self.signed {
            coeff = -coeff;
        }
        builder.push_term(coeff.clone(), Some(self.var_term(self.output_gate(i))));

        for j in (0..=i.min(half - 1)).rev() {
            if coeff.is_positive() {
                coeff = -coeff;
            }
            let k = i - j;
            if k > half - 1 {
                break;
            }
            if self.signed && k == half - 1 {
                coeff = -coeff;
            }
            if self.signed && j == half - 1 {
                coeff = -coeff;
            }
            let term = self
                .table
                .from_vars([&self[self.b[j]].var, &self[self.a[k]].var].into_iter());
            builder.push_term(coeff.clone(), term);
        }
        builder.build()
    }

    /// Reduce the coefficients of `p` modulo `2^NN`
    ///
    /// With `print`, the correction `f * 2^NN` is derived from the modulus
    /// and added to `p` in the PAC proof. For Nullstellensatz certificates,
    /// the correction is accumulated in the modulus factor.
    fn mod_poly(&mut self, p: Polynomial, print: bool) -> Result<Polynomial, VerifyError> {
        let (mut out, quot) = p.mod_coefficients(&self.modulus);
        out.set_idx(p.idx());
        if quot.is_zero() {
            return Ok(out);
        }
        let f = quot.negate();
        let mut mult = f.scale(&self.modulus);
        if print {
            if let Some(log) = self.pac() {
                log.modulo(&f, &mut mult)?;
                log.add(&p, &mult, &mut out)?;
            }
        }
        if self.proof_format() == Some(ProofFormat::Nullstellensatz) {
            self.mod_factor = self.mod_factor.add(&f);
        }
        Ok(out)
    }

    /// Eliminate the variable of `n` from `p`
    fn reduce_by_one_poly(
        &mut self,
        p: &Polynomial,
        n: GateId,
        factors: &mut Factors,
    ) -> Result<Polynomial, VerifyError> {
        let p2 = self.constraint(n).clone();
        let Some(lt) = p2.leading_term() else {
            return Ok(p.clone());
        };
        let q = p.divide_by_var_term(lt, &self.table)?;
        if q.is_zero() {
            return Ok(p.clone());
        }
        let mut mult = q.multiply(&p2, &self.table);
        let rem = p.add(&mult);

        match self.proof_format() {
            Some(ProofFormat::Expanded) => {
                if q.is_one() {
                    mult.set_idx(p2.idx());
                } else if let Some(log) = self.pac() {
                    log.mul(&p2, &q, &mut mult)?;
                }
                self.add_and_merge(&mut factors.products, mult, true)?;
                if !q.is_one() {
                    if let Some(log) = self.pac() {
                        log.del(p2.idx())?;
                    }
                }
            }
            Some(ProofFormat::Condensed) => {
                factors.quotients.push(q);
                factors.indices.push(p2.idx());
                self.add_and_merge(&mut factors.products, mult, false)?;
            }
            Some(ProofFormat::Nullstellensatz) => self.add_cofactor(n, &q),
            None => {}
        }
        Ok(rem)
    }

    /// Push `p` onto `stack`, adding it to the top while the levels agree
    ///
    /// The levels count how many polynomials were summed up, which keeps the
    /// sums balanced.
    fn add_and_merge(
        &mut self,
        stack: &mut Vec<Polynomial>,
        mut p: Polynomial,
        print: bool,
    ) -> Result<(), VerifyError> {
        while let Some(q) = stack.pop_if_level(p.level()) {
            let mut sum = p.add(&q);
            if print {
                sum = self.log_sum(&p, &q, sum)?;
            }
            sum.set_level(p.level() + 1);
            p = sum;
        }
        stack.push(p);
        Ok(())
    }

    /// Sum up and empty `stack`, starting at the top
    fn add_up(&mut self, stack: &mut Vec<Polynomial>, print: bool) -> Result<Polynomial, VerifyError> {
        let Some(mut p) = stack.pop() else {
            return Ok(Polynomial::zero());
        };
        while let Some(q) = stack.pop() {
            let mut sum = p.add(&q);
            if print {
                sum = self.log_sum(&p, &q, sum)?;
            }
            p = sum;
        }
        Ok(p)
    }

    /// Log `sum = p + q` (reduced modulo `2^NN` if needed) and delete the
    /// summands
    fn log_sum(
        &mut self,
        p: &Polynomial,
        q: &Polynomial,
        mut sum: Polynomial,
    ) -> Result<Polynomial, VerifyError> {
        if let Some(log) = self.pac() {
            log.add(p, q, &mut sum)?;
        }
        if self.xor_chain {
            sum = self.mod_poly(sum, true)?;
        }
        if let Some(log) = self.pac() {
            log.del(p.idx())?;
            log.del(q.idx())?;
        }
        Ok(sum)
    }

    /// Fix the coefficients of partial products in `res` such that it
    /// matches the specification exactly, not only modulo `2^NN`
    fn correct_pp(&mut self, res: &Polynomial) -> Result<(), VerifyError> {
        let half = BigInt::one() << (self.nn - 1);
        let mut builder = PolyBuilder::new();
        for m in res.iter() {
            let Some(t) = m.term() else { continue };
            if !self.gates[t.var().id()].is_input() {
                continue;
            }
            let c = m.coeff();
            let f = if self.signed {
                if *c > half {
                    -BigInt::one()
                } else if *c < -&half {
                    BigInt::one()
                } else {
                    continue;
                }
            } else if c.is_negative() {
                BigInt::one()
            } else {
                continue;
            };
            builder.push_term(f, Some(t.clone()));
        }
        let factor = builder.build();
        if factor.is_zero() {
            return Ok(());
        }
        let mut mult = factor.scale(&self.modulus);
        let mut sum = mult.add(res);
        if let Some(log) = self.pac() {
            log.modulo(&factor, &mut mult)?;
            log.add(&mult, res, &mut sum)?;
        }
        Ok(())
    }

    /// Reduce the specification by all slices, returns the remainder
    pub(crate) fn reduce(&mut self) -> Result<Polynomial, VerifyError> {
        info!("started reduction");
        let format = self.proof_format();
        let mut factors = Factors::default();
        let mut rem = Polynomial::zero();

        for i in (0..self.nn).rev() {
            rem = self.inc_spec(i).add(&rem);
            for k in 0..self.slices[i].len() {
                let n = self.slices[i][k];
                if self[n].eliminated {
                    continue;
                }
                trace!("reducing by {}", self.constraint(n));
                let mut next = self.reduce_by_one_poly(&rem, n, &mut factors)?;
                self[n].constraint = None;
                if self.xor_chain {
                    next = self.mod_poly(next, false)?;
                }
                rem = next;
                trace!("remainder is {rem}");
            }
            debug!("remainder after slice {i}: {rem}");

            if matches!(format, Some(ProofFormat::Expanded | ProofFormat::Condensed)) {
                let expanded = format == Some(ProofFormat::Expanded);
                let mut sum = self.add_up(&mut factors.products, expanded)?;
                if !expanded {
                    if let Some(log) = self.pac() {
                        log.linear_combination(&factors.indices, &factors.quotients, &mut sum)?;
                    }
                    factors.indices.clear();
                    factors.quotients.clear();
                    if self.xor_chain {
                        sum = self.mod_poly(sum, true)?;
                    }
                    factors.slice_indices.push(sum.idx());
                }
                sum.set_level(1);
                self.add_and_merge(&mut factors.slices, sum, expanded)?;
            }
        }

        match format {
            Some(ProofFormat::Expanded) => {
                let res = self.add_up(&mut factors.slices, true)?;
                if self.xor_chain {
                    self.correct_pp(&res)?;
                }
            }
            Some(ProofFormat::Condensed) => {
                let mut res = self.add_up(&mut factors.slices, false)?;
                if let Some(log) = self.pac() {
                    log.sum(&factors.slice_indices, &mut res)?;
                }
                if self.xor_chain {
                    res = self.mod_poly(res, true)?;
                    self.correct_pp(&res)?;
                }
            }
            _ => {}
        }
        Ok(rem)
    }
}

trait PopIfLevel {
    fn pop_if_level(&mut self, level: u32) -> Option<Polynomial>;
}

impl PopIfLevel for Vec<Polynomial> {
    #[inline]
    fn pop_if_level(&mut self, level: u32) -> Option<Polynomial> {
        if self.last()?.level() == level {
            self.pop()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use mulcert_test_utils::fixtures::{parse, MULT2_AAG};

    use super::*;

    #[test]
    fn spec_increments() {
        let aig = parse(MULT2_AAG.as_bytes());
        let ctx = Context::new(&aig, false).unwrap();
        assert_eq!(ctx.inc_spec(0).to_string(), "s0-b0*a0");
        assert_eq!(ctx.inc_spec(1).to_string(), "2*s1-2*b1*a0-2*b0*a1");
        assert_eq!(ctx.inc_spec(2).to_string(), "4*s2-4*b1*a1");
        assert_eq!(ctx.inc_spec(3).to_string(), "8*s3");

        // the increments add up to the negated specification
        let sum = (0..4).fold(Polynomial::zero(), |acc, i| acc.add(&ctx.inc_spec(i)));
        assert_eq!(sum, ctx.spec_polynomial().negate());

        let ctx = Context::new(&aig, true).unwrap();
        assert_eq!(ctx.inc_spec(1).to_string(), "2*s1+2*b1*a0+2*b0*a1");
        assert_eq!(ctx.inc_spec(2).to_string(), "4*s2-4*b1*a1");
        assert_eq!(ctx.inc_spec(3).to_string(), "-8*s3");
        let sum = (0..4).fold(Polynomial::zero(), |acc, i| acc.add(&ctx.inc_spec(i)));
        assert_eq!(sum, ctx.spec_polynomial().negate());
    }

    #[test]
    fn modular_reduction() {
        let aig = parse(MULT2_AAG.as_bytes());
        let mut ctx = Context::new(&aig, false).unwrap();
        let x = Polynomial::var(&ctx.table, &ctx[GateId(0)].var);
        let p = x.scale(&BigInt::from(-37)).add(&Polynomial::constant(BigInt::from(16)));
        let r = ctx.mod_poly(p, false).unwrap();
        assert_eq!(r.to_string(), "-5*a0");
        assert!(ctx.mod_factor.is_zero());
    }
}
