//! Elimination of gate constraints
//!
//! Before reduction, the engine rewrites the gate graph by substituting
//! gates into their parents. The affected constraints are combined with the
//! rules logged in the proof, so the reduction later only sees the
//! simplified constraints.

use log::{debug, info, trace};

use crate::context::Context;
use crate::gate::{GateId, XorRole};
use crate::proof::ProofFormat;
use crate::VerifyError;

impl<'a> Context<'a> {
    /// Eliminate the variable of `n2` from the constraint of `n1`
    ///
    /// With `q` the quotient of the constraint `p1` of `n1` by the leading
    /// term of the constraint `p2` of `n2`, the new constraint of `n1` is
    /// `p1 + q * p2`.
    pub(crate) fn eliminate_by_one_gate(
        &mut self,
        n1: GateId,
        n2: GateId,
    ) -> Result<(), VerifyError> {
        let p2 = self.constraint(n2).clone();
        let p1 = self.constraint(n1).clone();
        let Some(lt) = p2.leading_term() else {
            return Ok(());
        };
        let q = p1.divide_by_var_term(lt, &self.table)?;
        if q.is_zero() {
            return Ok(());
        }
        let mut mult = q.multiply(&p2, &self.table);
        let mut rem = p1.add(&mult);

        if let Some(log) = self.proof.as_mut() {
            match log.format {
                ProofFormat::Expanded => {
                    if q.is_one() {
                        mult.set_idx(p2.idx());
                    } else {
                        log.mul(&p2, &q, &mut mult)?;
                    }
                    log.add(&p1, &mult, &mut rem)?;
                    log.del(p1.idx())?;
                    if !q.is_one() {
                        log.del(mult.idx())?;
                    }
                }
                ProofFormat::Condensed => {
                    if q.is_one() {
                        log.add(&p1, &p2, &mut rem)?;
                    } else {
                        log.combi(&p2, &q, &p1, &mut rem)?;
                    }
                    log.del(p1.idx())?;
                }
                ProofFormat::Nullstellensatz => self.add_ancestors(n1, n2, &q),
            }
        }

        trace!("eliminated {} from {}: {rem}", self[n2].name(), self[n1].name());
        self[n1].constraint = Some(rem);
        Ok(())
    }

    /// Mark `n` as eliminated and delete its constraint
    fn retire(&mut self, n: GateId) -> Result<(), VerifyError> {
        self.log_del(n)?;
        let gate = &mut self[n];
        gate.eliminated = true;
        gate.constraint = None;
        Ok(())
    }

    /// Replace `n` by its children in the fan-in of `parent`
    fn bypass(&mut self, n: GateId, parent: GateId) {
        self[parent].children.retain(|&c| c != n);
        let children = self[n].children.clone();
        for c in children {
            if !self.is_child(parent, c) {
                self[parent].children.push(c);
            }
            self[c].parents.retain(|&p| p != n);
            if !self.is_parent(c, parent) {
                self[c].parents.push(parent);
            }
        }
    }

    /// Substitute the inner gates of XORs into their roots
    ///
    /// Afterwards, the root constraint is `-v + ll + lr - 2 ll lr`. Inner
    /// gates without further parents are eliminated.
    pub(crate) fn remove_internal_xor_gates(&mut self) -> Result<usize, VerifyError> {
        let mut count = 0;
        for n in self.internal_gates() {
            if self[n].xor != XorRole::Root || self[n].eliminated {
                continue;
            }
            let [l, r] = self[n].children[..] else {
                continue;
            };
            if self[l].xor != XorRole::Inner || self[r].xor != XorRole::Inner {
                continue;
            }
            if self[l].parents.len() != 1 && self[r].parents.len() != 1 {
                continue;
            }
            let [ll, lr] = self[l].children[..] else {
                continue;
            };

            self[n].children = vec![ll, lr];
            self[lr].parents.push(n);
            self[ll].parents.push(n);

            for inner in [l, r] {
                self.eliminate_by_one_gate(n, inner)?;
                if self[inner].parents.len() == 1 {
                    self.retire(inner)?;
                    count += 1;
                    for c in [ll, lr] {
                        self[c].parents.retain(|&p| p != inner);
                    }
                } else {
                    self[inner].parents.retain(|&p| p != n);
                }
            }
        }
        info!("removed {count} internal XOR gates");
        Ok(count)
    }

    /// Eliminate gates with a single parent into the parent
    ///
    /// Gates without parents are dropped. Outputs, XOR chain gates, and
    /// plain gates below an XOR root are kept.
    pub(crate) fn remove_single_occs_gates(&mut self) -> Result<usize, VerifyError> {
        let mut count = 0;
        for n in self.internal_gates() {
            if self[n].eliminated || self[n].parents.len() > 1 {
                continue;
            }
            let Some(&p) = self[n].parents.first() else {
                self[n].eliminated = true;
                let children = self[n].children.clone();
                for c in children {
                    self[c].parents.retain(|&g| g != n);
                }
                count += 1;
                continue;
            };
            if self[p].is_output()
                || (self[n].xor == XorRole::Plain && self[p].xor == XorRole::Root)
                || self[n].xor_chain
            {
                continue;
            }

            self.eliminate_by_one_gate(p, n)?;
            self.bypass(n, p);
            self.retire(n)?;
            count += 1;
        }
        info!("removed {count} gates with a single parent");
        Ok(count)
    }

    /// Eliminate `n` into all its parents, then continue with its children
    fn remove_not_assigned_gate(&mut self, n: GateId) -> Result<usize, VerifyError> {
        let mut count = 0;
        let mut stack = vec![n];
        while let Some(n) = stack.pop() {
            if self[n].is_input() || self[n].eliminated {
                continue;
            }
            let children = self[n].children.clone();
            for &c in &children {
                self[c].parents.retain(|&p| p != n);
            }
            let parents = self[n].parents.clone();
            for p in parents {
                if self[p].eliminated {
                    continue;
                }
                self.eliminate_by_one_gate(p, n)?;
                self.bypass(n, p);
            }
            self.retire(n)?;
            count += 1;
            stack.extend(children.into_iter().rev());
        }
        Ok(count)
    }

    /// Eliminate all AND gates that did not get a slice
    pub(crate) fn remove_slice_minus_one_gates(&mut self) -> Result<usize, VerifyError> {
        let mut count = 0;
        for n in self.internal_gates() {
            if self[n].eliminated || self[n].is_sliced() {
                continue;
            }
            count += self.remove_not_assigned_gate(n)?;
        }
        info!("removed {count} gates without slice");
        Ok(count)
    }

    /// Eliminate gates of a slice that are only used within the slice
    ///
    /// Repeated per slice until nothing changes. The most significant slice
    /// is skipped when reducing modulo `2^NN`.
    pub(crate) fn decomposing(&mut self) -> Result<usize, VerifyError> {
        let top = if self.xor_chain { self.nn - 2 } else { self.nn - 1 };
        let mut count = 0;
        for i in (0..=top).rev() {
            loop {
                let mut changed = false;
                let mut k = 0;
                while k < self.slices[i].len() {
                    let n = self.slices[i][k];
                    let gate = &self[n];
                    if gate.eliminated || gate.parents.len() != 1 || gate.carry != 0 {
                        k += 1;
                        continue;
                    }
                    let p = gate.parents[0];
                    self.eliminate_by_one_gate(p, n)?;
                    self.bypass(n, p);
                    self.retire(n)?;
                    self.slices[i].remove(k);
                    count += 1;
                    changed = true;
                }
                if !changed {
                    break;
                }
            }
        }
        info!("decomposed {count} gates");
        Ok(count)
    }

    /// Eliminate the gates marked as part of a Booth pattern
    pub(crate) fn eliminate_booth_pattern(&mut self) -> Result<usize, VerifyError> {
        let mut count = 0;
        for n in self.internal_gates() {
            if !self[n].booth || self[n].eliminated {
                continue;
            }
            let children = self[n].children.clone();
            for c in children {
                self[c].parents.retain(|&p| p != n);
            }
            let parents = self[n].parents.clone();
            for p in parents {
                if self[p].eliminated {
                    continue;
                }
                self.eliminate_by_one_gate(p, n)?;
                self.bypass(n, p);
            }
            self.retire(n)?;
            count += 1;
        }
        debug!("eliminated {count} Booth gates");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use mulcert_test_utils::fixtures::{parse, MULT2_AAG};

    use super::*;
    use crate::proof::ProofLog;

    #[test]
    fn internal_xor_gates() {
        let aig = parse(MULT2_AAG.as_bytes());
        let mut buf = Vec::new();
        let mut ctx = Context::new(&aig, false).unwrap();
        ctx.proof = Some(ProofLog::new(ProofFormat::Condensed, &mut buf, ctx.m + 1));

        assert_eq!(ctx.remove_internal_xor_gates().unwrap(), 2);
        let (s1, s2) = (GateId(9), GateId(13));
        assert_eq!(
            ctx[s1].constraint.as_ref().unwrap().to_string(),
            "-l20-2*l14*l12+l14+l12"
        );
        assert_eq!(
            ctx[s2].constraint.as_ref().unwrap().to_string(),
            "-l28-2*l22*l16+l22+l16"
        );
        assert_eq!(ctx[s1].children, [GateId(5), GateId(6)]);
        assert!(ctx[GateId(8)].eliminated && ctx[GateId(12)].eliminated);
        // l16 is still used by l24, which drives s3
        assert!(!ctx[GateId(7)].eliminated);
        assert_eq!(ctx[GateId(7)].parents, [GateId(11), s2]);
        drop(ctx);

        let proof = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = proof.lines().take(5).collect();
        assert_eq!(
            lines,
            [
                "16 % 5 *(l18-1) + 7, -l20+l18*l14*l12-l18-l14*l12+1;",
                "7 d;",
                "17 % 6 *(l14*l12-1) + 16, -l20-2*l14*l12+l14+l12;",
                "16 d;",
                "6 d;",
            ]
        );
    }

    #[test]
    fn single_parent_gates() {
        let aig = parse(MULT2_AAG.as_bytes());
        let mut ctx = Context::new(&aig, false).unwrap();
        ctx.remove_internal_xor_gates().unwrap();
        ctx.remove_single_occs_gates().unwrap();
        // every remaining AND gate has two parents or drives an output
        for n in ctx.internal_gates() {
            assert_eq!(ctx[n].eliminated, [8, 12].contains(&n.0));
        }
        for n in ctx.internal_gates() {
            if ctx[n].eliminated {
                assert!(ctx.gates.iter().all(|g| !g.parents.contains(&n)));
            }
        }
    }
}
