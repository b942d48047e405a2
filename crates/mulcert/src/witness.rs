//! Counter-examples from a non-zero remainder
//!
//! After reduction, the remainder of an incorrect multiplier only contains
//! primary inputs. Setting exactly the inputs of a monomial with the fewest
//! variables to one makes the remainder non-zero: every other monomial
//! either contains an input that is zero or has the same size but a
//! different term.

use std::io::{self, Write};

use mulcert_algebra::Polynomial;

use crate::context::Context;

impl Context<'_> {
    /// Whether every variable of `rem` belongs to a primary input
    pub(crate) fn inputs_only(&self, rem: &Polynomial) -> bool {
        rem.iter().all(|m| match m.term() {
            Some(t) => self.gates[t.var().id()].is_input(),
            None => true,
        })
    }

    /// Input assignments for which the circuit computes a wrong product
    ///
    /// The assignments are given in AIG input order.
    pub(crate) fn witnesses(&self, rem: &Polynomial) -> Vec<Vec<bool>> {
        debug_assert!(self.inputs_only(rem));
        if rem.min_term_size() == Some(0) {
            return vec![vec![false; self.nn]];
        }
        rem.min_size_monomials()
            .filter_map(|m| m.term())
            .map(|t| {
                let mut bits = vec![false; self.nn];
                for v in t.vars() {
                    bits[v.id()] = true;
                }
                bits
            })
            .collect()
    }
}

/// Write `witnesses` in the format expected by `aigsim`
///
/// One line of `0`/`1` per witness, terminated by a line `.`.
pub fn write_counter_examples(out: &mut dyn Write, witnesses: &[Vec<bool>]) -> io::Result<()> {
    for w in witnesses {
        let line: String = w.iter().map(|&b| if b { '1' } else { '0' }).collect();
        writeln!(out, "{line}")?;
    }
    writeln!(out, ".")?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use mulcert_algebra::PolyBuilder;
    use mulcert_test_utils::array_multiplier;
    use mulcert_test_utils::{InputOrder, XorStyle};
    use num_bigint::BigInt;

    use super::*;
    use crate::gate::GateId;

    #[test]
    fn witnesses_from_remainder() {
        let aig = array_multiplier(2, false, XorStyle::SharedNand, InputOrder::Btor);
        let ctx = Context::new(&aig, false).unwrap();
        assert_eq!(ctx.input_order, InputOrder::Btor);

        // a1 is input 2, b0 is input 1
        let t = ctx
            .table
            .from_vars([&ctx[ctx.b[0]].var, &ctx[ctx.a[1]].var].into_iter());
        let mut builder = PolyBuilder::new();
        builder.push_term(BigInt::from(4), t);
        builder.push_term(BigInt::from(-8), Some(ctx.var_term(ctx.a[0])));
        let rem = builder.build();
        assert!(ctx.inputs_only(&rem));
        assert_eq!(ctx.witnesses(&rem), [[true, false, false, false]]);

        builder.push_term(BigInt::from(3), None);
        builder.push_term(BigInt::from(1), Some(ctx.var_term(ctx.b[1])));
        let rem = builder.build();
        assert_eq!(ctx.witnesses(&rem), [[false; 4]]);

        let s0 = Polynomial::var(&ctx.table, &ctx[ctx.output_gate(0)].var);
        assert!(!ctx.inputs_only(&s0));
        assert!(ctx[GateId(0)].is_input());
    }

    #[test]
    fn counter_example_file() {
        let mut buf = Vec::new();
        let w = [vec![true, false, false, true], vec![false; 4]];
        write_counter_examples(&mut buf, &w).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "1001\n0000\n.\n");
    }
}
