//! The verification pipeline

use std::io::Write;
use std::time::{Duration, Instant};

use derive_builder::Builder;
use log::info;

use mulcert_aiger::AigModel;
use mulcert_algebra::Polynomial;

use crate::context::Context;
use crate::proof::{ProofFormat, ProofLog};
use crate::VerifyError;

/// Options for [`verify()`]
#[non_exhaustive]
#[derive(Clone, Builder, Debug)]
pub struct VerifyOptions {
    /// Whether the operands and the product are two's complement numbers
    #[builder(default = "false")]
    pub signed: bool,

    /// Kind of certificate written if a [`Certificate`] is passed to
    /// [`verify()`]
    #[builder(default)]
    pub proof_format: ProofFormat,

    /// Whether to compute counter-examples for incorrect multipliers
    #[builder(default = "true")]
    pub counter_examples: bool,
}

/// Writers receiving the certificate of a run
///
/// The polynomials of the circuit and the specification are written before
/// slicing starts, the proof is streamed during the run.
pub struct Certificate<'a> {
    /// Gate constraints, preceded by the modulus `2^NN`
    pub polys: &'a mut dyn Write,
    /// PAC rules or the Nullstellensatz identity
    pub proof: &'a mut dyn Write,
    /// The word-level specification
    pub spec: &'a mut dyn Write,
}

/// Result of a verification run
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Verdict {
    /// The circuit multiplies its operands
    Correct,
    /// The circuit does not multiply its operands
    Incorrect {
        /// The non-zero remainder of the specification, containing primary
        /// inputs only
        remainder: Polynomial,
        /// Input assignments (in AIG input order) for which the circuit
        /// computes a wrong product. Empty if counter-examples were disabled.
        counter_examples: Vec<Vec<bool>>,
    },
}

/// Figures about a verification run
#[derive(Clone, Debug, Default)]
pub struct Statistics {
    /// Width of the product
    pub output_bits: usize,
    /// Number of AND gates
    pub and_gates: usize,
    /// Time for building the gate graph and writing the circuit polynomials
    pub init: Duration,
    /// Time for slicing and the elimination heuristics
    pub slicing_elimination: Duration,
    /// Time for reducing the specification
    pub reduction: Duration,
    /// Whether the slices were built along XOR chains
    pub xor_slicing: bool,
    /// Whether the reduction was carried out modulo `2^NN`
    pub modular: bool,
    /// Whether Booth-encoded partial products were detected
    pub booth: bool,
    /// Number of gates eliminated before reduction
    pub eliminated: usize,
}

/// [`Verdict`] and [`Statistics`] of a run
#[derive(Clone, Debug)]
pub struct Outcome {
    /// Whether the circuit is correct
    pub verdict: Verdict,
    /// Run statistics
    pub stats: Statistics,
}

impl Outcome {
    /// Shorthand for `self.verdict == Verdict::Correct`
    #[inline]
    pub fn is_correct(&self) -> bool {
        self.verdict == Verdict::Correct
    }
}

/// Check that `aig` implements a multiplier
///
/// The `2n` inputs are the bits of the operands, least significant bit
/// first, either in the order `a_0 … a_{n-1} b_0 … b_{n-1}` or interleaved
/// as `a_0 b_0 a_1 b_1 …`. The latter is detected by output 0 being the AND
/// of the first two inputs. The `2n` outputs are the product bits.
///
/// If `certificate` is given, a certificate in `options.proof_format` is
/// written. It proves the result for correct multipliers. Errors only arise
/// from circuits that are not shaped like a multiplier, slicing failures,
/// and failing writers. An incorrect multiplier is an [`Ok`] result.
pub fn verify<A: AigModel + ?Sized>(
    aig: &A,
    options: &VerifyOptions,
    certificate: Option<Certificate<'_>>,
) -> Result<Outcome, VerifyError> {
    let start = Instant::now();
    let mut ctx = Context::new(aig, options.signed)?;
    let mut stats = Statistics {
        output_bits: ctx.nn,
        and_gates: aig.num_ands(),
        ..Default::default()
    };

    if let Some(Certificate { polys, proof, spec }) = certificate {
        ctx.write_circuit_polys(polys)?;
        ctx.write_spec(spec)?;
        let first_idx = ctx.m + 1;
        ctx.proof = Some(ProofLog::new(options.proof_format, proof, first_idx));
    }

    ctx.init_slices();
    ctx.mark_xor_chain_in_last_slice();
    stats.init = start.elapsed();

    let start = Instant::now();
    ctx.slice_and_eliminate(&mut stats)?;
    stats.slicing_elimination = start.elapsed();

    let start = Instant::now();
    let rem = ctx.reduce()?;
    if ctx.proof_format() == Some(ProofFormat::Nullstellensatz) {
        ctx.write_nss()?;
    }
    if let Some(log) = ctx.proof.as_mut() {
        log.flush()?;
    }
    stats.reduction = start.elapsed();

    let verdict = if rem.is_zero() {
        Verdict::Correct
    } else {
        if !ctx.inputs_only(&rem) {
            return Err(VerifyError::NonInputRemainder(rem.to_string()));
        }
        let counter_examples = if options.counter_examples {
            ctx.witnesses(&rem)
        } else {
            Vec::new()
        };
        Verdict::Incorrect {
            remainder: rem,
            counter_examples,
        }
    };
    Ok(Outcome { verdict, stats })
}

impl Context<'_> {
    /// Slice the gates, falling back to input cones if the circuit has no
    /// usable XOR chains, and eliminate gates before reduction
    fn slice_and_eliminate(&mut self, stats: &mut Statistics) -> Result<(), VerifyError> {
        stats.eliminated += self.remove_internal_xor_gates()?;
        if self.upper_half_xor_output() {
            info!("slicing based on XOR chains");
            stats.eliminated += self.remove_single_occs_gates()?;
            if self.slicing_xor()? {
                self.clean_slices();
            } else {
                stats.eliminated += self.remove_slice_minus_one_gates()?;
                stats.xor_slicing = true;
            }
        }
        if !stats.xor_slicing {
            info!("slicing based on input cones");
            self.xor_chain = true;
            self.slicing_non_xor();
            if self.search_for_booth_pattern() {
                stats.eliminated += self.eliminate_booth_pattern()?;
            }
            stats.eliminated += self.decomposing()?;
        }
        stats.modular = self.xor_chain;
        stats.booth = self.booth;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mulcert_test_utils::fixtures::{parse, MULT2_AAG};
    use mulcert_test_utils::{array_multiplier, InputOrder, XorStyle};

    use super::*;
    use crate::gate::GateId;

    /// Run the pipeline with a Nullstellensatz log and check that
    /// `Σ cofactor_g * p_g + modfactor * 2^NN` is the specification
    fn check_nss_identity<A: AigModel>(aig: &A, signed: bool) -> Statistics {
        let mut buf = Vec::new();
        let mut ctx = Context::new(aig, signed).unwrap();
        let first_idx = ctx.m + 1;
        ctx.proof = Some(ProofLog::new(ProofFormat::Nullstellensatz, &mut buf, first_idx));
        ctx.init_slices();
        ctx.mark_xor_chain_in_last_slice();
        let mut stats = Statistics::default();
        ctx.slice_and_eliminate(&mut stats).unwrap();
        assert_eq!(
            stats.eliminated,
            ctx.gates.iter().filter(|g| g.eliminated).count()
        );
        assert!(ctx.reduce().unwrap().is_zero());

        let spec = ctx.spec_polynomial();
        let mut sum = ctx.mod_factor.scale(&ctx.modulus);
        for i in ctx.nn..ctx.num_gates() {
            if let Some(c) = &ctx.gates[i].cofactor {
                sum = sum.add(&c.multiply(&ctx.gate_constraint(GateId(i)), &ctx.table));
            }
        }
        assert_eq!(sum, spec);

        ctx.write_nss().unwrap();
        drop(ctx);
        let nss = String::from_utf8(buf).unwrap();
        assert!(nss.starts_with(&format!("{first_idx} % ")));
        assert!(nss.ends_with(&format!(" , {spec};\n")));
        stats
    }

    #[test]
    fn nullstellensatz_identity_xor_slicing() {
        let aig = parse(MULT2_AAG.as_bytes());
        let stats = check_nss_identity(&aig, false);
        assert!(stats.xor_slicing);
        assert!(!stats.modular);
    }

    #[test]
    fn nullstellensatz_identity_generated() {
        for n in 2..=3 {
            for signed in [false, true] {
                for style in [XorStyle::Complementary, XorStyle::SharedNand] {
                    let aig = array_multiplier(n, signed, style, InputOrder::Abc);
                    check_nss_identity(&aig, signed);
                }
            }
        }
    }

    #[test]
    fn options_defaults() {
        let options = VerifyOptionsBuilder::default().build().unwrap();
        assert!(!options.signed);
        assert!(options.counter_examples);
        assert_eq!(options.proof_format, ProofFormat::Condensed);
    }
}
