//! Algebraic verification of integer multiplier circuits
//!
//! Every gate of the circuit is modelled as a polynomial equation over the
//! integers. The word-level specification of the multiplier is reduced by
//! these equations one output bit after the other, starting at the most
//! significant one. The circuit is a correct multiplier if and only if the
//! remainder is zero. A non-zero remainder yields counter-examples.
//!
//! Optionally, a certificate is produced: either a proof in the Practical
//! Algebraic Calculus (PAC) or a Nullstellensatz identity, which can be
//! checked independently.
//!
//! ## Example
//!
//! ```no_run
//! # use mulcert::*;
//! # use mulcert_aiger::load_file::load_file;
//! # use mulcert_aiger::ParseOptionsBuilder;
//! let parse_options = ParseOptionsBuilder::default().build().unwrap();
//! let Some(aig) = load_file("mult.aig", &parse_options) else {
//!     return;
//! };
//! let options = VerifyOptionsBuilder::default().build().unwrap();
//! match verify(&aig, &options, None) {
//!     Ok(outcome) if outcome.is_correct() => println!("correct"),
//!     Ok(_) => println!("incorrect"),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod context;
mod elimination;
mod error;
mod gate;
mod proof;
mod reduce;
mod slicing;
mod verify;
mod witness;

pub use error::VerifyError;
pub use proof::ProofFormat;
pub use verify::{
    verify, Certificate, Outcome, Statistics, Verdict, VerifyOptions, VerifyOptionsBuilder,
};
pub use witness::write_counter_examples;
