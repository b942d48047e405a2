//! Circuits and other testing utilities for mulcert
//!
//! [`builder::AigBuilder`] constructs normalized AIGs with structural
//! hashing, [`multiplier`] generates array multipliers from it, and [`sim`]
//! checks the functional behavior of a circuit by exhaustive simulation.

#![warn(missing_docs)]

pub mod builder;
pub mod fixtures;
pub mod multiplier;
pub mod sim;

pub use builder::{to_aag, AigBuilder, XorStyle};
pub use multiplier::{array_multiplier, booth_multiplier};

pub use mulcert_aiger::InputOrder;
