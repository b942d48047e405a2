//! Error types

use std::fmt;
use std::io;

use mulcert_aiger::ShapeError;
use mulcert_algebra::AlgebraError;

/// Errors that abort a verification run
#[derive(Debug)]
pub enum VerifyError {
    /// The circuit does not have the shape of a multiplier
    Shape(ShapeError),
    /// The variables of the circuit are not numbered inputs first, then AND
    /// gates in topological order
    Unnormalized {
        /// The first variable violating the numbering
        var: u32,
    },
    /// After reduction, the remainder still contains a variable that is not a
    /// primary input. The field holds the printed remainder.
    NonInputRemainder(String),
    /// The children of a gate that should be moved to another slice are in
    /// different slices
    InconsistentChildSlices {
        /// Name of the gate
        gate: String,
        /// Name of the first child whose slice differs
        child: String,
    },
    /// A polynomial operation was called with invalid arguments
    Algebra(AlgebraError),
    /// Writing a certificate failed
    Io(io::Error),
}

impl VerifyError {
    /// Process exit code associated with the error
    pub fn exit_code(&self) -> i32 {
        match self {
            VerifyError::Shape(e) => e.exit_code(),
            _ => 1,
        }
    }
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyError::Shape(e) => write!(f, "not a multiplier: {e}"),
            VerifyError::Unnormalized { var } => {
                write!(f, "variable {var} violates the inputs-first topological numbering")
            }
            VerifyError::NonInputRemainder(rem) => {
                write!(f, "remainder contains non-input variables: {rem}")
            }
            VerifyError::InconsistentChildSlices { gate, child } => {
                write!(f, "children of {gate} are in different slices (first mismatch: {child})")
            }
            VerifyError::Algebra(e) => e.fmt(f),
            VerifyError::Io(e) => write!(f, "could not write certificate: {e}"),
        }
    }
}

impl std::error::Error for VerifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VerifyError::Shape(e) => Some(e),
            VerifyError::Algebra(e) => Some(e),
            VerifyError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ShapeError> for VerifyError {
    fn from(e: ShapeError) -> Self {
        VerifyError::Shape(e)
    }
}

impl From<AlgebraError> for VerifyError {
    fn from(e: AlgebraError) -> Self {
        VerifyError::Algebra(e)
    }
}

impl From<io::Error> for VerifyError {
    fn from(e: io::Error) -> Self {
        VerifyError::Io(e)
    }
}
