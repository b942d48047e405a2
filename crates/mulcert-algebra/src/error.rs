use std::fmt;

/// Errors of polynomial operations with preconditions
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum AlgebraError {
    /// The divisor passed to
    /// [`Polynomial::divide_by_var_term()`][crate::Polynomial::divide_by_var_term]
    /// is not a single variable. The field holds the printed divisor.
    NotAVariable(String),
}

impl fmt::Display for AlgebraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlgebraError::NotAVariable(t) => {
                write!(f, "can only divide by a single variable, got '{t}'")
            }
        }
    }
}

impl std::error::Error for AlgebraError {}
