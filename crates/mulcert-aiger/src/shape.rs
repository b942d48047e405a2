//! Structural requirements on multiplier circuits

use std::fmt;

use crate::AigModel;

/// Reasons why an AIG cannot be an `n × n → 2n` bit multiplier
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ShapeError {
    /// The AIG has latches
    Latches,
    /// The AIG has no inputs
    NoInputs,
    /// The number of inputs is odd
    OddInputs,
    /// The AIG has no outputs
    NoOutputs,
    /// The number of outputs differs from the number of inputs
    WrongOutputs {
        /// Number of inputs
        expected: usize,
        /// Number of outputs
        actual: usize,
    },
}

impl ShapeError {
    /// Process exit code associated with the error
    pub fn exit_code(self) -> i32 {
        match self {
            ShapeError::Latches => 21,
            ShapeError::NoInputs => 22,
            ShapeError::OddInputs => 23,
            ShapeError::NoOutputs => 24,
            ShapeError::WrongOutputs { .. } => 25,
        }
    }
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeError::Latches => f.write_str("can not handle latches"),
            ShapeError::NoInputs => f.write_str("no inputs"),
            ShapeError::OddInputs => f.write_str("odd number of inputs"),
            ShapeError::NoOutputs => f.write_str("no outputs"),
            ShapeError::WrongOutputs { expected, actual } => {
                write!(f, "expected {expected} but got {actual} outputs")
            }
        }
    }
}
impl std::error::Error for ShapeError {}

/// Check that `aig` is combinational and has `2n` inputs and `2n` outputs for
/// some `n > 0`
///
/// On success, returns the number of outputs.
pub fn check_multiplier_shape<A: AigModel + ?Sized>(aig: &A) -> Result<usize, ShapeError> {
    if aig.num_latches() != 0 {
        return Err(ShapeError::Latches);
    }
    let inputs = aig.num_inputs();
    if inputs == 0 {
        return Err(ShapeError::NoInputs);
    }
    if inputs % 2 != 0 {
        return Err(ShapeError::OddInputs);
    }
    let outputs = aig.num_outputs();
    if outputs == 0 {
        return Err(ShapeError::NoOutputs);
    }
    if outputs != inputs {
        return Err(ShapeError::WrongOutputs {
            expected: inputs,
            actual: outputs,
        });
    }
    Ok(outputs)
}

/// Assignment of operand bits to the inputs of a multiplier
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum InputOrder {
    /// `a_0, …, a_{n-1}, b_0, …, b_{n-1}` (as produced by ABC)
    Abc,
    /// `a_0, b_0, a_1, b_1, …` (as produced by Boolector)
    Btor,
}

impl InputOrder {
    /// Guess the input order of a multiplier
    ///
    /// The least significant output of a multiplier is `a_0 ∧ b_0`. If it is
    /// the conjunction of the first two inputs, the operands are interleaved.
    pub fn detect<A: AigModel + ?Sized>(aig: &A) -> Self {
        if aig.num_inputs() < 2 || aig.num_outputs() == 0 {
            return InputOrder::Abc;
        }
        let out = aig.output(0);
        if out.is_negated() {
            return InputOrder::Abc;
        }
        let (i0, i1) = (aig.input(0), aig.input(1));
        match aig.and_gate(out) {
            Some(g) if (g.rhs0, g.rhs1) == (i0, i1) || (g.rhs0, g.rhs1) == (i1, i0) => {
                InputOrder::Btor
            }
            _ => InputOrder::Abc,
        }
    }

    /// Input indices of the operand bits `(a, b)` of an `n`-bit multiplier
    pub fn operand_inputs(self, n: usize) -> (Vec<usize>, Vec<usize>) {
        match self {
            InputOrder::Abc => ((0..n).collect(), (n..2 * n).collect()),
            InputOrder::Btor => ((0..n).map(|i| 2 * i).collect(), (0..n).map(|i| 2 * i + 1).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Aig, AndGate, Latch, Literal};

    fn aig(inputs: usize, outputs: usize) -> Aig {
        Aig::new(inputs, Vec::new(), vec![Literal::FALSE; outputs], Vec::new()).unwrap()
    }

    #[test]
    fn shapes() {
        assert_eq!(check_multiplier_shape(&aig(4, 4)), Ok(4));
        assert_eq!(check_multiplier_shape(&aig(0, 1)), Err(ShapeError::NoInputs));
        assert_eq!(check_multiplier_shape(&aig(3, 3)), Err(ShapeError::OddInputs));
        assert_eq!(check_multiplier_shape(&aig(2, 0)), Err(ShapeError::NoOutputs));
        let err = check_multiplier_shape(&aig(4, 3)).unwrap_err();
        assert_eq!(err.to_string(), "expected 4 but got 3 outputs");
        assert_eq!(err.exit_code(), 25);
    }

    #[test]
    fn latches_are_rejected() {
        let latch = Latch {
            lit: Literal::new(3, false),
            next: Literal::new(1, false),
            init: Some(false),
        };
        let seq = Aig::new(2, vec![latch], vec![Literal::FALSE; 2], Vec::new()).unwrap();
        let err = check_multiplier_shape(&seq).unwrap_err();
        assert_eq!(err, ShapeError::Latches);
        assert_eq!(err.exit_code(), 21);
    }

    #[test]
    fn input_orders() {
        let (a0, b0) = (Literal::new(1, false), Literal::new(2, false));
        let g = AndGate {
            lhs: Literal::new(5, false),
            rhs0: b0,
            rhs1: a0,
        };
        let outputs = vec![g.lhs, Literal::FALSE, Literal::FALSE, Literal::FALSE];
        let btor = Aig::new(4, Vec::new(), outputs.clone(), vec![g]).unwrap();
        assert_eq!(InputOrder::detect(&btor), InputOrder::Btor);

        let negated = Aig::new(4, Vec::new(), vec![!g.lhs; 4], vec![g]).unwrap();
        assert_eq!(InputOrder::detect(&negated), InputOrder::Abc);

        let h = AndGate {
            rhs0: Literal::new(3, false),
            ..g
        };
        let abc = Aig::new(4, Vec::new(), outputs, vec![h]).unwrap();
        assert_eq!(InputOrder::detect(&abc), InputOrder::Abc);

        assert_eq!(InputOrder::Btor.operand_inputs(2), (vec![0, 2], vec![1, 3]));
        assert_eq!(InputOrder::Abc.operand_inputs(2), (vec![0, 1], vec![2, 3]));
    }
}
