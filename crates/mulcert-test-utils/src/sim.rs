//! Simulation of combinational AIGs

use mulcert_aiger::{Aig, AigModel, InputOrder, Literal};

/// Evaluate `aig` under the given input values, returns the output values
pub fn simulate(aig: &Aig, inputs: &[bool]) -> Vec<bool> {
    assert_eq!(inputs.len(), aig.num_inputs());
    let mut values = vec![false; aig.max_var() as usize + 1];
    values[1..=inputs.len()].copy_from_slice(inputs);
    let value = |values: &[bool], l: Literal| values[l.var() as usize] ^ l.is_negated();
    for g in aig.ands() {
        values[g.lhs.var() as usize] = value(&values, g.rhs0) && value(&values, g.rhs1);
    }
    aig.outputs().iter().map(|&o| value(&values, o)).collect()
}

/// Check exhaustively whether `aig` multiplies its operands
///
/// The operands are `n = aig.num_inputs() / 2` bits wide and read according
/// to `order`, the product is truncated to `2n` bits. Returns the first pair
/// of operands (as unsigned bit patterns) for which the circuit is wrong.
pub fn find_counterexample(aig: &Aig, signed: bool, order: InputOrder) -> Option<(u64, u64)> {
    let n = aig.num_inputs() / 2;
    assert!(n <= 10, "exhaustive simulation of {n} bit operands is too slow");
    let (a_idx, b_idx) = order.operand_inputs(n);
    let mask = (1u128 << (2 * n)) - 1;
    let extend = |x: u64| -> i128 {
        if signed && x >> (n - 1) & 1 != 0 {
            x as i128 - (1i128 << n)
        } else {
            x as i128
        }
    };

    let mut inputs = vec![false; 2 * n];
    for a in 0..1u64 << n {
        for b in 0..1u64 << n {
            for i in 0..n {
                inputs[a_idx[i]] = a >> i & 1 != 0;
                inputs[b_idx[i]] = b >> i & 1 != 0;
            }
            let expected = (extend(a) * extend(b)) as u128 & mask;
            let actual = simulate(aig, &inputs)
                .iter()
                .enumerate()
                .fold(0u128, |acc, (k, &v)| acc | (v as u128) << k);
            if actual != expected {
                return Some((a, b));
            }
        }
    }
    None
}
