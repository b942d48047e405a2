//! Generators for multiplier circuits

use std::collections::VecDeque;

use mulcert_aiger::{Aig, InputOrder, Literal};

use crate::builder::{AigBuilder, XorStyle};

/// Generate an `n × n → 2n` bit multiplier
///
/// The partial products are summed up column by column with full and half
/// adders (carry-save style, carries move to the next column). Signed
/// multipliers sign-extend both operands to `2n` bits and truncate the
/// product.
pub fn array_multiplier(n: usize, signed: bool, style: XorStyle, order: InputOrder) -> Aig {
    assert!(n > 0);
    let width = 2 * n;
    let mut b = AigBuilder::new(width);
    let (a_idx, b_idx) = order.operand_inputs(n);
    let a: Vec<Literal> = a_idx.iter().map(|&i| b.input(i)).collect();
    let y: Vec<Literal> = b_idx.iter().map(|&i| b.input(i)).collect();

    let bit = |v: &[Literal], i: usize| if i < n { v[i] } else { v[n - 1] };
    let limit = if signed { width } else { n };
    let mut columns: Vec<Vec<Literal>> = vec![Vec::new(); width];
    for j in 0..limit {
        for i in 0..limit {
            if i + j < width {
                let pp = b.and(bit(&a, i), bit(&y, j));
                columns[i + j].push(pp);
            }
        }
    }

    sum_columns(&mut b, columns, style)
}

/// Generate an `n × n → 2n` bit multiplier with radix-4 Booth recoding of
/// the second operand
///
/// Digit `j` of `b` is `-2 b_{2j+1} + b_{2j} + b_{2j-1}` and selects `0`,
/// `a`, or `2a`. Negative digits add the ones' complement of the selected
/// row plus a correction bit in the lowest column of the row. The recoding
/// XORs always use [`XorStyle::Complementary`], `style` applies to the
/// adders only. Inputs are in [`InputOrder::Abc`].
pub fn booth_multiplier(n: usize, signed: bool, style: XorStyle) -> Aig {
    assert!(n > 0);
    let width = 2 * n;
    let mut b = AigBuilder::new(width);
    let (a_idx, b_idx) = InputOrder::Abc.operand_inputs(n);
    let a: Vec<Literal> = a_idx.iter().map(|&i| b.input(i)).collect();
    let y: Vec<Literal> = b_idx.iter().map(|&i| b.input(i)).collect();

    // operand bits extended to the product width, zero below bit 0
    let bit = |v: &[Literal], i: isize| match usize::try_from(i) {
        Ok(i) if i < n => v[i],
        Ok(_) if signed => v[n - 1],
        _ => Literal::FALSE,
    };

    let mut columns: Vec<Vec<Literal>> = vec![Vec::new(); width];
    for j in 0..=n / 2 {
        let k = 2 * j as isize;
        let (hi, mid, lo) = (bit(&y, k + 1), bit(&y, k), bit(&y, k - 1));
        let one = b.xor(mid, lo, XorStyle::Complementary);
        let hi_mid = b.xor(hi, mid, XorStyle::Complementary);
        let two = b.and(hi_mid, !one);
        let neg = hi;
        if one == Literal::FALSE && two == Literal::FALSE && neg == Literal::FALSE {
            continue;
        }

        for i in 0..width - 2 * j {
            let sel_one = b.and(one, bit(&a, i as isize));
            let sel_two = b.and(two, bit(&a, i as isize - 1));
            let sel = b.or(sel_one, sel_two);
            let pp = b.xor(sel, neg, XorStyle::Complementary);
            columns[2 * j + i].push(pp);
        }
        columns[2 * j].push(neg);
    }
    for col in &mut columns {
        col.retain(|&l| l != Literal::FALSE);
    }

    sum_columns(&mut b, columns, style)
}

/// Add up the bits of each column with full and half adders, carries move
/// to the next column
fn sum_columns(b: &mut AigBuilder, mut columns: Vec<Vec<Literal>>, style: XorStyle) -> Aig {
    let width = columns.len();
    let mut outputs = Vec::with_capacity(width);
    for k in 0..width {
        let mut col: VecDeque<Literal> = std::mem::take(&mut columns[k]).into();
        while col.len() > 1 {
            let (sum, carry) = match (col.pop_front(), col.pop_front()) {
                (Some(x), Some(y)) => match col.pop_front() {
                    Some(z) => b.full_adder(x, y, z, style),
                    None => b.half_adder(x, y, style),
                },
                _ => break,
            };
            col.push_back(sum);
            if k + 1 < width {
                columns[k + 1].push(carry);
            }
        }
        outputs.push(col.pop_front().unwrap_or(Literal::FALSE));
    }

    b.build(&outputs)
}

#[cfg(test)]
mod tests {
    use mulcert_aiger::AigModel;

    use super::*;
    use crate::sim::find_counterexample;

    #[test]
    fn unsigned_multipliers() {
        for n in 1..=4 {
            for order in [InputOrder::Abc, InputOrder::Btor] {
                for style in [XorStyle::Complementary, XorStyle::SharedNand] {
                    let aig = array_multiplier(n, false, style, order);
                    assert_eq!(aig.num_inputs(), 2 * n);
                    assert_eq!(aig.num_outputs(), 2 * n);
                    assert_eq!(find_counterexample(&aig, false, order), None);
                }
            }
        }
    }

    #[test]
    fn signed_multipliers() {
        for n in 1..=4 {
            for order in [InputOrder::Abc, InputOrder::Btor] {
                let aig = array_multiplier(n, true, XorStyle::SharedNand, order);
                assert_eq!(find_counterexample(&aig, true, order), None);
            }
        }
        // unsigned and signed products differ for negative operands
        let aig = array_multiplier(2, false, XorStyle::SharedNand, InputOrder::Abc);
        assert!(find_counterexample(&aig, true, InputOrder::Abc).is_some());
    }

    #[test]
    fn booth_multipliers() {
        for n in 1..=5 {
            for signed in [false, true] {
                for style in [XorStyle::Complementary, XorStyle::SharedNand] {
                    let aig = booth_multiplier(n, signed, style);
                    assert_eq!(aig.num_outputs(), 2 * n);
                    assert_eq!(find_counterexample(&aig, signed, InputOrder::Abc), None);
                }
            }
        }
    }

    #[test]
    fn output_zero_is_first_partial_product() {
        let aig = array_multiplier(3, false, XorStyle::Complementary, InputOrder::Btor);
        let g = aig.and_gate(aig.output(0)).unwrap();
        let mut fan_ins = [g.rhs0, g.rhs1];
        fan_ins.sort();
        assert_eq!(fan_ins, [aig.input(0), aig.input(1)]);
    }
}
