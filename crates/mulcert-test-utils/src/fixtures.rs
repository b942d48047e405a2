//! Hand-written circuits

use mulcert_aiger::aiger;
use mulcert_aiger::{Aig, ParseOptionsBuilder};

/// 2 × 2 bit unsigned multiplier in the shape ABC produces
///
/// Inputs are `a0 a1 b0 b1`, outputs `s0 … s3`. Both sums are built from the
/// three-gate XOR pattern.
pub const MULT2_AAG: &str = "\
aag 14 4 0 4 10
2
4
6
8
10
20
28
24
10 2 6
12 4 6
14 2 8
16 12 14
18 13 15
20 17 19
22 4 8
24 22 16
26 23 17
28 25 27
";

/// [`MULT2_AAG`] with the partial product `a0 b0` replaced by `a0 ¬b0`
pub const MULT2_BROKEN_AAG: &str = "\
aag 14 4 0 4 10
2
4
6
8
10
20
28
24
10 2 7
12 4 6
14 2 8
16 12 14
18 13 15
20 17 19
22 4 8
24 22 16
26 23 17
28 25 27
";

/// Parse an ASCII or binary AIGER string, panicking on errors
pub fn parse(src: &[u8]) -> Aig {
    let options = ParseOptionsBuilder::default()
        .build()
        .expect("all options have defaults");
    match aiger::parse::<nom::error::Error<&[u8]>>(&options)(src) {
        Ok((_, aig)) => aig,
        Err(e) => panic!("invalid AIGER input: {e:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mulcert_aiger::InputOrder;
    use crate::sim::find_counterexample;

    #[test]
    fn two_bit_multipliers() {
        let good = parse(MULT2_AAG.as_bytes());
        assert_eq!(find_counterexample(&good, false, InputOrder::Abc), None);
        let bad = parse(MULT2_BROKEN_AAG.as_bytes());
        assert_eq!(find_counterexample(&bad, false, InputOrder::Abc), Some((1, 0)));
    }
}
