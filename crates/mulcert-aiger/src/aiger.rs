//! AIGER parser based on
//! "[The AIGER And-Inverter Graph (AIG) Format Version 20071012][spec1]"
//!
//! Only the header fields `M I L O A` are supported. Bad state properties,
//! invariant constraints, justice properties, and fairness constraints are
//! rejected.
//!
//! [spec1]: https://github.com/arminbiere/aiger/blob/master/FORMAT

use bitvec::vec::BitVec;
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::space1;
use nom::combinator::{consumed, eof, rest, value};
use nom::error::{ContextError, FromExternalError, ParseError};
use nom::sequence::preceded;
use nom::IResult;

use crate::util::{
    context_loc, eol_or_eof, fail, fail_with_contexts, line_span, usize, word, word_span, MAX_VAR,
};
use crate::{Aig, AndGate, Latch, Literal, ParseOptions};

// spell-checker:ignore toposort

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
struct AIGLiteral(usize);

impl AIGLiteral {
    #[inline(always)]
    fn negative(self) -> bool {
        self.0 & 1 != 0
    }

    #[inline(always)]
    fn variable(self) -> usize {
        self.0 >> 1
    }
}

#[derive(Clone, Copy)]
struct Header<'a> {
    binary: (&'a [u8], bool),
    vars: (&'a [u8], usize),
    inputs: (&'a [u8], usize),
    latches: (&'a [u8], usize),
    out: (&'a [u8], usize),
    and: (&'a [u8], usize),
}

/// Returns `Ok(.., false)` if `aag` (ASCII), `Ok(.., true)` if `aig` (binary)
fn format<'a, E>(input: &'a [u8]) -> IResult<&'a [u8], bool, E>
where
    E: ParseError<&'a [u8]> + ContextError<&'a [u8]> + FromExternalError<&'a [u8], String>,
{
    context_loc(
        || word_span(input),
        "expected 'aag' (ASCII) or 'aig' (binary)",
        word(alt((value(false, tag("aag")), value(true, tag("aig"))))),
    )(input)
}

fn header<'a, E>(input: &'a [u8]) -> IResult<&'a [u8], Header<'a>, E>
where
    E: ParseError<&'a [u8]> + ContextError<&'a [u8]> + FromExternalError<&'a [u8], String>,
{
    let inner = |input| {
        let (mut input, binary) = consumed(format)(input)?;
        let mandatory = 5; // M I L O A
        let mut numbers: [(&[u8], usize); 9] = [(&[], 0); 9]; // M I L O A B C J F
        for (parsed, num) in numbers.iter_mut().enumerate() {
            (input, *num) = match preceded(space1, consumed(usize))(input) {
                Ok(p) => p,
                Err(e) if parsed < mandatory => return Err(e),
                Err(_) => break,
            };
        }
        let (input, _) = eol_or_eof(input)?;
        for &(span, n) in &numbers[mandatory..] {
            if n != 0 {
                return fail(
                    span,
                    "bad states, invariant constraints, justice and fairness properties are not supported",
                );
            }
        }
        let h = Header {
            binary,
            vars: numbers[0],
            inputs: numbers[1],
            latches: numbers[2],
            out: numbers[3],
            and: numbers[4],
        };
        if h.vars.1 > MAX_VAR {
            return fail(h.vars.0, "too many variables");
        }
        let min_vars = h.inputs.1 + h.latches.1 + h.and.1;
        if h.binary.1 {
            if h.vars.1 != min_vars {
                return fail(
                    h.vars.0,
                    "#vars must be equal to #inputs + #latches + #AND gates",
                );
            }
        } else if h.vars.1 < min_vars {
            return fail(
                h.vars.0,
                "#vars must be at least #inputs + #latches + #AND gates",
            );
        }
        Ok((input, h))
    };

    context_loc(
        || line_span(input),
        "header line must have format 'aag|aig <#vars> <#inputs> <#latches> <#outputs> <#AND gates>'",
        inner,
    )(input)
}

mod ascii {
    use nom::branch::alt;
    use nom::character::complete::{line_ending, not_line_ending, space1, u64};
    use nom::combinator::{consumed, eof, opt};
    use nom::error::{ContextError, ParseError};
    use nom::sequence::preceded;
    use nom::IResult;

    use crate::util::{eol_or_eof, fail, fail_with_contexts, trim_end};

    use super::{AIGLiteral, Header};

    pub fn literal<'a, E>(
        vars: (&'a [u8], usize),
    ) -> impl FnMut(&'a [u8]) -> IResult<&'a [u8], (&'a [u8], AIGLiteral), E>
    where
        E: ParseError<&'a [u8]> + ContextError<&'a [u8]>,
    {
        const MSG0: &str = "variable too large. The literal number given here divided by 2 must not be larger than the maximal variable number";
        const MSG1: &str = "note: maximal variable number given here";

        move |input| {
            let (input, (span, lit)) = consumed(u64)(input)?;
            if lit / 2 > vars.1 as u64 {
                return fail_with_contexts([(span, MSG0), (vars.0, MSG1)]);
            }
            Ok((input, (span, AIGLiteral(lit as usize))))
        }
    }

    pub fn input_line<'a, E>(
        vars: (&'a [u8], usize),
    ) -> impl FnMut(&'a [u8]) -> IResult<&'a [u8], (&'a [u8], AIGLiteral), E>
    where
        E: ParseError<&'a [u8]> + ContextError<&'a [u8]>,
    {
        move |input| {
            let (input, lit) = literal(vars)(input)?;
            if lit.1.negative() || lit.1.variable() == 0 {
                return fail(
                    lit.0,
                    "inputs must be positive, non-constant literals (i.e., the number must be even and non-zero)",
                );
            }
            let (input, _) = eol_or_eof(input)?;
            Ok((input, lit))
        }
    }

    /// Optional init value, preceded by at least one space if present
    pub fn latch_init_ext<'a, E>(
        latch: AIGLiteral,
    ) -> impl FnMut(&'a [u8]) -> IResult<&'a [u8], Option<bool>, E>
    where
        E: ParseError<&'a [u8]> + ContextError<&'a [u8]>,
    {
        const MSG: &str = "initial value must be 0, 1, or the latch literal itself";

        move |input| {
            let (input, init) = opt(preceded(space1, consumed(u64)))(input)?;
            let init = match init {
                None | Some((_, 0)) => Some(false),
                Some((_, 1)) => Some(true),
                Some((_, v)) if v == latch.0 as u64 => None,
                Some((span, _)) => return fail(span, MSG),
            };
            Ok((input, init))
        }
    }

    pub fn latch_line<'a, E>(
        vars: (&'a [u8], usize),
    ) -> impl FnMut(
        &'a [u8],
    ) -> IResult<
        &'a [u8],
        ((&'a [u8], AIGLiteral), (&'a [u8], AIGLiteral), Option<bool>),
        E,
    >
    where
        E: ParseError<&'a [u8]> + ContextError<&'a [u8]>,
    {
        move |input| {
            let (input, lit) = literal(vars)(input)?;
            let (input, _) = space1(input)?;
            let (input, next) = literal(vars)(input)?;

            if lit.1.negative() || lit.1.variable() == 0 {
                return fail(
                    lit.0,
                    "latch literals must be positive and non-constant (i.e., the number must be even and non-zero)",
                );
            }

            let (input, init) = latch_init_ext(lit.1)(input)?;
            let (input, _) = eol_or_eof(input)?;
            Ok((input, (lit, next, init)))
        }
    }

    /// Parse the symbol table, storing input and output names (if `store` is
    /// set)
    ///
    /// Latch names are accepted but not stored.
    pub fn symbol_table<'a, 'b, E>(
        header: &'b Header<'a>,
        store: bool,
        input_names: &'b mut Vec<Option<String>>,
        output_names: &'b mut Vec<Option<String>>,
    ) -> impl 'b + FnMut(&'a [u8]) -> IResult<&'a [u8], (), E>
    where
        E: ParseError<&'a [u8]> + ContextError<&'a [u8]>,
    {
        const MSGS: [(&str, &str); 3] = [
            ("input not defined", "number of inputs given here"),
            ("output not defined", "number of outputs given here"),
            ("latch not defined", "number of latches given here"),
        ];
        move |mut input| {
            let counts = [header.inputs, header.out, header.latches];
            loop {
                let (inp, kind) = match input {
                    [b'i', inp @ ..] => (inp, 0),
                    [b'o', inp @ ..] => (inp, 1),
                    [b'l', inp @ ..] => (inp, 2),
                    _ => break,
                };

                let (inp, (span, i)) = consumed(u64)(inp)?;
                let (count_span, count) = counts[kind];
                if i >= count as u64 {
                    return fail_with_contexts([(span, MSGS[kind].0), (count_span, MSGS[kind].1)]);
                }
                let i = i as usize;

                let (inp, _) = space1(inp)?;
                let (inp, name) = not_line_ending(inp)?;
                (input, _) = alt((line_ending, eof))(inp)?;

                let symbol_list = match kind {
                    0 => &mut *input_names,
                    1 => &mut *output_names,
                    _ => continue,
                };
                if !store {
                    continue;
                }
                if symbol_list.is_empty() {
                    symbol_list.resize(count, None);
                }
                let symbol = &mut symbol_list[i];
                let name = String::from_utf8_lossy(trim_end(name));
                if let Some(symbol) = symbol {
                    symbol.reserve(1 + name.len());
                    symbol.push(' ');
                    symbol.push_str(&name);
                } else {
                    *symbol = Some(name.to_string());
                }
            }

            Ok((input, ()))
        }
    }
}

fn usize_7bit(input: &[u8]) -> Result<(&[u8], usize), ()> {
    let mut input = input;
    let mut val = 0;
    let mut shift = 0u32;
    loop {
        let &[b, ref rem @ ..] = input else {
            return Err(());
        };
        input = rem;

        val |= ((b & ((1 << 7) - 1)) as usize).wrapping_shl(shift);
        if b & (1 << 7) == 0 {
            return Ok((input, val));
        }
        shift += 7;
    }
}

/// Definition of a variable in an ASCII file, before re-encoding
#[derive(Clone, Copy, PartialEq, Eq)]
enum Def {
    Undef,
    /// Input or latch with its final variable number
    Leaf(u32),
    /// AND gate with its position in the file
    And(usize),
}

/// Parse a (binary or ASCII) AIGER file
///
/// The variables of an ASCII file are renumbered such that inputs, latches,
/// and AND gates are consecutive, and AND gates are topologically sorted.
pub fn parse<'a, E>(options: &ParseOptions) -> impl FnMut(&'a [u8]) -> IResult<&'a [u8], Aig, E>
where
    E: ParseError<&'a [u8]> + ContextError<&'a [u8]> + FromExternalError<&'a [u8], String>,
{
    let symbols = options.symbols;
    move |input| {
        let (mut input, h) = header(input)?;

        let mut aig = Aig {
            num_inputs: h.inputs.1,
            latches: Vec::with_capacity(h.latches.1),
            outputs: Vec::with_capacity(h.out.1),
            ands: Vec::with_capacity(h.and.1),
            input_names: Vec::new(),
            output_names: Vec::new(),
        };

        let first_input = 1;
        let first_latch = first_input + h.inputs.1;
        let first_and_gate = first_latch + h.latches.1;
        let var_count = first_and_gate + h.and.1; // including false

        if h.binary.1 {
            let make_literal = |l: AIGLiteral| Literal::from_code(l.0 as u32);

            // latches
            for i in first_latch..first_and_gate {
                let (inp, (_, next)) = ascii::literal(h.vars)(input)?;
                let (inp, init) = ascii::latch_init_ext(AIGLiteral(i * 2))(inp)?;
                input = eol_or_eof(inp)?.0;
                aig.latches.push(Latch {
                    lit: Literal::new(i as u32, false),
                    next: make_literal(next),
                    init,
                });
            }

            // outputs
            for _ in 0..h.out.1 {
                let (inp, (_, lit)) = ascii::literal(h.vars)(input)?;
                input = eol_or_eof(inp)?.0;
                aig.outputs.push(make_literal(lit));
            }

            // and gates
            let and_gate_eof_err = fail(
                h.binary.0,
                "invalid binary: reached end of file while parsing an and gate",
            );
            for i in first_and_gate..var_count {
                let Ok((inp, d1)) = usize_7bit(input) else {
                    return and_gate_eof_err;
                };
                let Ok((inp, d2)) = usize_7bit(inp) else {
                    return and_gate_eof_err;
                };
                input = inp;
                let lhs = i * 2;
                let in1 = lhs.wrapping_sub(d1);
                if d1 > lhs || d1 == 0 || d2 > in1 {
                    return fail(h.binary.0, "invalid binary: invalid and gate inputs");
                }
                let in2 = in1 - d2;
                aig.ands.push(AndGate {
                    lhs: Literal::new(i as u32, false),
                    rhs0: make_literal(AIGLiteral(in1)),
                    rhs1: make_literal(AIGLiteral(in2)),
                });
            }
        } else {
            // Variables in ASCII files may be numbered arbitrarily, may be
            // undefined, and AND gates may refer to gates defined later on.
            // Hence, we first record all definitions and renumber afterwards.
            let mut defs = vec![Def::Undef; h.vars.1 + 1];
            defs[0] = Def::Leaf(0);

            // inputs
            const SECOND_DEF_MSG: &str = "second variable definition";
            for i in first_input..first_latch {
                let (inp, (span, lit)) = ascii::input_line(h.vars)(input)?;
                let var = lit.variable();
                if defs[var] != Def::Undef {
                    return fail(span, SECOND_DEF_MSG);
                }
                defs[var] = Def::Leaf(i as u32);
                input = inp;
            }

            // latches
            let mut latch_next = Vec::with_capacity(h.latches.1);
            for i in first_latch..first_and_gate {
                let tmp = ascii::latch_line(h.vars)(input)?;
                input = tmp.0;
                let ((lit_span, lit), next, init) = tmp.1;
                let var = lit.variable();
                if defs[var] != Def::Undef {
                    return fail(lit_span, SECOND_DEF_MSG);
                }
                defs[var] = Def::Leaf(i as u32);
                latch_next.push((next, init));
            }

            // outputs
            let mut outputs = Vec::with_capacity(h.out.1);
            for _ in 0..h.out.1 {
                let (inp, lit) = ascii::literal(h.vars)(input)?;
                input = eol_or_eof(inp)?.0;
                outputs.push(lit);
            }

            // and gates
            let mut gates = Vec::with_capacity(h.and.1);
            for i in 0..h.and.1 {
                let (inp, (lit_span, lit)) = ascii::literal(h.vars)(input)?;
                let (inp, _) = space1(inp)?;
                let (inp, in1) = ascii::literal(h.vars)(inp)?;
                let (inp, _) = space1(inp)?;
                let (inp, in2) = ascii::literal(h.vars)(inp)?;
                input = eol_or_eof(inp)?.0;

                if lit.negative() || lit.variable() == 0 {
                    return fail(lit_span, "gate literal must be positive and non-constant");
                }
                let var = lit.variable();
                if defs[var] != Def::Undef {
                    return fail(lit_span, SECOND_DEF_MSG);
                }
                defs[var] = Def::And(i);
                gates.push((lit_span, in1, in2));
            }

            // undefined literals
            let undef: Vec<&'a [u8]> = (latch_next.iter().map(|(next, _)| next))
                .chain(&outputs)
                .chain(gates.iter().flat_map(|(_, in1, in2)| [in1, in2]))
                .filter(|(_, l)| defs[l.variable()] == Def::Undef)
                .map(|&(span, _)| span)
                .collect();
            if !undef.is_empty() {
                return fail_with_contexts(undef.into_iter().map(|span| (span, "undefined literal")));
            }

            // toposort the and gates (iterative DFS, post-order)
            let fan_ins = |g: usize| [gates[g].1 .1, gates[g].2 .1];
            let mut order = Vec::with_capacity(gates.len());
            let mut done: BitVec = BitVec::repeat(false, gates.len());
            let mut on_stack: BitVec = BitVec::repeat(false, gates.len());
            let mut stack: Vec<(usize, usize)> = Vec::new();
            for root in 0..gates.len() {
                if done[root] {
                    continue;
                }
                on_stack.set(root, true);
                stack.push((root, 0));
                while let Some(&(g, child)) = stack.last() {
                    if child == 2 {
                        stack.pop();
                        on_stack.set(g, false);
                        done.set(g, true);
                        order.push(g);
                        continue;
                    }
                    if let Some(top) = stack.last_mut() {
                        top.1 += 1;
                    }
                    if let Def::And(c) = defs[fan_ins(g)[child].variable()] {
                        if on_stack[c] {
                            return fail(gates[g].0, "and gate depends on itself");
                        }
                        if !done[c] {
                            on_stack.set(c, true);
                            stack.push((c, 0));
                        }
                    }
                }
            }

            // renumber
            let mut and_var = vec![0u32; gates.len()];
            for (k, &g) in order.iter().enumerate() {
                and_var[g] = (first_and_gate + k) as u32;
            }
            let map = |l: AIGLiteral| {
                let var = match defs[l.variable()] {
                    Def::Leaf(v) => v,
                    Def::And(g) => and_var[g],
                    Def::Undef => unreachable!("undefined literals are rejected above"),
                };
                Literal::new(var, l.negative())
            };
            for (k, (next, init)) in latch_next.into_iter().enumerate() {
                aig.latches.push(Latch {
                    lit: Literal::new((first_latch + k) as u32, false),
                    next: map(next.1),
                    init,
                });
            }
            aig.outputs.extend(outputs.iter().map(|&(_, l)| map(l)));
            for &g in &order {
                let [in1, in2] = fan_ins(g);
                aig.ands.push(AndGate {
                    lhs: Literal::new(and_var[g], false),
                    rhs0: map(in1),
                    rhs1: map(in2),
                });
            }
        }

        // symbol table
        let (input, ()) =
            ascii::symbol_table(&h, symbols, &mut aig.input_names, &mut aig.output_names)(input)?;

        // optional comment section
        let (input, _) = alt((preceded(tag("c"), rest), eof))(input)?;

        Ok((input, aig))
    }
}

#[cfg(test)]
mod tests {
    use crate::util::test::opts;
    use crate::{Aig, AndGate, Latch, Literal};

    use super::usize_7bit;

    fn lit(code: u32) -> Literal {
        Literal::from_code(code)
    }

    fn and(lhs: u32, rhs0: u32, rhs1: u32) -> AndGate {
        AndGate {
            lhs: lit(lhs),
            rhs0: lit(rhs0),
            rhs1: lit(rhs1),
        }
    }

    fn comb(inputs: usize, outputs: &[u32], ands: &[AndGate]) -> Aig {
        Aig::new(
            inputs,
            Vec::new(),
            outputs.iter().map(|&o| lit(o)).collect(),
            ands.to_vec(),
        )
        .unwrap()
    }

    fn names(names: &[&str]) -> Vec<Option<String>> {
        names.iter().map(|s| Some(s.to_string())).collect()
    }

    #[test]
    fn decode_7bit() {
        // cases taken from https://github.com/arminbiere/aiger/blob/master/FORMAT
        let cases: &[(usize, &[u8])] = &[
            (0, b"\x00"),
            (1, b"\x01"),
            ((1 << 7) - 1, b"\x7f"),
            ((1 << 7), b"\x80\x01"),
            ((1 << 8) + 2, b"\x82\x02"),
            ((1 << 14) - 1, b"\xff\x7f"),
            ((1 << 14) + 3, b"\x83\x80\x01"),
            ((1 << 28) - 1, b"\xff\xff\xff\x7f"),
            ((1 << 28) + 7, b"\x87\x80\x80\x80\x01"),
        ];

        for &(expected, input) in cases {
            let (remaining, val) = usize_7bit(input).unwrap();
            assert!(remaining.is_empty());
            assert_eq!(val, expected);
        }
    }

    fn test_aag_aig_match(aag: &[u8], aig: &[u8], expected: Aig) {
        let (_, parsed) = super::parse::<()>(&opts())(aag).unwrap();
        assert_eq!(parsed, expected, "aag does not match expected");
        let (_, parsed) = super::parse::<()>(&opts())(aig).unwrap();
        assert_eq!(parsed, expected, "aig does not match expected");
    }

    // cases (mostly) taken from https://github.com/arminbiere/aiger/blob/master/FORMAT

    #[test]
    fn aag_aig_match_empty() {
        test_aag_aig_match(b"aag 0 0 0 0 0\n", b"aig 0 0 0 0 0\n", comb(0, &[], &[]));
    }

    #[test]
    fn aag_aig_match_constant_out() {
        test_aag_aig_match(
            b"aag 0 0 0 2 0\n0\n1\n",
            b"aig 0 0 0 2 0\n0\n1\n",
            comb(0, &[0, 1], &[]),
        );
    }

    #[test]
    fn aag_aig_match_neg() {
        test_aag_aig_match(
            b"aag 1 1 0 1 0\n2\n3\n",
            b"aig 1 1 0 1 0\n3\n",
            comb(1, &[3], &[]),
        );
    }

    #[test]
    fn aag_aig_match_and() {
        test_aag_aig_match(
            b"aag 3 2 0 1 1\n2\n4\n6\n6 4 2\n",
            b"aig 3 2 0 1 1\n6\n\x02\x02",
            comb(2, &[6], &[and(6, 4, 2)]),
        );
    }

    #[test]
    fn aag_aig_match_or() {
        test_aag_aig_match(
            b"aag 3 2 0 1 1\n2\n4\n7\n6 5 3\n",
            b"aig 3 2 0 1 1\n7\n\x01\x02",
            comb(2, &[7], &[and(6, 5, 3)]),
        );
    }

    #[test]
    fn aag_half_adder_is_renumbered() {
        // variables 4 and 5 are unused, gate 6 refers to gates defined later
        let aag = b"aag 7 2 0 2 3\n\
            2\n\
            4\n\
            6\n\
            12\n\
            6 13 15\n\
            12 2 4\n\
            14 3 5\n\
            i0 x\n\
            i1 y\n\
            o0 s\n\
            o1 c\n\
            c\nhalf adder\n";
        let (rest, parsed) = super::parse::<()>(&opts())(aag).unwrap();
        assert!(rest.is_empty());

        let mut expected = comb(
            2,
            &[10, 6],
            &[and(6, 2, 4), and(8, 3, 5), and(10, 7, 9)],
        );
        expected.input_names = names(&["x", "y"]);
        expected.output_names = names(&["s", "c"]);
        assert_eq!(parsed, expected);
        assert_eq!(parsed.output_name(1), Some("c"));
    }

    #[test]
    fn aig_half_adder() {
        let aig = b"aig 5 2 0 2 3\n\
            10\n\
            6\n\
            \x02\x02\
            \x03\x02\
            \x01\x02\
            i0 x\n\
            i1 y\n\
            o0 s\n\
            o1 c\n\
            c\nhalf adder\n";
        let (_, parsed) = super::parse::<()>(&opts())(aig).unwrap();

        let mut expected = comb(
            2,
            &[10, 6],
            &[and(6, 4, 2), and(8, 5, 3), and(10, 9, 7)],
        );
        expected.input_names = names(&["x", "y"]);
        expected.output_names = names(&["s", "c"]);
        assert_eq!(parsed, expected);
    }

    #[test]
    fn symbols_can_be_skipped() {
        let aag = b"aag 1 1 0 1 0\n2\n2\ni0 x\no0 y\n";
        let options = crate::ParseOptionsBuilder::default()
            .symbols(false)
            .build()
            .unwrap();
        let (_, parsed) = super::parse::<()>(&options)(aag).unwrap();
        assert_eq!(parsed.input_name(0), None);
        assert_eq!(parsed, comb(1, &[2], &[]));
    }

    #[test]
    fn aag_aig_match_toggle() {
        let expected = Aig::new(
            0,
            vec![Latch {
                lit: lit(2),
                next: lit(3),
                init: Some(false),
            }],
            vec![lit(2), lit(3)],
            Vec::new(),
        )
        .unwrap();
        test_aag_aig_match(
            b"aag 1 0 1 2 0\n2 3\n2\n3\n",
            b"aig 1 0 1 2 0\n3\n2\n3\n",
            expected,
        );
    }

    #[test]
    fn malformed() {
        let cases: &[&[u8]] = &[
            // not an AIGER file
            b"p cnf 1 1\n",
            // literal out of range
            b"aag 3 2 0 1 1\n2\n4\n6\n6 8 2\n",
            // undefined literal
            b"aag 4 2 0 1 1\n2\n4\n6\n6 8 2\n",
            // cycle
            b"aag 4 2 0 1 2\n2\n4\n6\n6 8 2\n8 6 4\n",
            // second definition
            b"aag 3 2 0 1 1\n2\n4\n6\n4 2 2\n",
            // negated input
            b"aag 1 1 0 0 0\n3\n",
            // M != I + L + A in binary mode
            b"aig 4 2 0 1 1\n6\n\x02\x02",
            // truncated binary gate section
            b"aig 3 2 0 1 1\n6\n\x02",
            // bad state properties
            b"aag 1 1 0 0 0 1\n2\n2\n",
        ];
        for &case in cases {
            assert!(
                super::parse::<()>(&opts())(case).is_err(),
                "{}",
                String::from_utf8_lossy(case)
            );
        }
    }
}
