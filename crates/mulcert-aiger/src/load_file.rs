//! Convenience functions etc. to load an [`Aig`] from file

// spell-checker:ignore termcolor

use std::fmt;
use std::path::Path;

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFile;
use codespan_reporting::term::termcolor::ColorChoice;
use codespan_reporting::term::termcolor::{StandardStream, WriteColor};
use codespan_reporting::term::{emit, Config};
use nom::error::{ContextError, ErrorKind, FromExternalError, ParseError};
use nom::Offset;

use crate::aiger;
use crate::{Aig, ParseOptions};

struct ParserReport<I>(Vec<(I, ParserError)>);

enum ParserError {
    Nom(ErrorKind),
    Char(char),
    Context(&'static str),
    External(String),
}

impl<I> ParseError<I> for ParserReport<I> {
    fn from_error_kind(input: I, kind: ErrorKind) -> Self {
        ParserReport(vec![(input, ParserError::Nom(kind))])
    }

    fn append(input: I, kind: ErrorKind, mut other: Self) -> Self {
        other.0.push((input, ParserError::Nom(kind)));
        other
    }

    fn from_char(input: I, c: char) -> Self {
        ParserReport(vec![(input, ParserError::Char(c))])
    }
}

impl<I> ContextError<I> for ParserReport<I> {
    fn add_context(input: I, ctx: &'static str, mut other: Self) -> Self {
        match other.0.first() {
            Some((_, ParserError::Context(_))) => {}
            // Assume that the context is a better description
            _ => other.0.clear(),
        }
        other.0.push((input, ParserError::Context(ctx)));
        other
    }
}

impl<I, S: ToString> FromExternalError<I, S> for ParserReport<I> {
    fn from_external_error(input: I, _kind: ErrorKind, e: S) -> Self {
        Self(vec![(input, ParserError::External(e.to_string()))])
    }
}

/// Parse `input` as AIGER file, emitting errors to `writer`
///
/// `file_id` is an identifier for the file used for error reporting. `config`
/// configures how diagnostics are rendered.
///
/// If you simply want to parse a file with error reporting to stderr, you are
/// probably looking for [`load_file()`].
pub fn parse<S: AsRef<str> + Clone + fmt::Display>(
    input: &[u8],
    parse_options: &ParseOptions,
    file_id: S,
    writer: &mut dyn WriteColor,
    config: &Config,
) -> Option<Aig> {
    let errors = match aiger::parse::<ParserReport<_>>(parse_options)(input) {
        Ok((rest, aig)) => {
            debug_assert!(rest.is_empty());
            return Some(aig);
        }
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) => e.0,
        Err(nom::Err::Incomplete(_)) => unreachable!("only using complete parsers"),
    };

    let range = move |span: &[u8]| {
        let offset = input.offset(span);
        let end = offset + span.len();
        if end >= input.len() {
            offset..offset
        } else {
            offset..end
        }
    };

    let labels: Vec<_> = errors
        .into_iter()
        .enumerate()
        .map(|(i, (span, err))| {
            let msg = match err {
                ParserError::Nom(e) => format!("Expected {}", e.description()),
                ParserError::Char(c) => format!("Expected '{c}'"),
                ParserError::Context(msg) => msg.to_string(),
                ParserError::External(s) => s,
            };
            let label = if i == 0 {
                Label::primary((), range(span))
            } else {
                Label::secondary((), range(span))
            };
            label.with_message(msg)
        })
        .collect();

    let diagnostic = Diagnostic::error()
        .with_message("parsing failed")
        .with_labels(labels);

    let file = SimpleFile::new(file_id, String::from_utf8_lossy(input));
    emit(writer, config, &file, &diagnostic).ok();

    None
}

/// Load and parse the AIGER file at `path`, reporting errors to stderr
///
/// Returns `Some(aig)` on success, `None` on error.
pub fn load_file(path: impl AsRef<Path>, options: &ParseOptions) -> Option<Aig> {
    let path = path.as_ref();
    let src = match std::fs::read(path) {
        Ok(src) => src,
        Err(err) => {
            eprintln!("error: could not read '{}' ({err})", path.display());
            return None;
        }
    };

    let config = codespan_reporting::term::Config::default();
    let writer = StandardStream::stderr(ColorChoice::Auto);
    let mut write_lock = writer.lock();

    parse(
        &src,
        options,
        path.to_string_lossy(),
        &mut write_lock,
        &config,
    )
}

#[cfg(test)]
mod tests {
    use codespan_reporting::term::termcolor::NoColor;

    use crate::util::test::opts;

    #[test]
    fn diagnostics_point_into_the_file() {
        let mut out = NoColor::new(Vec::new());
        let config = codespan_reporting::term::Config::default();
        let res = super::parse(
            b"aag 3 2 0 1 1\n2\n4\n6\n6 8 2\n",
            &opts(),
            "bad.aag",
            &mut out,
            &config,
        );
        assert!(res.is_none());
        let msg = String::from_utf8(out.into_inner()).unwrap();
        assert!(msg.contains("parsing failed"));
        assert!(msg.contains("bad.aag"));
        assert!(msg.contains("variable too large"));
    }

    #[test]
    fn successful_parse_is_silent() {
        let mut out = NoColor::new(Vec::new());
        let config = codespan_reporting::term::Config::default();
        let aig = super::parse(b"aag 1 1 0 1 0\n2\n3\n", &opts(), "neg.aag", &mut out, &config);
        assert!(aig.is_some());
        assert!(out.into_inner().is_empty());
    }
}
