use nom::{
    IResult,
    Parser, // Import the Parser trait to use its methods like .map() and .parse()
    branch::alt,                        // For trying multiple parsers
    bytes::complete::{escaped_transform, tag, take_till}, // For literal strings and escapes
    character::complete::{char, multispace1, none_of, satisfy}, // For character-level parsing
    combinator::{map, opt, recognize, value}, // For transforming and recognizing parser output
    multi::many0,                       // For repeating parsers
    number::complete::double,           // For parsing f64 numbers
    sequence::{delimited, pair, preceded, terminated}, // For sequencing parsers
};
use tracing::trace;

use crate::engine::ast::Datum;
use crate::engine::special_forms;

// Consumes any run of whitespace and `;` line comments, including none.
fn skip(input: &str) -> IResult<&str, ()> {
    value(
        (),
        many0(alt((
            value((), multispace1),
            value((), pair(char(';'), take_till(|c| c == '\n'))),
        ))),
    )
    .parse(input)
}

// Raw tokens carry no surrounding whitespace handling; `parse_datum` and the
// list parser layer that on.
fn number_raw(input: &str) -> IResult<&str, Datum> {
    double.map(Datum::Number).parse(input)
}

fn boolean_raw(input: &str) -> IResult<&str, Datum> {
    alt((
        value(Datum::Bool(true), tag("#t")),
        value(Datum::Bool(false), tag("#f")),
    ))
    .parse(input)
}

// Double-quoted text with \\, \" and \n escapes.
fn text_raw(input: &str) -> IResult<&str, Datum> {
    delimited(
        char('"'),
        map(
            opt(escaped_transform(
                none_of("\\\""),
                '\\',
                alt((
                    value("\\", tag("\\")),
                    value("\"", tag("\"")),
                    value("\n", tag("n")),
                )),
            )),
            |text: Option<String>| Datum::Text(text.unwrap_or_default()),
        ),
        char('"'),
    )
    .parse(input)
}

fn symbol_raw(input: &str) -> IResult<&str, Datum> {
    // Characters allowed to start a symbol, and those allowed after.
    let initial_char = satisfy(|c: char| c.is_alphabetic() || "!$%&*/:<=>?@^_~+-".contains(c));
    let subsequent_char =
        satisfy(|c: char| c.is_alphanumeric() || "!$%&*/:<=>?@^_~+-.#".contains(c));

    recognize(pair(initial_char, many0(subsequent_char)))
        .map(|s: &str| Datum::Symbol(s.to_string()))
        .parse(input)
}

// 'd reads as (quote d).
fn quoted_raw(input: &str) -> IResult<&str, Datum> {
    preceded(char('\''), datum_core)
        .map(|quoted| {
            Datum::List(vec![
                Datum::Symbol(special_forms::QUOTE.to_string()),
                quoted,
            ])
        })
        .parse(input)
}

fn list_raw(input: &str) -> IResult<&str, Datum> {
    delimited(
        char('('),
        preceded(skip, many0(terminated(datum_core, skip))),
        char(')'),
    )
    .map(Datum::List)
    .parse(input)
}

// Core recursive parser for any single datum (atom or list), without
// surrounding whitespace. Number parsing comes first: `+1` is the number 1,
// not a symbol, exactly as nom's `double` reads it.
#[tracing::instrument(level = "trace", skip(input), fields(input = %input))]
fn datum_core(input: &str) -> IResult<&str, Datum> {
    alt((
        number_raw,
        boolean_raw,
        text_raw,
        quoted_raw,
        list_raw,
        symbol_raw,
    ))
    .parse(input)
}

/// Parses a single datum, consuming surrounding whitespace and comments.
#[allow(dead_code)] // The host consumes whole programs; tests read single data.
#[tracing::instrument(level = "trace", skip(input), fields(input = %input))]
pub fn parse_datum(input: &str) -> IResult<&str, Datum> {
    trace!("Attempting to parse one datum");
    delimited(skip, datum_core, skip).parse(input)
}

/// Parses a whole source unit: zero or more data separated by whitespace or
/// comments.
#[tracing::instrument(level = "trace", skip(input), fields(input = %input))]
pub fn parse_program(input: &str) -> IResult<&str, Vec<Datum>> {
    trace!("Attempting to parse a program");
    preceded(skip, many0(terminated(datum_core, skip))).parse(input)
}
