use winnow::prelude::*;
use winnow::ascii::{Caseless, space1};
use winnow::combinator::{alt, eof, peek};

use crate::error::{ConvertError, Result};
use crate::graph_ast::Direction;

const COMMENT_MARKER: &str = "%%";

/// A trimmed, non-empty, non-comment line together with its 1-based position
/// in the input markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'s> {
    pub number: usize,
    pub text: &'s str,
}

/// Filters the markup down to meaningful lines, validates the header and
/// returns the direction plus the remaining body lines.
pub fn tokenize(input: &str) -> Result<(Direction, Vec<SourceLine<'_>>)> {
    let mut lines = input
        .lines()
        .enumerate()
        .map(|(i, raw)| SourceLine {
            number: i + 1,
            text: raw.trim(),
        })
        .filter(|l| !l.text.is_empty() && !l.text.starts_with(COMMENT_MARKER));

    let Some(first) = lines.next() else {
        return Err(ConvertError::UnsupportedHeader { line: None });
    };

    let mut header_input = first.text;
    let direction = header(&mut header_input).map_err(|_| ConvertError::UnsupportedHeader {
        line: Some(first.text.to_string()),
    })?;

    Ok((direction, lines.collect()))
}

fn header(input: &mut &str) -> winnow::Result<Direction> {
    Caseless("flowchart").parse_next(input)?;
    space1.parse_next(input)?;
    let direction = direction.parse_next(input)?;
    peek(alt((eof.void(), space1.void(), ";".void()))).parse_next(input)?;
    Ok(direction)
}

fn direction(input: &mut &str) -> winnow::Result<Direction> {
    alt((
        Caseless("TD").value(Direction::TopDown),
        Caseless("TB").value(Direction::TopDown),
        Caseless("LR").value(Direction::LeftRight),
        Caseless("RL").value(Direction::RightLeft),
    ))
    .parse_next(input)
}
