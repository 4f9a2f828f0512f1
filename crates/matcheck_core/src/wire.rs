//! Text wire format exchanged with external multipliers.
//!
//! A multiplier writes three matrices to stdout, in the order A, B, C:
//! - every row is a comma-separated list of numbers (a trailing comma is tolerated)
//! - a line holding only `---` (surrounding whitespace allowed) closes the current block
//! - blank lines are ignored
//!
//! Content after the last sentinel is handled according to [`TrailingBlock`]; by default it
//! is dropped, since multipliers commonly print timing lines there.

use std::fmt::Write as _;

use tracing::debug;

use crate::{config::TrailingBlock, error::ParseError, matrix::Matrix, Scalar};

/// Line that separates matrix blocks.
pub const SENTINEL: &str = "---";

const MATRIX_NAMES: [char; 3] = ['A', 'B', 'C'];

/// Operands and claimed product decoded from one program run.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixTriple {
    pub a: Matrix,
    pub b: Matrix,
    pub c: Matrix,
}

/// Groups non-blank lines into sentinel-closed blocks.
pub fn split_blocks(text: &str, trailing: TrailingBlock) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed == SENTINEL {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else if !trimmed.is_empty() {
            current.push(trimmed);
        }
    }
    if !current.is_empty() {
        match trailing {
            TrailingBlock::Discard => debug!(
                lines = current.len(),
                first = current[0],
                "discarding unterminated trailing block"
            ),
            TrailingBlock::Close => blocks.push(current),
        }
    }
    blocks
}

/// Decodes the first three blocks of `text` as A, B and C.
pub fn parse_matrices(text: &str, trailing: TrailingBlock) -> Result<MatrixTriple, ParseError> {
    let blocks = split_blocks(text, trailing);
    if blocks.len() < MATRIX_NAMES.len() {
        return Err(ParseError::BlockCount {
            found: blocks.len(),
        });
    }
    if blocks.len() > MATRIX_NAMES.len() {
        debug!(
            extra = blocks.len() - MATRIX_NAMES.len(),
            "ignoring blocks past the third"
        );
    }

    let a = parse_block(MATRIX_NAMES[0], &blocks[0])?;
    let b = parse_block(MATRIX_NAMES[1], &blocks[1])?;
    let c = parse_block(MATRIX_NAMES[2], &blocks[2])?;
    Ok(MatrixTriple { a, b, c })
}

/// Converts the lines of one block into a matrix. `name` only labels errors.
pub fn parse_block(name: char, lines: &[&str]) -> Result<Matrix, ParseError> {
    let rows = lines
        .iter()
        .enumerate()
        .map(|(idx, line)| parse_row(name, idx + 1, line))
        .collect::<Result<Vec<_>, _>>()?;
    Matrix::from_rows(rows).map_err(|source| ParseError::Malformed {
        matrix: name,
        source,
    })
}

fn parse_row(name: char, row: usize, line: &str) -> Result<Vec<Scalar>, ParseError> {
    line.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<Scalar>()
                .map_err(|source| ParseError::InvalidToken {
                    matrix: name,
                    row,
                    token: token.to_string(),
                    source,
                })
        })
        .collect()
}

/// Renders each row as `", "`-joined values with `precision` decimals.
pub fn format_rows(matrix: &Matrix, precision: usize) -> Vec<String> {
    matrix
        .rows_iter()
        .map(|row| {
            let mut line = String::new();
            for (idx, value) in row.iter().enumerate() {
                if idx > 0 {
                    line.push_str(", ");
                }
                let _ = write!(line, "{value:.precision$}");
            }
            line
        })
        .collect()
}

/// Encodes matrices in wire format, each followed by a sentinel line.
pub fn write_blocks(matrices: &[&Matrix], precision: usize) -> String {
    let mut out = String::new();
    for matrix in matrices {
        for line in format_rows(matrix, precision) {
            out.push_str(&line);
            out.push('\n');
        }
        out.push_str(SENTINEL);
        out.push('\n');
    }
    out
}
