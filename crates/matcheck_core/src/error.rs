//! Error kinds raised while decoding matrices and multiplying them.

use std::num::ParseFloatError;

use thiserror::Error;

/// Failures while turning captured program output into matrices.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Fewer than three sentinel-closed blocks were present.
    #[error("expected 3 matrices, found {found} blocks")]
    BlockCount { found: usize },

    /// A row contained a token that is not a floating-point number.
    #[error("matrix {matrix}, row {row}: invalid numeric token '{token}'")]
    InvalidToken {
        matrix: char,
        row: usize,
        token: String,
        #[source]
        source: ParseFloatError,
    },

    /// The rows of a block do not form a rectangular matrix.
    #[error("matrix {matrix}: {source}")]
    Malformed {
        matrix: char,
        #[source]
        source: ShapeError,
    },
}

/// Shape disagreements between operands or between computed and claimed products.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ShapeError {
    #[error("cannot multiply {lhs_rows}×{lhs_cols} by {rhs_rows}×{rhs_cols}")]
    InnerDimension {
        lhs_rows: usize,
        lhs_cols: usize,
        rhs_rows: usize,
        rhs_cols: usize,
    },

    #[error(
        "computed product is {}×{} but claimed product is {}×{}",
        .computed.0,
        .computed.1,
        .claimed.0,
        .claimed.1
    )]
    ProductShape {
        computed: (usize, usize),
        claimed: (usize, usize),
    },

    /// Row numbers are 1-based.
    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row-major buffer of {len} values cannot form a {rows}×{cols} matrix")]
    BufferLength { rows: usize, cols: usize, len: usize },
}
