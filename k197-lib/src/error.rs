use std::io;
use thiserror::Error;

/// The primary error type for the `k197-lib` crate.
///
/// Decoding itself never fails; these errors come from turning outside input
/// (slices, capture dumps, files) into packets.
#[derive(Error, Debug)]
pub enum K197Error {
    #[error("Invalid packet length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid hex data: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("Parse error on line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
