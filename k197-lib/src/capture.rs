use crate::error::K197Error;
use crate::packet::Packet;
use std::path::Path;

/// One packet from a text capture dump.
///
/// Dump format, one packet per line:
///
/// ```text
/// # comment
/// @1520.5 20 30 4A 14 00 18 11 20 01 EB C0 7A F8 D1 B9 08 00 00
/// 20304A140018112000EBEBEBEBEBEB000000
/// ```
///
/// The optional `@` token is a timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureLine {
    /// 1-based line number in the dump
    pub line: usize,
    pub timestamp_ms: Option<f64>,
    pub packet: Packet,
}

impl CaptureLine {
    /// Parse a single dump line. Blank lines and comments give `Ok(None)`.
    pub fn parse(line: usize, text: &str) -> Result<Option<Self>, K197Error> {
        let text = text.trim();
        if text.is_empty() || text.starts_with('#') {
            return Ok(None);
        }

        let (timestamp_ms, hex) = match text.strip_prefix('@') {
            Some(rest) => {
                let (stamp, hex) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                let stamp = stamp.parse::<f64>().map_err(|e| K197Error::ParseError {
                    line,
                    message: format!("invalid timestamp {:?}: {}", stamp, e),
                })?;
                (Some(stamp), hex)
            }
            None => (None, text),
        };

        let packet = hex.parse::<Packet>().map_err(|e| K197Error::ParseError {
            line,
            message: e.to_string(),
        })?;

        Ok(Some(Self {
            line,
            timestamp_ms,
            packet,
        }))
    }
}

/// Parse a whole capture dump.
pub fn parse_capture(text: &str) -> Result<Vec<CaptureLine>, K197Error> {
    let mut captures = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if let Some(capture) = CaptureLine::parse(index + 1, line)? {
            captures.push(capture);
        }
    }
    Ok(captures)
}

/// Read and parse a capture dump file.
pub fn read_capture(path: impl AsRef<Path>) -> Result<Vec<CaptureLine>, K197Error> {
    let text = std::fs::read_to_string(path)?;
    parse_capture(&text)
}
