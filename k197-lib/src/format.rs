//! Layouts for the consumers of a decoded reading.
//!
//! Nothing here decodes; these helpers only arrange the three fields of a
//! [`DecodedReading`] for a character LCD, a terminal or a plot.

use crate::reading::DecodedReading;

/// 16x2 character LCD layout.
///
/// Row 0 holds the mode line with the busy glyph in its last column, row 1
/// holds the digits followed by the unit field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LcdLayout {
    pub columns: usize,
}

impl Default for LcdLayout {
    fn default() -> Self {
        Self { columns: 16 }
    }
}

impl LcdLayout {
    /// (column, row) of the busy indicator glyph, the last cell of row 0.
    /// `None` for a zero-width layout.
    pub fn busy_cursor(&self) -> Option<(usize, usize)> {
        self.columns.checked_sub(1).map(|column| (column, 0))
    }

    pub fn lines(&self, reading: &DecodedReading) -> [String; 2] {
        let top = self.pad(&reading.mode);
        let bottom = self.pad(&format!("{} {}", reading.digits, reading.units));
        [top, bottom]
    }

    /// Same as [`lines`](Self::lines) with `glyph` (an LCD ROM code) written
    /// over the busy indicator cell.
    pub fn lines_with_busy(&self, reading: &DecodedReading, glyph: u8) -> [String; 2] {
        let [top, bottom] = self.lines(reading);
        let Some((column, _)) = self.busy_cursor() else {
            return [top, bottom];
        };
        let top = top
            .chars()
            .enumerate()
            .map(|(i, c)| if i == column { char::from(glyph) } else { c })
            .collect();
        [top, bottom]
    }

    fn pad(&self, text: &str) -> String {
        let mut line: String = text.chars().take(self.columns).collect();
        let len = line.chars().count();
        line.extend(std::iter::repeat_n(' ', self.columns - len));
        line
    }
}

/// Single-line form for terminals and logs.
pub fn console_line(reading: &DecodedReading) -> String {
    format!("{} | {} {}", reading.mode, reading.digits, reading.units)
}

/// Numeric value of a digit field for plotting.
///
/// The sign character and surrounding blanks are stripped before parsing and
/// the sign is applied to the result. Fields that are not a plain number (overload
/// `L`, `_` corruption, messages such as `CAL`) give `None`.
pub fn plot_value(digits: &str) -> Option<f64> {
    let trimmed = digits.trim_start_matches(' ');
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start_matches(' ')),
        None => (false, trimmed),
    };
    let body = body.trim_end_matches(' ');
    if body.is_empty() || !body.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    let value: f64 = body.parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Convert a string produced with [`Charset::Lcd`](crate::units::Charset::Lcd)
/// to the bytes an HD44780-style controller expects.
///
/// Chars up to U+00FF map to their code point. Ω and μ from the Unicode
/// charset map to their ROM glyphs; anything else becomes `?`.
pub fn lcd_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            'Ω' => 0xF4,
            'μ' => 0xE4,
            c => u8::try_from(u32::from(c)).unwrap_or(b'?'),
        })
        .collect()
}
