use crate::constants::{DIGITS_WIDTH, UNKNOWN_SEGMENT};
use crate::packet::Packet;
use crate::segment::{decode_segment, has_dot};
use crate::units::Charset;

/// Digit field of `packet`: sign, six digits and the decimal point.
///
/// The result is [`DIGITS_WIDTH`] characters for any packet with at most one
/// decimal point: when no digit carries a point a blank is prepended so the
/// field keeps its width. Unknown segment patterns show up as `'_'`; nothing
/// here fails.
///
/// `charset` is accepted for symmetry with [`get_units`](crate::units::get_units);
/// every digit glyph is plain ASCII.
pub fn get_digits(packet: &Packet, _charset: Charset) -> String {
    let mut reading = String::with_capacity(DIGITS_WIDTH);
    reading.push(if packet.is_negative() { '-' } else { ' ' });

    let mut found_dot = false;
    for &code in packet.digit_codes() {
        if has_dot(code) {
            reading.push('.');
            found_dot = true;
        }
        let ch = decode_segment(code);
        if ch == UNKNOWN_SEGMENT {
            tracing::trace!(code, "unknown segment pattern");
        }
        reading.push(ch);
    }

    if !found_dot {
        reading.insert(0, ' ');
    }
    reading
}
