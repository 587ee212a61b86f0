use crate::constants::{COMMAND_PREAMBLE, COMMAND_SIZE, PACKET_SIZE};
use crate::packet::Packet;
use bytes::{Buf, BytesMut};
use tracing::debug;

/// Cuts a recorded display-bus byte stream into packets.
///
/// Every transfer the meter makes starts with the same controller command
/// sequence, so a packet boundary is wherever [`COMMAND_PREAMBLE`] appears.
/// Bytes that cannot belong to a packet (the `DISPLAY OFF` byte of the
/// power-up sequence, a capture started mid-transfer) are dropped.
#[derive(Debug, Default)]
pub struct PacketFramer {
    buffer: BytesMut,
    discarded: usize,
}

impl PacketFramer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Next complete packet, or `None` until more data is pushed.
    pub fn next_packet(&mut self) -> Option<Packet> {
        loop {
            match self.buffer.windows(COMMAND_SIZE).position(|w| w == COMMAND_PREAMBLE) {
                Some(0) => {}
                Some(offset) => self.discard(offset),
                None => {
                    // keep a tail that may be the start of a split preamble
                    let keep = self.buffer.len().min(COMMAND_SIZE - 1);
                    self.discard(self.buffer.len() - keep);
                    return None;
                }
            }

            if self.buffer.len() < PACKET_SIZE {
                return None;
            }

            // A preamble inside the frame means this transfer was cut short.
            // The power-up command block, sent without its trailing byte, is
            // the same case with the next preamble at offset 7. Only a
            // preamble that is already fully buffered can be seen here.
            let limit = self.buffer.len().min(PACKET_SIZE + COMMAND_SIZE - 1);
            if let Some(offset) = self.buffer[1..limit]
                .windows(COMMAND_SIZE)
                .position(|w| w == COMMAND_PREAMBLE)
            {
                self.discard(offset + 1);
                continue;
            }

            let frame = self.buffer.split_to(PACKET_SIZE);
            return Packet::try_from(frame.as_ref()).ok();
        }
    }

    /// Iterate over every complete packet currently buffered.
    pub fn packets(&mut self) -> impl Iterator<Item = Packet> + '_ {
        std::iter::from_fn(move || self.next_packet())
    }

    /// Number of bytes dropped while searching for packet boundaries
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// Number of bytes waiting for the rest of their packet
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    fn discard(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        debug!(count, "discarding bytes outside packet boundaries");
        self.buffer.advance(count);
        self.discarded += count;
    }
}
