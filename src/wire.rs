//! Read-only protobuf wire-format scanning.
//!
//! [`Cursor`] walks a borrowed byte slice one field at a time. It never fails:
//! truncated values decode as partial varints or empty slices, and anything it
//! cannot frame moves the cursor to its end bound so the caller stops reading
//! the current message instead of misinterpreting the bytes that follow.

use tracing::trace;

/// Layout of a field value, taken from the low three bits of its tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    Varint,
    Fixed64,
    LengthDelimited,
    StartGroup,
    EndGroup,
    Fixed32,
    /// Wire types 6 and 7 are not assigned
    Invalid(u8),
}

impl WireType {
    /// Wire type encoded in a field tag
    pub fn from_tag(tag: u64) -> Self {
        match (tag & 0x7) as u8 {
            0 => WireType::Varint,
            1 => WireType::Fixed64,
            2 => WireType::LengthDelimited,
            3 => WireType::StartGroup,
            4 => WireType::EndGroup,
            5 => WireType::Fixed32,
            other => WireType::Invalid(other),
        }
    }
}

/// A field header: field number and wire type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
    pub field: u64,
    pub wire_type: WireType,
}

/// Scanning position over an immutable byte buffer
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Cursor { buf, pos: 0 }
    }

    /// Current read offset from the start of the buffer
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left before the end bound
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Decode a base-128 varint.
    ///
    /// Stops at the end bound and returns whatever was accumulated so far.
    /// Payload bits beyond the 64th are discarded, but continuation bytes are
    /// still consumed so the next field starts in the right place.
    pub fn read_varint(&mut self) -> u64 {
        let mut value = 0u64;
        let mut shift = 0u32;
        while let Some(&byte) = self.buf.get(self.pos) {
            self.pos += 1;
            if shift < 64 {
                value |= u64::from(byte & 0x7f) << shift;
            }
            if byte & 0x80 == 0 {
                break;
            }
            shift += 7;
        }
        value
    }

    /// Read the next field tag, or `None` once the buffer is exhausted
    pub fn read_tag(&mut self) -> Option<Tag> {
        if self.is_empty() {
            return None;
        }
        let raw = self.read_varint();
        Some(Tag {
            field: raw >> 3,
            wire_type: WireType::from_tag(raw),
        })
    }

    /// Read a varint length prefix followed by that many bytes.
    ///
    /// A length running past the end bound yields an empty slice and exhausts
    /// the cursor: the field is treated as absent and nothing after it in this
    /// buffer can be framed.
    pub fn read_length_delimited(&mut self) -> &'a [u8] {
        self.try_read_length_delimited().unwrap_or_default()
    }

    /// Like [`read_length_delimited`](Self::read_length_delimited), but
    /// reports truncation as `None` so an empty payload stays distinguishable.
    pub fn try_read_length_delimited(&mut self) -> Option<&'a [u8]> {
        let len = self.read_varint();
        match usize::try_from(len) {
            Ok(len) if len <= self.remaining() => {
                let bytes = &self.buf[self.pos..self.pos + len];
                self.pos += len;
                Some(bytes)
            }
            _ => {
                trace!(
                    len,
                    remaining = self.remaining(),
                    "truncated length-delimited field"
                );
                self.exhaust();
                None
            }
        }
    }

    /// Read a length-delimited field as text, replacing invalid UTF-8
    pub fn read_string(&mut self) -> String {
        String::from_utf8_lossy(self.read_length_delimited()).into_owned()
    }

    /// Consume exactly one field value of the given wire type.
    ///
    /// Groups are not framed: a start or end group marker (or an unassigned
    /// wire type) exhausts the cursor, ending the current message.
    pub fn skip(&mut self, wire_type: WireType) {
        match wire_type {
            WireType::Varint => {
                self.read_varint();
            }
            WireType::Fixed64 => self.advance(8),
            WireType::LengthDelimited => {
                self.read_length_delimited();
            }
            WireType::Fixed32 => self.advance(4),
            WireType::StartGroup | WireType::EndGroup | WireType::Invalid(_) => {
                trace!(
                    ?wire_type,
                    offset = self.pos,
                    "unsupported wire type, abandoning message"
                );
                self.exhaust();
            }
        }
    }

    fn advance(&mut self, n: usize) {
        self.pos = self.pos.saturating_add(n).min(self.buf.len());
    }

    fn exhaust(&mut self) {
        self.pos = self.buf.len();
    }
}
