//! Bounds-checked reads over the scanned buffer.

use std::borrow::Cow;

use super::program::{Field, FieldKind};
use super::DecodeError;

/// Read-only view of the buffer plus bytes overlaid by `Patch` steps.
///
/// Patches never reach the underlying buffer; they live only as long as
/// one decode.
pub(crate) struct View<'b> {
    bytes: &'b [u8],
    patches: Vec<(usize, u8)>,
}

impl<'b> View<'b> {
    pub(crate) fn new(bytes: &'b [u8]) -> Self {
        Self {
            bytes,
            patches: Vec::new(),
        }
    }

    pub(crate) fn bytes(&self) -> &'b [u8] {
        self.bytes
    }

    /// Absolute position of `cursor + at`, provided `len` bytes fit there.
    pub(crate) fn locate(&self, cursor: isize, at: isize, len: usize) -> Result<usize, DecodeError> {
        let offset = cursor.saturating_add(at);
        usize::try_from(offset)
            .ok()
            .filter(|start| {
                start
                    .checked_add(len)
                    .is_some_and(|end| end <= self.bytes.len())
            })
            .ok_or(DecodeError::OutOfBounds {
                offset,
                len,
                size: self.bytes.len(),
            })
    }

    pub(crate) fn byte_at(&self, pos: usize) -> u8 {
        self.patches
            .iter()
            .rev()
            .find(|(p, _)| *p == pos)
            .map_or(self.bytes[pos], |&(_, b)| b)
    }

    pub(crate) fn byte(&self, cursor: isize, at: isize) -> Result<u8, DecodeError> {
        let pos = self.locate(cursor, at, 1)?;
        Ok(self.byte_at(pos))
    }

    pub(crate) fn patch(&mut self, start: usize, bytes: &[u8]) {
        for (i, &b) in bytes.iter().enumerate() {
            self.patches.push((start + i, b));
        }
    }

    /// Up to `max` bytes from `start`, clipped at the buffer end, with
    /// patches applied.
    fn window(&self, start: usize, max: usize) -> Cow<'b, [u8]> {
        let end = start.saturating_add(max).min(self.bytes.len());
        let raw = &self.bytes[start..end];
        if self.patches.iter().any(|(p, _)| (start..end).contains(p)) {
            Cow::Owned((start..end).map(|pos| self.byte_at(pos)).collect())
        } else {
            Cow::Borrowed(raw)
        }
    }

    /// Extract and render one field.
    pub(crate) fn read(&self, cursor: isize, field: &Field) -> Result<String, DecodeError> {
        match field.kind {
            FieldKind::Byte(render) => Ok(render.format(self.byte(cursor, field.at)?.into())),
            FieldKind::HighNibble(render) => {
                Ok(render.format((self.byte(cursor, field.at)? >> 4).into()))
            }
            FieldKind::LowNibble(render) => {
                Ok(render.format((self.byte(cursor, field.at)? & 0x0F).into()))
            }
            FieldKind::U16Le(render) => {
                let pos = self.locate(cursor, field.at, 2)?;
                let value = u16::from_le_bytes([self.byte_at(pos), self.byte_at(pos + 1)]);
                Ok(render.format(value.into()))
            }
            FieldKind::Utf16 { max_units, stop } => {
                let start = self.locate(cursor, field.at, 2)?;
                let window = self.window(start, max_units.saturating_mul(2));
                Ok(utf16_text(&window, stop))
            }
            FieldKind::Text { max_len, end } => {
                let start = self.locate(cursor, field.at, 1)?;
                let window = self.window(start, max_len);
                Ok(byte_text(&window, end))
            }
        }
    }
}

/// Decode UTF-16LE units up to NUL or `stop`. A trailing odd byte is ignored.
pub(crate) fn utf16_text(window: &[u8], stop: Option<u16>) -> String {
    let units = window
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .take_while(|&unit| unit != 0 && Some(unit) != stop)
        .count();
    let (text, _) = encoding_rs::UTF_16LE.decode_without_bom_handling(&window[..units * 2]);
    text.into_owned()
}

/// Bytes up to NUL or `end`, decoded lossily.
pub(crate) fn byte_text(window: &[u8], end: u8) -> String {
    let len = memchr::memchr2(end, 0, window).unwrap_or(window.len());
    String::from_utf8_lossy(&window[..len]).into_owned()
}
