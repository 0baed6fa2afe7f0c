//! Decode program vocabulary.
//!
//! A program is a plain slice of [`Step`]s. Offsets are signed and relative
//! to the cursor, which starts at the signature match. Nested programs are
//! borrowed slices, so the built-in catalog lives entirely in static data.

/// How a numeric field is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Radix {
    Hex,
    UpperHex,
    Decimal,
}

/// Radix plus zero-padded minimum width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Render {
    pub radix: Radix,
    pub width: usize,
}

impl Render {
    pub const fn hex(width: usize) -> Self {
        Self {
            radix: Radix::Hex,
            width,
        }
    }

    pub const fn upper_hex(width: usize) -> Self {
        Self {
            radix: Radix::UpperHex,
            width,
        }
    }

    pub const fn decimal() -> Self {
        Self {
            radix: Radix::Decimal,
            width: 0,
        }
    }

    pub fn format(&self, value: u32) -> String {
        let w = self.width;
        match self.radix {
            Radix::Hex => format!("{value:0w$x}"),
            Radix::UpperHex => format!("{value:0w$X}"),
            Radix::Decimal => format!("{value:0w$}"),
        }
    }
}

/// Encoding of one extracted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A single byte.
    Byte(Render),
    /// Upper four bits of a byte.
    HighNibble(Render),
    /// Lower four bits of a byte.
    LowNibble(Render),
    /// Little-endian 16-bit value.
    U16Le(Render),
    /// UTF-16LE text ending at a NUL unit, at `stop` if given, at
    /// `max_units`, or at the end of the buffer.
    Utf16 { max_units: usize, stop: Option<u16> },
    /// 8-bit text ending at NUL, at `end`, at `max_len`, or at the end of
    /// the buffer.
    Text { max_len: usize, end: u8 },
}

/// A field read at `cursor + at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub at: isize,
    pub kind: FieldKind,
}

impl Field {
    pub const fn byte(at: isize, render: Render) -> Self {
        Self {
            at,
            kind: FieldKind::Byte(render),
        }
    }

    pub const fn high_nibble(at: isize, render: Render) -> Self {
        Self {
            at,
            kind: FieldKind::HighNibble(render),
        }
    }

    pub const fn low_nibble(at: isize, render: Render) -> Self {
        Self {
            at,
            kind: FieldKind::LowNibble(render),
        }
    }

    pub const fn u16_le(at: isize, render: Render) -> Self {
        Self {
            at,
            kind: FieldKind::U16Le(render),
        }
    }

    pub const fn utf16(at: isize, max_units: usize, stop: Option<u16>) -> Self {
        Self {
            at,
            kind: FieldKind::Utf16 { max_units, stop },
        }
    }

    pub const fn text(at: isize, max_len: usize, end: u8) -> Self {
        Self {
            at,
            kind: FieldKind::Text { max_len, end },
        }
    }
}

/// A test that selects a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition<'a> {
    ByteIs { at: isize, value: u8 },
    ByteIn { at: isize, values: &'a [u8] },
    ByteNot { at: isize, value: u8 },
    /// A secondary signature occurs anywhere in the buffer.
    Contains(&'a [u8]),
}

#[derive(Debug, Clone, Copy)]
pub struct Arm<'a> {
    pub when: Condition<'a>,
    pub then: &'a [Step<'a>],
}

/// Terminal failure raised by a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure<'a> {
    /// Family detected, generation unknown.
    Unrecognized,
    /// Family detected, generation unsupported; `notice` is shown to the user.
    Unsupported { notice: &'a str },
}

#[derive(Debug, Clone, Copy)]
pub enum Step<'a> {
    /// Move the cursor by a signed delta.
    Seek(isize),
    /// Run the first arm whose condition holds, else `otherwise`.
    /// Cursor movement inside the chosen branch carries over.
    Select {
        arms: &'a [Arm<'a>],
        otherwise: &'a [Step<'a>],
    },
    /// Overlay bytes at `cursor + at` in the decoder's private view.
    Patch { at: isize, bytes: &'a [u8] },
    /// Extract a field and append it to the record's value list.
    Field(Field),
    Fail(Failure<'a>),
    /// Finish with `label` and `template`, where each `{}` takes the next field.
    Emit { label: &'a str, template: &'a str },
}

/// Collect every label a program can emit, in program order, without
/// duplicates.
pub fn emitted_labels<'a>(steps: &[Step<'a>], out: &mut Vec<&'a str>) {
    for step in steps {
        match *step {
            Step::Select { arms, otherwise } => {
                for arm in arms {
                    emitted_labels(arm.then, out);
                }
                emitted_labels(otherwise, out);
            }
            Step::Emit { label, .. } => {
                if !out.contains(&label) {
                    out.push(label);
                }
            }
            _ => {}
        }
    }
}
