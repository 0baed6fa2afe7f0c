//! Version field decoder.
//!
//! Interprets a decode program against one signature match. Every read is
//! checked against the buffer length; a program that would step outside the
//! buffer fails with [`DecodeError::OutOfBounds`].

mod field;
pub mod program;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use crate::search::Finder;
use field::View;
pub use program::{
    emitted_labels, Arm, Condition, Failure, Field, FieldKind, Radix, Render, Step,
};

/// Width the label column is padded to in the printed line.
pub const LABEL_WIDTH: usize = 26;

/// A decoded version: the family label and one formatted value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionRecord {
    pub label: String,
    pub version: String,
}

impl fmt::Display for VersionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "     {:<width$} - {}",
            self.label,
            self.version,
            width = LABEL_WIDTH
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("signature found but no known layout generation matched")]
    UnrecognizedVariant,

    #[error("{notice}")]
    UnsupportedVariant { notice: String },

    #[error("read of {len} byte(s) at offset {offset} is outside the {size}-byte buffer")]
    OutOfBounds {
        offset: isize,
        len: usize,
        size: usize,
    },

    #[error("template expects {expected} field(s) but {found} were extracted")]
    TemplateArity { expected: usize, found: usize },

    #[error("program ended without emitting a version")]
    MissingEmit,
}

enum Flow {
    Continue(isize),
    Done(VersionRecord),
}

struct Machine<'b> {
    view: View<'b>,
    fields: Vec<String>,
}

impl Machine<'_> {
    fn holds(&self, condition: &Condition<'_>, cursor: isize) -> Result<bool, DecodeError> {
        let hit = match *condition {
            Condition::ByteIs { at, value } => self.view.byte(cursor, at)? == value,
            Condition::ByteIn { at, values } => values.contains(&self.view.byte(cursor, at)?),
            Condition::ByteNot { at, value } => self.view.byte(cursor, at)? != value,
            Condition::Contains(pattern) => Finder::new(pattern).is_present(self.view.bytes()),
        };
        trace!(?condition, cursor, hit, "probe");
        Ok(hit)
    }

    fn run(&mut self, steps: &[Step<'_>], mut cursor: isize) -> Result<Flow, DecodeError> {
        for step in steps {
            match *step {
                Step::Seek(delta) => cursor = cursor.saturating_add(delta),
                Step::Select { arms, otherwise } => {
                    let mut branch = otherwise;
                    for arm in arms {
                        if self.holds(&arm.when, cursor)? {
                            branch = arm.then;
                            break;
                        }
                    }
                    match self.run(branch, cursor)? {
                        Flow::Continue(next) => cursor = next,
                        done => return Ok(done),
                    }
                }
                Step::Patch { at, bytes } => {
                    let start = self.view.locate(cursor, at, bytes.len())?;
                    self.view.patch(start, bytes);
                }
                Step::Field(ref field) => {
                    let value = self.view.read(cursor, field)?;
                    trace!(at = field.at, cursor, %value, "field");
                    self.fields.push(value);
                }
                Step::Fail(Failure::Unrecognized) => return Err(DecodeError::UnrecognizedVariant),
                Step::Fail(Failure::Unsupported { notice }) => {
                    return Err(DecodeError::UnsupportedVariant {
                        notice: notice.to_string(),
                    })
                }
                Step::Emit { label, template } => {
                    let version = render(template, &self.fields)?;
                    return Ok(Flow::Done(VersionRecord {
                        label: label.to_string(),
                        version,
                    }));
                }
            }
        }
        Ok(Flow::Continue(cursor))
    }
}

/// Substitute `fields` into the `{}` slots of `template`, in order.
fn render(template: &str, fields: &[String]) -> Result<String, DecodeError> {
    let pieces: Vec<&str> = template.split("{}").collect();
    let expected = pieces.len() - 1;
    if expected != fields.len() {
        return Err(DecodeError::TemplateArity {
            expected,
            found: fields.len(),
        });
    }
    let mut out = String::with_capacity(template.len() + fields.iter().map(String::len).sum::<usize>());
    for (i, piece) in pieces.iter().enumerate() {
        out.push_str(piece);
        if let Some(value) = fields.get(i) {
            out.push_str(value);
        }
    }
    Ok(out)
}

/// Run `program` with the cursor starting at `match_offset`.
pub fn decode(
    buffer: &[u8],
    match_offset: usize,
    program: &[Step<'_>],
) -> Result<VersionRecord, DecodeError> {
    let mut machine = Machine {
        view: View::new(buffer),
        fields: Vec::new(),
    };
    let start = isize::try_from(match_offset).map_err(|_| DecodeError::OutOfBounds {
        offset: isize::MAX,
        len: 0,
        size: buffer.len(),
    })?;
    match machine.run(program, start)? {
        Flow::Done(record) => {
            debug!(label = %record.label, version = %record.version, "decoded");
            Ok(record)
        }
        Flow::Continue(_) => Err(DecodeError::MissingEmit),
    }
}
