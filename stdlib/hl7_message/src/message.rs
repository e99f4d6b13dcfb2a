//! The segment list and its positional addressing operations.
//!
//! A [`Message`] is an ordered list of segment lines. Segments are located by
//! type and 1-based occurrence, fields by 1-based number and components by
//! 0-based number. Every write replaces a whole segment string.
//!
//! The `MSH` header is special: `MSH-1` is the field separator itself, so on
//! read field 1 yields `"|"` and every other field number is shifted down by
//! one before splitting. Writes apply the shift but not the field-1 shortcut,
//! so writing `MSH-1` replaces the segment type token.

use std::fmt::{self, Write as _};

use log::{debug, trace};

use crate::error::{MessageError, MessageResult};
use crate::separators::{COMPONENT_SEPARATOR, FIELD_SEPARATOR, HEADER_SEGMENT, SEGMENT_SEPARATOR};
use crate::tokens::{splice_token, token_at};

/// `MSH-1` as returned by [`Message::field`].
const HEADER_FIELD_ONE: &str = "|";

/// An HL7 v2 message held as its ordered segment lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Message {
    segments: Vec<String>,
}

/// True when `segment` starts with `segment_type` followed by the field separator.
pub(crate) fn is_segment(segment: &str, segment_type: &str) -> bool {
    segment
        .strip_prefix(segment_type)
        .is_some_and(|rest| rest.starts_with(FIELD_SEPARATOR))
}

/// First field-separated token of a segment line.
pub(crate) fn segment_type_of(segment: &str) -> &str {
    segment.split(FIELD_SEPARATOR).next().unwrap_or("")
}

impl Message {
    /// Create a message from segment lines already split on the segment separator.
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Segment lines in wire order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Consume the message and return its segment lines.
    pub fn into_segments(self) -> Vec<String> {
        self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True when the message holds no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segment types in wire order, e.g. `MSH`, `PID`, `PV1`.
    pub fn segment_types(&self) -> impl Iterator<Item = &str> + '_ {
        self.segments.iter().map(|s| segment_type_of(s))
    }

    /// Zero-based position of the `occurrence`-th segment of `segment_type`.
    ///
    /// Occurrences count from 1 in wire order; occurrence 0 is never found.
    pub fn locate_segment(&self, segment_type: &str, occurrence: usize) -> Option<usize> {
        if occurrence == 0 {
            return None;
        }
        let position = self
            .segments
            .iter()
            .enumerate()
            .filter(|(_, segment)| is_segment(segment, segment_type))
            .nth(occurrence - 1)
            .map(|(position, _)| position);
        trace!("locate {segment_type}[{occurrence}] -> {position:?}");
        position
    }

    /// How many segments of `segment_type` the message holds.
    pub fn segment_count(&self, segment_type: &str) -> usize {
        self.segments
            .iter()
            .filter(|segment| is_segment(segment, segment_type))
            .count()
    }

    /// Literal text of the `occurrence`-th segment of `segment_type`.
    pub fn segment(&self, segment_type: &str, occurrence: usize) -> Option<&str> {
        self.locate_segment(segment_type, occurrence)
            .map(|position| self.segments[position].as_str())
    }

    /// Field `field_num` (1-based) of the located segment.
    ///
    /// Returns `None` when the segment is missing, the field lies past the
    /// end, or the field is empty. `MSH-1` is always `"|"`.
    pub fn field(&self, segment_type: &str, occurrence: usize, field_num: usize) -> Option<&str> {
        if field_num == 0 {
            return None;
        }
        let index = if segment_type == HEADER_SEGMENT {
            if field_num == 1 {
                return Some(HEADER_FIELD_ONE);
            }
            field_num - 1
        } else {
            field_num
        };
        let segment = self.segment(segment_type, occurrence)?;
        token_at(segment, FIELD_SEPARATOR, index)
    }

    /// Replace field `field_num` of the located segment with `value`.
    ///
    /// Writing past the last field pads with empty fields; an empty `value`
    /// blanks the field. When the segment does not exist and `value` is
    /// non-empty, a new segment `TYPE|...|value` is appended to the end of
    /// the message regardless of `occurrence`.
    ///
    /// Returns `false` and leaves the message untouched when the write is
    /// refused: field number 0, or a field number so large the padded
    /// segment could not be held in memory.
    pub fn set_field(&mut self, segment_type: &str, occurrence: usize, field_num: usize, value: &str) -> bool {
        if field_num == 0 {
            debug!("ignoring write to field 0 of {segment_type}[{occurrence}]");
            return false;
        }
        let index = if segment_type == HEADER_SEGMENT {
            field_num - 1
        } else {
            field_num
        };

        match self.locate_segment(segment_type, occurrence) {
            Some(position) => {
                let Some(rebuilt) = splice_token(&self.segments[position], FIELD_SEPARATOR, index, value)
                else {
                    debug!("ignoring write to field {field_num} of {segment_type}[{occurrence}]: index out of range");
                    return false;
                };
                trace!("{segment_type}[{occurrence}] rewritten at position {position}");
                self.segments[position] = rebuilt;
            }
            None if !value.is_empty() => {
                let capacity = segment_type
                    .len()
                    .checked_add(index)
                    .and_then(|n| n.checked_add(value.len()))
                    .filter(|&n| n <= isize::MAX as usize);
                let Some(capacity) = capacity else {
                    debug!("ignoring write to field {field_num} of new {segment_type}: index out of range");
                    return false;
                };
                let mut created = String::with_capacity(capacity);
                created.push_str(segment_type);
                created.extend(std::iter::repeat(FIELD_SEPARATOR).take(index));
                created.push_str(value);
                debug!("{segment_type}[{occurrence}] not found, appending new segment");
                self.append_segment(created);
            }
            None => trace!("{segment_type}[{occurrence}] not found, nothing to clear"),
        }
        true
    }

    /// Component `component_num` (0-based) of a field.
    pub fn component(
        &self,
        segment_type: &str,
        occurrence: usize,
        field_num: usize,
        component_num: usize,
    ) -> Option<&str> {
        let field = self.field(segment_type, occurrence, field_num)?;
        token_at(field, COMPONENT_SEPARATOR, component_num)
    }

    /// Replace component `component_num` of a field with `value`.
    ///
    /// The field is rebuilt and written back through [`Message::set_field`],
    /// so a missing segment is created the same way. Returns `false` when the
    /// write is refused, as for [`Message::set_field`].
    pub fn set_component(
        &mut self,
        segment_type: &str,
        occurrence: usize,
        field_num: usize,
        component_num: usize,
        value: &str,
    ) -> bool {
        let field = self.field(segment_type, occurrence, field_num).unwrap_or("");
        let Some(rebuilt) = splice_token(field, COMPONENT_SEPARATOR, component_num, value) else {
            debug!("ignoring write to component {component_num} of {segment_type}[{occurrence}]-{field_num}: index out of range");
            return false;
        };
        self.set_field(segment_type, occurrence, field_num, &rebuilt)
    }

    /// Insert a segment line at `position`; `position == len()` appends.
    pub fn insert_segment(&mut self, segment: impl Into<String>, position: usize) -> MessageResult<()> {
        let len = self.segments.len();
        if position > len {
            return Err(MessageError::PositionOutOfRange { position, len });
        }
        let segment = segment.into();
        debug!("inserting {} segment at position {position}", segment_type_of(&segment));
        self.segments.insert(position, segment);
        Ok(())
    }

    /// Append a segment line to the end of the message.
    pub fn append_segment(&mut self, segment: impl Into<String>) {
        let segment = segment.into();
        debug!(
            "appending {} segment at position {}",
            segment_type_of(&segment),
            self.segments.len()
        );
        self.segments.push(segment);
    }

    /// Remove the `occurrence`-th segment of `segment_type`.
    ///
    /// Returns `false` and leaves the message untouched when it does not exist.
    pub fn delete_segment(&mut self, segment_type: &str, occurrence: usize) -> bool {
        match self.locate_segment(segment_type, occurrence) {
            Some(position) => {
                debug!("removing {segment_type}[{occurrence}] at position {position}");
                self.segments.remove(position);
                true
            }
            None => false,
        }
    }

    /// Wire text: segments joined by carriage returns, without a trailing one.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_char(SEGMENT_SEPARATOR)?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl From<Vec<String>> for Message {
    fn from(segments: Vec<String>) -> Self {
        Self::new(segments)
    }
}

impl FromIterator<String> for Message {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for Message {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(str::to_string).collect())
    }
}
