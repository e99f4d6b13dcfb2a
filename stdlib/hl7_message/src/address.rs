//! Terse location strings such as `PID-5`, `AL1[2]-3.1` or `MSH-9.0`.
//!
//! Grammar: `SEG [ '[' occurrence ']' ] [ '-' field [ '.' component ] ]`.
//! Occurrence defaults to 1 and counts from 1, fields count from 1 and
//! components from 0, matching [`Message`] addressing.

use std::fmt;
use std::str::FromStr;

use log::debug;
use nom::{
    bytes::complete::take_while_m_n,
    character::complete::{char, digit1},
    combinator::{map_res, opt},
    sequence::{delimited, preceded},
    IResult,
};

use crate::error::{AddressError, AddressResult};
use crate::message::Message;

/// A parsed location inside a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Three character segment type
    pub segment: String,
    /// 1-based occurrence of the segment
    pub occurrence: usize,
    /// 1-based field number, if the location goes below segment level
    pub field: Option<usize>,
    /// 0-based component number within the field
    pub component: Option<usize>,
}

fn segment_id(input: &str) -> IResult<&str, &str> {
    take_while_m_n(3, 3, |c: char| c.is_ascii_uppercase() || c.is_ascii_digit())(input)
}

fn number(input: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse::<usize>)(input)
}

fn occurrence(input: &str) -> IResult<&str, Option<usize>> {
    opt(delimited(char('['), number, char(']')))(input)
}

fn field_number(input: &str) -> IResult<&str, Option<usize>> {
    opt(preceded(char('-'), number))(input)
}

fn component_number(input: &str) -> IResult<&str, Option<usize>> {
    opt(preceded(char('.'), number))(input)
}

fn syntax(err: nom::Err<nom::error::Error<&str>>) -> AddressError {
    AddressError::Syntax(err.to_string())
}

impl Location {
    /// Location of a whole segment.
    pub fn segment(segment: impl Into<String>, occurrence: usize) -> Self {
        Self {
            segment: segment.into(),
            occurrence,
            field: None,
            component: None,
        }
    }

    /// Location of a field.
    pub fn field(segment: impl Into<String>, occurrence: usize, field: usize) -> Self {
        Self {
            field: Some(field),
            ..Self::segment(segment, occurrence)
        }
    }

    /// Location of a component.
    pub fn component(
        segment: impl Into<String>,
        occurrence: usize,
        field: usize,
        component: usize,
    ) -> Self {
        Self {
            component: Some(component),
            ..Self::field(segment, occurrence, field)
        }
    }

    /// Parse a location string.
    pub fn parse(input: &str) -> AddressResult<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(AddressError::Empty);
        }

        let invalid_segment = || {
            let id: String = input
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric())
                .collect();
            AddressError::InvalidSegment(if id.is_empty() { input.to_string() } else { id })
        };
        let (rest, segment) = segment_id(input).map_err(|_| invalid_segment())?;
        if rest.starts_with(|c: char| c.is_ascii_alphanumeric()) {
            return Err(invalid_segment());
        }

        let (rest, occurrence) = occurrence(rest).map_err(syntax)?;
        if occurrence == Some(0) {
            return Err(AddressError::ZeroOccurrence);
        }

        let (rest, field) = field_number(rest).map_err(syntax)?;
        if field == Some(0) {
            return Err(AddressError::ZeroField);
        }

        let (rest, component) = match field {
            Some(_) => component_number(rest).map_err(syntax)?,
            None => (rest, None),
        };

        if !rest.is_empty() {
            return Err(AddressError::TrailingInput(rest.to_string()));
        }

        Ok(Self {
            segment: segment.to_string(),
            occurrence: occurrence.unwrap_or(1),
            field,
            component,
        })
    }
}

impl FromStr for Location {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segment)?;
        if self.occurrence != 1 {
            write!(f, "[{}]", self.occurrence)?;
        }
        if let Some(field) = self.field {
            write!(f, "-{field}")?;
            if let Some(component) = self.component {
                write!(f, ".{component}")?;
            }
        }
        Ok(())
    }
}

impl Message {
    /// Read the segment, field or component a [`Location`] points at.
    pub fn get(&self, location: &Location) -> Option<&str> {
        let Location {
            segment,
            occurrence,
            field,
            component,
        } = location;
        match (field, component) {
            (None, _) => self.segment(segment, *occurrence),
            (Some(field), None) => self.field(segment, *occurrence, *field),
            (Some(field), Some(component)) => {
                self.component(segment, *occurrence, *field, *component)
            }
        }
    }

    /// Write `value` at a field or component [`Location`].
    ///
    /// Whole-segment locations are not writable. `false` is returned and the
    /// message is left unchanged for those and for any write refused by
    /// [`Message::set_field`].
    pub fn set(&mut self, location: &Location, value: &str) -> bool {
        let Location {
            segment,
            occurrence,
            field,
            component,
        } = location;
        match (field, component) {
            (None, _) => {
                debug!("refusing to overwrite whole segment at {location}");
                false
            }
            (Some(field), None) => self.set_field(segment, *occurrence, *field, value),
            (Some(field), Some(component)) => {
                self.set_component(segment, *occurrence, *field, *component, value)
            }
        }
    }
}
