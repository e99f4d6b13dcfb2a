//! Fixed HL7 v2 delimiter characters.
//!
//! Delimiters are not negotiated from `MSH-2`; every message handled by this
//! crate uses the standard set.

/// Separates fields within a segment.
pub const FIELD_SEPARATOR: char = '|';

/// Separates components within a field.
pub const COMPONENT_SEPARATOR: char = '^';

/// Separates repetitions of a field.
pub const REPETITION_SEPARATOR: char = '~';

/// Introduces an escape sequence.
pub const ESCAPE_CHARACTER: char = '\\';

/// Separates sub-components within a component. Carried for completeness,
/// no addressing operation splits on it.
pub const SUBCOMPONENT_SEPARATOR: char = '&';

/// Separates segments on the wire.
pub const SEGMENT_SEPARATOR: char = '\r';

/// Segment type of the message header.
pub const HEADER_SEGMENT: &str = "MSH";

/// Encoding characters as they appear in `MSH-2`.
pub const ENCODING_CHARACTERS: &str = "^~\\&";
