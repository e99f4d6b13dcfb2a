//! Error types for message operations and location parsing.

use thiserror::Error;

/// Errors raised by structural operations on a [`crate::Message`].
///
/// Lookups that find nothing return `None`; these variants cover caller
/// input outside the documented contract.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MessageError {
    /// Insert position lies past the end of the segment list
    #[error("segment position {position} is out of range for a message of {len} segments")]
    PositionOutOfRange {
        /// Requested position
        position: usize,
        /// Segment count at the time of the call
        len: usize,
    },

    /// Wire text held no segments
    #[error("message text contains no segments")]
    EmptyInput,

    /// First segment is not the message header
    #[error("message must start with an MSH segment, found {0:?}")]
    MissingHeader(String),
}

/// Result type for message operations
pub type MessageResult<T> = Result<T, MessageError>;

/// Errors that can occur while parsing a location such as `PID-5.1`
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    /// Nothing to parse
    #[error("location is empty")]
    Empty,

    /// Segment id is not three uppercase letters or digits
    #[error("invalid segment id: {0}")]
    InvalidSegment(String),

    /// Occurrences are counted from 1
    #[error("occurrence must be 1 or greater")]
    ZeroOccurrence,

    /// Fields are counted from 1
    #[error("field number must be 1 or greater")]
    ZeroField,

    /// Input left over after a complete location
    #[error("unexpected input after location: {0:?}")]
    TrailingInput(String),

    /// Generic parsing error
    #[error("failed to parse location: {0}")]
    Syntax(String),
}

/// Result type for location parsing
pub type AddressResult<T> = Result<T, AddressError>;
