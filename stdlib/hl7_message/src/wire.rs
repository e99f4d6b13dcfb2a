//! Splitting raw wire text into segment lines.
//!
//! [`Message`] itself never splits text; this module turns a received blob
//! into the line list it is built from. Output of [`Message::render`] splits
//! back into the same lines as long as no segment is blank or contains a line
//! feed; with `accept_line_feeds` and `skip_blank_lines` both off it does so
//! for any segments free of carriage returns.

use std::str::FromStr;

use log::{debug, trace};

use crate::error::{MessageError, MessageResult};
use crate::message::{is_segment, segment_type_of, Message};
use crate::separators::{HEADER_SEGMENT, SEGMENT_SEPARATOR};

/// Configuration for splitting wire text into segments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitConfig {
    /// Treat `\n` and `\r\n` as segment separators as well as `\r`
    pub accept_line_feeds: bool,
    /// Drop lines that are empty or whitespace only
    pub skip_blank_lines: bool,
    /// Reject text whose first segment is not `MSH`
    pub require_header: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            accept_line_feeds: true,
            skip_blank_lines: true,
            require_header: false,
        }
    }
}

/// Split `raw` into segment lines according to `config`.
pub fn split_segments(raw: &str, config: SplitConfig) -> Vec<String> {
    let normalised;
    let text = if config.accept_line_feeds && raw.contains('\n') {
        normalised = raw.replace("\r\n", "\r").replace('\n', "\r");
        normalised.as_str()
    } else {
        raw
    };

    let segments: Vec<String> = text
        .split(SEGMENT_SEPARATOR)
        .filter(|line| !(config.skip_blank_lines && line.trim().is_empty()))
        .map(str::to_string)
        .collect();
    trace!("split {} bytes into {} segments", raw.len(), segments.len());
    segments
}

impl Message {
    /// Parse wire text with the default [`SplitConfig`].
    pub fn parse(raw: &str) -> MessageResult<Self> {
        Self::parse_with(raw, SplitConfig::default())
    }

    /// Parse wire text with an explicit [`SplitConfig`].
    pub fn parse_with(raw: &str, config: SplitConfig) -> MessageResult<Self> {
        let segments = split_segments(raw, config);
        if config.require_header {
            let first = segments.first().ok_or(MessageError::EmptyInput)?;
            if !is_segment(first, HEADER_SEGMENT) {
                let found = segment_type_of(first);
                debug!("rejecting message starting with {found:?}");
                return Err(MessageError::MissingHeader(found.to_string()));
            }
        }
        Ok(Self::new(segments))
    }
}

impl FromStr for Message {
    type Err = MessageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
