//! Positional navigation and mutation of HL7 v2 messages.
//!
//! A [`Message`] holds segment lines in wire order and addresses them by
//! segment type and occurrence, then by field, then by component. Field and
//! component content is opaque text; nothing is validated or interpreted.
//!
//! Field access with the `MSH` header offset:
//! ```
//! use hl7_message::Message;
//! let msg = Message::from_iter(["MSH|^~\\&|APP|FAC", "PID|||123||DOE^JOHN"]);
//! assert_eq!(msg.field("MSH", 1, 1), Some("|"));
//! assert_eq!(msg.field("MSH", 1, 3), Some("APP"));
//! assert_eq!(msg.component("PID", 1, 5, 1), Some("JOHN"));
//! ```
//!
//! Writes, location strings and rendering:
//! ```
//! use hl7_message::{Location, Message};
//! let mut msg = Message::parse("MSH|^~\\&|APP\rPID|||123||DOE^JOHN").unwrap();
//! let given: Location = "PID-5.1".parse().unwrap();
//! msg.set(&given, "JANE");
//! msg.set_field("ZZZ", 1, 2, "VAL");
//! assert_eq!(msg.render(), "MSH|^~\\&|APP\rPID|||123||DOE^JANE\rZZZ||VAL");
//! ```

#![warn(missing_docs)]

pub mod address;
pub mod error;
pub mod message;
pub mod separators;
mod tokens;
pub mod wire;

pub use address::Location;
pub use error::{AddressError, AddressResult, MessageError, MessageResult};
pub use message::Message;
pub use wire::{split_segments, SplitConfig};
