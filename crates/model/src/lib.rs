//! Data types shared between the chat transport and the transcript view.
//!
//! This crate mirrors the shapes the upstream chat transport and the
//! course-info service put on the wire. Field names follow the producers
//! exactly (including keys such as `"Course No."` or `"A- (%)"`), so values
//! can be exchanged with them without any mapping layer.
//!
//! Types in this crate don't define any rendering behavior. The only logic
//! here is (de)serialization and the one-shot normalization of tool result
//! payloads in [`CombinedInfo::from_payload`].

#![deny(missing_docs)]

mod course;
mod event;
mod lenient;
mod message;
mod payload;
mod tool;

pub use course::*;
pub use event::*;
pub use message::*;
pub use payload::*;
pub use tool::*;
