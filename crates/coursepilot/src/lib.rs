//! Terminal front end for the course assistant transcript view.
//!
//! The crate includes the `coursepilot` CLI, which plays a chat transport
//! feed through a [`core::TranscriptView`] and paints every frame to the
//! terminal. The pieces it is made of are exposed here as a library.

#![deny(missing_docs)]

#[allow(unused_imports)]
#[macro_use]
extern crate tracing;

mod feed;
mod input;
mod terminal;

pub use feed::{FeedError, parse_feed};
pub use input::{Input, InputError, parse_input};
pub use terminal::Painter;

/// Re-exports of [`coursepilot_core`] crate.
pub mod core {
    pub use coursepilot_core::*;
}

/// Re-exports of [`coursepilot_test_transport`] crate.
pub mod transport {
    pub use coursepilot_test_transport::*;
}
