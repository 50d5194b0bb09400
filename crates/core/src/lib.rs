//! Transcript state, tool-call progress and result rendering for the course
//! assistant chat.
//!
//! The upstream chat transport owns the conversation. This crate keeps a
//! read-mostly copy of it in a [`TranscriptView`], tracks where each tool
//! invocation is in its lifecycle, animates a staged progress indicator
//! while a call is pending, and turns finished results into renderable
//! [`Block`]s through a [`Registry`] of result views.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod config;
pub mod frame;
pub mod layout;
pub mod progress;
pub mod render;
pub mod transcript;
mod view;

pub use config::{
    ProgressVariant, UnknownVariantError, ViewConfig, ViewConfigBuilder,
};
pub use frame::Frame;
pub use render::{Block, Registry, ResultView};
pub use transcript::Transcript;
pub use view::{TranscriptView, TranscriptViewBuilder, ViewClosedError};

/// Re-exports of [`coursepilot_model`] crate.
pub mod model {
    pub use coursepilot_model::*;
}
