use serde::{Deserialize, Serialize};

use crate::message::Message;

/// A change published by the chat transport.
///
/// The transport owns the transcript; the view only ever sees it through
/// these events, applied in delivery order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum TransportEvent {
    /// A new message, or a newer snapshot of a known one.
    Upsert(Message),
    /// Whether the transport is waiting for the assistant.
    Loading(bool),
    /// The transcript has been cleared.
    Clear,
}
