use serde::{Deserialize, Serialize};

use crate::lenient;
use crate::tool::ToolInvocation;

/// The author of a conversational turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A turn typed by the student.
    User,
    /// A turn produced by the assistant, including its tool activity.
    Assistant,
    /// Any role the transport may add later (`system`, `data`, ...).
    ///
    /// These are laid out like assistant turns.
    #[serde(other)]
    Other,
}

impl Role {
    /// Returns `true` if turns of this role are laid out as a right-aligned
    /// bubble rather than inline with the assistant icon.
    #[inline]
    pub fn is_user(self) -> bool {
        matches!(self, Role::User)
    }
}

/// One conversational turn, as delivered by the chat transport.
///
/// A message is immutable once delivered, except that the transport may
/// deliver it again (same `id`) with its tool invocations advanced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Identifier assigned by the transport, stable across updates.
    pub id: String,
    /// Who authored this turn.
    pub role: Role,
    /// The text body, absent for turns that are pure tool activity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Tool invocations in call order.
    #[serde(
        default,
        deserialize_with = "lenient::null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tool_invocations: Vec<ToolInvocation>,
    /// Attachments referenced by this turn.
    #[serde(
        default,
        rename = "experimental_attachments",
        alias = "attachments",
        deserialize_with = "lenient::null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub attachments: Vec<Attachment>,
}

impl Message {
    /// Creates a user message with the given text.
    #[inline]
    pub fn user<I: Into<String>, S: Into<String>>(id: I, content: S) -> Self {
        Self {
            id: id.into(),
            role: Role::User,
            content: Some(content.into()),
            tool_invocations: vec![],
            attachments: vec![],
        }
    }

    /// Creates an empty assistant message.
    #[inline]
    pub fn assistant<I: Into<String>>(id: I) -> Self {
        Self {
            id: id.into(),
            role: Role::Assistant,
            content: None,
            tool_invocations: vec![],
            attachments: vec![],
        }
    }

    /// Sets the text body.
    #[inline]
    pub fn with_content<S: Into<String>>(mut self, content: S) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Appends a tool invocation.
    #[inline]
    pub fn with_tool_invocation(mut self, invocation: ToolInvocation) -> Self {
        self.tool_invocations.push(invocation);
        self
    }

    /// Appends an attachment.
    #[inline]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Returns the text body if there is anything to show.
    #[inline]
    pub fn text(&self) -> Option<&str> {
        self.content.as_deref().filter(|text| !text.trim().is_empty())
    }

    /// Looks up a tool invocation by its call id.
    pub fn tool_invocation(&self, tool_call_id: &str) -> Option<&ToolInvocation> {
        self.tool_invocations
            .iter()
            .find(|inv| inv.tool_call_id == tool_call_id)
    }
}

/// A reference to externally hosted content attached to a turn.
///
/// Only the reference is held here; the content itself is never fetched.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Where the content lives.
    pub url: String,
    /// Display name, usually the original file name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// MIME type reported by the uploader.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl Attachment {
    /// Creates an attachment that only carries a URL.
    #[inline]
    pub fn with_url<S: Into<String>>(url: S) -> Self {
        Self {
            url: url.into(),
            name: None,
            content_type: None,
        }
    }

    /// Returns the label shown in previews: the name if present, otherwise
    /// the URL.
    #[inline]
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.url)
    }
}
