//! A rendered snapshot of the transcript.

use crate::config::ViewConfig;
use crate::model::{Attachment, Message};
use crate::render::{Block, Registry, RenderContext, dispatch};
use crate::transcript::Transcript;

/// Everything the view shows at one point in time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    /// Messages in transcript order.
    pub messages: Vec<RenderedMessage>,
    /// Whether to show the "Thinking..." placeholder after the last message.
    pub thinking: bool,
}

/// How a message is laid out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Bubble {
    /// Right-aligned bubble.
    User,
    /// Inline, next to the assistant icon.
    Assistant,
}

/// One rendered message.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedMessage {
    /// Message id.
    pub id: String,
    /// Layout treatment.
    pub bubble: Bubble,
    /// Text body, if there is any.
    pub text: Option<String>,
    /// Tool invocations in call order.
    pub tools: Vec<RenderedTool>,
    /// Attachment previews.
    pub attachments: Vec<AttachmentPreview>,
}

/// One rendered tool invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedTool {
    /// Call id.
    pub tool_call_id: String,
    /// Tool name.
    pub tool_name: String,
    /// Whether the call is still awaiting its result.
    pub pending: bool,
    /// What to show, if anything.
    pub block: Option<Block>,
}

/// A one-line preview of an attachment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttachmentPreview {
    /// Name, or the URL if the attachment has no name.
    pub label: String,
    /// MIME type, if known.
    pub content_type: Option<String>,
    /// Where the content lives.
    pub url: String,
}

impl From<&Attachment> for AttachmentPreview {
    fn from(attachment: &Attachment) -> Self {
        Self {
            label: attachment.label().to_owned(),
            content_type: attachment.content_type.clone(),
            url: attachment.url.clone(),
        }
    }
}

impl Frame {
    pub(crate) fn build<'a, F>(
        transcript: &Transcript,
        registry: &Registry,
        config: &ViewConfig,
        loading: bool,
        context_for: F,
    ) -> Self
    where
        F: Fn(&str) -> RenderContext<'a>,
    {
        let messages = transcript
            .messages()
            .iter()
            .map(|msg| render_message(msg, registry, config, &context_for))
            .collect();
        let thinking = config.thinking_indicator
            && loading
            && transcript.last_role().is_some_and(|role| role.is_user());
        Self { messages, thinking }
    }

    /// Looks up a rendered invocation by call id.
    pub fn tool(&self, tool_call_id: &str) -> Option<&RenderedTool> {
        self.messages
            .iter()
            .flat_map(|msg| &msg.tools)
            .find(|tool| tool.tool_call_id == tool_call_id)
    }

    /// Returns `true` if any invocation is awaiting its result.
    pub fn has_pending(&self) -> bool {
        self.messages
            .iter()
            .flat_map(|msg| &msg.tools)
            .any(|tool| tool.pending)
    }
}

fn render_message<'a, F>(
    msg: &Message,
    registry: &Registry,
    config: &ViewConfig,
    context_for: &F,
) -> RenderedMessage
where
    F: Fn(&str) -> RenderContext<'a>,
{
    let bubble = if msg.role.is_user() {
        Bubble::User
    } else {
        Bubble::Assistant
    };
    let tools = msg
        .tool_invocations
        .iter()
        .map(|inv| {
            let ctx = context_for(&inv.tool_call_id);
            RenderedTool {
                tool_call_id: inv.tool_call_id.clone(),
                tool_name: inv.tool_name.clone(),
                pending: inv.state.is_pending(),
                block: dispatch(registry, &config.schedule, inv, &ctx),
            }
        })
        .collect();
    RenderedMessage {
        id: msg.id.clone(),
        bubble,
        text: msg.text().map(ToOwned::to_owned),
        tools,
        attachments: msg.attachments.iter().map(AttachmentPreview::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::ToolInvocation;

    fn build(transcript: &Transcript, loading: bool) -> Frame {
        Frame::build(
            transcript,
            &Registry::standard(),
            &ViewConfig::default(),
            loading,
            |_| RenderContext::default(),
        )
    }

    #[test]
    fn test_no_tools_renders_no_tool_region() {
        let mut transcript = Transcript::default();
        transcript.apply(Message::user("m1", "hello"));
        transcript.apply(Message::assistant("m2").with_content("Hi! Which course?"));
        let frame = build(&transcript, false);
        assert_eq!(frame.messages.len(), 2);
        assert!(frame.messages.iter().all(|msg| msg.tools.is_empty()));
        assert_eq!(frame.messages[0].bubble, Bubble::User);
        assert_eq!(frame.messages[1].bubble, Bubble::Assistant);
        assert!(!frame.has_pending());
    }

    #[test]
    fn test_thinking_only_after_user_turn() {
        let mut transcript = Transcript::default();
        transcript.apply(Message::user("m1", "hello"));
        assert!(build(&transcript, true).thinking);
        assert!(!build(&transcript, false).thinking);

        transcript.apply(Message::assistant("m2"));
        assert!(!build(&transcript, true).thinking);
    }

    #[test]
    fn test_tools_and_attachments() {
        let mut transcript = Transcript::default();
        transcript.apply(
            Message::user("m1", "see attached")
                .with_attachment(crate::model::Attachment::with_url("https://x/a.png")),
        );
        transcript.apply(
            Message::assistant("m2")
                .with_tool_invocation(ToolInvocation::call("call_1", "get_course_info"))
                .with_tool_invocation(
                    ToolInvocation::call("call_2", "lookup").with_result(json!({ "ok": true })),
                ),
        );
        let frame = build(&transcript, false);
        assert_eq!(frame.messages[0].attachments[0].label, "https://x/a.png");
        assert!(frame.has_pending());
        assert!(frame.tool("call_1").unwrap().pending);
        assert!(matches!(
            frame.tool("call_2").unwrap().block,
            Some(Block::Json(_))
        ));
        assert_eq!(frame.tool("call_3"), None);
    }
}
