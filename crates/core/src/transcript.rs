//! The local copy of the conversation.

use std::collections::HashSet;

use crate::model::{Message, Role, ToolInvocation};

/// A change in whether a tool invocation is pending.
///
/// The view arms progress timers on [`ToolTransition::Pending`] and drops
/// them on [`ToolTransition::Settled`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ToolTransition {
    /// The invocation entered the `call` state.
    Pending {
        /// The invocation's call id.
        tool_call_id: String,
    },
    /// The invocation left the `call` state for a terminal one.
    Settled {
        /// The invocation's call id.
        tool_call_id: String,
    },
}

/// Ordered messages, as last delivered by the transport.
///
/// Messages are keyed by id. Delivering a known id again replaces its
/// text and attachments and merges its tool invocations; tool states only
/// ever move forward.
#[derive(Clone, Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Returns the messages in delivery order.
    #[inline]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the number of messages.
    #[inline]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` if there are no messages.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns the role of the latest message.
    #[inline]
    pub fn last_role(&self) -> Option<Role> {
        self.messages.last().map(|msg| msg.role)
    }

    /// Looks up a tool invocation by call id across all messages.
    pub fn invocation(&self, tool_call_id: &str) -> Option<&ToolInvocation> {
        self.messages
            .iter()
            .find_map(|msg| msg.tool_invocation(tool_call_id))
    }

    /// Returns every invocation currently in the `call` state.
    pub fn pending(&self) -> impl Iterator<Item = &ToolInvocation> {
        self.messages
            .iter()
            .flat_map(|msg| &msg.tool_invocations)
            .filter(|inv| inv.state.is_pending())
    }

    /// Applies a delivered message and reports which invocations started or
    /// stopped being pending.
    pub fn apply(&mut self, mut incoming: Message) -> Vec<ToolTransition> {
        dedup_invocations(&mut incoming);

        let mut transitions = vec![];
        let Some(pos) = self.messages.iter().position(|msg| msg.id == incoming.id)
        else {
            trace!("new message {}", incoming.id);
            transitions.extend(
                incoming
                    .tool_invocations
                    .iter()
                    .filter(|inv| inv.state.is_pending())
                    .map(|inv| ToolTransition::Pending {
                        tool_call_id: inv.tool_call_id.clone(),
                    }),
            );
            self.messages.push(incoming);
            return transitions;
        };

        let existing = &mut self.messages[pos];
        trace!("updating message {}", existing.id);
        if existing.role != incoming.role {
            warn!(
                "message {} changed role from {:?} to {:?}, keeping the original",
                existing.id, existing.role, incoming.role
            );
        }
        existing.content = incoming.content;
        existing.attachments = incoming.attachments;

        for next in incoming.tool_invocations {
            let Some(idx) = existing
                .tool_invocations
                .iter()
                .position(|inv| inv.tool_call_id == next.tool_call_id)
            else {
                if next.state.is_pending() {
                    transitions.push(ToolTransition::Pending {
                        tool_call_id: next.tool_call_id.clone(),
                    });
                }
                existing.tool_invocations.push(next);
                continue;
            };

            let current = &mut existing.tool_invocations[idx];
            let was_pending = current.state.is_pending();
            match current.advance(&next) {
                Ok(false) => {}
                Ok(true) => {
                    let tool_call_id = current.tool_call_id.clone();
                    match (was_pending, current.state.is_pending()) {
                        (false, true) => {
                            transitions.push(ToolTransition::Pending { tool_call_id })
                        }
                        (true, false) => {
                            transitions.push(ToolTransition::Settled { tool_call_id })
                        }
                        _ => {}
                    }
                }
                Err(err) => {
                    warn!("ignoring update of {}: {err}", next.tool_call_id);
                }
            }
        }
        transitions
    }

    /// Removes every message.
    #[inline]
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

fn dedup_invocations(msg: &mut Message) {
    let mut seen = HashSet::new();
    msg.tool_invocations.retain(|inv| {
        let first = seen.insert(inv.tool_call_id.clone());
        if !first {
            warn!(
                "duplicate tool call id {} in message {}, keeping the first",
                inv.tool_call_id, msg.id
            );
        }
        first
    });
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::ToolState;

    fn pending(id: &str) -> ToolTransition {
        ToolTransition::Pending {
            tool_call_id: id.to_owned(),
        }
    }

    fn settled(id: &str) -> ToolTransition {
        ToolTransition::Settled {
            tool_call_id: id.to_owned(),
        }
    }

    fn assistant_with(inv: ToolInvocation) -> Message {
        Message::assistant("m2").with_tool_invocation(inv)
    }

    #[test]
    fn test_append_and_resolve() {
        let mut transcript = Transcript::default();
        assert!(
            transcript
                .apply(Message::user("m1", "Best prof for CS 3114?"))
                .is_empty()
        );

        let call = ToolInvocation::call("call_1", "get_course_info");
        assert_eq!(
            transcript.apply(assistant_with(call.clone())),
            [pending("call_1")]
        );
        assert_eq!(transcript.pending().count(), 1);

        let resolved = call.with_result(json!([]));
        assert_eq!(
            transcript.apply(assistant_with(resolved).with_content("Here you go")),
            [settled("call_1")]
        );
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.pending().count(), 0);
        assert_eq!(transcript.messages()[1].text(), Some("Here you go"));
        assert_eq!(transcript.last_role(), Some(Role::Assistant));
    }

    #[test]
    fn test_stale_update_is_ignored() {
        let mut transcript = Transcript::default();
        let call = ToolInvocation::call("call_1", "get_course_info");
        transcript.apply(assistant_with(call.clone().with_result(json!([1]))));

        assert!(transcript.apply(assistant_with(call.clone())).is_empty());
        assert!(
            transcript
                .apply(assistant_with(call.with_result(json!([2]))))
                .is_empty()
        );
        assert_eq!(
            transcript.invocation("call_1").unwrap().result(),
            Some(&json!([1]))
        );
    }

    #[test]
    fn test_partial_call_then_call() {
        let mut transcript = Transcript::default();
        let mut partial = ToolInvocation::call("call_1", "get_course_info");
        partial.state = ToolState::PartialCall;
        assert!(transcript.apply(assistant_with(partial)).is_empty());

        let call = ToolInvocation::call("call_1", "get_course_info")
            .with_args(json!({ "course": "CS 3114" }));
        assert_eq!(transcript.apply(assistant_with(call)), [pending("call_1")]);
        assert_eq!(
            transcript.invocation("call_1").unwrap().args,
            json!({ "course": "CS 3114" })
        );
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let mut transcript = Transcript::default();
        let msg = Message::assistant("m2")
            .with_tool_invocation(ToolInvocation::call("call_1", "first"))
            .with_tool_invocation(ToolInvocation::call("call_1", "second"));
        assert_eq!(transcript.apply(msg), [pending("call_1")]);
        let stored = &transcript.messages()[0];
        assert_eq!(stored.tool_invocations.len(), 1);
        assert_eq!(stored.tool_invocations[0].tool_name, "first");
    }

    #[test]
    fn test_missing_invocations_are_kept() {
        let mut transcript = Transcript::default();
        transcript.apply(assistant_with(ToolInvocation::call("call_1", "get_course_info")));
        assert!(
            transcript
                .apply(Message::assistant("m2").with_content("Working on it"))
                .is_empty()
        );
        assert!(transcript.invocation("call_1").is_some());
        assert_eq!(transcript.messages()[0].text(), Some("Working on it"));
    }

    #[test]
    fn test_clear() {
        let mut transcript = Transcript::default();
        transcript.apply(Message::user("m1", "hi"));
        transcript.clear();
        assert!(transcript.is_empty());
        assert_eq!(transcript.last_role(), None);
    }
}
