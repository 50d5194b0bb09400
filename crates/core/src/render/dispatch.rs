use serde_json::Value;

use super::{Block, ProgressBlock, Registry, RenderContext};
use crate::model::{ToolInvocation, ToolState};
use crate::progress::{ProgressSchedule, StagedProgress};

/// Picks what to show for one tool invocation.
///
/// The outcome depends only on the invocation and the view-local context.
/// Errors are contained here: a payload that fails to parse renders nothing
/// and never affects other invocations.
pub fn dispatch(
    registry: &Registry,
    schedule: &ProgressSchedule,
    invocation: &ToolInvocation,
    ctx: &RenderContext<'_>,
) -> Option<Block> {
    let span = trace_span!("dispatch", id = %invocation.tool_call_id);
    let _enter = span.enter();

    let view = registry.get(&invocation.tool_name);
    match &invocation.state {
        ToolState::PartialCall => view.and_then(|view| view.skeleton()),
        ToolState::Call => Some(progress_block(schedule, ctx.progress)),
        ToolState::Result { result } => {
            let Some(view) = view else {
                trace!("no view for {}, dumping json", invocation.tool_name);
                return json_block(result);
            };
            match view.render_value(result, ctx) {
                Ok(block) => block,
                Err(err) => {
                    warn!("cannot render {} result: {err}", invocation.tool_name);
                    None
                }
            }
        }
        ToolState::Error { error } => {
            let error = error.trim();
            let message = if error.is_empty() {
                format!("{} failed", invocation.tool_name)
            } else {
                error.to_owned()
            };
            Some(Block::Notice(message))
        }
    }
}

fn progress_block(
    schedule: &ProgressSchedule,
    progress: Option<&StagedProgress>,
) -> Block {
    let steps = schedule
        .steps()
        .iter()
        .enumerate()
        .map(|(idx, step)| {
            let done = progress.is_some_and(|p| p.is_done(idx));
            (step.label.to_string(), done)
        })
        .collect();
    Block::Progress(ProgressBlock { steps })
}

#[inline]
fn json_block(result: &Value) -> Option<Block> {
    match serde_json::to_string_pretty(result) {
        Ok(text) => Some(Block::Json(escape_controls(&text))),
        Err(err) => {
            warn!("cannot serialize result: {err}");
            None
        }
    }
}

/// Escapes DEL and the C1 controls, which serde_json leaves raw.
///
/// Such characters can only occur inside JSON strings, where `\u00XX` is
/// an equivalent spelling.
fn escape_controls(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ('\u{7f}'..='\u{9f}').contains(&ch) {
            out.push_str(&format!("\\u{:04x}", ch as u32));
        } else {
            out.push(ch);
        }
    }
    out
}
