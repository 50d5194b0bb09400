use std::time::Duration;

use coursepilot_core::model::TransportEvent;
use coursepilot_test_transport::{ScriptStep, ScriptedTransport};
use serde::Deserialize;

/// Failure to read a feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// A line is neither a transport event nor a timed script step.
    #[error("line {line}: {source}")]
    InvalidLine {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FeedLine {
    Step(ScriptStep),
    Event(TransportEvent),
}

/// Reads an NDJSON feed.
///
/// Each non-blank line is either a bare transport event, emitted right after
/// the previous one, or a script step carrying its own `delay_ms`.
pub fn parse_feed(text: &str) -> Result<ScriptedTransport, FeedError> {
    let mut transport = ScriptedTransport::default();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let parsed = serde_json::from_str(line)
            .map_err(|source| FeedError::InvalidLine {
                line: idx + 1,
                source,
            })?;
        match parsed {
            FeedLine::Step(ScriptStep {
                delay_ms: Some(delay),
                event,
            }) => transport.add_delayed_step(Duration::from_millis(delay), event),
            FeedLine::Step(ScriptStep { event, .. }) | FeedLine::Event(event) => {
                transport.add_step(event)
            }
        }
    }
    Ok(transport)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_lines() {
        let text = r#"{"type":"upsert","data":{"id":"m1","role":"user","content":"hi"}}

{"delay_ms":1500,"event":{"type":"loading","data":true}}
{"type":"clear"}
"#;
        let transport = parse_feed(text).unwrap();
        let steps = transport.steps();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].delay_ms, None);
        assert_eq!(steps[1].delay_ms, Some(1500));
        assert_eq!(steps[1].event, TransportEvent::Loading(true));
        assert_eq!(steps[2].event, TransportEvent::Clear);
    }

    #[test]
    fn test_bad_line_reports_number() {
        let err = parse_feed("{\"type\":\"clear\"}\n{\"type\":\"explode\"}").unwrap_err();
        let FeedError::InvalidLine { line, .. } = err;
        assert_eq!(line, 2);

        let err = parse_feed("nope").unwrap_err();
        assert!(err.to_string().starts_with("line 1: "));
    }
}
