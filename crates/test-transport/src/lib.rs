//! A local fake chat transport for testing purpose.

pub mod preset;

use std::time::Duration;

use coursepilot_model::TransportEvent;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::time::sleep;

/// One step of a script: wait, then emit an event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Milliseconds to wait after the previous step. Falls back to the
    /// transport's default delay when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<u64>,
    /// The event to emit.
    pub event: TransportEvent,
}

/// A local fake chat transport for testing purpose.
///
/// The transport replays a fixed script of events, sleeping between steps
/// the way a streaming backend would. Steps are plain serde data, so
/// scripts can also be kept as NDJSON, one [`ScriptStep`] per line.
#[derive(Clone, Debug, Default)]
pub struct ScriptedTransport {
    script: Vec<ScriptStep>,
    delay: Option<Duration>,
}

impl ScriptedTransport {
    /// Appends a step emitted after the default delay.
    #[inline]
    pub fn add_step(&mut self, event: TransportEvent) {
        self.script.push(ScriptStep {
            delay_ms: None,
            event,
        });
    }

    /// Appends a step emitted `delay` after the previous one.
    #[inline]
    pub fn add_delayed_step(&mut self, delay: Duration, event: TransportEvent) {
        self.script.push(ScriptStep {
            delay_ms: Some(u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)),
            event,
        });
    }

    /// Sets the delay of steps that don't specify one.
    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns the script.
    #[inline]
    pub fn steps(&self) -> &[ScriptStep] {
        &self.script
    }

    /// Replays the script into `sink`.
    pub async fn play<F>(&self, mut sink: F)
    where
        F: FnMut(TransportEvent),
    {
        for step in &self.script {
            let delay = step
                .delay_ms
                .map(Duration::from_millis)
                .or(self.delay)
                .unwrap_or(Duration::ZERO);
            if !delay.is_zero() {
                sleep(delay).await;
            }
            sink(step.event.clone());
        }
    }

    /// Replays the script on a background task.
    ///
    /// The task stops early when the receiver is dropped. Must be called
    /// within a tokio runtime.
    pub fn spawn(self) -> mpsc::UnboundedReceiver<TransportEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            self.play(|event| {
                tx.send(event).ok();
            })
            .await;
        });
        rx
    }
}

#[cfg(test)]
mod tests {
    use coursepilot_model::Message;
    use tokio::time::Instant;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_play_honors_delays() {
        let mut transport = ScriptedTransport::default();
        transport.set_delay(Duration::from_millis(100));
        transport.add_step(TransportEvent::Upsert(Message::user("m1", "hi")));
        transport.add_delayed_step(Duration::from_secs(2), TransportEvent::Loading(true));
        transport.add_delayed_step(Duration::ZERO, TransportEvent::Clear);

        let start = Instant::now();
        let mut seen = Vec::new();
        transport
            .play(|event| seen.push((start.elapsed().as_millis(), event)))
            .await;

        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0].0, 100);
        assert_eq!(seen[1], (2_100, TransportEvent::Loading(true)));
        assert_eq!(seen[2], (2_100, TransportEvent::Clear));
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawn() {
        let mut transport = ScriptedTransport::default();
        transport.add_step(TransportEvent::Loading(true));
        transport.add_step(TransportEvent::Loading(false));

        let mut rx = transport.spawn();
        assert_eq!(rx.recv().await, Some(TransportEvent::Loading(true)));
        assert_eq!(rx.recv().await, Some(TransportEvent::Loading(false)));
        assert_eq!(rx.recv().await, None);
    }

    #[test]
    fn test_huge_delay_saturates() {
        let mut transport = ScriptedTransport::default();
        transport.add_delayed_step(Duration::MAX, TransportEvent::Clear);
        assert_eq!(transport.steps()[0].delay_ms, Some(u64::MAX));

        transport.add_delayed_step(Duration::from_millis(1_500), TransportEvent::Clear);
        assert_eq!(transport.steps()[1].delay_ms, Some(1_500));
    }
}
