use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::Instrument;

use super::ProgressSchedule;

/// Timers driving the checkpoints of one pending invocation.
///
/// Each step of the schedule gets its own timer, which calls `on_step` with
/// the step index once its offset has elapsed. The timers belong to this
/// guard: they are aborted by [`ProgressTimers::cancel`], and when the guard
/// is dropped, so a resolved invocation or a torn-down view never receives
/// a late callback.
#[derive(Debug, Default)]
pub struct ProgressTimers {
    handles: Vec<JoinHandle<()>>,
}

impl ProgressTimers {
    /// Starts one timer per step, counting from now.
    ///
    /// Must be called within a tokio runtime.
    pub fn arm<F>(schedule: &ProgressSchedule, on_step: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        let on_step = Arc::new(on_step);
        let start = Instant::now();
        let handles = schedule
            .steps()
            .iter()
            .enumerate()
            .map(|(idx, step)| {
                let on_step = Arc::clone(&on_step);
                let deadline = start + step.offset;
                tokio::spawn(
                    async move {
                        sleep_until(deadline).await;
                        trace!("fired");
                        on_step(idx);
                    }
                    .instrument(trace_span!("progress timer", step = idx)),
                )
            })
            .collect();
        Self { handles }
    }

    /// Returns the number of timers that have neither fired nor been
    /// cancelled.
    #[inline]
    pub fn pending(&self) -> usize {
        self.handles.iter().filter(|h| !h.is_finished()).count()
    }

    /// Cancels every timer that has not fired yet.
    pub fn cancel(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }
}

impl Drop for ProgressTimers {
    #[inline]
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use tokio::task::yield_now;
    use tokio::time::sleep;

    use super::*;

    fn spy() -> (Arc<Mutex<Vec<usize>>>, impl Fn(usize) + Send + Sync + 'static) {
        let fired = Arc::new(Mutex::new(vec![]));
        let on_step = {
            let fired = Arc::clone(&fired);
            move |idx| fired.lock().unwrap().push(idx)
        };
        (fired, on_step)
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_in_order() {
        let (fired, on_step) = spy();
        let timers = ProgressTimers::arm(&ProgressSchedule::standard(), on_step);
        yield_now().await;
        assert!(fired.lock().unwrap().is_empty());
        assert_eq!(timers.pending(), 4);

        sleep(Duration::from_millis(3_001)).await;
        assert_eq!(*fired.lock().unwrap(), [0]);

        sleep(Duration::from_secs(5)).await;
        assert_eq!(*fired.lock().unwrap(), [0, 1]);

        sleep(Duration::from_secs(10)).await;
        assert_eq!(*fired.lock().unwrap(), [0, 1, 2, 3]);
        assert_eq!(timers.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_remaining() {
        let (fired, on_step) = spy();
        let mut timers =
            ProgressTimers::arm(&ProgressSchedule::standard(), on_step);

        sleep(Duration::from_millis(3_001)).await;
        timers.cancel();
        assert_eq!(timers.pending(), 0);

        sleep(Duration::from_secs(30)).await;
        assert_eq!(*fired.lock().unwrap(), [0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels() {
        let (fired, on_step) = spy();
        let timers = ProgressTimers::arm(&ProgressSchedule::legacy(), on_step);
        drop(timers);

        sleep(Duration::from_secs(30)).await;
        assert!(fired.lock().unwrap().is_empty());
    }
}
