//! The staged progress indicator shown while a tool call is pending.
//!
//! The course-info backend does not report how far along it is, so the
//! view walks through a fixed schedule of checkpoints on its own clock.
//! The checkpoints say nothing about real progress and never hold back the
//! actual result.

mod timers;

use std::borrow::Cow;
use std::time::Duration;

pub use timers::ProgressTimers;

/// One checkpoint of a [`ProgressSchedule`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProgressStep {
    /// Text shown next to the checkpoint.
    pub label: Cow<'static, str>,
    /// Time after the call was dispatched at which the checkpoint is done.
    pub offset: Duration,
}

impl ProgressStep {
    /// Creates a checkpoint.
    #[inline]
    pub fn new<S: Into<Cow<'static, str>>>(label: S, offset: Duration) -> Self {
        Self {
            label: label.into(),
            offset,
        }
    }
}

/// A fixed sequence of checkpoints, ordered by offset.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProgressSchedule {
    steps: Vec<ProgressStep>,
}

impl ProgressSchedule {
    /// Creates a schedule. Steps are sorted by offset; steps sharing an
    /// offset keep their given order.
    pub fn new(steps: impl Into<Vec<ProgressStep>>) -> Self {
        let mut steps = steps.into();
        steps.sort_by_key(|step| step.offset);
        Self { steps }
    }

    /// The four-step schedule: +3s, +8s, +13s, +18s.
    pub fn standard() -> Self {
        Self::new([
            ProgressStep::new(
                "Looking for University DataCommons...",
                Duration::from_secs(3),
            ),
            ProgressStep::new(
                "Looking for Rate My Professor...",
                Duration::from_secs(8),
            ),
            ProgressStep::new("Combining information...", Duration::from_secs(13)),
            ProgressStep::new(
                "Preparing recommendations...",
                Duration::from_secs(18),
            ),
        ])
    }

    /// The older three-step schedule: +0s, +5s, +10s.
    pub fn legacy() -> Self {
        Self::new([
            ProgressStep::new(
                "Looking for University DataCommons...",
                Duration::ZERO,
            ),
            ProgressStep::new(
                "Looking for Rate My Professor...",
                Duration::from_secs(5),
            ),
            ProgressStep::new("Combining information...", Duration::from_secs(10)),
        ])
    }

    /// Returns the steps in firing order.
    #[inline]
    pub fn steps(&self) -> &[ProgressStep] {
        &self.steps
    }

    /// Returns the number of steps.
    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if the schedule has no steps.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Default for ProgressSchedule {
    #[inline]
    fn default() -> Self {
        Self::standard()
    }
}

/// Checkpoint state of one pending invocation.
///
/// Checkpoints only ever go from "not done" to "done", and always in
/// schedule order: if checkpoint `i` is done, every checkpoint before it is
/// done too.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct StagedProgress {
    done: Vec<bool>,
}

impl StagedProgress {
    /// Creates a state with `len` checkpoints, none of them done.
    #[inline]
    pub fn new(len: usize) -> Self {
        Self {
            done: vec![false; len],
        }
    }

    /// Returns the state a schedule reaches after `elapsed`.
    pub fn at(schedule: &ProgressSchedule, elapsed: Duration) -> Self {
        let mut progress = Self::new(schedule.len());
        for (idx, step) in schedule.steps().iter().enumerate() {
            if step.offset <= elapsed {
                progress.mark(idx);
            }
        }
        progress
    }

    /// Marks checkpoint `index` done.
    ///
    /// Any earlier checkpoint still open is marked as well, so the order
    /// holds even if timers with equal offsets fire out of order. Returns
    /// `true` if anything changed.
    pub fn mark(&mut self, index: usize) -> bool {
        let Some(upto) = self.done.get_mut(..=index) else {
            return false;
        };
        let changed = upto.iter().any(|done| !done);
        upto.fill(true);
        changed
    }

    /// Returns the number of done checkpoints.
    #[inline]
    pub fn done_count(&self) -> usize {
        self.done.iter().take_while(|done| **done).count()
    }

    /// Returns whether checkpoint `index` is done.
    #[inline]
    pub fn is_done(&self, index: usize) -> bool {
        self.done.get(index).copied().unwrap_or(false)
    }

    /// Returns `true` once every checkpoint is done.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.done.iter().all(|done| *done)
    }

    /// Returns the checkpoint flags in schedule order.
    #[inline]
    pub fn checkpoints(&self) -> &[bool] {
        &self.done
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedules() {
        let offsets: Vec<_> = ProgressSchedule::standard()
            .steps()
            .iter()
            .map(|step| step.offset.as_secs())
            .collect();
        assert_eq!(offsets, [3, 8, 13, 18]);

        let offsets: Vec<_> = ProgressSchedule::legacy()
            .steps()
            .iter()
            .map(|step| step.offset.as_secs())
            .collect();
        assert_eq!(offsets, [0, 5, 10]);
    }

    #[test]
    fn test_schedule_sorted() {
        let schedule = ProgressSchedule::new([
            ProgressStep::new("late", Duration::from_secs(9)),
            ProgressStep::new("early", Duration::from_secs(1)),
        ]);
        assert_eq!(schedule.steps()[0].label, "early");
    }

    #[test]
    fn test_progress_at() {
        let schedule = ProgressSchedule::standard();
        let cases = [
            (0, [false, false, false, false]),
            (2_999, [false, false, false, false]),
            (3_000, [true, false, false, false]),
            (8_000, [true, true, false, false]),
            (12_999, [true, true, false, false]),
            (18_000, [true, true, true, true]),
            (60_000, [true, true, true, true]),
        ];
        for (millis, expected) in cases {
            let progress =
                StagedProgress::at(&schedule, Duration::from_millis(millis));
            assert_eq!(progress.checkpoints(), expected, "at {millis}ms");
        }
    }

    #[test]
    fn test_mark_is_monotonic() {
        let mut progress = StagedProgress::new(4);
        assert_eq!(progress.done_count(), 0);

        assert!(progress.mark(0));
        assert!(!progress.mark(0));
        assert_eq!(progress.checkpoints(), [true, false, false, false]);

        assert!(progress.mark(2));
        assert_eq!(progress.done_count(), 3);
        assert!(!progress.mark(1));
        assert!(!progress.is_complete());

        assert!(!progress.mark(7));
        assert!(progress.mark(3));
        assert!(progress.is_complete());
    }
}
