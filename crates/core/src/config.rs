use std::fmt::{self, Display};
use std::str::FromStr;

use crate::progress::ProgressSchedule;

const DEFAULT_HISTOGRAM_WIDTH: usize = 40;

/// The built-in progress schedules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ProgressVariant {
    /// Four checkpoints at +3s, +8s, +13s and +18s.
    #[default]
    Standard,
    /// Three checkpoints at +0s, +5s and +10s.
    Legacy,
}

impl ProgressVariant {
    /// Returns the schedule of this variant.
    #[inline]
    pub fn schedule(self) -> ProgressSchedule {
        match self {
            ProgressVariant::Standard => ProgressSchedule::standard(),
            ProgressVariant::Legacy => ProgressSchedule::legacy(),
        }
    }
}

impl FromStr for ProgressVariant {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(ProgressVariant::Standard),
            "legacy" => Ok(ProgressVariant::Legacy),
            _ => Err(UnknownVariantError(s.to_owned())),
        }
    }
}

/// Returned when parsing an unknown [`ProgressVariant`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownVariantError(String);

impl Display for UnknownVariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown progress variant {:?}, expected \"standard\" or \"legacy\"",
            self.0
        )
    }
}

impl std::error::Error for UnknownVariantError {}

/// Builder for [`ViewConfig`].
#[derive(Clone, Debug, Default)]
pub struct ViewConfigBuilder {
    schedule: Option<ProgressSchedule>,
    histogram_width: Option<usize>,
    thinking_indicator: Option<bool>,
}

impl ViewConfigBuilder {
    /// Uses one of the built-in progress schedules.
    #[inline]
    pub fn with_progress_variant(mut self, variant: ProgressVariant) -> Self {
        self.schedule = Some(variant.schedule());
        self
    }

    /// Uses a custom progress schedule.
    #[inline]
    pub fn with_schedule(mut self, schedule: ProgressSchedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    /// Sets the width, in cells, of a 100% histogram bar.
    #[inline]
    pub fn with_histogram_width(mut self, width: usize) -> Self {
        self.histogram_width = Some(width);
        self
    }

    /// Sets whether to show a "Thinking..." placeholder while the assistant
    /// has not answered yet.
    #[inline]
    pub fn with_thinking_indicator(mut self, enabled: bool) -> Self {
        self.thinking_indicator = Some(enabled);
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> ViewConfig {
        ViewConfig {
            schedule: self.schedule.unwrap_or_default(),
            histogram_width: self
                .histogram_width
                .filter(|w| *w > 0)
                .unwrap_or(DEFAULT_HISTOGRAM_WIDTH),
            thinking_indicator: self.thinking_indicator.unwrap_or(true),
        }
    }
}

/// Configuration of a [`crate::TranscriptView`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewConfig {
    pub(crate) schedule: ProgressSchedule,
    pub(crate) histogram_width: usize,
    pub(crate) thinking_indicator: bool,
}

impl ViewConfig {
    /// Returns the progress schedule.
    #[inline]
    pub fn schedule(&self) -> &ProgressSchedule {
        &self.schedule
    }

    /// Returns the width of a 100% histogram bar.
    #[inline]
    pub fn histogram_width(&self) -> usize {
        self.histogram_width
    }

    /// Returns whether the thinking placeholder is shown.
    #[inline]
    pub fn thinking_indicator(&self) -> bool {
        self.thinking_indicator
    }
}

impl Default for ViewConfig {
    #[inline]
    fn default() -> Self {
        ViewConfigBuilder::default().build()
    }
}
