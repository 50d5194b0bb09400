//! Turning tool invocations into renderable blocks.
//!
//! A [`ResultView`] knows how to render the result of one tool. Views are
//! collected in a [`Registry`] keyed by tool name, and [`dispatch`] picks
//! the block for an invocation from its state: progress while pending, the
//! registered view once resolved, and a JSON dump for tools nobody
//! registered.

mod course;
mod dispatch;
mod registry;

use serde_json::Value;

use crate::model::PayloadError;
use crate::progress::StagedProgress;

pub use course::{
    COURSE_INFO_TOOL, CourseInfoBlock, CourseInfoView, CourseRow, CourseSelection,
    Histogram, HistogramBar, NO_DATA, ProfessorRow, render_course_info,
};
pub use dispatch::dispatch;
pub use registry::Registry;

/// Something to show in place of a tool invocation.
#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    /// Staged checkpoints of a pending call.
    Progress(ProgressBlock),
    /// A placeholder while the call arguments are still streaming in.
    Skeleton(String),
    /// Course and professor tables.
    CourseInfo(CourseInfoBlock),
    /// A fixed message standing in for missing data.
    Placeholder(String),
    /// Pretty-printed JSON of a result no view is registered for.
    Json(String),
    /// A failure the user should know about.
    Notice(String),
}

/// Checkpoints of a pending call, ready to show.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressBlock {
    /// `(label, done)` in schedule order.
    pub steps: Vec<(String, bool)>,
}

impl ProgressBlock {
    /// Returns the number of done checkpoints.
    #[inline]
    pub fn done_count(&self) -> usize {
        self.steps.iter().take_while(|(_, done)| *done).count()
    }
}

/// View-local state a result view may depend on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderContext<'a> {
    /// Row selection of the invocation being rendered.
    pub selection: CourseSelection,
    /// Checkpoints of the invocation, if it is pending.
    pub progress: Option<&'a StagedProgress>,
}

/// Renders the result of one tool.
///
/// Implementations parse the raw result into their own payload type and
/// render that. Both steps must be free of side effects; a parse failure
/// only affects the invocation being rendered.
pub trait ResultView: Send + Sync + 'static {
    /// The normalized payload this view renders.
    type Payload;

    /// Returns the name of the tool this view renders results for.
    fn tool_name(&self) -> &str;

    /// Normalizes a raw result.
    fn parse(&self, raw: &Value) -> Result<Self::Payload, PayloadError>;

    /// Renders a normalized result. `None` renders nothing.
    fn render(&self, payload: &Self::Payload, ctx: &RenderContext<'_>) -> Option<Block>;

    /// Returns what to show while the call arguments are streaming in.
    fn skeleton(&self) -> Option<Block> {
        None
    }
}

pub(crate) trait ResultViewObject: Send + Sync + 'static {
    fn render_value(
        &self,
        raw: &Value,
        ctx: &RenderContext<'_>,
    ) -> Result<Option<Block>, PayloadError>;

    fn skeleton(&self) -> Option<Block>;
}

pub(crate) struct AnyView<V: ResultView>(pub V);

impl<V: ResultView> ResultViewObject for AnyView<V> {
    #[inline]
    fn render_value(
        &self,
        raw: &Value,
        ctx: &RenderContext<'_>,
    ) -> Result<Option<Block>, PayloadError> {
        let payload = self.0.parse(raw)?;
        Ok(self.0.render(&payload, ctx))
    }

    #[inline]
    fn skeleton(&self) -> Option<Block> {
        self.0.skeleton()
    }
}
