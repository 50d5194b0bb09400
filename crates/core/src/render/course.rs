use serde_json::Value;

use super::{Block, RenderContext, ResultView};
use crate::model::{CombinedInfo, CourseRecord, PayloadError, ProfessorRecord};

/// Name of the course-info tool.
pub const COURSE_INFO_TOOL: &str = "get_course_info";

/// Shown when a course-info result has no rows at all.
pub const NO_DATA: &str = "No data available";

const NOT_AVAILABLE: &str = "N/A";

/// Renders results of the course-info tool.
#[derive(Clone, Copy, Debug, Default)]
pub struct CourseInfoView;

impl ResultView for CourseInfoView {
    type Payload = CombinedInfo;

    fn tool_name(&self) -> &str {
        COURSE_INFO_TOOL
    }

    fn parse(&self, raw: &Value) -> Result<CombinedInfo, PayloadError> {
        CombinedInfo::from_payload(raw)
    }

    fn render(&self, info: &CombinedInfo, ctx: &RenderContext<'_>) -> Option<Block> {
        if info.course_info.is_empty() {
            // Nothing to tabulate. Surface a reported failure, otherwise
            // stay quiet and let the assistant text speak.
            return info
                .error
                .as_deref()
                .map(str::trim)
                .filter(|err| !err.is_empty())
                .map(|err| Block::Notice(err.to_owned()));
        }
        Some(render_course_info(info, ctx.selection))
    }

    fn skeleton(&self) -> Option<Block> {
        Some(Block::Skeleton("Preparing course lookup...".to_owned()))
    }
}

/// Builds the course/professor view for a normalized payload.
///
/// Both tables are independent; nothing links a course row to a professor
/// row besides the instructor name the reader sees.
pub fn render_course_info(info: &CombinedInfo, selection: CourseSelection) -> Block {
    if info.is_empty() {
        return Block::Placeholder(NO_DATA.to_owned());
    }

    let selected = selection.selected();
    let heading = info.course_info.first().and_then(|first| {
        let code = first.course_code();
        match (code.is_empty(), first.title.trim()) {
            (true, "") => None,
            (true, title) => Some(title.to_owned()),
            (false, "") => Some(code),
            (false, title) => Some(format!("{code} · {title}")),
        }
    });
    let histogram = selected
        .and_then(|row| info.course_info.get(row))
        .map(Histogram::for_course);
    let courses = info
        .course_info
        .iter()
        .enumerate()
        .map(|(idx, course)| CourseRow::new(course, selected == Some(idx)))
        .collect();
    let professors = info
        .professor_info
        .iter()
        .filter_map(ProfessorRow::new)
        .collect();

    Block::CourseInfo(CourseInfoBlock {
        heading,
        histogram,
        courses,
        professors,
    })
}

/// Which course row has its histogram open.
///
/// At most one row is selected; toggling the selected row closes it again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CourseSelection(Option<usize>);

impl CourseSelection {
    /// Toggles `row`: selects it, or clears the selection if it was the
    /// selected row.
    #[inline]
    pub fn toggle(&mut self, row: usize) {
        self.0 = match self.0 {
            Some(current) if current == row => None,
            _ => Some(row),
        };
    }

    /// Returns the selected row.
    #[inline]
    pub fn selected(self) -> Option<usize> {
        self.0
    }
}

/// The course/professor view of one result.
#[derive(Clone, Debug, PartialEq)]
pub struct CourseInfoBlock {
    /// Course code and title, taken from the first offering.
    pub heading: Option<String>,
    /// Grade histogram of the selected offering.
    pub histogram: Option<Histogram>,
    /// One row per offering.
    pub courses: Vec<CourseRow>,
    /// One row per instructor with a name.
    pub professors: Vec<ProfessorRow>,
}

/// A formatted course table row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CourseRow {
    /// Academic year and term.
    pub term: String,
    /// Instructor name.
    pub instructor: String,
    /// GPA with two decimals.
    pub gpa: String,
    /// Whether this row's histogram is open.
    pub selected: bool,
}

impl CourseRow {
    fn new(course: &CourseRecord, selected: bool) -> Self {
        Self {
            term: course.term_label(),
            instructor: course.instructor.trim().to_owned(),
            gpa: fixed(course.gpa, 2),
            selected,
        }
    }

    /// Returns the label of the row's toggle action.
    #[inline]
    pub fn action(&self) -> &'static str {
        if self.selected { "Hide" } else { "Show" }
    }
}

/// A formatted professor table row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfessorRow {
    /// Instructor name.
    pub name: String,
    /// Department, or `N/A`.
    pub department: String,
    /// Rating with one decimal, or `N/A`.
    pub rating: String,
    /// Difficulty with one decimal, or `N/A`.
    pub difficulty: String,
    /// Whole percentage, or `N/A`.
    pub would_take_again: String,
    /// Raw count, or `N/A`.
    pub num_ratings: String,
}

impl ProfessorRow {
    /// Formats a record. Records without a name are dropped.
    pub fn new(record: &ProfessorRecord) -> Option<Self> {
        let name = record.display_name()?;
        Some(Self {
            name: name.to_owned(),
            department: record
                .department
                .as_deref()
                .map(str::trim)
                .filter(|dept| !dept.is_empty())
                .unwrap_or(NOT_AVAILABLE)
                .to_owned(),
            rating: fixed(record.rating, 1),
            difficulty: fixed(record.difficulty, 1),
            would_take_again: record
                .would_take_again
                .filter(|pct| pct.is_finite())
                .map_or_else(|| NOT_AVAILABLE.to_owned(), |pct| format!("{pct:.0}%")),
            num_ratings: record
                .num_ratings
                .map_or_else(|| NOT_AVAILABLE.to_owned(), |n| n.to_string()),
        })
    }
}

/// Grade distribution of one offering.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    /// Academic year and term of the offering.
    pub title: String,
    /// Twelve bars, `A` through `F`.
    pub bars: Vec<HistogramBar>,
}

/// One bar of a [`Histogram`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HistogramBar {
    /// Letter grade.
    pub label: &'static str,
    /// Share of graded students, in percent.
    pub percent: f64,
}

impl Histogram {
    fn for_course(course: &CourseRecord) -> Self {
        Self {
            title: course.term_label(),
            bars: course
                .grades
                .iter()
                .map(|(bucket, percent)| HistogramBar {
                    label: bucket.label(),
                    percent,
                })
                .collect(),
        }
    }
}

#[inline]
fn fixed(value: Option<f64>, precision: usize) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{v:.precision$}"),
        None => NOT_AVAILABLE.to_owned(),
    }
}
