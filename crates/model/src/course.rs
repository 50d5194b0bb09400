use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::lenient;

/// One academic-term offering of a course, with its grade statistics.
///
/// Keys match the grade-distribution export column for column.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseRecord {
    /// Academic year, e.g. `2023-24`.
    #[serde(rename = "Academic Year", default, deserialize_with = "lenient::text")]
    pub academic_year: String,
    /// Term within the academic year, e.g. `Fall`.
    #[serde(rename = "Term", default, deserialize_with = "lenient::text")]
    pub term: String,
    /// Subject code, e.g. `CS`.
    #[serde(rename = "Subject", default, deserialize_with = "lenient::text")]
    pub subject: String,
    /// Course number within the subject.
    #[serde(rename = "Course No.", default, deserialize_with = "lenient::text")]
    pub course_no: String,
    /// Course title.
    #[serde(rename = "Course Title", default, deserialize_with = "lenient::text")]
    pub title: String,
    /// Instructor of record.
    #[serde(rename = "Instructor", default, deserialize_with = "lenient::text")]
    pub instructor: String,
    /// Average GPA of graded students.
    #[serde(rename = "GPA", default, deserialize_with = "lenient::number")]
    pub gpa: Option<f64>,
    /// Share of graded students in each letter-grade bucket.
    #[serde(flatten)]
    pub grades: GradeDistribution,
    /// Number of withdrawals.
    #[serde(rename = "Withdraws", default, deserialize_with = "lenient::count")]
    pub withdraws: Option<u64>,
    /// Number of students who received a letter grade.
    #[serde(
        rename = "Graded Enrollment",
        default,
        deserialize_with = "lenient::count"
    )]
    pub graded_enrollment: Option<u64>,
    /// Course reference number.
    #[serde(rename = "CRN", default, deserialize_with = "lenient::text")]
    pub crn: String,
    /// Credit hours.
    #[serde(rename = "Credits", default, deserialize_with = "lenient::number")]
    pub credits: Option<f64>,
}

impl CourseRecord {
    /// Returns the label identifying the offering, academic year followed by
    /// term.
    pub fn term_label(&self) -> String {
        let year = self.academic_year.trim();
        let term = self.term.trim();
        match (year.is_empty(), term.is_empty()) {
            (false, false) => format!("{year} {term}"),
            (false, true) => year.to_owned(),
            (true, _) => term.to_owned(),
        }
    }

    /// Returns the normalized course code, e.g. `CS 3114`.
    #[inline]
    pub fn course_code(&self) -> String {
        normalize_course_code(&format!("{}{}", self.subject, self.course_no))
    }
}

/// The twelve letter-grade buckets, best to worst.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GradeBucket {
    /// `A`
    A,
    /// `A-`
    AMinus,
    /// `B+`
    BPlus,
    /// `B`
    B,
    /// `B-`
    BMinus,
    /// `C+`
    CPlus,
    /// `C`
    C,
    /// `C-`
    CMinus,
    /// `D+`
    DPlus,
    /// `D`
    D,
    /// `D-`
    DMinus,
    /// `F`
    F,
}

impl GradeBucket {
    /// All buckets in display order.
    pub const ALL: [GradeBucket; 12] = [
        GradeBucket::A,
        GradeBucket::AMinus,
        GradeBucket::BPlus,
        GradeBucket::B,
        GradeBucket::BMinus,
        GradeBucket::CPlus,
        GradeBucket::C,
        GradeBucket::CMinus,
        GradeBucket::DPlus,
        GradeBucket::D,
        GradeBucket::DMinus,
        GradeBucket::F,
    ];

    /// Returns the letter grade.
    #[inline]
    pub fn label(self) -> &'static str {
        match self {
            GradeBucket::A => "A",
            GradeBucket::AMinus => "A-",
            GradeBucket::BPlus => "B+",
            GradeBucket::B => "B",
            GradeBucket::BMinus => "B-",
            GradeBucket::CPlus => "C+",
            GradeBucket::C => "C",
            GradeBucket::CMinus => "C-",
            GradeBucket::DPlus => "D+",
            GradeBucket::D => "D",
            GradeBucket::DMinus => "D-",
            GradeBucket::F => "F",
        }
    }
}

impl Display for GradeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Percentage of graded students per letter grade.
///
/// The values are expected to add up to roughly 100, but nothing enforces
/// it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct GradeDistribution {
    #[serde(rename = "A (%)", default, deserialize_with = "lenient::number_or_zero")]
    pub a: f64,
    #[serde(rename = "A- (%)", default, deserialize_with = "lenient::number_or_zero")]
    pub a_minus: f64,
    #[serde(rename = "B+ (%)", default, deserialize_with = "lenient::number_or_zero")]
    pub b_plus: f64,
    #[serde(rename = "B (%)", default, deserialize_with = "lenient::number_or_zero")]
    pub b: f64,
    #[serde(rename = "B- (%)", default, deserialize_with = "lenient::number_or_zero")]
    pub b_minus: f64,
    #[serde(rename = "C+ (%)", default, deserialize_with = "lenient::number_or_zero")]
    pub c_plus: f64,
    #[serde(rename = "C (%)", default, deserialize_with = "lenient::number_or_zero")]
    pub c: f64,
    #[serde(rename = "C- (%)", default, deserialize_with = "lenient::number_or_zero")]
    pub c_minus: f64,
    #[serde(rename = "D+ (%)", default, deserialize_with = "lenient::number_or_zero")]
    pub d_plus: f64,
    #[serde(rename = "D (%)", default, deserialize_with = "lenient::number_or_zero")]
    pub d: f64,
    #[serde(rename = "D- (%)", default, deserialize_with = "lenient::number_or_zero")]
    pub d_minus: f64,
    #[serde(rename = "F (%)", default, deserialize_with = "lenient::number_or_zero")]
    pub f: f64,
}

impl GradeDistribution {
    /// Returns the percentage for one bucket.
    pub fn get(&self, bucket: GradeBucket) -> f64 {
        match bucket {
            GradeBucket::A => self.a,
            GradeBucket::AMinus => self.a_minus,
            GradeBucket::BPlus => self.b_plus,
            GradeBucket::B => self.b,
            GradeBucket::BMinus => self.b_minus,
            GradeBucket::CPlus => self.c_plus,
            GradeBucket::C => self.c,
            GradeBucket::CMinus => self.c_minus,
            GradeBucket::DPlus => self.d_plus,
            GradeBucket::D => self.d,
            GradeBucket::DMinus => self.d_minus,
            GradeBucket::F => self.f,
        }
    }

    /// Iterates over all buckets in display order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (GradeBucket, f64)> + '_ {
        GradeBucket::ALL.into_iter().map(|b| (b, self.get(b)))
    }
}

/// Aggregated instructor ratings.
///
/// Every numeric field is optional. An absent `would_take_again` means the
/// rating site has no data, which is not the same as zero.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfessorRecord {
    /// Instructor name as listed on the rating site.
    #[serde(default)]
    pub name: Option<String>,
    /// Department.
    #[serde(default)]
    pub department: Option<String>,
    /// School.
    #[serde(default)]
    pub school: Option<String>,
    /// Average overall rating.
    #[serde(default, deserialize_with = "lenient::number")]
    pub rating: Option<f64>,
    /// Average difficulty.
    #[serde(default, deserialize_with = "lenient::number")]
    pub difficulty: Option<f64>,
    /// Number of ratings the averages are based on.
    #[serde(default, deserialize_with = "lenient::count")]
    pub num_ratings: Option<u64>,
    /// Percentage of students who would take the instructor again.
    #[serde(default, deserialize_with = "lenient::number")]
    pub would_take_again: Option<f64>,
}

impl ProfessorRecord {
    /// Returns the name, unless it is absent or blank.
    #[inline]
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Payload of the course-info tool: grade records joined with instructor
/// ratings.
///
/// The two collections are sized independently and are not linked by any
/// key; readers correlate them by instructor name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CombinedInfo {
    /// One row per academic-term offering.
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub course_info: Vec<CourseRecord>,
    /// One row per instructor rating aggregate.
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub professor_info: Vec<ProfessorRecord>,
    /// Failure reported by the producer, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CombinedInfo {
    /// Returns `true` if neither collection has any rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.course_info.is_empty() && self.professor_info.is_empty()
    }
}

/// Normalizes a course code to `SUBJECT NUMBER` form.
///
/// Whitespace is dropped, letters are uppercased, and a single space is put
/// in front of the first digit: `"cs3114"` and `"CS  3114"` both become
/// `"CS 3114"`. Codes without digits are returned uppercased.
pub fn normalize_course_code(code: &str) -> String {
    let compact: String = code
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect();
    match compact.find(|c: char| c.is_ascii_digit()) {
        Some(idx) if idx > 0 => {
            format!("{} {}", &compact[..idx], &compact[idx..])
        }
        _ => compact,
    }
}
