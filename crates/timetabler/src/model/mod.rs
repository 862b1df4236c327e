/// Domain types for schedule planning
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A department (training faculty) owning classes and courses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub id: i64,
    pub code: String,
    pub name: String,
}

/// A student class belonging to a department.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingClass {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub department_id: i64,
    #[serde(default)]
    pub student_count: Option<u32>,
}

/// Per-course scheduling configuration, one per course to be planned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub code: String,
    pub name: String,
    /// Total contact hours to distribute over the semester.
    pub total_hours: i64,
    /// Optional partition of class ids into co-taught groups,
    /// e.g. `"1,2|3,4"`. Absent = every class scheduled independently.
    #[serde(default)]
    pub grouped_classes: Option<String>,
    /// Optional ceiling on hours assigned per week. None = unbounded.
    #[serde(default)]
    pub max_hours_per_week: Option<i64>,
    /// Optional ceiling on hours assigned per day. None = default budget.
    #[serde(default)]
    pub max_hours_per_day: Option<i64>,
    /// Exam-phase accounting, carried through but not enforced here.
    #[serde(default)]
    pub min_days_before_exam: Option<i64>,
    #[serde(default)]
    pub exam_duration: Option<i64>,
    #[serde(default)]
    pub is_practical: bool,
}

/// Kind of special event affecting the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Recurring institutional event (flag ceremony, weekly maintenance).
    Periodic,
    /// One-off ceremony or similar.
    Special,
    /// Holiday; blocks scheduling entirely.
    Holiday,
}

/// When a special event occurs: a concrete date or a weekly recurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventSchedule {
    /// A one-off event on a specific calendar date.
    OneOff { date: NaiveDate },
    /// Repeats every week on the given day (1 = Monday .. 5 = Friday).
    Weekly { weekday: u8 },
}

/// An institutional event loaded from the backend (or created by the user
/// just before generation). Mutated client-side only via `selected`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialEvent {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(flatten)]
    pub schedule: EventSchedule,
    #[serde(default = "default_duration_days")]
    pub duration_days: u32,
    /// None = applies to every department.
    #[serde(default)]
    pub department_id: Option<i64>,
    pub kind: EventKind,
    /// User may deselect an event before generation; deselected events stay
    /// in the list but are excluded from the applied set.
    #[serde(default = "default_true")]
    pub selected: bool,
}

fn default_duration_days() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

/// A scheduling constraint record. Loaded and carried through for the
/// wizard's display; the planner does not interpret these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constraint {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub department_id: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

/// One scheduling decision: a unit of classes assigned to a course at a
/// concrete (week, day, slot) position. Immutable once created; owned by
/// the generation run until the backend acknowledges it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    /// Class id, or the representative class id of a grouped unit.
    pub class_id: i64,
    pub course_id: i64,
    /// 1 = Monday .. 5 = Friday.
    pub day_of_week: u8,
    /// 1-based week within the semester.
    pub week_number: u32,
    /// `HH:MM:SS`
    pub start_time: String,
    /// `HH:MM:SS`
    pub end_time: String,
    /// Contact hours this assignment consumes (1..=slot capacity).
    pub hours: i64,
    #[serde(default)]
    pub is_practical: bool,
    #[serde(default)]
    pub is_exam: bool,
    #[serde(default)]
    pub is_self_study: bool,
    #[serde(default)]
    pub special_event_id: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request body for `POST /generate` and `POST /preview`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub department_id: i64,
    /// First day of the semester; normalized to its week's Monday.
    pub semester_start: NaiveDate,
    pub total_weeks: u32,
    #[serde(default)]
    pub prioritize_morning: bool,
    /// Courses as configured in the wizard (hour totals, caps, groupings).
    pub courses: Vec<Course>,
    /// Classes to schedule. Empty = load the department's classes from the
    /// backend.
    #[serde(default)]
    pub classes: Vec<TrainingClass>,
    /// Events as selected in the wizard, including any custom ones.
    #[serde(default)]
    pub events: Vec<SpecialEvent>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Per-course outcome reported back to the wizard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSummary {
    pub course_id: i64,
    pub course_code: String,
    /// Scheduling units the course resolved to (classes or groups).
    pub units: usize,
    pub assignments: usize,
    pub scheduled_hours: i64,
    /// Hours that could not be placed before the semester ran out.
    pub unscheduled_hours: i64,
}

/// Outcome of a planning pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub total_assignments: usize,
    pub total_scheduled_hours: i64,
    pub total_unscheduled_hours: i64,
    pub blackout_days: usize,
    pub courses: Vec<CourseSummary>,
}
