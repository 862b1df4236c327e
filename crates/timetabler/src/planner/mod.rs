//! The course-hour allocator.
//!
//! Turns each configured course's `total_hours` into concrete assignments
//! at (unit, week, day, slot) positions. The pass is greedy and does no
//! backtracking: courses are walked in descending hour order, and within a
//! course each unit fills weeks front to back, skipping blackout dates and
//! positions already claimed by another course for the same class.
//!
//! A course whose hours exceed the capacity left before `total_weeks` ends
//! is left partially scheduled; the shortfall is reported in the summary
//! rather than failing the run.

mod units;

pub use units::{resolve_units, SchedulingUnit};

use crate::calendar;
use crate::model::{
    Assignment, Course, CourseSummary, GenerationSummary, SpecialEvent, TrainingClass,
};
use crate::slots::{self, DAYS_PER_WEEK, SLOT_CAPACITY_HOURS, TIME_SLOTS};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Daily hour budget applied when a course sets no explicit per-day cap.
const DEFAULT_DAY_HOURS: i64 = 4;

/// Everything a planning pass needs, already narrowed to one department.
#[derive(Debug, Clone)]
pub struct PlannerInput<'a> {
    pub courses: &'a [Course],
    pub classes: &'a [TrainingClass],
    pub events: &'a [SpecialEvent],
    pub semester_start: NaiveDate,
    pub total_weeks: u32,
    pub prioritize_morning: bool,
}

/// Result of a planning pass: the assignment list plus per-course totals.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub assignments: Vec<Assignment>,
    pub summary: GenerationSummary,
}

/// Occupancy key: one class at one (week, day, slot) position.
type Cell = (i64, u32, u8, usize);

/// Runs the full allocation for one generation request.
pub fn plan(input: &PlannerInput<'_>) -> PlanOutcome {
    let blackouts = calendar::blackout_dates(input.events);
    let weekly = calendar::weekly_annotations(input.events);
    let slot_order = slots::slot_order(input.prioritize_morning);

    // Fixed priority order: biggest hour requirement first, ties by id so
    // repeated runs of the same request produce identical schedules.
    let mut ordered: Vec<&Course> = input.courses.iter().collect();
    ordered.sort_by(|a, b| b.total_hours.cmp(&a.total_hours).then(a.id.cmp(&b.id)));

    let mut occupancy: HashMap<Cell, i64> = HashMap::new();
    let mut assignments = Vec::new();
    let mut course_summaries = Vec::new();

    for course in ordered {
        let resolved = resolve_units(course, input.classes);
        let mut scheduled = 0i64;
        let mut emitted = 0usize;

        for unit in &resolved {
            let placed = allocate_unit(
                course,
                unit,
                input,
                &slot_order,
                &blackouts,
                &weekly,
                &mut occupancy,
                &mut assignments,
            );
            scheduled += placed.0;
            emitted += placed.1;
        }

        let required = course.total_hours.max(0) * resolved.len() as i64;
        let unscheduled = required - scheduled;
        if unscheduled > 0 {
            warn!(
                course_id = course.id,
                course_code = %course.code,
                unscheduled_hours = unscheduled,
                "Course left partially unscheduled; semester capacity exhausted"
            );
        }

        course_summaries.push(CourseSummary {
            course_id: course.id,
            course_code: course.code.clone(),
            units: resolved.len(),
            assignments: emitted,
            scheduled_hours: scheduled,
            unscheduled_hours: unscheduled,
        });
    }

    let blackout_days = count_blackout_days(input, &blackouts);
    let summary = GenerationSummary {
        total_assignments: assignments.len(),
        total_scheduled_hours: course_summaries.iter().map(|c| c.scheduled_hours).sum(),
        total_unscheduled_hours: course_summaries.iter().map(|c| c.unscheduled_hours).sum(),
        blackout_days,
        courses: course_summaries,
    };

    debug!(
        assignments = summary.total_assignments,
        scheduled_hours = summary.total_scheduled_hours,
        unscheduled_hours = summary.total_unscheduled_hours,
        "Planning pass complete"
    );

    PlanOutcome {
        assignments,
        summary,
    }
}

/// Fills one unit's hours for one course. Returns (hours placed, number of
/// assignments emitted).
#[allow(clippy::too_many_arguments)]
fn allocate_unit(
    course: &Course,
    unit: &SchedulingUnit,
    input: &PlannerInput<'_>,
    slot_order: &[usize],
    blackouts: &HashSet<NaiveDate>,
    weekly: &HashMap<u8, i64>,
    occupancy: &mut HashMap<Cell, i64>,
    out: &mut Vec<Assignment>,
) -> (i64, usize) {
    let mut remaining = course.total_hours;
    if remaining <= 0 {
        return (0, 0);
    }

    let mut placed = 0i64;
    let mut emitted = 0usize;

    'weeks: for week in 1..=input.total_weeks {
        let mut week_budget = course.max_hours_per_week.unwrap_or(i64::MAX);

        for day in 1..=DAYS_PER_WEEK {
            if remaining <= 0 {
                break 'weeks;
            }
            if week_budget <= 0 {
                break;
            }
            let date = slots::date_for(input.semester_start, week, day);
            if blackouts.contains(&date) {
                continue;
            }

            let mut day_budget = course.max_hours_per_day.unwrap_or(DEFAULT_DAY_HOURS);

            for &slot in slot_order {
                if remaining <= 0 || day_budget <= 0 || week_budget <= 0 {
                    break;
                }
                if unit
                    .class_ids
                    .iter()
                    .any(|&c| occupancy.contains_key(&(c, week, day, slot)))
                {
                    // Another course already holds this position for one of
                    // the unit's classes; defer to the next free slot.
                    continue;
                }

                let hours = remaining
                    .min(day_budget)
                    .min(week_budget)
                    .min(SLOT_CAPACITY_HOURS);
                debug_assert!(hours > 0);

                for &class_id in &unit.class_ids {
                    occupancy.insert((class_id, week, day, slot), course.id);
                }

                let window = &TIME_SLOTS[slot];
                out.push(Assignment {
                    class_id: unit.representative(),
                    course_id: course.id,
                    day_of_week: day,
                    week_number: week,
                    start_time: window.start_time(),
                    end_time: window.end_time(),
                    hours,
                    is_practical: course.is_practical,
                    is_exam: false,
                    is_self_study: false,
                    special_event_id: weekly.get(&day).copied(),
                    notes: unit
                        .is_group()
                        .then(|| format!("grouped classes {}", unit.label)),
                });

                remaining -= hours;
                day_budget -= hours;
                week_budget -= hours;
                placed += hours;
                emitted += 1;
            }
        }
    }

    (placed, emitted)
}

/// Number of teaching days inside the semester span lost to blackouts.
fn count_blackout_days(input: &PlannerInput<'_>, blackouts: &HashSet<NaiveDate>) -> usize {
    let mut count = 0;
    for week in 1..=input.total_weeks {
        for day in 1..=DAYS_PER_WEEK {
            if blackouts.contains(&slots::date_for(input.semester_start, week, day)) {
                count += 1;
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EventKind, EventSchedule};
    use std::collections::HashSet as StdHashSet;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn monday_start() -> NaiveDate {
        date(2026, 8, 31)
    }

    fn class(id: i64) -> TrainingClass {
        TrainingClass {
            id,
            code: format!("C{id}"),
            name: format!("Class {id}"),
            department_id: 1,
            student_count: None,
        }
    }

    fn course(id: i64, total_hours: i64) -> Course {
        Course {
            id,
            code: format!("QS{id}"),
            name: format!("Course {id}"),
            total_hours,
            grouped_classes: None,
            max_hours_per_week: None,
            max_hours_per_day: None,
            min_days_before_exam: None,
            exam_duration: None,
            is_practical: false,
        }
    }

    fn run(courses: &[Course], classes: &[TrainingClass], weeks: u32) -> PlanOutcome {
        run_with_events(courses, classes, weeks, &[])
    }

    fn run_with_events(
        courses: &[Course],
        classes: &[TrainingClass],
        weeks: u32,
        events: &[SpecialEvent],
    ) -> PlanOutcome {
        plan(&PlannerInput {
            courses,
            classes,
            events,
            semester_start: monday_start(),
            total_weeks: weeks,
            prioritize_morning: false,
        })
    }

    #[test]
    fn test_hour_conservation_single_course() {
        let courses = vec![course(1, 45)];
        let classes = vec![class(10)];
        let outcome = run(&courses, &classes, 18);

        let total: i64 = outcome.assignments.iter().map(|a| a.hours).sum();
        assert_eq!(total, 45);
        assert_eq!(outcome.summary.total_unscheduled_hours, 0);
        assert!(outcome.assignments.iter().all(|a| a.hours <= 3));
    }

    #[test]
    fn test_daily_cap_respected() {
        let mut c = course(1, 40);
        c.max_hours_per_day = Some(4);
        let classes = vec![class(10)];
        let outcome = run(&[c], &classes, 18);

        let mut per_day: HashMap<(u32, u8), i64> = HashMap::new();
        for a in &outcome.assignments {
            *per_day.entry((a.week_number, a.day_of_week)).or_default() += a.hours;
        }
        assert!(per_day.values().all(|&h| h <= 4));
        let total: i64 = outcome.assignments.iter().map(|a| a.hours).sum();
        assert_eq!(total, 40);
    }

    #[test]
    fn test_default_daily_budget_applies_without_cap() {
        // No explicit cap still means at most 4 hours per day.
        let courses = vec![course(1, 60)];
        let classes = vec![class(10)];
        let outcome = run(&courses, &classes, 18);

        let mut per_day: HashMap<(u32, u8), i64> = HashMap::new();
        for a in &outcome.assignments {
            *per_day.entry((a.week_number, a.day_of_week)).or_default() += a.hours;
        }
        assert!(per_day.values().all(|&h| h <= 4));
    }

    #[test]
    fn test_weekly_cap_respected() {
        let mut c = course(1, 30);
        c.max_hours_per_week = Some(6);
        let classes = vec![class(10)];
        let outcome = run(&[c], &classes, 18);

        let mut per_week: HashMap<u32, i64> = HashMap::new();
        for a in &outcome.assignments {
            *per_week.entry(a.week_number).or_default() += a.hours;
        }
        assert!(per_week.values().all(|&h| h <= 6));
        let total: i64 = outcome.assignments.iter().map(|a| a.hours).sum();
        assert_eq!(total, 30);
    }

    #[test]
    fn test_grouping_partition_respected() {
        let mut c = course(1, 12);
        c.grouped_classes = Some("1,2|3,4".into());
        let classes: Vec<_> = (1..=5).map(class).collect();
        let outcome = run(&[c], &classes, 18);

        // Assignments are emitted under the group representatives only.
        let reps: StdHashSet<i64> = outcome.assignments.iter().map(|a| a.class_id).collect();
        assert_eq!(reps, StdHashSet::from([1, 3]));
        assert!(outcome
            .assignments
            .iter()
            .all(|a| a.notes.as_deref() == Some("grouped classes 1,2")
                || a.notes.as_deref() == Some("grouped classes 3,4")));
    }

    #[test]
    fn test_no_double_booking_across_courses() {
        // Two courses for the same class must never share a position.
        let courses = vec![course(1, 30), course(2, 30)];
        let classes = vec![class(10)];
        let outcome = run(&courses, &classes, 18);

        let mut seen = StdHashSet::new();
        for a in &outcome.assignments {
            let key = (a.class_id, a.week_number, a.day_of_week, a.start_time.clone());
            assert!(seen.insert(key), "position double-booked: {a:?}");
        }
        let total: i64 = outcome.assignments.iter().map(|a| a.hours).sum();
        assert_eq!(total, 60);
    }

    #[test]
    fn test_group_member_conflicts_block_group() {
        // Course 1 (more hours, scheduled first) occupies class 2 directly;
        // course 2's group {1,2} must not land on positions class 2 holds.
        let big = {
            let mut c = course(1, 20);
            c.grouped_classes = Some("2".into());
            c
        };
        let grouped = {
            let mut c = course(2, 9);
            c.grouped_classes = Some("1,2".into());
            c
        };
        let classes = vec![class(1), class(2)];
        let outcome = run(&[big, grouped], &classes, 18);

        let mut cells = StdHashSet::new();
        for a in &outcome.assignments {
            // Expand group assignments to their member cells via notes.
            let members: Vec<i64> = match a.notes.as_deref() {
                Some(n) => n
                    .trim_start_matches("grouped classes ")
                    .split(',')
                    .map(|t| t.parse().unwrap())
                    .collect(),
                None => vec![a.class_id],
            };
            for m in members {
                let key = (m, a.week_number, a.day_of_week, a.start_time.clone());
                assert!(cells.insert(key), "member cell double-booked: {a:?}");
            }
        }
    }

    #[test]
    fn test_zero_hour_course_emits_nothing() {
        let courses = vec![course(1, 0)];
        let classes = vec![class(10)];
        let outcome = run(&courses, &classes, 18);
        assert!(outcome.assignments.is_empty());
        assert_eq!(outcome.summary.courses[0].unscheduled_hours, 0);
    }

    #[test]
    fn test_partial_schedule_reported_when_weeks_exhausted() {
        // One week of one class holds at most 5 days * 4 hours = 20 hours.
        let courses = vec![course(1, 50)];
        let classes = vec![class(10)];
        let outcome = run(&courses, &classes, 1);

        let total: i64 = outcome.assignments.iter().map(|a| a.hours).sum();
        assert_eq!(total, 20);
        assert_eq!(outcome.summary.courses[0].scheduled_hours, 20);
        assert_eq!(outcome.summary.courses[0].unscheduled_hours, 30);
    }

    #[test]
    fn test_blackout_days_skipped() {
        let holiday = SpecialEvent {
            id: Some(1),
            name: "National Day".into(),
            schedule: EventSchedule::OneOff {
                date: date(2026, 8, 31),
            },
            duration_days: 1,
            department_id: None,
            kind: EventKind::Holiday,
            selected: true,
        };
        let courses = vec![course(1, 8)];
        let classes = vec![class(10)];
        let outcome = run_with_events(&courses, &classes, 2, &[holiday]);

        // 2026-08-31 is (week 1, Monday); nothing may land there.
        assert!(outcome
            .assignments
            .iter()
            .all(|a| !(a.week_number == 1 && a.day_of_week == 1)));
        assert_eq!(outcome.summary.blackout_days, 1);
        let total: i64 = outcome.assignments.iter().map(|a| a.hours).sum();
        assert_eq!(total, 8);
    }

    #[test]
    fn test_weekly_event_annotates_assignments() {
        let ceremony = SpecialEvent {
            id: Some(42),
            name: "Flag ceremony".into(),
            schedule: EventSchedule::Weekly { weekday: 1 },
            duration_days: 1,
            department_id: None,
            kind: EventKind::Periodic,
            selected: true,
        };
        let courses = vec![course(1, 8)];
        let classes = vec![class(10)];
        let outcome = run_with_events(&courses, &classes, 2, &[ceremony]);

        for a in &outcome.assignments {
            if a.day_of_week == 1 {
                assert_eq!(a.special_event_id, Some(42));
            } else {
                assert_eq!(a.special_event_id, None);
            }
        }
    }

    #[test]
    fn test_priority_order_is_descending_hours() {
        // The bigger course grabs the earliest positions.
        let courses = vec![course(1, 4), course(2, 40)];
        let classes = vec![class(10)];
        let outcome = run(&courses, &classes, 18);

        let first = outcome
            .assignments
            .iter()
            .find(|a| a.week_number == 1 && a.day_of_week == 1 && a.start_time == "07:30:00")
            .expect("first slot of the semester should be taken");
        assert_eq!(first.course_id, 2);
    }
}
