//! Scheduling-unit resolution for a course.
//!
//! A unit is either a single class or a fixed group of co-taught classes
//! that occupies one slot together. Groups come from the course's
//! `grouped_classes` string, `"1,2|3,4"`: `|` separates groups, `,`
//! separates class ids within a group.

use crate::model::{Course, TrainingClass};

/// One schedulable entity: a class, or a group of classes taught together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulingUnit {
    /// Stable label, e.g. `"12"` for a lone class or `"1,2"` for a group.
    pub label: String,
    /// Member class ids, in the order given.
    pub class_ids: Vec<i64>,
}

impl SchedulingUnit {
    fn single(class_id: i64) -> Self {
        Self {
            label: class_id.to_string(),
            class_ids: vec![class_id],
        }
    }

    fn group(class_ids: Vec<i64>) -> Self {
        let label = class_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        Self { label, class_ids }
    }

    /// The class id assignments are emitted under. For a group this is the
    /// first member, acting as the group representative on the wire.
    pub fn representative(&self) -> i64 {
        self.class_ids[0]
    }

    pub fn is_group(&self) -> bool {
        self.class_ids.len() > 1
    }
}

/// Resolves the units a course schedules over.
///
/// With `grouped_classes` set, each group becomes one unit; without it,
/// every class of the department is its own unit. The group string is
/// parsed leniently: non-numeric tokens are dropped, and a group emptied by
/// that filtering is skipped entirely.
pub fn resolve_units(course: &Course, classes: &[TrainingClass]) -> Vec<SchedulingUnit> {
    match course.grouped_classes.as_deref() {
        Some(raw) if !raw.trim().is_empty() => parse_grouped(raw)
            .into_iter()
            .map(SchedulingUnit::group)
            .collect(),
        _ => classes
            .iter()
            .map(|c| SchedulingUnit::single(c.id))
            .collect(),
    }
}

/// Parses `"1,2|3,4"` into id groups, dropping anything non-numeric.
fn parse_grouped(raw: &str) -> Vec<Vec<i64>> {
    raw.split('|')
        .map(|group| {
            group
                .split(',')
                .filter_map(|token| token.trim().parse::<i64>().ok())
                .collect::<Vec<i64>>()
        })
        .filter(|ids| !ids.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(id: i64) -> TrainingClass {
        TrainingClass {
            id,
            code: format!("C{id}"),
            name: format!("Class {id}"),
            department_id: 1,
            student_count: None,
        }
    }

    fn course_with_groups(groups: Option<&str>) -> Course {
        Course {
            id: 1,
            code: "QS101".into(),
            name: "Tactics".into(),
            total_hours: 30,
            grouped_classes: groups.map(String::from),
            max_hours_per_week: None,
            max_hours_per_day: None,
            min_days_before_exam: None,
            exam_duration: None,
            is_practical: false,
        }
    }

    #[test]
    fn test_ungrouped_course_yields_one_unit_per_class() {
        let classes = vec![class(1), class(2), class(3)];
        let units = resolve_units(&course_with_groups(None), &classes);
        assert_eq!(units.len(), 3);
        assert!(units.iter().all(|u| !u.is_group()));
        assert_eq!(units[0].representative(), 1);
    }

    #[test]
    fn test_grouped_course_partition() {
        let classes = vec![class(1), class(2), class(3), class(4), class(5)];
        let units = resolve_units(&course_with_groups(Some("1,2|3,4")), &classes);
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].class_ids, vec![1, 2]);
        assert_eq!(units[1].class_ids, vec![3, 4]);
        // Class 5 is not listed, so it never appears in any unit.
        assert!(units.iter().all(|u| !u.class_ids.contains(&5)));
        assert_eq!(units[0].label, "1,2");
    }

    #[test]
    fn test_lenient_parse_drops_garbage_tokens() {
        let units = resolve_units(&course_with_groups(Some("1, x ,2|abc")), &[]);
        // Second group emptied by filtering, so it is skipped.
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].class_ids, vec![1, 2]);
    }

    #[test]
    fn test_blank_group_string_falls_back_to_classes() {
        let classes = vec![class(7)];
        let units = resolve_units(&course_with_groups(Some("   ")), &classes);
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].representative(), 7);
    }

    #[test]
    fn test_all_garbage_group_string_yields_no_units() {
        let units = resolve_units(&course_with_groups(Some("a|b|c")), &[]);
        assert!(units.is_empty());
    }
}
