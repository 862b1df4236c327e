//! Offline sample data.
//!
//! Every reference loader masks a failed backend call with this data so the
//! wizard stays usable when the backend is down. The samples are small but
//! shaped like real records, enough to walk the whole workflow offline.

use crate::model::{
    Constraint, Course, Department, EventKind, EventSchedule, SpecialEvent, TrainingClass,
};
use chrono::NaiveDate;

pub fn departments() -> Vec<Department> {
    vec![
        Department {
            id: 1,
            code: "KCB".into(),
            name: "Basic Training Department".into(),
        },
        Department {
            id: 2,
            code: "KCN".into(),
            name: "Professional Training Department".into(),
        },
    ]
}

pub fn classes(department_id: Option<i64>) -> Vec<TrainingClass> {
    let all = vec![
        TrainingClass {
            id: 1,
            code: "A1".into(),
            name: "Class A1".into(),
            department_id: 1,
            student_count: Some(30),
        },
        TrainingClass {
            id: 2,
            code: "A2".into(),
            name: "Class A2".into(),
            department_id: 1,
            student_count: Some(28),
        },
        TrainingClass {
            id: 3,
            code: "B1".into(),
            name: "Class B1".into(),
            department_id: 2,
            student_count: Some(32),
        },
    ];
    match department_id {
        Some(id) => all.into_iter().filter(|c| c.department_id == id).collect(),
        None => all,
    }
}

pub fn courses(department_id: Option<i64>) -> Vec<Course> {
    let all = vec![
        Course {
            id: 1,
            code: "QS101".into(),
            name: "Military Tactics I".into(),
            total_hours: 45,
            grouped_classes: None,
            max_hours_per_week: Some(6),
            max_hours_per_day: Some(4),
            min_days_before_exam: Some(3),
            exam_duration: Some(2),
            is_practical: false,
        },
        Course {
            id: 2,
            code: "TD102".into(),
            name: "Physical Training".into(),
            total_hours: 30,
            grouped_classes: Some("1,2".into()),
            max_hours_per_week: None,
            max_hours_per_day: Some(3),
            min_days_before_exam: None,
            exam_duration: None,
            is_practical: true,
        },
    ];
    // Sample courses all belong to department 1.
    match department_id {
        Some(1) | None => all,
        Some(_) => Vec::new(),
    }
}

pub fn events(department_id: Option<i64>) -> Vec<SpecialEvent> {
    let all = vec![
        SpecialEvent {
            id: Some(1),
            name: "Flag ceremony".into(),
            schedule: EventSchedule::Weekly { weekday: 1 },
            duration_days: 1,
            department_id: None,
            kind: EventKind::Periodic,
            selected: true,
        },
        SpecialEvent {
            id: Some(2),
            name: "National Day".into(),
            schedule: EventSchedule::OneOff {
                date: NaiveDate::from_ymd_opt(2026, 9, 2).unwrap(),
            },
            duration_days: 1,
            department_id: None,
            kind: EventKind::Holiday,
            selected: true,
        },
    ];
    match department_id {
        Some(id) => all
            .into_iter()
            .filter(|e| e.department_id.is_none() || e.department_id == Some(id))
            .collect(),
        None => all,
    }
}

pub fn constraints(department_id: Option<i64>) -> Vec<Constraint> {
    let all = vec![Constraint {
        id: 1,
        name: "No practical sessions after 15:00".into(),
        department_id: None,
        description: None,
    }];
    match department_id {
        Some(id) => all
            .into_iter()
            .filter(|c| c.department_id.is_none() || c.department_id == Some(id))
            .collect(),
        None => all,
    }
}
