//! Special-event filtering and blackout derivation.
//!
//! Events are loaded from the backend and only mutated client-side through
//! their `selected` flag. Before a generation run they are narrowed to the
//! chosen department, and the selected holiday events are expanded into a
//! blackout-date set the allocator consults.

use crate::model::{EventKind, EventSchedule, SpecialEvent};
use chrono::{Duration, NaiveDate};
use std::collections::{HashMap, HashSet};

/// Keeps the events relevant to a department: those scoped to it plus those
/// with no department scope at all. Pure filter; applying it twice yields
/// the same result as applying it once.
pub fn applicable_events(events: &[SpecialEvent], department_id: i64) -> Vec<SpecialEvent> {
    events
        .iter()
        .filter(|e| e.department_id.is_none() || e.department_id == Some(department_id))
        .cloned()
        .collect()
}

/// The events the user left selected, i.e. the set actually applied to a
/// run. Deselected events stay in the wizard list but are excluded here.
pub fn applied_events(events: &[SpecialEvent]) -> Vec<&SpecialEvent> {
    events.iter().filter(|e| e.selected).collect()
}

/// Dates on which nothing may be scheduled.
///
/// Selected holiday events and one-off special events block their date plus
/// `duration_days - 1` following days. Weekly periodic events never black
/// out a day; see [`weekly_annotations`].
pub fn blackout_dates(events: &[SpecialEvent]) -> HashSet<NaiveDate> {
    let mut blocked = HashSet::new();
    for event in applied_events(events) {
        if !matches!(event.kind, EventKind::Holiday | EventKind::Special) {
            continue;
        }
        if let EventSchedule::OneOff { date } = event.schedule {
            let span = event.duration_days.max(1) as i64;
            for offset in 0..span {
                blocked.insert(date + Duration::days(offset));
            }
        }
    }
    blocked
}

/// Weekday (1 = Monday .. 5 = Friday) to event id for selected weekly
/// periodic events. Assignments landing on these weekdays are annotated
/// with the event rather than skipped.
pub fn weekly_annotations(events: &[SpecialEvent]) -> HashMap<u8, i64> {
    let mut map = HashMap::new();
    for event in applied_events(events) {
        if event.kind != EventKind::Periodic {
            continue;
        }
        if let (EventSchedule::Weekly { weekday }, Some(id)) = (event.schedule, event.id) {
            if (1..=5).contains(&weekday) {
                // First selected event for a weekday wins.
                map.entry(weekday).or_insert(id);
            }
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn holiday(id: i64, on: NaiveDate, days: u32) -> SpecialEvent {
        SpecialEvent {
            id: Some(id),
            name: format!("holiday-{id}"),
            schedule: EventSchedule::OneOff { date: on },
            duration_days: days,
            department_id: None,
            kind: EventKind::Holiday,
            selected: true,
        }
    }

    fn weekly(id: i64, weekday: u8) -> SpecialEvent {
        SpecialEvent {
            id: Some(id),
            name: format!("weekly-{id}"),
            schedule: EventSchedule::Weekly { weekday },
            duration_days: 1,
            department_id: None,
            kind: EventKind::Periodic,
            selected: true,
        }
    }

    #[test]
    fn test_applicable_events_scoping() {
        let mut dept_scoped = holiday(1, date(2026, 9, 2), 1);
        dept_scoped.department_id = Some(7);
        let mut other_dept = holiday(2, date(2026, 9, 3), 1);
        other_dept.department_id = Some(8);
        let global = holiday(3, date(2026, 9, 4), 1);

        let events = vec![dept_scoped, other_dept, global];
        let filtered = applicable_events(&events, 7);
        let ids: Vec<_> = filtered.iter().map(|e| e.id.unwrap()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_applicable_events_idempotent() {
        let events = vec![
            holiday(1, date(2026, 9, 2), 1),
            {
                let mut e = holiday(2, date(2026, 9, 3), 1);
                e.department_id = Some(9);
                e
            },
        ];
        let once = applicable_events(&events, 7);
        let twice = applicable_events(&once, 7);
        assert_eq!(once.len(), twice.len());
        let a: Vec<_> = once.iter().map(|e| e.id).collect();
        let b: Vec<_> = twice.iter().map(|e| e.id).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_blackout_spans_duration() {
        let events = vec![holiday(1, date(2026, 9, 2), 3)];
        let blocked = blackout_dates(&events);
        assert!(blocked.contains(&date(2026, 9, 2)));
        assert!(blocked.contains(&date(2026, 9, 3)));
        assert!(blocked.contains(&date(2026, 9, 4)));
        assert!(!blocked.contains(&date(2026, 9, 5)));
    }

    #[test]
    fn test_deselected_event_not_applied() {
        let mut event = holiday(1, date(2026, 9, 2), 1);
        event.selected = false;
        let events = vec![event];
        assert!(applied_events(&events).is_empty());
        assert!(blackout_dates(&events).is_empty());
    }

    #[test]
    fn test_weekly_events_annotate_not_block() {
        let events = vec![weekly(11, 1)];
        assert!(blackout_dates(&events).is_empty());
        let annotations = weekly_annotations(&events);
        assert_eq!(annotations.get(&1), Some(&11));
        assert!(annotations.get(&2).is_none());
    }

    #[test]
    fn test_weekly_annotation_first_wins() {
        let events = vec![weekly(11, 1), weekly(12, 1)];
        assert_eq!(weekly_annotations(&events).get(&1), Some(&11));
    }
}
