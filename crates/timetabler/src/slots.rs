//! The fixed daily slot catalog and week-to-date arithmetic.
//!
//! A teaching day has 9 periods grouped into 5 blocks. Each block can absorb
//! up to [`SLOT_CAPACITY_HOURS`] contact hours of a single course. The
//! catalog is a process-wide constant and is never persisted.

use chrono::{Datelike, Duration, NaiveDate};

/// Maximum contact hours a single slot can absorb.
pub const SLOT_CAPACITY_HOURS: i64 = 3;

/// Teaching days per week (Monday through Friday).
pub const DAYS_PER_WEEK: u8 = 5;

/// One daily teaching block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    start: (u32, u32),
    end: (u32, u32),
}

impl TimeSlot {
    /// Start of the block as `HH:MM:SS`.
    pub fn start_time(&self) -> String {
        format!("{:02}:{:02}:00", self.start.0, self.start.1)
    }

    /// End of the block as `HH:MM:SS`.
    pub fn end_time(&self) -> String {
        format!("{:02}:{:02}:00", self.end.0, self.end.1)
    }

    /// Minutes since midnight of the block start, for ordering.
    pub fn start_minutes(&self) -> u32 {
        self.start.0 * 60 + self.start.1
    }
}

/// The five teaching blocks of a day, in catalog order.
pub const TIME_SLOTS: [TimeSlot; 5] = [
    TimeSlot { start: (7, 30), end: (9, 0) },
    TimeSlot { start: (9, 10), end: (10, 40) },
    TimeSlot { start: (10, 50), end: (12, 20) },
    TimeSlot { start: (13, 30), end: (15, 0) },
    TimeSlot { start: (15, 10), end: (16, 40) },
];

/// Slot indices in allocation order.
///
/// When `prioritize_morning` is set the slots are sorted ascending by start
/// time; otherwise catalog order is used. The default catalog is already
/// morning-first, so this only differs if the catalog is ever reordered.
pub fn slot_order(prioritize_morning: bool) -> Vec<usize> {
    let mut order: Vec<usize> = (0..TIME_SLOTS.len()).collect();
    if prioritize_morning {
        order.sort_by_key(|&i| TIME_SLOTS[i].start_minutes());
    }
    order
}

/// Monday of the week containing `semester_start`.
///
/// All week arithmetic anchors on this date so that `(week 1, day 1)` is
/// always a Monday even when the configured start falls mid-week.
pub fn semester_monday(semester_start: NaiveDate) -> NaiveDate {
    let offset = semester_start.weekday().num_days_from_monday() as i64;
    semester_start - Duration::days(offset)
}

/// Calendar date of `(week, day)` counted from the semester start.
///
/// `week` is 1-based; `day` is 1 (Monday) through 5 (Friday).
pub fn date_for(semester_start: NaiveDate, week: u32, day: u8) -> NaiveDate {
    debug_assert!(week >= 1);
    debug_assert!((1..=DAYS_PER_WEEK).contains(&day));
    semester_monday(semester_start)
        + Duration::days((week as i64 - 1) * 7 + (day as i64 - 1))
}
