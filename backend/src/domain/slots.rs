//! Slot generation and interval arithmetic.
//!
//! All intervals are half-open `[start, end)` in tenant-local civil time.
//! Half-open semantics mean a booking ending at 10:00 never conflicts with
//! one starting at 10:00.

use chrono::{Duration, NaiveDateTime, NaiveTime};

/// Validation errors for [`SlotGranularity`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlotGranularityError {
    /// Granularity must be a positive number of minutes.
    #[error("slot granularity must be greater than zero minutes")]
    Zero,
    /// Granularity must divide a day evenly so the grid is stable.
    #[error("slot granularity must divide 24 hours evenly, got {minutes} minutes")]
    UnevenDay { minutes: u32 },
}

/// Fixed spacing between candidate slot start times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotGranularity(u32);

impl SlotGranularity {
    /// Construct a granularity, rejecting zero and values that do not divide
    /// a day evenly.
    pub fn from_minutes(minutes: u32) -> Result<Self, SlotGranularityError> {
        if minutes == 0 {
            return Err(SlotGranularityError::Zero);
        }
        if (24 * 60) % minutes != 0 {
            return Err(SlotGranularityError::UnevenDay { minutes });
        }
        Ok(Self(minutes))
    }

    /// The granularity in minutes.
    pub fn minutes(&self) -> u32 {
        self.0
    }

    /// The granularity as a chrono duration.
    pub fn as_duration(&self) -> Duration {
        Duration::minutes(i64::from(self.0))
    }
}

impl Default for SlotGranularity {
    /// 30 minutes, the observed product default.
    fn default() -> Self {
        Self(30)
    }
}

/// Half-open interval `[start, end)` in tenant-local civil time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeInterval {
    /// Construct an interval. Returns `None` when `start >= end` (an empty
    /// or inverted interval blocks nothing and books nothing).
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    /// Inclusive start of the interval.
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Exclusive end of the interval.
    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Strict interval overlap: `other.start < self.end && other.end >
    /// self.start`. Touching endpoints do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        other.start < self.end && other.end > self.start
    }

    /// Whether `self` lies entirely within `other`.
    pub fn within(&self, other: &Self) -> bool {
        other.start <= self.start && self.end <= other.end
    }
}

/// Generate the ordered candidate slot start times for an open/close window.
///
/// Starts at `opens_at` and steps by the granularity while
/// `start + granularity <= closes_at`. Pure function of its inputs; a closed
/// or inverted window yields no slots.
pub fn slot_starts(
    opens_at: NaiveTime,
    closes_at: NaiveTime,
    granularity: SlotGranularity,
) -> Vec<NaiveTime> {
    let step = granularity.as_duration();
    let mut starts = Vec::new();
    let mut cursor = opens_at;
    loop {
        // NaiveTime addition wraps at midnight; a wrapped slot end has
        // spilled past the day and cannot fit before the close.
        let (end, overflow) = cursor.overflowing_add_signed(step);
        if overflow != 0 || end > closes_at {
            break;
        }
        starts.push(cursor);
        cursor = end;
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
    }

    fn dt(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 9, 1)
            .expect("valid date")
            .and_time(t(h, m))
    }

    #[rstest]
    fn thirty_minute_grid_for_nine_to_six() {
        let starts = slot_starts(t(9, 0), t(18, 0), SlotGranularity::default());
        assert_eq!(starts.len(), 18);
        assert_eq!(starts.first(), Some(&t(9, 0)));
        assert_eq!(starts.last(), Some(&t(17, 30)));
        assert!(starts.windows(2).all(|w| w[0] < w[1]), "strictly increasing");
    }

    #[rstest]
    fn closed_or_inverted_window_yields_nothing() {
        assert!(slot_starts(t(18, 0), t(9, 0), SlotGranularity::default()).is_empty());
        assert!(slot_starts(t(9, 0), t(9, 0), SlotGranularity::default()).is_empty());
    }

    #[rstest]
    fn last_slot_must_fit_before_close() {
        // 09:00-09:45 with 30-minute steps: only 09:00 fits entirely.
        let starts = slot_starts(t(9, 0), t(9, 45), SlotGranularity::default());
        assert_eq!(starts, vec![t(9, 0)]);
    }

    #[rstest]
    fn slots_near_midnight_never_wrap() {
        // 23:30 + 30 minutes wraps to 00:00, which is not before 23:59.
        let starts = slot_starts(t(23, 0), t(23, 59), SlotGranularity::default());
        assert_eq!(starts, vec![t(23, 0)]);
    }

    #[rstest]
    #[case(0)]
    #[case(7)]
    fn granularity_rejects_degenerate_minutes(#[case] minutes: u32) {
        assert!(SlotGranularity::from_minutes(minutes).is_err());
    }

    #[rstest]
    fn touching_intervals_do_not_overlap() {
        // An appointment ending at 10:00 and one starting at 10:00 coexist.
        let a = TimeInterval::new(dt(9, 45), dt(10, 0)).expect("non-empty");
        let b = TimeInterval::new(dt(10, 0), dt(10, 30)).expect("non-empty");
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[rstest]
    fn one_minute_intrusion_overlaps() {
        let a = TimeInterval::new(dt(9, 45), dt(10, 1)).expect("non-empty");
        let b = TimeInterval::new(dt(10, 0), dt(10, 30)).expect("non-empty");
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[rstest]
    fn empty_interval_is_rejected() {
        assert!(TimeInterval::new(dt(10, 0), dt(10, 0)).is_none());
        assert!(TimeInterval::new(dt(10, 30), dt(10, 0)).is_none());
    }

    #[rstest]
    fn within_is_inclusive_of_boundaries() {
        let day = TimeInterval::new(dt(9, 0), dt(18, 0)).expect("non-empty");
        let exact = TimeInterval::new(dt(9, 0), dt(18, 0)).expect("non-empty");
        let spill = TimeInterval::new(dt(17, 30), dt(18, 15)).expect("non-empty");
        assert!(exact.within(&day));
        assert!(!spill.within(&day));
    }
}
