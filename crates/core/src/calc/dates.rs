//! Relative-to-absolute date resolution.
//!
//! All schedule dates are date-only (`NaiveDate`, serialized `YYYY-MM-DD`).

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Which way an offset moves from its anchor date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetDirection {
    /// Count forward from the anchor (e.g. days after booking).
    After,
    /// Count backward from the anchor (e.g. days before departure).
    Before,
}

/// Moves `anchor` by `offset_days` whole days in `direction`.
///
/// Returns `None` if the result falls outside the representable date range.
///
/// ```
/// use chrono::NaiveDate;
/// use wayfare_core::calc::{OffsetDirection, resolve_relative_date};
///
/// let departure = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
/// let due = resolve_relative_date(departure, 46, OffsetDirection::Before).unwrap();
/// assert_eq!(due.to_string(), "2025-04-16");
/// ```
#[must_use]
pub fn resolve_relative_date(
    anchor: NaiveDate,
    offset_days: u32,
    direction: OffsetDirection,
) -> Option<NaiveDate> {
    let days = Days::new(u64::from(offset_days));
    match direction {
        OffsetDirection::After => anchor.checked_add_days(days),
        OffsetDirection::Before => anchor.checked_sub_days(days),
    }
}

/// Whole days from `earlier` to `later` (negative when `later` precedes it).
#[must_use]
pub fn days_between(later: NaiveDate, earlier: NaiveDate) -> i64 {
    (later - earlier).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(date(2025, 1, 31), 1, OffsetDirection::After, date(2025, 2, 1))]
    #[case(date(2024, 2, 28), 1, OffsetDirection::After, date(2024, 2, 29))]
    #[case(date(2025, 6, 1), 45, OffsetDirection::Before, date(2025, 4, 17))]
    #[case(date(2025, 3, 1), 1, OffsetDirection::Before, date(2025, 2, 28))]
    #[case(date(2025, 6, 1), 0, OffsetDirection::Before, date(2025, 6, 1))]
    fn test_resolve_relative_date(
        #[case] anchor: NaiveDate,
        #[case] offset: u32,
        #[case] direction: OffsetDirection,
        #[case] expected: NaiveDate,
    ) {
        assert_eq!(resolve_relative_date(anchor, offset, direction), Some(expected));
    }

    #[test]
    fn test_resolve_out_of_range() {
        assert_eq!(
            resolve_relative_date(NaiveDate::MAX, 1, OffsetDirection::After),
            None
        );
    }

    #[test]
    fn test_days_between() {
        assert_eq!(days_between(date(2025, 6, 1), date(2025, 4, 16)), 46);
        assert_eq!(days_between(date(2025, 6, 1), date(2025, 4, 18)), 44);
        assert_eq!(days_between(date(2025, 4, 18), date(2025, 6, 1)), -44);
    }

    #[test]
    fn test_resolved_date_serializes_date_only() {
        let due = resolve_relative_date(date(2025, 1, 1), 30, OffsetDirection::After).unwrap();
        assert_eq!(serde_json::to_string(&due).unwrap(), "\"2025-01-31\"");
    }
}
