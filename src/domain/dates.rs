// SPDX-License-Identifier: MPL-2.0
//! Calendar math shared by the booking screens.

use chrono::{Datelike, NaiveDate};

/// A month laid out as Monday-first weeks. Cells outside the month
/// are `None`.
pub type MonthGrid = Vec<[Option<NaiveDate>; 7]>;

/// Lays out the given month for a calendar view.
///
/// Returns an empty grid for an out-of-range year/month pair.
#[must_use]
pub fn month_grid(year: i32, month: u32) -> MonthGrid {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };

    let mut weeks = Vec::with_capacity(6);
    let mut week = [None; 7];
    let mut slot = first.weekday().num_days_from_monday() as usize;
    let mut day = first;
    loop {
        week[slot] = Some(day);
        slot += 1;
        if slot == 7 {
            weeks.push(week);
            week = [None; 7];
            slot = 0;
        }
        match day.succ_opt() {
            Some(next) if next.month() == month => day = next,
            _ => break,
        }
    }
    if slot != 0 {
        weeks.push(week);
    }
    weeks
}

/// Every date from `start` through `end`, inclusive. A reversed range
/// yields nothing.
#[must_use]
pub fn expand_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut day = start;
    while day <= end {
        dates.push(day);
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    dates
}

/// Day count over an inclusive range. The order of the endpoints does
/// not matter, so a half-filled picker still previews a count.
#[must_use]
pub fn days_in_range(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days().abs() + 1
}

/// Moves a first-of-month anchor by whole months in either direction.
#[must_use]
pub fn shift_month(anchor: NaiveDate, delta: i32) -> NaiveDate {
    let months = anchor.year() * 12 + anchor.month0() as i32 + delta;
    let year = months.div_euclid(12);
    let month = months.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(anchor)
}

/// First day of the month the given date falls in.
#[must_use]
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Day/month/year display form without zero padding, the format used
/// across the reservation tables.
#[must_use]
pub fn display_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.day(), date.month(), date.year())
}

/// Wire form for date fields, `YYYY-MM-DD`.
#[must_use]
pub fn wire_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
    }

    #[test]
    fn month_grid_starts_weeks_on_monday() {
        // September 2026 starts on a Tuesday.
        let grid = month_grid(2026, 9);
        assert_eq!(grid.len(), 5);
        assert_eq!(grid[0][0], None);
        assert_eq!(grid[0][1], Some(date(2026, 9, 1)));
        assert_eq!(grid[0][6], Some(date(2026, 9, 6)));
        assert_eq!(grid[4][2], Some(date(2026, 9, 30)));
        assert_eq!(grid[4][3], None);
    }

    #[test]
    fn month_grid_handles_exact_four_week_months() {
        // February 2027 starts on a Monday and has 28 days.
        let grid = month_grid(2027, 2);
        assert_eq!(grid.len(), 4);
        assert_eq!(grid[0][0], Some(date(2027, 2, 1)));
        assert_eq!(grid[3][6], Some(date(2027, 2, 28)));
    }

    #[test]
    fn month_grid_rejects_invalid_months() {
        assert!(month_grid(2026, 13).is_empty());
        assert!(month_grid(2026, 0).is_empty());
    }

    #[test]
    fn expand_range_is_inclusive() {
        let dates = expand_range(date(2026, 9, 28), date(2026, 10, 2));
        assert_eq!(
            dates,
            vec![
                date(2026, 9, 28),
                date(2026, 9, 29),
                date(2026, 9, 30),
                date(2026, 10, 1),
                date(2026, 10, 2),
            ]
        );
        assert_eq!(
            expand_range(date(2026, 9, 1), date(2026, 9, 1)),
            vec![date(2026, 9, 1)]
        );
    }

    #[test]
    fn expand_range_is_empty_when_reversed() {
        assert!(expand_range(date(2026, 9, 2), date(2026, 9, 1)).is_empty());
    }

    #[test]
    fn days_in_range_counts_both_endpoints() {
        assert_eq!(days_in_range(date(2026, 9, 1), date(2026, 9, 1)), 1);
        assert_eq!(days_in_range(date(2026, 9, 1), date(2026, 9, 3)), 3);
        // Reversed endpoints still preview a positive count.
        assert_eq!(days_in_range(date(2026, 9, 3), date(2026, 9, 1)), 3);
    }

    #[test]
    fn shift_month_crosses_year_boundaries() {
        assert_eq!(shift_month(date(2026, 1, 1), -1), date(2025, 12, 1));
        assert_eq!(shift_month(date(2026, 12, 1), 1), date(2027, 1, 1));
        assert_eq!(shift_month(date(2026, 6, 1), 0), date(2026, 6, 1));
        assert_eq!(shift_month(date(2026, 6, 1), -18), date(2024, 12, 1));
    }

    #[test]
    fn display_date_drops_zero_padding() {
        assert_eq!(display_date(date(2026, 9, 5)), "5/9/2026");
        assert_eq!(display_date(date(2026, 12, 25)), "25/12/2026");
    }

    #[test]
    fn wire_date_is_iso_padded() {
        assert_eq!(wire_date(date(2026, 9, 5)), "2026-09-05");
    }

    #[test]
    fn first_of_month_anchors_any_date() {
        assert_eq!(first_of_month(date(2026, 9, 17)), date(2026, 9, 1));
        assert_eq!(first_of_month(date(2026, 9, 1)), date(2026, 9, 1));
    }
}
