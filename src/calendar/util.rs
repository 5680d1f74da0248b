use std::iter::successors;
use std::ops::Index;
use std::str::FromStr;
use thiserror::Error;
use time::{Date, Month, OffsetDateTime, Weekday};

pub(crate) const DAYS_IN_WEEK: u8 = 7;

/// The weekday treated as index 0 of every week, stored as a count of days
/// after Sunday (0 = Sunday, 1 = Monday, ...)
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct WeekStart(u8);

impl WeekStart {
    pub(crate) fn new(days_after_sunday: u8) -> Result<WeekStart, InvalidWeekStart> {
        if days_after_sunday < DAYS_IN_WEEK {
            Ok(WeekStart(days_after_sunday))
        } else {
            Err(InvalidWeekStart(days_after_sunday.to_string()))
        }
    }

    pub(crate) fn weekday(self) -> Weekday {
        Weekday::Sunday.nth_next(self.0)
    }

    /// Zero-based position of `date` within a week beginning on this weekday.
    ///
    /// This is `(n + 7 - start - 1) mod 7`, where `n` is the 1-based,
    /// Sunday-first weekday number of `date`.
    pub(crate) fn day_index(self, date: Date) -> u8 {
        (date.weekday().number_from_sunday() + DAYS_IN_WEEK - self.0 - 1) % DAYS_IN_WEEK
    }
}

impl From<Weekday> for WeekStart {
    fn from(wd: Weekday) -> WeekStart {
        WeekStart(wd.number_days_from_sunday())
    }
}

impl FromStr for WeekStart {
    type Err = InvalidWeekStart;

    // Accepts "0" through "6" or a weekday name, full or three-letter, in any
    // case
    fn from_str(s: &str) -> Result<WeekStart, InvalidWeekStart> {
        if let Ok(n) = s.parse::<u8>() {
            return WeekStart::new(n);
        }
        let wanted = s.to_ascii_lowercase();
        (0..DAYS_IN_WEEK)
            .map(|i| Weekday::Sunday.nth_next(i))
            .find(|wd| {
                let name = wd.to_string().to_ascii_lowercase();
                name == wanted || (wanted.len() == 3 && name.starts_with(&wanted))
            })
            .map(WeekStart::from)
            .ok_or_else(|| InvalidWeekStart(s.to_owned()))
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("invalid start of week {0:?}; expected 0-6 (0 = Sunday) or a weekday name")]
pub(crate) struct InvalidWeekStart(String);

/// A calendar date together with its position in a week
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct SimpleDate {
    date: Date,
    day_of_week_index: u8,
}

impl SimpleDate {
    pub(crate) fn new(date: Date, week_start: WeekStart) -> SimpleDate {
        SimpleDate {
            date,
            day_of_week_index: week_start.day_index(date),
        }
    }

    /// Uses the calendar date as seen in the date-time's own UTC offset
    pub(crate) fn from_datetime(dt: OffsetDateTime, week_start: WeekStart) -> SimpleDate {
        SimpleDate::new(dt.date(), week_start)
    }

    pub(crate) fn date(&self) -> Date {
        self.date
    }

    pub(crate) fn year(&self) -> i32 {
        self.date.year()
    }

    pub(crate) fn month(&self) -> Month {
        self.date.month()
    }

    pub(crate) fn day(&self) -> u8 {
        self.date.day()
    }

    pub(crate) fn day_of_week_index(&self) -> u8 {
        self.day_of_week_index
    }

    pub(crate) fn weekday(&self) -> Weekday {
        self.date.weekday()
    }
}

/// Weekday abbreviations in Sunday-first order
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct WeekdayLabels([&'static str; DAYS_IN_WEEK as usize]);

impl WeekdayLabels {
    pub(crate) const SINGLE_LETTER: WeekdayLabels =
        WeekdayLabels(["S", "M", "T", "W", "T", "F", "S"]);

    pub(crate) fn label(&self, day_index: u8, week_start: WeekStart) -> &'static str {
        self.0[usize::from((day_index + week_start.0) % DAYS_IN_WEEK)]
    }
}

pub(crate) trait DayMarker {
    fn is_marked(&self, today: Date, candidate: Date) -> bool;
}

impl<F: Fn(Date, Date) -> bool> DayMarker for F {
    fn is_marked(&self, today: Date, candidate: Date) -> bool {
        self(today, candidate)
    }
}

pub(crate) fn on_or_before_today(today: Date, candidate: Date) -> bool {
    candidate <= today
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct DayCell {
    pub(crate) date: SimpleDate,
    /// Day of the month as text
    pub(crate) label: String,
    pub(crate) weekday_abbr: &'static str,
    pub(crate) marked: bool,
}

impl DayCell {
    pub(crate) fn show(&self, selected: bool) -> String {
        if selected {
            format!("[{:>2}]", self.label)
        } else {
            format!(" {:>2} ", self.label)
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
// Invariant: the cells are seven consecutive dates in ascending order
pub(crate) struct Week([DayCell; DAYS_IN_WEEK as usize]);

impl Week {
    pub(crate) fn iter(&self) -> std::slice::Iter<'_, DayCell> {
        self.0.iter()
    }
}

impl Index<u8> for Week {
    type Output = DayCell;

    fn index(&self, day_index: u8) -> &DayCell {
        &self.0[usize::from(day_index)]
    }
}

impl<'a> IntoIterator for &'a Week {
    type Item = &'a DayCell;
    type IntoIter = std::slice::Iter<'a, DayCell>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Builds weeks of day cells under a fixed start-of-week convention, label
/// table, and marking rule
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct WeekFactory<M> {
    week_start: WeekStart,
    labels: WeekdayLabels,
    marker: M,
}

impl<M: DayMarker> WeekFactory<M> {
    pub(crate) fn new(week_start: WeekStart, labels: WeekdayLabels, marker: M) -> Self {
        WeekFactory {
            week_start,
            labels,
            marker,
        }
    }

    pub(crate) fn simple_date(&self, date: Date) -> SimpleDate {
        SimpleDate::new(date, self.week_start)
    }

    pub(crate) fn label(&self, day_index: u8) -> &'static str {
        self.labels.label(day_index, self.week_start)
    }

    /// Returns the week lying `week_offset` weeks after the one containing
    /// `reference` (negative offsets go backwards).  Cells are marked by
    /// comparing them against `reference` as "today".
    ///
    /// Returns `None` if any day of that week falls outside the range of
    /// representable dates.
    pub(crate) fn week_of_offset(&self, reference: Date, week_offset: i32) -> Option<Week> {
        let shifted = week_offset
            .checked_mul(i32::from(DAYS_IN_WEEK))
            .and_then(|days| reference.to_julian_day().checked_add(days))
            .and_then(|jd| Date::from_julian_day(jd).ok())?;
        let anchor = Date::from_julian_day(
            shifted.to_julian_day() - i32::from(self.week_start.day_index(shifted)),
        )
        .ok()?;
        let cells = iter_days_from(anchor)
            .take(DAYS_IN_WEEK.into())
            .map(|date| self.make_cell(reference, date))
            .collect::<Vec<_>>();
        cells.try_into().ok().map(Week)
    }

    /// Whole weeks from the week containing `a` to the week containing `b`
    pub(crate) fn weeks_offset_between(&self, a: SimpleDate, b: SimpleDate) -> i32 {
        weeks_offset_between(a, b, self.week_start)
    }

    fn make_cell(&self, today: Date, date: Date) -> DayCell {
        let sd = self.simple_date(date);
        DayCell {
            date: sd,
            label: sd.day().to_string(),
            weekday_abbr: self.label(sd.day_of_week_index()),
            marked: self.marker.is_marked(today, date),
        }
    }
}

/// Number of whole weeks from the week containing `a` to the week containing
/// `b`: positive when `b`'s week is later, negative when earlier, zero when
/// they share a week.
///
/// Both dates are first moved back to the start of their weeks, and the
/// difference between those anchors is counted in calendar days.
pub(crate) fn weeks_offset_between(a: SimpleDate, b: SimpleDate, week_start: WeekStart) -> i32 {
    let days = anchor_julian_day(b.date(), week_start) - anchor_julian_day(a.date(), week_start);
    debug_assert_eq!(
        days % i32::from(DAYS_IN_WEEK),
        0,
        "week anchors should be a whole number of weeks apart"
    );
    days / i32::from(DAYS_IN_WEEK)
}

fn anchor_julian_day(date: Date, week_start: WeekStart) -> i32 {
    date.to_julian_day() - i32::from(week_start.day_index(date))
}

fn iter_days_from(date: Date) -> impl Iterator<Item = Date> {
    successors(Some(date), |&d| d.next_day())
}
