use super::util::{DayCell, DayMarker, SimpleDate, Week, WeekFactory, DAYS_IN_WEEK};
use std::collections::HashMap;
use thiserror::Error;
use time::Date;

/// Weeks computed so far, keyed by their offset in weeks from the week
/// containing today
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct WeekCache(HashMap<i32, Week>);

impl WeekCache {
    pub(crate) fn get(&self, week_offset: i32) -> Option<&Week> {
        self.0.get(&week_offset)
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    // An offset that is already cached is never recomputed or replaced.
    // Returns whether the offset is cached afterwards.
    fn insert_with<F>(&mut self, week_offset: i32, make: F) -> bool
    where
        F: FnOnce() -> Option<Week>,
    {
        if self.0.contains_key(&week_offset) {
            return true;
        }
        match make() {
            Some(week) => {
                self.0.insert(week_offset, week);
                true
            }
            None => false,
        }
    }
}

/// The week strip and day pager state: which week is shown and which of its
/// days is selected
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct WeekPager<M> {
    today: Date,
    week_offset: i32,
    day_index: u8,
    cache: WeekCache,
    factory: WeekFactory<M>,
}

impl<M: DayMarker> WeekPager<M> {
    pub(crate) fn new(today: Date, factory: WeekFactory<M>) -> Result<Self, OutOfTimeError> {
        let day_index = factory.simple_date(today).day_of_week_index();
        let mut pager = WeekPager {
            today,
            week_offset: 0,
            day_index,
            cache: WeekCache::default(),
            factory,
        };
        pager.refresh(0)?;
        Ok(pager)
    }

    pub(crate) fn start_date(mut self, date: Date) -> Self {
        if let Err(e) = self.jump_to_date(date) {
            log::warn!("Cannot start at {date}: {e}; starting at today instead");
        }
        self
    }

    pub(crate) fn week_offset(&self) -> i32 {
        self.week_offset
    }

    pub(crate) fn day_index(&self) -> u8 {
        self.day_index
    }

    pub(crate) fn week(&self) -> &Week {
        self.cache
            .get(self.week_offset)
            .expect("the selected week should always be cached")
    }

    pub(crate) fn selected(&self) -> &DayCell {
        &self.week()[self.day_index]
    }

    /// Ensures that the week at `week_offset` and its neighbors on either side
    /// are cached.  Only a failure to compute the middle week is an error.
    pub(crate) fn refresh(&mut self, week_offset: i32) -> Result<(), OutOfTimeError> {
        let before = self.cache.len();
        let mut cached = false;
        for offset in [week_offset.checked_sub(1), Some(week_offset), week_offset.checked_add(1)]
            .into_iter()
            .flatten()
        {
            let ok = self.cache.insert_with(offset, || {
                self.factory.week_of_offset(self.today, offset)
            });
            if offset == week_offset {
                cached = ok;
            }
        }
        if self.cache.len() > before {
            log::debug!(
                "Cached {} week(s) around offset {week_offset}; {} in cache",
                self.cache.len() - before,
                self.cache.len()
            );
        }
        if cached {
            Ok(())
        } else {
            Err(OutOfTimeError)
        }
    }

    // The state is only changed once the target week is known to exist.
    fn move_to(&mut self, week_offset: i32, day_index: u8) -> Result<(), OutOfTimeError> {
        self.refresh(week_offset)?;
        if week_offset != self.week_offset {
            log::debug!("Week offset {} -> {week_offset}", self.week_offset);
        }
        self.week_offset = week_offset;
        self.day_index = day_index;
        Ok(())
    }

    pub(crate) fn next_week(&mut self) -> Result<(), OutOfTimeError> {
        let offset = self.week_offset.checked_add(1).ok_or(OutOfTimeError)?;
        self.move_to(offset, self.day_index)
    }

    pub(crate) fn previous_week(&mut self) -> Result<(), OutOfTimeError> {
        let offset = self.week_offset.checked_sub(1).ok_or(OutOfTimeError)?;
        self.move_to(offset, self.day_index)
    }

    pub(crate) fn next_day(&mut self) -> Result<(), OutOfTimeError> {
        if self.day_index + 1 < DAYS_IN_WEEK {
            self.move_to(self.week_offset, self.day_index + 1)
        } else {
            let offset = self.week_offset.checked_add(1).ok_or(OutOfTimeError)?;
            self.move_to(offset, 0)
        }
    }

    pub(crate) fn previous_day(&mut self) -> Result<(), OutOfTimeError> {
        if let Some(day_index) = self.day_index.checked_sub(1) {
            self.move_to(self.week_offset, day_index)
        } else {
            let offset = self.week_offset.checked_sub(1).ok_or(OutOfTimeError)?;
            self.move_to(offset, DAYS_IN_WEEK - 1)
        }
    }

    /// Selects a day of the current week.  Returns `false` if `day_index` is
    /// not a valid index.
    pub(crate) fn select_day(&mut self, day_index: u8) -> bool {
        if day_index < DAYS_IN_WEEK {
            self.day_index = day_index;
            true
        } else {
            false
        }
    }

    pub(crate) fn jump_to_today(&mut self) {
        self.week_offset = 0;
        self.day_index = self.factory.simple_date(self.today).day_of_week_index();
    }

    /// Selects a date chosen from outside the week strip, scrolling the strip
    /// to the week containing it
    pub(crate) fn jump_to_date(&mut self, date: Date) -> Result<(), OutOfTimeError> {
        let target = self.factory.simple_date(date);
        let offset = self
            .factory
            .weeks_offset_between(self.factory.simple_date(self.today), target);
        log::info!("Jumping to {date} (week offset {offset})");
        self.move_to(offset, target.day_of_week_index())
    }

    pub(crate) fn is_today(&self, date: SimpleDate) -> bool {
        date.date() == self.today
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub(crate) struct OutOfTimeError;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::util::{on_or_before_today, WeekStart, WeekdayLabels};
    use crate::calendar::MarkFn;
    use time::macros::date;

    fn pager(today: Date, week_start: u8) -> WeekPager<MarkFn> {
        let week_start = WeekStart::new(week_start).expect("week start should be valid");
        let marker: MarkFn = on_or_before_today;
        let factory = WeekFactory::new(week_start, WeekdayLabels::SINGLE_LETTER, marker);
        WeekPager::new(today, factory).expect("today should not be at the end of time")
    }

    #[test]
    fn test_new() {
        let p = pager(date!(2022 - 10 - 26), 1);
        assert_eq!(p.week_offset(), 0);
        assert_eq!(p.day_index(), 2);
        assert_eq!(p.selected().date.date(), date!(2022 - 10 - 26));
        assert!(p.is_today(p.selected().date));
        assert_eq!(p.cache.len(), 3);
        assert!(p.cache.get(-1).is_some());
        assert!(p.cache.get(1).is_some());
    }

    #[test]
    fn test_refresh_keeps_existing_weeks() {
        let mut p = pager(date!(2022 - 10 - 26), 1);
        let before = p.cache.get(1).cloned();
        p.refresh(1).expect("week should be in range");
        assert_eq!(p.cache.len(), 4);
        assert_eq!(p.cache.get(1).cloned(), before);
        assert!(p.cache.get(2).is_some());
        p.refresh(1).expect("week should be in range");
        assert_eq!(p.cache.len(), 4);
    }

    #[test]
    fn test_next_and_previous_week() {
        let mut p = pager(date!(2022 - 10 - 26), 1);
        p.next_week().expect("week should be in range");
        assert_eq!(p.week_offset(), 1);
        assert_eq!(p.selected().date.date(), date!(2022 - 11 - 02));
        p.previous_week().expect("week should be in range");
        p.previous_week().expect("week should be in range");
        assert_eq!(p.week_offset(), -1);
        assert_eq!(p.selected().date.date(), date!(2022 - 10 - 19));
        assert!(p.cache.get(-2).is_some());
    }

    #[test]
    fn test_day_moves_cross_weeks() {
        let mut p = pager(date!(2022 - 10 - 30), 1);
        assert_eq!(p.day_index(), 6);
        p.next_day().expect("day should be in range");
        assert_eq!(p.week_offset(), 1);
        assert_eq!(p.day_index(), 0);
        assert_eq!(p.selected().date.date(), date!(2022 - 10 - 31));
        p.previous_day().expect("day should be in range");
        assert_eq!(p.week_offset(), 0);
        assert_eq!(p.day_index(), 6);
        p.previous_day().expect("day should be in range");
        assert_eq!(p.selected().date.date(), date!(2022 - 10 - 29));
    }

    #[test]
    fn test_select_day() {
        let mut p = pager(date!(2022 - 10 - 26), 0);
        assert!(p.select_day(0));
        assert_eq!(p.selected().date.date(), date!(2022 - 10 - 23));
        assert!(!p.select_day(7));
        assert_eq!(p.day_index(), 0);
    }

    #[test]
    fn test_jump_to_date() {
        let mut p = pager(date!(2022 - 10 - 28), 1);
        p.jump_to_date(date!(2022 - 09 - 16))
            .expect("date should be in range");
        assert_eq!(p.week_offset(), -6);
        assert_eq!(p.day_index(), 4);
        assert_eq!(p.selected().date.date(), date!(2022 - 09 - 16));
        assert!(!p.is_today(p.selected().date));
        assert!(p.selected().marked);
        p.jump_to_today();
        assert_eq!(p.week_offset(), 0);
        assert_eq!(p.selected().date.date(), date!(2022 - 10 - 28));
    }

    #[test]
    fn test_start_date() {
        let p = pager(date!(2022 - 10 - 28), 1).start_date(date!(2022 - 11 - 04));
        assert_eq!(p.week_offset(), 1);
        assert_eq!(p.today, date!(2022 - 10 - 28));
        assert_eq!(p.selected().date.date(), date!(2022 - 11 - 04));
        assert!(!p.selected().marked);
    }

    #[test]
    fn test_end_of_time() {
        let mut p = pager(date!(9999 - 12 - 22), 1);
        assert_eq!(p.next_week(), Err(OutOfTimeError));
        assert_eq!(p.week_offset(), 0);
        assert_eq!(p.selected().date.date(), date!(9999 - 12 - 22));
        assert!(p.select_day(6));
        assert_eq!(p.next_day(), Err(OutOfTimeError));
        assert_eq!(p.selected().date.date(), date!(9999 - 12 - 26));
    }
}
