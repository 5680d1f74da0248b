mod util;
mod weeks;
mod widget;
pub(crate) use self::util::{
    on_or_before_today, DayMarker, SimpleDate, WeekFactory, WeekStart, WeekdayLabels,
};
pub(crate) use self::weeks::WeekPager;
pub(crate) use self::widget::{DayPage, WeekStrip, STRIP_LINES};
use time::Date;

/// Marking rule used by the application: a plain function of today and the
/// date being drawn
pub(crate) type MarkFn = fn(Date, Date) -> bool;
