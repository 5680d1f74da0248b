use super::util::{DayMarker, DAYS_IN_WEEK};
use super::weeks::WeekPager;
use crate::theme::{
    BASE_STYLE, MARKED_STYLE, RULE_STYLE, TITLE_STYLE, TODAY_MODIFIER, WEEKDAY_STYLE,
};
use ratatui::{prelude::*, widgets::*};
use std::marker::PhantomData;

/// Number of columns per day of week
const DAY_WIDTH: u16 = 6;

/// Width of the week strip in columns
const STRIP_WIDTH: u16 = DAY_WIDTH * DAYS_IN_WEEK as u16;

/// Number of lines taken up by the week strip: title, weekday labels, day
/// numbers, and a rule
pub(crate) const STRIP_LINES: u16 = 4;

const TITLE_LINE: u16 = 0;
const LABEL_LINE: u16 = 1;
const DAY_LINE: u16 = 2;
const RULE_LINE: u16 = 3;

const ACS_HLINE: char = '─';

/// The header: one row of seven days, swiped a week at a time
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct WeekStrip<M> {
    _data: PhantomData<M>,
}

impl<M> WeekStrip<M> {
    pub(crate) fn new() -> WeekStrip<M> {
        WeekStrip { _data: PhantomData }
    }
}

impl<M: DayMarker> StatefulWidget for WeekStrip<M> {
    type State = WeekPager<M>;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let area = Rect {
            x: area.x + area.width.saturating_sub(STRIP_WIDTH) / 2,
            width: STRIP_WIDTH.min(area.width),
            ..area
        };
        let mut canvas = BufferCanvas::new(area, buf);
        let selected = state.selected();
        canvas.mvprint(
            TITLE_LINE,
            0,
            format!("{} {}", selected.date.month(), selected.date.year()),
            TITLE_STYLE,
        );
        let offset = format!("week {:+}", state.week_offset());
        let offset_width = u16::try_from(offset.len()).unwrap_or(u16::MAX);
        canvas.mvprint(
            TITLE_LINE,
            STRIP_WIDTH.saturating_sub(offset_width),
            offset,
            BASE_STYLE,
        );
        for (i, cell) in std::iter::zip(0u16.., state.week()) {
            let x = DAY_WIDTH * i;
            canvas.mvprint(
                LABEL_LINE,
                x,
                format!("{:^width$}", cell.weekday_abbr, width = usize::from(DAY_WIDTH)),
                WEEKDAY_STYLE,
            );
            let mut style = if cell.marked { MARKED_STYLE } else { BASE_STYLE };
            if state.is_today(cell.date) {
                style = style.add_modifier(TODAY_MODIFIER);
            }
            let is_selected = usize::from(i) == usize::from(state.day_index());
            canvas.mvprint(DAY_LINE, x + 1, cell.show(is_selected), style);
        }
        canvas.hline(RULE_LINE, 0, ACS_HLINE, STRIP_WIDTH);
    }
}

/// The body: the selected day's page
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct DayPage<M> {
    _data: PhantomData<M>,
}

impl<M> DayPage<M> {
    pub(crate) fn new() -> DayPage<M> {
        DayPage { _data: PhantomData }
    }
}

impl<M: DayMarker> StatefulWidget for DayPage<M> {
    type State = WeekPager<M>;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let cell = state.selected();
        let date = cell.date;
        let mut lines = vec![
            Line::styled(date.weekday().to_string(), TITLE_STYLE),
            Line::styled(
                format!("{} {} {}", date.day(), date.month(), date.year()),
                BASE_STYLE,
            ),
        ];
        if state.is_today(date) {
            lines.push(Line::styled("Today", MARKED_STYLE.add_modifier(TODAY_MODIFIER)));
        } else {
            lines.push(Line::raw(""));
        }
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            format!(
                "Day {} of the week ({})  |  Week offset {:+}",
                date.day_of_week_index() + 1,
                cell.weekday_abbr,
                state.week_offset()
            ),
            BASE_STYLE,
        ));
        Paragraph::new(Text::from(lines))
            .alignment(Alignment::Center)
            .style(BASE_STYLE)
            .block(Block::bordered().border_style(RULE_STYLE))
            .render(area, buf);
    }
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    // Text running past the right edge of the area is truncated.
    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Style) {
        if y < self.area.height && x < self.area.width {
            self.buf.set_stringn(
                x + self.area.x,
                y + self.area.y,
                s,
                usize::from(self.area.width - x),
                style,
            );
        }
    }

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16) {
        self.mvprint(y, x, String::from(ch).repeat(length.into()), RULE_STYLE);
    }
}
