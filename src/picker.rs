use crate::theme::{
    picker::{READY_ENTER_STYLE, UNFILLED_CELL_STYLE},
    BASE_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Margin, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Clear, StatefulWidget, Widget},
};
use time::{Date, Month};

const OUTER_WIDTH: u16 = 19;
const OUTER_HEIGHT: u16 = 8;

/// Number of digits in a YYYYMMDD date
const DIGITS: usize = 8;

/// Placeholder letters shown for unfilled digits
const PLACEHOLDERS: [&str; DIGITS] = ["Y", "Y", "Y", "Y", "M", "M", "D", "D"];

/// The date picker dialog, opened over the calendar to choose a date to jump
/// to
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct DatePicker;

impl StatefulWidget for DatePicker {
    type State = PickerState;

    /*
     * ...................
     * .┌─ Pick a Date ─┐.
     * .│               │.
     * .│  -YYYY-MM-DD  │.
     * .│               │.
     * .│    [ENTER]    │.
     * .└───────────────┘.
     * ...................
     */

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let [outer_area] = Layout::horizontal([OUTER_WIDTH])
            .flex(Flex::Center)
            .areas(area);
        let [outer_area] = Layout::vertical([OUTER_HEIGHT])
            .flex(Flex::Center)
            .areas(outer_area);
        Clear.render(outer_area, buf);
        Block::new().style(BASE_STYLE).render(outer_area, buf);
        let block_area = outer_area.inner(Margin::new(1, 1));
        Block::bordered()
            .title(" Pick a Date ")
            .title_alignment(Alignment::Center)
            .render(block_area, buf);
        let text_area = block_area.inner(Margin::new(1, 1));
        state.to_text().render(text_area, buf);
    }
}

/// Digits entered so far.  Input proceeds left to right; once all eight
/// digits are filled, ENTER submits.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct PickerState {
    negative: bool,
    digits: [Option<u8>; DIGITS],
    pos: usize,
}

impl PickerState {
    /// A picker already filled in with `date`, ready to submit
    pub(crate) fn with_date(date: Date) -> PickerState {
        let year = date.year().unsigned_abs();
        let month = u8::from(date.month());
        let day = date.day();
        let year_digit = |place: u32| u8::try_from(year / place % 10).ok();
        let digits = [
            year_digit(1000),
            year_digit(100),
            year_digit(10),
            year_digit(1),
            Some(month / 10),
            Some(month % 10),
            Some(day / 10),
            Some(day % 10),
        ];
        PickerState {
            negative: date.year() < 0,
            digits,
            pos: DIGITS,
        }
    }

    fn to_text(self) -> Text<'static> {
        Text::from_iter([
            Line::styled("", BASE_STYLE),
            self.to_line(),
            Line::styled("", BASE_STYLE),
            // Style a span rather than the line so that only "[ENTER]" and
            // not its centering padding is underlined
            Line::from(Span::styled(
                "[ENTER]",
                if self.pos == DIGITS {
                    READY_ENTER_STYLE
                } else {
                    BASE_STYLE
                },
            )),
        ])
        .centered()
    }

    fn to_line(self) -> Line<'static> {
        let mut spans = vec![Span::styled(
            if self.negative { "-" } else { " " },
            BASE_STYLE,
        )];
        for (i, (dg, fallback)) in std::iter::zip(self.digits, PLACEHOLDERS).enumerate() {
            if i == 4 || i == 6 {
                spans.push(Span::styled("-", BASE_STYLE));
            }
            spans.push(match dg {
                Some(d) => Span::styled(d.to_string(), BASE_STYLE),
                None => Span::styled(fallback, UNFILLED_CELL_STYLE),
            });
        }
        Line::from_iter(spans)
    }

    pub(crate) fn handle_input(&mut self, input: PickerInput) -> PickerOutput {
        match (input, self.pos) {
            (PickerInput::Negative, 0) => {
                self.negative = !self.negative;
                PickerOutput::Ok
            }
            (PickerInput::Positive, 0) => {
                self.negative = false;
                PickerOutput::Ok
            }
            (PickerInput::Digit(d), 0..DIGITS) if d < 10 => {
                self.digits[self.pos] = Some(d);
                self.pos += 1;
                PickerOutput::Ok
            }
            (PickerInput::Backspace, 1..) => {
                self.pos -= 1;
                self.digits[self.pos] = None;
                PickerOutput::Ok
            }
            (PickerInput::Enter, DIGITS) => match self.to_date() {
                Some(date) => PickerOutput::Pick(date),
                None => PickerOutput::Invalid,
            },
            _ => PickerOutput::Invalid,
        }
    }

    fn to_date(self) -> Option<Date> {
        let number = |range: std::ops::Range<usize>| {
            self.digits
                .get(range)?
                .iter()
                .try_fold(0u16, |acc, dg| Some(acc * 10 + u16::from((*dg)?)))
        };
        let mut year = i32::from(number(0..4)?);
        if self.negative {
            year = -year;
        }
        let month = Month::try_from(u8::try_from(number(4..6)?).ok()?).ok()?;
        let day = u8::try_from(number(6..8)?).ok()?;
        Date::from_calendar_date(year, month, day).ok()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum PickerInput {
    Negative,
    Positive,
    Digit(u8),
    Backspace,
    Enter,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum PickerOutput {
    Ok,
    Invalid,
    Pick(Date),
}
