use crate::calendar::{DayMarker, DayPage, WeekPager, WeekStrip, STRIP_LINES};
use crate::help::Help;
use crate::picker::{DatePicker, PickerInput, PickerOutput, PickerState};
use crate::theme::BASE_STYLE;
use crossterm::event::{read, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct App<M> {
    pager: WeekPager<M>,
    state: AppState,
}

impl<M: DayMarker> App<M> {
    pub(crate) fn new(pager: WeekPager<M>) -> App<M> {
        App {
            pager,
            state: AppState::Calendar,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = read()?.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key or tried to move past
    // the end of time
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match &mut self.state {
            AppState::Calendar => match key {
                KeyCode::Char('h') | KeyCode::Left => self.pager.previous_day().is_ok(),
                KeyCode::Char('l') | KeyCode::Right => self.pager.next_day().is_ok(),
                KeyCode::Char('k' | 'w') | KeyCode::Up | KeyCode::PageUp => {
                    self.pager.previous_week().is_ok()
                }
                KeyCode::Char('j' | 'z') | KeyCode::Down | KeyCode::PageDown => {
                    self.pager.next_week().is_ok()
                }
                KeyCode::Char(c @ '1'..='7') => c
                    .to_digit(10)
                    .and_then(|d| u8::try_from(d).ok())
                    .is_some_and(|d| self.pager.select_day(d - 1)),
                KeyCode::Char('0') | KeyCode::Home => {
                    self.pager.jump_to_today();
                    true
                }
                KeyCode::Char('g') => {
                    let date = self.pager.selected().date.date();
                    self.state = AppState::Picking(PickerState::with_date(date));
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Calendar;
                true
            }
            AppState::Picking(state) => {
                if matches!(key, KeyCode::Char('q' | 'g') | KeyCode::Esc) {
                    self.state = AppState::Calendar;
                    return true;
                }
                let input = match key {
                    KeyCode::Char('-') => PickerInput::Negative,
                    KeyCode::Char('+') => PickerInput::Positive,
                    KeyCode::Char(c @ '0'..='9') => match c.to_digit(10).map(u8::try_from) {
                        Some(Ok(d)) => PickerInput::Digit(d),
                        _ => return false,
                    },
                    KeyCode::Backspace | KeyCode::Delete => PickerInput::Backspace,
                    KeyCode::Enter => PickerInput::Enter,
                    _ => return false,
                };
                match state.handle_input(input) {
                    PickerOutput::Ok => true,
                    PickerOutput::Invalid => false,
                    PickerOutput::Pick(date) => {
                        self.state = AppState::Calendar;
                        self.pager.jump_to_date(date).is_ok()
                    }
                }
            }
            AppState::Quitting => false,
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }
}

impl<M: DayMarker> Widget for &mut App<M> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let [strip_area, page_area] =
            Layout::vertical([Constraint::Length(STRIP_LINES), Constraint::Min(0)]).areas(area);
        WeekStrip::new().render(strip_area, buf, &mut self.pager);
        DayPage::new().render(page_area, buf, &mut self.pager);
        if self.state == AppState::Helping {
            Help.render(area, buf);
        } else if let AppState::Picking(ref mut state) = self.state {
            DatePicker.render(area, buf, state);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    Picking(PickerState),
    Quitting,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{on_or_before_today, MarkFn, WeekFactory, WeekStart, WeekdayLabels};
    use time::macros::date;
    use time::Date;

    fn app(today: Date) -> App<MarkFn> {
        let marker: MarkFn = on_or_before_today;
        let factory = WeekFactory::new(
            WeekStart::new(1).expect("week start should be valid"),
            WeekdayLabels::SINGLE_LETTER,
            marker,
        );
        App::new(WeekPager::new(today, factory).expect("today should be in range"))
    }

    fn buffer_lines(buf: &Buffer) -> Vec<String> {
        let area = buf.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect()
    }

    fn selected(app: &App<MarkFn>) -> Date {
        app.pager.selected().date.date()
    }

    #[test]
    fn test_render() {
        let mut app = app(date!(2022 - 10 - 26));
        let area = Rect::new(0, 0, 42, 11);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        let lines = buffer_lines(&buffer);
        assert_eq!(lines[0], "October 2022                       week +0");
        assert_eq!(lines[2], "  24    25   [26]   27    28    29    30  ");
        assert_eq!(lines[5].trim_matches(|c| c == ' ' || c == '│'), "Wednesday");
        assert_eq!(lines[6].trim_matches(|c| c == ' ' || c == '│'), "26 October 2022");
        assert_eq!(lines[7].trim_matches(|c| c == ' ' || c == '│'), "Today");
    }

    #[test]
    fn test_swipes() {
        let mut app = app(date!(2022 - 10 - 26));
        assert!(app.handle_key(KeyCode::Right));
        assert_eq!(selected(&app), date!(2022 - 10 - 27));
        assert!(app.handle_key(KeyCode::Char('j')));
        assert_eq!(selected(&app), date!(2022 - 11 - 03));
        assert_eq!(app.pager.week_offset(), 1);
        assert!(app.handle_key(KeyCode::Char('7')));
        assert_eq!(selected(&app), date!(2022 - 11 - 06));
        assert!(app.handle_key(KeyCode::Char('l')));
        assert_eq!(selected(&app), date!(2022 - 11 - 07));
        assert_eq!(app.pager.week_offset(), 2);
        assert!(app.handle_key(KeyCode::PageUp));
        assert!(app.handle_key(KeyCode::Char('h')));
        assert_eq!(selected(&app), date!(2022 - 10 - 30));
        assert!(app.handle_key(KeyCode::Home));
        assert_eq!(selected(&app), date!(2022 - 10 - 26));
        assert_eq!(app.pager.week_offset(), 0);
        assert!(!app.handle_key(KeyCode::Char('8')));
        assert!(!app.handle_key(KeyCode::Char('x')));
    }

    #[test]
    fn test_pick_date() {
        let mut app = app(date!(2022 - 10 - 28));
        assert!(app.handle_key(KeyCode::Char('g')));
        for _ in 0..4 {
            assert!(app.handle_key(KeyCode::Backspace));
        }
        for c in "0916".chars() {
            assert!(app.handle_key(KeyCode::Char(c)));
        }
        assert!(!app.handle_key(KeyCode::Char('1')));
        assert!(app.handle_key(KeyCode::Enter));
        assert_eq!(app.state, AppState::Calendar);
        assert_eq!(selected(&app), date!(2022 - 09 - 16));
        assert_eq!(app.pager.week_offset(), -6);
    }

    #[test]
    fn test_cancel_pick() {
        let mut app = app(date!(2022 - 10 - 28));
        assert!(app.handle_key(KeyCode::Char('g')));
        assert!(app.handle_key(KeyCode::Backspace));
        assert!(app.handle_key(KeyCode::Esc));
        assert_eq!(app.state, AppState::Calendar);
        assert_eq!(selected(&app), date!(2022 - 10 - 28));
    }

    #[test]
    fn test_help_and_quit() {
        let mut app = app(date!(2022 - 10 - 28));
        assert!(app.handle_key(KeyCode::Char('?')));
        assert_eq!(app.state, AppState::Helping);
        let area = Rect::new(0, 0, 60, 20);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        assert!(buffer_lines(&buffer)
            .iter()
            .any(|line| line.contains("Pick a date to jump to")));
        assert!(app.handle_key(KeyCode::Char('j')));
        assert_eq!(app.state, AppState::Calendar);
        assert_eq!(selected(&app), date!(2022 - 10 - 28));
        assert!(app.handle_key(KeyCode::Char('q')));
        assert!(app.quitting());
    }
}
