use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const TITLE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const WEEKDAY_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

/// Days accepted by the marking rule (by default, today and earlier)
pub(crate) const MARKED_STYLE: Style = Style::new().fg(Color::LightCyan).bg(Color::Black);

pub(crate) const TODAY_MODIFIER: Modifier = Modifier::BOLD;

pub(crate) const RULE_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub(crate) mod picker {
    use super::*;

    pub(crate) const UNFILLED_CELL_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    pub(crate) const READY_ENTER_STYLE: Style = BASE_STYLE.add_modifier(Modifier::UNDERLINED);
}
