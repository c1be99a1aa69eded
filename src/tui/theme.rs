use crate::grade::GapOutcome;
use crate::palette::Palette;

use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders},
};

/// Shared styles for the quiz screen.
pub struct Theme;

impl Theme {
    pub const KEY_FG: Color = Color::Rgb(255, 255, 255);

    pub fn default_style() -> Style {
        Style::default()
    }

    pub fn label() -> Style {
        Style::default()
            .fg(Palette::ACCENT.tui())
            .add_modifier(Modifier::BOLD)
    }

    pub fn success() -> Style {
        Style::default()
            .fg(Palette::SUCCESS.tui())
            .add_modifier(Modifier::BOLD)
    }

    pub fn danger() -> Style {
        Style::default()
            .fg(Palette::DANGER.tui())
            .add_modifier(Modifier::BOLD)
    }

    pub fn emphasis() -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }

    /// Style of a gap in the passage: graded gaps are green or red, filled
    /// ones use the gap color, and the gap under the cursor is reversed.
    pub fn gap(answered: bool, outcome: Option<GapOutcome>, current: bool) -> Style {
        let style = match outcome {
            Some(GapOutcome::Correct) => Self::success(),
            Some(GapOutcome::Incorrect) => Self::danger(),
            _ if answered => Style::default().fg(Palette::GAP.tui()),
            _ => Style::default().fg(Palette::BORDER.tui()),
        };
        if current {
            style.add_modifier(Modifier::REVERSED)
        } else {
            style
        }
    }

    pub fn panel<'a>(title: impl Into<String>) -> Block<'a> {
        Self::panel_with_line(Self::title_line(title))
    }

    pub fn backdrop<'a>() -> Block<'a> {
        Block::default()
    }

    pub fn panel_with_line<'a>(title: Line<'a>) -> Block<'a> {
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Palette::BORDER.tui()))
            .title(title)
            .title_alignment(Alignment::Left)
    }

    pub fn title_line(title: impl Into<String>) -> Line<'static> {
        Line::from(vec![Span::styled(
            format!(" {} ", title.into()),
            Self::label(),
        )])
    }

    pub fn label_span(text: impl Into<String>) -> Span<'static> {
        Span::styled(text.into(), Self::label())
    }

    pub fn span(text: impl Into<String>) -> Span<'static> {
        Span::raw(text.into())
    }

    pub fn key_chip(text: impl Into<String>) -> Span<'static> {
        Span::styled(
            format!(" {} ", text.into()),
            Style::default()
                .fg(Self::KEY_FG)
                .bg(Palette::ACCENT.tui())
                .add_modifier(Modifier::BOLD),
        )
    }

    pub fn bullet() -> Span<'static> {
        Self::span(" • ")
    }

    pub fn section_header(text: impl Into<String>) -> Line<'static> {
        Line::from(vec![Span::styled(text.into(), Self::emphasis())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graded_gaps_take_the_outcome_color() {
        assert_eq!(
            Theme::gap(true, Some(GapOutcome::Correct), false).fg,
            Some(Palette::SUCCESS.tui())
        );
        assert_eq!(
            Theme::gap(true, Some(GapOutcome::Incorrect), false).fg,
            Some(Palette::DANGER.tui())
        );
        assert_eq!(Theme::gap(true, None, false).fg, Some(Palette::GAP.tui()));
        assert_eq!(Theme::gap(false, None, false).fg, Some(Palette::BORDER.tui()));
    }

    #[test]
    fn current_gap_is_reversed() {
        let style = Theme::gap(false, None, true);
        assert!(style.add_modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn key_chip_pads_its_label() {
        assert_eq!(Theme::key_chip("Esc").content, " Esc ");
    }
}
