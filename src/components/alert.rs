use crossterm::event::KeyEvent;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::theme::THEME;

/// Blocking modal: while visible it swallows every key, and any key
/// dismisses it.
pub struct AlertDialog {
    pub message: Option<String>,
}

impl AlertDialog {
    pub fn new() -> Self {
        Self { message: None }
    }

    pub fn show(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn visible(&self) -> bool {
        self.message.is_some()
    }

    /// Returns true if it consumed the event
    pub fn handle_key(&mut self, _key: KeyEvent) -> bool {
        self.message.take().is_some()
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(ref message) = self.message else {
            return;
        };

        let width = area.width.min(56);
        let height = 7.min(area.height);
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        let popup_area = Rect::new(x, y, width, height);

        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Alert ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(THEME.warning))
            .style(Style::default().bg(THEME.surface));

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                message.as_str(),
                Style::default().fg(THEME.text).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled("Press any key", THEME.muted_style())),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }
}
