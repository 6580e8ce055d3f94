use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::config::Variant;
use crate::theme::THEME;

pub struct StatusBar {
    pub wallet_connected: bool,
    pub account_connected: bool,
    /// Actions whose transaction has not settled yet, in submission order.
    pub pending: Vec<&'static str>,
    variant: Variant,
}

impl StatusBar {
    pub fn new(variant: Variant) -> Self {
        Self {
            wallet_connected: false,
            account_connected: false,
            pending: Vec::new(),
            variant,
        }
    }

    /// Key hints for what can be pressed right now.
    fn hints(&self) -> Vec<(&'static str, &'static str)> {
        let mut hints = Vec::new();
        if self.account_connected {
            if self.variant.has_message() {
                hints.push(("i", "Message"));
            }
            hints.push(("w", "Wave"));
            if self.variant.has_friends() {
                hints.push(("f", "Friend"));
                hints.push(("u", "Unfriend"));
            }
        } else {
            hints.push(("c", "Connect"));
        }
        if self.variant.has_wave_log() {
            hints.push(("r", "Reload"));
        }
        hints.extend([("l", "Console"), ("?", "Help"), ("q", "Quit")]);
        hints
    }

    pub fn tx_pending(&mut self, action: &'static str) {
        self.pending.push(action);
    }

    pub fn tx_settled(&mut self, action: &'static str) {
        if let Some(pos) = self.pending.iter().position(|a| *a == action) {
            self.pending.remove(pos);
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let bg = Block::default().style(THEME.header_style());
        frame.render_widget(bg, area);

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(24)])
            .split(area);

        let left_content = if !self.pending.is_empty() {
            Line::from(vec![
                Span::styled(
                    " Mining... ",
                    Style::default()
                        .fg(THEME.warning)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(self.pending.join(", "), Style::default().fg(THEME.text)),
            ])
        } else {
            let mut spans = vec![Span::raw(" ")];
            for (key, label) in self.hints() {
                spans.push(Span::styled(key, THEME.accent_style()));
                spans.push(Span::styled(format!(":{label}  "), THEME.muted_style()));
            }
            Line::from(spans)
        };

        let left = Paragraph::new(left_content).style(THEME.header_style());
        frame.render_widget(left, chunks[0]);

        let (dot_color, status_text) = if self.wallet_connected {
            (THEME.success, "Wallet")
        } else {
            (THEME.error, "No wallet")
        };

        let right_content = Line::from(vec![
            Span::styled("\u{25cf} ", Style::default().fg(dot_color)),
            Span::styled(status_text, Style::default().fg(dot_color)),
            Span::raw(" "),
        ]);

        let right = Paragraph::new(right_content)
            .alignment(Alignment::Right)
            .style(THEME.header_style());
        frame.render_widget(right, chunks[1]);
    }
}
