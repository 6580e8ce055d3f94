use crossterm::event::KeyEvent;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::config::Variant;
use crate::theme::THEME;

type Section = (&'static str, &'static [(&'static str, &'static str)]);

const WALLET: Section = ("Wallet", &[("c", "Connect wallet")]);

const PORTAL_FULL: Section = (
    "Portal",
    &[
        ("i / Tab", "Edit message (Enter / Esc to finish)"),
        ("w", "Wave at me"),
        ("f", "Add me as your friend"),
        ("u", "Remove me as your friend"),
    ],
);

const PORTAL_BASIC: Section = ("Portal", &[("w", "Wave at me")]);

const WAVES: Section = (
    "Waves",
    &[
        ("\u{2191}/k", "Move up"),
        ("\u{2193}/j", "Move down"),
        ("g / G", "Go to top / bottom"),
        ("r", "Reload waves"),
    ],
);

const OTHER: Section = (
    "Other",
    &[
        ("l", "Toggle console"),
        ("?", "Toggle this help"),
        ("q", "Quit"),
    ],
);

pub struct HelpOverlay {
    pub visible: bool,
    variant: Variant,
}

impl HelpOverlay {
    pub fn new(variant: Variant) -> Self {
        Self {
            visible: false,
            variant,
        }
    }

    /// Only the bindings the current layout responds to.
    fn sections(&self) -> Vec<Section> {
        match self.variant {
            Variant::Full => vec![WALLET, PORTAL_FULL, WAVES, OTHER],
            Variant::Basic => vec![WALLET, PORTAL_BASIC, OTHER],
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    /// Returns true if it consumed the event
    pub fn handle_key(&mut self, _key: KeyEvent) -> bool {
        if self.visible {
            self.visible = false;
            true
        } else {
            false
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.visible {
            return;
        }

        let popup_width = area.width * 60 / 100;
        let popup_height = area.height * 70 / 100;
        let x = area.x + (area.width - popup_width) / 2;
        let y = area.y + (area.height - popup_height) / 2;
        let popup_area = Rect::new(x, y, popup_width, popup_height);

        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .borders(Borders::ALL)
            .border_style(THEME.border_focused_style())
            .style(Style::default().bg(THEME.surface));

        let mut help_text = Vec::new();
        for (i, (section, keys)) in self.sections().into_iter().enumerate() {
            if i > 0 {
                help_text.push(Line::from(""));
            }
            help_text.push(Line::from(Span::styled(
                section,
                Style::default()
                    .fg(THEME.text_accent)
                    .add_modifier(Modifier::BOLD),
            )));
            for (key, description) in keys.iter() {
                help_text.push(Line::from(vec![
                    Span::styled(format!("  {key:<9}"), THEME.accent_style()),
                    Span::styled(*description, Style::default().fg(THEME.text)),
                ]));
            }
        }

        let paragraph = Paragraph::new(help_text)
            .block(block)
            .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, popup_area);
    }
}
