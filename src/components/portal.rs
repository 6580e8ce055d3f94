use alloy::primitives::{Address, U256};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::components::Component;
use crate::config::Variant;
use crate::events::{Action, AppEvent};
use crate::theme::THEME;
use crate::utils;

/// The portal itself: greeting, wave counter, message box and action buttons.
///
/// Every button and the message box are disabled until an account is
/// connected; the connect button disappears once one is.
pub struct Portal {
    pub variant: Variant,
    pub account: Option<Address>,
    pub total_waves: Option<U256>,
    pub draft: String,
    pub editing: bool,
    cursor: usize,
}

impl Portal {
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            account: None,
            total_waves: None,
            draft: String::new(),
            editing: false,
            cursor: 0,
        }
    }

    fn connected(&self) -> bool {
        self.account.is_some()
    }

    /// The message to send with a wave, if this layout has a message box.
    pub fn wave_message(&self) -> Option<String> {
        self.variant.has_message().then(|| self.draft.clone())
    }

    fn start_editing(&mut self) {
        if self.connected() && self.variant.has_message() {
            self.editing = true;
            self.cursor = self.draft.chars().count();
        }
    }

    fn byte_index(&self) -> usize {
        self.draft
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.draft.len())
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Tab => {
                self.editing = false;
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let idx = self.byte_index();
                    self.draft.remove(idx);
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.draft.chars().count() {
                    let idx = self.byte_index();
                    self.draft.remove(idx);
                }
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.cursor < self.draft.chars().count() {
                    self.cursor += 1;
                }
            }
            KeyCode::Home => {
                self.cursor = 0;
            }
            KeyCode::End => {
                self.cursor = self.draft.chars().count();
            }
            KeyCode::Char(c) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) && c == 'u' {
                    self.draft.clear();
                    self.cursor = 0;
                } else {
                    let idx = self.byte_index();
                    self.draft.insert(idx, c);
                    self.cursor += 1;
                }
            }
            _ => {}
        }
    }

    /// The part of the draft that fits in `width` columns with the cursor in
    /// view, and the cursor's column within it.
    fn visible_draft(&self, width: usize) -> (&str, usize) {
        let before = &self.draft[..self.byte_index()];
        let mut start = 0;
        let mut column = Span::raw(before).width();
        let mut chars = before.char_indices();
        // The cursor needs a column of its own past the last character.
        while column >= width.max(1) {
            let Some((i, c)) = chars.next() else { break };
            column -= Span::raw(c.to_string()).width();
            start = i + c.len_utf8();
        }
        (&self.draft[start..], column)
    }

    fn button<'a>(key: &'a str, label: &'a str, enabled: bool) -> Vec<Span<'a>> {
        vec![
            Span::styled(format!(" [{key}] {label} "), THEME.button_style(enabled)),
            Span::raw("  "),
        ]
    }
}

impl Component for Portal {
    fn handle_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        if self.editing {
            self.handle_edit_key(key);
            return None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return None;
        }

        let action = match key.code {
            KeyCode::Char('c') if !self.connected() => Action::Connect,
            KeyCode::Char('w') if self.connected() => Action::Wave,
            KeyCode::Char('f') if self.connected() && self.variant.has_friends() => Action::AddFriend,
            KeyCode::Char('u') if self.connected() && self.variant.has_friends() => {
                Action::RemoveFriend
            }
            KeyCode::Char('i') | KeyCode::Tab => {
                self.start_editing();
                return None;
            }
            _ => return None,
        };
        Some(AppEvent::Action(action))
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let outer_block = Block::default()
            .title(" \u{1f44b} Hey there! ")
            .borders(Borders::ALL)
            .border_style(THEME.border_focused_style());
        let inner = outer_block.inner(area);
        frame.render_widget(outer_block, area);

        let message_height = if self.variant.has_message() { 3 } else { 0 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),              // Bio
                Constraint::Length(2),              // Counter
                Constraint::Length(message_height), // Message box
                Constraint::Min(1),                 // Buttons
            ])
            .split(inner);

        // -- Bio --
        let mut bio = String::from("Connect your Ethereum wallet and wave at me!");
        if self.variant.has_friends() {
            bio.push_str(" You need to add me as friend to wave :)");
        }
        let bio = Paragraph::new(bio)
            .style(Style::default().fg(THEME.text))
            .wrap(Wrap { trim: true });
        frame.render_widget(bio, chunks[0]);

        // -- Counter --
        let counter = Paragraph::new(Line::from(vec![
            Span::styled(utils::format_count(self.total_waves), THEME.count_style()),
            Span::styled(" waves have been waved at me so far!", Style::default().fg(THEME.text)),
        ]));
        frame.render_widget(counter, chunks[1]);

        // -- Message box --
        if self.variant.has_message() {
            let border_style = if self.editing {
                THEME.border_focused_style()
            } else {
                THEME.border_style()
            };
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(" Message [i] ");
            let box_inner = block.inner(chunks[2]);
            frame.render_widget(block, chunks[2]);

            let (visible, column) = self.visible_draft(usize::from(box_inner.width));
            let text = if self.draft.is_empty() {
                Span::styled("Add your message!", THEME.muted_style())
            } else if self.connected() {
                Span::styled(visible, Style::default().fg(THEME.text))
            } else {
                Span::styled(visible, THEME.muted_style())
            };
            frame.render_widget(Paragraph::new(text), box_inner);

            if self.editing {
                let offset = u16::try_from(column).unwrap_or(u16::MAX);
                let cursor_x = box_inner.x.saturating_add(offset);
                if cursor_x < box_inner.right() {
                    frame.set_cursor_position((cursor_x, box_inner.y));
                }
            }
        }

        // -- Buttons --
        let connected = self.connected();
        let mut spans = Self::button("w", "Wave at Me", connected);
        if self.variant.has_friends() {
            spans.extend(Self::button("f", "Add me as your Friend!", connected));
            spans.extend(Self::button("u", "Remove me as your Friend :(", connected));
        }
        if !connected {
            spans.extend(Self::button("c", "Connect Wallet", true));
        }
        let buttons = Paragraph::new(Line::from(spans)).wrap(Wrap { trim: false });
        frame.render_widget(buttons, chunks[3]);
    }
}
