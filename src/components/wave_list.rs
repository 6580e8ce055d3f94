use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::components::Component;
use crate::data::types::WaveRecord;
use crate::events::{Action, AppEvent};
use crate::theme::THEME;
use crate::utils;

/// Every wave recorded by the contract, exactly as last read.
pub struct WaveList {
    pub waves: Vec<WaveRecord>,
    table_state: TableState,
    scroll_state: ScrollbarState,
}

impl WaveList {
    pub fn new() -> Self {
        Self {
            waves: Vec::new(),
            table_state: TableState::default(),
            scroll_state: ScrollbarState::default(),
        }
    }

    /// Replace the list with a fresh read, keeping the selection in range.
    pub fn set_waves(&mut self, waves: Vec<WaveRecord>) {
        self.waves = waves;
        match self.table_state.selected() {
            _ if self.waves.is_empty() => self.table_state.select(None),
            Some(idx) if idx >= self.waves.len() => {
                self.table_state.select(Some(self.waves.len() - 1));
            }
            _ => {}
        }
    }

    fn select_next(&mut self) {
        let len = self.waves.len();
        if len == 0 {
            return;
        }
        let next = match self.table_state.selected() {
            Some(current) if current + 1 < len => current + 1,
            Some(current) => current,
            None => 0,
        };
        self.table_state.select(Some(next));
        self.scroll_state = self.scroll_state.position(next);
    }

    fn select_prev(&mut self) {
        if self.waves.is_empty() {
            return;
        }
        let prev = self.table_state.selected().unwrap_or(0).saturating_sub(1);
        self.table_state.select(Some(prev));
        self.scroll_state = self.scroll_state.position(prev);
    }

    fn select_first(&mut self) {
        if self.waves.is_empty() {
            return;
        }
        self.table_state.select(Some(0));
        self.scroll_state = self.scroll_state.position(0);
    }

    fn select_last(&mut self) {
        let len = self.waves.len();
        if len == 0 {
            return;
        }
        self.table_state.select(Some(len - 1));
        self.scroll_state = self.scroll_state.position(len - 1);
    }
}

fn build_rows(waves: &[WaveRecord]) -> Vec<Row<'static>> {
    waves
        .iter()
        .map(|w| {
            Row::new(vec![
                Cell::from(format!("{}", w.address)).style(THEME.address_style()),
                Cell::from(utils::format_timestamp(&w.timestamp)),
                Cell::from(utils::format_time_ago(&w.timestamp)).style(THEME.muted_style()),
                Cell::from(w.message.clone()),
            ])
        })
        .collect()
}

impl Component for WaveList {
    fn handle_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.select_prev(),
            KeyCode::Char('g') => self.select_first(),
            KeyCode::Char('G') => self.select_last(),
            KeyCode::Char('r') => return Some(AppEvent::Action(Action::RefreshWaves)),
            _ => {}
        }
        None
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let outer_block = Block::default()
            .title(format!(" Waves ({}) ", self.waves.len()))
            .borders(Borders::ALL)
            .border_style(THEME.border_style());

        if self.waves.is_empty() {
            let empty = Paragraph::new("No waves yet")
                .style(THEME.muted_style())
                .alignment(Alignment::Center)
                .block(outer_block);
            frame.render_widget(empty, area);
            return;
        }

        let header = Row::new(vec![
            Cell::from("Address"),
            Cell::from("Time"),
            Cell::from("Age"),
            Cell::from("Message"),
        ])
        .style(THEME.table_header_style())
        .bottom_margin(0);

        let rows = build_rows(&self.waves);
        let widths = [
            Constraint::Length(44),
            Constraint::Length(26),
            Constraint::Length(9),
            Constraint::Min(10),
        ];

        self.scroll_state = self.scroll_state.content_length(self.waves.len());

        let table = Table::new(rows, widths)
            .header(header)
            .block(outer_block)
            .row_highlight_style(THEME.selected_style())
            .highlight_symbol(" > ");

        frame.render_stateful_widget(table, area, &mut self.table_state);

        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("^"))
            .end_symbol(Some("v"));

        let scrollbar_area = Rect {
            x: area.x + area.width.saturating_sub(1),
            y: area.y + 1,
            width: 1,
            height: area.height.saturating_sub(2),
        };

        frame.render_stateful_widget(scrollbar, scrollbar_area, &mut self.scroll_state);
    }
}
