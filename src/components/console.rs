use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::logging::LogBuffer;
use crate::theme::THEME;

/// Tail of the application log, for watching what the portal does behind
/// the scenes.
pub struct ConsolePanel {
    pub visible: bool,
    buffer: LogBuffer,
}

impl ConsolePanel {
    pub fn new(buffer: LogBuffer) -> Self {
        Self {
            visible: false,
            buffer,
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Console ")
            .borders(Borders::ALL)
            .border_style(THEME.border_style());
        let inner = block.inner(area);

        let lines: Vec<Line> = self
            .buffer
            .tail(inner.height as usize)
            .into_iter()
            .map(|line| {
                let style = if line.contains("WARN") || line.contains("ERROR") {
                    Style::default().fg(THEME.warning)
                } else {
                    THEME.muted_style()
                };
                Line::from(Span::styled(line, style))
            })
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}
