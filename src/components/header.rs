use alloy::primitives::Address;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::theme::THEME;
use crate::utils;

pub struct Header {
    pub chain_id: Option<u64>,
    pub contract: Address,
    pub account: Option<Address>,
}

impl Header {
    pub fn new(contract: Address) -> Self {
        Self {
            chain_id: None,
            contract,
            account: None,
        }
    }

    fn display_chain_name(&self) -> &str {
        match self.chain_id {
            None => "No wallet",
            Some(1) => "Mainnet",
            Some(4) => "Rinkeby",
            Some(5) => "Goerli",
            Some(11155111) => "Sepolia",
            Some(31337) => "Local",
            Some(_) => "Unknown",
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let header_block = Block::default().style(THEME.header_style());
        frame.render_widget(header_block, area);

        // title | contract | network + account
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(14),
                Constraint::Min(0),
                Constraint::Length(34),
            ])
            .split(area);

        let title = Paragraph::new(Span::styled(
            " wave-portal",
            Style::default()
                .fg(THEME.text_accent)
                .add_modifier(Modifier::BOLD),
        ))
        .style(THEME.header_style());
        frame.render_widget(title, chunks[0]);

        let contract = Paragraph::new(Line::from(vec![
            Span::styled("Contract ", THEME.muted_style()),
            Span::styled(utils::truncate_address(&self.contract), THEME.address_style()),
        ]))
        .style(THEME.header_style());
        frame.render_widget(contract, chunks[1]);

        let account = match self.account {
            Some(ref addr) => Span::styled(utils::truncate_address(addr), THEME.address_style()),
            None => Span::styled("not connected", THEME.muted_style()),
        };
        let network_info = Line::from(vec![
            Span::styled(self.display_chain_name(), Style::default().fg(THEME.text)),
            Span::styled(" | ", THEME.muted_style()),
            account,
            Span::raw(" "),
        ]);
        let network_paragraph = Paragraph::new(network_info)
            .alignment(Alignment::Right)
            .style(THEME.header_style());
        frame.render_widget(network_paragraph, chunks[2]);
    }
}
