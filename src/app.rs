use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::prelude::*;
use ratatui::widgets::*;
use tokio::sync::mpsc;
use tracing::info;

use crate::components::alert::AlertDialog;
use crate::components::console::ConsolePanel;
use crate::components::header::Header;
use crate::components::help::HelpOverlay;
use crate::components::portal::Portal;
use crate::components::status_bar::StatusBar;
use crate::components::wave_list::WaveList;
use crate::components::Component;
use crate::config::{Config, Variant};
use crate::data::poller::Poller;
use crate::data::wallet::WalletProvider;
use crate::data::Bridge;
use crate::events::{Action, AppEvent};
use crate::logging::LogBuffer;
use crate::theme::THEME;

const WALLET_MISSING_ALERT: &str = "No wallet found! Start wave-portal with --rpc-url pointing at your wallet.";

pub struct App<W> {
    // Components
    header: Header,
    portal: Portal,
    wave_list: WaveList,
    status_bar: StatusBar,
    help: HelpOverlay,
    alert: AlertDialog,
    console: ConsolePanel,

    // Data
    bridge: Arc<Bridge<W>>,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,

    // State
    variant: Variant,
    should_quit: bool,
    tick_rate: Duration,
    poll_interval: Duration,
}

impl<W: WalletProvider> App<W> {
    pub fn new(
        bridge: Arc<Bridge<W>>,
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
        log_buffer: LogBuffer,
        config: &Config,
    ) -> Self {
        let mut status_bar = StatusBar::new(config.variant);
        status_bar.wallet_connected = bridge.has_wallet();
        Self {
            header: Header::new(bridge.contract_address()),
            portal: Portal::new(config.variant),
            wave_list: WaveList::new(),
            status_bar,
            help: HelpOverlay::new(config.variant),
            alert: AlertDialog::new(),
            console: ConsolePanel::new(log_buffer),
            bridge,
            event_rx,
            variant: config.variant,
            should_quit: false,
            tick_rate: Duration::from_millis(config.tick_rate_ms),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        }
    }

    /// Check for an existing authorization and start polling. The returned
    /// poller lives exactly as long as the UI does.
    fn mount(&self) -> Poller {
        self.bridge.check_existing_authorization();
        Poller::start(
            Arc::clone(&self.bridge),
            self.poll_interval,
            self.variant.has_wave_log(),
        )
    }

    pub async fn run(&mut self, mut terminal: ratatui::DefaultTerminal) -> color_eyre::Result<()> {
        let poller = self.mount();
        let result = self.event_loop(&mut terminal).await;
        poller.stop().await;
        info!("Portal closed");
        result
    }

    async fn event_loop(&mut self, terminal: &mut ratatui::DefaultTerminal) -> color_eyre::Result<()> {
        let mut interval = tokio::time::interval(self.tick_rate);
        let mut events = EventStream::new();

        while !self.should_quit {
            tokio::select! {
                _ = interval.tick() => {
                    terminal.draw(|frame| self.render(frame))?;
                }
                Some(Ok(event)) = events.next() => {
                    self.handle_terminal_event(event);
                }
                Some(app_event) = self.event_rx.recv() => {
                    self.handle_app_event(app_event);
                }
            }
        }

        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        frame.render_widget(
            Block::default().style(Style::default().bg(THEME.bg)),
            area,
        );

        // Layout: header (1) | content (fill) | status bar (1)
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        self.header.render(frame, chunks[0]);

        let portal_height = if self.variant.has_message() { 13 } else { 10 };
        let console_height = if self.console.visible { 10 } else { 0 };
        let body = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(portal_height),
                Constraint::Min(0),
                Constraint::Length(console_height),
            ])
            .split(chunks[1]);

        self.portal.render(frame, body[0]);
        if self.variant.has_wave_log() {
            self.wave_list.render(frame, body[1]);
        }
        if self.console.visible {
            self.console.render(frame, body[2]);
        }

        self.status_bar.render(frame, chunks[2]);

        // Overlays (rendered on top)
        self.help.render(frame, area);
        if self.alert.visible() {
            self.alert.render(frame, area);
        }
    }

    fn handle_terminal_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only handle key press events (not release/repeat) for cross-platform compat
            if key.kind != KeyEventKind::Press {
                return;
            }
            self.handle_key(key);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        // Modal alert blocks everything else
        if self.alert.handle_key(key) {
            return;
        }

        if self.help.handle_key(key) {
            return;
        }

        // Message box consumes keys while editing
        if self.portal.editing {
            self.portal.handle_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('?') => {
                self.help.toggle();
                return;
            }
            KeyCode::Char('l') => {
                self.console.toggle();
                return;
            }
            _ => {}
        }

        let app_event = self.portal.handle_key(key).or_else(|| {
            if self.variant.has_wave_log() {
                self.wave_list.handle_key(key)
            } else {
                None
            }
        });

        if let Some(event) = app_event {
            self.handle_app_event(event);
        }
    }

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::ProviderConnected(chain_id) => {
                self.header.chain_id = Some(chain_id);
                self.status_bar.wallet_connected = true;
            }
            AppEvent::AccountConnected(account) => {
                self.header.account = Some(account);
                self.portal.account = Some(account);
                self.status_bar.account_connected = true;
            }
            AppEvent::WalletMissing => {
                self.alert.show(WALLET_MISSING_ALERT);
            }
            AppEvent::TotalWaves(count) => {
                self.portal.total_waves = Some(count);
            }
            AppEvent::WavesLoaded(waves) => {
                self.wave_list.set_waves(waves);
            }
            AppEvent::TxPending(action) => {
                self.status_bar.tx_pending(action);
            }
            AppEvent::TxSettled(action) => {
                self.status_bar.tx_settled(action);
            }
            AppEvent::Action(action) => self.dispatch(action),
        }
    }

    fn dispatch(&mut self, action: Action) {
        match action {
            Action::Connect => self.bridge.request_connection(),
            Action::Wave => self.bridge.wave(self.portal.wave_message()),
            Action::AddFriend => self.bridge.add_friend(),
            Action::RemoveFriend => self.bridge.remove_friend(),
            Action::RefreshWaves => self.bridge.refresh_waves(),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::U256;
    use clap::Parser;
    use tokio::time::timeout;

    use super::*;
    use crate::data::abi::ContractConfig;
    use crate::data::mock::{account, MockWallet};

    fn app(wallet: Option<MockWallet>, args: &[&str]) -> App<MockWallet> {
        let mut argv = vec!["wave-portal", "--poll-interval-ms", "10"];
        argv.extend_from_slice(args);
        let config = Config::try_parse_from(argv).unwrap();

        let (tx, rx) = mpsc::unbounded_channel();
        let contract = wallet
            .as_ref()
            .map(|w| w.contract().clone())
            .unwrap_or_else(|| ContractConfig::wave_portal(account(0xcc)));
        let bridge = Arc::new(Bridge::new(wallet, contract, tx));
        App::new(bridge, rx, LogBuffer::new(), &config)
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    /// Feed background events into the app until `done` holds.
    async fn pump_until(app: &mut App<MockWallet>, done: impl Fn(&App<MockWallet>) -> bool) {
        timeout(Duration::from_secs(2), async {
            while !done(&*app) {
                let event = app.event_rx.recv().await.expect("channel closed");
                app.handle_app_event(event);
            }
        })
        .await
        .expect("condition not reached");
    }

    /// Apply whatever arrives within a short window.
    async fn drain(app: &mut App<MockWallet>) {
        tokio::time::sleep(Duration::from_millis(50)).await;
        while let Ok(event) = app.event_rx.try_recv() {
            app.handle_app_event(event);
        }
    }

    #[tokio::test]
    async fn test_mount_picks_up_authorized_account() {
        let abc = account(0xab);
        let mut app = app(Some(MockWallet::new().with_accounts(vec![abc])), &[]);

        let poller = app.mount();
        pump_until(&mut app, |a| a.portal.account.is_some()).await;
        poller.stop().await;

        assert_eq!(app.portal.account, Some(abc));
        assert_eq!(app.header.account, Some(abc));
        assert!(app.status_bar.account_connected);
    }

    #[tokio::test]
    async fn test_no_preapproved_account_waits_for_connect() {
        let mut app = app(
            Some(MockWallet::new().with_requested_accounts(vec![account(7), account(8)])),
            &[],
        );

        let poller = app.mount();
        pump_until(&mut app, |a| a.portal.total_waves.is_some()).await;
        drain(&mut app).await;
        assert_eq!(app.portal.account, None);

        app.handle_key(key('c'));
        pump_until(&mut app, |a| a.portal.account.is_some()).await;
        poller.stop().await;

        assert_eq!(app.portal.account, Some(account(7)));
    }

    #[tokio::test]
    async fn test_wave_updates_counter() {
        let mut app = app(
            Some(MockWallet::new().with_accounts(vec![account(1)]).with_total(5)),
            &[],
        );

        let poller = app.mount();
        pump_until(&mut app, |a| {
            a.portal.account.is_some() && a.portal.total_waves == Some(U256::from(5u64))
        })
        .await;

        app.handle_key(key('w'));
        pump_until(&mut app, |a| a.portal.total_waves == Some(U256::from(6u64))).await;
        poller.stop().await;
    }

    #[tokio::test]
    async fn test_wave_sends_draft_and_keeps_it() {
        let mut app = app(Some(MockWallet::new().with_accounts(vec![account(1)])), &[]);
        app.handle_app_event(AppEvent::AccountConnected(account(1)));

        app.handle_key(key('i'));
        for c in "hi".chars() {
            app.handle_key(key(c));
        }
        // 'q' and 'w' are text while editing
        app.handle_key(key('q'));
        assert!(!app.should_quit);
        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        app.handle_key(key('w'));

        pump_until(&mut app, |a| a.status_bar.pending.is_empty() && a.portal.total_waves.is_some()).await;
        assert_eq!(app.portal.draft, "hiq");
    }

    #[tokio::test]
    async fn test_no_provider_leaves_state_unchanged() {
        let mut app = app(None, &[]);

        let poller = app.mount();
        for action in [
            Action::Wave,
            Action::AddFriend,
            Action::RemoveFriend,
            Action::RefreshWaves,
        ] {
            app.handle_app_event(AppEvent::Action(action));
        }
        drain(&mut app).await;
        poller.stop().await;

        assert_eq!(app.portal.account, None);
        assert_eq!(app.portal.total_waves, None);
        assert!(app.wave_list.waves.is_empty());
        assert!(app.status_bar.pending.is_empty());
        assert!(!app.alert.visible());
    }

    #[tokio::test]
    async fn test_connect_without_provider_alerts() {
        let mut app = app(None, &[]);

        app.handle_key(key('c'));
        pump_until(&mut app, |a| a.alert.visible()).await;
        assert_eq!(app.portal.account, None);

        // The alert swallows the next key, quit included
        app.handle_key(key('q'));
        assert!(!app.alert.visible());
        assert!(!app.should_quit);
    }

    #[tokio::test]
    async fn test_poll_renders_wave_log() {
        let wallet = MockWallet::new().with_waves(vec![(account(0xab), 1000, "hi")]);
        let mut app = app(Some(wallet), &[]);

        let poller = app.mount();
        pump_until(&mut app, |a| !a.wave_list.waves.is_empty()).await;
        poller.stop().await;

        let waves = &app.wave_list.waves;
        assert_eq!(waves.len(), 1);
        assert_eq!(waves[0].address, account(0xab));
        assert_eq!(crate::utils::format_timestamp(&waves[0].timestamp), "Jan 01, 1970 00:16:40 UTC");
        assert_eq!(waves[0].message, "hi");
    }

    #[tokio::test]
    async fn test_refresh_replaces_rendered_list() {
        let mut app = app(None, &[]);
        let first = vec![
            crate::data::types::WaveRecord {
                address: account(1),
                timestamp: chrono::DateTime::from_timestamp(1, 0).unwrap(),
                message: "one".to_string(),
            };
            2
        ];
        let second = vec![crate::data::types::WaveRecord {
            address: account(2),
            timestamp: chrono::DateTime::from_timestamp(2, 0).unwrap(),
            message: "two".to_string(),
        }];

        app.handle_app_event(AppEvent::WavesLoaded(first));
        app.handle_app_event(AppEvent::WavesLoaded(second.clone()));
        assert_eq!(app.wave_list.waves, second);
    }

    #[tokio::test]
    async fn test_basic_variant_never_loads_waves() {
        let wallet = MockWallet::new()
            .with_accounts(vec![account(1)])
            .with_total(2)
            .with_waves(vec![(account(1), 1, "hidden")]);
        let mut app = app(Some(wallet), &["--variant", "basic"]);

        let poller = app.mount();
        pump_until(&mut app, |a| a.portal.account.is_some() && a.portal.total_waves.is_some()).await;
        drain(&mut app).await;

        app.handle_key(key('r'));
        app.handle_key(key('f'));
        drain(&mut app).await;
        poller.stop().await;

        assert!(app.wave_list.waves.is_empty());
        assert_eq!(app.portal.wave_message(), None);
    }

    #[tokio::test]
    async fn test_teardown_stops_updates() {
        let mut app = app(Some(MockWallet::new().with_total(1)), &[]);

        let poller = app.mount();
        pump_until(&mut app, |a| a.portal.total_waves.is_some()).await;
        poller.stop().await;
        while app.event_rx.try_recv().is_ok() {}

        app.portal.total_waves = None;
        drain(&mut app).await;
        assert_eq!(app.portal.total_waves, None);
    }

    #[test]
    fn test_quit_and_toggles() {
        let mut app = app(None, &[]);

        app.handle_key(key('l'));
        assert!(app.console.visible);
        app.handle_key(key('?'));
        assert!(app.help.visible);
        app.handle_key(key('x'));
        assert!(!app.help.visible);

        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }
}
