pub mod abi;
pub mod contract;
pub mod decoder;
pub mod error;
pub mod poller;
pub mod types;
pub mod wallet;

#[cfg(test)]
pub mod mock;

use std::future::Future;
use std::sync::Arc;

use alloy::primitives::{Address, B256};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::data::abi::ContractConfig;
use crate::data::contract::WavePortal;
use crate::data::error::{BridgeError, BridgeResult};
use crate::data::wallet::WalletProvider;
use crate::events::AppEvent;

/// Glue between the UI and the wallet/contract pair.
///
/// Every operation runs on its own task and reports back through
/// `event_tx`. Failures are logged and dropped; callers never see them.
pub struct Bridge<W> {
    wallet: Option<Arc<W>>,
    contract: ContractConfig,
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl<W: WalletProvider> Bridge<W> {
    pub fn new(
        wallet: Option<W>,
        contract: ContractConfig,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            wallet: wallet.map(Arc::new),
            contract,
            event_tx,
        }
    }

    pub fn has_wallet(&self) -> bool {
        self.wallet.is_some()
    }

    pub fn contract_address(&self) -> Address {
        self.contract.address
    }

    /// Build a fresh handle to the contract. Never cached.
    pub fn contract(&self) -> BridgeResult<WavePortal<W>> {
        let wallet = self.wallet.as_ref().ok_or(BridgeError::ProviderMissing)?;
        Ok(WavePortal::new(Arc::clone(wallet), self.contract.clone()))
    }

    /// Pick up an account the user authorized in an earlier session.
    pub fn check_existing_authorization(&self) {
        let Some(wallet) = self.wallet.clone() else {
            warn!("No wallet provider found, make sure one is configured");
            return;
        };
        info!("Wallet provider found");

        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            match wallet.accounts().await {
                Ok(accounts) => match accounts.first() {
                    Some(&account) => {
                        info!(%account, "Found an authorized account");
                        let _ = tx.send(AppEvent::AccountConnected(account));
                    }
                    None => info!("No authorized account found"),
                },
                Err(e) => warn!(error = %e, "Failed to query authorized accounts"),
            }
        });
    }

    /// Ask the wallet to authorize an account.
    pub fn request_connection(&self) {
        let Some(wallet) = self.wallet.clone() else {
            warn!("Connect requested without a wallet provider");
            let _ = self.event_tx.send(AppEvent::WalletMissing);
            return;
        };

        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            match wallet.request_accounts().await {
                Ok(accounts) => match accounts.first() {
                    Some(&account) => {
                        info!(%account, "Connected");
                        let _ = tx.send(AppEvent::AccountConnected(account));
                    }
                    None => warn!("Wallet authorized no accounts"),
                },
                Err(e) => warn!(error = %e, "Wallet connection failed"),
            }
        });
    }

    pub fn wave(&self, message: Option<String>) {
        self.transact("wave", move |portal| async move {
            portal.wave(message.as_deref()).await
        });
    }

    pub fn add_friend(&self) {
        self.transact("addFriend", |portal| async move { portal.add_friend().await });
    }

    pub fn remove_friend(&self) {
        self.transact("removeFriend", |portal| async move { portal.remove_friend().await });
    }

    /// Reload the full wave log, replacing whatever the UI shows.
    pub fn refresh_waves(&self) {
        let portal = match self.contract() {
            Ok(portal) => portal,
            Err(e) => {
                warn!(error = %e, "Cannot refresh waves");
                return;
            }
        };
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = publish_waves(&portal, &tx).await {
                warn!(error = %e, "Failed to load waves");
            }
        });
    }

    /// One poll tick: publish the current count and, if asked, the wave log.
    /// Runs inline so the caller decides whether ticks can overlap.
    pub async fn poll_once(&self, include_waves: bool) {
        let portal = match self.contract() {
            Ok(portal) => portal,
            Err(e) => {
                debug!(error = %e, "Skipping poll");
                return;
            }
        };

        match portal.get_total_waves().await {
            Ok(count) => {
                debug!(%count, "Retrieved total wave count");
                let _ = self.event_tx.send(AppEvent::TotalWaves(count));
            }
            Err(e) => {
                warn!(error = %e, "Failed to read total waves");
                return;
            }
        }

        if include_waves {
            if let Err(e) = publish_waves(&portal, &self.event_tx).await {
                warn!(error = %e, "Failed to load waves");
            }
        }
    }

    /// Run one state-changing call: log the count, submit, wait for mining,
    /// then publish the fresh count. `invoke` performs the actual submission.
    fn transact<F, Fut>(&self, action: &'static str, invoke: F)
    where
        F: FnOnce(WavePortal<W>) -> Fut + Send + 'static,
        Fut: Future<Output = BridgeResult<B256>> + Send + 'static,
    {
        let portal = match self.contract() {
            Ok(portal) => portal,
            Err(e) => {
                warn!(action, error = %e, "Cannot reach contract");
                return;
            }
        };

        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(AppEvent::TxPending(action));
            if let Err(e) = run_transaction(portal, action, invoke, &tx).await {
                warn!(action, error = %e, "Transaction abandoned");
            }
            let _ = tx.send(AppEvent::TxSettled(action));
        });
    }
}

async fn run_transaction<W, F, Fut>(
    portal: WavePortal<W>,
    action: &'static str,
    invoke: F,
    tx: &mpsc::UnboundedSender<AppEvent>,
) -> BridgeResult<()>
where
    W: WalletProvider,
    F: FnOnce(WavePortal<W>) -> Fut,
    Fut: Future<Output = BridgeResult<B256>>,
{
    let count = portal.get_total_waves().await?;
    info!(action, %count, contract = %portal.address(), "Retrieved total wave count");

    let tx_hash = invoke(portal.clone()).await?;
    info!(action, %tx_hash, "Mining...");
    portal.wait_mined(tx_hash).await?;
    info!(action, %tx_hash, "Mined");

    let count = portal.get_total_waves().await?;
    info!(action, %count, "Retrieved total wave count");
    let _ = tx.send(AppEvent::TotalWaves(count));
    Ok(())
}

async fn publish_waves<W: WalletProvider>(
    portal: &WavePortal<W>,
    tx: &mpsc::UnboundedSender<AppEvent>,
) -> BridgeResult<()> {
    let waves = portal.get_all_waves().await?;
    debug!(count = waves.len(), "Loaded waves");
    let _ = tx.send(AppEvent::WavesLoaded(waves));
    Ok(())
}
