use async_trait::async_trait;
use domains::{CoreAmount, WalletAddress, WalletError, WalletGateway};
use tokio::sync::watch;
use tracing::{debug, info};
use uuid::Uuid;

/// Wallet with a fixed account that signs nothing.
///
/// Knows only the chains it was built with; switching to any other yields
/// `UnknownChain`, as a browser wallet does before the network is added.
pub struct OfflineWallet {
    account: WalletAddress,
    known_chains: Vec<u64>,
    chain: watch::Sender<Option<u64>>,
}

impl OfflineWallet {
    pub fn new(account: WalletAddress, known_chains: Vec<u64>) -> Self {
        let (chain, _) = watch::channel(None);
        Self {
            account,
            known_chains,
            chain,
        }
    }

    pub fn account(&self) -> &WalletAddress {
        &self.account
    }

    pub fn current_chain(&self) -> Option<u64> {
        *self.chain.borrow()
    }

    fn select(&self, chain_id: u64) -> Result<(), WalletError> {
        if !self.known_chains.contains(&chain_id) {
            return Err(WalletError::UnknownChain(chain_id));
        }
        self.chain.send_replace(Some(chain_id));
        Ok(())
    }
}

#[async_trait]
impl WalletGateway for OfflineWallet {
    async fn connect(&self, chain_id: u64) -> Result<WalletAddress, WalletError> {
        self.select(chain_id)?;
        info!(account = %self.account.short(), chain_id, "wallet connected");
        Ok(self.account.clone())
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError> {
        self.select(chain_id)?;
        debug!(chain_id, "wallet switched chain");
        Ok(())
    }

    async fn send_value(
        &self,
        from: &WalletAddress,
        to: &WalletAddress,
        amount: CoreAmount,
    ) -> Result<String, WalletError> {
        if !from.same_account(&self.account) {
            return Err(WalletError::Transaction(format!("{from} is not the connected account")));
        }
        if self.current_chain().is_none() {
            return Err(WalletError::Unavailable("wallet is not connected".into()));
        }
        let tx_hash = format!("0x{}", Uuid::new_v4().simple());
        info!(to = %to.short(), %amount, %tx_hash, "offline transfer recorded");
        Ok(tx_hash)
    }

    fn chain_changes(&self) -> watch::Receiver<Option<u64>> {
        self.chain.subscribe()
    }
}
