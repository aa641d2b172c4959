//! Direct CORE tips between accounts, sent through the wallet.

use std::sync::Arc;

use domains::{CoreAmount, DomainError, Result, WalletAddress, WalletGateway};
use tracing::{info, warn};

pub struct TipService {
    wallet: Arc<dyn WalletGateway>,
}

impl TipService {
    pub fn new(wallet: Arc<dyn WalletGateway>) -> Self {
        Self { wallet }
    }

    /// Sends `amount` and returns the transaction hash.
    pub async fn tip(&self, sender: &WalletAddress, recipient: &WalletAddress, amount: CoreAmount) -> Result<String> {
        if amount.is_zero() {
            return Err(DomainError::Validation("Enter a valid amount".into()));
        }
        if sender.same_account(recipient) {
            return Err(DomainError::Validation("cannot tip your own account".into()));
        }

        match self.wallet.send_value(sender, recipient, amount).await {
            Ok(tx_hash) => {
                info!(%sender, recipient = %recipient.short(), %amount, %tx_hash, "tip sent");
                Ok(tx_hash)
            }
            Err(e) => {
                warn!(%sender, recipient = %recipient.short(), error = %e, "tip failed");
                Err(e.into())
            }
        }
    }
}
