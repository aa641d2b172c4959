//! Single-chain network policy.
//!
//! The application only operates on one chain. `check` produces the message a
//! front end shows inline; `enforce` asks the wallet to switch back.

use domains::{DomainError, Result, WalletError, WalletGateway};
use tracing::{info, warn};

/// Core Testnet.
pub const CORE_TESTNET_CHAIN_ID: u64 = 1114;
pub const CORE_TESTNET_NAME: &str = "Core Testnet";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkPolicy {
    pub chain_id: u64,
    pub chain_name: String,
}

impl Default for NetworkPolicy {
    fn default() -> Self {
        Self {
            chain_id: CORE_TESTNET_CHAIN_ID,
            chain_name: CORE_TESTNET_NAME.to_string(),
        }
    }
}

/// What `enforce` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enforcement {
    AlreadyOnChain,
    Switched,
}

impl NetworkPolicy {
    pub fn new(chain_id: u64, chain_name: impl Into<String>) -> Self {
        Self {
            chain_id,
            chain_name: chain_name.into(),
        }
    }

    pub fn is_supported(&self, chain_id: Option<u64>) -> bool {
        chain_id == Some(self.chain_id)
    }

    pub fn check(&self, chain_id: Option<u64>) -> Result<()> {
        match chain_id {
            None => Err(DomainError::WrongNetwork(
                "No blockchain network detected. Please connect your wallet.".into(),
            )),
            Some(id) if id != self.chain_id => Err(DomainError::WrongNetwork(format!(
                "You're connected to the wrong network. Please switch to {} (Chain ID: {}).",
                self.chain_name, self.chain_id
            ))),
            Some(_) => Ok(()),
        }
    }

    /// Switches the wallet to the supported chain when it sits elsewhere.
    pub async fn enforce(&self, wallet: &dyn WalletGateway, chain_id: Option<u64>) -> Result<Enforcement> {
        if self.is_supported(chain_id) {
            return Ok(Enforcement::AlreadyOnChain);
        }
        match wallet.switch_chain(self.chain_id).await {
            Ok(()) => {
                info!(from = ?chain_id, to = self.chain_id, "switched wallet back to supported chain");
                Ok(Enforcement::Switched)
            }
            Err(WalletError::UnknownChain(id)) => {
                warn!(chain_id = id, "wallet does not know the supported chain");
                Err(DomainError::WrongNetwork(format!(
                    "{} has not been added to your wallet (Chain ID: {id}).",
                    self.chain_name
                )))
            }
            Err(e) => {
                warn!(error = %e, "failed to switch network");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::MockWalletGateway;

    #[test]
    fn messages_match_connection_state() {
        let policy = NetworkPolicy::default();
        assert!(policy.check(Some(1114)).is_ok());

        let none = policy.check(None).unwrap_err().to_string();
        assert_eq!(none, "No blockchain network detected. Please connect your wallet.");

        let wrong = policy.check(Some(1)).unwrap_err().to_string();
        assert_eq!(
            wrong,
            "You're connected to the wrong network. Please switch to Core Testnet (Chain ID: 1114)."
        );
    }

    #[tokio::test]
    async fn enforce_switches_only_when_needed() {
        let mut wallet = MockWalletGateway::new();
        wallet
            .expect_switch_chain()
            .withf(|id| *id == 1114)
            .times(1)
            .returning(|_| Ok(()));
        let policy = NetworkPolicy::default();

        assert_eq!(policy.enforce(&wallet, Some(1114)).await.unwrap(), Enforcement::AlreadyOnChain);
        assert_eq!(policy.enforce(&wallet, Some(56)).await.unwrap(), Enforcement::Switched);
    }

    #[tokio::test]
    async fn enforce_reports_unknown_chain() {
        let mut wallet = MockWalletGateway::new();
        wallet
            .expect_switch_chain()
            .returning(|id| Err(WalletError::UnknownChain(id)));
        let err = NetworkPolicy::default().enforce(&wallet, None).await.unwrap_err();
        assert!(matches!(err, DomainError::WrongNetwork(_)));
    }
}
