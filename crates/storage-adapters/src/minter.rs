use std::time::Duration;

use async_trait::async_trait;
use domains::{MintGateway, MintOutcome, MintRequest};
use tracing::info;
use uuid::Uuid;

/// Local stand-in for the profile NFT contract.
///
/// Waits `latency` to mimic block confirmation, then always succeeds.
#[derive(Debug, Clone)]
pub struct SimulatedMinter {
    latency: Duration,
}

impl SimulatedMinter {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for SimulatedMinter {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

#[async_trait]
impl MintGateway for SimulatedMinter {
    async fn mint(&self, request: &MintRequest) -> MintOutcome {
        tokio::time::sleep(self.latency).await;
        let token_id = Uuid::new_v4().simple().to_string();
        info!(address = %request.address, username = %request.username, price = %request.price, %token_id, "simulated mint confirmed");
        MintOutcome::Minted {
            token_id: Some(token_id),
        }
    }
}
