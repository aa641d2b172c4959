use domains::{KeyValueStore, Navigation, Route, WalletStatus, WriteOp};
use integration_tests::{addr, Harness};

fn connected(address: &str) -> WalletStatus {
    WalletStatus::Connected {
        address: addr(address),
        chain_id: Some(1114),
    }
}

#[tokio::test]
async fn session_walks_from_landing_to_home() {
    let h = Harness::new().await.unwrap();

    let nav = h.guard.evaluate(&WalletStatus::Disconnected, &Route::Home).await.unwrap();
    assert_eq!(nav, Navigation::Redirect(Route::Landing));

    let wallet = connected("0xA");
    let nav = h.guard.evaluate(&wallet, &Route::Landing).await.unwrap();
    assert_eq!(nav, Navigation::Redirect(Route::CreateProfile));
    assert_eq!(h.guard.evaluate(&wallet, &Route::CreateProfile).await.unwrap(), Navigation::Stay);

    h.profile("0xA", "alice").await.unwrap();
    let nav = h.guard.evaluate(&wallet, &Route::CreateProfile).await.unwrap();
    assert_eq!(nav, Navigation::Redirect(Route::Home));
    let nav = h.guard.evaluate(&wallet, &Route::parse("/bobby/followers")).await.unwrap();
    assert_eq!(nav, Navigation::Stay);
}

#[tokio::test]
async fn unreadable_profile_counts_as_missing() {
    let h = Harness::new().await.unwrap();
    h.store
        .apply(vec![WriteOp::put("profile-0xA", "{broken")])
        .await
        .unwrap();

    let nav = h.guard.evaluate(&connected("0xA"), &Route::Home).await.unwrap();
    assert_eq!(nav, Navigation::Redirect(Route::CreateProfile));
}
