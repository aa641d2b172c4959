use std::sync::Arc;

use domains::{DomainError, KeyValueStore, MintOutcome, MockMintGateway, PostKind};
use integration_tests::{addr, min_price, Harness};
use storage_adapters::{JsonFileStore, MemoryStore, POST_STORAGE_KEY};

const LEGACY_POSTS: &str = r#"{"state":{"posts":[
    {"id":"1712000000000","type":"normal","content":"from the old client",
     "timestamp":1712000000000,"walletAddress":"0xA",
     "user":{"name":"Alice","username":"alice","imagePreview":""}},
    {"id":"1712000100000","type":"membership","content":"members",
     "timestamp":1712000100000,"walletAddress":"0xA",
     "user":{"name":"Alice","username":"alice","imagePreview":""}}
]},"version":0}"#;

#[tokio::test]
async fn legacy_posts_migrate_once_and_persist() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("swish.json");
    let seed = serde_json::json!({
        "post-storage": LEGACY_POSTS,
        "profile-0xA": r#"{"name":"Alice","username":"alice","nftMinted":true}"#,
    });
    std::fs::write(&path, seed.to_string()).unwrap();

    {
        let store = Arc::new(JsonFileStore::open(&path).await.unwrap());
        let h = Harness::over(store).await.unwrap();
        let feed = h.posts.home_feed().await.unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].content, "from the old client");

        // old posts accept likes once migrated
        h.posts.toggle_like(&feed[0].id, &addr("0xB")).await.unwrap();
    }

    let store = Arc::new(JsonFileStore::open(&path).await.unwrap());
    let raw = store.get(POST_STORAGE_KEY).await.unwrap().unwrap();
    assert!(raw.trim_start().starts_with('['));
    // the profile written before the index existed was indexed on open
    assert_eq!(store.get("username-alice").await.unwrap().as_deref(), Some("0xA"));

    let h = Harness::over(store).await.unwrap();
    let tab = h.posts.posts_by_username("alice", PostKind::Membership).await.unwrap();
    assert_eq!(tab.len(), 1);
    let feed = h.posts.home_feed().await.unwrap();
    assert_eq!(feed[0].likes, vec![addr("0xB")]);
    assert!(h.post("0xA", "new client").await.is_ok());
}

#[tokio::test]
async fn failed_mint_leaves_profile_editable() {
    let mut minter = MockMintGateway::new();
    minter
        .expect_mint()
        .times(1)
        .returning(|_| MintOutcome::InsufficientFunds);
    let h = Harness::with_minter(Arc::new(MemoryStore::new()), Arc::new(minter))
        .await
        .unwrap();
    h.profile("0xA", "alice").await.unwrap();

    let err = h.profiles.mint(&addr("0xA"), min_price()).await.unwrap_err();
    assert!(matches!(err, DomainError::MintFailed(_)));
    assert!(!h.profiles.get(&addr("0xA")).await.unwrap().unwrap().nft_minted);
}
