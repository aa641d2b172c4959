use domains::{DomainError, KeyValueStore, NewProfile, ProfileUpdate, UsernameStatus, WriteOp};
use integration_tests::{addr, min_price, Harness};

#[tokio::test]
async fn alice_and_bob_scenario() {
    let h = Harness::new().await.unwrap();
    h.profile("0xA", "alice").await.unwrap();
    assert_eq!(h.profiles.get(&addr("0xA")).await.unwrap().unwrap().username, "alice");

    let clash = h
        .profiles
        .create(
            &addr("0xB"),
            NewProfile {
                name: "Impostor".into(),
                username: "alice".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(clash, DomainError::Username(UsernameStatus::Taken));
    assert_eq!(h.profiles.get(&addr("0xA")).await.unwrap().unwrap().name, "Alice");
    assert!(h.profiles.get(&addr("0xB")).await.unwrap().is_none());

    // following requires a profile on both ends
    assert!(matches!(
        h.profiles.follow(&addr("0xB"), &addr("0xA")).await.unwrap_err(),
        DomainError::NotFound(..)
    ));

    h.profile("0xB", "bobby").await.unwrap();
    h.profiles.follow(&addr("0xB"), &addr("0xA")).await.unwrap();
    let alice = h.profiles.get(&addr("0xA")).await.unwrap().unwrap();
    assert_eq!(alice.followers, vec![addr("0xB")]);
}

#[tokio::test]
async fn valid_usernames_round_trip() {
    let h = Harness::new().await.unwrap();
    for (i, username) in ["dave", "erin_01", "Frank.eth", "ünïcode"].into_iter().enumerate() {
        let address = format!("0x{i}");
        h.profile(&address, username).await.unwrap();
        let stored = h.profiles.get(&addr(&address)).await.unwrap().unwrap();
        assert_eq!(stored.username, username);
        assert_eq!(h.profiles.get_by_username(username).await.unwrap().unwrap().address, addr(&address));
    }
}

#[tokio::test]
async fn invalid_usernames_leave_store_untouched() {
    let h = Harness::new().await.unwrap();
    for (username, status) in [
        ("bob", UsernameStatus::TooShort),
        ("has space", UsernameStatus::ContainsWhitespace),
        ("discover", UsernameStatus::Reserved),
        ("create-profile", UsernameStatus::Reserved),
    ] {
        let err = h
            .profiles
            .create(
                &addr("0xA"),
                NewProfile {
                    name: "A".into(),
                    username: username.into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::Username(status), "{username}");
    }
    assert!(h.profiles.discover().await.unwrap().is_empty());
}

#[tokio::test]
async fn follow_is_symmetric_and_reversible() {
    let h = Harness::new().await.unwrap();
    h.profile("0xA", "alice").await.unwrap();
    h.profile("0xB", "bobby").await.unwrap();

    h.profiles.follow(&addr("0xA"), &addr("0xB")).await.unwrap();
    h.profiles.follow(&addr("0xA"), &addr("0xB")).await.unwrap();
    let a = h.profiles.get(&addr("0xA")).await.unwrap().unwrap();
    let b = h.profiles.get(&addr("0xB")).await.unwrap().unwrap();
    assert_eq!(a.following, vec![addr("0xB")]);
    assert_eq!(b.followers, vec![addr("0xA")]);

    let followers: Vec<_> = h
        .profiles
        .followers_of("bobby")
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.username)
        .collect();
    assert_eq!(followers, vec!["alice"]);

    h.profiles.unfollow(&addr("0xA"), &addr("0xB")).await.unwrap();
    let a = h.profiles.get(&addr("0xA")).await.unwrap().unwrap();
    let b = h.profiles.get(&addr("0xB")).await.unwrap().unwrap();
    assert!(!a.is_following(&b.address));
    assert!(!b.is_followed_by(&a.address));
    assert!(h.profiles.following_of("alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn minted_profile_rejects_edits() {
    let h = Harness::new().await.unwrap();
    h.profile("0xA", "alice").await.unwrap();
    let minted = h.profiles.mint(&addr("0xA"), min_price()).await.unwrap();
    assert!(minted.nft_minted);

    let err = h
        .profiles
        .update(
            &addr("0xA"),
            ProfileUpdate {
                bio: Some("changed".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::ProfileLocked(addr("0xA")));
    assert_eq!(h.profiles.get(&addr("0xA")).await.unwrap().unwrap(), minted);

    // the social graph stays mutable
    h.profile("0xB", "bobby").await.unwrap();
    h.profiles.follow(&addr("0xB"), &addr("0xA")).await.unwrap();
    assert!(h.profiles.get(&addr("0xA")).await.unwrap().unwrap().is_followed_by(&addr("0xB")));
}

#[tokio::test]
async fn rename_frees_the_old_username() {
    let h = Harness::new().await.unwrap();
    h.profile("0xA", "alice").await.unwrap();
    h.profiles
        .update(
            &addr("0xA"),
            ProfileUpdate {
                username: Some("alicia".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(h.profiles.get_by_username("alice").await.unwrap().is_none());
    assert!(h.profiles.check_username("alice", None).await.unwrap().is_available());
    h.profile("0xB", "alice").await.unwrap();
}

#[tokio::test]
async fn discover_lists_complete_profiles_by_username() {
    let h = Harness::new().await.unwrap();
    h.profile("0xC", "zelda").await.unwrap();
    h.profile("0xA", "mallory").await.unwrap();
    h.profile("0xB", "carol").await.unwrap();
    h.store
        .apply(vec![
            WriteOp::put("profile-0xD", r#"{"address":"0xD","name":"","username":"nameless"}"#),
            WriteOp::put("profile-0xE", r#"{"address":"0xE","name":"Eve","username":""}"#),
        ])
        .await
        .unwrap();

    let usernames: Vec<_> = h
        .profiles
        .discover()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.username)
        .collect();
    assert_eq!(usernames, vec!["carol", "mallory", "zelda"]);
}
