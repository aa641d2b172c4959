//! # Swish Binary
//!
//! Assembles the services from settings and runs one command against the
//! configured store. Results go to stdout as JSON, logs go to stderr.

mod cli;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context};
use clap::Parser;
use configs::{LogSettings, Settings, StorageBackend};
use domains::{
    CoreAmount, KeyValueStore, Media, Navigation, NewPost, NewProfile, PostKind, ProfileUpdate, Route,
    WalletAddress, WalletGateway, WalletStatus,
};
use serde::Serialize;
use serde_json::json;
use services::{MintPolicy, NetworkPolicy, PostService, ProfileService, SessionGuard, TipService};
use storage_adapters::{JsonFileStore, KvPostRepository, KvProfileRepository, MemoryStore, OfflineWallet, SimulatedMinter};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Cli, Command, PostCommand, ProfileCommand};

struct App {
    profiles: ProfileService,
    posts: PostService,
    guard: SessionGuard,
    network: NetworkPolicy,
    actor: Option<WalletAddress>,
    chain: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = match &cli.config {
        Some(path) => Settings::load_from(path, true),
        None => Settings::load(),
    }
    .context("loading settings")?;
    init_tracing(&settings.log)?;

    let app = App::build(&settings, &cli).await?;
    app.run(cli.command).await
}

fn init_tracing(log: &LogSettings) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&log.level))?;
    let registry = tracing_subscriber::registry().with(filter);
    if log.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()?;
    }
    Ok(())
}

impl App {
    async fn build(settings: &Settings, cli: &Cli) -> anyhow::Result<Self> {
        let store: Arc<dyn KeyValueStore> = match settings.storage.backend {
            StorageBackend::Memory => Arc::new(MemoryStore::new()),
            StorageBackend::File => Arc::new(JsonFileStore::open(&settings.storage.path).await?),
        };
        let profile_repo = Arc::new(KvProfileRepository::open(store.clone()).await?);
        let post_repo = Arc::new(KvPostRepository::open(store).await?);

        let policy = MintPolicy {
            timeout: Duration::from_millis(settings.mint.timeout_ms),
            min_price: CoreAmount::parse(&settings.mint.min_price).context("mint.min_price")?,
            max_price: CoreAmount::parse(&settings.mint.max_price).context("mint.max_price")?,
        };
        let minter = Arc::new(SimulatedMinter::new(Duration::from_millis(settings.mint.latency_ms)));
        let actor = cli.actor.as_deref().map(WalletAddress::parse).transpose()?;

        info!(backend = ?settings.storage.backend, actor = ?actor.as_ref().map(|a| a.short()), "swish ready");
        Ok(Self {
            profiles: ProfileService::new(profile_repo.clone(), minter, policy),
            posts: PostService::new(post_repo, profile_repo.clone()),
            guard: SessionGuard::new(profile_repo),
            network: NetworkPolicy::new(settings.network.chain_id, settings.network.chain_name.clone()),
            actor,
            chain: cli.chain.unwrap_or(settings.network.chain_id),
        })
    }

    fn actor(&self) -> anyhow::Result<&WalletAddress> {
        self.actor
            .as_ref()
            .ok_or_else(|| anyhow!("this command needs a connected wallet, pass --as <ADDRESS>"))
    }

    async fn address_of(&self, username: &str) -> anyhow::Result<WalletAddress> {
        self.profiles
            .get_by_username(username)
            .await?
            .map(|p| p.address)
            .ok_or_else(|| anyhow!("no profile with username '{username}'"))
    }

    async fn run(&self, command: Command) -> anyhow::Result<()> {
        match command {
            Command::Profile(cmd) => self.run_profile(cmd).await,
            Command::Post(cmd) => self.run_post(cmd).await,
            Command::Follow { username } => {
                let target = self.address_of(&username).await?;
                let (me, _) = self.profiles.follow(self.actor()?, &target).await?;
                print(&me)
            }
            Command::Unfollow { username } => {
                let target = self.address_of(&username).await?;
                let (me, _) = self.profiles.unfollow(self.actor()?, &target).await?;
                print(&me)
            }
            Command::Followers { username } => print(&self.profiles.followers_of(&username).await?),
            Command::Following { username } => print(&self.profiles.following_of(&username).await?),
            Command::Discover => print(&self.profiles.discover().await?),
            Command::Feed => print(&self.posts.home_feed().await?),
            Command::Posts { username, membership } => {
                let kind = if membership { PostKind::Membership } else { PostKind::Normal };
                print(&self.posts.posts_by_username(&username, kind).await?)
            }
            Command::Session { path, disconnected } => {
                let wallet = match (&self.actor, disconnected) {
                    (Some(address), false) => WalletStatus::Connected {
                        address: address.clone(),
                        chain_id: Some(self.chain),
                    },
                    _ => WalletStatus::Disconnected,
                };
                let current = Route::parse(&path);
                let decision = match self.guard.evaluate(&wallet, &current).await? {
                    Navigation::Stay => json!({ "action": "stay", "path": current.path() }),
                    Navigation::Redirect(to) => json!({ "action": "redirect", "path": to.path() }),
                };
                print(&decision)
            }
            Command::Network => {
                self.network.check(Some(self.chain))?;
                print(&json!({ "chainId": self.chain, "supported": true }))
            }
            Command::Tip { username, amount } => {
                let sender = self.actor()?;
                self.network.check(Some(self.chain))?;
                let amount = CoreAmount::parse(&amount)?;
                let recipient = self.address_of(&username).await?;

                let wallet = Arc::new(OfflineWallet::new(sender.clone(), vec![self.network.chain_id]));
                wallet.connect(self.chain).await?;
                let tx_hash = TipService::new(wallet).tip(sender, &recipient, amount).await?;
                print(&json!({ "to": recipient, "amount": amount.to_string(), "txHash": tx_hash }))
            }
        }
    }

    async fn run_profile(&self, cmd: ProfileCommand) -> anyhow::Result<()> {
        match cmd {
            ProfileCommand::Create(fields) => {
                let profile = self
                    .profiles
                    .create(
                        self.actor()?,
                        NewProfile {
                            name: fields.name,
                            username: fields.username,
                            bio: fields.bio,
                            image: fields.image,
                        },
                    )
                    .await?;
                print(&profile)
            }
            ProfileCommand::Show { username } => {
                let profile = match username {
                    Some(username) => self.profiles.get_by_username(&username).await?,
                    None => self.profiles.get(self.actor()?).await?,
                };
                print(&profile)
            }
            ProfileCommand::Edit(edit) => {
                let update = ProfileUpdate {
                    name: edit.name,
                    username: edit.username,
                    bio: edit.bio,
                    image: edit.image,
                };
                print(&self.profiles.update(self.actor()?, update).await?)
            }
            ProfileCommand::Mint { price } => {
                self.network.check(Some(self.chain))?;
                let price = CoreAmount::parse(&price)?;
                print(&self.profiles.mint(self.actor()?, price).await?)
            }
            ProfileCommand::CheckUsername { candidate } => {
                let status = self.profiles.check_username(&candidate, self.actor.as_ref()).await?;
                print(&json!({ "username": candidate, "status": status, "message": status.to_string() }))
            }
        }
    }

    async fn run_post(&self, cmd: PostCommand) -> anyhow::Result<()> {
        match cmd {
            PostCommand::Create {
                content,
                membership,
                image,
                video,
            } => {
                let media = image.map(Media::Image).or(video.map(Media::Video));
                let kind = if membership { PostKind::Membership } else { PostKind::Normal };
                let post = self
                    .posts
                    .create(self.actor()?, NewPost { kind, content, media })
                    .await?;
                print(&post)
            }
            PostCommand::Show { id } => print(&self.posts.get(&id).await?),
            PostCommand::Like { id } => print(&self.posts.toggle_like(&id, self.actor()?).await?),
            PostCommand::Comment { id, content } => {
                print(&self.posts.add_comment(&id, self.actor()?, &content).await?)
            }
            PostCommand::LikeComment { id, comment_id } => {
                print(&self.posts.toggle_comment_like(&id, &comment_id, self.actor()?).await?)
            }
        }
    }
}

fn print<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
