use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "swish", version, about = "Wallet-keyed profiles, posts and follows")]
pub struct Cli {
    /// Settings file layered over the defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Wallet address acting as the connected user
    #[arg(long = "as", global = true, value_name = "ADDRESS")]
    pub actor: Option<String>,

    /// Chain the wallet reports; defaults to the configured chain
    #[arg(long, global = true)]
    pub chain: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(subcommand)]
    Profile(ProfileCommand),

    #[command(subcommand)]
    Post(PostCommand),

    Follow { username: String },
    Unfollow { username: String },
    Followers { username: String },
    Following { username: String },

    /// All profiles, ordered by username
    Discover,

    /// Normal posts from everyone, newest first
    Feed,

    /// Posts authored by one user
    Posts {
        username: String,
        #[arg(long)]
        membership: bool,
    },

    /// Where the guard sends the current session
    Session {
        #[arg(long, default_value = "/")]
        path: String,
        /// Treat the wallet as disconnected even with `--as`
        #[arg(long)]
        disconnected: bool,
    },

    /// Checks the chain the wallet reports
    Network,

    Tip {
        username: String,
        #[arg(long)]
        amount: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    Create(ProfileFields),
    /// Shows a profile by username, or the actor's own
    Show { username: Option<String> },
    Edit(ProfileEdit),
    Mint {
        #[arg(long, default_value = "0.01")]
        price: String,
    },
    CheckUsername { candidate: String },
}

#[derive(Args, Debug)]
pub struct ProfileFields {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub username: String,
    #[arg(long, default_value = "")]
    pub bio: String,
    /// Data-URI of the profile picture
    #[arg(long, default_value = "")]
    pub image: String,
}

#[derive(Args, Debug)]
pub struct ProfileEdit {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long)]
    pub bio: Option<String>,
    #[arg(long)]
    pub image: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum PostCommand {
    Create {
        #[arg(long)]
        content: String,
        #[arg(long)]
        membership: bool,
        #[arg(long, conflicts_with = "video")]
        image: Option<String>,
        #[arg(long)]
        video: Option<String>,
    },
    Show { id: String },
    Like { id: String },
    Comment {
        id: String,
        #[arg(long)]
        content: String,
    },
    LikeComment { id: String, comment_id: String },
}
