use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "stock-guardian", author, version, about = "Stock Guardian command line client")]
pub struct Cli {
    /// JSON file overlaid on the built-in configuration
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and store the session token
    Login(CredentialArgs),
    /// Create an account (does not log in)
    Signup(CredentialArgs),
    /// Forget the stored session token
    Logout,
    /// Server-synchronized favorites
    #[command(subcommand)]
    Favorites(FavoritesCommand),
    /// Autocomplete a ticker name from the local reference table
    Suggest { input: String },
    /// Aggregated news, newest first
    News(NewsArgs),
    /// AI analysis and investor flow for one ticker
    Analysis { name: String },
    /// Ask the AI to explain a financial term
    Ask { term: String },
    /// Previous term explanations
    History,
    /// Local watchlist with pinning
    Watchlist(WatchlistArgs),
}

#[derive(Debug, Args)]
pub struct CredentialArgs {
    pub username: String,
    /// Read from stdin when omitted
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum FavoritesCommand {
    /// Show the server list
    List,
    /// Add a ticker; the exact server casing is discovered automatically
    Add { input: String },
    /// Remove a ticker by its exact name
    Remove { name: String },
}

#[derive(Debug, Args)]
pub struct NewsArgs {
    /// Only this company's articles
    #[arg(long)]
    pub company: Option<String>,
    /// Case-insensitive filter on title, body or company
    #[arg(long)]
    pub query: Option<String>,
}

#[derive(Debug, Args)]
pub struct WatchlistArgs {
    /// Filter on name or category
    #[arg(long)]
    pub query: Option<String>,
    /// Toggle the pin on these ids before listing
    #[arg(long = "pin")]
    pub pins: Vec<String>,
}
