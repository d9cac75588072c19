//! Eqori CLI - Terminal front-end for the Eqori marketing-content service.
//!
//! # Usage
//!
//! ```bash
//! # Create an account and sign in
//! eqori register
//!
//! # Sign in to an existing account
//! eqori login -e user@example.com
//!
//! # Generate marketing copy for a product
//! eqori generate --name "Trail Kettle" --category Outdoors --tone playful
//!
//! # Manage past generations
//! eqori history list
//! eqori history favorite 7
//! eqori history delete 7 --yes
//!
//! # Read the blog
//! eqori blog list --category "AI Marketing"
//! eqori blog show ai-marketing-trends
//! ```
//!
//! # Environment Variables
//!
//! - `EQORI_API_BASE_URL` - Backend API root (default: `http://localhost:8000/api`)
//! - `EQORI_DATA_DIR` - Where the session credential file lives

#![cfg_attr(not(test), forbid(unsafe_code))]
// The CLI's screens render to stdout/stderr.
#![allow(clippy::print_stdout)]
#![allow(clippy::print_stderr)]

use clap::{Parser, Subcommand};

use eqori_client::{ClientConfig, Destination, EqoriClient};

mod commands;
mod screen;

use commands::{CommandError, auth, blog, generate, history};

#[derive(Parser)]
#[command(name = "eqori")]
#[command(author, version, about = "Eqori - AI marketing copy from your terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in to an existing account
    Login {
        /// Account email (prompted when omitted)
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Create an account and sign in
    Register {
        /// Account email (prompted when omitted)
        #[arg(short, long)]
        email: Option<String>,

        /// Display name (prompted when omitted)
        #[arg(short, long)]
        username: Option<String>,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Generate marketing copy for a product
    Generate(generate::GenerateArgs),
    /// Browse and manage past generations
    History {
        #[command(subcommand)]
        action: history::HistoryAction,
    },
    /// Read the Eqori blog
    Blog {
        #[command(subcommand)]
        action: blog::BlogAction,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing with EnvFilter; default to warnings only so screen
    // output stays clean unless RUST_LOG asks for more.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "eqori_cli=warn,eqori_client=warn".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let (client, mut navigation) = match EqoriClient::new(config) {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let result = run(&cli, &client).await;

    // A 401 observed during the command published a forced navigation; the
    // terminal's rendition of "redirect to /login" is telling the user.
    if navigation.take() == Some(Destination::Login) {
        eprintln!("Your session has expired. Run `eqori login` to sign in again.");
    }

    if let Err(e) = result {
        match e {
            // Guard redirects and refused credentials already explained
            // themselves to the user.
            CommandError::NotSignedIn
            | CommandError::AlreadySignedIn(_)
            | CommandError::Refused(_)
            | CommandError::Aborted => {}
            other => eprintln!("error: {other}"),
        }
        std::process::exit(1);
    }
}

async fn run(cli: &Cli, client: &EqoriClient) -> Result<(), CommandError> {
    match &cli.command {
        Commands::Login { email } => auth::login(client, email.as_deref()).await,
        Commands::Register { email, username } => {
            auth::register(client, email.as_deref(), username.as_deref()).await
        }
        Commands::Logout => auth::logout(client),
        Commands::Whoami => auth::whoami(client).await,
        Commands::Generate(args) => generate::run(client, args).await,
        Commands::History { action } => history::run(client, action).await,
        Commands::Blog { action } => blog::run(client, action).await,
    }
}
