use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cli_exec;
mod cli_subcommands;

use self::cli_subcommands::{UsersCommands, VerifyArgs};

#[derive(Parser)]
#[command(name = "ptadmin")]
#[command(about = "Admin session client for the personal-training backend", long_about = None)]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "PTADMIN_URL", default_value = "http://127.0.0.1:8001", global = true)]
    url: String,

    /// Admin email used by `login` and `verify`
    #[arg(long, env = "PTADMIN_EMAIL", global = true)]
    email: Option<String>,

    /// Admin password used by `login` and `verify`
    #[arg(long, env = "PTADMIN_PASSWORD", hide_env_values = true, global = true)]
    password: Option<String>,

    /// Directory holding session.json
    #[arg(long, default_value = ".ptadmin", global = true)]
    state_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the token pair
    Login {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Exchange the stored refresh token for a new access token
    Refresh,

    /// Show the session's admin and token expiry
    Whoami {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Discard the stored session
    Logout,

    /// Manage admin users
    Users {
        #[command(subcommand)]
        command: UsersCommands,
    },

    /// Change the session admin's password
    ChangePassword {
        /// Current password (defaults to --password)
        #[arg(long)]
        current: Option<String>,
        /// New password (at least 8 characters)
        #[arg(long)]
        new: String,
    },

    /// Check the backend against the admin auth contract
    Verify(VerifyArgs),
}

fn main() {
    ptadmin::logging::init("ptadmin=info");
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    cli_exec::run(cli)
}
