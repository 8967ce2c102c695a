use std::path::PathBuf;

use clap::{Args, Subcommand};

#[derive(Subcommand)]
pub(crate) enum UsersCommands {
    /// List admin users
    List {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Create an admin user
    Create {
        email: String,
        #[arg(long)]
        name: String,
        /// Initial password (at least 8 characters)
        #[arg(long)]
        initial_password: String,
        #[arg(long)]
        role: Option<String>,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete an admin user by id or email
    Delete { id: String },
}

#[derive(Args)]
pub(crate) struct VerifyArgs {
    /// Also change the password to this value and back
    #[arg(long)]
    pub(crate) rotate_password: Option<String>,

    /// ptadmin-server data directory, enables storage assertions
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,

    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}
