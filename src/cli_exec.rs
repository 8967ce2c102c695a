use anyhow::{Context, Result};

use ptadmin::config::SessionFile;
use ptadmin::harness::{AdminRepository, JsonFileRepository};
use ptadmin::model::{Credentials, NewAdmin, unix_now};
use ptadmin::verify::{self, Target};
use ptadmin::{AdminClient, ApiError, ClientConfig};

use crate::cli_subcommands::{UsersCommands, VerifyArgs};
use crate::{Cli, Commands};

pub(crate) fn run(cli: Cli) -> Result<()> {
    let config = ClientConfig::new(&cli.url)?;
    let file = SessionFile::in_dir(&cli.state_dir);

    match cli.command {
        Commands::Login { json } => {
            let credentials = credentials(cli.email, cli.password)?;
            let base_url = config.base_url.clone();
            let mut client = AdminClient::new(config)?;
            let session = client.login(&credentials)?;
            file.save(&base_url, session)?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&session.user).context("serialize user json")?
                );
            } else {
                println!("Logged in as {}", session.user.email);
            }
        }
        Commands::Refresh => {
            with_session(&config, &file, |client| client.refresh())?;
            println!("Access token refreshed");
        }
        Commands::Whoami { json } => {
            let session = file
                .load(&config.base_url)?
                .ok_or(ApiError::NoSession)?;
            if json {
                let out = serde_json::json!({
                    "user": session.user,
                    "accessExpiresAt": session.access_expires_at(),
                    "refreshExpiresAt": session.refresh_expires_at(),
                });
                println!(
                    "{}",
                    serde_json::to_string_pretty(&out).context("serialize whoami json")?
                );
            } else {
                let now = unix_now();
                println!("user: {}", session.user.email);
                println!(
                    "access token: expires in {}s",
                    session.access_expires_at() - now
                );
                println!(
                    "refresh token: expires in {}s",
                    session.refresh_expires_at() - now
                );
            }
        }
        Commands::Logout => {
            if file.remove()? {
                println!("Session discarded");
            } else {
                println!("No session to discard");
            }
        }
        Commands::Users { command } => run_users(&config, &file, command)?,
        Commands::ChangePassword { current, new } => {
            let current = current
                .or(cli.password)
                .context("current password required (--current or --password)")?;
            with_session(&config, &file, |client| {
                client.change_password(&current, &new)
            })?;
            println!("Password changed");
        }
        Commands::Verify(args) => {
            let credentials = credentials(cli.email, cli.password)?;
            run_verify(config, credentials, args)?;
        }
    }

    Ok(())
}

fn run_users(config: &ClientConfig, file: &SessionFile, command: UsersCommands) -> Result<()> {
    match command {
        UsersCommands::List { json } => {
            let users = with_session(config, file, |client| client.list_users())?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&users).context("serialize users json")?
                );
            } else {
                for u in users {
                    println!(
                        "{} {} {}",
                        u.email,
                        u.role.as_deref().unwrap_or("-"),
                        u.name.as_deref().unwrap_or("")
                    );
                }
            }
        }
        UsersCommands::Create {
            email,
            name,
            initial_password,
            role,
            json,
        } => {
            let admin = NewAdmin {
                email,
                password: initial_password,
                name,
                role,
            };
            let user = with_session(config, file, |client| client.create_user(&admin))?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&user).context("serialize user json")?
                );
            } else {
                println!("Created {}", user.email);
            }
        }
        UsersCommands::Delete { id } => {
            with_session(config, file, |client| client.delete_user(&id))?;
            println!("Deleted {}", id);
        }
    }
    Ok(())
}

fn run_verify(config: ClientConfig, credentials: Credentials, args: VerifyArgs) -> Result<()> {
    let repository: Option<Box<dyn AdminRepository>> = args
        .data_dir
        .as_deref()
        .map(|dir| Box::new(JsonFileRepository::in_data_dir(dir)) as Box<dyn AdminRepository>);
    let target = Target {
        config,
        credentials,
        rotate_password: args.rotate_password,
    };

    let report = verify::run(&target, repository)?;
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serialize report json")?
        );
    } else {
        print!("{}", report.render());
    }
    if !report.passed() {
        anyhow::bail!("{} check(s) failed", report.failures().count());
    }
    Ok(())
}

fn credentials(email: Option<String>, password: Option<String>) -> Result<Credentials> {
    let email = email.context("admin email required (--email or PTADMIN_EMAIL)")?;
    let password = password.context("admin password required (--password or PTADMIN_PASSWORD)")?;
    Ok(Credentials::new(email, password))
}

/// Run `f` on the stored session, then write back whatever session is left.
/// A rejected refresh leaves none, which removes the file.
fn with_session<T>(
    config: &ClientConfig,
    file: &SessionFile,
    f: impl FnOnce(&mut AdminClient) -> Result<T, ApiError>,
) -> Result<T> {
    let session = file
        .load(&config.base_url)?
        .ok_or(ApiError::NoSession)?;
    let mut client = AdminClient::with_session(config.clone(), session)?;
    let out = f(&mut client);
    match client.session() {
        Some(session) => file.save(&config.base_url, session)?,
        None => {
            file.remove()?;
        }
    }
    Ok(out?)
}
