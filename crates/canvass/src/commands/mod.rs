//! Command handlers and the shared connect/confirm plumbing.

pub mod campaigns;
pub mod config_cmd;
pub mod landingpages;
pub mod outbox;
pub mod prospects;

use std::io::IsTerminal;
use std::time::Duration;

use secrecy::SecretString;

use canvass_config::{
    active_profile_name, load_config_or_default, resolve_console_config, resolve_credentials,
};
use canvass_core::models::AdminUser;
use canvass_core::{Console, ConsoleConfig, Credentials, TlsVerification};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;
use crate::output;

/// Route a parsed command to its handler.
pub async fn dispatch(
    cmd: Command,
    console: &Console,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Campaigns(args) => campaigns::handle(console, args, global).await,
        Command::Landingpages(args) => landingpages::handle(console, args, global).await,
        Command::Prospects(args) => prospects::handle(console, args, global).await,
        Command::Outbox(args) => outbox::handle(console, args, global).await,
        Command::Whoami => whoami(console, global).await,
        // Handled before connect in main::run.
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}

/// Build a console from config + flags and sign in.
pub async fn connect(global: &GlobalOpts) -> Result<Console, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global.profile.as_deref(), &cfg);

    // Resolve connection settings: profile first, CLI flags override.
    let (mut console_config, profile_email, profile_password) =
        if let Some(profile) = cfg.profiles.get(&profile_name) {
            let resolved = resolve_console_config(profile, &cfg.defaults)
                .map_err(|e| CliError::Validation {
                    field: "profile".into(),
                    reason: e.to_string(),
                })?;
            let (email, password) =
                resolve_credentials(profile, &profile_name).map_or((None, None), |(e, p)| {
                    (Some(e), p)
                });
            (resolved, email, password)
        } else {
            let url = global.url.as_deref().ok_or_else(|| CliError::NoConfig {
                path: canvass_config::config_path().display().to_string(),
            })?;
            let base_url = url.parse().map_err(|_| CliError::Validation {
                field: "url".into(),
                reason: format!("invalid URL: {url}"),
            })?;
            (ConsoleConfig::new(base_url), None, None)
        };

    if let Some(ref url) = global.url {
        console_config.base_url = url.parse().map_err(|_| CliError::Validation {
            field: "url".into(),
            reason: format!("invalid URL: {url}"),
        })?;
    }
    if global.insecure {
        console_config.tls = TlsVerification::DangerAcceptInvalid;
    }
    console_config.timeout = Duration::from_secs(global.timeout);

    let email = global
        .email
        .clone()
        .or(profile_email)
        .ok_or_else(|| CliError::NoCredentials {
            profile: profile_name.clone(),
        })?;

    let password = match profile_password {
        Some(pw) => pw,
        None => prompt_password(&profile_name)?,
    };

    let console = Console::new(&console_config)?;
    console
        .sign_in(&Credentials { email, password })
        .await?;
    Ok(console)
}

fn prompt_password(profile: &str) -> Result<SecretString, CliError> {
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NoCredentials {
            profile: profile.to_owned(),
        });
    }
    let pw = rpassword::prompt_password("Password: ").map_err(|e| CliError::Validation {
        field: "password".into(),
        reason: e.to_string(),
    })?;
    Ok(SecretString::from(pw))
}

/// Destructive-action gate: `--yes` skips it, non-interactive sessions
/// refuse rather than assume.
pub fn confirm_destructive(prompt: &str, yes: bool) -> Result<(), CliError> {
    if yes {
        return Ok(());
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::Cancelled);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| CliError::Validation {
            field: "confirmation".into(),
            reason: e.to_string(),
        })?;
    if confirmed {
        Ok(())
    } else {
        Err(CliError::Cancelled)
    }
}

/// Spinner for multi-page fetches; hidden in quiet mode.
pub fn spinner(message: &str, quiet: bool) -> indicatif::ProgressBar {
    if quiet {
        return indicatif::ProgressBar::hidden();
    }
    let bar = indicatif::ProgressBar::new_spinner();
    bar.set_message(message.to_owned());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

async fn whoami(console: &Console, global: &GlobalOpts) -> Result<(), CliError> {
    let user: AdminUser = console.current_user().await?;
    let out = output::render_single(
        &global.output,
        &user,
        |u| format!("ID:     {}\nName:   {}\nEmail:  {}", u.id, u.name, u.email),
        |u| u.id.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
