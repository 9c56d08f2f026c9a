use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use termbank::admin::parse_bulk;
use termbank::api::{HttpApi, QuizApi};
use termbank::cli::Cli;
use termbank::config::Config;
use termbank::model::{Credentials, User};
use termbank::state::AppState;
use termbank::{logging, tui};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli).context("invalid --api-url")?;
    logging::init(&config.log_file, cli.verbose)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("cannot start async runtime")?;
    let api = Arc::new(HttpApi::new(config.api_base.clone())?);
    info!(base = %api.base(), "starting");

    // Handle --status
    if cli.status {
        let user = runtime.block_on(sign_in(api.as_ref(), &cli))?;
        return runtime.block_on(print_status(api.as_ref(), &user));
    }

    // Handle --import
    if let Some(path) = &cli.import {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let items = parse_bulk(&content)?;
        let user = runtime.block_on(sign_in(api.as_ref(), &cli))?;
        if !user.is_admin {
            bail!("{} is not an admin", user.name);
        }
        let imported = runtime.block_on(api.import_questions(&items))?;
        eprintln!("Bulk import successful: {} questions", imported.len());
        return Ok(());
    }

    let mut state = AppState::new(config.page_size);
    let initial = state.startup(cli.user.as_deref(), cli.password.as_deref());

    tui::run_tui(state, api, runtime.handle().clone(), initial).map_err(anyhow::Error::msg)?;

    info!("exiting");
    Ok(())
}

async fn sign_in<A: QuizApi>(api: &A, cli: &Cli) -> Result<User> {
    let (Some(username), Some(password)) = (&cli.user, &cli.password) else {
        bail!("--user and --password are required");
    };
    let credentials = Credentials {
        username: username.clone(),
        password: password.clone(),
    };
    match api.login(&credentials).await? {
        Some(user) => Ok(user),
        None => bail!("Invalid credentials."),
    }
}

async fn print_status<A: QuizApi>(api: &A, user: &User) -> Result<()> {
    let progress = api.user_progress(&user.name).await?;
    let correct = progress.values().filter(|a| a.feedback.correct).count();

    println!("User: {}", user.name);
    println!("Answered: {}", progress.len());
    println!("Correct: {}", correct);
    if !progress.is_empty() {
        println!(
            "Accuracy: {:.0}%",
            correct as f64 / progress.len() as f64 * 100.0
        );
    }

    let mut ids: Vec<_> = progress.keys().copied().collect();
    ids.sort_unstable();
    for id in ids {
        let mark = if progress[&id].feedback.correct { "✓" } else { "✗" };
        println!("  {} #{}", mark, id);
    }
    Ok(())
}
