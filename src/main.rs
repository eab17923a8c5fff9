//! Options Form CLI
//!
//! Renders a declared options form, normalizes submissions against it and
//! launches the configured session with the resulting options.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use options_form::forms::{submission_from_query, FormError, Submission};
use options_form::spawner::{ChildSession, SpawnError};
use options_form::{CommandSession, FormConfig, OptionsSpawner};
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "options-form", version, about)]
struct Cli {
    /// Form declaration file; defaults to $OPTIONS_FORM_CONFIG or the user config dir
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the options form markup
    Render,
    /// Print each field's type descriptor as JSON
    Describe,
    /// Normalize a submission and print the options as JSON
    Normalize(SubmissionArgs),
    /// Normalize a submission and run the configured command with it
    Launch(SubmissionArgs),
}

#[derive(Debug, clap::Args)]
struct SubmissionArgs {
    /// Submission file; reads stdin when omitted
    input: Option<PathBuf>,

    /// Parse the input as a url-encoded form body instead of JSON
    #[arg(long)]
    urlencoded: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "options_form=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => FormConfig::load_from(path)?,
        None => FormConfig::load()?,
    };

    let result = run(cli.command, config).await;

    // Submission problems are for the user, not a crash report
    if let Err(err) = result {
        match err.downcast_ref::<FormError>() {
            Some(form_err) if form_err.is_user_facing() => {
                eprintln!("{form_err}");
                std::process::exit(2);
            }
            _ => return Err(err),
        }
    }

    Ok(())
}

async fn run(command: Commands, config: FormConfig) -> Result<()> {
    match command {
        Commands::Render => {
            let form = config.build_form()?;
            print!("{}", config.options_form.unwrap_or_else(|| form.render()));
        }
        Commands::Describe => {
            let form = config.build_form()?;
            println!("{}", serde_json::to_string_pretty(&form.describe())?);
        }
        Commands::Normalize(args) => {
            let form = config.build_form()?;
            let submission = read_submission(&args).await?;
            let options = form.normalize(&submission)?;
            println!("{}", serde_json::to_string_pretty(&options)?);
        }
        Commands::Launch(args) => {
            let session = CommandSession::new(&config.command)?;
            let mut spawner = OptionsSpawner::from_config(&config, session)?;
            let submission = read_submission(&args).await?;
            spawner.set_user_options(spawner.options_from_form(&submission));
            let id = spawner.start().await.map_err(|err| match err {
                SpawnError::Form(form_err) => anyhow::Error::new(form_err),
                other => anyhow::Error::new(other),
            })?;
            let code = spawner.child_mut().wait().await?;
            tracing::info!(session = %id, ?code, "session exited");
            if let Some(code) = code.filter(|c| *c != 0) {
                std::process::exit(code);
            }
        }
    }
    Ok(())
}

async fn read_submission(args: &SubmissionArgs) -> Result<Submission> {
    let body = match &args.input {
        Some(path) => read_file(path).await?,
        None => {
            let mut body = String::new();
            tokio::io::stdin()
                .read_to_string(&mut body)
                .await
                .context("reading submission from stdin")?;
            body
        }
    };
    if args.urlencoded {
        Ok(submission_from_query(body.trim()))
    } else {
        serde_json::from_str(&body).context("parsing submission JSON")
    }
}

async fn read_file(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))
}
