//! commitsmith - CLI entry point.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use dialoguer::Confirm;
use tracing_subscriber::EnvFilter;

use commitsmith::commit::{
    ComposeMode, IndexSnapshot, Notice, Outcome, commit_staged, generate_commit_message, stage_all,
};
use commitsmith::config::Config;
use commitsmith::git::{GitCli, check_git_installed, discover};
use commitsmith::llm::GeminiClient;

/// Stage every pending change and commit it with a generated message.
#[derive(Parser, Debug)]
#[command(name = "commitsmith")]
#[command(about = "Generate a commit message for pending changes and commit them")]
#[command(version)]
struct Cli {
    /// Directory inside the repository (defaults to the current directory)
    #[arg(long, default_value = ".")]
    path: PathBuf,

    /// Body style: narrative explanation or explanation plus raw diffs
    #[arg(long)]
    mode: Option<ComposeMode>,

    /// Gemini model name
    #[arg(long)]
    model: Option<String>,

    /// Timeout in seconds for each git query and the generation request
    #[arg(long)]
    timeout: Option<u64>,

    /// Print the message without committing; the index is restored afterwards
    #[arg(long)]
    dry_run: bool,

    /// Commit without asking for confirmation
    #[arg(short, long)]
    yes: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Step 1: Check prerequisites
    check_git_installed().await.context("git is required")?;

    let workspace = discover(&cli.path).context("Run commitsmith from within a git repository")?;

    // Step 2: Resolve configuration (flags override environment)
    let mut config = Config::from_env();
    if let Some(mode) = cli.mode {
        config.mode = mode;
    }
    if let Some(model) = cli.model {
        config.model = model;
    }
    if let Some(secs) = cli.timeout.filter(|secs| *secs > 0) {
        config.timeout = Duration::from_secs(secs);
    }

    // Step 3: Stage everything so status and diffs describe what will be committed.
    // The previous index is kept so a dry run or an abort can put it back.
    let snapshot = match IndexSnapshot::capture(&workspace.repo) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            eprintln!("Warning: {}. Staged changes will not be restored.", e);
            None
        }
    };
    stage_all(&workspace.repo).context("Failed to stage changes")?;
    let restore_index = || -> Result<()> {
        if let Some(snapshot) = &snapshot {
            snapshot
                .restore(&workspace.repo)
                .context("Failed to restore the previous index")?;
        }
        Ok(())
    };

    // Step 4: Compose the message
    let vcs = GitCli::new(&workspace.workdir, config.timeout);
    let generator = GeminiClient::new(config.credential.clone(), config.model.clone());

    println!("Analyzing changes in {}...", workspace.workdir.display());

    let (message, changes, notice) = match generate_commit_message(&vcs, &generator, &config).await {
        Outcome::NoChanges => {
            println!("No changes to commit.");
            restore_index()?;
            return Ok(());
        }
        Outcome::Composed {
            message,
            changes,
            notice,
        } => (message, changes, notice),
    };

    if let Some(notice) = &notice {
        eprintln!("Warning: {}", notice);
    }
    if matches!(notice, Some(Notice::PipelineFailed(_))) {
        println!("Committing with the default message.");
    } else {
        println!(
            "Found {} added, {} modified, {} deleted",
            changes.added().len(),
            changes.modified().len(),
            changes.deleted().len()
        );
    }

    println!("\n{}\n", message.format());

    // Step 5: Commit
    if cli.dry_run {
        restore_index()?;
        println!("Dry run complete. Nothing committed.");
        return Ok(());
    }

    if !cli.yes {
        let confirmed = Confirm::new()
            .with_prompt("Commit with this message?")
            .default(true)
            .interact()
            .context("Confirmation prompt failed")?;
        if !confirmed {
            restore_index()?;
            println!("Aborted. Nothing committed.");
            return Ok(());
        }
    }

    let oid = commit_staged(&workspace.repo, &message).context("Failed to create commit")?;
    println!("✓ Created commit {}", &oid.to_string()[..7]);

    Ok(())
}
