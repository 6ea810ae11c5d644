use std::{
    path::Path,
    process::ExitCode,
};

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use vaultcards::{
    anki::AnkiConnect,
    core::{
        sync_document,
        utils::card_id,
        SyncError,
    },
    parser::extract_flashcards,
    persistence::{
        default_state_path,
        StateStore,
    },
    render::MarkdownRenderer,
    vault::Vault,
};

mod cli;

use cli::{
    Cli,
    Commands,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vaultcards={default_level}")));
    tracing_subscriber::fmt().with_env_filter(env_filter).with_writer(std::io::stderr).init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("{e:?}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), SyncError> {
    let state_path = cli.state.unwrap_or_else(default_state_path);
    debug!("Using state file {}", state_path.display());
    let mut state = StateStore::load(state_path)?;

    match cli.command {
        Commands::Sync { file, vault, vault_name } => {
            let vault = Vault::open(&vault, vault_name)?;
            let anki = AnkiConnect::new(state.settings().store_address.clone());
            let outcome =
                sync_document(&vault, &file, &mut state, &anki, &MarkdownRenderer).await?;
            println!("{}", outcome.summary());
        }
        Commands::Extract { file, vault } => {
            let vault = Vault::open(&vault, None)?;
            extract(&vault, &file, &state.settings().marker).await?;
        }
        Commands::Config { marker, deck_root, anki_url } => {
            let changed = marker.is_some() || deck_root.is_some() || anki_url.is_some();
            let settings = state.settings_mut();
            if let Some(marker) = marker {
                settings.set_marker(&marker);
            }
            if let Some(root) = deck_root {
                settings.set_group_root_name(&root);
            }
            if let Some(url) = anki_url {
                settings.set_store_address(&url);
            }
            if changed {
                state.save()?;
            }

            let settings = state.settings();
            println!("marker:    {}", settings.marker);
            println!("deck root: {}", settings.group_root_name);
            println!("anki url:  {}", settings.store_address);
            println!("cards:     {}", state.cache().len());
            println!("state:     {}", state.path().display());
        }
        Commands::Status => {
            let anki = AnkiConnect::new(state.settings().store_address.clone());
            let version = anki.version().await?;
            println!("AnkiConnect {} is reachable (API version {version}).", anki.url());
        }
    }

    Ok(())
}

async fn extract(vault: &Vault, file: &Path, marker: &str) -> Result<(), SyncError> {
    let document_path = vault.document_path(file)?;
    let content = vault.read(&document_path).await?;
    let cards = extract_flashcards(&content, marker);

    if cards.is_empty() {
        println!("No flashcards found.");
        return Ok(());
    }

    for card in &cards {
        let id = card_id(&document_path, &card.front, &card.back);
        let front = card.front.lines().next().unwrap_or_default();
        println!("{:>5}  {:<8} {}", card.line_number, id.as_str(), front);
    }
    Ok(())
}
