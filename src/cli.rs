use std::path::PathBuf;

use clap::{
    Parser,
    Subcommand,
};

#[derive(Parser)]
#[command(name = "vaultcards")]
#[command(about = "Sync flashcards embedded in markdown notes to Anki")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// State file holding settings and synced card ids
    #[arg(long, global = true, env = "VAULTCARDS_STATE")]
    pub state: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sync the flashcards of one note to Anki
    Sync {
        /// Markdown note to sync
        file: PathBuf,

        /// Vault root the note belongs to
        #[arg(long, default_value = ".")]
        vault: PathBuf,

        /// Vault name used in "Open in Obsidian" links (defaults to the vault directory name)
        #[arg(long)]
        vault_name: Option<String>,
    },

    /// List the flashcards found in a note without touching Anki
    Extract {
        file: PathBuf,

        #[arg(long, default_value = ".")]
        vault: PathBuf,
    },

    /// Show or change settings
    Config {
        /// Marker inside the delimiters, e.g. ANKI for <!--ANKI-START-->
        #[arg(long)]
        marker: Option<String>,

        /// Top-level deck that mirrors the vault folders
        #[arg(long)]
        deck_root: Option<String>,

        /// AnkiConnect address
        #[arg(long)]
        anki_url: Option<String>,
    },

    /// Check that AnkiConnect is reachable
    Status,
}
