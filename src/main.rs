// PasteVault - Point d'entree
// Outil en ligne de commande d'inspection des profils d'historique
//
// Ce binaire ouvre un profil d'historique (par defaut celui de la
// configuration) et execute une operation du moteur : lister, afficher,
// rechercher, ajouter, supprimer, selectionner, vider ou supprimer un
// profil. Chaque mutation est sauvegardee immediatement par le moteur.
//
// # Configuration
// Le fichier config.toml du repertoire de configuration utilisateur est lu
// s'il existe ; `--config` et `--data-dir` permettent de le remplacer.
//
// # Journalisation
// `RUST_LOG=debug pastevault show` affiche le detail des operations.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pastevault::config::settings::{default_config_path, Settings};
use pastevault::{History, HistoryEvent, Item};
use std::path::PathBuf;

/// PasteVault - clipboard history profiles
#[derive(Parser)]
#[command(name = "pastevault", version, about = "Inspect and edit clipboard history profiles")]
struct Args {
    /// Configuration file (default: user config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the history profiles
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Profile to open instead of the configured one
    #[arg(long, short)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List available profiles
    List,
    /// Print the items of the profile
    Show {
        /// Print raw values instead of display strings
        #[arg(long)]
        raw: bool,
    },
    /// Search items by regular expression (or position)
    Search { pattern: String },
    /// Add a text item (or a newline separated URI list with --uris)
    Add {
        value: String,
        #[arg(long)]
        uris: bool,
    },
    /// Remove the item at a position
    Remove { position: usize },
    /// Make the item at a position the active one
    Select { position: usize },
    /// Remove every item of the profile
    Empty,
    /// Delete a profile (default: the opened one)
    Delete { name: Option<String> },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let mut settings = Settings::load(&config_path);
    if let Some(dir) = args.data_dir {
        settings.data_dir = dir;
    }
    log::debug!("config {}, profiles in {}", config_path.display(), settings.data_dir.display());

    let mut history = History::new(settings);
    history.subscribe(|event| {
        if let HistoryEvent::Selected(item) = event {
            log::info!("active: {}", item.display_string());
        }
    });

    history
        .load(args.profile.as_deref())
        .context("could not load history profile")?;

    match args.command {
        Command::List => {
            let current = history.current_name().unwrap_or_default().to_string();
            for name in history.list()? {
                let marker = if name == current { '*' } else { ' ' };
                println!("{} {}", marker, name);
            }
        }
        Command::Show { raw } => {
            for (pos, item) in history.items().iter().enumerate() {
                print_item(pos, item, raw);
            }
        }
        Command::Search { pattern } => {
            let found = history
                .search(&pattern)
                .with_context(|| format!("invalid pattern '{}'", pattern))?;
            for pos in found {
                if let Some(item) = history.get(pos) {
                    print_item(pos, item, false);
                }
            }
        }
        Command::Add { value, uris } => {
            let item = if uris { Item::uris(value) } else { Item::text(value) };
            history.add(item)?;
        }
        Command::Remove { position } => history.remove(position)?,
        Command::Select { position } => history.select(position)?,
        Command::Empty => history.empty(),
        Command::Delete { name } => history.delete(name.as_deref())?,
    }

    Ok(())
}

fn print_item(pos: usize, item: &Item, raw: bool) {
    if raw {
        println!("{:>4} [{}] {}", pos, item.kind(), item.value());
        return;
    }
    let text = item.display_string();
    let first_line = text.lines().next().unwrap_or_default();
    let more = if text.lines().nth(1).is_some() { " ..." } else { "" };
    println!("{:>4} [{}] {}{}", pos, item.kind(), first_line, more);
}
