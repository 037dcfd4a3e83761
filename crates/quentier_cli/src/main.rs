//! Command-line front end for Quentier local storage and favorites.

mod output;
mod session;


use anyhow::{anyhow, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use quentier_core::models::{Entity, Note, Notebook, SavedSearch, Tag};
use quentier_core::Config;
use quentier_model::{Column, SortOrder};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::output::{format_entity, format_expunge, format_favorites, format_storage_status};
use crate::session::{find_any, open_storage, storage_status, FavoritesSession};

#[derive(Parser)]
#[command(name = "quentier", about = "Quentier favorites CLI", version)]
struct Cli {
    /// Database directory (can also be set via QUENTIER_DB_PATH)
    #[arg(long, env = "QUENTIER_DB_PATH")]
    db_path: Option<String>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// List favorited notes, notebooks, tags and saved searches
    Favorites {
        #[arg(long, value_enum, default_value_t = SortKey::Name)]
        sort: SortKey,
        /// Sort descending
        #[arg(long)]
        desc: bool,
    },
    /// Create an entity
    Add {
        #[command(subcommand)]
        what: AddCommand,
    },
    /// Mark an entity as favorited
    Favorite { local_id: String },
    /// Remove an entity from favorites
    Unfavorite { local_id: String },
    /// Rename a favorited entity
    Rename { local_id: String, name: String },
    /// Permanently delete an entity and whatever depends on it
    Expunge { local_id: String },
    /// Show the storage version and pending patches
    CheckStorage {
        /// Apply pending patches
        #[arg(long)]
        apply: bool,
    },
}

#[derive(Subcommand)]
enum AddCommand {
    Notebook {
        name: String,
        #[arg(long)]
        favorite: bool,
    },
    Tag {
        name: String,
        /// Local id of the parent tag
        #[arg(long)]
        parent: Option<String>,
        #[arg(long)]
        favorite: bool,
    },
    Search {
        name: String,
        query: String,
        #[arg(long)]
        favorite: bool,
    },
    Note {
        title: String,
        /// Local id of the notebook holding the note
        #[arg(long)]
        notebook: String,
        /// Local id of a tag; repeat for several
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        favorite: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SortKey {
    Type,
    Name,
    Count,
}

impl SortKey {
    fn column(self) -> Column {
        match self {
            SortKey::Type => Column::Type,
            SortKey::Name => Column::DisplayName,
            SortKey::Count => Column::NoteCount,
        }
    }
}

fn build_entity(what: AddCommand) -> Entity {
    match what {
        AddCommand::Notebook { name, favorite } => {
            let mut notebook = Notebook::new(name);
            notebook.is_favorited = favorite;
            notebook.into()
        }
        AddCommand::Tag {
            name,
            parent,
            favorite,
        } => {
            let mut tag = Tag::with_parent(name, parent);
            tag.is_favorited = favorite;
            tag.into()
        }
        AddCommand::Search {
            name,
            query,
            favorite,
        } => {
            let mut search = SavedSearch::new(name, query);
            search.is_favorited = favorite;
            search.into()
        }
        AddCommand::Note {
            title,
            notebook,
            tags,
            favorite,
        } => {
            let mut note = Note::new(title, notebook);
            note.tag_local_ids = tags;
            note.is_favorited = favorite;
            note.into()
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quentier=warn,quentier_model=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(io::stderr),
        )
        .init();
}

fn main() -> Result<()> {
    let Cli {
        db_path,
        json,
        command,
    } = Cli::parse();

    init_tracing();
    let mut config = Config::from_env();
    if let Some(path) = db_path {
        config = config.with_db_path(path);
    }

    match command {
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
        }
        Commands::CheckStorage { apply } => {
            let db = quentier_core::Database::new(&config.db_path)?;
            let (status, patches) = storage_status(&db)?;
            if apply && !patches.is_empty() {
                let applied = db.apply_pending_patches()?;
                let status = db.check_version()?;
                println!("{}", format_storage_status(&status, &applied, true, json)?);
            } else {
                println!("{}", format_storage_status(&status, &patches, false, json)?);
            }
        }
        Commands::Favorites { sort, desc } => {
            let db = open_storage(&config)?;
            let mut session = FavoritesSession::load(&db, &config)?;
            let order = if desc {
                SortOrder::Descending
            } else {
                SortOrder::Ascending
            };
            session.model_mut().sort(sort.column(), order);
            let output = format_favorites(session.model(), json)?;
            println!("{}", output);
        }
        Commands::Add { what } => {
            let db = open_storage(&config)?;
            let entity = db.create(build_entity(what))?;
            println!("{}", format_entity("Created", &entity, json)?);
        }
        Commands::Favorite { local_id } => {
            let db = open_storage(&config)?;
            let mut entity = find_any(&db, &local_id)?;
            entity.set_favorited(true);
            let stored = db
                .update(entity)?
                .ok_or_else(|| anyhow!("'{}' disappeared during update", local_id))?;
            println!("{}", format_entity("Favorited", &stored, json)?);
        }
        Commands::Unfavorite { local_id } => {
            let db = open_storage(&config)?;
            let mut session = FavoritesSession::load(&db, &config)?;
            session.unfavorite(&local_id)?;
            let entity = find_any(&db, &local_id)?;
            println!("{}", format_entity("Unfavorited", &entity, json)?);
        }
        Commands::Rename { local_id, name } => {
            let db = open_storage(&config)?;
            let mut session = FavoritesSession::load(&db, &config)?;
            session.rename(&local_id, &name)?;
            let entity = find_any(&db, &local_id)?;
            println!("{}", format_entity("Renamed", &entity, json)?);
        }
        Commands::Expunge { local_id } => {
            let db = open_storage(&config)?;
            let kind = find_any(&db, &local_id)?.kind();
            let report = db
                .expunge(kind, &local_id)?
                .ok_or_else(|| anyhow!("'{}' disappeared before expunge", local_id))?;
            println!("{}", format_expunge(&report, json)?);
        }
    }

    Ok(())
}
