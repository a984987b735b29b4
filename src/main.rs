use crate::{
    manager::{commands, prompt},
    types::addon::ManifestEdit,
    utils::version::{get_version, get_version_with_signature},
};
use clap::CommandFactory;
use clap::FromArgMatches;
use clap::{Parser, Subcommand};
use tokio::io;

mod collection;
mod manager;
mod remote;
mod sync;
mod types;
mod utils;

#[derive(Parser)]
#[command(name = "addon-manager")]
#[command(about = "Reorder, rename and prune your Stremio addon collection")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show your addon collection in activation order
    List {
        /// Also show ids, transport URLs and catalogs
        #[arg(short, long, default_value_t = false)]
        details: bool,
    },

    /// Move the addon at <from> so it ends up at <to> (0-based)
    Move {
        from: usize,
        to: usize,
        #[arg(long, default_value_t = false)]
        /// Apply locally and print the result without syncing
        dry_run: bool,
    },

    /// Remove the addon at <index>
    Remove {
        index: usize,
        #[arg(long, default_value_t = false)]
        /// Remove the addon even if Stremio marks it as protected
        force: bool,
        #[arg(long, default_value_t = false)]
        /// Apply locally and print the result without syncing
        dry_run: bool,
    },

    /// Edit the manifest of the addon at <index>. Prompts for each field when none is given.
    Edit {
        index: usize,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        logo: Option<String>,
        #[arg(long)]
        background: Option<String>,
        #[arg(long, default_value_t = false)]
        /// Apply locally and print the result without syncing
        dry_run: bool,
    },

    /// Rename catalog <catalog> of the addon at <index>
    RenameCatalog {
        index: usize,
        catalog: usize,
        name: String,
        #[arg(long, default_value_t = false)]
        /// Apply locally and print the result without syncing
        dry_run: bool,
    },

    /// Interactive session: move, edit and remove addons, then sync
    Manage {},

    /// Save your Stremio auth key
    Login { auth_key: String },

    /// Forget the saved auth key
    Logout {},
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let version_static: &'static str = Box::leak(format!("v{}", get_version()).into_boxed_str());
    let signature_static: &'static str = Box::leak(get_version_with_signature().into_boxed_str());

    let mut cmd = Cli::command();
    cmd = cmd.version(version_static).before_help(signature_static);

    let raw_args: Vec<String> = std::env::args().collect();
    if raw_args.iter().any(|a| a == "--version" || a == "-V") {
        println!("{}", signature_static);
        return Ok(());
    }

    let matches = cmd.get_matches();
    let cli = Cli::from_arg_matches(&matches).map_err(|e| io::Error::other(e.to_string()))?;

    let result = match cli.command {
        Commands::List { details } => commands::list_addons(details).await,

        Commands::Move { from, to, dry_run } => commands::move_addon(from, to, dry_run).await,

        Commands::Remove {
            index,
            force,
            dry_run,
        } => commands::remove_addon(index, force, dry_run).await,

        Commands::Edit {
            index,
            name,
            description,
            logo,
            background,
            dry_run,
        } => {
            let fields = ManifestEdit {
                name,
                description,
                logo,
                background,
            };
            commands::edit_addon(index, fields, dry_run).await
        }

        Commands::RenameCatalog {
            index,
            catalog,
            name,
            dry_run,
        } => commands::rename_catalog(index, catalog, name, dry_run).await,

        Commands::Manage {} => prompt::prompt_manage_addons().await,

        Commands::Login { auth_key } => commands::login(&auth_key),

        Commands::Logout {} => commands::logout(),
    };

    result.map_err(io::Error::other)
}
