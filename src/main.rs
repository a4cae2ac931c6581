//! Aniyomi index CLI
//!
//! Entry point for the `aniyomi-index` command-line tool.

use aniyomi_index::badging::{language_tag, parse_badging, BadgingDumper};
use aniyomi_index::config::{ConfigError, RepoConfig, DEFAULT_CONFIG_FILE};
use aniyomi_index::index::IndexEntry;
use aniyomi_index::{pipeline, source_id};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "aniyomi-index")]
#[command(about = "Extension repository index generator for Aniyomi", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build index.json and index.min.json for a repository of extension APKs
    Build {
        /// Path to repo config file (default: aniyomi-index.toml when present)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Repository root override
        #[arg(long)]
        repo: Option<PathBuf>,

        /// Android SDK root override (default: $ANDROID_HOME)
        #[arg(long)]
        sdk_root: Option<PathBuf>,
    },

    /// Print the index entry a single APK would produce, without writing anything
    Inspect {
        /// Android SDK root override (default: $ANDROID_HOME)
        #[arg(long)]
        sdk_root: Option<PathBuf>,

        /// The APK to inspect
        apk: PathBuf,
    },

    /// Derive the identifier for a (source name, versionId) pair
    Id {
        /// Source name as it appears in the extension's names list
        name: String,

        /// The extension's versionId
        version_id: u32,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            config,
            repo,
            sdk_root,
        } => {
            run_build(config, repo, sdk_root);
        }
        Commands::Inspect { sdk_root, apk } => {
            run_inspect(sdk_root, apk);
        }
        Commands::Id { name, version_id } => {
            println!("{}", source_id::derive(&name, version_id));
        }
    }
}

fn run_build(config_path: Option<PathBuf>, repo: Option<PathBuf>, sdk_root: Option<PathBuf>) {
    let mut config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            process::exit(1);
        }
    };
    if let Some(repo) = repo {
        config.repo_dir = Some(repo);
    }
    if let Some(root) = sdk_root {
        config.sdk_root = Some(root);
    }

    let result = pipeline::resolve_dumper(&config)
        .and_then(|dumper| pipeline::run(&config, &dumper));

    match result {
        Ok(report) => {
            println!(
                "Indexed {} extensions ({} sources)",
                report.packages, report.sources
            );
            println!("  {}", report.index_path.display());
            println!("  {}", report.index_min_path.display());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    }
}

fn load_config(config_path: Option<PathBuf>) -> Result<RepoConfig, ConfigError> {
    match config_path {
        Some(path) => RepoConfig::from_file(&path),
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.exists() {
                RepoConfig::from_file(default)
            } else {
                Ok(RepoConfig::default())
            }
        }
    }
}

fn run_inspect(sdk_root: Option<PathBuf>, apk: PathBuf) {
    let Some(file_name) = apk.file_name().map(|n| n.to_string_lossy().into_owned()) else {
        eprintln!("Error: not an APK path: {}", apk.display());
        process::exit(1);
    };

    let config = RepoConfig {
        sdk_root,
        ..RepoConfig::default()
    };
    let dumper = match pipeline::resolve_dumper(&config) {
        Ok(dumper) => dumper,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    };

    let text = match dumper.dump(&apk) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: {}: {}", file_name, e);
            process::exit(3);
        }
    };
    let badging = match parse_badging(&text) {
        Ok(badging) => badging,
        Err(e) => {
            eprintln!("Error: {}: {}", file_name, e);
            process::exit(3);
        }
    };
    let lang = match language_tag(&file_name) {
        Ok(lang) => lang,
        Err(e) => {
            eprintln!("Error: {}: {}", file_name, e);
            process::exit(3);
        }
    };

    let entry = IndexEntry::new(&badging, &file_name, &lang);
    match serde_json::to_string_pretty(&entry) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}
