use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use distributed_storage::config::Settings;
use distributed_storage::StorageManager;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "storage-cli")]
#[command(about = "Chunk files across storage backends and rebuild them", long_about = None)]
pub struct Cli {
    /// JSON settings file; built-in defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Chunk a file and distribute it across the configured backends
    Store {
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Rebuild a stored file and verify its checksum
    Restore {
        #[arg(short = 'i', long = "file-id")]
        file_id: Uuid,

        #[arg(short, long)]
        output: PathBuf,
    },

    /// List stored files
    List,

    /// Delete a file record and its chunk records
    Delete {
        #[arg(short = 'i', long = "file-id")]
        file_id: Uuid,
    },
}

async fn execute_command(storage: &StorageManager, command: Commands) -> Result<()> {
    match command {
        Commands::Store { file } => {
            let record = storage
                .upload_file(&file)
                .await
                .with_context(|| format!("failed to store {}", file.display()))?;
            println!("{}", record.id);
            for chunk in &record.chunks {
                println!(
                    "  #{} {} ({} bytes) -> {}",
                    chunk.order, chunk.chunk_id, chunk.size, chunk.storage_provider_name
                );
            }
        }
        Commands::Restore { file_id, output } => {
            storage
                .reconstruct(&file_id, &output)
                .await
                .with_context(|| format!("failed to restore file {}", file_id))?;
            println!("File restored to {}", output.display());
        }
        Commands::List => {
            for file in storage.list_files().await? {
                println!(
                    "{}: {} ({} bytes, {} chunks)",
                    file.id,
                    file.file_name,
                    file.file_size,
                    file.chunks.len()
                );
            }
        }
        Commands::Delete { file_id } => {
            storage
                .delete_file(&file_id)
                .await
                .with_context(|| format!("failed to delete file {}", file_id))?;
            println!("Deleted {}", file_id);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = match &cli.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };

    let storage = StorageManager::from_settings(&settings).await?;
    execute_command(&storage, cli.command).await
}
