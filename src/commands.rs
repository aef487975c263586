use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use seaweed_store::{SeaweedClient, StorageHandle};
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::config::Config;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Reserve a storage location and print its opaque filename
    Assign {
        #[arg(long)]
        replication: Option<String>,
        #[arg(long)]
        ttl: Option<String>,
    },
    /// Upload a file and print its opaque filename
    Put {
        path: PathBuf,
        #[arg(long)]
        replication: Option<String>,
        #[arg(long)]
        ttl: Option<String>,
        #[arg(long, help = "Extension appended to the filename, defaults to the file's own")]
        extension: Option<String>,
    },
    /// Download the content behind an opaque filename
    Get {
        filename: String,
        #[arg(short, long, help = "Write to this path instead of stdout")]
        output: Option<PathBuf>,
    },
    /// Delete the content behind an opaque filename
    Delete { filename: String },
}

pub async fn run(client: &SeaweedClient, config: &Config, command: Command) -> Result<()> {
    match command {
        Command::Assign { replication, ttl } => {
            let replication = replication.or_else(|| config.replication.clone());
            let ttl = ttl.or_else(|| config.ttl.clone());
            let handle = client
                .assign(replication.as_deref(), ttl.as_deref())
                .await?;
            print_handle(&handle, &handle.opaque_filename());
        }
        Command::Put {
            path,
            replication,
            ttl,
            extension,
        } => {
            let replication = replication.or_else(|| config.replication.clone());
            let ttl = ttl.or_else(|| config.ttl.clone());
            let file = tokio::fs::File::open(&path)
                .await
                .with_context(|| format!("unable to open {}", path.display()))?;

            let handle = client
                .assign(replication.as_deref(), ttl.as_deref())
                .await?;
            client.upload(&handle, file, ttl.as_deref()).await?;

            let extension = extension.or_else(|| extension_of(&path));
            let filename = match extension {
                Some(ext) => handle.opaque_filename_with_extension(&ext),
                None => handle.opaque_filename(),
            };
            info!(path = %path.display(), filename = %filename, "uploaded file");
            print_handle(&handle, &filename);
        }
        Command::Get { filename, output } => match output {
            Some(path) => fetch_to_path(client, &filename, &path).await?,
            None => {
                let mut stdout = tokio::io::stdout();
                client.fetch(&filename, &mut stdout).await?;
                stdout.flush().await?;
            }
        },
        Command::Delete { filename } => {
            client.delete(&filename).await?;
            info!(filename = %filename, "deleted file");
        }
    }
    Ok(())
}

/// Fetch into `path`, removing the partial file if anything goes wrong.
async fn fetch_to_path(client: &SeaweedClient, filename: &str, path: &Path) -> Result<()> {
    let mut file = tokio::fs::File::create(path)
        .await
        .with_context(|| format!("unable to create {}", path.display()))?;
    let result = async {
        client.fetch(filename, &mut file).await?;
        file.sync_all().await?;
        anyhow::Ok(())
    }
    .await;
    if result.is_err() {
        drop(file);
        if let Err(e) = tokio::fs::remove_file(path).await {
            warn!(path = %path.display(), error = %e, "unable to remove partial download");
        }
    }
    result
}

fn print_handle(handle: &StorageHandle, filename: &str) {
    println!("{}\t{}", filename, handle.url());
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_string())
}
