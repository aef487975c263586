//! Client for seaweed blob storage clusters.
//!
//! Content is written in two steps: the master assigns a file id and a volume
//! server, then the bytes are uploaded to that volume server. The file id is
//! never exposed; callers get an opaque, URL-safe filename instead, which is
//! what they persist or embed in signed URLs. Reads and deletes decode that
//! filename, ask the master which volume servers hold the volume, and talk to
//! one of them picked at random.
//!
//! # Usage
//!
//! ```rust,no_run
//! use seaweed_store::{SeaweedClient, SeaweedConfig};
//!
//! # async fn example() -> Result<(), seaweed_store::SeaweedError> {
//! let client = SeaweedClient::new(SeaweedConfig::new("seaweed-master:9333"))?;
//!
//! let handle = client.assign(Some("001"), None).await?;
//! client.upload(&handle, &b"hello"[..], None).await?;
//! let filename = handle.opaque_filename_with_extension("txt");
//!
//! let (_headers, body) = client.fetch_bytes(&filename).await?;
//! assert_eq!(&body[..], b"hello");
//!
//! client.delete(&filename).await?;
//! # Ok(())
//! # }
//! ```

mod client;
pub mod codec;
mod config;
mod directory;
mod error;
mod handle;
mod http;
mod metrics;
mod picker;
mod resolver;

pub use client::SeaweedClient;
pub use config::SeaweedConfig;
pub use directory::{Directory, Location, LookupResult};
pub use error::{ErrorKind, SeaweedError, SeaweedResult};
pub use handle::StorageHandle;
pub use metrics::{Timer, TransferMetrics};
pub use picker::ReplicaPicker;
pub use resolver::{AddressResolver, DnsResolver, PassthroughResolver};
