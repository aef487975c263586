//! Uploads, downloads and deletes against seaweed volume servers.

use std::{future::Future, sync::Arc};

use bytes::Bytes;
use opentelemetry::metrics::Meter;
use reqwest::{
    header::HeaderMap,
    multipart::{Form, Part},
    StatusCode,
};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, warn};
use url::Url;

use crate::{
    codec,
    http::{self, volume_url, NotFound},
    AddressResolver,
    Directory,
    DnsResolver,
    PassthroughResolver,
    ReplicaPicker,
    SeaweedConfig,
    SeaweedError,
    SeaweedResult,
    StorageHandle,
    Timer,
    TransferMetrics,
};

/// Multipart field the volume server reads the upload from.
const UPLOAD_FIELD: &str = "file";

/// Client for a seaweed cluster.
///
/// Holds no per-request state; one instance can be shared across tasks.
pub struct SeaweedClient {
    http: reqwest::Client,
    directory: Directory,
    metrics: Option<TransferMetrics>,
}

impl SeaweedClient {
    /// Build a client with a default HTTP client and an OS-seeded replica
    /// picker.
    pub fn new(config: SeaweedConfig) -> SeaweedResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| SeaweedError::config(format!("unable to build http client: {}", e)))?;
        let resolver: Arc<dyn AddressResolver> = if config.resolve_dns {
            Arc::new(DnsResolver)
        } else {
            Arc::new(PassthroughResolver)
        };
        Self::with_parts(config, http, resolver, ReplicaPicker::new())
    }

    /// Build a client from caller-supplied capabilities.
    pub fn with_parts(
        config: SeaweedConfig,
        http: reqwest::Client,
        resolver: Arc<dyn AddressResolver>,
        picker: ReplicaPicker,
    ) -> SeaweedResult<Self> {
        config.validate()?;
        let directory = Directory::new(http.clone(), &config.master_addr, resolver, picker);
        Ok(Self {
            http,
            directory,
            metrics: None,
        })
    }

    pub fn with_meter(mut self, meter: &Meter) -> Self {
        self.metrics = Some(TransferMetrics::new(meter));
        self
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    async fn instrument<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = SeaweedResult<T>>,
    ) -> SeaweedResult<T> {
        let _timer = self.metrics.as_ref().map(|m| Timer::start(m, operation));
        let result = fut.await;
        if let (Err(_), Some(metrics)) = (&result, &self.metrics) {
            metrics.record_error(operation);
        }
        result
    }

    /// Get a new storage location from the master.
    pub async fn assign(
        &self,
        replication: Option<&str>,
        ttl: Option<&str>,
    ) -> SeaweedResult<StorageHandle> {
        self.instrument("assign", self.directory.assign(replication, ttl)).await
    }

    /// Upload `body` to the location described by `handle`.
    ///
    /// The body is read to the end before the request goes out. A failed
    /// upload is not cleaned up; retrying or deleting is up to the caller.
    pub async fn upload<R>(
        &self,
        handle: &StorageHandle,
        mut body: R,
        ttl: Option<&str>,
    ) -> SeaweedResult<()>
    where
        R: AsyncRead + Unpin + Send,
    {
        self.instrument("upload", async move {
            let mut url = volume_url(handle.url(), handle.fid()).inspect_err(|_| {
                error!(url = handle.url(), fid = handle.fid(), "error building seaweed url");
            })?;
            if let Some(ttl) = ttl.filter(|t| !t.is_empty()) {
                url.query_pairs_mut().append_pair("ttl", ttl);
            }
            debug!(url = %url, "making seaweed PUT request");

            let filename = handle.opaque_filename();
            let mut data = Vec::new();
            body.read_to_end(&mut data).await.map_err(|e| {
                error!(url = %url, error = %e, "error copying body to multipart");
                SeaweedError::transport("error reading upload body", e)
            })?;

            // The volume server only accepts uploads as a multipart file field.
            let part = Part::bytes(data)
                .file_name(filename.clone())
                .mime_str("application/octet-stream")
                .map_err(|e| {
                    error!(
                        url = %url,
                        filename = %filename,
                        error = %e,
                        "error creating multipart file"
                    );
                    SeaweedError::from(e)
                })?;
            let form = Form::new().part(UPLOAD_FIELD, part);

            let resp = http::send(
                self.http.put(url.clone()).multipart(form),
                &url,
                StatusCode::CREATED,
                NotFound::Fault,
            )
            .await?;
            http::drain(resp).await;
            Ok(())
        })
        .await
    }

    async fn locate(&self, filename: &str) -> SeaweedResult<Url> {
        let fid = codec::decode_fid(filename).inspect_err(|e| {
            error!(filename = filename, error = %e, "error decoding filename in lookup");
        })?;
        let replica = self.directory.locate(&fid).await?;
        volume_url(&replica, &fid).inspect_err(|e| {
            error!(addr = %replica, fid = %fid, error = %e, "error building seaweed url");
        })
    }

    /// Stream the content behind `filename` into `sink` and return the
    /// response headers.
    pub async fn fetch<W>(&self, filename: &str, sink: &mut W) -> SeaweedResult<HeaderMap>
    where
        W: AsyncWrite + Unpin + Send,
    {
        self.instrument("fetch", async {
            let url = self.locate(filename).await?;
            debug!(url = %url, filename = filename, "making seaweed GET request");

            let mut resp = http::send(
                self.http.get(url.clone()),
                &url,
                StatusCode::OK,
                NotFound::Expected,
            )
            .await?;
            let headers = resp.headers().clone();

            while let Some(chunk) = resp.chunk().await.map_err(|e| {
                warn!(url = %url, error = %e, "error reading seaweed response body");
                SeaweedError::from(e)
            })? {
                sink.write_all(&chunk).await.map_err(|e| {
                    error!(url = %url, error = %e, "error copying body to writer");
                    SeaweedError::transport("error writing fetched content", e)
                })?;
            }
            sink.flush().await.map_err(|e| {
                error!(url = %url, error = %e, "error flushing writer");
                SeaweedError::transport("error writing fetched content", e)
            })?;
            Ok(headers)
        })
        .await
    }

    /// Fetch the whole content behind `filename` into memory.
    pub async fn fetch_bytes(&self, filename: &str) -> SeaweedResult<(HeaderMap, Bytes)> {
        let mut buf = Vec::new();
        let headers = self.fetch(filename, &mut buf).await?;
        Ok((headers, Bytes::from(buf)))
    }

    /// Delete the content behind `filename`.
    pub async fn delete(&self, filename: &str) -> SeaweedResult<()> {
        self.instrument("delete", async {
            let url = self.locate(filename).await?;
            debug!(url = %url, filename = filename, "making seaweed DELETE request");

            let resp = http::send(
                self.http.delete(url.clone()),
                &url,
                StatusCode::ACCEPTED,
                NotFound::Expected,
            )
            .await?;
            http::drain(resp).await;
            Ok(())
        })
        .await
    }
}
