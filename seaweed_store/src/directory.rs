//! Conversations with the seaweed master: assigning new file ids and looking
//! up which volume servers hold a volume.

use std::sync::Arc;

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, error, warn};
use url::Url;

use crate::{
    handle::AssignResponse,
    http::{self, NotFound},
    AddressResolver,
    ReplicaPicker,
    SeaweedError,
    SeaweedResult,
    StorageHandle,
};

/// One volume server holding a replica of a volume.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Location {
    pub url: String,
    #[serde(default, rename = "publicUrl")]
    pub public_url: Option<String>,
}

/// The master's answer to "where is volume V". Never empty; an empty answer
/// is reported as not found.
#[derive(Debug, Clone, Deserialize)]
pub struct LookupResult {
    #[serde(default)]
    pub locations: Vec<Location>,
}

pub struct Directory {
    http: reqwest::Client,
    master_addr: String,
    resolver: Arc<dyn AddressResolver>,
    picker: ReplicaPicker,
}

impl Directory {
    pub fn new(
        http: reqwest::Client,
        master_addr: &str,
        resolver: Arc<dyn AddressResolver>,
        picker: ReplicaPicker,
    ) -> Self {
        Self {
            http,
            master_addr: master_addr.to_string(),
            resolver,
            picker,
        }
    }

    async fn master_url(&self, path: &str) -> SeaweedResult<Url> {
        let addr = self.resolver.resolve(&self.master_addr).await?;
        Url::parse(&format!("http://{}{}", addr, path)).map_err(|e| {
            error!(addr = %addr, error = %e, "error building seaweed url");
            SeaweedError::from(e)
        })
    }

    /// Ask the master for a fresh file id. Empty `replication` or `ttl` are
    /// left off the request so the cluster defaults apply.
    pub async fn assign(
        &self,
        replication: Option<&str>,
        ttl: Option<&str>,
    ) -> SeaweedResult<StorageHandle> {
        let mut url = self.master_url("/dir/assign").await?;
        set_assign_params(&mut url, replication, ttl);
        debug!(url = %url, "making seaweed GET request");

        let resp = http::send(self.http.get(url.clone()), &url, StatusCode::OK, NotFound::Fault)
            .await?;
        let body = resp.bytes().await.map_err(|e| {
            warn!(url = %url, error = %e, "error reading assign response from seaweed");
            SeaweedError::from(e)
        })?;

        let assigned: AssignResponse = serde_json::from_slice(&body).map_err(|e| {
            error!(url = %url, error = %e, "error decoding assign response from seaweed");
            SeaweedError::decode("malformed assign response", e)
        })?;
        if let Some(reason) = assigned.error.as_deref().filter(|e| !e.is_empty()) {
            warn!(url = %url, error = reason, "seaweed refused assignment");
            return Err(SeaweedError::Request {
                reason: format!("seaweed refused assignment: {}", reason),
                status: Some(StatusCode::OK),
                source: None,
            });
        }
        if assigned.fid.is_empty() || assigned.url.is_empty() {
            error!(url = %url, "assign response from seaweed is missing fid or url");
            return Err(SeaweedError::Decode {
                reason: "assign response is missing fid or url".to_string(),
                source: None,
            });
        }
        Ok(assigned.into())
    }

    /// Look up the volume servers currently serving `volume_id`.
    pub async fn lookup(&self, volume_id: &str) -> SeaweedResult<LookupResult> {
        let mut url = self.master_url("/dir/lookup").await?;
        url.query_pairs_mut().append_pair("volumeId", volume_id);
        debug!(url = %url, "making seaweed GET request");

        let resp = http::send(
            self.http.get(url.clone()),
            &url,
            StatusCode::OK,
            NotFound::Expected,
        )
        .await?;
        let body = resp.bytes().await.map_err(|e| {
            warn!(url = %url, error = %e, "error reading lookup response from seaweed");
            SeaweedError::from(e)
        })?;

        // A lookup answer we can't read is a cluster fault, not bad input.
        let result: LookupResult = serde_json::from_slice(&body).map_err(|e| {
            error!(url = %url, error = %e, "error decoding lookup response from seaweed");
            SeaweedError::transport("malformed lookup response", e)
        })?;
        if result.locations.is_empty() {
            debug!(url = %url, volume_id = volume_id, "seaweed volume has no locations");
            return Err(SeaweedError::not_found(format!("volume {}", volume_id)));
        }
        Ok(result)
    }

    /// Pick one replica address out of a lookup answer.
    pub fn pick_replica<'a>(&self, lookup: &'a LookupResult) -> SeaweedResult<&'a str> {
        self.picker
            .pick(&lookup.locations)
            .map(|l| l.url.as_str())
            .ok_or_else(|| SeaweedError::not_found("no replica locations"))
    }

    /// Resolve a file id to the address of one replica holding it.
    pub async fn locate(&self, fid: &str) -> SeaweedResult<String> {
        let volume_id = crate::codec::volume_id(fid);
        let lookup = self.lookup(volume_id).await?;
        Ok(self.pick_replica(&lookup)?.to_string())
    }
}

fn set_assign_params(url: &mut Url, replication: Option<&str>, ttl: Option<&str>) {
    for (key, value) in [("replication", replication), ("ttl", ttl)] {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            url.query_pairs_mut().append_pair(key, value);
        }
    }
}
