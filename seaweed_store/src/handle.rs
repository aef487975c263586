use serde::Deserialize;

use crate::{codec, SeaweedResult};

/// A storage location on a seaweed volume server.
///
/// Built either by an assign call against the master or by decoding an opaque
/// filename that was issued earlier. The raw file id never leaves this type;
/// callers only see [`StorageHandle::opaque_filename`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageHandle {
    fid: String,
    url: String,
}

impl StorageHandle {
    pub(crate) fn new(fid: String, url: String) -> Self {
        Self { fid, url }
    }

    /// Rebuild a handle from a volume address and an opaque filename, e.g. when
    /// both were recovered from a signed URL.
    pub fn from_parts(url: &str, filename: &str) -> SeaweedResult<Self> {
        let fid = codec::decode_fid(filename)?;
        Ok(Self::new(fid, url.to_string()))
    }

    pub fn opaque_filename(&self) -> String {
        codec::encode(self.fid.as_bytes())
    }

    pub fn opaque_filename_with_extension(&self, ext: &str) -> String {
        let ext = ext.trim_start_matches('.');
        if ext.is_empty() {
            return self.opaque_filename();
        }
        format!("{}.{}", self.opaque_filename(), ext)
    }

    /// `host:port` of the volume server that handed out this location. Only
    /// meaningful right after assignment; reads and deletes look the volume up
    /// again.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub(crate) fn fid(&self) -> &str {
        &self.fid
    }
}

/// Body of `/dir/assign`. The master answers 200 with only `error` set when
/// it has no writable volume.
#[derive(Debug, Deserialize)]
pub(crate) struct AssignResponse {
    #[serde(default)]
    pub fid: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub error: Option<String>,
}

impl From<AssignResponse> for StorageHandle {
    fn from(resp: AssignResponse) -> Self {
        StorageHandle::new(resp.fid, resp.url)
    }
}
