use reqwest::{RequestBuilder, Response, StatusCode};
use tracing::{debug, warn};
use url::Url;

use crate::{SeaweedError, SeaweedResult};

/// How a 404 from the cluster is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NotFound {
    /// Content is absent; reported as `NotFound` and logged at debug.
    Expected,
    /// The endpoint never 404s in normal operation; reported as a request
    /// fault like any other unexpected status.
    Fault,
}

/// `http://{addr}/{fid}` on a volume server.
pub(crate) fn volume_url(addr: &str, fid: &str) -> SeaweedResult<Url> {
    Ok(Url::parse(&format!("http://{}/{}", addr, fid))?)
}

/// Send a request and check that the response carries `expected`.
///
/// On any other status the body is read for the log record and the response
/// is dropped, so the connection goes back to the pool before returning.
pub(crate) async fn send(
    req: RequestBuilder,
    url: &Url,
    expected: StatusCode,
    not_found: NotFound,
) -> SeaweedResult<Response> {
    let resp = req.send().await.map_err(|e| {
        warn!(url = %url, error = %e, "error making seaweed http request");
        SeaweedError::from(e)
    })?;

    let status = resp.status();
    if status == expected {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    if status == StatusCode::NOT_FOUND && not_found == NotFound::Expected {
        debug!(url = %url, status = %status, body = %body, "seaweed content not found");
        return Err(SeaweedError::not_found(url.to_string()));
    }
    warn!(url = %url, status = %status, body = %body, "invalid seaweed status");
    Err(SeaweedError::unexpected_status(status))
}

/// Read whatever is left of a successful response we have no use for.
pub(crate) async fn drain(resp: Response) {
    let _ = resp.bytes().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_url() {
        let url = volume_url("127.0.0.1:8080", "3,01637037d6").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/3,01637037d6");
    }

    #[test]
    fn test_volume_url_bad_addr() {
        assert!(volume_url("[::1", "3,abc").is_err());
    }
}
