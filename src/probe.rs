//! HTTP probe for configured sites.

use std::time::{Duration, Instant};

use chrono::Utc;

use crate::config::Endpoint;
use crate::store::{CheckResult, Status};

/// Fixed per-request timeout.
pub const PROBE_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Build the HTTP client shared by every check in a run.
///
/// Redirects are not followed: 301/302 are observable outcomes that a
/// site may list among its expected codes.
pub fn build_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(PROBE_TIMEOUT)
        .redirect(reqwest::redirect::Policy::none())
        .build()
}

/// Check a single site with one bounded request.
///
/// Never fails and never retries; every outcome classifies into a
/// [`CheckResult`]. A failed check stands until the next scheduled run.
pub async fn check_endpoint(client: &reqwest::Client, site: &Endpoint) -> CheckResult {
    let timestamp = Utc::now();
    let start = Instant::now();

    match client.get(&site.url).send().await {
        Ok(response) => {
            let code = response.status().as_u16();
            let status = if site.accepts(code) { Status::Up } else { Status::Down };
            CheckResult {
                name: site.name.clone(),
                url: site.url.clone(),
                status,
                code,
                response_time: start.elapsed().as_millis() as u64,
                timestamp,
            }
        }
        Err(e) if e.is_timeout() => CheckResult {
            name: site.name.clone(),
            url: site.url.clone(),
            status: Status::Down,
            code: 0,
            // The request was cancelled at the bound, so report the bound
            // itself rather than a measured time.
            response_time: PROBE_TIMEOUT.as_millis() as u64,
            timestamp,
        },
        Err(_) => CheckResult {
            name: site.name.clone(),
            url: site.url.clone(),
            status: Status::Down,
            code: 0,
            response_time: start.elapsed().as_millis() as u64,
            timestamp,
        },
    }
}
