//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! Produces the commented INI written by `sitport init`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let origin = config.upstream.origin.as_deref().unwrap_or("");
    let referer = config.upstream.referer.as_deref().unwrap_or("");

    let endpoints: String = config
        .endpoints
        .iter()
        .map(|endpoint| match endpoint.body() {
            Some(body) => format!("{} = {} {}\n", endpoint.name(), endpoint.method(), body),
            None => format!("{} = {}\n", endpoint.name(), endpoint.method()),
        })
        .collect();

    format!(
        r#"[upstream]
; Base URL of the upstream API; each endpoint is fetched from <base_url>/<name>
base_url = {}
; User-Agent sent with every request
user_agent = {}
; Origin and Referer headers (leave empty to omit)
origin = {}
referer = {}

[http]
; Seconds to wait for a TCP connection
connect_timeout = {}
; Seconds allowed for a request once connected, body included
read_timeout = {}

[retry]
; Attempts per endpoint. 429 and 5xx gateway errors and network failures are
; retried; other 4xx responses and non-JSON bodies fail the run immediately.
max_attempts = {}
; Wait after failed attempt n is backoff_step * n seconds,
; clamped to [backoff_floor, backoff_ceiling]
backoff_step = {}
backoff_floor = {}
backoff_ceiling = {}

[output]
; Snapshot JSON file, replaced only after every endpoint succeeded
path = {}

[logging]
; Log file, cleared at the start of each run
file = {}

[endpoints]
; Fetched in the order listed: name = GET | POST [json-body]
; POST endpoints without a body send {{}}
{}"#,
        config.upstream.base_url,
        config.upstream.user_agent,
        origin,
        referer,
        config.http.connect_timeout,
        config.http.read_timeout,
        config.retry.max_attempts,
        config.retry.backoff_step,
        config.retry.backoff_floor,
        config.retry.backoff_ceiling,
        path_to_string(&config.output.path),
        path_to_string(&config.logging.file),
        endpoints,
    )
}

/// Shorten paths under the home directory to `~/...`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(rest) = path.strip_prefix(&home) {
            return format!("~/{}", rest.display());
        }
    }
    path.display().to_string()
}
