//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use ini::{Ini, ParseOption, Properties};
use serde_json::Value;
use std::path::PathBuf;
use std::str::FromStr;

use super::defaults::MIN_BACKOFF_FLOOR_SECS;
use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::endpoint::{EndpointDescriptor, HttpMethod};

/// Reader options for config.ini.
///
/// Quotes and backslashes are kept verbatim so JSON request bodies survive.
pub(super) fn parse_options() -> ParseOption {
    ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..Default::default()
    }
}

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [upstream] section
    if let Some(section) = ini.section(Some("upstream")) {
        if let Some(v) = non_empty(section, "base_url") {
            if !(v.starts_with("http://") || v.starts_with("https://")) {
                return Err(invalid(
                    "upstream",
                    "base_url",
                    v,
                    "must start with http:// or https://",
                ));
            }
            config.upstream.base_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = non_empty(section, "user_agent") {
            config.upstream.user_agent = v.to_string();
        }
        // An empty value switches the header off.
        if let Some(v) = section.get("origin") {
            config.upstream.origin = optional(v);
        }
        if let Some(v) = section.get("referer") {
            config.upstream.referer = optional(v);
        }
    }

    // [http] section
    if let Some(section) = ini.section(Some("http")) {
        if let Some(v) = section.get("connect_timeout") {
            config.http.connect_timeout = parse_positive(
                "http",
                "connect_timeout",
                v,
                "must be a positive integer (seconds)",
            )?;
        }
        if let Some(v) = section.get("read_timeout") {
            config.http.read_timeout = parse_positive(
                "http",
                "read_timeout",
                v,
                "must be a positive integer (seconds)",
            )?;
        }
    }

    // [retry] section
    if let Some(section) = ini.section(Some("retry")) {
        if let Some(v) = section.get("max_attempts") {
            config.retry.max_attempts =
                parse_positive("retry", "max_attempts", v, "must be a positive integer")?;
        }
        if let Some(v) = section.get("backoff_step") {
            config.retry.backoff_step = parse_number(
                "retry",
                "backoff_step",
                v,
                "must be a non-negative integer (seconds)",
            )?;
        }
        if let Some(v) = section.get("backoff_floor") {
            let floor: u64 = parse_number(
                "retry",
                "backoff_floor",
                v,
                "must be a non-negative integer (seconds)",
            )?;
            if floor < MIN_BACKOFF_FLOOR_SECS {
                return Err(invalid(
                    "retry",
                    "backoff_floor",
                    v,
                    "must be at least 1 second",
                ));
            }
            config.retry.backoff_floor = floor;
        }
        if let Some(v) = section.get("backoff_ceiling") {
            config.retry.backoff_ceiling = parse_positive(
                "retry",
                "backoff_ceiling",
                v,
                "must be a positive integer (seconds)",
            )?;
        }
    }

    // [output] section
    if let Some(section) = ini.section(Some("output")) {
        if let Some(v) = non_empty(section, "path") {
            config.output.path = expand_tilde(v);
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = non_empty(section, "file") {
            config.logging.file = expand_tilde(v);
        }
    }

    // [endpoints] section, in file order. Only a missing section falls back
    // to the built-in set; an empty one is rejected when the run is built.
    if let Some(section) = ini.section(Some("endpoints")) {
        config.endpoints = section
            .iter()
            .map(|(name, value)| parse_endpoint(name, value))
            .collect::<Result<Vec<_>, _>>()?;
    }

    Ok(config)
}

/// Parses an `[endpoints]` entry: `name = METHOD [json-body]`.
fn parse_endpoint(name: &str, value: &str) -> Result<EndpointDescriptor, ConfigFileError> {
    let value = value.trim();
    let (method, body) = value
        .split_once(char::is_whitespace)
        .map(|(m, b)| (m, b.trim()))
        .unwrap_or((value, ""));

    let method = HttpMethod::from_str(method)
        .map_err(|e| invalid("endpoints", name, value, &e.to_string()))?;
    let endpoint = EndpointDescriptor::new(name.trim(), method);

    if body.is_empty() {
        return Ok(endpoint);
    }
    if method == HttpMethod::Get {
        return Err(invalid(
            "endpoints",
            name,
            value,
            "GET endpoints cannot carry a request body",
        ));
    }

    let body: Value = serde_json::from_str(body).map_err(|e| {
        invalid(
            "endpoints",
            name,
            value,
            &format!("request body is not valid JSON: {}", e),
        )
    })?;
    Ok(endpoint.with_body(body))
}

fn non_empty<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section.get(key).map(str::trim).filter(|v| !v.is_empty())
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn parse_number<T: FromStr>(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, reason))
}

fn parse_positive<T: FromStr + Default + PartialOrd>(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    let parsed: T = parse_number(section, key, value, reason)?;
    if parsed <= T::default() {
        return Err(invalid(section, key, value, reason));
    }
    Ok(parsed)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Expand a leading `~` to the user's home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::endpoint::default_endpoints;
    use serde_json::json;

    fn parse(text: &str) -> Result<ConfigFile, ConfigFileError> {
        let ini = Ini::load_from_str_opt(text, parse_options()).unwrap();
        parse_ini(&ini)
    }

    fn assert_invalid(result: Result<ConfigFile, ConfigFileError>, section: &str, key: &str) {
        match result {
            Err(ConfigFileError::InvalidValue {
                section: s, key: k, ..
            }) => {
                assert_eq!(s, section);
                assert_eq!(k, key);
            }
            other => panic!("expected invalid {}.{}, got {:?}", section, key, other),
        }
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(parse("").unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_upstream_overrides() {
        let config = parse(
            "[upstream]\nbase_url = http://localhost:8080/api/\nuser_agent = test-agent\norigin =\n",
        )
        .unwrap();

        assert_eq!(config.upstream.base_url, "http://localhost:8080/api");
        assert_eq!(config.upstream.user_agent, "test-agent");
        assert!(config.upstream.origin.is_none());
        assert!(config.upstream.referer.is_some());
    }

    #[test]
    fn test_base_url_requires_http_scheme() {
        assert_invalid(
            parse("[upstream]\nbase_url = ftp://example.test\n"),
            "upstream",
            "base_url",
        );
    }

    #[test]
    fn test_http_and_retry_values() {
        let config = parse(
            "[http]\nconnect_timeout = 5\nread_timeout = 30\n\n[retry]\nmax_attempts = 3\nbackoff_step = 4\nbackoff_floor = 3\nbackoff_ceiling = 20\n",
        )
        .unwrap();

        assert_eq!(config.http.connect_timeout, 5);
        assert_eq!(config.http.read_timeout, 30);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.backoff_step, 4);
        assert_eq!(config.retry.backoff_floor, 3);
        assert_eq!(config.retry.backoff_ceiling, 20);
    }

    #[test]
    fn test_zero_attempts_rejected() {
        assert_invalid(
            parse("[retry]\nmax_attempts = 0\n"),
            "retry",
            "max_attempts",
        );
    }

    #[test]
    fn test_zero_backoff_floor_rejected() {
        assert_invalid(
            parse("[retry]\nbackoff_floor = 0\n"),
            "retry",
            "backoff_floor",
        );
    }

    #[test]
    fn test_non_numeric_timeout_rejected() {
        assert_invalid(
            parse("[http]\nread_timeout = soon\n"),
            "http",
            "read_timeout",
        );
    }

    #[test]
    fn test_output_and_logging_paths() {
        let config = parse("[output]\npath = /srv/sitport.json\n\n[logging]\nfile = /var/log/sitport.log\n")
            .unwrap();
        assert_eq!(config.output.path, PathBuf::from("/srv/sitport.json"));
        assert_eq!(config.logging.file, PathBuf::from("/var/log/sitport.log"));
    }

    #[test]
    fn test_endpoints_keep_file_order() {
        let config = parse(
            "[endpoints]\nzeta = GET\nalpha = post\nmid = POST {\"zona\": 3}\n",
        )
        .unwrap();

        assert_eq!(
            config.endpoints,
            vec![
                EndpointDescriptor::get("zeta"),
                EndpointDescriptor::post("alpha"),
                EndpointDescriptor::post("mid").with_body(json!({"zona": 3})),
            ]
        );
    }

    #[test]
    fn test_missing_endpoints_section_uses_builtin_set() {
        let config = parse("[upstream]\nuser_agent = x\n").unwrap();
        assert_eq!(config.endpoints, default_endpoints());
    }

    #[test]
    fn test_empty_endpoints_section_rejected_at_run_config() {
        let config = parse("[endpoints]\n; alpha = GET\n").unwrap();

        assert!(config.endpoints.is_empty());
        assert_eq!(config.to_snapshot_config(), Err(ConfigError::NoEndpoints));
    }

    #[test]
    fn test_repeated_endpoint_key_rejected_at_run_config() {
        let config = parse("[endpoints]\nalpha = GET\nalpha = POST\n").unwrap();

        assert_eq!(
            config.to_snapshot_config(),
            Err(ConfigError::DuplicateEndpoint("alpha".to_string()))
        );
    }

    #[test]
    fn test_unknown_method_rejected() {
        assert_invalid(parse("[endpoints]\nalpha = DELETE\n"), "endpoints", "alpha");
    }

    #[test]
    fn test_get_with_body_rejected() {
        assert_invalid(
            parse("[endpoints]\nalpha = GET {\"a\": 1}\n"),
            "endpoints",
            "alpha",
        );
    }

    #[test]
    fn test_invalid_body_json_rejected() {
        assert_invalid(
            parse("[endpoints]\nalpha = POST {not json}\n"),
            "endpoints",
            "alpha",
        );
    }

    #[test]
    fn test_expand_tilde() {
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
        assert_eq!(expand_tilde("relative"), PathBuf::from("relative"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/data/x.json"), home.join("data/x.json"));
        }
    }
}
