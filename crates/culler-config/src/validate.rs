//! Field checks and parsing helpers for settings values.

use std::net::SocketAddr;

use url::Url;

use crate::defaults::LOG_FORMATS;
use crate::error::{ConfigError, ConfigResult};

/// Parse an `http`/`https` URL.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when the value does not parse or uses another scheme.
pub fn parse_http_url(section: &'static str, field: &'static str, raw: &str) -> ConfigResult<Url> {
    let url = Url::parse(raw.trim()).map_err(|_| {
        ConfigError::invalid(section, field, Some(raw.to_string()), "must be a valid URL")
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::invalid(
            section,
            field,
            Some(raw.to_string()),
            "scheme must be http or https",
        ));
    }
    Ok(url)
}

/// Parse a `host:port` socket address.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when the value is not a socket address.
pub fn parse_bind_addr(
    section: &'static str,
    field: &'static str,
    raw: &str,
) -> ConfigResult<SocketAddr> {
    raw.trim().parse::<SocketAddr>().map_err(|_| {
        ConfigError::invalid(
            section,
            field,
            Some(raw.to_string()),
            "must be a socket address such as 127.0.0.1:9464",
        )
    })
}

/// Reject zero.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when `value` is zero.
pub fn ensure_positive(section: &'static str, field: &'static str, value: u64) -> ConfigResult<u64> {
    if value == 0 {
        return Err(ConfigError::invalid(
            section,
            field,
            Some(value.to_string()),
            "must be greater than zero",
        ));
    }
    Ok(value)
}

/// Reject values above `max`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when `value` exceeds `max`.
pub fn ensure_at_most(
    section: &'static str,
    field: &'static str,
    value: u64,
    max: u64,
) -> ConfigResult<u64> {
    if value > max {
        return Err(ConfigError::invalid(
            section,
            field,
            Some(value.to_string()),
            "exceeds the supported maximum",
        ));
    }
    Ok(value)
}

/// Accept only the known log format names.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] for unknown names.
pub fn ensure_log_format(section: &'static str, field: &'static str, raw: &str) -> ConfigResult<()> {
    if LOG_FORMATS.contains(&raw) {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            section,
            field,
            Some(raw.to_string()),
            "must be json or pretty",
        ))
    }
}

/// A password is only meaningful together with a username.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when a password is set without a username.
pub fn ensure_credentials(
    section: &'static str,
    username: Option<&str>,
    password: Option<&str>,
) -> ConfigResult<()> {
    if let Some(username) = username
        && username.trim().is_empty()
    {
        return Err(ConfigError::invalid(
            section,
            "username",
            None,
            "must not be empty",
        ));
    }
    if password.is_some() && username.is_none() {
        return Err(ConfigError::invalid(
            section,
            "password",
            None,
            "requires a username",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(err: ConfigError) -> &'static str {
        match err {
            ConfigError::InvalidField { reason, .. } => reason,
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn http_urls_are_accepted() -> ConfigResult<()> {
        let url = parse_http_url("transmission", "url", "http://nas:9091/transmission/rpc")?;
        assert_eq!(url.host_str(), Some("nas"));
        assert_eq!(url.port(), Some(9091));
        Ok(())
    }

    #[test]
    fn non_http_urls_are_rejected() {
        let err = parse_http_url("transmission", "url", "ftp://nas/rpc").expect_err("ftp");
        assert_eq!(reason(err), "scheme must be http or https");
        let err = parse_http_url("transmission", "url", "not a url").expect_err("garbage");
        assert_eq!(reason(err), "must be a valid URL");
    }

    #[test]
    fn bind_addresses_need_a_port() {
        assert!(parse_bind_addr("metrics", "bind", "0.0.0.0:9464").is_ok());
        assert!(parse_bind_addr("metrics", "bind", "0.0.0.0").is_err());
    }

    #[test]
    fn zero_is_not_positive() {
        assert!(ensure_positive("policy", "cycles", 1).is_ok());
        let err = ensure_positive("policy", "cycles", 0).expect_err("zero");
        assert!(matches!(
            err,
            ConfigError::InvalidField { field: "cycles", ref value, .. } if value.as_deref() == Some("0")
        ));
    }

    #[test]
    fn upper_bound_is_inclusive() {
        assert_eq!(ensure_at_most("schedule", "interval_secs", 60, 60).ok(), Some(60));
        assert!(matches!(
            ensure_at_most("schedule", "interval_secs", 61, 60),
            Err(ConfigError::InvalidField { ref value, .. }) if value.as_deref() == Some("61")
        ));
    }

    #[test]
    fn log_formats_are_closed_set() {
        assert!(ensure_log_format("logging", "format", "json").is_ok());
        assert!(ensure_log_format("logging", "format", "pretty").is_ok());
        assert!(ensure_log_format("logging", "format", "xml").is_err());
    }

    #[test]
    fn password_requires_username() {
        assert!(ensure_credentials("transmission", None, None).is_ok());
        assert!(ensure_credentials("transmission", Some("admin"), Some("pw")).is_ok());
        let err = ensure_credentials("transmission", None, Some("pw")).expect_err("orphan");
        assert_eq!(reason(err), "requires a username");
        let err = ensure_credentials("transmission", Some(" "), None).expect_err("blank");
        assert_eq!(reason(err), "must not be empty");
    }
}
