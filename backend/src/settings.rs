//! Service configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `NAMESAKE_*` environment variables and
//! configuration files, in OrthoConfig's usual precedence. [`AppSettings`]
//! holds the raw values; the accessor methods validate them into the typed
//! values the binary wires together.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::outbound::predictors::PredictorEndpoint;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Validation failures for [`AppSettings`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("missing required setting {key}")]
    Missing { key: &'static str },
    #[error("{key} is not a valid http(s) URL ({value}): {message}")]
    InvalidUrl {
        key: &'static str,
        value: String,
        message: String,
    },
    #[error("NAMESAKE_BIND_ADDR is not a socket address ({value}): {message}")]
    InvalidBindAddr { value: String, message: String },
}

/// Raw service settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "NAMESAKE")]
pub struct AppSettings {
    /// Address the HTTP server binds to. Defaults to `0.0.0.0:8080`.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without it users live in process memory.
    pub database_url: Option<String>,
    /// Bearer token sent to every prediction service.
    pub api_token: Option<String>,
    /// Base URL of the age prediction service.
    pub agify_url: Option<String>,
    /// Base URL of the gender prediction service.
    pub genderize_url: Option<String>,
    /// Base URL of the nationality prediction service.
    pub nationalize_url: Option<String>,
    /// Timeout applied to each prediction HTTP call.
    #[ortho_config(default = 10_000)]
    pub predictor_timeout_ms: u64,
    /// Deadline for the whole enrichment of one user.
    #[ortho_config(default = 10_000)]
    pub enrichment_timeout_ms: u64,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
}

/// Validated endpoints of the three prediction services.
#[derive(Debug, Clone)]
pub struct PredictorEndpoints {
    pub age: PredictorEndpoint,
    pub gender: PredictorEndpoint,
    pub nationality: PredictorEndpoint,
}

fn required<'a>(value: Option<&'a str>, key: &'static str) -> Result<&'a str, SettingsError> {
    value
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .ok_or(SettingsError::Missing { key })
}

fn parse_service_url(value: Option<&str>, key: &'static str) -> Result<Url, SettingsError> {
    let raw = required(value, key)?.trim_end_matches('/');
    let invalid = |message: String| SettingsError::InvalidUrl {
        key,
        value: raw.to_owned(),
        message,
    };
    let url = Url::parse(raw).map_err(|err| invalid(err.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme `{other}`"))),
    }
}

impl AppSettings {
    /// Socket address the server binds to.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBindAddr`] for unparsable addresses.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.trim()
            .parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::InvalidBindAddr {
                value: raw.to_owned(),
                message: err.to_string(),
            })
    }

    /// Database URL, when one is configured and not blank.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Validate the prediction service URLs and token.
    ///
    /// Trailing slashes are trimmed before parsing.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Missing`] when the token or a URL is absent
    /// and [`SettingsError::InvalidUrl`] when a URL does not parse as http(s).
    pub fn predictor_endpoints(&self) -> Result<PredictorEndpoints, SettingsError> {
        let api_token = required(self.api_token.as_deref(), "NAMESAKE_API_TOKEN")?.to_owned();
        let endpoint = |value: Option<&str>, key| {
            parse_service_url(value, key).map(|url| PredictorEndpoint {
                url,
                api_token: api_token.clone(),
            })
        };
        Ok(PredictorEndpoints {
            age: endpoint(self.agify_url.as_deref(), "NAMESAKE_AGIFY_URL")?,
            gender: endpoint(self.genderize_url.as_deref(), "NAMESAKE_GENDERIZE_URL")?,
            nationality: endpoint(self.nationalize_url.as_deref(), "NAMESAKE_NATIONALIZE_URL")?,
        })
    }

    pub fn predictor_timeout(&self) -> Duration {
        Duration::from_millis(self.predictor_timeout_ms)
    }

    pub fn enrichment_timeout(&self) -> Duration {
        Duration::from_millis(self.enrichment_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    //! Configuration parsing and validation.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const KEYS: [&str; 9] = [
        "NAMESAKE_BIND_ADDR",
        "NAMESAKE_DATABASE_URL",
        "NAMESAKE_API_TOKEN",
        "NAMESAKE_AGIFY_URL",
        "NAMESAKE_GENDERIZE_URL",
        "NAMESAKE_NATIONALIZE_URL",
        "NAMESAKE_PREDICTOR_TIMEOUT_MS",
        "NAMESAKE_ENRICHMENT_TIMEOUT_MS",
        "NAMESAKE_DB_MAX_CONNECTIONS",
    ];

    /// Load settings with exactly `vars` set among the service's keys.
    fn load_with(vars: &[(&str, &str)]) -> AppSettings {
        let env = KEYS.map(|key| {
            let value = vars
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value).to_owned());
            (key, value)
        });
        let _guard = lock_env(env);
        AppSettings::load_from_iter([OsString::from("namesake")]).expect("config should load")
    }

    fn complete() -> Vec<(&'static str, &'static str)> {
        vec![
            ("NAMESAKE_API_TOKEN", "secret"),
            ("NAMESAKE_AGIFY_URL", "https://api.agify.io/"),
            ("NAMESAKE_GENDERIZE_URL", "https://api.genderize.io"),
            ("NAMESAKE_NATIONALIZE_URL", "http://localhost:9000/nationalize/"),
        ]
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let settings = load_with(&[]);

        assert_eq!(
            settings.bind_addr(),
            Ok("0.0.0.0:8080".parse().expect("valid address"))
        );
        assert!(settings.database_url().is_none());
        assert_eq!(settings.predictor_timeout(), Duration::from_secs(10));
        assert_eq!(settings.enrichment_timeout(), Duration::from_secs(10));
        assert_eq!(settings.db_max_connections, 10);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let mut vars = complete();
        vars.extend([
            ("NAMESAKE_BIND_ADDR", "127.0.0.1:9090"),
            ("NAMESAKE_DATABASE_URL", "postgres://localhost/namesake"),
            ("NAMESAKE_PREDICTOR_TIMEOUT_MS", "2500"),
            ("NAMESAKE_ENRICHMENT_TIMEOUT_MS", "4000"),
            ("NAMESAKE_DB_MAX_CONNECTIONS", "3"),
        ]);

        let settings = load_with(&vars);

        assert_eq!(
            settings.bind_addr(),
            Ok("127.0.0.1:9090".parse().expect("valid address"))
        );
        assert_eq!(settings.database_url(), Some("postgres://localhost/namesake"));
        assert_eq!(settings.predictor_timeout(), Duration::from_millis(2500));
        assert_eq!(settings.enrichment_timeout(), Duration::from_secs(4));
        assert_eq!(settings.db_max_connections, 3);
    }

    #[rstest]
    fn endpoints_trim_trailing_slashes_and_share_the_token() {
        let endpoints = load_with(&complete())
            .predictor_endpoints()
            .expect("valid endpoints");

        assert_eq!(endpoints.age.url.as_str(), "https://api.agify.io/");
        assert_eq!(
            endpoints.nationality.url.as_str(),
            "http://localhost:9000/nationalize"
        );
        assert_eq!(endpoints.gender.api_token, "secret");
    }

    #[rstest]
    #[case::token("NAMESAKE_API_TOKEN")]
    #[case::agify("NAMESAKE_AGIFY_URL")]
    #[case::nationalize("NAMESAKE_NATIONALIZE_URL")]
    fn missing_values_name_the_setting(#[case] key: &'static str) {
        let vars = complete()
            .into_iter()
            .filter(|(name, _)| *name != key)
            .collect::<Vec<_>>();

        let err = load_with(&vars)
            .predictor_endpoints()
            .expect_err("incomplete settings");

        assert_eq!(err, SettingsError::Missing { key });
    }

    #[rstest]
    #[case("not a url")]
    #[case("ftp://api.agify.io")]
    fn malformed_urls_are_rejected(#[case] url: &'static str) {
        let mut vars = complete();
        vars.retain(|(name, _)| *name != "NAMESAKE_AGIFY_URL");
        vars.push(("NAMESAKE_AGIFY_URL", url));

        let err = load_with(&vars)
            .predictor_endpoints()
            .expect_err("malformed url");

        assert!(matches!(
            err,
            SettingsError::InvalidUrl {
                key: "NAMESAKE_AGIFY_URL",
                ..
            }
        ));
    }

    #[rstest]
    fn malformed_bind_addr_is_rejected() {
        let err = load_with(&[("NAMESAKE_BIND_ADDR", "localhost")])
            .bind_addr()
            .expect_err("not a socket address");

        assert!(matches!(err, SettingsError::InvalidBindAddr { .. }));
    }
}
