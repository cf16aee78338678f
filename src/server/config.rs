//! Server configuration loaded from environment variables.

use std::time::Duration;

use crate::server::error::config::ConfigError;

/// Minimum length in bytes of the remember-me signing secret.
pub const MIN_COOKIE_SECRET_LEN: usize = 32;

/// Longest accepted remember-me cookie lifetime, 400 days.
pub const MAX_REMEMBER_ME_DURATION: Duration = Duration::from_secs(60 * 60 * 24 * 400);

pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    pub cookie_secret: String,
    pub auth: AuthConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |var: &str| {
            lookup(var).ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
        };

        let cookie_secret = required("COOKIE_SECRET")?;
        if cookie_secret.len() < MIN_COOKIE_SECRET_LEN {
            return Err(ConfigError::InvalidEnvValue {
                var: "COOKIE_SECRET".to_string(),
                reason: format!("must be at least {} bytes", MIN_COOKIE_SECRET_LEN),
            });
        }

        let defaults = AuthConfig::default();

        let login_url = match (lookup("LOGIN_URL"), lookup("LOGIN_ROUTE")) {
            (Some(url), _) if url.is_empty() => None,
            (Some(url), _) => Some(LoginUrl::Url(url)),
            (None, Some(route)) => Some(LoginUrl::parse_route(&route)),
            (None, None) => defaults.login_url,
        };

        let remember_me_duration = match lookup("REMEMBER_ME_DURATION") {
            Some(secs) => Duration::from_secs(secs.parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvValue {
                    var: "REMEMBER_ME_DURATION".to_string(),
                    reason: e.to_string(),
                }
            })?),
            None => defaults.remember_me_duration,
        };
        if remember_me_duration > MAX_REMEMBER_ME_DURATION {
            return Err(ConfigError::InvalidEnvValue {
                var: "REMEMBER_ME_DURATION".to_string(),
                reason: format!(
                    "must be at most {} seconds",
                    MAX_REMEMBER_ME_DURATION.as_secs()
                ),
            });
        }

        let flag = |var: &str, default: bool| match lookup(var) {
            Some(value) => parse_flag(var, &value),
            None => Ok(default),
        };

        let auth = AuthConfig {
            login_url,
            login_required_ajax_response: lookup("LOGIN_REQUIRED_AJAX_RESPONSE"),
            default_return_url: lookup("DEFAULT_RETURN_URL")
                .unwrap_or(defaults.default_return_url),
            default_controller: lookup("DEFAULT_CONTROLLER")
                .unwrap_or(defaults.default_controller),
            script_file: lookup("SCRIPT_FILE").unwrap_or(defaults.script_file),
            identity_cookie_name: lookup("IDENTITY_COOKIE_NAME")
                .unwrap_or(defaults.identity_cookie_name),
            allow_auto_login: flag("ALLOW_AUTO_LOGIN", defaults.allow_auto_login)?,
            auto_renew_cookie: flag("AUTO_RENEW_COOKIE", defaults.auto_renew_cookie)?,
            secure_cookie: flag("SECURE_COOKIE", defaults.secure_cookie)?,
            remember_me_duration,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            bind_address: lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            cookie_secret,
            auth,
        })
    }
}

fn parse_flag(var: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidEnvValue {
            var: var.to_string(),
            reason: format!("expected a boolean, got {:?}", value),
        }),
    }
}

/// Where anonymous visitors are sent when they hit a protected resource.
#[derive(Clone, Debug, PartialEq)]
pub enum LoginUrl {
    /// A ready-made URL.
    Url(String),
    /// A route plus ordered query parameters. An empty route falls back to the default
    /// controller.
    Route {
        route: Option<String>,
        params: Vec<(String, String)>,
    },
}

impl LoginUrl {
    /// Parses `account/login?source=cms` into a route and its parameters.
    pub fn parse_route(value: &str) -> Self {
        let (route, query) = value.split_once('?').unwrap_or((value, ""));
        let route = route.trim_matches('/');

        Self::Route {
            route: (!route.is_empty()).then(|| route.to_string()),
            params: url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        }
    }

    /// Resolves the destination to a URL.
    pub fn resolve(&self, default_controller: &str) -> String {
        match self {
            Self::Url(url) => url.clone(),
            Self::Route { route, params } => {
                let route = route.as_deref().unwrap_or(default_controller);
                let mut url = format!("/{}", route.trim_matches('/'));

                if !params.is_empty() {
                    let query = url::form_urlencoded::Serializer::new(String::new())
                        .extend_pairs(params)
                        .finish();
                    url.push('?');
                    url.push_str(&query);
                }

                url
            }
        }
    }
}

/// Behavior of the authentication session subsystem.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// `None` makes protected resources answer 403 instead of redirecting.
    pub login_url: Option<LoginUrl>,
    /// Body sent to AJAX callers that need to log in, ending the request.
    pub login_required_ajax_response: Option<String>,
    /// Return URL used when none was captured and the caller gave no default.
    pub default_return_url: String,
    pub default_controller: String,
    /// Path of the front controller script; its file name is stripped from return URLs.
    pub script_file: String,
    pub identity_cookie_name: String,
    /// Enables remember-me cookies and logging in from them.
    pub allow_auto_login: bool,
    /// Re-issues the remember-me cookie every time it is used to log in.
    pub auto_renew_cookie: bool,
    /// Lifetime of the remember-me cookie issued by a "remember me" login.
    pub remember_me_duration: Duration,
    /// Send the remember-me cookie over HTTPS only.
    pub secure_cookie: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            login_url: Some(LoginUrl::Url("/login".to_string())),
            login_required_ajax_response: None,
            default_return_url: "dashboard".to_string(),
            default_controller: "dashboard".to_string(),
            script_file: "index.php".to_string(),
            identity_cookie_name: "blocks_identity".to_string(),
            allow_auto_login: true,
            auto_renew_cookie: false,
            remember_me_duration: Duration::from_secs(60 * 60 * 24 * 30),
            // Matches the session cookie: plain HTTP only in debug builds
            secure_cookie: !cfg!(debug_assertions),
        }
    }
}
