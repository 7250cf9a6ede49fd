//! Runtime configuration for the `remo` CLI.
//! The access token comes from `--token`, falling back to `REMO_ACCESS_TOKEN`.

use nature_remo::NatureRemoError;

pub const TOKEN_ENV: &str = "REMO_ACCESS_TOKEN";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Bearer token for the cloud API. Local API commands do not need one.
    pub access_token: Option<String>,
    /// Verbose request/response logging.
    pub debug: bool,
}

impl Config {
    pub fn resolve(flag_token: Option<String>, debug: bool) -> Self {
        Self::resolve_with(flag_token, debug, |key| std::env::var(key).ok())
    }

    /// `resolve` with an injectable environment lookup.
    pub fn resolve_with<F>(flag_token: Option<String>, debug: bool, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_token = match flag_token {
            Some(t) if !t.trim().is_empty() => Some(t),
            _ => env(TOKEN_ENV).filter(|t| !t.trim().is_empty()),
        };
        Config { access_token, debug }
    }

    pub fn require_token(&self) -> Result<&str, NatureRemoError> {
        self.access_token
            .as_deref()
            .ok_or_else(|| NatureRemoError::new("Access token must be supplied"))
    }
}
