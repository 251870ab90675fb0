//! Identity service client (`<base>/hash?fundName=…`).

use std::time::Duration;

use fundcheck_config::Settings;
use reqwest::blocking::Client;
use tracing::debug;

use crate::error::LookupError;
use crate::http::{build_client, json_scalar, send_json};
use crate::IdentityDirectory;

/// Header carrying the identity service API key.
pub const IDENTITY_KEY_HEADER: &str = "mz-internal-app";

const HASH_PATH: &str = "/hash";

/// Identity API client (blocking).
///
/// Built even when the base URL is missing so a misconfigured run still
/// produces a report; every lookup then fails with `NotConfigured`.
#[derive(Clone)]
pub struct IdentityClient {
    http: Client,
    base_url: Option<String>,
    api_key: Option<String>,
}

impl IdentityClient {
    pub fn new(
        base_url: Option<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, LookupError> {
        Ok(Self {
            http: build_client(timeout)?,
            base_url,
            api_key,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, LookupError> {
        Self::new(
            settings.identity_base_url.clone(),
            settings.identity_api_key.clone(),
            settings.timeout(),
        )
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    fn endpoint(&self) -> Result<String, LookupError> {
        let base = self
            .base_url
            .as_deref()
            .ok_or_else(|| LookupError::NotConfigured("identity service base URL is not set".into()))?;
        Ok(format!("{}{}", base.trim_end_matches('/'), HASH_PATH))
    }

    /// Fetch the identifier registered for `fund_name`.
    pub fn fund_id(&self, fund_name: &str) -> Result<Option<String>, LookupError> {
        let url = self.endpoint()?;
        debug!(fund_name, "identity lookup");

        let mut request = self.http.get(&url).query(&[("fundName", fund_name)]);
        if let Some(ref key) = self.api_key {
            request = request.header(IDENTITY_KEY_HEADER, key);
        }

        let body = send_json(request)?;
        Ok(body.get("id").and_then(json_scalar))
    }
}

impl IdentityDirectory for IdentityClient {
    fn lookup_by_name(&self, fund_name: &str) -> Result<Option<String>, LookupError> {
        if fund_name.trim().is_empty() {
            return Ok(None);
        }
        self.fund_id(fund_name)
    }
}
