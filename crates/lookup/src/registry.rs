//! Document registry client (FNET document search).
//!
//! One GET per CNPJ, newest filing first, page size 1.

use std::time::Duration;

use fundcheck_config::Settings;
use reqwest::blocking::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::LookupError;
use crate::http::{build_client, json_scalar, send_json};
use crate::FundRegistry;

/// The registry's latest filing for a fund.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilingInfo {
    /// `descricaoFundo`: the fund's descriptive name
    pub fund_name: String,
    /// `dataEntrega`: delivery timestamp as sent (ISO-8601, may carry a time)
    pub delivery_date: Option<String>,
    /// `id`: document identifier
    pub document_id: Option<String>,
}

/// Query parameters for a newest-first, single-result search.
///
/// The CNPJ goes out twice: the registry filters on `cnpjFundo` for funds
/// and on `cnpj` for issuers, and which one applies depends on the document.
pub fn search_params(cnpj: &str) -> Vec<(&'static str, String)> {
    vec![
        ("d", "2".to_string()),
        ("s", "0".to_string()),
        ("l", "1".to_string()),
        ("o[0][dataEntrega]", "desc".to_string()),
        ("cnpj", cnpj.to_string()),
        ("cnpjFundo", cnpj.to_string()),
        ("idCategoria", "0".to_string()),
        ("idTipoDocumento", "0".to_string()),
        ("idEspecieDocumento", "0".to_string()),
    ]
}

/// Registry API client (blocking).
#[derive(Clone)]
pub struct RegistryClient {
    http: Client,
    url: String,
}

impl RegistryClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, LookupError> {
        Ok(Self {
            http: build_client(timeout)?,
            url: url.into(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, LookupError> {
        Self::new(settings.registry_url.clone(), settings.timeout())
    }

    /// Search the registry and return the newest filing, if any.
    pub fn latest_filing(&self, cnpj: &str) -> Result<Option<FilingInfo>, LookupError> {
        debug!(cnpj, "registry search");
        let body = send_json(self.http.get(&self.url).query(&search_params(cnpj)))?;
        Ok(parse_filing(&body))
    }
}

impl FundRegistry for RegistryClient {
    fn lookup_by_tax_id(&self, cnpj: &str) -> Result<Option<FilingInfo>, LookupError> {
        if cnpj.trim().is_empty() {
            return Ok(None);
        }
        self.latest_filing(cnpj)
    }
}

/// First element of `data`, if it names a fund.
fn parse_filing(body: &Value) -> Option<FilingInfo> {
    let first = body.get("data")?.as_array()?.first()?;
    let fund_name = first
        .get("descricaoFundo")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())?
        .to_string();

    Some(FilingInfo {
        fund_name,
        delivery_date: first.get("dataEntrega").and_then(Value::as_str).map(String::from),
        document_id: first.get("id").and_then(json_scalar),
    })
}
