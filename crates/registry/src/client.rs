use std::time::Duration;

use gstscore_engine::dates::parse_registry_date;
use gstscore_engine::model::{FiledReturn, RegistrySnapshot};

// ── Constants ───────────────────────────────────────────────────────

const SEARCH_API_BASE: &str = "https://gstapi.charteredinfo.com/commonapi/v1.1/search";
const RETURNS_API_BASE: &str = "https://gstapi.charteredinfo.com/commonapi/v1.0/returns";

/// ASP gateway credentials, supplied by the operator.
#[derive(Debug, Clone)]
pub struct RegistryCredentials {
    pub asp_id: String,
    pub password: String,
}

/// Error type for registry operations.
#[derive(Debug)]
pub enum RegistryError {
    /// Network error
    Network(String),
    /// HTTP error with status code
    Http(u16, String),
    /// JSON parsing error
    Parse(String),
    /// Response arrived but its structure is unusable
    Upstream(String),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::Network(msg) => write!(f, "Network error: {}", msg),
            RegistryError::Http(code, msg) => write!(f, "HTTP {}: {}", code, msg),
            RegistryError::Parse(msg) => write!(f, "Parse error: {}", msg),
            RegistryError::Upstream(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for RegistryError {}

// ── Registry client ─────────────────────────────────────────────────

/// GST registry API client (blocking).
#[derive(Clone)]
pub struct RegistryClient {
    http: reqwest::blocking::Client,
    search_url: String,
    returns_url: String,
    creds: RegistryCredentials,
}

impl RegistryClient {
    pub fn new(creds: RegistryCredentials) -> Self {
        Self::with_base_urls(
            creds,
            SEARCH_API_BASE.to_string(),
            RETURNS_API_BASE.to_string(),
        )
    }

    pub fn with_base_urls(
        creds: RegistryCredentials,
        search_url: String,
        returns_url: String,
    ) -> Self {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("gsc/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self { http, search_url, returns_url, creds }
    }

    /// Look up a taxpayer's registration snapshot (Action=TP).
    pub fn taxpayer_search(&self, gstin: &str) -> Result<RegistrySnapshot, RegistryError> {
        let json = self.get_json(&self.search_url, &[("Action", "TP"), ("Gstin", gstin)])?;

        if json.is_null() || json.as_object().map_or(false, |o| o.is_empty()) {
            return Err(RegistryError::Upstream(
                "no data in taxpayer search response".into(),
            ));
        }

        snapshot_from_json(json)
    }

    /// List returns filed in a financial year (Action=RETTRACK).
    /// `fy` is the upstream financial-year code, e.g. "2023-24".
    pub fn filed_returns(&self, gstin: &str, fy: &str) -> Result<Vec<FiledReturn>, RegistryError> {
        let json = self.get_json(
            &self.returns_url,
            &[("Action", "RETTRACK"), ("Gstin", gstin), ("fy", fy)],
        )?;

        // The key must be present even when empty; its absence means
        // the gateway returned an error payload.
        let filed_list = json
            .get("EFiledlist")
            .ok_or_else(|| {
                RegistryError::Upstream(
                    "missing 'EFiledlist' field in returns-track response".into(),
                )
            })?
            .clone();

        serde_json::from_value(filed_list).map_err(|e| RegistryError::Parse(e.to_string()))
    }

    // ── Internal helpers ────────────────────────────────────────────

    fn get_json(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<serde_json::Value, RegistryError> {
        let response = self
            .http
            .get(url)
            .query(&[
                ("aspid", self.creds.asp_id.as_str()),
                ("password", self.creds.password.as_str()),
            ])
            .query(params)
            .send()
            .map_err(|e| RegistryError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().unwrap_or_default();
            return Err(RegistryError::Http(status, body));
        }

        response
            .json::<serde_json::Value>()
            .map_err(|e| RegistryError::Parse(e.to_string()))
    }
}

// ── Payload mapping ─────────────────────────────────────────────────

fn snapshot_from_json(json: serde_json::Value) -> Result<RegistrySnapshot, RegistryError> {
    let addr = &json["pradr"]["addr"];

    let registration_date = parse_registry_date(json["rgdt"].as_str().unwrap_or(""))
        .map_err(|e| RegistryError::Parse(e.to_string()))?;
    let last_update = parse_registry_date(json["lstupdt"].as_str().unwrap_or(""))
        .map_err(|e| RegistryError::Parse(e.to_string()))?;

    let business_natures = json["nba"]
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default();

    Ok(RegistrySnapshot {
        legal_name: json["lgnm"].as_str().unwrap_or("").to_string(),
        trade_name: json["tradeNam"].as_str().unwrap_or("").to_string(),
        entity_type: json["ctb"].as_str().unwrap_or("").to_string(),
        registration_date,
        last_update,
        state: addr["loc"].as_str().unwrap_or("N/A").to_string(),
        city: addr["city"].as_str().unwrap_or("N/A").to_string(),
        business_natures,
        e_invoice_status: json["einvoiceStatus"].as_str().unwrap_or("").to_string(),
        raw: json,
    })
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn creds() -> RegistryCredentials {
        RegistryCredentials {
            asp_id: "testasp".into(),
            password: "testpass".into(),
        }
    }

    fn client_for(server: &MockServer) -> RegistryClient {
        RegistryClient::with_base_urls(
            creds(),
            format!("{}/search", server.base_url()),
            format!("{}/returns", server.base_url()),
        )
    }

    fn taxpayer_payload() -> serde_json::Value {
        serde_json::json!({
            "lgnm": "Acme Traders Pvt Ltd",
            "tradeNam": "Acme",
            "ctb": "Private Limited Company",
            "rgdt": "01/07/2017",
            "lstupdt": "15/03/2024",
            "nba": ["Wholesale Business", "Retail Business"],
            "einvoiceStatus": "Yes",
            "pradr": {
                "addr": {
                    "loc": "Maharashtra",
                    "city": "Pune"
                }
            }
        })
    }

    #[test]
    fn taxpayer_search_maps_registration_fields() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/search")
                .query_param("aspid", "testasp")
                .query_param("Action", "TP")
                .query_param("Gstin", "27AAAAA0000A1Z5");
            then.status(200).json_body(taxpayer_payload());
        });

        let snapshot = client_for(&server)
            .taxpayer_search("27AAAAA0000A1Z5")
            .unwrap();
        mock.assert();

        assert_eq!(snapshot.legal_name, "Acme Traders Pvt Ltd");
        assert_eq!(snapshot.state, "Maharashtra");
        assert_eq!(snapshot.city, "Pune");
        assert_eq!(
            snapshot.registration_date.unwrap().to_string(),
            "2017-07-01"
        );
        assert_eq!(snapshot.business_natures.len(), 2);
        assert_eq!(snapshot.raw["lgnm"], "Acme Traders Pvt Ltd");
    }

    #[test]
    fn taxpayer_search_defaults_missing_address() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(200)
                .json_body(serde_json::json!({"lgnm": "Bare Minimum Ltd"}));
        });

        let snapshot = client_for(&server).taxpayer_search("27AAAAA0000A1Z5").unwrap();
        assert_eq!(snapshot.state, "N/A");
        assert_eq!(snapshot.city, "N/A");
        assert_eq!(snapshot.registration_date, None);
    }

    #[test]
    fn empty_taxpayer_payload_is_upstream_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(200).json_body(serde_json::json!({}));
        });

        let err = client_for(&server)
            .taxpayer_search("27AAAAA0000A1Z5")
            .unwrap_err();
        assert!(matches!(err, RegistryError::Upstream(_)));
    }

    #[test]
    fn malformed_registration_date_is_parse_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(200)
                .json_body(serde_json::json!({"lgnm": "X", "rgdt": "2017-07-01"}));
        });

        let err = client_for(&server)
            .taxpayer_search("27AAAAA0000A1Z5")
            .unwrap_err();
        assert!(matches!(err, RegistryError::Parse(_)));
    }

    #[test]
    fn filed_returns_parses_the_efiled_list() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/returns")
                .query_param("Action", "RETTRACK")
                .query_param("Gstin", "27AAAAA0000A1Z5")
                .query_param("fy", "2023-24");
            then.status(200).json_body(serde_json::json!({
                "EFiledlist": [
                    {"rtntype": "GSTR3B", "dof": "24-05-2024", "ret_prd": "0424", "status": "Filed"},
                    {"rtntype": "GSTR1", "dof": "13-05-2024", "ret_prd": "0424", "status": "Filed"}
                ]
            }));
        });

        let returns = client_for(&server)
            .filed_returns("27AAAAA0000A1Z5", "2023-24")
            .unwrap();
        mock.assert();

        assert_eq!(returns.len(), 2);
        assert_eq!(returns[0].return_type, "GSTR3B");
        assert_eq!(returns[0].filing_date, "24-05-2024");
        assert_eq!(returns[1].period, "0424");
    }

    #[test]
    fn missing_efiled_list_is_upstream_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/returns");
            then.status(200)
                .json_body(serde_json::json!({"error": "invalid gstin"}));
        });

        let err = client_for(&server)
            .filed_returns("27AAAAA0000A1Z5", "2023-24")
            .unwrap_err();
        assert!(matches!(err, RegistryError::Upstream(_)));
    }

    #[test]
    fn empty_efiled_list_is_ok_here() {
        // An empty list is valid wire data; rejecting it is the
        // store's call, not the transport's.
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/returns");
            then.status(200)
                .json_body(serde_json::json!({"EFiledlist": []}));
        });

        let returns = client_for(&server)
            .filed_returns("27AAAAA0000A1Z5", "2023-24")
            .unwrap();
        assert!(returns.is_empty());
    }

    #[test]
    fn http_failure_carries_the_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(502).body("bad gateway");
        });

        let err = client_for(&server)
            .taxpayer_search("27AAAAA0000A1Z5")
            .unwrap_err();
        match err {
            RegistryError::Http(code, body) => {
                assert_eq!(code, 502);
                assert_eq!(body, "bad gateway");
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }
}
