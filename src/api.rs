// API client module: the Pocket client and the small HTTP helper it posts
// through. Everything is blocking and sequential on purpose: each operation
// is triggered manually by the operator and makes at most one network call.

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::{self, PropertyStore};

/// Pocket wants this exact pair of headers on every v3 call.
const JSON_UTF8: &str = "application/json; charset=UTF-8";
const X_ACCEPT: &str = "X-Accept";

/// Where Pocket sends the browser back after the user authorizes. Pocket
/// only checks that the parameter is present, so a throwaway URL works.
const REDIRECT_URI: &str = "https://example.com";

/// Minimal HTTP seam: one JSON POST in, one JSON body out. The client is
/// written against this trait so tests can stub the network away.
pub trait HttpPost {
    fn post_json(&self, url: &str, body: Value) -> Result<Value>;
}

/// reqwest-backed transport that carries the fixed Pocket headers and turns
/// non-2xx responses into errors with the status and body text.
pub struct PocketTransport {
    client: Client,
}

impl PocketTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(PocketTransport { client })
    }
}

impl HttpPost for PocketTransport {
    fn post_json(&self, url: &str, body: Value) -> Result<Value> {
        log::debug!("POST {}", url);
        let res = self
            .client
            .post(url)
            .header(CONTENT_TYPE, JSON_UTF8)
            .header(X_ACCEPT, "application/json")
            .body(serde_json::to_vec(&body)?)
            .send()
            .with_context(|| format!("Failed to send request to {}", url))?;
        if !res.status().is_success() {
            let status = res.status();
            let txt = res.text().unwrap_or_else(|_| "".into());
            bail!("Request to {} failed: {} - {}", url, status, txt);
        }
        res.json().context("Parsing response json")
    }
}

/// Payload for the request-token call. Field names mirror the Pocket API.
#[derive(Serialize)]
struct RequestTokenPayload<'a> {
    consumer_key: &'a str,
    redirect_uri: &'a str,
}

#[derive(Deserialize)]
struct RequestTokenResponse {
    code: String,
}

/// Payload for the token exchange; `code` carries the request token.
#[derive(Serialize)]
struct AuthorizePayload<'a> {
    consumer_key: &'a str,
    code: &'a str,
}

#[derive(Deserialize)]
struct AuthorizeResponse {
    access_token: String,
}

#[derive(Serialize)]
struct RetrievePayload<'a> {
    consumer_key: &'a str,
    access_token: &'a str,
    #[serde(rename = "detailType")]
    detail_type: &'a str,
}

/// Pocket API client. Holds the base URL, the HTTP transport and the
/// property store the credentials live in; all three are injected so tests
/// can substitute them.
///
/// The authorization dance is three manual steps in order: reset
/// (when starting over), begin, open the returned URL in a browser,
/// complete. `fetch_saved` then works until the access token is reset.
pub struct PocketClient {
    base_url: String,
    transport: Box<dyn HttpPost>,
    store: Box<dyn PropertyStore>,
}

impl PocketClient {
    pub fn new(
        base_url: String,
        transport: Box<dyn HttpPost>,
        store: Box<dyn PropertyStore>,
    ) -> Self {
        PocketClient {
            base_url,
            transport,
            store,
        }
    }

    /// Create a client configured from the environment: `POCKET_API_URL`
    /// overrides the API host (defaults to the real service) and `IS_LOCAL`
    /// selects the environment-backed property store.
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("POCKET_API_URL").unwrap_or_else(|_| "https://getpocket.com".into());
        Ok(PocketClient::new(
            base_url,
            Box::new(PocketTransport::new()?),
            store::from_env(),
        ))
    }

    /// Delete both tokens so the authorization dance can start over.
    /// Idempotent; safe to call in any state.
    pub fn reset_credentials(&self) -> Result<()> {
        self.store.delete(store::REQUEST_TOKEN)?;
        self.store.delete(store::ACCESS_TOKEN)?;
        Ok(())
    }

    /// Obtain a request token and return the URL the operator must open in
    /// a browser. Refuses to run while a request token is still stored, so
    /// a dangling attempt has to be reset explicitly first.
    pub fn begin_authorization(&self) -> Result<String> {
        if self.store.get(store::REQUEST_TOKEN)?.is_some() {
            bail!(
                "{} is already set; authorization is already in progress. Reset credentials to start over.",
                store::REQUEST_TOKEN
            );
        }
        let consumer_key = self.require(store::CONSUMER_KEY)?;

        let url = format!("{}/v3/oauth/request", self.base_url);
        let body = serde_json::to_value(RequestTokenPayload {
            consumer_key: &consumer_key,
            redirect_uri: REDIRECT_URI,
        })?;
        let resp: RequestTokenResponse =
            serde_json::from_value(self.transport.post_json(&url, body)?)
                .context("Parsing request token response")?;

        self.store.set(store::REQUEST_TOKEN, &resp.code)?;
        Ok(format!(
            "{}/auth/authorize?request_token={}&redirect_uri={}",
            self.base_url, resp.code, REDIRECT_URI
        ))
    }

    /// Trade the stored request token for a long-lived access token. Run
    /// after the browser authorization step.
    pub fn complete_authorization(&self) -> Result<()> {
        if self.store.get(store::ACCESS_TOKEN)?.is_some() {
            bail!(
                "{} is already set. Reset credentials to re-authorize.",
                store::ACCESS_TOKEN
            );
        }
        let request_token = self
            .store
            .get(store::REQUEST_TOKEN)?
            .context("No request token is stored. Begin authorization first.")?;
        let consumer_key = self.require(store::CONSUMER_KEY)?;

        let url = format!("{}/v3/oauth/authorize", self.base_url);
        let body = serde_json::to_value(AuthorizePayload {
            consumer_key: &consumer_key,
            code: &request_token,
        })?;
        let resp: AuthorizeResponse =
            serde_json::from_value(self.transport.post_json(&url, body)?)
                .context("Parsing authorize response")?;

        self.store.set(store::ACCESS_TOKEN, &resp.access_token)?;
        Ok(())
    }

    /// Fetch the user's saved items. A single best-effort call; the JSON
    /// body comes back verbatim for the caller to dump.
    pub fn fetch_saved(&self) -> Result<Value> {
        let access_token = self
            .store
            .get(store::ACCESS_TOKEN)?
            .context("No access token is stored; not authorized. Complete authorization first.")?;
        let consumer_key = self.require(store::CONSUMER_KEY)?;

        let url = format!("{}/v3/get", self.base_url);
        let body = serde_json::to_value(RetrievePayload {
            consumer_key: &consumer_key,
            access_token: &access_token,
            detail_type: "complete",
        })?;
        self.transport.post_json(&url, body)
    }

    /// Write the consumer key into the active store so the file-backed path
    /// can be provisioned without hand-editing the property file.
    pub fn set_consumer_key(&self, key: &str) -> Result<()> {
        self.store.set(store::CONSUMER_KEY, key)
    }

    fn require(&self, key: &str) -> Result<String> {
        self.store
            .get(key)?
            .with_context(|| format!("Property {} is not set", key))
    }
}
