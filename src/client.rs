//! HTTP client for the component vault.
//!
//! The vault is an opaque store keyed by `(user, category, title)`. This
//! client covers the endpoints the CLI needs; every request carries the
//! bearer token when one is configured.
//!
//! | Method | Endpoint |
//! |--------|----------|
//! | [`push_component`](VaultClient::push_component) | `POST /components` |
//! | [`pull_component`](VaultClient::pull_component) | `GET /components?category=&title=` |
//! | [`get_component`](VaultClient::get_component) | `GET /components/{id}` |
//! | [`list_components`](VaultClient::list_components) | `GET /components/list` |
//! | [`list_by_category`](VaultClient::list_by_category) | `GET /components/list-by-category?category=` |
//! | [`search_components`](VaultClient::search_components) | `GET /components/search?q=` |
//! | [`list_categories`](VaultClient::list_categories) | `GET /categories` |
//! | [`create_category`](VaultClient::create_category) | `POST /categories` |

use std::time::Duration;

use composter_core::{Category, Component, ComponentBundle};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::config::VaultConfig;

/// Failure talking to the vault.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error("not authorized: set COMPOSTER_TOKEN or vault.token to a valid session token")]
    Unauthorized,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("vault returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct ComponentEnvelope {
    component: Component,
}

#[derive(Deserialize)]
struct ComponentsEnvelope {
    #[serde(default)]
    components: Vec<Component>,
}

#[derive(Deserialize)]
struct CategoriesEnvelope {
    #[serde(default)]
    categories: Vec<Category>,
}

pub struct VaultClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl VaultClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self, VaultError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn from_config(config: &VaultConfig) -> Result<Self, VaultError> {
        Self::new(
            &config.url,
            config.token.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn push_component(&self, bundle: &ComponentBundle) -> Result<Component, VaultError> {
        let req = self.request(Method::POST, "/components").json(bundle);
        let envelope: ComponentEnvelope = self.send(req).await?;
        Ok(envelope.component)
    }

    pub async fn pull_component(&self, category: &str, title: &str) -> Result<Component, VaultError> {
        let req = self
            .request(Method::GET, "/components")
            .query(&[("category", category), ("title", title)]);
        let envelope: ComponentEnvelope = self.send(req).await?;
        Ok(envelope.component)
    }

    pub async fn get_component(&self, id: &str) -> Result<Component, VaultError> {
        let req = self.request(Method::GET, &format!("/components/{}", id));
        let envelope: ComponentEnvelope = self.send(req).await?;
        Ok(envelope.component)
    }

    pub async fn list_components(&self) -> Result<Vec<Component>, VaultError> {
        let req = self.request(Method::GET, "/components/list");
        let envelope: ComponentsEnvelope = self.send(req).await?;
        Ok(envelope.components)
    }

    pub async fn list_by_category(&self, category: &str) -> Result<Vec<Component>, VaultError> {
        let req = self
            .request(Method::GET, "/components/list-by-category")
            .query(&[("category", category)]);
        let envelope: ComponentsEnvelope = self.send(req).await?;
        Ok(envelope.components)
    }

    pub async fn search_components(&self, query: &str) -> Result<Vec<Component>, VaultError> {
        let req = self
            .request(Method::GET, "/components/search")
            .query(&[("q", query)]);
        let envelope: ComponentsEnvelope = self.send(req).await?;
        Ok(envelope.components)
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, VaultError> {
        let req = self.request(Method::GET, "/categories");
        let envelope: CategoriesEnvelope = self.send(req).await?;
        Ok(envelope.categories)
    }

    /// Create a category. The response body is not interpreted.
    pub async fn create_category(&self, name: &str) -> Result<(), VaultError> {
        let req = self
            .request(Method::POST, "/categories")
            .json(&serde_json::json!({ "name": name }));
        let _: Value = self.send(req).await?;
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self
            .http
            .request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, VaultError> {
        let res = req.send().await?;
        let status = res.status();
        let body = res.text().await?;

        if status.is_success() {
            let value = if body.trim().is_empty() {
                Value::Null
            } else {
                serde_json::from_str(&body)?
            };
            return Ok(serde_json::from_value(value)?);
        }

        let message = error_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
        tracing::debug!(status = status.as_u16(), %message, "vault request failed");
        Err(match status {
            StatusCode::UNAUTHORIZED => VaultError::Unauthorized,
            StatusCode::NOT_FOUND => VaultError::NotFound(message),
            _ => VaultError::Api {
                status: status.as_u16(),
                message,
            },
        })
    }
}

/// `message` or `error` field of a JSON error body.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}
