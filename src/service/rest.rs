use crate::config::RestConfig;
use crate::service::{Collection, DataService, ServiceError};
use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Postgres `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Data service for a hosted PostgREST endpoint (e.g. Supabase).
///
/// `{url}/rest/v1/{table}` is the collection; rows are addressed with a
/// `?prodcode=eq.{key}` filter.
pub struct RestDataService {
    http: reqwest::Client,
    base_url: String,
    api_key: Secret<String>,
}

/// Error body returned by PostgREST.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

impl RestDataService {
    pub fn new(config: &RestConfig) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self::with_client(http, &config.url, config.api_key.clone()))
    }

    pub fn with_client(http: reqwest::Client, base_url: &str, api_key: Secret<String>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn table_url(&self, collection: Collection) -> String {
        format!("{}/rest/v1/{}", self.base_url, collection.table())
    }

    fn row_filter(collection: Collection, key: &str) -> [(&'static str, String); 1] {
        [(collection.key_column(), format!("eq.{key}"))]
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let key = self.api_key.expose_secret();
        builder
            .header("apikey", key.as_str())
            .bearer_auth(key)
            .header("Prefer", "return=minimal")
    }

    /// Maps a non-2xx response to a `ServiceError`.
    async fn check(resp: reqwest::Response) -> Result<(), ServiceError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let body = resp.text().await.unwrap_or_default();
        let error = error_from_body(status.as_u16(), &body);
        warn!(status = status.as_u16(), %error, "Request rejected");
        Err(error)
    }
}

/// Prefers the JSON `message` field, falling back to the raw body.
fn error_from_body(status: u16, body: &str) -> ServiceError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => {
            let message = parsed.message.unwrap_or_else(|| body.to_string());
            if parsed.code.as_deref() == Some(UNIQUE_VIOLATION) {
                return ServiceError::DuplicateKey(parsed.details.unwrap_or(message));
            }
            ServiceError::Server { status, message }
        }
        Err(_) => ServiceError::Server {
            status,
            message: body.to_string(),
        },
    }
}

#[async_trait]
impl DataService for RestDataService {
    #[instrument(skip(self, record))]
    async fn insert(&self, collection: Collection, record: Value) -> Result<(), ServiceError> {
        debug!(%record, "Sending request");
        let req = self.http.post(self.table_url(collection)).json(&record);
        let resp = self.authed(req).send().await?;
        Self::check(resp).await
    }

    /// A filter that matches no rows is not an error for PostgREST.
    #[instrument(skip(self, patch))]
    async fn update_by_key(
        &self,
        collection: Collection,
        key: &str,
        patch: Value,
    ) -> Result<(), ServiceError> {
        debug!(%patch, "Sending request");
        let req = self
            .http
            .patch(self.table_url(collection))
            .query(&Self::row_filter(collection, key))
            .json(&patch);
        let resp = self.authed(req).send().await?;
        Self::check(resp).await
    }

    #[instrument(skip(self))]
    async fn delete_by_key(&self, collection: Collection, key: &str) -> Result<(), ServiceError> {
        debug!("Sending request");
        let req = self
            .http
            .delete(self.table_url(collection))
            .query(&Self::row_filter(collection, key));
        let resp = self.authed(req).send().await?;
        Self::check(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(url: &str) -> RestDataService {
        RestDataService::with_client(
            reqwest::Client::new(),
            url,
            Secret::new("anon-key".to_string()),
        )
    }

    #[test]
    fn test_table_url_trims_trailing_slash() {
        let service = service("https://example.supabase.co/");
        assert_eq!(
            service.table_url(Collection::PriceHistory),
            "https://example.supabase.co/rest/v1/pricehist"
        );
    }

    #[test]
    fn test_update_request_filters_on_prodcode() {
        let service = service("https://example.supabase.co");
        let req = service
            .authed(
                service
                    .http
                    .patch(service.table_url(Collection::Product))
                    .query(&RestDataService::row_filter(Collection::Product, "P001")),
            )
            .build()
            .unwrap();

        assert_eq!(
            req.url().as_str(),
            "https://example.supabase.co/rest/v1/product?prodcode=eq.P001"
        );
        assert_eq!(req.headers()["apikey"], "anon-key");
        assert_eq!(req.headers()["authorization"], "Bearer anon-key");
        assert_eq!(req.headers()["prefer"], "return=minimal");
    }

    #[test]
    fn test_error_body_message_is_surfaced() {
        let error = error_from_body(
            400,
            r#"{"code":"22P02","message":"invalid input syntax for type numeric","details":null}"#,
        );
        assert!(matches!(
            error,
            ServiceError::Server { status: 400, ref message } if message == "invalid input syntax for type numeric"
        ));
    }

    #[test]
    fn test_unique_violation_maps_to_duplicate_key() {
        let error = error_from_body(
            409,
            r#"{"code":"23505","message":"duplicate key value violates unique constraint \"product_pkey\"","details":"Key (prodcode)=(P001) already exists."}"#,
        );
        assert!(matches!(
            error,
            ServiceError::DuplicateKey(ref detail) if detail == "Key (prodcode)=(P001) already exists."
        ));
    }

    #[test]
    fn test_non_json_body_is_kept_verbatim() {
        let error = error_from_body(502, "Bad Gateway");
        assert!(matches!(
            error,
            ServiceError::Server { status: 502, ref message } if message == "Bad Gateway"
        ));
    }
}
