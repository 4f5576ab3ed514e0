//! Graph-style HTTP template provider.
//!
//! Talks to a messaging platform exposing the usual business-account
//! template endpoints:
//!
//! - `GET    {base}/{account}/message_templates` (paged via `paging.next`)
//! - `POST   {base}/{account}/message_templates` to create
//! - `POST   {base}/{template_id}` to edit
//! - `DELETE {base}/{account}/message_templates?name=...` to delete

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use super::provider::{
    ComponentKind, CreateOutcome, RemoteAck, RemoteComponent, RemoteTemplate,
    RemoteTemplateProvider,
};
use crate::error::{Result, SyncError};
use crate::model::{TemplateButton, TemplateCategory, TemplateRecord, TemplateStatus};
use crate::validate::placeholder_count;

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://graph.facebook.com/v19.0";

/// Upper bound on followed `paging.next` links per fetch.
const MAX_PAGES: usize = 50;

/// Connection settings for [`HttpTemplateProvider`].
#[derive(Debug, Clone)]
pub struct HttpProviderConfig {
    pub base_url: String,
    /// Business account that owns the templates
    pub account_id: String,
    pub access_token: String,
    pub request_timeout: Duration,
    pub page_size: u32,
}

impl HttpProviderConfig {
    pub fn new(account_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            account_id: account_id.into(),
            access_token: access_token.into(),
            request_timeout: Duration::from_secs(30),
            page_size: 100,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}

// --- Wire types ---

#[derive(Debug, Deserialize)]
struct WireTemplateList {
    #[serde(default)]
    data: Vec<WireTemplate>,
    #[serde(default)]
    paging: Option<WirePaging>,
}

#[derive(Debug, Deserialize)]
struct WirePaging {
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireTemplate {
    id: String,
    name: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    language: String,
    #[serde(default)]
    rejected_reason: Option<String>,
    #[serde(default)]
    components: Vec<WireComponent>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireComponent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    buttons: Vec<WireButton>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    example: Option<WireExample>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireButton {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    phone_number: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireExample {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    body_text: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct WireCreateRequest<'a> {
    name: &'a str,
    language: &'a str,
    category: &'a str,
    components: Vec<WireComponent>,
}

#[derive(Debug, Serialize)]
struct WireEditRequest<'a> {
    category: &'a str,
    components: Vec<WireComponent>,
}

#[derive(Debug, Deserialize)]
struct WireCreateResponse {
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireSuccessResponse {
    #[serde(default)]
    success: bool,
}

#[derive(Debug, Deserialize)]
struct WireErrorResponse {
    error: WireError,
}

#[derive(Debug, Deserialize)]
struct WireError {
    message: String,
    #[serde(default)]
    error_user_msg: Option<String>,
}

impl WireTemplate {
    fn into_remote(self) -> RemoteTemplate {
        let category = self.category.parse().unwrap_or_else(|_| {
            tracing::warn!(name = %self.name, category = %self.category, "unknown remote category, treating as utility");
            TemplateCategory::Utility
        });
        let rejection_reason = self
            .rejected_reason
            .filter(|reason| !reason.is_empty() && reason != "NONE");
        RemoteTemplate {
            id: self.id,
            name: self.name,
            status: TemplateStatus::from_remote(&self.status),
            rejection_reason,
            category,
            language: self.language,
            components: self
                .components
                .into_iter()
                .filter_map(WireComponent::into_remote)
                .collect(),
        }
    }
}

impl WireComponent {
    fn into_remote(self) -> Option<RemoteComponent> {
        let kind = match self.kind.to_ascii_uppercase().as_str() {
            "HEADER" => ComponentKind::Header,
            "BODY" => ComponentKind::Body,
            "FOOTER" => ComponentKind::Footer,
            "BUTTONS" => ComponentKind::Buttons,
            _ => return None,
        };
        let examples = self
            .example
            .and_then(|e| e.body_text.into_iter().next())
            .unwrap_or_default();
        Some(RemoteComponent {
            kind,
            text: self.text,
            buttons: self
                .buttons
                .into_iter()
                .map(|b| TemplateButton {
                    kind: b.kind,
                    text: b.text,
                    url: b.url,
                    phone_number: b.phone_number,
                })
                .collect(),
            examples,
        })
    }

    fn body(record: &TemplateRecord) -> Self {
        let example = (placeholder_count(&record.content) > 0).then(|| WireExample {
            body_text: vec![record.variable_examples.clone()],
        });
        Self {
            kind: "BODY".to_string(),
            format: None,
            text: Some(record.content.clone()),
            buttons: Vec::new(),
            example,
        }
    }
}

/// Lowercase the name and squash anything outside `[a-z0-9_]` into `_`,
/// which is what the provider does to submitted names.
pub fn normalize_template_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    for ch in name.trim().chars() {
        let ch = ch.to_ascii_lowercase();
        if ch.is_ascii_alphanumeric() {
            normalized.push(ch);
        } else if !normalized.ends_with('_') {
            normalized.push('_');
        }
    }
    normalized.trim_matches('_').to_string()
}

/// Template provider backed by the platform's HTTP API.
pub struct HttpTemplateProvider {
    client: Client,
    config: HttpProviderConfig,
}

impl HttpTemplateProvider {
    pub fn new(config: HttpProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| SyncError::InvalidInput(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    fn templates_url(&self) -> String {
        format!(
            "{}/{}/message_templates",
            self.config.base_url.trim_end_matches('/'),
            self.config.account_id
        )
    }

    fn template_url(&self, id: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), id)
    }

    /// Read the body and turn a non-2xx reply into the provider's message.
    async fn read_body(response: Response) -> Result<std::result::Result<String, String>> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SyncError::RemoteUnavailable(format!("Failed to read response: {}", e)))?;
        if status.is_success() {
            return Ok(Ok(body));
        }
        let message = match serde_json::from_str::<WireErrorResponse>(&body) {
            Ok(parsed) => parsed.error.error_user_msg.unwrap_or(parsed.error.message),
            Err(_) => format!("HTTP {}: {}", status, body),
        };
        Ok(Err(message))
    }
}

#[async_trait]
impl RemoteTemplateProvider for HttpTemplateProvider {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch_all(&self) -> Result<Vec<RemoteTemplate>> {
        let mut templates = Vec::new();
        let mut next = Some(format!(
            "{}?limit={}&fields=id,name,status,category,language,rejected_reason,components",
            self.templates_url(),
            self.config.page_size
        ));
        let mut pages = 0;

        while let Some(url) = next.take() {
            pages += 1;
            if pages > MAX_PAGES {
                tracing::warn!(pages = MAX_PAGES, "stopping template pagination early");
                break;
            }
            let response = self
                .client
                .get(&url)
                .bearer_auth(&self.config.access_token)
                .send()
                .await
                .map_err(|e| {
                    SyncError::RemoteUnavailable(format!("Template list request failed: {}", e))
                })?;
            let body = Self::read_body(response)
                .await?
                .map_err(SyncError::RemoteUnavailable)?;
            let page: WireTemplateList = serde_json::from_str(&body).map_err(|e| {
                SyncError::RemoteUnavailable(format!("Malformed template list: {}", e))
            })?;
            templates.extend(page.data.into_iter().map(WireTemplate::into_remote));
            next = page.paging.and_then(|p| p.next);
        }

        tracing::debug!(count = templates.len(), pages, "fetched remote templates");
        Ok(templates)
    }

    async fn create(&self, record: &TemplateRecord) -> Result<CreateOutcome> {
        let requested = normalize_template_name(&record.name);
        let request = WireCreateRequest {
            name: &requested,
            language: &record.language,
            category: record.category.as_remote_str(),
            components: vec![WireComponent::body(record)],
        };

        let response = self
            .client
            .post(self.templates_url())
            .bearer_auth(&self.config.access_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| SyncError::RemoteUnavailable(format!("Create request failed: {}", e)))?;

        match Self::read_body(response).await? {
            Ok(body) => {
                let created: WireCreateResponse = serde_json::from_str(&body).map_err(|e| {
                    SyncError::RemoteUnavailable(format!("Malformed create response: {}", e))
                })?;
                let mut outcome =
                    CreateOutcome::created(created.name.unwrap_or(requested), created.id);
                if let Some(status) = created.status.as_deref() {
                    outcome.status = Some(TemplateStatus::from_remote(status));
                }
                Ok(outcome)
            }
            Err(message) => Ok(CreateOutcome::rejected(message)),
        }
    }

    async fn edit(&self, id: &str, record: &TemplateRecord) -> Result<RemoteAck> {
        let request = WireEditRequest {
            category: record.category.as_remote_str(),
            components: vec![WireComponent::body(record)],
        };

        let response = self
            .client
            .post(self.template_url(id))
            .bearer_auth(&self.config.access_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| SyncError::RemoteUnavailable(format!("Edit request failed: {}", e)))?;

        ack_from(Self::read_body(response).await?)
    }

    async fn delete(&self, name: &str) -> Result<RemoteAck> {
        let response = self
            .client
            .delete(self.templates_url())
            .query(&[("name", name)])
            .bearer_auth(&self.config.access_token)
            .send()
            .await
            .map_err(|e| SyncError::RemoteUnavailable(format!("Delete request failed: {}", e)))?;

        ack_from(Self::read_body(response).await?)
    }
}

fn ack_from(body: std::result::Result<String, String>) -> Result<RemoteAck> {
    match body {
        Ok(body) => {
            let parsed: WireSuccessResponse = serde_json::from_str(&body).map_err(|e| {
                SyncError::RemoteUnavailable(format!("Malformed response: {}", e))
            })?;
            if parsed.success {
                Ok(RemoteAck::ok())
            } else {
                Ok(RemoteAck::rejected("provider reported success=false"))
            }
        }
        Err(message) => Ok(RemoteAck::rejected(message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::REQUIRED_TEMPLATES;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> HttpTemplateProvider {
        let config = HttpProviderConfig::new("waba-1", "token-123")
            .with_base_url(server.uri())
            .with_page_size(2);
        HttpTemplateProvider::new(config).unwrap()
    }

    #[test]
    fn test_normalize_template_name() {
        assert_eq!(normalize_template_name("Festive Offer 2024"), "festive_offer_2024");
        assert_eq!(normalize_template_name("  order--ready!! "), "order_ready");
        assert_eq!(normalize_template_name("setu_payment_button"), "setu_payment_button");
    }

    #[tokio::test]
    async fn test_fetch_all_follows_paging() {
        let server = MockServer::start().await;
        let second_page = format!("{}/page-2", server.uri());

        Mock::given(method("GET"))
            .and(path("/waba-1/message_templates"))
            .and(header("authorization", "Bearer token-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{
                    "id": "101",
                    "name": "order_shipped",
                    "status": "APPROVED",
                    "category": "UTILITY",
                    "language": "en",
                    "rejected_reason": "NONE",
                    "components": [
                        {"type": "BODY", "text": "Shipped {{1}}", "example": {"body_text": [["ORD-1"]]}},
                        {"type": "BUTTONS", "buttons": [{"type": "URL", "text": "Track", "url": "https://t.example/{{1}}"}]}
                    ]
                }],
                "paging": {"next": second_page}
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/page-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{
                    "id": "102",
                    "name": "festive_offer",
                    "status": "REJECTED",
                    "category": "MARKETING",
                    "language": "en",
                    "rejected_reason": "INVALID_FORMAT",
                    "components": [{"type": "BODY", "text": "Sale!"}]
                }]
            })))
            .mount(&server)
            .await;

        let templates = provider(&server).fetch_all().await.unwrap();

        assert_eq!(templates.len(), 2);
        assert_eq!(templates[0].body_text(), "Shipped {{1}}");
        assert_eq!(templates[0].body_examples(), ["ORD-1".to_string()]);
        assert!(templates[0].rejection_reason.is_none());
        assert_eq!(templates[0].structure().buttons.len(), 1);
        assert_eq!(templates[1].status, TemplateStatus::Rejected);
        assert_eq!(templates[1].category, TemplateCategory::Marketing);
        assert_eq!(templates[1].rejection_reason.as_deref(), Some("INVALID_FORMAT"));
    }

    #[tokio::test]
    async fn test_fetch_all_http_error_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = provider(&server).fetch_all().await.unwrap_err();
        assert!(matches!(err, SyncError::RemoteUnavailable(_)));
    }

    #[tokio::test]
    async fn test_create_sends_examples_and_returns_final_name() {
        let server = MockServer::start().await;
        let record = REQUIRED_TEMPLATES[0].seed_record();

        Mock::given(method("POST"))
            .and(path("/waba-1/message_templates"))
            .and(body_partial_json(serde_json::json!({
                "name": "setu_payment_button",
                "category": "UTILITY",
                "components": [{
                    "type": "BODY",
                    "example": {"body_text": [["Priya", "45,000", "ORD-1042"]]}
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "555",
                "status": "PENDING",
                "category": "UTILITY"
            })))
            .mount(&server)
            .await;

        let outcome = provider(&server).create(&record).await.unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.final_name.as_deref(), Some("setu_payment_button"));
        assert_eq!(outcome.id.as_deref(), Some("555"));
        assert_eq!(outcome.status, Some(TemplateStatus::Pending));
    }

    #[tokio::test]
    async fn test_create_rejection_carries_provider_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {
                    "message": "Invalid parameter",
                    "error_user_msg": "Variables can't be at the start or end of the template."
                }
            })))
            .mount(&server)
            .await;

        let outcome = provider(&server)
            .create(&REQUIRED_TEMPLATES[1].seed_record())
            .await
            .unwrap();
        assert!(!outcome.success);
        assert_eq!(
            outcome.error.as_deref(),
            Some("Variables can't be at the start or end of the template.")
        );
    }

    #[tokio::test]
    async fn test_edit_posts_to_template_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/777"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let ack = provider(&server)
            .edit("777", &REQUIRED_TEMPLATES[3].seed_record())
            .await
            .unwrap();
        assert!(ack.success);
    }

    #[tokio::test]
    async fn test_delete_by_name() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/waba-1/message_templates"))
            .and(query_param("name", "old_promo"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})),
            )
            .mount(&server)
            .await;

        let ack = provider(&server).delete("old_promo").await.unwrap();
        assert!(ack.success);
    }
}
