//! HTTP client for the organization API
//!
//! Request bodies are validated against the same schemas the forms use
//! before anything goes over the wire.

use super::error::{ApiError, ErrorBody, IDENTITY_PATH};
use super::traits::ApiClientTrait;
use crate::state::forms::{schemas, FieldValue, FormSchema, FormValues, InviteScope};
use crate::state::{Member, Organization, Page, PaginationQuery, User};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::time::Duration;

/// Default API address
pub const DEFAULT_ADDRESS: &str = "http://127.0.0.1:4000";

/// Client for the organization API
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    client: Client,
    base_url: String,
}

impl HttpApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: build_client(
                Client::builder()
                    .timeout(Duration::from_secs(30))
                    .connect_timeout(Duration::from_secs(5)),
            ),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{}", self.base_url, path))
    }

    /// Send and decode a JSON response, mapping failures at the boundary
    async fn send<T: DeserializeOwned>(&self, path: &str, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.execute(path, request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::from_response(502, path, error_body(format!("Invalid response: {e}"))))
    }

    async fn execute(&self, path: &str, request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        tracing::debug!("API request {path}");
        let response = request.send().await.map_err(|e| {
            tracing::warn!("API request {path} failed: {e}");
            ApiError::unreachable(path, format!("Failed to reach the server: {e}"))
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.json::<ErrorBody>().await.unwrap_or_default();
        if path != IDENTITY_PATH {
            tracing::warn!("API request {path} returned {status}");
        }
        Err(ApiError::from_response(status.as_u16(), path, body))
    }
}

fn error_body(message: String) -> ErrorBody {
    ErrorBody {
        error: Some(message),
        ..Default::default()
    }
}

/// Validate form values and turn them into a JSON body.
/// Blank optional fields are left out of the body.
pub fn request_body(schema: &FormSchema, values: &FormValues) -> Result<Map<String, Value>, ApiError> {
    schema.validate(values)?;
    let mut body = Map::new();
    for spec in schema.fields() {
        let value = values.value(spec.name);
        if spec.optional && value.is_blank() {
            continue;
        }
        let json = match value {
            FieldValue::Empty => Value::Null,
            FieldValue::Text(text) => Value::String(text.clone()),
            FieldValue::List(items) => Value::Array(items.iter().cloned().map(Value::String).collect()),
        };
        body.insert(camel_case(spec.name), json);
    }
    Ok(body)
}

fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[async_trait]
impl ApiClientTrait for HttpApiClient {
    async fn get_me(&self) -> Result<User, ApiError> {
        self.send(IDENTITY_PATH, self.request(Method::GET, IDENTITY_PATH))
            .await
    }

    async fn create_organization(&self, values: &FormValues) -> Result<Organization, ApiError> {
        let body = request_body(&schemas::create_organization(), values)?;
        let path = "/organizations";
        self.send(path, self.request(Method::POST, path).json(&body))
            .await
    }

    async fn invite(
        &self,
        values: &FormValues,
        organization: Option<String>,
    ) -> Result<(), ApiError> {
        let scope = if organization.is_some() {
            InviteScope::Organization
        } else {
            InviteScope::System
        };
        let mut body = request_body(&schemas::invite_users(scope), values)?;
        if let Some(organization) = organization {
            body.insert("organizationIdentifier".to_string(), Value::String(organization));
        }
        let path = "/invite";
        self.execute(path, self.request(Method::POST, path).json(&body))
            .await
            .map(|_| ())
    }

    async fn update_user(&self, user_id: &str, values: &FormValues) -> Result<User, ApiError> {
        let body = request_body(&schemas::update_user(), values)?;
        let path = format!("/users/{user_id}");
        self.send(&path, self.request(Method::PUT, &path).json(&body))
            .await
    }

    async fn get_organization(&self, id_or_slug: &str) -> Result<Organization, ApiError> {
        let path = format!("/organizations/{id_or_slug}");
        self.send(&path, self.request(Method::GET, &path)).await
    }

    async fn list_members(
        &self,
        organization: &str,
        query: &PaginationQuery,
    ) -> Result<Page<Member>, ApiError> {
        let path = format!("/organizations/{organization}/members");
        let request = self
            .request(Method::GET, &path)
            .query(&query.to_query_pairs());
        self.send(&path, request).await
    }
}

/// Build the HTTP client, falling back to reqwest defaults (no timeouts)
fn build_client(builder: ClientBuilder) -> Client {
    builder.build().unwrap_or_else(|e| {
        tracing::warn!("Falling back to a default HTTP client without timeouts: {e}");
        Client::new()
    })
}
