use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use shared::{
    error::server_message,
    protocol::{FlagUpdate, Resource, StatusFlag},
};
use tracing::{debug, warn};
use url::Url;

use crate::{error::ConsoleError, session::SessionProvider};

/// The admin REST API. Bodies are returned raw; callers normalise them with
/// [`crate::envelope`].
#[async_trait]
pub trait AdminBackend: Send + Sync {
    async fn get_all(&self, resource: Resource) -> Result<Value, ConsoleError>;
    async fn get_one(&self, resource: Resource, id: &str) -> Result<Value, ConsoleError>;
    async fn create(&self, resource: Resource, body: &Value) -> Result<Value, ConsoleError>;
    async fn update(&self, resource: Resource, body: &Value) -> Result<Value, ConsoleError>;
    async fn delete(&self, resource: Resource, id: &str) -> Result<Value, ConsoleError>;
    async fn set_flag(
        &self,
        resource: Resource,
        flag: StatusFlag,
        update: &FlagUpdate,
    ) -> Result<Value, ConsoleError>;
}

#[async_trait]
impl<T> AdminBackend for Arc<T>
where
    T: AdminBackend + ?Sized,
{
    async fn get_all(&self, resource: Resource) -> Result<Value, ConsoleError> {
        (**self).get_all(resource).await
    }

    async fn get_one(&self, resource: Resource, id: &str) -> Result<Value, ConsoleError> {
        (**self).get_one(resource, id).await
    }

    async fn create(&self, resource: Resource, body: &Value) -> Result<Value, ConsoleError> {
        (**self).create(resource, body).await
    }

    async fn update(&self, resource: Resource, body: &Value) -> Result<Value, ConsoleError> {
        (**self).update(resource, body).await
    }

    async fn delete(&self, resource: Resource, id: &str) -> Result<Value, ConsoleError> {
        (**self).delete(resource, id).await
    }

    async fn set_flag(
        &self,
        resource: Resource,
        flag: StatusFlag,
        update: &FlagUpdate,
    ) -> Result<Value, ConsoleError> {
        (**self).set_flag(resource, flag, update).await
    }
}

pub struct HttpBackend {
    http: Client,
    base_url: Url,
    session: Arc<dyn SessionProvider>,
}

impl HttpBackend {
    pub fn new(base_url: &str, session: Arc<dyn SessionProvider>) -> Result<Self, ConsoleError> {
        Self::with_client(Client::new(), base_url, session)
    }

    pub fn with_timeout(
        base_url: &str,
        session: Arc<dyn SessionProvider>,
        timeout: Duration,
    ) -> Result<Self, ConsoleError> {
        let http = Client::builder().timeout(timeout).build()?;
        Self::with_client(http, base_url, session)
    }

    pub fn with_client(
        http: Client,
        base_url: &str,
        session: Arc<dyn SessionProvider>,
    ) -> Result<Self, ConsoleError> {
        let base_url =
            Url::parse(base_url).map_err(|err| ConsoleError::InvalidBaseUrl(err.to_string()))?;
        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub fn session(&self) -> &Arc<dyn SessionProvider> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.as_str().trim_end_matches('/'))
    }

    async fn send(
        &self,
        resource: Resource,
        method: Method,
        path: String,
        body: Option<&Value>,
    ) -> Result<Value, ConsoleError> {
        let token = self.session.token().ok_or(ConsoleError::MissingSession)?;

        debug!(resource = resource.segment, method = %method, path = %path, "admin api request");
        let mut request = self.http.request(method, self.url(&path)).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = server_message(status.as_u16(), &text);
            warn!(resource = resource.segment, status = status.as_u16(), "admin api request rejected");
            return Err(ConsoleError::Server {
                status: status.as_u16(),
                message,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|_| ConsoleError::UnexpectedShape {
            resource: resource.segment.to_string(),
        })
    }
}

#[async_trait]
impl AdminBackend for HttpBackend {
    async fn get_all(&self, resource: Resource) -> Result<Value, ConsoleError> {
        self.send(resource, Method::GET, resource.list_path(), None)
            .await
    }

    async fn get_one(&self, resource: Resource, id: &str) -> Result<Value, ConsoleError> {
        self.send(resource, Method::GET, resource.record_path(id), None)
            .await
    }

    async fn create(&self, resource: Resource, body: &Value) -> Result<Value, ConsoleError> {
        self.send(resource, Method::POST, resource.create_path(), Some(body))
            .await
    }

    async fn update(&self, resource: Resource, body: &Value) -> Result<Value, ConsoleError> {
        self.send(resource, Method::PUT, resource.update_path(), Some(body))
            .await
    }

    async fn delete(&self, resource: Resource, id: &str) -> Result<Value, ConsoleError> {
        self.send(resource, Method::DELETE, resource.delete_path(id), None)
            .await
    }

    async fn set_flag(
        &self,
        resource: Resource,
        flag: StatusFlag,
        update: &FlagUpdate,
    ) -> Result<Value, ConsoleError> {
        let body = serde_json::to_value(update).map_err(|_| ConsoleError::UnexpectedShape {
            resource: resource.segment.to_string(),
        })?;
        self.send(resource, Method::PUT, resource.flag_path(flag), Some(&body))
            .await
    }
}

#[cfg(test)]
#[path = "tests/backend_tests.rs"]
mod tests;
