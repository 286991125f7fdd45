use crate::config::Settings;
use crate::session::SessionContext;
use crate::shared::errors::ApiError;
use crate::shared::logging::append_console_log;
use crate::state::StatePaths;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const ERROR_BODY_MAX_CHARS: usize = 200;

/// `{success, error?}` body returned by action endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ActionResponse {
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

fn default_true() -> bool {
    true
}

impl ActionResponse {
    pub fn into_result(self, action: &str) -> Result<(), ApiError> {
        let error = self.error.filter(|message| !message.trim().is_empty());
        if self.success && error.is_none() {
            return Ok(());
        }
        Err(ApiError::Action {
            action: action.to_string(),
            message: error.unwrap_or_else(|| "backend reported failure".to_string()),
        })
    }
}

#[derive(Debug, Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    api_base: String,
    graphql_endpoint: String,
    agent: ureq::Agent,
    session: Arc<SessionContext>,
    paths: StatePaths,
}

impl ApiClient {
    pub fn new(settings: &Settings, session: Arc<SessionContext>, paths: StatePaths) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(settings.request_timeout())
            .user_agent(concat!("admin-console/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            api_base: settings.api_base(),
            graphql_endpoint: settings.resolve_graphql_endpoint(),
            agent,
            session,
            paths,
        }
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    pub fn paths(&self) -> &StatePaths {
        &self.paths
    }

    pub(crate) fn graphql_endpoint(&self) -> &str {
        &self.graphql_endpoint
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }

    pub fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        let response = self.send("GET", &url, None)?;
        read_json(&url, response)
    }

    pub fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        let body = encode_body(&url, body)?;
        let response = self.send("POST", &url, Some(body))?;
        read_json(&url, response)
    }

    pub fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        let body = encode_body(&url, body)?;
        let response = self.send("PUT", &url, Some(body))?;
        read_json(&url, response)
    }

    pub fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        let response = self.send("DELETE", &url, None)?;
        read_json(&url, response)
    }

    pub(crate) fn send(
        &self,
        method: &str,
        url: &str,
        body: Option<serde_json::Value>,
    ) -> Result<ureq::Response, ApiError> {
        let mut request = self
            .agent
            .request(method, url)
            .set("Accept", "application/json");
        if let Some(token) = self.session.token() {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }

        let result = match body {
            Some(body) => request.send_json(body),
            None => request.call(),
        };

        let err = match result {
            Ok(response) => return Ok(response),
            Err(ureq::Error::Status(401, _)) => ApiError::Unauthorized {
                url: url.to_string(),
            },
            Err(ureq::Error::Status(status, response)) => ApiError::Status {
                url: url.to_string(),
                status,
                message: error_message(status, response),
            },
            Err(ureq::Error::Transport(transport)) => ApiError::Transport {
                url: url.to_string(),
                reason: transport.to_string(),
            },
        };
        append_console_log(
            &self.paths,
            "warn",
            "api.request.failed",
            &format!("method={method} {err}"),
        );
        if err.is_unauthorized() {
            self.session.logout(&format!("{method} {url} returned 401"));
        }
        Err(err)
    }
}

fn encode_body<B: Serialize>(url: &str, body: &B) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Encode {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

// Action endpoints sometimes answer 2xx with an empty body.
fn read_json<T: DeserializeOwned>(url: &str, response: ureq::Response) -> Result<T, ApiError> {
    let raw = response.into_string().map_err(|e| ApiError::Decode {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    let raw = if raw.trim().is_empty() { "{}" } else { raw.as_str() };
    serde_json::from_str(raw).map_err(|e| ApiError::Decode {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

fn error_message(status: u16, response: ureq::Response) -> String {
    let status_text = response.status_text().to_string();
    let raw = response.into_string().unwrap_or_default();
    if let Ok(body) = serde_json::from_str::<ErrorBody>(&raw) {
        if let Some(message) = body
            .error
            .or(body.message)
            .filter(|message| !message.trim().is_empty())
        {
            return message;
        }
    }
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return format!("{status} {status_text}");
    }
    trimmed.chars().take(ERROR_BODY_MAX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_response_success_without_error_is_ok() {
        let response: ActionResponse = serde_json::from_str(r#"{"success":true}"#).expect("json");
        assert!(response.into_result("drain node").is_ok());

        let empty: ActionResponse = serde_json::from_str("{}").expect("json");
        assert!(empty.into_result("drain node").is_ok());
    }

    #[test]
    fn action_response_failure_carries_backend_error() {
        let response: ActionResponse =
            serde_json::from_str(r#"{"success":false,"error":"license is expired"}"#)
                .expect("json");
        let err = response.into_result("sync license").expect_err("failure");
        assert_eq!(err.to_string(), "sync license failed: license is expired");
    }

    #[test]
    fn action_response_failure_without_message_uses_generic_text() {
        let response: ActionResponse =
            serde_json::from_str(r#"{"success":false}"#).expect("json");
        let err = response.into_result("start backup").expect_err("failure");
        assert!(err.to_string().contains("backend reported failure"));
    }
}
