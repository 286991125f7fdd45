use super::ApiClient;
use crate::shared::errors::ApiError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct GraphQlEnvelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

impl ApiClient {
    /// Runs a query or mutation against the GraphQL endpoint.
    ///
    /// A non-empty `errors` array fails the call even when partial `data` is present.
    pub fn graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, ApiError> {
        let url = self.graphql_endpoint().to_string();
        let body = json!({
            "query": query,
            "variables": variables,
        });
        let response = self.send("POST", &url, Some(body))?;
        let envelope = response
            .into_json::<GraphQlEnvelope<T>>()
            .map_err(|e| ApiError::Decode {
                url: url.clone(),
                reason: e.to_string(),
            })?;
        if !envelope.errors.is_empty() {
            let messages = envelope
                .errors
                .iter()
                .map(|err| err.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ApiError::GraphQl(messages));
        }
        envelope
            .data
            .ok_or_else(|| ApiError::GraphQl("response contained no data".to_string()))
    }
}
