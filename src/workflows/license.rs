//! License upload and sync.
//!
//! Uploaded YAML is checked locally before anything reaches the backend, so a
//! malformed file never costs a round-trip.

use super::WorkflowEnv;
use crate::api::{ActionResponse, ApiError};
use crate::shared::ids::AppSlug;
use serde::Deserialize;
use serde_json::json;
use std::fs;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum LicenseError {
    #[error("failed to read license file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("license is not valid YAML: {0}")]
    Parse(#[source] serde_yaml::Error),
    #[error("license must be a YAML document with `kind: License`{0}")]
    NotALicense(String),
    #[error("license is missing required field `{0}`")]
    MissingField(&'static str),
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseSummary {
    pub app_slug: String,
    pub license_id: String,
    pub channel_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LicenseUploadResult {
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LicenseSyncResult {
    #[serde(default)]
    pub synced: bool,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(flatten)]
    action: ActionResponse,
    #[serde(flatten)]
    result: LicenseUploadResult,
}

#[derive(Debug, Deserialize)]
struct SyncResponse {
    #[serde(flatten)]
    action: ActionResponse,
    #[serde(flatten)]
    result: LicenseSyncResult,
}

pub fn validate_license_yaml(raw: &str) -> Result<LicenseSummary, LicenseError> {
    let document: serde_yaml::Value = serde_yaml::from_str(raw).map_err(LicenseError::Parse)?;
    let serde_yaml::Value::Mapping(mapping) = &document else {
        return Err(LicenseError::NotALicense(String::new()));
    };

    let kind = mapping.get("kind").and_then(serde_yaml::Value::as_str);
    if kind != Some("License") {
        let found = kind
            .map(|kind| format!(", found `kind: {kind}`"))
            .unwrap_or_default();
        return Err(LicenseError::NotALicense(found));
    }

    let spec = mapping.get("spec");
    let field = |name: &str| {
        spec.and_then(|spec| spec.get(name))
            .and_then(serde_yaml::Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };

    Ok(LicenseSummary {
        app_slug: field("appSlug").ok_or(LicenseError::MissingField("spec.appSlug"))?,
        license_id: field("licenseID").ok_or(LicenseError::MissingField("spec.licenseID"))?,
        channel_name: field("channelName"),
    })
}

pub fn read_license_file(path: &Path) -> Result<(String, LicenseSummary), LicenseError> {
    let raw = fs::read_to_string(path).map_err(|source| LicenseError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let summary = validate_license_yaml(&raw)?;
    Ok((raw, summary))
}

pub fn upload_license(env: &WorkflowEnv, raw: &str) -> Result<LicenseUploadResult, LicenseError> {
    validate_license_yaml(raw)?;
    let response: UploadResponse = env
        .api
        .post_json("license", &json!({ "licenseData": raw }))?;
    response.action.into_result("upload license")?;
    Ok(response.result)
}

pub fn sync_license(env: &WorkflowEnv, slug: &AppSlug) -> Result<LicenseSyncResult, LicenseError> {
    let response: SyncResponse = env.api.put_json(
        &format!("app/{}/license", slug.as_path_segment()),
        &json!({ "licenseData": "" }),
    )?;
    response.action.into_result("sync license")?;
    Ok(response.result)
}
