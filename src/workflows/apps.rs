use super::WorkflowEnv;
use crate::api::ApiError;
use serde::Deserialize;
use serde_json::json;

const LIST_APPS_QUERY: &str = r#"
query listApps {
  listApps {
    kotsApps {
      id
      slug
      name
      isAirgap
      currentSequence
    }
  }
}
"#;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSummary {
    pub slug: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_airgap: bool,
    #[serde(default)]
    pub current_sequence: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListAppsData {
    list_apps: AppGroups,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppGroups {
    #[serde(default)]
    kots_apps: Vec<AppSummary>,
}

pub fn list_apps(env: &WorkflowEnv) -> Result<Vec<AppSummary>, ApiError> {
    let data: ListAppsData = env.api.graphql(LIST_APPS_QUERY, json!({}))?;
    Ok(data.list_apps.kots_apps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_apps_payload_decodes() {
        let data: ListAppsData = serde_json::from_str(
            r#"{"listApps":{"kotsApps":[{"id":"1","slug":"acme-app","name":"Acme","isAirgap":true,"currentSequence":4}]}}"#,
        )
        .expect("json");
        assert_eq!(data.list_apps.kots_apps.len(), 1);
        let app = &data.list_apps.kots_apps[0];
        assert_eq!(app.slug, "acme-app");
        assert!(app.is_airgap);
        assert_eq!(app.current_sequence, Some(4));
    }
}
