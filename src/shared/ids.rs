use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

pub fn validate_resource_name(kind: &str, value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{kind} must be non-empty"));
    }
    if value.starts_with('.') || value.starts_with('-') {
        return Err(format!("{kind} must start with a letter or digit"));
    }
    if value
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.')
    {
        return Ok(());
    }
    Err(format!(
        "{kind} must use only ASCII letters, digits, '-', '_' or '.'"
    ))
}

macro_rules! define_name_type {
    ($name:ident, $kind:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn parse(raw: &str) -> Result<Self, String> {
                let trimmed = raw.trim();
                validate_resource_name($kind, trimmed)?;
                Ok(Self(trimmed.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Percent-encoded form for use as a single URL path segment.
            pub fn as_path_segment(&self) -> String {
                urlencoding::encode(&self.0).into_owned()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::parse(&raw).map_err(|err| {
                    D::Error::custom(format!("invalid {} `{}`: {}", $kind, raw, err))
                })
            }
        }
    };
}

define_name_type!(AppSlug, "app slug");
define_name_type!(BackupName, "backup name");
define_name_type!(NodeName, "node name");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed_and_validated() {
        let slug = AppSlug::parse("  sentry-pro ").expect("slug");
        assert_eq!(slug.as_str(), "sentry-pro");

        let err = AppSlug::parse("has space").expect_err("space must be rejected");
        assert!(err.contains("app slug"), "unexpected error: {err}");
        assert!(NodeName::parse("").is_err());
        assert!(NodeName::parse("-leading").is_err());
    }

    #[test]
    fn node_names_accept_dotted_hostnames() {
        let node = NodeName::parse("worker-1.internal").expect("node name");
        assert_eq!(node.as_path_segment(), "worker-1.internal");
    }

    #[test]
    fn deserialize_reports_kind_and_raw_value() {
        let err = serde_json::from_str::<BackupName>("\"bad/name\"").expect_err("invalid");
        assert!(
            err.to_string().contains("invalid backup name `bad/name`"),
            "unexpected error: {err}"
        );
    }
}
