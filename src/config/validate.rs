use super::ConfigError;

pub(crate) fn validate_http_url(field: &str, raw: &str) -> Result<(), ConfigError> {
    let trimmed = raw.trim();
    let Some(rest) = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"))
    else {
        return Err(ConfigError::Settings(format!(
            "`{field}` must be an absolute http:// or https:// URL, got `{raw}`"
        )));
    };
    let host = rest.split('/').next().unwrap_or_default();
    if host.is_empty() {
        return Err(ConfigError::Settings(format!(
            "`{field}` must include a host, got `{raw}`"
        )));
    }
    Ok(())
}

/// `scheme://host[:port]` of an already validated URL.
pub(crate) fn url_origin(raw: &str) -> String {
    let trimmed = raw.trim();
    let scheme_end = trimmed.find("://").map(|idx| idx + 3).unwrap_or(0);
    match trimmed[scheme_end..].find('/') {
        Some(idx) => trimmed[..scheme_end + idx].to_string(),
        None => trimmed.trim_end_matches('/').to_string(),
    }
}
