use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};
use leadscout_config::PeopleSearchProviderConfig;

/// Executes a provider-native search body against the people-search API and
/// returns the raw response document. Translation to and from the provider's
/// shape lives with the caller; this adapter only moves bytes.
pub async fn search(cfg: &PeopleSearchProviderConfig, body: &Value) -> Result<Value> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.search_path);
	let res = client
		.post(&url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	if !json.is_object() {
		return Err(Error::InvalidResponse {
			message: "People-search response is not a JSON object.".to_string(),
		});
	}

	Ok(json)
}

/// Resolves a company name to its primary domain, or `None` when the provider
/// has no match.
pub async fn resolve_domain(
	cfg: &PeopleSearchProviderConfig,
	company: &str,
) -> Result<Option<String>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.resolve_path);
	let body = serde_json::json!({ "name": company });
	let res = client
		.post(&url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;
	let domain = json
		.get("domain")
		.and_then(|v| v.as_str())
		.map(str::trim)
		.filter(|domain| !domain.is_empty())
		.map(str::to_string);

	Ok(domain)
}
