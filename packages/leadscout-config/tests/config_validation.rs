use leadscout_config::{Config, Error, validate};

const BASE: &str = r#"
[service]
log_level = "info"

[providers.nlu]
provider_id = "openai"
api_base    = "https://api.openai.com"
api_key     = "sk-test"
path        = "/v1/chat/completions"
model       = "gpt-4o-mini"
temperature = 0.0
timeout_ms  = 30000

[providers.people_search]
provider_id  = "apollo"
api_base     = "https://api.apollo.io"
api_key      = "ap-test"
search_path  = "/v1/mixed_people/search"
resolve_path = "/v1/organizations/enrich"
timeout_ms   = 30000

[search]
default_per_page = 25
max_per_page     = 100
"#;

fn base_config() -> Config {
	toml::from_str(BASE).expect("base config failed to parse")
}

#[test]
fn base_config_is_valid_with_policy_defaults() {
	let cfg = base_config();

	validate(&cfg).expect("validation failed");

	assert_eq!(cfg.search.broadening.min_results, 5);
	assert_eq!(cfg.search.broadening.target_results, 10);
	assert_eq!(cfg.search.broadening.max_attempts, 5);
	assert_eq!(cfg.search.result_cache.ttl_secs, 600);
	assert_eq!(cfg.search.provider_cache.ttl_secs, 900);
	assert_eq!(cfg.search.sessions.ttl_secs, 3_600);
	assert_eq!(cfg.icp.min_confidence, 0.2);
	assert_eq!(cfg.icp.neutral_score, 50.0);
}

#[test]
fn empty_api_keys_are_rejected() {
	let mut cfg = base_config();

	cfg.providers.people_search.api_key = " ".to_string();

	assert!(matches!(validate(&cfg), Err(Error::Validation { .. })));
}

#[test]
fn per_page_bounds_must_be_consistent() {
	let mut cfg = base_config();

	cfg.search.max_per_page = 10;

	let err = validate(&cfg).expect_err("validation should fail");

	assert!(err.to_string().contains("max_per_page"));
}

#[test]
fn broadening_targets_must_not_undershoot_the_minimum() {
	let mut cfg = base_config();

	cfg.search.broadening.target_results = 2;

	assert!(matches!(validate(&cfg), Err(Error::Validation { .. })));
}

#[test]
fn zero_attempt_budgets_are_rejected() {
	let mut cfg = base_config();

	cfg.search.broadening.max_attempts = 0;

	assert!(matches!(validate(&cfg), Err(Error::Validation { .. })));
}

#[test]
fn icp_policy_values_must_stay_in_range() {
	let mut cfg = base_config();

	cfg.icp.min_confidence = 1.5;

	assert!(matches!(validate(&cfg), Err(Error::Validation { .. })));

	let mut cfg = base_config();

	cfg.icp.neutral_score = -1.0;

	assert!(matches!(validate(&cfg), Err(Error::Validation { .. })));
}

#[test]
fn non_positive_cache_ttls_are_rejected() {
	let mut cfg = base_config();

	cfg.search.result_cache.ttl_secs = 0;

	assert!(matches!(validate(&cfg), Err(Error::Validation { .. })));
}

#[test]
fn non_positive_session_ttls_are_rejected() {
	let mut cfg = base_config();

	cfg.search.sessions.ttl_secs = 0;

	let err = validate(&cfg).expect_err("validation should fail");

	assert!(err.to_string().contains("sessions.ttl_secs"));
}
