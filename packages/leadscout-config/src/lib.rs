mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Broadening, Config, Icp, LlmProviderConfig, PeopleSearchProviderConfig, ProviderCacheConfig,
	Providers, ResultCacheConfig, Search, Service, SessionConfig,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if cfg.search.default_per_page == 0 {
		return Err(Error::Validation {
			message: "search.default_per_page must be greater than zero.".to_string(),
		});
	}
	if cfg.search.max_per_page < cfg.search.default_per_page {
		return Err(Error::Validation {
			message: "search.max_per_page must be at least search.default_per_page.".to_string(),
		});
	}
	if cfg.search.broadening.max_attempts == 0 {
		return Err(Error::Validation {
			message: "search.broadening.max_attempts must be greater than zero.".to_string(),
		});
	}
	if cfg.search.broadening.target_results < cfg.search.broadening.min_results {
		return Err(Error::Validation {
			message: "search.broadening.target_results must be at least search.broadening.min_results."
				.to_string(),
		});
	}
	if cfg.search.result_cache.ttl_secs <= 0 {
		return Err(Error::Validation {
			message: "search.result_cache.ttl_secs must be greater than zero.".to_string(),
		});
	}
	if cfg.search.result_cache.max_entries_per_user == 0 {
		return Err(Error::Validation {
			message: "search.result_cache.max_entries_per_user must be greater than zero."
				.to_string(),
		});
	}
	if cfg.search.result_cache.sweep_interval_secs == 0 {
		return Err(Error::Validation {
			message: "search.result_cache.sweep_interval_secs must be greater than zero."
				.to_string(),
		});
	}
	if cfg.search.provider_cache.ttl_secs <= 0 {
		return Err(Error::Validation {
			message: "search.provider_cache.ttl_secs must be greater than zero.".to_string(),
		});
	}
	if cfg.search.provider_cache.max_entries == 0 {
		return Err(Error::Validation {
			message: "search.provider_cache.max_entries must be greater than zero.".to_string(),
		});
	}
	if cfg.search.sessions.ttl_secs <= 0 {
		return Err(Error::Validation {
			message: "search.sessions.ttl_secs must be greater than zero.".to_string(),
		});
	}
	if !cfg.icp.min_confidence.is_finite() || !(0.0..=1.0).contains(&cfg.icp.min_confidence) {
		return Err(Error::Validation {
			message: "icp.min_confidence must be in the range 0.0-1.0.".to_string(),
		});
	}
	if !cfg.icp.neutral_score.is_finite() || !(0.0..=100.0).contains(&cfg.icp.neutral_score) {
		return Err(Error::Validation {
			message: "icp.neutral_score must be in the range 0.0-100.0.".to_string(),
		});
	}
	if !cfg.providers.nlu.temperature.is_finite() || cfg.providers.nlu.temperature < 0.0 {
		return Err(Error::Validation {
			message: "providers.nlu.temperature must be zero or greater.".to_string(),
		});
	}

	for (label, key) in [
		("nlu", &cfg.providers.nlu.api_key),
		("people_search", &cfg.providers.people_search.api_key),
	] {
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
	}

	Ok(())
}
