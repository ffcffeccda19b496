pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Conflict: {message}")]
	Conflict { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Quota exhausted: {message}")]
	QuotaExhausted { message: String },
	#[error("Internal error: {message}")]
	Internal { message: String },
}

impl From<leadscout_providers::Error> for Error {
	fn from(err: leadscout_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}
