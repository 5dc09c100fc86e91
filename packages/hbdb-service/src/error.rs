use hbdb_domain::InvalidField;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	Validation { field: Option<String>, message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<InvalidField> for Error {
	fn from(err: InvalidField) -> Self {
		Self::Validation { field: Some(err.field.to_string()), message: err.message }
	}
}

impl From<hbdb_storage::Error> for Error {
	fn from(err: hbdb_storage::Error) -> Self {
		match err {
			hbdb_storage::Error::InvalidArgument(message) =>
				Self::Validation { field: None, message },
			hbdb_storage::Error::NotFound(message) => Self::NotFound { message },
			other => Self::Storage { message: other.to_string() },
		}
	}
}
