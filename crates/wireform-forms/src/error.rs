//! Error types for form binding.

use wireform_core::MountError;

/// Errors produced while serializing or re-rendering a bound form.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
	/// The bound data does not serialize to a JSON object, so it has no
	/// properties fields could bind to.
	#[error("form data must serialize to a JSON object")]
	NotAnObject,
	/// Converting between the bound data and its JSON form failed.
	#[error("form data codec error: {0}")]
	Codec(#[from] serde_json::Error),
	/// Mounting a re-rendered view failed.
	#[error(transparent)]
	Mount(#[from] MountError),
	/// An `after_serialize` hook rejected the data.
	#[error("form hook rejected data: {0}")]
	Hook(String),
}

/// Result alias for form operations.
pub type FormResult<T> = Result<T, FormError>;
