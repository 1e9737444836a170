//! Failures of loading and saving configuration files.

use thiserror::Error;

/// Why a configuration file could not be loaded. The current graph is never
/// touched when one of these is returned.
#[derive(Debug, Error)]
pub enum ImportError {
	/// The browser failed to read the picked file.
	#[error("could not read file: {0}")]
	Read(String),
	/// Not JSON at all.
	#[error("file is not valid JSON: {0}")]
	Parse(#[source] serde_json::Error),
	/// `nodes` or `edges` is absent or null.
	#[error("document has no `{0}` field")]
	MissingField(&'static str),
	/// JSON, but nodes or edges have the wrong shape.
	#[error("document does not describe a topology: {0}")]
	Shape(#[source] serde_json::Error),
}

/// Why a save did not produce a download.
#[derive(Debug, Error)]
pub enum ExportError {
	/// The graph could not be written as JSON.
	#[error("could not serialize topology: {0}")]
	Serialize(#[from] serde_json::Error),
	#[error("could not start download: {0}")]
	/// Blob, object URL or anchor creation failed.
	Download(String),
}
