//! Error and warning types for channel configuration.

use std::fmt;
use std::path::PathBuf;

use statusext_registry::RegistryError;
use thiserror::Error;

/// Errors that prevent a configuration from loading.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or structure.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A `[[channel]]` entry has an empty or blank name.
	#[error("channel #{position} has an empty name")]
	EmptyChannelName {
		/// One-based position of the entry in the file.
		position: usize,
	},

	/// A `[host] natives` entry is empty or blank.
	#[error("native channel #{position} has an empty name")]
	EmptyNativeName {
		/// One-based position in the `natives` list.
		position: usize,
	},

	/// The registry rejected a declared channel.
	#[error("registration failed: {0}")]
	Registry(#[from] RegistryError),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Non-fatal problem found while validating a configuration.
///
/// Collected in [`StatusConfig::warnings`](crate::StatusConfig::warnings); the
/// configuration still loads with the offending value corrected or dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigWarning {
	/// A cap was negative or NaN and has been clamped.
	CapClamped {
		/// Channel the cap belongs to.
		name: String,
		/// Value as written.
		original: f32,
		/// Value used instead.
		clamped: f32,
	},
	/// A channel name repeats an earlier one, ignoring case. The first entry is kept.
	DuplicateChannel {
		/// Name of the dropped entry.
		name: String,
		/// Spelling of the entry that was kept.
		kept: String,
	},
	/// A native name repeats an earlier one, ignoring case. The first entry is kept.
	DuplicateNative {
		/// Name of the dropped entry.
		name: String,
	},
	/// A channel is named like a native channel and will resolve to the native slot.
	ShadowsNative {
		/// Channel name.
		name: String,
	},
	/// `native_caps` names a channel missing from `natives`.
	UnknownNativeCap {
		/// Key as written.
		name: String,
		/// Closest native name, if any.
		suggestion: Option<String>,
	},
}

impl fmt::Display for ConfigWarning {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::CapClamped { name, original, clamped } => {
				write!(f, "cap {original} of '{name}' is invalid; using {clamped}")
			}
			Self::DuplicateChannel { name, kept } => {
				write!(f, "channel '{name}' duplicates '{kept}' and will be ignored")
			}
			Self::DuplicateNative { name } => write!(f, "native channel '{name}' is listed twice"),
			Self::ShadowsNative { name } => {
				write!(f, "channel '{name}' is named like a native channel and resolves to it")
			}
			Self::UnknownNativeCap { name, suggestion } => {
				write!(f, "native_caps names unknown channel '{name}'")?;
				if let Some(s) = suggestion {
					write!(f, " (did you mean '{s}'?)")?;
				}
				Ok(())
			}
		}
	}
}
