//! Error types for registration and host adapter failures.

use thiserror::Error;

use crate::host::HolderId;

/// Errors returned by registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
	/// The channel name was empty or whitespace only.
	#[error("status channel name must not be empty")]
	InvalidName,

	/// No native or registered channel answers to this name.
	#[error("unknown status channel: {name:?}")]
	UnknownChannel {
		/// The name that failed to resolve.
		name: String,
	},
}

/// Errors raised by a host while exposing its status storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
	/// The holder has not allocated its value arrays yet.
	#[error("status arrays of holder {holder} are not initialized")]
	Uninitialized {
		/// Holder whose storage was requested.
		holder: HolderId,
	},

	/// The host refused access to its storage.
	#[error("status arrays of holder {holder} are unavailable: {reason}")]
	Unavailable {
		/// Holder whose storage was requested.
		holder: HolderId,
		/// Host-provided explanation.
		reason: String,
	},
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
