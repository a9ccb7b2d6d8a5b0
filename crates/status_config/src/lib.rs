//! Channel declarations loaded from TOML.
//!
//! A configuration file names the host's native channels and the custom channels to
//! register on top of them:
//!
//! ```toml
//! [host]
//! natives = ["Injury", "Hunger", "Fatigue", "Cold", "Poison"]
//! native_caps = { Cold = 2.0 }
//!
//! [[channel]]
//! name = "Thirst"
//! cap = 1.0
//! icon = "icons/thirst.png"
//!
//! [[channel]]
//! name = "Madness"
//! cap = 0.5
//! ```
//!
//! `cap` defaults to `1.0`. Empty names are errors. Negative or NaN caps, duplicate
//! names (ignoring case) and channels shadowing a native are corrected or dropped and
//! reported in [`StatusConfig::warnings`].

pub mod error;

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use statusext_registry::{IconHandle, NativeTable, Registration, Registry, name};
use tracing::warn;

pub use error::{ConfigError, ConfigWarning, Result};

/// Cap used when a channel or native entry does not give one.
pub const DEFAULT_CAP: f32 = 1.0;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
	#[serde(default)]
	host: RawHost,
	#[serde(default)]
	channel: Vec<RawChannel>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawHost {
	#[serde(default)]
	natives: Vec<String>,
	#[serde(default)]
	native_caps: BTreeMap<String, f32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawChannel {
	name: String,
	cap: Option<f32>,
	icon: Option<String>,
}

/// One validated `[[channel]]` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelConfig {
	/// Channel name as written.
	pub name: String,
	/// Maximum value, never negative.
	pub cap: f32,
	/// Icon asset key.
	pub icon: Option<String>,
}

/// Validated configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusConfig {
	/// Native channel names in host order.
	pub natives: Vec<String>,
	/// Cap per native channel, parallel to `natives`.
	pub native_caps: Vec<f32>,
	/// Custom channels in file order, duplicates removed.
	pub channels: Vec<ChannelConfig>,
	/// Non-fatal warnings encountered during validation.
	pub warnings: Vec<ConfigWarning>,
}

impl StatusConfig {
	/// Parses and validates a TOML string.
	pub fn parse(input: &str) -> Result<Self> {
		let raw: RawConfig = toml::from_str(input)?;
		let mut warnings = Vec::new();

		let natives = validate_natives(raw.host.natives, &mut warnings)?;
		let native_caps = resolve_native_caps(&natives, raw.host.native_caps, &mut warnings);
		let channels = validate_channels(&natives, raw.channel, &mut warnings)?;

		for warning in &warnings {
			warn!(%warning, "status config warning");
		}

		Ok(Self {
			natives,
			native_caps,
			channels,
			warnings,
		})
	}

	/// Loads configuration from a file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
			path: path.to_path_buf(),
			error: e,
		})?;
		Self::parse(&content)
	}

	/// Native table described by `[host]`.
	pub fn native_table(&self) -> NativeTable {
		NativeTable::new(self.natives.iter().map(String::as_str))
	}

	/// Registers every declared channel with `registry`, in file order.
	///
	/// Returns one outcome per entry of [`StatusConfig::channels`].
	pub fn apply(&self, registry: &Registry) -> Result<Vec<Registration>> {
		self.channels
			.iter()
			.map(|channel| {
				let icon = channel.icon.as_deref().map(IconHandle::new);
				registry
					.register_with_icon(&channel.name, channel.cap, None, icon)
					.map_err(ConfigError::from)
			})
			.collect()
	}
}

fn validate_natives(natives: Vec<String>, warnings: &mut Vec<ConfigWarning>) -> Result<Vec<String>> {
	let mut kept: Vec<String> = Vec::with_capacity(natives.len());
	for (i, native) in natives.into_iter().enumerate() {
		if name::is_blank(&native) {
			return Err(ConfigError::EmptyNativeName { position: i + 1 });
		}
		if kept.iter().any(|k| name::eq_ignore_case(k, &native)) {
			warnings.push(ConfigWarning::DuplicateNative { name: native });
			continue;
		}
		kept.push(native);
	}
	Ok(kept)
}

fn resolve_native_caps(natives: &[String], caps: BTreeMap<String, f32>, warnings: &mut Vec<ConfigWarning>) -> Vec<f32> {
	let mut resolved = vec![DEFAULT_CAP; natives.len()];
	for (key, cap) in caps {
		match natives.iter().position(|n| name::eq_ignore_case(n, &key)) {
			Some(slot) => resolved[slot] = sanitize_cap(&key, cap, warnings),
			None => {
				let suggestion = name::nearest(&key, natives.iter().map(String::as_str)).map(str::to_owned);
				warnings.push(ConfigWarning::UnknownNativeCap { name: key, suggestion });
			}
		}
	}
	resolved
}

fn validate_channels(
	natives: &[String],
	channels: Vec<RawChannel>,
	warnings: &mut Vec<ConfigWarning>,
) -> Result<Vec<ChannelConfig>> {
	let mut kept: Vec<ChannelConfig> = Vec::with_capacity(channels.len());
	for (i, raw) in channels.into_iter().enumerate() {
		if name::is_blank(&raw.name) {
			return Err(ConfigError::EmptyChannelName { position: i + 1 });
		}
		if let Some(first) = kept.iter().find(|c| name::eq_ignore_case(&c.name, &raw.name)) {
			warnings.push(ConfigWarning::DuplicateChannel {
				name: raw.name,
				kept: first.name.clone(),
			});
			continue;
		}
		if natives.iter().any(|n| name::eq_ignore_case(n, &raw.name)) {
			warnings.push(ConfigWarning::ShadowsNative { name: raw.name.clone() });
		}

		let cap = sanitize_cap(&raw.name, raw.cap.unwrap_or(DEFAULT_CAP), warnings);
		kept.push(ChannelConfig {
			name: raw.name,
			cap,
			icon: raw.icon,
		});
	}
	Ok(kept)
}

fn sanitize_cap(name: &str, cap: f32, warnings: &mut Vec<ConfigWarning>) -> f32 {
	if cap >= 0.0 {
		return cap;
	}
	// NaN fails the comparison above and lands here too.
	let clamped = 0.0;
	warnings.push(ConfigWarning::CapClamped {
		name: name.to_owned(),
		original: cap,
		clamped,
	});
	clamped
}
