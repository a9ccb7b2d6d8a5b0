//! Effective cap resolution.
//!
//! Hosts keep answering cap queries for their native channels; the core only substitutes
//! the registered cap for custom indices. A host wires this in by routing its own cap
//! query through [`CapOverride::cap_for`] with its native answer as the fallback.

use crate::index::VirtualIndex;
use crate::registry::Registry;
use crate::resolver::IndexResolver;

/// Supplies the effective maximum value for a channel.
pub trait CapOverride {
	/// Registered cap for custom indices, `host_fallback` unchanged otherwise.
	fn cap_for(&self, index: VirtualIndex, host_fallback: f32) -> f32;
}

impl CapOverride for Registry {
	fn cap_for(&self, index: VirtualIndex, host_fallback: f32) -> f32 {
		Registry::cap_for(self, index, host_fallback)
	}
}

impl CapOverride for IndexResolver {
	fn cap_for(&self, index: VirtualIndex, host_fallback: f32) -> f32 {
		IndexResolver::cap_for(self, index, host_fallback)
	}
}
