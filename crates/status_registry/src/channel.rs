//! Channel definitions and registration outcomes.

use std::fmt;
use std::sync::Arc;

use crate::event::ActivationEvent;
use crate::index::VirtualIndex;

/// Error type activation handlers may return.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Result of one activation handler invocation.
pub type HandlerResult = Result<(), HandlerError>;

/// Callback run when a channel activates on a status holder.
pub type ActivationHandler = Arc<dyn Fn(&ActivationEvent) -> HandlerResult + Send + Sync>;

/// Opaque reference to an icon asset owned by the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IconHandle(Arc<str>);

impl IconHandle {
	/// Wraps an asset key.
	pub fn new(key: impl Into<Arc<str>>) -> Self {
		Self(key.into())
	}

	/// Returns the asset key.
	pub fn key(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for IconHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// A registered status channel.
#[derive(Clone)]
pub struct ChannelDef {
	name: Box<str>,
	cap: f32,
	on_added: Option<ActivationHandler>,
}

impl ChannelDef {
	pub(crate) fn new(name: &str, cap: f32, on_added: Option<ActivationHandler>) -> Self {
		Self {
			name: name.into(),
			cap: clamp_cap(cap),
			on_added,
		}
	}

	/// Name as first registered.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Maximum value, never negative.
	pub fn cap(&self) -> f32 {
		self.cap
	}

	/// Callback run when this channel activates.
	pub fn on_added(&self) -> Option<&ActivationHandler> {
		self.on_added.as_ref()
	}
}

impl fmt::Debug for ChannelDef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ChannelDef")
			.field("name", &self.name)
			.field("cap", &self.cap)
			.field("on_added", &self.on_added.is_some())
			.finish()
	}
}

/// Clamps a requested cap to `>= 0`. NaN becomes `0.0`.
pub(crate) fn clamp_cap(cap: f32) -> f32 {
	// f32::max returns the non-NaN operand.
	cap.max(0.0)
}

/// Outcome of [`Registry::register`](crate::Registry::register).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Registration {
	/// Accepted while registration is open; the index is assigned at finalization.
	Pending,
	/// The name is already known and owns this index.
	Assigned(VirtualIndex),
	/// Registration arrived after finalization for an unknown name and was dropped.
	NotFound,
}

impl Registration {
	/// Returns the assigned index, if one is known.
	pub fn index(self) -> Option<VirtualIndex> {
		match self {
			Self::Assigned(index) => Some(index),
			Self::Pending | Self::NotFound => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn caps_are_clamped() {
		assert_eq!(clamp_cap(-2.0), 0.0);
		assert_eq!(clamp_cap(f32::NAN), 0.0);
		assert_eq!(clamp_cap(0.5), 0.5);
		assert_eq!(ChannelDef::new("Thirst", -1.0, None).cap(), 0.0);
	}

	#[test]
	fn registration_index() {
		assert_eq!(Registration::Assigned(VirtualIndex::new(7)).index(), Some(VirtualIndex::new(7)));
		assert_eq!(Registration::Pending.index(), None);
		assert_eq!(Registration::NotFound.index(), None);
	}
}
