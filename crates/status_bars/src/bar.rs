//! A single status bar's width, visibility and icon state.

use statusext_registry::{IconHandle, Registry, VirtualIndex};

use crate::color::{Rgba, tint_for};

/// Values at or below this read as inactive.
pub const ACTIVE_THRESHOLD: f32 = 0.01;

/// Upper bound on the per-frame easing factor.
const MAX_EASE: f32 = 0.1;
const EASE_RATE: f32 = 10.0;

/// Geometry of the host's status bar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarMetrics {
	/// Width of a completely full bar.
	pub full_width: f32,
	/// Smallest width an active bar is drawn at.
	pub min_width: f32,
}

/// Presentation state for one custom channel.
#[derive(Clone, Debug, PartialEq)]
pub struct Bar {
	name: String,
	index: VirtualIndex,
	tint: Rgba,
	target: f32,
	width: f32,
	visible: bool,
	icon: Option<IconHandle>,
}

impl Bar {
	/// Hidden, zero-width bar for `name` at `index`.
	pub fn new(name: impl Into<String>, index: VirtualIndex) -> Self {
		let name = name.into();
		Self {
			tint: tint_for(&name),
			name,
			index,
			target: 0.0,
			width: 0.0,
			visible: false,
			icon: None,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn index(&self) -> VirtualIndex {
		self.index
	}

	pub fn tint(&self) -> Rgba {
		self.tint
	}

	/// Width the bar is easing toward.
	pub fn target(&self) -> f32 {
		self.target
	}

	/// Width currently drawn.
	pub fn width(&self) -> f32 {
		self.width
	}

	pub fn is_visible(&self) -> bool {
		self.visible
	}

	pub fn icon(&self) -> Option<&IconHandle> {
		self.icon.as_ref()
	}

	/// Updates the target width and visibility from the channel's current value.
	pub fn drive(&mut self, value: f32, metrics: BarMetrics) {
		let fill = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
		self.target = metrics.full_width * fill;
		if value > ACTIVE_THRESHOLD {
			self.target = self.target.max(metrics.min_width);
			self.visible = true;
		} else {
			self.visible = false;
		}
	}

	/// Eases the drawn width toward the target over a frame of `dt` seconds.
	pub fn animate(&mut self, dt: f32) {
		let t = (dt * EASE_RATE).clamp(0.0, MAX_EASE);
		self.width += (self.target - self.width) * t;
	}

	/// Makes the bar visible without changing its target.
	pub fn show(&mut self) {
		self.visible = true;
	}

	/// Picks up the channel's icon the first time one is available.
	///
	/// Returns true if an icon was applied by this call.
	pub fn try_apply_icon(&mut self, registry: &Registry) -> bool {
		if self.icon.is_some() {
			return false;
		}
		self.icon = registry.icon_for(&self.name);
		self.icon.is_some()
	}
}
