//! Deterministic bar tints.
//!
//! Every peer derives the same tint for a channel name without coordination: the name is
//! hashed (`hash = hash * 31 + unit`, seeded with 23, over UTF-16 code units, wrapping
//! 32-bit), the low 24 bits become the hue, and the color is taken at fixed saturation
//! and value.

use palette::{FromColor, Hsv, Srgb};

const SEED: i32 = 23;
const HUE_MASK: i32 = 0x00FF_FFFF;
const SATURATION: f32 = 0.8;
const VALUE: f32 = 0.9;

/// Linear RGBA color with components in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
	/// Red.
	pub r: f32,
	/// Green.
	pub g: f32,
	/// Blue.
	pub b: f32,
	/// Alpha.
	pub a: f32,
}

impl Rgba {
	/// Color from its four components.
	pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
		Self { r, g, b, a }
	}

	/// Takes the RGB of `tint` and keeps this color's alpha.
	pub fn tinted(self, tint: Rgba) -> Self {
		Self { a: self.a, ..tint }
	}
}

/// Name hash used for hue selection.
pub fn name_hash(name: &str) -> i32 {
	name.encode_utf16()
		.fold(SEED, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Hue in `[0, 1]` for `name`.
pub fn hue_for(name: &str) -> f32 {
	(name_hash(name) & HUE_MASK) as f32 / HUE_MASK as f32
}

/// Opaque tint for `name`.
pub fn tint_for(name: &str) -> Rgba {
	let hsv: Hsv = Hsv::new(hue_for(name) * 360.0, SATURATION, VALUE);
	let rgb: Srgb = Srgb::from_color(hsv);
	Rgba::new(rgb.red, rgb.green, rgb.blue, 1.0)
}
