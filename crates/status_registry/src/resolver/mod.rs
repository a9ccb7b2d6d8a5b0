//! Immutable name/index resolution snapshot.
//!
//! # Role
//!
//! An [`IndexResolver`] is produced exactly once, by registry finalization. It holds the
//! ordered channel table, the folded-name map and the composition signature. It contains
//! no mutation logic and is shared through `Arc`, so reads never lock.
//!
//! # Invariants
//!
//! - Custom indices are `base_count + offset` with no gaps, offsets in ordinal
//!   case-insensitive name order.
//!   - Enforced in: [`IndexResolver::build`].
//!   - Tested by: `tests::indices_are_contiguous_and_sorted`.
//! - Custom names shadow native names on name lookup; index lookup below `base_count`
//!   always answers with the native name.

mod signature;

use std::sync::Arc;

use rustc_hash::FxHashMap;

pub use self::signature::CompositionSignature;
use crate::channel::ChannelDef;
use crate::index::{NativeTable, VirtualIndex};
use crate::name;

/// Finalized, bidirectional channel lookup.
#[derive(Debug)]
pub struct IndexResolver {
	natives: Arc<NativeTable>,
	channels: Box<[ChannelDef]>,
	by_name: FxHashMap<Box<str>, VirtualIndex>,
	signature: CompositionSignature,
}

impl IndexResolver {
	/// Sorts `defs` and assigns indices after the native table.
	pub(crate) fn build(natives: Arc<NativeTable>, defs: impl IntoIterator<Item = ChannelDef>) -> Self {
		let mut channels: Vec<ChannelDef> = defs.into_iter().collect();
		channels.sort_by(|a, b| name::cmp_ignore_case(a.name(), b.name()));

		let base = natives.base_count();
		let by_name = channels
			.iter()
			.enumerate()
			.map(|(offset, def)| (name::fold(def.name()), VirtualIndex::new(base + offset)))
			.collect();
		let signature = CompositionSignature::compute(base, channels.iter().map(ChannelDef::name));

		Self {
			natives,
			channels: channels.into_boxed_slice(),
			by_name,
			signature,
		}
	}

	/// Number of native channels.
	#[inline]
	pub fn base_count(&self) -> usize {
		self.natives.base_count()
	}

	/// Number of registered channels.
	#[inline]
	pub fn custom_count(&self) -> usize {
		self.channels.len()
	}

	/// Native plus registered channel count; the size host storage must reach.
	#[inline]
	pub fn total_count(&self) -> usize {
		self.base_count() + self.custom_count()
	}

	/// Returns true if `index` addresses a registered channel.
	pub fn is_custom(&self, index: VirtualIndex) -> bool {
		self.offset_of(index).is_some()
	}

	/// Resolves a name to its index, checking registered channels before native ones.
	pub fn resolve_index(&self, name: &str) -> Option<VirtualIndex> {
		self.resolve_custom(name)
			.or_else(|| self.natives.index_of(name))
	}

	/// Resolves a name among registered channels only.
	pub fn resolve_custom(&self, name: &str) -> Option<VirtualIndex> {
		self.by_name.get(&*name::fold(name)).copied()
	}

	/// Resolves an index to its channel name.
	pub fn resolve_name(&self, index: VirtualIndex) -> Option<&str> {
		if index.get() < self.base_count() {
			return self.natives.name(index);
		}
		self.channel(index).map(ChannelDef::name)
	}

	/// Returns the registered definition at `index`.
	pub fn channel(&self, index: VirtualIndex) -> Option<&ChannelDef> {
		self.offset_of(index).map(|offset| &self.channels[offset])
	}

	/// Registered cap for custom indices, `host_fallback` unchanged for everything else.
	pub fn cap_for(&self, index: VirtualIndex, host_fallback: f32) -> f32 {
		self.channel(index).map_or(host_fallback, ChannelDef::cap)
	}

	/// Registered definitions in index order.
	pub fn channels(&self) -> &[ChannelDef] {
		&self.channels
	}

	/// Registered names in index order.
	pub fn custom_names(&self) -> impl Iterator<Item = &str> {
		self.channels.iter().map(ChannelDef::name)
	}

	/// Fingerprint of this layout.
	pub fn signature(&self) -> &CompositionSignature {
		&self.signature
	}

	/// Native table this snapshot was built over.
	pub fn natives(&self) -> &NativeTable {
		&self.natives
	}

	/// Closest known channel name to `name`, for diagnostics on lookup misses.
	pub fn suggest(&self, name: &str) -> Option<&str> {
		name::nearest(name, self.natives.names().chain(self.custom_names()))
	}

	fn offset_of(&self, index: VirtualIndex) -> Option<usize> {
		index
			.get()
			.checked_sub(self.base_count())
			.filter(|offset| *offset < self.channels.len())
	}
}

#[cfg(test)]
mod tests;
