//! Virtual indices and the host's native channel table.

use std::fmt;

use crate::name;

/// Slot identifying a status channel.
///
/// `[0, base_count)` are the host's native channels; registered channels follow
/// contiguously from `base_count` once the registry is finalized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtualIndex(usize);

impl VirtualIndex {
	/// Wraps a raw slot number.
	#[inline]
	pub const fn new(raw: usize) -> Self {
		Self(raw)
	}

	/// Returns the raw slot number.
	#[inline]
	pub const fn get(self) -> usize {
		self.0
	}
}

impl From<usize> for VirtualIndex {
	fn from(raw: usize) -> Self {
		Self(raw)
	}
}

impl fmt::Display for VirtualIndex {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.fmt(f)
	}
}

/// The host's fixed, statically enumerated channel names.
///
/// Position in the table is the native channel's index; the table length is the
/// `base_count` every registered channel is offset by.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NativeTable {
	names: Box<[Box<str>]>,
}

impl NativeTable {
	/// Builds a table from the host's names in index order.
	pub fn new<I, S>(names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<Box<str>>,
	{
		Self {
			names: names.into_iter().map(Into::into).collect(),
		}
	}

	/// Number of natively defined channels.
	#[inline]
	pub fn base_count(&self) -> usize {
		self.names.len()
	}

	/// Returns the native name at `index`.
	pub fn name(&self, index: VirtualIndex) -> Option<&str> {
		self.names.get(index.get()).map(AsRef::as_ref)
	}

	/// Finds a native channel by case-insensitive name.
	pub fn index_of(&self, name: &str) -> Option<VirtualIndex> {
		self.names
			.iter()
			.position(|native| name::eq_ignore_case(native, name))
			.map(VirtualIndex::new)
	}

	/// Iterates native names in index order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.names.iter().map(AsRef::as_ref)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn native_lookup_is_case_insensitive() {
		let table = NativeTable::new(["Injury", "Hunger", "Cold"]);
		assert_eq!(table.base_count(), 3);
		assert_eq!(table.index_of("hunger"), Some(VirtualIndex::new(1)));
		assert_eq!(table.index_of("COLD"), Some(VirtualIndex::new(2)));
		assert_eq!(table.index_of("Heat"), None);
		assert_eq!(table.name(VirtualIndex::new(0)), Some("Injury"));
		assert_eq!(table.name(VirtualIndex::new(3)), None);
	}
}
