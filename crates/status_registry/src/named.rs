//! Name-keyed convenience wrappers over the index-based API.
//!
//! Pure resolution shims: each call resolves the name through an [`IndexLookup`] and
//! delegates to the index-based [`StatusOps`] entry point. No state lives here. Unknown
//! names read as `0.0` and make mutations no-ops.

use crate::host::StatusOps;
use crate::index::VirtualIndex;
use crate::registry::Registry;
use crate::resolver::IndexResolver;

/// Resolves channel names to indices.
pub trait IndexLookup {
	/// Index for `name`, if any channel answers to it.
	fn lookup_index(&self, name: &str) -> Option<VirtualIndex>;
}

impl IndexLookup for Registry {
	fn lookup_index(&self, name: &str) -> Option<VirtualIndex> {
		self.resolve_index(name)
	}
}

impl IndexLookup for IndexResolver {
	fn lookup_index(&self, name: &str) -> Option<VirtualIndex> {
		self.resolve_index(name)
	}
}

/// Name-keyed access for anything implementing [`StatusOps`].
pub trait NamedStatusExt: StatusOps {
	/// Current value of the named channel, `0.0` if unknown.
	fn status_by_name<L>(&self, lookup: &L, name: &str) -> f32
	where
		L: IndexLookup + ?Sized,
	{
		lookup.lookup_index(name).map_or(0.0, |index| self.status(index))
	}

	/// Sets the named channel; returns whether the name resolved.
	fn set_status_by_name<L>(&mut self, lookup: &L, name: &str, value: f32) -> bool
	where
		L: IndexLookup + ?Sized,
	{
		let Some(index) = lookup.lookup_index(name) else {
			return false;
		};
		self.set_status(index, value);
		true
	}

	/// Adds to the named channel; returns the host's answer, `false` if unknown.
	fn add_status_by_name<L>(&mut self, lookup: &L, name: &str, amount: f32) -> bool
	where
		L: IndexLookup + ?Sized,
	{
		lookup
			.lookup_index(name)
			.is_some_and(|index| self.add_status(index, amount))
	}

	/// Subtracts from the named channel; returns whether the name resolved.
	fn subtract_status_by_name<L>(&mut self, lookup: &L, name: &str, amount: f32) -> bool
	where
		L: IndexLookup + ?Sized,
	{
		let Some(index) = lookup.lookup_index(name) else {
			return false;
		};
		self.subtract_status(index, amount);
		true
	}
}

impl<T: StatusOps + ?Sized> NamedStatusExt for T {}
