//! Adapter boundary between the core and the host's status storage.
//!
//! The host implements [`StatusOps`] and [`StatusHolder`] for its per-entity status
//! object. The core never reaches into host internals: it reads and mutates values
//! through these entry points and resizes storage through [`StatusHolder::arrays_mut`].

mod memory;

use std::fmt;

pub use self::memory::{DEFAULT_NATIVE_CAP, MemoryHolder};
use crate::error::HostError;
use crate::index::VirtualIndex;

/// Identity of one host status holder (one simulated entity).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HolderId(pub u64);

impl fmt::Display for HolderId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// The host's parallel per-channel value arrays, indexed by [`VirtualIndex`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusArrays {
	/// Current value per channel.
	pub current: Vec<f32>,
	/// Accumulated increments.
	pub incremental: Vec<f32>,
	/// Accumulated decrements.
	pub decremental: Vec<f32>,
	/// Amount of the most recent add.
	pub last_added: Vec<f32>,
	/// Incremental accumulator value at the most recent add.
	pub last_added_incremental: Vec<f32>,
}

impl StatusArrays {
	/// Allocates five zeroed arrays of `len` slots.
	pub fn zeroed(len: usize) -> Self {
		Self {
			current: vec![0.0; len],
			incremental: vec![0.0; len],
			decremental: vec![0.0; len],
			last_added: vec![0.0; len],
			last_added_incremental: vec![0.0; len],
		}
	}

	/// Length of the current-value array.
	pub fn len(&self) -> usize {
		self.current.len()
	}

	/// Returns true if the current-value array is empty.
	pub fn is_empty(&self) -> bool {
		self.current.is_empty()
	}

	/// Number of slots addressable in every array.
	pub fn common_len(&self) -> usize {
		[
			&self.current,
			&self.incremental,
			&self.decremental,
			&self.last_added,
			&self.last_added_incremental,
		]
		.iter()
		.map(|column| column.len())
		.min()
		.unwrap_or(0)
	}

	pub(crate) fn columns_mut(&mut self) -> [&mut Vec<f32>; 5] {
		[
			&mut self.current,
			&mut self.incremental,
			&mut self.decremental,
			&mut self.last_added,
			&mut self.last_added_incremental,
		]
	}
}

/// Value access and mutation entry points of a status holder.
///
/// Implementations apply their own clamping. Indices beyond the holder's storage must be
/// treated as no-ops (reads return `0.0`).
pub trait StatusOps {
	/// Current value of `index`.
	fn status(&self, index: VirtualIndex) -> f32;

	/// Overwrites the value of `index`.
	fn set_status(&mut self, index: VirtualIndex, value: f32);

	/// Adds `amount` to `index`; returns whether the host accepted it.
	fn add_status(&mut self, index: VirtualIndex, amount: f32) -> bool;

	/// Subtracts `amount` from `index`.
	fn subtract_status(&mut self, index: VirtualIndex, amount: f32);
}

/// A host-owned status holder instance.
pub trait StatusHolder: StatusOps {
	/// Stable identity of this holder.
	fn holder_id(&self) -> HolderId;

	/// Exposes the holder's value arrays for in-place resizing.
	///
	/// # Errors
	///
	/// Returns a [`HostError`] if the storage is not available.
	fn arrays_mut(&mut self) -> Result<&mut StatusArrays, HostError>;
}
