use std::sync::Arc;

use super::{HolderId, StatusArrays, StatusHolder, StatusOps};
use crate::cap::CapOverride;
use crate::error::HostError;
use crate::index::{NativeTable, VirtualIndex};

/// Cap assumed for native channels without an explicit one.
pub const DEFAULT_NATIVE_CAP: f32 = 1.0;

/// In-memory reference host holder.
///
/// Values are clamped to `[0, cap]` where the cap comes from the [`CapOverride`]
/// with this holder's native cap as fallback. Writes beyond the arrays are ignored.
pub struct MemoryHolder {
	id: HolderId,
	arrays: Option<StatusArrays>,
	native_caps: Box<[f32]>,
	caps: Arc<dyn CapOverride + Send + Sync>,
}

impl MemoryHolder {
	/// Creates a holder sized for the native table.
	pub fn new(id: HolderId, natives: &NativeTable, caps: Arc<dyn CapOverride + Send + Sync>) -> Self {
		Self {
			id,
			arrays: Some(StatusArrays::zeroed(natives.base_count())),
			native_caps: vec![DEFAULT_NATIVE_CAP; natives.base_count()].into_boxed_slice(),
			caps,
		}
	}

	/// Creates a holder whose arrays have not been allocated.
	pub fn uninitialized(id: HolderId, caps: Arc<dyn CapOverride + Send + Sync>) -> Self {
		Self {
			id,
			arrays: None,
			native_caps: Box::default(),
			caps,
		}
	}

	/// Overrides native caps in index order. Negative caps clamp to zero.
	pub fn with_native_caps(mut self, caps: impl IntoIterator<Item = f32>) -> Self {
		self.native_caps = caps.into_iter().map(|cap| cap.max(0.0)).collect();
		self
	}

	/// Read access to the value arrays.
	pub fn arrays(&self) -> Option<&StatusArrays> {
		self.arrays.as_ref()
	}

	/// Effective cap for `index`.
	pub fn cap(&self, index: VirtualIndex) -> f32 {
		let native = self
			.native_caps
			.get(index.get())
			.copied()
			.unwrap_or(DEFAULT_NATIVE_CAP);
		self.caps.cap_for(index, native)
	}

	fn slot(&mut self, index: VirtualIndex) -> Option<(usize, &mut StatusArrays)> {
		let arrays = self.arrays.as_mut()?;
		(index.get() < arrays.common_len()).then_some((index.get(), arrays))
	}
}

fn clamp_value(value: f32, cap: f32) -> f32 {
	value.max(0.0).min(cap)
}

impl StatusOps for MemoryHolder {
	fn status(&self, index: VirtualIndex) -> f32 {
		self.arrays
			.as_ref()
			.and_then(|arrays| arrays.current.get(index.get()))
			.copied()
			.unwrap_or(0.0)
	}

	fn set_status(&mut self, index: VirtualIndex, value: f32) {
		let cap = self.cap(index);
		if let Some((i, arrays)) = self.slot(index) {
			arrays.current[i] = clamp_value(value, cap);
		}
	}

	fn add_status(&mut self, index: VirtualIndex, amount: f32) -> bool {
		if amount.is_nan() || amount <= 0.0 {
			return false;
		}
		let cap = self.cap(index);
		let Some((i, arrays)) = self.slot(index) else {
			return false;
		};
		arrays.current[i] = clamp_value(arrays.current[i] + amount, cap);
		arrays.incremental[i] += amount;
		arrays.last_added[i] = amount;
		arrays.last_added_incremental[i] = arrays.incremental[i];
		true
	}

	fn subtract_status(&mut self, index: VirtualIndex, amount: f32) {
		if amount.is_nan() || amount <= 0.0 {
			return;
		}
		let cap = self.cap(index);
		if let Some((i, arrays)) = self.slot(index) {
			arrays.current[i] = clamp_value(arrays.current[i] - amount, cap);
			arrays.decremental[i] += amount;
		}
	}
}

impl StatusHolder for MemoryHolder {
	fn holder_id(&self) -> HolderId {
		self.id
	}

	fn arrays_mut(&mut self) -> Result<&mut StatusArrays, HostError> {
		self.arrays
			.as_mut()
			.ok_or(HostError::Uninitialized { holder: self.id })
	}
}

impl std::fmt::Debug for MemoryHolder {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MemoryHolder")
			.field("id", &self.id)
			.field("arrays", &self.arrays)
			.field("native_caps", &self.native_caps)
			.finish_non_exhaustive()
	}
}
