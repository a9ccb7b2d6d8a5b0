//! Activation events.

use crate::host::HolderId;
use crate::index::VirtualIndex;

/// A channel crossed from non-positive to positive on one status holder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActivationEvent {
	/// Holder whose value crossed.
	pub holder: HolderId,
	/// Channel that activated.
	pub index: VirtualIndex,
	/// Amount carried by the mutation that caused the crossing.
	pub amount: f32,
}
