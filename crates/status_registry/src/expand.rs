//! Growth of host value arrays to the finalized channel count.
//!
//! # Invariants
//!
//! - Must preserve every existing value at its offset; new slots start at `0.0`.
//! - Must not reallocate an array that is already large enough, so repeated calls on
//!   every host storage initialization are free.
//! - Must run after finalization; [`expand_holder`] finalizes before sizing.

use tracing::{debug, error};

use crate::error::HostError;
use crate::host::{StatusArrays, StatusHolder};
use crate::registry::Registry;

/// What [`expand`] did to a set of arrays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expansion {
	/// Every array already had at least the required length.
	Unchanged,
	/// `arrays` of the five arrays were grown to `len`.
	Grown {
		/// Number of arrays that were resized.
		arrays: usize,
		/// New length.
		len: usize,
	},
}

/// Grows each of the five arrays to `required_total` slots if it is shorter.
///
/// Arrays already at or above `required_total` are left alone; nothing is ever
/// truncated.
pub fn expand(arrays: &mut StatusArrays, required_total: usize) -> Expansion {
	let mut grown = 0;
	for column in arrays.columns_mut() {
		if column.len() < required_total {
			column.resize(required_total, 0.0);
			grown += 1;
		}
	}
	match grown {
		0 => Expansion::Unchanged,
		arrays => Expansion::Grown {
			arrays,
			len: required_total,
		},
	}
}

/// Finalizes `registry` and sizes `holder`'s storage to its total channel count.
///
/// # Errors
///
/// Propagates the host's [`HostError`] after logging it; the holder keeps whatever sizing
/// it had, and out-of-range writes on it remain no-ops.
pub fn expand_holder<H>(registry: &Registry, holder: &mut H) -> Result<Expansion, HostError>
where
	H: StatusHolder + ?Sized,
{
	let total = registry.total_count();
	let holder_id = holder.holder_id();
	let arrays = match holder.arrays_mut() {
		Ok(arrays) => arrays,
		Err(err) => {
			error!(holder = %holder_id, error = %err, "cannot expand status arrays; skipping");
			return Err(err);
		}
	};

	let outcome = expand(arrays, total);
	if let Expansion::Grown { arrays, len } = outcome {
		debug!(holder = %holder_id, arrays, len, "expanded status arrays");
	}
	Ok(outcome)
}
