//! Exactly-once activation detection around host mutations.
//!
//! # Purpose
//!
//! [`TransitionDetector`] wraps the host's set/add/subtract entry points. For each
//! `(holder, index)` pair it captures the value before the mutation, lets the host mutate
//! and clamp as usual, captures the value after, and fires an activation when the value
//! crosses from `<= 0` to `> 0`. The pair stays latched while the value remains positive
//! and re-arms once it drops back to `<= 0`.
//!
//! # Preconditions
//!
//! A holder is mutated from one thread at a time. The detector takes `&mut self`; give
//! each host update loop its own detector. Detectors created by one
//! [`StatusSystem`](crate::StatusSystem) share one [`ActivationLatch`], so a pair that is
//! already active stays active no matter which detector observes the next mutation. The
//! latch lock covers the set update only and is released before dispatch.
//!
//! Every mutation of a tracked holder must pass through a detector, either wrapped
//! ([`TransitionDetector::set_status`] and friends, or [`TransitionDetector::track`]) or
//! reported afterwards through [`TransitionDetector::notify_mutation`]. Mutations no
//! detector sees leave the latch stale.
//!
//! # Invariants
//!
//! - Must fire only on a crossing from `<= 0` to `> 0`.
//!   - Enforced in: [`TransitionDetector::observe`] (captured pre-value) and
//!     [`TransitionDetector::notify_mutation`] (`post - amount` must be `<= 0`).
//!   - Tested by: `tests::notify_on_already_positive_holder_only_latches`.
//! - Must fire at most once per crossing across all detectors of one system.
//!   - Enforced in: [`ActivationLatch`] shared through `Arc`.
//!   - Tested by: `tests::detectors_sharing_a_latch_fire_once`.

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::bus::{DispatchReport, EventBus};
use crate::event::ActivationEvent;
use crate::host::{HolderId, StatusHolder, StatusOps};
use crate::index::VirtualIndex;

/// Result of a wrapped mutation.
#[derive(Debug)]
pub struct Observed<R> {
	/// Whatever the host's entry point returned.
	pub outcome: R,
	/// Dispatch report if this mutation activated the channel.
	pub activation: Option<DispatchReport>,
}

impl<R> Observed<R> {
	/// Returns true if this mutation fired an activation.
	pub fn fired(&self) -> bool {
		self.activation.is_some()
	}
}

/// Set of `(holder, index)` pairs currently latched active.
#[derive(Debug, Default)]
pub struct ActivationLatch {
	active: Mutex<FxHashSet<(HolderId, VirtualIndex)>>,
}

impl ActivationLatch {
	/// Returns true while `index` is latched active on `holder`.
	pub fn is_active(&self, holder: HolderId, index: VirtualIndex) -> bool {
		self.active.lock().contains(&(holder, index))
	}

	/// Drops all latch state for a holder that no longer exists.
	pub fn forget_holder(&self, holder: HolderId) {
		self.active.lock().retain(|(id, _)| *id != holder);
	}

	/// Latches or re-arms `key` from its post-mutation value; returns the previous state.
	fn update(&self, key: (HolderId, VirtualIndex), post: f32) -> bool {
		let mut active = self.active.lock();
		if post > 0.0 {
			!active.insert(key)
		} else {
			active.remove(&key)
		}
	}
}

/// Watches status mutations and fires activations through an [`EventBus`].
#[derive(Debug)]
pub struct TransitionDetector {
	bus: Arc<EventBus>,
	latch: Arc<ActivationLatch>,
}

impl TransitionDetector {
	/// Creates a detector with a latch of its own.
	pub fn new(bus: Arc<EventBus>) -> Self {
		Self::with_latch(bus, Arc::default())
	}

	/// Creates a detector sharing `latch` with other detectors.
	pub fn with_latch(bus: Arc<EventBus>, latch: Arc<ActivationLatch>) -> Self {
		Self { bus, latch }
	}

	/// Latch this detector reads and updates.
	pub fn latch(&self) -> &Arc<ActivationLatch> {
		&self.latch
	}

	/// Wraps the host's set entry point.
	pub fn set_status<H>(&mut self, holder: &mut H, index: VirtualIndex, value: f32) -> Observed<()>
	where
		H: StatusHolder + ?Sized,
	{
		self.observe(holder, index, value, |h| h.set_status(index, value))
	}

	/// Wraps the host's add entry point.
	pub fn add_status<H>(&mut self, holder: &mut H, index: VirtualIndex, amount: f32) -> Observed<bool>
	where
		H: StatusHolder + ?Sized,
	{
		self.observe(holder, index, amount, |h| h.add_status(index, amount))
	}

	/// Wraps the host's subtract entry point.
	pub fn subtract_status<H>(&mut self, holder: &mut H, index: VirtualIndex, amount: f32) -> Observed<()>
	where
		H: StatusHolder + ?Sized,
	{
		self.observe(holder, index, amount, |h| h.subtract_status(index, amount))
	}

	/// Runs `mutate` on `holder` and fires if `index` crossed from `<= 0` to `> 0`.
	pub fn observe<H, R>(
		&mut self,
		holder: &mut H,
		index: VirtualIndex,
		amount: f32,
		mutate: impl FnOnce(&mut H) -> R,
	) -> Observed<R>
	where
		H: StatusHolder + ?Sized,
	{
		let key = (holder.holder_id(), index);
		let pre = holder.status(index);
		let outcome = mutate(holder);
		let post = holder.status(index);

		let crossed = pre <= 0.0 && post > 0.0;
		self.latch.update(key, post);
		let activation = crossed.then(|| self.fire(key, amount));
		Observed { outcome, activation }
	}

	/// Hook for hosts that report mutations after the fact.
	///
	/// `amount` is the change the host applied (the new value for a set from zero). With
	/// no captured pre-mutation value, a positive value on an unlatched pair fires only if
	/// `post - amount <= 0`, that is if this mutation could have crossed. Otherwise the
	/// pair is latched silently. A non-positive value re-arms the pair.
	pub fn notify_mutation<H>(&mut self, holder: &H, index: VirtualIndex, amount: f32) -> Option<DispatchReport>
	where
		H: StatusHolder + ?Sized,
	{
		let key = (holder.holder_id(), index);
		let post = holder.status(index);
		let was_active = self.latch.update(key, post);
		let could_cross = post - amount <= 0.0;
		(!was_active && post > 0.0 && could_cross).then(|| self.fire(key, amount))
	}

	/// Borrows `holder` behind a [`StatusOps`] view that routes every mutation through
	/// this detector.
	pub fn track<'a, H>(&'a mut self, holder: &'a mut H) -> Tracked<'a, H>
	where
		H: StatusHolder + ?Sized,
	{
		Tracked { detector: self, holder }
	}

	/// Returns true while `index` is latched active on `holder`.
	pub fn is_active(&self, holder: HolderId, index: VirtualIndex) -> bool {
		self.latch.is_active(holder, index)
	}

	/// Drops all latch state for a holder that no longer exists.
	pub fn forget_holder(&mut self, holder: HolderId) {
		self.latch.forget_holder(holder);
	}

	fn fire(&self, (holder, index): (HolderId, VirtualIndex), amount: f32) -> DispatchReport {
		debug!(%holder, %index, amount, "status activated");
		self.bus.dispatch(&ActivationEvent { holder, index, amount })
	}
}

/// A holder whose mutations are observed by a [`TransitionDetector`].
pub struct Tracked<'a, H: ?Sized> {
	detector: &'a mut TransitionDetector,
	holder: &'a mut H,
}

impl<H> StatusOps for Tracked<'_, H>
where
	H: StatusHolder + ?Sized,
{
	fn status(&self, index: VirtualIndex) -> f32 {
		self.holder.status(index)
	}

	fn set_status(&mut self, index: VirtualIndex, value: f32) {
		self.detector.set_status(&mut *self.holder, index, value);
	}

	fn add_status(&mut self, index: VirtualIndex, amount: f32) -> bool {
		self.detector.add_status(&mut *self.holder, index, amount).outcome
	}

	fn subtract_status(&mut self, index: VirtualIndex, amount: f32) {
		self.detector.subtract_status(&mut *self.holder, index, amount);
	}
}

#[cfg(test)]
mod tests;
