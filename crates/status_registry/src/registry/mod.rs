//! Channel registry with a one-shot Open → Finalized lifecycle.
//!
//! # Purpose
//!
//! Extensions register channels by name while the registry is open. Index assignment is
//! deferred to [`Registry::finalize`], which sorts the registered names and publishes an
//! immutable [`IndexResolver`]. Because the order is a pure function of the set of names,
//! independently launched peers that registered the same channels agree on every index
//! regardless of registration order or timing.
//!
//! # Concurrency
//!
//! - **Writes:** `register` and `finalize` share one mutex. It covers the state transition
//!   and the pending map only; no callback ever runs under it.
//! - **Reads:** lock-free once finalized (atomic load of the published resolver).
//!
//! # Invariants
//!
//! - Must finalize at most once; later calls return the same resolver.
//!   - Enforced in: [`Registry::finalize`] (state checked under the lock).
//!   - Tested by: `tests::finalize_is_idempotent`.
//! - Must assign indices independent of registration order.
//!   - Enforced in: [`IndexResolver::build`].
//!   - Tested by: `tests::registration_order_does_not_matter`.
//! - Must never change the layout after finalization.
//!   - Enforced in: [`Registry::register_with_icon`] (finalized arm is read-only).
//!   - Tested by: `tests::late_registration_leaves_layout_untouched`.

use std::collections::hash_map::Entry;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use crate::channel::{ActivationHandler, ChannelDef, IconHandle, Registration};
use crate::error::{RegistryError, Result};
use crate::index::{NativeTable, VirtualIndex};
use crate::resolver::{CompositionSignature, IndexResolver};
use crate::name;

enum State {
	Open {
		/// Keyed by folded name.
		pending: FxHashMap<Box<str>, ChannelDef>,
	},
	Finalized(Arc<IndexResolver>),
}

/// Registry of extension-defined status channels.
///
/// One instance exists per host process; share it with `Arc` rather than through a
/// global.
pub struct Registry {
	natives: Arc<NativeTable>,
	state: Mutex<State>,
	published: ArcSwapOption<IndexResolver>,
	icons: Mutex<FxHashMap<Box<str>, IconHandle>>,
}

impl Registry {
	/// Creates an open registry over the host's native channel table.
	pub fn new(natives: NativeTable) -> Self {
		Self {
			natives: Arc::new(natives),
			state: Mutex::new(State::Open {
				pending: FxHashMap::default(),
			}),
			published: ArcSwapOption::empty(),
			icons: Mutex::new(FxHashMap::default()),
		}
	}

	/// Native channel table.
	pub fn natives(&self) -> &NativeTable {
		&self.natives
	}

	/// Number of natively defined channels.
	pub fn base_count(&self) -> usize {
		self.natives.base_count()
	}

	/// Returns true once [`finalize`](Self::finalize) has run.
	pub fn is_finalized(&self) -> bool {
		self.published.load().is_some()
	}

	/// Registers a channel.
	///
	/// While open, the first registration of a name wins and later ones (any casing) are
	/// no-ops; both report [`Registration::Pending`]. After finalization a known name
	/// reports its index and an unknown one is dropped with [`Registration::NotFound`].
	/// A name matching a native channel reports the native index and creates nothing.
	///
	/// # Errors
	///
	/// [`RegistryError::InvalidName`] if `name` is empty or whitespace.
	pub fn register(&self, name: &str, cap: f32, on_added: Option<ActivationHandler>) -> Result<Registration> {
		self.register_with_icon(name, cap, on_added, None)
	}

	/// Registers a channel and sets or replaces its icon.
	///
	/// The icon is auxiliary data: it is updated even when the name is already known, but
	/// never for a registration that was dropped.
	///
	/// # Errors
	///
	/// [`RegistryError::InvalidName`] if `name` is empty or whitespace.
	pub fn register_with_icon(
		&self,
		name: &str,
		cap: f32,
		on_added: Option<ActivationHandler>,
		icon: Option<IconHandle>,
	) -> Result<Registration> {
		if name::is_blank(name) {
			return Err(RegistryError::InvalidName);
		}

		let outcome = if let Some(native) = self.natives.index_of(name) {
			warn!(name, index = %native, "status name collides with a native channel; using the native slot");
			Registration::Assigned(native)
		} else {
			self.register_custom(name, cap, on_added)
		};

		if let Some(icon) = icon
			&& outcome != Registration::NotFound
		{
			self.set_icon(name, icon);
		}
		Ok(outcome)
	}

	fn register_custom(&self, name: &str, cap: f32, on_added: Option<ActivationHandler>) -> Registration {
		let mut state = self.state.lock();
		match &mut *state {
			State::Open { pending } => {
				match pending.entry(name::fold(name)) {
					Entry::Occupied(existing) => {
						debug!(name, existing = existing.get().name(), "status already registered");
					}
					Entry::Vacant(slot) => {
						slot.insert(ChannelDef::new(name, cap, on_added));
					}
				}
				Registration::Pending
			}
			State::Finalized(resolver) => match resolver.resolve_custom(name) {
				Some(index) => {
					info!(name, %index, "status registered after finalization; returning existing index");
					Registration::Assigned(index)
				}
				None => {
					warn!(name, "status registered after finalization cannot receive an index; ignored");
					Registration::NotFound
				}
			},
		}
	}

	/// Closes registration and publishes the index layout.
	///
	/// The first call sorts the pending names, assigns indices from `base_count` and
	/// builds the composition signature. Every later call returns that same resolver.
	pub fn finalize(&self) -> Arc<IndexResolver> {
		if let Some(resolver) = self.published.load_full() {
			return resolver;
		}

		let mut state = self.state.lock();
		let resolver = match &mut *state {
			State::Finalized(resolver) => return Arc::clone(resolver),
			State::Open { pending } => {
				let defs = std::mem::take(pending).into_values();
				Arc::new(IndexResolver::build(Arc::clone(&self.natives), defs))
			}
		};
		*state = State::Finalized(Arc::clone(&resolver));
		self.published.store(Some(Arc::clone(&resolver)));
		drop(state);

		info!(
			base = resolver.base_count(),
			custom = resolver.custom_count(),
			signature = %resolver.signature(),
			"status registry finalized"
		);
		resolver
	}

	/// Published resolver, if finalized.
	pub fn resolver(&self) -> Option<Arc<IndexResolver>> {
		self.published.load_full()
	}

	/// Native plus registered channel count. Finalizes the registry.
	pub fn total_count(&self) -> usize {
		self.finalize().total_count()
	}

	/// Number of registered (or pending) custom channels.
	pub fn custom_count(&self) -> usize {
		if let Some(resolver) = self.published.load_full() {
			return resolver.custom_count();
		}
		match &*self.state.lock() {
			State::Open { pending } => pending.len(),
			State::Finalized(resolver) => resolver.custom_count(),
		}
	}

	/// Layout fingerprint. Finalizes the registry.
	pub fn signature(&self) -> CompositionSignature {
		self.finalize().signature().clone()
	}

	/// Resolves a name to its index.
	///
	/// Before finalization only native channels resolve; this never finalizes.
	pub fn resolve_index(&self, name: &str) -> Option<VirtualIndex> {
		match &*self.published.load() {
			Some(resolver) => resolver.resolve_index(name),
			None => self.natives.index_of(name),
		}
	}

	/// Resolves an index to its channel name.
	pub fn resolve_name(&self, index: VirtualIndex) -> Option<String> {
		match &*self.published.load() {
			Some(resolver) => resolver.resolve_name(index).map(str::to_owned),
			None => self.natives.name(index).map(str::to_owned),
		}
	}

	/// Effective cap for `index`: the registered cap for custom channels, `host_fallback`
	/// unchanged otherwise.
	pub fn cap_for(&self, index: VirtualIndex, host_fallback: f32) -> f32 {
		match &*self.published.load() {
			Some(resolver) => resolver.cap_for(index, host_fallback),
			None => host_fallback,
		}
	}

	/// Registered custom names in index order.
	///
	/// Before finalization this is the order the pending names will receive.
	pub fn custom_names(&self) -> Vec<String> {
		if let Some(resolver) = self.published.load_full() {
			return resolver.custom_names().map(str::to_owned).collect();
		}
		let mut names: Vec<String> = match &*self.state.lock() {
			State::Open { pending } => pending.values().map(|def| def.name().to_owned()).collect(),
			State::Finalized(resolver) => return resolver.custom_names().map(str::to_owned).collect(),
		};
		names.sort_by(|a, b| name::cmp_ignore_case(a, b));
		names
	}

	/// Closest known channel name, for diagnostics.
	pub fn suggest(&self, name: &str) -> Option<String> {
		match &*self.published.load() {
			Some(resolver) => resolver.suggest(name).map(str::to_owned),
			None => name::nearest(name, self.natives.names()).map(str::to_owned),
		}
	}

	/// Sets or replaces the icon for `name`. Blank names are ignored.
	///
	/// Icons may be set before the channel registers.
	pub fn set_icon(&self, name: &str, icon: IconHandle) {
		if name::is_blank(name) {
			return;
		}
		self.icons.lock().insert(name::fold(name), icon);
	}

	/// Icon for `name`, if one was set.
	pub fn icon_for(&self, name: &str) -> Option<IconHandle> {
		self.icons.lock().get(&*name::fold(name)).cloned()
	}
}

impl std::fmt::Debug for Registry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Registry")
			.field("base_count", &self.base_count())
			.field("finalized", &self.is_finalized())
			.field("custom_count", &self.custom_count())
			.finish()
	}
}
