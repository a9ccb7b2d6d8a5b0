//! Host-facing facade over the registry, event bus and expansion adapter.
//!
//! One [`StatusSystem`] is created per host process and shared by reference or `Arc`.
//! Mutation tracking is per update loop: call [`StatusSystem::detector`] once per loop and
//! route that loop's set/add/subtract calls through it, or report finished mutations with
//! [`StatusSystem::notify_mutation`]. Every detector of one system shares one activation
//! latch.

use std::sync::Arc;

use crate::bus::{DispatchReport, EventBus, SubscriptionId};
use crate::channel::{ActivationHandler, IconHandle, Registration};
use crate::detector::{ActivationLatch, TransitionDetector};
use crate::error::Result;
use crate::expand::{Expansion, expand_holder};
use crate::host::StatusHolder;
use crate::index::{NativeTable, VirtualIndex};
use crate::registry::Registry;
use crate::resolver::CompositionSignature;

/// Entry point for hosts and extensions.
#[derive(Debug, Clone)]
pub struct StatusSystem {
	registry: Arc<Registry>,
	bus: Arc<EventBus>,
	latch: Arc<ActivationLatch>,
}

impl StatusSystem {
	/// Creates an open registry over the host's native channels.
	pub fn new(natives: NativeTable) -> Self {
		let registry = Arc::new(Registry::new(natives));
		let bus = Arc::new(EventBus::new(Arc::clone(&registry)));
		Self {
			registry,
			bus,
			latch: Arc::default(),
		}
	}

	/// Shared channel registry.
	pub fn registry(&self) -> &Arc<Registry> {
		&self.registry
	}

	/// Bus activations are dispatched on.
	pub fn bus(&self) -> &Arc<EventBus> {
		&self.bus
	}

	/// See [`Registry::register`].
	pub fn register_status(&self, name: &str, cap: f32, on_added: Option<ActivationHandler>) -> Result<Registration> {
		self.registry.register(name, cap, on_added)
	}

	/// See [`Registry::resolve_index`].
	pub fn try_get_index(&self, name: &str) -> Option<VirtualIndex> {
		self.registry.resolve_index(name)
	}

	/// See [`Registry::resolve_name`].
	pub fn get_name_for_index(&self, index: VirtualIndex) -> Option<String> {
		self.registry.resolve_name(index)
	}

	/// Cap for `index`, falling back to the host's own cap outside the custom range.
	pub fn get_cap_or(&self, fallback: f32, index: VirtualIndex) -> f32 {
		self.registry.cap_for(index, fallback)
	}

	/// See [`EventBus::subscribe`].
	pub fn subscribe(&self, handler: ActivationHandler) -> SubscriptionId {
		self.bus.subscribe(handler)
	}

	/// See [`EventBus::unsubscribe`].
	pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
		self.bus.unsubscribe(id)
	}

	/// New detector dispatching through this system's bus and sharing its latch.
	pub fn detector(&self) -> TransitionDetector {
		TransitionDetector::with_latch(Arc::clone(&self.bus), Arc::clone(&self.latch))
	}

	/// See [`TransitionDetector::notify_mutation`].
	pub fn notify_mutation<H>(&self, holder: &H, index: VirtualIndex, amount: f32) -> Option<DispatchReport>
	where
		H: StatusHolder + ?Sized,
	{
		self.detector().notify_mutation(holder, index, amount)
	}

	/// Finalizes the registry and sizes `holder` for every channel.
	///
	/// Host failures are logged by the adapter and reported as `None`; the holder keeps
	/// its previous sizing.
	pub fn prepare_holder<H>(&self, holder: &mut H) -> Option<Expansion>
	where
		H: StatusHolder + ?Sized,
	{
		expand_holder(&self.registry, holder).ok()
	}

	/// See [`Registry::custom_names`].
	pub fn custom_names(&self) -> Vec<String> {
		self.registry.custom_names()
	}

	/// See [`Registry::icon_for`].
	pub fn icon_for(&self, name: &str) -> Option<IconHandle> {
		self.registry.icon_for(name)
	}

	/// See [`Registry::set_icon`].
	pub fn set_icon(&self, name: &str, icon: IconHandle) {
		self.registry.set_icon(name, icon);
	}

	/// See [`EventBus::register_ui_factory`].
	pub fn register_ui_factory(&self, name: &str, factory: ActivationHandler) -> Result<VirtualIndex> {
		self.bus.register_ui_factory(name, factory)
	}

	/// Finalizes and returns the layout fingerprint.
	pub fn signature(&self) -> CompositionSignature {
		self.registry.signature()
	}
}
