//! Activation dispatch with per-handler failure isolation.
//!
//! # Purpose
//!
//! Delivers each [`ActivationEvent`] to, in order:
//! 1. the channel's own `on_added` callback,
//! 2. the UI factory registered for the channel's index,
//! 3. every general subscriber, in subscription order.
//!
//! Every invocation runs inside its own failure boundary. A handler that returns an
//! error or panics is logged and recorded in the [`DispatchReport`]; the remaining
//! handlers still run and nothing reaches the mutation that triggered the event.
//!
//! # Concurrency
//!
//! The handler table is published through `ArcSwap` and replaced copy-on-write, so
//! dispatch holds no lock while handlers run. Handlers may subscribe, unsubscribe,
//! resolve names or attempt registration re-entrantly.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwap;
use rustc_hash::FxHashMap;
use tracing::{error, trace};

use crate::channel::ActivationHandler;
use crate::error::{RegistryError, Result};
use crate::event::ActivationEvent;
use crate::index::VirtualIndex;
use crate::registry::Registry;

/// Token returned by [`EventBus::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Which dispatch category a handler belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandlerStage {
	/// The channel's registered `on_added` callback.
	Channel,
	/// The UI factory registered for the channel.
	UiFactory,
	/// A general subscriber.
	Subscriber(SubscriptionId),
}

impl fmt::Display for HandlerStage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Channel => f.write_str("channel callback"),
			Self::UiFactory => f.write_str("ui factory"),
			Self::Subscriber(id) => write!(f, "subscriber {id}"),
		}
	}
}

/// How a handler failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FailureReason {
	/// The handler returned an error.
	Error(String),
	/// The handler panicked.
	Panic(String),
}

impl fmt::Display for FailureReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Error(msg) => write!(f, "error: {msg}"),
			Self::Panic(msg) => write!(f, "panic: {msg}"),
		}
	}
}

/// One handler failure recorded during dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandlerFailure {
	/// Handler that failed.
	pub stage: HandlerStage,
	/// What went wrong.
	pub reason: FailureReason,
}

/// Outcome of dispatching one activation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
	/// Handlers invoked, failed or not.
	pub invoked: usize,
	/// Handlers that failed, in invocation order.
	pub failures: Vec<HandlerFailure>,
}

impl DispatchReport {
	/// Returns true if every handler succeeded.
	pub fn is_clean(&self) -> bool {
		self.failures.is_empty()
	}
}

#[derive(Clone, Default)]
struct DispatchTable {
	factories: FxHashMap<VirtualIndex, ActivationHandler>,
	subscribers: Vec<(SubscriptionId, ActivationHandler)>,
}

/// Dispatcher for activation events.
pub struct EventBus {
	registry: Arc<Registry>,
	table: ArcSwap<DispatchTable>,
	next_id: AtomicU64,
	failures: AtomicU64,
}

impl EventBus {
	/// Creates a bus that reads per-channel callbacks from `registry`.
	pub fn new(registry: Arc<Registry>) -> Self {
		Self {
			registry,
			table: ArcSwap::from_pointee(DispatchTable::default()),
			next_id: AtomicU64::new(1),
			failures: AtomicU64::new(0),
		}
	}

	/// Registry this bus resolves channel callbacks against.
	pub fn registry(&self) -> &Arc<Registry> {
		&self.registry
	}

	/// Appends a general subscriber.
	pub fn subscribe(&self, handler: ActivationHandler) -> SubscriptionId {
		let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
		self.table.rcu(|table| {
			let mut next = DispatchTable::clone(table);
			next.subscribers.push((id, Arc::clone(&handler)));
			next
		});
		id
	}

	/// Removes a subscriber; returns whether it was present.
	pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
		let previous = self.table.rcu(|table| {
			let mut next = DispatchTable::clone(table);
			next.subscribers.retain(|(sid, _)| *sid != id);
			next
		});
		previous.subscribers.iter().any(|(sid, _)| *sid == id)
	}

	/// Number of general subscribers.
	pub fn subscriber_count(&self) -> usize {
		self.table.load().subscribers.len()
	}

	/// Installs the UI factory for the channel called `name`, replacing any previous one.
	///
	/// Factories are keyed by index, so this finalizes the registry.
	///
	/// # Errors
	///
	/// [`RegistryError::UnknownChannel`] if `name` resolves to no channel.
	pub fn register_ui_factory(&self, name: &str, factory: ActivationHandler) -> Result<VirtualIndex> {
		let index = self
			.registry
			.finalize()
			.resolve_index(name)
			.ok_or_else(|| RegistryError::UnknownChannel { name: name.to_owned() })?;
		self.table.rcu(|table| {
			let mut next = DispatchTable::clone(table);
			next.factories.insert(index, Arc::clone(&factory));
			next
		});
		Ok(index)
	}

	/// Total handler failures recorded since creation.
	pub fn failure_count(&self) -> u64 {
		self.failures.load(Ordering::Relaxed)
	}

	/// Delivers `event` to every interested handler.
	pub fn dispatch(&self, event: &ActivationEvent) -> DispatchReport {
		let mut report = DispatchReport::default();

		let channel = self
			.registry
			.resolver()
			.and_then(|resolver| resolver.channel(event.index).and_then(|def| def.on_added().cloned()));
		if let Some(handler) = channel {
			run_guarded(&mut report, HandlerStage::Channel, &handler, event);
		}

		let table = self.table.load_full();
		if let Some(factory) = table.factories.get(&event.index) {
			run_guarded(&mut report, HandlerStage::UiFactory, factory, event);
		}
		for (id, handler) in &table.subscribers {
			run_guarded(&mut report, HandlerStage::Subscriber(*id), handler, event);
		}

		if !report.failures.is_empty() {
			self.failures
				.fetch_add(report.failures.len() as u64, Ordering::Relaxed);
		}
		trace!(
			holder = %event.holder,
			index = %event.index,
			invoked = report.invoked,
			failed = report.failures.len(),
			"dispatched activation"
		);
		report
	}
}

impl fmt::Debug for EventBus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let table = self.table.load();
		f.debug_struct("EventBus")
			.field("subscribers", &table.subscribers.len())
			.field("factories", &table.factories.len())
			.field("failures", &self.failure_count())
			.finish()
	}
}

fn run_guarded(report: &mut DispatchReport, stage: HandlerStage, handler: &ActivationHandler, event: &ActivationEvent) {
	report.invoked += 1;
	let reason = match panic::catch_unwind(AssertUnwindSafe(|| handler(event))) {
		Ok(Ok(())) => return,
		Ok(Err(err)) => FailureReason::Error(err.to_string()),
		Err(payload) => FailureReason::Panic(panic_message(&*payload)),
	};
	error!(
		holder = %event.holder,
		index = %event.index,
		%stage,
		%reason,
		"activation handler failed"
	);
	report.failures.push(HandlerFailure { stage, reason });
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(msg) = payload.downcast_ref::<&'static str>() {
		(*msg).to_owned()
	} else if let Some(msg) = payload.downcast_ref::<String>() {
		msg.clone()
	} else {
		"non-string panic payload".to_owned()
	}
}
