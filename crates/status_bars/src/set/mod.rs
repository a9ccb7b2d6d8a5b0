//! The collection of custom bars next to the host's native ones.

use std::sync::Arc;

use parking_lot::Mutex;
use statusext_registry::{
	ActivationEvent, ActivationHandler, EventBus, HandlerResult, Registry, RegistryError, StatusOps,
	VirtualIndex,
};
use tracing::{debug, info, warn};

use crate::bar::{Bar, BarMetrics};

/// Counts from one [`BarSet::ensure_present`] pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnsureReport {
	/// Bars created by this pass.
	pub created: usize,
	/// Channels that already had a bar.
	pub present: usize,
	/// Channels without a resolvable index.
	pub skipped: usize,
}

/// Bars for every registered custom channel.
#[derive(Debug, Clone)]
pub struct BarSet {
	metrics: BarMetrics,
	bars: Vec<Bar>,
}

/// A [`BarSet`] shared with activation handlers.
///
/// Factories installed by [`install_factories`] never block on this lock. An activation
/// raised while the host holds it is logged and reported as a handler failure, and the
/// bar stays hidden until the next crossing.
pub type SharedBars = Arc<Mutex<BarSet>>;

impl BarSet {
	pub fn new(metrics: BarMetrics) -> Self {
		Self {
			metrics,
			bars: Vec::new(),
		}
	}

	pub fn metrics(&self) -> BarMetrics {
		self.metrics
	}

	pub fn bars(&self) -> &[Bar] {
		&self.bars
	}

	/// Bar for `index`, if one exists.
	pub fn get(&self, index: VirtualIndex) -> Option<&Bar> {
		self.bars.iter().find(|bar| bar.index() == index)
	}

	/// Creates a hidden bar for every registered custom channel that lacks one.
	///
	/// Channels whose names do not resolve (the registry is still open, for instance) are
	/// skipped and picked up by a later pass.
	pub fn ensure_present(&mut self, registry: &Registry) -> EnsureReport {
		let names = registry.custom_names();
		if names.is_empty() {
			debug!("no custom status channels registered yet");
			return EnsureReport::default();
		}

		let mut report = EnsureReport::default();
		for name in &names {
			let Some(index) = registry.resolve_index(name).filter(|i| i.get() >= registry.base_count()) else {
				warn!(name, "status channel has no valid index; no bar created");
				report.skipped += 1;
				continue;
			};
			if self.get(index).is_some() {
				report.present += 1;
				continue;
			}

			let mut bar = Bar::new(name.as_str(), index);
			bar.try_apply_icon(registry);
			debug!(name, %index, tint = ?bar.tint(), "created status bar");
			self.bars.push(bar);
			report.created += 1;
		}
		self.bars.sort_by_key(Bar::index);

		info!(
			names = names.len(),
			created = report.created,
			present = report.present,
			skipped = report.skipped,
			"ensured custom status bars"
		);
		report
	}

	/// Drives every bar from `holder`'s current values.
	pub fn drive<H>(&mut self, holder: &H, registry: &Registry)
	where
		H: StatusOps + ?Sized,
	{
		let metrics = self.metrics;
		for bar in &mut self.bars {
			bar.drive(holder.status(bar.index()), metrics);
			bar.try_apply_icon(registry);
		}
	}

	/// Advances every bar's easing by one frame.
	pub fn animate(&mut self, dt: f32) {
		for bar in &mut self.bars {
			bar.animate(dt);
		}
	}

	/// Shows the bar for an activated channel.
	///
	/// Returns false if no bar exists for the event's index.
	pub fn on_activation(&mut self, event: &ActivationEvent) -> bool {
		match self.bars.iter_mut().find(|bar| bar.index() == event.index) {
			Some(bar) => {
				bar.show();
				true
			}
			None => false,
		}
	}
}

/// Installs `bars` as the UI factory for each of its channels.
///
/// Returns the number of factories installed.
///
/// # Errors
///
/// [`RegistryError::UnknownChannel`] if a bar's channel no longer resolves.
pub fn install_factories(bars: &SharedBars, bus: &EventBus) -> Result<usize, RegistryError> {
	let names: Vec<String> = bars.lock().bars().iter().map(|bar| bar.name().to_owned()).collect();
	for name in &names {
		let shared = Arc::clone(bars);
		let factory: ActivationHandler = Arc::new(move |event: &ActivationEvent| -> HandlerResult {
			let Some(mut bars) = shared.try_lock() else {
				warn!(index = event.index.get(), "bar set is locked; activation not shown");
				return Err("bar set is locked by the caller".into());
			};
			bars.on_activation(event);
			Ok(())
		});
		bus.register_ui_factory(name, factory)?;
	}
	Ok(names.len())
}
