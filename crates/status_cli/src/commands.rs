//! Subcommand implementations. Each writes its report to `out`.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, bail};
use parking_lot::Mutex;
use statusext_bars::tint_for;
use statusext_config::StatusConfig;
use statusext_registry::{
	ActivationEvent, HandlerResult, HolderId, MemoryHolder, StatusOps, StatusSystem,
};
use tracing::debug;

use crate::step::{Op, Step};

/// Loads `path` and registers its channels on a fresh system.
fn load_system(path: &Path) -> anyhow::Result<(StatusConfig, StatusSystem)> {
	let config = StatusConfig::load(path).with_context(|| format!("loading {}", path.display()))?;
	let system = StatusSystem::new(config.native_table());
	config.apply(system.registry()).context("registering configured channels")?;
	debug!(path = %path.display(), channels = config.channels.len(), "loaded status config");
	Ok((config, system))
}

fn hex(name: &str) -> String {
	let tint = tint_for(name);
	let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
	format!("#{:02x}{:02x}{:02x}", byte(tint.r), byte(tint.g), byte(tint.b))
}

pub fn dump(path: &Path, out: &mut impl Write) -> anyhow::Result<()> {
	let (config, system) = load_system(path)?;
	let resolver = system.registry().finalize();

	writeln!(out, "signature: {}", resolver.signature())?;
	writeln!(out, "natives ({}):", resolver.base_count())?;
	for (i, name) in resolver.natives().names().enumerate() {
		let cap = config.native_caps.get(i).copied().unwrap_or(statusext_registry::DEFAULT_NATIVE_CAP);
		writeln!(out, "  {i:>3}  {name}  cap={cap}")?;
	}
	writeln!(out, "custom ({}):", resolver.custom_count())?;
	for def in resolver.channels() {
		let Some(index) = resolver.resolve_custom(def.name()) else {
			continue;
		};
		write!(out, "  {:>3}  {}  cap={}  tint={}", index, def.name(), def.cap(), hex(def.name()))?;
		if let Some(icon) = system.icon_for(def.name()) {
			write!(out, "  icon={icon}")?;
		}
		writeln!(out)?;
	}
	for warning in &config.warnings {
		writeln!(out, "warning: {warning}")?;
	}
	Ok(())
}

pub fn lookup(path: &Path, name: &str, out: &mut impl Write) -> anyhow::Result<()> {
	let (_, system) = load_system(path)?;
	let registry = system.registry();
	registry.finalize();

	let Some(index) = registry.resolve_index(name) else {
		match registry.suggest(name) {
			Some(suggestion) => bail!("unknown status channel '{name}' (did you mean '{suggestion}'?)"),
			None => bail!("unknown status channel '{name}'"),
		}
	};
	let kind = if index.get() < registry.base_count() { "native" } else { "custom" };
	let canonical = registry.resolve_name(index).unwrap_or_else(|| name.to_owned());
	writeln!(out, "{canonical} -> {index} ({kind})")?;
	Ok(())
}

pub fn simulate(path: &Path, steps: &[Step], out: &mut impl Write) -> anyhow::Result<()> {
	let (config, system) = load_system(path)?;
	let fired: Arc<Mutex<Vec<ActivationEvent>>> = Arc::default();
	let sink = Arc::clone(&fired);
	system.subscribe(Arc::new(move |event: &ActivationEvent| -> HandlerResult {
		sink.lock().push(*event);
		Ok(())
	}));

	let mut holder = MemoryHolder::new(HolderId(1), system.registry().natives(), system.registry().clone())
		.with_native_caps(config.native_caps.iter().copied());
	system.prepare_holder(&mut holder).context("sizing the simulated holder")?;

	let mut detector = system.detector();
	for step in steps {
		let Some(index) = system.try_get_index(&step.name) else {
			writeln!(out, "{step}: unknown channel, skipped")?;
			continue;
		};
		let observed = match step.op {
			Op::Set => detector.set_status(&mut holder, index, step.value).activation,
			Op::Add => detector.add_status(&mut holder, index, step.value).activation,
			Op::Sub => detector.subtract_status(&mut holder, index, step.value).activation,
		};
		write!(out, "{step}: {} = {}", step.name, holder.status(index))?;
		if let Some(report) = observed {
			write!(out, "  ACTIVATED")?;
			for failure in &report.failures {
				write!(out, "  [{}: {}]", failure.stage, failure.reason)?;
			}
		}
		writeln!(out)?;
	}

	let fired = fired.lock();
	writeln!(out, "activations: {}", fired.len())?;
	for event in fired.iter() {
		let name = system
			.get_name_for_index(event.index)
			.unwrap_or_else(|| event.index.to_string());
		writeln!(out, "  {name} on holder {}", event.holder)?;
	}
	Ok(())
}
