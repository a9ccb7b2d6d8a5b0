//! End-to-end flow: register, finalize, expand a holder, mutate by name and observe
//! activations on the bus.

use std::sync::Arc;

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use statusext_registry::{
	ActivationEvent, ActivationHandler, Expansion, HandlerResult, HandlerStage, HolderId,
	IconHandle, MemoryHolder, NamedStatusExt, NativeTable, StatusOps, StatusSystem, VirtualIndex,
};

type Log = Arc<Mutex<Vec<String>>>;

fn recorder(log: &Log, tag: &'static str) -> ActivationHandler {
	let log = Arc::clone(log);
	Arc::new(move |event: &ActivationEvent| {
		log.lock().push(format!("{tag}:{}:{}", event.holder, event.index));
		Ok(())
	})
}

#[test]
fn test_extension_lifecycle() {
	let log: Log = Arc::default();
	let system = StatusSystem::new(NativeTable::new(["Injury", "Hunger", "Fatigue", "Cold", "Poison"]));

	// Two extensions, unaware of each other.
	system.register_status("Thirst", 1.0, Some(recorder(&log, "thirst"))).unwrap();
	system
		.registry()
		.register_with_icon("Madness", 0.5, None, Some(IconHandle::new("madness.png")))
		.unwrap();
	system.subscribe(recorder(&log, "sub"));
	system.subscribe(Arc::new(|_: &ActivationEvent| -> HandlerResult {
		Err("subscriber always fails".into())
	}));

	let mut holder = MemoryHolder::new(HolderId(1), system.registry().natives(), system.registry().clone());
	assert_eq!(system.prepare_holder(&mut holder), Some(Expansion::Grown { arrays: 5, len: 7 }));
	system.register_ui_factory("madness", recorder(&log, "ui")).unwrap();

	let registry = Arc::clone(system.registry());
	let mut detector = system.detector();
	{
		let mut tracked = detector.track(&mut holder);
		assert!(tracked.add_status_by_name(&*registry, "madness", 2.0));
		assert!(tracked.add_status_by_name(&*registry, "Thirst", 0.25));
		assert!(tracked.add_status_by_name(&*registry, "Thirst", 0.25));
		assert!(!tracked.add_status_by_name(&*registry, "Unknown", 0.25));
		tracked.subtract_status(VirtualIndex::new(6), 1.0);
		assert!(tracked.add_status_by_name(&*registry, "thirst", 0.1));
	}

	assert_eq!(holder.status_by_name(&*registry, "Madness"), 0.5, "clamped to registered cap");
	assert_eq!(
		*log.lock(),
		[
			"ui:#1:5",
			"sub:#1:5",
			"thirst:#1:6",
			"sub:#1:6",
			"thirst:#1:6",
			"sub:#1:6",
		]
	);
	assert_eq!(system.bus().failure_count(), 3);
	assert_eq!(system.icon_for("MADNESS"), Some(IconHandle::new("madness.png")));
}

#[test]
fn test_failures_are_reported_per_handler() {
	let system = StatusSystem::new(NativeTable::new(["Injury"]));
	let exploding: ActivationHandler = Arc::new(|_: &ActivationEvent| -> HandlerResult {
		panic!("channel handler blew up")
	});
	system.register_status("Thirst", 1.0, Some(exploding)).unwrap();
	let mut holder = MemoryHolder::new(HolderId(2), system.registry().natives(), system.registry().clone());
	system.prepare_holder(&mut holder).unwrap();

	let thirst = system.try_get_index("Thirst").unwrap();
	let mut detector = system.detector();
	let observed = detector.add_status(&mut holder, thirst, 0.5);
	let report = observed.activation.unwrap();

	assert!(observed.outcome);
	assert_eq!(report.failures.len(), 1);
	assert_eq!(report.failures[0].stage, HandlerStage::Channel);
	assert!(report.failures[0].reason.to_string().contains("channel handler blew up"));
	assert_eq!(holder.status(thirst), 0.5);
}
