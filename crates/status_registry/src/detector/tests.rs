use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::channel::HandlerResult;
use crate::host::MemoryHolder;
use crate::index::NativeTable;
use crate::registry::Registry;

struct Fixture {
	registry: Arc<Registry>,
	detector: TransitionDetector,
	fired: Arc<AtomicUsize>,
}

fn fixture() -> Fixture {
	let registry = Arc::new(Registry::new(NativeTable::new(["Injury", "Hunger"])));
	registry.register("Thirst", 1.0, None).unwrap();
	registry.finalize();

	let bus = Arc::new(EventBus::new(Arc::clone(&registry)));
	let fired = Arc::new(AtomicUsize::new(0));
	let counter = Arc::clone(&fired);
	bus.subscribe(Arc::new(move |_: &ActivationEvent| -> HandlerResult {
		counter.fetch_add(1, Ordering::SeqCst);
		Ok(())
	}));

	Fixture {
		registry,
		detector: TransitionDetector::new(bus),
		fired,
	}
}

fn holder(registry: &Arc<Registry>, id: u64) -> MemoryHolder {
	let mut holder = MemoryHolder::new(HolderId(id), registry.natives(), registry.clone());
	crate::expand::expand_holder(registry, &mut holder).unwrap();
	holder
}

#[test]
fn fires_once_across_reference_sequence() {
	let Fixture {
		registry,
		mut detector,
		fired,
	} = fixture();
	let mut h = holder(&registry, 1);
	let thirst = registry.resolve_index("Thirst").unwrap();

	let steps = [
		detector.set_status(&mut h, thirst, 0.0).fired(),
		detector.add_status(&mut h, thirst, 0.3).fired(),
		detector.add_status(&mut h, thirst, 0.2).fired(),
		detector.subtract_status(&mut h, thirst, 0.1).fired(),
		detector.add_status(&mut h, thirst, 0.4).fired(),
	];

	assert_eq!(steps, [false, true, false, false, false]);
	assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[test]
fn rearms_after_returning_to_zero() {
	let Fixture {
		registry,
		mut detector,
		fired,
	} = fixture();
	let mut h = holder(&registry, 1);
	let thirst = registry.resolve_index("Thirst").unwrap();

	detector.add_status(&mut h, thirst, 0.5);
	detector.subtract_status(&mut h, thirst, 0.5);
	assert!(!detector.is_active(HolderId(1), thirst));
	assert!(detector.add_status(&mut h, thirst, 0.1).fired());
	assert_eq!(fired.load(Ordering::SeqCst), 2);
}

#[test]
fn pairs_are_independent() {
	let Fixture {
		registry,
		mut detector,
		fired,
	} = fixture();
	let mut a = holder(&registry, 1);
	let mut b = holder(&registry, 2);
	let thirst = registry.resolve_index("Thirst").unwrap();
	let hunger = registry.resolve_index("Hunger").unwrap();

	assert!(detector.add_status(&mut a, thirst, 0.2).fired());
	assert!(detector.add_status(&mut b, thirst, 0.2).fired());
	assert!(detector.add_status(&mut a, hunger, 0.2).fired());
	assert!(!detector.add_status(&mut a, thirst, 0.2).fired());
	assert_eq!(fired.load(Ordering::SeqCst), 3);
}

#[test]
fn rejected_mutations_do_not_fire() {
	let Fixture {
		registry,
		mut detector,
		fired,
	} = fixture();
	let mut h = holder(&registry, 1);
	let thirst = registry.resolve_index("Thirst").unwrap();

	let observed = detector.add_status(&mut h, thirst, -1.0);
	assert!(!observed.outcome);
	assert!(!observed.fired());

	let beyond = VirtualIndex::new(40);
	assert!(!detector.add_status(&mut h, beyond, 1.0).fired());
	assert_eq!(fired.load(Ordering::SeqCst), 0);
}

#[test]
fn notify_mutation_uses_latch() {
	let Fixture {
		registry,
		mut detector,
		fired,
	} = fixture();
	let mut h = holder(&registry, 1);
	let thirst = registry.resolve_index("Thirst").unwrap();

	h.add_status(thirst, 0.3);
	assert!(detector.notify_mutation(&h, thirst, 0.3).is_some());
	h.add_status(thirst, 0.3);
	assert!(detector.notify_mutation(&h, thirst, 0.3).is_none());
	h.set_status(thirst, 0.0);
	assert!(detector.notify_mutation(&h, thirst, 0.0).is_none());
	h.add_status(thirst, 0.1);
	assert!(detector.notify_mutation(&h, thirst, 0.1).is_some());
	assert_eq!(fired.load(Ordering::SeqCst), 2);
}

#[test]
fn tracked_view_routes_through_detector() {
	let Fixture {
		registry,
		mut detector,
		fired,
	} = fixture();
	let mut h = holder(&registry, 1);
	let thirst = registry.resolve_index("Thirst").unwrap();

	{
		let mut tracked = detector.track(&mut h);
		assert!(tracked.add_status(thirst, 0.4));
		tracked.add_status(thirst, 0.4);
		assert_eq!(tracked.status(thirst), 0.8);
	}
	assert_eq!(fired.load(Ordering::SeqCst), 1);

	detector.forget_holder(HolderId(1));
	assert!(!detector.is_active(HolderId(1), thirst));
}

#[test]
fn notify_on_already_positive_holder_only_latches() {
	let Fixture {
		registry,
		mut detector,
		fired,
	} = fixture();
	let mut h = holder(&registry, 1);
	let thirst = registry.resolve_index("Thirst").unwrap();

	// Raised before any detector observed the holder.
	h.add_status(thirst, 0.3);
	h.add_status(thirst, 0.2);
	assert!(detector.notify_mutation(&h, thirst, 0.2).is_none());
	assert!(detector.is_active(HolderId(1), thirst));
	assert_eq!(fired.load(Ordering::SeqCst), 0);

	h.subtract_status(thirst, 1.0);
	assert!(detector.notify_mutation(&h, thirst, 1.0).is_none());
	h.add_status(thirst, 0.25);
	assert!(detector.notify_mutation(&h, thirst, 0.25).is_some());
	assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[test]
fn detectors_sharing_a_latch_fire_once() {
	let Fixture {
		registry,
		mut detector,
		fired,
	} = fixture();
	let mut h = holder(&registry, 1);
	let thirst = registry.resolve_index("Thirst").unwrap();
	let bus = Arc::new(EventBus::new(Arc::clone(&registry)));
	let mut other = TransitionDetector::with_latch(bus, Arc::clone(detector.latch()));

	h.add_status(thirst, 0.3);
	assert!(detector.notify_mutation(&h, thirst, 0.3).is_some());
	assert!(other.notify_mutation(&h, thirst, 0.3).is_none());
	assert!(other.is_active(HolderId(1), thirst));
	assert_eq!(fired.load(Ordering::SeqCst), 1);
}
