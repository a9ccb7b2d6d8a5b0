//! Integration tests for registration, finalization and cross-peer determinism.

use std::sync::Arc;
use std::thread;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use statusext_registry::{NativeTable, Registration, Registry, VirtualIndex};

fn natives() -> NativeTable {
	NativeTable::new(["Injury", "Hunger", "Fatigue", "Cold", "Poison"])
}

fn layout(registry: &Registry) -> Vec<(String, usize)> {
	let resolver = registry.finalize();
	resolver
		.custom_names()
		.map(|name| (name.to_owned(), resolver.resolve_index(name).map_or(usize::MAX, VirtualIndex::get)))
		.collect()
}

/// Must produce one layout no matter how registration interleaves across threads.
///
/// - Enforced in: `Registry::register_custom`, `IndexResolver::build`
/// - Failure symptom: peers disagree on indices and their signatures differ.
#[test]
fn test_concurrent_registration_is_deterministic() {
	let names: Vec<String> = (0..64).map(|i| format!("Channel{i:02}")).collect();
	let registry = Arc::new(Registry::new(natives()));

	thread::scope(|scope| {
		for chunk in names.chunks(8) {
			let registry = &registry;
			scope.spawn(move || {
				for name in chunk.iter().rev() {
					assert_eq!(registry.register(name, 1.0, None), Ok(Registration::Pending));
					// Same name in another casing must not create a second channel.
					let _ = registry.register(&name.to_lowercase(), 9.0, None);
				}
			});
		}
	});

	let sequential = Registry::new(natives());
	for name in &names {
		sequential.register(name, 1.0, None).unwrap();
	}

	assert_eq!(registry.custom_count(), 64);
	assert_eq!(layout(&registry), layout(&sequential));
	assert_eq!(registry.signature(), sequential.signature());
	for name in &names {
		let index = registry.resolve_index(name).unwrap();
		assert_eq!(registry.cap_for(index, 0.0), 1.0, "first registration keeps its cap");
	}
}

/// Must finalize exactly once when many threads race to it.
///
/// - Enforced in: `Registry::finalize`
/// - Failure symptom: two resolvers published, holders sized against different layouts.
#[test]
fn test_racing_finalize_publishes_one_resolver() {
	let registry = Registry::new(natives());
	registry.register("Thirst", 1.0, None).unwrap();
	registry.register("Madness", 0.5, None).unwrap();

	let resolvers: Vec<_> = thread::scope(|scope| {
		let handles: Vec<_> = (0..8).map(|_| scope.spawn(|| registry.finalize())).collect();
		handles.into_iter().map(|h| h.join().unwrap()).collect()
	});

	for resolver in &resolvers {
		assert!(Arc::ptr_eq(resolver, &resolvers[0]));
	}
	assert_eq!(resolvers[0].signature().as_str(), "5|Madness,Thirst");
}

#[test]
fn test_registration_after_finalize() {
	let registry = Registry::new(natives());
	registry.register("Thirst", 1.0, None).unwrap();
	let before = registry.finalize();

	assert_eq!(
		registry.register("thirst", 3.0, None),
		Ok(Registration::Assigned(VirtualIndex::new(5)))
	);
	assert_eq!(registry.register("Drowsy", 1.0, None), Ok(Registration::NotFound));
	assert_eq!(registry.total_count(), 6);
	assert_eq!(registry.cap_for(VirtualIndex::new(5), 0.0), 1.0);
	assert!(Arc::ptr_eq(&before, &registry.finalize()));
}

proptest! {
	/// Any permutation of the same names yields the same layout and signature.
	#[test]
	fn prop_permutation_determinism(names in prop::collection::hash_set("[a-z]{1,8}", 1..12)
		.prop_map(|set| set.into_iter().collect::<Vec<_>>())
		.prop_shuffle()
	) {
		let shuffled = Registry::new(natives());
		for name in &names {
			shuffled.register(name, 1.0, None).unwrap();
		}

		let mut sorted_names = names.clone();
		sorted_names.sort();
		let sorted = Registry::new(natives());
		for name in &sorted_names {
			sorted.register(name, 1.0, None).unwrap();
		}

		prop_assert_eq!(shuffled.signature(), sorted.signature());
		prop_assert_eq!(layout(&shuffled), layout(&sorted));

		let base = shuffled.base_count();
		let total = shuffled.total_count();
		for (_, index) in layout(&shuffled) {
			prop_assert!((base..total).contains(&index));
		}
	}
}
