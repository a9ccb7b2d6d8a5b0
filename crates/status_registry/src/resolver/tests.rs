use std::sync::Arc;

use pretty_assertions::assert_eq;

use super::*;

fn natives() -> Arc<NativeTable> {
	Arc::new(NativeTable::new(["Injury", "Hunger", "Cold", "Poison", "Crab"]))
}

fn build(names: &[(&str, f32)]) -> IndexResolver {
	IndexResolver::build(
		natives(),
		names.iter().map(|(name, cap)| ChannelDef::new(name, *cap, None)),
	)
}

#[test]
fn indices_are_contiguous_and_sorted() {
	let resolver = build(&[("zeta", 1.0), ("Alpha", 1.0), ("mu", 1.0)]);

	let assigned: Vec<_> = resolver
		.custom_names()
		.map(|name| (name, resolver.resolve_index(name).map(VirtualIndex::get)))
		.collect();
	assert_eq!(
		assigned,
		vec![("Alpha", Some(5)), ("mu", Some(6)), ("zeta", Some(7))]
	);
	assert_eq!(resolver.total_count(), 8);
}

#[test]
fn resolves_names_in_both_directions() {
	let resolver = build(&[("Thirst", 1.0), ("Madness", 0.5)]);

	assert_eq!(resolver.resolve_index("madness"), Some(VirtualIndex::new(5)));
	assert_eq!(resolver.resolve_index("THIRST"), Some(VirtualIndex::new(6)));
	assert_eq!(resolver.resolve_index("poison"), Some(VirtualIndex::new(3)));
	assert_eq!(resolver.resolve_index("Drowsy"), None);

	assert_eq!(resolver.resolve_name(VirtualIndex::new(6)), Some("Thirst"));
	assert_eq!(resolver.resolve_name(VirtualIndex::new(1)), Some("Hunger"));
	assert_eq!(resolver.resolve_name(VirtualIndex::new(7)), None);
}

#[test]
fn cap_passes_through_for_native_indices() {
	let resolver = build(&[("Thirst", 1.0), ("Madness", 0.5)]);

	assert_eq!(resolver.cap_for(VirtualIndex::new(6), 0.9), 1.0);
	assert_eq!(resolver.cap_for(VirtualIndex::new(5), 0.9), 0.5);
	assert_eq!(resolver.cap_for(VirtualIndex::new(2), 0.9), 0.9);
	assert_eq!(resolver.cap_for(VirtualIndex::new(40), 0.9), 0.9);
}

#[test]
fn custom_name_shadows_native_on_name_lookup_only() {
	let resolver = build(&[("hunger", 2.0)]);

	assert_eq!(resolver.resolve_index("Hunger"), Some(VirtualIndex::new(5)));
	assert_eq!(resolver.resolve_name(VirtualIndex::new(1)), Some("Hunger"));
}

#[test]
fn signature_lists_names_in_index_order() {
	let resolver = build(&[("Thirst", 1.0), ("Madness", 0.5)]);
	assert_eq!(resolver.signature().as_str(), "5|Madness,Thirst");

	let empty = build(&[]);
	assert_eq!(empty.signature().as_str(), "5|");
}

#[test]
fn suggests_close_names() {
	let resolver = build(&[("Thirst", 1.0)]);
	assert_eq!(resolver.suggest("thrist"), Some("Thirst"));
	assert_eq!(resolver.suggest("hungr"), Some("Hunger"));
	assert_eq!(resolver.suggest("completely different"), None);
}
