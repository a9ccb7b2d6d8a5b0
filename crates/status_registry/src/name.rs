//! Case-insensitive channel names.
//!
//! Names compare by ordinal over their uppercase-folded code points. `"thirst"`,
//! `"Thirst"` and `"THIRST"` denote one channel and sort to the same position on every
//! process, which is what makes finalized index assignment reproducible across peers.
//!
//! Folding is one code point to one code point. Characters whose uppercase form expands
//! to several code points (`'ß'` to `"SS"`) are kept as written, so `"straße"` and
//! `"STRASSE"` are distinct channels.

use std::cmp::Ordering;

/// Uppercases `c` when the mapping is a single code point.
fn fold_char(c: char) -> char {
	let mut upper = c.to_uppercase();
	match (upper.next(), upper.next()) {
		(Some(single), None) => single,
		_ => c,
	}
}

/// Folds `name` into its case-insensitive lookup key.
pub fn fold(name: &str) -> Box<str> {
	name.chars().map(fold_char).collect::<String>().into_boxed_str()
}

/// Ordinal, case-insensitive comparison.
pub fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
	a.chars().map(fold_char).cmp(b.chars().map(fold_char))
}

/// Returns true if `a` and `b` name the same channel.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
	cmp_ignore_case(a, b) == Ordering::Equal
}

/// Maximum edit distance accepted by [`nearest`].
const SUGGEST_MAX_DISTANCE: usize = 3;

/// Picks the candidate closest to `name` by case-insensitive edit distance.
pub fn nearest<'a>(name: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
	let wanted = fold(name);
	candidates
		.into_iter()
		.map(|known| (strsim::levenshtein(&wanted, &fold(known)), known))
		.filter(|(distance, _)| *distance <= SUGGEST_MAX_DISTANCE)
		.min_by_key(|(distance, _)| *distance)
		.map(|(_, known)| known)
}

/// Returns true if `name` cannot identify a channel.
pub fn is_blank(name: &str) -> bool {
	name.trim().is_empty()
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case("thirst", "THIRST", Ordering::Equal)]
	#[case("Madness", "thirst", Ordering::Less)]
	#[case("zeta", "Alpha", Ordering::Greater)]
	#[case("Mu", "mu_extra", Ordering::Less)]
	#[case("straße", "STRASSE", Ordering::Greater)]
	#[case("STRAßE", "straße", Ordering::Equal)]
	#[case("émile", "ÉMILE", Ordering::Equal)]
	fn compares_by_folded_code_points(#[case] a: &str, #[case] b: &str, #[case] expected: Ordering) {
		assert_eq!(cmp_ignore_case(a, b), expected);
	}

	#[test]
	fn fold_matches_comparison() {
		assert_eq!(&*fold("Thirst"), "THIRST");
		assert!(eq_ignore_case("madness", "MadNess"));
		assert_eq!(fold("a").as_ref().cmp(fold("B").as_ref()), cmp_ignore_case("a", "B"));
	}

	#[test]
	fn fold_never_expands_code_points() {
		assert_eq!(&*fold("straße"), "STRAßE");
		assert_eq!(fold("ŉ ß ǰ").chars().count(), "ŉ ß ǰ".chars().count());
		assert!(!eq_ignore_case("Straße", "STRASSE"));
		assert_eq!(fold("straße").as_ref().cmp(fold("STRASSE").as_ref()), cmp_ignore_case("straße", "STRASSE"));
	}

	#[test]
	fn blank_names() {
		assert!(is_blank(""));
		assert!(is_blank("  \t"));
		assert!(!is_blank(" x "));
	}
}
