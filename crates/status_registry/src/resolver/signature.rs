use std::fmt;

/// Deterministic fingerprint of a finalized channel layout.
///
/// Format: `"<base_count>|<name1>,<name2>,..."` in index order. Two processes that
/// finalized the same native table and the same set of names produce equal signatures.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CompositionSignature(Box<str>);

impl CompositionSignature {
	pub(crate) fn compute<'a>(base_count: usize, names: impl IntoIterator<Item = &'a str>) -> Self {
		let mut out = base_count.to_string();
		out.push('|');
		for (i, name) in names.into_iter().enumerate() {
			if i > 0 {
				out.push(',');
			}
			out.push_str(name);
		}
		Self(out.into_boxed_str())
	}

	/// Returns the signature text.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for CompositionSignature {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}
