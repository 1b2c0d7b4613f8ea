use rand::Rng;

/// Returns a uniformly random permutation of `items` (Fisher-Yates).
///
/// Walks `i` from the last index down to 1 and swaps with a uniform
/// `j` in `[0, i]`, so a given seed always yields the same seating.
///
/// The source slice is left untouched. Empty and single-element inputs come
/// back as-is.
pub fn shuffled<T: Clone, R: Rng>(items: &[T], rng: &mut R) -> Vec<T> {
	let mut out = items.to_vec();
	for i in (1..out.len()).rev() {
		let j = rng.random_range(0..=i);
		out.swap(i, j);
	}
	out
}
