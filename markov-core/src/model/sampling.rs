/// Picks a bucket from integer weights given a draw in `[0, total)`.
///
/// Scans the weights in order and returns the index of the first bucket at
/// which the running total exceeds `draw`. Draw `0` selects the first
/// nonzero bucket, draw `total - 1` the last nonzero one.
///
/// Returns `None` if `draw >= total` (this includes an all-zero or empty
/// distribution).
pub(crate) fn pick_weighted(weights: &[u64], draw: u64) -> Option<usize> {
	let mut cumulative: u64 = 0;
	for (index, weight) in weights.iter().enumerate() {
		cumulative += weight;
		if cumulative > draw {
			return Some(index);
		}
	}
	None
}
