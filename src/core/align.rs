use crate::core::series::Series;

/// Augments `source` with a value at every key present in `target`.
///
/// Missing keys are filled by linear interpolation between the nearest
/// `source` keys strictly below and strictly above. When a key falls outside
/// the `source` span (one or both neighbors missing), the `target` value is
/// adopted verbatim instead of extrapolating. Keys already present in
/// `source` keep their `source` value exactly.
///
/// Calling this both ways, `fill_with(from, to)` and `fill_with(to, from)`,
/// yields two series over an identical key set so position-wise
/// interpolation is always well defined.
#[must_use]
pub fn fill_with(source: &Series, target: &Series) -> Series {
    if source.is_empty() {
        return target.clone();
    }

    let source_keys: Vec<i64> = source.keys().collect();
    let mut filled: Vec<(i64, f64)> = source.iter().collect();

    for (key, target_value) in target.iter() {
        if source.contains_key(key) {
            continue;
        }
        let value = interpolated_value(key, &source_keys, source).unwrap_or(target_value);
        filled.push((key, value));
    }

    Series::from_pairs(filled)
}

/// Linear interpolation at `key` between the nearest surrounding source keys.
///
/// Returns `None` when `key` has no strict neighbor on either side.
fn interpolated_value(key: i64, source_keys: &[i64], source: &Series) -> Option<f64> {
    let insert_at = source_keys.partition_point(|existing| *existing < key);
    if insert_at == 0 || insert_at == source_keys.len() {
        return None;
    }

    let before_key = source_keys[insert_at - 1];
    let after_key = source_keys[insert_at];
    let before_value = source.get(before_key)?;
    let after_value = source.get(after_key)?;

    // v = (t - t1) * (v2 - v1) / (t2 - t1) + v1
    let span = (after_key - before_key) as f64;
    let offset = (key - before_key) as f64;
    Some(offset * (after_value - before_value) / span + before_value)
}
