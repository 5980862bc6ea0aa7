//! One-dimensional packing of a wall run into shelf segments.

use tracing::debug;

use crate::catalog::{MAX_LEN, MIN_LEN, round1};

/// Split `target` cm into segment lengths of at most [`MAX_LEN`].
///
/// Full-length segments are laid first. A remainder shorter than [`MIN_LEN`]
/// is not built, so the returned lengths can sum to less than `target`.
pub fn pack_lengths(target: f64) -> Vec<f64> {
    if target <= 0.0 {
        return Vec::new();
    }
    if target <= MAX_LEN {
        return vec![round1(target)];
    }
    let n_full = (target / MAX_LEN).floor() as usize;
    let rem = target - n_full as f64 * MAX_LEN;
    let mut out = vec![MAX_LEN; n_full];
    if rem == 0.0 {
        return out;
    }
    if rem < MIN_LEN {
        debug!(target, rem, "Dropping offcut below minimum segment length");
        return out;
    }
    out.push(round1(rem));
    out
}
