//! In-place Fisher–Yates shuffle with an injected generator.

use rand::Rng;

/// Shuffle `items` in place.
///
/// For each `i` in `0..n-1`, swap `i` with a uniform pick from `i..n`. The
/// range includes `i` itself, so every permutation is equally likely.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    let n = items.len();
    if n <= 1 {
        return;
    }
    for i in 0..n - 1 {
        let j = rng.gen_range(i..n);
        items.swap(i, j);
    }
}
