//! Random draw order shared by the poule and bracket builders.

use rand::seq::SliceRandom;
use rand::Rng;

/// Uniformly shuffled copy of `items` (Fisher–Yates via `SliceRandom::shuffle`).
pub fn draw_order<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut drawn = items.to_vec();
    drawn.shuffle(rng);
    drawn
}
