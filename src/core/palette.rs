//! Centralized celebration color palette & helpers.
//! Single source of truth for every effect and the guestbook card colors.

use bevy::prelude::*;
use rand::Rng;

/// Base SRGB palette (kept small & high-contrast). Update here only.
pub const BASE_COLORS: [Color; 5] = [
    Color::srgb(1.00, 0.42, 0.616), // pink
    Color::srgb(0.608, 0.42, 1.00), // purple
    Color::srgb(0.306, 0.804, 0.769), // teal
    Color::srgb(1.00, 0.851, 0.239), // yellow
    Color::srgb(1.00, 0.604, 0.337), // orange
];

/// Returns a color for arbitrary index, wrapping around the base palette.
#[inline]
pub fn color_for_index(i: usize) -> Color {
    BASE_COLORS[i % BASE_COLORS.len()]
}

/// Uniform random pick from a non-empty slice of colors.
#[inline]
pub fn random_color(rng: &mut impl Rng, colors: &[Color]) -> Color {
    colors[rng.gen_range(0..colors.len())]
}
