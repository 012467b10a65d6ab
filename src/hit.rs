#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::annotation::Spot;
use crate::viewport::Point;

/// Result of a hit test.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    pub spot: &'a Spot,
    /// Distance from the tap to the spot, in normalized units.
    pub distance: f64,
}

/// Find the visible spot closest to `at` within `radius` normalized units.
///
/// Hidden spots never match. On an exact tie the earlier spot wins. A miss is
/// `None`, not an error.
#[must_use]
pub fn hit_test<'a>(at: Point, spots: &'a [Spot], radius: f64) -> Option<Hit<'a>> {
    spots
        .iter()
        .filter(|spot| spot.is_visible())
        .map(|spot| Hit { spot, distance: at.distance(spot.position) })
        .filter(|hit| hit.distance <= radius)
        .reduce(|best, hit| if hit.distance < best.distance { hit } else { best })
}
