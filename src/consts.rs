//! Shared numeric constants for the map viewport.

// ── Zoom ────────────────────────────────────────────────────────

/// Smallest zoom factor; the map is never shown smaller than its container.
pub const ZOOM_MIN: f64 = 1.0;

/// Largest zoom factor.
pub const ZOOM_MAX: f64 = 3.0;

/// Per-tick multiplier when the wheel scrolls toward the user (zoom in).
pub const WHEEL_ZOOM_IN: f64 = 1.1;

/// Per-tick multiplier when the wheel scrolls away from the user (zoom out).
pub const WHEEL_ZOOM_OUT: f64 = 0.9;

// ── Normalized space ────────────────────────────────────────────

/// Extent of each normalized map axis; coordinates span `[0, NORMALIZED_EXTENT]`.
pub const NORMALIZED_EXTENT: f64 = 100.0;

// ── Hit-testing / taps ──────────────────────────────────────────

/// Hit radius around a spot, in normalized units.
pub const HIT_RADIUS: f64 = 2.0;

/// Accumulated mouse travel (screen pixels) above which a press is a drag, not a click.
pub const TAP_SLOP_PX: f64 = 3.0;

// ── Markers ─────────────────────────────────────────────────────

/// Marker edge length in screen pixels when selected.
pub const MARKER_SIZE_SELECTED_PX: f64 = 48.0;

/// Marker edge length in screen pixels when not selected.
pub const MARKER_SIZE_PX: f64 = 32.0;

/// Marker opacity when not selected.
pub const MARKER_IDLE_OPACITY: f64 = 0.7;

/// Roster marker color when selected.
pub const ROSTER_SELECTED_COLOR: &str = "#00ff00";

/// Roster marker color when not selected.
pub const ROSTER_COLOR: &str = "#ff0000";

/// Fallback color for a free-form category missing from the palette.
pub const UNKNOWN_CATEGORY_COLOR: &str = "#9ca3af";

/// Flight path stroke color.
pub const FLIGHT_PATH_COLOR: &str = "#ffffff";
