//! Annotation model: the spots and the single flight path shown on the active map.
//!
//! Everything here is a pure data transform with no I/O. Collections are
//! scoped by an explicit [`MapId`]; switching maps swaps the whole live view
//! for the records the persistence layer supplies for the new map.
//!
//! Persisted data arrives as loosely typed JSON records ([`SpotRecord`],
//! [`PathRecord`]). Each record is validated on its own, so one corrupt entry
//! is skipped and logged while the rest of the map still loads.

#[cfg(test)]
#[path = "annotation_test.rs"]
mod annotation_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::viewport::Point;

/// Roster entry (team) that owns a pair of spots.
pub type OwnerId = u32;

/// Identifier of a free-form spot.
pub type SpotId = String;

/// Error describing why an annotation input was rejected.
#[derive(Debug, thiserror::Error)]
pub enum AnnotationError {
    /// The map name is not one of the tournament maps.
    #[error("unknown map: {0}")]
    UnknownMap(String),
    /// A coordinate is NaN or infinite.
    #[error("{field} is not a finite number")]
    NonFiniteCoordinate { field: &'static str },
    /// The record has neither an owner/category pair nor an id.
    #[error("record has no owner or id")]
    MissingIdentity,
    /// A free-form record has no category tag.
    #[error("free-form spot has no category")]
    MissingCategory,
    /// An owner record names a category other than `main` or `alt`.
    #[error("unknown roster category: {0}")]
    UnknownCategory(String),
    /// Another record with the same identity was already loaded.
    #[error("duplicate spot identity: {0}")]
    DuplicateIdentity(SpotIdentity),
    /// The JSON does not match the record shape.
    #[error("malformed record: {0}")]
    Malformed(#[from] serde_json::Error),
}

// =============================================================
// Maps
// =============================================================

/// The map an annotation set belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapId {
    #[default]
    Erangel,
    Miramar,
    Sanhok,
    Rondo,
    Taego,
}

impl MapId {
    /// Every tournament map, in menu order.
    pub const ALL: [MapId; 5] = [Self::Erangel, Self::Miramar, Self::Sanhok, Self::Rondo, Self::Taego];

    /// Lowercase key used in storage and URLs.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Erangel => "erangel",
            Self::Miramar => "miramar",
            Self::Sanhok => "sanhok",
            Self::Rondo => "rondo",
            Self::Taego => "taego",
        }
    }

    /// Image reference for the map's background.
    #[must_use]
    pub fn image_path(self) -> &'static str {
        match self {
            Self::Erangel => "/maps/Erangel.jpg",
            Self::Miramar => "/maps/Miramar.jpg",
            Self::Sanhok => "/maps/Sanhok.jpg",
            Self::Rondo => "/maps/Rondo.jpg",
            Self::Taego => "/maps/Taego.jpg",
        }
    }
}

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for MapId {
    type Err = AnnotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|map| map.key().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AnnotationError::UnknownMap(s.to_owned()))
    }
}

// =============================================================
// Spots
// =============================================================

/// Which of an owner's two alternate spots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Main,
    Alt,
}

impl Slot {
    /// The sibling slot.
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::Main => Self::Alt,
            Self::Alt => Self::Main,
        }
    }

    /// Persisted tag.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Alt => "alt",
        }
    }

    /// On-map label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Main => "MAIN",
            Self::Alt => "ALT",
        }
    }
}

/// Identity of a spot: an owner/slot pair for roster markers, an id otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SpotIdentity {
    OwnerCategory { owner_id: OwnerId, slot: Slot },
    FreeForm { id: SpotId },
}

impl fmt::Display for SpotIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OwnerCategory { owner_id, slot } => write!(f, "{owner_id}-{}", slot.key()),
            Self::FreeForm { id } => f.write_str(id),
        }
    }
}

/// Detail-view content attached to a free-form spot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpotDetails {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// What a spot marks.
#[derive(Debug, Clone, PartialEq)]
pub enum SpotKind {
    /// One of a roster entry's alternate drop spots.
    Roster { owner_id: OwnerId, slot: Slot },
    /// A category-tagged marker with no owner.
    FreeForm { id: SpotId, category: String, details: SpotDetails },
}

/// A marker on the map, positioned in normalized space.
#[derive(Debug, Clone, PartialEq)]
pub struct Spot {
    pub kind: SpotKind,
    pub position: Point,
    pub selected: bool,
    pub hidden: bool,
}

impl Spot {
    #[must_use]
    pub fn roster(owner_id: OwnerId, slot: Slot, position: Point) -> Self {
        Self { kind: SpotKind::Roster { owner_id, slot }, position, selected: false, hidden: false }
    }

    #[must_use]
    pub fn free_form(id: impl Into<SpotId>, category: impl Into<String>, position: Point) -> Self {
        Self {
            kind: SpotKind::FreeForm { id: id.into(), category: category.into(), details: SpotDetails::default() },
            position,
            selected: false,
            hidden: false,
        }
    }

    #[must_use]
    pub fn identity(&self) -> SpotIdentity {
        match &self.kind {
            SpotKind::Roster { owner_id, slot } => SpotIdentity::OwnerCategory { owner_id: *owner_id, slot: *slot },
            SpotKind::FreeForm { id, .. } => SpotIdentity::FreeForm { id: id.clone() },
        }
    }

    /// Whether this spot answers to `identity`, without allocating.
    #[must_use]
    pub fn matches(&self, identity: &SpotIdentity) -> bool {
        match (&self.kind, identity) {
            (SpotKind::Roster { owner_id, slot }, SpotIdentity::OwnerCategory { owner_id: o, slot: s }) => {
                owner_id == o && slot == s
            }
            (SpotKind::FreeForm { id, .. }, SpotIdentity::FreeForm { id: wanted }) => id == wanted,
            _ => false,
        }
    }

    #[must_use]
    pub fn owner(&self) -> Option<OwnerId> {
        match self.kind {
            SpotKind::Roster { owner_id, .. } => Some(owner_id),
            SpotKind::FreeForm { .. } => None,
        }
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        !self.hidden
    }
}

// =============================================================
// Flight path
// =============================================================

/// A directional segment drawn across the map. At most one exists per map.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightPath {
    pub id: String,
    pub start: Point,
    pub end: Point,
    pub color: Option<String>,
}

impl FlightPath {
    /// A new path with a freshly minted id.
    #[must_use]
    pub fn new(start: Point, end: Point) -> Self {
        Self { id: Uuid::new_v4().to_string(), start, end, color: None }
    }
}

// =============================================================
// Persisted records
// =============================================================

/// A spot as stored by the persistence layer.
///
/// Roster spots carry `teamId` and `type` (`"main"` / `"alt"`); free-form
/// spots carry `id`, a category `type`, and optional detail fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<OwnerId>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_selected: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

/// A flight path as stored by the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathRecord {
    pub id: String,
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

fn finite(field: &'static str, value: f64) -> Result<f64, AnnotationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AnnotationError::NonFiniteCoordinate { field })
    }
}

impl TryFrom<SpotRecord> for Spot {
    type Error = AnnotationError;

    fn try_from(record: SpotRecord) -> Result<Self, Self::Error> {
        let position = Point::new(finite("x", record.x)?, finite("y", record.y)?);
        let kind = match (record.team_id, record.id) {
            (Some(owner_id), _) => {
                let slot = match record.category.as_deref() {
                    Some("main") => Slot::Main,
                    Some("alt") => Slot::Alt,
                    Some(other) => return Err(AnnotationError::UnknownCategory(other.to_owned())),
                    None => return Err(AnnotationError::MissingCategory),
                };
                SpotKind::Roster { owner_id, slot }
            }
            (None, Some(id)) => {
                let category = record.category.ok_or(AnnotationError::MissingCategory)?;
                let details = SpotDetails {
                    title: record.title,
                    description: record.description,
                    image_url: record.image_url,
                };
                SpotKind::FreeForm { id, category, details }
            }
            (None, None) => return Err(AnnotationError::MissingIdentity),
        };
        Ok(Self { kind, position, selected: record.is_selected, hidden: record.is_hidden })
    }
}

impl From<&Spot> for SpotRecord {
    fn from(spot: &Spot) -> Self {
        let mut record = SpotRecord {
            x: spot.position.x,
            y: spot.position.y,
            is_selected: spot.selected,
            is_hidden: spot.hidden,
            ..SpotRecord::default()
        };
        match &spot.kind {
            SpotKind::Roster { owner_id, slot } => {
                record.team_id = Some(*owner_id);
                record.category = Some(slot.key().to_owned());
            }
            SpotKind::FreeForm { id, category, details } => {
                record.id = Some(id.clone());
                record.category = Some(category.clone());
                record.title.clone_from(&details.title);
                record.description.clone_from(&details.description);
                record.image_url.clone_from(&details.image_url);
            }
        }
        record
    }
}

impl TryFrom<PathRecord> for FlightPath {
    type Error = AnnotationError;

    fn try_from(record: PathRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record.id,
            start: Point::new(finite("startX", record.start_x)?, finite("startY", record.start_y)?),
            end: Point::new(finite("endX", record.end_x)?, finite("endY", record.end_y)?),
            color: record.color,
        })
    }
}

impl From<&FlightPath> for PathRecord {
    fn from(path: &FlightPath) -> Self {
        Self {
            id: path.id.clone(),
            start_x: path.start.x,
            start_y: path.start.y,
            end_x: path.end.x,
            end_y: path.end.y,
            color: path.color.clone(),
        }
    }
}

/// Outcome of loading a map's persisted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    pub spots: usize,
    pub paths: usize,
    pub skipped: usize,
}

// =============================================================
// Store
// =============================================================

/// Live spots and flight path for the active map.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    map: MapId,
    spots: Vec<Spot>,
    path: Option<FlightPath>,
}

impl AnnotationStore {
    /// An empty store for `map`.
    #[must_use]
    pub fn new(map: MapId) -> Self {
        Self { map, spots: Vec::new(), path: None }
    }

    // --- Queries ---

    #[must_use]
    pub fn map(&self) -> MapId {
        self.map
    }

    /// All spots in insertion order, hidden ones included.
    #[must_use]
    pub fn spots(&self) -> &[Spot] {
        &self.spots
    }

    pub fn visible_spots(&self) -> impl Iterator<Item = &Spot> {
        self.spots.iter().filter(|s| s.is_visible())
    }

    #[must_use]
    pub fn path(&self) -> Option<&FlightPath> {
        self.path.as_ref()
    }

    #[must_use]
    pub fn get(&self, identity: &SpotIdentity) -> Option<&Spot> {
        self.spots.iter().find(|s| s.matches(identity))
    }

    // --- Mutations ---

    /// Place (or move) the marker for `(owner_id, slot)`.
    pub fn add_roster_spot(&mut self, owner_id: OwnerId, slot: Slot, at: Point) {
        let identity = SpotIdentity::OwnerCategory { owner_id, slot };
        if let Some(existing) = self.spots.iter_mut().find(|s| s.matches(&identity)) {
            existing.position = at;
        } else {
            self.spots.push(Spot::roster(owner_id, slot, at));
        }
    }

    /// Place a new free-form marker and return its freshly minted id.
    pub fn add_free_spot(&mut self, category: impl Into<String>, at: Point, details: SpotDetails) -> SpotId {
        let id = Uuid::new_v4().to_string();
        self.spots.push(Spot {
            kind: SpotKind::FreeForm { id: id.clone(), category: category.into(), details },
            position: at,
            selected: false,
            hidden: false,
        });
        id
    }

    /// Insert `spot`, replacing any existing spot with the same identity in place.
    pub fn upsert_spot(&mut self, spot: Spot) {
        let identity = spot.identity();
        if let Some(existing) = self.spots.iter_mut().find(|s| s.matches(&identity)) {
            *existing = spot;
        } else {
            self.spots.push(spot);
        }
    }

    /// Remove a spot unconditionally, returning it if it existed.
    pub fn remove_spot(&mut self, identity: &SpotIdentity) -> Option<Spot> {
        let index = self.spots.iter().position(|s| s.matches(identity))?;
        Some(self.spots.remove(index))
    }

    /// Cycle an owner's pair: both shown → `slot` selected (sibling hidden) → both shown.
    ///
    /// Selecting the other slot while one is selected swaps the selection.
    /// Other owners' spots are untouched. Returns `false` if the target does not exist.
    pub fn select_alternate(&mut self, owner_id: OwnerId, slot: Slot) -> bool {
        let target = SpotIdentity::OwnerCategory { owner_id, slot };
        let Some(already_selected) = self.get(&target).map(|s| s.selected) else {
            return false;
        };
        for spot in &mut self.spots {
            let SpotKind::Roster { owner_id: owner, slot: this_slot } = spot.kind else {
                continue;
            };
            if owner != owner_id {
                continue;
            }
            if already_selected {
                spot.selected = false;
                spot.hidden = false;
            } else if this_slot == slot {
                spot.selected = true;
                spot.hidden = false;
            } else {
                spot.selected = false;
                spot.hidden = true;
            }
        }
        true
    }

    /// Store `path` as the map's only flight path, returning the one it replaced.
    pub fn replace_path(&mut self, path: FlightPath) -> Option<FlightPath> {
        self.path.replace(path)
    }

    pub fn clear_path(&mut self) -> Option<FlightPath> {
        self.path.take()
    }

    /// Clear the path and show every spot unselected.
    pub fn reset_all(&mut self) {
        self.path = None;
        for spot in &mut self.spots {
            spot.selected = false;
            spot.hidden = false;
        }
    }

    // --- Map switch / persistence ---

    /// Discard the live view and load `map` from persisted JSON records.
    ///
    /// Malformed records are skipped individually. When several valid paths are
    /// present only the last one is kept.
    pub fn switch_map(
        &mut self,
        map: MapId,
        spot_values: &[serde_json::Value],
        path_values: &[serde_json::Value],
    ) -> LoadReport {
        let mut report = LoadReport::default();
        self.map = map;
        self.spots.clear();
        self.path = None;

        for (index, value) in spot_values.iter().enumerate() {
            match self.load_spot(value) {
                Ok(()) => report.spots += 1,
                Err(error) => {
                    warn!(%map, index, %error, "skipping malformed spot record");
                    report.skipped += 1;
                }
            }
        }
        for (index, value) in path_values.iter().enumerate() {
            match parse_path(value) {
                Ok(path) => {
                    if self.path.replace(path).is_some() {
                        warn!(%map, index, "multiple flight paths stored; keeping the last");
                    }
                    report.paths = 1;
                }
                Err(error) => {
                    warn!(%map, index, %error, "skipping malformed flight path record");
                    report.skipped += 1;
                }
            }
        }
        self.normalize_selection();
        info!(%map, spots = report.spots, paths = report.paths, skipped = report.skipped, "map annotations loaded");
        report
    }

    fn load_spot(&mut self, value: &serde_json::Value) -> Result<(), AnnotationError> {
        let record = SpotRecord::deserialize(value)?;
        let spot = Spot::try_from(record)?;
        let identity = spot.identity();
        if self.get(&identity).is_some() {
            return Err(AnnotationError::DuplicateIdentity(identity));
        }
        self.spots.push(spot);
        Ok(())
    }

    /// Keep at most one visible selected spot per owner; later ones lose selection.
    fn normalize_selection(&mut self) {
        let mut seen: Vec<OwnerId> = Vec::new();
        for spot in &mut self.spots {
            let Some(owner) = spot.owner() else {
                continue;
            };
            if !spot.selected || spot.hidden {
                continue;
            }
            if seen.contains(&owner) {
                warn!(map = %self.map, owner, "conflicting selections stored; clearing extra");
                spot.selected = false;
            } else {
                seen.push(owner);
            }
        }
    }

    /// Spots in persisted form, for the persistence layer to write back.
    #[must_use]
    pub fn spot_records(&self) -> Vec<SpotRecord> {
        self.spots.iter().map(SpotRecord::from).collect()
    }

    /// The path (zero or one) in persisted form.
    #[must_use]
    pub fn path_records(&self) -> Vec<PathRecord> {
        self.path.iter().map(PathRecord::from).collect()
    }
}

fn parse_path(value: &serde_json::Value) -> Result<FlightPath, AnnotationError> {
    let record = PathRecord::deserialize(value)?;
    FlightPath::try_from(record)
}
