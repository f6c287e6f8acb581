use serde::{Deserialize, Serialize};

/// A WGS84 position
///
/// Equality is exact on both axes; no tolerance is applied anywhere in the
/// diff pipeline, so a moved coordinate is always a geometry change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// Geometry value attached to an entity snapshot
///
/// Values compare by coordinate sequence (derived `PartialEq`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(Coordinate),
    LineString(Vec<Coordinate>),
}

impl Geometry {
    /// Build a point geometry
    pub fn point(lon: f64, lat: f64) -> Self {
        Geometry::Point(Coordinate::new(lon, lat))
    }

    /// Build a line geometry from ordered `(lon, lat)` pairs
    pub fn line<I>(coords: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        Geometry::LineString(
            coords
                .into_iter()
                .map(|(lon, lat)| Coordinate::new(lon, lat))
                .collect(),
        )
    }

    /// Number of positions in this geometry
    pub fn num_points(&self) -> usize {
        match self {
            Geometry::Point(_) => 1,
            Geometry::LineString(coords) => coords.len(),
        }
    }

    /// Whether this geometry satisfies standard validity rules
    ///
    /// A line string needs at least two positions.
    pub fn is_valid(&self) -> bool {
        match self {
            Geometry::Point(_) => true,
            Geometry::LineString(coords) => coords.len() >= 2,
        }
    }
}
