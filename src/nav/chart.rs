use std::collections::HashSet;
use std::path::Path;

use crate::core::{Coordinate, Error, Result};

/// Immutable set of navigable coordinates, loaded once at startup.
///
/// The chart is precomputed offline (image clustering on the operator's
/// machine) and handed to the daemon as a JSON file of `[x, y]` pairs.
#[derive(Debug, Clone)]
pub struct SafeWaterSet {
    points: HashSet<Coordinate>,
}

impl SafeWaterSet {
    /// Loads the chart from a JSON file. Fatal if the file is missing or malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .map_err(|e| Error::load(format!("failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&data)
    }

    /// Parses a chart from a JSON array of `[x, y]` integer pairs.
    pub fn from_json(data: &str) -> Result<Self> {
        let pairs: Vec<(i64, i64)> = serde_json::from_str(data)
            .map_err(|e| Error::load(format!("malformed chart data: {}", e)))?;
        Ok(Self::from_points(
            pairs.into_iter().map(|(x, y)| Coordinate::new(x, y)),
        ))
    }

    /// Builds a chart from a collection of coordinates.
    pub fn from_points(points: impl IntoIterator<Item = Coordinate>) -> Self {
        SafeWaterSet {
            points: points.into_iter().collect(),
        }
    }

    /// Returns true if the given point is in safe water.
    pub fn contains(&self, point: Coordinate) -> bool {
        self.points.contains(&point)
    }

    /// Number of safe coordinates in the chart.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the chart holds no coordinates.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
