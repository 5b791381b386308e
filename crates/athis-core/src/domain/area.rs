//! Intervention areas and the reference catalog.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::errors::{AthisError, Result};
use super::geo::GeoPoint;

/// Intervention priority of an area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Weight used to rank areas: critical=4, high=3, medium=2, low=1.
    pub fn weight(self) -> u8 {
        match self {
            Priority::Critical => 4,
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Infrastructure {
    Good,
    Poor,
    Inexistent,
}

/// A predefined geographic zone.
///
/// `boundary` is implicitly closed: the last vertex connects back to the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub id: String,
    pub name: String,
    pub boundary: Vec<GeoPoint>,
    pub priority: Priority,
    pub population: u64,
    pub infrastructure: Infrastructure,
}

impl Area {
    /// Even-odd ray casting with lng as x and lat as y.
    /// Points exactly on an edge may fall on either side.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        let vertices = &self.boundary;
        if vertices.len() < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = vertices.len() - 1;
        for i in 0..vertices.len() {
            let (a, b) = (vertices[i], vertices[j]);
            if (a.lat > point.lat) != (b.lat > point.lat) {
                let crossing = (b.lng - a.lng) * (point.lat - a.lat) / (b.lat - a.lat) + a.lng;
                if point.lng < crossing {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(AthisError::validation("area id cannot be empty"));
        }
        if self.boundary.len() < 3 {
            return Err(AthisError::validation(format!(
                "area '{}' needs at least 3 boundary points, got {}",
                self.id,
                self.boundary.len()
            )));
        }
        for vertex in &self.boundary {
            vertex
                .validate()
                .map_err(|e| AthisError::validation(format!("area '{}': {e}", self.id)))?;
        }
        Ok(())
    }
}

/// Static reference catalog of areas, in catalog order.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaCatalog {
    areas: Vec<Area>,
}

impl AreaCatalog {
    /// Rejects duplicate ids and malformed boundaries.
    pub fn new(areas: Vec<Area>) -> Result<Self> {
        let mut seen = HashSet::new();
        for area in &areas {
            area.validate()?;
            if !seen.insert(area.id.as_str()) {
                return Err(AthisError::validation(format!(
                    "duplicate area id '{}'",
                    area.id
                )));
            }
        }
        Ok(Self { areas })
    }

    /// The three Uberaba seed areas: industrial zone, north periphery, historic center.
    pub fn seed() -> Self {
        Self {
            areas: seed_areas(),
        }
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    pub fn get(&self, id: &str) -> Option<&Area> {
        self.areas.iter().find(|area| area.id == id)
    }

    /// Areas whose boundary contains `point`, in catalog order.
    pub fn containing(&self, point: &GeoPoint) -> Vec<&Area> {
        self.areas.iter().filter(|area| area.contains(point)).collect()
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}

impl Default for AreaCatalog {
    fn default() -> Self {
        Self::seed()
    }
}

fn seed_areas() -> Vec<Area> {
    vec![
        Area {
            id: "industrial".to_string(),
            name: "Zona Industrial".to_string(),
            boundary: vec![
                GeoPoint::new(-19.740, -47.940),
                GeoPoint::new(-19.740, -47.935),
                GeoPoint::new(-19.745, -47.935),
                GeoPoint::new(-19.745, -47.940),
            ],
            priority: Priority::High,
            population: 12_500,
            infrastructure: Infrastructure::Poor,
        },
        Area {
            id: "periferia_norte".to_string(),
            name: "Periferia Norte".to_string(),
            boundary: vec![
                GeoPoint::new(-19.755, -47.925),
                GeoPoint::new(-19.755, -47.920),
                GeoPoint::new(-19.760, -47.920),
                GeoPoint::new(-19.760, -47.925),
            ],
            priority: Priority::Critical,
            population: 8_900,
            infrastructure: Infrastructure::Inexistent,
        },
        Area {
            id: "centro".to_string(),
            name: "Centro Histórico".to_string(),
            boundary: vec![
                GeoPoint::new(-19.747, -47.932),
                GeoPoint::new(-19.747, -47.927),
                GeoPoint::new(-19.752, -47.927),
                GeoPoint::new(-19.752, -47.932),
            ],
            priority: Priority::Medium,
            population: 15_600,
            infrastructure: Infrastructure::Good,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(id: &str) -> Area {
        Area {
            id: id.to_string(),
            name: id.to_string(),
            boundary: vec![
                GeoPoint::new(0.0, 0.0),
                GeoPoint::new(0.0, 1.0),
                GeoPoint::new(1.0, 1.0),
                GeoPoint::new(1.0, 0.0),
            ],
            priority: Priority::Low,
            population: 0,
            infrastructure: Infrastructure::Good,
        }
    }

    #[test]
    fn seed_catalog_matches_reference() {
        let catalog = AreaCatalog::seed();
        let ids: Vec<&str> = catalog.areas().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["industrial", "periferia_norte", "centro"]);
        let priorities: Vec<Priority> = catalog.areas().iter().map(|a| a.priority).collect();
        assert_eq!(
            priorities,
            vec![Priority::High, Priority::Critical, Priority::Medium]
        );
        // the seed must satisfy the same rules as a configured catalog
        assert!(AreaCatalog::new(catalog.areas().to_vec()).is_ok());
    }

    #[test]
    fn weights_are_ordered() {
        assert!(Priority::Critical.weight() > Priority::High.weight());
        assert!(Priority::High.weight() > Priority::Medium.weight());
        assert!(Priority::Medium.weight() > Priority::Low.weight());
        assert_eq!(Priority::Low.weight(), 1);
    }

    #[test]
    fn contains_uses_implicitly_closed_boundary() {
        let area = square("sq");
        assert!(area.contains(&GeoPoint::new(0.5, 0.5)));
        assert!(!area.contains(&GeoPoint::new(1.5, 0.5)));
        assert!(!area.contains(&GeoPoint::new(0.5, -0.1)));
    }

    #[test]
    fn centro_contains_reference_demand() {
        let catalog = AreaCatalog::seed();
        let point = GeoPoint::new(-19.7492, -47.9292);
        let hits: Vec<&str> = catalog
            .containing(&point)
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(hits, vec!["centro"]);
    }

    #[test]
    fn catalog_rejects_duplicates() {
        let err = AreaCatalog::new(vec![square("a"), square("a")]).unwrap_err();
        assert!(matches!(err, AthisError::Validation { .. }));
    }

    #[test]
    fn catalog_rejects_degenerate_boundary() {
        let mut area = square("a");
        area.boundary.truncate(2);
        assert!(AreaCatalog::new(vec![area]).is_err());

        let mut area = square("b");
        area.boundary[0] = GeoPoint::new(95.0, 0.0);
        assert!(AreaCatalog::new(vec![area]).is_err());
    }
}
