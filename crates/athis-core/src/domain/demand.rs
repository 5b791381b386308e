//! Demand record: a citizen request tracked through its status lifecycle.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::{AthisError, Result};
use super::geo::GeoPoint;
use super::ids::DemandId;
use super::status::DemandStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemandKind {
    LandRegularization,
    HousingImprovement,
}

impl DemandKind {
    pub const ALL: [DemandKind; 2] = [DemandKind::LandRegularization, DemandKind::HousingImprovement];

    pub fn as_str(self) -> &'static str {
        match self {
            DemandKind::LandRegularization => "land_regularization",
            DemandKind::HousingImprovement => "housing_improvement",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DemandKind::LandRegularization => "Land regularization",
            DemandKind::HousingImprovement => "Housing improvement",
        }
    }
}

impl fmt::Display for DemandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DemandKind {
    type Err = AthisError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        DemandKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.trim())
            .ok_or_else(|| AthisError::validation(format!("unknown demand kind '{s}'")))
    }
}

/// Contact data of the citizen. Only `name` is required.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Requester {
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

impl Requester {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Input of `Create`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDemand {
    pub kind: DemandKind,
    #[serde(default)]
    pub description: String,
    /// Free-text street address as typed by the citizen.
    #[serde(default)]
    pub address: String,
    pub location: GeoPoint,
    pub requester: Requester,
}

impl NewDemand {
    pub fn validate(&self) -> Result<()> {
        if self.requester.name.trim().is_empty() {
            return Err(AthisError::validation("requester name is required"));
        }
        self.location
            .validate()
            .map_err(|e| AthisError::validation(format!("location: {e}")))
    }
}

/// A demand record.
///
/// Every field except `status` is write-once. `status` only moves through
/// [`Demand::advance`], which checks the transition table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Demand {
    id: DemandId,
    kind: DemandKind,
    description: String,
    #[serde(default)]
    address: String,
    location: GeoPoint,
    status: DemandStatus,
    created_at: DateTime<Utc>,
    requester: Requester,
}

impl Demand {
    /// New record in `Pending`. Input must already be validated.
    pub(crate) fn open(id: DemandId, input: NewDemand, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            kind: input.kind,
            description: input.description,
            address: input.address,
            location: input.location,
            status: DemandStatus::Pending,
            created_at,
            requester: input.requester,
        }
    }

    pub fn id(&self) -> DemandId {
        self.id
    }

    pub fn kind(&self) -> DemandKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn location(&self) -> GeoPoint {
        self.location
    }

    pub fn status(&self) -> DemandStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn requester(&self) -> &Requester {
        &self.requester
    }

    /// Move to `next`, returning the previous status.
    pub(crate) fn advance(&mut self, next: DemandStatus) -> Result<DemandStatus> {
        let from = self.status;
        if !from.can_transition_to(next) {
            return Err(AthisError::InvalidTransition { from, to: next });
        }
        self.status = next;
        Ok(from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ulid::Ulid;

    fn input(name: &str, location: GeoPoint) -> NewDemand {
        NewDemand {
            kind: DemandKind::LandRegularization,
            description: "lote sem escritura".to_string(),
            address: "Rua das Flores, 123 - Centro".to_string(),
            location,
            requester: Requester::named(name),
        }
    }

    fn sample() -> Demand {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        Demand::open(
            DemandId::from_ulid(Ulid::new()),
            input("Maria Silva", GeoPoint::new(-19.7492, -47.9292)),
            at,
        )
    }

    #[test]
    fn opens_in_pending() {
        assert_eq!(sample().status(), DemandStatus::Pending);
    }

    #[test]
    fn validation_requires_name_and_range() {
        assert!(input("Maria", GeoPoint::new(-19.0, -47.0)).validate().is_ok());
        assert!(matches!(
            input("   ", GeoPoint::new(-19.0, -47.0)).validate(),
            Err(AthisError::Validation { .. })
        ));
        assert!(matches!(
            input("Maria", GeoPoint::new(-100.0, -47.0)).validate(),
            Err(AthisError::Validation { .. })
        ));
    }

    #[test]
    fn advance_checks_table() {
        let mut demand = sample();
        assert_eq!(
            demand.advance(DemandStatus::UnderReview).unwrap(),
            DemandStatus::Pending
        );
        let err = demand.advance(DemandStatus::Pending).unwrap_err();
        assert!(matches!(
            err,
            AthisError::InvalidTransition {
                from: DemandStatus::UnderReview,
                to: DemandStatus::Pending
            }
        ));
        assert_eq!(demand.status(), DemandStatus::UnderReview);
    }

    #[test]
    fn kind_parses_known_tokens_only() {
        assert_eq!(
            "housing_improvement".parse::<DemandKind>().unwrap(),
            DemandKind::HousingImprovement
        );
        for raw in ["melhorias", "", "Housing_Improvement"] {
            assert!(matches!(
                raw.parse::<DemandKind>(),
                Err(AthisError::Validation { .. })
            ));
        }
    }

    #[test]
    fn json_shape_is_camel_case() {
        let demand = sample();
        let value = serde_json::to_value(&demand).unwrap();
        assert_eq!(value["status"], "pending");
        assert_eq!(value["kind"], "land_regularization");
        assert!(value.get("createdAt").is_some());
        assert_eq!(value["requester"]["name"], "Maria Silva");
        assert_eq!(value["address"], "Rua das Flores, 123 - Centro");
        let back: Demand = serde_json::from_value(value).unwrap();
        assert_eq!(back, demand);
    }

    #[test]
    fn address_is_kept_and_optional_on_read() {
        let demand = sample();
        assert_eq!(demand.address(), "Rua das Flores, 123 - Centro");

        let mut value = serde_json::to_value(&demand).unwrap();
        value.as_object_mut().unwrap().remove("address");
        let back: Demand = serde_json::from_value(value).unwrap();
        assert_eq!(back.address(), "");
        assert_eq!(back.id(), demand.id());
    }
}
