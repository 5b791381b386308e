//! Dashboard counters over the demand set.

use serde::{Deserialize, Serialize};

use crate::domain::{Demand, DemandKind, DemandStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandStats {
    pub total: usize,
    pub pending: usize,
    pub under_review: usize,
    pub approved: usize,
    pub rejected: usize,
    pub land_regularization: usize,
    pub housing_improvement: usize,
}

impl DemandStats {
    pub fn from_demands(demands: &[Demand]) -> Self {
        let mut stats = Self::default();
        for demand in demands {
            stats.total += 1;
            match demand.status() {
                DemandStatus::Pending => stats.pending += 1,
                DemandStatus::UnderReview => stats.under_review += 1,
                DemandStatus::Approved => stats.approved += 1,
                DemandStatus::Rejected => stats.rejected += 1,
            }
            match demand.kind() {
                DemandKind::LandRegularization => stats.land_regularization += 1,
                DemandKind::HousingImprovement => stats.housing_improvement += 1,
            }
        }
        stats
    }

    pub fn count_status(&self, status: DemandStatus) -> usize {
        match status {
            DemandStatus::Pending => self.pending,
            DemandStatus::UnderReview => self.under_review,
            DemandStatus::Approved => self.approved,
            DemandStatus::Rejected => self.rejected,
        }
    }

    pub fn count_kind(&self, kind: DemandKind) -> usize {
        match kind {
            DemandKind::LandRegularization => self.land_regularization,
            DemandKind::HousingImprovement => self.housing_improvement,
        }
    }

    /// Percentage of demands of `kind`; 0 when there are none.
    pub fn kind_share_percent(&self, kind: DemandKind) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count_kind(kind) as f64 * 100.0 / self.total as f64
    }
}
