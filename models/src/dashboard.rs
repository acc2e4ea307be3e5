// models/src/dashboard.rs

use serde::{Deserialize, Serialize};

/// Aggregate record counts shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub patients: u64,
    pub doctors: u64,
    pub appointments: u64,
}
