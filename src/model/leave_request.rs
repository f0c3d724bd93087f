use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::leave::{LeaveStatus, LeaveType};

/// A submitted leave request, frozen from a validated draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRequestRecord {
    pub id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub leave_type: LeaveType,
    /// Inclusive day count of the requested range.
    pub duration_days: i64,
    pub reason: String,
    pub status: LeaveStatus,
    pub created_at: DateTime<Utc>,
}
