use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::attendance::AttendanceStatus;

/// Snapshot of one day's attendance, as shown in the summary view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub check_in: Option<DateTime<Utc>>,
    pub check_out: Option<DateTime<Utc>>,
    pub location: Option<String>,
}
