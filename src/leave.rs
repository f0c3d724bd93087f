use std::sync::Mutex;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::clock::Clock;
use crate::model::leave_request::LeaveRequestRecord;

/// A reason shorter than this is rejected as not detailed enough.
pub const MIN_REASON_LEN: usize = 10;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum LeaveType {
    #[strum(serialize = "Annual Leave")]
    Annual,
    #[strum(serialize = "Sick Leave")]
    Sick,
    #[strum(serialize = "Casual Leave")]
    Casual,
    #[strum(serialize = "Medical Leave")]
    Medical,
    #[strum(serialize = "Emergency Leave")]
    Emergency,
    #[strum(serialize = "Maternity Leave")]
    Maternity,
    #[strum(serialize = "Paternity Leave")]
    Paternity,
    #[strum(serialize = "Unpaid Leave")]
    Unpaid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum LeaveField {
    LeaveType,
    FromDate,
    ToDate,
    Reason,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display(fmt = "{}: {}", field, message)]
pub struct ValidationError {
    pub field: LeaveField,
    pub message: &'static str,
}

impl ValidationError {
    fn new(field: LeaveField, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// The leave request form while it is being filled in. Setters store raw
/// input without judgement; all checking is deferred to [`validate`] and
/// [`submit`], one error at a time, in form order.
///
/// [`validate`]: LeaveRequestDraft::validate
/// [`submit`]: LeaveRequestDraft::submit
#[derive(Debug, Clone, Default)]
pub struct LeaveRequestDraft {
    leave_type: Option<LeaveType>,
    from_date: Option<NaiveDate>,
    to_date: Option<NaiveDate>,
    reason: String,
}

impl LeaveRequestDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_leave_type(&mut self, leave_type: Option<LeaveType>) {
        self.leave_type = leave_type;
    }

    pub fn set_from_date(&mut self, date: Option<NaiveDate>) {
        self.from_date = date;
    }

    pub fn set_to_date(&mut self, date: Option<NaiveDate>) {
        self.to_date = date;
    }

    pub fn set_reason(&mut self, reason: impl Into<String>) {
        self.reason = reason.into();
    }

    pub fn leave_type(&self) -> Option<LeaveType> {
        self.leave_type
    }

    pub fn from_date(&self) -> Option<NaiveDate> {
        self.from_date
    }

    pub fn to_date(&self) -> Option<NaiveDate> {
        self.to_date
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Inclusive day count of the selected range; 0 while either date is
    /// still unset.
    pub fn duration_days(&self) -> i64 {
        match (self.from_date, self.to_date) {
            (Some(from), Some(to)) => (to - from).num_days() + 1,
            _ => 0,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.checked_fields().map(|_| ())
    }

    /// Re-validates and freezes the draft into an immutable record. The
    /// caller clears the form on success; on failure nothing is produced.
    pub fn submit(&self, clock: &impl Clock) -> Result<LeaveRequestRecord, ValidationError> {
        let (leave_type, start_date, end_date, reason) = self.checked_fields()?;

        Ok(LeaveRequestRecord {
            id: Uuid::new_v4(),
            start_date,
            end_date,
            leave_type,
            duration_days: (end_date - start_date).num_days() + 1,
            reason: reason.to_string(),
            status: LeaveStatus::Pending,
            created_at: clock.now(),
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    // Form order: type, from, to, reason presence, reason length, date order.
    fn checked_fields(&self) -> Result<(LeaveType, NaiveDate, NaiveDate, &str), ValidationError> {
        let Some(leave_type) = self.leave_type else {
            return Err(ValidationError::new(
                LeaveField::LeaveType,
                "Please select a leave type",
            ));
        };

        let Some(from_date) = self.from_date else {
            return Err(ValidationError::new(
                LeaveField::FromDate,
                "Please select from date",
            ));
        };

        let Some(to_date) = self.to_date else {
            return Err(ValidationError::new(
                LeaveField::ToDate,
                "Please select to date",
            ));
        };

        let reason = self.reason.trim();
        if reason.is_empty() {
            return Err(ValidationError::new(
                LeaveField::Reason,
                "Please provide reason for leave",
            ));
        }

        if reason.chars().count() < MIN_REASON_LEN {
            return Err(ValidationError::new(
                LeaveField::Reason,
                "Please provide a detailed reason (at least 10 characters)",
            ));
        }

        if to_date < from_date {
            return Err(ValidationError::new(
                LeaveField::ToDate,
                "To Date cannot be before From Date",
            ));
        }

        Ok((leave_type, from_date, to_date, reason))
    }
}

/// Persistence seam the screen hands a submitted record to. The real app
/// never had a backing store; this keeps the boundary injectable.
#[allow(async_fn_in_trait)]
pub trait LeaveSink {
    async fn save(&self, record: &LeaveRequestRecord) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum LeaveDecisionError {
    #[display(fmt = "Leave request not found or already processed")]
    NotPending,
}

/// Keeps submitted requests in memory and models the
/// pending → approved/rejected lifecycle.
#[derive(Debug, Default)]
pub struct InMemoryLeaveSink {
    records: Mutex<Vec<LeaveRequestRecord>>,
}

impl InMemoryLeaveSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<LeaveRequestRecord> {
        self.records.lock().expect("leave store poisoned").clone()
    }

    pub fn approve(&self, id: Uuid) -> Result<(), LeaveDecisionError> {
        self.decide(id, LeaveStatus::Approved)
    }

    pub fn reject(&self, id: Uuid) -> Result<(), LeaveDecisionError> {
        self.decide(id, LeaveStatus::Rejected)
    }

    // Only pending requests can be decided; anything else reads as processed.
    fn decide(&self, id: Uuid, status: LeaveStatus) -> Result<(), LeaveDecisionError> {
        let mut records = self.records.lock().expect("leave store poisoned");
        match records.iter_mut().find(|r| r.id == id) {
            Some(record) if record.status == LeaveStatus::Pending => {
                record.status = status;
                Ok(())
            }
            _ => Err(LeaveDecisionError::NotPending),
        }
    }
}

impl LeaveSink for InMemoryLeaveSink {
    async fn save(&self, record: &LeaveRequestRecord) -> anyhow::Result<()> {
        self.records
            .lock()
            .expect("leave store poisoned")
            .push(record.clone());
        info!(id = %record.id, "leave request stored");
        Ok(())
    }
}
