use serde::Serialize;

/// One month's salary report: day counts plus the pro-rated net amount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryReport {
    pub total_working_days: u32,
    pub present_days: u32,
    pub base_salary: f64,
    pub net_salary: f64,
}
