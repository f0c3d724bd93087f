use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    /// Label stamped on check-ins; there is no real geolocation.
    pub office_location: String,
    pub verification_delay_ms: u64,

    // Sample report inputs
    pub base_salary: f64,
    pub total_working_days: u32,
    pub present_days: u32,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            office_location: env::var("OFFICE_LOCATION")
                .unwrap_or_else(|_| "Office - Main Branch".to_string()),
            verification_delay_ms: env::var("VERIFICATION_DELAY_MS")
                .unwrap_or_else(|_| "2000".to_string()) // matches the simulated biometric step
                .parse()
                .unwrap(),
            base_salary: env::var("BASE_SALARY")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap(),
            total_working_days: env::var("TOTAL_WORKING_DAYS")
                .unwrap_or_else(|_| "22".to_string())
                .parse()
                .unwrap(),
            present_days: env::var("PRESENT_DAYS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .unwrap(),
        }
    }
}
