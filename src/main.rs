use std::time::Duration;

use dotenvy::dotenv;
use tracing::{info, warn};
use tracing_appender::rolling;

use hrmobile::attendance::{AttendanceSession, SimulatedVerification};
use hrmobile::auth::directory::UserDirectory;
use hrmobile::calendar::{InMemoryEventSource, WorkforceCalendar};
use hrmobile::clock::{Clock, SystemClock};
use hrmobile::config::Config;
use hrmobile::leave::{InMemoryLeaveSink, LeaveRequestDraft, LeaveSink, LeaveType};
use hrmobile::payroll;

/// Walks the app's screens once against the in-memory core: login,
/// attendance, leave request, workforce calendar, salary report.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Walkthrough starting...");

    let clock = SystemClock;

    // Login screen
    let mut directory = UserDirectory::new();
    directory
        .seed([("Employee One", "emp@company.com", "emp", "111222")])
        .await?;

    let account = directory.login("emp", "111222")?;
    info!("Welcome back, {}", account.full_name);

    // Attendance screen: verification-gated check-in, then check-out
    let provider =
        SimulatedVerification::succeeding(Duration::from_millis(config.verification_delay_ms));
    let mut session = AttendanceSession::new(&clock, &config.office_location);

    session.record_verification(&provider, &clock).await?;
    info!(record = ?session.record(), "checked in");

    session.record_verification(&provider, &clock).await?;
    info!(record = ?session.record(), "checked out");

    if let Err(e) = session.record_verification(&provider, &clock).await {
        warn!(error = %e, "attendance re-entry rejected");
    }

    // Leave screen: fill the form, submit, hand off to the sink
    let sink = InMemoryLeaveSink::new();
    let mut draft = LeaveRequestDraft::new();
    draft.set_leave_type(Some(LeaveType::Sick));
    draft.set_from_date(Some(clock.today()));
    draft.set_to_date(clock.today().succ_opt());
    draft.set_reason("Recovering from a seasonal flu");

    match draft.submit(&clock) {
        Ok(record) => {
            sink.save(&record).await?;
            info!(payload = %serde_json::to_string(&record)?, "leave request submitted");
            draft.clear();
        }
        Err(e) => warn!(error = %e, "leave request rejected"),
    }

    // Workforce calendar screen
    let mut events = InMemoryEventSource::new();
    events.insert(clock.today(), "Team Meeting");

    let calendar = WorkforceCalendar::new(&clock);
    for event in calendar.select(clock.today(), &events)? {
        info!(date = %event.date, title = %event.title, "event");
    }

    // Reports screen
    let report = payroll::monthly_report(
        config.base_salary,
        config.total_working_days,
        config.present_days,
    );
    info!(
        base = %payroll::format_usd(report.base_salary),
        net = %payroll::format_usd(report.net_salary),
        "monthly salary report"
    );

    Ok(())
}
