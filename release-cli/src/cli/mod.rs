//! CLI subcommands for batch release
//!
//! Provides commands for:
//! - Batches (list, show)
//! - KPIs, quality events and the report summary
//! - Release sign-off and rejection

use clap::{Subcommand, ValueEnum};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Write as _;
use std::time::Duration;

use batch_release_shared::format::{self, kpi_cards, ReportScale};
use batch_release_shared::{
    api, classify_exceptions, Batch, BatchQuery, BatchStatus, EventFilter, EventSummary, Kpis,
    QualityEvent, ReleaseRequest, ReleaseResponse, ReportData, Severity, StatusFilter,
};

/// Width of the text bars in `report`
const BAR_WIDTH: usize = 30;

/// Output format for list-style commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// CLI client for the release API
pub struct CliClient {
    client: Client,
    base_url: String,
}

impl CliClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let resp = self.client.get(api::url(&self.base_url, path)).send().await?;
        parse_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> anyhow::Result<T> {
        let mut req = self.client.post(api::url(&self.base_url, path));
        if let Some(body) = body {
            req = req.json(body);
        }
        parse_response(req.send().await?).await
    }
}

/// Decode a success body, or turn the backend's error body into an error
async fn parse_response<T: DeserializeOwned>(resp: Response) -> anyhow::Result<T> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json().await?);
    }

    let body: serde_json::Value = resp.json().await.unwrap_or_default();
    anyhow::bail!("{} ({})", error_message(&body), status)
}

/// FastAPI-style `detail`, or a plain `error` field
fn error_message(body: &serde_json::Value) -> String {
    body["detail"]
        .as_str()
        .or_else(|| body["error"].as_str())
        .unwrap_or("Unknown error")
        .to_string()
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// =============================================================================
// Batches Commands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum BatchCommands {
    /// List batches, filtered by the backend
    List {
        /// Match against batch id, drug or batch name
        #[arg(short, long, default_value = "")]
        search: String,
        /// All, Pending, Released or Rejected
        #[arg(long, default_value = "All")]
        status: String,
        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Review a single batch, including derived exceptions
    Show {
        /// Batch ID
        id: String,
        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },
}

impl BatchCommands {
    pub async fn execute(&self, client: &CliClient) -> anyhow::Result<()> {
        match self {
            BatchCommands::List { search, status, format } => {
                let query = BatchQuery::new(search.as_str(), StatusFilter::parse(status));
                let batches: Vec<Batch> = client.get(&api::batches(&query)).await?;

                match format {
                    OutputFormat::Json => print_json(&batches)?,
                    OutputFormat::Table => print!("{}", render_batch_table(&batches)),
                }
                Ok(())
            }
            BatchCommands::Show { id, format } => {
                let batch: Batch = client.get(&api::batch(id)).await?;

                match format {
                    OutputFormat::Json => print_json(&batch)?,
                    OutputFormat::Table => print!("{}", render_batch_detail(&batch)),
                }
                Ok(())
            }
        }
    }
}

pub async fn show_kpis(client: &CliClient, format: OutputFormat) -> anyhow::Result<()> {
    let kpis: Kpis = client.get(&api::kpis()).await?;
    match format {
        OutputFormat::Json => print_json(&kpis),
        OutputFormat::Table => {
            print!("{}", render_kpis(&kpis));
            Ok(())
        }
    }
}

pub async fn show_events(
    client: &CliClient,
    filter: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let events: Vec<QualityEvent> = client.get(&api::quality_events()).await?;
    let filter = EventFilter::parse(filter);

    match format {
        OutputFormat::Json => print_json(&filter.apply(&events)),
        OutputFormat::Table => {
            print!("{}", render_events(&events, filter));
            Ok(())
        }
    }
}

pub async fn show_report(client: &CliClient, format: OutputFormat) -> anyhow::Result<()> {
    let report: ReportData = client.get(&api::report_summary()).await?;
    match format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Table => {
            print!("{}", render_report(&report));
            Ok(())
        }
    }
}

/// Sign off a pending batch
pub async fn release(client: &CliClient, id: &str, signed_by: &str) -> anyhow::Result<()> {
    let signed_by = signed_by.trim();
    if signed_by.is_empty() {
        anyhow::bail!("A reviewer name is required to release a batch");
    }

    ensure_transition(client, id, BatchStatus::Released).await?;

    let request = ReleaseRequest::new(id, signed_by);
    let resp: ReleaseResponse = client.post(&api::release(id), Some(&request)).await?;

    println!(
        "{}",
        resp.message.unwrap_or_else(|| format!("Batch {} released", id))
    );
    if let Some(by) = resp.signed_by {
        println!("Signed by: {}", by);
    }
    Ok(())
}

pub async fn reject(client: &CliClient, id: &str, force: bool) -> anyhow::Result<()> {
    if !force {
        println!("Are you sure you want to reject batch {}? Use --force to confirm.", id);
        return Ok(());
    }

    ensure_transition(client, id, BatchStatus::Rejected).await?;

    let resp: ReleaseResponse = client.post::<_, ()>(&api::reject(id), None).await?;
    println!(
        "{}",
        resp.message.unwrap_or_else(|| format!("Batch {} rejected", id))
    );
    Ok(())
}

/// The backend answers 200 even when its update matched nothing, so the
/// current status is checked first.
async fn ensure_transition(client: &CliClient, id: &str, next: BatchStatus) -> anyhow::Result<()> {
    let batch: Batch = client.get(&api::batch(id)).await?;
    if !batch.status.can_transition_to(next) {
        anyhow::bail!("Batch {} is already {}", id, batch.status);
    }
    Ok(())
}

// =============================================================================
// Rendering
// =============================================================================

fn check_mark(pass: bool) -> &'static str {
    if pass {
        "PASS"
    } else {
        "FAIL"
    }
}

pub fn render_batch_table(batches: &[Batch]) -> String {
    if batches.is_empty() {
        return "No batches found\n".to_string();
    }

    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(
        out,
        "{:<14} {:<12} {:<10} {:<14} {:<14} {:<8} {:<12}",
        "BATCH ID", "DRUG", "STATUS", "TEMP", "PURITY", "CYCLE", "MANUFACTURED"
    );
    let _ = writeln!(out, "{}", "-".repeat(90));
    for b in batches {
        let _ = writeln!(
            out,
            "{:<14} {:<12} {:<10} {:<14} {:<14} {:<8} {:<12}",
            b.batch_id,
            b.drug_name,
            b.status.label(),
            format!("{} {}", format::temperature(b.temp_actual, 1), check_mark(b.temp_check)),
            format!("{} {}", format::purity(b.purity_actual, 1), check_mark(b.purity_check)),
            format::hours_short(b.cycle_time_hours),
            format::date(&b.manufactured_date),
        );
    }
    out
}

/// The review panel, as text
pub fn render_batch_detail(batch: &Batch) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Batch {}", batch.batch_id);
    let _ = writeln!(out, "  Drug:         {}", batch.drug_name);
    let _ = writeln!(out, "  Batch Name:   {}", batch.batch_name);
    let _ = writeln!(out, "  Status:       {}", batch.status);
    let _ = writeln!(out, "  Manufactured: {}", format::date(&batch.manufactured_date));
    let _ = writeln!(out, "  Expiry:       {}", format::date(&batch.expiry_date));
    let _ = writeln!(out, "  Cycle Time:   {}", format::hours_long(batch.cycle_time_hours));
    let _ = writeln!(out, "  Last Updated: {}", format::date_time(&batch.last_updated));

    let _ = writeln!(out, "\nQuality Checks");
    let _ = writeln!(
        out,
        "  Temperature Control  {:<10} {}",
        format::temperature(batch.temp_actual, 2),
        compliance(batch.temp_check)
    );
    let _ = writeln!(
        out,
        "  Purity Analysis      {:<10} {}",
        format::purity(batch.purity_actual, 2),
        compliance(batch.purity_check)
    );

    let exceptions = classify_exceptions(&batch.measurements());
    if exceptions.is_empty() {
        let _ = writeln!(out, "\nAll quality checks passed. Batch is ready for release.");
    } else {
        let _ = writeln!(out, "\nExceptions ({})", exceptions.len());
        if let Some(worst) = Severity::worst(&exceptions) {
            let _ = writeln!(out, "  Highest severity: {}", worst.label());
        }
        for e in &exceptions {
            let _ = writeln!(out, "  [{}] {}", e.severity.label(), e.name());
            let _ = writeln!(out, "      {}", e.detail);
        }
    }

    if let Some(by) = &batch.signed_by {
        let _ = writeln!(out, "\nSigned by: {}", by);
    }
    out
}

fn compliance(pass: bool) -> &'static str {
    if pass {
        "Compliant"
    } else {
        "Non-Compliant"
    }
}

pub fn render_kpis(kpis: &Kpis) -> String {
    let mut out = String::new();
    for card in kpi_cards(kpis) {
        let _ = writeln!(out, "{:<26} {}", card.label, card.value);
    }
    out
}

pub fn render_events(events: &[QualityEvent], filter: EventFilter) -> String {
    let summary = EventSummary::from_events(events);
    let filtered = filter.apply(events);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Total Events: {}   Temp Excursions: {}   Purity Failures: {}",
        summary.total, summary.temperature_excursions, summary.purity_failures
    );
    let _ = writeln!(out, "Filter: {}\n", filter.label());

    if filtered.is_empty() {
        let _ = writeln!(out, "No quality events matching the filter");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<14} {:<10} {:<10} {:<44} {:<10}",
        "BATCH ID", "SEVERITY", "STATUS", "EVENT TYPE", "DATE"
    );
    let _ = writeln!(out, "{}", "-".repeat(92));
    for e in filtered {
        let _ = writeln!(
            out,
            "{:<14} {:<10} {:<10} {:<44} {:<10}",
            e.batch_id,
            e.severity.label(),
            e.status.label(),
            e.event_type,
            format::date(&e.last_updated),
        );
    }
    out
}

fn bar(value: u64, max: u64) -> String {
    let filled = (format::bar_percent(value, max) / 100.0 * BAR_WIDTH as f64).round() as usize;
    "#".repeat(filled.min(BAR_WIDTH))
}

pub fn render_report(report: &ReportData) -> String {
    let scale = ReportScale::from_report(report);
    let mut out = String::new();

    let _ = writeln!(out, "Batch Dispositions by Status");
    for s in &report.status_breakdown {
        let _ = writeln!(
            out,
            "  {:<10} {:<width$} {}",
            s.status,
            bar(s.count, scale.max_status_count),
            s.count,
            width = BAR_WIDTH
        );
    }
    let _ = writeln!(out, "  Total: {} batches", scale.status_total);

    let rate = &report.exception_rate;
    let _ = writeln!(out, "\nException Rate: {}% of batches", rate.rate_pct);
    let _ = writeln!(out, "  Temperature Excursions  {}", rate.temp_fails);
    let _ = writeln!(out, "  Purity Failures         {}", rate.purity_fails);
    let _ = writeln!(
        out,
        "  Total with Exceptions   {} / {}",
        rate.with_exceptions, rate.total
    );

    let _ = writeln!(out, "\nCycle Time by Status (Hours)");
    for c in &report.cycle_time_by_status {
        let _ = writeln!(
            out,
            "  {:<10} avg {}h  min {}h  max {}h",
            c.status, c.avg_cycle, c.min_cycle, c.max_cycle
        );
    }

    let _ = writeln!(out, "\nMonthly Batch Trend");
    for m in &report.monthly_trend {
        let _ = writeln!(
            out,
            "  {:<8} {:<width$} {:>3}  ({}R {}P {}X)",
            m.month,
            bar(m.total, scale.max_monthly_total),
            m.total,
            m.released,
            m.pending,
            m.rejected,
            width = BAR_WIDTH
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use batch_release_shared::{
        BatchStatus, ExceptionRate, MonthlyTrend, Severity, StatusCount,
    };
    use serde_json::json;

    fn batch(id: &str, temp: f64, temp_ok: bool, purity: f64, purity_ok: bool) -> Batch {
        Batch {
            batch_id: id.to_string(),
            drug_name: "Stelara".to_string(),
            batch_name: format!("Lot {id}"),
            status: BatchStatus::Pending,
            temp_actual: temp,
            temp_check: temp_ok,
            purity_actual: purity,
            purity_check: purity_ok,
            manufactured_date: "2024-03-05".to_string(),
            expiry_date: "2026-03-05".to_string(),
            cycle_time_hours: 41.3,
            last_updated: "2024-03-07T14:05:09".to_string(),
            exceptions: None,
            signed_by: None,
        }
    }

    fn event(id: &str, event_type: &str, temp_ok: bool, purity_ok: bool) -> QualityEvent {
        QualityEvent {
            batch_id: id.to_string(),
            drug_name: "Stelara".to_string(),
            batch_name: format!("Lot {id}"),
            status: BatchStatus::Pending,
            temp_actual: 38.6,
            temp_check: temp_ok,
            purity_actual: 97.2,
            purity_check: purity_ok,
            cycle_time_hours: 40.0,
            last_updated: "2024-03-07".to_string(),
            exceptions: None,
            event_type: event_type.to_string(),
            severity: Severity::Critical,
        }
    }

    #[test]
    fn test_error_message_prefers_detail() {
        assert_eq!(error_message(&json!({"detail": "Batch not found"})), "Batch not found");
        assert_eq!(error_message(&json!({"error": "boom"})), "boom");
        assert_eq!(error_message(&json!({})), "Unknown error");
        assert_eq!(error_message(&serde_json::Value::Null), "Unknown error");
    }

    #[test]
    fn test_batch_table_lists_rows() {
        let out = render_batch_table(&[batch("B-001", 37.1, true, 99.2, true)]);
        assert!(out.contains("BATCH ID"));
        assert!(out.contains("B-001"));
        assert!(out.contains("37.1°C PASS"));
        assert!(out.contains("99.2% PASS"));
        assert!(out.contains("41.3h"));
        assert!(out.contains("3/5/2024"));
    }

    #[test]
    fn test_batch_table_empty() {
        assert_eq!(render_batch_table(&[]), "No batches found\n");
    }

    #[test]
    fn test_batch_detail_shows_critical_temperature_exception() {
        let out = render_batch_detail(&batch("B-002", 38.6, false, 99.0, true));
        assert!(out.contains("Exceptions (1)"));
        assert!(out.contains("[Critical] Temperature Excursion"));
        assert!(out.contains("Highest severity: Critical"));
        assert!(out.contains("Non-Compliant"));
        assert!(!out.contains("Purity Below Threshold"));
    }

    #[test]
    fn test_batch_detail_highest_severity_of_mixed_exceptions() {
        let major_only = render_batch_detail(&batch("B-004", 37.0, true, 97.0, false));
        assert!(major_only.contains("Highest severity: Major"));

        let mixed = render_batch_detail(&batch("B-005", 37.8, false, 95.0, false));
        assert!(mixed.contains("Exceptions (2)"));
        assert!(mixed.contains("Highest severity: Critical"));
    }

    #[test]
    fn test_batch_detail_all_checks_pass() {
        let out = render_batch_detail(&batch("B-003", 37.0, true, 99.5, true));
        assert!(out.contains("All quality checks passed. Batch is ready for release."));
        assert!(!out.contains("Exceptions ("));
    }

    #[test]
    fn test_kpis_render_all_cards() {
        let kpis = Kpis {
            pending_count: 4,
            avg_cycle_time: 42.5,
            total_batches: 20,
            released_count: 12,
            rejected_count: 4,
            exception_count: 6,
        };
        let out = render_kpis(&kpis);
        assert_eq!(out.lines().count(), 6);
        assert!(out.contains("Average Cycle Time"));
        assert!(out.contains("42.5h"));
    }

    #[test]
    fn test_events_filter_and_summary() {
        let events = vec![
            event("B-1", "Temperature Excursion", false, true),
            event("B-2", "Purity Failure", true, false),
            event("B-3", "Temperature Excursion, Purity Failure", false, false),
        ];

        let out = render_events(&events, EventFilter::Purity);
        assert!(out.contains("Total Events: 3"));
        assert!(out.contains("Temp Excursions: 2"));
        assert!(out.contains("Purity Failures: 2"));
        assert!(!out.contains("B-1 "));
        assert!(out.contains("B-2"));
        assert!(out.contains("B-3"));
    }

    #[test]
    fn test_events_empty_filter_message() {
        let events = vec![event("B-1", "Temperature Excursion", false, true)];
        let out = render_events(&events, EventFilter::Purity);
        assert!(out.contains("No quality events matching the filter"));
    }

    #[test]
    fn test_bar_scales_to_width() {
        assert_eq!(bar(10, 10).len(), BAR_WIDTH);
        assert_eq!(bar(5, 10).len(), BAR_WIDTH / 2);
        assert_eq!(bar(3, 0), "");
    }

    #[test]
    fn test_report_render() {
        let report = ReportData {
            status_breakdown: vec![
                StatusCount { status: "Released".to_string(), count: 12 },
                StatusCount { status: "Pending".to_string(), count: 6 },
            ],
            monthly_trend: vec![MonthlyTrend {
                month: "2024-03".to_string(),
                total: 8,
                released: 5,
                pending: 2,
                rejected: 1,
            }],
            exception_rate: ExceptionRate {
                total: 18,
                with_exceptions: 6,
                rate_pct: 33.3,
                temp_fails: 4,
                purity_fails: 3,
            },
            cycle_time_by_status: vec![],
        };

        let out = render_report(&report);
        assert!(out.contains("Total: 18 batches"));
        assert!(out.contains("Exception Rate: 33.3% of batches"));
        assert!(out.contains("Total with Exceptions   6 / 18"));
        assert!(out.contains("(5R 2P 1X)"));
    }
}
