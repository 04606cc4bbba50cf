use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::{PeriodTotals, ReportDocument};
use crate::money::{format_total, monetary_display};
use crate::period::{compute_report_period, month_name_nominative};
use crate::render::TemplateRenderer;
use crate::report::{assemble_document, output_file_name};
use crate::statistics::UsageSource;
use crate::usage::{aggregate, normalize_entries};
use chrono::{Datelike, NaiveDate};
use reqwest::Client;
use std::fs;
use std::path::PathBuf;

#[derive(Debug)]
pub struct GeneratedReport {
    pub document: ReportDocument,
    pub totals: PeriodTotals,
    /// None on a dry run.
    pub output_path: Option<PathBuf>,
}

pub struct ReportService {
    client: Client,
}

impl ReportService {
    pub fn new() -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self { client })
    }

    /// Runs the whole report in a single pass: fetch, normalize,
    /// aggregate, format, assemble, render, write. Any failure aborts;
    /// there are no retries and no partial results.
    pub async fn generate(
        &self,
        cfg: &AppConfig,
        source: &dyn UsageSource,
        renderer: &dyn TemplateRenderer,
        today: NaiveDate,
        dry_run: bool,
    ) -> Result<GeneratedReport, AppError> {
        let period = compute_report_period(today, cfg.period_policy)?;
        println!(
            "Fetching statistics for {} ({} policy)",
            period.start_date,
            cfg.period_policy.as_label()
        );

        let raw = source
            .fetch_statistics(&self.client, period.start_date)
            .await?;
        println!("Received {} server entries", raw.len());

        let usage = normalize_entries(&raw, cfg.rate_source, cfg.fixed_rate, cfg.skip_malformed)?;
        let totals = aggregate(&usage);
        let display = monetary_display(totals.total_earnings)?;
        let total_text = format_total(&display, cfg.zero_pad_kopecks);
        let document = assemble_document(&period, &usage, total_text);

        let month_label = format!(
            "{} {}",
            month_name_nominative(period.end_date.month()),
            period.end_date.year()
        );
        println!(
            "Total gaming time in {month_label}: {} minutes",
            totals.total_minutes
        );
        println!(
            "Total money in {month_label}: {:.2} rubles",
            totals.total_earnings
        );

        if dry_run {
            return Ok(GeneratedReport {
                document,
                totals,
                output_path: None,
            });
        }

        let template = fs::read(&cfg.template_path)?;
        let rendered = renderer.render(&template, &document)?;

        fs::create_dir_all(&cfg.output_dir)?;
        let file_name = output_file_name(&period, &cfg.resolved_last_name());
        let output_path = PathBuf::from(&cfg.output_dir).join(file_name);
        fs::write(&output_path, rendered)?;
        println!("Document saved to {}", output_path.display());

        Ok(GeneratedReport {
            document,
            totals,
            output_path: Some(output_path),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawUsageEntry;
    use crate::render::TagRenderer;
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct FixedSource(Vec<RawUsageEntry>);

    #[async_trait]
    impl UsageSource for FixedSource {
        async fn fetch_statistics(
            &self,
            _client: &Client,
            _date: NaiveDate,
        ) -> Result<Vec<RawUsageEntry>, AppError> {
            Ok(self.0.clone())
        }
    }

    fn raw(name: &str, seconds: i64, cost: f64) -> RawUsageEntry {
        RawUsageEntry {
            vm_name: name.to_string(),
            session_seconds: seconds,
            playtime_cost: Some(cost),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).expect("valid date")
    }

    #[tokio::test]
    async fn dry_run_computes_totals_without_writing() {
        let svc = ReportService::new().expect("client");
        let source = FixedSource(vec![raw("srv-1", 3600, 0.5), raw("srv-2", 125, 0.5)]);
        let cfg = AppConfig::default();

        let report = svc
            .generate(&cfg, &source, &TagRenderer, today(), true)
            .await
            .expect("dry run");

        assert!(report.output_path.is_none());
        assert_eq!(report.totals.total_minutes, 62);
        assert!((report.totals.total_earnings - 31.0).abs() < 1e-9);
        assert_eq!(
            report.document.total_earnings,
            "31 (тридцать один) руб. 0 коп."
        );
        assert_eq!(report.document.start_date, "01 февраля 2024");
        assert_eq!(report.document.end_date, "29 февраля 2024");
    }

    #[tokio::test]
    async fn generate_renders_template_and_writes_document() {
        let home = TempDir::new().expect("temp dir");
        let template_path = home.path().join("template.docx");
        fs::write(
            &template_path,
            "{date}: {startDate}-{endDate}\n{#serverDetails}{index} {vm_name} {minutes} {earnings}\n{/serverDetails}{totalEarnings}",
        )
        .expect("write template");

        let cfg = AppConfig {
            last_name: "Иванов".into(),
            template_path: template_path.to_string_lossy().into_owned(),
            output_dir: home.path().join("output").to_string_lossy().into_owned(),
            ..AppConfig::default()
        };

        let svc = ReportService::new().expect("client");
        let source = FixedSource(vec![raw("srv-1", 3600, 0.5), raw("srv-2", 125, 0.5)]);

        let report = svc
            .generate(&cfg, &source, &TagRenderer, today(), false)
            .await
            .expect("generate");

        let path = report.output_path.expect("output path");
        assert!(path
            .file_name()
            .and_then(|n| n.to_str())
            .expect("file name")
            .starts_with("2024-02 (февраль) Акт выполненных работ"));

        let rendered = fs::read_to_string(&path).expect("read output");
        assert!(rendered.contains("29 февраля 2024 г.: 01 февраля 2024-29 февраля 2024"));
        assert!(rendered.contains("1 srv-1 60 30.00"));
        assert!(rendered.contains("2 srv-2 2 1.00"));
        assert!(rendered.contains("31 (тридцать один) руб. 0 коп."));
    }

    #[tokio::test]
    async fn empty_month_still_generates_a_document() {
        let home = TempDir::new().expect("temp dir");
        let template_path = home.path().join("template.docx");
        fs::write(&template_path, "{totalEarnings}").expect("write template");

        let cfg = AppConfig {
            template_path: template_path.to_string_lossy().into_owned(),
            output_dir: home.path().join("output").to_string_lossy().into_owned(),
            ..AppConfig::default()
        };

        let svc = ReportService::new().expect("client");
        let report = svc
            .generate(&cfg, &FixedSource(vec![]), &TagRenderer, today(), false)
            .await
            .expect("generate");

        assert_eq!(report.totals.total_minutes, 0);
        let rendered =
            fs::read_to_string(report.output_path.expect("output path")).expect("read output");
        assert_eq!(rendered, "0 (ноль) руб. 0 коп.");
    }

    #[tokio::test]
    async fn malformed_entry_aborts_by_default() {
        let svc = ReportService::new().expect("client");
        let source = FixedSource(vec![raw("", 3600, 0.5)]);
        let err = svc
            .generate(&AppConfig::default(), &source, &TagRenderer, today(), true)
            .await
            .expect_err("should abort");
        assert!(matches!(err, AppError::MalformedEntry(_)));
    }
}
