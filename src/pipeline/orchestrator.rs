use chrono::Local;
use serde::Deserialize;

use crate::config::Config;
use crate::convert::convert_to_pdf;
use crate::error::AppError;
use crate::telemetry::metrics::{REPORT_GENERATION_DURATION, REPORT_SECTIONS};

use super::assemble::{Section, render_html};
use super::chart::render_sample_chart;
use super::sections::{DATA_SECTION, SectionGenerator, plan_sections};
use super::summarize::summarize_csv;

#[derive(Debug, Clone, Deserialize)]
pub struct ReportRequest {
    pub topic: String,
    pub author: String,
    pub dataset: Option<String>,
}

/// Runs the whole report pipeline: one generation call per section in order,
/// dataset summary when a CSV was supplied, chart render, HTML assembly, and
/// PDF conversion. Generation failures become section text; only conversion
/// failures abort the request.
#[tracing::instrument(
    name = "pipeline report",
    skip(config, generator, request),
    fields(
        report.topic = %request.topic,
        report.has_dataset = request.dataset.is_some(),
        report.sections_count,
        report.duration_ms,
    )
)]
pub async fn generate_report(
    config: &Config,
    generator: &SectionGenerator,
    request: &ReportRequest,
) -> Result<Vec<u8>, AppError> {
    let start = std::time::Instant::now();

    let names = plan_sections(request.dataset.is_some());
    let mut sections = Vec::with_capacity(names.len());

    // Strictly sequential: one blocking generation call per section.
    for name in &names {
        let body = if *name == DATA_SECTION {
            summarize_csv(request.dataset.as_deref().unwrap_or_default())
        } else {
            generator.generate(name, &request.topic).await
        };
        sections.push(Section {
            name: (*name).to_string(),
            body,
        });
    }

    let chart = render_sample_chart().map_err(|e| AppError::Internal(e.to_string()))?;
    let date = Local::now().format("%B %d, %Y").to_string();
    let html = render_html(&request.topic, &request.author, &date, &sections, &chart);

    let pdf = convert_to_pdf(&config.wkhtmltopdf_path, &html).await?;

    let duration = start.elapsed();
    REPORT_GENERATION_DURATION.record(duration.as_secs_f64(), &[]);
    REPORT_SECTIONS.record(sections.len() as f64, &[]);

    let span = tracing::Span::current();
    span.record("report.sections_count", sections.len());
    span.record("report.duration_ms", duration.as_millis() as u64);

    Ok(pdf)
}
