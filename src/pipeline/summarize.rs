use std::fmt::Write as _;

/// Summarizes an uploaded CSV: shape line plus descriptive statistics for
/// every numeric column. Parse failures come back as text so the data
/// analysis section never aborts the report.
pub fn summarize_csv(data: &str) -> String {
    match build_summary(data) {
        Ok(summary) => summary,
        Err(e) => format!("Could not analyze CSV: {e}"),
    }
}

struct ColumnStats {
    name: String,
    values: Vec<f64>,
}

fn build_summary(data: &str) -> Result<String, csv::Error> {
    let mut reader = csv::Reader::from_reader(data.as_bytes());
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = 0usize;
    let mut columns: Vec<Option<Vec<f64>>> = vec![Some(Vec::new()); headers.len()];

    for record in reader.records() {
        let record = record?;
        rows += 1;
        for (i, field) in record.iter().enumerate().take(headers.len()) {
            if columns[i].is_none() {
                continue;
            }
            let field = field.trim();
            if field.is_empty() {
                continue;
            }
            match field.parse::<f64>() {
                Ok(v) => {
                    if let Some(values) = columns[i].as_mut() {
                        values.push(v);
                    }
                }
                // One non-numeric value disqualifies the whole column
                Err(_) => columns[i] = None,
            }
        }
    }

    let mut summary = format!(
        "Dataset contains {rows} rows and {} columns.",
        headers.len()
    );

    let numeric: Vec<ColumnStats> = headers
        .iter()
        .zip(columns)
        .filter_map(|(name, values)| {
            let values = values?;
            (!values.is_empty()).then(|| ColumnStats {
                name: name.clone(),
                values,
            })
        })
        .collect();

    if numeric.is_empty() {
        summary.push_str("\n\nNo numeric columns to summarize.");
        return Ok(summary);
    }

    summary.push_str("\n\nSummary statistics:\n");
    let _ = write!(
        summary,
        "{:<16}{:>8}{:>12}{:>12}{:>12}{:>12}{:>12}{:>12}{:>12}",
        "column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    );

    for col in &numeric {
        let mut sorted = col.values.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let std = sample_std(&sorted, mean);

        let _ = write!(
            summary,
            "\n{:<16}{:>8}{:>12.2}{:>12.2}{:>12.2}{:>12.2}{:>12.2}{:>12.2}{:>12.2}",
            col.name,
            count,
            mean,
            std,
            sorted[0],
            percentile(&sorted, 0.25),
            percentile(&sorted, 0.5),
            percentile(&sorted, 0.75),
            sorted[count - 1],
        );
    }

    Ok(summary)
}

fn sample_std(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
        / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Linear-interpolated percentile over an already sorted slice.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let rank = q * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let weight = rank - lo as f64;
    sorted[lo] * (1.0 - weight) + sorted[hi] * weight
}
