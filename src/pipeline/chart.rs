use anyhow::anyhow;
use plotters::prelude::*;

const CHART_SIZE: (u32, u32) = (400, 300);
const CHART_TITLE: &str = "Sample Graph: Project Data";
const CATEGORIES: [(&str, i32); 3] = [("Part A", 20), ("Part B", 35), ("Part C", 30)];

/// Renders the fixed illustrative bar chart as SVG bytes. No inputs, so two
/// calls always produce identical output.
pub fn render_sample_chart() -> anyhow::Result<Vec<u8>> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| anyhow!("failed to fill chart background: {e}"))?;

        let max_value = CATEGORIES.iter().map(|(_, v)| *v).max().unwrap_or(0);

        let mut chart = ChartBuilder::on(&root)
            .caption(CHART_TITLE, ("sans-serif", 16))
            .margin(10)
            .x_label_area_size(28)
            .y_label_area_size(36)
            .build_cartesian_2d(0..CATEGORIES.len() as i32, 0..max_value + 5)
            .map_err(|e| anyhow!("failed to build chart axes: {e}"))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(CATEGORIES.len())
            .x_label_formatter(&|idx| {
                CATEGORIES
                    .get(*idx as usize)
                    .map(|(name, _)| (*name).to_string())
                    .unwrap_or_default()
            })
            .draw()
            .map_err(|e| anyhow!("failed to draw chart mesh: {e}"))?;

        chart
            .draw_series(CATEGORIES.iter().enumerate().map(|(i, (_, value))| {
                Rectangle::new([(i as i32, 0), (i as i32 + 1, *value)], BLUE.filled())
            }))
            .map_err(|e| anyhow!("failed to draw chart bars: {e}"))?;

        root.present()
            .map_err(|e| anyhow!("failed to finalize chart: {e}"))?;
    }

    Ok(svg.into_bytes())
}
