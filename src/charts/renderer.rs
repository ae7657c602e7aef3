//! Static Chart Renderer
//! Renders the correlation heatmap to a PNG file with plotters.
//!
//! Layout:
//! 1. Caption centered at the top
//! 2. One square cell per column pair, colored on the cividis scale
//! 3. Correlation value annotated in every cell, column names on both axes

use crate::charts::plotter::{heat_rgb, heat_text_is_dark};
use crate::stats::CorrelationMatrix;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Nothing to render: no numeric columns")]
    Empty,
    #[error("Drawing failed: {0}")]
    Draw(String),
}

fn draw_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Write the annotated heatmap to `path` as PNG.
    pub fn render_heatmap_png(
        matrix: &CorrelationMatrix,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let n = matrix.columns.len();
        if n == 0 {
            return Err(RenderError::Empty);
        }
        let n = n as i32;

        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let labels = matrix.columns.clone();
        let label_at = |v: &i32| -> String {
            usize::try_from(*v)
                .ok()
                .and_then(|i| labels.get(i))
                .cloned()
                .unwrap_or_default()
        };

        // Row 0 at the top, like a matrix.
        let mut chart = ChartBuilder::on(&root)
            .caption("Correlation Matrix of Numeric Features", ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(140)
            .y_label_area_size(180)
            .build_cartesian_2d(0i32..n, n..0i32)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(n as usize)
            .y_labels(n as usize)
            .x_label_formatter(&label_at)
            .y_label_formatter(&label_at)
            .x_label_style(
                ("sans-serif", 14)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .y_label_style(("sans-serif", 14))
            .draw()
            .map_err(draw_err)?;

        let cells = matrix.values.iter().enumerate().flat_map(|(i, row)| {
            row.iter().enumerate().map(move |(j, &value)| {
                let [r, g, b] = heat_rgb(value);
                Rectangle::new(
                    [(j as i32, i as i32), (j as i32 + 1, i as i32 + 1)],
                    RGBColor(r, g, b).filled(),
                )
            })
        });
        chart.draw_series(cells).map_err(draw_err)?;

        let annotations = matrix.values.iter().enumerate().flat_map(|(i, row)| {
            row.iter().enumerate().map(move |(j, &value)| {
                let text = if value.is_nan() {
                    "-".to_string()
                } else {
                    format!("{:.2}", value)
                };
                let color = if heat_text_is_dark(value) { BLACK } else { WHITE };
                Text::new(
                    text,
                    (j as i32, i as i32),
                    ("sans-serif", 16).into_font().color(&color),
                )
            })
        });
        chart.draw_series(annotations).map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        log::info!("heatmap written to {}", path.display());
        Ok(())
    }
}
