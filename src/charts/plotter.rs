//! Chart Plotter Module
//! Creates interactive visualizations using egui_plot.

use crate::stats::{CategoryCounts, CorrelationMatrix, GroupStats, Histogram};
use egui::{Align2, Color32, FontId, RichText, Sense};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Plot};

/// Color palette for groups
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219), // Blue
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(0, 188, 212),  // Cyan
    Color32::from_rgb(255, 87, 34),  // Deep Orange
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

/// Cividis anchor colors, low to high.
const HEAT_STOPS: [[u8; 3]; 5] = [
    [0, 34, 78],
    [61, 78, 110],
    [124, 123, 120],
    [188, 175, 111],
    [254, 232, 56],
];

const CHART_HEIGHT: f32 = 280.0;

/// Map a correlation in [-1, 1] onto the heatmap scale. NaN is drawn grey.
pub fn heat_rgb(value: f64) -> [u8; 3] {
    if value.is_nan() {
        return [200, 200, 200];
    }
    let t = ((value.clamp(-1.0, 1.0) + 1.0) / 2.0) * (HEAT_STOPS.len() - 1) as f64;
    let lower = (t.floor() as usize).min(HEAT_STOPS.len() - 2);
    let frac = t - lower as f64;

    let a = HEAT_STOPS[lower];
    let b = HEAT_STOPS[lower + 1];
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;
    [mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2])]
}

/// Dark text on light cells, light text on dark cells.
pub fn heat_text_is_dark(value: f64) -> bool {
    let [r, g, b] = heat_rgb(value);
    0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64 > 140.0
}

/// Creates charts for the dashboard sections.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn get_group_color(group_index: usize) -> Color32 {
        PALETTE[group_index % PALETTE.len()]
    }

    /// Histogram as touching bars.
    pub fn draw_histogram(ui: &mut egui::Ui, id: &str, hist: &Histogram, x_label: &str) {
        let bars: Vec<Bar> = hist
            .counts
            .iter()
            .enumerate()
            .map(|(i, &count)| {
                Bar::new(hist.bin_center(i), count as f64)
                    .width(hist.bin_width)
                    .fill(PALETTE[0].gamma_multiply(0.8))
            })
            .collect();

        Plot::new(id)
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label(x_label)
            .y_axis_label("count")
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name(x_label));
            });
    }

    /// One colored bar per category.
    pub fn draw_category_bars(
        ui: &mut egui::Ui,
        id: &str,
        counts: &CategoryCounts,
        x_label: &str,
    ) {
        let labels: Vec<String> = counts.counts.iter().map(|(l, _)| l.clone()).collect();

        Plot::new(id)
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label(x_label)
            .y_axis_label("count")
            .x_axis_formatter(move |mark, _range| Self::category_label(&labels, mark.value))
            .show(ui, |plot_ui| {
                for (i, (label, count)) in counts.counts.iter().enumerate() {
                    let color = Self::get_group_color(i);
                    let bar = Bar::new(i as f64, *count as f64).width(0.6).fill(color);
                    plot_ui.bar_chart(BarChart::new(vec![bar]).color(color).name(label));
                }
            });
    }

    /// Box plot per group, groups along the x axis.
    pub fn draw_box_plot(
        ui: &mut egui::Ui,
        id: &str,
        groups: &[GroupStats],
        x_label: &str,
        y_label: &str,
    ) {
        let labels: Vec<String> = groups.iter().map(|g| g.group_name.clone()).collect();

        Plot::new(id)
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label(x_label)
            .y_axis_label(y_label)
            .x_axis_formatter(move |mark, _range| Self::category_label(&labels, mark.value))
            .show(ui, |plot_ui| {
                for (i, gs) in groups.iter().enumerate() {
                    if gs.count == 0 {
                        continue;
                    }
                    let color = Self::get_group_color(i);
                    let box_elem = BoxElem::new(
                        i as f64,
                        BoxSpread::new(gs.whisker_low, gs.q1, gs.median, gs.q3, gs.whisker_high),
                    )
                    .box_width(0.5)
                    .fill(color.gamma_multiply(0.3))
                    .stroke(egui::Stroke::new(1.5, color));

                    plot_ui.box_plot(BoxPlot::new(vec![box_elem]).name(&gs.group_name));
                }
            });
    }

    /// Annotated correlation heatmap drawn with the painter.
    pub fn draw_heatmap(ui: &mut egui::Ui, matrix: &CorrelationMatrix) {
        if matrix.is_empty() {
            ui.label("No numeric columns to correlate");
            return;
        }
        let n = matrix.columns.len();

        let label_width = 170.0;
        let cell = ((ui.available_width() - label_width) / n as f32).clamp(36.0, 80.0);
        let label_height = 20.0;
        let size = egui::vec2(label_width + cell * n as f32, label_height + cell * n as f32);
        let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
        let painter = ui.painter_at(rect);
        let text_color = ui.visuals().text_color();
        let origin = rect.min + egui::vec2(label_width, label_height);

        for (j, name) in matrix.columns.iter().enumerate() {
            painter.text(
                egui::pos2(origin.x + (j as f32 + 0.5) * cell, rect.min.y + label_height / 2.0),
                Align2::CENTER_CENTER,
                Self::short_name(name),
                FontId::proportional(10.0),
                text_color,
            );
        }

        for (i, row) in matrix.values.iter().enumerate() {
            painter.text(
                egui::pos2(origin.x - 6.0, origin.y + (i as f32 + 0.5) * cell),
                Align2::RIGHT_CENTER,
                &matrix.columns[i],
                FontId::proportional(11.0),
                text_color,
            );

            for (j, &value) in row.iter().enumerate() {
                let min = origin + egui::vec2(j as f32 * cell, i as f32 * cell);
                let cell_rect = egui::Rect::from_min_size(min, egui::vec2(cell, cell));
                let [r, g, b] = heat_rgb(value);
                painter.rect_filled(cell_rect.shrink(1.0), 2.0, Color32::from_rgb(r, g, b));

                let label = if value.is_nan() {
                    "-".to_string()
                } else {
                    format!("{:.2}", value)
                };
                let label_color = if heat_text_is_dark(value) {
                    Color32::BLACK
                } else {
                    Color32::WHITE
                };
                painter.text(
                    cell_rect.center(),
                    Align2::CENTER_CENTER,
                    label,
                    FontId::proportional(11.0),
                    label_color,
                );
            }
        }
    }

    /// Summary table for grouped statistics.
    pub fn draw_group_table(ui: &mut egui::Ui, id: &str, groups: &[GroupStats]) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id(id))
                    .striped(true)
                    .min_col_width(55.0)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        for header in ["Group", "N", "Mean", "Median", "Std", "Q1", "Q3"] {
                            ui.label(RichText::new(header).strong().size(11.0));
                        }
                        ui.end_row();

                        for (i, gs) in groups.iter().enumerate() {
                            ui.label(
                                RichText::new(&gs.group_name)
                                    .size(11.0)
                                    .color(Self::get_group_color(i)),
                            );
                            ui.label(RichText::new(gs.count.to_string()).size(11.0));
                            for v in [gs.mean, gs.median, gs.std, gs.q1, gs.q3] {
                                ui.label(RichText::new(format_value(v)).size(11.0));
                            }
                            ui.end_row();
                        }
                    });
            });
    }

    fn category_label(labels: &[String], value: f64) -> String {
        let idx = value.round();
        if (value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }

    fn short_name(name: &str) -> String {
        if name.chars().count() > 12 {
            let head: String = name.chars().take(11).collect();
            format!("{}…", head)
        } else {
            name.to_string()
        }
    }
}

/// Fixed-precision display; NaN shown as a dash.
pub fn format_value(v: f64) -> String {
    if v.is_nan() {
        "-".to_string()
    } else {
        format!("{:.3}", v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn heat_scale_endpoints() {
        assert_eq!(heat_rgb(-1.0), [0, 34, 78]);
        assert_eq!(heat_rgb(1.0), [254, 232, 56]);
        assert_eq!(heat_rgb(0.0), [124, 123, 120]);
        assert_eq!(heat_rgb(f64::NAN), [200, 200, 200]);
        assert!(heat_text_is_dark(1.0));
        assert!(!heat_text_is_dark(-1.0));
    }

    #[test]
    fn category_labels_only_on_integer_ticks() {
        let labels = vec!["rare".to_string(), "frequent".to_string()];
        assert_eq!(ChartPlotter::category_label(&labels, 1.0), "frequent");
        assert_eq!(ChartPlotter::category_label(&labels, 0.5), "");
        assert_eq!(ChartPlotter::category_label(&labels, 5.0), "");
    }

    #[test]
    fn formats_missing_values() {
        assert_eq!(format_value(f64::NAN), "-");
        assert_eq!(format_value(1.23456), "1.235");
    }
}
