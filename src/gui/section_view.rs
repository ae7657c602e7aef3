//! Section View Widget
//! Central scrollable panel rendering the selected dashboard section.

use crate::charts::{format_value, ChartPlotter};
use crate::dashboard::{DashboardData, Section};
use crate::stats::{OverviewReport, SIGNIFICANCE_THRESHOLD};
use egui::{Color32, RichText, ScrollArea};

const WARNING_COLOR: Color32 = Color32::from_rgb(243, 156, 18);

const RECOMMENDATIONS: [(&str, &str); 3] = [
    (
        "Younger (18-30) customers",
        "Spend more and purchase frequently. Launch age-targeted loyalty programs or referral incentives.",
    ),
    (
        "High-income customers",
        "Not always the most satisfied. Review pricing vs. product category value proposition.",
    ),
    (
        "High-satisfaction customers",
        "Tend to buy fewer times but spend more. Consider a VIP membership with early access or bundled deals.",
    ),
];

/// Renders one section at a time.
pub struct SectionView;

impl SectionView {
    pub fn show(ui: &mut egui::Ui, section: Section, data: &DashboardData) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading(section.title());
                ui.add_space(10.0);

                match section {
                    Section::DataOverview => Self::show_overview(ui, &data.overview),
                    Section::DemographicAnalysis => Self::show_demographics(ui, data),
                    Section::BehavioralAnalysis => Self::show_behavior(ui, data),
                    Section::Recommendations => Self::show_recommendations(ui),
                }
            });
    }

    /// Shown instead of every section when the dataset could not be loaded.
    pub fn show_load_error(ui: &mut egui::Ui, error: &str) {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.label(
                RichText::new(error)
                    .size(16.0)
                    .color(Color32::from_rgb(220, 53, 69)),
            );
            ui.add_space(10.0);
            ui.label("Please fix the data loading issue to proceed.");
        });
    }

    fn show_overview(ui: &mut egui::Ui, report: &OverviewReport) {
        ui.label(
            RichText::new(format!("Dataset Shape: ({}, {})", report.rows, report.columns)).strong(),
        );
        ui.add_space(8.0);

        for warning in report.quality.warnings() {
            ui.colored_label(WARNING_COLOR, format!("⚠ {}", warning));
        }

        if let Some(bins) = &report.income_bins {
            let [lo, e1, e2, hi] = bins.edges;
            ui.label(format!(
                "Income levels: Low [{:.0}, {:.0}), Medium [{:.0}, {:.0}), High [{:.0}, {:.0}]",
                lo, e1, e1, e2, e2, hi
            ));
        }
        ui.add_space(10.0);

        ui.label(RichText::new("Data Types and Missing Values").size(14.0).strong());
        egui::Grid::new("overview_columns")
            .striped(true)
            .min_col_width(80.0)
            .show(ui, |ui| {
                for header in ["Column", "Type", "Missing"] {
                    ui.label(RichText::new(header).strong());
                }
                ui.end_row();
                for column in &report.column_summaries {
                    ui.label(&column.name);
                    ui.label(&column.dtype);
                    ui.label(column.missing.to_string());
                    ui.end_row();
                }
            });

        ui.add_space(15.0);
        ui.label(RichText::new("Descriptive Statistics").size(14.0).strong());
        egui::Grid::new("overview_describe")
            .striped(true)
            .min_col_width(70.0)
            .show(ui, |ui| {
                for header in ["", "count", "mean", "std", "min", "25%", "50%", "75%", "max"] {
                    ui.label(RichText::new(header).strong());
                }
                ui.end_row();
                for (name, d) in report.numeric_summaries() {
                    ui.label(name);
                    ui.label(d.count.to_string());
                    for v in [d.mean, d.std, d.min, d.p25, d.p50, d.p75, d.max] {
                        ui.label(format_value(v));
                    }
                    ui.end_row();
                }
            });
    }

    fn show_demographics(ui: &mut egui::Ui, data: &DashboardData) {
        let demo = &data.demographics;

        ui.columns(2, |columns| {
            let ui = &mut columns[0];
            ui.label(
                RichText::new(format!(
                    "Age Distribution of Customers (n = {})",
                    demo.age_histogram.total()
                ))
                .strong(),
            );
            ChartPlotter::draw_histogram(ui, "age_hist", &demo.age_histogram, "age");
            ui.add_space(10.0);

            ui.label(RichText::new("Gender Distribution").strong());
            match &demo.gender_counts {
                Some(counts) => ChartPlotter::draw_category_bars(ui, "gender", counts, "gender"),
                None => Self::unavailable(ui, "gender"),
            }
            ui.add_space(10.0);

            ui.label(RichText::new("Customers by Age Group").strong());
            ChartPlotter::draw_category_bars(
                ui,
                "age_groups",
                &demo.age_group_counts,
                "age_group",
            );

            let ui = &mut columns[1];
            ui.label(RichText::new("Income Distribution of Customers").strong());
            ChartPlotter::draw_histogram(ui, "income_hist", &demo.income_histogram, "income");
            ui.add_space(10.0);

            ui.label(RichText::new("Income Distribution by Education Level").strong());
            match &demo.income_by_education {
                Some(groups) => {
                    ChartPlotter::draw_box_plot(ui, "income_edu", groups, "education", "income");
                    ChartPlotter::draw_group_table(ui, "income_edu_table", groups);
                }
                None => Self::unavailable(ui, "education"),
            }
            ui.add_space(10.0);

            ui.label(RichText::new("Customers by Income Level").strong());
            ChartPlotter::draw_category_bars(
                ui,
                "income_levels",
                &demo.income_level_counts,
                "income_level",
            );
        });
    }

    fn show_behavior(ui: &mut egui::Ui, data: &DashboardData) {
        let behavior = &data.behavior;

        ui.columns(2, |columns| {
            let ui = &mut columns[0];
            ui.label(RichText::new("Purchase Amount by Purchase Frequency").strong());
            match &behavior.amount_by_frequency {
                Some(groups) => {
                    ChartPlotter::draw_box_plot(
                        ui,
                        "amount_freq",
                        groups,
                        "purchase_frequency",
                        "purchase_amount",
                    );
                    ChartPlotter::draw_group_table(ui, "amount_freq_table", groups);
                }
                None => Self::unavailable(ui, "purchase_amount"),
            }
            ui.add_space(10.0);

            ui.label(RichText::new("Purchase Frequency Score by Age Group").strong());
            ChartPlotter::draw_box_plot(
                ui,
                "score_age",
                &behavior.score_by_age_group,
                "age_group",
                "purchase_frequency_score",
            );

            let ui = &mut columns[1];
            ui.label(RichText::new("Correlation Matrix of Numeric Features").strong());
            ui.add_space(5.0);
            ChartPlotter::draw_heatmap(ui, &behavior.correlation);
            ui.add_space(10.0);

            let pairs = behavior.correlation.significant_pairs(SIGNIFICANCE_THRESHOLD);
            ui.label(
                RichText::new(format!("Significant correlations (p ≤ {})", SIGNIFICANCE_THRESHOLD))
                    .strong(),
            );
            if pairs.is_empty() {
                ui.label(RichText::new("None").color(Color32::GRAY));
            }
            for (a, b, r, p) in pairs {
                ui.label(format!("{} ~ {}: r = {:.2}, p = {:.4}", a, b, r, p));
            }
        });
    }

    fn show_recommendations(ui: &mut egui::Ui) {
        for (audience, advice) in RECOMMENDATIONS {
            ui.horizontal_wrapped(|ui| {
                ui.label(RichText::new(format!("• {}:", audience)).strong());
                ui.label(advice);
            });
            ui.add_space(6.0);
        }
    }

    fn unavailable(ui: &mut egui::Ui, column: &str) {
        ui.label(
            RichText::new(format!("Column '{}' not available", column)).color(Color32::GRAY),
        );
    }
}
