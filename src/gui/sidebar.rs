//! Sidebar Widget
//! Left side panel with navigation, data source and export controls.

use crate::dashboard::Section;
use egui::{Color32, ComboBox, RichText};
use std::path::PathBuf;

/// Left side panel with the section selector.
pub struct Sidebar {
    pub section: Section,
    pub data_path: PathBuf,
    pub exports_enabled: bool,
    pub status: String,
}

impl Sidebar {
    pub fn new(data_path: PathBuf) -> Self {
        Self {
            section: Section::default(),
            data_path,
            exports_enabled: false,
            status: "Ready".to_string(),
        }
    }

    /// Draw the sidebar
    pub fn show(&mut self, ui: &mut egui::Ui) -> SidebarAction {
        let mut action = SidebarAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Customer Insights")
                    .size(20.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Navigation =====
        ui.label(RichText::new("🧭 Navigation").size(14.0).strong());
        ui.add_space(5.0);

        ui.label("Choose a section");
        ComboBox::from_id_salt("section")
            .width(220.0)
            .selected_text(self.section.title())
            .show_ui(ui, |ui| {
                for section in Section::ALL {
                    ui.selectable_value(&mut self.section, section, section.title());
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Data Source =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(self.data_path.display().to_string()).size(12.0));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("🔄 Reload").clicked() {
                            action = SidebarAction::Reload;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Exports =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.exports_enabled, |ui| {
                let summary = egui::Button::new(RichText::new("📄 Export Summary").size(14.0))
                    .min_size(egui::vec2(180.0, 30.0));
                if ui.add(summary).clicked() {
                    action = SidebarAction::ExportSummary;
                }

                ui.add_space(8.0);

                let heatmap = egui::Button::new(RichText::new("🖼 Export Heatmap").size(14.0))
                    .min_size(egui::vec2(180.0, 30.0));
                if ui.add(heatmap).clicked() {
                    action = SidebarAction::ExportHeatmap;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by the sidebar
#[derive(Debug, Clone, PartialEq)]
pub enum SidebarAction {
    None,
    Reload,
    ExportSummary,
    ExportHeatmap,
}
