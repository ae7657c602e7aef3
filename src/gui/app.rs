//! Customer Insights Main Application
//! Main window with navigation sidebar and section view.

use crate::config::AppConfig;
use crate::dashboard::DashboardData;
use crate::data::{DatasetCache, PipelineError};
use crate::gui::{SectionView, Sidebar, SidebarAction};
use egui::SidePanel;
use std::path::{Path, PathBuf};

/// Main application window.
pub struct InsightsApp {
    config: AppConfig,
    cache: DatasetCache,
    sidebar: Sidebar,
    dashboard: Result<DashboardData, String>,
}

impl InsightsApp {
    /// Load the dataset once for the session.
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let mut cache = DatasetCache::new();
        let dashboard = Self::prepare(&mut cache, &config, false);
        let mut sidebar = Sidebar::new(config.data_path.clone());
        Self::update_status(&mut sidebar, &dashboard);

        Self {
            config,
            cache,
            sidebar,
            dashboard,
        }
    }

    /// Load (or reload) the dataset and precompute every section.
    fn prepare(
        cache: &mut DatasetCache,
        config: &AppConfig,
        reload: bool,
    ) -> Result<DashboardData, String> {
        let loaded: Result<_, PipelineError> = if reload {
            cache.reload(&config.data_path)
        } else {
            cache.get_or_load(&config.data_path)
        };
        let table = loaded.map_err(|e| e.to_string())?;

        DashboardData::build(table, config.histogram_bins).map_err(|e| {
            log::error!("failed to compute statistics: {}", e);
            format!("Error computing statistics: {}", e)
        })
    }

    fn update_status(sidebar: &mut Sidebar, dashboard: &Result<DashboardData, String>) {
        match dashboard {
            Ok(data) => {
                sidebar.exports_enabled = true;
                sidebar.set_status(&format!(
                    "Loaded {} rows, {} columns",
                    data.overview.rows, data.overview.columns
                ));
            }
            Err(error) => {
                sidebar.exports_enabled = false;
                sidebar.set_status(error);
            }
        }
    }

    fn handle_reload(&mut self) {
        self.dashboard = Self::prepare(&mut self.cache, &self.config, true);
        Self::update_status(&mut self.sidebar, &self.dashboard);
    }

    fn handle_export_summary(&mut self) {
        let Ok(data) = &self.dashboard else {
            return;
        };
        let Some(path) = Self::pick_save_path("JSON", "json", "customer_summary.json") else {
            return; // User cancelled
        };

        match data.export_summary(&path) {
            Ok(()) => self
                .sidebar
                .set_status(&format!("Summary exported to {}", path.display())),
            Err(e) => {
                log::warn!("{:#}", e);
                self.sidebar.set_status(&format!("Error: {:#}", e));
            }
        }
    }

    fn handle_export_heatmap(&mut self) {
        let Ok(data) = &self.dashboard else {
            return;
        };
        let Some(path) = Self::pick_save_path("PNG Image", "png", "correlation_heatmap.png")
        else {
            return; // User cancelled
        };

        match data.export_heatmap(&path) {
            Ok(()) => {
                self.sidebar
                    .set_status(&format!("Heatmap exported to {}", path.display()));
                Self::open_file(&path);
            }
            Err(e) => {
                log::warn!("{:#}", e);
                self.sidebar.set_status(&format!("Error: {:#}", e));
            }
        }
    }

    fn pick_save_path(filter: &str, extension: &str, file_name: &str) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .add_filter(filter, &[extension])
            .set_file_name(file_name)
            .save_file()
    }

    fn open_file(path: &Path) {
        if let Err(e) = open::that(path) {
            log::warn!("could not open {}: {}", path.display(), e);
        }
    }
}

impl eframe::App for InsightsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Navigation
        SidePanel::left("sidebar")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.sidebar.show(ui);

                    match action {
                        SidebarAction::Reload => self.handle_reload(),
                        SidebarAction::ExportSummary => self.handle_export_summary(),
                        SidebarAction::ExportHeatmap => self.handle_export_heatmap(),
                        SidebarAction::None => {}
                    }
                });
            });

        // Central panel - Selected section
        egui::CentralPanel::default().show(ctx, |ui| match &self.dashboard {
            Ok(data) => SectionView::show(ui, self.sidebar.section, data),
            Err(error) => SectionView::show_load_error(ui, error),
        });
    }
}
