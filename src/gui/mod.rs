//! GUI module - User interface components

mod app;
mod section_view;
mod sidebar;

pub use app::InsightsApp;
pub use section_view::SectionView;
pub use sidebar::{Sidebar, SidebarAction};
