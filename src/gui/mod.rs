//! GUI module - User interface components

mod app;
mod control_panel;
mod report_viewer;

pub use app::MomTrendApp;
pub use control_panel::{ControlPanel, ControlPanelAction};
pub use report_viewer::ReportViewer;
