//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod chart_gallery;
pub mod chart_view;
pub mod current_view;
pub mod export_preview;
pub mod help_dialog;
pub mod layout;
pub mod quit_dialog;
pub mod selection_toggle;

pub use chart_gallery::{ChartGallery, GalleryOptions};
pub use chart_view::ChartView;
pub use current_view::{CurrentViewPanel, CurrentViewState};
pub use export_preview::ExportPreviewDialog;
pub use help_dialog::HelpDialog;
pub use layout::{calculate_widget_layout, centered_popup};
pub use quit_dialog::QuitDialog;
pub use selection_toggle::SelectionToggle;
