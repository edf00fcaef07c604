//! Model layer - data the widget displays and the state it derives
//!
//! - `spec` - chart specs and recommendation groups from the host
//! - `selection` - per-tab selection values
//! - `export` - the payload written back on export
//! - `modal` - overlay management

pub mod export;
pub mod modal;
pub mod selection;
pub mod spec;

pub use export::{ExportEntry, ExportPayload, EXPORT_KEY};
pub use selection::{Selection, SelectionSet, ToggleOutcome};
pub use spec::{ChartSpec, RecommendationGroup};
