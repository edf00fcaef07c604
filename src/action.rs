//! Action enum - everything the widget can be asked to do
//!
//! Key and mouse events are turned into Actions by components; the App
//! applies them. Keeping the vocabulary in one place makes the event flow
//! easy to test without a terminal.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick: poll the host, expire the export notice
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Quit without confirmation
    ForceQuit,

    // ─────────────────────────────────────────────────────────────────────────
    // Tabs
    // ─────────────────────────────────────────────────────────────────────────
    NextTab,
    PrevTab,
    /// Activate the tab with this key
    SelectTab(String),

    // ─────────────────────────────────────────────────────────────────────────
    // Gallery cursor
    // ─────────────────────────────────────────────────────────────────────────
    FocusLeft,
    FocusRight,
    FocusUp,
    FocusDown,
    FirstCard,
    LastCard,

    // ─────────────────────────────────────────────────────────────────────────
    // Selection & Export
    // ─────────────────────────────────────────────────────────────────────────
    /// Toggle the card under the cursor
    ToggleFocused,
    /// Toggle a card of the active tab by index (mouse)
    ToggleCard(usize),
    /// Empty the active tab's selection
    ClearTabSelection,
    /// Write the selection to the host
    Export,
    /// Hide the export notice early
    DismissNotice,
    /// Click on the current view chart
    ActivateCurrentView,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    OpenQuitDialog,
    OpenHelp,
    OpenExportPreview,
    CloseModal,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::NextTab => write!(f, "NextTab"),
            Action::PrevTab => write!(f, "PrevTab"),
            Action::SelectTab(key) => write!(f, "SelectTab({})", key),
            Action::FocusLeft => write!(f, "FocusLeft"),
            Action::FocusRight => write!(f, "FocusRight"),
            Action::FocusUp => write!(f, "FocusUp"),
            Action::FocusDown => write!(f, "FocusDown"),
            Action::FirstCard => write!(f, "FirstCard"),
            Action::LastCard => write!(f, "LastCard"),
            Action::ToggleFocused => write!(f, "ToggleFocused"),
            Action::ToggleCard(index) => write!(f, "ToggleCard({})", index),
            Action::ClearTabSelection => write!(f, "ClearTabSelection"),
            Action::Export => write!(f, "Export"),
            Action::DismissNotice => write!(f, "DismissNotice"),
            Action::ActivateCurrentView => write!(f, "ActivateCurrentView"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::OpenExportPreview => write!(f, "OpenExportPreview"),
            Action::CloseModal => write!(f, "CloseModal"),
        }
    }
}
