//! Root application component
//!
//! The App struct implements the Component trait, acting as the root component
//! that routes input either to the open modal or to the recommendation widget.
//! App stays lean: the widget owns the host state, App owns the overlays.

use crate::action::Action;
use crate::binding::HostBinding;
use crate::component::Component;
use crate::components::{ExportPreviewDialog, GalleryOptions, HelpDialog, QuitDialog};
use crate::config::Config;
use crate::model::modal::{Modal, ModalStack};
use crate::widget::{RecommendationWidget, WidgetOptions};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{layout::Rect, Frame};

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

pub struct App {
    pub widget: RecommendationWidget,

    /// Modal overlay stack
    pub modals: ModalStack,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Dialogs
    // ─────────────────────────────────────────────────────────────────────────
    pub quit_dialog: QuitDialog,
    pub help_dialog: HelpDialog,
    pub export_preview: ExportPreviewDialog,
}

impl App {
    pub fn new(binding: Box<dyn HostBinding>, config: &Config) -> App {
        let options = WidgetOptions {
            gallery: GalleryOptions {
                multiple: true,
                max_selectable: config.max_selectable,
            },
            notice_duration: config.notice_duration(),
        };

        App {
            widget: RecommendationWidget::new(binding, options),
            modals: ModalStack::new(),
            should_quit: false,
            quit_dialog: QuitDialog::default(),
            help_dialog: HelpDialog::default(),
            export_preview: ExportPreviewDialog::default(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for App {
    fn init(&mut self) -> Result<()> {
        self.widget.init()
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::ForceQuit));
        }

        if let Some(modal) = self.modals.top() {
            return self.handle_modal_key_event(modal, key);
        }

        match key.code {
            KeyCode::Char('q') => Ok(Some(Action::OpenQuitDialog)),
            KeyCode::Char('?') => Ok(Some(Action::OpenHelp)),
            KeyCode::Char('v') => Ok(Some(Action::OpenExportPreview)),
            _ => self.widget.handle_key_event(key),
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        // Overlays swallow the mouse
        if !self.modals.is_empty() {
            return Ok(None);
        }
        self.widget.handle_mouse_event(mouse)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::ForceQuit => {
                self.should_quit = true;
            }
            Action::Resize(_, _) => {}

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => {
                self.quit_dialog.unexported_changes = self.widget.has_unexported_changes();
                self.modals.push(Modal::QuitConfirm);
            }
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.push(Modal::Help);
            }
            Action::OpenExportPreview => {
                self.export_preview.open(self.widget.export_payload());
                self.modals.push(Modal::ExportPreview);
            }
            Action::CloseModal => {
                self.modals.pop();
            }
            Action::Export => {
                if self.modals.top() == Some(Modal::ExportPreview) {
                    self.modals.pop();
                }
                return self.widget.update(Action::Export);
            }

            // Everything else belongs to the widget
            other => return self.widget.update(other),
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        self.widget.draw(frame, area)?;

        // Draw modal overlay if active
        if let Some(modal) = self.modals.top() {
            self.draw_modal(frame, area, modal)?;
        }
        Ok(())
    }

    fn teardown(&mut self) {
        self.widget.teardown();
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helper Methods
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    fn handle_modal_key_event(&mut self, modal: Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::Help => self.help_dialog.handle_key_event(key),
            Modal::ExportPreview => self.export_preview.handle_key_event(key),
        }
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: Modal) -> Result<()> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.draw(frame, area),
            Modal::Help => self.help_dialog.draw(frame, area),
            Modal::ExportPreview => self.export_preview.draw(frame, area),
        }
    }
}
