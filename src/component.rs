//! Component trait - the contract every piece of the widget tree follows
//!
//! A component turns terminal events into Actions, applies Actions to its own
//! state, and draws itself into whatever area its parent hands it. Parents
//! never reach into a child's state to mutate it; they send Actions.

use crate::action::Action;
use anyhow::Result;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{layout::Rect, Frame};

pub trait Component {
    /// One-time setup before the first draw (acquire host resources here)
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    /// Map a key press to an Action; no state changes here
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let _ = key;
        Ok(None)
    }

    /// Map a mouse event to an Action, using the areas from the last draw
    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        let _ = mouse;
        Ok(None)
    }

    /// Apply an Action; may return a follow-up Action
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let _ = action;
        Ok(None)
    }

    /// Render into `area`
    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()>;

    /// Release anything acquired in `init`; must be safe to call twice
    fn teardown(&mut self) {}
}
