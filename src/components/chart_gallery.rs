//! Chart gallery - one recommendation group as a grid of selectable cards
//!
//! Owns the selection for its tab and the keyboard cursor. The owner learns
//! about selection changes through the `on_change` callback passed to
//! [`ChartGallery::toggle`]; a rejected toggle never calls it.

use crate::action::Action;
use crate::component::Component;
use crate::components::chart_view::ChartView;
use crate::components::selection_toggle::{activate, SelectionToggle};
use crate::model::selection::{Selection, ToggleOutcome};
use crate::model::spec::ChartSpec;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

/// Minimum card width; cards stretch to fill the row
const CARD_WIDTH: u16 = 30;
const CARD_HEIGHT: u16 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GalleryOptions {
    /// Multi-select (bounded by `max_selectable`) or single-select
    pub multiple: bool,
    pub max_selectable: usize,
}

impl Default for GalleryOptions {
    fn default() -> Self {
        Self {
            multiple: true,
            max_selectable: 10,
        }
    }
}

pub struct ChartGallery {
    title: String,
    specs: Vec<ChartSpec>,
    options: GalleryOptions,
    selection: Selection,
    /// Card under the keyboard cursor
    cursor: usize,
    /// First visible grid row
    scroll_row: usize,
    /// Columns used by the last draw
    columns: usize,
    /// (card index, area) from the last draw, for mouse hit testing
    card_areas: Vec<(usize, Rect)>,
}

impl ChartGallery {
    pub fn new(title: impl Into<String>, specs: Vec<ChartSpec>, options: GalleryOptions) -> Self {
        let selection = if options.multiple {
            Selection::multiple(options.max_selectable)
        } else {
            Selection::single()
        };

        Self {
            title: title.into(),
            specs,
            options,
            selection,
            cursor: 0,
            scroll_row: 0,
            columns: 1,
            card_areas: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn options(&self) -> GalleryOptions {
        self.options
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selection.contains(index)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────────────────

    /// Activate card `index`
    ///
    /// Single-select replaces the selection. Multi-select removes a selected
    /// card, adds an unselected one while below `max_selectable`, and
    /// otherwise rejects the toggle without touching state or calling
    /// `on_change`.
    pub fn toggle<F>(&mut self, index: usize, on_change: F) -> ToggleOutcome
    where
        F: FnOnce(&Selection),
    {
        let (next, outcome) = self.selection.toggled(index);
        if outcome.is_change() {
            self.selection = next;
            on_change(&self.selection);
        } else {
            tracing::debug!(gallery = %self.title, index, "toggle rejected at capacity");
        }
        outcome
    }

    /// Drop every selected card; `on_change` fires only if something was selected
    pub fn clear<F>(&mut self, on_change: F)
    where
        F: FnOnce(&Selection),
    {
        if !self.selection.is_empty() {
            self.selection = self.selection.cleared();
            on_change(&self.selection);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Cursor
    // ─────────────────────────────────────────────────────────────────────────

    fn move_cursor(&mut self, action: &Action) {
        if self.specs.is_empty() {
            return;
        }
        let last = self.specs.len() - 1;
        let columns = self.columns.max(1);

        self.cursor = match action {
            Action::FocusLeft => self.cursor.saturating_sub(1),
            Action::FocusRight => (self.cursor + 1).min(last),
            Action::FocusUp => self.cursor.saturating_sub(columns),
            Action::FocusDown => {
                // Stay in place on the last row rather than jumping past the end
                if self.cursor + columns <= last {
                    self.cursor + columns
                } else {
                    self.cursor
                }
            }
            Action::FirstCard => 0,
            Action::LastCard => last,
            _ => self.cursor,
        };
    }

    /// Keep the cursor row inside the visible rows
    fn scroll_to_cursor(&mut self, visible_rows: usize) {
        let cursor_row = self.cursor / self.columns.max(1);
        if cursor_row < self.scroll_row {
            self.scroll_row = cursor_row;
        } else if cursor_row >= self.scroll_row + visible_rows {
            self.scroll_row = cursor_row + 1 - visible_rows;
        }
    }

    fn block_title(&self) -> String {
        if self.options.multiple {
            format!(
                " {} ({}) [{}/{} selected] ",
                self.title,
                self.specs.len(),
                self.selection.len(),
                self.options.max_selectable
            )
        } else {
            format!(" {} ({}) ", self.title, self.specs.len())
        }
    }
}

impl Component for ChartGallery {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('h') | KeyCode::Left => Some(Action::FocusLeft),
            KeyCode::Char('l') | KeyCode::Right => Some(Action::FocusRight),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::FocusUp),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::FocusDown),
            KeyCode::Char('g') | KeyCode::Home => Some(Action::FirstCard),
            KeyCode::Char('G') | KeyCode::End => Some(Action::LastCard),
            KeyCode::Char(' ') | KeyCode::Enter => Some(Action::ToggleFocused),
            KeyCode::Char('c') => Some(Action::ClearTabSelection),
            _ => None,
        };
        Ok(action)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        let mut hit = None;
        for &(index, area) in &self.card_areas {
            if activate(area, &mouse, || hit = Some(index)) {
                break;
            }
        }

        if let Some(index) = hit {
            self.cursor = index;
            return Ok(Some(Action::ToggleCard(index)));
        }
        Ok(None)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::FocusLeft
            | Action::FocusRight
            | Action::FocusUp
            | Action::FocusDown
            | Action::FirstCard
            | Action::LastCard => self.move_cursor(&action),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(self.block_title());
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.card_areas.clear();

        if self.specs.is_empty() {
            let hint = Paragraph::new(Line::from(Span::styled(
                "No charts in this group",
                Style::default().fg(Color::DarkGray),
            )))
            .alignment(ratatui::layout::Alignment::Center);
            frame.render_widget(hint, inner);
            return Ok(());
        }

        if inner.width == 0 || inner.height == 0 {
            return Ok(());
        }

        self.columns = (inner.width / CARD_WIDTH).max(1) as usize;
        let card_width = inner.width / self.columns as u16;
        let visible_rows = (inner.height / CARD_HEIGHT).max(1) as usize;
        self.scroll_to_cursor(visible_rows);

        let first = self.scroll_row * self.columns;
        let last = (first + visible_rows * self.columns).min(self.specs.len());

        for index in first..last {
            let slot = index - first;
            let row = (slot / self.columns) as u16;
            let col = (slot % self.columns) as u16;

            let y = inner.y + row * CARD_HEIGHT;
            let height = CARD_HEIGHT.min(inner.bottom().saturating_sub(y));
            if height < 3 {
                break;
            }
            let card_area = Rect::new(inner.x + col * card_width, y, card_width, height);

            let thumbnail = ChartView::new(&self.specs[index]).padding(Padding::new(1, 1, 0, 0));
            let card = SelectionToggle::new(thumbnail)
                .selected(self.selection.contains(index))
                .focused(index == self.cursor)
                .label(Line::from(Span::styled(
                    format!(" #{} ", index + 1),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )));

            frame.render_widget(card, card_area);
            self.card_areas.push((index, card_area));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyModifiers, MouseButton, MouseEventKind};
    use ratatui::{backend::TestBackend, Terminal};
    use serde_json::json;

    fn specs(n: usize) -> Vec<ChartSpec> {
        (0..n)
            .map(|i| ChartSpec::new(json!({"mark": "bar", "title": format!("chart {}", i)})))
            .collect()
    }

    fn gallery(n: usize, max_selectable: usize) -> ChartGallery {
        ChartGallery::new(
            "Distribution",
            specs(n),
            GalleryOptions {
                multiple: true,
                max_selectable,
            },
        )
    }

    #[test]
    fn test_rejected_toggle_fires_no_callback() {
        let mut gallery = gallery(5, 2);
        let mut calls = Vec::new();

        gallery.toggle(0, |s| calls.push(s.indices()));
        gallery.toggle(1, |s| calls.push(s.indices()));
        let outcome = gallery.toggle(2, |s| calls.push(s.indices()));

        assert_eq!(outcome, ToggleOutcome::Rejected { capacity: 2 });
        assert_eq!(calls, vec![vec![0], vec![0, 1]]);
        assert_eq!(gallery.selection().indices(), vec![0, 1]);
    }

    #[test]
    fn test_single_select_gallery_replaces() {
        let mut gallery = ChartGallery::new(
            "Enhance",
            specs(3),
            GalleryOptions {
                multiple: false,
                max_selectable: 10,
            },
        );
        let mut last = None;
        gallery.toggle(1, |s| last = Some(s.indices()));
        gallery.toggle(2, |s| last = Some(s.indices()));

        assert_eq!(last, Some(vec![2]));
        assert!(!gallery.is_selected(1));
    }

    #[test]
    fn test_clear_only_notifies_when_needed() {
        let mut gallery = gallery(3, 10);
        let mut cleared = 0;
        gallery.clear(|_| cleared += 1);
        assert_eq!(cleared, 0);

        gallery.toggle(1, |_| {});
        gallery.clear(|s| {
            assert!(s.is_empty());
            cleared += 1;
        });
        assert_eq!(cleared, 1);
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut gallery = gallery(3, 10);
        gallery.update(Action::FocusLeft).unwrap();
        assert_eq!(gallery.cursor(), 0);

        gallery.update(Action::LastCard).unwrap();
        gallery.update(Action::FocusRight).unwrap();
        assert_eq!(gallery.cursor(), 2);

        gallery.update(Action::FocusDown).unwrap();
        assert_eq!(gallery.cursor(), 2);
    }

    #[test]
    fn test_space_toggles_focused_card() {
        let mut gallery = gallery(3, 10);
        let key = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);
        assert_eq!(gallery.handle_key_event(key).unwrap(), Some(Action::ToggleFocused));
    }

    #[test]
    fn test_draw_renders_one_card_per_spec_and_click_hits_it() {
        let mut gallery = gallery(2, 10);
        gallery.toggle(1, |_| {});

        let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
        terminal
            .draw(|frame| {
                gallery.draw(frame, frame.area()).unwrap();
            })
            .unwrap();

        assert_eq!(gallery.card_areas.len(), 2);
        let buffer = terminal.backend().buffer().clone();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("chart 0"));
        assert!(text.contains("chart 1"));
        assert!(text.contains("[1/10 selected]"));

        let (_, second) = gallery.card_areas[1];
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: second.x + 2,
            row: second.y + 2,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(gallery.handle_mouse_event(click).unwrap(), Some(Action::ToggleCard(1)));
        assert_eq!(gallery.cursor(), 1);
    }

    #[test]
    fn test_empty_gallery_draws_hint() {
        let mut gallery = gallery(0, 10);
        let mut terminal = Terminal::new(TestBackend::new(40, 6)).unwrap();
        terminal
            .draw(|frame| {
                gallery.draw(frame, frame.area()).unwrap();
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("No charts in this group"));
    }
}
