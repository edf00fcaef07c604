//! Selectable card wrapper
//!
//! Stateless: whether the card is selected comes from the owner, and
//! activation is reported back by hit-testing the area it was drawn in.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Widget},
};

pub const CHECK_MARK: &str = " ✔ ";

/// Whether a click at (`column`, `row`) lands on a card drawn in `area`
pub fn hit_test(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

/// Forward a left click inside `area` to `on_activate`
///
/// The callback runs exactly once per click and never for other events.
/// Returns whether it ran.
pub fn activate<F: FnOnce()>(area: Rect, mouse: &MouseEvent, on_activate: F) -> bool {
    let clicked = mouse.kind == MouseEventKind::Down(MouseButton::Left)
        && hit_test(area, mouse.column, mouse.row);
    if clicked {
        on_activate();
    }
    clicked
}

/// A card that shows a child widget and a selected / focused state
pub struct SelectionToggle<'a, W> {
    child: W,
    selected: bool,
    focused: bool,
    label: Option<Line<'a>>,
}

impl<'a, W: Widget> SelectionToggle<'a, W> {
    pub fn new(child: W) -> Self {
        Self {
            child,
            selected: false,
            focused: false,
            label: None,
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Keyboard cursor is on this card
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn label(mut self, label: impl Into<Line<'a>>) -> Self {
        self.label = Some(label.into());
        self
    }

    fn border_style(&self) -> Style {
        let color = match (self.selected, self.focused) {
            (true, _) => Color::Green,
            (false, true) => Color::Cyan,
            (false, false) => Color::DarkGray,
        };
        let style = Style::default().fg(color);
        if self.focused {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }
}

impl<W: Widget> Widget for SelectionToggle<'_, W> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_type = if self.focused {
            BorderType::Thick
        } else {
            BorderType::Rounded
        };

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(border_type)
            .border_style(self.border_style());

        if let Some(label) = self.label.clone() {
            block = block.title_top(label);
        }
        if self.selected {
            block = block.title_top(
                Line::from(Span::styled(
                    CHECK_MARK,
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ))
                .right_aligned(),
            );
        }

        let inner = block.inner(area);
        block.render(area, buf);
        self.child.render(inner, buf);
    }
}
