//! Layout calculations for the widget

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Height of the current view panel when a chart is shown
const CURRENT_VIEW_HEIGHT: u16 = 10;
/// Height of the export notice box
const NOTICE_HEIGHT: u16 = 3;

/// Areas of the recommendation widget, top to bottom
pub struct WidgetLayout {
    pub current_view: Rect,
    pub tabs: Rect,
    pub gallery: Rect,
    pub notice: Option<Rect>,
    pub status: Rect,
    pub help: Rect,
}

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

/// Area inset by `margin` cells on every side
pub fn inset(area: Rect, margin: u16) -> Rect {
    Rect::new(
        area.x + margin.min(area.width / 2),
        area.y + margin.min(area.height / 2),
        area.width.saturating_sub(margin * 2),
        area.height.saturating_sub(margin * 2),
    )
}

/// Split the widget area
///
/// The current view collapses to a single empty row when there is no chart
/// to show, leaving the room to the gallery.
pub fn calculate_widget_layout(area: Rect, has_current_view: bool, show_notice: bool) -> WidgetLayout {
    let current_view_height = if has_current_view {
        CURRENT_VIEW_HEIGHT
    } else {
        1
    };
    let notice_height = if show_notice { NOTICE_HEIGHT } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(current_view_height),
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(notice_height),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    WidgetLayout {
        current_view: chunks[0],
        tabs: chunks[1],
        gallery: chunks[2],
        notice: show_notice.then_some(chunks[3]),
        status: chunks[4],
        help: chunks[5],
    }
}
