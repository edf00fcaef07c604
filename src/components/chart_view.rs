//! Textual chart thumbnail
//!
//! Stands in for a real chart renderer: given a spec, a padding and whether
//! interactive controls should be shown, it draws a short summary of what the
//! chart encodes.

use crate::model::spec::ChartSpec;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Padding, Paragraph, Widget},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncate to a display width, ending with `…` when cut
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Small glyph hinting at the mark type
fn mark_glyph(mark: &str) -> &'static str {
    match mark {
        "bar" => "▂▅▇▃",
        "line" => "╱╲╱‾",
        "area" => "▁▃▆█",
        "point" | "circle" | "square" => "∙ ∘∙ ",
        "tick" | "rule" => "┃│┃│",
        "rect" => "▦▦▦▦",
        "geoshape" => "◩◪",
        _ => "▫▫▫▫",
    }
}

pub struct ChartView<'a> {
    spec: &'a ChartSpec,
    padding: Padding,
    show_actions: bool,
}

impl<'a> ChartView<'a> {
    pub fn new(spec: &'a ChartSpec) -> Self {
        Self {
            spec,
            padding: Padding::new(1, 1, 0, 0),
            show_actions: false,
        }
    }

    pub fn padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    /// Show the chart's action menu hint
    pub fn show_actions(mut self, show_actions: bool) -> Self {
        self.show_actions = show_actions;
        self
    }

    fn lines(&self, width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        let title = self.spec.title().unwrap_or_else(|| "untitled".to_string());
        lines.push(Line::from(Span::styled(
            truncate_to_width(&title, width),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )));

        let mark = self.spec.mark().unwrap_or("?");
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", mark_glyph(mark)), Style::default().fg(Color::Yellow)),
            Span::styled(
                truncate_to_width(mark, width.saturating_sub(5)),
                Style::default().fg(Color::DarkGray),
            ),
        ]));

        for (channel, description) in self.spec.encodings() {
            let label = format!("{:<6}", channel);
            let rest = width.saturating_sub(label.width());
            lines.push(Line::from(vec![
                Span::styled(label, Style::default().fg(Color::Cyan)),
                Span::raw(truncate_to_width(&description, rest)),
            ]));
        }

        if self.show_actions {
            lines.push(Line::from(Span::styled(
                "⋯ actions",
                Style::default().fg(Color::DarkGray),
            )));
        }

        lines
    }
}

impl Widget for ChartView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = area
            .width
            .saturating_sub(self.padding.left + self.padding.right) as usize;
        let lines = self.lines(width);

        Paragraph::new(lines)
            .block(ratatui::widgets::Block::default().padding(self.padding))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect::<String>()
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("Horsepower", 20), "Horsepower");
        assert_eq!(truncate_to_width("Horsepower", 6), "Horse…");
        assert_eq!(truncate_to_width("Horsepower", 0), "");
        // Wide characters count double
        assert_eq!(truncate_to_width("馬力馬力", 5), "馬力…");
    }

    #[test]
    fn test_thumbnail_summarises_spec() {
        let spec = ChartSpec::new(json!({
            "title": "MPG by Origin",
            "mark": "bar",
            "encoding": {"x": {"field": "Origin", "type": "nominal"}}
        }));
        let area = Rect::new(0, 0, 30, 4);
        let mut buf = Buffer::empty(area);
        ChartView::new(&spec).render(area, &mut buf);

        assert!(row_text(&buf, 0).contains("MPG by Origin"));
        assert!(row_text(&buf, 1).contains("bar"));
        assert!(row_text(&buf, 2).contains("Origin [nominal]"));
    }

    #[test]
    fn test_actions_hint_is_optional() {
        let spec = ChartSpec::new(json!({"mark": "line"}));
        let area = Rect::new(0, 0, 20, 4);

        let mut plain = Buffer::empty(area);
        ChartView::new(&spec).render(area, &mut plain);
        assert!(!row_text(&plain, 2).contains("actions"));

        let mut with_actions = Buffer::empty(area);
        ChartView::new(&spec).show_actions(true).render(area, &mut with_actions);
        assert!(row_text(&with_actions, 2).contains("actions"));
    }
}
