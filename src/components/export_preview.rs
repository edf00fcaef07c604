//! Export preview - the JSON that `x` would write to the host

use crate::action::Action;
use crate::component::Component;
use crate::components::layout::inset;
use crate::model::export::{ExportPayload, EXPORT_KEY};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

#[derive(Default)]
pub struct ExportPreviewDialog {
    lines: Vec<String>,
    scroll_offset: usize,
}

impl ExportPreviewDialog {
    /// Snapshot the payload to show; resets scrolling
    pub fn open(&mut self, payload: &ExportPayload) {
        let json = serde_json::to_string_pretty(payload).unwrap_or_else(|e| e.to_string());
        self.lines = json.lines().map(str::to_string).collect();
        self.scroll_offset = 0;
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

impl Component for ExportPreviewDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('v') => Some(Action::CloseModal),
            KeyCode::Char('x') => Some(Action::Export),
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                None
            }
            KeyCode::PageDown => {
                self.scroll_offset = self.scroll_offset.saturating_add(10);
                None
            }
            KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(10);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let dialog_area = inset(area, 2);
        frame.render_widget(Clear, dialog_area);

        let visible_height = dialog_area.height.saturating_sub(2) as usize;
        self.scroll_offset = self
            .scroll_offset
            .min(self.lines.len().saturating_sub(visible_height));

        let lines: Vec<Line> = self
            .lines
            .iter()
            .map(|line| {
                let trimmed = line.trim_start();
                let style = if trimmed.starts_with('"') && trimmed.contains("\":") {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default().fg(Color::White)
                };
                Line::from(Span::styled(line.clone(), style))
            })
            .collect();

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Magenta))
                    .title(format!(" {} preview ", EXPORT_KEY))
                    .title_style(
                        Style::default()
                            .fg(Color::Magenta)
                            .add_modifier(Modifier::BOLD),
                    )
                    .title_bottom(Line::from(" x export · Esc close ").right_aligned()),
            )
            .scroll((self.scroll_offset as u16, 0));

        frame.render_widget(paragraph, dialog_area);
        Ok(())
    }
}
