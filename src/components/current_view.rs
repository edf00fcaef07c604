//! Current view panel - the chart the host is showing right now

use crate::action::Action;
use crate::component::Component;
use crate::components::chart_view::ChartView;
use crate::components::selection_toggle::activate;
use crate::model::spec::ChartSpec;
use anyhow::Result;
use crossterm::event::MouseEvent;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Padding},
    Frame,
};

/// What the panel shows; exactly one of the two for any spec
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurrentViewState<'a> {
    Placeholder,
    Chart(&'a ChartSpec),
}

#[derive(Default)]
pub struct CurrentViewPanel {
    spec: Option<ChartSpec>,
    /// Chart area from the last draw
    chart_area: Option<Rect>,
}

impl CurrentViewPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the spec; empty specs become the placeholder
    pub fn set_spec(&mut self, spec: Option<ChartSpec>) {
        self.spec = spec.filter(|s| !s.is_empty());
        self.chart_area = None;
    }

    pub fn spec(&self) -> Option<&ChartSpec> {
        self.spec.as_ref()
    }

    pub fn state(&self) -> CurrentViewState<'_> {
        match &self.spec {
            Some(spec) => CurrentViewState::Chart(spec),
            None => CurrentViewState::Placeholder,
        }
    }
}

impl Component for CurrentViewPanel {
    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        let mut action = None;
        if let Some(area) = self.chart_area {
            activate(area, &mouse, || action = Some(Action::ActivateCurrentView));
        }
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if action == Action::ActivateCurrentView {
            // Reserved for selecting the current view; inert for now
            tracing::debug!("current view activated");
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let chart_area = match self.state() {
            CurrentViewState::Placeholder => {
                frame.render_widget(Block::default(), area);
                None
            }
            CurrentViewState::Chart(spec) => {
                let block = Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Blue))
                    .title(" Current View ")
                    .title_style(
                        Style::default()
                            .fg(Color::Blue)
                            .add_modifier(Modifier::BOLD),
                    );
                let inner = block.inner(area);
                frame.render_widget(block, area);
                frame.render_widget(
                    ChartView::new(spec)
                        .padding(Padding::new(2, 1, 0, 0))
                        .show_actions(true),
                    inner,
                );
                Some(inner)
            }
        };
        self.chart_area = chart_area;
        Ok(())
    }
}
