//! Recommendation widget - the top-level view over the host model
//!
//! Composes the current view panel and one chart gallery per recommendation
//! group, keeps the per-tab selections, and owns the host boundary:
//!
//! - host → widget: change notifications are merged into local state
//!   (last write wins per key)
//! - widget → host: only an explicit export writes `selectedVisLst`
//!
//! Tab switches and selection changes stay local until export, so the two
//! directions can never feed each other.

use crate::action::Action;
use crate::binding::{
    ChangeNotification, HostBinding, Subscription, CURRENT_VIEW_KEY, RECOMMENDATIONS_KEY,
};
use crate::component::Component;
use crate::components::{
    calculate_widget_layout, ChartGallery, CurrentViewPanel, CurrentViewState, GalleryOptions,
};
use crate::error::{WidgetError, WidgetResult};
use crate::model::export::{ExportPayload, EXPORT_KEY};
use crate::model::selection::ToggleOutcome;
use crate::model::spec::{ChartSpec, RecommendationGroup};
use anyhow::Result;
use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::fmt::Display;
use std::time::{Duration, Instant};

// ═══════════════════════════════════════════════════════════════════════════════
// Options & State Types
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetOptions {
    /// Applied to every tab's gallery
    pub gallery: GalleryOptions,
    /// How long the export notice stays up
    pub notice_duration: Duration,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self {
            gallery: GalleryOptions::default(),
            notice_duration: Duration::from_secs(7),
        }
    }
}

/// Transient confirmation shown after an export
#[derive(Debug, Clone)]
pub struct ExportNotice {
    pub deadline: Instant,
    pub exported_at: DateTime<Local>,
    pub tabs: usize,
    pub charts: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLine {
    Info(String),
    Error(String),
}

// ═══════════════════════════════════════════════════════════════════════════════
// Host Value Decoding
// ═══════════════════════════════════════════════════════════════════════════════

fn decode_current_view(value: Option<Value>) -> Option<ChartSpec> {
    value
        .map(ChartSpec::new)
        .filter(|spec| !spec.is_empty())
}

fn decode_recommendations(value: Option<Value>) -> WidgetResult<Vec<RecommendationGroup>> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value).map_err(|source| WidgetError::Decode {
            key: RECOMMENDATIONS_KEY,
            source,
        }),
    }
}

/// Tab keys must be unique; later duplicates are dropped
fn dedupe_groups(groups: Vec<RecommendationGroup>) -> Vec<RecommendationGroup> {
    let mut seen = HashSet::new();
    groups
        .into_iter()
        .filter(|group| {
            let fresh = seen.insert(group.action.clone());
            if !fresh {
                tracing::warn!(action = %group.action, "dropping duplicate recommendation tab");
            }
            fresh
        })
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Widget
// ═══════════════════════════════════════════════════════════════════════════════

pub struct RecommendationWidget {
    binding: Box<dyn HostBinding>,
    /// Present between mount and unmount
    subscription: Option<Subscription>,
    options: WidgetOptions,

    current_view: CurrentViewPanel,
    recommendations: Vec<RecommendationGroup>,
    active_tab: Option<String>,
    galleries: Vec<ChartGallery>,

    /// Tab index -> selected chart indices, in selection order
    selection_by_tab: BTreeMap<usize, Vec<usize>>,
    export_payload: ExportPayload,
    last_exported: Option<ExportPayload>,

    notice: Option<ExportNotice>,
    status: Option<StatusLine>,
}

impl RecommendationWidget {
    pub fn new(binding: Box<dyn HostBinding>, options: WidgetOptions) -> Self {
        Self {
            binding,
            subscription: None,
            options,
            current_view: CurrentViewPanel::new(),
            recommendations: Vec::new(),
            active_tab: None,
            galleries: Vec::new(),
            selection_by_tab: BTreeMap::new(),
            export_payload: ExportPayload::default(),
            last_exported: None,
            notice: None,
            status: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Read the initial host state and subscribe to host changes
    pub fn mount(&mut self) -> WidgetResult<()> {
        if self.subscription.is_some() {
            return Err(WidgetError::AlreadyMounted);
        }

        let current_view = decode_current_view(self.binding.get(CURRENT_VIEW_KEY)?);
        let recommendations = decode_recommendations(self.binding.get(RECOMMENDATIONS_KEY)?)?;
        self.current_view.set_spec(current_view);
        self.set_recommendations(recommendations);

        self.subscription = Some(self.binding.subscribe()?);
        tracing::info!(
            host = %self.binding.describe(),
            tabs = self.recommendations.len(),
            "widget mounted"
        );
        Ok(())
    }

    /// Release the host subscription; later calls do nothing
    pub fn unmount(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            drop(subscription);
            tracing::info!("widget unmounted");
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Host → Widget
    // ─────────────────────────────────────────────────────────────────────────

    /// Poll the host and apply every pending notification
    ///
    /// Returns how many notifications were applied. A malformed notification
    /// does not stop the others; the first error is returned afterwards.
    pub fn sync_from_host(&mut self) -> WidgetResult<usize> {
        if self.subscription.is_none() {
            return Ok(0);
        }
        self.binding.poll()?;

        let notifications = self
            .subscription
            .as_ref()
            .map(Subscription::drain)
            .unwrap_or_default();

        let mut first_error = None;
        for notification in &notifications {
            if let Err(err) = self.apply_host_change(notification) {
                first_error.get_or_insert(err);
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(notifications.len()),
        }
    }

    /// Merge one host notification into local state
    pub fn apply_host_change(&mut self, notification: &ChangeNotification) -> WidgetResult<()> {
        if let Some(value) = notification.get(CURRENT_VIEW_KEY) {
            self.current_view
                .set_spec(decode_current_view(Some(value.clone())));
        }

        if let Some(value) = notification.get(RECOMMENDATIONS_KEY) {
            let groups = decode_recommendations(Some(value.clone()))?;
            self.set_recommendations(groups);
        }

        tracing::debug!(
            keys = ?notification.keys().collect::<Vec<_>>(),
            "applied host change"
        );
        Ok(())
    }

    /// Replace the groups; selections against the old list are discarded
    fn set_recommendations(&mut self, groups: Vec<RecommendationGroup>) {
        let groups = dedupe_groups(groups);

        self.galleries = groups
            .iter()
            .map(|group| {
                ChartGallery::new(group.action.clone(), group.vspec.clone(), self.options.gallery)
            })
            .collect();
        self.selection_by_tab.clear();
        self.export_payload = ExportPayload::default();

        self.active_tab = match self.active_tab.take() {
            Some(key) if groups.iter().any(|g| g.action == key) => Some(key),
            previous => {
                let fallback = groups.first().map(|g| g.action.clone());
                if previous.is_some() {
                    tracing::info!(?previous, ?fallback, "active tab no longer offered");
                }
                fallback
            }
        };
        self.recommendations = groups;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tabs
    // ─────────────────────────────────────────────────────────────────────────

    pub fn select_tab(&mut self, key: &str) -> WidgetResult<()> {
        if !self.recommendations.iter().any(|g| g.action == key) {
            return Err(WidgetError::UnknownTab(key.to_string()));
        }
        self.active_tab = Some(key.to_string());
        Ok(())
    }

    pub fn next_tab(&mut self) {
        self.step_tab(1);
    }

    pub fn prev_tab(&mut self) {
        self.step_tab(self.recommendations.len().saturating_sub(1));
    }

    fn step_tab(&mut self, step: usize) {
        let len = self.recommendations.len();
        if len == 0 {
            return;
        }
        let current = self.active_tab_index().unwrap_or(0);
        let next = (current + step) % len;
        self.active_tab = Some(self.recommendations[next].action.clone());
    }

    pub fn active_tab(&self) -> Option<&str> {
        self.active_tab.as_deref()
    }

    pub fn active_tab_index(&self) -> Option<usize> {
        let key = self.active_tab.as_deref()?;
        self.recommendations.iter().position(|g| g.action == key)
    }

    fn active_gallery_mut(&mut self) -> Option<&mut ChartGallery> {
        let index = self.active_tab_index()?;
        self.galleries.get_mut(index)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────────────────

    /// Toggle one chart of one tab through that tab's gallery
    pub fn toggle_card(&mut self, tab_index: usize, card_index: usize) -> WidgetResult<ToggleOutcome> {
        let out_of_range = WidgetError::CardOutOfRange {
            tab: tab_index,
            index: card_index,
        };
        let gallery = match self.galleries.get_mut(tab_index) {
            Some(gallery) if card_index < gallery.len() => gallery,
            _ => return Err(out_of_range),
        };

        let mut changed = None;
        let outcome = gallery.toggle(card_index, |selection| changed = Some(selection.indices()));

        if let Some(indices) = changed {
            self.on_gallery_changed(tab_index, indices);
        }
        if let ToggleOutcome::Rejected { capacity } = outcome {
            tracing::info!(tab_index, card_index, capacity, "selection limit reached");
        }
        Ok(outcome)
    }

    /// Record a tab's new selection and rebuild the export payload
    pub fn on_gallery_changed(&mut self, tab_index: usize, selected: Vec<usize>) {
        self.selection_by_tab.insert(tab_index, selected);
        self.export_payload = ExportPayload::build(&self.recommendations, &self.selection_by_tab);
    }

    pub fn clear_tab_selection(&mut self, tab_index: usize) -> WidgetResult<()> {
        let gallery = self.galleries.get_mut(tab_index).ok_or(WidgetError::CardOutOfRange {
            tab: tab_index,
            index: 0,
        })?;

        let mut cleared = false;
        gallery.clear(|_| cleared = true);
        if cleared {
            self.on_gallery_changed(tab_index, Vec::new());
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Widget → Host
    // ─────────────────────────────────────────────────────────────────────────

    pub fn export_selection(&mut self) -> WidgetResult<()> {
        self.export_selection_at(Instant::now())
    }

    /// Write the payload to the host, commit it, and (re)start the notice
    ///
    /// A pending notice is replaced, so the countdown always runs from the
    /// latest export. Nothing is shown when the host rejects the write.
    pub fn export_selection_at(&mut self, now: Instant) -> WidgetResult<()> {
        self.binding.set(EXPORT_KEY, self.export_payload.to_value())?;
        self.binding.save()?;

        let restarted = self.notice.is_some();
        self.notice = Some(ExportNotice {
            deadline: now + self.options.notice_duration,
            exported_at: Local::now(),
            tabs: self.export_payload.len(),
            charts: self.export_payload.chart_count(),
        });
        self.last_exported = Some(self.export_payload.clone());

        tracing::info!(
            tabs = self.export_payload.len(),
            charts = self.export_payload.chart_count(),
            restarted,
            "exported selection"
        );
        Ok(())
    }

    /// Expire the export notice once its deadline has passed
    pub fn tick(&mut self, now: Instant) {
        if self.notice.as_ref().is_some_and(|n| now >= n.deadline) {
            self.notice = None;
            tracing::debug!("export notice expired");
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn current_view(&self) -> CurrentViewState<'_> {
        self.current_view.state()
    }

    pub fn recommendations(&self) -> &[RecommendationGroup] {
        &self.recommendations
    }

    pub fn gallery(&self, tab_index: usize) -> Option<&ChartGallery> {
        self.galleries.get(tab_index)
    }

    pub fn selection_by_tab(&self) -> &BTreeMap<usize, Vec<usize>> {
        &self.selection_by_tab
    }

    pub fn export_payload(&self) -> &ExportPayload {
        &self.export_payload
    }

    pub fn show_export_notice(&self) -> bool {
        self.notice.is_some()
    }

    pub fn status(&self) -> Option<&StatusLine> {
        self.status.as_ref()
    }

    /// Whether the payload differs from what the host last received
    pub fn has_unexported_changes(&self) -> bool {
        match &self.last_exported {
            Some(exported) => *exported != self.export_payload,
            None => !self.export_payload.is_empty(),
        }
    }

    pub fn report_error(&mut self, err: impl Display) {
        tracing::warn!(error = %err, "widget error");
        self.status = Some(StatusLine::Error(err.to_string()));
    }

    fn toggle_and_report(&mut self, tab_index: usize, card_index: usize) {
        match self.toggle_card(tab_index, card_index) {
            Ok(ToggleOutcome::Rejected { capacity }) => {
                self.status = Some(StatusLine::Info(format!(
                    "Selection limit reached: at most {} charts per tab",
                    capacity
                )));
            }
            Ok(_) => self.status = None,
            Err(err) => self.report_error(err),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for RecommendationWidget {
    fn init(&mut self) -> Result<()> {
        self.mount()?;
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Tab => Some(Action::NextTab),
            KeyCode::BackTab => Some(Action::PrevTab),
            KeyCode::Char(c @ '1'..='9') => {
                let index = (c as u32 - '1' as u32) as usize;
                self.recommendations
                    .get(index)
                    .map(|group| Action::SelectTab(group.action.clone()))
            }
            KeyCode::Char('x') if !self.recommendations.is_empty() => Some(Action::Export),
            KeyCode::Esc if self.notice.is_some() => Some(Action::DismissNotice),
            _ => match self.active_gallery_mut() {
                Some(gallery) => gallery.handle_key_event(key)?,
                None => None,
            },
        };
        Ok(action)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if let Some(action) = self.current_view.handle_mouse_event(mouse)? {
            return Ok(Some(action));
        }
        match self.active_gallery_mut() {
            Some(gallery) => gallery.handle_mouse_event(mouse),
            None => Ok(None),
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::Tick => {
                if let Err(err) = self.sync_from_host() {
                    self.report_error(err);
                }
                self.tick(Instant::now());
            }
            Action::NextTab => self.next_tab(),
            Action::PrevTab => self.prev_tab(),
            Action::SelectTab(key) => {
                if let Err(err) = self.select_tab(&key) {
                    self.report_error(err);
                }
            }
            Action::FocusLeft
            | Action::FocusRight
            | Action::FocusUp
            | Action::FocusDown
            | Action::FirstCard
            | Action::LastCard => {
                if let Some(gallery) = self.active_gallery_mut() {
                    gallery.update(action)?;
                }
            }
            Action::ToggleFocused => {
                if let Some(tab_index) = self.active_tab_index() {
                    let gallery = &self.galleries[tab_index];
                    if !gallery.is_empty() {
                        let cursor = gallery.cursor();
                        self.toggle_and_report(tab_index, cursor);
                    }
                }
            }
            Action::ToggleCard(card_index) => {
                if let Some(tab_index) = self.active_tab_index() {
                    self.toggle_and_report(tab_index, card_index);
                }
            }
            Action::ClearTabSelection => {
                if let Some(tab_index) = self.active_tab_index() {
                    if let Err(err) = self.clear_tab_selection(tab_index) {
                        self.report_error(err);
                    }
                }
            }
            // Export exists only while the host offers at least one tab
            Action::Export if self.recommendations.is_empty() => {
                tracing::debug!("export ignored without recommendation tabs");
            }
            Action::Export => match self.export_selection() {
                Ok(()) => self.status = None,
                Err(err) => self.report_error(err),
            },
            Action::DismissNotice => self.dismiss_notice(),
            Action::ActivateCurrentView => {
                self.current_view.update(action)?;
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let layout = calculate_widget_layout(
            area,
            self.current_view.spec().is_some(),
            self.notice.is_some(),
        );

        self.current_view.draw(frame, layout.current_view)?;
        render_tabs(frame, layout.tabs, self);

        match self.active_tab_index() {
            Some(index) => self.galleries[index].draw(frame, layout.gallery)?,
            None => {
                let waiting = Paragraph::new(Line::from(Span::styled(
                    "No recommendations from the host yet",
                    Style::default().fg(Color::DarkGray),
                )))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
                frame.render_widget(waiting, layout.gallery);
            }
        }

        if let (Some(notice_area), Some(notice)) = (layout.notice, self.notice.as_ref()) {
            render_notice(frame, notice_area, notice);
        }
        render_status_bar(frame, layout.status, self);
        render_help_bar(frame, layout.help, !self.recommendations.is_empty());
        Ok(())
    }

    fn teardown(&mut self) {
        self.unmount();
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rendering Functions
// ═══════════════════════════════════════════════════════════════════════════════

fn render_tabs(frame: &mut Frame, area: Rect, widget: &RecommendationWidget) {
    let titles: Vec<Line> = widget
        .recommendations
        .iter()
        .enumerate()
        .map(|(index, group)| {
            let count = widget.selection_by_tab.get(&index).map_or(0, Vec::len);
            if count > 0 {
                Line::from(vec![
                    Span::raw(group.action.clone()),
                    Span::styled(format!(" ●{}", count), Style::default().fg(Color::Green)),
                ])
            } else {
                Line::from(group.action.clone())
            }
        })
        .collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::BOTTOM))
        .select(widget.active_tab_index().unwrap_or(0))
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

fn render_notice(frame: &mut Frame, area: Rect, notice: &ExportNotice) {
    let text = Line::from(vec![
        Span::styled(
            format!(
                "Exported {} visualizations from {} tabs to `{}` at {}",
                notice.charts,
                notice.tabs,
                EXPORT_KEY,
                notice.exported_at.format("%H:%M:%S")
            ),
            Style::default().fg(Color::White),
        ),
        Span::styled("  Esc dismiss", Style::default().fg(Color::DarkGray)),
    ]);

    let paragraph = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Export ")
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, widget: &RecommendationWidget) {
    let spans = match widget.status() {
        Some(StatusLine::Error(message)) => vec![Span::styled(
            format!(" Error: {} ", message),
            Style::default().fg(Color::Red),
        )],
        Some(StatusLine::Info(message)) => vec![Span::styled(
            format!(" {} ", message),
            Style::default().fg(Color::Yellow),
        )],
        None => {
            let mut spans = vec![Span::styled(
                format!(" {} ", widget.binding.describe()),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )];
            let selected = widget.export_payload.chart_count();
            spans.push(Span::styled(
                format!(" {} selected", selected),
                Style::default().fg(Color::Green),
            ));
            if widget.has_unexported_changes() {
                spans.push(Span::styled(
                    " (not exported)",
                    Style::default().fg(Color::DarkGray),
                ));
            }
            spans
        }
    };

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_help_bar(frame: &mut Frame, area: Rect, has_tabs: bool) {
    let key = |k: &'static str, color: Color| {
        Span::styled(k, Style::default().fg(color).add_modifier(Modifier::BOLD))
    };

    let mut spans = vec![
        key(" q ", Color::Yellow),
        Span::raw("Quit "),
        key(" Tab ", Color::Cyan),
        Span::raw("Next tab "),
        key(" Space ", Color::Green),
        Span::raw("Select "),
    ];
    if has_tabs {
        spans.push(key(" x ", Color::Magenta));
        spans.push(Span::raw("Export "));
    }
    spans.push(key(" v ", Color::Cyan));
    spans.push(Span::raw("Preview "));
    spans.push(key(" ? ", Color::White));
    spans.push(Span::raw("Help"));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::MemoryBinding;
    use crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};
    use serde_json::json;

    fn specs(prefix: &str, n: usize) -> Value {
        Value::Array(
            (0..n)
                .map(|i| json!({"mark": "bar", "title": format!("{} {}", prefix, i)}))
                .collect(),
        )
    }

    fn host() -> MemoryBinding {
        let host = MemoryBinding::new();
        host.host_update(CURRENT_VIEW_KEY, json!({"mark": "point", "title": "Current"}));
        host.host_update(
            RECOMMENDATIONS_KEY,
            json!([
                {"action": "Correlation", "description": "Pairs", "vspec": specs("corr", 5)},
                {"action": "Distribution", "vspec": specs("dist", 5)},
            ]),
        );
        host
    }

    fn mounted(host: &MemoryBinding, options: WidgetOptions) -> RecommendationWidget {
        let mut widget = RecommendationWidget::new(Box::new(host.clone()), options);
        widget.mount().unwrap();
        widget
    }

    fn spec_at(widget: &RecommendationWidget, tab: usize, index: usize) -> ChartSpec {
        widget.recommendations()[tab].vspec[index].clone()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_mount_reads_host_and_subscribes() {
        let host = host();
        let widget = mounted(&host, WidgetOptions::default());

        assert!(widget.is_mounted());
        assert_eq!(host.subscriber_count(), 1);
        assert_eq!(widget.recommendations().len(), 2);
        assert_eq!(widget.active_tab(), Some("Correlation"));
        assert!(matches!(widget.current_view(), CurrentViewState::Chart(_)));
    }

    #[test]
    fn test_mount_twice_is_rejected() {
        let host = host();
        let mut widget = mounted(&host, WidgetOptions::default());
        assert!(matches!(widget.mount(), Err(WidgetError::AlreadyMounted)));
        assert_eq!(host.subscriber_count(), 1);
    }

    #[test]
    fn test_unmount_releases_subscription_once() {
        let host = host();
        let mut widget = mounted(&host, WidgetOptions::default());

        widget.unmount();
        assert_eq!(host.subscriber_count(), 0);
        widget.unmount();
        assert!(!widget.is_mounted());

        // Host changes after teardown are not seen
        host.host_update(RECOMMENDATIONS_KEY, json!([]));
        assert_eq!(widget.sync_from_host().unwrap(), 0);
        assert_eq!(widget.recommendations().len(), 2);
    }

    #[test]
    fn test_dropping_widget_releases_subscription() {
        let host = host();
        let widget = mounted(&host, WidgetOptions::default());
        drop(widget);
        assert_eq!(host.subscriber_count(), 0);
    }

    #[test]
    fn test_empty_host_mounts_without_tabs() {
        let host = MemoryBinding::new();
        let widget = mounted(&host, WidgetOptions::default());
        assert_eq!(widget.active_tab(), None);
        assert_eq!(widget.current_view(), CurrentViewState::Placeholder);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Selection & Payload
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_payload_follows_selection_order() {
        let host = host();
        let mut widget = mounted(&host, WidgetOptions::default());

        widget.toggle_card(1, 3).unwrap();
        widget.toggle_card(1, 1).unwrap();

        let entry = widget.export_payload().get("Distribution").unwrap();
        assert_eq!(entry.vspec, vec![spec_at(&widget, 1, 3), spec_at(&widget, 1, 1)]);
        assert!(widget.export_payload().get("Correlation").is_none());
    }

    #[test]
    fn test_payload_carries_group_fields() {
        let host = host();
        let mut widget = mounted(&host, WidgetOptions::default());
        widget.toggle_card(0, 0).unwrap();

        let entry = widget.export_payload().get("Correlation").unwrap();
        assert_eq!(entry.extra.get("description"), Some(&json!("Pairs")));
    }

    #[test]
    fn test_toggle_rejected_at_capacity() {
        let host = host();
        let options = WidgetOptions {
            gallery: GalleryOptions {
                multiple: true,
                max_selectable: 2,
            },
            ..WidgetOptions::default()
        };
        let mut widget = mounted(&host, options);

        assert_eq!(widget.toggle_card(0, 0).unwrap(), ToggleOutcome::Inserted);
        assert_eq!(widget.toggle_card(0, 1).unwrap(), ToggleOutcome::Inserted);
        assert_eq!(
            widget.toggle_card(0, 2).unwrap(),
            ToggleOutcome::Rejected { capacity: 2 }
        );
        assert_eq!(widget.selection_by_tab().get(&0), Some(&vec![0, 1]));
    }

    #[test]
    fn test_rejected_toggle_reports_status() {
        let host = host();
        let options = WidgetOptions {
            gallery: GalleryOptions {
                multiple: true,
                max_selectable: 1,
            },
            ..WidgetOptions::default()
        };
        let mut widget = mounted(&host, options);

        widget.update(Action::ToggleCard(0)).unwrap();
        widget.update(Action::ToggleCard(1)).unwrap();
        assert!(matches!(widget.status(), Some(StatusLine::Info(m)) if m.contains("at most 1")));
    }

    #[test]
    fn test_toggle_out_of_range_is_an_error() {
        let host = host();
        let mut widget = mounted(&host, WidgetOptions::default());
        assert!(matches!(
            widget.toggle_card(0, 99),
            Err(WidgetError::CardOutOfRange { tab: 0, index: 99 })
        ));
        assert!(matches!(
            widget.toggle_card(7, 0),
            Err(WidgetError::CardOutOfRange { tab: 7, .. })
        ));
    }

    #[test]
    fn test_clear_tab_selection_empties_payload() {
        let host = host();
        let mut widget = mounted(&host, WidgetOptions::default());
        widget.toggle_card(0, 2).unwrap();
        assert_eq!(widget.export_payload().chart_count(), 1);

        widget.clear_tab_selection(0).unwrap();
        assert!(widget.export_payload().is_empty());
        assert!(widget.gallery(0).unwrap().selection().is_empty());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tabs
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_tab_switch_stays_local() {
        let host = host();
        let mut widget = mounted(&host, WidgetOptions::default());

        widget.select_tab("Distribution").unwrap();
        widget.toggle_card(1, 0).unwrap();

        assert_eq!(widget.active_tab(), Some("Distribution"));
        assert_eq!(host.save_count(), 0);
        assert_eq!(host.committed(EXPORT_KEY), None);
    }

    #[test]
    fn test_unknown_tab_is_rejected() {
        let host = host();
        let mut widget = mounted(&host, WidgetOptions::default());
        assert!(matches!(
            widget.select_tab("Enhance"),
            Err(WidgetError::UnknownTab(_))
        ));
        assert_eq!(widget.active_tab(), Some("Correlation"));
    }

    #[test]
    fn test_tab_cycling_wraps() {
        let host = host();
        let mut widget = mounted(&host, WidgetOptions::default());
        widget.next_tab();
        assert_eq!(widget.active_tab(), Some("Distribution"));
        widget.next_tab();
        assert_eq!(widget.active_tab(), Some("Correlation"));
        widget.prev_tab();
        assert_eq!(widget.active_tab(), Some("Distribution"));
    }

    #[test]
    fn test_digit_key_selects_tab() {
        let host = host();
        let mut widget = mounted(&host, WidgetOptions::default());
        let two = KeyEvent::new(KeyCode::Char('2'), KeyModifiers::NONE);
        let nine = KeyEvent::new(KeyCode::Char('9'), KeyModifiers::NONE);

        assert_eq!(
            widget.handle_key_event(two).unwrap(),
            Some(Action::SelectTab("Distribution".to_string()))
        );
        assert_eq!(widget.handle_key_event(nine).unwrap(), None);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Host Changes
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_vanished_active_tab_falls_back_to_first() {
        let host = host();
        let mut widget = mounted(&host, WidgetOptions::default());
        widget.select_tab("Distribution").unwrap();
        widget.toggle_card(1, 0).unwrap();

        host.host_update(
            RECOMMENDATIONS_KEY,
            json!([
                {"action": "Enhance", "vspec": specs("enh", 2)},
                {"action": "Filter", "vspec": specs("flt", 2)},
            ]),
        );
        assert_eq!(widget.sync_from_host().unwrap(), 1);

        assert_eq!(widget.active_tab(), Some("Enhance"));
        assert!(widget.selection_by_tab().is_empty());
        assert!(widget.export_payload().is_empty());
    }

    #[test]
    fn test_empty_recommendations_clear_active_tab() {
        let host = host();
        let mut widget = mounted(&host, WidgetOptions::default());

        host.host_update(RECOMMENDATIONS_KEY, json!([]));
        widget.sync_from_host().unwrap();

        assert_eq!(widget.active_tab(), None);
        assert_eq!(widget.active_tab_index(), None);
        // Drawing with no tabs must not panic
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|frame| {
                widget.draw(frame, frame.area()).unwrap();
            })
            .unwrap();
    }

    #[test]
    fn test_surviving_active_tab_is_kept() {
        let host = host();
        let mut widget = mounted(&host, WidgetOptions::default());
        widget.select_tab("Distribution").unwrap();

        host.host_update(
            RECOMMENDATIONS_KEY,
            json!([
                {"action": "Enhance", "vspec": []},
                {"action": "Distribution", "vspec": specs("dist", 1)},
            ]),
        );
        widget.sync_from_host().unwrap();
        assert_eq!(widget.active_tab(), Some("Distribution"));
        assert_eq!(widget.active_tab_index(), Some(1));
    }

    #[test]
    fn test_current_view_follows_host() {
        let host = host();
        let mut widget = mounted(&host, WidgetOptions::default());

        host.host_update(CURRENT_VIEW_KEY, json!({}));
        widget.sync_from_host().unwrap();
        assert_eq!(widget.current_view(), CurrentViewState::Placeholder);

        host.host_update(CURRENT_VIEW_KEY, json!({"mark": "line"}));
        widget.sync_from_host().unwrap();
        assert!(matches!(widget.current_view(), CurrentViewState::Chart(spec) if spec.mark() == Some("line")));
    }

    #[test]
    fn test_malformed_recommendations_are_reported() {
        let host = host();
        let mut widget = mounted(&host, WidgetOptions::default());

        host.host_update(RECOMMENDATIONS_KEY, json!("not a list"));
        host.host_update(CURRENT_VIEW_KEY, json!({"mark": "area"}));

        let err = widget.sync_from_host().unwrap_err();
        assert!(matches!(err, WidgetError::Decode { key: RECOMMENDATIONS_KEY, .. }));
        assert_eq!(widget.recommendations().len(), 2);
        // The well-formed notification after the bad one still applied
        assert!(matches!(widget.current_view(), CurrentViewState::Chart(spec) if spec.mark() == Some("area")));
    }

    #[test]
    fn test_duplicate_tab_keys_are_dropped() {
        let host = MemoryBinding::new();
        host.host_update(
            RECOMMENDATIONS_KEY,
            json!([
                {"action": "Enhance", "vspec": specs("a", 1)},
                {"action": "Enhance", "vspec": specs("b", 3)},
            ]),
        );
        let widget = mounted(&host, WidgetOptions::default());
        assert_eq!(widget.recommendations().len(), 1);
        assert_eq!(widget.gallery(0).unwrap().len(), 1);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Export
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_export_writes_and_commits_payload() {
        let host = host();
        let mut widget = mounted(&host, WidgetOptions::default());
        widget.toggle_card(0, 4).unwrap();

        widget.export_selection_at(Instant::now()).unwrap();

        assert_eq!(host.save_count(), 1);
        assert_eq!(host.committed(EXPORT_KEY), Some(widget.export_payload().to_value()));
        assert!(!widget.has_unexported_changes());
        // Our own write is not delivered back as a host change
        assert_eq!(widget.sync_from_host().unwrap(), 0);
    }

    #[test]
    fn test_notice_hides_after_duration() {
        let host = host();
        let mut widget = mounted(&host, WidgetOptions::default());
        let t0 = Instant::now();

        widget.export_selection_at(t0).unwrap();
        assert!(widget.show_export_notice());

        widget.tick(t0 + Duration::from_secs(6));
        assert!(widget.show_export_notice());

        widget.tick(t0 + Duration::from_secs(7));
        assert!(!widget.show_export_notice());
    }

    #[test]
    fn test_repeated_export_restarts_countdown() {
        let host = host();
        let mut widget = mounted(&host, WidgetOptions::default());
        let t0 = Instant::now();

        widget.export_selection_at(t0).unwrap();
        widget.export_selection_at(t0 + Duration::from_secs(5)).unwrap();

        widget.tick(t0 + Duration::from_secs(8));
        assert!(widget.show_export_notice());

        widget.tick(t0 + Duration::from_secs(12));
        assert!(!widget.show_export_notice());
        assert_eq!(host.save_count(), 2);
    }

    #[test]
    fn test_failed_export_shows_no_notice() {
        let host = host();
        let mut widget = mounted(&host, WidgetOptions::default());
        widget.toggle_card(0, 0).unwrap();
        host.fail_next_save("comm closed");

        let err = widget.export_selection_at(Instant::now()).unwrap_err();
        assert!(matches!(err, WidgetError::Binding(_)));
        assert!(!widget.show_export_notice());
        assert!(widget.has_unexported_changes());
    }

    #[test]
    fn test_export_action_needs_a_tab() {
        let host = MemoryBinding::new();
        let mut widget = mounted(&host, WidgetOptions::default());

        widget.update(Action::Export).unwrap();
        assert_eq!(host.save_count(), 0);
        assert_eq!(host.committed(EXPORT_KEY), None);
        assert!(!widget.show_export_notice());
    }

    #[test]
    fn test_export_action_failure_goes_to_status() {
        let host = host();
        let mut widget = mounted(&host, WidgetOptions::default());
        host.fail_next_save("comm closed");

        widget.update(Action::Export).unwrap();
        assert!(matches!(widget.status(), Some(StatusLine::Error(m)) if m.contains("comm closed")));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_draw_shows_panels_and_notice() {
        let host = host();
        let mut widget = mounted(&host, WidgetOptions::default());
        widget.toggle_card(0, 1).unwrap();
        widget.export_selection_at(Instant::now()).unwrap();

        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal
            .draw(|frame| {
                widget.draw(frame, frame.area()).unwrap();
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Current View"));
        assert!(text.contains("Correlation"));
        assert!(text.contains("Distribution"));
        assert!(text.contains("Exported 1 visualizations"));
        assert!(text.contains("Export"));
    }
}
