//! lux-widget - chart recommendations in the terminal
//!
//! The recommendation widget and its host bindings, usable on their own or
//! through the `lux-widget` binary.
//!
//! - [`widget::RecommendationWidget`] - tabs, galleries, selection and export
//! - [`binding`] - the host model: [`binding::FileBinding`] for documents on
//!   disk, [`binding::MemoryBinding`] for an in-process host
//! - [`app::App`] and [`tui::Tui`] - the terminal shell around the widget

pub mod action;
pub mod app;
pub mod binding;
pub mod component;
pub mod components;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod tui;
pub mod widget;
