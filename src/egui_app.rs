//! egui front end: controller, UI state, view models and renderers.

pub mod controller;
pub mod state;
pub mod ui;
pub mod view_model;
