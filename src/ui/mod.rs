/// Presentation layer: thin adapters from pipeline output to egui widgets.
/// Nothing in here computes aggregates; everything consumes `AppState`.
pub mod charts;
pub mod panels;
pub mod table;
