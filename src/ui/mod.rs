//! egui rendering. Reads `AppState`, mutates it only through its methods.

pub mod panels;
pub mod plot;
pub mod report;
