// UI module - host-facing command surface
//
// This module contains:
// - EditorController: dispatches host commands and runs the enhancement and generation flows
// - feedback: loading/enhancing guards and error notifications

pub mod controller;
pub mod feedback;

pub use controller::{Command, CommandOutcome, EditorController};
pub use feedback::{LoadingGuard, report_error};
