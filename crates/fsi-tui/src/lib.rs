// Library root for the interactive front end: the app orchestrator, the
// messages it exchanges with the TUI, and the TUI itself.

pub mod app;
pub mod protocol;
pub mod tui;
