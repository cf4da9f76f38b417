//! Navigation state for the two panes.
//!
//! [`panel::PaneState`] tracks one pane; [`panel::PaneId`] names it.

pub mod panel;
