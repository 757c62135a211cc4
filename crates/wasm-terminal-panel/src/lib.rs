//! # wasm-terminal-panel
//!
//! Console panel hosting a WASM terminal session.
//!
//! This crate provides:
//! - Drawer geometry and drag-to-resize handling
//! - Typed panel messages and the events they produce
//! - The console panel state machine and its message loop
//!
//! ## Architecture
//!
//! This is Layer 1 in the architecture - it depends on wasm-terminal-core
//! for the terminal configuration each panel owns. Rendering is left to the
//! host; the panel only reports what changed.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod drawer;
pub mod message;
pub mod panel;
pub mod session;

// Re-export commonly used types
pub use drawer::{DragState, DrawerGeometry};
pub use message::{PanelEvent, PanelMessage};
pub use panel::{ConsolePanel, PanelSender};
pub use session::TerminalSessionId;
