//! Messages accepted by the console panel and the events it emits.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::session::TerminalSessionId;

/// A message addressed to the console panel.
///
/// On the wire each message is an object tagged by `type`, e.g.
/// `{"type": "usacon.toggleConsoleVisible"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PanelMessage {
    /// Show the console if hidden, hide it if shown
    #[serde(rename = "usacon.toggleConsoleVisible")]
    ToggleConsoleVisible,

    /// Hide the console
    #[serde(rename = "usacon.close")]
    Close,

    /// Mouse went down on the drag handle
    #[serde(rename = "usacon.dragStart")]
    DragStart,

    /// Pointer moved while the page is tracking a drag
    #[serde(rename = "usacon.dragMove", rename_all = "camelCase")]
    DragMove {
        /// Height of the viewport in pixels
        viewport_height: u32,
        /// Pointer distance from the top of the viewport
        pointer_y: i32,
    },

    /// Mouse was released
    #[serde(rename = "usacon.dragEnd")]
    DragEnd,

    /// Open the API key dialog
    #[serde(rename = "usacon.openApiKeyDialog")]
    OpenApiKeyDialog,

    /// Close the API key dialog
    #[serde(rename = "usacon.closeApiKeyDialog")]
    CloseApiKeyDialog,
}

impl PanelMessage {
    /// Decode a loosely-typed runtime message.
    ///
    /// Returns `None` for anything that is not an object with a known
    /// `type`; such messages belong to someone else and are ignored.
    pub fn parse(value: &serde_json::Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        match serde_json::from_value(value.clone()) {
            Ok(message) => Some(message),
            Err(e) => {
                debug!("Ignoring runtime message: {}", e);
                None
            }
        }
    }
}

/// Something the host has to act on after a message was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PanelEvent {
    /// Console became visible
    Shown,
    /// Console became hidden
    Hidden,
    /// Terminal was attached for the first time
    TerminalOpened {
        /// Session hosted by the panel
        session: TerminalSessionId,
    },
    /// Drawer height changed; the terminal should be refit
    Resized {
        /// New height in pixels
        height: u32,
    },
    /// API key dialog opened or closed
    ApiKeyDialog {
        /// Whether the dialog is now open
        open: bool,
    },
}
