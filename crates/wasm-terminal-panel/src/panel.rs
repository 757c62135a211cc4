//! Console panel state machine.

use tokio::sync::mpsc;
use tracing::{debug, info};

use wasm_terminal_core::{Error, Result, TerminalConfig};

use crate::drawer::{DragState, DrawerGeometry};
use crate::message::{PanelEvent, PanelMessage};
use crate::session::TerminalSessionId;

/// Default capacity of the panel's message channel.
const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// A console drawer hosting one terminal session.
///
/// The panel starts hidden. The terminal is attached the first time the
/// console is toggled, and stays attached while the panel is hidden and
/// shown again.
#[derive(Debug)]
pub struct ConsolePanel {
    session: TerminalSessionId,
    config: TerminalConfig,
    visible: bool,
    terminal_open: bool,
    api_key_dialog_open: bool,
    drawer: DrawerGeometry,
    drag: DragState,
}

impl ConsolePanel {
    /// Create a hidden panel with the default drawer geometry.
    pub fn new(config: TerminalConfig) -> Self {
        Self::with_drawer(config, DrawerGeometry::default())
    }

    /// Create a hidden panel with a custom drawer geometry.
    pub fn with_drawer(config: TerminalConfig, drawer: DrawerGeometry) -> Self {
        let session = TerminalSessionId::new();
        info!(
            "Creating console panel: session={}, height={}, process_workers={}",
            session,
            drawer.height(),
            config.supports_process_workers()
        );
        Self {
            session,
            config,
            visible: false,
            terminal_open: false,
            api_key_dialog_open: false,
            drawer,
            drag: DragState::default(),
        }
    }

    /// The hosted session.
    pub fn session(&self) -> TerminalSessionId {
        self.session
    }

    /// The terminal configuration owned by this panel.
    pub fn config(&self) -> &TerminalConfig {
        &self.config
    }

    /// Whether the console is shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the terminal has been attached.
    pub fn is_terminal_open(&self) -> bool {
        self.terminal_open
    }

    /// Whether the API key dialog is open.
    pub fn is_api_key_dialog_open(&self) -> bool {
        self.api_key_dialog_open
    }

    /// Current drawer geometry.
    pub fn drawer(&self) -> &DrawerGeometry {
        &self.drawer
    }

    /// Whether a resize drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    /// Apply one message and return the resulting events, in order.
    pub fn handle(&mut self, message: PanelMessage) -> Vec<PanelEvent> {
        debug!("Panel {} handling {:?}", self.session, message);
        let mut events = Vec::new();

        match message {
            PanelMessage::ToggleConsoleVisible => {
                self.visible = !self.visible;
                if !self.visible {
                    self.drag.end();
                }
                events.push(if self.visible {
                    PanelEvent::Shown
                } else {
                    PanelEvent::Hidden
                });
                if !self.terminal_open {
                    self.terminal_open = true;
                    info!("Attaching terminal for session {}", self.session);
                    events.push(PanelEvent::TerminalOpened {
                        session: self.session,
                    });
                }
            }
            PanelMessage::Close => {
                if self.visible {
                    self.visible = false;
                    self.drag.end();
                    events.push(PanelEvent::Hidden);
                }
            }
            PanelMessage::DragStart => {
                if self.visible {
                    self.drag.begin();
                }
            }
            PanelMessage::DragMove {
                viewport_height,
                pointer_y,
            } => {
                if self.drag.is_active() && self.drawer.resize_from_pointer(viewport_height, pointer_y)
                {
                    events.push(PanelEvent::Resized {
                        height: self.drawer.height(),
                    });
                }
            }
            PanelMessage::DragEnd => self.drag.end(),
            PanelMessage::OpenApiKeyDialog => {
                if !self.api_key_dialog_open {
                    self.api_key_dialog_open = true;
                    events.push(PanelEvent::ApiKeyDialog { open: true });
                }
            }
            PanelMessage::CloseApiKeyDialog => {
                if self.api_key_dialog_open {
                    self.api_key_dialog_open = false;
                    events.push(PanelEvent::ApiKeyDialog { open: false });
                }
            }
        }

        events
    }

    /// Create a message channel for a panel loop.
    pub fn channel() -> (PanelSender, mpsc::Receiver<PanelMessage>) {
        Self::channel_with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a message channel with a custom capacity.
    pub fn channel_with_capacity(capacity: usize) -> (PanelSender, mpsc::Receiver<PanelMessage>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (PanelSender { tx }, rx)
    }

    /// Drain messages until every sender is dropped, forwarding events.
    ///
    /// Events are dropped once the event receiver goes away; messages are
    /// still applied. Returns the panel in its final state.
    pub async fn run(
        mut self,
        mut messages: mpsc::Receiver<PanelMessage>,
        events: mpsc::Sender<PanelEvent>,
    ) -> Self {
        info!("Console panel {} listening for messages", self.session);
        while let Some(message) = messages.recv().await {
            for event in self.handle(message) {
                if events.send(event).await.is_err() {
                    debug!("Event receiver dropped, discarding {:?}", event);
                }
            }
        }
        info!("Console panel {} message channel closed", self.session);
        self
    }
}

/// Sending half of a panel's message channel.
#[derive(Debug, Clone)]
pub struct PanelSender {
    tx: mpsc::Sender<PanelMessage>,
}

impl PanelSender {
    /// Send a typed message.
    pub async fn send(&self, message: PanelMessage) -> Result<()> {
        self.tx
            .send(message)
            .await
            .map_err(|_| Error::SessionClosed)
    }

    /// Decode and send a loosely-typed runtime message.
    ///
    /// Returns `Ok(false)` when the message is not addressed to the panel.
    pub async fn send_raw(&self, value: &serde_json::Value) -> Result<bool> {
        match PanelMessage::parse(value) {
            Some(message) => {
                self.send(message).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_terminal_core::{resolver_fn, FetchedCommand, TerminalConfigRecord};

    fn test_panel() -> ConsolePanel {
        let resolver = resolver_fn(|_request| async { Ok(FetchedCommand::Binary(Vec::new())) });
        let config =
            TerminalConfig::new(Some(TerminalConfigRecord::new().command_resolver(resolver)))
                .unwrap();
        ConsolePanel::new(config)
    }

    #[test]
    fn test_panel_starts_hidden() {
        let panel = test_panel();
        assert!(!panel.is_visible());
        assert!(!panel.is_terminal_open());
        assert_eq!(panel.drawer().height(), 500);
    }

    #[test]
    fn test_first_toggle_opens_terminal() {
        let mut panel = test_panel();
        let events = panel.handle(PanelMessage::ToggleConsoleVisible);
        assert_eq!(
            events,
            vec![
                PanelEvent::Shown,
                PanelEvent::TerminalOpened {
                    session: panel.session()
                }
            ]
        );
        assert!(panel.is_visible());
        assert!(panel.is_terminal_open());
    }

    #[test]
    fn test_toggle_twice_hides_without_reopening() {
        let mut panel = test_panel();
        panel.handle(PanelMessage::ToggleConsoleVisible);
        let events = panel.handle(PanelMessage::ToggleConsoleVisible);
        assert_eq!(events, vec![PanelEvent::Hidden]);

        let events = panel.handle(PanelMessage::ToggleConsoleVisible);
        assert_eq!(events, vec![PanelEvent::Shown]);
    }

    #[test]
    fn test_close() {
        let mut panel = test_panel();
        assert!(panel.handle(PanelMessage::Close).is_empty());

        panel.handle(PanelMessage::ToggleConsoleVisible);
        assert_eq!(panel.handle(PanelMessage::Close), vec![PanelEvent::Hidden]);
        assert!(!panel.is_visible());
        assert!(panel.is_terminal_open());
    }

    #[test]
    fn test_drag_resizes_only_while_held() {
        let mut panel = test_panel();
        panel.handle(PanelMessage::ToggleConsoleVisible);
        let drag_move = PanelMessage::DragMove {
            viewport_height: 1000,
            pointer_y: 600,
        };

        assert!(panel.handle(drag_move).is_empty());
        assert_eq!(panel.drawer().height(), 500);

        panel.handle(PanelMessage::DragStart);
        assert!(panel.is_dragging());
        assert_eq!(
            panel.handle(drag_move),
            vec![PanelEvent::Resized { height: 400 }]
        );

        panel.handle(PanelMessage::DragEnd);
        assert!(!panel.is_dragging());
        let events = panel.handle(PanelMessage::DragMove {
            viewport_height: 1000,
            pointer_y: 300,
        });
        assert!(events.is_empty());
        assert_eq!(panel.drawer().height(), 400);
    }

    #[test]
    fn test_drag_out_of_bounds_ignored() {
        let mut panel = test_panel();
        panel.handle(PanelMessage::ToggleConsoleVisible);
        panel.handle(PanelMessage::DragStart);
        let events = panel.handle(PanelMessage::DragMove {
            viewport_height: 1000,
            pointer_y: 990,
        });
        assert!(events.is_empty());
        assert_eq!(panel.drawer().height(), 500);
    }

    #[test]
    fn test_drag_ignored_while_hidden() {
        let mut panel = test_panel();
        panel.handle(PanelMessage::DragStart);
        assert!(!panel.is_dragging());
        let events = panel.handle(PanelMessage::DragMove {
            viewport_height: 1000,
            pointer_y: 600,
        });
        assert!(events.is_empty());
        assert_eq!(panel.drawer().height(), 500);

        panel.handle(PanelMessage::ToggleConsoleVisible);
        panel.handle(PanelMessage::DragStart);
        assert!(panel.is_dragging());
        panel.handle(PanelMessage::Close);
        assert!(!panel.is_dragging());
    }

    #[test]
    fn test_api_key_dialog() {
        let mut panel = test_panel();
        assert_eq!(
            panel.handle(PanelMessage::OpenApiKeyDialog),
            vec![PanelEvent::ApiKeyDialog { open: true }]
        );
        assert!(panel.handle(PanelMessage::OpenApiKeyDialog).is_empty());
        assert!(panel.is_api_key_dialog_open());
        assert_eq!(
            panel.handle(PanelMessage::CloseApiKeyDialog),
            vec![PanelEvent::ApiKeyDialog { open: false }]
        );
    }

    #[tokio::test]
    async fn test_run_loop() {
        let panel = test_panel();
        let session = panel.session();
        let (sender, messages) = ConsolePanel::channel();
        let (events_tx, mut events_rx) = mpsc::channel(16);

        let handle = tokio::spawn(panel.run(messages, events_tx));

        sender.send(PanelMessage::ToggleConsoleVisible).await.unwrap();
        assert_eq!(events_rx.recv().await, Some(PanelEvent::Shown));
        assert_eq!(
            events_rx.recv().await,
            Some(PanelEvent::TerminalOpened { session })
        );

        let accepted = sender
            .send_raw(&serde_json::json!({"type": "usacon.close"}))
            .await
            .unwrap();
        assert!(accepted);
        assert_eq!(events_rx.recv().await, Some(PanelEvent::Hidden));

        let ignored = sender
            .send_raw(&serde_json::json!({"type": "someone.else"}))
            .await
            .unwrap();
        assert!(!ignored);

        drop(sender);
        let panel = handle.await.unwrap();
        assert!(!panel.is_visible());
        assert!(panel.is_terminal_open());
    }

    #[tokio::test]
    async fn test_send_after_loop_stopped() {
        let (sender, messages) = ConsolePanel::channel();
        drop(messages);
        let result = sender.send(PanelMessage::Close).await;
        assert!(matches!(result, Err(Error::SessionClosed)));
    }
}
