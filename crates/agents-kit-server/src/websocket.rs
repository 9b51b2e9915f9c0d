//! WebSocket-based hot reload.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Messages sent to clients for hot reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HmrMessage {
    /// Full page reload
    Reload,

    /// The set of component pages changed
    RoutesChanged {
        /// Slugs now in the catalog
        routes: Vec<String>,
    },

    /// Connection established
    Connected,
}

/// Hub for broadcasting HMR messages to all connected clients.
#[derive(Debug, Clone)]
pub struct HmrHub {
    sender: broadcast::Sender<HmrMessage>,
}

impl HmrHub {
    /// Create a new HMR hub.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }

    /// Send a message to all connected clients.
    pub fn send(&self, msg: HmrMessage) {
        // No receivers is fine
        let _ = self.sender.send(msg);
    }

    /// Subscribe to HMR messages.
    pub fn subscribe(&self) -> broadcast::Receiver<HmrMessage> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for HmrHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate the client-side HMR script.
///
/// `ws_path` is the path of the WebSocket endpoint on the serving host.
pub fn hmr_client_script(ws_path: &str) -> String {
    format!(
        r#"
(function() {{
  'use strict';

  const protocol = location.protocol === 'https:' ? 'wss://' : 'ws://';
  const ws = new WebSocket(protocol + location.host + '{}');
  let reconnectAttempts = 0;
  const maxReconnectAttempts = 10;

  ws.onopen = function() {{
    console.log('[HMR] Connected');
    reconnectAttempts = 0;
  }};

  ws.onmessage = function(event) {{
    const msg = JSON.parse(event.data);
    console.log('[HMR]', msg.type);

    switch (msg.type) {{
      case 'reload':
        location.reload();
        break;

      case 'routes_changed':
        // The sidebar lists every page
        location.reload();
        break;

      case 'connected':
        console.log('[HMR] Server acknowledged connection');
        break;
    }}
  }};

  ws.onclose = function() {{
    console.log('[HMR] Disconnected');
    if (reconnectAttempts < maxReconnectAttempts) {{
      reconnectAttempts++;
      setTimeout(function() {{
        console.log('[HMR] Reconnecting...');
        location.reload();
      }}, 1000 * reconnectAttempts);
    }}
  }};

  ws.onerror = function(e) {{
    console.error('[HMR] WebSocket error:', e);
  }};
}})();
"#,
        ws_path
    )
}
