//! Development server with hot reload for the agents-kit catalog.
//!
//! Resolves component pages on every request and watches the components
//! directory, pushing reloads to the browser over a WebSocket.

pub mod server;
pub mod watcher;
pub mod websocket;

pub use server::{DevServer, DevServerConfig, ServerError};
pub use watcher::{FileWatcher, WatchEvent};
pub use websocket::{HmrHub, HmrMessage};
