// ============================
// console-backend/src/broker.rs
// ============================
//! Device registry and the in-process broker behind `/ws` and `/cmd`.
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use console_common::{CommandReply, CommandRequest, DeviceDescriptor};
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use metrics::{counter, gauge};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::metrics::{DEVICE_ACTIVE, DEVICE_CONNECTED};

/// Depth of the per-device command queue
const COMMAND_QUEUE: usize = 32;

/// What the gateway needs from the component that owns device connections.
#[async_trait]
pub trait DeviceRegistry: Send + Sync {
    /// Copy of every connected device, elapsed times computed now.
    /// Entries must never be observed half updated.
    fn snapshot(&self) -> Vec<DeviceDescriptor>;

    /// Take over a `/ws` connection
    async fn serve_ws(&self, ws: WebSocketUpgrade, params: HashMap<String, String>) -> Response;

    /// Relay a `/cmd` request
    async fn serve_cmd(&self, body: Bytes) -> Response;
}

#[derive(Debug, Clone)]
struct DeviceEntry {
    description: String,
    /// Unix seconds of the last frame from the device
    last_seen: i64,
    /// Distinguishes reconnects under the same id
    conn: u64,
    commands: mpsc::Sender<String>,
}

/// Broker keeping one entry per connected device
#[derive(Debug, Clone, Default)]
pub struct DeviceBroker {
    devices: Arc<DashMap<String, DeviceEntry>>,
    next_conn: Arc<AtomicU64>,
}

/// Handle returned by [`DeviceBroker::register`]
#[derive(Debug)]
pub struct DeviceConnection {
    pub id: String,
    pub conn: u64,
    pub commands: mpsc::Receiver<String>,
}

impl DeviceBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a device. A replaced connection stops receiving
    /// commands.
    pub fn register(&self, id: &str, description: &str) -> DeviceConnection {
        let (tx, rx) = mpsc::channel(COMMAND_QUEUE);
        let conn = self.next_conn.fetch_add(1, Ordering::Relaxed);

        let entry = DeviceEntry {
            description: description.to_string(),
            last_seen: chrono::Utc::now().timestamp(),
            conn,
            commands: tx,
        };
        if self.devices.insert(id.to_string(), entry).is_some() {
            info!(devid = %id, "device reconnected, replacing previous connection");
        }

        counter!(DEVICE_CONNECTED).increment(1);
        gauge!(DEVICE_ACTIVE).set(self.devices.len() as f64);

        DeviceConnection {
            id: id.to_string(),
            conn,
            commands: rx,
        }
    }

    /// Record activity from a device connection
    pub fn touch(&self, id: &str, conn: u64) {
        if let Some(mut entry) = self.devices.get_mut(id) {
            if entry.conn == conn {
                entry.last_seen = chrono::Utc::now().timestamp();
            }
        }
    }

    /// Forget a device connection unless it has already been replaced
    pub fn unregister(&self, id: &str, conn: u64) {
        if self
            .devices
            .remove_if(id, |_, entry| entry.conn == conn)
            .is_some()
        {
            gauge!(DEVICE_ACTIVE).set(self.devices.len() as f64);
        }
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Queue a command for a device
    pub fn dispatch(&self, req: &CommandRequest) -> Result<CommandReply, AppError> {
        let Some(entry) = self.devices.get(&req.devid) else {
            return Ok(CommandReply::offline());
        };

        let frame = serde_json::to_string(req)?;
        Ok(match entry.commands.try_send(frame) {
            Ok(()) => CommandReply::queued(),
            Err(mpsc::error::TrySendError::Full(_)) => CommandReply::busy(),
            Err(mpsc::error::TrySendError::Closed(_)) => CommandReply::offline(),
        })
    }

    async fn handle_device(self, socket: WebSocket, mut conn: DeviceConnection) {
        let (mut tx, mut rx) = socket.split();

        loop {
            tokio::select! {
                frame = rx.next() => match frame {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => self.touch(&conn.id, conn.conn),
                    Some(Err(e)) => {
                        debug!(devid = %conn.id, "device socket error: {e}");
                        break;
                    },
                },
                cmd = conn.commands.recv() => match cmd {
                    Some(cmd) => {
                        if tx.send(Message::Text(cmd.into())).await.is_err() {
                            break;
                        }
                    },
                    // replaced by a newer connection
                    None => break,
                },
            }
        }

        self.unregister(&conn.id, conn.conn);
        info!(devid = %conn.id, "device disconnected");
    }
}

#[async_trait]
impl DeviceRegistry for DeviceBroker {
    fn snapshot(&self) -> Vec<DeviceDescriptor> {
        let now = chrono::Utc::now().timestamp();
        self.devices
            .iter()
            .map(|entry| DeviceDescriptor {
                id: entry.key().clone(),
                elapsed: now - entry.last_seen,
                description: entry.description.clone(),
            })
            .collect()
    }

    async fn serve_ws(&self, ws: WebSocketUpgrade, params: HashMap<String, String>) -> Response {
        let Some(devid) = params.get("devid").filter(|id| !id.is_empty()) else {
            warn!("device connection without devid");
            return StatusCode::BAD_REQUEST.into_response();
        };
        let devid = devid.clone();
        let description = params.get("description").cloned().unwrap_or_default();

        let broker = self.clone();
        ws.on_upgrade(move |socket| async move {
            let conn = broker.register(&devid, &description);
            info!(devid = %devid, "device connected");
            broker.handle_device(socket, conn).await;
        })
    }

    async fn serve_cmd(&self, body: Bytes) -> Response {
        let req: CommandRequest = match serde_json::from_slice(&body) {
            Ok(req) => req,
            Err(e) => return AppError::MalformedBody(e.to_string()).into_response(),
        };

        match self.dispatch(&req) {
            Ok(reply) => Json(reply).into_response(),
            Err(e) => e.into_response(),
        }
    }
}
