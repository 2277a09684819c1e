// ================
// common/src/lib.rs
// ================
//! Wire types shared between the console front end, the gateway and the
//! device broker.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Body of a `/signin` request.
///
/// Missing fields decode as empty strings, so `{}` is a well-formed (and
/// almost certainly rejected) sign-in attempt rather than a malformed body.
#[derive(Deserialize, Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    /// Account name
    #[serde(default)]
    pub username: String,
    /// Plain-text password, wiped on drop
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Read-only view of a connected device, as listed by `/devs`.
///
/// Field names follow the front end's existing contract.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    /// Device identifier
    pub id: String,
    /// Seconds elapsed since the device was last seen
    #[serde(rename = "uptime")]
    pub elapsed: i64,
    /// Free-form description reported by the device
    pub description: String,
}

/// Body of a `/cmd` request relayed to a device.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CommandRequest {
    /// Target device
    pub devid: String,
    /// Command to run on the device
    pub cmd: String,
    /// Command arguments
    #[serde(default)]
    pub params: Vec<String>,
}

/// Status returned by the command relay.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CommandReply {
    /// Zero on success
    pub err: u8,
    /// Human-readable status
    pub msg: String,
}

impl CommandReply {
    pub const QUEUED: u8 = 0;
    pub const OFFLINE: u8 = 1;
    pub const BUSY: u8 = 2;

    pub fn queued() -> Self {
        Self { err: Self::QUEUED, msg: "queued".to_string() }
    }

    pub fn offline() -> Self {
        Self { err: Self::OFFLINE, msg: "device offline".to_string() }
    }

    pub fn busy() -> Self {
        Self { err: Self::BUSY, msg: "device busy".to_string() }
    }
}
