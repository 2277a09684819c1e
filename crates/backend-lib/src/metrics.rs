// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const SESSION_CREATED: &str = "session.created";
pub const SESSION_REFRESHED: &str = "session.refreshed";
pub const SESSION_DELETED: &str = "session.deleted";
pub const SESSION_EXPIRED: &str = "session.expired";
pub const SESSION_ACTIVE: &str = "session.active";
pub const SIGNIN_ACCEPTED: &str = "signin.accepted";
pub const SIGNIN_REJECTED: &str = "signin.rejected";
pub const DEVS_SNAPSHOT: &str = "devs.snapshot";
pub const DEVICE_CONNECTED: &str = "device.connected";
pub const DEVICE_ACTIVE: &str = "device.active";
