pub mod action;
pub mod busy;
pub mod error;
pub mod message;
pub mod path;
pub mod session;

pub use action::*;
pub use busy::*;
pub use error::*;
pub use message::*;
pub use path::*;
pub use session::*;

/// Loosely typed property bag exchanged with the service (create data, action parameters, function results).
pub type Data = serde_json::Map<String, serde_json::Value>;
