#![forbid(unsafe_code)]

//! Status-light state: classification of monitor and CI events, mode
//! resolution, authorization and persistence over a key-value store.

pub mod auth;
pub mod classify;
pub mod error;
pub mod mode;
pub mod model;
pub mod repo;
pub mod store;

pub use auth::Gate;
pub use classify::{classify, ErrorClass};
pub use error::{ConfigError, StoreError, StoreResult};
pub use model::{Action, BuildStatus, Color, LightsState, Mode, MonitorEvent};
pub use repo::LightRepository;
pub use store::{KvStore, MemoryStore};
