//! chorepay-engine: the task lifecycle and reward-settlement core of the
//! chorepay allowance tracker.
//!
//! The [`store::Store`] owns the whole application state and exposes the
//! transition methods consumed by the (external) UI layer. Persistence is
//! a whole-blob collaborator ([`persist::FileStore`]); photo-proof
//! validation lives in `chorepay-shared` and its verdict is attached to a
//! task before `complete_task` runs.

pub mod config;
pub mod persist;
pub mod store;

pub use chorepay_shared as shared;
pub use config::{AppConfig, ConfigError};
pub use persist::{FileStore, PersistError};
pub use store::{ChildPatch, NewTask, ProofSubmission, Store, StoreError, TaskPatch};
