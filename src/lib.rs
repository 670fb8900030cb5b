//! Locked, persisted store of named cluster contexts.
//!
//! Many CLI processes share one YAML file. Every [`ContextStore`] operation
//! takes an exclusive lock on a sibling lock file, loads fresh state, applies
//! its change and atomically replaces the file before unlocking.

pub mod context;
pub mod logging;

pub use context::{
    ClientConfig, ClusterOptions, ConfigLock, Context, ContextError, ContextResult, ContextStore,
    ContextType, GlobalOptions, Server, StorePaths, Target,
};
