//! Typed access to Windows BITS transfer jobs through `bitsadmin`.
//!
//! Nothing here holds state of its own. [`Manager`] and [`Job`] turn each call
//! into one `bitsadmin` invocation and parse what comes back, so the transfer
//! service stays the only source of truth.

pub mod cli;
pub mod core;
pub mod repl;
pub mod util;

pub use crate::core::{
    AuthScheme, BitsCommand, BitsConfig, BitsError, BytesTotal, CredentialTarget, Credentials,
    Executor, FileDescriptor, Job, JobAttribute, JobId, JobPriority, JobState, Manager,
    NamedJobs, ProcessExecutor, ProxySettings, Result,
};
