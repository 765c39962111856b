pub mod command;
pub mod error;
pub mod file;
pub mod formatter;
pub mod job;
pub mod manager;
pub mod runner;

#[cfg(test)]
pub(crate) mod testing;

pub use command::BitsCommand;
pub use error::{BitsError, Result};
pub use file::{BytesTotal, FileDescriptor};
pub use job::{
    AuthScheme, CredentialTarget, Credentials, Job, JobAttribute, JobId, JobPriority, JobState,
    ProxySettings,
};
pub use manager::{Manager, NamedJobs};
pub use runner::{BitsConfig, Executor, ProcessExecutor};
