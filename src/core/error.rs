use thiserror::Error;

pub type Result<T> = std::result::Result<T, BitsError>;

#[derive(Debug, Error)]
pub enum BitsError {
    #[error("job name missing")]
    InvalidJobName,
    #[error("unable to parse '{input}' into a job description")]
    JobParse { input: String },
    #[error("unable to parse '{line}' into a file descriptor")]
    FileDescriptorParse { line: String, output: String },
    #[error("unknown job state '{value}'")]
    UnknownState { value: String },
    #[error("unknown job priority '{value}'")]
    UnknownPriority { value: String },
    #[error("{program} binary not found in PATH")]
    BinaryNotFound { program: String },
    #[error("bitsadmin process failed (exit_code={exit_code:?}): {output}")]
    ProcessFailed {
        exit_code: Option<i32>,
        output: String,
    },
    #[error("invalid command: {message}")]
    InvalidCommand { message: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
