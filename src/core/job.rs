use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::core::command::BitsCommand;
use crate::core::error::{BitsError, Result};
use crate::core::file::{parse_file_listing, FileDescriptor};
use crate::core::runner::Executor;

static RE_JOB_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Z0-9]{8}-[A-Z0-9]{4}-[A-Z0-9]{4}-[A-Z0-9]{4}-[A-Z0-9]{12})").unwrap()
});

/// Canonical job identifier, `XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(String);

impl JobId {
    /// Extracts the first identifier found anywhere in `text`.
    pub fn parse(text: &str) -> Result<Self> {
        RE_JOB_ID
            .captures(text)
            .and_then(|cap| cap.get(1))
            .map(|m| JobId(m.as_str().to_string()))
            .ok_or_else(|| BitsError::JobParse {
                input: text.to_string(),
            })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for JobId {
    type Err = BitsError;

    fn from_str(s: &str) -> Result<Self> {
        JobId::parse(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    /// Waiting to run; also where a transferring job goes when its owner logs off.
    Queued,
    Connecting,
    Transferring,
    /// Initial state of every new job.
    Suspended,
    /// Non-recoverable until resumed after the cause is fixed.
    Error,
    /// Recoverable; the service retries after the minimum retry delay.
    TransientError,
    /// Data is in place but the job must still be completed.
    Transferred,
    Acknowledged,
    Cancelled,
}

impl JobState {
    pub const ALL: [JobState; 9] = [
        JobState::Queued,
        JobState::Connecting,
        JobState::Transferring,
        JobState::Suspended,
        JobState::Error,
        JobState::TransientError,
        JobState::Transferred,
        JobState::Acknowledged,
        JobState::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Queued => "QUEUED",
            JobState::Connecting => "CONNECTING",
            JobState::Transferring => "TRANSFERRING",
            JobState::Suspended => "SUSPENDED",
            JobState::Error => "ERROR",
            JobState::TransientError => "TRANSIENT_ERROR",
            JobState::Transferred => "TRANSFERRED",
            JobState::Acknowledged => "ACKNOWLEDGED",
            JobState::Cancelled => "CANCELLED",
        }
    }

    /// No operation moves a job out of these states.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Acknowledged | JobState::Cancelled)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobState {
    type Err = BitsError;

    fn from_str(s: &str) -> Result<Self> {
        let value = s.trim();
        JobState::ALL
            .into_iter()
            .find(|state| state.as_str() == value)
            .ok_or_else(|| BitsError::UnknownState {
                value: value.to_string(),
            })
    }
}

/// Declared lowest first so that `Foreground` compares greatest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum JobPriority {
    Low,
    Normal,
    High,
    Foreground,
}

impl JobPriority {
    pub const ALL: [JobPriority; 4] = [
        JobPriority::Foreground,
        JobPriority::High,
        JobPriority::Normal,
        JobPriority::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobPriority::Foreground => "FOREGROUND",
            JobPriority::High => "HIGH",
            JobPriority::Normal => "NORMAL",
            JobPriority::Low => "LOW",
        }
    }
}

impl fmt::Display for JobPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobPriority {
    type Err = BitsError;

    fn from_str(s: &str) -> Result<Self> {
        let value = s.trim();
        JobPriority::ALL
            .into_iter()
            .find(|priority| priority.as_str() == value)
            .ok_or_else(|| BitsError::UnknownPriority {
                value: value.to_string(),
            })
    }
}

/// Every read-only attribute bitsadmin exposes through a `/get*` switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobAttribute {
    Type,
    AclFlags,
    BytesTotal,
    BytesTransferred,
    FilesTotal,
    FilesTransferred,
    CreationTime,
    ModificationTime,
    CompletionTime,
    State,
    Error,
    Owner,
    Name,
    Description,
    Priority,
    NotifyFlags,
    NotifyInterface,
    MinRetryDelay,
    NoProgressTimeout,
    ErrorCount,
    ProxyUsage,
    ProxyList,
    ProxyBypassList,
    NotifyCmdline,
}

impl JobAttribute {
    pub const ALL: [JobAttribute; 24] = [
        JobAttribute::Type,
        JobAttribute::AclFlags,
        JobAttribute::BytesTotal,
        JobAttribute::BytesTransferred,
        JobAttribute::FilesTotal,
        JobAttribute::FilesTransferred,
        JobAttribute::CreationTime,
        JobAttribute::ModificationTime,
        JobAttribute::CompletionTime,
        JobAttribute::State,
        JobAttribute::Error,
        JobAttribute::Owner,
        JobAttribute::Name,
        JobAttribute::Description,
        JobAttribute::Priority,
        JobAttribute::NotifyFlags,
        JobAttribute::NotifyInterface,
        JobAttribute::MinRetryDelay,
        JobAttribute::NoProgressTimeout,
        JobAttribute::ErrorCount,
        JobAttribute::ProxyUsage,
        JobAttribute::ProxyList,
        JobAttribute::ProxyBypassList,
        JobAttribute::NotifyCmdline,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            JobAttribute::Type => "type",
            JobAttribute::AclFlags => "aclflags",
            JobAttribute::BytesTotal => "bytestotal",
            JobAttribute::BytesTransferred => "bytestransferred",
            JobAttribute::FilesTotal => "filestotal",
            JobAttribute::FilesTransferred => "filestransferred",
            JobAttribute::CreationTime => "creationtime",
            JobAttribute::ModificationTime => "modificationtime",
            JobAttribute::CompletionTime => "completiontime",
            JobAttribute::State => "state",
            JobAttribute::Error => "error",
            JobAttribute::Owner => "owner",
            JobAttribute::Name => "name",
            JobAttribute::Description => "description",
            JobAttribute::Priority => "priority",
            JobAttribute::NotifyFlags => "notifyflags",
            JobAttribute::NotifyInterface => "notifyinterface",
            JobAttribute::MinRetryDelay => "minretrydelay",
            JobAttribute::NoProgressTimeout => "noprogresstimeout",
            JobAttribute::ErrorCount => "errorcount",
            JobAttribute::ProxyUsage => "proxyusage",
            JobAttribute::ProxyList => "proxylist",
            JobAttribute::ProxyBypassList => "proxybypasslist",
            JobAttribute::NotifyCmdline => "notifycmdline",
        }
    }

    pub fn switch(&self) -> String {
        match self {
            JobAttribute::Name => "/getdisplayname".to_string(),
            other => format!("/get{}", other.name()),
        }
    }
}

impl FromStr for JobAttribute {
    type Err = BitsError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        JobAttribute::ALL
            .into_iter()
            .find(|attr| attr.name() == wanted || (wanted == "displayname" && *attr == JobAttribute::Name))
            .ok_or_else(|| BitsError::InvalidCommand {
                message: format!("unknown job attribute '{s}'"),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxySettings {
    Preconfig,
    NoProxy,
    Override {
        proxy_list: String,
        bypass_list: Option<String>,
    },
    AutoDetect,
}

impl ProxySettings {
    pub fn to_args(&self) -> Vec<String> {
        match self {
            ProxySettings::Preconfig => vec!["PRECONFIG".to_string()],
            ProxySettings::NoProxy => vec!["NO_PROXY".to_string()],
            ProxySettings::AutoDetect => vec!["AUTODETECT".to_string()],
            ProxySettings::Override {
                proxy_list,
                bypass_list,
            } => {
                let mut args = vec!["OVERRIDE".to_string(), proxy_list.clone()];
                if let Some(bypass) = bypass_list {
                    args.push(bypass.clone());
                }
                args
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialTarget {
    Server,
    Proxy,
}

impl CredentialTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialTarget::Server => "SERVER",
            CredentialTarget::Proxy => "PROXY",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    Basic,
    Digest,
    Ntlm,
    Negotiate,
    Passport,
}

impl AuthScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthScheme::Basic => "BASIC",
            AuthScheme::Digest => "DIGEST",
            AuthScheme::Ntlm => "NTLM",
            AuthScheme::Negotiate => "NEGOTIATE",
            AuthScheme::Passport => "PASSPORT",
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub target: CredentialTarget,
    pub scheme: AuthScheme,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("target", &self.target)
            .field("scheme", &self.scheme)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Handle to one job held by the transfer service.
///
/// Nothing is cached: every getter asks the service again, and every setter
/// takes effect there immediately.
#[derive(Clone)]
pub struct Job {
    id: JobId,
    executor: Arc<dyn Executor>,
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job").field("id", &self.id).finish()
    }
}

impl PartialEq for Job {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Job {}

impl Job {
    pub fn new(id: JobId, executor: Arc<dyn Executor>) -> Self {
        Self { id, executor }
    }

    /// Wraps the job whose identifier appears somewhere in `text`.
    pub fn parse(text: &str, executor: Arc<dyn Executor>) -> Result<Self> {
        Ok(Self::new(JobId::parse(text)?, executor))
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    fn command(&self, switch: &str) -> BitsCommand {
        BitsCommand::for_job(switch, &self.id)
    }

    fn run(&self, command: BitsCommand) -> Result<String> {
        self.executor.execute(&command)
    }

    pub fn suspend(&self) -> Result<String> {
        self.run(self.command("/suspend"))
    }

    pub fn resume(&self) -> Result<String> {
        self.run(self.command("/resume"))
    }

    pub fn cancel(&self) -> Result<String> {
        self.run(self.command("/cancel"))
    }

    pub fn complete(&self) -> Result<String> {
        self.run(self.command("/complete"))
    }

    pub fn add_file(&self, url: &str, local_name: &str) -> Result<()> {
        self.run(self.command("/addfile").arg(url).arg(local_name))?;
        Ok(())
    }

    pub fn files(&self) -> Result<Vec<FileDescriptor>> {
        let output = self.run(self.command("/listfiles"))?;
        let files = parse_file_listing(&output)?;
        debug!(job = %self.id, count = files.len(), "parsed file listing");
        Ok(files)
    }

    /// Reads one attribute and returns the service's text untouched.
    pub fn get(&self, attribute: JobAttribute) -> Result<String> {
        self.run(self.command(&attribute.switch()))
    }

    pub fn job_type(&self) -> Result<String> {
        self.get(JobAttribute::Type)
    }

    pub fn acl_flags(&self) -> Result<String> {
        self.get(JobAttribute::AclFlags)
    }

    pub fn bytes_total(&self) -> Result<String> {
        self.get(JobAttribute::BytesTotal)
    }

    pub fn bytes_transferred(&self) -> Result<String> {
        self.get(JobAttribute::BytesTransferred)
    }

    pub fn files_total(&self) -> Result<String> {
        self.get(JobAttribute::FilesTotal)
    }

    pub fn files_transferred(&self) -> Result<String> {
        self.get(JobAttribute::FilesTransferred)
    }

    pub fn creation_time(&self) -> Result<String> {
        self.get(JobAttribute::CreationTime)
    }

    pub fn modification_time(&self) -> Result<String> {
        self.get(JobAttribute::ModificationTime)
    }

    pub fn completion_time(&self) -> Result<String> {
        self.get(JobAttribute::CompletionTime)
    }

    pub fn state(&self) -> Result<JobState> {
        self.state_text()?.parse()
    }

    pub fn state_text(&self) -> Result<String> {
        self.get(JobAttribute::State)
    }

    pub fn error(&self) -> Result<String> {
        self.get(JobAttribute::Error)
    }

    pub fn owner(&self) -> Result<String> {
        self.get(JobAttribute::Owner)
    }

    pub fn name(&self) -> Result<String> {
        self.get(JobAttribute::Name)
    }

    pub fn description(&self) -> Result<String> {
        self.get(JobAttribute::Description)
    }

    pub fn priority(&self) -> Result<JobPriority> {
        self.priority_text()?.parse()
    }

    pub fn priority_text(&self) -> Result<String> {
        self.get(JobAttribute::Priority)
    }

    pub fn notify_flags(&self) -> Result<String> {
        self.get(JobAttribute::NotifyFlags)
    }

    pub fn notify_interface(&self) -> Result<String> {
        self.get(JobAttribute::NotifyInterface)
    }

    pub fn min_retry_delay(&self) -> Result<String> {
        self.get(JobAttribute::MinRetryDelay)
    }

    pub fn no_progress_timeout(&self) -> Result<String> {
        self.get(JobAttribute::NoProgressTimeout)
    }

    pub fn error_count(&self) -> Result<String> {
        self.get(JobAttribute::ErrorCount)
    }

    pub fn proxy_usage(&self) -> Result<String> {
        self.get(JobAttribute::ProxyUsage)
    }

    pub fn proxy_list(&self) -> Result<String> {
        self.get(JobAttribute::ProxyList)
    }

    pub fn proxy_bypass_list(&self) -> Result<String> {
        self.get(JobAttribute::ProxyBypassList)
    }

    pub fn notify_cmdline(&self) -> Result<String> {
        self.get(JobAttribute::NotifyCmdline)
    }

    /// Full free-text report of the job.
    pub fn info(&self) -> Result<String> {
        self.run(self.command("/info"))
    }

    pub fn set_acl_flags(&self, flags: &str) -> Result<()> {
        self.run(self.command("/setaclflags").arg(flags))?;
        Ok(())
    }

    pub fn set_name(&self, name: &str) -> Result<()> {
        self.run(self.command("/setdisplayname").arg(name))?;
        Ok(())
    }

    pub fn set_description(&self, description: &str) -> Result<()> {
        self.run(self.command("/setdescription").arg(description))?;
        Ok(())
    }

    pub fn set_priority(&self, priority: JobPriority) -> Result<()> {
        self.run(self.command("/setpriority").arg(priority.as_str()))?;
        Ok(())
    }

    pub fn set_notify_flags(&self, flags: u32) -> Result<()> {
        self.run(self.command("/setnotifyflags").arg(flags.to_string()))?;
        Ok(())
    }

    /// Seconds to wait before retrying after a transient error.
    pub fn set_min_retry_delay(&self, seconds: u32) -> Result<()> {
        self.run(self.command("/setminretrydelay").arg(seconds.to_string()))?;
        Ok(())
    }

    pub fn set_no_progress_timeout(&self, seconds: u32) -> Result<()> {
        self.run(self.command("/setnoprogresstimeout").arg(seconds.to_string()))?;
        Ok(())
    }

    pub fn set_proxy_settings(&self, settings: &ProxySettings) -> Result<()> {
        let mut command = self.command("/setproxysettings");
        command.args.extend(settings.to_args());
        self.run(command)?;
        Ok(())
    }

    /// Program to launch when the job finishes or fails. When `params` is
    /// given it must start with the program name itself.
    pub fn set_notify_cmdline(&self, program: &str, params: Option<&str>) -> Result<()> {
        let mut command = self.command("/setnotifycmdline").arg(program);
        if let Some(params) = params {
            command = command.arg(params);
        }
        self.run(command)?;
        Ok(())
    }

    pub fn set_credentials(&self, credentials: &Credentials) -> Result<()> {
        let command = self
            .command("/setcredentials")
            .arg(credentials.target.as_str())
            .arg(credentials.scheme.as_str())
            .arg(credentials.username.as_str())
            .arg(credentials.password.as_str());
        self.run(command)?;
        Ok(())
    }
}
