use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::core::command::BitsCommand;
use crate::core::error::{BitsError, Result};
use crate::core::file::report_lines;
use crate::core::job::{Job, JobId};
use crate::core::runner::{BitsConfig, Executor, ProcessExecutor};

static RE_VERSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d\.\d").unwrap());

/// All jobs sharing one display name, in the order the service listed them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamedJobs {
    One(Job),
    Many(Vec<Job>),
}

impl NamedJobs {
    fn with(self, job: Job) -> Self {
        match self {
            NamedJobs::One(first) => NamedJobs::Many(vec![first, job]),
            NamedJobs::Many(mut jobs) => {
                jobs.push(job);
                NamedJobs::Many(jobs)
            }
        }
    }

    pub fn as_slice(&self) -> &[Job] {
        match self {
            NamedJobs::One(job) => std::slice::from_ref(job),
            NamedJobs::Many(jobs) => jobs,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    pub fn first(&self) -> Option<&Job> {
        self.as_slice().first()
    }

    pub fn into_vec(self) -> Vec<Job> {
        match self {
            NamedJobs::One(job) => vec![job],
            NamedJobs::Many(jobs) => jobs,
        }
    }
}

/// Groups jobs by name; a repeated name turns its entry into `Many`.
pub fn fold_by_name(entries: impl IntoIterator<Item = (String, Job)>) -> HashMap<String, NamedJobs> {
    let mut jobs: HashMap<String, NamedJobs> = HashMap::new();

    for (name, job) in entries {
        let entry = match jobs.remove(&name) {
            None => NamedJobs::One(job),
            Some(existing) => existing.with(job),
        };
        jobs.insert(name, entry);
    }

    jobs
}

/// Service-wide operations that are not tied to one job.
#[derive(Clone)]
pub struct Manager {
    executor: Arc<dyn Executor>,
}

impl Manager {
    pub fn new(executor: Arc<dyn Executor>) -> Self {
        Self { executor }
    }

    pub fn with_config(config: BitsConfig) -> Self {
        Self::new(Arc::new(ProcessExecutor::new(config)))
    }

    /// Handle for a job already known to exist in the service.
    pub fn job(&self, id: JobId) -> Job {
        Job::new(id, Arc::clone(&self.executor))
    }

    pub fn find_job(&self, text: &str) -> Result<Job> {
        Job::parse(text, Arc::clone(&self.executor))
    }

    fn list(&self) -> Result<Vec<Job>> {
        let output = self.executor.execute(&BitsCommand::global("/list"))?;
        let jobs = report_lines(&output)
            .map(|line| self.find_job(line))
            .collect::<Result<Vec<_>>>()?;
        debug!(count = jobs.len(), "parsed job list");
        Ok(jobs)
    }

    /// Every job keyed by display name. Names are not unique, so a name seen
    /// more than once maps to all of its jobs in listing order.
    pub fn jobs(&self) -> Result<HashMap<String, NamedJobs>> {
        let entries = self
            .list()?
            .into_iter()
            .map(|job| -> Result<(String, Job)> { Ok((job.name()?, job)) })
            .collect::<Result<Vec<_>>>()?;
        Ok(fold_by_name(entries))
    }

    pub fn jobs_by_id(&self) -> Result<HashMap<JobId, Job>> {
        Ok(self
            .list()?
            .into_iter()
            .map(|job| (job.id().clone(), job))
            .collect())
    }

    pub fn create_job(&self, name: &str) -> Result<Job> {
        if name.is_empty() {
            return Err(BitsError::InvalidJobName);
        }

        let output = self
            .executor
            .execute(&BitsCommand::global("/create").arg(name))?;
        let job = self.find_job(&output)?;
        info!(job = %job.id(), %name, "created job");
        Ok(job)
    }

    pub fn cancel_all_jobs(&self) -> Result<String> {
        info!("cancelling all jobs");
        self.executor.execute(&BitsCommand::global("/reset"))
    }

    /// First `digit.digit` in bitsadmin's banner, or `None` when there is none.
    pub fn version(&self) -> Result<Option<String>> {
        let output = self.executor.execute(&BitsCommand::bare())?;
        Ok(parse_version(&output))
    }
}

pub fn parse_version(text: &str) -> Option<String> {
    RE_VERSION.find(text).map(|m| m.as_str().to_string())
}
