use std::fmt;

use crate::core::job::JobId;

/// Switches that make bitsadmin print bare values instead of decorated reports.
pub(crate) const RAW_SWITCHES: [&str; 2] = ["/rawreturn", "/nowrap"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitsCommand {
    pub switch: Option<String>,
    pub job: Option<JobId>,
    pub args: Vec<String>,
    pub raw: bool,
}

impl BitsCommand {
    /// `bitsadmin` with no arguments at all; prints the banner.
    pub fn bare() -> Self {
        Self {
            switch: None,
            job: None,
            args: Vec::new(),
            raw: false,
        }
    }

    pub fn global(switch: &str) -> Self {
        Self {
            switch: Some(switch.to_string()),
            job: None,
            args: Vec::new(),
            raw: true,
        }
    }

    pub fn for_job(switch: &str, job: &JobId) -> Self {
        Self {
            job: Some(job.clone()),
            ..Self::global(switch)
        }
    }

    pub fn arg(mut self, value: impl Into<String>) -> Self {
        self.args.push(value.into());
        self
    }

    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if self.raw {
            args.extend(RAW_SWITCHES.iter().map(|s| s.to_string()));
        }

        if let Some(switch) = &self.switch {
            args.push(switch.clone());
        }

        if let Some(job) = &self.job {
            args.push(format!("{{{job}}}"));
        }

        args.extend(self.args.iter().cloned());

        args
    }
}

impl fmt::Display for BitsCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.to_args().iter().map(|a| quote_arg(a)).collect();
        f.write_str(&rendered.join(" "))
    }
}

/// Quotes an argument for display when it would otherwise split or lose its quotes.
pub fn quote_arg(arg: &str) -> String {
    if arg.is_empty() {
        return "\"\"".to_string();
    }

    if arg.chars().any(|c| c.is_whitespace() || c == '"') {
        format!("\"{}\"", arg.replace('"', "\\\""))
    } else {
        arg.to_string()
    }
}
