use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::error::{BitsError, Result};

pub const UNKNOWN_TOTAL: &str = "UNKNOWN";

static RE_FILE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+) / (\d+|UNKNOWN) WORKING (.+) -> (.+)$").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BytesTotal {
    Known(u64),
    Unknown,
}

impl fmt::Display for BytesTotal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BytesTotal::Known(n) => write!(f, "{n}"),
            BytesTotal::Unknown => f.write_str(UNKNOWN_TOTAL),
        }
    }
}

/// One file of a job, as reported by the last listing. Not a live handle.
#[derive(Debug, Clone)]
pub struct FileDescriptor {
    pub remote_url: String,
    pub local_name: Option<String>,
    pub bytes_transferred: u64,
    pub bytes_total: BytesTotal,
}

impl FileDescriptor {
    pub fn new(remote_url: impl Into<String>, local_name: Option<String>) -> Self {
        Self {
            remote_url: remote_url.into(),
            local_name,
            bytes_transferred: 0,
            bytes_total: BytesTotal::Unknown,
        }
    }
}

impl fmt::Display for FileDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}",
            self.remote_url,
            self.local_name.as_deref().unwrap_or("")
        )
    }
}

pub fn parse_file_line(line: &str) -> Option<FileDescriptor> {
    let capture = RE_FILE_LINE.captures(line.trim_end_matches('\r'))?;

    let bytes_transferred = capture.get(1)?.as_str().parse::<u64>().ok()?;
    let bytes_total = match capture.get(2)?.as_str() {
        UNKNOWN_TOTAL => BytesTotal::Unknown,
        value => BytesTotal::Known(value.parse::<u64>().ok()?),
    };
    let remote_url = capture.get(3)?.as_str().to_string();
    let local_name = capture.get(4)?.as_str().to_string();

    Some(FileDescriptor {
        remote_url,
        local_name: Some(local_name),
        bytes_transferred,
        bytes_total,
    })
}

/// Lines of a bitsadmin report. Only the trailing terminators are dropped;
/// blank lines inside the report are kept so that parsers reject them.
pub(crate) fn report_lines(output: &str) -> std::str::Lines<'_> {
    output.trim_end_matches(&['\r', '\n'][..]).lines()
}

/// Parses a `/listfiles` report. A single bad line rejects the whole report.
pub fn parse_file_listing(output: &str) -> Result<Vec<FileDescriptor>> {
    report_lines(output)
        .map(|line| {
            parse_file_line(line).ok_or_else(|| BitsError::FileDescriptorParse {
                line: line.to_string(),
                output: output.to_string(),
            })
        })
        .collect()
}
