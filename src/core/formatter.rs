use std::collections::HashMap;

use crate::core::file::{BytesTotal, FileDescriptor};
use crate::core::job::{Job, JobId};
use crate::core::manager::NamedJobs;

pub fn format_file_line(file: &FileDescriptor) -> String {
    let local = file.local_name.as_deref().unwrap_or("(unnamed)");
    let progress = match file.bytes_total {
        BytesTotal::Known(total) if total > 0 => {
            let percent = file.bytes_transferred as f64 / total as f64 * 100.0;
            format!(
                "{} / {} ({:.1}%)",
                format_bytes(file.bytes_transferred),
                format_bytes(total),
                percent
            )
        }
        BytesTotal::Known(total) => format!("{} / {}", format_bytes(file.bytes_transferred), format_bytes(total)),
        BytesTotal::Unknown => format!("{} / unknown", format_bytes(file.bytes_transferred)),
    };
    format!("{} -> {local}  [{progress}]", file.remote_url)
}

/// One line per job, names sorted; duplicated names list every id.
pub fn format_jobs_by_name(jobs: &HashMap<String, NamedJobs>) -> Vec<String> {
    let mut names: Vec<&String> = jobs.keys().collect();
    names.sort();

    let mut lines = Vec::new();
    for name in names {
        let entry = &jobs[name];
        let marker = if entry.len() > 1 {
            format!(" (x{})", entry.len())
        } else {
            String::new()
        };
        for job in entry.as_slice() {
            lines.push(format!("{{{}}}  {name}{marker}", job.id()));
        }
    }
    lines
}

pub fn format_jobs_by_id(jobs: &HashMap<JobId, Job>) -> Vec<String> {
    let mut ids: Vec<&JobId> = jobs.keys().collect();
    ids.sort();
    ids.into_iter().map(|id| format!("{{{id}}}")).collect()
}

pub fn format_bytes(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    let value = bytes as f64;
    if value >= GB {
        format!("{:.2} GB", value / GB)
    } else if value >= MB {
        format!("{:.2} MB", value / MB)
    } else if value >= KB {
        format!("{:.2} KB", value / KB)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::core::manager::fold_by_name;
    use crate::core::testing::ScriptedExecutor;

    #[test]
    fn bytes_scale_to_units() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.00 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.00 MB");
    }

    #[test]
    fn file_line_shows_percentage_when_total_known() {
        let mut file = FileDescriptor::new("http://a", Some("/tmp/a".to_string()));
        file.bytes_transferred = 256;
        file.bytes_total = BytesTotal::Known(1024);
        assert_eq!(format_file_line(&file), "http://a -> /tmp/a  [256 B / 1.00 KB (25.0%)]");

        file.bytes_total = BytesTotal::Unknown;
        assert_eq!(format_file_line(&file), "http://a -> /tmp/a  [256 B / unknown]");
    }

    #[test]
    fn duplicate_names_are_marked() {
        let executor: Arc<ScriptedExecutor> = Arc::new(ScriptedExecutor::new());
        let job = |id: &str| Job::parse(id, executor.clone()).unwrap();
        let jobs = fold_by_name(vec![
            ("b".to_string(), job("BBBBBBBB-0000-0000-0000-000000000002")),
            ("a".to_string(), job("AAAAAAAA-0000-0000-0000-000000000001")),
            ("b".to_string(), job("CCCCCCCC-0000-0000-0000-000000000003")),
        ]);

        assert_eq!(
            format_jobs_by_name(&jobs),
            vec![
                "{AAAAAAAA-0000-0000-0000-000000000001}  a",
                "{BBBBBBBB-0000-0000-0000-000000000002}  b (x2)",
                "{CCCCCCCC-0000-0000-0000-000000000003}  b (x2)",
            ]
        );
    }
}
