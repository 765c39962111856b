//! Executor doubles for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::core::command::BitsCommand;
use crate::core::error::{BitsError, Result};
use crate::core::runner::Executor;

fn not_found(command: &BitsCommand) -> BitsError {
    BitsError::ProcessFailed {
        exit_code: Some(1),
        output: format!("Unable to find job for '{command}'"),
    }
}

/// Answers from a fixed table keyed by the rendered command text.
#[derive(Default)]
pub struct ScriptedExecutor {
    responses: HashMap<String, String>,
    accept_all: bool,
    commands: Mutex<Vec<String>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, command: &str, output: &str) -> Self {
        self.responses.insert(command.to_string(), output.to_string());
        self
    }

    /// Unscripted commands succeed with empty output instead of failing.
    pub fn accept_all(mut self) -> Self {
        self.accept_all = true;
        self
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }
}

impl Executor for ScriptedExecutor {
    fn execute(&self, command: &BitsCommand) -> Result<String> {
        let text = command.to_string();
        self.commands.lock().unwrap().push(text.clone());

        match self.responses.get(&text) {
            Some(output) => Ok(output.clone()),
            None if self.accept_all => Ok(String::new()),
            None => Err(BitsError::ProcessFailed {
                exit_code: Some(1),
                output: format!("unscripted command: {text}"),
            }),
        }
    }
}

#[derive(Debug, Default)]
struct FakeJob {
    id: String,
    name: String,
    state: String,
    priority: String,
    files: Vec<(String, String)>,
    notify: Option<(String, Option<String>)>,
    attributes: HashMap<String, String>,
}

#[derive(Debug, Default)]
struct FakeState {
    jobs: Vec<FakeJob>,
    created: u64,
}

/// A tiny in-memory transfer service speaking bitsadmin's raw output format.
#[derive(Default)]
pub struct FakeBits {
    state: Mutex<FakeState>,
    commands: Mutex<Vec<String>>,
}

impl FakeBits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `/create` and returns the service's reply.
    pub fn create(&self, name: &str) -> String {
        self.execute(&BitsCommand::global("/create").arg(name)).unwrap()
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }
}

impl Executor for FakeBits {
    fn execute(&self, command: &BitsCommand) -> Result<String> {
        self.commands.lock().unwrap().push(command.to_string());

        let mut state = self.state.lock().unwrap();
        let switch = match &command.switch {
            Some(switch) => switch.as_str(),
            None => return Ok("BITSADMIN version 3.0 [ 7.5.7601 ]\nBITS administration utility.\n".to_string()),
        };
        let first = command.args.first().cloned().unwrap_or_default();

        match switch {
            "/create" => {
                state.created += 1;
                let id = format!("{:08X}-0000-4000-8000-{:012X}", state.created, state.created);
                state.jobs.push(FakeJob {
                    id: id.clone(),
                    name: first,
                    state: "SUSPENDED".to_string(),
                    priority: "NORMAL".to_string(),
                    ..FakeJob::default()
                });
                return Ok(format!("Created job {{{id}}}."));
            }
            "/list" => {
                let lines: Vec<String> = state
                    .jobs
                    .iter()
                    .map(|job| {
                        format!(
                            "{{{}}} '{}' {} {} / {} 0 / UNKNOWN\n",
                            job.id,
                            job.name,
                            job.state,
                            0,
                            job.files.len()
                        )
                    })
                    .collect();
                return Ok(lines.concat());
            }
            "/reset" => {
                let count = state.jobs.len();
                state.jobs.clear();
                return Ok(format!("{count} out of {count} jobs canceled."));
            }
            _ => {}
        }

        let id = command
            .job
            .as_ref()
            .map(|id| id.as_str().to_string())
            .ok_or_else(|| not_found(command))?;
        let index = state
            .jobs
            .iter()
            .position(|job| job.id == id)
            .ok_or_else(|| not_found(command))?;

        if matches!(switch, "/cancel" | "/complete") {
            state.jobs.remove(index);
            return Ok(if switch == "/cancel" {
                "Job canceled.".to_string()
            } else {
                "Job completed.".to_string()
            });
        }

        let job = &mut state.jobs[index];
        let output = match switch {
            "/getdisplayname" => job.name.clone(),
            "/setdisplayname" => {
                job.name = first;
                String::new()
            }
            "/getstate" => job.state.clone(),
            "/getpriority" => job.priority.clone(),
            "/setpriority" => {
                job.priority = first;
                String::new()
            }
            "/addfile" => {
                let local = command.args.get(1).cloned().unwrap_or_default();
                job.files.push((first, local));
                String::new()
            }
            "/listfiles" => job
                .files
                .iter()
                .map(|(url, local)| format!("0 / UNKNOWN WORKING {url} -> {local}\n"))
                .collect(),
            "/resume" => {
                if job.files.is_empty() {
                    "Unable to resume job; the job has no files.".to_string()
                } else {
                    job.state = "TRANSFERRING".to_string();
                    "Job resumed.".to_string()
                }
            }
            "/suspend" => {
                job.state = "SUSPENDED".to_string();
                "Job suspended.".to_string()
            }
            "/setnotifycmdline" => {
                job.notify = Some((first, command.args.get(1).cloned()));
                String::new()
            }
            "/getnotifycmdline" => match &job.notify {
                Some((program, params)) => format!(
                    "the notification command line is '{program}' '{}'",
                    params.as_deref().unwrap_or("")
                ),
                None => "the notification command line is '(null)' '(null)'".to_string(),
            },
            "/info" => format!(
                "GUID: {{{}}} DISPLAY: '{}'\nTYPE: DOWNLOAD STATE: {} OWNER: FAKE\\user\nPRIORITY: {} FILES: 0 / {}\n",
                job.id,
                job.name,
                job.state,
                job.priority,
                job.files.len()
            ),
            other => {
                if let Some(attr) = other.strip_prefix("/set") {
                    job.attributes.insert(attr.to_string(), command.args.join(" "));
                    String::new()
                } else if let Some(attr) = other.strip_prefix("/get") {
                    job.attributes.get(attr).cloned().unwrap_or_default()
                } else {
                    return Err(BitsError::ProcessFailed {
                        exit_code: Some(1),
                        output: format!("Invalid switch {other}"),
                    });
                }
            }
        };

        Ok(output)
    }
}
