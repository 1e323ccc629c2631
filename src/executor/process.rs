use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::{Instant, timeout};

use super::{Execution, RequestExecutor, TIMEOUT_LABEL, status_label};

const CURL_PROGRAM: &str = "curl";
/// curl's exit code for "operation timed out".
const CURL_TIMEOUT_EXIT: i32 = 28;
/// Extra time granted to the process beyond curl's own `--max-time`.
const PROCESS_GRACE: Duration = Duration::from_secs(1);

#[cfg(windows)]
const NULL_DEVICE: &str = "NUL";
#[cfg(not(windows))]
const NULL_DEVICE: &str = "/dev/null";

/// Runs one `curl` process per request.
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    program: String,
    request_timeout: Duration,
}

impl ProcessExecutor {
    #[must_use]
    pub fn new(request_timeout: Duration) -> Self {
        Self::with_program(CURL_PROGRAM, request_timeout)
    }

    /// Uses `program` in place of `curl`; it must accept curl's arguments.
    #[must_use]
    pub fn with_program(program: &str, request_timeout: Duration) -> Self {
        Self {
            program: program.to_owned(),
            request_timeout,
        }
    }

    fn command(&self, target: &str) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(["-s", "-S", "-o", NULL_DEVICE, "-w", "%{http_code}", "--max-time"])
            .arg(format!("{:.3}", self.request_timeout.as_secs_f64()))
            .arg(target)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        command
    }
}

#[async_trait]
impl RequestExecutor for ProcessExecutor {
    async fn execute(&self, target: &str) -> Execution {
        let started = Instant::now();
        let limit = self.request_timeout.saturating_add(PROCESS_GRACE);
        let classification = match timeout(limit, self.command(target).output()).await {
            Err(_) => TIMEOUT_LABEL.to_owned(),
            Ok(Err(err)) => format!("Failed to run curl: {}", err),
            Ok(Ok(output)) => classify_curl_output(
                output.status.code(),
                &String::from_utf8_lossy(&output.stdout),
                &String::from_utf8_lossy(&output.stderr),
            ),
        };
        Execution {
            classification,
            elapsed: started.elapsed(),
        }
    }
}

/// Turns curl's exit code, `%{http_code}` output and stderr into a label.
pub(crate) fn classify_curl_output(exit_code: Option<i32>, stdout: &str, stderr: &str) -> String {
    match exit_code {
        Some(0) => match stdout.trim().parse::<u16>() {
            Ok(code) if code > 0 => status_label(code),
            Ok(_) | Err(_) => "No HTTP status from curl".to_owned(),
        },
        Some(CURL_TIMEOUT_EXIT) => TIMEOUT_LABEL.to_owned(),
        Some(code) => curl_error_message(stderr)
            .unwrap_or_else(|| format!("curl exited with status {}", code)),
        None => curl_error_message(stderr)
            .unwrap_or_else(|| "curl was terminated by a signal".to_owned()),
    }
}

/// Strips the `curl: (7) ` prefix from curl's error line.
fn curl_error_message(stderr: &str) -> Option<String> {
    let line = stderr.lines().map(str::trim).find(|line| !line.is_empty())?;
    let message = line
        .strip_prefix("curl: ")
        .and_then(|rest| rest.strip_prefix('('))
        .and_then(|rest| rest.split_once(") "))
        .map_or(line, |(_, message)| message);
    Some(message.trim().to_owned())
}
