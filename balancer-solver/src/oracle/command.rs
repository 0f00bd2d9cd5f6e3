//! An oracle backed by an external program.
//!
//! The request is written to the program's stdin followed by a newline; the
//! program's stdout is parsed with [`parse_answer`](super::parse_answer).

use super::{parse_answer, OracleAnswer, OracleError, QeOracle, QeQuery};
use std::io::{Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::debug;

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Runs a quantifier-elimination tool once per query.
#[derive(Debug, Clone)]
pub struct CommandOracle {
    program: String,
    args: Vec<String>,
}

impl CommandOracle {
    /// Oracle running `program` with `args`.
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    fn spawn(&self) -> Result<Child, OracleError> {
        Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| OracleError::Process(format!("failed to spawn {}: {e}", self.program)))
    }
}

/// Poll until the child exits or the deadline passes. `Ok(None)` on expiry.
fn wait_until(child: &mut Child, deadline: Option<Instant>) -> std::io::Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            return Ok(None);
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

/// Read a pipe to the end on its own thread, so a chatty child never blocks
/// on a full pipe while we poll it.
fn drain(pipe: Option<impl Read + Send + 'static>) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut out = String::new();
        if let Some(mut pipe) = pipe {
            // a broken pipe leaves whatever was read
            let _ = pipe.read_to_string(&mut out);
        }
        out
    })
}

fn collect(reader: JoinHandle<String>) -> String {
    reader.join().unwrap_or_default()
}

impl QeOracle for CommandOracle {
    fn name(&self) -> &str {
        &self.program
    }

    fn eliminate(
        &mut self,
        query: &QeQuery,
        deadline: Option<Instant>,
    ) -> Result<OracleAnswer, OracleError> {
        let start = Instant::now();
        let mut child = self.spawn()?;
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        if let Some(mut stdin) = child.stdin.take() {
            writeln!(stdin, "{}", query.request())
                .map_err(|e| OracleError::Process(format!("failed to write request: {e}")))?;
        }

        let status = wait_until(&mut child, deadline)
            .map_err(|e| OracleError::Process(format!("failed to wait for {}: {e}", self.program)))?;
        let Some(status) = status else {
            let _ = child.kill();
            let _ = child.wait();
            // grandchildren may hold the pipes open; the readers are left to finish alone
            let limit = deadline.map_or(Duration::ZERO, |d| d.saturating_duration_since(start));
            debug!(program = %self.program, "oracle killed at deadline");
            return Err(OracleError::Timeout {
                elapsed_ms: start.elapsed().as_millis() as u64,
                limit_ms: limit.as_millis() as u64,
            });
        };

        let stdout = collect(stdout);
        let stderr = collect(stderr);
        if !status.success() {
            return Err(OracleError::Process(format!(
                "{} exited with {status}: {}",
                self.program,
                stderr.trim()
            )));
        }
        parse_answer(&stdout)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use balancer_core::{AssumptionSet, SubstitutionManager};
    use balancer_math::Variable;

    fn empty_query() -> QeQuery {
        QeQuery::new(&AssumptionSet::new(), &SubstitutionManager::new(), &[])
    }

    #[test]
    fn test_reads_answer_from_stdout() {
        let mut oracle = CommandOracle::new("sh", ["-c", "cat > /dev/null; echo 'p = 3/2'"]);
        let answer = oracle.eliminate(&empty_query(), None).expect("runs");
        let OracleAnswer::Bindings(values) = answer else {
            panic!("expected bindings");
        };
        assert!(values.contains_key(&Variable::new("p")));
    }

    #[test]
    fn test_request_reaches_stdin() {
        // echo the request back as a truth value when it is the empty query
        let mut oracle = CommandOracle::new(
            "sh",
            ["-c", "read line; [ \"$line\" = 'rlex(true)' ] && echo true || echo false"],
        );
        let answer = oracle.eliminate(&empty_query(), None).expect("runs");
        assert_eq!(answer, OracleAnswer::Truth(true));
    }

    #[test]
    fn test_nonzero_exit_is_process_error() {
        let mut oracle = CommandOracle::new("sh", ["-c", "echo boom >&2; exit 3"]);
        let err = oracle.eliminate(&empty_query(), None).expect_err("fails");
        assert!(matches!(err, OracleError::Process(ref msg) if msg.contains("boom")));
    }

    #[test]
    fn test_killed_at_deadline() {
        let mut oracle = CommandOracle::new("sh", ["-c", "sleep 5"]);
        let deadline = Instant::now() + Duration::from_millis(50);
        let err = oracle.eliminate(&empty_query(), Some(deadline)).expect_err("times out");
        assert!(matches!(err, OracleError::Timeout { .. }));
    }

    #[test]
    fn test_large_output_does_not_stall() {
        // well past a pipe buffer on both streams before the answer
        let script = "cat > /dev/null; \
                      head -c 300000 /dev/zero | tr '\\0' x >&2; \
                      head -c 300000 /dev/zero | tr '\\0' ' '; \
                      echo true";
        let mut oracle = CommandOracle::new("sh", ["-c", script]);
        let deadline = Instant::now() + Duration::from_secs(20);
        let answer = oracle.eliminate(&empty_query(), Some(deadline)).expect("finishes");
        assert_eq!(answer, OracleAnswer::Truth(true));
    }

    #[test]
    fn test_missing_program() {
        let mut oracle = CommandOracle::new("definitely-not-an-oracle-binary", Vec::<String>::new());
        assert!(matches!(
            oracle.eliminate(&empty_query(), None),
            Err(OracleError::Process(_))
        ));
    }
}
