// src/harness.rs
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;

use crate::config::RunnerConfig;
use crate::errors::{GenError, Result};
use crate::prompt::USER_MODULE;

pub const TEST_FILE: &str = "test_code.py";

/// Runs generated tests in a throwaway directory.
#[derive(Debug, Clone)]
pub struct TestHarness {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
    scratch_dir: Option<PathBuf>,
}

/// What the runner printed. `exit_code` is informational only.
#[derive(Debug, Clone)]
pub struct TestRun {
    pub output: String,
    pub exit_code: Option<i32>,
    pub duration_ms: u64,
    /// The scratch directory used for the run; gone by the time this is returned.
    pub workdir: PathBuf,
}

impl TestHarness {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
            scratch_dir: None,
        }
    }

    pub fn from_config(config: &RunnerConfig) -> Self {
        let harness = Self::new(config.program.clone(), config.args.clone(), config.timeout);
        match &config.scratch_dir {
            Some(dir) => harness.with_scratch_dir(dir),
            None => harness,
        }
    }

    /// Create the per-run directories under `dir` instead of the system temp dir.
    pub fn with_scratch_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.scratch_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Writes `source` as `user_code.py` and `tests` as `test_code.py` into a
    /// fresh temporary directory, runs the test command there and captures
    /// stdout. The directory is deleted when this returns, whatever happened.
    pub async fn run(&self, source: &str, tests: &str) -> Result<TestRun> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("testgen-");
        let workspace = match &self.scratch_dir {
            Some(dir) => builder.tempdir_in(dir)?,
            None => builder.tempdir()?,
        };
        let workdir = workspace.path().to_path_buf();

        let code_path = workdir.join(format!("{}.py", USER_MODULE));
        let test_path = workdir.join(TEST_FILE);
        tokio::fs::write(&code_path, source).await?;
        tokio::fs::write(&test_path, tests).await?;

        log::info!("Running tests in {}: {} {:?}", workdir.display(), self.program, self.args);

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(&test_path)
            .current_dir(&workdir)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let start = Instant::now();
        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, command.output())
                .await
                .map_err(|_| GenError::TestTimeout(limit))??,
            None => command.output().await?,
        };
        let duration_ms = start.elapsed().as_millis() as u64;

        if !output.stderr.is_empty() {
            log::debug!("Runner stderr: {}", String::from_utf8_lossy(&output.stderr));
        }
        log::info!("Test run finished with {:?} ({}ms)", output.status.code(), duration_ms);

        drop(workspace);

        Ok(TestRun {
            output: String::from_utf8_lossy(&output.stdout).into_owned(),
            exit_code: output.status.code(),
            duration_ms,
            workdir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_files_are_written_into_working_directory() {
        // `cat user_code.py <test file>` prints both files back.
        let harness = TestHarness::new("cat", vec!["user_code.py".to_string()], None);
        let run = harness
            .run("def double(x):\n    return 2 * x\n", "from user_code import double\n")
            .await
            .unwrap();

        assert_eq!(
            run.output,
            "def double(x):\n    return 2 * x\nfrom user_code import double\n"
        );
        assert_eq!(run.exit_code, Some(0));
        assert!(!run.workdir.exists());
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_not_an_error() {
        let harness = TestHarness::new(
            "sh",
            vec!["-c".to_string(), "echo '1 failed in 0.01s'; exit 1".to_string()],
            None,
        );
        let run = harness.run("", "").await.unwrap();

        assert_eq!(run.output, "1 failed in 0.01s\n");
        assert_eq!(run.exit_code, Some(1));
        assert!(!run.workdir.exists());
    }

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[tokio::test]
    async fn test_missing_runner_is_io_error() {
        let scratch = tempfile::tempdir().unwrap();
        let harness = TestHarness::new("definitely-not-a-test-runner-3f9a", vec![], None)
            .with_scratch_dir(scratch.path());

        assert!(matches!(harness.run("", "").await, Err(GenError::Io(_))));
        assert_eq!(entries(scratch.path()), 0);
    }

    #[tokio::test]
    async fn test_timeout() {
        let scratch = tempfile::tempdir().unwrap();
        let harness = TestHarness::new(
            "sh",
            vec!["-c".to_string(), "sleep 5".to_string()],
            Some(Duration::from_millis(200)),
        )
        .with_scratch_dir(scratch.path());
        let started = Instant::now();
        let result = harness.run("", "").await;

        match result {
            Err(e @ GenError::TestTimeout(_)) => {
                assert_eq!(e.to_string(), "Test run exceeded the 200ms limit");
            }
            other => panic!("expected a timeout, got {:?}", other.map(|run| run.output)),
        }
        assert!(started.elapsed() < Duration::from_secs(4));
        assert_eq!(entries(scratch.path()), 0);
    }

    #[tokio::test]
    async fn test_scratch_dir_from_config() {
        let scratch = tempfile::tempdir().unwrap();
        let config = RunnerConfig {
            program: "true".to_string(),
            args: vec![],
            timeout: None,
            scratch_dir: Some(scratch.path().to_path_buf()),
        };
        let run = TestHarness::from_config(&config).run("", "").await.unwrap();

        assert!(run.workdir.starts_with(scratch.path()));
        assert_eq!(entries(scratch.path()), 0);
    }

    #[tokio::test]
    async fn test_scratch_directories_are_unique_and_removed() {
        let harness = TestHarness::new("true", vec![], None);
        let first = harness.run("", "").await.unwrap();
        let second = harness.run("", "").await.unwrap();

        assert_ne!(first.workdir, second.workdir);
        assert!(!first.workdir.exists());
        assert!(!second.workdir.exists());
    }
}
