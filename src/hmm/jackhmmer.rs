use crate::utils::{Error, Result};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug, Clone)]
pub struct JackhmmerParams {
    pub binary: PathBuf,
    pub database: PathBuf,
    pub threads: usize,
    pub iterations: usize,
    pub evalue: f64,
    pub dom_evalue: f64,
    pub timeout: Option<Duration>,
}

impl JackhmmerParams {
    pub fn new(binary: PathBuf, database: PathBuf, threads: usize) -> Self {
        Self {
            binary,
            database,
            threads,
            iterations: 2,
            evalue: 1e-5,
            dom_evalue: 1e-5,
            timeout: None,
        }
    }

    fn args(&self, query: &Path, checkpoint_prefix: &Path) -> Vec<String> {
        vec![
            "--cpu".into(),
            self.threads.to_string(),
            "-o".into(),
            "/dev/null".into(),
            "-N".into(),
            self.iterations.to_string(),
            "-E".into(),
            self.evalue.to_string(),
            "--domE".into(),
            self.dom_evalue.to_string(),
            "--noali".into(),
            "--chkhmm".into(),
            checkpoint_prefix.display().to_string(),
            query.display().to_string(),
            self.database.display().to_string(),
        ]
    }
}

/// Runs jackhmmer on `query`, writing `<checkpoint_prefix>-<N>.hmm` profiles.
/// Blocks until the search completes or the timeout expires.
pub fn run_jackhmmer(params: &JackhmmerParams, query: &Path, checkpoint_prefix: &Path) -> Result<()> {
    if !params.database.exists() {
        return Err(Error::NotFound(format!(
            "jackhmmer target database {}",
            params.database.display()
        )));
    }

    let log_path = PathBuf::from(format!("{}.jackhmmer.log", checkpoint_prefix.display()));
    let log_file = File::create(&log_path)?;
    let args = params.args(query, checkpoint_prefix);
    log::info!("jackhmmer - started");
    log::debug!("{} {}", params.binary.display(), args.join(" "));

    let mut child = Command::new(&params.binary)
        .args(&args)
        .stdout(Stdio::null())
        .stderr(Stdio::from(log_file))
        .spawn()
        .map_err(|e| {
            Error::ExternalTool(format!(
                "Failed to run {}: {}",
                params.binary.display(),
                e
            ))
        })?;

    let started = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if let Some(timeout) = params.timeout {
            if started.elapsed() >= timeout {
                let _ = child.kill();
                let _ = child.wait();
                return Err(Error::TimedOut(format!(
                    "jackhmmer did not finish within {} seconds",
                    timeout.as_secs()
                )));
            }
        }
        thread::sleep(POLL_INTERVAL);
    };

    if !status.success() {
        return Err(Error::ExternalTool(format!(
            "jackhmmer failed (exit code: {:?}). See {}",
            status.code(),
            log_path.display()
        )));
    }

    let first_profile = PathBuf::from(format!("{}-1.hmm", checkpoint_prefix.display()));
    if !first_profile.exists() {
        return Err(Error::ExternalTool(format!(
            "jackhmmer finished but did not write {}",
            first_profile.display()
        )));
    }
    log::info!("jackhmmer - done in {:.1}s", started.elapsed().as_secs_f64());
    Ok(())
}
