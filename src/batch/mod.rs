//! Batch orchestration: convert every WAV file in a directory concurrently
//!
//! [`BatchConverter::convert`] creates the output directory, lists the input
//! files, starts one task per file at once and waits for all of them. Each
//! task runs the [`Codec`] on tokio's blocking pool; a failing or panicking
//! conversion only affects its own [`ConversionOutcome`].

/// Input discovery
pub mod scan;
/// Task, outcome and report types
pub mod task;

pub use scan::{INPUT_EXTENSION, scan_inputs};
pub use task::{BatchReport, BatchStatus, ConversionOutcome, ConversionTask, output_path_for};

use crate::core::EncodingParameters;
use crate::error::{AudioError, AudioResult};
use crate::processor::Codec;
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{JoinHandle, JoinSet};

/// Concurrent directory-to-directory converter
pub struct BatchConverter<C: Codec> {
    codec: Arc<C>,
    parameters: Arc<EncodingParameters>,
    max_concurrency: Option<usize>,
    limiter: Option<Arc<Semaphore>>,
}

impl<C: Codec> Clone for BatchConverter<C> {
    fn clone(&self) -> Self {
        BatchConverter {
            codec: Arc::clone(&self.codec),
            parameters: Arc::clone(&self.parameters),
            max_concurrency: self.max_concurrency,
            limiter: self.limiter.clone(),
        }
    }
}

impl<C: Codec> BatchConverter<C> {
    /// Create a converter with default MP3 parameters and no concurrency cap
    pub fn new(codec: C) -> Self {
        BatchConverter {
            codec: Arc::new(codec),
            parameters: Arc::new(EncodingParameters::default()),
            max_concurrency: None,
            limiter: None,
        }
    }

    /// Cap the number of conversions in flight. `None` or `Some(0)` means unbounded.
    pub fn with_max_concurrency(mut self, limit: Option<usize>) -> Self {
        self.max_concurrency = limit.filter(|&n| n > 0);
        self.limiter = self.max_concurrency.map(|n| Arc::new(Semaphore::new(n)));
        self
    }

    /// Replace the encoding parameters
    pub fn with_parameters(mut self, parameters: EncodingParameters) -> Self {
        self.parameters = Arc::new(parameters);
        self
    }

    /// Concurrency cap, if any
    pub fn max_concurrency(&self) -> Option<usize> {
        self.max_concurrency
    }

    /// Parameters applied to every file
    pub fn parameters(&self) -> &EncodingParameters {
        &self.parameters
    }

    /// Start [`convert`](Self::convert) as its own task.
    ///
    /// The caller must await the handle to observe completion.
    pub fn spawn(&self, input_dir: PathBuf, output_dir: PathBuf) -> JoinHandle<AudioResult<BatchReport>> {
        let converter = self.clone();
        tokio::spawn(async move { converter.convert(&input_dir, &output_dir).await })
    }

    /// Convert every `.wav` file directly inside `input_dir` into `output_dir`.
    ///
    /// Fails only if `output_dir` cannot be created or `input_dir` cannot be
    /// listed. A missing input directory is reported through
    /// [`BatchStatus::InputDirectoryInvalid`]; per-file failures are in the
    /// report's outcomes.
    pub async fn convert(&self, input_dir: &Path, output_dir: &Path) -> AudioResult<BatchReport> {
        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|source| AudioError::OutputDirectory {
                path: output_dir.to_path_buf(),
                source,
            })?;

        if !scan::is_directory(input_dir).await {
            warn!(
                "Input directory {} does not exist or is not a directory",
                input_dir.display()
            );
            return Ok(BatchReport::input_invalid(input_dir));
        }

        let inputs = scan_inputs(input_dir, INPUT_EXTENSION).await?;
        info!(
            "Dispatching {} conversion(s) from {} to {} (concurrency: {})",
            inputs.len(),
            input_dir.display(),
            output_dir.display(),
            self.max_concurrency
                .map_or_else(|| "unbounded".to_string(), |n| n.to_string())
        );

        let mut tasks = JoinSet::new();
        for input in inputs {
            let task = ConversionTask::new(input, output_dir, Arc::clone(&self.parameters));
            tasks.spawn(run_task(
                Arc::clone(&self.codec),
                self.limiter.clone(),
                task,
            ));
        }

        let mut outcomes = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => error!("Conversion task lost: {}", e),
            }
        }
        outcomes.sort_by(|a, b| a.task.input.cmp(&b.task.input));

        let report = BatchReport {
            status: BatchStatus::Completed,
            outcomes,
        };
        info!(
            "Converted {} of {} file(s)",
            report.succeeded(),
            report.dispatched()
        );
        Ok(report)
    }
}

/// Run one conversion on the blocking pool and capture its result
async fn run_task<C: Codec>(
    codec: Arc<C>,
    limiter: Option<Arc<Semaphore>>,
    task: ConversionTask,
) -> ConversionOutcome {
    // Held until the blocking call returns
    let _permit = match limiter {
        Some(semaphore) => semaphore.acquire_owned().await.ok(),
        None => None,
    };

    debug!("Converting {} -> {}", task.input.display(), task.output.display());
    let job = task.clone();
    let result = tokio::task::spawn_blocking(move || {
        codec.encode(&job.input, &job.output, &job.parameters)
    })
    .await
    .unwrap_or_else(|e| Err(AudioError::TaskFailed(e.to_string())));

    match &result {
        Ok(()) => debug!("Finished {}", task.output.display()),
        Err(e) => error!("Error converting file {}: {}", task.file_name(), e),
    }

    ConversionOutcome { task, result }
}
