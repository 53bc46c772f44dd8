use crate::core::EncodingParameters;
use crate::error::AudioResult;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Output location for `input`: same stem, the format's extension, inside `output_dir`
pub fn output_path_for(input: &Path, output_dir: &Path, params: &EncodingParameters) -> PathBuf {
    // "song.v2.wav" -> "song.v2.mp3"
    let mut name = input.file_stem().unwrap_or(input.as_os_str()).to_os_string();
    name.push(".");
    name.push(params.extension());
    output_dir.join(name)
}

/// One file to convert
#[derive(Debug, Clone)]
pub struct ConversionTask {
    /// Source file
    pub input: PathBuf,
    /// Destination file
    pub output: PathBuf,
    /// Shared, read-only encoding settings
    pub parameters: Arc<EncodingParameters>,
}

impl ConversionTask {
    /// Pair `input` with its destination inside `output_dir`
    pub fn new(input: PathBuf, output_dir: &Path, parameters: Arc<EncodingParameters>) -> Self {
        let output = output_path_for(&input, output_dir, &parameters);
        ConversionTask {
            input,
            output,
            parameters,
        }
    }

    /// Input file name for diagnostics
    pub fn file_name(&self) -> String {
        self.input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.input.display().to_string())
    }
}

/// Result of running one [`ConversionTask`]
#[derive(Debug)]
pub struct ConversionOutcome {
    /// The task that ran
    pub task: ConversionTask,
    /// `Ok` on success, otherwise the error that stopped this file
    pub result: AudioResult<()>,
}

impl ConversionOutcome {
    /// Whether the file converted
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// How a batch run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchStatus {
    /// Every discovered file was dispatched and joined
    Completed,
    /// The input path is missing or not a directory; nothing was dispatched
    InputDirectoryInvalid(PathBuf),
}

/// Per-file outcomes of a batch run
#[derive(Debug)]
pub struct BatchReport {
    /// Run status
    pub status: BatchStatus,
    /// One entry per dispatched task, ordered by input path
    pub outcomes: Vec<ConversionOutcome>,
}

impl BatchReport {
    pub(crate) fn input_invalid(path: &Path) -> Self {
        BatchReport {
            status: BatchStatus::InputDirectoryInvalid(path.to_path_buf()),
            outcomes: Vec::new(),
        }
    }

    /// Number of tasks dispatched
    pub fn dispatched(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of files converted successfully
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Outcomes of files that failed
    pub fn failures(&self) -> impl Iterator<Item = &ConversionOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }
}
