//! wav2mp3 Command Line Interface
//!
//! Converts every WAV file in one directory to MP3 in another, concurrently.

use clap::Parser;
use log::{error, info};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};
use wav2mp3::{AudioError, AudioResult, BatchConverter, BatchReport, BatchStatus, Mp3Transcoder};

const INPUT_PROMPT: &str = "What WAV files do you want to convert? (Path to directory):";
const OUTPUT_PROMPT: &str = "Where would you like your MP3 files to end up? (Path to directory):";

#[derive(Parser)]
#[command(name = "wav2mp3")]
#[command(about = "Batch convert a directory of WAV files to MP3", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory holding the WAV files (asked for when omitted)
    #[arg(short, long, value_name = "DIR")]
    input: Option<PathBuf>,

    /// Directory the MP3 files are written to (asked for when omitted)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Maximum number of simultaneous conversions, 0 for no limit
    #[arg(short, long, env = "WAV2MP3_JOBS", value_name = "N")]
    jobs: Option<usize>,
}

/// Print `prompt` and read one directory path from `reader`
fn prompt_path<R: BufRead>(prompt: &str, reader: &mut R) -> AudioResult<PathBuf> {
    println!("{}", prompt);
    io::stdout().flush()?;

    let mut line = String::new();
    reader.read_line(&mut line)?;
    let answer = line.trim();
    if answer.is_empty() {
        return Err(AudioError::ConfigError("no directory given".to_string()));
    }
    Ok(PathBuf::from(answer))
}

/// Take each directory from its flag, or ask for it on stdin
fn resolve_directories(cli: &Cli) -> AudioResult<(PathBuf, PathBuf)> {
    let mut stdin = io::stdin().lock();
    let input = match &cli.input {
        Some(dir) => dir.clone(),
        None => prompt_path(INPUT_PROMPT, &mut stdin)?,
    };
    let output = match &cli.output {
        Some(dir) => dir.clone(),
        None => prompt_path(OUTPUT_PROMPT, &mut stdin)?,
    };
    Ok((input, output))
}

/// Write the user-facing summary of a finished batch
fn print_report<W: Write>(report: &BatchReport, elapsed: Duration, out: &mut W) -> io::Result<()> {
    match &report.status {
        BatchStatus::InputDirectoryInvalid(_) => {
            writeln!(out, "Input directory does not exist or is not a directory.")?;
        }
        BatchStatus::Completed => {
            for failure in report.failures() {
                if let Err(e) = &failure.result {
                    writeln!(out, "Error converting file {}: {}", failure.task.file_name(), e)?;
                }
            }
            writeln!(
                out,
                "Converted {} of {} files",
                report.succeeded(),
                report.dispatched()
            )?;
        }
    }

    writeln!(out, "Completed in {} ms", elapsed.as_millis())
}

async fn run(
    converter: BatchConverter<Mp3Transcoder>,
    input: PathBuf,
    output: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let started = Instant::now();
    let report = converter.spawn(input, output).await??;
    print_report(&report, started.elapsed(), &mut io::stdout().lock())?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    info!("wav2mp3 {}", wav2mp3::VERSION);

    let (input, output) = match resolve_directories(&cli) {
        Ok(dirs) => dirs,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let converter = BatchConverter::new(Mp3Transcoder::new()).with_max_concurrency(cli.jobs);

    let result: Result<(), Box<dyn std::error::Error>> = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(Into::into)
        .and_then(|runtime| runtime.block_on(run(converter, input, output)));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::Path;
    use std::sync::Arc;
    use wav2mp3::{ConversionOutcome, ConversionTask, EncodingParameters};

    fn outcome(name: &str, result: AudioResult<()>) -> ConversionOutcome {
        let task = ConversionTask::new(
            Path::new("in").join(name),
            Path::new("out"),
            Arc::new(EncodingParameters::default()),
        );
        ConversionOutcome { task, result }
    }

    fn render(report: &BatchReport) -> String {
        let mut out = Vec::new();
        print_report(report, Duration::from_millis(42), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_prompt_reads_one_line() {
        let mut reader = Cursor::new("/tmp/wavs\n/tmp/mp3s\n");
        assert_eq!(
            prompt_path(INPUT_PROMPT, &mut reader).unwrap(),
            PathBuf::from("/tmp/wavs")
        );
        assert_eq!(
            prompt_path(OUTPUT_PROMPT, &mut reader).unwrap(),
            PathBuf::from("/tmp/mp3s")
        );
    }

    #[test]
    fn test_prompt_strips_crlf() {
        let mut reader = Cursor::new("C:\\audio\r\n");
        assert_eq!(
            prompt_path(INPUT_PROMPT, &mut reader).unwrap(),
            PathBuf::from("C:\\audio")
        );
    }

    #[test]
    fn test_prompt_at_eof_is_an_error() {
        let mut reader = Cursor::new("");
        assert!(matches!(
            prompt_path(INPUT_PROMPT, &mut reader),
            Err(AudioError::ConfigError(_))
        ));
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from(["wav2mp3", "-i", "in", "-o", "out", "--jobs", "4"]);
        assert_eq!(cli.input, Some(PathBuf::from("in")));
        assert_eq!(cli.output, Some(PathBuf::from("out")));
        assert_eq!(cli.jobs, Some(4));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_report_lists_each_failure() {
        let report = BatchReport {
            status: BatchStatus::Completed,
            outcomes: vec![
                outcome("a.wav", Ok(())),
                outcome(
                    "bad.wav",
                    Err(AudioError::UnsupportedFormat("no header".to_string())),
                ),
                outcome("b.wav", Ok(())),
            ],
        };

        assert_eq!(
            render(&report),
            "Error converting file bad.wav: Unsupported audio format: no header\n\
             Converted 2 of 3 files\n\
             Completed in 42 ms\n"
        );
    }

    #[test]
    fn test_report_for_invalid_input_directory() {
        let report = BatchReport {
            status: BatchStatus::InputDirectoryInvalid(PathBuf::from("missing")),
            outcomes: Vec::new(),
        };

        assert_eq!(
            render(&report),
            "Input directory does not exist or is not a directory.\nCompleted in 42 ms\n"
        );
    }

    #[test]
    fn test_timing_line_printed_once() {
        let report = BatchReport {
            status: BatchStatus::Completed,
            outcomes: vec![outcome("a.wav", Ok(())), outcome("b.wav", Ok(()))],
        };

        let text = render(&report);
        assert_eq!(text.matches("Completed in ").count(), 1);
        assert!(text.ends_with("Completed in 42 ms\n"));
        assert!(!text.contains("Error converting file"));
    }

    #[tokio::test]
    async fn test_output_directory_failure_is_returned_once() {
        let dir = tempfile::TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"").unwrap();

        let converter = BatchConverter::new(Mp3Transcoder::new());
        let err = run(converter, dir.path().to_path_buf(), blocker.join("out"))
            .await
            .unwrap_err();

        assert!(err.to_string().starts_with("Cannot create output directory"));
    }
}
