//! CLI Command Implementations
//!
//! Every file is encoded on its own worker: one task per worker lifetime.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::WorkerConfig;
use crate::encoder::{default_encoder, MockSilkEncoder, SilkEncoder};
use crate::error::{Result, SilkWorkerError};
use crate::task::{EncodeResult, EncodeTask};
use crate::worker::encode_once;

const INPUT_EXTENSIONS: [&str; 2] = ["wav", "pcm"];

/// Outcome of a batch run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub encoded: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

/// Config from `path` if given, otherwise defaults plus environment.
pub fn load_config(path: Option<&Path>) -> Result<WorkerConfig> {
    match path {
        Some(path) => WorkerConfig::load(path),
        None => {
            let config = WorkerConfig::from_env();
            config.validate()?;
            Ok(config)
        }
    }
}

pub fn select_encoder(config: &WorkerConfig, mock: bool) -> Arc<dyn SilkEncoder> {
    if mock {
        Arc::new(MockSilkEncoder::with_config(config.encoder.clone()))
    } else {
        default_encoder(&config.encoder)
    }
}

/// Default output location: the input path with a `.silk` extension
pub fn output_path_for(input: &Path) -> PathBuf {
    input.with_extension("silk")
}

/// Read `input`, encode it on a fresh worker, write the stream to `output`.
pub async fn encode_file(
    input: &Path,
    output: &Path,
    sample_rate: u32,
    encoder: Arc<dyn SilkEncoder>,
    config: &WorkerConfig,
) -> Result<EncodeResult> {
    if !input.exists() {
        return Err(SilkWorkerError::FileNotFound {
            path: input.to_path_buf(),
        });
    }

    let bytes = tokio::fs::read(input).await?;
    let result = encode_once(encoder, config, EncodeTask::new(bytes, sample_rate))
        .await?
        .into_result()?;

    tokio::fs::write(output, &result.data).await?;
    Ok(result)
}

/// Encode a single file.
pub async fn encode(
    input: &Path,
    output: Option<&Path>,
    sample_rate: u32,
    mock: bool,
    config: &WorkerConfig,
) -> Result<()> {
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| output_path_for(input));
    info!("Encoding {} -> {}", input.display(), output.display());

    let encoder = select_encoder(config, mock);
    let result = encode_file(input, &output, sample_rate, encoder, config).await?;

    println!(
        "Encoded {} ({} ms, {} bytes)",
        output.display(),
        result.duration,
        result.data.len()
    );
    Ok(())
}

/// `.wav` and `.pcm` files under `dir`, sorted
pub fn collect_inputs(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(SilkWorkerError::FileNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut inputs: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("skipping unreadable entry under {}: {}", dir.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| INPUT_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect();
    inputs.sort();
    Ok(inputs)
}

/// Encode every input under `dir` next to its source.
///
/// A file with bad input is reported and skipped. Errors that mean workers
/// cannot run at all stop the batch.
pub async fn batch(
    dir: &Path,
    sample_rate: u32,
    mock: bool,
    config: &WorkerConfig,
) -> Result<BatchSummary> {
    let inputs = collect_inputs(dir)?;
    info!("Found {} input files in {}", inputs.len(), dir.display());

    let encoder = select_encoder(config, mock);
    let mut summary = BatchSummary::default();

    for input in inputs {
        let output = output_path_for(&input);
        match encode_file(&input, &output, sample_rate, Arc::clone(&encoder), config).await {
            Ok(result) => {
                println!("{}: {} ms", output.display(), result.duration);
                summary.encoded.push(output);
            }
            Err(e) if !e.is_recoverable() => return Err(e),
            Err(e) => {
                warn!("{}: {}", input.display(), e);
                summary.failed.push((input, e.to_string()));
            }
        }
    }

    println!(
        "Encoded {} files, {} failed",
        summary.encoded.len(),
        summary.failed.len()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_output_path_for() {
        assert_eq!(
            output_path_for(Path::new("/tmp/voice.wav")),
            PathBuf::from("/tmp/voice.silk")
        );
    }

    #[test]
    fn test_collect_inputs_filters_extensions() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.PCM"), [0u8; 2]).unwrap();
        fs::write(dir.path().join("a.wav"), [0u8; 2]).unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/c.pcm"), [0u8; 2]).unwrap();

        let inputs = collect_inputs(dir.path()).unwrap();
        let names: Vec<_> = inputs
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a.wav"),
                PathBuf::from("b.PCM"),
                PathBuf::from("nested/c.pcm"),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_collect_inputs_skips_unreadable_dir() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.wav"), [0u8; 2]).unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let inputs = collect_inputs(dir.path());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(inputs.unwrap(), vec![dir.path().join("a.wav")]);
    }

    #[test]
    fn test_collect_inputs_missing_dir() {
        let err = collect_inputs(Path::new("/nonexistent/silkworker")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_NOT_FOUND");
    }
}
