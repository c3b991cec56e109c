//! The persisted model artifact.
//!
//! An [`Artifact`] bundles everything serving needs: the fitted regressor, the
//! fitted scaler and the ordered feature names they were trained on, plus
//! descriptive metadata. The feature order exists only here; the predictor
//! reads it from the artifact and never keeps a second copy.
//!
//! # File format
//!
//! A single bincode blob (see [`crate::serialization`]):
//!
//! ```text
//! magic "HPRA" | schema_version: u32 | payload
//! ```
//!
//! The header is checked before the payload is decoded, so an artifact from a
//! different schema version is reported as such rather than as a generic
//! decode error. After decoding, the payload is validated structurally
//! (matching dimensions, finite numbers, unique feature names).
//!
//! Saving writes to a temporary file in the target directory and renames it
//! over the destination, so readers never observe a partially written
//! artifact.

use crate::error::ArtifactError;
use crate::model::{Fitted, InferenceModel, LinearModel, SerializableLinearParams};
use crate::preprocessing::{
    FittedStandardScaler, FittedTransformer, PreprocessingError, StandardScalerParams,
};
use crate::serialization::SerializableParams;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

/// File signature.
pub const ARTIFACT_MAGIC: [u8; 4] = *b"HPRA";

/// Version of the payload layout. Bump on any change to the serialized types.
pub const SCHEMA_VERSION: u32 = 1;

/// Encoded size of [`ArtifactHeader`]: 4 magic bytes + fixed-width u32.
const HEADER_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct ArtifactHeader {
    magic: [u8; 4],
    schema_version: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ArtifactPayload {
    regressor: SerializableLinearParams,
    scaler: StandardScalerParams,
    feature_names: Vec<String>,
    metadata: ArtifactMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ArtifactFile {
    header: ArtifactHeader,
    payload: ArtifactPayload,
}

/// Descriptive information recorded at training time.
///
/// Not used by inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// Name of the target column the model predicts.
    pub target: String,
    pub train_rows: usize,
    pub test_rows: usize,
    /// R² on the evaluation partition; `None` when undefined.
    pub r2_score: Option<f64>,
    /// Seconds since the Unix epoch.
    pub created_at: u64,
}

impl ArtifactMetadata {
    /// Creates metadata stamped with the current time.
    pub fn new(
        target: impl Into<String>,
        train_rows: usize,
        test_rows: usize,
        r2_score: Option<f64>,
    ) -> Self {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            target: target.into(),
            train_rows,
            test_rows,
            r2_score,
            created_at,
        }
    }
}

/// Fitted regressor, fitted scaler and the feature order they share.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    regressor: LinearModel<Fitted>,
    scaler: FittedStandardScaler,
    feature_names: Vec<String>,
    metadata: ArtifactMetadata,
}

impl Artifact {
    /// Bundles fitted components, checking that they agree with each other.
    ///
    /// # Errors
    /// [`PreprocessingError::InvalidParameter`] if the feature list is empty,
    /// contains blank or duplicate names, or if its length differs from the
    /// scaler's or the regressor's feature count.
    pub fn new(
        regressor: LinearModel<Fitted>,
        scaler: FittedStandardScaler,
        feature_names: Vec<String>,
        metadata: ArtifactMetadata,
    ) -> Result<Self, PreprocessingError> {
        if feature_names.is_empty() {
            return Err(PreprocessingError::InvalidParameter(
                "artifact has no feature names".to_string(),
            ));
        }
        if feature_names.iter().any(|n| n.trim().is_empty()) {
            return Err(PreprocessingError::InvalidParameter(
                "artifact contains a blank feature name".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = feature_names.iter().find(|n| !seen.insert(n.as_str())) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "feature '{dup}' appears more than once"
            )));
        }
        if scaler.n_features_in() != feature_names.len()
            || regressor.n_features() != feature_names.len()
        {
            return Err(PreprocessingError::InvalidParameter(format!(
                "{} feature names, scaler expects {}, regressor expects {}",
                feature_names.len(),
                scaler.n_features_in(),
                regressor.n_features()
            )));
        }

        Ok(Self {
            regressor,
            scaler,
            feature_names,
            metadata,
        })
    }

    pub fn regressor(&self) -> &LinearModel<Fitted> {
        &self.regressor
    }

    pub fn scaler(&self) -> &FittedStandardScaler {
        &self.scaler
    }

    /// Feature names in the order the scaler and regressor expect them.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    pub fn metadata(&self) -> &ArtifactMetadata {
        &self.metadata
    }

    /// Encodes the artifact with its header.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        ArtifactFile {
            header: ArtifactHeader {
                magic: ARTIFACT_MAGIC,
                schema_version: SCHEMA_VERSION,
            },
            payload: ArtifactPayload {
                regressor: self.regressor.extract_params(),
                scaler: self.scaler.extract_params(),
                feature_names: self.feature_names.clone(),
                metadata: self.metadata.clone(),
            },
        }
        .to_bytes()
    }

    /// Decodes and validates an artifact; the error is a human-readable reason.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, String> {
        if bytes.is_empty() {
            return Err("file is empty".to_string());
        }
        if bytes.len() < HEADER_LEN {
            return Err(format!("file is truncated ({} bytes)", bytes.len()));
        }

        let header = ArtifactHeader::from_bytes(&bytes[..HEADER_LEN])
            .map_err(|e| format!("unreadable header: {e}"))?;
        if header.magic != ARTIFACT_MAGIC {
            return Err("not a model artifact (bad signature)".to_string());
        }
        if header.schema_version != SCHEMA_VERSION {
            return Err(format!(
                "unsupported schema version {} (expected {SCHEMA_VERSION})",
                header.schema_version
            ));
        }

        let file = ArtifactFile::from_bytes(bytes).map_err(|e| format!("malformed payload: {e}"))?;
        let payload = file.payload;

        let regressor = LinearModel::<Fitted>::from_params(payload.regressor)
            .map_err(|e| format!("invalid regressor: {e}"))?;
        let scaler = FittedStandardScaler::from_params(payload.scaler)
            .map_err(|e| format!("invalid scaler: {e}"))?;

        Artifact::new(regressor, scaler, payload.feature_names, payload.metadata)
            .map_err(|e| e.to_string())
    }
}

/// Writes `artifact` to `path`, replacing any existing file atomically.
///
/// # Errors
/// [`ArtifactError::Write`] if encoding, writing, syncing or renaming fails.
/// The temporary file is removed on failure. Concurrent saves to the same
/// path each publish a complete artifact; the last rename wins.
pub fn save_artifact<P: AsRef<Path>>(artifact: &Artifact, path: P) -> Result<(), ArtifactError> {
    let path = path.as_ref();
    let write_error = |reason: String| ArtifactError::Write {
        path: path.to_path_buf(),
        reason,
    };

    let bytes = artifact.to_bytes().map_err(|e| write_error(e.to_string()))?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| write_error(e.to_string()))?;

    // Each save gets its own temp file; it is removed on drop if never persisted.
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "artifact".to_string());
    let mut tmp = tempfile::Builder::new()
        .prefix(&format!(".{name}."))
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| write_error(e.to_string()))?;
    tmp.write_all(&bytes)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| write_error(e.to_string()))?;
    tmp.persist(path).map_err(|e| write_error(e.error.to_string()))?;

    info!(
        path = %path.display(),
        bytes = bytes.len(),
        features = ?artifact.feature_names(),
        "saved model artifact"
    );
    Ok(())
}

/// Reads and validates the artifact at `path`.
///
/// # Errors
/// - [`ArtifactError::Missing`] if no file exists at `path`.
/// - [`ArtifactError::Unreadable`] if it exists but cannot be read.
/// - [`ArtifactError::Corrupt`] if it is empty, truncated, of another format or
///   schema version, or structurally inconsistent.
pub fn load_artifact<P: AsRef<Path>>(path: P) -> Result<Artifact, ArtifactError> {
    let path = path.as_ref();

    let bytes = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ArtifactError::Missing {
            path: path.to_path_buf(),
        },
        _ => ArtifactError::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        },
    })?;

    let artifact = Artifact::from_bytes(&bytes).map_err(|reason| ArtifactError::Corrupt {
        path: path.to_path_buf(),
        reason,
    })?;

    debug!(
        path = %path.display(),
        features = ?artifact.feature_names(),
        "loaded model artifact"
    );
    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::linear::LinearParams;
    use ndarray::array;

    fn sample_artifact() -> Artifact {
        let regressor = LinearModel::<Fitted>::new(LinearParams {
            weights: array![120.5, -3.25, 7.0, 0.125],
            bias: 540_000.0,
        });
        let scaler = FittedStandardScaler::from_params(StandardScalerParams {
            mean: vec![2080.0, 3.37, 2.11, 1971.0],
            std: vec![918.4, 0.93, 0.77, 29.37],
        })
        .unwrap();
        let features = ["sqft_living", "bedrooms", "bathrooms", "yr_built"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        Artifact::new(
            regressor,
            scaler,
            features,
            ArtifactMetadata::new("price", 80, 20, Some(0.61)),
        )
        .unwrap()
    }

    #[test]
    fn test_save_load_roundtrip_is_exact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("house_data.bin");
        let artifact = sample_artifact();

        save_artifact(&artifact, &path).unwrap();
        let loaded = load_artifact(&path).unwrap();

        assert_eq!(loaded, artifact);
        assert_eq!(loaded.regressor().weights(), artifact.regressor().weights());
        assert_eq!(loaded.scaler().mean(), artifact.scaler().mean());
        assert_eq!(loaded.scaler().std(), artifact.scaler().std());
        assert_eq!(
            loaded.feature_names(),
            &["sqft_living", "bedrooms", "bathrooms", "yr_built"]
        );
    }

    #[test]
    fn test_save_overwrites_in_full_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");
        fs::write(&path, vec![0xAB; 4096]).unwrap();

        let artifact = sample_artifact();
        save_artifact(&artifact, &path).unwrap();

        assert_eq!(load_artifact(&path).unwrap(), artifact);
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_concurrent_saves_never_expose_partial_artifact() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::thread;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");
        let artifact = sample_artifact();
        save_artifact(&artifact, &path).unwrap();

        let done = AtomicBool::new(false);
        let (write_errors, bad_reads) = thread::scope(|s| {
            let writers: Vec<_> = (0..4)
                .map(|_| {
                    s.spawn(|| {
                        (0..50)
                            .filter(|_| save_artifact(&artifact, &path).is_err())
                            .count()
                    })
                })
                .collect();
            let reader = s.spawn(|| {
                let mut bad = 0;
                while !done.load(Ordering::Acquire) {
                    if load_artifact(&path).ok().as_ref() != Some(&artifact) {
                        bad += 1;
                    }
                }
                bad
            });
            let write_errors: usize = writers.into_iter().map(|h| h.join().unwrap()).sum();
            done.store(true, Ordering::Release);
            (write_errors, reader.join().unwrap())
        });

        assert_eq!(write_errors, 0);
        assert_eq!(bad_reads, 0);
        assert_eq!(load_artifact(&path).unwrap(), artifact);
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models").join("v1").join("model.bin");
        save_artifact(&sample_artifact(), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_artifact(dir.path().join("absent.bin"));
        assert!(matches!(result, Err(ArtifactError::Missing { .. })));
    }

    #[test]
    fn test_load_directory_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_artifact(dir.path());
        assert!(matches!(result, Err(ArtifactError::Unreadable { .. })));
    }

    #[test]
    fn test_load_zero_bytes_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");
        save_artifact(&sample_artifact(), &path).unwrap();
        fs::File::create(&path).unwrap().set_len(0).unwrap();

        let result = load_artifact(&path);
        assert!(matches!(
            result,
            Err(ArtifactError::Corrupt { ref reason, .. }) if reason.contains("empty")
        ));
    }

    #[test]
    fn test_load_truncated_is_corrupt() {
        let bytes = sample_artifact().to_bytes().unwrap();
        for cut in [3, HEADER_LEN, bytes.len() / 2, bytes.len() - 1] {
            assert!(
                Artifact::from_bytes(&bytes[..cut]).is_err(),
                "truncation at {cut} was accepted"
            );
        }
    }

    #[test]
    fn test_load_trailing_garbage_is_corrupt() {
        let mut bytes = sample_artifact().to_bytes().unwrap();
        bytes.push(0);
        assert!(Artifact::from_bytes(&bytes).is_err());
    }

    #[test]
    fn test_bad_signature_is_rejected() {
        let mut bytes = sample_artifact().to_bytes().unwrap();
        bytes[0] = b'X';
        let reason = Artifact::from_bytes(&bytes).unwrap_err();
        assert!(reason.contains("signature"));
    }

    #[test]
    fn test_other_schema_version_is_rejected() {
        let mut bytes = sample_artifact().to_bytes().unwrap();
        bytes[4..8].copy_from_slice(&(SCHEMA_VERSION + 1).to_le_bytes());
        let reason = Artifact::from_bytes(&bytes).unwrap_err();
        assert!(reason.contains("schema version"));
    }

    #[test]
    fn test_inconsistent_payload_is_rejected() {
        let file = ArtifactFile {
            header: ArtifactHeader {
                magic: ARTIFACT_MAGIC,
                schema_version: SCHEMA_VERSION,
            },
            payload: ArtifactPayload {
                regressor: SerializableLinearParams {
                    weights: vec![1.0, 2.0],
                    bias: 0.0,
                },
                scaler: StandardScalerParams {
                    mean: vec![0.0, 0.0, 0.0],
                    std: vec![1.0, 1.0, 1.0],
                },
                feature_names: vec!["a".into(), "b".into(), "c".into()],
                metadata: ArtifactMetadata::new("price", 1, 1, None),
            },
        };
        let bytes = file.to_bytes().unwrap();
        assert!(Artifact::from_bytes(&bytes).is_err());
    }

    #[test]
    fn test_new_rejects_duplicate_feature_names() {
        let a = sample_artifact();
        let result = Artifact::new(
            a.regressor().clone(),
            a.scaler().clone(),
            vec!["x".into(), "y".into(), "x".into(), "z".into()],
            a.metadata().clone(),
        );
        assert!(result.is_err());
    }
}
