//! Persisted model bundle

use crate::error::{ForecastError, Result};
use crate::models::{ModelType, TrainedModel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::info;

/// Trained model together with its label and training time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// The fitted model
    pub model: TrainedModel,
    /// Label of the model family
    pub model_type: ModelType,
    /// When the model was trained
    pub timestamp: DateTime<Utc>,
}

impl ModelArtifact {
    /// Bundle a model stamped with the current time
    pub fn new(model: TrainedModel) -> Self {
        Self::with_timestamp(model, Utc::now())
    }

    /// Bundle a model with an explicit training time
    pub fn with_timestamp(model: TrainedModel, timestamp: DateTime<Utc>) -> Self {
        Self {
            model_type: model.model_type(),
            model,
            timestamp,
        }
    }

    /// Write the artifact as JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, self)?;

        info!(path = %path.display(), model_type = %self.model_type, "saved model artifact");
        Ok(())
    }

    /// Read an artifact written by [`ModelArtifact::save`].
    ///
    /// A missing file is reported as [`ForecastError::DataNotFound`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ForecastError::DataNotFound(path.display().to_string()));
        }

        let reader = BufReader::new(File::open(path)?);
        let artifact: Self = serde_json::from_reader(reader)?;

        if artifact.model.model_type() != artifact.model_type {
            return Err(ForecastError::ModelError(format!(
                "Artifact is labelled {} but contains a {} model",
                artifact.model_type,
                artifact.model.model_type()
            )));
        }

        info!(path = %path.display(), model_type = %artifact.model_type, "loaded model artifact");
        Ok(artifact)
    }

    /// Training time as an ISO-8601 string
    pub fn timestamp_iso(&self) -> String {
        self.timestamp.to_rfc3339()
    }
}
