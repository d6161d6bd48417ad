//! Environment-driven settings.

use std::path::PathBuf;

use keepsake_orchestrator::config::ExperienceConfig;

use crate::error::AppError;

/// Everything the runner reads from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Engine configuration.
    pub experience: ExperienceConfig,
    /// Directory asset URLs resolve against.
    pub asset_dir: PathBuf,
    /// Directory downloads are written to.
    pub output_dir: PathBuf,
}

impl Settings {
    /// Reads `KEEPSAKE_CONFIG`, `KEEPSAKE_ASSET_DIR`, `KEEPSAKE_OUTPUT_DIR`
    /// and `KEEPSAKE_SEED`.
    ///
    /// # Errors
    ///
    /// Returns `AppError` if the config file cannot be read or is invalid,
    /// or the seed is not a number.
    pub async fn from_env() -> Result<Self, AppError> {
        let mut experience = match std::env::var("KEEPSAKE_CONFIG") {
            Ok(path) => {
                let document = tokio::fs::read_to_string(&path).await?;
                tracing::info!(%path, "loaded config file");
                ExperienceConfig::from_yaml(&document)?
            }
            Err(_) => ExperienceConfig::default(),
        };

        if let Ok(seed) = std::env::var("KEEPSAKE_SEED") {
            let seed = seed
                .parse()
                .map_err(|e| AppError::Config(format!("KEEPSAKE_SEED must be a u64: {e}")))?;
            experience.runner.seed = Some(seed);
        }

        let asset_dir = std::env::var("KEEPSAKE_ASSET_DIR")
            .map_or_else(|_| PathBuf::from("public"), PathBuf::from);
        let output_dir = std::env::var("KEEPSAKE_OUTPUT_DIR")
            .map_or_else(|_| PathBuf::from("output"), PathBuf::from);

        Ok(Self {
            experience,
            asset_dir,
            output_dir,
        })
    }
}
