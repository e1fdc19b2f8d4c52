use std::path::Path;

use anyhow::{Context, Result};
use rootcause_core::LocalizerConfig;
use tracing::debug;

/// Resolve the localizer config: file (or defaults), then `RCA_*` env vars,
/// then the `--beta` flag. The result is validated.
pub fn resolve(path: Option<&Path>, beta: Option<f64>) -> Result<LocalizerConfig> {
    let mut config = match path {
        Some(path) => {
            debug!("Loading localizer config from {}", path.display());
            LocalizerConfig::from_file(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?
                .with_env_overrides()
        }
        None => LocalizerConfig::from_env(),
    };

    if let Some(beta) = beta {
        config.beta = beta;
    }
    config.validate().context("invalid localizer config")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rootcause_core::ScoreBounds;
    use std::io::Write;

    #[test]
    fn defaults_without_file() {
        let config = resolve(None, None).unwrap();
        assert_eq!(config.delta_threshold, 0.95);
    }

    #[test]
    fn file_then_flag() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "beta = 0.2\ncluster_ratio = 0.4\nscore_bounds = \"unit_interval\"").unwrap();

        let config = resolve(Some(file.path()), Some(0.9)).unwrap();
        assert_eq!(config.beta, 0.9);
        assert_eq!(config.cluster_ratio, 0.4);
        assert_eq!(config.score_bounds, ScoreBounds::UnitInterval);
    }

    #[test]
    fn out_of_range_flag_is_rejected() {
        assert!(resolve(None, Some(1.5)).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(resolve(Some(&dir.path().join("absent.toml")), None).is_err());
    }
}
