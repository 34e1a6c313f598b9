pub mod model;

pub use model::*;

use serde::{Deserialize, Serialize};

use crate::data::SyntheticSpec;
use crate::error::{Error, Result};

/// Environment variables override file values, e.g. `NUMEROX__MODEL__DEPTH=5`
pub const ENV_PREFIX: &str = "NUMEROX";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub data: DataConfig,
}

/// Shape of the generated fit/predict pair used by `run`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub fit_rows: usize,
    pub predict_rows: usize,
    pub n_features: usize,
    pub signal: f64,
    pub seed: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        let synthetic = SyntheticSpec::default();
        Self {
            fit_rows: 2000,
            predict_rows: 1000,
            n_features: synthetic.n_features,
            signal: synthetic.signal,
            seed: synthetic.seed,
        }
    }
}

impl DataConfig {
    pub fn synthetic(&self) -> SyntheticSpec {
        SyntheticSpec {
            n_features: self.n_features,
            signal: self.signal,
            seed: self.seed,
        }
    }
}

impl AppConfig {
    /// Read `path` (optional, any format the `config` crate knows) then apply
    /// `NUMEROX__` environment overrides.
    pub fn load(path: &str) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::with_name(path).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;
        settings
            .try_deserialize()
            .map_err(|e| Error::Config(e.to_string()))
    }

    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.data.fit_rows == 0 {
            errors.push("data: fit_rows must be > 0".to_string());
        }
        if self.data.predict_rows == 0 {
            errors.push("data: predict_rows must be > 0".to_string());
        }
        if self.data.n_features == 0 {
            errors.push("data: n_features must be > 0".to_string());
        }
        if !self.data.signal.is_finite() {
            errors.push("data: signal must be finite".to_string());
        }

        self.model.validate(self.data.n_features, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExtraTrees, Logistic};

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.model, ModelConfig::ExtraTrees(ExtraTrees::default()));
        assert_eq!(config.data.n_features, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_round_trip() {
        let text = r#"
            [model]
            kind = "logistic"
            inverse_l2 = 0.01

            [data]
            fit_rows = 500
            seed = 7
        "#;
        let config: AppConfig = toml::from_str(text).unwrap();
        assert_eq!(config.model, ModelConfig::Logistic(Logistic::new(0.01)));
        assert_eq!(config.data.fit_rows, 500);
        assert_eq!(config.data.predict_rows, 1000);
        assert_eq!(config.data.synthetic().seed, 7);

        let written = toml::to_string(&config).unwrap();
        assert_eq!(toml::from_str::<AppConfig>(&written).unwrap(), config);
    }

    #[test]
    fn test_config_crate_source() {
        let text = "[model]\nkind = \"fifty\"\n\n[data]\nn_features = 4\n";
        let config: AppConfig = ::config::Config::builder()
            .add_source(::config::File::from_str(text, ::config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.model, ModelConfig::Fifty);
        assert_eq!(config.data.n_features, 4);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::load("does-not-exist/numerox").unwrap();
        assert_eq!(config.data.fit_rows, DataConfig::default().fit_rows);
    }

    #[test]
    fn test_validate_reports_everything() {
        let mut config = AppConfig::default();
        config.data.fit_rows = 0;
        config.data.n_features = 5;
        let errors = config.validate().unwrap_err();
        // fit_rows plus extratrees nfeatures (7 > 5)
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.contains("fit_rows")));
        assert!(errors.iter().any(|e| e.contains("nfeatures")));
    }
}
