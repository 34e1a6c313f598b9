//! Thin model adapters over linfa-backed estimators, with reproducible run
//! fingerprints and lookups for the tournament registry.
//!
//! ```no_run
//! use numerox::data::SyntheticSpec;
//! use numerox::models::{ExtraTrees, Model};
//!
//! let (dfit, dpre) = SyntheticSpec::default().pair(1000, 200)?;
//! let model = ExtraTrees::default();
//! let prediction = model.fit_predict(&dfit, &dpre)?;
//! println!("{} {}", model, model.hash(&dfit, &dpre));
//! # Ok::<(), numerox::Error>(())
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod estimators;
pub mod metrics;
pub mod models;
pub mod util;

pub use data::{Data, Dataset};
pub use error::{Error, Result};
pub use models::{Fingerprint, Model, ModelKind, Prediction};
