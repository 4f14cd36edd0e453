//! CSV loading, validation, and result artifacts for the sylva pipeline.

mod domain;
mod error;
mod reader;
mod writer;

pub use domain::ExperimentName;
pub use error::IoError;
pub use reader::TableReader;
pub use writer::{ResultWriter, TreeArtifacts};
