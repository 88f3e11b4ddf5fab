use thiserror::Error;

use crate::config::ConfigError;
use crate::descriptor::DescriptorError;
use crate::graph::ops::CycleError;

#[derive(Debug, Error)]
pub enum CadenceError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("descriptor error: {0}")]
    Descriptor(#[from] DescriptorError),
    #[error("{0}")]
    Cycle(#[from] CycleError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CadenceError>;
