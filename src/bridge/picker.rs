use async_trait::async_trait;

use crate::utils::ConverterResult;

/// What a file dialog returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerSelection {
    Cancelled,
    Single(String),
    Multiple(Vec<String>),
}

impl PickerSelection {
    /// Normalises every shape of selection to a list.
    pub fn into_paths(self) -> Vec<String> {
        match self {
            Self::Cancelled => Vec::new(),
            Self::Single(path) => vec![path],
            Self::Multiple(paths) => paths,
        }
    }
}

impl From<Option<Vec<String>>> for PickerSelection {
    fn from(value: Option<Vec<String>>) -> Self {
        value.map_or(Self::Cancelled, Self::Multiple)
    }
}

/// Multi-select file dialog filtered to the supported image extensions.
#[async_trait]
pub trait FilePicker: Send + Sync {
    async fn pick_images(&self) -> ConverterResult<PickerSelection>;
}
