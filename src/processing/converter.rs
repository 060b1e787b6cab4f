//! The seam between the queue and whatever performs a single conversion.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::NamingOptions;
use crate::utils::ConverterResult;

/// Input of one conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
    /// Path of the source image
    pub source_path: String,
    /// Encoder quality as a fraction in `[0.0, 1.0]`
    pub quality: f32,
    /// Output naming policy
    pub naming_options: NamingOptions,
    /// 1-based position of the image within its run, used for `{index}`
    #[serde(default = "first_in_run")]
    pub sequence: usize,
}

fn first_in_run() -> usize {
    1
}

/// Outcome reported by a conversion service.
///
/// `success: false` and an `Err` from [`ConversionService::convert`] are
/// treated the same way by the queue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub success: bool,
    pub output_path: String,
    pub original_size: u64,
    pub new_size: u64,
    pub error: Option<String>,
    /// Base64 encoded output, for saving from the client side
    pub base64_data: Option<String>,
}

impl ConversionResult {
    /// A failed result that still reports the source size.
    pub fn failure(original_size: u64, error: impl Into<String>) -> Self {
        Self {
            success: false,
            original_size,
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

/// Converts one image at a time.
#[async_trait]
pub trait ConversionService: Send + Sync {
    async fn convert(&self, request: ConversionRequest) -> ConverterResult<ConversionResult>;
}
