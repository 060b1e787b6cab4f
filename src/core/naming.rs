//! Output naming policy.
//!
//! The policy only decides the output *stem*; the extension belongs to the
//! conversion service.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::file_stem;

pub const DEFAULT_SUFFIX: &str = "_compressed";
pub const DEFAULT_PATTERN: &str = "{name}_{index}";

/// How output file names are derived from source names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamingScheme {
    /// Output stem equals the source stem
    #[default]
    KeepOriginal,
    /// Source stem followed by a suffix
    AddSuffix,
    /// Pattern with `{name}`, `{index}` and `{date}` tokens
    #[serde(rename = "custom")]
    CustomPattern,
}

/// Naming configuration for one conversion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamingOptions {
    pub scheme: NamingScheme,
    /// Used with [`NamingScheme::AddSuffix`], defaults to `_compressed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    /// Used with [`NamingScheme::CustomPattern`], defaults to `{name}_{index}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_pattern: Option<String>,
}

impl NamingOptions {
    pub fn keep_original() -> Self {
        Self::default()
    }

    pub fn add_suffix(suffix: impl Into<String>) -> Self {
        Self {
            scheme: NamingScheme::AddSuffix,
            suffix: Some(suffix.into()),
            custom_pattern: None,
        }
    }

    pub fn custom(pattern: impl Into<String>) -> Self {
        Self {
            scheme: NamingScheme::CustomPattern,
            suffix: None,
            custom_pattern: Some(pattern.into()),
        }
    }

    /// Computes the output stem for `file_name`.
    ///
    /// `index` is the 1-based position of the image within its run and is
    /// rendered zero-padded to three digits. Path separators produced by a
    /// custom pattern are replaced so the output stays beside its source.
    pub fn output_stem(&self, file_name: &str, index: usize, date: NaiveDate) -> String {
        let stem = file_stem(file_name);

        let name = match self.scheme {
            NamingScheme::KeepOriginal => stem.to_string(),
            NamingScheme::AddSuffix => {
                let suffix = self.suffix.as_deref().unwrap_or(DEFAULT_SUFFIX);
                format!("{stem}{suffix}")
            }
            NamingScheme::CustomPattern => {
                let pattern = self.custom_pattern.as_deref().unwrap_or(DEFAULT_PATTERN);
                pattern
                    .replace("{name}", stem)
                    .replace("{index}", &format!("{index:03}"))
                    .replace("{date}", &date.format("%Y%m%d").to_string())
            }
        };

        name.replace(['/', '\\'], "_")
    }

    /// Output file name: stem plus `extension`.
    pub fn output_file_name(&self, file_name: &str, index: usize, date: NaiveDate, extension: &str) -> String {
        format!("{}.{}", self.output_stem(file_name, index, date), extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn keep_original_strips_extension() {
        let naming = NamingOptions::keep_original();
        assert_eq!(naming.output_stem("photo.png", 1, day()), "photo");
    }

    #[test]
    fn suffix_is_inserted_before_extension() {
        let naming = NamingOptions::add_suffix("_small");
        assert_eq!(naming.output_stem("photo.png", 1, day()), "photo_small");
        assert_eq!(naming.output_file_name("photo.png", 1, day(), "webp"), "photo_small.webp");
    }

    #[test]
    fn suffix_defaults_when_missing() {
        let naming = NamingOptions {
            scheme: NamingScheme::AddSuffix,
            suffix: None,
            custom_pattern: None,
        };
        assert_eq!(naming.output_stem("photo.jpeg", 1, day()), "photo_compressed");
    }

    #[test]
    fn custom_pattern_substitutes_all_tokens() {
        let naming = NamingOptions::custom("{date}-{name}-{index}");
        assert_eq!(naming.output_stem("beach.JPG", 7, day()), "20240309-beach-007");
    }

    #[test]
    fn custom_pattern_cannot_escape_directory() {
        let naming = NamingOptions::custom("../{name}");
        assert_eq!(naming.output_stem("a.png", 1, day()), ".._a");
    }

    #[test]
    fn scheme_uses_frontend_names() {
        let json = serde_json::to_string(&NamingOptions::custom("{name}")).unwrap();
        assert_eq!(json, r#"{"scheme":"custom","customPattern":"{name}"}"#);

        let parsed: NamingOptions =
            serde_json::from_str(r#"{"scheme":"add-suffix","suffix":"_x"}"#).unwrap();
        assert_eq!(parsed, NamingOptions::add_suffix("_x"));
    }
}
