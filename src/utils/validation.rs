use crate::core::{ConversionSettings, NamingOptions, NamingScheme};
use crate::utils::{ConverterError, ConverterResult};

/// Validates a user-facing quality percentage
pub fn validate_quality(quality: u8) -> ConverterResult<()> {
    if quality == 0 || quality > 100 {
        return Err(ConverterError::validation(
            format!("Invalid quality value: {}. Must be between 1 and 100", quality)
        ));
    }
    Ok(())
}

/// Validates naming options for the selected scheme
pub fn validate_naming(naming: &NamingOptions) -> ConverterResult<()> {
    match naming.scheme {
        NamingScheme::KeepOriginal => Ok(()),
        NamingScheme::AddSuffix => {
            if naming.suffix.as_deref().is_some_and(str::is_empty) {
                return Err(ConverterError::validation("Suffix cannot be empty"));
            }
            Ok(())
        }
        NamingScheme::CustomPattern => {
            if naming.custom_pattern.as_deref().is_some_and(|p| p.trim().is_empty()) {
                return Err(ConverterError::validation("Custom pattern cannot be empty"));
            }
            Ok(())
        }
    }
}

/// Validates conversion settings
pub fn validate_settings(settings: &ConversionSettings) -> ConverterResult<()> {
    validate_quality(settings.quality)?;
    validate_naming(&settings.naming)?;
    Ok(())
}
