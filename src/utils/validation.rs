use crate::utils::error::{DeployError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// 單一路徑片段 (例如 app 名稱、資料夾名稱)，不可跳出工作目錄
pub fn validate_path_segment(field_name: &str, segment: &str) -> Result<()> {
    validate_path(field_name, segment)?;

    if segment == "." || segment == ".." || segment.contains('/') || segment.contains('\\') {
        return Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: segment.to_string(),
            reason: "Must be a single directory name".to_string(),
        });
    }

    Ok(())
}

pub fn validate_extensions(field_name: &str, extensions: &[String]) -> Result<()> {
    for extension in extensions {
        if !extension.starts_with('.') || extension.len() < 2 {
            return Err(DeployError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: extension.clone(),
                reason: "Extensions must look like \".js\"".to_string(),
            });
        }
        if extension == ".gz" {
            return Err(DeployError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: extension.clone(),
                reason: "Compressed files cannot be compressed again".to_string(),
            });
        }
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(DeployError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}
