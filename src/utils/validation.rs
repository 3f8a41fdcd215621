use crate::domain::model::{LaundryStats, Product};
use crate::utils::error::{CalcError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(CalcError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(CalcError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(CalcError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(CalcError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(CalcError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_min<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min_value: T,
) -> Result<()> {
    if value < min_value {
        return Err(CalcError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

/// 產品進入清單前的檢查（表單層規則）
pub fn validate_product(product: &Product) -> Result<()> {
    if product.name.trim().is_empty() {
        return Err(CalcError::validation("name", "cannot be empty"));
    }
    if !(product.price.is_finite() && product.price > 0.0) {
        return Err(CalcError::validation(
            "price",
            format!("must be greater than 0 (got {})", product.price),
        ));
    }
    if product.quantity < 1 {
        return Err(CalcError::validation("quantity", "must be at least 1"));
    }
    if product.usage_frequency < 1 {
        return Err(CalcError::validation("usageFrequency", "must be at least 1"));
    }
    Ok(())
}

impl Validate for Product {
    fn validate(&self) -> Result<()> {
        validate_product(self)
    }
}

impl Validate for LaundryStats {
    fn validate(&self) -> Result<()> {
        validate_min("habits.loads_per_week", self.loads_per_week, 1)?;
        if !(self.time_per_load.is_finite() && self.time_per_load > 0.0) {
            return Err(CalcError::validation("timePerLoad", "must be greater than 0"));
        }
        if !(self.water_per_load.is_finite() && self.water_per_load > 0.0) {
            return Err(CalcError::validation("waterPerLoad", "must be greater than 0"));
        }
        Ok(())
    }
}
