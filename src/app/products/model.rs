//! 产品数据模型

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::{fmt, str::FromStr};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::core::error::CoreError;

/// 农场摊位的产品记录
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 产品分类，表单下拉框的可选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Fruit,
    Vegetable,
    Dairy,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Fruit, Category::Vegetable, Category::Dairy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Fruit => "fruit",
            Category::Vegetable => "vegetable",
            Category::Dairy => "dairy",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}

/// 原始表单请求体
///
/// 所有字段都是可选的，缺失字段交给 [`ProductForm::into_fields`]
/// 或 [`ProductForm::into_patch`] 处理，
/// 而不是在提取阶段直接被 axum 拒绝。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    pub name: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
}

/// 经过映射和校验的产品字段
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct ProductFields {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,

    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: f64,

    #[validate(custom(function = "validate_category"))]
    pub category: String,
}

/// 更新时提交的字段，只有 `Some` 的字段会被替换
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct ProductPatch {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: Option<String>,

    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: Option<f64>,

    #[validate(custom(function = "validate_category"))]
    pub category: Option<String>,
}

impl From<ProductFields> for ProductPatch {
    fn from(fields: ProductFields) -> Self {
        Self {
            name: Some(fields.name),
            price: Some(fields.price),
            category: Some(fields.category),
        }
    }
}

fn validate_category(category: &str) -> Result<(), ValidationError> {
    match category.parse::<Category>() {
        Ok(_) => Ok(()),
        Err(_) => {
            let mut err = ValidationError::new("category");
            err.message = Some("category must be one of fruit, vegetable, dairy".into());
            Err(err)
        }
    }
}

fn parse_price(raw: &str) -> Result<f64, CoreError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(CoreError::Validation("price is required".to_string()));
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CoreError::Validation(format!(
            "price must be a number, got {raw:?}"
        ))),
    }
}

fn normalize_category(raw: &str) -> String {
    raw.trim().to_lowercase()
}

impl ProductForm {
    /// 把原始表单映射成 [`ProductFields`] 并执行校验，三个字段都必须提供
    pub fn into_fields(self) -> Result<ProductFields, CoreError> {
        let price = match self.price.as_deref() {
            Some(raw) => parse_price(raw)?,
            None => return Err(CoreError::Validation("price is required".to_string())),
        };

        let fields = ProductFields {
            name: self.name.unwrap_or_default().trim().to_string(),
            price,
            category: normalize_category(&self.category.unwrap_or_default()),
        };
        fields.validate()?;

        Ok(fields)
    }

    /// 映射成 [`ProductPatch`]，只校验表单里出现的字段
    pub fn into_patch(self) -> Result<ProductPatch, CoreError> {
        let patch = ProductPatch {
            name: self.name.map(|name| name.trim().to_string()),
            price: self.price.as_deref().map(parse_price).transpose()?,
            category: self.category.as_deref().map(normalize_category),
        };
        patch.validate()?;

        Ok(patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, price: &str, category: &str) -> ProductForm {
        ProductForm {
            name: Some(name.to_string()),
            price: Some(price.to_string()),
            category: Some(category.to_string()),
        }
    }

    #[test]
    fn test_valid_form_maps_to_fields() {
        let fields = form("Apple", "1.5", "fruit").into_fields().unwrap();
        assert_eq!(
            fields,
            ProductFields {
                name: "Apple".to_string(),
                price: 1.5,
                category: "fruit".to_string(),
            }
        );
    }

    #[test]
    fn test_category_is_lowercased() {
        let fields = form("Milk", "2", " Dairy ").into_fields().unwrap();
        assert_eq!(fields.category, "dairy");
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            form("Apple", "cheap", "fruit").into_fields(),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            form("Apple", "-1", "fruit").into_fields(),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            form("Apple", "NaN", "fruit").into_fields(),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            form("   ", "1", "fruit").into_fields(),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            form("Apple", "1", "meat").into_fields(),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            ProductForm::default().into_fields(),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_patch_keeps_absent_fields_empty() {
        let patch = ProductForm {
            price: Some("3".to_string()),
            ..Default::default()
        }
        .into_patch()
        .unwrap();
        assert_eq!(
            patch,
            ProductPatch {
                name: None,
                price: Some(3.0),
                category: None,
            }
        );

        let empty = ProductForm::default().into_patch().unwrap();
        assert_eq!(empty, ProductPatch::default());
    }

    #[test]
    fn test_patch_validates_present_fields() {
        let bad_price = ProductForm {
            price: Some("-2".to_string()),
            ..Default::default()
        };
        assert!(matches!(bad_price.into_patch(), Err(CoreError::Validation(_))));

        let bad_category = ProductForm {
            category: Some("meat".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            bad_category.into_patch(),
            Err(CoreError::Validation(_))
        ));

        let blank_name = ProductForm {
            name: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(matches!(blank_name.into_patch(), Err(CoreError::Validation(_))));

        let category = ProductForm {
            category: Some("Dairy".to_string()),
            ..Default::default()
        }
        .into_patch()
        .unwrap();
        assert_eq!(category.category.as_deref(), Some("dairy"));
    }

    #[test]
    fn test_category_list() {
        let names: Vec<&str> = Category::ALL.iter().map(Category::as_str).collect();
        assert_eq!(names, ["fruit", "vegetable", "dairy"]);
        assert_eq!("vegetable".parse::<Category>(), Ok(Category::Vegetable));
    }
}
