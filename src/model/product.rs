use record_store::StoredRecord;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Products.
///
/// Serialises as the bare code string, which is what the `prodcode` column holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductCode(pub String);

impl ProductCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

impl From<String> for ProductCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl Display for ProductCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A sellable item, identified by its code.
///
/// On the wire this is `{ prodcode, description, unit }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "prodcode")]
    pub code: ProductCode,
    pub description: String,
    pub unit: String,
}

impl Product {
    /// Creates a new Product.
    ///
    /// # Arguments
    /// * `code` - Unique product code, never changed after creation
    /// * `description` - Free text description
    /// * `unit` - Unit-of-measure label (e.g. `pc`, `kg`)
    pub fn new(
        code: impl Into<ProductCode>,
        description: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            unit: unit.into(),
        }
    }
}

/// Partial product record sent with `update_by_key`.
///
/// Missing fields are left as they are. `prodcode` may be present but must equal the key
/// being updated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prodcode: Option<ProductCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// Row-level errors raised by the product collection.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ProductRecordError {
    #[error("product code must not be empty")]
    EmptyCode,

    #[error("product code is immutable: {current} cannot become {requested}")]
    CodeChanged {
        current: ProductCode,
        requested: ProductCode,
    },
}

impl StoredRecord for Product {
    type Key = ProductCode;
    type Patch = ProductPatch;
    type Error = ProductRecordError;

    fn key(&self) -> ProductCode {
        self.code.clone()
    }

    fn on_insert(&mut self) -> Result<(), ProductRecordError> {
        if self.code.as_str().is_empty() {
            return Err(ProductRecordError::EmptyCode);
        }
        Ok(())
    }

    /// # Fields Updated
    /// - `description`
    /// - `unit`
    ///
    /// The code is checked, never written.
    fn on_update(&mut self, patch: ProductPatch) -> Result<(), ProductRecordError> {
        if let Some(requested) = patch.prodcode {
            if requested != self.code {
                return Err(ProductRecordError::CodeChanged {
                    current: self.code.clone(),
                    requested,
                });
            }
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(unit) = patch.unit {
            self.unit = unit;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_shape_uses_prodcode() {
        let product = Product::new("P001", "Widget", "pc");
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(
            value,
            json!({ "prodcode": "P001", "description": "Widget", "unit": "pc" })
        );
    }

    #[test]
    fn test_patch_keeps_code_and_rejects_renames() {
        let mut product = Product::new("P001", "Widget", "pc");

        let patch: ProductPatch = serde_json::from_value(json!({
            "prodcode": "P001",
            "description": "Widget v2",
        }))
        .unwrap();
        product.on_update(patch).unwrap();
        assert_eq!(product, Product::new("P001", "Widget v2", "pc"));

        let rename = ProductPatch {
            prodcode: Some("P002".into()),
            ..ProductPatch::default()
        };
        let err = product.on_update(rename).unwrap_err();
        assert!(matches!(err, ProductRecordError::CodeChanged { .. }));
        assert_eq!(product.code, ProductCode::from("P001"));
    }
}
