use crate::model::ProductCode;
use chrono::NaiveDate;
use record_store::StoredRecord;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::Display;

/// A dated unit price for a product.
///
/// On the wire this is `{ prodcode, effdate: "YYYY-MM-DD", unitprice }`. The product code is
/// a reference, the entry does not own the product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistoryEntry {
    #[serde(rename = "prodcode")]
    pub product_code: ProductCode,
    #[serde(rename = "effdate")]
    pub effective_date: NaiveDate,
    #[serde(rename = "unitprice")]
    pub unit_price: f64,
}

impl PriceHistoryEntry {
    pub fn new(
        product_code: impl Into<ProductCode>,
        effective_date: NaiveDate,
        unit_price: f64,
    ) -> Self {
        Self {
            product_code: product_code.into(),
            effective_date,
            unit_price,
        }
    }
}

/// One price per product per day.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PriceHistoryKey {
    pub product_code: ProductCode,
    pub effective_date: NaiveDate,
}

impl Display for PriceHistoryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.product_code, self.effective_date)
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum PriceHistoryRecordError {
    #[error("unit price must be a finite number")]
    NonFinitePrice,

    #[error("unit price must not be negative: {0}")]
    NegativePrice(f64),
}

// Price history is append-only, so there is no patch type to apply.
impl StoredRecord for PriceHistoryEntry {
    type Key = PriceHistoryKey;
    type Patch = Infallible;
    type Error = PriceHistoryRecordError;

    fn key(&self) -> PriceHistoryKey {
        PriceHistoryKey {
            product_code: self.product_code.clone(),
            effective_date: self.effective_date,
        }
    }

    fn on_insert(&mut self) -> Result<(), PriceHistoryRecordError> {
        if !self.unit_price.is_finite() {
            return Err(PriceHistoryRecordError::NonFinitePrice);
        }
        if self.unit_price < 0.0 {
            return Err(PriceHistoryRecordError::NegativePrice(self.unit_price));
        }
        Ok(())
    }

    fn on_update(&mut self, patch: Infallible) -> Result<(), PriceHistoryRecordError> {
        match patch {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_shape_is_date_only() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let entry = PriceHistoryEntry::new("P001", date, 9.99);
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value,
            json!({ "prodcode": "P001", "effdate": "2024-03-01", "unitprice": 9.99 })
        );
        assert_eq!(entry.key().to_string(), "P001@2024-03-01");
    }

    #[test]
    fn test_insert_rejects_negative_price() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let mut entry = PriceHistoryEntry::new("P001", date, -1.0);
        assert_eq!(
            entry.on_insert(),
            Err(PriceHistoryRecordError::NegativePrice(-1.0))
        );
    }
}
