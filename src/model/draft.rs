use crate::model::Product;
use std::fmt::Display;

/// The four inputs of the product form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Code,
    Description,
    Unit,
    UnitPrice,
}

impl Field {
    /// Form order.
    pub const ALL: [Field; 4] = [Field::Code, Field::Description, Field::Unit, Field::UnitPrice];

    /// Input id, matching the wire column name.
    pub fn id(self) -> &'static str {
        match self {
            Field::Code => "prodcode",
            Field::Description => "description",
            Field::Unit => "unit",
            Field::UnitPrice => "unitprice",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Code => "Product Code",
            Field::Description => "Description",
            Field::Unit => "Unit",
            Field::UnitPrice => "Initial Price",
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Unsaved field values, exactly as typed.
///
/// The price stays a string until validation so a half-typed value never gets lost.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDraft {
    pub code: String,
    pub description: String,
    pub unit: String,
    pub unit_price: String,
}

impl FormDraft {
    pub fn new(
        code: impl Into<String>,
        description: impl Into<String>,
        unit: impl Into<String>,
        unit_price: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            unit: unit.into(),
            unit_price: unit_price.into(),
        }
    }

    /// Seeds a draft from a stored product. The price starts empty.
    pub fn from_product(product: &Product) -> Self {
        Self {
            code: product.code.to_string(),
            description: product.description.clone(),
            unit: product.unit.clone(),
            unit_price: String::new(),
        }
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Code => &self.code,
            Field::Description => &self.description,
            Field::Unit => &self.unit,
            Field::UnitPrice => &self.unit_price,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Code => &mut self.code,
            Field::Description => &mut self.description,
            Field::Unit => &mut self.unit,
            Field::UnitPrice => &mut self.unit_price,
        };
        *slot = value.into();
    }
}
