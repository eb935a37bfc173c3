use crate::editor::error::ValidationError;
use crate::editor::state::EditorMode;
use crate::model::{Field, FormDraft, Product};

/// A draft that passed validation, trimmed and ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedDraft {
    pub product: Product,
    /// Only present in create mode.
    pub unit_price: Option<f64>,
}

/// Fields the user has to fill in.
pub fn required_fields(mode: &EditorMode) -> &'static [Field] {
    match mode {
        EditorMode::Create => &Field::ALL,
        EditorMode::Edit(_) => &[Field::Code, Field::Description, Field::Unit],
    }
}

/// Checks every required field, then parses the price.
///
/// In edit mode the product code always comes from the existing record.
pub fn validate(draft: &FormDraft, mode: &EditorMode) -> Result<ValidatedDraft, ValidationError> {
    let missing: Vec<Field> = required_fields(mode)
        .iter()
        .copied()
        .filter(|field| draft.value(*field).trim().is_empty())
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    let code = match mode {
        EditorMode::Create => draft.code.trim().into(),
        EditorMode::Edit(existing) => existing.code.clone(),
    };
    let product = Product {
        code,
        description: draft.description.trim().to_string(),
        unit: draft.unit.trim().to_string(),
    };

    let unit_price = match mode {
        EditorMode::Create => Some(parse_price(&draft.unit_price)?),
        EditorMode::Edit(_) => None,
    };

    Ok(ValidatedDraft {
        product,
        unit_price,
    })
}

fn parse_price(raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(price),
        _ => Err(ValidationError::InvalidPrice(trimmed.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_requires_every_field() {
        let draft = FormDraft::new("P001", "  ", "pc", "");
        let err = validate(&draft, &EditorMode::Create).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingFields(vec![Field::Description, Field::UnitPrice])
        );
        assert_eq!(err.to_string(), "Please fill in all fields");
    }

    #[test]
    fn test_create_trims_and_parses_price() {
        let draft = FormDraft::new(" P001 ", "Widget ", " pc", " 9.99 ");
        let validated = validate(&draft, &EditorMode::Create).unwrap();
        assert_eq!(validated.product, Product::new("P001", "Widget", "pc"));
        assert_eq!(validated.unit_price, Some(9.99));
    }

    #[test]
    fn test_price_must_be_a_non_negative_number() {
        for raw in ["abc", "-1", "NaN", "inf"] {
            let draft = FormDraft::new("P001", "Widget", "pc", raw);
            let err = validate(&draft, &EditorMode::Create).unwrap_err();
            assert!(matches!(err, ValidationError::InvalidPrice(_)), "{raw}");
        }
        let draft = FormDraft::new("P001", "Widget", "pc", "0");
        assert_eq!(
            validate(&draft, &EditorMode::Create).unwrap().unit_price,
            Some(0.0)
        );
    }

    #[test]
    fn test_edit_ignores_price_and_keeps_code() {
        let existing = Product::new("P001", "Widget", "pc");
        let draft = FormDraft::new("P001", "Widget v2", "pc", "");
        let validated = validate(&draft, &EditorMode::Edit(existing)).unwrap();
        assert_eq!(validated.product, Product::new("P001", "Widget v2", "pc"));
        assert_eq!(validated.unit_price, None);
    }
}
