use crate::editor::state::{EditorMode, EditorState};
use crate::editor::validation::required_fields;
use crate::model::{Field, FormDraft};

/// One input as the container should render it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub field: Field,
    pub id: &'static str,
    pub label: &'static str,
    pub value: String,
    pub read_only: bool,
    pub required: bool,
}

/// Everything a container needs to draw the editor dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub title: &'static str,
    pub fields: Vec<FieldView>,
    pub submit_label: &'static str,
    pub cancel_label: &'static str,
    pub busy: bool,
}

impl FormView {
    pub fn build(mode: &EditorMode, draft: &FormDraft, state: EditorState) -> Self {
        let (title, submit_label) = match mode {
            EditorMode::Create => ("Add Product", "Add"),
            EditorMode::Edit(_) => ("Edit Product", "Update"),
        };
        let required = required_fields(mode);

        // The price input only exists in create mode.
        let fields = Field::ALL
            .into_iter()
            .filter(|field| mode.is_create() || *field != Field::UnitPrice)
            .map(|field| FieldView {
                field,
                id: field.id(),
                label: field.label(),
                value: draft.value(field).to_string(),
                read_only: !mode.is_create() && field == Field::Code,
                required: required.contains(&field),
            })
            .collect();

        Self {
            title,
            fields,
            submit_label,
            cancel_label: "Cancel",
            busy: state.is_busy(),
        }
    }

    pub fn field(&self, field: Field) -> Option<&FieldView> {
        self.fields.iter().find(|view| view.field == field)
    }
}
