//! Payload validation for admin writes.
//!
//! Validators take the raw JSON body and never fail on shape: every problem is
//! reported as a [`ValidationError`] with the dotted path of the offending field.
//! Numeric fields accept JSON numbers or numeric strings, as sent by HTML forms.

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{ValidationError, ValidationErrorCollector, ValidationErrors};
use crate::types::{GroupDraft, ItemDraft, ProductDraft, SelectionMode};

/// Validate and normalise an option group creation or replacement payload.
///
/// # Errors
///
/// Returns every field error found, including those of individual items.
pub fn validate_group_payload(payload: &Value) -> Result<GroupDraft, ValidationErrors> {
    let Some(object) = payload.as_object() else {
        return Err(ValidationErrors::single(ValidationError::NotAnObject {
            field: String::new(),
        }));
    };

    let mut errors = ValidationErrorCollector::default();
    let draft = {
        let mut fields = FieldReader::new(object, String::new(), &mut errors);
        let name = fields.required_text("nome");
        let selection_mode = fields.selection_mode("tipo_selecao");
        let min_selections = fields.optional_int("min_selecoes");
        let max_selections = fields.optional_int("max_selecoes");
        let instruction = fields.optional_text("instrucao");
        let display_order = fields.int_or("ordem", 0);
        let active = fields.flag("ativo", true);
        let items = fields.items("itens");

        match (name, selection_mode, items) {
            (Some(name), Some(selection_mode), Some(items)) if !fields.failed => Some(GroupDraft {
                name,
                selection_mode,
                min_selections,
                max_selections,
                instruction,
                display_order,
                active,
                items,
            }),
            _ => None,
        }
    };

    match (draft, errors.into_errors()) {
        (Some(draft), None) => Ok(draft),
        (_, Some(errors)) => Err(errors),
        (None, None) => Err(ValidationErrors::single(ValidationError::NotAnObject {
            field: String::new(),
        })),
    }
}

/// Validate a product payload.
///
/// # Errors
///
/// Returns every field error found.
pub fn validate_product_payload(payload: &Value) -> Result<ProductDraft, ValidationErrors> {
    let Some(object) = payload.as_object() else {
        return Err(ValidationErrors::single(ValidationError::NotAnObject {
            field: String::new(),
        }));
    };

    let mut errors = ValidationErrorCollector::default();
    let draft = {
        let mut fields = FieldReader::new(object, String::new(), &mut errors);
        let name = fields.required_text("nome");
        let description = fields.optional_text("descricao");
        let price = fields.price("preco", None);
        let active = fields.flag("ativo", true);

        match (name, price) {
            (Some(name), Some(price)) if !fields.failed => Some(ProductDraft {
                name,
                description,
                price,
                active,
            }),
            _ => None,
        }
    };

    match (draft, errors.into_errors()) {
        (Some(draft), None) => Ok(draft),
        (_, Some(errors)) => Err(errors),
        (None, None) => Err(ValidationErrors::single(ValidationError::NotAnObject {
            field: String::new(),
        })),
    }
}

fn item_draft(
    value: &Value,
    prefix: String,
    position: usize,
    errors: &mut ValidationErrorCollector,
) -> Option<ItemDraft> {
    let Some(object) = value.as_object() else {
        errors.push(ValidationError::NotAnObject { field: prefix });
        return None;
    };

    let mut fields = FieldReader::new(object, prefix, errors);
    let references_product = fields.get("produto_original_id").is_some_and(|v| {
        v.as_str().is_none_or(|s| !s.trim().is_empty())
    });
    let original_product_id = fields.optional_id("produto_original_id");
    // A product-derived item is presented with the product's own name.
    let name = if references_product {
        None
    } else {
        fields.required_text("nome")
    };
    let additional_price = fields.price("preco_adicional", Some(0.0));
    let selected_by_default = fields.flag("selecionado_padrao", false);
    let display_order = fields.int_or("ordem", i32::try_from(position).unwrap_or(i32::MAX));
    let active = fields.flag("ativo", true);

    if fields.failed {
        return None;
    }
    Some(ItemDraft {
        name,
        additional_price: additional_price?,
        original_product_id,
        selected_by_default,
        display_order,
        active,
    })
}

/// Reads typed fields out of one JSON object, recording errors as it goes.
struct FieldReader<'a, 'e> {
    object: &'a Map<String, Value>,
    prefix: String,
    errors: &'e mut ValidationErrorCollector,
    failed: bool,
}

impl<'a, 'e> FieldReader<'a, 'e> {
    fn new(
        object: &'a Map<String, Value>,
        prefix: String,
        errors: &'e mut ValidationErrorCollector,
    ) -> Self {
        Self {
            object,
            prefix,
            errors,
            failed: false,
        }
    }

    fn path(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{key}", self.prefix)
        }
    }

    /// `null` counts as absent.
    fn get(&self, key: &str) -> Option<&'a Value> {
        self.object.get(key).filter(|v| !v.is_null())
    }

    fn fail(&mut self, error: ValidationError) {
        self.failed = true;
        self.errors.push(error);
    }

    fn invalid_type(&mut self, key: &str, expected: &'static str) {
        let field = self.path(key);
        self.fail(ValidationError::InvalidType { field, expected });
    }

    fn required_text(&mut self, key: &str) -> Option<String> {
        let field = self.path(key);
        match self.get(key) {
            None => self.fail(ValidationError::Required { field }),
            Some(Value::String(s)) if s.trim().is_empty() => {
                self.fail(ValidationError::Empty { field });
            }
            Some(Value::String(s)) => return Some(s.trim().to_string()),
            Some(_) => self.invalid_type(key, "a string"),
        }
        None
    }

    fn optional_text(&mut self, key: &str) -> Option<String> {
        match self.get(key) {
            None => None,
            Some(Value::String(s)) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
            Some(_) => {
                self.invalid_type(key, "a string");
                None
            }
        }
    }

    fn selection_mode(&mut self, key: &str) -> Option<SelectionMode> {
        let field = self.path(key);
        match self.get(key) {
            None => self.fail(ValidationError::Required { field }),
            Some(Value::String(s)) => match s.trim().parse() {
                Ok(mode) => return Some(mode),
                Err(value) => self.fail(ValidationError::UnknownSelectionMode { field, value }),
            },
            Some(_) => self.invalid_type(key, "a string"),
        }
        None
    }

    fn optional_int(&mut self, key: &str) -> Option<i32> {
        let value = self.get(key)?;
        match coerce_int(value) {
            Ok(None) => None,
            Ok(Some(n)) => match i32::try_from(n) {
                Ok(n) => Some(n),
                Err(_) => {
                    let field = self.path(key);
                    self.fail(ValidationError::OutOfRange { field });
                    None
                }
            },
            Err(()) => {
                self.invalid_type(key, "an integer");
                None
            }
        }
    }

    fn int_or(&mut self, key: &str, default: i32) -> i32 {
        self.optional_int(key).unwrap_or(default)
    }

    /// Returns `None` only when an error was recorded.
    fn price(&mut self, key: &str, default: Option<f64>) -> Option<f64> {
        let field = self.path(key);
        let parsed = match self.get(key) {
            None => None,
            Some(value) => match coerce_decimal(value) {
                Ok(parsed) => parsed,
                Err(()) => {
                    self.invalid_type(key, "a number");
                    return None;
                }
            },
        };
        match parsed.or(default) {
            None => {
                self.fail(ValidationError::Required { field });
                None
            }
            Some(price) if price < 0.0 => {
                self.fail(ValidationError::Negative { field });
                None
            }
            Some(price) => Some(price),
        }
    }

    fn flag(&mut self, key: &str, default: bool) -> bool {
        match self.get(key) {
            None => default,
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) if s.trim().eq_ignore_ascii_case("true") => true,
            Some(Value::String(s)) if s.trim().eq_ignore_ascii_case("false") => false,
            Some(_) => {
                self.invalid_type(key, "a boolean");
                default
            }
        }
    }

    fn optional_id(&mut self, key: &str) -> Option<Uuid> {
        match self.get(key) {
            None => None,
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(Value::String(s)) => match Uuid::parse_str(s.trim()) {
                Ok(id) => Some(id),
                Err(_) => {
                    self.invalid_type(key, "a valid id");
                    None
                }
            },
            Some(_) => {
                self.invalid_type(key, "a valid id");
                None
            }
        }
    }

    fn items(&mut self, key: &str) -> Option<Vec<ItemDraft>> {
        let field = self.path(key);
        let Some(value) = self.get(key) else {
            self.fail(ValidationError::Required { field });
            return None;
        };
        let Some(array) = value.as_array() else {
            self.invalid_type(key, "a list of items");
            return None;
        };
        if array.is_empty() {
            self.fail(ValidationError::NoItems { field });
            return None;
        }

        let mut drafts = Vec::with_capacity(array.len());
        for (index, value) in array.iter().enumerate() {
            match item_draft(value, format!("{field}.{index}"), index, self.errors) {
                Some(draft) => drafts.push(draft),
                None => self.failed = true,
            }
        }
        (!self.failed).then_some(drafts)
    }
}

/// `Ok(None)` for an empty string.
fn coerce_int(value: &Value) -> Result<Option<i64>, ()> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
                    .map(|f| f as i64)
            })
            .map(Some)
            .ok_or(()),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s.trim().parse().map(Some).map_err(|_| ()),
        _ => Err(()),
    }
}

/// Accepts `5`, `5.5`, `"5.5"` and `"5,50"`; `Ok(None)` for an empty string.
fn coerce_decimal(value: &Value) -> Result<Option<f64>, ()> {
    let parsed = match value {
        Value::Number(n) => n.as_f64().ok_or(())?,
        Value::String(s) if s.trim().is_empty() => return Ok(None),
        Value::String(s) => s.trim().replace(',', ".").parse().map_err(|_| ())?,
        _ => return Err(()),
    };
    if parsed.is_finite() {
        Ok(Some(parsed))
    } else {
        Err(())
    }
}
