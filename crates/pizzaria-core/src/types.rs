use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How many items of a group a customer may pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionMode {
    /// Exactly one item must be chosen (radio buttons).
    #[serde(rename = "RADIO_OBRIGATORIO")]
    SingleRequired,
    #[serde(rename = "CHECKBOX_OPCIONAL")]
    MultiOptional,
    #[serde(rename = "CHECKBOX_OBRIGATORIO")]
    MultiRequired,
}

impl SelectionMode {
    pub const ALL: [Self; 3] = [Self::SingleRequired, Self::MultiOptional, Self::MultiRequired];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SingleRequired => "RADIO_OBRIGATORIO",
            Self::MultiOptional => "CHECKBOX_OPCIONAL",
            Self::MultiRequired => "CHECKBOX_OBRIGATORIO",
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

fn default_true() -> bool {
    true
}

/// A persisted option group row (`grupos_opcionais`).
///
/// `min_selections` and `max_selections` are stored exactly as configured; they
/// are not checked against `selection_mode` or against each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionGroup {
    pub id: Uuid,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "tipo_selecao")]
    pub selection_mode: SelectionMode,
    #[serde(rename = "min_selecoes", default)]
    pub min_selections: Option<i32>,
    #[serde(rename = "max_selecoes", default)]
    pub max_selections: Option<i32>,
    #[serde(rename = "instrucao", default)]
    pub instruction: Option<String>,
    #[serde(rename = "ordem", default)]
    pub display_order: i32,
    #[serde(rename = "ativo", default = "default_true")]
    pub active: bool,
}

/// A persisted option item row (`itens_opcionais`).
///
/// Items that point at an original product carry no name of their own; the
/// product's name is shown instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionItem {
    pub id: Uuid,
    #[serde(rename = "grupo_id")]
    pub group_id: Uuid,
    #[serde(rename = "nome", default)]
    pub name: Option<String>,
    #[serde(rename = "preco_adicional")]
    pub additional_price: f64,
    #[serde(rename = "produto_original_id", default)]
    pub original_product_id: Option<Uuid>,
    #[serde(rename = "selecionado_padrao", default)]
    pub selected_by_default: bool,
    #[serde(rename = "ordem", default)]
    pub display_order: i32,
    #[serde(rename = "ativo", default = "default_true")]
    pub active: bool,
}

/// A group together with its items, ordered for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupWithItems {
    #[serde(flatten)]
    pub group: OptionGroup,
    #[serde(rename = "itens")]
    pub items: Vec<OptionItem>,
}

impl GroupWithItems {
    /// Sorts items by display order, keeping insertion order among equal values.
    #[must_use]
    pub fn new(group: OptionGroup, mut items: Vec<OptionItem>) -> Self {
        items.sort_by_key(|item| item.display_order);
        Self { group, items }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "preco")]
    pub price: f64,
    #[serde(rename = "ativo", default = "default_true")]
    pub active: bool,
}

/// A validated group payload, ready to be written.
///
/// Serialises to the group row without its items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupDraft {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "tipo_selecao")]
    pub selection_mode: SelectionMode,
    #[serde(rename = "min_selecoes")]
    pub min_selections: Option<i32>,
    #[serde(rename = "max_selecoes")]
    pub max_selections: Option<i32>,
    #[serde(rename = "instrucao")]
    pub instruction: Option<String>,
    #[serde(rename = "ordem")]
    pub display_order: i32,
    #[serde(rename = "ativo")]
    pub active: bool,
    #[serde(skip)]
    pub items: Vec<ItemDraft>,
}

/// A validated item payload; serialises to an item row without `grupo_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemDraft {
    #[serde(rename = "nome")]
    pub name: Option<String>,
    #[serde(rename = "preco_adicional")]
    pub additional_price: f64,
    #[serde(rename = "produto_original_id")]
    pub original_product_id: Option<Uuid>,
    #[serde(rename = "selecionado_padrao")]
    pub selected_by_default: bool,
    #[serde(rename = "ordem")]
    pub display_order: i32,
    #[serde(rename = "ativo")]
    pub active: bool,
}

impl ItemDraft {
    /// Drops the item's own name when it is derived from a product.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.original_product_id.is_some() {
            self.name = None;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDraft {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "preco")]
    pub price: f64,
    #[serde(rename = "ativo")]
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn selection_mode_uses_storefront_wire_values() -> anyhow::Result<()> {
        assert_eq!(
            serde_json::to_value(SelectionMode::SingleRequired)?,
            json!("RADIO_OBRIGATORIO")
        );
        assert_eq!(
            serde_json::from_value::<SelectionMode>(json!("CHECKBOX_OPCIONAL"))?,
            SelectionMode::MultiOptional
        );
        Ok(())
    }

    #[test]
    fn selection_mode_parses_only_known_values() {
        assert_eq!(
            "CHECKBOX_OBRIGATORIO".parse::<SelectionMode>(),
            Ok(SelectionMode::MultiRequired)
        );
        assert_eq!(
            "radio_obrigatorio".parse::<SelectionMode>(),
            Err("radio_obrigatorio".to_string())
        );
    }

    #[test]
    fn group_with_items_sorts_by_display_order_stably() {
        let group_id = Uuid::new_v4();
        let item = |name: &str, order| OptionItem {
            id: Uuid::new_v4(),
            group_id,
            name: Some(name.to_string()),
            additional_price: 0.0,
            original_product_id: None,
            selected_by_default: false,
            display_order: order,
            active: true,
        };
        let group = OptionGroup {
            id: group_id,
            name: "Borda".to_string(),
            selection_mode: SelectionMode::SingleRequired,
            min_selections: None,
            max_selections: None,
            instruction: None,
            display_order: 0,
            active: true,
        };

        let sorted = GroupWithItems::new(
            group,
            vec![item("Catupiry", 2), item("Sem borda", 0), item("Cheddar", 2)],
        );

        let names: Vec<_> = sorted.items.iter().filter_map(|i| i.name.as_deref()).collect();
        assert_eq!(names, ["Sem borda", "Catupiry", "Cheddar"]);
    }

    #[test]
    fn group_with_items_flattens_group_fields() -> anyhow::Result<()> {
        let group = OptionGroup {
            id: Uuid::nil(),
            name: "Tamanho".to_string(),
            selection_mode: SelectionMode::SingleRequired,
            min_selections: Some(1),
            max_selections: Some(1),
            instruction: None,
            display_order: 0,
            active: true,
        };

        let value = serde_json::to_value(GroupWithItems::new(group, Vec::new()))?;

        assert_eq!(value["nome"], json!("Tamanho"));
        assert_eq!(value["tipo_selecao"], json!("RADIO_OBRIGATORIO"));
        assert_eq!(value["itens"], json!([]));
        Ok(())
    }

    #[test]
    fn option_item_row_defaults_missing_flags() -> anyhow::Result<()> {
        let row = json!({
            "id": Uuid::nil(),
            "grupo_id": Uuid::nil(),
            "preco_adicional": 5.0
        });

        let item: OptionItem = serde_json::from_value(row)?;

        assert_eq!(item.name, None);
        assert!(item.active);
        assert!(!item.selected_by_default);
        assert_eq!(item.display_order, 0);
        Ok(())
    }

    #[test]
    fn normalized_item_drops_name_when_product_linked() {
        let draft = ItemDraft {
            name: Some("Coca-Cola 2L".to_string()),
            additional_price: 12.0,
            original_product_id: Some(Uuid::new_v4()),
            selected_by_default: false,
            display_order: 0,
            active: true,
        };

        assert_eq!(draft.normalized().name, None);
    }

    #[test]
    fn group_draft_row_omits_items() -> anyhow::Result<()> {
        let draft = GroupDraft {
            name: "Tamanho".to_string(),
            selection_mode: SelectionMode::SingleRequired,
            min_selections: None,
            max_selections: None,
            instruction: None,
            display_order: 0,
            active: true,
            items: Vec::new(),
        };

        let value = serde_json::to_value(&draft)?;

        assert!(value.get("itens").is_none());
        assert_eq!(value["min_selecoes"], serde_json::Value::Null);
        Ok(())
    }
}
