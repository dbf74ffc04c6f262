//! Admin form payloads as the storefront back-office submits them.

use pizzaria_core::{SelectionMode, validate_group_payload, validate_product_payload};
use serde_json::json;
use uuid::Uuid;

#[test]
fn form_encoded_group_is_normalised() -> anyhow::Result<()> {
    let product_id = Uuid::new_v4();
    let payload = json!({
        "nome": "  Bebidas  ",
        "tipo_selecao": "CHECKBOX_OPCIONAL",
        "min_selecoes": "",
        "max_selecoes": "2",
        "instrucao": "   ",
        "ordem": "3",
        "ativo": "true",
        "itens": [
            {"nome": "Suco de laranja", "preco_adicional": "7,50", "selecionado_padrao": "false"},
            {"nome": "Refrigerante", "produto_original_id": product_id.to_string(), "preco_adicional": ""}
        ]
    });

    let draft = validate_group_payload(&payload)?;

    assert_eq!(draft.name, "Bebidas");
    assert_eq!(draft.selection_mode, SelectionMode::MultiOptional);
    assert_eq!(draft.min_selections, None);
    assert_eq!(draft.max_selections, Some(2));
    assert_eq!(draft.instruction, None);
    assert_eq!(draft.display_order, 3);
    assert_eq!(draft.items.len(), 2);
    assert!((draft.items[0].additional_price - 7.5).abs() < f64::EPSILON);
    assert_eq!(draft.items[1].name, None);
    assert_eq!(draft.items[1].original_product_id, Some(product_id));
    assert!(draft.items[1].additional_price.abs() < f64::EPSILON);
    assert_eq!(
        draft.items.iter().map(|i| i.display_order).collect::<Vec<_>>(),
        [0, 1]
    );
    Ok(())
}

#[test]
fn every_item_problem_is_reported_with_its_path() {
    let payload = json!({
        "nome": "Sabores",
        "tipo_selecao": "CHECKBOX_OBRIGATORIO",
        "itens": [
            {"nome": "Calabresa", "preco_adicional": -2},
            {"preco_adicional": "abc"},
            "Mussarela"
        ]
    });

    let errors = validate_group_payload(&payload).expect_err("three bad items");

    let fields: Vec<_> = errors.iter().map(|e| e.field().to_string()).collect();
    assert_eq!(
        fields,
        [
            "itens.0.preco_adicional",
            "itens.1.nome",
            "itens.1.preco_adicional",
            "itens.2"
        ]
    );
}

#[test]
fn product_payload_requires_a_price() {
    let errors = validate_product_payload(&json!({"nome": "Pizza Margherita"}))
        .expect_err("price missing");

    assert!(errors.has_field("preco"));
    assert_eq!(errors.len(), 1);
}
