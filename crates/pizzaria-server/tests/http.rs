//! The HTTP boundary driven in-process through the router.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use pizzaria_operations::providers::{SessionRegistry, StaticCredentialVerifier};
use pizzaria_server::{AppState, router};
use pizzaria_store::{
    Collection, FaultInjectingStore, InMemoryStore, RecordStore, StoreErrorCode, StoreOp,
};
use serde_json::{Value, json};
use tower::ServiceExt;

const SECRET: &str = "forno-a-lenha";

fn app_with_store(store: Arc<dyn RecordStore>) -> Router {
    router(AppState::new(
        store,
        Arc::new(StaticCredentialVerifier::new("admin", SECRET)),
        Arc::new(SessionRegistry::new(chrono::Duration::hours(1))),
    ))
}

fn app() -> Router {
    app_with_store(Arc::new(InMemoryStore::new()))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<String>,
) -> anyhow::Result<(StatusCode, Value)> {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))?,
        None => request.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, value))
}

async fn login(app: &Router) -> anyhow::Result<String> {
    let (status, body) = send(
        app,
        "POST",
        "/api/login",
        None,
        Some(json!({"usuario": "admin", "senha": SECRET}).to_string()),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    Ok(body["token"].as_str().expect("token in session").to_string())
}

fn tamanho() -> String {
    json!({
        "nome": "Tamanho",
        "tipo_selecao": "RADIO_OBRIGATORIO",
        "itens": [
            {"nome": "P", "preco_adicional": 0},
            {"nome": "G", "preco_adicional": 5}
        ]
    })
    .to_string()
}

#[tokio::test]
async fn health_is_open() -> anyhow::Result<()> {
    let (status, body) = send(&app(), "GET", "/health", None, None).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn wrong_password_is_unauthorized() -> anyhow::Result<()> {
    let (status, body) = send(
        &app(),
        "POST",
        "/api/login",
        None,
        Some(json!({"usuario": "admin", "senha": "calabresa"}).to_string()),
    )
    .await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "Unauthorized");
    Ok(())
}

#[tokio::test]
async fn creating_a_group_requires_a_session() -> anyhow::Result<()> {
    let app = app();

    let (status, _) = send(&app, "POST", "/api/grupos-opcionais", None, Some(tamanho())).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "POST",
        "/api/grupos-opcionais",
        Some("not-a-token"),
        Some(tamanho()),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn created_group_is_listed_with_its_items() -> anyhow::Result<()> {
    let app = app();
    let token = login(&app).await?;

    let (status, created) = send(
        &app,
        "POST",
        "/api/grupos-opcionais",
        Some(&token),
        Some(tamanho()),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["nome"], "Tamanho");
    assert_eq!(created["itens"][0]["preco_adicional"], 0.0);
    assert_eq!(created["itens"][1]["preco_adicional"], 5.0);

    let (status, listed) = send(&app, "GET", "/api/grupos-opcionais", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([created.clone()]));

    let id = created["id"].as_str().expect("id");
    let (status, fetched) =
        send(&app, "GET", &format!("/api/grupos-opcionais/{id}"), None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
    Ok(())
}

#[tokio::test]
async fn empty_item_list_is_a_bad_request() -> anyhow::Result<()> {
    let app = app();
    let token = login(&app).await?;

    let (status, body) = send(
        &app,
        "POST",
        "/api/grupos-opcionais",
        Some(&token),
        Some(json!({"nome": "Tamanho", "tipo_selecao": "RADIO_OBRIGATORIO", "itens": []}).to_string()),
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "ValidationFailed");
    assert_eq!(body["details"][0]["path"], "itens");
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_a_validation_failure() -> anyhow::Result<()> {
    let app = app();
    let token = login(&app).await?;

    let (status, body) = send(
        &app,
        "POST",
        "/api/grupos-opcionais",
        Some(&token),
        Some("{\"nome\": ".to_string()),
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "ValidationFailed");
    assert!(body["error"].is_string());
    Ok(())
}

#[tokio::test]
async fn duplicate_name_is_a_conflict() -> anyhow::Result<()> {
    let app = app();
    let token = login(&app).await?;
    send(&app, "POST", "/api/grupos-opcionais", Some(&token), Some(tamanho())).await?;

    let (status, body) = send(
        &app,
        "POST",
        "/api/grupos-opcionais",
        Some(&token),
        Some(tamanho()),
    )
    .await?;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "Conflict");
    Ok(())
}

#[tokio::test]
async fn failed_item_insert_is_a_server_error_with_no_group_left() -> anyhow::Result<()> {
    let store = Arc::new(FaultInjectingStore::new(InMemoryStore::new()).fail_next(
        StoreOp::InsertMany,
        Collection::OptionItems,
        StoreErrorCode::Unavailable,
    ));
    let app = app_with_store(store.clone());
    let token = login(&app).await?;

    let (status, body) = send(
        &app,
        "POST",
        "/api/grupos-opcionais",
        Some(&token),
        Some(tamanho()),
    )
    .await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["kind"], "StoreFailure");
    assert!(body["details"].as_array().is_some_and(|d| !d.is_empty()));
    assert_eq!(store.inner().count(Collection::OptionGroups), 0);
    Ok(())
}

#[tokio::test]
async fn failed_rollback_is_reported_distinctly() -> anyhow::Result<()> {
    let store = Arc::new(
        FaultInjectingStore::new(InMemoryStore::new())
            .fail_next(
                StoreOp::InsertMany,
                Collection::OptionItems,
                StoreErrorCode::Unavailable,
            )
            .fail_next(
                StoreOp::Delete,
                Collection::OptionGroups,
                StoreErrorCode::Unavailable,
            ),
    );
    let app = app_with_store(store.clone());
    let token = login(&app).await?;

    let (status, body) = send(
        &app,
        "POST",
        "/api/grupos-opcionais",
        Some(&token),
        Some(tamanho()),
    )
    .await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["kind"], "CompensationFailure");
    assert_eq!(body["details"][1]["step"], "insert_option_group");
    assert_eq!(store.inner().count(Collection::OptionGroups), 1);
    Ok(())
}

#[tokio::test]
async fn replace_and_delete_round_trip() -> anyhow::Result<()> {
    let app = app();
    let token = login(&app).await?;
    let (_, created) = send(
        &app,
        "POST",
        "/api/grupos-opcionais",
        Some(&token),
        Some(tamanho()),
    )
    .await?;
    let uri = format!(
        "/api/grupos-opcionais/{}",
        created["id"].as_str().expect("id")
    );

    let (status, replaced) = send(
        &app,
        "PUT",
        &uri,
        Some(&token),
        Some(
            json!({
                "nome": "Tamanho",
                "tipo_selecao": "RADIO_OBRIGATORIO",
                "itens": [{"nome": "Broto"}, {"nome": "Família", "preco_adicional": "20,00"}]
            })
            .to_string(),
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["itens"][1]["preco_adicional"], 20.0);

    let (status, _) = send(&app, "DELETE", &uri, Some(&token), None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "GET", &uri, None, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "NotFound");
    Ok(())
}

#[tokio::test]
async fn invalid_group_id_is_a_bad_request() -> anyhow::Result<()> {
    let (status, body) = send(&app(), "GET", "/api/grupos-opcionais/pizza", None, None).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["path"], "id");
    Ok(())
}

#[tokio::test]
async fn products_can_back_option_items() -> anyhow::Result<()> {
    let app = app();
    let token = login(&app).await?;

    let (status, product) = send(
        &app,
        "POST",
        "/api/produtos",
        Some(&token),
        Some(json!({"nome": "Guaraná 2L", "preco": 12}).to_string()),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, group) = send(
        &app,
        "POST",
        "/api/grupos-opcionais",
        Some(&token),
        Some(
            json!({
                "nome": "Bebidas",
                "tipo_selecao": "CHECKBOX_OPCIONAL",
                "itens": [{"nome": "ignorado", "produto_original_id": product["id"], "preco_adicional": 10}]
            })
            .to_string(),
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert!(group["itens"][0]["nome"].is_null());

    let (status, products) = send(&app, "GET", "/api/produtos", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(products, json!([product]));
    Ok(())
}

#[tokio::test]
async fn logout_revokes_the_session() -> anyhow::Result<()> {
    let app = app();
    let token = login(&app).await?;

    let (status, _) = send(&app, "POST", "/api/logout", Some(&token), None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "POST", "/api/produtos", Some(&token), Some("{}".to_string())).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}
