use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Form, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;

use band_watch::error::AppError;
use band_watch::notify::AlertSender;
use band_watch::twilio::rest::TwilioClient;

#[derive(Debug, Clone)]
struct Captured {
    account: String,
    authorization: Option<String>,
    form: HashMap<String, String>,
}

type Store = Arc<Mutex<Vec<Captured>>>;

async fn create_message(
    State(store): State<Store>,
    Path(account): Path<String>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let authorized = authorization.as_deref() == Some("Basic QUMxMjM6c2VjcmV0");
    store.lock().unwrap().push(Captured {
        account,
        authorization,
        form,
    });
    if authorized {
        (
            StatusCode::CREATED,
            Json(json!({"sid": "SM0001", "status": "queued"})),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"code": 20003, "message": "Authenticate", "status": 401})),
        )
    }
}

async fn serve() -> (String, Store) {
    let store: Store = Arc::default();
    let app = Router::new()
        .route(
            "/2010-04-01/Accounts/{account}/Messages.json",
            post(create_message),
        )
        .route(
            "/plain/2010-04-01/Accounts/{account}/Messages.json",
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        )
        .with_state(store.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), store)
}

fn client(base: &str, token: &str) -> TwilioClient {
    TwilioClient::new(
        base,
        "AC123",
        token,
        "whatsapp:+14155238886",
        "whatsapp:+15005550006",
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn send_posts_form_with_basic_auth() {
    let (base, store) = serve().await;
    let id = client(&format!("{}/", base), "secret")
        .send("ETHUSDT Alert: Current Price = 2600.00 (within 2500.00-2800.00)")
        .await
        .unwrap();
    assert_eq!(id, "SM0001");

    let captured = store.lock().unwrap().clone();
    assert_eq!(captured.len(), 1);
    let req = &captured[0];
    assert_eq!(req.account, "AC123");
    assert_eq!(req.authorization.as_deref(), Some("Basic QUMxMjM6c2VjcmV0"));
    assert_eq!(req.form["From"], "whatsapp:+14155238886");
    assert_eq!(req.form["To"], "whatsapp:+15005550006");
    assert!(req.form["Body"].contains("2600.00"));
}

#[tokio::test]
async fn api_error_body_is_decoded() {
    let (base, _store) = serve().await;
    let err = client(&base, "wrong").send("hello").await.unwrap_err();
    match err.downcast_ref::<AppError>() {
        Some(AppError::MessagingApi { code, msg }) => {
            assert_eq!(*code, 20003);
            assert_eq!(msg, "Authenticate");
        }
        other => panic!("expected messaging API error, got {:?}", other),
    }
}

#[tokio::test]
async fn non_json_error_keeps_raw_body() {
    let (base, _store) = serve().await;
    let err = client(&format!("{}/plain", base), "secret")
        .send("hello")
        .await
        .unwrap_err();
    let text = format!("{:#}", err);
    assert!(text.contains("upstream down"), "unexpected error: {}", text);
}
