// tests/e2e_tests.rs

use actix_web::HttpServer;
use once_cell::sync::Lazy;
use shopfront_client::{ApiClient, CartApi, CartController, ClientConfig, ClientError};
use shopfront_core::wire::{ItemQuery, NewItemRequest, SignupRequest};
use shopfront_core::Money;
use shopfront_server::{build_app, AppConfig, AppState};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_test_writer()
    .try_init()
    .ok();
});

fn new_item(name: &str, category: &str, price: f64, stock: i64) -> NewItemRequest {
  NewItemRequest {
    name: name.to_string(),
    description: None,
    price: Money::from_decimal(price).unwrap(),
    category: category.to_string(),
    image_url: None,
    stock_quantity: stock,
  }
}

#[actix_web::test]
async fn shopping_session_against_a_live_server() {
  Lazy::force(&TRACING_INIT);

  let state = AppState::initialize(AppConfig::for_tests()).await.unwrap();
  let server = HttpServer::new(move || build_app(state.clone()))
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();
  let addr = server.addrs()[0];
  let server = server.run();
  let server_handle = server.handle();
  actix_web::rt::spawn(server);

  let api = Arc::new(ApiClient::new(ClientConfig::new(format!("http://{}", addr))).unwrap());

  // Nothing works on the cart before logging in.
  let err = api.get_cart().await.unwrap_err();
  assert!(err.is_auth());

  api
    .signup(&SignupRequest {
      email: "a@x.com".into(),
      password: "pw".into(),
      username: "alice".into(),
    })
    .await
    .unwrap();
  let err = api.login("a@x.com", "wrong").await.unwrap_err();
  assert_eq!(err, ClientError::InvalidCredentials("Incorrect email or password".into()));
  api.login("a@x.com", "pw").await.unwrap();
  assert!(api.is_authenticated());

  let notebook = api.create_item(&new_item("Notebook", "Stationery", 4.5, 20)).await.unwrap();
  let novel = api.create_item(&new_item("Short Novel", "Books", 12.0, 3)).await.unwrap();
  let atlas = api.create_item(&new_item("Atlas", "Books", 60.0, 2)).await.unwrap();

  let books = api
    .list_items(&ItemQuery::default().category("Books").price_between(10.0, 50.0))
    .await
    .unwrap();
  assert_eq!(books.iter().map(|i| i.id).collect::<Vec<_>>(), vec![novel.id]);
  assert_eq!(api.list_categories().await.unwrap(), vec!["Books", "Stationery"]);
  assert_eq!(api.get_item(atlas.id).await.unwrap().name, "Atlas");
  assert!(matches!(api.get_item(9_999).await, Err(ClientError::NotFound(_))));

  let mut controller = CartController::new(api.clone());
  let cart = controller.refresh().await.unwrap();
  assert!(cart.is_empty());

  let cart = controller.add_item(novel.id, 2).await.unwrap();
  let line = cart.line(novel.id).unwrap();
  assert_eq!(line.quantity, 2);
  assert_eq!(line.line_total, Money::from_cents(2400));

  // Upsert through set_quantity, then change and drop a line.
  let cart = controller.set_quantity(notebook.id, 3).await.unwrap();
  assert_eq!(cart.quantity_of(notebook.id), 3);
  let cart = controller.set_quantity(notebook.id, 5).await.unwrap();
  assert_eq!(cart.quantity_of(notebook.id), 5);
  assert_eq!(cart.total_price, Money::from_cents(2400 + 5 * 450));
  let cart = controller.set_quantity(notebook.id, 0).await.unwrap();
  assert!(cart.line(notebook.id).is_none());

  let err = controller.add_item(novel.id, 2).await.unwrap_err();
  assert_eq!(err, ClientError::OutOfStock("Only 3 items available in stock".into()));
  assert_eq!(controller.cart().unwrap().quantity_of(novel.id), 2);
  assert!(!controller.is_stale());

  let cart = controller.remove_item(atlas.id).await.unwrap();
  assert_eq!(cart.items.len(), 1);

  let cart = controller.clear().await.unwrap();
  assert!(cart.is_empty());

  api.logout().await.unwrap();
  assert!(!api.is_authenticated());
  let err = controller.refresh().await.unwrap_err();
  assert!(err.is_auth());
  assert!(controller.cart().is_none());

  server_handle.stop(true).await;
}
