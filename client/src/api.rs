// client/src/api.rs

//! HTTP gateway to the backend. Attaches the bearer token, decodes success
//! bodies and turns every failure into a [`ClientError`].

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use shopfront_core::wire::{
  AddToCartRequest, CartView, ItemQuery, ItemView, LoginRequest, MessageResponse, NewItemRequest, SignupRequest,
  TokenResponse, UpdateQuantityRequest, UserSummary,
};
use tracing::{debug, instrument, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::session::Session;

/// The cart operations the controller needs from the backend.
#[async_trait]
pub trait CartApi: Send + Sync {
  async fn get_cart(&self) -> Result<CartView>;
  async fn add_item(&self, item_id: i64, quantity: i64) -> Result<CartView>;
  async fn update_quantity(&self, item_id: i64, quantity: i64) -> Result<CartView>;
  async fn remove_item(&self, item_id: i64) -> Result<CartView>;
  async fn clear(&self) -> Result<CartView>;
}

#[derive(Debug)]
pub struct ApiClient {
  http: Client,
  config: ClientConfig,
  session: RwLock<Option<Session>>,
}

impl ApiClient {
  pub fn new(config: ClientConfig) -> Result<Self> {
    let http = Client::builder()
      .timeout(config.timeout)
      .build()
      .map_err(|e| ClientError::Network(format!("building HTTP client: {}", e)))?;
    Ok(Self::with_client(http, config))
  }

  /// Uses a caller-built reqwest [`Client`] (proxies, custom TLS, ...).
  pub fn with_client(http: Client, config: ClientConfig) -> Self {
    Self {
      http,
      config,
      session: RwLock::new(None),
    }
  }

  pub fn config(&self) -> &ClientConfig {
    &self.config
  }

  pub fn session(&self) -> Option<Session> {
    self.session.read().clone()
  }

  pub fn set_session(&self, session: Session) {
    *self.session.write() = Some(session);
  }

  pub fn clear_session(&self) {
    *self.session.write() = None;
  }

  /// Advisory: a session exists and its recorded expiry has not passed.
  pub fn is_authenticated(&self) -> bool {
    self
      .session
      .read()
      .as_ref()
      .is_some_and(|s| !s.is_expired_at(Utc::now()))
  }

  fn request(&self, method: Method, path: &str) -> RequestBuilder {
    self.http.request(method, self.config.endpoint(path))
  }

  fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder> {
    let header = self
      .session
      .read()
      .as_ref()
      .map(Session::authorization)
      .ok_or_else(|| ClientError::Unauthenticated("Not authenticated".to_string()))?;
    Ok(self.request(method, path).header(AUTHORIZATION, header))
  }

  async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
    let response = builder.send().await?;
    let status = response.status();
    if status.is_success() {
      return response.json::<T>().await.map_err(|e| ClientError::Decode(e.to_string()));
    }

    let body = response.bytes().await?;
    let err = ClientError::from_response(status.as_u16(), &body);
    if status == StatusCode::UNAUTHORIZED && matches!(err, ClientError::Unauthenticated(_)) {
      let had_session = self.session.write().take().is_some();
      if had_session {
        warn!("Server rejected the session token; session cleared.");
      }
    }
    debug!(status = status.as_u16(), error = %err, "Request failed.");
    Err(err)
  }

  // --- Auth ---

  #[instrument(name = "api::signup", skip(self, req), fields(email = %req.email))]
  pub async fn signup(&self, req: &SignupRequest) -> Result<UserSummary> {
    self.send(self.request(Method::POST, "/auth/signup").json(req)).await
  }

  /// Logs in and keeps the returned token as the current session.
  #[instrument(name = "api::login", skip(self, password))]
  pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
    let req = LoginRequest {
      email: email.to_string(),
      password: password.to_string(),
    };
    let token: TokenResponse = self.send(self.request(Method::POST, "/auth/login").json(&req)).await?;
    let session = Session::from_token_response(&token, Utc::now());
    self.set_session(session.clone());
    debug!(expires_at = %session.expires_at, "Logged in.");
    Ok(session)
  }

  /// Revokes the token server-side. The local session is dropped either way.
  #[instrument(name = "api::logout", skip(self))]
  pub async fn logout(&self) -> Result<MessageResponse> {
    let result = match self.authorized(Method::POST, "/auth/logout") {
      Ok(builder) => self.send(builder).await,
      Err(e) => Err(e),
    };
    self.clear_session();
    result
  }

  // --- Catalog ---

  #[instrument(name = "api::list_items", skip(self))]
  pub async fn list_items(&self, query: &ItemQuery) -> Result<Vec<ItemView>> {
    self.send(self.request(Method::GET, "/items").query(query)).await
  }

  #[instrument(name = "api::get_item", skip(self))]
  pub async fn get_item(&self, item_id: i64) -> Result<ItemView> {
    self.send(self.request(Method::GET, &format!("/items/{}", item_id))).await
  }

  #[instrument(name = "api::create_item", skip(self, req), fields(name = %req.name))]
  pub async fn create_item(&self, req: &NewItemRequest) -> Result<ItemView> {
    self.send(self.authorized(Method::POST, "/items")?.json(req)).await
  }

  #[instrument(name = "api::list_categories", skip(self))]
  pub async fn list_categories(&self) -> Result<Vec<String>> {
    self.send(self.request(Method::GET, "/categories")).await
  }
}

#[async_trait]
impl CartApi for ApiClient {
  #[instrument(name = "api::get_cart", skip(self))]
  async fn get_cart(&self) -> Result<CartView> {
    self.send(self.authorized(Method::GET, "/cart")?).await
  }

  #[instrument(name = "api::add_item", skip(self))]
  async fn add_item(&self, item_id: i64, quantity: i64) -> Result<CartView> {
    let body = AddToCartRequest { item_id, quantity };
    self.send(self.authorized(Method::POST, "/cart/items")?.json(&body)).await
  }

  #[instrument(name = "api::update_quantity", skip(self))]
  async fn update_quantity(&self, item_id: i64, quantity: i64) -> Result<CartView> {
    let body = UpdateQuantityRequest { quantity };
    self
      .send(self.authorized(Method::PUT, &format!("/cart/items/{}", item_id))?.json(&body))
      .await
  }

  #[instrument(name = "api::remove_item", skip(self))]
  async fn remove_item(&self, item_id: i64) -> Result<CartView> {
    self
      .send(self.authorized(Method::DELETE, &format!("/cart/items/{}", item_id))?)
      .await
  }

  #[instrument(name = "api::clear_cart", skip(self))]
  async fn clear(&self) -> Result<CartView> {
    self.send(self.authorized(Method::DELETE, "/cart/items/clear")?).await
  }
}
