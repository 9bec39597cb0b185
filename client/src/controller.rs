// client/src/controller.rs

//! Local mirror of the server cart.
//!
//! The server is the only source of truth. After every mutation the mirror
//! entry is dropped and the cart re-fetched; quantities are never patched in
//! ahead of the server. A failed mutation reloads the cart before the error
//! is returned, and a failed reload marks the mirror stale.

use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;
use std::future::Future;
use std::sync::Arc;

use shopfront_core::wire::CartView;
use tracing::{debug, info, instrument, warn};

use crate::api::CartApi;
use crate::error::{ClientError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
  Info,
  Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
  pub level: NotificationLevel,
  pub message: String,
}

/// Item ids with a mutation in flight. Clones share the same set, so a UI
/// can hold one while the controller is busy awaiting the server.
#[derive(Debug, Clone, Default)]
pub struct PendingItems(Arc<RwLock<HashSet<i64>>>);

impl PendingItems {
  pub fn contains(&self, item_id: i64) -> bool {
    self.0.read().contains(&item_id)
  }

  pub fn is_empty(&self) -> bool {
    self.0.read().is_empty()
  }

  fn insert(&self, item_id: i64) {
    self.0.write().insert(item_id);
  }

  fn remove(&self, item_id: i64) {
    self.0.write().remove(&item_id);
  }
}

pub struct CartController<A: CartApi> {
  api: Arc<A>,
  /// Keyed by cart id. Holds at most the current user's cart.
  mirror: HashMap<i64, CartView>,
  current: Option<i64>,
  pending: PendingItems,
  stale: bool,
  notifications: Vec<Notification>,
}

impl<A: CartApi> CartController<A> {
  pub fn new(api: Arc<A>) -> Self {
    Self {
      api,
      mirror: HashMap::new(),
      current: None,
      pending: PendingItems::default(),
      stale: false,
      notifications: Vec::new(),
    }
  }

  pub fn api(&self) -> &Arc<A> {
    &self.api
  }

  /// The last cart the server reported, if any.
  pub fn cart(&self) -> Option<&CartView> {
    self.current.and_then(|id| self.mirror.get(&id))
  }

  /// Whether a mutation touching `item_id` is in flight.
  pub fn is_pending(&self, item_id: i64) -> bool {
    self.pending.contains(item_id)
  }

  /// Shared view of the in-flight set, readable while a mutation awaits.
  pub fn pending_items(&self) -> PendingItems {
    self.pending.clone()
  }

  pub fn is_stale(&self) -> bool {
    self.stale
  }

  pub fn notifications(&self) -> &[Notification] {
    &self.notifications
  }

  pub fn take_notifications(&mut self) -> Vec<Notification> {
    std::mem::take(&mut self.notifications)
  }

  fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
    self.notifications.push(Notification {
      level,
      message: message.into(),
    });
  }

  fn store(&mut self, cart: CartView) {
    if let Some(previous) = self.current.filter(|id| *id != cart.id) {
      self.mirror.remove(&previous);
    }
    self.current = Some(cart.id);
    self.mirror.insert(cart.id, cart);
    self.stale = false;
  }

  fn invalidate(&mut self) {
    if let Some(id) = self.current {
      self.mirror.remove(&id);
    }
  }

  fn reload_failed(&mut self, err: &ClientError) {
    if err.is_auth() {
      // The cart belonged to a session that no longer exists.
      self.mirror.clear();
      self.current = None;
    }
    self.stale = true;
    warn!(error = %err, "Cart reload failed; mirror marked stale.");
  }

  /// Fetches the authoritative cart into the mirror.
  #[instrument(name = "cart_controller::refresh", skip(self))]
  pub async fn refresh(&mut self) -> Result<CartView> {
    match self.api.get_cart().await {
      Ok(cart) => {
        self.store(cart.clone());
        Ok(cart)
      }
      Err(err) => {
        self.reload_failed(&err);
        self.notify(NotificationLevel::Error, err.user_message());
        Err(err)
      }
    }
  }

  #[instrument(name = "cart_controller::add_item", skip(self))]
  pub async fn add_item(&mut self, item_id: i64, quantity: i64) -> Result<CartView> {
    self
      .mutate(Some(item_id), "Item added to cart", move |api| async move {
        api.add_item(item_id, quantity).await
      })
      .await
  }

  /// Quantities below 1 remove the line. A line the server does not know
  /// about is created with `quantity` instead.
  #[instrument(name = "cart_controller::set_quantity", skip(self))]
  pub async fn set_quantity(&mut self, item_id: i64, quantity: i64) -> Result<CartView> {
    if quantity < 1 {
      return self.remove_item(item_id).await;
    }
    self
      .mutate(Some(item_id), "Cart updated", move |api| async move {
        match api.update_quantity(item_id, quantity).await {
          Err(ClientError::ItemNotInCart(_)) => {
            info!(item_id, quantity, "Item not in cart; adding it instead.");
            api.add_item(item_id, quantity).await
          }
          other => other,
        }
      })
      .await
  }

  #[instrument(name = "cart_controller::remove_item", skip(self))]
  pub async fn remove_item(&mut self, item_id: i64) -> Result<CartView> {
    self
      .mutate(Some(item_id), "Item removed from cart", move |api| async move {
        api.remove_item(item_id).await
      })
      .await
  }

  #[instrument(name = "cart_controller::clear", skip(self))]
  pub async fn clear(&mut self) -> Result<CartView> {
    self
      .mutate(None, "Cart cleared", |api| async move { api.clear().await })
      .await
  }

  async fn mutate<F, Fut>(&mut self, item_id: Option<i64>, done: &str, op: F) -> Result<CartView>
  where
    F: FnOnce(Arc<A>) -> Fut,
    Fut: Future<Output = Result<CartView>>,
  {
    if let Some(id) = item_id {
      self.pending.insert(id);
    }

    let outcome = match op(Arc::clone(&self.api)).await {
      Ok(returned) => {
        self.invalidate();
        let cart = match self.api.get_cart().await {
          Ok(fresh) => fresh,
          Err(err) => {
            warn!(error = %err, "Reload after mutation failed; keeping the mutation response.");
            returned
          }
        };
        self.store(cart.clone());
        self.notify(NotificationLevel::Info, done);
        Ok(cart)
      }
      Err(err) => {
        debug!(error = %err, "Cart mutation failed; reloading before reporting it.");
        match self.api.get_cart().await {
          Ok(fresh) => self.store(fresh),
          Err(reload_err) => self.reload_failed(&reload_err),
        }
        self.notify(NotificationLevel::Error, err.user_message());
        Err(err)
      }
    };

    if let Some(id) = item_id {
      self.pending.remove(id);
    }
    outcome
  }

  /// Plain-text rendering of the mirror.
  pub fn render(&self) -> String {
    let Some(cart) = self.cart() else {
      return if self.stale {
        "Cart unavailable".to_string()
      } else {
        "Cart not loaded".to_string()
      };
    };

    let mut out = String::new();
    if cart.is_empty() {
      out.push_str("Your cart is empty");
    } else {
      let _ = writeln!(out, "Cart #{} ({} items)", cart.id, cart.total_items);
      for line in &cart.items {
        let _ = write!(
          out,
          "  {} x {} @ {} = {}",
          line.quantity, line.name, line.price, line.line_total
        );
        if self.is_pending(line.item_id) {
          out.push_str(" [updating]");
        }
        out.push('\n');
      }
      let _ = write!(out, "Total: {}", cart.total_price);
    }
    if self.stale {
      out.push_str("\n(may be out of date)");
    }
    out
  }
}
