//! JSON REST API for the staffhub employee portal.
//!
//! Exposes an axum [`Router`] backed by any [`staffhub_core::store::HrStore`].
//! Every route except the `/auth` family requires the session cookie set by
//! login or activation. TLS and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = staffhub_api::router(state); // routes under `/api`
//! ```

pub mod announcements;
pub mod auth;
pub mod compensation;
pub mod dashboard;
pub mod documents;
pub mod dtr;
pub mod error;
pub mod leave;
pub mod notify;
pub mod password;
pub mod session;
pub mod user;

use std::sync::Arc;

use axum::{
  Router,
  extract::{FromRequest, FromRequestParts},
  routing::{get, post, put},
};
use chrono::{Local, NaiveDate, NaiveDateTime};
use staffhub_core::store::HrStore;

pub use error::ApiError;
pub use notify::{LogNotifier, Notice, Notifier};
pub use session::{SessionConfig, SessionKeys};

use dtr::ClockLocks;

// ─── Application state ───────────────────────────────────────────────────────

/// Source of the local date and time used for clocking and request dates.
#[derive(Debug, Clone, Copy, Default)]
pub enum WallClock {
  #[default]
  System,
  Fixed(NaiveDateTime),
}

impl WallClock {
  pub fn now(&self) -> NaiveDateTime {
    match self {
      Self::System => Local::now().naive_local(),
      Self::Fixed(at) => *at,
    }
  }

  pub fn today(&self) -> NaiveDate { self.now().date() }
}

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub store:       Arc<S>,
  pub sessions:    Arc<SessionKeys>,
  pub notifier:    Arc<dyn Notifier>,
  pub clock_locks: Arc<ClockLocks>,
  pub wall_clock:  WallClock,
}

impl<S> AppState<S> {
  pub fn new(store: Arc<S>, sessions: SessionKeys) -> Self {
    Self {
      store,
      sessions: Arc::new(sessions),
      notifier: Arc::new(LogNotifier),
      clock_locks: Arc::default(),
      wall_clock: WallClock::System,
    }
  }

  pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
    self.notifier = notifier;
    self
  }

  pub fn with_wall_clock(mut self, wall_clock: WallClock) -> Self {
    self.wall_clock = wall_clock;
    self
  }
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:       Arc::clone(&self.store),
      sessions:    Arc::clone(&self.sessions),
      notifier:    Arc::clone(&self.notifier),
      clock_locks: Arc::clone(&self.clock_locks),
      wall_clock:  self.wall_clock,
    }
  }
}

// ─── Extractors ──────────────────────────────────────────────────────────────

/// `Json` whose rejection answers in the API's `{"error": ...}` shape.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `Query` with the same rejection shape as [`ApiJson`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

// ─── Router ──────────────────────────────────────────────────────────────────

/// Routes relative to the API root; nest under any prefix.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: HrStore + 'static,
{
  Router::new()
    // Auth
    .route("/auth/login", post(auth::login::<S>))
    .route("/auth/logout", post(auth::logout::<S>))
    .route("/auth/activate", post(auth::request_activation::<S>).put(auth::activate::<S>))
    .route("/auth/forgot-password", post(auth::forgot_password::<S>))
    // Profile
    .route("/user/me", get(user::me::<S>))
    .route("/user/profile", put(user::update_profile::<S>))
    // Requests
    .route("/leave", get(leave::list::<S>).post(leave::create::<S>))
    .route("/leave/balance", get(leave::balances::<S>))
    .route("/documents", get(documents::list::<S>).post(documents::create::<S>))
    // Time records
    .route("/dtr", get(dtr::list::<S>))
    .route("/dtr/today", get(dtr::today::<S>))
    .route("/dtr/clock", post(dtr::clock::<S>))
    // Compensation
    .route("/payroll", get(compensation::payroll::<S>))
    .route("/payslips", get(compensation::payslips::<S>))
    .route("/benefits", get(compensation::benefits::<S>))
    .route("/loans", get(compensation::loans::<S>))
    // Overview
    .route("/announcements", get(announcements::list::<S>))
    .route("/dashboard", get(dashboard::employee::<S>))
    .route("/admin/executive-dashboard", get(dashboard::executive::<S>))
    .with_state(state)
}

/// The API mounted under `/api`.
pub fn router<S>(state: AppState<S>) -> Router<()>
where
  S: HrStore + 'static,
{
  Router::new().nest("/api", api_router(state))
}
