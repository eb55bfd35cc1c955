//! Outbound account emails.

use thiserror::Error;

/// A one-time link an employee must receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice<'a> {
  Activation { email: &'a str, first_name: &'a str, token: &'a str },
  PasswordReset { email: &'a str, first_name: &'a str, token: &'a str },
}

impl Notice<'_> {
  pub fn kind(&self) -> &'static str {
    match self {
      Self::Activation { .. } => "activation",
      Self::PasswordReset { .. } => "password_reset",
    }
  }

  pub fn email(&self) -> &str {
    match self {
      Self::Activation { email, .. } | Self::PasswordReset { email, .. } => email,
    }
  }
}

#[derive(Debug, Error)]
#[error("failed to deliver {kind} notice: {reason}")]
pub struct NotifyError {
  pub kind:   &'static str,
  pub reason: String,
}

pub trait Notifier: Send + Sync + 'static {
  fn notify(&self, notice: &Notice<'_>) -> Result<(), NotifyError>;
}

/// Records that a notice would have been sent. The token is not logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
  fn notify(&self, notice: &Notice<'_>) -> Result<(), NotifyError> {
    tracing::info!(kind = notice.kind(), email = notice.email(), "account notice queued");
    Ok(())
  }
}
