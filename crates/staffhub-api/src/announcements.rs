//! Handler for `GET /announcements`.

use axum::{Json, extract::State};
use serde::Serialize;
use serde_json::{Value, json};
use staffhub_core::{announcement::Announcement, store::HrStore};

use crate::{AppState, error::ApiError, session::CurrentUser};

/// The fields an announcement card shows.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementView {
  pub id:           u64,
  pub title:        String,
  pub content:      String,
  pub category:     String,
  pub priority:     String,
  pub publish_date: String,
}

impl From<Announcement> for AnnouncementView {
  fn from(a: Announcement) -> Self {
    Self {
      id:           a.id,
      title:        a.title,
      content:      a.content,
      category:     a.category,
      priority:     a.priority,
      publish_date: a.publish_date,
    }
  }
}

/// `GET /announcements`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  CurrentUser(_): CurrentUser,
) -> Result<Json<Value>, ApiError>
where
  S: HrStore + 'static,
{
  let announcements: Vec<AnnouncementView> = state
    .store
    .active_announcements(state.wall_clock.today())
    .await
    .map_err(ApiError::store("Failed to fetch announcements"))?
    .into_iter()
    .map(AnnouncementView::from)
    .collect();
  Ok(Json(json!({ "announcements": announcements })))
}
