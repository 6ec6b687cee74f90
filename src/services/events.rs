// SPDX-License-Identifier: MIT

//! Calendar event service.

use crate::db::{collections, Direction, Filter, QuerySpec, Stored};
use crate::error::{AppError, Result};
use crate::models::{EventDoc, EventForm};
use crate::session::SessionContext;
use chrono::{Datelike, Months, NaiveDate, TimeZone, Utc};
use std::sync::Arc;
use validator::Validate;

/// Calendar events for one session.
pub struct EventService {
    ctx: Arc<SessionContext>,
}

impl EventService {
    pub fn new(ctx: Arc<SessionContext>) -> Self {
        Self { ctx }
    }

    /// All events within one calendar month, date ascending.
    pub async fn month_events(&self, year: i32, month: u32) -> Result<Vec<Stored<EventDoc>>> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| AppError::BadRequest(format!("invalid month {}-{}", year, month)))?;
        let end = start
            .checked_add_months(Months::new(1))
            .unwrap_or(start)
            .pred_opt()
            .unwrap_or(start);

        let start_ts = Utc
            .with_ymd_and_hms(start.year(), start.month(), start.day(), 0, 0, 0)
            .single()
            .ok_or_else(|| AppError::BadRequest("invalid month start".to_string()))?;
        let end_ts = Utc
            .with_ymd_and_hms(end.year(), end.month(), end.day(), 23, 59, 59)
            .single()
            .ok_or_else(|| AppError::BadRequest("invalid month end".to_string()))?;

        self.ctx
            .db
            .query_docs(
                collections::EVENTS,
                QuerySpec::new()
                    .filter(Filter::Gte(
                        "date".to_string(),
                        serde_json::to_value(start_ts).map_err(|e| AppError::Store(e.to_string()))?,
                    ))
                    .filter(Filter::Lte(
                        "date".to_string(),
                        serde_json::to_value(end_ts).map_err(|e| AppError::Store(e.to_string()))?,
                    ))
                    .order_by("date", Direction::Ascending),
            )
            .await
    }

    /// Create an event authored by the signed-in user.
    pub async fn add_event(&self, form: EventForm) -> Result<String> {
        let user = self.ctx.require_user()?;
        form.validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let event = EventDoc {
            title: form.title,
            event_type: form.event_type,
            date: form.date,
            end_date: form.end_date,
            location: form.location,
            description: form.description,
            created_by: user.user_id.clone(),
            created_by_name: user.display_name.clone(),
        };
        self.ctx.db.insert_doc(collections::EVENTS, &event).await
    }

    /// Delete one's own event.
    pub async fn delete_event(&self, event_id: &str) -> Result<()> {
        let user = self.ctx.require_user()?;

        let event: Stored<EventDoc> = self
            .ctx
            .db
            .get_doc(collections::EVENTS, event_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("event {}", event_id)))?;

        if event.doc.created_by != user.user_id {
            return Err(AppError::Unauthorized(
                "only the author may delete an event".to_string(),
            ));
        }
        self.ctx.db.delete_doc(collections::EVENTS, event_id).await
    }
}
