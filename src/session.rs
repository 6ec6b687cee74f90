// SPDX-License-Identifier: MIT

//! Explicit per-session context.
//!
//! Created at session start and passed to every service constructor; torn
//! down with the session. There is no process-wide current-user singleton.

use crate::config::Config;
use crate::db::Datastore;
use crate::error::{AppError, Result};
use crate::time_utils::Clock;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;

/// The authenticated principal, as provided by the external auth
/// collaborator.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user_id: String,
    pub display_name: String,
    pub photo_url: String,
}

/// Everything a service needs for one user session: configuration, the
/// datastore, a time source, and the (possibly absent) signed-in user.
pub struct SessionContext {
    pub config: Config,
    pub db: Datastore,
    clock: Arc<dyn Clock>,
    user: Option<SessionUser>,
}

impl SessionContext {
    pub fn new(
        config: Config,
        db: Datastore,
        clock: Arc<dyn Clock>,
        user: Option<SessionUser>,
    ) -> Self {
        Self {
            config,
            db,
            clock,
            user,
        }
    }

    /// The signed-in user, if any.
    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    /// The signed-in user, or `Unauthenticated`.
    pub fn require_user(&self) -> Result<&SessionUser> {
        self.user.as_ref().ok_or(AppError::Unauthenticated)
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// The current local calendar day.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::time_utils::FixedClock;

    #[test]
    fn test_require_user_without_session_user() {
        let ctx = SessionContext::new(
            Config::default(),
            Datastore::new(
                Arc::new(MemoryStore::new()),
                std::time::Duration::from_secs(1),
            ),
            Arc::new(FixedClock(
                NaiveDate::from_ymd_opt(2026, 8, 29).unwrap(),
            )),
            None,
        );
        assert!(matches!(
            ctx.require_user().unwrap_err(),
            AppError::Unauthenticated
        ));
    }
}
