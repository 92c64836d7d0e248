//! Call Service
//!
//! Call session persistence and status transitions. Media never touches the
//! server; the handlers relay WebRTC offer/answer/ICE payloads through the
//! realtime layer and this service keeps the call record consistent.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{CallRepository, CallSession, CallStatus, CallType, User, UserRepository};
use crate::shared::error::AppError;
use crate::shared::id::prefixed_id;

const DEFAULT_HISTORY_LIMIT: i64 = 50;

/// Call session operations.
pub struct CallService {
    call_repo: Arc<dyn CallRepository>,
    user_repo: Arc<dyn UserRepository>,
}

impl CallService {
    pub fn new(call_repo: Arc<dyn CallRepository>, user_repo: Arc<dyn UserRepository>) -> Self {
        Self {
            call_repo,
            user_repo,
        }
    }

    /// Create a RINGING call session.
    ///
    /// Returns the session and the receiver account for the offline
    /// email fallback.
    pub async fn initiate(
        &self,
        caller_id: &str,
        receiver_id: &str,
        call_type: &str,
    ) -> Result<(CallSession, User), AppError> {
        if caller_id == receiver_id {
            return Err(AppError::BadRequest("Cannot call yourself".to_string()));
        }

        let receiver = self
            .user_repo
            .find_by_id(receiver_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Receiver not found".to_string()))?;

        let call = CallSession {
            call_id: prefixed_id("call"),
            caller_id: caller_id.to_string(),
            receiver_id: receiver.user_id.clone(),
            call_type: CallType::from_str(call_type),
            status: CallStatus::Ringing,
            started_at: None,
            ended_at: None,
            duration_seconds: None,
            created_at: Utc::now(),
        };

        let stored = self.call_repo.create(&call).await?;
        Ok((stored, receiver))
    }

    /// Apply a status transition requested by one of the call's parties.
    ///
    /// Accepting stamps started_at; a terminal status stamps ended_at and
    /// computes the duration when the call had been accepted.
    pub async fn update_status(
        &self,
        call_id: &str,
        user_id: &str,
        status: &str,
    ) -> Result<CallSession, AppError> {
        let mut call = self
            .call_repo
            .find_by_id(call_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Call session not found".to_string()))?;

        if !call.involves(user_id) {
            return Err(AppError::Forbidden(
                "Not a party of this call".to_string(),
            ));
        }

        if call.status.is_terminal() {
            return Err(AppError::Conflict("Call already ended".to_string()));
        }

        let new_status = CallStatus::parse(status)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown call status: {}", status)))?;
        let now = Utc::now();

        match new_status {
            CallStatus::Accepted => {
                call.started_at = Some(now);
            }
            s if s.is_terminal() => {
                call.ended_at = Some(now);
                if let Some(started_at) = call.started_at {
                    call.duration_seconds = Some((now - started_at).num_seconds() as i32);
                }
            }
            _ => {}
        }
        call.status = new_status;

        self.call_repo.update(&call).await
    }

    /// Fetch a user account, typically the caller for event payloads.
    pub async fn get_user(&self, user_id: &str) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Fetch a call both parties may inspect.
    pub async fn get_for_party(&self, call_id: &str, user_id: &str) -> Result<CallSession, AppError> {
        let call = self
            .call_repo
            .find_by_id(call_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Call session not found".to_string()))?;

        if !call.involves(user_id) {
            return Err(AppError::Forbidden(
                "Not a party of this call".to_string(),
            ));
        }

        Ok(call)
    }

    /// Call history for a user, newest first.
    pub async fn history(&self, user_id: &str) -> Result<Vec<CallSession>, AppError> {
        self.call_repo
            .find_for_user(user_id, DEFAULT_HISTORY_LIMIT)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;

    struct StubCallRepo {
        call: Mutex<CallSession>,
        updated: Mutex<bool>,
    }

    impl StubCallRepo {
        fn with_call(call: CallSession) -> Arc<Self> {
            Arc::new(Self {
                call: Mutex::new(call),
                updated: Mutex::new(false),
            })
        }
    }

    #[async_trait]
    impl CallRepository for StubCallRepo {
        async fn create(&self, call: &CallSession) -> Result<CallSession, AppError> {
            Ok(call.clone())
        }

        async fn find_by_id(&self, _call_id: &str) -> Result<Option<CallSession>, AppError> {
            Ok(Some(self.call.lock().unwrap().clone()))
        }

        async fn update(&self, call: &CallSession) -> Result<CallSession, AppError> {
            *self.updated.lock().unwrap() = true;
            *self.call.lock().unwrap() = call.clone();
            Ok(call.clone())
        }

        async fn find_for_user(
            &self,
            _user_id: &str,
            _limit: i64,
        ) -> Result<Vec<CallSession>, AppError> {
            Ok(vec![])
        }
    }

    struct StubUserRepo;

    #[async_trait]
    impl UserRepository for StubUserRepo {
        async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, AppError> {
            Ok(Some(User {
                user_id: user_id.to_string(),
                email: format!("{}@example.com", user_id),
                password_hash: "hash".into(),
                full_name: "Test User".into(),
                user_type: crate::domain::UserType::Student,
                phone: None,
                country: None,
                timezone: None,
                avatar_url: None,
                is_active: true,
                created_at: Utc::now(),
            }))
        }

        async fn find_by_email(&self, _email: &str) -> Result<Option<User>, AppError> {
            Ok(None)
        }

        async fn create(&self, user: &User) -> Result<User, AppError> {
            Ok(user.clone())
        }

        async fn update(&self, user: &User) -> Result<User, AppError> {
            Ok(user.clone())
        }

        async fn email_exists(&self, _email: &str) -> Result<bool, AppError> {
            Ok(false)
        }
    }

    fn accepted_call() -> CallSession {
        CallSession {
            call_id: "call_aa11bb22cc33".into(),
            caller_id: "user_caller".into(),
            receiver_id: "user_receiver".into(),
            call_type: CallType::Video,
            status: CallStatus::Accepted,
            started_at: Some(Utc::now()),
            ended_at: None,
            duration_seconds: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_unknown_status_string_is_rejected() {
        let repo = StubCallRepo::with_call(accepted_call());
        let service = CallService::new(repo.clone(), Arc::new(StubUserRepo));

        let result = service
            .update_status("call_aa11bb22cc33", "user_caller", "garbage")
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        // The accepted call must keep its state; nothing was persisted.
        assert!(!*repo.updated.lock().unwrap());
        assert_eq!(repo.call.lock().unwrap().status, CallStatus::Accepted);
    }

    #[tokio::test]
    async fn test_ending_accepted_call_stamps_duration() {
        let repo = StubCallRepo::with_call(accepted_call());
        let service = CallService::new(repo.clone(), Arc::new(StubUserRepo));

        let updated = service
            .update_status("call_aa11bb22cc33", "user_receiver", "ended")
            .await
            .unwrap();

        assert_eq!(updated.status, CallStatus::Ended);
        assert!(updated.ended_at.is_some());
        assert!(updated.duration_seconds.is_some());
    }
}
