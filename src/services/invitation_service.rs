use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::{
    errors::{AppError, AppResult},
    models::domain::{InvitationGrant, InvitationToken, UserRole},
    repositories::InvitationTokenRepository,
};

/// Issues and validates invitation tokens.
pub struct InvitationService {
    repository: Arc<dyn InvitationTokenRepository>,
    parent_invitation_ttl: Duration,
}

impl InvitationService {
    pub fn new(repository: Arc<dyn InvitationTokenRepository>, parent_invitation_ttl_days: i64) -> Self {
        Self {
            repository,
            parent_invitation_ttl: Duration::days(parent_invitation_ttl_days),
        }
    }

    /// Returns the classroom's live reusable PARENT token, creating one if
    /// there is none or the current one has expired.
    pub async fn issue_or_reuse_parent_invitation(
        &self,
        classroom_id: &str,
        school_id: &str,
        created_by: &str,
    ) -> AppResult<InvitationToken> {
        let now = Utc::now();

        if let Some(existing) = self
            .repository
            .find_active_reusable(classroom_id, UserRole::Parent)
            .await?
        {
            if existing.is_usable_at(now) {
                return Ok(existing);
            }

            log::info!(
                "Retiring expired parent invitation {} for classroom {}",
                existing.id,
                classroom_id
            );
            self.repository.retire(&existing.id).await?;
        }

        let token = InvitationToken::reusable_parent(
            classroom_id,
            school_id,
            created_by,
            now + self.parent_invitation_ttl,
        );

        match self.repository.insert(token).await {
            Ok(created) => {
                log::info!("Issued parent invitation {} for classroom {}", created.id, classroom_id);
                Ok(created)
            }
            Err(AppError::AlreadyExists(_)) => {
                // a concurrent call filled the slot first
                self.repository
                    .find_active_reusable(classroom_id, UserRole::Parent)
                    .await?
                    .filter(|winner| winner.is_usable_at(Utc::now()))
                    .ok_or_else(|| {
                        AppError::Unexpected(format!(
                            "Parent invitation for classroom {} changed concurrently",
                            classroom_id
                        ))
                    })
            }
            Err(err) => Err(err),
        }
    }

    pub async fn create_single_use_invitation(
        &self,
        school_id: &str,
        classroom_id: Option<&str>,
        intended_role: UserRole,
        created_by: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<InvitationToken> {
        if !intended_role.is_invitable() {
            return Err(AppError::UnsupportedRole(format!(
                "{} accounts cannot be created through an invitation",
                intended_role
            )));
        }

        if expires_at <= Utc::now() {
            return Err(AppError::ValidationError(
                "Invitation expiry must be in the future".to_string(),
            ));
        }

        let token = InvitationToken::single_use(
            school_id,
            classroom_id,
            intended_role,
            created_by,
            expires_at,
        );
        let created = self.repository.insert(token).await?;

        log::info!(
            "Issued single-use {} invitation {} for school {}",
            created.intended_role,
            created.id,
            school_id
        );
        Ok(created)
    }

    pub async fn validate_token(&self, token: &str) -> AppResult<InvitationGrant> {
        self.validate_token_at(token, Utc::now()).await
    }

    pub async fn validate_token_at(&self, token: &str, now: DateTime<Utc>) -> AppResult<InvitationGrant> {
        let invitation = self
            .repository
            .find_by_token(token)
            .await?
            .ok_or(AppError::TokenNotFound)?;

        if !invitation.is_usable_at(now) {
            return Err(AppError::TokenExpiredOrUsed);
        }

        Ok(invitation.grant())
    }

    /// Marks a single-use token consumed. Reusable tokens are left untouched.
    pub async fn mark_consumed(&self, grant: &InvitationGrant) -> AppResult<()> {
        if !grant.single_use {
            return Ok(());
        }

        let marked = self.repository.mark_used(&grant.token_id, Utc::now()).await?;
        if !marked {
            log::warn!("Invitation {} was already marked as used", grant.token_id);
        }

        Ok(())
    }
}
