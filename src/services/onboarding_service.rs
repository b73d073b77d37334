use std::sync::Arc;

use futures::FutureExt;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{ClaimSet, Profile, UserRole},
    repositories::ProfileRepository,
    services::{
        credential_store::CredentialStore, invitation_service::InvitationService, saga::Saga,
    },
};

pub struct ConsumeInvitation {
    pub token: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub requested_role: UserRole,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingOutcome {
    pub user_id: String,
    pub role: UserRole,
    pub school_id: Option<String>,
    pub classroom_id: Option<String>,
    /// Set when the account was provisioned but a non-essential step failed.
    pub warning: Option<String>,
}

/// Provisions user accounts. The identity and the profile row are one
/// logical user: a failure after the identity exists deletes it again.
pub struct OnboardingService {
    credentials: Arc<dyn CredentialStore>,
    profiles: Arc<dyn ProfileRepository>,
    invitations: Arc<InvitationService>,
}

impl OnboardingService {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        profiles: Arc<dyn ProfileRepository>,
        invitations: Arc<InvitationService>,
    ) -> Self {
        Self {
            credentials,
            profiles,
            invitations,
        }
    }

    pub async fn consume_invitation(&self, request: ConsumeInvitation) -> AppResult<OnboardingOutcome> {
        let grant = self
            .invitations
            .validate_token(&request.token)
            .await
            .map_err(|err| match err {
                AppError::TokenNotFound | AppError::TokenExpiredOrUsed => {
                    AppError::InvalidInvitation(err.to_string())
                }
                other => other,
            })?;

        if !request.requested_role.is_invitable() {
            return Err(AppError::UnsupportedRole(format!(
                "{} accounts cannot be created through an invitation",
                request.requested_role
            )));
        }

        if request.requested_role != grant.intended_role {
            log::warn!(
                "Invitation {} requested as {} but grants {}; using the token's role",
                grant.token_id,
                request.requested_role,
                grant.intended_role
            );
        }

        let claims = ClaimSet::new(
            grant.intended_role,
            Some(grant.school_id.clone()),
            grant.classroom_id.clone(),
        );
        let user_id = self
            .provision("consume_invitation", &request.email, &request.password, &request.full_name, &claims)
            .await?;

        let warning = match self.invitations.mark_consumed(&grant).await {
            Ok(()) => None,
            Err(err) => {
                log::warn!(
                    "User {} provisioned but invitation {} could not be marked used: {}",
                    user_id,
                    grant.token_id,
                    err
                );
                Some("Account created, but the invitation could not be marked as used".to_string())
            }
        };

        log::info!("Onboarded {} {} via invitation {}", claims.role, user_id, grant.token_id);

        Ok(OnboardingOutcome {
            user_id,
            role: claims.role,
            school_id: claims.school_id,
            classroom_id: claims.classroom_id,
            warning,
        })
    }

    /// Director self sign-up. The school claim is stamped later, when the
    /// director creates their school.
    pub async fn register_director(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> AppResult<OnboardingOutcome> {
        let claims = ClaimSet::new(UserRole::Director, None, None);
        let user_id = self
            .provision("register_director", email, password, full_name, &claims)
            .await?;

        log::info!("Registered director {}", user_id);

        Ok(OnboardingOutcome {
            user_id,
            role: UserRole::Director,
            school_id: None,
            classroom_id: None,
            warning: None,
        })
    }

    async fn provision(
        &self,
        flow: &'static str,
        email: &str,
        password: &str,
        full_name: &str,
        claims: &ClaimSet,
    ) -> AppResult<String> {
        let mut saga = Saga::new(flow);

        let credentials = Arc::clone(&self.credentials);
        let user_id = saga
            .run_compensated(
                "create_identity",
                async {
                    self.credentials
                        .create_identity(email, password, true)
                        .await
                        .map_err(|err| AppError::IdentityCreationFailed(err.to_string()))
                },
                move |id: &String| {
                    let id = id.clone();
                    async move { credentials.delete_identity(&id).await }.boxed()
                },
            )
            .await?;

        saga.run("set_claims", async {
            self.credentials
                .set_claims(&user_id, claims)
                .await
                .map_err(|err| AppError::ClaimAssignmentFailed(err.to_string()))
        })
        .await?;

        let profile = Profile::new(&user_id, claims, full_name, email);
        saga.run("upsert_profile", async {
            self.profiles
                .upsert(profile)
                .await
                .map_err(|err| AppError::ProfilePersistenceFailed(err.to_string()))
        })
        .await?;

        saga.complete();
        Ok(user_id)
    }
}
