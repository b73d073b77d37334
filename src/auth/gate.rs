//! Claims-based access gate.
//!
//! The gate proves identity and role membership only. Whether a caller may
//! touch a particular school or classroom is decided by the caller with the
//! scoping helpers below.

use async_graphql::Context;

use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
    models::domain::user::UserRole,
};

/// Extracts the token from an `Authorization: Bearer <token>` header value.
///
/// Fails with `Unauthorized` when the header is missing, empty or uses
/// another scheme.
pub fn bearer_token(header: Option<&str>) -> AppResult<&str> {
    let header = header.ok_or_else(|| {
        AppError::Unauthorized("Missing authorization header".to_string())
    })?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization header format".to_string()))
}

pub fn authorize<'a>(claims: Option<&'a Claims>, required_roles: &[UserRole]) -> AppResult<&'a Claims> {
    let claims =
        claims.ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    if !required_roles.contains(&claims.role) {
        return Err(AppError::Forbidden(format!(
            "Role {} may not perform this action",
            claims.role
        )));
    }

    Ok(claims)
}

pub fn require_school(claims: &Claims, school_id: &str) -> AppResult<()> {
    if claims.school_id.as_deref() != Some(school_id) {
        return Err(AppError::Forbidden(
            "You can only access resources of your own school".to_string(),
        ));
    }
    Ok(())
}

/// Directors may reach every classroom of their school; teachers and parents
/// only their own.
pub fn require_classroom(claims: &Claims, school_id: &str, classroom_id: &str) -> AppResult<()> {
    require_school(claims, school_id)?;

    if claims.role != UserRole::Director && claims.classroom_id.as_deref() != Some(classroom_id) {
        return Err(AppError::Forbidden(
            "You can only access your own classroom".to_string(),
        ));
    }
    Ok(())
}

pub fn extract_claims_from_context(ctx: &Context<'_>) -> AppResult<Claims> {
    ctx.data::<Claims>()
        .cloned()
        .map_err(|_| AppError::Unauthorized("Authentication required".to_string()))
}
