use async_graphql::{Context, ErrorExtensions};

use crate::{
    app_state::AppState,
    auth::{extract_claims_from_context, Claims},
    errors::AppResult,
};

/// Converts a service result into a GraphQL result carrying the error `code`
/// extension.
pub fn gql<T>(result: AppResult<T>) -> async_graphql::Result<T> {
    result.map_err(|err| err.extend())
}

/// The application state and the authenticated caller of this request.
pub fn request_context<'a>(ctx: &Context<'a>) -> AppResult<(&'a AppState, Claims)> {
    let state = ctx.data::<AppState>()?;
    let claims = extract_claims_from_context(ctx)?;
    Ok((state, claims))
}
