use actix_web::{post, web};
use async_graphql::{EmptySubscription, Schema as GraphQLSchema};
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    graphql::schema_impl::{MutationRoot, QueryRoot},
};

pub type Schema = GraphQLSchema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn create_schema(app_state: AppState) -> Schema {
    GraphQLSchema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(app_state)
        .finish()
}

/// Runs a GraphQL request on behalf of the authenticated caller.
#[post("/graphql")]
pub async fn graphql_handler(
    schema: web::Data<Schema>,
    auth: AuthenticatedUser,
    request: GraphQLRequest,
) -> GraphQLResponse {
    schema.execute(request.into_inner().data(auth.0)).await.into()
}
