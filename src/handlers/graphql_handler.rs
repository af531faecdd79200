use actix_web::{post, web};
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};

use crate::{auth::AuthenticatedUser, graphql::Schema};

/// GraphQL over the same services as the REST routes. Resolvers read the
/// caller's claims from the request data.
#[post("/graphql")]
async fn graphql(
    schema: web::Data<Schema>,
    request: GraphQLRequest,
    auth: AuthenticatedUser,
) -> GraphQLResponse {
    schema.execute(request.into_inner().data(auth.0)).await.into()
}
