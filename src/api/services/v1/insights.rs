use actix_web::{Responder, web};

use crate::api::middleware::AuthenticatedUser;
use crate::services::AppServices;

use super::error_code::ErrorDomain;
use super::helpers::api_result;

/// GET /insights
pub async fn get_insights(
    services: web::Data<AppServices>,
    user: AuthenticatedUser,
) -> impl Responder {
    api_result(
        ErrorDomain::General,
        services.insights.insights(&user.user_id).await,
    )
}
