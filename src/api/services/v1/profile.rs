//! 用户资料端点

use actix_web::{Responder, web};

use crate::api::middleware::AuthenticatedUser;
use crate::errors::BudgetlyError;
use crate::services::{AppServices, UserDetailsPatch, display_name, full_name, initials};

use super::error_code::ErrorDomain;
use super::helpers::api_result;
use super::types::{ChangePasswordRequest, MessageResponse, ProfileResponse};

const DOMAIN: ErrorDomain = ErrorDomain::Profile;

async fn load_profile(
    services: &AppServices,
    user_id: &str,
) -> Result<ProfileResponse, BudgetlyError> {
    let account = services.auth.get_account(user_id).await?;
    let details = services.users.get_user_details(user_id).await?;

    Ok(ProfileResponse {
        user_id: account.id,
        display_name: display_name(details.as_ref(), Some(&account.email)),
        full_name: details.as_ref().map(full_name),
        initials: details.as_ref().map(initials),
        email: account.email,
        details,
    })
}

pub async fn get_profile(
    services: web::Data<AppServices>,
    user: AuthenticatedUser,
) -> impl Responder {
    api_result(DOMAIN, load_profile(&services, &user.user_id).await)
}

/// PUT /profile，只修改提交的字段
pub async fn update_profile(
    services: web::Data<AppServices>,
    user: AuthenticatedUser,
    patch: web::Json<UserDetailsPatch>,
) -> impl Responder {
    let result = async {
        services
            .users
            .update_user_details(&user.user_id, patch.into_inner())
            .await?;
        load_profile(&services, &user.user_id).await
    }
    .await;

    api_result(DOMAIN, result)
}

pub async fn change_password(
    services: web::Data<AppServices>,
    user: AuthenticatedUser,
    body: web::Json<ChangePasswordRequest>,
) -> impl Responder {
    api_result(
        DOMAIN,
        services
            .auth
            .change_password(&user.user_id, &body.current_password, &body.new_password)
            .await
            .map(|_| MessageResponse {
                message: "Password changed".to_string(),
            }),
    )
}
