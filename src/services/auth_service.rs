//! Email/password authentication
//!
//! Accounts live in `user_accounts` with an Argon2id hash. Sessions are a
//! pair of stateless JWTs; signing out is the client discarding them.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::api::jwt::JwtService;
use crate::errors::{BudgetlyError, Result};
use crate::ledger::{SignInForm, SignUpForm};
use crate::services::user_service::{NewUserDetails, UserService};
use crate::storage::{SeaOrmStorage, UserAccount};
use crate::utils::{hash_password, normalize_email, verify_password};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub user_id: String,
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
    /// access token 剩余秒数
    pub expires_in: i64,
}

#[derive(Clone)]
pub struct AuthService {
    storage: Arc<SeaOrmStorage>,
    users: UserService,
    jwt: Arc<JwtService>,
}

impl AuthService {
    pub fn new(storage: Arc<SeaOrmStorage>, jwt: Arc<JwtService>) -> Self {
        Self {
            users: UserService::new(storage.clone()),
            storage,
            jwt,
        }
    }

    pub fn jwt_arc(&self) -> Arc<JwtService> {
        self.jwt.clone()
    }

    /// 注册：校验表单、创建账号和资料、返回会话
    pub async fn sign_up(&self, form: &SignUpForm) -> Result<AuthSession> {
        form.validate()?;
        let email = normalize_email(&form.email);

        if self.storage.find_account_by_email(&email).await?.is_some() {
            return Err(BudgetlyError::conflict(format!(
                "An account with email '{}' already exists",
                email
            )));
        }

        let account = UserAccount {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.clone(),
            password_hash: hash_password(&form.password)?,
            created_at: Utc::now(),
        };
        self.storage.insert_account(&account).await?;

        self.users
            .create_user_details(
                &account.id,
                NewUserDetails {
                    first_name: form.first_name.clone(),
                    last_name: form.last_name.clone(),
                    email: email.clone(),
                    phone_number: form.phone_number.clone(),
                    address: form.address.clone(),
                    monthly_budget: form.monthly_budget.clone(),
                    photo_url: None,
                },
            )
            .await?;

        info!("New account registered: {}", account.id);
        self.issue_session(&account.id, &account.email)
    }

    pub async fn sign_in(&self, form: &SignInForm) -> Result<AuthSession> {
        form.validate()?;
        let email = normalize_email(&form.email);

        let Some(account) = self.storage.find_account_by_email(&email).await? else {
            warn!("Sign-in attempt for unknown email");
            return Err(BudgetlyError::auth_failed(INVALID_CREDENTIALS));
        };

        if !verify_password(&form.password, &account.password_hash)? {
            warn!("Sign-in failed for account {}: wrong password", account.id);
            return Err(BudgetlyError::auth_failed(INVALID_CREDENTIALS));
        }

        info!("Account {} signed in", account.id);
        self.issue_session(&account.id, &account.email)
    }

    /// 用 refresh token 换一对新 token
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthSession> {
        let claims = self.jwt.validate_refresh_token(refresh_token)?;
        let account = self
            .storage
            .get_account(&claims.sub)
            .await?
            .ok_or_else(|| BudgetlyError::token_invalid("Account no longer exists"))?;

        self.issue_session(&account.id, &account.email)
    }

    /// access token 对应的用户 id
    pub fn current_user(&self, access_token: &str) -> Result<String> {
        Ok(self.jwt.validate_access_token(access_token)?.sub)
    }

    pub async fn get_account(&self, user_id: &str) -> Result<UserAccount> {
        self.storage
            .get_account(user_id)
            .await?
            .ok_or_else(|| BudgetlyError::not_found(format!("Account '{}' not found", user_id)))
    }

    pub async fn change_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<()> {
        let account = self.get_account(user_id).await?;
        if !verify_password(current_password, &account.password_hash)? {
            return Err(BudgetlyError::auth_failed("Current password is incorrect"));
        }
        if new_password.chars().count() < crate::ledger::validation::MIN_PASSWORD_LEN {
            return Err(BudgetlyError::validation(
                "Password must be at least 6 characters long",
            ));
        }

        self.storage
            .update_account_password(user_id, &hash_password(new_password)?)
            .await?;
        info!("Password changed for account {}", user_id);
        Ok(())
    }

    fn issue_session(&self, user_id: &str, email: &str) -> Result<AuthSession> {
        Ok(AuthSession {
            user_id: user_id.to_string(),
            email: email.to_string(),
            access_token: self.jwt.generate_access_token(user_id)?,
            refresh_token: self.jwt.generate_refresh_token(user_id)?,
            expires_in: self.jwt.access_token_ttl_secs(),
        })
    }
}
