//! 交易端点

use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;
use serde_json::json;

use crate::api::middleware::AuthenticatedUser;
use crate::ledger::{TransactionFilter, TransactionForm, categories_for};
use crate::services::AppServices;
use crate::storage::TransactionType;

use super::error_code::ErrorDomain;
use super::helpers::{api_result, created_response, error_from_budgetly, success_response};
use super::types::{CategoryQuery, PeriodQuery};

const DOMAIN: ErrorDomain = ErrorDomain::Transaction;

/// GET /transactions?type=&category=&period=
pub async fn get_transactions(
    services: web::Data<AppServices>,
    user: AuthenticatedUser,
    filter: web::Query<TransactionFilter>,
) -> impl Responder {
    api_result(
        DOMAIN,
        services
            .transactions
            .list_filtered(&user.user_id, &filter, Utc::now())
            .await,
    )
}

pub async fn get_transaction(
    services: web::Data<AppServices>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> impl Responder {
    api_result(
        DOMAIN,
        services
            .transactions
            .get_transaction(&user.user_id, &path)
            .await,
    )
}

pub async fn post_transaction(
    services: web::Data<AppServices>,
    user: AuthenticatedUser,
    form: web::Json<TransactionForm>,
) -> impl Responder {
    match services
        .transactions
        .add_transaction(&user.user_id, &form)
        .await
    {
        Ok(tx) => created_response(tx),
        Err(e) => error_from_budgetly(&e, DOMAIN),
    }
}

pub async fn update_transaction(
    services: web::Data<AppServices>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    form: web::Json<TransactionForm>,
) -> impl Responder {
    api_result(
        DOMAIN,
        services
            .transactions
            .update_transaction(&user.user_id, &path, &form)
            .await,
    )
}

pub async fn delete_transaction(
    services: web::Data<AppServices>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> impl Responder {
    let id = path.into_inner();
    api_result(
        DOMAIN,
        services
            .transactions
            .delete_transaction(&user.user_id, &id)
            .await
            .map(|_| json!({ "id": id })),
    )
}

/// GET /transactions/summary?period=week|month|year|all
pub async fn transactions_summary(
    services: web::Data<AppServices>,
    user: AuthenticatedUser,
    query: web::Query<PeriodQuery>,
) -> impl Responder {
    api_result(
        DOMAIN,
        services
            .transactions
            .summary(&user.user_id, query.period)
            .await,
    )
}

/// GET /transactions/export → text/csv
pub async fn export_transactions(
    services: web::Data<AppServices>,
    user: AuthenticatedUser,
) -> impl Responder {
    let mut buffer = Vec::new();
    match services
        .transactions
        .export_csv(&user.user_id, &mut buffer)
        .await
    {
        Ok(_) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                "Content-Disposition",
                "attachment; filename=\"transactions.csv\"",
            ))
            .body(buffer),
        Err(e) => error_from_budgetly(&e, DOMAIN),
    }
}

/// GET /categories?type=income|expense
pub async fn get_categories(query: web::Query<CategoryQuery>) -> impl Responder {
    match query.kind {
        Some(kind) => success_response(json!({ "type": kind, "categories": categories_for(kind) })),
        None => success_response(json!({
            "expense": categories_for(TransactionType::Expense),
            "income": categories_for(TransactionType::Income),
        })),
    }
}
