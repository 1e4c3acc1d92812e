pub mod transaction;
pub mod user_account;
pub mod user_budget;
pub mod user_details;

pub use transaction::Entity as TransactionEntity;
pub use user_account::Entity as UserAccountEntity;
pub use user_budget::Entity as UserBudgetEntity;
pub use user_details::Entity as UserDetailsEntity;
