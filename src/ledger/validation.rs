//! Form validation
//!
//! Every form is checked rule by rule; the first failing rule's message is
//! returned as a `Validation` error and shown to the user unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{BudgetlyError, Result};
use crate::storage::TransactionType;

pub const MSG_FILL_ALL_FIELDS: &str = "Please fill in all fields";
pub const MSG_INVALID_AMOUNT: &str = "Please enter a valid amount";
pub const MSG_INVALID_MONTH: &str = "Please select a valid month";
pub const MSG_INVALID_YEAR: &str = "Please enter a valid year";
pub const MIN_PASSWORD_LEN: usize = 6;

const YEAR_RANGE: std::ops::RangeInclusive<i32> = 2000..=2100;

/// 金额输入：客户端既可能传数字也可能传原始文本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

impl Default for AmountInput {
    fn default() -> Self {
        AmountInput::Text(String::new())
    }
}

impl From<f64> for AmountInput {
    fn from(value: f64) -> Self {
        AmountInput::Number(value)
    }
}

impl From<&str> for AmountInput {
    fn from(value: &str) -> Self {
        AmountInput::Text(value.to_string())
    }
}

impl AmountInput {
    pub fn is_blank(&self) -> bool {
        matches!(self, AmountInput::Text(s) if s.trim().is_empty())
    }

    /// 有限数值，否则 None（"abc"、"NaN"、"inf" 都不算）
    pub fn parse(&self) -> Option<f64> {
        let value = match self {
            AmountInput::Number(n) => *n,
            AmountInput::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }

    /// > 0 的有限金额
    pub fn positive(&self) -> Option<f64> {
        self.parse().filter(|v| *v > 0.0)
    }
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn fail<T>(msg: &str) -> Result<T> {
    Err(BudgetlyError::validation(msg))
}

/// 新增/编辑交易
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionForm {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(default)]
    pub amount: AmountInput,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// 校验通过的交易字段，文本已去除首尾空白
#[derive(Debug, Clone, PartialEq)]
pub struct ValidTransaction {
    pub kind: TransactionType,
    pub amount: f64,
    pub description: String,
    pub category: String,
    pub timestamp: Option<DateTime<Utc>>,
}

impl TransactionForm {
    pub fn validate(&self) -> Result<ValidTransaction> {
        if self.amount.is_blank() || blank(&self.description) || blank(&self.category) {
            return fail(MSG_FILL_ALL_FIELDS);
        }
        let Some(amount) = self.amount.positive() else {
            return fail(MSG_INVALID_AMOUNT);
        };

        Ok(ValidTransaction {
            kind: self.kind,
            amount,
            description: self.description.trim().to_string(),
            category: self.category.trim().to_string(),
            timestamp: self.timestamp,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetForm {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub amount: AmountInput,
    pub month: u32,
    pub year: i32,
}

impl BudgetForm {
    /// 返回解析后的金额
    pub fn validate(&self) -> Result<f64> {
        if blank(&self.category) || self.amount.is_blank() {
            return fail(MSG_FILL_ALL_FIELDS);
        }
        let Some(amount) = self.amount.positive() else {
            return fail(MSG_INVALID_AMOUNT);
        };
        validate_period(self.month, self.year)?;
        Ok(amount)
    }
}

pub fn validate_period(month: u32, year: i32) -> Result<()> {
    if !(1..=12).contains(&month) {
        return fail(MSG_INVALID_MONTH);
    }
    if !YEAR_RANGE.contains(&year) {
        return fail(MSG_INVALID_YEAR);
    }
    Ok(())
}

/// 注册表单
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignUpForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub monthly_budget: String,
    pub address: String,
    pub phone_number: String,
}

impl SignUpForm {
    pub fn validate(&self) -> Result<()> {
        if blank(&self.first_name) {
            return fail("Please enter your first name");
        }
        if blank(&self.last_name) {
            return fail("Please enter your last name");
        }
        if blank(&self.email) {
            return fail("Please enter your email");
        }
        if self.password.is_empty() {
            return fail("Please enter a password");
        }
        if self.password != self.confirm_password {
            return fail("Passwords do not match");
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return fail("Password must be at least 6 characters long");
        }
        let budget = AmountInput::Text(self.monthly_budget.clone());
        if budget.parse().is_none_or(|v| v < 0.0) {
            return fail("Please enter your monthly budget");
        }
        if blank(&self.address) {
            return fail("Please enter your address");
        }
        if blank(&self.phone_number) {
            return fail("Please enter your phone number");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    pub fn validate(&self) -> Result<()> {
        if blank(&self.email) || self.password.is_empty() {
            return fail(MSG_FILL_ALL_FIELDS);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx_form(amount: AmountInput, description: &str, category: &str) -> TransactionForm {
        TransactionForm {
            kind: TransactionType::Expense,
            amount,
            description: description.to_string(),
            category: category.to_string(),
            timestamp: None,
        }
    }

    fn message(result: Result<impl std::fmt::Debug>) -> String {
        result.unwrap_err().message().to_string()
    }

    fn sign_up() -> SignUpForm {
        SignUpForm {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
            monthly_budget: "1500".into(),
            address: "12 St James's Square".into(),
            phone_number: "+44 20 7946 0000".into(),
        }
    }

    #[test]
    fn test_amount_input_parsing() {
        assert_eq!(AmountInput::from(" 12.50 ").parse(), Some(12.5));
        assert_eq!(AmountInput::from(3.0).positive(), Some(3.0));
        assert_eq!(AmountInput::from("abc").parse(), None);
        assert_eq!(AmountInput::from("NaN").parse(), None);
        assert_eq!(AmountInput::from("inf").parse(), None);
        assert_eq!(AmountInput::from(0.0).positive(), None);
        assert!(AmountInput::from("  ").is_blank());
        assert!(!AmountInput::from(0.0).is_blank());
    }

    #[test]
    fn test_amount_input_deserializes_number_or_text() {
        let n: AmountInput = serde_json::from_str("42.5").unwrap();
        assert_eq!(n, AmountInput::Number(42.5));
        let t: AmountInput = serde_json::from_str("\"42.5\"").unwrap();
        assert_eq!(t.parse(), Some(42.5));
    }

    #[test]
    fn test_transaction_form_requires_all_fields() {
        for form in [
            tx_form("".into(), "Lunch", "food"),
            tx_form("10".into(), "   ", "food"),
            tx_form("10".into(), "Lunch", ""),
        ] {
            assert_eq!(message(form.validate()), MSG_FILL_ALL_FIELDS);
        }
    }

    #[test]
    fn test_transaction_form_rejects_non_positive_amount() {
        for amount in ["0", "-5", "abc", "1e999"] {
            let form = tx_form(amount.into(), "Lunch", "food");
            assert_eq!(message(form.validate()), MSG_INVALID_AMOUNT, "{}", amount);
        }
        let form = tx_form((-1.0).into(), "Lunch", "food");
        assert_eq!(message(form.validate()), MSG_INVALID_AMOUNT);
    }

    #[test]
    fn test_transaction_form_trims_fields() {
        let valid = tx_form("19.99".into(), "  Lunch ", " food ")
            .validate()
            .unwrap();
        assert_eq!(valid.amount, 19.99);
        assert_eq!(valid.description, "Lunch");
        assert_eq!(valid.category, "food");
    }

    #[test]
    fn test_transaction_form_json() {
        let form: TransactionForm = serde_json::from_str(
            r#"{"type":"income","amount":"2500","description":"March","category":"salary"}"#,
        )
        .unwrap();
        assert_eq!(form.kind, TransactionType::Income);
        assert_eq!(form.validate().unwrap().amount, 2500.0);
    }

    #[test]
    fn test_budget_form() {
        let mut form = BudgetForm {
            category: "food".into(),
            amount: 300.0.into(),
            month: 3,
            year: 2026,
        };
        assert_eq!(form.validate().unwrap(), 300.0);

        form.month = 13;
        assert_eq!(message(form.validate()), MSG_INVALID_MONTH);
        form.month = 0;
        assert_eq!(message(form.validate()), MSG_INVALID_MONTH);

        form.month = 3;
        form.year = 1999;
        assert_eq!(message(form.validate()), MSG_INVALID_YEAR);

        form.year = 2026;
        form.amount = 0.0.into();
        assert_eq!(message(form.validate()), MSG_INVALID_AMOUNT);

        form.category = " ".into();
        assert_eq!(message(form.validate()), MSG_FILL_ALL_FIELDS);
    }

    #[test]
    fn test_sign_up_accepts_complete_form() {
        assert!(sign_up().validate().is_ok());

        let mut zero_budget = sign_up();
        zero_budget.monthly_budget = "0".into();
        assert!(zero_budget.validate().is_ok());
    }

    #[test]
    fn test_sign_up_first_failure_wins() {
        let empty = SignUpForm::default();
        assert_eq!(message(empty.validate()), "Please enter your first name");

        let mut form = sign_up();
        form.last_name.clear();
        form.email.clear();
        assert_eq!(message(form.validate()), "Please enter your last name");

        let mut form = sign_up();
        form.email = "  ".into();
        assert_eq!(message(form.validate()), "Please enter your email");

        let mut form = sign_up();
        form.password.clear();
        assert_eq!(message(form.validate()), "Please enter a password");

        let mut form = sign_up();
        form.confirm_password = "secret2".into();
        assert_eq!(message(form.validate()), "Passwords do not match");

        let mut form = sign_up();
        form.password = "abc".into();
        form.confirm_password = "abc".into();
        assert_eq!(
            message(form.validate()),
            "Password must be at least 6 characters long"
        );

        for budget in ["", "lots", "-1"] {
            let mut form = sign_up();
            form.monthly_budget = budget.into();
            assert_eq!(message(form.validate()), "Please enter your monthly budget");
        }

        let mut form = sign_up();
        form.address.clear();
        form.phone_number.clear();
        assert_eq!(message(form.validate()), "Please enter your address");

        let mut form = sign_up();
        form.phone_number.clear();
        assert_eq!(message(form.validate()), "Please enter your phone number");
    }

    #[test]
    fn test_sign_in_form() {
        assert!(
            SignInForm {
                email: "a@b.c".into(),
                password: "x".into()
            }
            .validate()
            .is_ok()
        );
        assert_eq!(
            message(SignInForm::default().validate()),
            MSG_FILL_ALL_FIELDS
        );
    }
}
