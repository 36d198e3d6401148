//! Account book and expense item rules.

use chrono::NaiveDate;

use super::validation::{Field, Rule, ValidationErrors};

pub const TITLE_MAX_CHARS: usize = 50;
pub const DESCRIPTION_MAX_CHARS: usize = 500;
pub const CATEGORY_MAX_CHARS: usize = 30;
pub const MEMO_MAX_CHARS: usize = 255;
/// One trillion yen. Keeps sums over any realistic number of items in `i64`.
pub const AMOUNT_MAX: i64 = 1_000_000_000_000;

#[derive(Debug, Clone, Default)]
pub struct AccountBookInput {
    pub title: String,
    pub description: String,
}

/// Account book fields after validation. Blank descriptions become `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountBookFields {
    pub title: String,
    pub description: Option<String>,
}

pub fn validate_account_book(
    input: &AccountBookInput,
) -> Result<AccountBookFields, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let title = input.title.trim();
    let description = input.description.trim();

    errors.require(Field::Title, title);
    errors.max_chars(Field::Title, title, TITLE_MAX_CHARS);
    errors.max_chars(Field::Description, description, DESCRIPTION_MAX_CHARS);

    errors.into_result()?;
    Ok(AccountBookFields {
        title: title.to_string(),
        description: non_blank(description),
    })
}

/// Raw expense item form input; numbers and dates arrive as text.
#[derive(Debug, Clone, Default)]
pub struct ExpenseItemInput {
    pub amount: String,
    pub category: String,
    pub memo: String,
    pub spent_on: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseItemFields {
    pub amount: i64,
    pub category: String,
    pub memo: Option<String>,
    pub spent_on: NaiveDate,
}

pub fn validate_expense_item(
    input: &ExpenseItemInput,
) -> Result<ExpenseItemFields, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let amount = parse_amount(&mut errors, &input.amount);

    let category = input.category.trim();
    errors.require(Field::Category, category);
    errors.max_chars(Field::Category, category, CATEGORY_MAX_CHARS);

    let memo = input.memo.trim();
    errors.max_chars(Field::Memo, memo, MEMO_MAX_CHARS);

    let spent_on = parse_date(&mut errors, &input.spent_on);

    match (amount, spent_on) {
        (Some(amount), Some(spent_on)) if errors.is_empty() => Ok(ExpenseItemFields {
            amount,
            category: category.to_string(),
            memo: non_blank(memo),
            spent_on,
        }),
        _ => Err(errors),
    }
}

fn parse_amount(errors: &mut ValidationErrors, raw: &str) -> Option<i64> {
    let raw = raw.trim().replace(',', "");
    if raw.is_empty() {
        errors.add(Field::Amount, Rule::Required);
        return None;
    }
    let Ok(amount) = raw.parse::<i64>() else {
        errors.add(Field::Amount, Rule::Invalid);
        return None;
    };
    if amount <= 0 {
        errors.add(Field::Amount, Rule::NotPositive);
        return None;
    }
    if amount > AMOUNT_MAX {
        errors.add(Field::Amount, Rule::TooLarge { max: AMOUNT_MAX });
        return None;
    }
    Some(amount)
}

fn parse_date(errors: &mut ValidationErrors, raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.add(Field::SpentOn, Rule::Required);
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Some(date)
    } else {
        errors.add(Field::SpentOn, Rule::Invalid);
        None
    }
}

fn non_blank(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> ExpenseItemInput {
        ExpenseItemInput {
            amount: "1,280".to_string(),
            category: "食費".to_string(),
            memo: "スーパー".to_string(),
            spent_on: "2025-03-01".to_string(),
        }
    }

    #[test]
    fn test_valid_expense_item_has_no_errors() {
        let fields = validate_expense_item(&item()).unwrap();
        assert_eq!(fields.amount, 1280);
        assert_eq!(fields.category, "食費");
        assert_eq!(fields.memo.as_deref(), Some("スーパー"));
        assert_eq!(fields.spent_on, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    }

    #[test]
    fn test_expense_item_collects_all_errors() {
        let errors = validate_expense_item(&ExpenseItemInput::default()).unwrap_err();
        assert_eq!(
            errors.codes(),
            vec!["amount.required", "category.required", "spent_on.required"]
        );
    }

    #[test]
    fn test_expense_item_amount_rules() {
        let mut input = item();
        input.amount = "0".to_string();
        assert_eq!(
            validate_expense_item(&input).unwrap_err().codes(),
            vec!["amount.not_positive"]
        );

        input.amount = "abc".to_string();
        assert_eq!(
            validate_expense_item(&input).unwrap_err().codes(),
            vec!["amount.invalid"]
        );
    }

    #[test]
    fn test_expense_item_amount_upper_bound() {
        let mut input = item();
        input.amount = AMOUNT_MAX.to_string();
        assert_eq!(validate_expense_item(&input).unwrap().amount, AMOUNT_MAX);

        input.amount = (AMOUNT_MAX + 1).to_string();
        assert_eq!(
            validate_expense_item(&input).unwrap_err().codes(),
            vec!["amount.too_large"]
        );

        input.amount = i64::MAX.to_string();
        assert_eq!(
            validate_expense_item(&input).unwrap_err().codes(),
            vec!["amount.too_large"]
        );
    }

    #[test]
    fn test_expense_item_bad_date() {
        let mut input = item();
        input.spent_on = "2025-02-30".to_string();
        assert_eq!(
            validate_expense_item(&input).unwrap_err().codes(),
            vec!["spent_on.invalid"]
        );
    }

    #[test]
    fn test_account_book_rules() {
        let ok = validate_account_book(&AccountBookInput {
            title: " 生活費 ".to_string(),
            description: "   ".to_string(),
        })
        .unwrap();
        assert_eq!(ok.title, "生活費");
        assert_eq!(ok.description, None);

        let errors = validate_account_book(&AccountBookInput {
            title: "x".repeat(51),
            description: String::new(),
        })
        .unwrap_err();
        assert_eq!(errors.codes(), vec!["title.too_long"]);

        let errors = validate_account_book(&AccountBookInput::default()).unwrap_err();
        assert_eq!(errors.codes(), vec!["title.required"]);
    }
}
