//! User-facing text in Japanese (default) and English.
//!
//! Validation errors are rendered from their `(Field, Rule)` pair, everything
//! else goes through [`Msg`].

use serde::{Deserialize, Serialize};

use crate::domain::validation::{Field, Rule};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ja,
    En,
}

impl Locale {
    #[must_use]
    pub const fn html_lang(self) -> &'static str {
        match self {
            Self::Ja => "ja",
            Self::En => "en",
        }
    }
}

/// Flash messages and UI labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Msg {
    AppName,
    // flash: users
    UserCreated,
    UserCreateFailed,
    UserUpdated,
    UserUpdateFailed,
    UserDestroyed,
    // flash: sessions
    LoginRequired,
    LoginSucceeded,
    LoginFailed,
    LoggedOut,
    OAuthSucceeded,
    OAuthFailed,
    // flash: profiles
    ProfileCreated,
    ProfileCreateFailed,
    ProfileUpdated,
    ProfileUpdateFailed,
    ProfileDestroyed,
    ProfileMissing,
    // flash: ledgers
    AccountBookCreated,
    AccountBookCreateFailed,
    AccountBookUpdated,
    AccountBookUpdateFailed,
    AccountBookDestroyed,
    ExpenseItemCreated,
    ExpenseItemCreateFailed,
    ExpenseItemDestroyed,
    // flash: likes
    Liked,
    Unliked,
    AlreadyLiked,
    LikeNotFound,
    // errors
    NotFound,
    InternalError,
    // labels
    Top,
    TopLead,
    SignUp,
    Login,
    Logout,
    EditUser,
    DeleteAccount,
    ConfirmDelete,
    Save,
    Edit,
    Delete,
    Back,
    NewProfile,
    EditProfile,
    AccountBooks,
    NewAccountBook,
    EditAccountBook,
    ExpenseItems,
    AddExpenseItem,
    NoExpenseItems,
    NoAccountBooks,
    Total,
    Owner,
    Likes,
    Like,
    Unlike,
    Dashboard,
    AccountBookCount,
    LikesReceived,
    CategoryTotals,
    LoginWith,
}

impl Msg {
    const fn pair(self) -> (&'static str, &'static str) {
        match self {
            Self::AppName => ("家計簿", "Kakeibo"),
            Self::UserCreated => ("ユーザー登録しました", "Signed up successfully"),
            Self::UserCreateFailed => ("ユーザー登録に失敗しました", "Sign up failed"),
            Self::UserUpdated => ("ユーザー情報を更新しました", "Account updated"),
            Self::UserUpdateFailed => ("ユーザー情報更新に失敗しました", "Account update failed"),
            Self::UserDestroyed => ("退会しました", "Your account has been deleted"),
            Self::LoginRequired => ("ログインしてください", "Please log in"),
            Self::LoginSucceeded => ("ログインしました", "Logged in"),
            Self::LoginFailed => ("ログインに失敗しました", "Login failed"),
            Self::LoggedOut => ("ログアウトしました", "Logged out"),
            Self::OAuthSucceeded => ("外部アカウントでログインしました", "Logged in with your external account"),
            Self::OAuthFailed => ("外部アカウントでのログインに失敗しました", "External login failed"),
            Self::ProfileCreated => ("プロフィールを登録しました", "Profile created"),
            Self::ProfileCreateFailed => ("プロフィール登録に失敗しました", "Profile could not be created"),
            Self::ProfileUpdated => ("プロフィールを更新しました", "Profile updated"),
            Self::ProfileUpdateFailed => ("プロフィール更新に失敗しました", "Profile update failed"),
            Self::ProfileDestroyed => ("プロフィールを削除しました", "Profile deleted"),
            Self::ProfileMissing => ("プロフィールが登録されていません", "You have no profile yet"),
            Self::AccountBookCreated => ("家計簿を作成しました", "Account book created"),
            Self::AccountBookCreateFailed => ("家計簿の作成に失敗しました", "Account book could not be created"),
            Self::AccountBookUpdated => ("家計簿を更新しました", "Account book updated"),
            Self::AccountBookUpdateFailed => ("家計簿の更新に失敗しました", "Account book update failed"),
            Self::AccountBookDestroyed => ("家計簿を削除しました", "Account book deleted"),
            Self::ExpenseItemCreated => ("支出を登録しました", "Expense added"),
            Self::ExpenseItemCreateFailed => ("支出の登録に失敗しました", "Expense could not be added"),
            Self::ExpenseItemDestroyed => ("支出を削除しました", "Expense deleted"),
            Self::Liked => ("いいねしました", "Liked"),
            Self::Unliked => ("いいねを取り消しました", "Like removed"),
            Self::AlreadyLiked => ("すでにいいねしています", "You already liked this account book"),
            Self::LikeNotFound => ("いいねが見つかりません", "Like not found"),
            Self::NotFound => ("ページが見つかりません", "Page not found"),
            Self::InternalError => ("エラーが発生しました", "Something went wrong"),
            Self::Top => ("トップ", "Top"),
            Self::TopLead => ("毎日の支出を記録して、みんなの家計簿を参考にしよう", "Track your spending and learn from other households"),
            Self::SignUp => ("ユーザー登録", "Sign up"),
            Self::Login => ("ログイン", "Log in"),
            Self::Logout => ("ログアウト", "Log out"),
            Self::EditUser => ("ユーザー情報", "Account"),
            Self::DeleteAccount => ("退会する", "Delete account"),
            Self::ConfirmDelete => ("本当に削除しますか?", "Are you sure?"),
            Self::Save => ("保存", "Save"),
            Self::Edit => ("編集", "Edit"),
            Self::Delete => ("削除", "Delete"),
            Self::Back => ("戻る", "Back"),
            Self::NewProfile => ("プロフィール登録", "Create profile"),
            Self::EditProfile => ("プロフィール編集", "Edit profile"),
            Self::AccountBooks => ("家計簿一覧", "Account books"),
            Self::NewAccountBook => ("家計簿を作成", "New account book"),
            Self::EditAccountBook => ("家計簿を編集", "Edit account book"),
            Self::ExpenseItems => ("支出", "Expenses"),
            Self::AddExpenseItem => ("支出を追加", "Add expense"),
            Self::NoExpenseItems => ("支出はまだありません", "No expenses yet"),
            Self::NoAccountBooks => ("家計簿はまだありません", "No account books yet"),
            Self::Total => ("合計", "Total"),
            Self::Owner => ("作成者", "Owner"),
            Self::Likes => ("いいね数", "Likes"),
            Self::Like => ("いいね", "Like"),
            Self::Unlike => ("いいね解除", "Unlike"),
            Self::Dashboard => ("ダッシュボード", "Dashboard"),
            Self::AccountBookCount => ("家計簿の数", "Account books"),
            Self::LikesReceived => ("もらったいいね", "Likes received"),
            Self::CategoryTotals => ("費目別合計", "Totals by category"),
            Self::LoginWith => ("でログイン", "Log in with "),
        }
    }

    #[must_use]
    pub const fn text(self, locale: Locale) -> &'static str {
        let (ja, en) = self.pair();
        match locale {
            Locale::Ja => ja,
            Locale::En => en,
        }
    }
}

#[must_use]
pub const fn field_name(locale: Locale, field: Field) -> &'static str {
    let (ja, en) = match field {
        Field::User => ("ユーザー", "User"),
        Field::Username => ("ユーザー名", "Username"),
        Field::Email => ("メールアドレス", "Email"),
        Field::Password => ("パスワード", "Password"),
        Field::PasswordConfirmation => ("パスワード確認", "Password confirmation"),
        Field::Nickname => ("ニックネーム", "Nickname"),
        Field::Bio => ("自己紹介", "Bio"),
        Field::Title => ("タイトル", "Title"),
        Field::Description => ("説明", "Description"),
        Field::Amount => ("金額", "Amount"),
        Field::Category => ("費目", "Category"),
        Field::Memo => ("メモ", "Memo"),
        Field::SpentOn => ("日付", "Date"),
    };
    match locale {
        Locale::Ja => ja,
        Locale::En => en,
    }
}

/// Full sentence for one violated rule, e.g. "パスワードは8文字以上で入力してください".
#[must_use]
pub fn field_error(locale: Locale, field: Field, rule: Rule) -> String {
    let name = field_name(locale, field);
    match locale {
        Locale::Ja => match rule {
            Rule::Required => format!("{name}を入力してください"),
            Rule::TooShort { min } => format!("{name}は{min}文字以上で入力してください"),
            Rule::TooLong { max } => format!("{name}は{max}文字以内で入力してください"),
            Rule::Taken => format!("{name}はすでに存在します"),
            Rule::Confirmation => format!(
                "{name}と{}の入力が一致しません",
                field_name(locale, Field::Password)
            ),
            Rule::Invalid => format!("{name}は不正な値です"),
            Rule::NotPositive => format!("{name}は0より大きい値にしてください"),
            Rule::TooLarge { max } => format!("{name}は{max}以下の値にしてください"),
        },
        Locale::En => match rule {
            Rule::Required => format!("{name} can't be blank"),
            Rule::TooShort { min } => {
                format!("{name} is too short (minimum is {min} characters)")
            }
            Rule::TooLong { max } => format!("{name} is too long (maximum is {max} characters)"),
            Rule::Taken => format!("{name} has already been taken"),
            Rule::Confirmation => format!(
                "{name} doesn't match {}",
                field_name(locale, Field::Password)
            ),
            Rule::Invalid => format!("{name} is invalid"),
            Rule::NotPositive => format!("{name} must be greater than 0"),
            Rule::TooLarge { max } => format!("{name} must be less than or equal to {max}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_japanese_field_errors() {
        assert_eq!(
            field_error(Locale::Ja, Field::Username, Rule::Required),
            "ユーザー名を入力してください"
        );
        assert_eq!(
            field_error(Locale::Ja, Field::Username, Rule::TooShort { min: 1 }),
            "ユーザー名は1文字以上で入力してください"
        );
        assert_eq!(
            field_error(Locale::Ja, Field::Password, Rule::TooShort { min: 8 }),
            "パスワードは8文字以上で入力してください"
        );
        assert_eq!(
            field_error(Locale::Ja, Field::Email, Rule::Taken),
            "メールアドレスはすでに存在します"
        );
        assert_eq!(
            field_error(Locale::Ja, Field::PasswordConfirmation, Rule::Confirmation),
            "パスワード確認とパスワードの入力が一致しません"
        );
    }

    #[test]
    fn test_english_field_errors() {
        assert_eq!(
            field_error(Locale::En, Field::Email, Rule::Required),
            "Email can't be blank"
        );
        assert_eq!(
            field_error(Locale::En, Field::Password, Rule::TooLong { max: 29 }),
            "Password is too long (maximum is 29 characters)"
        );
    }

    #[test]
    fn test_locale_deserializes_lowercase() {
        let locale: Locale = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(locale, Locale::En);
        assert_eq!(Msg::LoginRequired.text(Locale::Ja), "ログインしてください");
        assert_eq!(Msg::LoginRequired.text(Locale::En), "Please log in");
    }
}
