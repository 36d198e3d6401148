use std::fmt::Write;

use super::{PageContext, attr, esc, input, layout};
use crate::domain::validation::Field;
use crate::i18n::Msg;

/// Login form, plus one link per configured OAuth provider.
#[must_use]
pub fn login_form(ctx: &PageContext, email: &str) -> String {
    let mut body = format!(
        r#"<form method="post" action="/login">{email}{password}<button type="submit">{submit}</button></form>"#,
        email = input(ctx.locale, Field::Email, "email", email),
        password = input(ctx.locale, Field::Password, "password", ""),
        submit = esc(ctx.t(Msg::Login)),
    );

    for provider in &ctx.oauth_providers {
        let label = match ctx.locale {
            crate::i18n::Locale::Ja => format!("{provider}{}", ctx.t(Msg::LoginWith)),
            crate::i18n::Locale::En => format!("{}{provider}", ctx.t(Msg::LoginWith)),
        };
        let _ = write!(
            body,
            r#"<p><a href="/oauth/{}">{}</a></p>"#,
            attr(&urlencoding::encode(provider)),
            esc(&label)
        );
    }

    layout(ctx, ctx.t(Msg::Login), &body)
}
