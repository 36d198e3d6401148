use super::{PageContext, esc, layout};
use crate::i18n::Msg;

#[must_use]
pub fn top(ctx: &PageContext) -> String {
    let actions = if ctx.current_user.is_some() {
        format!(
            r#"<p><a href="/account_books">{}</a></p>"#,
            esc(ctx.t(Msg::AccountBooks))
        )
    } else {
        format!(
            r#"<p><a href="/users/new">{}</a> / <a href="/login">{}</a></p>"#,
            esc(ctx.t(Msg::SignUp)),
            esc(ctx.t(Msg::Login))
        )
    };

    let body = format!(r"<p>{}</p>{actions}", esc(ctx.t(Msg::TopLead)));
    layout(ctx, ctx.t(Msg::AppName), &body)
}
