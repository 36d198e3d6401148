use super::{FormMode, PageContext, error_list, esc, input, layout, method_form, textarea};
use crate::domain::validation::{Field, ValidationErrors};
use crate::i18n::Msg;

#[must_use]
pub fn form(
    ctx: &PageContext,
    mode: FormMode,
    nickname: &str,
    bio: &str,
    errors: &ValidationErrors,
) -> String {
    let (title, action, extra) = match mode {
        FormMode::New => (ctx.t(Msg::NewProfile), "/user_profiles", String::new()),
        FormMode::Edit => (
            ctx.t(Msg::EditProfile),
            "/user_profiles?_method=PATCH",
            format!(
                "<p>{}</p>",
                method_form("/user_profiles", "DELETE", ctx.t(Msg::Delete), "")
            ),
        ),
    };

    let body = format!(
        r#"{errors}<form method="post" action="{action}">{nickname}{bio}<button type="submit">{submit}</button></form>{extra}"#,
        errors = error_list(ctx.locale, errors),
        nickname = input(ctx.locale, Field::Nickname, "text", nickname),
        bio = textarea(ctx.locale, Field::Bio, bio),
        submit = esc(ctx.t(Msg::Save)),
    );
    layout(ctx, title, &body)
}
