use super::{PageContext, error_list, esc, input, layout, method_form};
use crate::domain::validation::{Field, ValidationErrors};
use crate::i18n::Msg;

/// Registration form. Passwords are never echoed back.
#[must_use]
pub fn new_form(
    ctx: &PageContext,
    username: &str,
    email: &str,
    errors: &ValidationErrors,
) -> String {
    let body = format!(
        r#"{errors}<form method="post" action="/users">{fields}<button type="submit">{submit}</button></form>"#,
        errors = error_list(ctx.locale, errors),
        fields = fields(ctx, username, email),
        submit = esc(ctx.t(Msg::SignUp)),
    );
    layout(ctx, ctx.t(Msg::SignUp), &body)
}

/// Account edit form. Blank password fields leave the password unchanged.
#[must_use]
pub fn edit_form(
    ctx: &PageContext,
    username: &str,
    email: &str,
    errors: &ValidationErrors,
) -> String {
    let body = format!(
        r#"{errors}<form method="post" action="/users?_method=PATCH">{fields}<button type="submit">{submit}</button></form>
<p><a href="/user_profiles/edit">{profile}</a></p>
<p>{delete}</p>"#,
        errors = error_list(ctx.locale, errors),
        fields = fields(ctx, username, email),
        submit = esc(ctx.t(Msg::Save)),
        profile = esc(ctx.t(Msg::EditProfile)),
        delete = method_form("/users", "DELETE", ctx.t(Msg::DeleteAccount), ""),
    );
    layout(ctx, ctx.t(Msg::EditUser), &body)
}

fn fields(ctx: &PageContext, username: &str, email: &str) -> String {
    [
        input(ctx.locale, Field::Username, "text", username),
        input(ctx.locale, Field::Email, "email", email),
        input(ctx.locale, Field::Password, "password", ""),
        input(ctx.locale, Field::PasswordConfirmation, "password", ""),
    ]
    .concat()
}
