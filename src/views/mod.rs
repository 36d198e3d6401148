//! Server-rendered HTML.
//!
//! Pages are plain `String`s built with `format!`. Every piece of user data
//! goes through [`esc`] (text) or [`attr`] (attribute values) before it is
//! interpolated.

use axum::http::StatusCode;
use std::fmt::Write;

use crate::api::CurrentUser;
use crate::api::flash::Flash;
use crate::domain::validation::{Field, ValidationErrors};
use crate::i18n::{Locale, Msg, field_name};

pub mod account_books;
pub mod dashboards;
pub mod sessions;
pub mod static_pages;
pub mod user_profiles;
pub mod users;

/// Everything the layout needs besides the page body.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub locale: Locale,
    pub current_user: Option<CurrentUser>,
    pub flash: Option<Flash>,
    pub oauth_providers: Vec<String>,
}

impl PageContext {
    /// Shows `flash` on this render only (nothing is stored in the session).
    #[must_use]
    pub fn with_flash(mut self, flash: Flash) -> Self {
        self.flash = Some(flash);
        self
    }

    #[must_use]
    pub const fn t(&self, msg: Msg) -> &'static str {
        msg.text(self.locale)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    New,
    Edit,
}

#[must_use]
pub fn esc(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

#[must_use]
pub fn attr(value: &str) -> String {
    html_escape::encode_double_quoted_attribute(value).into_owned()
}

/// `<form>` for PATCH/DELETE routes, dispatched through `_method`.
#[must_use]
pub fn method_form(action: &str, method: &str, label: &str, class: &str) -> String {
    format!(
        r#"<form class="inline" method="post" action="{action}?_method={method}"><button type="submit" class="{class}">{label}</button></form>"#,
        action = attr(action),
        label = esc(label),
    )
}

/// Bullet list of every error, in the order the rules were checked.
#[must_use]
pub fn error_list(locale: Locale, errors: &ValidationErrors) -> String {
    if errors.is_empty() {
        return String::new();
    }

    let mut html = String::from(r#"<ul class="errors">"#);
    for error in errors.iter() {
        let _ = write!(
            html,
            r#"<li data-code="{}">{}</li>"#,
            attr(&error.code()),
            esc(&error.message(locale))
        );
    }
    html.push_str("</ul>");
    html
}

/// Labelled `<input>` for `field`.
#[must_use]
pub fn input(locale: Locale, field: Field, kind: &str, value: &str) -> String {
    let name = field.key();
    format!(
        r#"<label for="{name}">{label}</label><input type="{kind}" id="{name}" name="{name}" value="{value}">"#,
        label = esc(field_name(locale, field)),
        value = attr(value),
    )
}

#[must_use]
pub fn textarea(locale: Locale, field: Field, value: &str) -> String {
    let name = field.key();
    format!(
        r#"<label for="{name}">{label}</label><textarea id="{name}" name="{name}" rows="4">{value}</textarea>"#,
        label = esc(field_name(locale, field)),
        value = esc(value),
    )
}

/// Yen amount with thousands separators, e.g. `¥12,800`.
#[must_use]
pub fn yen(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if amount < 0 {
        format!("-¥{grouped}")
    } else {
        format!("¥{grouped}")
    }
}

fn nav(ctx: &PageContext) -> String {
    match &ctx.current_user {
        Some(user) => format!(
            r#"<a href="/account_books">{books}</a><a href="/dashboards/{id}">{dashboard}</a><a href="/users/edit">{username}</a>{logout}"#,
            books = esc(ctx.t(Msg::AccountBooks)),
            id = user.id,
            dashboard = esc(ctx.t(Msg::Dashboard)),
            username = esc(&user.username),
            logout = method_form("/logout", "DELETE", ctx.t(Msg::Logout), "link"),
        ),
        None => format!(
            r#"<a href="/login">{login}</a><a href="/users/new">{signup}</a>"#,
            login = esc(ctx.t(Msg::Login)),
            signup = esc(ctx.t(Msg::SignUp)),
        ),
    }
}

/// Wraps `body` in the shared page chrome.
#[must_use]
pub fn layout(ctx: &PageContext, title: &str, body: &str) -> String {
    let flash = ctx.flash.as_ref().map_or_else(String::new, |f| {
        format!(
            r#"<p class="{}">{}</p>"#,
            f.kind.css_class(),
            esc(&f.message)
        )
    });

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | {app}</title>
<link rel="stylesheet" href="/assets/app.css">
</head>
<body>
<header><a href="/">{app}</a><nav>{nav}</nav></header>
<main>
{flash}
<h1>{title}</h1>
{body}
</main>
</body>
</html>
"#,
        lang = ctx.locale.html_lang(),
        title = esc(title),
        app = esc(ctx.t(Msg::AppName)),
        nav = nav(ctx),
    )
}

/// Standalone page for 404/500 responses.
#[must_use]
pub fn error_page(locale: Locale, status: StatusCode, msg: Msg) -> String {
    let ctx = PageContext {
        locale,
        current_user: None,
        flash: None,
        oauth_providers: Vec::new(),
    };
    let body = format!(
        r#"<p class="muted">{}</p><p><a href="/">{}</a></p>"#,
        status.as_u16(),
        esc(ctx.t(Msg::Top))
    );
    layout(&ctx, msg.text(locale), &body)
}
