use std::fmt::Write;

use super::{
    FormMode, PageContext, attr, error_list, esc, input, layout, method_form, textarea, yen,
};
use crate::domain::ledger::{AccountBookInput, ExpenseItemInput};
use crate::domain::validation::{Field, ValidationErrors};
use crate::domain::{AccountBookId, LikeId};
use crate::i18n::Msg;
use crate::services::{AccountBookDetail, AccountBookSummary};

/// Like button when `my_like` is `None`, unlike button otherwise.
fn like_toggle(ctx: &PageContext, book_id: AccountBookId, my_like: Option<LikeId>) -> String {
    match my_like {
        Some(like_id) => method_form(
            &format!("/likes/{like_id}"),
            "DELETE",
            ctx.t(Msg::Unlike),
            "link",
        ),
        None => format!(
            r#"<form class="inline" method="post" action="/likes"><input type="hidden" name="account_book_id" value="{book_id}"><button type="submit" class="link">{}</button></form>"#,
            esc(ctx.t(Msg::Like))
        ),
    }
}

#[must_use]
pub fn index(ctx: &PageContext, books: &[AccountBookSummary]) -> String {
    let mut body = format!(
        r#"<p><a href="/account_books/new">{}</a></p>"#,
        esc(ctx.t(Msg::NewAccountBook))
    );

    if books.is_empty() {
        let _ = write!(
            body,
            r#"<p class="muted">{}</p>"#,
            esc(ctx.t(Msg::NoAccountBooks))
        );
        return layout(ctx, ctx.t(Msg::AccountBooks), &body);
    }

    let _ = write!(
        body,
        "<table><thead><tr><th></th><th>{owner}</th><th>{likes}</th><th></th></tr></thead><tbody>",
        owner = esc(ctx.t(Msg::Owner)),
        likes = esc(ctx.t(Msg::Likes)),
    );
    for summary in books {
        let _ = write!(
            body,
            r#"<tr><td><a href="/account_books/{id}">{title}</a></td><td>{owner}</td><td class="likes">{count}</td><td>{toggle}</td></tr>"#,
            id = summary.book.id,
            title = esc(&summary.book.title),
            owner = esc(&summary.owner),
            count = summary.like_count,
            toggle = like_toggle(ctx, summary.book.id, summary.my_like),
        );
    }
    body.push_str("</tbody></table>");

    layout(ctx, ctx.t(Msg::AccountBooks), &body)
}

#[must_use]
pub fn form(
    ctx: &PageContext,
    mode: FormMode,
    id: Option<AccountBookId>,
    values: &AccountBookInput,
    errors: &ValidationErrors,
) -> String {
    let (title, action, back) = match (mode, id) {
        (FormMode::Edit, Some(id)) => (
            ctx.t(Msg::EditAccountBook),
            format!("/account_books/{id}?_method=PATCH"),
            format!("/account_books/{id}"),
        ),
        _ => (
            ctx.t(Msg::NewAccountBook),
            "/account_books".to_string(),
            "/account_books".to_string(),
        ),
    };

    let body = format!(
        r#"{errors}<form method="post" action="{action}">{title_input}{description}<button type="submit">{submit}</button></form><p><a href="{back}">{back_label}</a></p>"#,
        errors = error_list(ctx.locale, errors),
        action = attr(&action),
        title_input = input(ctx.locale, Field::Title, "text", &values.title),
        description = textarea(ctx.locale, Field::Description, &values.description),
        submit = esc(ctx.t(Msg::Save)),
        back = attr(&back),
        back_label = esc(ctx.t(Msg::Back)),
    );
    layout(ctx, title, &body)
}

/// Book page: items with total, like toggle, and for the owner the edit
/// links and the add-item form. `my_like` is the viewer's like, if any.
#[must_use]
pub fn show(
    ctx: &PageContext,
    detail: &AccountBookDetail,
    my_like: Option<LikeId>,
    item_form: &ExpenseItemInput,
    errors: &ValidationErrors,
) -> String {
    let book = &detail.book;
    let owned = ctx
        .current_user
        .as_ref()
        .is_some_and(|user| detail.is_owned_by(user.id));

    let mut body = format!(
        r#"<p class="muted">{owner_label}: {owner} / {likes_label}: <span class="likes">{likes}</span> {toggle}</p>"#,
        owner_label = esc(ctx.t(Msg::Owner)),
        owner = esc(&detail.owner),
        likes_label = esc(ctx.t(Msg::Likes)),
        likes = detail.like_count,
        toggle = like_toggle(ctx, book.id, my_like),
    );

    if let Some(description) = &book.description {
        let _ = write!(body, "<p>{}</p>", esc(description));
    }

    if owned {
        let _ = write!(
            body,
            r#"<p><a href="/account_books/{id}/edit">{edit}</a> {delete}</p>"#,
            id = book.id,
            edit = esc(ctx.t(Msg::Edit)),
            delete = method_form(
                &format!("/account_books/{}", book.id),
                "DELETE",
                ctx.t(Msg::Delete),
                "link"
            ),
        );
    }

    let _ = write!(body, "<h2>{}</h2>", esc(ctx.t(Msg::ExpenseItems)));
    if detail.items.is_empty() {
        let _ = write!(
            body,
            r#"<p class="muted">{}</p>"#,
            esc(ctx.t(Msg::NoExpenseItems))
        );
    } else {
        body.push_str("<table><tbody>");
        for item in &detail.items {
            let remove = if owned {
                method_form(
                    &format!("/account_books/{}/expense_items/{}", book.id, item.id),
                    "DELETE",
                    ctx.t(Msg::Delete),
                    "link",
                )
            } else {
                String::new()
            };
            let _ = write!(
                body,
                r#"<tr><td>{date}</td><td>{category}</td><td>{memo}</td><td class="amount">{amount}</td><td>{remove}</td></tr>"#,
                date = esc(&item.spent_on),
                category = esc(&item.category),
                memo = esc(item.memo.as_deref().unwrap_or_default()),
                amount = yen(item.amount),
            );
        }
        let _ = write!(
            body,
            r#"</tbody><tfoot><tr><th colspan="3">{}</th><th class="amount total">{}</th><th></th></tr></tfoot></table>"#,
            esc(ctx.t(Msg::Total)),
            yen(detail.total)
        );
    }

    if owned {
        let _ = write!(
            body,
            r#"<h2>{heading}</h2>{errors}<form method="post" action="/account_books/{id}/expense_items">{amount}{category}{memo}{spent_on}<button type="submit">{submit}</button></form>"#,
            heading = esc(ctx.t(Msg::AddExpenseItem)),
            errors = error_list(ctx.locale, errors),
            id = book.id,
            amount = input(ctx.locale, Field::Amount, "number", &item_form.amount),
            category = input(ctx.locale, Field::Category, "text", &item_form.category),
            memo = input(ctx.locale, Field::Memo, "text", &item_form.memo),
            spent_on = input(ctx.locale, Field::SpentOn, "date", &item_form.spent_on),
            submit = esc(ctx.t(Msg::AddExpenseItem)),
        );
    }

    let _ = write!(
        body,
        r#"<p><a href="/account_books">{}</a></p>"#,
        esc(ctx.t(Msg::Back))
    );

    layout(ctx, &book.title, &body)
}
