use std::fmt::Write;

use super::{PageContext, esc, layout, yen};
use crate::i18n::Msg;
use crate::services::Dashboard;

#[must_use]
pub fn show(ctx: &PageContext, dashboard: &Dashboard) -> String {
    let mut body = format!(
        r#"<dl>
<dt>{books_label}</dt><dd class="book-count">{books}</dd>
<dt>{total_label}</dt><dd class="total-spent">{total}</dd>
<dt>{likes_label}</dt><dd class="likes-received">{likes}</dd>
</dl>"#,
        books_label = esc(ctx.t(Msg::AccountBookCount)),
        books = dashboard.book_count,
        total_label = esc(ctx.t(Msg::Total)),
        total = yen(dashboard.total_spent),
        likes_label = esc(ctx.t(Msg::LikesReceived)),
        likes = dashboard.likes_received,
    );

    if !dashboard.category_totals.is_empty() {
        let _ = write!(
            body,
            "<h2>{}</h2><table><tbody>",
            esc(ctx.t(Msg::CategoryTotals))
        );
        for total in &dashboard.category_totals {
            let _ = write!(
                body,
                r#"<tr><td>{}</td><td class="amount">{}</td></tr>"#,
                esc(&total.category),
                yen(total.amount)
            );
        }
        body.push_str("</tbody></table>");
    }

    layout(ctx, ctx.t(Msg::Dashboard), &body)
}
