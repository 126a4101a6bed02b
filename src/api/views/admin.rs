//! Back-office pages: login, dashboard, families and checkpoints.

use std::fmt::Write;

use super::layout::{action_button, escape, escape_opt};
use crate::domain::checkpoint::format_file_size;
use crate::domain::{Checkpoint, Dashboard, FamilyInput, FamilyWithCount, SessionUser};

pub fn login(username: &str, error: Option<&str>) -> String {
    format!(
        r#"{error}<form method="post" action="/admin/login" class="login">
<label>Username <input name="username" value="{username}" autocomplete="username" required autofocus></label>
<label>Password <input type="password" name="password" autocomplete="current-password" required></label>
<button type="submit">Sign in</button>
</form>"#,
        error = error
            .map(|e| format!(r#"<p class="flash flash-error">{}</p>"#, escape(e)))
            .unwrap_or_default(),
        username = escape(username),
    )
}

pub fn dashboard(data: &Dashboard) -> String {
    let stats = &data.stats;
    let mut html = format!(
        r#"<section class="stats">
<div><strong>{}</strong> products</div>
<div><strong>{}</strong> families</div>
<div class="low"><strong>{}</strong> low stock</div>
<div class="out"><strong>{}</strong> out of stock</div>
<div><strong>{}</strong> inventory value</div>
</section>"#,
        stats.product_count,
        stats.family_count,
        stats.low_stock_count,
        stats.out_of_stock_count,
        stats.inventory_value.format_eur(),
    );

    html.push_str("<section><h2>Recent products</h2><table><tr><th>Reference</th><th>Name</th><th>Family</th><th>Stock</th></tr>");
    for item in &data.recent_products {
        let _ = write!(
            html,
            r#"<tr><td><a href="/admin/products/edit/{}">{}</a></td><td>{}</td><td>{}</td><td>{}</td></tr>"#,
            item.product.id,
            escape(&item.product.reference),
            escape(&item.product.name),
            escape_opt(item.family_name.as_deref()),
            item.product.current_stock,
        );
    }
    html.push_str("</table></section>");

    html.push_str("<section><h2>Recent transactions</h2><table><tr><th>Date</th><th>Product</th><th>Type</th><th>Quantity</th><th>Total</th></tr>");
    for row in &data.recent_transactions {
        let t = &row.transaction;
        let _ = write!(
            html,
            r#"<tr><td>{}</td><td><a href="/admin/inventory/product/{}">{}</a></td><td>{}</td><td>{}</td><td>{}</td></tr>"#,
            t.created_at.format("%Y-%m-%d %H:%M"),
            t.product_id,
            escape(&row.product_reference),
            t.transaction_type.label(),
            t.quantity,
            t.total_amount.format_eur(),
        );
    }
    html.push_str("</table></section>");
    html
}

pub fn family_list(families: &[FamilyWithCount]) -> String {
    let mut html = String::from(
        r#"<p><a href="/admin/families/add">Add family</a></p><table><tr><th>Code</th><th>Name</th><th>Products</th><th></th></tr>"#,
    );
    for item in families {
        let f = &item.family;
        let _ = write!(
            html,
            r#"<tr><td>{}</td><td>{}</td><td>{}</td><td><a href="/admin/families/edit/{}">Edit</a> {}</td></tr>"#,
            escape(&f.code),
            escape(&f.name),
            item.product_count,
            f.id,
            action_button(
                &format!("/admin/families/delete/{}", f.id),
                "Delete",
                Some("Delete this family?")
            ),
        );
    }
    if families.is_empty() {
        html.push_str(r#"<tr><td colspan="4">No families yet.</td></tr>"#);
    }
    html.push_str("</table>");
    html
}

/// Add form when `id` is `None`, edit form otherwise.
pub fn family_form(id: Option<i32>, input: &FamilyInput, error: Option<&str>) -> String {
    let action = match id {
        Some(id) => format!("/admin/families/edit/{}", id),
        None => "/admin/families/add".to_string(),
    };
    format!(
        r#"{error}<form method="post" action="{action}">
<label>Code <input name="code" value="{code}" maxlength="20" required></label>
<label>Name <input name="name" value="{name}" maxlength="100" required></label>
<label>Description <textarea name="description">{description}</textarea></label>
<button type="submit">Save</button> <a href="/admin/families">Cancel</a>
</form>"#,
        error = error
            .map(|e| format!(r#"<p class="flash flash-error">{}</p>"#, escape(e)))
            .unwrap_or_default(),
        action = action,
        code = escape(&input.code),
        name = escape(&input.name),
        description = escape_opt(input.description.as_deref()),
    )
}

pub fn checkpoint_list(checkpoints: &[Checkpoint], user: &SessionUser) -> String {
    let mut html = String::from(
        r#"<form method="post" action="/admin/checkpoints/create" class="checkpoint-create">
<label>Name <input name="name" maxlength="100" placeholder="Optional"></label>
<label>Description <input name="description" maxlength="500"></label>
<button type="submit">Create checkpoint</button>
</form>
<table><tr><th>Name</th><th>Description</th><th>File</th><th>Size</th><th>Created</th><th>By</th><th></th></tr>"#,
    );

    for cp in checkpoints {
        let actions = if user.is_admin() {
            format!(
                "{} {}",
                action_button(
                    &format!("/admin/checkpoints/restore/{}", cp.id),
                    "Restore",
                    Some("Restore this checkpoint? Current data will be replaced.")
                ),
                action_button(
                    &format!("/admin/checkpoints/delete/{}", cp.id),
                    "Delete",
                    Some("Delete this checkpoint?")
                ),
            )
        } else {
            String::new()
        };
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&cp.checkpoint_name),
            escape_opt(cp.description.as_deref()),
            escape(&cp.file_name),
            cp.file_size.map(format_file_size).unwrap_or_default(),
            cp.created_at.format("%Y-%m-%d %H:%M:%S"),
            escape_opt(cp.created_by.as_deref()),
            actions,
        );
    }
    if checkpoints.is_empty() {
        html.push_str(r#"<tr><td colspan="7">No checkpoints yet.</td></tr>"#);
    }
    html.push_str("</table>");
    html
}
