//! Customer and supplier screens.

use std::fmt::Write;

use super::layout::{action_button, escape, escape_opt, pagination, query_url};
use crate::domain::{ContactFilter, ContactScope, Customer, CustomerInput, Supplier, SupplierInput};
use crate::types::Paginated;

fn error_html(error: Option<&str>) -> String {
    error
        .map(|e| format!(r#"<p class="flash flash-error">{}</p>"#, escape(e)))
        .unwrap_or_default()
}

fn checked(on: bool) -> &'static str {
    if on {
        " checked"
    } else {
        ""
    }
}

fn scope_value(scope: ContactScope) -> Option<String> {
    match scope {
        ContactScope::Current => None,
        ContactScope::Deleted => Some("deleted".to_string()),
    }
}

/// Search box plus the current/deleted switch.
fn filters(path: &str, filter: &ContactFilter, with_active: bool) -> String {
    let (switch_label, switch_scope) = match filter.scope {
        ContactScope::Current => ("Show deleted", Some("deleted".to_string())),
        ContactScope::Deleted => ("Show current", None),
    };
    let active = if with_active {
        format!(
            r#"<label><input type="checkbox" name="active" value="1"{}> Active only</label>"#,
            checked(filter.active_only)
        )
    } else {
        String::new()
    };
    format!(
        r#"<form method="get" action="{path}" class="filters"><input type="search" name="search" value="{search}" placeholder="Name, email, phone or tax number">{scope}{active} <button type="submit">Search</button></form>
<p><a href="{path}/add">Add</a> | <a href="{switch}">{switch_label}</a></p>"#,
        path = path,
        search = escape_opt(filter.search.as_deref()),
        scope = scope_value(filter.scope)
            .map(|s| format!(r#"<input type="hidden" name="show" value="{}">"#, s))
            .unwrap_or_default(),
        active = active,
        switch = query_url(path, &[("show", switch_scope)]),
        switch_label = switch_label,
    )
}

fn row_actions(path: &str, id: i32, deleted: bool) -> String {
    if deleted {
        action_button(&format!("{}/restore/{}", path, id), "Restore", None)
    } else {
        format!(
            r#"<a href="{}/edit/{}">Edit</a> {}"#,
            path,
            id,
            action_button(&format!("{}/delete/{}", path, id), "Delete", Some("Delete this record?"))
        )
    }
}

pub fn customer_list(page: &Paginated<Customer>, filter: &ContactFilter) -> String {
    let path = "/admin/customers";
    let mut html = filters(path, filter, false);
    html.push_str("<table><tr><th>Name</th><th>Email</th><th>Phone</th><th>Tax number</th><th>City</th><th></th></tr>");
    for c in &page.data {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&c.name),
            escape_opt(c.email.as_deref()),
            escape_opt(c.phone.as_deref()),
            escape_opt(c.tax_number.as_deref()),
            escape_opt(c.city.as_deref()),
            row_actions(path, c.id, c.is_deleted()),
        );
    }
    if page.data.is_empty() {
        html.push_str(r#"<tr><td colspan="6">No customers found.</td></tr>"#);
    }
    html.push_str("</table>");
    html.push_str(&pagination(
        &page.meta,
        &query_url(
            path,
            &[("search", filter.search.clone()), ("show", scope_value(filter.scope))],
        ),
    ));
    html
}

pub fn supplier_list(page: &Paginated<Supplier>, filter: &ContactFilter) -> String {
    let path = "/admin/suppliers";
    let mut html = filters(path, filter, true);
    html.push_str("<table><tr><th>Name</th><th>Contact</th><th>Email</th><th>Phone</th><th>Status</th><th></th></tr>");
    for s in &page.data {
        let toggle = if s.is_deleted() {
            String::new()
        } else {
            action_button(
                &format!("{}/toggle/{}", path, s.id),
                if s.is_active { "Deactivate" } else { "Activate" },
                None,
            )
        };
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{} {}</td><td>{}</td></tr>",
            escape(&s.name),
            escape_opt(s.contact_person.as_deref()),
            escape_opt(s.email.as_deref()),
            escape_opt(s.phone.as_deref()),
            if s.is_active { "Active" } else { "Inactive" },
            toggle,
            row_actions(path, s.id, s.is_deleted()),
        );
    }
    if page.data.is_empty() {
        html.push_str(r#"<tr><td colspan="6">No suppliers found.</td></tr>"#);
    }
    html.push_str("</table>");
    html.push_str(&pagination(
        &page.meta,
        &query_url(
            path,
            &[
                ("search", filter.search.clone()),
                ("show", scope_value(filter.scope)),
                ("active", filter.active_only.then(|| "1".to_string())),
            ],
        ),
    ));
    html
}

fn text_field(label: &str, name: &str, value: Option<&str>) -> String {
    format!(
        r#"<label>{} <input name="{}" value="{}"></label>"#,
        label,
        name,
        escape_opt(value)
    )
}

fn form_action(path: &str, id: Option<i32>) -> String {
    match id {
        Some(id) => format!("{}/edit/{}", path, id),
        None => format!("{}/add", path),
    }
}

pub fn customer_form(id: Option<i32>, input: &CustomerInput, error: Option<&str>) -> String {
    let active = id.is_none() || input.active();
    format!(
        r#"{error}<form method="post" action="{action}">
<label>Name <input name="name" value="{name}" maxlength="200" required></label>
{email}{phone}{tax}{address}{city}{postal}{country}
<label>Notes <textarea name="notes">{notes}</textarea></label>
<label><input type="checkbox" name="is_active"{active}> Active</label>
<button type="submit">Save</button> <a href="/admin/customers">Cancel</a>
</form>"#,
        error = error_html(error),
        action = form_action("/admin/customers", id),
        name = escape(&input.name),
        email = text_field("Email", "email", input.email.as_deref()),
        phone = text_field("Phone", "phone", input.phone.as_deref()),
        tax = text_field("Tax number", "tax_number", input.tax_number.as_deref()),
        address = text_field("Address", "address", input.address.as_deref()),
        city = text_field("City", "city", input.city.as_deref()),
        postal = text_field("Postal code", "postal_code", input.postal_code.as_deref()),
        country = text_field("Country", "country", input.country.as_deref()),
        notes = escape_opt(input.notes.as_deref()),
        active = checked(active),
    )
}

pub fn supplier_form(id: Option<i32>, input: &SupplierInput, error: Option<&str>) -> String {
    let active = id.is_none() || input.active();
    format!(
        r#"{error}<form method="post" action="{action}">
<label>Name <input name="name" value="{name}" maxlength="200" required></label>
{contact}{email}{phone}{tax}{address}{website}
<label>Notes <textarea name="notes">{notes}</textarea></label>
<label><input type="checkbox" name="is_active"{active}> Active</label>
<button type="submit">Save</button> <a href="/admin/suppliers">Cancel</a>
</form>"#,
        error = error_html(error),
        action = form_action("/admin/suppliers", id),
        name = escape(&input.name),
        contact = text_field("Contact person", "contact_person", input.contact_person.as_deref()),
        email = text_field("Email", "email", input.email.as_deref()),
        phone = text_field("Phone", "phone", input.phone.as_deref()),
        tax = text_field("Tax number", "tax_number", input.tax_number.as_deref()),
        address = text_field("Address", "address", input.address.as_deref()),
        website = text_field("Website", "website", input.website.as_deref()),
        notes = escape_opt(input.notes.as_deref()),
        active = checked(active),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_switch_between_scopes() {
        let current = filters("/admin/customers", &ContactFilter::default(), false);
        assert!(current.contains(r#"href="/admin/customers?show=deleted""#));

        let deleted = ContactFilter {
            scope: ContactScope::Deleted,
            ..ContactFilter::default()
        };
        let html = filters("/admin/customers", &deleted, false);
        assert!(html.contains("Show current"));
        assert!(html.contains(r#"name="show" value="deleted""#));
    }

    #[test]
    fn test_deleted_rows_offer_restore() {
        assert!(row_actions("/admin/customers", 3, true).contains("/admin/customers/restore/3"));
        assert!(row_actions("/admin/customers", 3, false).contains("/admin/customers/edit/3"));
    }

    #[test]
    fn test_edit_form_reflects_inactive_customer() {
        let input = CustomerInput {
            name: "Ana".to_string(),
            is_active: None,
            ..CustomerInput::default()
        };
        let html = customer_form(Some(2), &input, None);
        assert!(!html.contains(r#"name="is_active" checked"#));
        assert!(customer_form(None, &input, None).contains(r#"name="is_active" checked"#));
    }
}
