//! Page chrome shared by the catalog and the back office.

use std::fmt::Write;

use crate::domain::{Flash, SessionUser};
use crate::types::PaginationMeta;

/// Escape text for HTML element content and attribute values.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn escape_opt(raw: Option<&str>) -> String {
    raw.map(escape).unwrap_or_default()
}

/// Percent-encode a query-string value.
pub fn encode_query(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}

const STYLE: &str = "body{font-family:sans-serif;margin:0}header{background:#222;color:#eee;padding:.5em 1em}\
header a{color:#eee;margin-right:.8em}main{padding:1em}table{border-collapse:collapse}\
td,th{border:1px solid #ccc;padding:.3em .6em}.inline{display:inline}.flash{padding:.5em;margin:.5em 0}\
.flash-success{background:#dfd}.flash-error{background:#fdd}.flash-info{background:#def}\
.grid{display:flex;flex-wrap:wrap;gap:1em}.card{width:220px}.card img{max-width:100%}\
.low{color:#b60}.out{color:#c00}";

/// Which navigation bar a page gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    Public,
    Admin,
}

/// A full HTML document under construction.
pub struct Page<'a> {
    pub site_name: &'a str,
    pub title: String,
    pub area: Area,
    pub user: Option<&'a SessionUser>,
    pub flash: Vec<Flash>,
}

impl<'a> Page<'a> {
    pub fn public(site_name: &'a str, title: impl Into<String>) -> Self {
        Self {
            site_name,
            title: title.into(),
            area: Area::Public,
            user: None,
            flash: Vec::new(),
        }
    }

    pub fn admin(site_name: &'a str, title: impl Into<String>, user: Option<&'a SessionUser>) -> Self {
        Self {
            site_name,
            title: title.into(),
            area: Area::Admin,
            user,
            flash: Vec::new(),
        }
    }

    pub fn with_flash(mut self, flash: Vec<Flash>) -> Self {
        self.flash = flash;
        self
    }

    fn nav(&self) -> String {
        match self.area {
            Area::Public => concat!(
                r#"<nav><a href="/">Home</a> <a href="/catalog">Catalog</a> "#,
                r#"<a href="/collections">Gallery</a> "#,
                r#"<a href="/about">About</a></nav>"#
            )
            .to_string(),
            Area::Admin => {
                let mut nav = String::from(concat!(
                    r#"<nav><a href="/admin/dashboard">Dashboard</a> "#,
                    r#"<a href="/admin/products">Products</a> "#,
                    r#"<a href="/admin/families">Families</a> "#,
                    r#"<a href="/admin/inventory">Inventory</a> "#,
                    r#"<a href="/admin/customers">Customers</a> "#,
                    r#"<a href="/admin/suppliers">Suppliers</a> "#,
                    r#"<a href="/admin/checkpoints">Checkpoints</a>"#
                ));
                if let Some(user) = self.user {
                    let _ = write!(
                        nav,
                        r#" <span class="user">{} ({})</span> <form method="post" action="/admin/logout" class="inline"><button type="submit">Log out</button></form>"#,
                        escape(&user.username),
                        user.role.as_str()
                    );
                }
                nav.push_str("</nav>");
                nav
            }
        }
    }

    fn flash_html(&self) -> String {
        self.flash
            .iter()
            .map(|f| {
                format!(
                    r#"<div class="flash {}">{}</div>"#,
                    f.kind.css_class(),
                    escape(&f.message)
                )
            })
            .collect()
    }

    /// Wrap `body` in the document shell.
    pub fn render(&self, body: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | {site}</title>
<style>{style}</style>
</head>
<body class="{class}">
<header><a class="brand" href="{home}">{site}</a>{nav}</header>
<main>
{flash}<h1>{title}</h1>
{body}
</main>
</body>
</html>"#,
            title = escape(&self.title),
            site = escape(self.site_name),
            class = match self.area {
                Area::Public => "public",
                Area::Admin => "admin",
            },
            home = match self.area {
                Area::Public => "/",
                Area::Admin => "/admin/dashboard",
            },
            style = STYLE,
            nav = self.nav(),
            flash = self.flash_html(),
            body = body,
        )
    }
}

/// Previous / next links keeping the other query parameters.
///
/// `base` is the path plus any query already encoded, without `page`.
pub fn pagination(meta: &PaginationMeta, base: &str) -> String {
    if meta.total_pages <= 1 {
        return String::new();
    }
    let sep = if base.contains('?') { "&amp;" } else { "?" };

    let mut html = String::from(r#"<nav class="pagination">"#);
    if meta.has_previous() {
        let _ = write!(
            html,
            r#"<a href="{}{}page={}">&laquo; Previous</a> "#,
            base,
            sep,
            meta.page - 1
        );
    }
    let _ = write!(html, "Page {} of {} ", meta.page, meta.total_pages);
    if meta.has_next() {
        let _ = write!(
            html,
            r#"<a href="{}{}page={}">Next &raquo;</a>"#,
            base,
            sep,
            meta.page + 1
        );
    }
    html.push_str("</nav>");
    html
}

/// `path?key=value&...` for the non-empty pairs.
pub fn query_url(path: &str, pairs: &[(&str, Option<String>)]) -> String {
    let query: Vec<String> = pairs
        .iter()
        .filter_map(|(key, value)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| format!("{}={}", key, encode_query(v)))
        })
        .collect();
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query.join("&amp;"))
    }
}

/// `<option>` list with one entry selected.
pub fn options<'a>(
    items: impl IntoIterator<Item = (String, &'a str)>,
    selected: Option<&str>,
) -> String {
    items
        .into_iter()
        .map(|(value, label)| {
            let marker = if Some(value.as_str()) == selected {
                " selected"
            } else {
                ""
            };
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                escape(&value),
                marker,
                escape(label)
            )
        })
        .collect()
}

/// A POST form holding just a button, for delete/restore style actions.
pub fn action_button(action: &str, label: &str, confirm: Option<&str>) -> String {
    let onsubmit = confirm
        .map(|msg| format!(r#" onsubmit="return confirm('{}')""#, escape(msg)))
        .unwrap_or_default();
    format!(
        r#"<form method="post" action="{}" class="inline"{}><button type="submit">{}</button></form>"#,
        escape(action),
        onsubmit,
        escape(label)
    )
}
