//! Admin product listing and form.

use std::fmt::Write;

use super::layout::{action_button, escape, escape_opt, options, pagination, query_url};
use crate::api::forms::ProductForm;
use crate::domain::{Family, ProductFilter, ProductImage, ProductSort, ProductSummary, SortOrder};
use crate::types::Paginated;

fn filter_pairs(filter: &ProductFilter) -> Vec<(&'static str, Option<String>)> {
    vec![
        ("family", filter.family_id.map(|id| id.to_string())),
        ("search", filter.search.clone()),
        ("sort", Some(filter.sort.as_str().to_string())),
        ("order", Some(filter.order.as_str().to_string())),
    ]
}

/// Column header that sorts by `sort`, flipping the order when already active.
fn sort_header(filter: &ProductFilter, sort: ProductSort, label: &str) -> String {
    let order = if filter.sort == sort {
        filter.order.flipped()
    } else {
        SortOrder::Asc
    };
    let marker = match (filter.sort == sort, filter.order) {
        (true, SortOrder::Asc) => " &uarr;",
        (true, SortOrder::Desc) => " &darr;",
        _ => "",
    };
    let url = query_url(
        "/admin/products",
        &[
            ("family", filter.family_id.map(|id| id.to_string())),
            ("search", filter.search.clone()),
            ("sort", Some(sort.as_str().to_string())),
            ("order", Some(order.as_str().to_string())),
        ],
    );
    format!(r#"<th><a href="{}">{}</a>{}</th>"#, url, label, marker)
}

pub fn list(page: &Paginated<ProductSummary>, families: &[Family], filter: &ProductFilter) -> String {
    let family_options = options(
        std::iter::once((String::new(), "All families"))
            .chain(families.iter().map(|f| (f.id.to_string(), f.name.as_str()))),
        filter.family_id.map(|id| id.to_string()).as_deref(),
    );

    let mut html = format!(
        r#"<p><a href="/admin/products/add">Add product</a></p>
<form method="get" action="/admin/products" class="filters">
<select name="family">{}</select>
<input type="search" name="search" value="{}" placeholder="Reference or name">
<input type="hidden" name="sort" value="{}"><input type="hidden" name="order" value="{}">
<button type="submit">Filter</button>
</form>
<table><tr>{}{}<th>Family</th>{}{}<th>Status</th><th></th></tr>"#,
        family_options,
        escape_opt(filter.search.as_deref()),
        filter.sort.as_str(),
        filter.order.as_str(),
        sort_header(filter, ProductSort::Reference, "Reference"),
        sort_header(filter, ProductSort::Name, "Name"),
        sort_header(filter, ProductSort::SalePrice, "Price"),
        sort_header(filter, ProductSort::Stock, "Stock"),
    );

    for item in &page.data {
        let p = &item.product;
        let status_class = match p.stock_status() {
            crate::domain::StockStatus::InStock => "",
            crate::domain::StockStatus::Low => "low",
            crate::domain::StockStatus::Out => "out",
        };
        let _ = write!(
            html,
            r#"<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td class="{}">{}</td><td>{}{}</td><td><a href="/admin/products/edit/{}">Edit</a> <a href="/admin/inventory/product/{}">History</a> {}</td></tr>"#,
            escape(&p.reference),
            escape(&p.name),
            escape_opt(item.family_name.as_deref()),
            p.sale_price.format_eur(),
            status_class,
            p.current_stock,
            if p.is_active { "Active" } else { "Inactive" },
            if p.featured { ", featured" } else { "" },
            p.id,
            p.id,
            action_button(
                &format!("/admin/products/delete/{}", p.id),
                "Delete",
                Some("Delete this product, its images and its stock history?")
            ),
        );
    }
    if page.data.is_empty() {
        html.push_str(r#"<tr><td colspan="7">No products found.</td></tr>"#);
    }
    html.push_str("</table>");
    html.push_str(&pagination(
        &page.meta,
        &query_url("/admin/products", &filter_pairs(filter)),
    ));
    html
}

fn checked(on: bool) -> &'static str {
    if on {
        " checked"
    } else {
        ""
    }
}

/// Add form when `id` is `None`, edit form otherwise.
pub fn form(
    id: Option<i32>,
    form: &ProductForm,
    families: &[Family],
    images: &[ProductImage],
    error: Option<&str>,
) -> String {
    let action = match id {
        Some(id) => format!("/admin/products/edit/{}", id),
        None => "/admin/products/add".to_string(),
    };
    let family_options = options(
        std::iter::once((String::new(), "Select a family"))
            .chain(families.iter().map(|f| (f.id.to_string(), f.name.as_str()))),
        Some(form.family_id.as_str()),
    );
    let stock_field = if id.is_none() {
        format!(
            r#"<label>Initial stock <input type="number" name="initial_stock" min="0" value="{}"></label>"#,
            escape(&form.initial_stock)
        )
    } else {
        String::new()
    };

    let mut html = format!(
        r#"{error}<form method="post" action="{action}" enctype="multipart/form-data">
<label>Reference <input name="reference" value="{reference}" maxlength="50" required></label>
<label>Family <select name="family_id" required>{families}</select></label>
<label>Name <input name="name" value="{name}" maxlength="200" required></label>
<label>Description <textarea name="description">{description}</textarea></label>
<label>Sale price <input name="sale_price" value="{sale_price}" inputmode="decimal" required></label>
<label>Purchase price <input name="purchase_price" value="{purchase_price}" inputmode="decimal" required></label>
{stock_field}
<label>Style <input name="style" value="{style}" maxlength="100"></label>
<label>Material <input name="material" value="{material}" maxlength="100"></label>
<label>Weight (g) <input name="weight" value="{weight}" inputmode="decimal"></label>
<label>Dimensions <input name="dimensions" value="{dimensions}" maxlength="100"></label>
<label><input type="checkbox" name="is_active"{active}> Active</label>
<label><input type="checkbox" name="featured"{featured}> Featured</label>
<label>Images <input type="file" name="images" accept=".jpg,.jpeg,.png,.gif" multiple></label>
<button type="submit">Save</button> <a href="/admin/products">Cancel</a>
</form>"#,
        error = error
            .map(|e| format!(r#"<p class="flash flash-error">{}</p>"#, escape(e)))
            .unwrap_or_default(),
        action = action,
        reference = escape(&form.reference),
        families = family_options,
        name = escape(&form.name),
        description = escape(&form.description),
        sale_price = escape(&form.sale_price),
        purchase_price = escape(&form.purchase_price),
        stock_field = stock_field,
        style = escape(&form.style),
        material = escape(&form.material),
        weight = escape(&form.weight),
        dimensions = escape(&form.dimensions),
        active = checked(form.is_active),
        featured = checked(form.featured),
    );

    if let Some(product_id) = id {
        html.push_str(r#"<section class="images"><h2>Images</h2>"#);
        for image in images {
            let primary = if image.is_primary {
                "<strong>Primary</strong>".to_string()
            } else {
                action_button(
                    &format!("/admin/products/{}/images/{}/primary", product_id, image.id),
                    "Make primary",
                    None,
                )
            };
            let _ = write!(
                html,
                r#"<figure><img src="{}" alt="" width="120"><figcaption>{} {}</figcaption></figure>"#,
                escape(&image.url()),
                primary,
                action_button(
                    &format!("/admin/products/{}/images/{}/delete", product_id, image.id),
                    "Remove",
                    Some("Remove this image?")
                ),
            );
        }
        if images.is_empty() {
            html.push_str("<p>No images yet.</p>");
        }
        html.push_str("</section>");
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_header_flips_active_column() {
        let filter = ProductFilter {
            sort: ProductSort::Name,
            order: SortOrder::Asc,
            ..ProductFilter::default()
        };
        let header = sort_header(&filter, ProductSort::Name, "Name");
        assert!(header.contains("sort=name&amp;order=desc"));
        assert!(header.contains("&uarr;"));

        let other = sort_header(&filter, ProductSort::Stock, "Stock");
        assert!(other.contains("sort=stock&amp;order=asc"));
    }

    #[test]
    fn test_edit_form_hides_initial_stock() {
        let add = form(None, &ProductForm::default(), &[], &[], None);
        assert!(add.contains(r#"name="initial_stock""#));

        let edit = form(Some(3), &ProductForm::default(), &[], &[], None);
        assert!(!edit.contains(r#"name="initial_stock""#));
        assert!(edit.contains("/admin/products/edit/3"));
    }
}
