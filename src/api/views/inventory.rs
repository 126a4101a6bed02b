//! Inventory screens.

use std::fmt::Write;

use super::layout::{escape, escape_opt, options, pagination, query_url};
use crate::domain::{
    InventoryOverview, InventoryTransaction, Product, ProductSummary, TransactionFilter,
    TransactionType, TransactionWithProduct,
};
use crate::types::Paginated;

fn type_options(selected: Option<TransactionType>, with_all: bool) -> String {
    let all = with_all.then(|| (String::new(), "All types"));
    options(
        all.into_iter().chain(
            TransactionType::ALL
                .iter()
                .map(|t| (t.as_str().to_string(), t.label())),
        ),
        selected.map(|t| t.as_str()),
    )
}

/// Stock movement form; `product` fixes the product, otherwise a select is shown.
pub fn movement_form(products: &[ProductSummary], product: Option<&Product>, return_to: &str) -> String {
    let product_field = match product {
        Some(p) => format!(r#"<input type="hidden" name="product_id" value="{}">"#, p.id),
        None => format!(
            r#"<label>Product <select name="product_id" required>{}</select></label>"#,
            options(
                std::iter::once((String::new(), "Select a product")).chain(
                    products
                        .iter()
                        .map(|s| (s.product.id.to_string(), s.product.reference.as_str())),
                ),
                None,
            )
        ),
    };
    format!(
        r#"<form method="post" action="/admin/inventory/movement" class="movement">
{product_field}
<input type="hidden" name="return_to" value="{return_to}">
<label>Type <select name="transaction_type">{types}</select></label>
<label>Quantity <input type="number" name="quantity" required></label>
<label>Unit price <input name="unit_price" inputmode="decimal" placeholder="0,00"></label>
<label>Notes <input name="notes" maxlength="500"></label>
<button type="submit">Record</button>
<small>For an adjustment, quantity is the new stock level.</small>
</form>"#,
        product_field = product_field,
        return_to = escape(return_to),
        types = type_options(None, false),
    )
}

fn stock_table(items: &[ProductSummary]) -> String {
    let mut html = String::from(
        "<table><tr><th>Reference</th><th>Name</th><th>Family</th><th>Stock</th><th>Sold</th><th>Purchase price</th><th>Value</th></tr>",
    );
    for item in items {
        let p = &item.product;
        let _ = write!(
            html,
            r#"<tr><td><a href="/admin/inventory/product/{}">{}</a></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>"#,
            p.id,
            escape(&p.reference),
            escape(&p.name),
            escape_opt(item.family_name.as_deref()),
            p.current_stock,
            p.total_sold,
            p.purchase_price.format_eur(),
            p.stock_value().format_eur(),
        );
    }
    if items.is_empty() {
        html.push_str(r#"<tr><td colspan="7">None.</td></tr>"#);
    }
    html.push_str("</table>");
    html
}

pub fn overview(data: &InventoryOverview) -> String {
    format!(
        r#"<p class="total">Total inventory value: <strong>{value}</strong></p>
<p><a href="/admin/inventory/transactions">All transactions</a></p>
<section><h2>Record movement</h2>{form}</section>
<section class="low"><h2>Low stock ({low_count})</h2>{low}</section>
<section class="out"><h2>Out of stock ({out_count})</h2>{out}</section>
<section><h2>All products</h2>{all}</section>"#,
        value = data.total_value.format_eur(),
        form = movement_form(&data.products, None, "/admin/inventory"),
        low_count = data.low_stock.len(),
        low = stock_table(&data.low_stock),
        out_count = data.out_of_stock.len(),
        out = stock_table(&data.out_of_stock),
        all = stock_table(&data.products),
    )
}

fn transaction_row(t: &InventoryTransaction, product: Option<(&str, &str)>) -> String {
    let product_cells = product
        .map(|(reference, name)| {
            format!(
                r#"<td><a href="/admin/inventory/product/{}">{}</a></td><td>{}</td>"#,
                t.product_id,
                escape(reference),
                escape(name)
            )
        })
        .unwrap_or_default();
    format!(
        "<tr><td>{}</td>{}<td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
        t.created_at.format("%Y-%m-%d %H:%M"),
        product_cells,
        t.transaction_type.label(),
        t.quantity,
        t.unit_price.format_eur(),
        t.total_amount.format_eur(),
        escape_opt(t.notes.as_deref()),
        escape_opt(t.created_by.as_deref()),
    )
}

pub fn transactions(page: &Paginated<TransactionWithProduct>, filter: &TransactionFilter) -> String {
    let date = |d: Option<chrono::NaiveDate>| d.map(|d| d.format("%Y-%m-%d").to_string());

    let mut html = format!(
        r#"<form method="get" action="/admin/inventory/transactions" class="filters">
<label>Product ID <input name="product" value="{product}" size="6"></label>
<label>Type <select name="type">{types}</select></label>
<label>From <input type="date" name="from" value="{from}"></label>
<label>To <input type="date" name="to" value="{to}"></label>
<button type="submit">Filter</button>
</form>
<table><tr><th>Date</th><th>Reference</th><th>Product</th><th>Type</th><th>Quantity</th><th>Unit price</th><th>Total</th><th>Notes</th><th>By</th></tr>"#,
        product = filter.product_id.map(|id| id.to_string()).unwrap_or_default(),
        types = type_options(filter.transaction_type, true),
        from = date(filter.from).unwrap_or_default(),
        to = date(filter.to).unwrap_or_default(),
    );
    for row in &page.data {
        html.push_str(&transaction_row(
            &row.transaction,
            Some((&row.product_reference, &row.product_name)),
        ));
    }
    if page.data.is_empty() {
        html.push_str(r#"<tr><td colspan="9">No transactions.</td></tr>"#);
    }
    html.push_str("</table>");

    let base = query_url(
        "/admin/inventory/transactions",
        &[
            ("product", filter.product_id.map(|id| id.to_string())),
            ("type", filter.transaction_type.map(|t| t.as_str().to_string())),
            ("from", date(filter.from)),
            ("to", date(filter.to)),
        ],
    );
    html.push_str(&pagination(&page.meta, &base));
    html
}

pub fn history(product: &Product, page: &Paginated<InventoryTransaction>) -> String {
    let return_to = format!("/admin/inventory/product/{}", product.id);
    let mut html = format!(
        r#"<p>Current stock: <strong>{stock}</strong> ({status}). Sold: {sold}. <a href="/admin/products/edit/{id}">Edit product</a></p>
<section><h2>Record movement</h2>{form}</section>
<table><tr><th>Date</th><th>Type</th><th>Quantity</th><th>Unit price</th><th>Total</th><th>Notes</th><th>By</th></tr>"#,
        stock = product.current_stock,
        status = product.stock_status().label(),
        sold = product.total_sold,
        id = product.id,
        form = movement_form(&[], Some(product), &return_to),
    );
    for t in &page.data {
        html.push_str(&transaction_row(t, None));
    }
    if page.data.is_empty() {
        html.push_str(r#"<tr><td colspan="7">No transactions.</td></tr>"#);
    }
    html.push_str("</table>");
    html.push_str(&pagination(&page.meta, &return_to));
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_options_mark_selection() {
        let html = type_options(Some(TransactionType::Sale), true);
        assert!(html.contains(r#"<option value="sale" selected>Sale</option>"#));
        assert!(html.contains(r#"<option value="">All types</option>"#));
    }

    #[test]
    fn test_movement_form_with_product_select() {
        let html = movement_form(&[], None, "/admin/inventory");
        assert!(html.contains(r#"<select name="product_id" required>"#));
        assert!(html.contains(r#"name="return_to" value="/admin/inventory""#));
    }
}
