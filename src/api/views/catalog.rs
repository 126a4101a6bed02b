//! Public catalog pages.

use std::fmt::Write;

use super::layout::{escape, escape_opt, options, pagination, query_url};
use crate::domain::{Family, FamilyWithCount, ProductDetail, ProductSummary};
use crate::types::Paginated;

fn product_card(item: &ProductSummary) -> String {
    let product = &item.product;
    let image = item
        .image_url()
        .map(|url| format!(r#"<img src="{}" alt="{}">"#, escape(&url), escape(&product.name)))
        .unwrap_or_else(|| r#"<div class="no-image">No image</div>"#.to_string());
    format!(
        r#"<div class="card"><a href="/product/{id}">{image}<h3>{name}</h3></a><p class="ref">{reference}</p><p class="price">{price}</p></div>"#,
        id = product.id,
        image = image,
        name = escape(&product.name),
        reference = escape(&product.reference),
        price = product.sale_price.format_eur(),
    )
}

fn product_grid(items: &[ProductSummary]) -> String {
    if items.is_empty() {
        return r#"<p class="empty">No products found.</p>"#.to_string();
    }
    let cards: String = items.iter().map(product_card).collect();
    format!(r#"<div class="grid">{}</div>"#, cards)
}

fn family_links(families: &[Family]) -> String {
    let links: String = families
        .iter()
        .map(|f| format!(r#"<li><a href="/collection/{}">{}</a></li>"#, f.id, escape(&f.name)))
        .collect();
    format!(r#"<ul class="families">{}</ul>"#, links)
}

fn gallery_section(html: &mut String, gallery: &[String]) {
    if gallery.is_empty() {
        return;
    }
    html.push_str(r#"<section class="gallery">"#);
    for url in gallery {
        if url.ends_with(".mp4") {
            let _ = write!(
                html,
                r#"<video src="{}" autoplay muted loop playsinline></video>"#,
                escape(url)
            );
        } else {
            let _ = write!(html, r#"<img src="{}" alt="">"#, escape(url));
        }
    }
    html.push_str("</section>");
}

pub fn home(featured: &[ProductSummary], families: &[Family], gallery: &[String]) -> String {
    let mut html = String::new();
    gallery_section(&mut html, gallery);

    let _ = write!(
        html,
        r#"<section><h2>Featured</h2>{}</section><section><h2>Collections</h2>{}</section>"#,
        product_grid(featured),
        family_links(families)
    );
    html
}

pub fn catalog(
    page: &Paginated<ProductSummary>,
    families: &[Family],
    family_id: Option<i32>,
    search: Option<&str>,
) -> String {
    let family_options = options(
        std::iter::once((String::new(), "All families"))
            .chain(families.iter().map(|f| (f.id.to_string(), f.name.as_str()))),
        family_id.map(|id| id.to_string()).as_deref(),
    );

    let base = query_url(
        "/catalog",
        &[
            ("family", family_id.map(|id| id.to_string())),
            ("search", search.map(str::to_string)),
        ],
    );

    format!(
        r#"<form method="get" action="/catalog" class="filters"><select name="family">{options}</select> <input type="search" name="search" value="{search}" placeholder="Reference or name"> <button type="submit">Filter</button></form>
<p class="count">{total} products</p>
{grid}
{pager}"#,
        options = family_options,
        search = escape_opt(search),
        total = page.meta.total,
        grid = product_grid(&page.data),
        pager = pagination(&page.meta, &base),
    )
}

/// Every gallery file, then each family with how many products it holds.
pub fn collections(gallery: &[String], families: &[FamilyWithCount]) -> String {
    let mut html = String::new();
    gallery_section(&mut html, gallery);
    if gallery.is_empty() {
        html.push_str(r#"<p class="empty">No pictures yet.</p>"#);
    }

    html.push_str(r#"<section><h2>Collections</h2><ul class="families">"#);
    for entry in families {
        let _ = write!(
            html,
            r#"<li><a href="/collection/{}">{}</a> <span class="count">({})</span></li>"#,
            entry.family.id,
            escape(&entry.family.name),
            entry.product_count
        );
    }
    html.push_str("</ul></section>");
    html
}

pub fn collection(family: &Family, products: &[ProductSummary]) -> String {
    format!(
        "{}{}",
        family
            .description
            .as_deref()
            .map(|d| format!(r#"<p class="description">{}</p>"#, escape(d)))
            .unwrap_or_default(),
        product_grid(products)
    )
}

pub fn product(detail: &ProductDetail) -> String {
    let product = &detail.product;

    let images: String = detail
        .images
        .iter()
        .map(|img| {
            format!(
                r#"<img src="{}" alt="{}"{}>"#,
                escape(&img.url()),
                escape(&product.name),
                if img.is_primary { r#" class="primary""# } else { "" }
            )
        })
        .collect();

    let mut facts = String::new();
    let rows = [
        ("Reference", Some(product.reference.as_str())),
        ("Collection", detail.family.as_ref().map(|f| f.name.as_str())),
        ("Style", product.style.as_deref()),
        ("Material", product.material.as_deref()),
        ("Dimensions", product.dimensions.as_deref()),
    ];
    for (label, value) in rows {
        if let Some(value) = value {
            let _ = write!(facts, "<tr><th>{}</th><td>{}</td></tr>", label, escape(value));
        }
    }
    if let Some(weight) = product.weight {
        let _ = write!(facts, "<tr><th>Weight</th><td>{} g</td></tr>", weight);
    }

    format!(
        r#"<div class="product"><div class="images">{images}</div><div class="info"><p class="price">{price}</p>{description}<table>{facts}</table><p class="stock">{stock}</p></div></div>"#,
        images = images,
        price = product.sale_price.format_eur(),
        description = product
            .description
            .as_deref()
            .map(|d| format!("<p>{}</p>", escape(d)))
            .unwrap_or_default(),
        facts = facts,
        stock = product.stock_status().label(),
    )
}

pub fn about(site_name: &str) -> String {
    format!(
        "<p>{} makes and sells handcrafted jewelry. Browse the <a href=\"/catalog\">catalog</a> \
         or get in touch to see a piece in person.</p>",
        escape(site_name)
    )
}

pub fn site_password(error: bool) -> String {
    format!(
        r#"{}<form method="post" action="/site-password"><label>Password <input type="password" name="password" autofocus required></label> <button type="submit">Enter</button></form>"#,
        if error {
            r#"<p class="flash flash-error">Incorrect password</p>"#
        } else {
            ""
        }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Money, Product};
    use chrono::Utc;

    fn summary(name: &str) -> ProductSummary {
        ProductSummary {
            product: Product {
                id: 7,
                reference: "AN-7".to_string(),
                family_id: 1,
                name: name.to_string(),
                description: None,
                sale_price: Money::from_cents(123456),
                purchase_price: Money::ZERO,
                current_stock: 3,
                total_sold: 0,
                style: None,
                material: None,
                weight: None,
                dimensions: None,
                is_active: true,
                featured: true,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            family_name: Some("Rings".to_string()),
            primary_image: None,
        }
    }

    #[test]
    fn test_card_escapes_name_and_formats_price() {
        let html = product_grid(&[summary("<Gold> Ring")]);
        assert!(html.contains("&lt;Gold&gt; Ring"));
        assert!(html.contains("€1.234,56"));
        assert!(html.contains(r#"href="/product/7""#));
    }

    #[test]
    fn test_collections_lists_media_and_families() {
        let family = Family {
            id: 4,
            code: "BR".to_string(),
            name: "Bracelets & Bangles".to_string(),
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let html = collections(
            &["/media/gallery/a.jpg".to_string(), "/media/gallery/b.mp4".to_string()],
            &[FamilyWithCount {
                family,
                product_count: 12,
            }],
        );

        assert!(html.contains(r#"<img src="/media/gallery/a.jpg""#));
        assert!(html.contains(r#"<video src="/media/gallery/b.mp4""#));
        assert!(html.contains(r#"href="/collection/4">Bracelets &amp; Bangles</a>"#));
        assert!(html.contains("(12)"));
        assert!(!html.contains("No pictures yet"));
    }

    #[test]
    fn test_empty_grid() {
        assert!(product_grid(&[]).contains("No products found"));
    }
}
