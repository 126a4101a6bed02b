//! Product repository: listing queries, CRUD and images.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::{Expr, Order},
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};

use super::base::like_pattern;
use super::entities::{family, inventory_transaction, product, product_image};
use crate::config::INITIAL_STOCK_NOTE;
use crate::domain::{
    Money, NewProduct, NewProductImage, Product, ProductDetail, ProductFilter, ProductImage,
    ProductInput, ProductSort, ProductSummary, SortOrder, TransactionType,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// One page of products matching the filter, plus the total match count
    async fn search(
        &self,
        filter: ProductFilter,
        params: PaginationParams,
    ) -> AppResult<(Vec<ProductSummary>, u64)>;

    /// Every product matching the filter, unpaginated
    async fn list(&self, filter: ProductFilter) -> AppResult<Vec<ProductSummary>>;

    /// Newest products first
    async fn recent(&self, limit: u64) -> AppResult<Vec<ProductSummary>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Product>>;

    /// Product with its family and images (primary first)
    async fn find_detail(&self, id: i32) -> AppResult<Option<ProductDetail>>;

    async fn find_by_reference(&self, reference: &str) -> AppResult<Option<Product>>;

    /// Insert the product and, when it starts with stock, its opening ledger row
    async fn create(&self, product: NewProduct) -> AppResult<Product>;

    /// Update descriptive fields; stock counters are left untouched
    async fn update(&self, id: i32, input: ProductInput) -> AppResult<Product>;

    /// Remove the product with its images and ledger rows. Returns the image
    /// file names that were attached.
    async fn delete(&self, id: i32) -> AppResult<Vec<String>>;

    /// Attach an image; the first image of a product becomes primary
    async fn add_image(&self, image: NewProductImage) -> AppResult<ProductImage>;

    /// Detach an image, promoting the next one when the primary goes away
    async fn remove_image(&self, product_id: i32, image_id: i32) -> AppResult<ProductImage>;

    async fn set_primary_image(&self, product_id: i32, image_id: i32) -> AppResult<()>;

    async fn count(&self) -> AppResult<u64>;

    /// Products with `min < stock < max`
    async fn count_in_stock_range(&self, min: i32, max: i32) -> AppResult<u64>;

    /// Products with stock at or below zero
    async fn count_out_of_stock(&self) -> AppResult<u64>;

    /// `(current_stock, purchase_price)` of every product
    async fn stock_levels(&self) -> AppResult<Vec<(i32, Money)>>;
}

pub struct ProductStore {
    db: Arc<DatabaseConnection>,
}

impl ProductStore {
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { db: db.into() }
    }
}

fn apply_filter(mut select: Select<product::Entity>, filter: &ProductFilter) -> Select<product::Entity> {
    if let Some(family_id) = filter.family_id {
        select = select.filter(product::Column::FamilyId.eq(family_id));
    }
    if filter.active_only {
        select = select.filter(product::Column::IsActive.eq(true));
    }
    if filter.featured_only {
        select = select.filter(product::Column::Featured.eq(true));
    }
    if let Some(term) = &filter.search {
        let pattern = like_pattern(term);
        select = select.filter(
            Condition::any()
                .add(product::Column::Reference.like(pattern.clone()))
                .add(product::Column::Name.like(pattern)),
        );
    }
    select
}

fn apply_sort(select: Select<product::Entity>, sort: ProductSort, order: SortOrder) -> Select<product::Entity> {
    let direction = match order {
        SortOrder::Asc => Order::Asc,
        SortOrder::Desc => Order::Desc,
    };

    match sort {
        ProductSort::Reference => select.order_by(product::Column::Reference, direction),
        ProductSort::Name => select
            .order_by(product::Column::Name, direction)
            .order_by_asc(product::Column::Reference),
        ProductSort::SalePrice => select
            .order_by(product::Column::SalePrice, direction)
            .order_by_asc(product::Column::Reference),
        ProductSort::Stock => select
            .order_by(product::Column::CurrentStock, direction)
            .order_by_asc(product::Column::Reference),
        ProductSort::CreatedAt => select
            .order_by(product::Column::CreatedAt, direction.clone())
            .order_by(product::Column::Id, direction),
        ProductSort::Featured => select
            .order_by_desc(product::Column::Featured)
            .order_by_asc(product::Column::Reference),
    }
}

/// Attach family names and primary image file names to product rows.
async fn summarize<C: ConnectionTrait>(
    db: &C,
    rows: Vec<(product::Model, Option<family::Model>)>,
) -> AppResult<Vec<ProductSummary>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = rows.iter().map(|(p, _)| p.id).collect();
    let mut primary: HashMap<i32, String> = HashMap::new();
    let images = product_image::Entity::find()
        .filter(product_image::Column::ProductId.is_in(ids))
        .order_by_desc(product_image::Column::IsPrimary)
        .order_by_asc(product_image::Column::SortOrder)
        .order_by_asc(product_image::Column::Id)
        .all(db)
        .await?;
    for image in images {
        primary.entry(image.product_id).or_insert(image.filename);
    }

    Ok(rows
        .into_iter()
        .map(|(model, family)| {
            let primary_image = primary.remove(&model.id);
            ProductSummary {
                product: Product::from(model),
                family_name: family.map(|f| f.name),
                primary_image,
            }
        })
        .collect())
}

fn apply_input(active: &mut product::ActiveModel, input: ProductInput) {
    active.reference = Set(input.reference);
    active.family_id = Set(input.family_id);
    active.name = Set(input.name);
    active.description = Set(input.description);
    active.sale_price = Set(input.sale_price.cents());
    active.purchase_price = Set(input.purchase_price.cents());
    active.style = Set(input.style);
    active.material = Set(input.material);
    active.weight = Set(input.weight);
    active.dimensions = Set(input.dimensions);
    active.is_active = Set(input.is_active);
    active.featured = Set(input.featured);
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn search(
        &self,
        filter: ProductFilter,
        params: PaginationParams,
    ) -> AppResult<(Vec<ProductSummary>, u64)> {
        let select = apply_sort(
            apply_filter(product::Entity::find(), &filter),
            filter.sort,
            filter.order,
        );
        let paginator = select
            .find_also_related(family::Entity)
            .paginate(self.db.as_ref(), params.limit());
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(params.page_index()).await?;

        Ok((summarize(self.db.as_ref(), rows).await?, total))
    }

    async fn list(&self, filter: ProductFilter) -> AppResult<Vec<ProductSummary>> {
        let rows = apply_sort(
            apply_filter(product::Entity::find(), &filter),
            filter.sort,
            filter.order,
        )
        .find_also_related(family::Entity)
        .all(self.db.as_ref())
        .await?;

        summarize(self.db.as_ref(), rows).await
    }

    async fn recent(&self, limit: u64) -> AppResult<Vec<ProductSummary>> {
        let rows = product::Entity::find()
            .order_by_desc(product::Column::CreatedAt)
            .order_by_desc(product::Column::Id)
            .limit(limit)
            .find_also_related(family::Entity)
            .all(self.db.as_ref())
            .await?;

        summarize(self.db.as_ref(), rows).await
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Product>> {
        let result = product::Entity::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(result.map(Product::from))
    }

    async fn find_detail(&self, id: i32) -> AppResult<Option<ProductDetail>> {
        let Some((model, family)) = product::Entity::find_by_id(id)
            .find_also_related(family::Entity)
            .one(self.db.as_ref())
            .await?
        else {
            return Ok(None);
        };

        let images = product_image::Entity::find()
            .filter(product_image::Column::ProductId.eq(id))
            .order_by_desc(product_image::Column::IsPrimary)
            .order_by_asc(product_image::Column::SortOrder)
            .order_by_asc(product_image::Column::Id)
            .all(self.db.as_ref())
            .await?;

        Ok(Some(ProductDetail {
            product: Product::from(model),
            family: family.map(Into::into),
            images: images.into_iter().map(ProductImage::from).collect(),
        }))
    }

    async fn find_by_reference(&self, reference: &str) -> AppResult<Option<Product>> {
        let result = product::Entity::find()
            .filter(product::Column::Reference.eq(reference))
            .one(self.db.as_ref())
            .await?;
        Ok(result.map(Product::from))
    }

    async fn create(&self, new_product: NewProduct) -> AppResult<Product> {
        let NewProduct {
            input,
            created_by,
            images,
        } = new_product;
        let initial_stock = input.initial_stock.max(0);
        let purchase_price = input.purchase_price;
        let opening_total = purchase_price
            .checked_mul(i64::from(initial_stock))
            .ok_or_else(|| AppError::validation("Opening stock value is out of range"))?;
        let now = Utc::now();

        let txn = self.db.begin().await?;

        let mut active = product::ActiveModel {
            current_stock: Set(initial_stock),
            total_sold: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        apply_input(&mut active, input);
        let model = active.insert(&txn).await?;

        if initial_stock > 0 {
            inventory_transaction::ActiveModel {
                product_id: Set(model.id),
                transaction_type: Set(TransactionType::Purchase.as_str().to_string()),
                quantity: Set(initial_stock),
                unit_price: Set(purchase_price.cents()),
                total_amount: Set(opening_total.cents()),
                notes: Set(Some(INITIAL_STOCK_NOTE.to_string())),
                created_by: Set(created_by),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        for (position, filename) in images.into_iter().enumerate() {
            product_image::ActiveModel {
                product_id: Set(model.id),
                filename: Set(filename),
                is_primary: Set(position == 0),
                sort_order: Set(position as i32),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(Product::from(model))
    }

    async fn update(&self, id: i32, input: ProductInput) -> AppResult<Product> {
        let existing = product::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_not_found("Product")?;

        let mut active: product::ActiveModel = existing.into();
        apply_input(&mut active, input);
        active.updated_at = Set(Utc::now());

        let model = active.update(self.db.as_ref()).await?;
        Ok(Product::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<Vec<String>> {
        let txn = self.db.begin().await?;

        product::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_not_found("Product")?;

        let filenames: Vec<String> = product_image::Entity::find()
            .filter(product_image::Column::ProductId.eq(id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|image| image.filename)
            .collect();

        product_image::Entity::delete_many()
            .filter(product_image::Column::ProductId.eq(id))
            .exec(&txn)
            .await?;
        inventory_transaction::Entity::delete_many()
            .filter(inventory_transaction::Column::ProductId.eq(id))
            .exec(&txn)
            .await?;
        product::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(filenames)
    }

    async fn add_image(&self, image: NewProductImage) -> AppResult<ProductImage> {
        let txn = self.db.begin().await?;

        let existing = product_image::Entity::find()
            .filter(product_image::Column::ProductId.eq(image.product_id))
            .all(&txn)
            .await?;
        let next_order = existing.iter().map(|i| i.sort_order).max().map_or(0, |m| m + 1);
        let has_primary = existing.iter().any(|i| i.is_primary);

        let model = product_image::ActiveModel {
            product_id: Set(image.product_id),
            filename: Set(image.filename),
            is_primary: Set(!has_primary),
            sort_order: Set(next_order),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(ProductImage::from(model))
    }

    async fn remove_image(&self, product_id: i32, image_id: i32) -> AppResult<ProductImage> {
        let txn = self.db.begin().await?;

        let image = product_image::Entity::find_by_id(image_id)
            .filter(product_image::Column::ProductId.eq(product_id))
            .one(&txn)
            .await?
            .ok_or_not_found("Image")?;

        product_image::Entity::delete_by_id(image_id).exec(&txn).await?;

        if image.is_primary {
            let next = product_image::Entity::find()
                .filter(product_image::Column::ProductId.eq(product_id))
                .order_by_asc(product_image::Column::SortOrder)
                .order_by_asc(product_image::Column::Id)
                .one(&txn)
                .await?;
            if let Some(next) = next {
                let mut active: product_image::ActiveModel = next.into();
                active.is_primary = Set(true);
                active.update(&txn).await?;
            }
        }

        txn.commit().await?;
        Ok(ProductImage::from(image))
    }

    async fn set_primary_image(&self, product_id: i32, image_id: i32) -> AppResult<()> {
        let txn = self.db.begin().await?;

        product_image::Entity::find_by_id(image_id)
            .filter(product_image::Column::ProductId.eq(product_id))
            .one(&txn)
            .await?
            .ok_or_not_found("Image")?;

        product_image::Entity::update_many()
            .col_expr(
                product_image::Column::IsPrimary,
                Expr::col(product_image::Column::Id).eq(image_id),
            )
            .filter(product_image::Column::ProductId.eq(product_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(product::Entity::find().count(self.db.as_ref()).await?)
    }

    async fn count_in_stock_range(&self, min: i32, max: i32) -> AppResult<u64> {
        if max <= min {
            return Err(AppError::validation("Stock range is empty"));
        }
        Ok(product::Entity::find()
            .filter(product::Column::CurrentStock.gt(min))
            .filter(product::Column::CurrentStock.lt(max))
            .count(self.db.as_ref())
            .await?)
    }

    async fn count_out_of_stock(&self) -> AppResult<u64> {
        Ok(product::Entity::find()
            .filter(product::Column::CurrentStock.lte(0))
            .count(self.db.as_ref())
            .await?)
    }

    async fn stock_levels(&self) -> AppResult<Vec<(i32, Money)>> {
        let rows: Vec<(i32, i64)> = product::Entity::find()
            .select_only()
            .column(product::Column::CurrentStock)
            .column(product::Column::PurchasePrice)
            .into_tuple()
            .all(self.db.as_ref())
            .await?;

        Ok(rows
            .into_iter()
            .map(|(stock, price)| (stock, Money::from_cents(price)))
            .collect())
    }
}
