//! Product service - catalog listings and admin product management.

use async_trait::async_trait;
use std::sync::Arc;
use validator::Validate;

use crate::domain::{
    NewProduct, NewProductImage, Product, ProductDetail, ProductFilter, ProductImage,
    ProductInput, ProductSummary,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{MediaStore, UnitOfWork};
use crate::types::{Paginated, PaginationParams};

/// An uploaded file as received from a multipart form.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub data: Vec<u8>,
}

#[async_trait]
pub trait ProductService: Send + Sync {
    async fn list(
        &self,
        filter: ProductFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<ProductSummary>>;

    /// Active featured products for the home page
    async fn featured(&self) -> AppResult<Vec<ProductSummary>>;

    /// Active products of one family, catalog order
    async fn by_family(&self, family_id: i32) -> AppResult<Vec<ProductSummary>>;

    async fn get(&self, id: i32) -> AppResult<ProductDetail>;

    /// Detail for the public catalog; inactive products are not found
    async fn get_public(&self, id: i32) -> AppResult<ProductDetail>;

    async fn create(
        &self,
        input: ProductInput,
        images: Vec<ImageUpload>,
        created_by: Option<String>,
    ) -> AppResult<Product>;

    async fn update(
        &self,
        id: i32,
        input: ProductInput,
        images: Vec<ImageUpload>,
    ) -> AppResult<Product>;

    async fn delete(&self, id: i32) -> AppResult<()>;

    async fn delete_image(&self, product_id: i32, image_id: i32) -> AppResult<()>;

    async fn set_primary_image(&self, product_id: i32, image_id: i32) -> AppResult<()>;
}

pub struct ProductManager<U: UnitOfWork> {
    uow: Arc<U>,
    media: MediaStore,
}

impl<U: UnitOfWork> ProductManager<U> {
    pub fn new(uow: Arc<U>, media: MediaStore) -> Self {
        Self { uow, media }
    }

    /// Validation shared by create and update. `current` is the product
    /// being edited, if any.
    async fn check_input(&self, input: &ProductInput, current: Option<i32>) -> AppResult<()> {
        input.validate()?;

        if self.uow.families().find_by_id(input.family_id).await?.is_none() {
            return Err(AppError::validation("Selected family does not exist"));
        }

        if let Some(existing) = self
            .uow
            .products()
            .find_by_reference(&input.reference)
            .await?
        {
            if Some(existing.id) != current {
                return Err(AppError::already_exists(format!(
                    "Product with reference '{}'",
                    input.reference
                )));
            }
        }
        Ok(())
    }

    /// Store uploads on disk and attach them. Files whose row could not be
    /// written are removed again.
    async fn attach_images(&self, product_id: i32, images: Vec<ImageUpload>) -> AppResult<()> {
        for image in &images {
            MediaStore::check_image(&image.file_name, image.data.len())?;
        }

        for image in images {
            let filename = self
                .media
                .save_product_image(&image.file_name, &image.data)
                .await?;

            let attached = self
                .uow
                .products()
                .add_image(NewProductImage {
                    product_id,
                    filename: filename.clone(),
                })
                .await;

            if let Err(e) = attached {
                self.media.remove_product_images(&[filename]).await;
                return Err(e);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<U: UnitOfWork> ProductService for ProductManager<U> {
    async fn list(
        &self,
        filter: ProductFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<ProductSummary>> {
        let (rows, total) = self.uow.products().search(filter, params).await?;
        Ok(Paginated::new(rows, params, total))
    }

    async fn featured(&self) -> AppResult<Vec<ProductSummary>> {
        let filter = ProductFilter {
            featured_only: true,
            ..ProductFilter::public()
        };
        self.uow.products().list(filter).await
    }

    async fn by_family(&self, family_id: i32) -> AppResult<Vec<ProductSummary>> {
        let filter = ProductFilter {
            family_id: Some(family_id),
            ..ProductFilter::public()
        };
        self.uow.products().list(filter).await
    }

    async fn get(&self, id: i32) -> AppResult<ProductDetail> {
        self.uow.products().find_detail(id).await?.ok_or_not_found("Product")
    }

    async fn get_public(&self, id: i32) -> AppResult<ProductDetail> {
        self.uow
            .products()
            .find_detail(id)
            .await?
            .filter(|detail| detail.product.is_public())
            .ok_or_not_found("Product")
    }

    async fn create(
        &self,
        input: ProductInput,
        images: Vec<ImageUpload>,
        created_by: Option<String>,
    ) -> AppResult<Product> {
        let input = input.normalized();
        self.check_input(&input, None).await?;
        for image in &images {
            MediaStore::check_image(&image.file_name, image.data.len())?;
        }

        // Files go first so the product row, its opening stock and its
        // images commit together or not at all.
        let mut saved = Vec::with_capacity(images.len());
        for image in &images {
            match self
                .media
                .save_product_image(&image.file_name, &image.data)
                .await
            {
                Ok(filename) => saved.push(filename),
                Err(e) => {
                    self.media.remove_product_images(&saved).await;
                    return Err(e);
                }
            }
        }

        let created = self
            .uow
            .products()
            .create(NewProduct {
                input,
                created_by,
                images: saved.clone(),
            })
            .await;

        let product = match created {
            Ok(product) => product,
            Err(e) => {
                self.media.remove_product_images(&saved).await;
                return Err(e);
            }
        };

        tracing::info!(
            product_id = product.id,
            reference = %product.reference,
            initial_stock = product.current_stock,
            images = saved.len(),
            "Product created"
        );
        Ok(product)
    }

    async fn update(
        &self,
        id: i32,
        input: ProductInput,
        images: Vec<ImageUpload>,
    ) -> AppResult<Product> {
        self.uow
            .products()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Product")?;

        let input = input.normalized();
        self.check_input(&input, Some(id)).await?;

        let product = self.uow.products().update(id, input).await?;
        self.attach_images(id, images).await?;

        tracing::info!(product_id = id, "Product updated");
        Ok(product)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let filenames = self.uow.products().delete(id).await?;
        self.media.remove_product_images(&filenames).await;

        tracing::info!(product_id = id, images = filenames.len(), "Product deleted");
        Ok(())
    }

    async fn delete_image(&self, product_id: i32, image_id: i32) -> AppResult<()> {
        let image: ProductImage = self
            .uow
            .products()
            .remove_image(product_id, image_id)
            .await?;
        self.media.remove_product_images(&[image.filename]).await;
        Ok(())
    }

    async fn set_primary_image(&self, product_id: i32, image_id: i32) -> AppResult<()> {
        self.uow
            .products()
            .set_primary_image(product_id, image_id)
            .await
    }
}
