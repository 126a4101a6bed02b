//! Import service - products from a CSV export.
//!
//! New references are created with their stock booked as an opening
//! purchase. Existing references get their fields updated, and a stock
//! column that differs from the current level becomes a ledger adjustment.
//! A bad row is reported and skipped; a database failure stops the import.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use validator::Validate;

use crate::domain::import::{IMPORT_STOCK_NOTE, REQUIRED_IMPORT_COLUMNS};
use crate::domain::{
    ImportReport, ImportRow, MovementOutcome, NewProduct, StockMovement, TransactionType,
};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait ImportService: Send + Sync {
    async fn import_products(
        &self,
        data: &[u8],
        created_by: Option<String>,
    ) -> AppResult<ImportReport>;
}

/// What happened to one row.
enum RowOutcome {
    Created,
    Updated { stock_adjusted: bool },
}

/// Errors that only concern the row at hand.
fn is_row_error(error: &AppError) -> bool {
    matches!(
        error,
        AppError::Validation(_)
            | AppError::BadRequest(_)
            | AppError::AlreadyExists(_)
            | AppError::Conflict(_)
            | AppError::NotFound(_)
    )
}

/// Parse CSV text into rows tagged with their line number. Unreadable rows
/// go straight into the report.
pub fn read_import_rows(
    data: &[u8],
    report: &mut ImportReport,
) -> AppResult<Vec<(u64, ImportRow)>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers = reader
        .headers()
        .map_err(|e| AppError::validation(format!("Unreadable header row: {}", e)))?
        .clone();
    let missing: Vec<&str> = REQUIRED_IMPORT_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::validation(format!(
            "Missing column(s): {}",
            missing.join(", ")
        )));
    }
    let reference_column = headers.iter().position(|h| h == "reference");

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map_or(0, |p| p.line());
                report.skip(line, "", format!("Unreadable row: {}", e));
                continue;
            }
        };
        let line = record.position().map_or(0, |p| p.line());
        match record.deserialize::<ImportRow>(Some(&headers)) {
            Ok(row) => rows.push((line, row)),
            Err(e) => {
                let reference = reference_column
                    .and_then(|i| record.get(i))
                    .unwrap_or_default();
                report.skip(line, reference, format!("Unreadable row: {}", e));
            }
        }
    }
    Ok(rows)
}

pub struct ImportManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ImportManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn import_row(
        &self,
        row: &ImportRow,
        families: &HashMap<String, i32>,
        created_by: &Option<String>,
    ) -> AppResult<RowOutcome> {
        let code = row.family_code();
        let family_id = *families
            .get(&code)
            .ok_or_else(|| AppError::validation(format!("Unknown family '{}'", code)))?;

        let input = row.to_input(family_id)?;
        input.validate()?;
        let stock = row.stock()?;

        let products = self.uow.products();
        let Some(existing) = products.find_by_reference(&input.reference).await? else {
            products
                .create(NewProduct {
                    input,
                    created_by: created_by.clone(),
                    images: Vec::new(),
                })
                .await?;
            return Ok(RowOutcome::Created);
        };

        let unit_price = input.purchase_price;
        products.update(existing.id, input).await?;

        let stock_adjusted = match stock {
            Some(target) if target != existing.current_stock => {
                let outcome = self
                    .uow
                    .inventory()
                    .apply_movement(StockMovement {
                        product_id: existing.id,
                        transaction_type: TransactionType::Adjustment,
                        quantity: target,
                        unit_price,
                        notes: Some(IMPORT_STOCK_NOTE.to_string()),
                        created_by: created_by.clone(),
                    })
                    .await?;
                matches!(outcome, MovementOutcome::Recorded(_))
            }
            _ => false,
        };

        Ok(RowOutcome::Updated { stock_adjusted })
    }
}

#[async_trait]
impl<U: UnitOfWork> ImportService for ImportManager<U> {
    async fn import_products(
        &self,
        data: &[u8],
        created_by: Option<String>,
    ) -> AppResult<ImportReport> {
        let mut report = ImportReport::default();
        let rows = read_import_rows(data, &mut report)?;

        let families: HashMap<String, i32> = self
            .uow
            .families()
            .list()
            .await?
            .into_iter()
            .map(|f| (f.code.to_uppercase(), f.id))
            .collect();

        for (line, row) in &rows {
            match self.import_row(row, &families, &created_by).await {
                Ok(RowOutcome::Created) => report.created += 1,
                Ok(RowOutcome::Updated { stock_adjusted }) => {
                    report.updated += 1;
                    if stock_adjusted {
                        report.stock_adjusted += 1;
                    }
                }
                Err(e) if is_row_error(&e) => {
                    tracing::debug!(line, reference = %row.reference, error = %e, "Import row skipped");
                    report.skip(*line, &row.reference, e.to_string());
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            rows = rows.len(),
            created = report.created,
            updated = report.updated,
            stock_adjusted = report.stock_adjusted,
            skipped = report.skipped.len(),
            "Product import finished"
        );
        Ok(report)
    }
}
