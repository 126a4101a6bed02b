//! Query helpers shared by the stores.

use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait, Select};

use crate::errors::AppResult;
use crate::types::PaginationParams;

/// Run a paginated select, returning the requested page and the total row count.
pub(crate) async fn fetch_page<C, E>(
    db: &C,
    select: Select<E>,
    params: PaginationParams,
) -> AppResult<(Vec<E::Model>, u64)>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: Send + Sync,
{
    let paginator = select.paginate(db, params.limit());
    let total = paginator.num_items().await?;
    let rows = paginator.fetch_page(params.page_index()).await?;
    Ok((rows, total))
}

/// `%term%` for MySQL `LIKE`, with the term's own wildcards escaped.
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern() {
        assert_eq!(like_pattern("ring"), "%ring%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
    }
}
