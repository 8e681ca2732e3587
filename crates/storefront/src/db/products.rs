//! Product catalog backed by `storefront.product`.

use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use orderly_checkout::{ProductRepository, RepositoryError};
use orderly_core::{CurrencyCode, Price, Product, ProductId};

/// Resolves basket ids against the product table.
#[derive(Debug, Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    description: Option<String>,
    price: Decimal,
    currency: String,
}

impl PgProductRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a single product by id.
    ///
    /// # Errors
    ///
    /// Same as [`ProductRepository::search`].
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.search(&[id]).await?.into_iter().next())
    }

    /// Every product in the catalog, in id order.
    ///
    /// # Errors
    ///
    /// Same as [`ProductRepository::search`].
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, description, price, currency
            FROM storefront.product
            ORDER BY id
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(query_error)?;

        into_products(rows)
    }
}

impl ProductRepository for PgProductRepository {
    async fn search(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        let ids: Vec<i64> = ids.iter().map(ProductId::as_i64).collect();

        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, description, price, currency
            FROM storefront.product
            WHERE id = ANY($1)
            ORDER BY id
            ",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(query_error)?;

        into_products(rows)
    }
}

/// Convert fetched rows, failing on the first corrupt one.
fn into_products(rows: Vec<ProductRow>) -> Result<Vec<Product>, RepositoryError> {
    rows.into_iter().map(Product::try_from).collect()
}

fn query_error(err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            RepositoryError::Unavailable(err.to_string())
        }
        other => RepositoryError::Backend(Box::new(other)),
    }
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let currency: CurrencyCode = row.currency.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("product {}: {e}", row.id))
        })?;

        let product = Self::new(
            row.id,
            row.name,
            Price::new(row.price, currency),
        );
        Ok(match row.description {
            Some(description) => product.with_description(description),
            None => product,
        })
    }
}
