//! Product lookup.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use thiserror::Error;

use orderly_core::{Product, ProductId};

/// Errors that can occur during a catalog lookup.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The catalog could not be reached.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),

    /// A stored record could not be turned into a `Product`.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Backend-specific failure.
    #[error("catalog backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Batch product lookup.
///
/// Unknown ids are silently omitted from the result. Ordering is whatever
/// the implementation returns.
pub trait ProductRepository: Send + Sync {
    /// Fetch the products for `ids`.
    fn search(
        &self,
        ids: &[ProductId],
    ) -> impl Future<Output = Result<Vec<Product>, RepositoryError>> + Send;
}

impl<T: ProductRepository> ProductRepository for Arc<T> {
    fn search(
        &self,
        ids: &[ProductId],
    ) -> impl Future<Output = Result<Vec<Product>, RepositoryError>> + Send {
        (**self).search(ids)
    }
}

/// A fixed, in-memory catalog.
///
/// Results come back in request order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: Arc<HashMap<ProductId, Product>>,
}

impl InMemoryCatalog {
    /// Build a catalog from a list of products.
    #[must_use]
    pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            products: Arc::new(products.into_iter().map(|p| (p.id, p)).collect()),
        }
    }

    /// Number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl ProductRepository for InMemoryCatalog {
    async fn search(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.products.get(id).cloned())
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use orderly_core::{CurrencyCode, Price};

    use super::*;

    fn product(id: i64) -> Product {
        Product::new(
            ProductId::new(id),
            format!("Product {id}"),
            Price::from_cents(100 * id, CurrencyCode::USD),
        )
    }

    #[tokio::test]
    async fn test_unknown_ids_are_omitted() {
        let catalog = InMemoryCatalog::new([product(1), product(3)]);
        let ids = [1, 2, 3].map(ProductId::new);

        let found = catalog.search(&ids).await.unwrap();
        let found_ids: Vec<_> = found.iter().map(|p| p.id.as_i64()).collect();
        assert_eq!(found_ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_arc_repository_delegates() {
        let catalog = Arc::new(InMemoryCatalog::new([product(4)]));
        let found = catalog.search(&[ProductId::new(4)]).await.unwrap();
        assert_eq!(found.len(), 1);
    }
}
