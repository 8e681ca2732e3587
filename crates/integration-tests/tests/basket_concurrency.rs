//! Concurrent basket writes on one session.
//!
//! Each task builds its own `Basket` view over a clone of the same session,
//! the way concurrent requests carrying one session cookie would.

use orderly_checkout::{Basket, BasketLocks, MemorySessionStore};
use orderly_core::ProductId;
use orderly_integration_tests::catalog_with;

const WRITERS: i64 = 64;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_locked_concurrent_adds_lose_nothing() {
    let session = MemorySessionStore::new("shared");
    let locks = BasketLocks::new();

    let tasks: Vec<_> = (0..WRITERS)
        .map(|id| {
            let basket = Basket::new(session.clone(), catalog_with(&[]))
                .with_locks(locks.clone());
            tokio::spawn(async move { basket.add_product(ProductId::new(id)).await })
        })
        .collect();

    for task in tasks {
        task.await.expect("task").expect("add");
    }

    let mut ids = Basket::new(session, catalog_with(&[]))
        .product_ids()
        .await
        .expect("read");
    assert_eq!(ids.len(), usize::try_from(WRITERS).expect("small"));
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), usize::try_from(WRITERS).expect("small"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_locked_concurrent_duplicate_adds_keep_one_entry() {
    let session = MemorySessionStore::new("dupes");
    let locks = BasketLocks::new();

    let tasks: Vec<_> = (0..WRITERS)
        .map(|_| {
            let basket = Basket::new(session.clone(), catalog_with(&[]))
                .with_locks(locks.clone());
            tokio::spawn(async move { basket.add_product(ProductId::new(7)).await })
        })
        .collect();

    for task in tasks {
        task.await.expect("task").expect("add");
    }

    let ids = Basket::new(session, catalog_with(&[]))
        .product_ids()
        .await
        .expect("read");
    assert_eq!(ids, vec![ProductId::new(7)]);
}
