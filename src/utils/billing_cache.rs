use anyhow::Result;
use futures_util::StreamExt;
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::time::Duration;

/// canteen id → billing type ("DAILY" / "MONTHLY").
///
/// The daily-entry flow consults the billing type on every submission to
/// decide whether payment fields are expected; the registry is tiny and
/// nearly immutable, so a long-lived cache absorbs those lookups.
pub static BILLING_CACHE: Lazy<Cache<u64, String>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(10_000)
        .time_to_live(Duration::from_secs(86400)) // 24h TTL
        .build()
});

/// Record a canteen's billing type (on create/update).
pub async fn store(canteen_id: u64, billing_type: &str) {
    BILLING_CACHE.insert(canteen_id, billing_type.to_string()).await;
}

/// Drop a canteen's cached billing type.
pub async fn invalidate(canteen_id: u64) {
    BILLING_CACHE.invalidate(&canteen_id).await;
}

/// Cached read-through lookup. Returns None for an unknown canteen.
pub async fn billing_type(pool: &MySqlPool, canteen_id: u64) -> Option<String> {
    if let Some(cached) = BILLING_CACHE.get(&canteen_id).await {
        return Some(cached);
    }

    let row = sqlx::query_scalar::<_, String>("SELECT billing_type FROM canteens WHERE id = ?")
        .bind(canteen_id)
        .fetch_optional(pool)
        .await
        .ok()??;

    store(canteen_id, &row).await;
    Some(row)
}

/// Load the whole registry into the cache at startup (batched).
pub async fn warmup_billing_cache(pool: &MySqlPool, batch_size: usize) -> Result<()> {
    let mut stream =
        sqlx::query_as::<_, (u64, String)>("SELECT id, billing_type FROM canteens").fetch(pool);

    let mut batch: Vec<(u64, String)> = Vec::with_capacity(batch_size);
    let mut total = 0usize;

    while let Some(row) = stream.next().await {
        let (id, billing_type) = row?;
        batch.push((id, billing_type));
        total += 1;

        if batch.len() >= batch_size {
            insert_batch(&batch).await;
            batch.clear();
        }
    }

    if !batch.is_empty() {
        insert_batch(&batch).await;
    }

    tracing::info!("Billing cache warmup complete: {} canteens", total);
    Ok(())
}

async fn insert_batch(entries: &[(u64, String)]) {
    let futures: Vec<_> = entries
        .iter()
        .map(|(id, billing_type)| BILLING_CACHE.insert(*id, billing_type.clone()))
        .collect();

    futures::future::join_all(futures).await;
}
