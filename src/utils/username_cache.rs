use moka::future::Cache;
use std::time::Duration;

const CACHE_CAPACITY: u64 = 10_000;
const CACHE_TTL: Duration = Duration::from_secs(86400); // 24h

/// true  => username is TAKEN
/// false => username is AVAILABLE (usually we store only taken)
pub struct UsernameCache {
    cache: Cache<String, bool>,
}

impl UsernameCache {
    pub fn new() -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(CACHE_TTL)
                .build(),
        }
    }

    /// Mark a single username as taken
    pub async fn mark_taken(&self, username: &str) {
        self.cache.insert(username.to_lowercase(), true).await;
    }

    /// Check if username is taken
    pub async fn is_taken(&self, username: &str) -> bool {
        self.cache.get(&username.to_lowercase()).await.unwrap_or(false)
    }

    /// Batch mark usernames as taken
    pub async fn mark_taken_batch<'a>(&self, usernames: impl IntoIterator<Item = &'a str>) {
        let futures: Vec<_> = usernames
            .into_iter()
            .map(|u| self.cache.insert(u.to_lowercase(), true))
            .collect();

        // Await all insertions concurrently
        futures::future::join_all(futures).await;
    }
}

impl Default for UsernameCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn marked_usernames_read_as_taken() {
        let cache = UsernameCache::new();
        assert!(!cache.is_taken("emp").await);

        cache.mark_taken("Emp").await;
        assert!(cache.is_taken("emp").await);
    }

    #[tokio::test]
    async fn batch_marking_covers_every_name() {
        let cache = UsernameCache::new();
        cache.mark_taken_batch(["admin", "user1", "1212"]).await;

        assert!(cache.is_taken("admin").await);
        assert!(cache.is_taken("USER1").await);
        assert!(cache.is_taken("1212").await);
    }
}
