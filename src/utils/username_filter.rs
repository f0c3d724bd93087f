use autoscale_cuckoo_filter::CuckooFilter;

/// Expected capacity and false-positive rate.
/// Tune these based on real user counts.
const FILTER_CAPACITY: usize = 10_000;
const FALSE_POSITIVE_RATE: f64 = 0.001;

#[inline]
fn normalize(username: &str) -> String {
    username.to_lowercase()
}

/// Fast-negative membership over registered usernames. A miss here means
/// the name is definitely free; a hit still needs confirmation upstream.
pub struct UsernameFilter {
    filter: CuckooFilter<String>,
}

impl UsernameFilter {
    pub fn new() -> Self {
        Self {
            filter: CuckooFilter::new(FILTER_CAPACITY, FALSE_POSITIVE_RATE),
        }
    }

    /// Check if a username might exist (false positives possible)
    pub fn might_exist(&self, username: &str) -> bool {
        self.filter.contains(&normalize(username))
    }

    /// Insert a single username into the filter
    pub fn insert(&mut self, username: &str) {
        self.filter.add(&normalize(username));
    }

    /// Remove a username from the filter
    pub fn remove(&mut self, username: &str) {
        self.filter.remove(&normalize(username));
    }

    /// Insert a batch of usernames
    pub fn insert_batch<'a>(&mut self, usernames: impl IntoIterator<Item = &'a str>) {
        for username in usernames {
            self.filter.add(&normalize(username));
        }
    }
}

impl Default for UsernameFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_means_definitely_free() {
        let filter = UsernameFilter::new();
        assert!(!filter.might_exist("nobody"));
    }

    #[test]
    fn insert_is_case_insensitive() {
        let mut filter = UsernameFilter::new();
        filter.insert("Admin");
        assert!(filter.might_exist("admin"));
        assert!(filter.might_exist("ADMIN"));
    }

    #[test]
    fn remove_clears_membership() {
        let mut filter = UsernameFilter::new();
        filter.insert("user1");
        filter.remove("user1");
        assert!(!filter.might_exist("user1"));
    }
}
