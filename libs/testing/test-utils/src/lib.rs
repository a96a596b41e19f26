//! Shared test utilities for the catalog crates
//!
//! - `FakeGitHub`: in-process GitHub contents API on an ephemeral port
//! - `TestDataBuilder`: deterministic test data generation
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::{FakeGitHub, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_github_test() {
//!     let github = FakeGitHub::start().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     github.seed("products.json", "[]");
//!     let name = builder.name("product", "main");
//! }
//! ```

mod github;

pub use github::{FakeGitHub, RecordedRequest};

/// Builder for test data with deterministic randomization
///
/// This ensures tests are reproducible by using seeded data.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_product");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Generate a unique name for testing
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("my_test");
    /// let name = builder.name("product", "main");
    /// assert!(name.starts_with("test-product-"));
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// A deterministic non-negative price with two decimals
    pub fn price(&self) -> f64 {
        (self.seed % 100_000) as f64 / 100.0
    }

    /// A product category drawn from a small fixed set
    pub fn category(&self) -> &'static str {
        const CATEGORIES: [&str; 4] = ["Grains", "Pantry", "Dairy", "Produce"];
        CATEGORIES[(self.seed % CATEGORIES.len() as u64) as usize]
    }

    /// A small deterministic binary payload, e.g. for image uploads
    pub fn bytes(&self, len: usize) -> Vec<u8> {
        self.seed
            .to_le_bytes()
            .iter()
            .copied()
            .cycle()
            .take(len)
            .collect()
    }
}
