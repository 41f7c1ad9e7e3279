//! Service configuration.

/// Configuration for the affiliation service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Page size used when a caller asks for zero items (default: 20).
    pub default_page_size: u64,
    /// Upper bound on a single page (default: 100).
    pub max_page_size: u64,
}

impl ServiceConfig {
    /// Resolve a requested page size against the configured bounds.
    pub fn page_size(&self, requested: u64) -> u64 {
        match requested {
            0 => self.default_page_size,
            n => n.min(self.max_page_size),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}
