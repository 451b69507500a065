//! Id suppliers for new job records.

use rand::Rng;

/// Hands out opaque identifiers for new records
pub trait IdSupplier {
    fn new_id(&mut self) -> String;
}

/// 128 random bits rendered as 32 lowercase hex digits
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdSupplier;

impl IdSupplier for RandomIdSupplier {
    fn new_id(&mut self) -> String {
        let bits: u128 = rand::thread_rng().gen();
        format!("{:032x}", bits)
    }
}

/// Predictable ids (`job-1`, `job-2`, ...) for tests and fixtures
#[derive(Debug, Clone)]
pub struct SequentialIdSupplier {
    prefix: String,
    next: u64,
}

impl SequentialIdSupplier {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialIdSupplier {
    fn default() -> Self {
        Self::new("job")
    }
}

impl IdSupplier for SequentialIdSupplier {
    fn new_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}
