pub mod errors;
pub mod order;
pub mod ports;
pub mod product;
pub mod report;

/// The authenticated caller on whose behalf owner-scoped data is read and written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal(String);

impl Principal {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
