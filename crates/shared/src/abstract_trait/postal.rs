use async_trait::async_trait;
use std::sync::Arc;

use crate::{domain::response::PostalAddress, utils::AppError};

pub type DynPostalLookup = Arc<dyn PostalLookupTrait + Send + Sync>;

#[async_trait]
pub trait PostalLookupTrait {
    /// Resolves an 8-digit zip code. `Ok(None)` means the service does not
    /// know the code.
    async fn lookup(&self, zip_code: &str) -> Result<Option<PostalAddress>, AppError>;
}
