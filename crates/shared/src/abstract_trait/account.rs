use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    domain::{request::RegisterRequest, response::AccountReply},
    utils::AppError,
};

pub type DynAccountService = Arc<dyn AccountServiceTrait + Send + Sync>;

#[async_trait]
pub trait AccountServiceTrait {
    /// Posts the record once. Any reply with a JSON body is `Ok`, whatever
    /// its status; transport failures and non-JSON bodies are `Err`.
    async fn create_account(&self, input: &RegisterRequest) -> Result<AccountReply, AppError>;
}
