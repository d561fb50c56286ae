use core::fmt;
use serde::{Deserialize, Serialize};

/// JSON body returned by the account-creation endpoint.
///
/// Success replies carry `success`; error replies usually carry only
/// `message`. Both keys are optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAccountResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

/// An HTTP reply from the account-creation endpoint whose body parsed as JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountReply {
    pub status: u16,
    pub body: CreateAccountResponse,
}

impl AccountReply {
    pub fn new(status: u16, body: CreateAccountResponse) -> Self {
        Self { status, body }
    }

    pub fn is_success_status(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl fmt::Display for AccountReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AccountReply {{ status: {}, success: {:?}, message: {:?} }}",
            self.status, self.body.success, self.body.message
        )
    }
}
