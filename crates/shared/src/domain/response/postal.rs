use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw body of a ViaCEP-style postal code lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostalCodeResponse {
    #[serde(default)]
    pub cep: Option<String>,
    #[serde(default)]
    pub logradouro: Option<String>,
    #[serde(default)]
    pub bairro: Option<String>,
    #[serde(default)]
    pub localidade: Option<String>,
    #[serde(default)]
    pub uf: Option<String>,
    #[serde(default)]
    pub erro: Option<Value>,
}

impl PostalCodeResponse {
    /// The service flags unknown codes with `"erro": true` (older API)
    /// or `"erro": "true"` (newer API).
    pub fn is_not_found(&self) -> bool {
        match &self.erro {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(flag)) => flag.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }
}

/// The four address fields a successful lookup fills in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalAddress {
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
}

// dari response lookup ke alamat
impl From<PostalCodeResponse> for PostalAddress {
    fn from(value: PostalCodeResponse) -> Self {
        PostalAddress {
            street: value.logradouro.unwrap_or_default(),
            neighborhood: value.bairro.unwrap_or_default(),
            city: value.localidade.unwrap_or_default(),
            state: value.uf.unwrap_or_default(),
        }
    }
}
