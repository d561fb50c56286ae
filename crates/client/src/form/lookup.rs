use shared::{
    abstract_trait::DynPostalLookup,
    domain::{request::RegisterRequest, response::PostalAddress},
    schema::rules::{ZIP_CODE_LEN, is_digits},
    utils::AppError,
};
use tracing::{debug, info, warn};

pub const LOOKUP_NOT_FOUND: &str = "Zip code not found.";
pub const LOOKUP_FAILED: &str = "Failed to look up address.";

/// Advisory error shown next to the zip code input. Never blocks submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupError {
    NotFound,
    Failed,
}

impl LookupError {
    pub fn message(&self) -> &'static str {
        match self {
            LookupError::NotFound => LOOKUP_NOT_FOUND,
            LookupError::Failed => LOOKUP_FAILED,
        }
    }
}

/// A lookup request, tagged with the zip code that triggered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    zip_code: String,
}

impl LookupTicket {
    pub fn zip_code(&self) -> &str {
        &self.zip_code
    }
}

#[derive(Debug)]
pub struct LookupResolution {
    pub ticket: LookupTicket,
    pub result: Result<Option<PostalAddress>, AppError>,
}

/// Runs the lookup for a ticket. Never fails: the outcome travels in the
/// resolution and is interpreted by [`PostalLookupAdapter::apply`].
pub async fn fetch_address(lookup: DynPostalLookup, ticket: LookupTicket) -> LookupResolution {
    let result = lookup.lookup(ticket.zip_code()).await;
    LookupResolution { ticket, result }
}

/// Zip-code driven address enrichment.
///
/// Owns the advisory error and the zip code of the lookup in flight. The
/// record itself belongs to the form and is passed in when a resolution is
/// applied.
#[derive(Debug, Default)]
pub struct PostalLookupAdapter {
    error: Option<LookupError>,
    pending: Option<String>,
}

impl PostalLookupAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> Option<LookupError> {
        self.error
    }

    /// True while a lookup for the current zip code has not resolved.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Called after every edit of the zip code. Returns a ticket when the new
    /// value has exactly eight characters; the previous lookup error is
    /// cleared first. Values of that length with non-digits issue no request.
    pub fn on_zip_code_changed(&mut self, zip_code: &str) -> Option<LookupTicket> {
        self.pending = None;

        if zip_code.chars().count() != ZIP_CODE_LEN {
            return None;
        }

        self.error = None;

        if !is_digits(zip_code) {
            debug!("Skipping lookup for non-numeric zip code");
            return None;
        }

        self.pending = Some(zip_code.to_string());

        Some(LookupTicket {
            zip_code: zip_code.to_string(),
        })
    }

    /// Applies a resolution to the record if its tag still matches the
    /// current zip code. Returns `false` for stale resolutions, which are
    /// dropped without touching the record or the error.
    pub fn apply(&mut self, record: &mut RegisterRequest, resolution: LookupResolution) -> bool {
        let LookupResolution { ticket, result } = resolution;

        if record.address.zip_code != ticket.zip_code {
            debug!(
                "Discarding stale lookup for {} (current zip code differs)",
                ticket.zip_code
            );
            return false;
        }

        self.pending = None;

        match result {
            Ok(Some(address)) => {
                info!("Address filled from zip code {}", ticket.zip_code);
                record.address.street = address.street;
                record.address.neighborhood = address.neighborhood;
                record.address.city = address.city;
                record.address.state = address.state;
                self.error = None;
            }
            Ok(None) => {
                warn!("Zip code {} not found", ticket.zip_code);
                self.error = Some(LookupError::NotFound);
            }
            Err(err) => {
                warn!("Zip code lookup for {} failed: {err}", ticket.zip_code);
                self.error = Some(LookupError::Failed);
            }
        }

        true
    }

    pub fn reset(&mut self) {
        self.error = None;
        self.pending = None;
    }
}
