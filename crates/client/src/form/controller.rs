use shared::{
    abstract_trait::DynAccountService,
    domain::{request::RegisterRequest, response::AccountReply},
    schema::{FieldErrors, RegistrationSchema},
    utils::AppError,
};
use std::fmt;
use thiserror::Error;
use tracing::{debug, error, info, warn};

pub const ACCOUNT_CREATED: &str = "Account created successfully!";
pub const SERVER_ERROR_FALLBACK: &str = "Failed to create account. Please try again later.";
pub const NETWORK_ERROR: &str = "Could not create the account. Please try again later.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Validating,
    Submitting,
    Succeeded,
    ServerError(String),
    NetworkError(String),
}

impl SubmissionState {
    pub fn is_pending(&self) -> bool {
        matches!(self, SubmissionState::Validating | SubmissionState::Submitting)
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            SubmissionState::ServerError(_) | SubmissionState::NetworkError(_)
        )
    }

    /// Message for the blocking error surface, if this state opens one.
    pub fn failure_message(&self) -> Option<&str> {
        match self {
            SubmissionState::ServerError(message) | SubmissionState::NetworkError(message) => {
                Some(message)
            }
            _ => None,
        }
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionState::Idle => write!(f, "idle"),
            SubmissionState::Validating => write!(f, "validating"),
            SubmissionState::Submitting => write!(f, "submitting"),
            SubmissionState::Succeeded => write!(f, "succeeded"),
            SubmissionState::ServerError(_) => write!(f, "serverError"),
            SubmissionState::NetworkError(_) => write!(f, "networkError"),
        }
    }
}

/// Why a submit attempt did not reach the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("record failed validation on {} field(s)", .0.len())]
    Invalid(FieldErrors),

    #[error("a submission is already in flight")]
    AlreadySubmitting,

    #[error("the account was already created")]
    AlreadySucceeded,

    #[error("a blocking surface must be dismissed first")]
    SurfaceOpen,
}

/// One accepted submit attempt. Carries a snapshot of the record so edits
/// made while the request is in flight do not leak into it.
#[derive(Debug, Clone)]
pub struct SubmissionTicket {
    attempt: u64,
    payload: RegisterRequest,
}

impl SubmissionTicket {
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    pub fn payload(&self) -> &RegisterRequest {
        &self.payload
    }
}

#[derive(Debug)]
pub struct SubmissionResolution {
    pub attempt: u64,
    pub result: Result<AccountReply, AppError>,
}

/// Sends the ticket's payload exactly once. Never fails: transport errors
/// travel in the resolution.
pub async fn send_submission(
    accounts: DynAccountService,
    ticket: SubmissionTicket,
) -> SubmissionResolution {
    let result = accounts.create_account(&ticket.payload).await;
    SubmissionResolution {
        attempt: ticket.attempt,
        result,
    }
}

/// Maps a backend reply (or its failure) to the state it settles into.
///
/// A 2xx reply without a success flag is treated as a server error.
pub fn interpret(result: Result<AccountReply, AppError>) -> SubmissionState {
    match result {
        Err(err) => {
            error!("Account creation request failed: {err}");
            SubmissionState::NetworkError(NETWORK_ERROR.to_string())
        }
        Ok(reply) if !reply.is_success_status() => {
            warn!("Account creation rejected with status {}", reply.status);
            SubmissionState::ServerError(
                reply
                    .body
                    .message
                    .unwrap_or_else(|| SERVER_ERROR_FALLBACK.to_string()),
            )
        }
        Ok(reply) if reply.body.success == Some(true) => SubmissionState::Succeeded,
        Ok(reply) => {
            warn!(
                "Account creation answered {} without success: {:?}",
                reply.status, reply.body.message
            );
            SubmissionState::ServerError(
                reply
                    .body
                    .message
                    .unwrap_or_else(|| SERVER_ERROR_FALLBACK.to_string()),
            )
        }
    }
}

/// `idle → validating → submitting → {succeeded, serverError, networkError}`.
#[derive(Debug, Default)]
pub struct SubmissionController {
    state: SubmissionState,
    attempts: u64,
}

impl SubmissionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Validates the record and, when it passes, hands out the ticket for the
    /// single network request of this attempt.
    pub fn begin(
        &mut self,
        record: &RegisterRequest,
        schema: &RegistrationSchema,
    ) -> Result<SubmissionTicket, SubmitRejected> {
        match self.state {
            SubmissionState::Validating | SubmissionState::Submitting => {
                debug!("Ignoring submit: request already pending");
                return Err(SubmitRejected::AlreadySubmitting);
            }
            SubmissionState::Succeeded => return Err(SubmitRejected::AlreadySucceeded),
            _ => {}
        }

        self.state = SubmissionState::Validating;

        let errors = schema.validate(record);
        if !errors.is_empty() {
            info!("Submit blocked by {} invalid field(s)", errors.len());
            self.state = SubmissionState::Idle;
            return Err(SubmitRejected::Invalid(errors));
        }

        self.attempts += 1;
        self.state = SubmissionState::Submitting;
        info!("Submitting registration, attempt {}", self.attempts);

        Ok(SubmissionTicket {
            attempt: self.attempts,
            payload: record.clone(),
        })
    }

    /// Settles the pending attempt. Resolutions for any other attempt, or
    /// arriving when nothing is pending, are ignored and return `None`.
    pub fn settle(&mut self, resolution: SubmissionResolution) -> Option<&SubmissionState> {
        if self.state != SubmissionState::Submitting || resolution.attempt != self.attempts {
            debug!(
                "Ignoring resolution for attempt {} in state {}",
                resolution.attempt, self.state
            );
            return None;
        }

        self.state = interpret(resolution.result);
        info!("Submission settled as {}", self.state);

        Some(&self.state)
    }

    /// Returns a failed controller to `idle` so the user can retry.
    pub fn acknowledge_failure(&mut self) {
        if self.state.is_failure() {
            self.state = SubmissionState::Idle;
        }
    }

    pub fn reset(&mut self) {
        self.state = SubmissionState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::response::CreateAccountResponse;

    fn reply(status: u16, success: Option<bool>, message: Option<&str>) -> AccountReply {
        AccountReply::new(
            status,
            CreateAccountResponse {
                success,
                message: message.map(str::to_string),
            },
        )
    }

    #[test]
    fn success_flag_on_2xx_succeeds() {
        assert_eq!(
            interpret(Ok(reply(201, Some(true), None))),
            SubmissionState::Succeeded
        );
    }

    #[test]
    fn error_status_uses_body_message() {
        assert_eq!(
            interpret(Ok(reply(400, None, Some("X")))),
            SubmissionState::ServerError("X".into())
        );
    }

    #[test]
    fn error_status_without_message_falls_back() {
        assert_eq!(
            interpret(Ok(reply(500, None, None))),
            SubmissionState::ServerError(SERVER_ERROR_FALLBACK.into())
        );
    }

    #[test]
    fn error_status_ignores_success_flag() {
        assert_eq!(
            interpret(Ok(reply(409, Some(true), Some("Email already exists")))),
            SubmissionState::ServerError("Email already exists".into())
        );
    }

    #[test]
    fn business_failure_on_2xx_is_server_error() {
        assert_eq!(
            interpret(Ok(reply(200, Some(false), Some("CPF already registered")))),
            SubmissionState::ServerError("CPF already registered".into())
        );
    }

    #[test]
    fn missing_success_flag_is_server_error() {
        assert_eq!(
            interpret(Ok(reply(200, None, None))),
            SubmissionState::ServerError(SERVER_ERROR_FALLBACK.into())
        );
    }

    #[test]
    fn transport_failure_is_network_error() {
        assert_eq!(
            interpret(Err(AppError::Custom("connection refused".into()))),
            SubmissionState::NetworkError(NETWORK_ERROR.into())
        );
    }

    #[test]
    fn invalid_record_never_leaves_idle() {
        let mut controller = SubmissionController::new();
        let schema = RegistrationSchema::default();

        let rejected = controller
            .begin(&RegisterRequest::default(), &schema)
            .unwrap_err();

        assert!(matches!(rejected, SubmitRejected::Invalid(ref e) if !e.is_empty()));
        assert_eq!(controller.state(), &SubmissionState::Idle);
    }

    #[test]
    fn stale_or_unexpected_resolution_is_ignored() {
        let mut controller = SubmissionController::new();

        let settled = controller.settle(SubmissionResolution {
            attempt: 1,
            result: Ok(reply(200, Some(true), None)),
        });

        assert!(settled.is_none());
        assert_eq!(controller.state(), &SubmissionState::Idle);
    }

    #[test]
    fn failure_can_be_acknowledged_back_to_idle() {
        let mut controller = SubmissionController {
            state: SubmissionState::NetworkError(NETWORK_ERROR.into()),
            attempts: 1,
        };

        controller.acknowledge_failure();

        assert_eq!(controller.state(), &SubmissionState::Idle);
    }
}
