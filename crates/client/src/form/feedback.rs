use shared::{domain::request::RegisterRequest, schema::FieldErrors};
use std::sync::Arc;

use super::controller::SubmissionState;

/// A blocking modal. At most one is open at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Surface {
    Error(String),
    Success(String),
}

impl Surface {
    pub fn message(&self) -> &str {
        match self {
            Surface::Error(message) | Surface::Success(message) => message,
        }
    }
}

/// Everything the presentation layer needs to draw the form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormView {
    pub record: RegisterRequest,
    pub field_errors: FieldErrors,
    pub lookup_error: Option<String>,
    pub lookup_pending: bool,
    pub surface: Option<Surface>,
    pub state: SubmissionState,
}

impl FormView {
    pub fn inline_error(&self, path: &str) -> Option<&str> {
        self.field_errors.first(path)
    }
}

/// Draws a [`FormView`]. Closing a surface is reported back to the form as
/// a dismiss event.
pub trait PresenterTrait {
    fn render(&self, view: &FormView);
}

pub type DynPresenter = Arc<dyn PresenterTrait + Send + Sync>;

/// Inline field errors and the single blocking surface slot.
#[derive(Debug, Default)]
pub struct FeedbackChannel {
    field_errors: FieldErrors,
    surface: Option<Surface>,
}

impl FeedbackChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn is_blocked(&self) -> bool {
        self.surface.is_some()
    }

    /// Inline errors replace any open surface: a client-side rejection never
    /// shows a modal.
    pub fn show_field_errors(&mut self, errors: FieldErrors) {
        self.field_errors = errors;
        self.surface = None;
    }

    pub fn clear_field_errors(&mut self) {
        self.field_errors = FieldErrors::new();
    }

    pub fn open_error(&mut self, message: impl Into<String>) {
        self.surface = Some(Surface::Error(message.into()));
    }

    pub fn open_success(&mut self, message: impl Into<String>) {
        self.surface = Some(Surface::Success(message.into()));
    }

    /// Maps a settled controller state onto the surface slot.
    pub fn show_state(&mut self, state: &SubmissionState, success_message: &str) {
        match state {
            SubmissionState::Succeeded => self.open_success(success_message),
            SubmissionState::ServerError(message) | SubmissionState::NetworkError(message) => {
                self.open_error(message.clone())
            }
            _ => {}
        }
    }

    pub fn dismiss(&mut self) -> Option<Surface> {
        self.surface.take()
    }

    pub fn reset(&mut self) {
        self.field_errors = FieldErrors::new();
        self.surface = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_one_surface_supersedes_the_other() {
        let mut feedback = FeedbackChannel::new();

        feedback.open_error("boom");
        feedback.open_success("done");

        assert_eq!(feedback.surface(), Some(&Surface::Success("done".into())));

        feedback.open_error("boom again");
        assert_eq!(feedback.surface(), Some(&Surface::Error("boom again".into())));
    }

    #[test]
    fn field_errors_close_the_surface() {
        let mut feedback = FeedbackChannel::new();
        feedback.open_error("boom");

        let mut errors = FieldErrors::new();
        errors.add("email", "Enter a valid email address");
        feedback.show_field_errors(errors);

        assert!(feedback.surface().is_none());
        assert_eq!(
            feedback.field_errors().first("email"),
            Some("Enter a valid email address")
        );
    }

    #[test]
    fn settled_states_map_to_surfaces() {
        let mut feedback = FeedbackChannel::new();

        feedback.show_state(&SubmissionState::ServerError("X".into()), "ok");
        assert_eq!(feedback.surface(), Some(&Surface::Error("X".into())));

        feedback.show_state(&SubmissionState::Succeeded, "ok");
        assert_eq!(feedback.surface(), Some(&Surface::Success("ok".into())));

        feedback.show_state(&SubmissionState::Idle, "ok");
        assert_eq!(feedback.surface().map(Surface::message), Some("ok"));
    }

    #[test]
    fn dismiss_closes_and_returns_surface() {
        let mut feedback = FeedbackChannel::new();
        feedback.open_error("boom");

        assert_eq!(feedback.dismiss(), Some(Surface::Error("boom".into())));
        assert!(!feedback.is_blocked());
        assert_eq!(feedback.dismiss(), None);
    }
}
