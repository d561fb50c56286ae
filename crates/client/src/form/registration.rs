use shared::{
    config::Config,
    domain::request::{RegisterField, RegisterRequest},
    schema::RegistrationSchema,
};
use std::time::Duration;
use tracing::{debug, info};

use super::{
    controller::{
        ACCOUNT_CREATED, SubmissionController, SubmissionResolution, SubmissionState,
        SubmissionTicket, SubmitRejected,
    },
    feedback::{FeedbackChannel, FormView},
    lookup::{LookupError, LookupResolution, LookupTicket, PostalLookupAdapter},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSettings {
    pub home_route: String,
    pub redirect_delay: Duration,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            home_route: "/".to_string(),
            redirect_delay: Duration::from_secs(2),
        }
    }
}

impl From<&Config> for FormSettings {
    fn from(config: &Config) -> Self {
        Self {
            home_route: config.home_route.clone(),
            redirect_delay: config.redirect_delay,
        }
    }
}

/// Side effects requested by the form. The form never performs I/O itself;
/// whoever drives it runs these and reports the outcome back.
#[derive(Debug)]
pub enum Effect {
    Lookup(LookupTicket),
    Submit(SubmissionTicket),
    ScheduleRedirect { route: String, after: Duration },
    Navigate(String),
}

/// The registration form: the record being built plus its lookup,
/// submission and feedback state. One instance per mounted form.
#[derive(Debug)]
pub struct RegistrationForm {
    record: RegisterRequest,
    schema: RegistrationSchema,
    lookup: PostalLookupAdapter,
    controller: SubmissionController,
    feedback: FeedbackChannel,
    settings: FormSettings,
}

impl RegistrationForm {
    pub fn new(schema: RegistrationSchema, settings: FormSettings) -> Self {
        Self {
            record: RegisterRequest::default(),
            schema,
            lookup: PostalLookupAdapter::new(),
            controller: SubmissionController::new(),
            feedback: FeedbackChannel::new(),
            settings,
        }
    }

    pub fn record(&self) -> &RegisterRequest {
        &self.record
    }

    pub fn state(&self) -> &SubmissionState {
        self.controller.state()
    }

    pub fn lookup_error(&self) -> Option<LookupError> {
        self.lookup.error()
    }

    pub fn feedback(&self) -> &FeedbackChannel {
        &self.feedback
    }

    pub fn settings(&self) -> &FormSettings {
        &self.settings
    }

    /// Applies one input edit. Editing the zip code may request a lookup.
    /// Edits are ignored while a blocking surface is open.
    pub fn set_field(&mut self, field: RegisterField, value: impl Into<String>) -> Option<Effect> {
        if self.feedback.is_blocked() {
            debug!("Ignoring edit of {field}: a surface is open");
            return None;
        }

        let value = value.into();
        if field.is_sensitive() {
            debug!("Field {field} changed");
        } else {
            debug!("Field {field} changed to {value:?}");
        }

        self.record.set(field, value);

        if field == RegisterField::ZipCode {
            return self
                .lookup
                .on_zip_code_changed(&self.record.address.zip_code)
                .map(Effect::Lookup);
        }

        None
    }

    pub fn submit(&mut self) -> Result<Effect, SubmitRejected> {
        match self.controller.state() {
            state if state.is_pending() => return Err(SubmitRejected::AlreadySubmitting),
            SubmissionState::Succeeded => return Err(SubmitRejected::AlreadySucceeded),
            _ if self.feedback.is_blocked() => return Err(SubmitRejected::SurfaceOpen),
            _ => {}
        }

        match self.controller.begin(&self.record, &self.schema) {
            Ok(ticket) => {
                self.feedback.clear_field_errors();
                Ok(Effect::Submit(ticket))
            }
            Err(SubmitRejected::Invalid(errors)) => {
                self.feedback.show_field_errors(errors.clone());
                Err(SubmitRejected::Invalid(errors))
            }
            Err(other) => Err(other),
        }
    }

    /// Returns `false` when the resolution was stale and dropped.
    pub fn resolve_lookup(&mut self, resolution: LookupResolution) -> bool {
        self.lookup.apply(&mut self.record, resolution)
    }

    /// Settles the pending submission and opens the matching surface. A
    /// success schedules the redirect home.
    pub fn settle_submission(&mut self, resolution: SubmissionResolution) -> Option<Effect> {
        let state = self.controller.settle(resolution)?.clone();
        self.feedback.show_state(&state, ACCOUNT_CREATED);

        if state == SubmissionState::Succeeded {
            info!(
                "Redirecting to {} in {:?}",
                self.settings.home_route, self.settings.redirect_delay
            );
            return Some(Effect::ScheduleRedirect {
                route: self.settings.home_route.clone(),
                after: self.settings.redirect_delay,
            });
        }

        None
    }

    /// The surface's dismiss callback. A failed submission returns to idle.
    pub fn dismiss_surface(&mut self) {
        if let Some(surface) = self.feedback.dismiss() {
            debug!("Surface dismissed: {}", surface.message());
        }
        self.controller.acknowledge_failure();
    }

    /// Fires when the post-success delay elapses.
    pub fn complete_redirect(&mut self) -> Option<Effect> {
        if *self.controller.state() != SubmissionState::Succeeded {
            return None;
        }
        self.discard();
        Some(Effect::Navigate(self.settings.home_route.clone()))
    }

    /// The explicit "home" action: leave immediately, dropping the record.
    pub fn go_home(&mut self) -> Effect {
        self.discard();
        Effect::Navigate(self.settings.home_route.clone())
    }

    pub fn view(&self) -> FormView {
        FormView {
            record: self.record.clone(),
            field_errors: self.feedback.field_errors().clone(),
            lookup_error: self.lookup.error().map(|e| e.message().to_string()),
            lookup_pending: self.lookup.is_pending(),
            surface: self.feedback.surface().cloned(),
            state: self.controller.state().clone(),
        }
    }

    fn discard(&mut self) {
        self.record = RegisterRequest::default();
        self.lookup.reset();
        self.controller.reset();
        self.feedback.reset();
    }
}
