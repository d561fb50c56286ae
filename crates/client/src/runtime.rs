use shared::{
    abstract_trait::{DynAccountService, DynNavigator, DynPostalLookup},
    domain::request::RegisterField,
    utils::AppError,
};
use std::{ops::ControlFlow, time::Duration};
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use crate::{
    di::DependenciesInject,
    form::{
        DynPresenter, Effect, FormView, LookupResolution, RegistrationForm, SubmissionResolution,
        fetch_address, send_submission,
    },
};

/// Everything that can happen to a mounted form: user input, and the
/// outcomes of work the form started earlier.
#[derive(Debug)]
pub enum FormEvent {
    FieldChanged(RegisterField, String),
    Submit,
    DismissSurface,
    Home,
    LookupResolved(LookupResolution),
    SubmissionSettled(SubmissionResolution),
    RedirectDue,
    Shutdown,
}

/// Sending side of a running form, plus a live view of its state.
#[derive(Debug, Clone)]
pub struct FormHandle {
    events: mpsc::UnboundedSender<FormEvent>,
    views: watch::Receiver<FormView>,
}

impl FormHandle {
    pub fn send(&self, event: FormEvent) -> Result<(), AppError> {
        self.events
            .send(event)
            .map_err(|_| AppError::InternalError("form runtime has stopped".to_string()))
    }

    pub fn set_field(
        &self,
        field: RegisterField,
        value: impl Into<String>,
    ) -> Result<(), AppError> {
        self.send(FormEvent::FieldChanged(field, value.into()))
    }

    pub fn submit(&self) -> Result<(), AppError> {
        self.send(FormEvent::Submit)
    }

    pub fn dismiss(&self) -> Result<(), AppError> {
        self.send(FormEvent::DismissSurface)
    }

    pub fn home(&self) -> Result<(), AppError> {
        self.send(FormEvent::Home)
    }

    pub fn shutdown(&self) -> Result<(), AppError> {
        self.send(FormEvent::Shutdown)
    }

    pub fn subscribe(&self) -> watch::Receiver<FormView> {
        self.views.clone()
    }

    pub fn view(&self) -> FormView {
        self.views.borrow().clone()
    }

    /// Waits until the form holds `zip_code` and no lookup for it is in
    /// flight. Returns `false` if that takes longer than `limit` or the
    /// runtime stops first.
    pub async fn wait_for_lookup(&self, zip_code: &str, limit: Duration) -> bool {
        let mut views = self.views.clone();
        let settled = views.wait_for(|view| {
            view.record.address.zip_code == zip_code && !view.lookup_pending
        });

        let outcome = tokio::time::timeout(limit, settled).await;
        outcome.is_ok_and(|view| view.is_ok())
    }
}

/// Single event loop owning the form.
///
/// Lookups, submissions and the redirect delay run as spawned tasks that
/// post their outcome back as a [`FormEvent`], so input keeps flowing while
/// they are in flight. The loop ends on navigation or [`FormEvent::Shutdown`].
pub struct FormRuntime {
    form: RegistrationForm,
    postal_lookup: DynPostalLookup,
    account_service: DynAccountService,
    navigator: DynNavigator,
    presenter: DynPresenter,
    events_tx: mpsc::UnboundedSender<FormEvent>,
    events_rx: mpsc::UnboundedReceiver<FormEvent>,
    views_tx: watch::Sender<FormView>,
}

impl FormRuntime {
    pub fn new(
        form: RegistrationForm,
        di_container: &DependenciesInject,
        navigator: DynNavigator,
        presenter: DynPresenter,
    ) -> (Self, FormHandle) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (views_tx, views_rx) = watch::channel(form.view());

        let handle = FormHandle {
            events: events_tx.clone(),
            views: views_rx,
        };

        let runtime = Self {
            form,
            postal_lookup: di_container.postal_lookup.clone(),
            account_service: di_container.account_service.clone(),
            navigator,
            presenter,
            events_tx,
            events_rx,
            views_tx,
        };

        (runtime, handle)
    }

    /// Drains events until the form navigates away or is shut down, and
    /// returns the last view.
    pub async fn run(mut self) -> FormView {
        self.publish();

        while let Some(event) = self.events_rx.recv().await {
            let flow = self.handle(event);
            self.publish();
            if flow.is_break() {
                break;
            }
        }

        info!("Registration form closed");
        self.form.view()
    }

    fn handle(&mut self, event: FormEvent) -> ControlFlow<()> {
        match event {
            FormEvent::FieldChanged(field, value) => match self.form.set_field(field, value) {
                Some(effect) => self.execute(effect),
                None => ControlFlow::Continue(()),
            },
            FormEvent::Submit => match self.form.submit() {
                Ok(effect) => self.execute(effect),
                Err(rejected) => {
                    info!("Submit rejected: {rejected}");
                    ControlFlow::Continue(())
                }
            },
            FormEvent::DismissSurface => {
                self.form.dismiss_surface();
                ControlFlow::Continue(())
            }
            FormEvent::Home => {
                let effect = self.form.go_home();
                self.execute(effect)
            }
            FormEvent::LookupResolved(resolution) => {
                self.form.resolve_lookup(resolution);
                ControlFlow::Continue(())
            }
            FormEvent::SubmissionSettled(resolution) => {
                match self.form.settle_submission(resolution) {
                    Some(effect) => self.execute(effect),
                    None => ControlFlow::Continue(()),
                }
            }
            FormEvent::RedirectDue => match self.form.complete_redirect() {
                Some(effect) => self.execute(effect),
                None => ControlFlow::Continue(()),
            },
            FormEvent::Shutdown => ControlFlow::Break(()),
        }
    }

    fn execute(&self, effect: Effect) -> ControlFlow<()> {
        match effect {
            Effect::Lookup(ticket) => {
                let lookup = self.postal_lookup.clone();
                let events = self.events_tx.clone();

                tokio::spawn(async move {
                    let zip_code = ticket.zip_code().to_string();
                    let resolution = match tokio::spawn(fetch_address(lookup, ticket.clone())).await
                    {
                        Ok(resolution) => resolution,
                        Err(err) => {
                            warn!("Lookup task for {zip_code} aborted: {err}");
                            LookupResolution {
                                ticket,
                                result: Err(AppError::InternalError(err.to_string())),
                            }
                        }
                    };
                    let _ = events.send(FormEvent::LookupResolved(resolution));
                });
            }
            Effect::Submit(ticket) => {
                let accounts = self.account_service.clone();
                let events = self.events_tx.clone();
                let attempt = ticket.attempt();

                tokio::spawn(async move {
                    let resolution = match tokio::spawn(send_submission(accounts, ticket)).await {
                        Ok(resolution) => resolution,
                        Err(err) => {
                            warn!("Submission task {attempt} aborted: {err}");
                            SubmissionResolution {
                                attempt,
                                result: Err(AppError::InternalError(err.to_string())),
                            }
                        }
                    };
                    let _ = events.send(FormEvent::SubmissionSettled(resolution));
                });
            }
            Effect::ScheduleRedirect { route, after } => {
                let events = self.events_tx.clone();
                info!("Redirect to {route} scheduled");

                tokio::spawn(async move {
                    tokio::time::sleep(after).await;
                    let _ = events.send(FormEvent::RedirectDue);
                });
            }
            Effect::Navigate(route) => {
                info!("Navigating to {route}");
                self.navigator.navigate(&route);
                return ControlFlow::Break(());
            }
        }

        ControlFlow::Continue(())
    }

    fn publish(&self) {
        let view = self.form.view();
        self.presenter.render(&view);
        self.views_tx.send_replace(view);
    }
}
