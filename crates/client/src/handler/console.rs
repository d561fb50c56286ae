use shared::abstract_trait::NavigatorTrait;
use tracing::{error, info, warn};

use crate::form::{FormView, PresenterTrait, Surface};

/// Renders form views to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsolePresenter;

impl PresenterTrait for ConsolePresenter {
    fn render(&self, view: &FormView) {
        for (path, messages) in view.field_errors.iter() {
            for message in messages {
                warn!("{path}: {message}");
            }
        }

        if let Some(message) = &view.lookup_error {
            warn!("address.zipCode (lookup): {message}");
        }

        match &view.surface {
            Some(Surface::Error(message)) => error!("[modal] {message}"),
            Some(Surface::Success(message)) => info!("[modal] {message}"),
            None => {}
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNavigator;

impl NavigatorTrait for ConsoleNavigator {
    fn navigate(&self, route: &str) {
        info!("Navigated to {route}");
    }
}
