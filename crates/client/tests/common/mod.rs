#![allow(dead_code)]

use account_registration_client::{
    di::DependenciesInject,
    form::{DynPresenter, FormSettings, FormView, PresenterTrait, RegistrationForm},
    runtime::{FormHandle, FormRuntime},
};
use async_trait::async_trait;
use chrono::NaiveDate;
use shared::{
    abstract_trait::{AccountServiceTrait, NavigatorTrait, PostalLookupTrait},
    domain::{
        request::{RegisterField, RegisterRequest},
        response::{AccountReply, CreateAccountResponse, PostalAddress},
    },
    schema::{FixedClock, RegistrationSchema},
    utils::AppError,
};
use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::{sync::watch, task::JoinHandle};

pub fn valid_record() -> RegisterRequest {
    let mut record = RegisterRequest::default();
    for (field, value) in [
        (RegisterField::FullName, "Maria Aparecida Souza"),
        (RegisterField::Email, "maria@example.com"),
        (RegisterField::Password, "segredo1"),
        (RegisterField::ConfirmPassword, "segredo1"),
        (RegisterField::NationalId, "12345678901"),
        (RegisterField::Gender, "F"),
        (RegisterField::BirthDate, "1990-05-20"),
        (RegisterField::Phone, "11999999999"),
        (RegisterField::Street, "Rua Boa Vista"),
        (RegisterField::Number, "100"),
        (RegisterField::Neighborhood, "Centro"),
        (RegisterField::City, "São Paulo"),
        (RegisterField::State, "SP"),
        (RegisterField::ZipCode, "01001000"),
    ] {
        record.set(field, value);
    }
    record
}

pub fn address(street: &str, neighborhood: &str, city: &str, state: &str) -> PostalAddress {
    PostalAddress {
        street: street.to_string(),
        neighborhood: neighborhood.to_string(),
        city: city.to_string(),
        state: state.to_string(),
    }
}

/// Answers known zip codes after a per-code delay; everything else is
/// not found.
#[derive(Default)]
pub struct PostalLookupStub {
    known: HashMap<String, (Duration, PostalAddress)>,
    calls: Mutex<Vec<String>>,
}

impl PostalLookupStub {
    pub fn with(mut self, zip_code: &str, delay: Duration, address: PostalAddress) -> Self {
        self.known.insert(zip_code.to_string(), (delay, address));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PostalLookupTrait for PostalLookupStub {
    async fn lookup(&self, zip_code: &str) -> Result<Option<PostalAddress>, AppError> {
        self.calls.lock().unwrap().push(zip_code.to_string());

        match self.known.get(zip_code) {
            Some((delay, address)) => {
                tokio::time::sleep(*delay).await;
                Ok(Some(address.clone()))
            }
            None => Ok(None),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Scripted {
    Reply(u16, CreateAccountResponse),
    Unreachable,
    Panic,
}

impl Scripted {
    pub fn created() -> Self {
        Scripted::Reply(
            201,
            CreateAccountResponse {
                success: Some(true),
                message: Some("created".into()),
            },
        )
    }

    pub fn rejected(status: u16, message: &str) -> Self {
        Scripted::Reply(
            status,
            CreateAccountResponse {
                success: None,
                message: Some(message.to_string()),
            },
        )
    }
}

/// Plays back scripted outcomes in order, one per request.
#[derive(Default)]
pub struct AccountServiceStub {
    script: Mutex<VecDeque<Scripted>>,
    delay: Duration,
    requests: Mutex<Vec<RegisterRequest>>,
}

impl AccountServiceStub {
    pub fn new(script: impl IntoIterator<Item = Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            ..Default::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn requests(&self) -> Vec<RegisterRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AccountServiceTrait for AccountServiceStub {
    async fn create_account(&self, input: &RegisterRequest) -> Result<AccountReply, AppError> {
        self.requests.lock().unwrap().push(input.clone());
        tokio::time::sleep(self.delay).await;

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Reply(status, body)) => Ok(AccountReply::new(status, body)),
            Some(Scripted::Unreachable) | None => {
                Err(AppError::Custom("connection refused".into()))
            }
            Some(Scripted::Panic) => panic!("account service blew up"),
        }
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().unwrap().clone()
    }
}

impl NavigatorTrait for RecordingNavigator {
    fn navigate(&self, route: &str) {
        self.routes.lock().unwrap().push(route.to_string());
    }
}

#[derive(Default)]
pub struct RecordingPresenter {
    renders: Mutex<usize>,
}

impl RecordingPresenter {
    pub fn renders(&self) -> usize {
        *self.renders.lock().unwrap()
    }
}

impl PresenterTrait for RecordingPresenter {
    fn render(&self, _view: &FormView) {
        *self.renders.lock().unwrap() += 1;
    }
}

pub struct Harness {
    pub handle: FormHandle,
    pub views: watch::Receiver<FormView>,
    pub task: JoinHandle<FormView>,
    pub postal: Arc<PostalLookupStub>,
    pub accounts: Arc<AccountServiceStub>,
    pub navigator: Arc<RecordingNavigator>,
    pub presenter: Arc<RecordingPresenter>,
}

impl Harness {
    pub fn start(postal: PostalLookupStub, accounts: AccountServiceStub) -> Self {
        let postal = Arc::new(postal);
        let accounts = Arc::new(accounts);
        let navigator = Arc::new(RecordingNavigator::default());
        let presenter = Arc::new(RecordingPresenter::default());

        let di_container = DependenciesInject {
            postal_lookup: postal.clone(),
            account_service: accounts.clone(),
        };
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let form = RegistrationForm::new(
            RegistrationSchema::new(Arc::new(FixedClock(today))),
            FormSettings::default(),
        );
        let presenter_dyn: DynPresenter = presenter.clone();
        let (runtime, handle) =
            FormRuntime::new(form, &di_container, navigator.clone(), presenter_dyn);

        let task = tokio::spawn(runtime.run());
        let views = handle.subscribe();

        Self {
            handle,
            views,
            task,
            postal,
            accounts,
            navigator,
            presenter,
        }
    }

    pub fn fill(&self, record: &RegisterRequest) {
        for (field, value) in record.fields() {
            self.handle.set_field(field, value).unwrap();
        }
    }

    /// Waits for a view matching `predicate` and returns a copy of it.
    pub async fn until(&mut self, predicate: impl FnMut(&FormView) -> bool) -> FormView {
        let view = tokio::time::timeout(Duration::from_secs(30), self.views.wait_for(predicate))
            .await
            .expect("timed out waiting for view")
            .expect("form runtime stopped");
        (*view).clone()
    }

    pub async fn finish(self) -> FormView {
        let _ = self.handle.shutdown();
        self.task.await.unwrap()
    }
}
