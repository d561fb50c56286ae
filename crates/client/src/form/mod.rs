mod controller;
mod feedback;
mod lookup;
mod registration;

pub use self::controller::{
    ACCOUNT_CREATED, NETWORK_ERROR, SERVER_ERROR_FALLBACK, SubmissionController,
    SubmissionResolution, SubmissionState, SubmissionTicket, SubmitRejected, interpret,
    send_submission,
};
pub use self::feedback::{DynPresenter, FeedbackChannel, FormView, PresenterTrait, Surface};
pub use self::lookup::{
    LOOKUP_FAILED, LOOKUP_NOT_FOUND, LookupError, LookupResolution, LookupTicket,
    PostalLookupAdapter, fetch_address,
};
pub use self::registration::{Effect, FormSettings, RegistrationForm};
