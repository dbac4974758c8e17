//! Core of the admin console: REST access, list and edit controllers,
//! validation and session handling. Front ends drive these controllers and
//! render what they expose.

pub mod backend;
pub mod create;
mod entities;
pub mod envelope;
pub mod error;
pub mod events;
pub mod form;
pub mod listing;
pub mod schema;
pub mod sequence;
pub mod session;
pub mod validate;

pub use backend::{AdminBackend, HttpBackend};
pub use create::{check_limit_conflict, create_limit, CreateForm};
pub use error::{ConsoleError, ErrorCategory};
pub use events::{ConsoleEvent, Notifier};
pub use form::{compute_diff, FormController, SubmitOutcome, ToggleOutcome};
pub use listing::{FilterState, ListController, Listable, PageView, RefreshOutcome, ALL};
pub use session::{AnonymousSession, Identity, SessionProvider, TokenSession};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
