use std::error::Error;
use std::fmt::{Display, Formatter};
use log::{debug, error};
use serde_json::Value;
use crate::user::{users_from_envelope, EnvelopeUsers, User, UserCollection};

/// Something that can hand out the raw users envelope. \
/// [`UsersClient`](crate::UsersClient) does this over HTTP, tests use in-memory sources.
#[allow(async_fn_in_trait)]
pub trait UserSource {

    /// Reads the response body of the users endpoint. \
    /// Any error returned here counts as a transport failure.
    async fn fetch_body(&self) -> anyhow::Result<String>;

}

/// Why a load ended with an empty list, even though nothing went wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyCause {
    /// The envelope had a `users` field, but it was an empty array
    NoUsers,
    /// The envelope was valid JSON, but had no (usable) `users` field
    ShapeMismatch,
}

/// Why a load failed
#[derive(Debug)]
pub enum LoadError {
    /// No response could be obtained or its body could not be read
    Transport(anyhow::Error),
    /// The body was not valid JSON
    MalformedPayload(serde_json::Error),
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Transport(error) => write!(f, "Could not fetch users: {error:#}"),
            LoadError::MalformedPayload(error) => write!(f, "Users response is not valid JSON: {error}"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LoadError::Transport(error) => Some(&**error),
            LoadError::MalformedPayload(error) => Some(error),
        }
    }
}

/// The result of loading the user list. \
/// Every variant except [`LoadOutcome::Loaded`] renders as an empty list.
#[derive(Debug)]
pub enum LoadOutcome {
    /// At least one user was received
    Loaded(UserCollection),
    Empty(EmptyCause),
    /// Something went wrong. Already logged by [`load_users()`].
    Failed(LoadError),
}

/// Just the kind of a [`LoadOutcome`], without any data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Loaded,
    Empty(EmptyCause),
    TransportFailed,
    MalformedPayload,
}

impl LoadOutcome {

    /// The users to display, empty for anything but [`LoadOutcome::Loaded`]
    pub fn users(&self) -> &[User] {
        match self {
            LoadOutcome::Loaded(users) => users,
            LoadOutcome::Empty(_) | LoadOutcome::Failed(_) => &[],
        }
    }

    pub fn into_users(self) -> UserCollection {
        match self {
            LoadOutcome::Loaded(users) => users,
            LoadOutcome::Empty(_) | LoadOutcome::Failed(_) => vec![],
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            LoadOutcome::Loaded(_) => OutcomeKind::Loaded,
            LoadOutcome::Empty(cause) => OutcomeKind::Empty(*cause),
            LoadOutcome::Failed(LoadError::Transport(_)) => OutcomeKind::TransportFailed,
            LoadOutcome::Failed(LoadError::MalformedPayload(_)) => OutcomeKind::MalformedPayload,
        }
    }

}

/// Turns a raw response body into a [`LoadOutcome`]. Does not log.
pub fn normalize(body: &str) -> LoadOutcome {
    let envelope: Value = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(e) => return LoadOutcome::Failed(LoadError::MalformedPayload(e)),
    };
    debug!("Received users envelope: {envelope}");
    match users_from_envelope(envelope) {
        EnvelopeUsers::Present(users) if users.is_empty() => LoadOutcome::Empty(EmptyCause::NoUsers),
        EnvelopeUsers::Present(users) => LoadOutcome::Loaded(users),
        EnvelopeUsers::Missing => LoadOutcome::Empty(EmptyCause::ShapeMismatch),
    }
}

/// Fetches the envelope from `source` once and normalizes it. \
/// Failures are logged here and never returned as an `Err`, they end up as [`LoadOutcome::Failed`].
pub async fn load_users<S: UserSource>(source: &S) -> LoadOutcome {
    let outcome = match source.fetch_body().await {
        Ok(body) => normalize(&body),
        Err(e) => LoadOutcome::Failed(LoadError::Transport(e)),
    };
    if let LoadOutcome::Failed(e) = &outcome {
        error!("{e}");
    }
    outcome
}
