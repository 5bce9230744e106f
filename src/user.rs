use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The identifier of a [`User`] \
/// Only ever used as a stable key when rendering, so whatever JSON value the server sent is kept untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Value);

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Value::String(id) => f.write_str(id),
            other => write!(f, "{other}"),
        }
    }
}

/// Stores the public information about a user, as sent by the users endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

impl User {

    /// The text shown for this user in a list: `"{username} - {email}"`
    pub fn display_line(&self) -> String {
        format!("{} - {}", self.username, self.email)
    }

}

/// The users, in the order the server sent them
pub type UserCollection = Vec<User>;

/// What can be read out of a response envelope
#[derive(Debug, Clone, PartialEq)]
pub enum EnvelopeUsers {
    /// The `users` field was there and every entry looked like a [`User`]
    Present(UserCollection),
    /// The envelope was not an object, had no `users` field, or the field didn't have the expected shape
    Missing,
}

/// Reads the `users` field out of an already parsed envelope. \
/// Never fails: anything that does not look like `{"users": [...]}` counts as [`EnvelopeUsers::Missing`].
pub fn users_from_envelope(envelope: Value) -> EnvelopeUsers {
    let Value::Object(mut fields) = envelope else {
        return EnvelopeUsers::Missing;
    };
    let Some(users) = fields.remove("users") else {
        return EnvelopeUsers::Missing;
    };
    match serde_json::from_value::<UserCollection>(users) {
        Ok(users) => EnvelopeUsers::Present(users),
        Err(_) => EnvelopeUsers::Missing,
    }
}
