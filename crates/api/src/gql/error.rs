//! Error plumbing between `AppError` and async-graphql.
//!
//! Every resolver error carries an `extensions.code` of `VALIDATION`,
//! `NOT_FOUND`, `CONFLICT` or `INTERNAL`.

use async_graphql::{ErrorExtensions, ID};
use uuid::Uuid;

use crate::error::AppError;

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| e.set("code", self.code()))
    }
}

/// `Result<T, AppError>` into a GraphQL result with the error code attached.
pub trait AppResultExt<T> {
    fn into_gql(self) -> async_graphql::Result<T>;
}

impl<T> AppResultExt<T> for Result<T, AppError> {
    fn into_gql(self) -> async_graphql::Result<T> {
        self.map_err(|e| e.extend())
    }
}

/// Converts any `Result<T, E>` where `E: Display` into a validation error
/// with a contextual prefix.
///
/// Usage: `Uuid::parse_str(id).gql_err("Invalid league ID")?`
pub trait ResultExt<T> {
    fn gql_err(self, context: &str) -> Result<T, async_graphql::Error>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn gql_err(self, context: &str) -> Result<T, async_graphql::Error> {
        self.map_err(|e| AppError::validation(format!("{context}: {e}")).extend())
    }
}

pub fn parse_id(id: &ID, what: &str) -> async_graphql::Result<Uuid> {
    Uuid::parse_str(id.as_str()).gql_err(&format!("Invalid {what} ID"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_of(err: &async_graphql::Error) -> Option<async_graphql::Value> {
        err.extensions
            .as_ref()
            .and_then(|ext| ext.get("code"))
            .cloned()
    }

    #[test]
    fn app_errors_carry_their_code() {
        let err = AppError::conflict("Roster is locked").extend();
        assert_eq!(err.message, "Roster is locked");
        assert_eq!(code_of(&err), Some(async_graphql::Value::from("CONFLICT")));
    }

    #[test]
    fn bad_ids_are_validation_errors() {
        let err = parse_id(&ID::from("not-a-uuid"), "league").unwrap_err();
        assert!(err.message.starts_with("Invalid league ID"));
        assert_eq!(code_of(&err), Some(async_graphql::Value::from("VALIDATION")));
    }

    #[test]
    fn internal_message_is_opaque() {
        let result: Result<(), AppError> = Err(AppError::Internal("pool timed out".into()));
        assert_eq!(result.into_gql().unwrap_err().message, "internal error");
    }
}
