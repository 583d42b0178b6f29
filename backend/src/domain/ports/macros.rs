//! Helper macro for declaring port error enums.
//!
//! Every variant carries named fields and a display message. Each variant
//! also gets a snake_case constructor whose parameters accept anything
//! convertible into the field type, so call sites can pass `&str` for
//! `String` fields.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),* $(,)? } => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field : $ty),* },
            )*
        }

        impl $name {
            $(
                ::paste::paste! {
                    pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                        Self::$variant { $($field: $field.into()),* }
                    }
                }
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    use crate::domain::ports::{
        PasswordHasherError, RecipeRepositoryError, TagRepositoryError, TokenRepositoryError,
        UserPersistenceError,
    };

    #[test]
    fn duplicate_tag_names_render_with_the_name() {
        let err = TagRepositoryError::duplicate_name("Vegan");
        assert_eq!(err.to_string(), "tag `Vegan` already exists");
        assert_eq!(
            err,
            TagRepositoryError::DuplicateName {
                name: "Vegan".to_owned()
            }
        );
    }

    #[test]
    fn duplicate_emails_build_from_str() {
        let err = UserPersistenceError::duplicate_email("ada@example.com");
        assert!(matches!(
            &err,
            UserPersistenceError::DuplicateEmail { email } if email == "ada@example.com"
        ));
        assert_eq!(
            err.to_string(),
            "user with email ada@example.com already exists"
        );
    }

    #[test]
    fn constructors_accept_owned_strings() {
        let message = String::from("pool timed out");
        let err = RecipeRepositoryError::connection(message);
        assert_eq!(
            err.to_string(),
            "recipe repository connection failed: pool timed out"
        );
    }

    #[test]
    fn every_port_error_exposes_connection_and_query_constructors() {
        assert!(matches!(
            TokenRepositoryError::query("boom"),
            TokenRepositoryError::Query { .. }
        ));
        assert!(matches!(
            TagRepositoryError::connection("down"),
            TagRepositoryError::Connection { .. }
        ));
        assert!(!PasswordHasherError::hash("bad params").to_string().is_empty());
    }
}
