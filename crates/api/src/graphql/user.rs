//! User resolvers: registration, login, and the `me` query.

use async_graphql::{Context, Object, Result, SimpleObject};

use lireddit_db::models::user::{CreateUser, User};
use lireddit_db::repositories::UserRepo;
use lireddit_db::types::{DbId, Timestamp};
use lireddit_db::{is_unique_violation, DbPool};

use crate::auth::password::{hash_password, verify_password};
use crate::session::Session;

/// Usernames and passwords must be strictly longer than this many characters.
const MIN_CREDENTIAL_CHARS: usize = 2;

/// Why a register/login attempt was rejected.
///
/// These never escape as GraphQL execution errors; they collapse into the
/// `{field, message}` pairs of [`UserResponse`]. The message strings are
/// part of the client contract.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("Username must be greater than 2 characters")]
    UsernameTooShort,
    #[error("Password must be greater than 2 characters")]
    PasswordTooShort,
    #[error("Username already exists")]
    UsernameTaken,
    // Leaks account existence; kept because existing clients key off it.
    #[error("Username doesn't exist")]
    UnknownUsername,
    #[error("Incorrect password")]
    IncorrectPassword,
}

impl CredentialError {
    /// The input field the error is attached to.
    fn field(&self) -> &'static str {
        match self {
            Self::UsernameTooShort | Self::UsernameTaken | Self::UnknownUsername => "username",
            Self::PasswordTooShort | Self::IncorrectPassword => "password",
        }
    }
}

/// A structured validation/business-rule failure naming the offending field.
#[derive(Debug, SimpleObject)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl From<CredentialError> for FieldError {
    fn from(err: CredentialError) -> Self {
        Self {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

/// Transport-facing user shape. Never exposes the password hash.
#[derive(Debug, SimpleObject)]
#[graphql(name = "User")]
pub struct UserType {
    pub id: DbId,
    pub username: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<User> for UserType {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Envelope returned by register/login: field errors or a user, never both.
#[derive(Debug, SimpleObject)]
pub struct UserResponse {
    pub errors: Option<Vec<FieldError>>,
    pub user: Option<UserType>,
}

impl UserResponse {
    fn rejected(err: CredentialError) -> Self {
        Self {
            errors: Some(vec![err.into()]),
            user: None,
        }
    }

    fn logged_in(user: User) -> Self {
        Self {
            errors: None,
            user: Some(user.into()),
        }
    }
}

/// Check the register inputs, username first: a short password is never
/// reported when the username is also invalid.
fn validate_credentials(username: &str, password: &str) -> std::result::Result<(), CredentialError> {
    if username.chars().count() <= MIN_CREDENTIAL_CHARS {
        return Err(CredentialError::UsernameTooShort);
    }
    if password.chars().count() <= MIN_CREDENTIAL_CHARS {
        return Err(CredentialError::PasswordTooShort);
    }
    Ok(())
}

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    /// The currently authenticated user, or null when not logged in.
    ///
    /// Being logged out is a normal state, not an error.
    async fn me(&self, ctx: &Context<'_>) -> Result<Option<UserType>> {
        let pool = ctx.data::<DbPool>()?;
        let session = ctx.data::<Session>()?;

        let Some(user_id) = session.user_id() else {
            return Ok(None);
        };

        let user = UserRepo::find_by_id(pool, user_id).await?;
        Ok(user.map(UserType::from))
    }
}

#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    /// Create an account. On success the new user is logged in immediately.
    async fn register(
        &self,
        ctx: &Context<'_>,
        username: String,
        password: String,
    ) -> Result<UserResponse> {
        let pool = ctx.data::<DbPool>()?;
        let session = ctx.data::<Session>()?;

        if let Err(err) = validate_credentials(&username, &password) {
            return Ok(UserResponse::rejected(err));
        }

        let password_hash = hash_password(&password)
            .map_err(|e| async_graphql::Error::new(format!("Password hashing error: {e}")))?;

        let input = CreateUser {
            username,
            password_hash,
        };
        let user = match UserRepo::create(pool, &input).await {
            Ok(user) => user,
            // The unique index on username is the sole guard against a
            // concurrent duplicate registration.
            Err(err) if is_unique_violation(&err) => {
                return Ok(UserResponse::rejected(CredentialError::UsernameTaken));
            }
            Err(err) => return Err(err.into()),
        };

        session.log_in(user.id);
        Ok(UserResponse::logged_in(user))
    }

    /// Authenticate with username + password.
    async fn login(
        &self,
        ctx: &Context<'_>,
        username: String,
        password: String,
    ) -> Result<UserResponse> {
        let pool = ctx.data::<DbPool>()?;
        let session = ctx.data::<Session>()?;

        let Some(user) = UserRepo::find_by_username(pool, &username).await? else {
            return Ok(UserResponse::rejected(CredentialError::UnknownUsername));
        };

        let valid = verify_password(&password, &user.password_hash)
            .map_err(|e| async_graphql::Error::new(format!("Password verification error: {e}")))?;
        if !valid {
            return Ok(UserResponse::rejected(CredentialError::IncorrectPassword));
        }

        session.log_in(user.id);
        Ok(UserResponse::logged_in(user))
    }
}
