use domain::BookingError;

use crate::error::AppError;

/// Unified error type for GraphQL resolvers.
///
/// async-graphql has a blanket `impl<T: Display + Send + Sync + 'static> From<T> for Error`,
/// so any type implementing `Display` auto-converts via `?`. Database failures are
/// logged here and reach clients as a generic message.
#[derive(Debug)]
pub enum GqlError {
    Sqlx(sqlx::Error),
    Uuid(uuid::Error),
    Booking(BookingError),
    App(AppError),
    Custom(String),
}

impl GqlError {
    pub fn new(msg: impl Into<String>) -> Self {
        GqlError::Custom(msg.into())
    }
}

impl std::fmt::Display for GqlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GqlError::Sqlx(e) | GqlError::App(AppError::Db(e)) => {
                tracing::error!("Database error: {e}");
                write!(f, "Internal database error")
            }
            GqlError::App(AppError::Anyhow(e)) => {
                tracing::error!("Unhandled error: {e:#}");
                write!(f, "Internal server error")
            }
            GqlError::Uuid(e) => write!(f, "Invalid ID: {e}"),
            GqlError::Booking(e) => write!(f, "{e}"),
            GqlError::App(e) => write!(f, "{e}"),
            GqlError::Custom(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for GqlError {}

impl From<sqlx::Error> for GqlError {
    fn from(e: sqlx::Error) -> Self {
        GqlError::Sqlx(e)
    }
}

impl From<uuid::Error> for GqlError {
    fn from(e: uuid::Error) -> Self {
        GqlError::Uuid(e)
    }
}

impl From<BookingError> for GqlError {
    fn from(e: BookingError) -> Self {
        GqlError::Booking(e)
    }
}

impl From<AppError> for GqlError {
    fn from(e: AppError) -> Self {
        match e {
            AppError::Booking(inner) => GqlError::Booking(inner),
            other => GqlError::App(other),
        }
    }
}

/// Extension trait that converts any `Result<T, E>` where `E: Display`
/// into `async_graphql::Result<T>` with a contextual message prefix.
///
/// Usage: `Uuid::parse_str(id).gql_err("Invalid time slot ID")?`
pub trait ResultExt<T> {
    fn gql_err(self, context: &str) -> std::result::Result<T, async_graphql::Error>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for std::result::Result<T, E> {
    fn gql_err(self, context: &str) -> std::result::Result<T, async_graphql::Error> {
        self.map_err(|e| async_graphql::Error::new(format!("{context}: {e}")))
    }
}
