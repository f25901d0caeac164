use sqlx::PgPool;

/// Shared connection pool handle passed to repositories and services.
pub type Db = PgPool;
