use async_trait::async_trait;
use curtail_core::error::{StorageError, StorageResult};
use curtail_core::{ReadRepository, Repository, ShortCode, UrlMapping};
use jiff::Timestamp;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

/// PostgreSQL implementation of the mapping store.
///
/// The two named unique constraints on `url_mappings` are the concurrency
/// primitive: `insert` makes a single atomic attempt and classifies a unique
/// violation by constraint name, so callers can branch on which race was
/// lost. No application-level locks, no retries at this layer.
#[derive(Debug, Clone)]
pub struct PgRepository {
    pool: PgPool,
}

const URL_UNIQUE_CONSTRAINT: &str = "url_mappings_original_url_key";
const CODE_UNIQUE_CONSTRAINT: &str = "url_mappings_short_code_key";

impl PgRepository {
    /// Creates a repository from an existing PostgreSQL connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new PostgreSQL connection pool.
    pub async fn connect(database_url: &str) -> StorageResult<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

/// Maps a unique-constraint violation onto the invariant it broke, by
/// constraint name. Returns `None` for anything else.
fn classify_unique_violation(
    err: &sqlx::Error,
    url: &str,
    code: &ShortCode,
) -> Option<StorageError> {
    let db_err = err.as_database_error()?;
    if !db_err.is_unique_violation() {
        return None;
    }

    match db_err.constraint() {
        Some(URL_UNIQUE_CONSTRAINT) => Some(StorageError::DuplicateUrl(url.to_owned())),
        Some(CODE_UNIQUE_CONSTRAINT) => Some(StorageError::DuplicateCode(code.to_string())),
        _ => None,
    }
}

fn mapping_from_row(row: &PgRow) -> StorageResult<UrlMapping> {
    let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
    let original_url: String = row.try_get("original_url").map_err(map_sqlx_error)?;
    let raw_code: String = row.try_get("short_code").map_err(map_sqlx_error)?;
    let created_at_micros: i64 = row.try_get("created_at_micros").map_err(map_sqlx_error)?;

    let short_code = ShortCode::new(raw_code.as_str())
        .map_err(|e| StorageError::InvalidData(format!("stored short code is invalid: {e}")))?;
    let created_at = Timestamp::from_microsecond(created_at_micros).map_err(|e| {
        StorageError::InvalidData(format!(
            "invalid created_at timestamp '{created_at_micros}': {e}"
        ))
    })?;

    Ok(UrlMapping {
        id,
        original_url,
        short_code,
        created_at,
    })
}

#[async_trait]
impl ReadRepository for PgRepository {
    async fn get_by_code(&self, code: &ShortCode) -> StorageResult<Option<UrlMapping>> {
        let row = sqlx::query(
            r#"
            SELECT id, original_url, short_code,
                   (EXTRACT(EPOCH FROM created_at) * 1000000)::BIGINT AS created_at_micros
            FROM url_mappings
            WHERE short_code = $1
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(mapping_from_row).transpose()
    }

    async fn get_by_url(&self, url: &str) -> StorageResult<Option<UrlMapping>> {
        let row = sqlx::query(
            r#"
            SELECT id, original_url, short_code,
                   (EXTRACT(EPOCH FROM created_at) * 1000000)::BIGINT AS created_at_micros
            FROM url_mappings
            WHERE original_url = $1
            LIMIT 1
            "#,
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(mapping_from_row).transpose()
    }
}

#[async_trait]
impl Repository for PgRepository {
    async fn insert(&self, url: &str, code: &ShortCode) -> StorageResult<UrlMapping> {
        let result = sqlx::query(
            r#"
            INSERT INTO url_mappings (original_url, short_code)
            VALUES ($1, $2)
            RETURNING id, original_url, short_code,
                      (EXTRACT(EPOCH FROM created_at) * 1000000)::BIGINT AS created_at_micros
            "#,
        )
        .bind(url)
        .bind(code.as_str())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => mapping_from_row(&row),
            Err(err) => match classify_unique_violation(&err, url, code) {
                Some(conflict) => Err(conflict),
                None => Err(map_sqlx_error(err)),
            },
        }
    }
}
