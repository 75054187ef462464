use crate::domain::services::conflict::ConflictField;
use crate::infrastructure::db::dto::{ClientRow, NewClientRow};
use crate::infrastructure::db::postgres::PostgresDatabase;
use crate::infrastructure::db::stores::client_store::{ClientRepositoryError, ClientStore};
use async_trait::async_trait;
use sqlx::PgConnection;
use sqlx::error::ErrorKind;
use tracing::error;

const CUIT_CONSTRAINT: &str = "clients_cuit_key";
const EMAIL_CONSTRAINT: &str = "clients_email_key";

const CLIENT_COLUMNS: &str =
    "id, first_name, last_name, corporate_name, cuit, birthdate, cell_phone, email";

#[derive(Clone)]
pub struct ClientStorePostgres {
    db: std::sync::Arc<PostgresDatabase>,
}

/// Translate a driver error, turning unique violations into attributable conflicts.
fn map_sqlx_error(e: sqlx::Error) -> ClientRepositoryError {
    let unique_constraint = e
        .as_database_error()
        .filter(|db_err| db_err.is_unique_violation())
        .and_then(|db_err| db_err.constraint());
    match unique_constraint {
        Some(CUIT_CONSTRAINT) => return ClientRepositoryError::Conflict(ConflictField::Cuit),
        Some(EMAIL_CONSTRAINT) => return ClientRepositoryError::Conflict(ConflictField::Email),
        _ => {}
    }
    let rejected_row = e.as_database_error().is_some_and(|db_err| {
        matches!(
            db_err.kind(),
            ErrorKind::NotNullViolation | ErrorKind::CheckViolation
        )
    });
    if rejected_row {
        error!(error = %e, "client row rejected by the schema");
        return ClientRepositoryError::InvalidInput;
    }
    error!(error = %e, "client store query failed");
    ClientRepositoryError::StorageUnavailable
}

/// Build an `ILIKE` pattern matching `fragment` anywhere, with wildcards escaped.
pub(crate) fn contains_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for c in fragment.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

impl ClientStorePostgres {
    /// Build a Postgres-backed client store.
    pub fn new(db: std::sync::Arc<PostgresDatabase>) -> Self {
        Self { db }
    }

    async fn list_impl_conn(conn: &mut PgConnection) -> Result<Vec<ClientRow>, ClientRepositoryError> {
        sqlx::query_as::<_, ClientRow>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients ORDER BY id"
        ))
        .fetch_all(&mut *conn)
        .await
        .map_err(map_sqlx_error)
    }

    async fn get_impl_conn(
        conn: &mut PgConnection,
        client_id: i32,
    ) -> Result<Option<ClientRow>, ClientRepositoryError> {
        sqlx::query_as::<_, ClientRow>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE id = $1"
        ))
        .bind(client_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_sqlx_error)
    }

    async fn insert_impl_conn(
        conn: &mut PgConnection,
        row: &NewClientRow,
    ) -> Result<ClientRow, ClientRepositoryError> {
        sqlx::query_as::<_, ClientRow>(&format!(
            "INSERT INTO clients (
                first_name,
                last_name,
                corporate_name,
                cuit,
                birthdate,
                cell_phone,
                email
            )
            VALUES ($1,$2,$3,$4,$5,$6,$7)
            RETURNING {CLIENT_COLUMNS}"
        ))
        .bind(&row.first_name)
        .bind(&row.last_name)
        .bind(&row.corporate_name)
        .bind(&row.cuit)
        .bind(row.birthdate)
        .bind(&row.cell_phone)
        .bind(&row.email)
        .fetch_one(&mut *conn)
        .await
        .map_err(map_sqlx_error)
    }

    async fn update_impl_conn(
        conn: &mut PgConnection,
        row: &ClientRow,
    ) -> Result<ClientRow, ClientRepositoryError> {
        let stored = sqlx::query_as::<_, ClientRow>(&format!(
            "UPDATE clients SET
                first_name = $2,
                last_name = $3,
                corporate_name = $4,
                cuit = $5,
                birthdate = $6,
                cell_phone = $7,
                email = $8
            WHERE id = $1
            RETURNING {CLIENT_COLUMNS}"
        ))
        .bind(row.id)
        .bind(&row.first_name)
        .bind(&row.last_name)
        .bind(&row.corporate_name)
        .bind(&row.cuit)
        .bind(row.birthdate)
        .bind(&row.cell_phone)
        .bind(&row.email)
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;

        stored.ok_or(ClientRepositoryError::NotFound)
    }

    async fn delete_impl_conn(
        conn: &mut PgConnection,
        client_id: i32,
    ) -> Result<(), ClientRepositoryError> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(client_id)
            .execute(&mut *conn)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(ClientRepositoryError::NotFound);
        }

        Ok(())
    }

    async fn search_impl_conn(
        conn: &mut PgConnection,
        fragment: String,
    ) -> Result<Vec<ClientRow>, ClientRepositoryError> {
        sqlx::query_as::<_, ClientRow>(&format!(
            "SELECT {CLIENT_COLUMNS}
            FROM clients
            WHERE unaccent(first_name) ILIKE unaccent($1) ESCAPE '\\'
               OR unaccent(last_name) ILIKE unaccent($1) ESCAPE '\\'
            ORDER BY id"
        ))
        .bind(contains_pattern(&fragment))
        .fetch_all(&mut *conn)
        .await
        .map_err(map_sqlx_error)
    }

    async fn find_conflict_impl_conn(
        conn: &mut PgConnection,
        cuit: String,
        email: String,
    ) -> Result<Option<ClientRow>, ClientRepositoryError> {
        // Rows colliding on CUIT sort first so the caller sees the CUIT reason.
        sqlx::query_as::<_, ClientRow>(&format!(
            "SELECT {CLIENT_COLUMNS}
            FROM clients
            WHERE cuit = $1 OR email = $2
            ORDER BY (cuit = $1) DESC, id
            LIMIT 1"
        ))
        .bind(cuit)
        .bind(email)
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_sqlx_error)
    }

    async fn email_exists_impl_conn(
        conn: &mut PgConnection,
        email: String,
        exclude_id: i32,
    ) -> Result<bool, ClientRepositoryError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM clients WHERE email = $1 AND id <> $2)",
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(map_sqlx_error)
    }
}

#[async_trait]
impl ClientStore for ClientStorePostgres {
    async fn list(&self) -> Result<Vec<ClientRow>, ClientRepositoryError> {
        self.db
            .with_conn(move |conn| Box::pin(Self::list_impl_conn(conn)))
            .await
    }

    async fn get(&self, client_id: i32) -> Result<Option<ClientRow>, ClientRepositoryError> {
        self.db
            .with_conn(move |conn| Box::pin(Self::get_impl_conn(conn, client_id)))
            .await
    }

    async fn insert(&self, row: &NewClientRow) -> Result<ClientRow, ClientRepositoryError> {
        let row = row.clone();
        self.db
            .with_conn(move |conn| {
                let row = row;
                Box::pin(async move { Self::insert_impl_conn(conn, &row).await })
            })
            .await
    }

    async fn update(&self, row: &ClientRow) -> Result<ClientRow, ClientRepositoryError> {
        let row = row.clone();
        self.db
            .with_conn(move |conn| {
                let row = row;
                Box::pin(async move { Self::update_impl_conn(conn, &row).await })
            })
            .await
    }

    async fn delete(&self, client_id: i32) -> Result<(), ClientRepositoryError> {
        self.db
            .with_conn(move |conn| Box::pin(Self::delete_impl_conn(conn, client_id)))
            .await
    }

    async fn search_by_name(
        &self,
        fragment: &str,
    ) -> Result<Vec<ClientRow>, ClientRepositoryError> {
        let fragment = fragment.to_string();
        self.db
            .with_conn(move |conn| Box::pin(Self::search_impl_conn(conn, fragment)))
            .await
    }

    async fn find_conflict(
        &self,
        cuit: &str,
        email: &str,
    ) -> Result<Option<ClientRow>, ClientRepositoryError> {
        let cuit = cuit.to_string();
        let email = email.to_string();
        self.db
            .with_conn(move |conn| Box::pin(Self::find_conflict_impl_conn(conn, cuit, email)))
            .await
    }

    async fn email_exists_for_other(
        &self,
        email: &str,
        exclude_id: i32,
    ) -> Result<bool, ClientRepositoryError> {
        let email = email.to_string();
        self.db
            .with_conn(move |conn| Box::pin(Self::email_exists_impl_conn(conn, email, exclude_id)))
            .await
    }
}
