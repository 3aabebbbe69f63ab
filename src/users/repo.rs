use sqlx::PgPool;

use crate::error::RepoError;
use crate::ident;
use crate::users::password::verify_password;
use crate::users::repo_types::{Role, User, UserRow};

impl User {
    /// Insert a new user. Username and id-number are checked for
    /// duplicates up front; the UNIQUE constraints close the remaining
    /// race between check and insert, and a constraint violation is
    /// reported the same way as a failed pre-check.
    pub async fn create(
        db: &PgPool,
        username: &str,
        password_hash: &str,
        id_number: &str,
        birthdate: &str,
        role: Role,
    ) -> Result<User, RepoError> {
        if Self::find_by_username(db, username).await?.is_some() {
            return Err(RepoError::Conflict("Username already exists".into()));
        }
        if Self::find_by_id_number(db, id_number).await?.is_some() {
            return Err(RepoError::Conflict("ID number already registered".into()));
        }

        let id = ident::generate();
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, username, password_hash, id_number, birthdate, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, username, password_hash, id_number, birthdate, role, created_at
            "#,
        )
        .bind(&id)
        .bind(username)
        .bind(password_hash)
        .bind(id_number)
        .bind(birthdate)
        .bind(role.as_str())
        .fetch_one(db)
        .await
        .map_err(conflict_on_unique_violation)?;

        Ok(row.into())
    }

    pub async fn find_by_username(db: &PgPool, username: &str) -> Result<Option<User>, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, id_number, birthdate, role, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await?;
        Ok(row.map(User::from))
    }

    pub async fn find_by_id_number(db: &PgPool, id_number: &str) -> Result<Option<User>, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, id_number, birthdate, role, created_at
            FROM users
            WHERE id_number = $1
            "#,
        )
        .bind(id_number)
        .fetch_optional(db)
        .await?;
        Ok(row.map(User::from))
    }

    /// Lookup by id, trying each stored identifier form in order.
    pub async fn find_by_id(db: &PgPool, user_id: &str) -> Result<Option<User>, RepoError> {
        for candidate in ident::candidates(user_id) {
            let row = sqlx::query_as::<_, UserRow>(
                r#"
                SELECT id, username, password_hash, id_number, birthdate, role, created_at
                FROM users
                WHERE id = $1
                "#,
            )
            .bind(&candidate)
            .fetch_optional(db)
            .await?;
            if let Some(row) = row {
                return Ok(Some(row.into()));
            }
        }
        Ok(None)
    }

    /// Unknown username and wrong password produce the same outcome.
    pub async fn authenticate(
        db: &PgPool,
        username: &str,
        password: &str,
    ) -> Result<User, RepoError> {
        let Some(user) = Self::find_by_username(db, username).await? else {
            return Err(RepoError::Unauthorized);
        };
        if !verify_password(password, &user.password_hash) {
            return Err(RepoError::Unauthorized);
        }
        Ok(user)
    }
}

fn conflict_on_unique_violation(e: sqlx::Error) -> RepoError {
    match &e {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
            RepoError::Conflict("Username or ID number already registered".into())
        }
        _ => RepoError::Store(e),
    }
}
