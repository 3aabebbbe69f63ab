use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use tracing::debug;

use crate::appointments::repo_types::{Appointment, AppointmentRow, OwnerSummary, StatusUpdate};
use crate::appointments::workflow::{self, Status, Transition};
use crate::error::RepoError;
use crate::ident;
use crate::users::repo_types::User;

impl Appointment {
    /// Insert a new appointment. Status is forced to `Pending` here, so a
    /// caller-supplied status never reaches the store; the owner reference
    /// is stored exactly as given.
    pub async fn create(
        db: &PgPool,
        user_id: &str,
        date: &str,
        preferred_time: &str,
        concern_type: &str,
    ) -> Result<Appointment, RepoError> {
        let id = ident::generate();
        let row = sqlx::query_as::<_, AppointmentRow>(
            r#"
            INSERT INTO appointments (id, user_id, date, preferred_time, concern_type, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, date, preferred_time, concern_type, status, attended, created_at
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(date)
        .bind(preferred_time)
        .bind(concern_type)
        .bind(Status::Pending.as_str())
        .fetch_one(db)
        .await?;

        Ok(row.into())
    }

    /// Lookup by id, trying each stored identifier form in order.
    pub async fn find_by_id(db: &PgPool, appointment_id: &str) -> Result<Option<Appointment>, RepoError> {
        for candidate in ident::candidates(appointment_id) {
            let row = sqlx::query_as::<_, AppointmentRow>(
                r#"
                SELECT id, user_id, date, preferred_time, concern_type, status, attended, created_at
                FROM appointments
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

    /// Appointments owned by a user, newest date first. The owner column
    /// holds whichever identifier form the creator supplied, so the match
    /// covers every equivalent form at once.
    pub async fn find_by_owner(db: &PgPool, owner_id: &str) -> Result<Vec<Appointment>, RepoError> {
        let candidates = ident::candidates(owner_id);
        let rows = sqlx::query_as::<_, AppointmentRow>(
            r#"
            SELECT id, user_id, date, preferred_time, concern_type, status, attended, created_at
            FROM appointments
            WHERE user_id = ANY($1)
            ORDER BY date DESC
            "#,
        )
        .bind(&candidates)
        .fetch_all(db)
        .await?;
        Ok(rows.into_iter().map(Appointment::from).collect())
    }

    /// Every appointment, newest created first.
    pub async fn list_all(db: &PgPool) -> Result<Vec<Appointment>, RepoError> {
        let rows = sqlx::query_as::<_, AppointmentRow>(
            r#"
            SELECT id, user_id, date, preferred_time, concern_type, status, attended, created_at
            FROM appointments
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows.into_iter().map(Appointment::from).collect())
    }

    /// Staff listing: every appointment joined to its owner, ordered by
    /// (date, preferred time). Left join, so appointments whose owner
    /// reference cannot be resolved still come back; those get a
    /// second-chance lookup through the reconciler before being reported
    /// as unknown.
    pub async fn list_all_with_owner_details(
        db: &PgPool,
    ) -> Result<Vec<(Appointment, OwnerSummary)>, RepoError> {
        let rows = sqlx::query_as::<_, JoinedRow>(
            r#"
            SELECT a.id, a.user_id, a.date, a.preferred_time, a.concern_type,
                   a.status, a.attended, a.created_at,
                   u.username AS owner_username, u.id_number AS owner_id_number
            FROM appointments a
            LEFT JOIN users u
              ON u.id = a.user_id
              OR replace(lower(u.id), '-', '') = replace(lower(a.user_id), '-', '')
            ORDER BY a.date ASC, a.preferred_time ASC
            "#,
        )
        .fetch_all(db)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let JoinedRow {
                id,
                user_id,
                date,
                preferred_time,
                concern_type,
                status,
                attended,
                created_at,
                owner_username,
                owner_id_number,
            } = row;

            let owner = match (owner_username, owner_id_number) {
                (Some(username), Some(id_number)) => OwnerSummary { username, id_number },
                _ => match User::find_by_id(db, &user_id).await? {
                    Some(user) => OwnerSummary {
                        username: user.username,
                        id_number: user.id_number,
                    },
                    None => {
                        debug!(appointment_id = %id, user_id = %user_id, "owner unresolved");
                        OwnerSummary::unknown()
                    }
                },
            };

            out.push((
                Appointment {
                    id,
                    user_id,
                    date,
                    preferred_time,
                    concern_type,
                    status: Status::parse(&status).unwrap_or_default(),
                    attended,
                    created_at,
                },
                owner,
            ));
        }
        Ok(out)
    }

    /// Validate the requested status, load the current record through the
    /// reconciler, apply the workflow rules, then write. Reports whether a
    /// value actually changed.
    pub async fn update_status(
        db: &PgPool,
        appointment_id: &str,
        requested: &str,
    ) -> Result<StatusUpdate, RepoError> {
        let Some(new_status) = Status::parse(requested) else {
            return Err(RepoError::Validation("Invalid status value".into()));
        };

        let Some(current) = Self::find_by_id(db, appointment_id).await? else {
            return Err(RepoError::NotFound("Appointment"));
        };

        if workflow::check_transition(current.status, new_status)? == Transition::Unchanged {
            debug!(appointment_id = %current.id, status = %new_status, "status already set");
            return Ok(StatusUpdate {
                status: new_status,
                changed: false,
            });
        }

        // current.id is the stored form the candidate loop resolved to.
        let result = sqlx::query("UPDATE appointments SET status = $1 WHERE id = $2")
            .bind(new_status.as_str())
            .bind(&current.id)
            .execute(db)
            .await?;

        Ok(StatusUpdate {
            status: new_status,
            changed: result.rows_affected() > 0,
        })
    }

    /// Flip the attended flag; no workflow rules apply. The update is
    /// attempted against each identifier form in turn.
    pub async fn update_attended(
        db: &PgPool,
        appointment_id: &str,
        attended: bool,
    ) -> Result<(), RepoError> {
        for candidate in ident::candidates(appointment_id) {
            let result = sqlx::query("UPDATE appointments SET attended = $1 WHERE id = $2")
                .bind(attended)
                .bind(&candidate)
                .execute(db)
                .await?;
            if result.rows_affected() > 0 {
                return Ok(());
            }
        }
        Err(RepoError::NotFound("Appointment"))
    }
}

#[derive(Debug, FromRow)]
struct JoinedRow {
    id: String,
    user_id: String,
    date: String,
    preferred_time: String,
    concern_type: String,
    status: String,
    attended: bool,
    created_at: OffsetDateTime,
    owner_username: Option<String>,
    owner_id_number: Option<String>,
}
