//! DB Repository abstractions

use crate::infrastructure::database::DatabaseConnection;
use crate::infrastructure::entities::{Coach, Consultation, TimeSlot};
use crate::infrastructure::traits::{RepositoryError, SchedulingRepository};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use di::{Ref, injectable};
use log::error;
use sqlx::{QueryBuilder, Sqlite};
use uuid::Uuid;

#[injectable(SchedulingRepository)]
pub struct DbSchedulingRepository {
    connection: Ref<DatabaseConnection>,
}

#[async_trait]
impl SchedulingRepository for DbSchedulingRepository {
    async fn list_coaches(&self, active_only: bool) -> Result<Vec<Coach>, RepositoryError> {
        let query = if active_only {
            "SELECT * FROM coaches WHERE is_active = 1 ORDER BY name ASC"
        } else {
            "SELECT * FROM coaches ORDER BY name ASC"
        };

        Ok(sqlx::query_as(query)
            .fetch_all(&**self.connection)
            .await
            .inspect_err(|e| error!("{e}"))?)
    }

    async fn find_coach(&self, coach_id: Uuid) -> Result<Option<Coach>, RepositoryError> {
        Ok(sqlx::query_as("SELECT * FROM coaches WHERE id = ?")
            .bind(coach_id)
            .fetch_optional(&**self.connection)
            .await
            .inspect_err(|e| error!("{e}"))?)
    }

    async fn count_coaches(&self) -> Result<i64, RepositoryError> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM coaches")
            .fetch_one(&**self.connection)
            .await
            .inspect_err(|e| error!("{e}"))?)
    }

    async fn insert_coaches(&self, coaches: Vec<Coach>) -> Result<(), RepositoryError> {
        let mut tx = self.connection.begin().await?;

        for coach in coaches {
            sqlx::query(
                "INSERT INTO coaches (id, name, email, specialty, image, timezone, is_active, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(coach.id)
            .bind(coach.name)
            .bind(coach.email)
            .bind(coach.specialty)
            .bind(coach.image)
            .bind(coach.timezone)
            .bind(coach.is_active)
            .bind(coach.created_at)
            .execute(&mut *tx)
            .await
            .inspect_err(|e| error!("{e}"))?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn list_open_slots(
        &self,
        coach_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<TimeSlot>, RepositoryError> {
        Ok(sqlx::query_as(
            "SELECT * FROM time_slots WHERE coach_id = ? AND date = ? AND is_available = 1 ORDER BY start_time ASC",
        )
        .bind(coach_id)
        .bind(date)
        .fetch_all(&**self.connection)
        .await
        .inspect_err(|e| error!("{e}"))?)
    }

    async fn list_booked_times(
        &self,
        coach_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<NaiveTime>, RepositoryError> {
        Ok(sqlx::query_scalar(
            "SELECT consultation_time FROM consultations WHERE coach_id = ? AND consultation_date = ? AND status IN ('pending', 'confirmed')",
        )
        .bind(coach_id)
        .bind(date)
        .fetch_all(&**self.connection)
        .await
        .inspect_err(|e| error!("{e}"))?)
    }

    async fn list_all_slots(&self) -> Result<Vec<TimeSlot>, RepositoryError> {
        Ok(
            sqlx::query_as("SELECT * FROM time_slots ORDER BY date ASC, start_time ASC")
                .fetch_all(&**self.connection)
                .await
                .inspect_err(|e| error!("{e}"))?,
        )
    }

    async fn insert_slots(&self, slots: &[TimeSlot]) -> Result<u64, RepositoryError> {
        if slots.is_empty() {
            return Ok(0);
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "INSERT OR IGNORE INTO time_slots (id, coach_id, date, start_time, end_time, is_available, created_at) ",
        );
        builder.push_values(slots, |mut row, slot| {
            row.push_bind(slot.id)
                .push_bind(slot.coach_id)
                .push_bind(slot.date)
                .push_bind(slot.start_time)
                .push_bind(slot.end_time)
                .push_bind(slot.is_available)
                .push_bind(slot.created_at);
        });

        let result = builder
            .build()
            .execute(&**self.connection)
            .await
            .inspect_err(|e| error!("{e}"))?;

        Ok(result.rows_affected())
    }

    async fn delete_all_slots(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM time_slots")
            .execute(&**self.connection)
            .await
            .inspect_err(|e| error!("{e}"))?;

        Ok(result.rows_affected())
    }

    async fn list_consultations(&self) -> Result<Vec<Consultation>, RepositoryError> {
        Ok(
            sqlx::query_as("SELECT * FROM consultations ORDER BY datetime(created_at) ASC")
                .fetch_all(&**self.connection)
                .await
                .inspect_err(|e| error!("{e}"))?,
        )
    }

    async fn create_consultation(
        &self,
        consultation: Consultation,
    ) -> Result<Consultation, RepositoryError> {
        // take the write lock up front so a concurrent booking waits instead of failing on upgrade
        let mut tx = self.connection.begin_with("BEGIN IMMEDIATE").await?;

        if let Some(coach_id) = consultation.coach_id {
            let booked: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM consultations WHERE coach_id = ? AND consultation_date = ? AND consultation_time = ? AND status IN ('pending', 'confirmed')",
            )
            .bind(coach_id)
            .bind(consultation.consultation_date)
            .bind(consultation.consultation_time)
            .fetch_one(&mut *tx)
            .await?;

            if booked > 0 {
                return Err(RepositoryError::SlotTaken);
            }
        }

        let inserted = sqlx::query_as(
            "INSERT INTO consultations (id, coach_id, client_name, client_email, client_phone, consultation_date, consultation_time, duration_minutes, status, client_goals, client_experience, notes, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(consultation.id)
        .bind(consultation.coach_id)
        .bind(consultation.client_name)
        .bind(consultation.client_email)
        .bind(consultation.client_phone)
        .bind(consultation.consultation_date)
        .bind(consultation.consultation_time)
        .bind(consultation.duration_minutes)
        .bind(consultation.status)
        .bind(consultation.client_goals)
        .bind(consultation.client_experience)
        .bind(consultation.notes)
        .bind(consultation.created_at)
        .bind(consultation.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => RepositoryError::SlotTaken,
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                RepositoryError::UnknownCoach
            }
            e => {
                error!("{e}");
                RepositoryError::Database(e)
            }
        })?;

        tx.commit().await?;
        Ok(inserted)
    }
}
