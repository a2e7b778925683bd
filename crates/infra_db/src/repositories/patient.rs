//! Patient repository implementation
//!
//! This module provides database access for the patient registry. The
//! optional cascade onto a patient's bills runs inside a single
//! transaction: either the bills and the patient go together, or neither
//! does.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

use core_kernel::PatientId;
use domain_patient::Patient;

use crate::error::DatabaseError;

/// Repository for managing patient records
#[derive(Debug, Clone)]
pub struct PatientRepository {
    pool: PgPool,
}

/// One page of the patient listing
#[derive(Debug, Clone)]
pub struct PatientPage {
    pub patients: Vec<Patient>,
    /// Total records matching the search, across all pages
    pub total: i64,
}

impl PatientRepository {
    /// Creates a new PatientRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new patient
    #[instrument(skip(self, patient), fields(patient_id = %patient.id))]
    pub async fn create(&self, patient: &Patient) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO patients (
                patient_id, name, email, phone, address, date_of_birth,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(patient.id.as_uuid())
        .bind(&patient.name)
        .bind(&patient.email)
        .bind(&patient.phone)
        .bind(&patient.address)
        .bind(patient.date_of_birth)
        .bind(patient.created_at)
        .bind(patient.updated_at)
        .execute(&self.pool)
        .await?;

        debug!("patient created");
        Ok(())
    }

    /// Retrieves a patient by id
    pub async fn get(&self, patient_id: Uuid) -> Result<Patient, DatabaseError> {
        let row = sqlx::query_as::<_, PatientRow>(
            "SELECT * FROM patients WHERE patient_id = $1",
        )
        .bind(patient_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Patient", patient_id))?;

        Ok(row.into())
    }

    /// Writes back an updated patient
    pub async fn update(&self, patient: &Patient) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE patients
            SET name = $2, email = $3, phone = $4, address = $5,
                date_of_birth = $6, updated_at = $7
            WHERE patient_id = $1
            "#,
        )
        .bind(patient.id.as_uuid())
        .bind(&patient.name)
        .bind(&patient.email)
        .bind(&patient.phone)
        .bind(&patient.address)
        .bind(patient.date_of_birth)
        .bind(patient.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Patient", patient.id));
        }
        Ok(())
    }

    /// Lists patients newest first, optionally filtered by a
    /// case-insensitive search over name, phone and email
    pub async fn list(
        &self,
        search: Option<&str>,
        page: u32,
        limit: u32,
    ) -> Result<PatientPage, DatabaseError> {
        let pattern = search
            .filter(|s| !s.trim().is_empty())
            .map(|s| format!("%{}%", s.trim()));
        let offset = i64::from(page.saturating_sub(1)) * i64::from(limit);

        let rows = sqlx::query_as::<_, PatientRow>(
            r#"
            SELECT * FROM patients
            WHERE ($1::text IS NULL OR name ILIKE $1 OR phone ILIKE $1 OR email ILIKE $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&pattern)
        .bind(i64::from(limit))
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM patients
            WHERE ($1::text IS NULL OR name ILIKE $1 OR phone ILIKE $1 OR email ILIKE $1)
            "#,
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        Ok(PatientPage {
            patients: rows.into_iter().map(Into::into).collect(),
            total,
        })
    }

    /// Fetches patients for export, newest first; `ids = None` exports all
    pub async fn find_for_export(
        &self,
        ids: Option<&[Uuid]>,
    ) -> Result<Vec<Patient>, DatabaseError> {
        let rows = sqlx::query_as::<_, PatientRow>(
            r#"
            SELECT * FROM patients
            WHERE ($1::uuid[] IS NULL OR patient_id = ANY($1))
            ORDER BY created_at DESC
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Total number of registered patients
    pub async fn count(&self) -> Result<i64, DatabaseError> {
        Ok(sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM patients")
            .fetch_one(&self.pool)
            .await?)
    }

    /// Deletes one patient, optionally cascading onto their bills.
    ///
    /// The cascade and the patient delete share one transaction. Returns
    /// the number of bills deleted.
    #[instrument(skip(self))]
    pub async fn delete(
        &self,
        patient_id: Uuid,
        delete_bills: bool,
    ) -> Result<u64, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let bills_deleted = if delete_bills {
            sqlx::query("DELETE FROM bills WHERE patient_id = $1")
                .bind(patient_id)
                .execute(&mut *tx)
                .await?
                .rows_affected()
        } else {
            0
        };

        let result = sqlx::query("DELETE FROM patients WHERE patient_id = $1")
            .bind(patient_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            // Roll back any cascaded bill deletes for a missing patient
            tx.rollback().await?;
            return Err(DatabaseError::not_found("Patient", patient_id));
        }

        tx.commit().await?;
        debug!(%patient_id, bills_deleted, "patient deleted");
        Ok(bills_deleted)
    }

    /// Deletes a set of patients, optionally cascading onto their bills,
    /// in one transaction. Returns `(patients_deleted, bills_deleted)`.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn bulk_delete(
        &self,
        ids: &[Uuid],
        delete_bills: bool,
    ) -> Result<(u64, u64), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let bills_deleted = if delete_bills {
            sqlx::query("DELETE FROM bills WHERE patient_id = ANY($1)")
                .bind(ids)
                .execute(&mut *tx)
                .await?
                .rows_affected()
        } else {
            0
        };

        let patients_deleted = sqlx::query("DELETE FROM patients WHERE patient_id = ANY($1)")
            .bind(ids)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        Ok((patients_deleted, bills_deleted))
    }
}

/// Database row for a patient
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PatientRow {
    pub patient_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub date_of_birth: chrono::NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PatientRow> for Patient {
    fn from(row: PatientRow) -> Self {
        Patient {
            id: PatientId::from_uuid(row.patient_id),
            name: row.name,
            email: row.email,
            phone: row.phone,
            address: row.address,
            date_of_birth: row.date_of_birth,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
