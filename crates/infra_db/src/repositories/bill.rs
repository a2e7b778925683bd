//! Bill repository implementation
//!
//! Each bill is one row: scalar totals plus the embedded item and payment
//! sequences as JSONB. Reads and writes therefore move the whole aggregate
//! at once, matching the read-modify-write lifecycle of the domain.
//!
//! Bill numbers are reserved through `bill_number_seq`, the database's
//! atomic counter, so two concurrent creations can never observe the same
//! sequence value.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

use core_kernel::{BillId, Money, PatientId};
use domain_billing::stats::MonthWindows;
use domain_billing::{Bill, BillStatus, BillingStats, LineItem, Payment, PatientSummary};

use crate::error::DatabaseError;

/// Repository for managing bills
#[derive(Debug, Clone)]
pub struct BillRepository {
    pool: PgPool,
}

/// Filter for listing and exporting bills; `None` fields match everything
#[derive(Debug, Clone, Default)]
pub struct BillFilter {
    /// Restrict to specific bills
    pub ids: Option<Vec<Uuid>>,
    /// Restrict to one status (wire form, e.g. `"partial"`)
    pub status: Option<String>,
    /// Restrict to one patient
    pub patient_id: Option<Uuid>,
    /// Created on or after
    pub start_date: Option<DateTime<Utc>>,
    /// Created on or before
    pub end_date: Option<DateTime<Utc>>,
}

impl BillRepository {
    /// Creates a new BillRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Reserves the next bill-number sequence value.
    ///
    /// `nextval` is atomic: concurrent callers each get a distinct value,
    /// which is what makes bill numbers unique under concurrent creation.
    pub async fn next_bill_sequence(&self) -> Result<i64, DatabaseError> {
        Ok(
            sqlx::query_scalar::<_, i64>("SELECT nextval('bill_number_seq')")
                .fetch_one(&self.pool)
                .await?,
        )
    }

    /// Inserts a new bill
    #[instrument(skip(self, bill), fields(bill_number = %bill.bill_number))]
    pub async fn create(&self, bill: &Bill) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO bills (
                bill_id, bill_number, patient_id, items, subtotal, tax,
                discount, total_amount, paid_amount, status, payments,
                notes, due_date, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(bill.id.as_uuid())
        .bind(bill.bill_number.as_str())
        .bind(bill.patient_id.as_uuid())
        .bind(Json(&bill.items))
        .bind(bill.subtotal.amount())
        .bind(bill.tax.amount())
        .bind(bill.discount.amount())
        .bind(bill.total_amount.amount())
        .bind(bill.paid_amount.amount())
        .bind(bill.status.as_str())
        .bind(Json(&bill.payments))
        .bind(&bill.notes)
        .bind(bill.due_date)
        .bind(bill.created_at)
        .bind(bill.updated_at)
        .execute(&self.pool)
        .await?;

        debug!("bill created");
        Ok(())
    }

    /// Retrieves a bill by id
    pub async fn get(&self, bill_id: Uuid) -> Result<Bill, DatabaseError> {
        let row = sqlx::query_as::<_, BillRow>("SELECT * FROM bills WHERE bill_id = $1")
            .bind(bill_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Bill", bill_id))?;

        row.into_bill()
    }

    /// Retrieves a bill together with its patient summary, if the patient
    /// link still resolves
    pub async fn get_with_patient(
        &self,
        bill_id: Uuid,
    ) -> Result<(Bill, Option<PatientSummary>), DatabaseError> {
        let row = sqlx::query_as::<_, BillWithPatientRow>(
            r#"
            SELECT b.*, p.name AS patient_name, p.email AS patient_email,
                   p.phone AS patient_phone
            FROM bills b
            LEFT JOIN patients p ON p.patient_id = b.patient_id
            WHERE b.bill_id = $1
            "#,
        )
        .bind(bill_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Bill", bill_id))?;

        row.into_pair()
    }

    /// Writes back a mutated bill, replacing the whole aggregate
    pub async fn update(&self, bill: &Bill) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE bills
            SET items = $2, subtotal = $3, tax = $4, discount = $5,
                total_amount = $6, paid_amount = $7, status = $8,
                payments = $9, notes = $10, due_date = $11, updated_at = $12
            WHERE bill_id = $1
            "#,
        )
        .bind(bill.id.as_uuid())
        .bind(Json(&bill.items))
        .bind(bill.subtotal.amount())
        .bind(bill.tax.amount())
        .bind(bill.discount.amount())
        .bind(bill.total_amount.amount())
        .bind(bill.paid_amount.amount())
        .bind(bill.status.as_str())
        .bind(Json(&bill.payments))
        .bind(&bill.notes)
        .bind(bill.due_date)
        .bind(bill.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Bill", bill.id));
        }
        Ok(())
    }

    /// Deletes a bill. Unconditional: payment history does not block it.
    pub async fn delete(&self, bill_id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM bills WHERE bill_id = $1")
            .bind(bill_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Bill", bill_id));
        }
        debug!(%bill_id, "bill deleted");
        Ok(())
    }

    /// Lists bills newest first with their patient summaries
    pub async fn list(
        &self,
        filter: &BillFilter,
    ) -> Result<Vec<(Bill, Option<PatientSummary>)>, DatabaseError> {
        let rows = sqlx::query_as::<_, BillWithPatientRow>(
            r#"
            SELECT b.*, p.name AS patient_name, p.email AS patient_email,
                   p.phone AS patient_phone
            FROM bills b
            LEFT JOIN patients p ON p.patient_id = b.patient_id
            WHERE ($1::uuid[] IS NULL OR b.bill_id = ANY($1))
              AND ($2::text IS NULL OR b.status = $2)
              AND ($3::uuid IS NULL OR b.patient_id = $3)
              AND ($4::timestamptz IS NULL OR b.created_at >= $4)
              AND ($5::timestamptz IS NULL OR b.created_at <= $5)
            ORDER BY b.created_at DESC
            "#,
        )
        .bind(&filter.ids)
        .bind(&filter.status)
        .bind(filter.patient_id)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(BillWithPatientRow::into_pair).collect()
    }

    /// Deletes a set of bills; returns how many went
    pub async fn bulk_delete(&self, ids: &[Uuid]) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM bills WHERE bill_id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Applies a bulk edit to a set of bills; returns how many changed.
    ///
    /// The status column follows the manual-edit rule: `cancelled` is
    /// applied verbatim, any other requested status is replaced by the
    /// value derived from what is paid against what is owed.
    pub async fn bulk_update(
        &self,
        ids: &[Uuid],
        status: Option<BillStatus>,
        notes: Option<String>,
        due_date: Option<NaiveDate>,
    ) -> Result<u64, DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE bills
            SET status = CASE
                    WHEN $2::text IS NULL THEN status
                    WHEN $2 = 'cancelled' THEN 'cancelled'
                    WHEN paid_amount >= total_amount THEN 'paid'
                    WHEN paid_amount > 0 THEN 'partial'
                    ELSE 'pending'
                END,
                notes = COALESCE($3, notes),
                due_date = COALESCE($4, due_date),
                updated_at = $5
            WHERE bill_id = ANY($1)
            "#,
        )
        .bind(ids)
        .bind(status.map(|s| s.as_str()))
        .bind(notes)
        .bind(due_date)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Computes the dashboard aggregates for the given reporting windows
    #[instrument(skip(self, windows))]
    pub async fn stats(
        &self,
        windows: &MonthWindows,
        total_patients: i64,
    ) -> Result<BillingStats, DatabaseError> {
        let row = sqlx::query_as::<_, StatsRow>(
            r#"
            SELECT
                COUNT(*) AS total_bills,
                COUNT(*) FILTER (WHERE status IN ('pending', 'partial')) AS pending_bills,
                COUNT(*) FILTER (WHERE status = 'paid') AS paid_bills,
                COALESCE(SUM(paid_amount), 0) AS total_revenue,
                COALESCE(SUM(paid_amount) FILTER (WHERE created_at >= $1), 0) AS monthly_revenue,
                COALESCE(SUM(paid_amount) FILTER (WHERE created_at >= $2 AND created_at < $1), 0)
                    AS last_month_revenue,
                COUNT(*) FILTER (WHERE created_at >= $3) AS today_bills,
                COALESCE(SUM(total_amount - paid_amount)
                    FILTER (WHERE status IN ('pending', 'partial')), 0) AS pending_amount,
                COUNT(*) FILTER (WHERE created_at >= $1) AS monthly_bills,
                COUNT(*) FILTER (WHERE created_at >= $2 AND created_at < $1) AS last_month_bills
            FROM bills
            "#,
        )
        .bind(windows.month_start)
        .bind(windows.last_month_start)
        .bind(windows.today_start)
        .fetch_one(&self.pool)
        .await?;

        Ok(BillingStats {
            total_bills: row.total_bills,
            pending_bills: row.pending_bills,
            paid_bills: row.paid_bills,
            total_revenue: Money::new(row.total_revenue),
            monthly_revenue: Money::new(row.monthly_revenue),
            last_month_revenue: Money::new(row.last_month_revenue),
            today_bills: row.today_bills,
            pending_amount: Money::new(row.pending_amount),
            // Same aggregate as total revenue: every rupee received
            total_paid_amount: Money::new(row.total_revenue),
            total_patients,
            monthly_bills: row.monthly_bills,
            last_month_bills: row.last_month_bills,
            ..Default::default()
        }
        .finalize())
    }
}

/// Database row for a bill
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BillRow {
    pub bill_id: Uuid,
    pub bill_number: String,
    pub patient_id: Uuid,
    pub items: Json<Vec<LineItem>>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub discount: Decimal,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub status: String,
    pub payments: Json<Vec<Payment>>,
    pub notes: Option<String>,
    pub due_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BillRow {
    /// Rebuilds the domain aggregate from the stored row
    pub fn into_bill(self) -> Result<Bill, DatabaseError> {
        let bill_number = self
            .bill_number
            .parse()
            .map_err(|_| DatabaseError::SerializationError(format!(
                "stored bill number '{}' is malformed",
                self.bill_number
            )))?;
        let status: BillStatus = self
            .status
            .parse()
            .map_err(|_| DatabaseError::SerializationError(format!(
                "stored bill status '{}' is unknown",
                self.status
            )))?;

        Ok(Bill {
            id: BillId::from_uuid(self.bill_id),
            bill_number,
            patient_id: PatientId::from_uuid(self.patient_id),
            items: self.items.0,
            subtotal: Money::new(self.subtotal),
            tax: Money::new(self.tax),
            discount: Money::new(self.discount),
            total_amount: Money::new(self.total_amount),
            paid_amount: Money::new(self.paid_amount),
            status,
            payments: self.payments.0,
            notes: self.notes,
            due_date: self.due_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Bill row joined with its patient's contact summary
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BillWithPatientRow {
    #[sqlx(flatten)]
    pub bill: BillRow,
    pub patient_name: Option<String>,
    pub patient_email: Option<String>,
    pub patient_phone: Option<String>,
}

impl BillWithPatientRow {
    fn into_pair(self) -> Result<(Bill, Option<PatientSummary>), DatabaseError> {
        let summary = self.patient_name.map(|name| PatientSummary {
            id: PatientId::from_uuid(self.bill.patient_id),
            name,
            email: self.patient_email.unwrap_or_default(),
            phone: self.patient_phone.unwrap_or_default(),
        });
        Ok((self.bill.into_bill()?, summary))
    }
}

/// Aggregate row for the dashboard query
#[derive(Debug, sqlx::FromRow)]
struct StatsRow {
    total_bills: i64,
    pending_bills: i64,
    paid_bills: i64,
    total_revenue: Decimal,
    monthly_revenue: Decimal,
    last_month_revenue: Decimal,
    today_bills: i64,
    pending_amount: Decimal,
    monthly_bills: i64,
    last_month_bills: i64,
}
