use crate::storage::filter::TotalFilter;
use crate::storage::month::YearMonth;
use crate::storage::subscription::{Subscription, SubscriptionChanges};
use chrono::NaiveDate;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// PostgreSQL-backed access to the `subscriptions` table.
///
/// Every method issues exactly one statement against the shared pool.
#[derive(Clone)]
pub struct SubscriptionStore {
    pool: PgPool,
}

impl SubscriptionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, sub: &Subscription) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"INSERT INTO subscriptions (id, service_name, price, user_id, start_date, end_date)
               VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(sub.id)
        .bind(&sub.service_name)
        .bind(sub.price)
        .bind(sub.user_id)
        .bind(sub.start_date.first_day())
        .bind(sub.end_date.map(|m| m.first_day()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<Subscription>, sqlx::Error> {
        let rows = sqlx::query(
            r#"SELECT id, service_name, price, user_id, start_date, end_date
               FROM subscriptions
               ORDER BY start_date, id"#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(subscription_from_row).collect()
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Subscription>, sqlx::Error> {
        let row = sqlx::query(
            r#"SELECT id, service_name, price, user_id, start_date, end_date
               FROM subscriptions
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(subscription_from_row).transpose()
    }

    pub async fn total(&self, filter: &TotalFilter) -> Result<i64, sqlx::Error> {
        let mut query = filter.build_query();
        query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
    }

    /// Returns the number of rows matched, which may be zero.
    pub async fn update(&self, id: Uuid, changes: &SubscriptionChanges) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"UPDATE subscriptions
               SET service_name = $1, price = $2, start_date = $3, end_date = $4
               WHERE id = $5"#,
        )
        .bind(&changes.service_name)
        .bind(changes.price)
        .bind(changes.start_date.first_day())
        .bind(changes.end_date.map(|m| m.first_day()))
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

fn subscription_from_row(row: &PgRow) -> Result<Subscription, sqlx::Error> {
    let start_date: NaiveDate = row.try_get("start_date")?;
    let end_date: Option<NaiveDate> = row.try_get("end_date")?;

    Ok(Subscription {
        id: row.try_get("id")?,
        service_name: row.try_get("service_name")?,
        price: row.try_get("price")?,
        user_id: row.try_get("user_id")?,
        start_date: YearMonth::from_date(start_date),
        end_date: end_date.map(YearMonth::from_date),
    })
}
