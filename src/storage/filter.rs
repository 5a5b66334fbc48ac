use crate::storage::month::YearMonth;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

const TOTAL_SQL: &str = "SELECT COALESCE(SUM(price), 0) FROM subscriptions";

/// One `WHERE` term of the total query together with the value it binds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    UserId(Uuid),
    ServiceName(String),
    StartFrom(YearMonth),
}

impl Condition {
    fn clause(&self) -> &'static str {
        match self {
            Condition::UserId(_) => "user_id = ",
            Condition::ServiceName(_) => "service_name = ",
            Condition::StartFrom(_) => "start_date >= ",
        }
    }
}

/// Optional, conjunctive filters for the price total.
///
/// An absent field imposes no constraint. With no fields set the query sums
/// the whole table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TotalFilter {
    pub user_id: Option<Uuid>,
    pub service_name: Option<String>,
    pub start_from: Option<YearMonth>,
}

impl TotalFilter {
    /// Conditions in the order their placeholders are numbered.
    pub fn conditions(&self) -> Vec<Condition> {
        let mut conditions = Vec::with_capacity(3);
        if let Some(user_id) = self.user_id {
            conditions.push(Condition::UserId(user_id));
        }
        if let Some(service_name) = &self.service_name {
            conditions.push(Condition::ServiceName(service_name.clone()));
        }
        if let Some(start_from) = self.start_from {
            conditions.push(Condition::StartFrom(start_from));
        }
        conditions
    }

    /// Builds `SELECT COALESCE(SUM(price), 0) ...` with every value bound.
    pub fn build_query(&self) -> QueryBuilder<'static, Postgres> {
        let mut query = QueryBuilder::new(TOTAL_SQL);

        for (i, condition) in self.conditions().into_iter().enumerate() {
            query.push(if i == 0 { " WHERE " } else { " AND " });
            query.push(condition.clause());
            match condition {
                Condition::UserId(user_id) => {
                    query.push_bind(user_id);
                }
                Condition::ServiceName(service_name) => {
                    query.push_bind(service_name);
                }
                Condition::StartFrom(month) => {
                    query.push_bind(month.first_day());
                }
            }
        }

        query
    }
}
