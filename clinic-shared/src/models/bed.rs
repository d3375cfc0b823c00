/// Bed model and queries
///
/// Beds are read-only through the API. Rows come back verbatim from the
/// `beds` table, always ordered by `bed_number`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgExecutor;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Occupancy status a bed can be filtered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BedStatus {
    Available,
    Occupied,
    Maintenance,
    Reserved,
}

impl BedStatus {
    pub const ALL: [BedStatus; 4] = [
        BedStatus::Available,
        BedStatus::Occupied,
        BedStatus::Maintenance,
        BedStatus::Reserved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BedStatus::Available => "available",
            BedStatus::Occupied => "occupied",
            BedStatus::Maintenance => "maintenance",
            BedStatus::Reserved => "reserved",
        }
    }
}

impl fmt::Display for BedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown bed status: {0:?}")]
pub struct UnknownBedStatus(pub String);

impl FromStr for BedStatus {
    type Err = UnknownBedStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BedStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownBedStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bed {
    pub id: Uuid,
    pub bed_number: String,
    pub ward: Option<String>,
    pub bed_type: String,
    pub status: String,
    pub department_id: Option<Uuid>,
    pub patient_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bed {
    /// Lists beds ordered by bed number, optionally only those with `status`
    pub async fn list<'e, E>(executor: E, status: Option<BedStatus>) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        match status {
            Some(status) => {
                sqlx::query_as::<_, Bed>(
                    r#"
                    SELECT id, bed_number, ward, bed_type, status, department_id, patient_id,
                           created_at, updated_at
                    FROM beds
                    WHERE status = $1
                    ORDER BY bed_number
                    "#,
                )
                .bind(status.as_str())
                .fetch_all(executor)
                .await
            }
            None => {
                sqlx::query_as::<_, Bed>(
                    r#"
                    SELECT id, bed_number, ward, bed_type, status, department_id, patient_id,
                           created_at, updated_at
                    FROM beds
                    ORDER BY bed_number
                    "#,
                )
                .fetch_all(executor)
                .await
            }
        }
    }

    /// Finds one bed by id
    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Bed>(
            r#"
            SELECT id, bed_number, ward, bed_type, status, department_id, patient_id,
                   created_at, updated_at
            FROM beds
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }
}
