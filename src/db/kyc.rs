use crate::error::AppError;
use crate::market::now_unix_ms;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

const KYC_STATUS_KEY: &str = "kyc_status";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum KycStatus {
    #[default]
    NotSubmitted,
    Submitted,
}

impl KycStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotSubmitted => "not_submitted",
            Self::Submitted => "submitted",
        }
    }

    pub fn parse_str(value: &str) -> Result<Self, AppError> {
        match value.trim() {
            "not_submitted" => Ok(Self::NotSubmitted),
            "submitted" => Ok(Self::Submitted),
            other => Err(AppError::InvalidArgument(format!(
                "unsupported kyc status '{other}'"
            ))),
        }
    }
}

/// A missing row reads as never submitted.
pub async fn get_kyc_status(pool: &SqlitePool) -> Result<KycStatus, AppError> {
    let stored = sqlx::query_scalar::<_, String>("SELECT value FROM app_metadata WHERE key = ?")
        .bind(KYC_STATUS_KEY)
        .fetch_optional(pool)
        .await?;

    match stored {
        Some(value) => KycStatus::parse_str(&value),
        None => Ok(KycStatus::NotSubmitted),
    }
}

pub async fn save_kyc_status(pool: &SqlitePool, status: KycStatus) -> Result<KycStatus, AppError> {
    sqlx::query(
        "INSERT INTO app_metadata (key, value, updated_at_ms) VALUES (?, ?, ?) \
         ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at_ms=excluded.updated_at_ms",
    )
    .bind(KYC_STATUS_KEY)
    .bind(status.as_str())
    .bind(now_unix_ms())
    .execute(pool)
    .await?;

    get_kyc_status(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize_pool_from_path;
    use crate::db::tests::unique_db_path;

    #[tokio::test]
    async fn kyc_status_round_trips_and_survives_reopen() {
        let db_path = unique_db_path("kyc");
        let pool = initialize_pool_from_path(&db_path)
            .await
            .expect("pool initialization should succeed");

        assert_eq!(
            get_kyc_status(&pool).await.expect("read status"),
            KycStatus::NotSubmitted
        );
        assert_eq!(
            save_kyc_status(&pool, KycStatus::Submitted)
                .await
                .expect("save status"),
            KycStatus::Submitted
        );
        drop(pool);

        let reopened = initialize_pool_from_path(&db_path)
            .await
            .expect("reopen should succeed");
        assert_eq!(
            get_kyc_status(&reopened).await.expect("read status"),
            KycStatus::Submitted
        );

        let rows = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM app_metadata")
            .fetch_one(&reopened)
            .await
            .expect("count metadata rows");
        assert_eq!(rows, 2);

        drop(reopened);
        let _ = std::fs::remove_file(db_path);
    }

    #[test]
    fn rejects_unknown_status_text() {
        assert!(KycStatus::parse_str("approved").is_err());
        assert_eq!(
            KycStatus::parse_str("submitted").expect("known status"),
            KycStatus::Submitted
        );
    }
}
