use crate::db::kyc::{get_kyc_status, save_kyc_status, KycStatus};
use crate::error::AppError;
use crate::state::AppState;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveKycStatusArgs {
    pub status: KycStatus,
}

pub async fn kyc_status_get(state: &AppState) -> Result<KycStatus, AppError> {
    get_kyc_status(&state.db_pool).await
}

pub async fn kyc_status_save(
    state: &AppState,
    args: SaveKycStatusArgs,
) -> Result<KycStatus, AppError> {
    save_kyc_status(&state.db_pool, args.status).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_state, unreachable_endpoints};

    #[tokio::test]
    async fn submitting_kyc_flips_the_flag() {
        let state = test_state(unreachable_endpoints()).await;

        assert_eq!(
            kyc_status_get(&state).await.expect("read flag"),
            KycStatus::NotSubmitted
        );
        let saved = kyc_status_save(
            &state,
            SaveKycStatusArgs {
                status: KycStatus::Submitted,
            },
        )
        .await
        .expect("save flag");
        assert_eq!(saved, KycStatus::Submitted);
        assert_eq!(
            kyc_status_get(&state).await.expect("read flag"),
            KycStatus::Submitted
        );
    }
}
