use std::{collections::HashMap, sync::Arc};

use tracing::warn;
use uuid::Uuid;

use crate::{
    dao::{
        game_store::GameStore,
        models::{ScoreEntity, ScoreFilter},
    },
    dto::{score::ScoreSummary, user::UserSummary},
    error::ServiceError,
    services::ranking,
    state::SharedState,
};

/// Every recorded score.
pub async fn get_scores(state: &SharedState) -> Result<Vec<ScoreSummary>, ServiceError> {
    let store = state.require_game_store().await?;
    let scores = store.list_scores(ScoreFilter::default()).await?;
    summarize(&store, scores).await
}

/// Scores recorded for one user.
pub async fn get_user_scores(
    state: &SharedState,
    user_name: &str,
) -> Result<Vec<ScoreSummary>, ServiceError> {
    let store = state.require_game_store().await?;
    let Some(user) = store.find_user_by_name(user_name.to_owned()).await? else {
        return Err(ServiceError::NotFound(
            "A user with that name does not exist!".into(),
        ));
    };

    let scores = store.list_scores(ScoreFilter::for_user(user.id)).await?;
    Ok(scores
        .iter()
        .map(|score| ScoreSummary::new(score, user.name.clone()))
        .collect())
}

/// Leaderboard of winning scores.
pub async fn get_high_scores(
    state: &SharedState,
    number_of_results: Option<usize>,
) -> Result<Vec<ScoreSummary>, ServiceError> {
    let store = state.require_game_store().await?;
    let limit = number_of_results.unwrap_or(state.config().high_scores_limit);

    let scores = store.list_scores(ScoreFilter::wins()).await?;
    let ranked = ranking::rank_high_scores(scores, limit);
    if ranked.is_empty() {
        return Err(ServiceError::NotFound(
            "No scores found for any users!".into(),
        ));
    }

    summarize(&store, ranked).await
}

/// Users ordered by win ratio.
pub async fn get_user_rankings(state: &SharedState) -> Result<Vec<UserSummary>, ServiceError> {
    let store = state.require_game_store().await?;
    let ranked = ranking::rank_users(store.list_users().await?);
    if ranked.is_empty() {
        return Err(ServiceError::NotFound("Cannot find any users!".into()));
    }

    Ok(ranked.into_iter().map(UserSummary::from).collect())
}

async fn summarize(
    store: &Arc<dyn GameStore>,
    scores: Vec<ScoreEntity>,
) -> Result<Vec<ScoreSummary>, ServiceError> {
    let names: HashMap<Uuid, String> = store
        .list_users()
        .await?
        .into_iter()
        .map(|user| (user.id, user.name))
        .collect();

    Ok(scores
        .iter()
        .map(|score| {
            let name = names.get(&score.user_id).cloned().unwrap_or_else(|| {
                warn!(score_id = %score.id, user_id = %score.user_id, "score owner not found");
                String::new()
            });
            ScoreSummary::new(score, name)
        })
        .collect())
}
