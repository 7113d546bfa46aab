use std::collections::BTreeMap;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dao::models::GameFilter,
    dto::jobs::ReminderReport,
    error::ServiceError,
    services::mailer::MailMessage,
    state::SharedState,
};

/// Email every user that has at least one unfinished game.
///
/// Users without an email address are skipped. A failed delivery is counted
/// and does not stop the run.
pub async fn send_reminders(state: &SharedState) -> Result<ReminderReport, ServiceError> {
    let store = state.require_game_store().await?;
    let games = store.list_games(GameFilter::active()).await?;

    let mut pending: BTreeMap<Uuid, Vec<Uuid>> = BTreeMap::new();
    for game in games {
        pending.entry(game.user_id).or_default().push(game.id);
    }

    let mail = &state.config().mail;
    let mut report = ReminderReport::default();
    for (user_id, game_ids) in pending {
        let Some(user) = store.find_user(user_id).await? else {
            warn!(%user_id, "owner of active games not found; skipping reminder");
            continue;
        };
        let Some(email) = user.email else {
            debug!(user_name = %user.name, "user has no email; skipping reminder");
            continue;
        };

        let message = MailMessage {
            from: mail.sender.clone(),
            to: email,
            subject: mail.subject.clone(),
            body: reminder_body(&user.name, &game_ids),
        };
        match state.mailer().send(message).await {
            Ok(()) => report.notified += 1,
            Err(err) => {
                warn!(user_name = %user.name, error = %err, "failed to send reminder");
                report.failed += 1;
            }
        }
    }

    info!(
        notified = report.notified,
        failed = report.failed,
        "reminder run finished"
    );
    Ok(report)
}

fn reminder_body(user_name: &str, game_ids: &[Uuid]) -> String {
    let mut body = format!(
        "Hello {user_name}, This is a reminder that you have Hangman game in progress! \
         Let's play and have some fun!\n\nUnfinished games: {}\n",
        game_ids.len()
    );
    for id in game_ids {
        body.push_str(&format!("- {id}\n"));
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_greets_user_and_lists_games() {
        let games = [Uuid::new_v4(), Uuid::new_v4()];

        let body = reminder_body("ada", &games);

        assert!(body.starts_with(
            "Hello ada, This is a reminder that you have Hangman game in progress!"
        ));
        assert!(body.contains("Unfinished games: 2"));
        assert!(games.iter().all(|id| body.contains(&format!("- {id}"))));
    }
}
