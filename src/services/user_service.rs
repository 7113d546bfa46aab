use tracing::info;

use crate::{
    dto::{common::StringMessage, user::CreateUserRequest},
    error::ServiceError,
    state::{SharedState, user::Player},
};

/// Register a user with a unique name and email.
pub async fn create_user(
    state: &SharedState,
    request: CreateUserRequest,
) -> Result<StringMessage, ServiceError> {
    let name = request.user_name.trim();
    let email = request.email.trim();
    if name.is_empty() {
        return Err(ServiceError::InvalidInput(
            "You must enter a user name to create a new user!".into(),
        ));
    }
    if email.is_empty() {
        return Err(ServiceError::InvalidInput(
            "You must enter an email id to create a new user!".into(),
        ));
    }

    let store = state.require_game_store().await?;
    if store.find_user_by_name(name.to_owned()).await?.is_some() {
        return Err(ServiceError::Conflict(format!(
            "A User with username {name} already exists!"
        )));
    }
    if store.find_user_by_email(email.to_owned()).await?.is_some() {
        return Err(ServiceError::Conflict(format!(
            "A User with email {email} already exists!"
        )));
    }

    let player = Player::new(name, Some(email.to_owned()));
    let user_id = player.id;
    store.save_user(player.into()).await?;

    info!(%user_id, user_name = name, "user created");
    Ok(StringMessage::new(format!("User {name} created!")))
}
