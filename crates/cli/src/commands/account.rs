//! `account` commands.

use shopvely_client::ApiError;
use shopvely_client::gateways::account::PasswordChange;

use super::{CommandError, Context, emit, prompt_secret};
use crate::render;

/// Read current, new and confirmation passwords and submit the change.
pub async fn change_password(ctx: &Context) -> Result<(), CommandError> {
    let current = prompt_secret("Current password")?;
    let new = prompt_secret("New password")?;
    let confirm = prompt_secret("Confirm new password")?;

    let result = match PasswordChange::new(current, new, &confirm) {
        Ok(change) => change.submit(&ctx.api).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(ack) => {
            emit(ack.message_or("Password updated successfully."));
            Ok(())
        }
        Err(ApiError::Validation(errors)) => {
            emit(&render::field_errors(&errors));
            Err(ApiError::Validation(errors).into())
        }
        Err(e) => Err(e.into()),
    }
}
