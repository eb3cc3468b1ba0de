//! `login`, `logout`, `register` and `session`.

use shopvely_client::ApiError;
use shopvely_client::gateways::{auth, cart, wishlist};

use super::{CommandError, Context, emit, prompt_secret};
use crate::render;

/// Log in and persist the session.
pub async fn login(ctx: &Context, username: &str) -> Result<(), CommandError> {
    let password = prompt_secret("Password")?;
    let session = auth::login(&ctx.api, username, &password).await?;
    emit(&format!(
        "Logged in as {}",
        session.username.as_deref().unwrap_or(username)
    ));
    Ok(())
}

pub fn logout(ctx: &Context) -> Result<(), CommandError> {
    auth::logout(&ctx.api)?;
    emit("Logged out");
    Ok(())
}

/// Create an account. Logging in is a separate step.
pub async fn register(ctx: &Context, username: &str, email: &str) -> Result<(), CommandError> {
    let password = prompt_secret("Password")?;
    let user = auth::register(&ctx.api, username, email, &password).await?;
    emit(&format!(
        "Account {} created. Log in with `shopvely login {}`.",
        user.username, user.username
    ));
    Ok(())
}

/// Who is logged in, with the cart and wishlist badge counts.
///
/// A failed count lookup only hides the counts, except a 401, which has
/// already ended the session.
pub async fn show_session(ctx: &Context) -> Result<(), CommandError> {
    let session = ctx.api.session().get();
    if !session.is_authenticated() {
        emit("Not logged in");
        return Ok(());
    }

    let counts = match badge_counts(ctx).await {
        Ok(counts) => Some(counts),
        Err(e @ ApiError::Unauthorized) => return Err(e.into()),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load cart and wishlist counts");
            None
        }
    };
    emit(&render::session(session.username.as_deref(), counts));
    Ok(())
}

async fn badge_counts(ctx: &Context) -> Result<(usize, usize), ApiError> {
    let summary = cart::cart_summary(&ctx.api).await?;
    let wishlist = wishlist::get_wishlist(&ctx.api).await?;
    Ok((summary.count, wishlist.products.len()))
}

pub async fn refresh(ctx: &Context) -> Result<(), CommandError> {
    auth::refresh(&ctx.api).await?;
    emit("Session refreshed");
    Ok(())
}
