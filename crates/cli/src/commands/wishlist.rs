//! `wishlist` commands.

use shopvely_client::gateways::wishlist;
use shopvely_client::views::WishlistView;
use shopvely_core::ProductId;

use super::{CommandError, Context, emit, emit_notice};
use crate::render;

async fn mount(ctx: &Context) -> Result<WishlistView, CommandError> {
    let view = WishlistView::new();
    if let Err(e) = view.load(&ctx.api).await {
        emit(&render::error_panel("wishlist", &view.state().await.error));
        return Err(e.into());
    }
    Ok(view)
}

async fn print(view: &WishlistView) {
    let state = view.state().await;
    emit(&render::wishlist(&state.data));
    emit_notice(state.notice.as_ref());
}

pub async fn show(ctx: &Context) -> Result<(), CommandError> {
    let view = mount(ctx).await?;
    print(&view).await;
    Ok(())
}

/// Plain add: a product that is already saved is reported, not removed.
pub async fn add(ctx: &Context, product: ProductId) -> Result<(), CommandError> {
    let list = wishlist::add_to_wishlist(&ctx.api, product).await?;
    emit(&render::wishlist(&list.products));
    Ok(())
}

pub async fn remove(ctx: &Context, product: ProductId) -> Result<(), CommandError> {
    let view = mount(ctx).await?;
    let result = view.remove(&ctx.api, product).await;
    print(&view).await;
    result.map_err(Into::into)
}

pub async fn move_to_cart(ctx: &Context, product: ProductId) -> Result<(), CommandError> {
    let view = mount(ctx).await?;
    let result = view.move_to_cart(&ctx.api, product).await;
    print(&view).await;
    result.map_err(Into::into)
}

pub async fn toggle(ctx: &Context, product: ProductId) -> Result<(), CommandError> {
    let view = mount(ctx).await?;
    let result = view.toggle(&ctx.api, product).await;
    print(&view).await;
    result.map(drop).map_err(Into::into)
}
