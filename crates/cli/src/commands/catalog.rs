//! `products` commands.

use shopvely_client::gateways::products;
use shopvely_client::views::ProductsView;
use shopvely_core::ProductId;

use super::{CommandError, Context, emit, emit_notice};
use crate::render;

pub async fn list(ctx: &Context, search: Option<&str>) -> Result<(), CommandError> {
    let view = ProductsView::new();
    if let Err(e) = view.load(&ctx.api).await {
        emit(&render::error_panel("products", &view.state().await.error));
        return Err(e.into());
    }

    let hits = view.search(search.unwrap_or_default()).await;
    emit(&render::products(&hits));
    Ok(())
}

pub async fn show(ctx: &Context, id: ProductId) -> Result<(), CommandError> {
    let product = products::get_product(&ctx.api, id).await?;
    emit(&render::product(&product));
    Ok(())
}

pub async fn add_to_cart(ctx: &Context, id: ProductId) -> Result<(), CommandError> {
    let view = ProductsView::new();
    let result = view.add_to_cart(&ctx.api, id).await;
    emit_notice(view.state().await.notice.as_ref());
    result.map_err(Into::into)
}

pub async fn heart(ctx: &Context, id: ProductId) -> Result<(), CommandError> {
    let view = ProductsView::new();
    view.load(&ctx.api).await?;
    let saved = view.toggle_wishlist(&ctx.api, id).await;
    emit_notice(view.state().await.notice.as_ref());
    if saved? {
        emit(&format!("Product {id} saved to wishlist"));
    } else {
        emit(&format!("Product {id} removed from wishlist"));
    }
    Ok(())
}
