//! `orders` commands.

use std::path::Path;

use clap::Args;
use shopvely_client::views::{DateRange, OrderDetailView, OrderFilter, OrdersView, StatusFilter};
use shopvely_core::{OrderId, ProductId};

use super::{CommandError, Context, emit, emit_notice};
use crate::render;

/// Order list toolbar.
#[derive(Args)]
pub struct FilterArgs {
    /// `all` or an order status
    #[arg(long, default_value = "all")]
    status: StatusFilter,
    /// `all`, `30` or `180` days
    #[arg(long, default_value = "all")]
    within: DateRange,
    /// Part of an order number
    #[arg(long, default_value = "")]
    search: String,
}

impl From<&FilterArgs> for OrderFilter {
    fn from(args: &FilterArgs) -> Self {
        Self {
            status: args.status,
            date: args.within,
            search: args.search.clone(),
        }
    }
}

pub async fn list(ctx: &Context, args: &FilterArgs) -> Result<(), CommandError> {
    let view = OrdersView::new();
    if let Err(e) = view.load(&ctx.api).await {
        emit(&render::error_panel("orders", &view.state().await.error));
        return Err(e.into());
    }

    let filter = OrderFilter::from(args);
    let orders = view.filtered(&filter, chrono::Utc::now()).await;
    emit(&render::orders(&orders, filter.is_active()));
    Ok(())
}

async fn mount_detail(ctx: &Context, id: OrderId) -> Result<OrderDetailView, CommandError> {
    let view = OrderDetailView::new();
    if let Err(e) = view.load(&ctx.api, id).await {
        emit(&render::error_panel("order", &view.state().await.error));
        return Err(e.into());
    }
    Ok(view)
}

pub async fn show(ctx: &Context, id: OrderId) -> Result<(), CommandError> {
    let view = mount_detail(ctx, id).await?;
    if let Some(order) = view.state().await.data {
        emit(&render::order(&order));
    }
    Ok(())
}

pub async fn invoice(ctx: &Context, id: OrderId, out: Option<&Path>) -> Result<(), CommandError> {
    let view = mount_detail(ctx, id).await?;
    let result = view.download_invoice(&ctx.api).await;
    emit_notice(view.state().await.notice.as_ref());
    let invoice = result?;

    let path = out.map_or_else(|| invoice.file_name().into(), Path::to_path_buf);
    std::fs::write(&path, invoice.body.as_bytes())?;
    emit(&format!("Invoice saved to {}", path.display()));
    Ok(())
}

pub async fn buy_again(
    ctx: &Context,
    id: OrderId,
    product: ProductId,
    quantity: u32,
) -> Result<(), CommandError> {
    let view = mount_detail(ctx, id).await?;
    let result = view.buy_again(&ctx.api, product, quantity).await;
    emit_notice(view.state().await.notice.as_ref());
    result.map_err(Into::into)
}

pub async fn reorder(ctx: &Context, id: OrderId) -> Result<(), CommandError> {
    let view = mount_detail(ctx, id).await?;
    let result = view.reorder_all(&ctx.api).await;
    emit_notice(view.state().await.notice.as_ref());
    result.map(drop).map_err(Into::into)
}
