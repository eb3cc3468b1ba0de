//! `addresses` commands.

use clap::Args;
use shopvely_client::models::NewAddress;
use shopvely_client::views::AddressesView;
use shopvely_client::ApiError;
use shopvely_core::AddressId;

use super::{CommandError, Context, emit, emit_notice};
use crate::render;

/// Fields of a new address.
#[derive(Args)]
pub struct AddressArgs {
    #[arg(long)]
    full_name: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    line1: String,
    #[arg(long, default_value = "")]
    line2: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    state: String,
    #[arg(long)]
    pincode: String,
    /// Make this the default address
    #[arg(long)]
    default: bool,
}

impl From<AddressArgs> for NewAddress {
    fn from(args: AddressArgs) -> Self {
        Self {
            full_name: args.full_name,
            phone: args.phone,
            line1: args.line1,
            line2: args.line2,
            city: args.city,
            state: args.state,
            pincode: args.pincode,
            is_default: args.default,
        }
    }
}

async fn mount(ctx: &Context) -> Result<AddressesView, CommandError> {
    let view = AddressesView::new();
    if let Err(e) = view.load(&ctx.api).await {
        emit(&render::error_panel("addresses", &view.state().await.error));
        return Err(e.into());
    }
    Ok(view)
}

async fn print(view: &AddressesView) {
    let state = view.state().await;
    emit(&render::addresses(&state.data));
    emit_notice(state.notice.as_ref());
}

pub async fn list(ctx: &Context) -> Result<(), CommandError> {
    let view = mount(ctx).await?;
    print(&view).await;
    Ok(())
}

pub async fn add(ctx: &Context, args: AddressArgs) -> Result<(), CommandError> {
    let view = mount(ctx).await?;
    let result = view.create(&ctx.api, &NewAddress::from(args)).await;
    if let Err(ApiError::Validation(errors)) = &result {
        emit(&render::field_errors(errors));
    }
    print(&view).await;
    result.map(drop).map_err(Into::into)
}

pub async fn delete(ctx: &Context, id: AddressId) -> Result<(), CommandError> {
    let view = mount(ctx).await?;
    let result = view.delete(&ctx.api, id).await;
    print(&view).await;
    result.map_err(Into::into)
}

pub async fn set_default(ctx: &Context, id: AddressId) -> Result<(), CommandError> {
    let view = mount(ctx).await?;
    let result = view.set_default(&ctx.api, id).await;
    print(&view).await;
    result.map(drop).map_err(Into::into)
}
