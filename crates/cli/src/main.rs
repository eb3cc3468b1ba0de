//! Shopvely CLI - The storefront from a terminal.
//!
//! Each command mounts the matching view, runs one action and prints the
//! resulting state. The session is kept in `SHOPVELY_SESSION_FILE` between
//! runs.
//!
//! # Usage
//!
//! ```bash
//! # Log in (password is read from stdin)
//! shopvely login asha
//!
//! # Browse and fill the cart
//! shopvely products list --search kurta
//! shopvely cart add 3 --quantity 2
//! shopvely cart set 11 5
//!
//! # Check out to the default address
//! shopvely cart checkout
//!
//! # Last month's shipped orders
//! shopvely orders list --status shipped --within 30
//! ```
//!
//! # Commands
//!
//! - `login` / `logout` / `register` / `session` - Authentication
//! - `products` - Catalog, search, add to cart, wishlist hearts
//! - `cart` - Cart lines and checkout
//! - `wishlist` - Saved products
//! - `addresses` - Address book
//! - `orders` - Order history, detail, invoice, reorder
//! - `account` - Password change

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use shopvely_client::ClientConfig;
use shopvely_core::{AddressId, CartItemId, OrderId, ProductId};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod render;

use commands::Context;

#[derive(Parser)]
#[command(name = "shopvely")]
#[command(author, version, about = "Shopvely storefront from the command line")]
struct Cli {
    /// Override `SHOPVELY_API_BASE_URL`
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in; the password is read from stdin
    Login { username: String },
    /// Forget the saved session
    Logout,
    /// Create an account; the password is read from stdin
    Register { username: String, email: String },
    /// Inspect or refresh the saved session
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Browse the catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartCommand,
    },
    /// Manage saved products
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Manage the address book
    Addresses {
        #[command(subcommand)]
        action: AddressesAction,
    },
    /// Order history
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Account settings
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Show who is logged in
    Show,
    /// Exchange the refresh token for a new access token
    Refresh,
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products, optionally filtered by title
    List {
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show one product
    Show { id: ProductId },
    /// Add one unit to the cart
    AddToCart { id: ProductId },
    /// Flip the wishlist heart
    Heart { id: ProductId },
}

#[derive(Subcommand)]
enum CartCommand {
    /// Show the cart
    Show,
    /// Add a product
    Add {
        product: ProductId,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line's quantity
    Set { item: CartItemId, quantity: u32 },
    /// Remove a line
    Remove { item: CartItemId },
    /// Place the order
    Checkout {
        /// Delivery address (default: the default address)
        #[arg(short, long)]
        address: Option<AddressId>,
    },
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Show saved products
    Show,
    /// Save a product
    Add { product: ProductId },
    /// Remove a saved product
    Remove { product: ProductId },
    /// Move a saved product to the cart
    MoveToCart { product: ProductId },
    /// Save a product, or remove it if already saved
    Toggle { product: ProductId },
}

#[derive(Subcommand)]
enum AddressesAction {
    /// List saved addresses
    List,
    /// Save a new address
    Add(commands::addresses::AddressArgs),
    /// Delete an address
    Delete { id: AddressId },
    /// Make an address the default
    Default { id: AddressId },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List orders
    List(commands::orders::FilterArgs),
    /// Show one order
    Show { id: OrderId },
    /// Save the invoice as HTML
    Invoice {
        id: OrderId,
        /// Output file (default: invoice-<id>.html)
        #[arg(short, long)]
        out: Option<std::path::PathBuf>,
    },
    /// Put one ordered product back in the cart
    BuyAgain {
        id: OrderId,
        product: ProductId,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Put every line of an order back in the cart
    Reorder { id: OrderId },
}

#[derive(Subcommand)]
enum AccountAction {
    /// Change the password; current, new and confirmation are read from stdin
    Password,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.api_url.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            #[allow(clippy::print_stderr)]
            {
                eprintln!("Configuration error: {e}");
            }
            std::process::exit(2);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Logs go to stderr so command output stays clean on stdout
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopvely_client=warn,shopvely_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli.command, &config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn load_config(api_url: Option<&str>) -> Result<ClientConfig, shopvely_client::ConfigError> {
    let config = ClientConfig::from_env()?;
    match api_url {
        Some(url) => config.with_api_base_url(url),
        None => Ok(config),
    }
}

async fn run(command: Commands, config: &ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::new(config)?;

    match command {
        Commands::Login { username } => commands::auth::login(&ctx, &username).await?,
        Commands::Logout => commands::auth::logout(&ctx)?,
        Commands::Register { username, email } => {
            commands::auth::register(&ctx, &username, &email).await?;
        }
        Commands::Session { action } => match action {
            SessionAction::Show => commands::auth::show_session(&ctx).await?,
            SessionAction::Refresh => commands::auth::refresh(&ctx).await?,
        },
        Commands::Products { action } => match action {
            ProductsAction::List { search } => {
                commands::catalog::list(&ctx, search.as_deref()).await?;
            }
            ProductsAction::Show { id } => commands::catalog::show(&ctx, id).await?,
            ProductsAction::AddToCart { id } => commands::catalog::add_to_cart(&ctx, id).await?,
            ProductsAction::Heart { id } => commands::catalog::heart(&ctx, id).await?,
        },
        Commands::Cart { action } => match action {
            CartCommand::Show => commands::cart::show(&ctx).await?,
            CartCommand::Add { product, quantity } => {
                commands::cart::add(&ctx, product, quantity).await?;
            }
            CartCommand::Set { item, quantity } => {
                commands::cart::set_quantity(&ctx, item, quantity).await?;
            }
            CartCommand::Remove { item } => commands::cart::remove(&ctx, item).await?,
            CartCommand::Checkout { address } => commands::cart::checkout(&ctx, address).await?,
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Show => commands::wishlist::show(&ctx).await?,
            WishlistAction::Add { product } => commands::wishlist::add(&ctx, product).await?,
            WishlistAction::Remove { product } => commands::wishlist::remove(&ctx, product).await?,
            WishlistAction::MoveToCart { product } => {
                commands::wishlist::move_to_cart(&ctx, product).await?;
            }
            WishlistAction::Toggle { product } => commands::wishlist::toggle(&ctx, product).await?,
        },
        Commands::Addresses { action } => match action {
            AddressesAction::List => commands::addresses::list(&ctx).await?,
            AddressesAction::Add(args) => commands::addresses::add(&ctx, args).await?,
            AddressesAction::Delete { id } => commands::addresses::delete(&ctx, id).await?,
            AddressesAction::Default { id } => commands::addresses::set_default(&ctx, id).await?,
        },
        Commands::Orders { action } => match action {
            OrdersAction::List(filter) => commands::orders::list(&ctx, &filter).await?,
            OrdersAction::Show { id } => commands::orders::show(&ctx, id).await?,
            OrdersAction::Invoice { id, out } => {
                commands::orders::invoice(&ctx, id, out.as_deref()).await?;
            }
            OrdersAction::BuyAgain {
                id,
                product,
                quantity,
            } => commands::orders::buy_again(&ctx, id, product, quantity).await?,
            OrdersAction::Reorder { id } => commands::orders::reorder(&ctx, id).await?,
        },
        Commands::Account { action } => match action {
            AccountAction::Password => commands::account::change_password(&ctx).await?,
        },
    }
    Ok(())
}
