//! # CLI Layer
//!
//! This module is **one possible UI client** for storefront. It is not the
//! application itself.
//!
//! The CLI layer is the **only** place in the workspace that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Installs a tracing subscriber
//! - Builds the async runtime
//! - Formats output for human consumption
//!
//! ## Flow
//!
//! 1. **Parse** arguments into typed commands via clap.
//! 2. **Set up** logging, the data directory, configuration and the API.
//! 3. **Dispatch** to the API on a current-thread runtime (the API is `!Send`).
//! 4. **Render** the returned values as tables or JSON.
//!
//! Errors bubble up as `anyhow::Error`; `main` prints them and exits non-zero.

use anyhow::{bail, Context};
use clap::Parser;
use std::rc::Rc;
use storefront::config::{self, StorefrontConfig};
use storefront::listing::ListingController;
use storefront::model::{BlogPost, FlashcardDeck, Product, ProductDraft, ProductPatch};
use storefront::query::{params, ListQuery};
use storefront::session::{SessionProvider, StoredSessionProvider};
use storefront::store::fs_backend::FsBackend;
use storefront::StorefrontApi;
use tracing_subscriber::{fmt, EnvFilter};

use super::render;
use super::setup::{
    AdminCommands, CartCommands, ChatCommands, Cli, Collection, Commands, ListArgs, ProductFields,
};

type Api = StorefrontApi<FsBackend, StoredSessionProvider<Rc<FsBackend>>>;

const LOG_ENV: &str = "STOREFRONT_LOG";

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let data_dir = config::data_dir(cli.data.as_deref())?;
    let config = StorefrontConfig::load(&data_dir)
        .with_context(|| format!("loading configuration from {}", data_dir.display()))?;
    tracing::debug!(data_dir = %data_dir.display(), "starting");

    let api = StorefrontApi::new(FsBackend::new(&data_dir), config);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("building the async runtime")?;
    let output = runtime.block_on(dispatch(&api, &cli))?;
    print!("{}", output);
    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    if let Err(e) = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("tracing init failed: {}", e);
    }
}

async fn dispatch(api: &Api, cli: &Cli) -> anyhow::Result<String> {
    let json = cli.json;
    match &cli.command {
        Commands::Products(args) => {
            let query = build_query(api, args);
            let result = load::<Product>(api, query).await?;
            if json {
                render::json(&result)
            } else {
                Ok(render::product_table(&result))
            }
        }
        Commands::Blog(args) => {
            let query = build_query(api, args);
            let result = load::<BlogPost>(api, query).await?;
            if json {
                render::json(&result)
            } else {
                Ok(render::blog_table(&result))
            }
        }
        Commands::Decks(args) => {
            let query = build_query(api, args);
            let result = load::<FlashcardDeck>(api, query).await?;
            if json {
                render::json(&result)
            } else {
                Ok(render::deck_table(&result))
            }
        }
        Commands::Show { id } => {
            let product = api.get::<Product>(*id).await?;
            if json {
                render::json(&product)
            } else {
                Ok(render::product_detail(&product))
            }
        }
        Commands::Banners { placement } => {
            let banners = api.banners(placement.as_deref()).await?;
            if json {
                render::json(&banners)
            } else {
                Ok(render::banner_list(&banners))
            }
        }
        Commands::Admin { action } => admin(api, action, json).await,
        Commands::Login { email, name } => {
            let session = api
                .sessions()
                .sign_in(email, name.as_deref().unwrap_or_default())?;
            if json {
                render::json(&session)
            } else {
                Ok(render::session_line(Some(&session)))
            }
        }
        Commands::Logout => {
            api.sessions().sign_out()?;
            Ok(render::success("Signed out."))
        }
        Commands::Whoami => {
            let session = api.sessions().current()?;
            if json {
                render::json(&session)
            } else {
                Ok(render::session_line(session.as_ref()))
            }
        }
        Commands::Cart { action } => cart(api, action.as_ref(), json),
        Commands::Chat { action } => chat(api, action, json).await,
        Commands::Config => render::json(api.config()),
    }
}

/// Apply `--query` first, then let explicit flags override it.
fn build_query(api: &Api, args: &ListArgs) -> ListQuery {
    let mut query = match &args.query {
        Some(raw) => api.apply_query_string(raw),
        None => api.default_query(),
    };
    if let Some(category) = &args.category {
        query = query.with_category(category.clone());
    }
    if let Some(search) = &args.search {
        query = query.with_search(search.clone());
    }
    if let Some(sort) = args.sort {
        query = query.with_sort(sort.into());
    }
    if args.min_price.is_some() || args.max_price.is_some() {
        let min = args.min_price.or(query.price_min);
        let max = args.max_price.or(query.price_max);
        query = query.with_price_range(min, max);
    }
    if let Some(page) = args.page {
        query = query.with_page(page);
    }
    if let Some(limit) = args.limit {
        query = query.with_page_size(limit);
    }
    query
}

/// Run one listing request through a controller so a failure carries its
/// retry hint into the error message.
async fn load<E: storefront::api::Listed>(
    api: &Api,
    query: ListQuery,
) -> anyhow::Result<storefront::query::QueryResult<E>> {
    tracing::debug!(
        collection = E::COLLECTION,
        query = %params::to_query_string(&query),
        "listing"
    );
    let mut controller = ListingController::<E>::new();
    api.load_listing(&mut controller, query).await;
    if let Some(failure) = controller.failure() {
        let hint = if failure.retryable {
            " (try again)"
        } else {
            ""
        };
        bail!("{}{}", failure.message, hint);
    }
    match controller.result() {
        Some(result) => Ok(result.clone()),
        None => bail!("listing did not complete"),
    }
}

async fn admin(api: &Api, action: &AdminCommands, json: bool) -> anyhow::Result<String> {
    match action {
        AdminCommands::Create(fields) => {
            let product = api.create::<Product>(product_draft(fields)).await?;
            if json {
                render::json(&product)
            } else {
                Ok(render::success(format!("Created product {}.", product.id)))
            }
        }
        AdminCommands::Update { id, fields } => {
            let product = api.update::<Product>(*id, product_patch(fields)).await?;
            if json {
                render::json(&product)
            } else {
                Ok(render::success(format!("Updated product {}.", product.id)))
            }
        }
        AdminCommands::Delete { collection, id } => {
            let removed = match collection {
                Collection::Products => api.delete::<Product>(*id).await?,
                Collection::Blog => api.delete::<BlogPost>(*id).await?,
                Collection::Decks => api.delete::<FlashcardDeck>(*id).await?,
                Collection::Banners => api.delete::<storefront::model::Banner>(*id).await?,
            };
            if json {
                render::json(&serde_json::json!({ "id": id, "removed": removed }))
            } else if removed {
                Ok(render::success(format!("Deleted {}.", id)))
            } else {
                Ok(render::success(format!("Nothing to delete for {}.", id)))
            }
        }
    }
}

fn product_draft(fields: &ProductFields) -> ProductDraft {
    ProductDraft {
        name: fields.name.clone().unwrap_or_default(),
        description: fields.description.clone().unwrap_or_default(),
        category: fields.category.clone().unwrap_or_default(),
        price: fields.price.unwrap_or_default(),
        rating: fields.rating.unwrap_or_default(),
        stock: fields.stock.unwrap_or_default(),
        image: fields.image.clone().unwrap_or_default(),
    }
}

fn product_patch(fields: &ProductFields) -> ProductPatch {
    ProductPatch {
        name: fields.name.clone(),
        description: fields.description.clone(),
        category: fields.category.clone(),
        price: fields.price,
        rating: fields.rating,
        stock: fields.stock,
        image: fields.image.clone(),
    }
}

fn cart(api: &Api, action: Option<&CartCommands>, json: bool) -> anyhow::Result<String> {
    match action.unwrap_or(&CartCommands::List) {
        CartCommands::List => {}
        CartCommands::Add {
            product_id,
            quantity,
        } => {
            api.add_to_cart(*product_id, *quantity)?;
        }
        CartCommands::Set {
            product_id,
            quantity,
        } => api.set_cart_quantity(*product_id, *quantity)?,
        CartCommands::Remove { product_id } => api.remove_from_cart(*product_id)?,
        CartCommands::Clear => api.clear_cart()?,
    }
    let items = api.cart_items()?;
    if json {
        render::json(&serde_json::json!({
            "items": items,
            "count": api.cart_count()?,
            "subtotal": api.cart_subtotal()?,
        }))
    } else {
        Ok(render::cart_table(&items, api.cart_subtotal()?))
    }
}

async fn chat(api: &Api, action: &ChatCommands, json: bool) -> anyhow::Result<String> {
    match action {
        ChatCommands::Send { words } => {
            let reply = api.send_chat(&words.join(" ")).await?;
            if json {
                render::json(&reply)
            } else {
                Ok(render::chat_message(&reply))
            }
        }
        ChatCommands::History => {
            let messages = api.chat_history()?;
            if json {
                render::json(&messages)
            } else {
                Ok(render::chat_transcript(&messages))
            }
        }
        ChatCommands::Clear => {
            api.clear_chat()?;
            Ok(render::success("Chat cleared."))
        }
    }
}
