//! # API Facade
//!
//! [`StorefrontApi`] is the single entry point a UI talks to. It wires one
//! key-value store into every component and exposes REST-shaped async calls.
//!
//! ## What It Owns
//!
//! - **Listing**: products, blog posts and flashcard decks, each through its
//!   own [`QueryCache`] in front of the [`QueryExecutor`].
//! - **Admin CRUD**: delegated to [`AdminStore`]; every successful mutation
//!   drops the cached listings of that collection.
//! - **Session, cart and chat**: thin pass-throughs over the shared store.
//! - **Page parameters**: [`StorefrontApi::apply_query_string`] turns a URL
//!   query into a [`ListQuery`] and sets the simulator's test flags.
//!
//! ## What It Does Not Do
//!
//! No printing, no terminal assumptions, no process exit. The CLI (or any other
//! client) renders the returned values.
//!
//! ## Generic Over Storage and Sessions
//!
//! `StorefrontApi<S, P>` takes any [`KeyValueStore`] and any [`SessionProvider`].
//! [`StorefrontApi::new`] builds the stored-session provider; tests can pass a
//! [`crate::session::StaticSession`] through [`StorefrontApi::with_sessions`].

use std::rc::Rc;

use crate::admin::AdminStore;
use crate::cache::{CacheRead, QueryCache};
use crate::cart::{Cart, CartItem};
use crate::chat::{ChatBot, ChatHistory, ChatMessage};
use crate::config::StorefrontConfig;
use crate::error::Result;
use crate::executor::QueryExecutor;
use crate::listing::ListingController;
use crate::model::{Banner, BlogPost, Entity, FlashcardDeck, Product};
use crate::query::{params, ListQuery, QueryResult};
use crate::seed::Seeded;
use crate::session::{SessionProvider, StoredSessionProvider};
use crate::simulate::{SimulationConfig, Simulator, TestFlags};
use crate::store::KeyValueStore;

/// One result cache per listable collection.
pub struct ListingCaches {
    products: QueryCache<QueryResult<Product>>,
    blog_posts: QueryCache<QueryResult<BlogPost>>,
    flashcard_decks: QueryCache<QueryResult<FlashcardDeck>>,
}

impl ListingCaches {
    fn new(config: &StorefrontConfig) -> Self {
        Self {
            products: QueryCache::new(config.cache_policy()),
            blog_posts: QueryCache::new(config.cache_policy()),
            flashcard_decks: QueryCache::new(config.cache_policy()),
        }
    }
}

/// Collections with a paginated, cached listing page.
pub trait Listed: Seeded {
    fn cache(caches: &ListingCaches) -> &QueryCache<QueryResult<Self>>;
}

impl Listed for Product {
    fn cache(caches: &ListingCaches) -> &QueryCache<QueryResult<Self>> {
        &caches.products
    }
}

impl Listed for BlogPost {
    fn cache(caches: &ListingCaches) -> &QueryCache<QueryResult<Self>> {
        &caches.blog_posts
    }
}

impl Listed for FlashcardDeck {
    fn cache(caches: &ListingCaches) -> &QueryCache<QueryResult<Self>> {
        &caches.flashcard_decks
    }
}

pub struct StorefrontApi<S, P> {
    config: StorefrontConfig,
    simulator: Rc<Simulator>,
    executor: QueryExecutor,
    admin: AdminStore<Rc<S>, P>,
    caches: ListingCaches,
    cart: Cart<Rc<S>>,
    chat: ChatHistory<Rc<S>>,
    bot: ChatBot,
}

impl<S: KeyValueStore> StorefrontApi<S, StoredSessionProvider<Rc<S>>> {
    pub fn new(store: S, config: StorefrontConfig) -> Self {
        let store = Rc::new(store);
        let sessions = StoredSessionProvider::new(store.clone(), &config);
        Self::assemble(store, sessions, config)
    }
}

impl<S: KeyValueStore, P: SessionProvider> StorefrontApi<S, P> {
    pub fn with_sessions(store: S, sessions: P, config: StorefrontConfig) -> Self {
        Self::assemble(Rc::new(store), sessions, config)
    }

    fn assemble(store: Rc<S>, sessions: P, config: StorefrontConfig) -> Self {
        let simulator = Rc::new(Simulator::new(SimulationConfig::from_config(&config)));
        Self {
            executor: QueryExecutor::new(simulator.clone()),
            admin: AdminStore::new(store.clone(), sessions, simulator.clone()),
            caches: ListingCaches::new(&config),
            cart: Cart::new(store.clone()),
            chat: ChatHistory::new(store),
            bot: ChatBot::new(simulator.clone()),
            simulator,
            config,
        }
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    pub fn sessions(&self) -> &P {
        self.admin.sessions()
    }

    pub fn store(&self) -> &S {
        self.admin.store()
    }

    /// The query a listing page starts from before any parameters apply.
    pub fn default_query(&self) -> ListQuery {
        ListQuery::new().with_page_size(self.config.page_size)
    }

    /// Parse page parameters into a query and install their test flags.
    /// Flags are only honoured when `dev_toggles` is enabled.
    pub fn apply_query_string(&self, query_string: &str) -> ListQuery {
        let parsed = params::parse_over(
            query_string,
            self.default_query(),
            self.config.dev_toggles,
        );
        self.simulator.set_flags(parsed.flags);
        parsed.query
    }

    pub fn set_test_flags(&self, flags: TestFlags) {
        self.simulator.set_flags(flags);
    }

    // --- Listing -------------------------------------------------------------

    /// One page of `E`, served from cache when fresh.
    pub async fn list<E: Listed>(&self, query: &ListQuery) -> Result<CacheRead<QueryResult<E>>> {
        let admin = &self.admin;
        let executor = &self.executor;
        E::cache(&self.caches)
            .fetch(&self.cache_key::<E>(query), move || async move {
                let items = admin.load_collection::<E>()?;
                executor.execute(&items, query).await
            })
            .await
    }

    fn cache_key<E: Entity>(&self, query: &ListQuery) -> String {
        let flags = self.simulator.flags();
        let mut key = format!("{}?{}", E::COLLECTION, query.cache_key());
        // Forced outcomes must not be served from, or stored over, a normal entry.
        if !flags.is_empty() {
            key.push_str(&format!(
                "&force={}{}{}",
                u8::from(flags.force_error),
                u8::from(flags.force_empty),
                u8::from(flags.force_slow)
            ));
        }
        key
    }

    pub async fn products(&self, query: &ListQuery) -> Result<QueryResult<Product>> {
        Ok(self.list::<Product>(query).await?.into_value())
    }

    pub async fn blog_posts(&self, query: &ListQuery) -> Result<QueryResult<BlogPost>> {
        Ok(self.list::<BlogPost>(query).await?.into_value())
    }

    pub async fn flashcard_decks(&self, query: &ListQuery) -> Result<QueryResult<FlashcardDeck>> {
        Ok(self.list::<FlashcardDeck>(query).await?.into_value())
    }

    /// Drive a listing controller through one request for `query`.
    /// Returns whether the outcome was applied.
    pub async fn load_listing<E: Listed>(
        &self,
        controller: &mut ListingController<E>,
        query: ListQuery,
    ) -> bool {
        let ticket = controller.begin(query.clone());
        let outcome = self.list::<E>(&query).await.map(CacheRead::into_value);
        controller.complete(ticket, outcome)
    }

    /// Active banners for `placement` (or all placements), by position.
    pub async fn banners(&self, placement: Option<&str>) -> Result<Vec<Banner>> {
        let mut banners: Vec<Banner> = self
            .admin
            .list::<Banner>()
            .await?
            .into_iter()
            .filter(|b| b.active && placement.map_or(true, |p| b.placement == p))
            .collect();
        banners.sort_by_key(|b| b.position);
        Ok(banners)
    }

    // --- Admin ---------------------------------------------------------------

    pub async fn get<E: Seeded>(&self, id: u64) -> Result<E> {
        self.admin.get(id).await
    }

    pub async fn list_all<E: Seeded>(&self) -> Result<Vec<E>> {
        self.admin.list().await
    }

    pub async fn create<E: Seeded>(&self, draft: E::Draft) -> Result<E> {
        let created = self.admin.create::<E>(draft).await?;
        self.invalidate_collection::<E>();
        Ok(created)
    }

    pub async fn update<E: Seeded>(&self, id: u64, patch: E::Patch) -> Result<E> {
        let updated = self.admin.update::<E>(id, patch).await?;
        self.invalidate_collection::<E>();
        Ok(updated)
    }

    pub async fn delete<E: Seeded>(&self, id: u64) -> Result<bool> {
        let removed = self.admin.delete::<E>(id).await?;
        self.invalidate_collection::<E>();
        Ok(removed)
    }

    fn invalidate_collection<E: Entity>(&self) {
        let prefix = format!("{}?", E::COLLECTION);
        self.caches.products.invalidate_prefix(&prefix);
        self.caches.blog_posts.invalidate_prefix(&prefix);
        self.caches.flashcard_decks.invalidate_prefix(&prefix);
    }

    // --- Cart ----------------------------------------------------------------

    pub fn cart_items(&self) -> Result<Vec<CartItem>> {
        self.cart.items()
    }

    pub fn add_to_cart(&self, product_id: u64, quantity: u32) -> Result<CartItem> {
        let catalog = self.admin.load_collection::<Product>()?;
        self.cart.add(&catalog, product_id, quantity)
    }

    pub fn set_cart_quantity(&self, product_id: u64, quantity: u32) -> Result<()> {
        self.cart.set_quantity(product_id, quantity)
    }

    pub fn remove_from_cart(&self, product_id: u64) -> Result<()> {
        self.cart.remove(product_id)
    }

    pub fn clear_cart(&self) -> Result<()> {
        self.cart.clear()
    }

    pub fn cart_subtotal(&self) -> Result<f64> {
        self.cart.subtotal()
    }

    pub fn cart_count(&self) -> Result<u32> {
        self.cart.count()
    }

    // --- Chat ----------------------------------------------------------------

    pub async fn send_chat(&self, text: &str) -> Result<ChatMessage> {
        self.bot.reply(&self.chat, text).await
    }

    pub fn chat_history(&self) -> Result<Vec<ChatMessage>> {
        self.chat.messages()
    }

    pub fn clear_chat(&self) -> Result<()> {
        self.chat.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::model::{ProductDraft, ProductPatch};
    use crate::query::SortKey;
    use crate::session::StaticSession;
    use crate::store::mem_backend::MemBackend;

    fn api() -> StorefrontApi<MemBackend, StoredSessionProvider<Rc<MemBackend>>> {
        StorefrontApi::new(MemBackend::new(), StorefrontConfig::instant())
    }

    fn admin_api() -> StorefrontApi<MemBackend, StaticSession> {
        StorefrontApi::with_sessions(
            MemBackend::new(),
            StaticSession::admin(),
            StorefrontConfig::instant(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn first_page_holds_page_size_items() {
        let api = api();
        let page = api.products(&api.default_query()).await.unwrap();
        assert_eq!(page.items.len(), 12.min(Product::seed().len()));
        assert_eq!(page.total, Product::seed().len());
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_listing_is_a_cache_hit() {
        let api = api();
        let query = api.default_query().with_sort(SortKey::PriceAsc);
        assert!(!api.list::<Product>(&query).await.unwrap().was_cache_hit());
        assert!(api.list::<Product>(&query).await.unwrap().was_cache_hit());
    }

    #[tokio::test(start_paused = true)]
    async fn mutation_invalidates_the_collection_listing() {
        let api = admin_api();
        let query = api.default_query().with_category("kitchen");
        let before = api.products(&query).await.unwrap();

        api.create::<Product>(ProductDraft::new("Tea Towel", "kitchen", 9.0))
            .await
            .unwrap();
        let read = api.list::<Product>(&query).await.unwrap();
        assert!(!read.was_cache_hit());
        assert_eq!(read.value().total, before.total + 1);
    }

    #[tokio::test(start_paused = true)]
    async fn update_is_visible_in_next_listing() {
        let api = admin_api();
        let query = api.default_query();
        api.products(&query).await.unwrap();
        api.update::<Product>(
            1,
            ProductPatch {
                name: Some("Renamed Lamp".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let page = api.products(&query).await.unwrap();
        assert_eq!(page.items[0].name, "Renamed Lamp");
    }

    #[tokio::test(start_paused = true)]
    async fn query_string_flags_need_dev_toggles() {
        let api = api();
        api.apply_query_string("?forceError=1");
        assert!(api.simulator().flags().is_empty());

        let config = StorefrontConfig {
            dev_toggles: true,
            ..StorefrontConfig::instant()
        };
        let api = StorefrontApi::new(MemBackend::new(), config);
        let query = api.apply_query_string("?forceError=1&page=2");
        assert_eq!(query.page, 2);
        assert!(api.simulator().flags().force_error);
    }

    #[tokio::test(start_paused = true)]
    async fn forced_error_then_retry_recovers() {
        let api = api();
        let mut controller = ListingController::<Product>::new();
        api.set_test_flags(TestFlags::error());

        assert!(api.load_listing(&mut controller, api.default_query()).await);
        assert!(controller.failure().unwrap().retryable);

        api.set_test_flags(TestFlags::none());
        let (ticket, query) = controller.retry().unwrap();
        let outcome = api.products(&query).await;
        assert!(controller.complete(ticket, outcome));
        assert!(controller.result().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn customer_cannot_delete() {
        let api = api();
        api.sessions().sign_in("shopper@example.com", "Sam").unwrap();
        let err = api.delete::<Product>(1).await.unwrap_err();
        assert!(matches!(err, StoreError::Permission(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn signed_in_admin_can_delete() {
        let api = api();
        api.sessions().sign_in("admin@storefront.test", "Ada").unwrap();
        assert!(api.delete::<Product>(1).await.unwrap());
        assert!(api.get::<Product>(1).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn banners_filter_by_placement() {
        let api = api();
        let all = api.banners(None).await.unwrap();
        assert_eq!(all.len(), Banner::seed().len());
        let sidebar = api.banners(Some("sidebar")).await.unwrap();
        assert!(sidebar.iter().all(|b| b.placement == "sidebar"));
    }

    #[tokio::test(start_paused = true)]
    async fn cart_uses_the_catalog() {
        let api = api();
        api.add_to_cart(1, 2).unwrap();
        assert_eq!(api.cart_count().unwrap(), 2);
        assert!(api.add_to_cart(999, 1).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn chat_round_trip_is_persisted() {
        let api = api();
        api.send_chat("how do returns work?").await.unwrap();
        assert_eq!(api.chat_history().unwrap().len(), 2);
        api.clear_chat().unwrap();
        assert!(api.chat_history().unwrap().is_empty());
    }
}
