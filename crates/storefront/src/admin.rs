//! # Admin CRUD Store
//!
//! Create, read, update and delete for every entity collection, written once
//! against [`Entity`].
//!
//! ## Ordering of Checks
//!
//! Every mutation runs the same gauntlet, in this order:
//!
//! 1. **Validate** the draft or patch. Bad input fails fast, naming the field.
//! 2. **Simulate** latency and injected failures, like any remote call.
//! 3. **Authorize**: the current session must carry [`crate::session::Role::Admin`].
//! 4. **Touch storage**: read the whole collection, change it, write it back.
//!
//! Nothing is read or written before step 4, so a refused call leaves storage
//! exactly as it was.
//!
//! ## Storage
//!
//! A collection is one JSON array under its [`Entity::COLLECTION`] key,
//! rewritten whole on every mutation. There is no concurrency control; the last
//! writer wins. A key that was never written is seeded from [`crate::seed`].
//!
//! ## Ids
//!
//! New ids are `max(existing) + 1`, or 1 for an empty collection. Ids of
//! deleted entities at the top of the range can therefore be reused.

use chrono::Utc;
use std::rc::Rc;
use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::model::{Entity, Validate};
use crate::seed::Seeded;
use crate::session::{require_admin, SessionProvider};
use crate::simulate::Simulator;
use crate::store::{load_json, save_json, KeyValueStore};

pub struct AdminStore<S, P> {
    store: S,
    sessions: P,
    simulator: Rc<Simulator>,
}

impl<S: KeyValueStore, P: SessionProvider> AdminStore<S, P> {
    pub fn new(store: S, sessions: P, simulator: Rc<Simulator>) -> Self {
        Self {
            store,
            sessions,
            simulator,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn sessions(&self) -> &P {
        &self.sessions
    }

    /// Read a collection straight from storage, seeding it on first access.
    /// No simulated latency; listing layers add their own.
    pub fn load_collection<E: Seeded>(&self) -> Result<Vec<E>> {
        if let Some(items) = load_json::<Vec<E>, _>(&self.store, E::COLLECTION)? {
            return Ok(items);
        }
        let seeded = E::seed();
        debug!(collection = E::COLLECTION, count = seeded.len(), "seeding collection");
        save_json(&self.store, E::COLLECTION, &seeded)?;
        Ok(seeded)
    }

    fn save_collection<E: Entity>(&self, items: &[E]) -> Result<()> {
        save_json(&self.store, E::COLLECTION, items)
    }

    pub async fn list<E: Seeded>(&self) -> Result<Vec<E>> {
        self.simulator.simulate(E::COLLECTION).await?;
        self.load_collection()
    }

    pub async fn get<E: Seeded>(&self, id: u64) -> Result<E> {
        self.simulator.simulate(E::COLLECTION).await?;
        self.load_collection::<E>()?
            .into_iter()
            .find(|e| e.id() == id)
            .ok_or(StoreError::NotFound {
                collection: E::COLLECTION,
                id,
            })
    }

    pub async fn create<E: Seeded>(&self, draft: E::Draft) -> Result<E> {
        draft.validate()?;
        self.simulator.simulate(E::COLLECTION).await?;
        let session = require_admin(&self.sessions)?;

        let mut items = self.load_collection::<E>()?;
        let id = items.iter().map(Entity::id).max().unwrap_or(0) + 1;
        let entity = E::from_draft(id, draft, Utc::now());
        items.push(entity.clone());
        self.save_collection(&items)?;

        info!(collection = E::COLLECTION, id, by = %session.user.email, "created");
        Ok(entity)
    }

    pub async fn update<E: Seeded>(&self, id: u64, patch: E::Patch) -> Result<E> {
        patch.validate()?;
        self.simulator.simulate(E::COLLECTION).await?;
        let session = require_admin(&self.sessions)?;

        let mut items = self.load_collection::<E>()?;
        let entity = items
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or(StoreError::NotFound {
                collection: E::COLLECTION,
                id,
            })?;
        entity.apply_patch(patch, Utc::now());
        let updated = entity.clone();
        self.save_collection(&items)?;

        info!(collection = E::COLLECTION, id, by = %session.user.email, "updated");
        Ok(updated)
    }

    /// Remove `id`. Returns whether anything was removed; an absent id is not an error.
    pub async fn delete<E: Seeded>(&self, id: u64) -> Result<bool> {
        self.simulator.simulate(E::COLLECTION).await?;
        let session = require_admin(&self.sessions)?;

        let mut items = self.load_collection::<E>()?;
        let before = items.len();
        items.retain(|e| e.id() != id);
        if items.len() == before {
            debug!(collection = E::COLLECTION, id, "delete of absent id");
            return Ok(false);
        }
        self.save_collection(&items)?;

        info!(collection = E::COLLECTION, id, by = %session.user.email, "deleted");
        Ok(true)
    }
}
