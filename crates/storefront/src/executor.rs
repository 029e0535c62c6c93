//! The async query wrapper: simulated latency in front of [`query::run`].

use std::rc::Rc;
use tracing::debug;

use crate::error::Result;
use crate::model::Entity;
use crate::query::{self, ListQuery, QueryResult};
use crate::simulate::Simulator;

#[derive(Clone)]
pub struct QueryExecutor {
    simulator: Rc<Simulator>,
}

impl QueryExecutor {
    pub fn new(simulator: Rc<Simulator>) -> Self {
        Self { simulator }
    }

    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    /// Wait out the simulated latency, then filter, sort and paginate.
    ///
    /// Fails with a network error under the forced-error flag and resolves an
    /// empty page under the forced-empty flag.
    pub async fn execute<E: Entity>(
        &self,
        collection: &[E],
        query: &ListQuery,
    ) -> Result<QueryResult<E>> {
        self.simulator.simulate(E::COLLECTION).await?;

        if self.simulator.flags().force_empty {
            debug!(collection = E::COLLECTION, "forced empty result");
            return Ok(QueryResult::empty(query));
        }

        let result = query::run(collection, query);
        debug!(
            collection = E::COLLECTION,
            total = result.total,
            page = result.page,
            returned = result.items.len(),
            "query executed"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::model::{Product, ProductDraft};
    use crate::simulate::TestFlags;
    use chrono::Utc;

    fn products() -> Vec<Product> {
        let now = Utc::now();
        vec![
            Product::from_draft(1, ProductDraft::new("Lamp", "home", 100.0), now),
            Product::from_draft(2, ProductDraft::new("Mug", "kitchen", 50.0), now),
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn resolves_the_pure_query_result() {
        let executor = QueryExecutor::new(Rc::new(Simulator::instant()));
        let items = products();
        let query = ListQuery::new().with_category("kitchen");
        let result = executor.execute(&items, &query).await.unwrap();
        assert_eq!(result, query::run(&items, &query));
    }

    #[tokio::test(start_paused = true)]
    async fn forced_empty_yields_zero_total() {
        let simulator = Rc::new(Simulator::instant());
        simulator.set_flags(TestFlags {
            force_empty: true,
            ..TestFlags::default()
        });
        let executor = QueryExecutor::new(simulator);
        let result = executor.execute(&products(), &ListQuery::new()).await.unwrap();
        assert!(result.items.is_empty());
        assert_eq!(result.total, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn forced_error_rejects() {
        let simulator = Rc::new(Simulator::instant());
        simulator.set_flags(TestFlags::error());
        let executor = QueryExecutor::new(simulator);
        let err = executor
            .execute(&products(), &ListQuery::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NetworkSimulated(_)));
    }
}
