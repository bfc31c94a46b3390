//! Keyset pagination over the medicine collection.
//!
//! A [`MedicinePager`] remembers the last medicine it returned and the query it came from.
//! Asking for the next page continues strictly after that medicine in the current sort
//! order; asking for a fresh page, or continuing with a different sort or filter, starts
//! over from the beginning of the collection.

use crate::{
    entities::{Medicine, medicine},
    errors::Result,
    models::SortOption,
};
use sea_orm::{Condition, QueryOrder, QuerySelect, prelude::*};
use tracing::debug;

/// Page size used when none is configured
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Sort option and name filter of a paginated query
#[derive(Debug, Clone, PartialEq, Eq)]
struct QuerySignature {
    sort: SortOption,
    name: String,
}

/// Cursor state for paging through medicines
#[derive(Debug, Clone)]
pub struct MedicinePager {
    page_size: u64,
    cursor: Option<medicine::Model>,
    signature: Option<QuerySignature>,
}

impl Default for MedicinePager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl MedicinePager {
    /// Creates a pager returning at most `page_size` medicines per call (at least one).
    #[must_use]
    pub fn new(page_size: u64) -> Self {
        Self {
            page_size: page_size.max(1),
            cursor: None,
            signature: None,
        }
    }

    /// Number of medicines returned per page.
    #[must_use]
    pub const fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Forgets the cursor so the next fetch starts from the beginning.
    pub fn reset(&mut self) {
        self.cursor = None;
        self.signature = None;
    }

    /// Fetches one page of medicines.
    ///
    /// # Arguments
    /// * `db` - Database connection
    /// * `sort` - Field to order by; ties are broken by id
    /// * `name` - Exact name to match, or empty for all medicines
    /// * `next_items` - Continue after the last medicine returned for the same query
    ///   instead of starting over
    pub async fn fetch_medicines(
        &mut self,
        db: &DatabaseConnection,
        sort: SortOption,
        name: &str,
        next_items: bool,
    ) -> Result<Vec<medicine::Model>> {
        let signature = QuerySignature {
            sort,
            name: name.to_string(),
        };

        let after = if next_items && self.signature.as_ref() == Some(&signature) {
            self.cursor.clone()
        } else {
            None
        };

        let mut query = Medicine::find();
        if !name.is_empty() {
            query = query.filter(medicine::Column::Name.eq(name));
        }
        if let Some(last) = &after {
            query = query.filter(after_condition(sort, last));
        }
        query = match sort {
            SortOption::None => query.order_by_asc(medicine::Column::Id),
            SortOption::Name => query
                .order_by_asc(medicine::Column::Name)
                .order_by_asc(medicine::Column::Id),
            SortOption::Stock => query
                .order_by_asc(medicine::Column::Stock)
                .order_by_asc(medicine::Column::Id),
        };

        let page = query.limit(self.page_size).all(db).await?;
        debug!(
            "Fetched {} medicine(s) sorted by {} (continued: {})",
            page.len(),
            sort.field(),
            after.is_some()
        );

        match page.last() {
            Some(last) => self.cursor = Some(last.clone()),
            // An exhausted continuation keeps its position
            None if after.is_some() => {}
            None => self.cursor = None,
        }
        self.signature = Some(signature);

        Ok(page)
    }
}

/// Rows strictly after `last` in the (sort field, id) order.
fn after_condition(sort: SortOption, last: &medicine::Model) -> Condition {
    let id_after = medicine::Column::Id.gt(last.id.as_str());
    match sort {
        SortOption::None => Condition::all().add(id_after),
        SortOption::Name => Condition::any()
            .add(medicine::Column::Name.gt(last.name.as_str()))
            .add(
                Condition::all()
                    .add(medicine::Column::Name.eq(last.name.as_str()))
                    .add(id_after),
            ),
        SortOption::Stock => Condition::any()
            .add(medicine::Column::Stock.gt(last.stock))
            .add(
                Condition::all()
                    .add(medicine::Column::Stock.eq(last.stock))
                    .add(id_after),
            ),
    }
}
