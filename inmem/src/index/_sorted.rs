// this module is transparently re-exported by its parent `index`
use log::debug;
use parking_lot::{RwLock, RwLockWriteGuard};
use std::cmp::Ordering;
use ternary_api::index::{TripleIndex, TripleIter, TripleNotFound};
use ternary_api::node::Node;
use ternary_api::triple::Triple;

use super::TripleStore;
use crate::options::IndexOptions;

/// The sort orders maintained by a [`SortedIndex`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SortOrder {
    /// subject, predicate, object
    Spo,
    /// predicate, object, subject
    Pos,
    /// object, subject, predicate
    Osp,
}

impl SortOrder {
    const ALL: [SortOrder; 3] = [SortOrder::Spo, SortOrder::Pos, SortOrder::Osp];

    fn key(self, t: &Triple) -> [&Node; 3] {
        match self {
            SortOrder::Spo => [t.s(), t.p(), t.o()],
            SortOrder::Pos => [t.p(), t.o(), t.s()],
            SortOrder::Osp => [t.o(), t.s(), t.p()],
        }
    }

    fn compare(self, t1: &Triple, t2: &Triple) -> Ordering {
        self.key(t1).cmp(&self.key(t2))
    }
}

/// The state of one sort order of a [`SortedIndex`].
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum OrderState {
    /// Never queried, not maintained.
    #[default]
    Absent,
    /// Contains every triple, but triples were appended since the last sort.
    Unsorted,
    /// Triples were deleted since the last build; to be rebuilt from the store.
    Stale,
    /// Sorted and up to date.
    Ready,
}

#[derive(Clone, Debug, Default)]
struct OrderTable {
    triples: Vec<Triple>,
    state: OrderState,
}

#[derive(Clone, Debug, Default)]
struct OrderTables([OrderTable; 3]);

impl OrderTables {
    fn get(&self, order: SortOrder) -> &OrderTable {
        &self.0[order as usize]
    }

    fn get_mut(&mut self, order: SortOrder) -> &mut OrderTable {
        &mut self.0[order as usize]
    }
}

/// An index answering queries by binary search in sorted arrays.
///
/// Up to three sort orders ([`SortOrder`]) are built from the store,
/// each the first time a query needs it.
/// Insertions append to the orders already built (which then need a new sort);
/// deletions mark them [stale](OrderState::Stale), so that they are rebuilt on next use.
///
/// Queries by subject or subject-predicate use [`SortOrder::Spo`],
/// by predicate or predicate-object use [`SortOrder::Pos`],
/// by object or subject-object use [`SortOrder::Osp`].
/// They return snapshots of the matching range.
#[derive(Debug)]
pub struct SortedIndex {
    options: IndexOptions,
    store: TripleStore,
    orders: RwLock<OrderTables>,
}

impl SortedIndex {
    pub fn new() -> Self {
        Self::with_options(IndexOptions::default())
    }

    pub fn with_options(options: IndexOptions) -> Self {
        SortedIndex {
            options,
            store: TripleStore::new(),
            orders: RwLock::new(OrderTables::default()),
        }
    }

    pub fn options(&self) -> &IndexOptions {
        &self.options
    }

    pub fn order_state(&self, order: SortOrder) -> OrderState {
        self.orders.read().get(order).state
    }

    /// Make `order` ready, then collect the triples of its range
    /// where `probe` returns `Ordering::Equal`.
    ///
    /// `probe` must be consistent with `order`.
    fn range<F>(&self, order: SortOrder, probe: F) -> Vec<Triple>
    where
        F: Fn(&Triple) -> Ordering,
    {
        {
            let orders = self.orders.read();
            let table = orders.get(order);
            if table.state == OrderState::Ready {
                return collect_range(&table.triples, probe);
            }
        }
        let mut orders = self.orders.write();
        self.refresh(order, &mut orders);
        let orders = RwLockWriteGuard::downgrade(orders);
        collect_range(&orders.get(order).triples, probe)
    }

    fn refresh(&self, order: SortOrder, orders: &mut OrderTables) {
        let table = orders.get_mut(order);
        match table.state {
            OrderState::Ready => {}
            OrderState::Unsorted => {
                debug!("SortedIndex: sorting {:?}", order);
                table.triples.sort_unstable_by(|t1, t2| order.compare(t1, t2));
                table.state = OrderState::Ready;
            }
            OrderState::Absent | OrderState::Stale => {
                debug!(
                    "SortedIndex: building {:?} from {} triples",
                    order,
                    self.store.len()
                );
                table.triples = self.store.iter().cloned().collect();
                table.triples.sort_unstable_by(|t1, t2| order.compare(t1, t2));
                table.state = OrderState::Ready;
            }
        }
    }
}

fn collect_range<F>(triples: &[Triple], probe: F) -> Vec<Triple>
where
    F: Fn(&Triple) -> Ordering,
{
    let start = triples.partition_point(|t| probe(t) == Ordering::Less);
    let end = start + triples[start..].partition_point(|t| probe(t) != Ordering::Greater);
    triples[start..end].to_vec()
}

impl Default for SortedIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SortedIndex {
    fn clone(&self) -> Self {
        SortedIndex {
            options: self.options,
            store: self.store.clone(),
            orders: RwLock::new(self.orders.read().clone()),
        }
    }
}

impl TripleIndex for SortedIndex {
    fn add(&mut self, t: Triple) -> bool {
        if !self.store.insert(&t) {
            return false;
        }
        let orders = self.orders.get_mut();
        for order in SortOrder::ALL {
            let table = orders.get_mut(order);
            match table.state {
                OrderState::Ready | OrderState::Unsorted => {
                    table.triples.push(t.clone());
                    table.state = OrderState::Unsorted;
                }
                OrderState::Absent | OrderState::Stale => {}
            }
        }
        true
    }

    fn delete(&mut self, t: &Triple) -> bool {
        if !self.store.remove(t) {
            return false;
        }
        let orders = self.orders.get_mut();
        for order in SortOrder::ALL {
            let table = orders.get_mut(order);
            if table.state != OrderState::Absent {
                table.triples = Vec::new();
                table.state = OrderState::Stale;
            }
        }
        true
    }

    fn get(&self, t: &Triple) -> Result<Triple, TripleNotFound> {
        self.store.get(t)
    }

    fn contains(&self, t: &Triple) -> bool {
        self.store.contains(t)
    }

    fn len(&self) -> usize {
        self.store.len()
    }

    /// Enumerate the triples in the first ready sort order, if any,
    /// otherwise in the order of the store.
    fn triples(&self) -> TripleIter<'_> {
        let orders = self.orders.read();
        for order in SortOrder::ALL {
            let table = orders.get(order);
            if table.state == OrderState::Ready {
                return Box::new(table.triples.clone().into_iter());
            }
        }
        Box::new(self.store.iter().cloned())
    }

    fn clear(&mut self) {
        self.store.clear();
        *self.orders.get_mut() = OrderTables::default();
    }

    fn with_subject(&self, s: &Node) -> TripleIter<'_> {
        let found = self.range(SortOrder::Spo, |t| t.s().cmp(s));
        Box::new(found.into_iter())
    }

    fn with_predicate(&self, p: &Node) -> TripleIter<'_> {
        let found = self.range(SortOrder::Pos, |t| t.p().cmp(p));
        Box::new(found.into_iter())
    }

    fn with_object(&self, o: &Node) -> TripleIter<'_> {
        let found = self.range(SortOrder::Osp, |t| t.o().cmp(o));
        Box::new(found.into_iter())
    }

    fn with_subject_predicate(&self, s: &Node, p: &Node) -> TripleIter<'_> {
        let found = self.range(SortOrder::Spo, |t| (t.s(), t.p()).cmp(&(s, p)));
        Box::new(found.into_iter())
    }

    fn with_predicate_object(&self, p: &Node, o: &Node) -> TripleIter<'_> {
        let found = self.range(SortOrder::Pos, |t| (t.p(), t.o()).cmp(&(p, o)));
        Box::new(found.into_iter())
    }

    fn with_subject_object(&self, s: &Node, o: &Node) -> TripleIter<'_> {
        let found = self.range(SortOrder::Osp, |t| (t.o(), t.s()).cmp(&(o, s)));
        Box::new(found.into_iter())
    }
}
