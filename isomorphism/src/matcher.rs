//! I define [`GraphMatcher`], deciding whether two graphs are equal up to blank node renaming.
use std::collections::{BTreeMap, HashSet};

use log::{debug, trace};
use ternary_api::index::TripleIndex;
use ternary_api::node::Node;
use ternary_api::triple::Triple;

use crate::brute_force::{validate, BruteForce, Side};
use crate::dependency::{Dependencies, MappingPair};
use crate::{Mapping, MatchError};

/// Compares graphs, and remembers the [`Mapping`] found by the last successful comparison.
///
/// The comparison first checks cheap necessary conditions
/// (size, ground triples, distribution of blank node degrees),
/// then builds a mapping with a series of heuristics.
/// When they are not conclusive, the blank nodes left unmapped are split into isolated sub-graphs,
/// matched one at a time, and an exhaustive search covers whatever remains.
/// The exhaustive search may be bounded with [`with_step_limit`](GraphMatcher::with_step_limit).
#[derive(Clone, Debug, Default)]
pub struct GraphMatcher {
    step_limit: Option<usize>,
    mapping: Option<Mapping>,
    steps: usize,
}

impl GraphMatcher {
    /// A matcher with an unbounded exhaustive search.
    pub fn new() -> Self {
        Self::default()
    }

    /// A matcher giving up (with [`MatchError::StepLimitExceeded`])
    /// after trying `limit` assignments in the exhaustive search.
    pub fn with_step_limit(limit: usize) -> Self {
        GraphMatcher {
            step_limit: Some(limit),
            ..Self::default()
        }
    }

    /// The step budget of the exhaustive search, if any.
    pub fn step_limit(&self) -> Option<usize> {
        self.step_limit
    }

    /// The mapping from the blank nodes of `a` to those of `b`
    /// found by the last call to [`equals`](GraphMatcher::equals),
    /// if that call returned `Ok(true)`.
    pub fn mapping(&self) -> Option<&Mapping> {
        self.mapping.as_ref()
    }

    /// The number of assignments tried by the exhaustive search
    /// during the last call to [`equals`](GraphMatcher::equals).
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Consume this matcher, returning its [mapping](GraphMatcher::mapping).
    pub fn into_mapping(self) -> Option<Mapping> {
        self.mapping
    }

    /// Whether `a` and `b` are equal up to a bijective renaming of their blank nodes.
    ///
    /// # Error
    /// [`MatchError::AllBlankTriple`] if a triple of either graph is made of three blank nodes
    /// (unless `a` and `b` are the same object);
    /// [`MatchError::StepLimitExceeded`] if the step budget is exhausted.
    pub fn equals<A, B>(&mut self, a: &A, b: &B) -> Result<bool, MatchError>
    where
        A: TripleIndex + ?Sized,
        B: TripleIndex + ?Sized,
    {
        self.mapping = None;
        self.steps = 0;
        self.mapping = self.compute(a, b)?;
        Ok(self.mapping.is_some())
    }

    fn compute<A, B>(&mut self, a: &A, b: &B) -> Result<Option<Mapping>, MatchError>
    where
        A: TripleIndex + ?Sized,
        B: TripleIndex + ?Sized,
    {
        if std::ptr::eq(a as *const A as *const (), b as *const B as *const ()) {
            debug!("[EQUAL] same graph");
            let blanks: HashSet<Node> = a
                .triples()
                .flat_map(|t| t.blank_nodes().cloned().collect::<Vec<_>>())
                .collect();
            return Ok(Some(Mapping::identity(blanks)));
        }
        if a.len() != b.len() {
            debug!("[NOT EQUAL] {} triples vs {}", a.len(), b.len());
            return Ok(None);
        }

        if let Some(t) = all_blank_triple(a).or_else(|| all_blank_triple(b)) {
            return Err(MatchError::AllBlankTriple(t));
        }
        let Some(source) = partition(a, b) else {
            debug!("[NOT EQUAL] ground triple of the first graph missing from the second");
            return Ok(None);
        };
        let Some(target) = partition(b, a) else {
            debug!("[NOT EQUAL] ground triple of the second graph missing from the first");
            return Ok(None);
        };
        if source.triples.is_empty() && target.triples.is_empty() {
            debug!("[EQUAL] ground graphs");
            return Ok(Some(Mapping::new()));
        }

        if source.degrees.len() != target.degrees.len() {
            debug!(
                "[NOT EQUAL] {} blank nodes vs {}",
                source.degrees.len(),
                target.degrees.len()
            );
            return Ok(None);
        }
        if degree_classes(&source) != degree_classes(&target) {
            debug!("[NOT EQUAL] blank node degrees differ");
            return Ok(None);
        }

        let identity: BTreeMap<Node, Node> =
            source.degrees.keys().map(|n| (n.clone(), n.clone())).collect();
        if source.degrees.keys().all(|n| target.degrees.contains_key(n))
            && validate(&identity, &source, &target)
        {
            debug!("[EQUAL] identity mapping");
            return Ok(Some(Mapping::from_map(identity)));
        }

        let mut state = State::new(&source, &target);
        state.map_single_use_nodes();
        state.map_unique_degrees();
        let source_deps = Dependencies::new(&source.triples);
        let target_deps = Dependencies::new(&target.triples);
        if !state.map_independent_nodes(&source_deps, &target_deps) {
            return Ok(None);
        }
        state.map_canonical_pairs(&source_deps, &target_deps);
        let working = state.map_dependent_pairs(&source_deps, &target_deps);

        if working.len() == source.degrees.len() {
            if validate(&working, &source, &target) {
                debug!("[EQUAL] complete mapping from heuristics");
                return Ok(Some(Mapping::from_map(working)));
            }
            trace!("complete mapping from heuristics is invalid");
        } else {
            trace!(
                "heuristics mapped {} of {} blank nodes",
                working.len(),
                source.degrees.len()
            );
        }

        if !state.map_components(self.step_limit, &mut self.steps)? {
            return Ok(None);
        }

        let mut search =
            BruteForce::new(&source, &target, self.step_limit).counting_from(self.steps);
        let found = search.run(&state.base);
        self.steps = search.steps();
        match found? {
            Some(found) => {
                debug!("[EQUAL] brute force, {} steps", self.steps);
                Ok(Some(Mapping::from_map(found)))
            }
            None => {
                debug!("[NOT EQUAL] brute force, {} steps", self.steps);
                Ok(None)
            }
        }
    }
}

/// The smallest triple of `g` made of three blank nodes, if any.
fn all_blank_triple<G: TripleIndex + ?Sized>(g: &G) -> Option<Triple> {
    g.triples().filter(|t| t.is_all_blank()).min()
}

/// Collect the non-ground triples of `g`,
/// or return `None` if one of its ground triples is missing from `other`.
fn partition<G, H>(g: &G, other: &H) -> Option<Side>
where
    G: TripleIndex + ?Sized,
    H: TripleIndex + ?Sized,
{
    let mut non_ground = Vec::new();
    for t in g.triples() {
        if t.is_ground() {
            if !other.contains(&t) {
                return None;
            }
        } else {
            non_ground.push(t);
        }
    }
    Some(Side::new(non_ground))
}

/// A connected set of blank nodes, not mapped yet,
/// with every triple involving them.
struct Component {
    nodes: Vec<Node>,
    side: Side,
}

/// Split the blank nodes of `side` for which `mapped` returns `false`
/// into sets connected by the triples they share.
///
/// Mapped nodes do not connect anything.
/// Components are sorted by size, then by their first node.
fn components<F>(side: &Side, mapped: F) -> Vec<Component>
where
    F: Fn(&Node) -> bool,
{
    let mut neighbours: BTreeMap<&Node, Vec<&Triple>> = BTreeMap::new();
    for t in &side.triples {
        for b in t.blank_nodes().filter(|&b| !mapped(b)) {
            let triples = neighbours.entry(b).or_default();
            if triples.last() != Some(&t) {
                triples.push(t);
            }
        }
    }
    let mut seen: HashSet<&Node> = HashSet::new();
    let mut found = Vec::new();
    for &start in neighbours.keys() {
        if !seen.insert(start) {
            continue;
        }
        let mut nodes = vec![start.clone()];
        let mut triples: HashSet<&Triple> = HashSet::new();
        let mut todo = vec![start];
        while let Some(n) = todo.pop() {
            for &t in neighbours.get(n).into_iter().flatten() {
                triples.insert(t);
                for b in t.blank_nodes().filter(|&b| !mapped(b)) {
                    if seen.insert(b) {
                        nodes.push(b.clone());
                        todo.push(b);
                    }
                }
            }
        }
        nodes.sort();
        let side = Side::new(triples.into_iter().cloned().collect());
        found.push(Component { nodes, side });
    }
    found.sort_by(|c1, c2| {
        (c1.nodes.len(), c1.side.triples.len(), &c1.nodes[0])
            .cmp(&(c2.nodes.len(), c2.side.triples.len(), &c2.nodes[0]))
    });
    found
}

/// How many blank nodes have each degree.
fn degree_classes(side: &Side) -> BTreeMap<usize, usize> {
    let mut classes = BTreeMap::new();
    for degree in side.degrees.values() {
        *classes.entry(*degree).or_insert(0) += 1;
    }
    classes
}

/// The mapping under construction.
///
/// `base` only receives pairings that every mapping must contain
/// (given the pairings already in it);
/// it is the starting point of the exhaustive search.
struct State<'a> {
    source: &'a Side,
    target: &'a Side,
    base: BTreeMap<Node, Node>,
    used: HashSet<Node>,
}

impl<'a> State<'a> {
    fn new(source: &'a Side, target: &'a Side) -> Self {
        State {
            source,
            target,
            base: BTreeMap::new(),
            used: HashSet::new(),
        }
    }

    fn assign(&mut self, from: &Node, to: &Node) {
        trace!("mapping {} -> {}", from, to);
        self.base.insert(from.clone(), to.clone());
        self.used.insert(to.clone());
    }

    fn is_free(&self, source: &Node, target: &Node) -> bool {
        !self.base.contains_key(source)
            && !self.used.contains(target)
            && self.source.degree(source) == self.target.degree(target)
    }

    /// Target nodes of the given degree, not mapped yet.
    fn free_targets(&self, degree: usize) -> Vec<Node> {
        self.target
            .degrees
            .iter()
            .filter(|(n, d)| **d == degree && !self.used.contains(*n))
            .map(|(n, _)| n.clone())
            .collect()
    }

    /// Map nodes occurring in a single triple,
    /// whose other blank nodes (if any) are already mapped.
    ///
    /// Candidates of degree 1 are interchangeable as long as they produce the same triple;
    /// each target triple is consumed at most once.
    fn map_single_use_nodes(&mut self) {
        let mut pool: HashSet<Triple> = self.target.set.clone();
        let singles: Vec<Node> = self
            .source
            .degrees
            .iter()
            .filter(|(_, d)| **d == 1)
            .map(|(n, _)| n.clone())
            .collect();
        let mut mapped = 0;
        for x in singles {
            let Some(t) = self.source.triples_of(&x).next().cloned() else {
                continue;
            };
            if !t.blank_nodes().all(|b| b == &x || self.base.contains_key(b)) {
                continue;
            }
            for y in self.free_targets(1) {
                let image = t.map_nodes(|n| {
                    if n == &x {
                        y.clone()
                    } else {
                        self.base.get(n).unwrap_or(n).clone()
                    }
                });
                if pool.remove(&image) {
                    self.assign(&x, &y);
                    mapped += 1;
                    break;
                }
            }
        }
        trace!("single-use nodes: {} mapped", mapped);
    }

    /// A degree held by exactly one node in each graph forces their pairing.
    fn map_unique_degrees(&mut self) {
        let source_classes = degree_classes(self.source);
        for (degree, count) in source_classes {
            if count != 1 {
                continue;
            }
            let x = self.source.degrees.iter().find(|(_, d)| **d == degree);
            let y = self.target.degrees.iter().find(|(_, d)| **d == degree);
            if let (Some((x, _)), Some((y, _))) = (x, y) {
                if self.is_free(x, y) {
                    let (x, y) = (x.clone(), y.clone());
                    self.assign(&x, &y);
                }
            }
        }
    }

    /// Map the nodes belonging to no dependency pair,
    /// to target nodes whose triples are the image of theirs.
    ///
    /// Return `false` if the graphs can not be equal.
    fn map_independent_nodes(&mut self, source_deps: &Dependencies, target_deps: &Dependencies) -> bool {
        let independent: Vec<Node> = self
            .source
            .degrees
            .keys()
            .filter(|n| source_deps.is_independent(n))
            .cloned()
            .collect();
        let target_independent = self
            .target
            .degrees
            .keys()
            .filter(|n| target_deps.is_independent(n))
            .count();
        if independent.len() != target_independent {
            debug!(
                "[NOT EQUAL] {} independent blank nodes vs {}",
                independent.len(),
                target_independent
            );
            return false;
        }
        for x in independent {
            if self.base.contains_key(&x) {
                continue;
            }
            let found = self
                .free_targets(self.source.degree(&x))
                .into_iter()
                .filter(|y| target_deps.is_independent(y))
                .find(|y| {
                    self.source.triples_of(&x).all(|t| {
                        let image = t.map_nodes(|n| if n == &x { y.clone() } else { n.clone() });
                        self.target.set.contains(&image)
                    })
                });
            match found {
                Some(y) => self.assign(&x, &y),
                None => {
                    debug!("[NOT EQUAL] no match for independent blank node {}", x);
                    return false;
                }
            }
        }
        true
    }

    /// Promote the pairings forced by pairs that are unique of their shape in both graphs.
    fn map_canonical_pairs(&mut self, source_deps: &Dependencies, target_deps: &Dependencies) {
        let canonical: Vec<(MappingPair, MappingPair)> = source_deps
            .pairs()
            .filter(|pair| source_deps.is_canonical(pair))
            .filter_map(|pair| {
                target_deps
                    .canonical_match(pair)
                    .map(|other| (pair.clone(), other.clone()))
            })
            .collect();
        for (pair, other) in canonical {
            // only from pairings already in the base
            let consistent = [(&pair.first, &other.first), (&pair.second, &other.second)]
                .into_iter()
                .all(|(x, y)| match self.base.get(x) {
                    Some(mapped) => mapped == y,
                    None => self.is_free(x, y),
                });
            if consistent {
                for (x, y) in [(&pair.first, &other.first), (&pair.second, &other.second)] {
                    if !self.base.contains_key(x) {
                        self.assign(x, y);
                    }
                }
            } else {
                trace!("canonical pair {:?} conflicts with the base mapping", pair);
            }
        }
    }

    /// Map the isolated sub-graphs of the nodes left unmapped,
    /// each onto the first sub-graph of the target that it matches,
    /// given the pairings already in the base.
    ///
    /// Sub-graphs matching the same source sub-graph are interchangeable,
    /// so the first match is as good as any.
    /// Nothing is mapped unless there are at least two sub-graphs.
    /// Return `false` if the graphs can not be equal.
    fn map_components(
        &mut self,
        step_limit: Option<usize>,
        steps: &mut usize,
    ) -> Result<bool, MatchError> {
        let sources = components(self.source, |n| self.base.contains_key(n));
        let targets = components(self.target, |n| self.used.contains(n));
        if sources.len() != targets.len() {
            debug!(
                "[NOT EQUAL] {} isolated sub-graphs vs {}",
                sources.len(),
                targets.len()
            );
            return Ok(false);
        }
        if sources.len() < 2 {
            trace!("divide and conquer: {} isolated sub-graph", sources.len());
            return Ok(true);
        }
        trace!("divide and conquer: {} isolated sub-graphs", sources.len());
        let mut targets: Vec<Option<Component>> = targets.into_iter().map(Some).collect();
        for c in &sources {
            let mut matched = None;
            for (i, d) in targets.iter().enumerate() {
                let Some(d) = d else {
                    continue;
                };
                if d.nodes.len() != c.nodes.len() || d.side.triples.len() != c.side.triples.len() {
                    continue;
                }
                let mut search =
                    BruteForce::new(&c.side, &d.side, step_limit).counting_from(*steps);
                let found = search.run(&self.base);
                *steps = search.steps();
                if let Some(found) = found? {
                    matched = Some((i, found));
                    break;
                }
            }
            let Some((i, found)) = matched else {
                debug!("[NOT EQUAL] no match for the isolated sub-graph of {}", c.nodes[0]);
                return Ok(false);
            };
            targets[i] = None;
            for x in &c.nodes {
                if let Some(y) = found.get(x) {
                    self.assign(x, y);
                }
            }
        }
        trace!(
            "divide and conquer: {} of {} blank nodes mapped",
            self.base.len(),
            self.source.degrees.len()
        );
        Ok(true)
    }

    /// Extend the base mapping with tentative pairings of dependency pairs,
    /// matching pairs of the same shape and sharing as many triples.
    ///
    /// The result is not added to the base mapping.
    fn map_dependent_pairs(
        &self,
        source_deps: &Dependencies,
        target_deps: &Dependencies,
    ) -> BTreeMap<Node, Node> {
        let mut working = self.base.clone();
        let mut used = self.used.clone();
        for pair in source_deps.pairs() {
            if working.contains_key(&pair.first) && working.contains_key(&pair.second) {
                continue;
            }
            let shared = source_deps.shared_triples(pair);
            let accepts = |x: &Node, y: &Node, working: &BTreeMap<Node, Node>, used: &HashSet<Node>| {
                match working.get(x) {
                    Some(mapped) => mapped == y,
                    None => !used.contains(y) && self.source.degree(x) == self.target.degree(y),
                }
            };
            let candidate = target_deps.pairs().find(|other| {
                other.same_shape(pair)
                    && target_deps.shared_triples(other) == shared
                    && accepts(&pair.first, &other.first, &working, &used)
                    && accepts(&pair.second, &other.second, &working, &used)
            });
            if let Some(other) = candidate {
                for (x, y) in [(&pair.first, &other.first), (&pair.second, &other.second)] {
                    if !working.contains_key(x) {
                        working.insert(x.clone(), y.clone());
                        used.insert(y.clone());
                    }
                }
            }
        }
        working
    }
}
