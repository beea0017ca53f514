//! Exhaustive search of a mapping, by iterative backtracking.
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap, HashSet};

use log::trace;
use ternary_api::node::Node;
use ternary_api::triple::Triple;

use crate::mapping::apply;
use crate::MatchError;

/// The non-ground part of one of the compared graphs.
#[derive(Clone, Debug, Default)]
pub(crate) struct Side {
    /// non-ground triples, sorted
    pub triples: Vec<Triple>,
    pub set: HashSet<Triple>,
    pub degrees: BTreeMap<Node, usize>,
}

impl Side {
    pub fn new(mut triples: Vec<Triple>) -> Self {
        triples.sort();
        let mut degrees = BTreeMap::new();
        for t in &triples {
            // a node occurring twice in a triple counts once
            let mut blanks: Vec<&Node> = t.blank_nodes().collect();
            blanks.sort();
            blanks.dedup();
            for b in blanks {
                *degrees.entry(b.clone()).or_insert(0) += 1;
            }
        }
        let set = triples.iter().cloned().collect();
        Side {
            triples,
            set,
            degrees,
        }
    }

    pub fn degree(&self, node: &Node) -> usize {
        self.degrees.get(node).copied().unwrap_or(0)
    }

    pub fn triples_of<'a>(&'a self, node: &'a Node) -> impl Iterator<Item = &'a Triple> + 'a {
        self.triples.iter().filter(move |t| t.involves(node))
    }
}

/// Whether applying `map` to every source triple yields a triple of `target`.
///
/// With an injective `map` total over the source blank nodes,
/// and sides of equal size, this means the mapped source is exactly `target`.
pub(crate) fn validate(map: &BTreeMap<Node, Node>, source: &Side, target: &Side) -> bool {
    source.triples.len() == target.triples.len()
        && source
            .triples
            .iter()
            .all(|t| target.set.contains(&apply(map, t)))
}

struct Frame {
    source: Node,
    candidates: Vec<Node>,
    cursor: usize,
    current: Option<Node>,
}

/// Backtracking search of a bijection extending `base`.
pub(crate) struct BruteForce<'a> {
    source: &'a Side,
    target: &'a Side,
    step_limit: Option<usize>,
    steps: usize,
    /// for each source blank node, its triples
    neighbourhood: HashMap<Node, Vec<Triple>>,
}

impl<'a> BruteForce<'a> {
    pub fn new(source: &'a Side, target: &'a Side, step_limit: Option<usize>) -> Self {
        let mut neighbourhood: HashMap<Node, Vec<Triple>> = HashMap::new();
        for t in &source.triples {
            for b in t.blank_nodes() {
                let triples = neighbourhood.entry(b.clone()).or_default();
                if triples.last() != Some(t) {
                    triples.push(t.clone());
                }
            }
        }
        BruteForce {
            source,
            target,
            step_limit,
            steps: 0,
            neighbourhood,
        }
    }

    /// Count `steps` assignments as already tried, against the step limit.
    pub fn counting_from(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    /// The number of assignments tried so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Search a complete mapping extending `base`.
    ///
    /// Return `Ok(None)` if no such mapping exists.
    pub fn run(
        &mut self,
        base: &BTreeMap<Node, Node>,
    ) -> Result<Option<BTreeMap<Node, Node>>, MatchError> {
        let order = self.search_order(base);
        trace!(
            "brute force: {} nodes to map, {} already mapped",
            order.len(),
            base.len()
        );
        let mut assignment = base.clone();
        let mut used: HashSet<Node> = base.values().cloned().collect();
        if order.is_empty() {
            return Ok(validate(&assignment, self.source, self.target).then_some(assignment));
        }

        let mut stack = vec![self.frame(&order[0])];
        while let Some(frame) = stack.last_mut() {
            if let Some(previous) = frame.current.take() {
                assignment.remove(&frame.source);
                used.remove(&previous);
            }
            let mut assigned = false;
            while frame.cursor < frame.candidates.len() {
                let candidate = &frame.candidates[frame.cursor];
                frame.cursor += 1;
                if used.contains(candidate) {
                    continue;
                }
                self.steps += 1;
                if let Some(limit) = self.step_limit {
                    if self.steps > limit {
                        return Err(MatchError::StepLimitExceeded(limit));
                    }
                }
                assignment.insert(frame.source.clone(), candidate.clone());
                if self.consistent(&frame.source, &assignment) {
                    used.insert(candidate.clone());
                    frame.current = Some(candidate.clone());
                    assigned = true;
                    break;
                }
                assignment.remove(&frame.source);
            }
            if !assigned {
                stack.pop();
                continue;
            }
            if stack.len() == order.len() {
                if validate(&assignment, self.source, self.target) {
                    trace!("brute force: found a mapping after {} steps", self.steps);
                    return Ok(Some(assignment));
                }
                continue;
            }
            let next = self.frame(&order[stack.len()]);
            stack.push(next);
        }
        trace!("brute force: no mapping after {} steps", self.steps);
        Ok(None)
    }

    fn frame(&self, source: &Node) -> Frame {
        let degree = self.source.degree(source);
        let candidates = self
            .target
            .degrees
            .iter()
            .filter(|(_, d)| **d == degree)
            .map(|(n, _)| n.clone())
            .collect();
        Frame {
            source: source.clone(),
            candidates,
            cursor: 0,
            current: None,
        }
    }

    /// Whether every triple of `node` whose blank nodes are all assigned maps into the target.
    fn consistent(&self, node: &Node, assignment: &BTreeMap<Node, Node>) -> bool {
        self.neighbourhood.get(node).map_or(true, |triples| {
            triples
                .iter()
                .filter(|t| t.blank_nodes().all(|b| assignment.contains_key(b)))
                .all(|t| self.target.set.contains(&apply(assignment, t)))
        })
    }

    /// Order the source nodes missing from `base`,
    /// preferring nodes sharing triples with already ordered (or mapped) ones,
    /// so that inconsistent assignments are detected early.
    fn search_order(&self, base: &BTreeMap<Node, Node>) -> Vec<Node> {
        let mut placed: HashSet<&Node> = base.keys().collect();
        let mut remaining: Vec<&Node> = self
            .source
            .degrees
            .keys()
            .filter(|n| !base.contains_key(*n))
            .collect();
        let mut order = Vec::with_capacity(remaining.len());
        while !remaining.is_empty() {
            let best = remaining
                .iter()
                .enumerate()
                .max_by_key(|&(i, &n)| {
                    let links = self.neighbourhood.get(n).map_or(0, |triples| {
                        triples
                            .iter()
                            .filter(|t| t.blank_nodes().any(|b| placed.contains(b)))
                            .count()
                    });
                    // ties go to the highest degree, then to the first node
                    (links, self.source.degree(n), Reverse(i))
                })
                .map(|(i, _)| i)
                .unwrap_or(0);
            let node = remaining.remove(best);
            placed.insert(node);
            order.push(node.clone());
        }
        order
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn uri(suffix: &str) -> Node {
        Node::uri_unchecked(format!("http://example.org/{}", suffix))
    }

    fn cycle(nodes: &[Node]) -> Side {
        let n = nodes.len();
        Side::new(
            (0..n)
                .map(|i| Triple::new(nodes[i].clone(), uri("next"), nodes[(i + 1) % n].clone()))
                .collect(),
        )
    }

    fn blanks(n: usize) -> Vec<Node> {
        (0..n).map(|_| Node::blank()).collect()
    }

    #[test]
    fn degrees_count_triples() {
        let (b1, b2) = (Node::blank(), Node::blank());
        let side = Side::new(vec![
            Triple::new(b1.clone(), uri("p"), b1.clone()),
            Triple::new(b1.clone(), uri("q"), b2.clone()),
        ]);
        assert_eq!(side.degree(&b1), 2);
        assert_eq!(side.degree(&b2), 1);
        assert_eq!(side.triples_of(&b2).count(), 1);
    }

    #[test]
    fn finds_cycle_mapping() {
        let (a, b) = (blanks(5), blanks(5));
        let (source, target) = (cycle(&a), cycle(&b));
        let mut search = BruteForce::new(&source, &target, None);
        let found = search.run(&BTreeMap::new()).unwrap().unwrap();
        assert_eq!(found.len(), 5);
        assert!(validate(&found, &source, &target));
    }

    #[test]
    fn respects_base() {
        let (a, b) = (blanks(4), blanks(4));
        let (source, target) = (cycle(&a), cycle(&b));
        let mut base = BTreeMap::new();
        base.insert(a[0].clone(), b[2].clone());
        let found = BruteForce::new(&source, &target, None)
            .run(&base)
            .unwrap()
            .unwrap();
        assert_eq!(found.get(&a[1]), Some(&b[3]));
        assert_eq!(found.get(&a[3]), Some(&b[1]));
    }

    #[test]
    fn reports_absence() {
        // a 6-cycle versus two 3-cycles: same degrees, not isomorphic
        let (a, b) = (blanks(6), blanks(6));
        let source = cycle(&a);
        let mut triples = cycle(&b[..3]).triples;
        triples.extend(cycle(&b[3..]).triples);
        let target = Side::new(triples);
        let mut search = BruteForce::new(&source, &target, None);
        assert_eq!(search.run(&BTreeMap::new()), Ok(None));
        assert!(search.steps() > 0);
    }

    #[test]
    fn steps_already_spent_count_against_the_limit() {
        let (a, b) = (blanks(4), blanks(4));
        let (source, target) = (cycle(&a), cycle(&b));
        let mut search = BruteForce::new(&source, &target, Some(10)).counting_from(10);
        assert_eq!(
            search.run(&BTreeMap::new()),
            Err(MatchError::StepLimitExceeded(10))
        );
        assert_eq!(search.steps(), 11);
    }

    #[test]
    fn step_limit() {
        let (a, b) = (blanks(6), blanks(6));
        let source = cycle(&a);
        let mut triples = cycle(&b[..3]).triples;
        triples.extend(cycle(&b[3..]).triples);
        let target = Side::new(triples);
        let mut search = BruteForce::new(&source, &target, Some(3));
        assert_eq!(
            search.run(&BTreeMap::new()),
            Err(MatchError::StepLimitExceeded(3))
        );
    }
}
