use super::*;
use lazy_static::lazy_static;
use crate::brute_force::{BruteForce, Side};
use std::collections::{BTreeMap, HashSet};
use ternary_api::node::Node;
use ternary_api::triple::Triple;
use ternary_inmem::graph::Graph;
use ternary_inmem::index::{SortedIndex, TrieIndex};
use test_case::test_case;

lazy_static! {
    static ref FOAF_KNOWS: Node = Node::uri_unchecked("http://xmlns.com/foaf/0.1/knows");
    static ref FOAF_MBOX: Node = Node::uri_unchecked("http://xmlns.com/foaf/0.1/mbox");
    static ref FOAF_NAME: Node = Node::uri_unchecked("http://xmlns.com/foaf/0.1/name");
    static ref MBOX_ALICE: Node = Node::uri_unchecked("mailto:alice@work.example");
    static ref LIT_ALICE: Node = Node::literal("alice");
    static ref LIT_BOB: Node = Node::literal("bob");
    static ref NEXT: Node = Node::uri_unchecked("http://example.org/next");
}

fn uri(suffix: &str) -> Node {
    Node::uri_unchecked(format!("http://example.org/{}", suffix))
}

fn blanks(n: usize) -> Vec<Node> {
    (0..n).map(|_| Node::blank()).collect()
}

fn graph(triples: Vec<Triple>) -> Graph {
    let mut g = Graph::new();
    g.assert_all(triples);
    g
}

fn cycle(nodes: &[Node]) -> Vec<Triple> {
    let n = nodes.len();
    (0..n)
        .map(|i| Triple::new(nodes[i].clone(), NEXT.clone(), nodes[(i + 1) % n].clone()))
        .collect()
}

fn people(alice: &Node, bob: &Node) -> Vec<Triple> {
    vec![
        Triple::new(alice.clone(), FOAF_NAME.clone(), LIT_ALICE.clone()),
        Triple::new(alice.clone(), FOAF_MBOX.clone(), MBOX_ALICE.clone()),
        Triple::new(alice.clone(), FOAF_KNOWS.clone(), bob.clone()),
        Triple::new(bob.clone(), FOAF_NAME.clone(), LIT_BOB.clone()),
    ]
}

/// Check that `mapping` covers every blank node of `a`, and maps `a` onto `b`.
fn assert_maps_onto<A, B>(mapping: &Mapping, a: &A, b: &B)
where
    A: TripleIndex + ?Sized,
    B: TripleIndex + ?Sized,
{
    let a_blanks: HashSet<Node> = a
        .triples()
        .flat_map(|t| t.blank_nodes().cloned().collect::<Vec<_>>())
        .collect();
    assert_eq!(mapping.len(), a_blanks.len());
    for b in &a_blanks {
        assert!(mapping.get(b).is_some(), "{} is not mapped", b);
    }
    let images: HashSet<&Node> = mapping.iter().map(|(_, image)| image).collect();
    assert_eq!(images.len(), mapping.len());
    for t in a.triples() {
        assert!(b.contains(&mapping.apply(&t)), "{} has no image", t);
    }
}

#[test]
fn no_blank_node() -> Result<(), MatchError> {
    crate::test_setup();
    let make = |i1: &str, i2: &str| graph(people(&uri(i1), &uri(i2)));
    let g1 = make("alice", "bob");
    let g2 = make("alice", "bob");
    let g3 = make("a", "b");

    let mut matcher = GraphMatcher::new();
    assert!(matcher.equals(&g1, &g2)?);
    assert_eq!(matcher.mapping(), Some(&Mapping::default()));
    assert!(!matcher.equals(&g1, &g3)?);
    assert_eq!(matcher.mapping(), None);
    assert!(!isomorphic_graphs(&g3, &g1)?);
    Ok(())
}

#[test]
fn reflexivity() -> Result<(), MatchError> {
    crate::test_setup();
    let b = blanks(2);
    let g = graph(people(&b[0], &b[1]));
    let mut matcher = GraphMatcher::new();
    assert!(matcher.equals(&g, &g)?);
    let mapping = matcher.mapping().unwrap();
    assert_eq!(mapping.len(), 2);
    for (source, image) in mapping {
        assert_eq!(source, image);
    }
    Ok(())
}

#[test]
fn same_labels_in_distinct_graphs() -> Result<(), MatchError> {
    crate::test_setup();
    let b = blanks(2);
    let g1 = graph(people(&b[0], &b[1]));
    let g2: HashSet<Triple> = people(&b[0], &b[1]).into_iter().collect();
    let mapping = match_graphs(&g1, &g2)?.unwrap();
    assert_eq!(mapping.get(&b[0]), Some(&b[0]));
    assert_maps_onto(&mapping, &g1, &g2);
    Ok(())
}

#[test]
fn relabeling() -> Result<(), MatchError> {
    crate::test_setup();
    let (a, b) = (blanks(2), blanks(2));
    let g1 = graph(people(&a[0], &a[1]));
    let g2 = graph(people(&b[1], &b[0]));
    let mapping = match_graphs(&g1, &g2)?.unwrap();
    assert_eq!(mapping.get(&a[0]), Some(&b[1]));
    assert_eq!(mapping.get(&a[1]), Some(&b[0]));
    assert_maps_onto(&mapping, &g1, &g2);
    // and back
    let back = match_graphs(&g2, &g1)?.unwrap();
    assert_eq!(back.get(&b[1]), Some(&a[0]));
    Ok(())
}

#[test]
fn single_blank_node() -> Result<(), MatchError> {
    crate::test_setup();
    let (x, y) = (Node::blank(), Node::blank());
    let g1 = graph(vec![Triple::new(x.clone(), uri("p"), uri("o"))]);
    let g2 = graph(vec![Triple::new(y.clone(), uri("p"), uri("o"))]);
    let mapping = match_graphs(&g1, &g2)?.unwrap();
    assert_eq!(mapping.len(), 1);
    assert_eq!(mapping.get(&x), Some(&y));
    Ok(())
}

#[test]
fn ground_mismatch() -> Result<(), MatchError> {
    crate::test_setup();
    let (a, b) = (blanks(2), blanks(2));
    let mut t1 = people(&a[0], &a[1]);
    t1.push(Triple::new(uri("s"), uri("p"), uri("o1")));
    let mut t2 = people(&b[0], &b[1]);
    t2.push(Triple::new(uri("s"), uri("p"), uri("o2")));
    assert!(!isomorphic_graphs(&graph(t1), &graph(t2))?);
    Ok(())
}

#[test]
fn size_mismatch() -> Result<(), MatchError> {
    crate::test_setup();
    let (a, b) = (blanks(2), blanks(2));
    let g1 = graph(people(&a[0], &a[1]));
    let g2 = graph(people(&b[0], &b[1])[1..].to_vec());
    assert!(!isomorphic_graphs(&g1, &g2)?);
    assert!(!isomorphic_graphs(&g2, &g1)?);
    Ok(())
}

#[test]
fn moved_blank_node() -> Result<(), MatchError> {
    crate::test_setup();
    let (a, b) = (blanks(2), blanks(3));
    let g1 = graph(people(&a[0], &a[1]));
    let mut t2 = people(&b[0], &b[1]);
    t2[3] = Triple::new(b[2].clone(), FOAF_NAME.clone(), LIT_BOB.clone());
    let g2 = graph(t2);
    assert!(!isomorphic_graphs(&g1, &g2)?);
    assert!(!isomorphic_graphs(&g2, &g1)?);
    Ok(())
}

#[test]
fn degree_distribution_differs() -> Result<(), MatchError> {
    crate::test_setup();
    let (a, b) = (blanks(5), blanks(5));
    let p = uri("p");
    let g1 = graph(vec![
        Triple::new(a[0].clone(), p.clone(), a[1].clone()),
        Triple::new(a[0].clone(), p.clone(), a[2].clone()),
        Triple::new(a[3].clone(), p.clone(), a[4].clone()),
    ]);
    let g2 = graph(vec![
        Triple::new(b[0].clone(), p.clone(), b[1].clone()),
        Triple::new(b[2].clone(), p.clone(), b[3].clone()),
        Triple::new(b[4].clone(), p.clone(), uri("o")),
    ]);
    assert_eq!(g1.len(), g2.len());
    assert!(!isomorphic_graphs(&g1, &g2)?);
    assert!(!isomorphic_graphs(&g2, &g1)?);
    Ok(())
}

#[test_case(true; "in the first graph")]
#[test_case(false; "in the second graph")]
fn all_blank_triple_is_rejected(first: bool) {
    crate::test_setup();
    let b = blanks(4);
    let degenerate = graph(vec![
        Triple::new(b[0].clone(), b[1].clone(), b[2].clone()),
        Triple::new(uri("s"), uri("p"), uri("o")),
    ]);
    let other = graph(vec![
        Triple::new(b[3].clone(), uri("p"), uri("o")),
        Triple::new(uri("s"), uri("p"), uri("o")),
    ]);
    let expected = Err(MatchError::AllBlankTriple(Triple::new(
        b[0].clone(),
        b[1].clone(),
        b[2].clone(),
    )));
    if first {
        assert_eq!(isomorphic_graphs(&degenerate, &other), expected);
    } else {
        assert_eq!(isomorphic_graphs(&other, &degenerate), expected);
    }
}

#[test_case(true; "in the first graph")]
#[test_case(false; "in the second graph")]
fn all_blank_triple_is_rejected_despite_ground_mismatch(first: bool) {
    crate::test_setup();
    let b = blanks(3);
    let all_blank = Triple::new(b[0].clone(), b[1].clone(), b[2].clone());
    for _ in 0..50 {
        let degenerate = graph(vec![
            all_blank.clone(),
            Triple::new(uri("s"), uri("p"), uri("o1")),
        ]);
        let other = graph(vec![
            Triple::new(uri("s"), uri("p"), uri("o2")),
            Triple::new(uri("s"), uri("p"), uri("o3")),
        ]);
        let got = if first {
            isomorphic_graphs(&degenerate, &other)
        } else {
            isomorphic_graphs(&other, &degenerate)
        };
        assert_eq!(got, Err(MatchError::AllBlankTriple(all_blank.clone())));
    }
}

#[test]
fn smallest_all_blank_triple_is_reported() {
    crate::test_setup();
    let b = blanks(6);
    let first = Triple::new(b[0].clone(), b[1].clone(), b[2].clone());
    let second = Triple::new(b[3].clone(), b[4].clone(), b[5].clone());
    let g1 = graph(vec![second.clone(), first.clone()]);
    let g2 = graph(vec![first.clone(), second.clone()]);
    let g3 = graph(vec![
        Triple::new(uri("s"), uri("p"), uri("o1")),
        Triple::new(uri("s"), uri("p"), uri("o2")),
    ]);
    let expected = Err(MatchError::AllBlankTriple(first));
    assert_eq!(isomorphic_graphs(&g1, &g2), expected);
    assert_eq!(isomorphic_graphs(&g3, &g1), expected);
    assert_eq!(isomorphic_graphs(&g2, &g3), expected);
}

#[test]
fn engines_can_be_mixed() -> Result<(), MatchError> {
    crate::test_setup();
    let (a, b, c) = (blanks(2), blanks(2), blanks(2));
    let g1 = graph(people(&a[0], &a[1]));
    let mut g2 = Graph::with_index(TrieIndex::new());
    g2.assert_all(people(&b[0], &b[1]));
    let mut g3 = SortedIndex::new();
    g3.add_all(people(&c[0], &c[1]));
    assert!(isomorphic_graphs(&g1, &g2)?);
    assert!(isomorphic_graphs(&g2, &g3)?);
    let dyn_g3: &dyn TripleIndex = &g3;
    assert!(isomorphic_graphs(dyn_g3, &g1)?);
    Ok(())
}

#[test]
fn chain() -> Result<(), MatchError> {
    crate::test_setup();
    let chain = |nodes: &[Node]| {
        let mut triples: Vec<Triple> = nodes
            .windows(2)
            .map(|w| Triple::new(w[0].clone(), NEXT.clone(), w[1].clone()))
            .collect();
        triples.push(Triple::new(nodes[0].clone(), FOAF_NAME.clone(), LIT_ALICE.clone()));
        triples
    };
    let (a, mut b) = (blanks(6), blanks(6));
    b.reverse();
    let g1 = graph(chain(&a));
    let g2 = graph(chain(&b));
    let mapping = match_graphs(&g1, &g2)?.unwrap();
    for (x, y) in a.iter().zip(b.iter()) {
        assert_eq!(mapping.get(x), Some(y));
    }
    assert_maps_onto(&mapping, &g1, &g2);
    Ok(())
}

#[test]
fn independent_nodes() -> Result<(), MatchError> {
    crate::test_setup();
    let with_values = |nodes: &[Node]| -> Vec<Triple> {
        nodes
            .iter()
            .enumerate()
            .flat_map(|(i, n)| {
                vec![
                    Triple::new(n.clone(), uri("value"), Node::literal(format!("{}", i % 2))),
                    Triple::new(n.clone(), uri("type"), uri("Thing")),
                ]
            })
            .collect()
    };
    let (a, mut b) = (blanks(4), blanks(4));
    b.rotate_left(2);
    let g1 = graph(with_values(&a));
    let g2 = graph(with_values(&b));
    let mapping = match_graphs(&g1, &g2)?.unwrap();
    assert_maps_onto(&mapping, &g1, &g2);

    let g3 = graph(with_values(&blanks(4)).into_iter().skip(1).chain(Some(Triple::new(
        Node::blank(),
        uri("value"),
        Node::literal("2"),
    ))).collect());
    assert!(!isomorphic_graphs(&g1, &g3)?);
    Ok(())
}

#[test_case(3)]
#[test_case(4)]
#[test_case(7)]
#[test_case(10)]
fn cycles(n: usize) -> Result<(), MatchError> {
    crate::test_setup();
    let (a, mut b) = (blanks(n), blanks(n));
    b.rotate_left(n / 2);
    b.reverse();
    // reversing the order of the nodes reverses the cycle; mirror it back
    let g1 = graph(cycle(&a));
    let g2 = graph(
        cycle(&b)
            .into_iter()
            .map(|t| Triple::new(t.o().clone(), t.p().clone(), t.s().clone()))
            .collect(),
    );
    let mapping = match_graphs(&g1, &g2)?.unwrap();
    assert_maps_onto(&mapping, &g1, &g2);
    Ok(())
}

#[test]
fn one_cycle_vs_two_cycles() -> Result<(), MatchError> {
    crate::test_setup();
    let (a, b) = (blanks(6), blanks(6));
    let g1 = graph(cycle(&a));
    let mut t2 = cycle(&b[..3]);
    t2.extend(cycle(&b[3..]));
    let g2 = graph(t2);
    assert!(!isomorphic_graphs(&g1, &g2)?);
    assert!(!isomorphic_graphs(&g2, &g1)?);
    Ok(())
}

#[test]
fn isolated_sub_graphs_are_matched_separately() -> Result<(), MatchError> {
    crate::test_setup();
    let (a, b) = (blanks(12), blanks(12));
    let mut t1 = cycle(&a[..3]);
    t1.extend(cycle(&a[3..7]));
    t1.extend(cycle(&a[7..]));
    // the same cycles, longest first
    let mut t2 = cycle(&b[..5]);
    t2.extend(cycle(&b[5..9]));
    t2.extend(cycle(&b[9..]));
    let (g1, g2) = (graph(t1.clone()), graph(t2.clone()));

    let mut matcher = GraphMatcher::with_step_limit(40);
    assert!(matcher.equals(&g1, &g2)?);
    assert!(matcher.steps() <= 40);
    let mapping = matcher.mapping().unwrap();
    assert_maps_onto(mapping, &g1, &g2);
    assert_eq!(mapping.get(&a[0]).map(|n| b[9..].contains(n)), Some(true));

    // searching the whole graphs at once exhausts the same budget
    let (source, target) = (Side::new(t1), Side::new(t2));
    let mut whole = BruteForce::new(&source, &target, Some(40));
    assert_eq!(
        whole.run(&BTreeMap::new()),
        Err(MatchError::StepLimitExceeded(40))
    );
    Ok(())
}

#[test]
fn isolated_sub_graphs_of_different_sizes() -> Result<(), MatchError> {
    crate::test_setup();
    let (a, b) = (blanks(8), blanks(8));
    let mut t1 = cycle(&a[..3]);
    t1.extend(cycle(&a[3..]));
    let mut t2 = cycle(&b[..4]);
    t2.extend(cycle(&b[4..]));
    let (g1, g2) = (graph(t1), graph(t2));
    let mut matcher = GraphMatcher::with_step_limit(1);
    assert!(!matcher.equals(&g1, &g2)?);
    assert_eq!(matcher.steps(), 0);
    Ok(())
}

#[test]
fn step_limit() {
    crate::test_setup();
    let (a, b) = (blanks(6), blanks(6));
    let g1 = graph(cycle(&a));
    // a 6-cycle with its closing link reversed
    let mut t2: Vec<Triple> = (0..5)
        .map(|i| Triple::new(b[i].clone(), NEXT.clone(), b[i + 1].clone()))
        .collect();
    t2.push(Triple::new(b[0].clone(), NEXT.clone(), b[5].clone()));
    let g2 = graph(t2);

    let mut matcher = GraphMatcher::with_step_limit(2);
    assert_eq!(matcher.step_limit(), Some(2));
    assert_eq!(
        matcher.equals(&g1, &g2),
        Err(MatchError::StepLimitExceeded(2))
    );
    assert_eq!(matcher.mapping(), None);

    let mut unbounded = GraphMatcher::new();
    assert_eq!(unbounded.step_limit(), None);
    assert_eq!(unbounded.equals(&g1, &g2), Ok(false));
}

#[test]
fn mapping_is_reset() -> Result<(), MatchError> {
    crate::test_setup();
    let (a, b) = (blanks(2), blanks(2));
    let g1 = graph(people(&a[0], &a[1]));
    let g2 = graph(people(&b[0], &b[1]));
    let g3 = graph(vec![]);
    let mut matcher = GraphMatcher::new();
    assert!(matcher.equals(&g1, &g2)?);
    assert!(matcher.mapping().is_some());
    assert!(!matcher.equals(&g1, &g3)?);
    assert!(matcher.mapping().is_none());
    Ok(())
}

#[cfg(feature = "all_tests")]
#[test]
fn larger_graphs() -> Result<(), MatchError> {
    crate::test_setup();
    let build = |nodes: &[Node]| -> Vec<Triple> {
        let mut triples = cycle(nodes);
        for (i, n) in nodes.iter().enumerate() {
            if i % 5 == 0 {
                triples.push(Triple::new(n.clone(), uri("mark"), Node::literal(format!("{}", i))));
            }
        }
        triples
    };
    let (a, mut b) = (blanks(60), blanks(60));
    b.rotate_left(17);
    let g1 = graph(build(&a));
    let g2 = graph(build(&b));
    let mapping = match_graphs(&g1, &g2)?.unwrap();
    assert_maps_onto(&mapping, &g1, &g2);
    Ok(())
}
