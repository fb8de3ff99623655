//! Morpheme successor graph for enumerating multi-morpheme parses.
//!
//! Every bigram becomes an edge from its stem to its affix. Indexed
//! morphemes (introduced by affix splitting) are the only nodes that can be
//! reached as an affix and continue as a stem, so chains such as
//! `build -> ing:1 -> s` describe three-morpheme words.

use std::collections::BTreeSet;

use ahash::AHashMap;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::morpheme::Morpheme;
use crate::types::{Bigram, Parse, Side};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Node {
    Stem(Morpheme),
    Affix(Morpheme),
    Bridge(Morpheme),
}

impl Node {
    fn stem(morpheme: &Morpheme) -> Self {
        if morpheme.is_indexed() {
            Node::Bridge(morpheme.clone())
        } else {
            Node::Stem(morpheme.clone())
        }
    }

    fn affix(morpheme: &Morpheme) -> Self {
        if morpheme.is_indexed() {
            Node::Bridge(morpheme.clone())
        } else {
            Node::Affix(morpheme.clone())
        }
    }

    fn morpheme(&self) -> &Morpheme {
        match self {
            Node::Stem(m) | Node::Affix(m) | Node::Bridge(m) => m,
        }
    }
}

pub struct SuccessorGraph {
    graph: DiGraph<Node, ()>,
    node_map: AHashMap<Node, NodeIndex>,
}

impl SuccessorGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: AHashMap::new(),
        }
    }

    pub fn from_bigrams<'a>(bigrams: impl IntoIterator<Item = &'a Bigram>) -> Self {
        let mut graph = Self::new();
        for bigram in bigrams {
            graph.add_bigram(bigram);
        }
        graph
    }

    pub fn add_bigram(&mut self, bigram: &Bigram) {
        let source = self.get_or_create_node(Node::stem(&bigram.stem));
        let target = self.get_or_create_node(Node::affix(&bigram.affix));
        if !self.graph.contains_edge(source, target) {
            self.graph.add_edge(source, target, ());
        }
    }

    fn get_or_create_node(&mut self, node: Node) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(&node) {
            idx
        } else {
            let idx = self.graph.add_node(node.clone());
            self.node_map.insert(node, idx);
            idx
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All maximal chains starting at a plain stem, as left-to-right parses.
    pub fn parses(&self, side: Side) -> BTreeSet<Parse> {
        let mut parses = BTreeSet::new();
        let starts = self
            .graph
            .node_indices()
            .filter(|&idx| matches!(self.graph[idx], Node::Stem(_)));

        for start in starts {
            let mut stack: Vec<Vec<NodeIndex>> = vec![vec![start]];
            while let Some(path) = stack.pop() {
                let Some(&last) = path.last() else {
                    continue;
                };
                let next: Vec<NodeIndex> = self
                    .graph
                    .neighbors(last)
                    .filter(|n| !path.contains(n))
                    .collect();

                if next.is_empty() {
                    if path.len() > 1 {
                        parses.insert(self.to_parse(&path, side));
                    }
                    continue;
                }
                for n in next {
                    let mut extended = path.clone();
                    extended.push(n);
                    stack.push(extended);
                }
            }
        }
        parses
    }

    fn to_parse(&self, path: &[NodeIndex], side: Side) -> Parse {
        let mut morphemes: Vec<Morpheme> = path
            .iter()
            .map(|&idx| self.graph[idx].morpheme().clone())
            .collect();
        if side == Side::Prefix {
            morphemes.reverse();
        }
        Parse::new(morphemes)
    }
}

impl Default for SuccessorGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_morpheme_parses() {
        let bigrams = [Bigram::new("want", "ed"), Bigram::new("want", "")];
        let graph = SuccessorGraph::from_bigrams(&bigrams);
        let parses = graph.parses(Side::Suffix);
        assert_eq!(parses.len(), 2);
        assert!(parses.iter().any(|p| p.surface() == "wanted"));
        assert!(parses.iter().any(|p| p.surface() == "want"));
    }

    #[test]
    fn test_chain_through_bridge() {
        let bridge = Morpheme::indexed("ing", 1);
        let bigrams = [
            Bigram::new(Morpheme::from("build"), bridge.clone()),
            Bigram::new(bridge.clone(), Morpheme::from("s")),
            Bigram::new(bridge.clone(), Morpheme::Null),
            Bigram::new("build", "s"),
        ];
        let graph = SuccessorGraph::from_bigrams(&bigrams);
        let surfaces: BTreeSet<String> = graph.parses(Side::Suffix).iter().map(Parse::surface).collect();
        assert_eq!(
            surfaces,
            BTreeSet::from(["building".to_string(), "buildings".to_string(), "builds".to_string()])
        );
        assert!(graph.parses(Side::Suffix).iter().any(|p| p.len() == 3));
    }

    #[test]
    fn test_prefixal_parses_are_reversed() {
        let bigrams = [Bigram::new("do", "re")];
        let graph = SuccessorGraph::from_bigrams(&bigrams);
        let parse = graph.parses(Side::Prefix).into_iter().next().unwrap();
        assert_eq!(parse.morphemes()[0], Morpheme::from("re"));
        assert_eq!(parse.surface(), "redo");
    }

    #[test]
    fn test_stem_spelled_like_affix_does_not_chain() {
        // "able" as a stem and as an affix are different nodes
        let bigrams = [Bigram::new("read", "able"), Bigram::new("able", "s")];
        let graph = SuccessorGraph::from_bigrams(&bigrams);
        let surfaces: BTreeSet<String> = graph.parses(Side::Suffix).iter().map(Parse::surface).collect();
        assert_eq!(surfaces, BTreeSet::from(["readable".to_string(), "ables".to_string()]));
    }

    #[test]
    fn test_counts() {
        let bigrams = [Bigram::new("cr", "y"), Bigram::new("dr", "y")];
        let graph = SuccessorGraph::from_bigrams(&bigrams);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
    }
}
