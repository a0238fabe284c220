//! Line-oriented parser for the DOT-like network description.
//!
//! Node lines look like `DENSE_10001 [id="10001"]`, edge lines like
//! `INPUT_10000 -> DENSE_10001;`. Anything else is ignored.

use std::collections::HashMap;
use std::sync::LazyLock;

use indexmap::IndexMap;
use log::debug;
use regex::Regex;

use super::types::{Edge, Node};

static NODE_DECL: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r#"(\w+)\s*\[id="(\d+)""#).expect("valid node pattern"));
static EDGE_DECL: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(\w+)\s*->\s*(\w+)").expect("valid edge pattern"));

#[derive(Clone, Debug, Default)]
pub struct ParsedGraph {
	pub nodes: IndexMap<String, Node>,
	pub edges: Vec<Edge>,
}

pub fn parse(text: &str) -> ParsedGraph {
	let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

	let mut nodes = IndexMap::new();
	for line in &lines {
		if let Some((id, label)) = parse_node_line(line) {
			nodes.insert(id.clone(), Node::new(id, label));
		}
	}

	// Labels of every declared node, for edges written with bare labels.
	// A label declared twice keeps its first id.
	let mut by_label: HashMap<&str, &str> = HashMap::new();
	for node in nodes.values() {
		by_label.entry(node.label.as_str()).or_insert(node.id.as_str());
	}

	let mut edges = Vec::new();
	for line in &lines {
		if line.contains("[id=") || !line.contains("->") {
			continue;
		}
		match parse_edge_line(line, &by_label) {
			Some(edge) => edges.push(edge),
			None => debug!("skipping malformed edge line: {line}"),
		}
	}

	ParsedGraph { nodes, edges }
}

fn parse_node_line(line: &str) -> Option<(String, String)> {
	if !line.contains("[id=") {
		return None;
	}
	let caps = NODE_DECL.captures(line)?;
	let id = caps.get(2)?.as_str().to_string();
	let first = line.split_whitespace().next()?;
	let label = first.split('[').next().filter(|s| !s.is_empty()).unwrap_or(first);
	Some((id, label.to_string()))
}

fn parse_edge_line(line: &str, by_label: &HashMap<&str, &str>) -> Option<Edge> {
	let caps = EDGE_DECL.captures(line)?;
	let from = resolve_endpoint(caps.get(1)?.as_str(), by_label)?;
	let to = resolve_endpoint(caps.get(2)?.as_str(), by_label)?;
	Some(Edge::new(from, to))
}

/// `label_123` resolves to `123`; a token without a numeric suffix is looked
/// up among the declared labels.
fn resolve_endpoint(token: &str, by_label: &HashMap<&str, &str>) -> Option<String> {
	let suffix = token.rsplit('_').next().unwrap_or(token);
	if is_numeric(suffix) {
		return Some(suffix.to_string());
	}
	by_label.get(token).map(|id| id.to_string())
}

fn is_numeric(s: &str) -> bool {
	!s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
	use super::*;

	const NETWORK: &str = r#"digraph program {
    INPUT_10000 [id="10000"]
    DENSE_10001 [id="10001"]
    OUTPUT_10002 [id="10002"]
    INPUT_10000 -> DENSE_10001;
    DENSE_10001 -> OUTPUT_10002;
}"#;

	#[test]
	fn parses_nodes_and_edges_in_order() {
		let graph = parse(NETWORK);
		assert_eq!(graph.nodes.len(), 3);
		assert_eq!(graph.nodes["10001"].label, "DENSE_10001");
		let pairs: Vec<_> = graph
			.edges
			.iter()
			.map(|e| (e.from_id.as_str(), e.to_id.as_str()))
			.collect();
		assert_eq!(pairs, vec![("10000", "10001"), ("10001", "10002")]);
	}

	#[test]
	fn bare_labels_resolve_to_declared_ids() {
		let graph = parse("A [id=\"1\"];\nB [id=\"2\"];\nA -> B;");
		assert_eq!(graph.nodes.len(), 2);
		assert_eq!(graph.nodes["1"].label, "A");
		assert_eq!(graph.edges.len(), 1);
		assert_eq!(graph.edges[0].from_id, "1");
		assert_eq!(graph.edges[0].to_id, "2");
	}

	#[test]
	fn duplicate_label_binds_to_first_declaration() {
		let graph = parse("A [id=\"1\"]\nA [id=\"2\"]\nB [id=\"3\"]\nA -> B;");
		assert_eq!(graph.nodes.len(), 3);
		assert_eq!(graph.edges[0].from_id, "1");
		assert_eq!(graph.edges[0].to_id, "3");
	}

	#[test]
	fn malformed_lines_are_skipped() {
		let text = "A [id=\"1\"]\nB [id=\"x\"]\nA -> nowhere;\n-> ;\ngarbage\nA_1 -> C_3;";
		let graph = parse(text);
		assert_eq!(graph.nodes.len(), 1);
		// Only the numeric-suffixed edge survives; it dangles towards "3".
		assert_eq!(graph.edges.len(), 1);
		assert_eq!(graph.edges[0].to_id, "3");
	}

	#[test]
	fn later_declaration_replaces_earlier() {
		let graph = parse("A_1 [id=\"1\"]\nB_2 [id=\"2\"]\nC_1 [id=\"1\"]");
		let labels: Vec<_> = graph.nodes.values().map(|n| n.label.as_str()).collect();
		assert_eq!(labels, vec!["C_1", "B_2"]);
	}

	#[test]
	fn empty_input_yields_empty_graph() {
		let graph = parse("");
		assert!(graph.nodes.is_empty());
		assert!(graph.edges.is_empty());
	}

	#[test]
	fn label_without_space_before_attributes() {
		let graph = parse("MATMUL_7[id=\"7\"]");
		assert_eq!(graph.nodes["7"].label, "MATMUL_7");
	}
}
