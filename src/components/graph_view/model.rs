use std::collections::HashSet;

use indexmap::IndexMap;

use super::parser;
use super::types::{Edge, Node, Rect};

/// Nodes keyed by id (in declaration order) plus the ordered edge list.
#[derive(Clone, Debug, Default)]
pub struct GraphModel {
	nodes: IndexMap<String, Node>,
	edges: Vec<Edge>,
	bounds: Rect,
}

impl GraphModel {
	pub fn new() -> Self {
		Self::default()
	}

	/// Replaces the whole graph with the parse result of `text`.
	pub fn set_graph_data(&mut self, text: &str) {
		let parsed = parser::parse(text);
		self.nodes = parsed.nodes;
		self.edges = parsed.edges;
		self.update_bounds();
	}

	pub fn update_bounds(&mut self) {
		self.bounds = self
			.nodes
			.values()
			.map(Node::bounds)
			.reduce(|acc, b| acc.union(&b))
			.unwrap_or_default();
	}

	pub fn bounds(&self) -> Rect {
		self.bounds
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn nodes(&self) -> impl Iterator<Item = &Node> {
		self.nodes.values()
	}

	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	pub fn node(&self, id: &str) -> Option<&Node> {
		self.nodes.get(id)
	}

	pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
		self.nodes.get_mut(id)
	}

	/// Index of a node in declaration order.
	pub fn node_index(&self, id: &str) -> Option<usize> {
		self.nodes.get_index_of(id)
	}

	pub fn nodes_in_bounds(&self, rect: &Rect) -> Vec<&Node> {
		self.nodes
			.values()
			.filter(|n| n.bounds().intersects(rect))
			.collect()
	}

	pub fn search_nodes(&self, term: &str) -> Vec<&Node> {
		if term.is_empty() {
			return Vec::new();
		}
		let term = term.to_lowercase();
		self.nodes
			.values()
			.filter(|n| n.label.to_lowercase().contains(&term))
			.collect()
	}

	/// First declared node whose box contains the point.
	pub fn node_at_position(&self, x: f64, y: f64) -> Option<&Node> {
		self.nodes.values().find(|n| n.contains_point(x, y))
	}

	pub fn update_node_selection_state(&mut self, selected: &HashSet<String>) {
		for node in self.nodes.values_mut() {
			node.selected = selected.contains(&node.id);
		}
		for edge in &mut self.edges {
			edge.selected = selected.contains(&edge.from_id) || selected.contains(&edge.to_id);
		}
	}

	pub fn connected_nodes(&self, id: &str) -> HashSet<String> {
		let mut connected = HashSet::new();
		for edge in &self.edges {
			if edge.from_id == id {
				connected.insert(edge.to_id.clone());
			}
			if edge.to_id == id {
				connected.insert(edge.from_id.clone());
			}
		}
		connected
	}

	/// Hovers the nodes under the world point and highlights their edges.
	pub fn update_hover(&mut self, x: f64, y: f64) {
		let mut hovered = HashSet::new();
		for node in self.nodes.values_mut() {
			node.hovered = node.contains_point(x, y);
			if node.hovered {
				hovered.insert(node.id.clone());
			}
		}
		for edge in &mut self.edges {
			edge.highlighted = hovered.contains(&edge.from_id) || hovered.contains(&edge.to_id);
		}
	}

	pub fn clear_hover(&mut self) {
		for node in self.nodes.values_mut() {
			node.hovered = false;
		}
		for edge in &mut self.edges {
			edge.highlighted = false;
		}
	}

	/// Clears every highlight, then highlights the search matches.
	pub fn set_search_highlights(&mut self, term: &str) -> Vec<String> {
		let matches: Vec<String> = self.search_nodes(term).into_iter().map(|n| n.id.clone()).collect();
		for node in self.nodes.values_mut() {
			node.highlighted = false;
		}
		for id in &matches {
			if let Some(node) = self.nodes.get_mut(id) {
				node.highlighted = true;
			}
		}
		matches
	}

	pub fn set_scheduled(&mut self, scheduled: &HashSet<String>) {
		for node in self.nodes.values_mut() {
			node.scheduled = scheduled.contains(&node.id);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	fn model_with(nodes: &[(&str, &str, f64, f64)]) -> GraphModel {
		let text: String = nodes
			.iter()
			.map(|(id, label, _, _)| format!("{label} [id=\"{id}\"]\n"))
			.collect();
		let mut model = GraphModel::new();
		model.set_graph_data(&text);
		for (id, _, x, y) in nodes {
			let node = model.node_mut(id).unwrap();
			node.x = *x;
			node.y = *y;
		}
		model.update_bounds();
		model
	}

	#[test]
	fn bounds_enclose_all_nodes() {
		let model = model_with(&[("1", "A", 0.0, 0.0), ("2", "B", 200.0, 100.0)]);
		assert_eq!(model.bounds(), Rect::new(-40.0, -20.0, 240.0, 120.0));
	}

	#[test]
	fn empty_graph_has_zero_bounds() {
		let mut model = GraphModel::new();
		model.set_graph_data("not a graph");
		assert!(model.is_empty());
		assert_eq!(model.bounds(), Rect::default());
	}

	#[test]
	fn culling_includes_straddling_nodes() {
		let model = model_with(&[("1", "A", 0.0, 0.0), ("2", "B", 500.0, 0.0)]);
		// Only the right half of node 1 is inside.
		let visible = model.nodes_in_bounds(&Rect::new(10.0, -5.0, 100.0, 5.0));
		let ids: Vec<_> = visible.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, vec!["1"]);
	}

	#[test]
	fn search_is_case_insensitive_and_empty_matches_nothing() {
		let model = model_with(&[("1", "foo_a", 0.0, 0.0), ("2", "bar", 0.0, 0.0)]);
		let found: Vec<_> = model.search_nodes("FOO").iter().map(|n| n.id.clone()).collect();
		assert_eq!(found, vec!["1"]);
		assert!(model.search_nodes("").is_empty());
	}

	#[test]
	fn overlapping_hit_resolves_to_first_declared() {
		let model = model_with(&[("1", "A", 0.0, 0.0), ("2", "B", 10.0, 0.0)]);
		assert_eq!(model.node_at_position(5.0, 0.0).map(|n| n.id.as_str()), Some("1"));
		assert_eq!(model.node_at_position(45.0, 0.0).map(|n| n.id.as_str()), Some("2"));
		assert!(model.node_at_position(1000.0, 0.0).is_none());
	}

	#[test]
	fn selection_propagates_to_edges() {
		let mut model = GraphModel::new();
		model.set_graph_data("A_1 [id=\"1\"]\nB_2 [id=\"2\"]\nC_3 [id=\"3\"]\nA_1 -> B_2\nB_2 -> C_3\nC_3 -> D_9");
		let selected: HashSet<String> = ["1".to_string()].into();
		model.update_node_selection_state(&selected);
		assert!(model.node("1").unwrap().selected);
		assert!(!model.node("2").unwrap().selected);
		let flags: Vec<_> = model.edges().iter().map(|e| e.selected).collect();
		assert_eq!(flags, vec![true, false, false]);
	}

	#[test]
	fn connected_nodes_ignore_direction() {
		let mut model = GraphModel::new();
		model.set_graph_data("A_1 [id=\"1\"]\nB_2 [id=\"2\"]\nC_3 [id=\"3\"]\nA_1 -> B_2\nC_3 -> B_2");
		let expected: HashSet<String> = ["1".to_string(), "3".to_string()].into();
		assert_eq!(model.connected_nodes("2"), expected);
		assert!(model.connected_nodes("9").is_empty());
	}

	#[test]
	fn hover_highlights_touching_edges() {
		let mut model = GraphModel::new();
		model.set_graph_data("A_1 [id=\"1\"]\nB_2 [id=\"2\"]\nC_3 [id=\"3\"]\nA_1 -> B_2\nB_2 -> C_3");
		model.node_mut("1").unwrap().x = -500.0;
		model.update_hover(-500.0, 0.0);
		assert!(model.node("1").unwrap().hovered);
		let flags: Vec<_> = model.edges().iter().map(|e| e.highlighted).collect();
		assert_eq!(flags, vec![true, false]);
		model.clear_hover();
		assert!(model.edges().iter().all(|e| !e.highlighted));
		assert!(model.nodes().all(|n| !n.hovered));
	}

	#[test]
	fn search_highlights_replace_previous_ones() {
		let mut model = model_with(&[("1", "foo_a", 0.0, 0.0), ("2", "bar", 0.0, 0.0)]);
		model.set_search_highlights("bar");
		assert_eq!(model.set_search_highlights("foo"), vec!["1".to_string()]);
		assert!(model.node("1").unwrap().highlighted);
		assert!(!model.node("2").unwrap().highlighted);
	}

	fn placements() -> impl Strategy<Value = Vec<(String, f64, f64)>> {
		proptest::collection::vec(("[a-z]{1,12}", -2000.0f64..2000.0, -2000.0f64..2000.0), 0..40)
	}

	proptest! {
		#[test]
		fn culling_matches_brute_force(
			nodes in placements(),
			(x0, y0) in (-2500.0f64..2500.0, -2500.0f64..2500.0),
			(w, h) in (0.0f64..1500.0, 0.0f64..1500.0),
		) {
			let mut model = GraphModel::new();
			let text: String = nodes
				.iter()
				.enumerate()
				.map(|(i, (label, _, _))| format!("{label} [id=\"{i}\"]\n"))
				.collect();
			model.set_graph_data(&text);
			for (i, (_, x, y)) in nodes.iter().enumerate() {
				let node = model.node_mut(&i.to_string()).unwrap();
				node.x = *x;
				node.y = *y;
			}
			let rect = Rect::new(x0, y0, x0 + w, y0 + h);

			let culled: HashSet<String> =
				model.nodes_in_bounds(&rect).into_iter().map(|n| n.id.clone()).collect();
			let brute: HashSet<String> = model
				.nodes()
				.filter(|n| {
					let b = n.bounds();
					b.left <= rect.right && b.right >= rect.left && b.top <= rect.bottom && b.bottom >= rect.top
				})
				.map(|n| n.id.clone())
				.collect();
			prop_assert_eq!(culled, brute);
		}
	}
}
