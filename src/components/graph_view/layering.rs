//! Layer assignment by predecessor depth.
//!
//! `layer(n) = 1` for nodes without predecessors, otherwise one more than the
//! deepest predecessor. Runs on an explicit frame stack so deep chains cannot
//! overflow the call stack. A node reached again while its own frame is still
//! open is given layer 1 on the spot; the open frame later overwrites that
//! with its computed value. Inside cycles this can put a node above some of
//! its predecessors, which is accepted.

use super::model::GraphModel;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mark {
	Unvisited,
	Visiting,
	Done,
}

struct Frame {
	node: usize,
	next_pred: usize,
	max_pred: usize,
}

struct Layering {
	/// `None` marks an edge whose source is not a node of the graph.
	preds: Vec<Vec<Option<usize>>>,
	layer: Vec<Option<usize>>,
	mark: Vec<Mark>,
	stack: Vec<Frame>,
}

impl Layering {
	fn new(model: &GraphModel) -> Self {
		let count = model.node_count();
		let mut preds = vec![Vec::new(); count];
		for edge in model.edges() {
			if let Some(to) = model.node_index(&edge.to_id) {
				preds[to].push(model.node_index(&edge.from_id));
			}
		}
		Self {
			preds,
			layer: vec![None; count],
			mark: vec![Mark::Unvisited; count],
			stack: Vec::new(),
		}
	}

	/// Returns the layer right away when it is known, or pushes a frame.
	fn enter(&mut self, node: usize) -> Option<usize> {
		if let Some(layer) = self.layer[node] {
			return Some(layer);
		}
		if self.mark[node] == Mark::Visiting {
			self.layer[node] = Some(1);
			return Some(1);
		}
		self.mark[node] = Mark::Visiting;
		if self.preds[node].is_empty() {
			self.layer[node] = Some(1);
			self.mark[node] = Mark::Done;
			return Some(1);
		}
		self.stack.push(Frame {
			node,
			next_pred: 0,
			max_pred: 0,
		});
		None
	}

	fn run(&mut self, root: usize) {
		if self.enter(root).is_some() {
			return;
		}
		while let Some(top) = self.stack.len().checked_sub(1) {
			let Frame {
				node, next_pred, ..
			} = self.stack[top];
			if next_pred < self.preds[node].len() {
				self.stack[top].next_pred += 1;
				let found = match self.preds[node][next_pred] {
					Some(pred) => self.enter(pred),
					None => Some(1),
				};
				if let Some(layer) = found {
					let frame = &mut self.stack[top];
					frame.max_pred = frame.max_pred.max(layer);
				}
				continue;
			}

			let Some(frame) = self.stack.pop() else {
				break;
			};
			let layer = frame.max_pred + 1;
			self.layer[frame.node] = Some(layer);
			self.mark[frame.node] = Mark::Done;
			if let Some(parent) = self.stack.last_mut() {
				parent.max_pred = parent.max_pred.max(layer);
			}
		}
	}
}

/// Layer number (1-based) of every node, in declaration order.
pub fn layer_numbers(model: &GraphModel) -> Vec<usize> {
	let mut layering = Layering::new(model);
	for node in 0..model.node_count() {
		layering.run(node);
	}
	layering.layer.into_iter().map(|l| l.unwrap_or(1)).collect()
}

/// Node ids grouped by layer, layer 1 first. Layers that received no node
/// are kept as empty groups.
pub fn compute_layers(model: &GraphModel) -> Vec<Vec<String>> {
	let numbers = layer_numbers(model);
	let depth = numbers.iter().copied().max().unwrap_or(0);
	let mut layers = vec![Vec::new(); depth];
	for (node, layer) in model.nodes().zip(numbers) {
		layers[layer - 1].push(node.id.clone());
	}
	layers
}
