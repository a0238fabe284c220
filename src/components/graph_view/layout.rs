use log::debug;

use super::layering::compute_layers;
use super::model::GraphModel;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
	pub layout_height: f64,
	pub min_layer_spacing: f64,
	pub min_node_spacing: f64,
	pub min_layout_width: f64,
	/// Multiplier applied to the widest layer when sizing the canvas extent.
	pub width_headroom: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			layout_height: 3000.0,
			min_layer_spacing: 150.0,
			min_node_spacing: 60.0,
			min_layout_width: 1000.0,
			width_headroom: 1.2,
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutSummary {
	pub layer_count: usize,
	pub extent_width: f64,
	pub extent_height: f64,
}

/// Top-down layered placement.
#[derive(Clone, Debug, Default)]
pub struct LayoutEngine {
	config: LayoutConfig,
}

impl LayoutEngine {
	pub fn new(config: LayoutConfig) -> Self {
		Self { config }
	}

	/// Positions every node and refreshes the model bounds.
	pub fn layout(&self, model: &mut GraphModel) -> LayoutSummary {
		if model.is_empty() {
			return LayoutSummary::default();
		}
		let layers = compute_layers(model);
		let cfg = &self.config;

		let widths: Vec<Vec<f64>> = layers
			.iter()
			.map(|layer| {
				layer
					.iter()
					.filter_map(|id| model.node(id).map(|n| n.width()))
					.collect()
			})
			.collect();

		let widest = widths
			.iter()
			.map(|w| row_width(w, cfg.min_node_spacing))
			.fold(0.0, f64::max);
		let extent = cfg.min_layout_width.max(cfg.width_headroom * widest);
		let layer_height = cfg
			.min_layer_spacing
			.max(cfg.layout_height / (layers.len() as f64 + 1.0));

		for (index, (layer, widths)) in layers.iter().zip(&widths).enumerate() {
			let y = (index as f64 + 1.0) * layer_height;
			for (id, x) in layer.iter().zip(place_row(widths, extent, cfg.min_node_spacing)) {
				if let Some(node) = model.node_mut(id) {
					node.x = x;
					node.y = y;
				}
			}
		}
		model.update_bounds();

		let summary = LayoutSummary {
			layer_count: layers.len(),
			extent_width: extent,
			extent_height: cfg.layout_height.max(layer_height * (layers.len() as f64 + 1.0)),
		};
		debug!("layout: {summary:?}");
		summary
	}
}

fn row_width(widths: &[f64], spacing: f64) -> f64 {
	if widths.is_empty() {
		return 0.0;
	}
	widths.iter().sum::<f64>() + (widths.len() - 1) as f64 * spacing
}

/// Centre x of each node in a row. Gaps shrink when the row does not fit,
/// node widths never do.
fn place_row(widths: &[f64], extent: f64, spacing: f64) -> Vec<f64> {
	match widths.len() {
		0 => return Vec::new(),
		1 => return vec![extent / 2.0],
		_ => {}
	}
	let required = row_width(widths, spacing);
	let available = extent - 2.0 * spacing;
	let gap = if required > available {
		spacing * (available / required)
	} else {
		spacing
	};

	let row = row_width(widths, gap);
	let mut left = (extent - row) / 2.0;
	widths
		.iter()
		.map(|w| {
			let x = left + w / 2.0;
			left += w + gap;
			x
		})
		.collect()
}
