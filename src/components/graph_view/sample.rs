//! Deterministic sample networks with matching schedules.

use super::schedule::{ScheduleDocument, ScheduleEntry};

const FIRST_ID: i64 = 10000;
const HOURGLASS: &[(usize, &str)] = &[
	(500, "INPUT"),
	(250, "DENSE"),
	(100, "DENSE"),
	(50, "DENSE"),
	(20, "BOTTLENECK"),
	(50, "DENSE"),
	(100, "DENSE"),
	(250, "DENSE"),
	(500, "OUTPUT"),
];

/// Simple pseudo-random number generator (deterministic for consistency).
struct SampleRng(u64);

impl SampleRng {
	fn next_f64(&mut self) -> f64 {
		self.0 = (self.0 * 9301 + 49297) % 233280;
		self.0 as f64 / 233280.0
	}

	/// `k` distinct indices out of `0..n`.
	fn pick(&mut self, n: usize, k: usize) -> Vec<usize> {
		let mut pool: Vec<usize> = (0..n).collect();
		let k = k.min(n);
		for i in 0..k {
			let j = i + (self.next_f64() * (n - i) as f64) as usize;
			pool.swap(i, j.min(n - 1));
		}
		pool.truncate(k);
		pool
	}
}

struct Builder {
	lines: Vec<String>,
	layers: Vec<Vec<(i64, String)>>,
	schedule: Vec<ScheduleEntry>,
	next_id: i64,
}

impl Builder {
	fn new(name: &str) -> Self {
		Self {
			lines: vec![format!("digraph {name} {{")],
			layers: Vec::new(),
			schedule: Vec::new(),
			next_id: FIRST_ID,
		}
	}

	fn layer(&mut self, size: usize, op_code: &str) {
		let mut nodes = Vec::with_capacity(size);
		for _ in 0..size {
			let id = self.next_id;
			self.next_id += 1;
			let name = format!("{op_code}_{id}");
			self.lines.push(format!("    {name} [id=\"{id}\"]"));
			self.schedule.push(ScheduleEntry {
				op_code: Some(op_code.to_string()),
				op_magic: id.into(),
			});
			nodes.push((id, name));
		}
		self.layers.push(nodes);
	}

	fn edge(&mut self, from: &str, to: &str) {
		self.lines.push(format!("    {from} -> {to};"));
	}

	fn finish(mut self) -> (String, ScheduleDocument) {
		self.lines.push("}".to_string());
		(
			self.lines.join("\n"),
			ScheduleDocument {
				schedule: self.schedule,
			},
		)
	}
}

/// `layers` equally wide layers; every node feeds `fanout` nodes of the next one.
pub fn layered_network(layers: usize, per_layer: usize, fanout: usize) -> (String, ScheduleDocument) {
	let mut b = Builder::new("program");
	for index in 0..layers {
		let op_code = match index {
			0 => "INPUT",
			i if i + 1 == layers && layers > 1 => "OUTPUT",
			_ => "DENSE",
		};
		b.layer(per_layer, op_code);
	}

	let mut rng = SampleRng(42);
	for index in 1..b.layers.len() {
		let (prev, next) = (b.layers[index - 1].clone(), b.layers[index].clone());
		for (_, from) in &prev {
			for target in rng.pick(next.len(), fanout) {
				b.edge(from, &next[target].1);
			}
		}
	}
	b.finish()
}

/// Wide, narrow, wide again: 500 -> 20 -> 500 nodes over nine layers.
pub fn hourglass_network() -> (String, ScheduleDocument) {
	let mut b = Builder::new("hourglass_test");
	for &(size, op_code) in HOURGLASS {
		b.layer(size, op_code);
	}

	let mut rng = SampleRng(42);
	for index in 1..b.layers.len() {
		let (prev, next) = (b.layers[index - 1].clone(), b.layers[index].clone());
		if prev.len() >= next.len() {
			let per_node = next.len().clamp(1, 3);
			for (_, from) in &prev {
				for target in rng.pick(next.len(), per_node) {
					b.edge(from, &next[target].1);
				}
			}
		} else {
			let per_node = prev.len().clamp(1, 3);
			for (_, to) in &next {
				for source in rng.pick(prev.len(), per_node) {
					b.edge(&prev[source].1, to);
				}
			}
		}
	}
	b.finish()
}
