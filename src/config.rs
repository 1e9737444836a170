//! Editor settings. Everything has a default; the page passes `EditorConfig::default()`.

use std::time::Duration;

use rand::Rng;

use crate::topology::Position;

/// What happens to uncommitted form edits when the selection moves elsewhere
/// without passing through a commit trigger.
///
/// `Commit` is the default and departs from the older editor, which lost node
/// edits on a direct switch to another node and dropped an edge label on a
/// background click. `Discard` keeps that older behavior.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExitPolicy {
	/// Write the buffer into the entity being left.
	#[default]
	Commit,
	/// Drop the buffer; only blur and background clicks on a device commit.
	Discard,
}

/// Square region new devices are dropped into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnArea {
	/// Top-left corner on both axes.
	pub origin: f64,
	/// Side length.
	pub extent: f64,
}

impl Default for SpawnArea {
	fn default() -> Self {
		Self {
			origin: 50.0,
			extent: 300.0,
		}
	}
}

impl SpawnArea {
	/// Uniform random point inside the area.
	pub fn sample(&self, rng: &mut impl Rng) -> Position {
		Position::new(
			self.origin + rng.r#gen::<f64>() * self.extent,
			self.origin + rng.r#gen::<f64>() * self.extent,
		)
	}

	/// Whether `position` lies inside the area (right and bottom edges excluded).
	pub fn contains(&self, position: Position) -> bool {
		let range = self.origin..self.origin + self.extent;
		range.contains(&position.x) && range.contains(&position.y)
	}
}

/// Settings for one editor instance.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorConfig {
	/// Suggested name of the downloaded configuration.
	pub export_file_name: String,
	/// Grid step dragged nodes snap to. Zero disables snapping.
	pub snap_grid: f64,
	/// Where "Add device" places new servers.
	pub spawn_area: SpawnArea,
	/// See [`ExitPolicy`].
	pub exit_policy: ExitPolicy,
	/// How long a notification stays on screen.
	pub toast_duration: Duration,
	/// Open with the two-device sample instead of an empty canvas.
	pub start_with_sample: bool,
}

impl Default for EditorConfig {
	fn default() -> Self {
		Self {
			export_file_name: "network-config.json".into(),
			snap_grid: 15.0,
			spawn_area: SpawnArea::default(),
			exit_policy: ExitPolicy::default(),
			toast_duration: Duration::from_secs(4),
			start_with_sample: true,
		}
	}
}

impl EditorConfig {
	/// Same settings with a different exit policy.
	pub fn with_exit_policy(mut self, policy: ExitPolicy) -> Self {
		self.exit_policy = policy;
		self
	}

	/// Same settings with a different spawn area.
	pub fn with_spawn_area(mut self, area: SpawnArea) -> Self {
		self.spawn_area = area;
		self
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;

	#[test]
	fn spawned_positions_stay_in_area() {
		let area = SpawnArea::default();
		let mut rng = StdRng::seed_from_u64(7);
		for _ in 0..200 {
			assert!(area.contains(area.sample(&mut rng)));
		}
	}

	#[test]
	fn commits_on_exit_unless_told_otherwise() {
		assert_eq!(EditorConfig::default().exit_policy, ExitPolicy::Commit);
		let discard = EditorConfig::default().with_exit_policy(ExitPolicy::Discard);
		assert_eq!(discard.exit_policy, ExitPolicy::Discard);
	}
}
