//! Terminal progress reporting for long-running tile operations.
//!
//! Renders a single redrawn line on stderr. Output is suppressed entirely
//! when stderr is not a terminal, so logs piped to files stay clean.

use std::io::{self, IsTerminal, Write};
use std::time::Instant;

/// A minimal stderr progress bar: message, position and total.
pub struct ProgressBar {
	message: String,
	max_value: u64,
	position: u64,
	start: Instant,
	visible: bool,
}

impl ProgressBar {
	pub fn new(message: &str, max_value: u64) -> ProgressBar {
		let progress = ProgressBar {
			message: message.to_string(),
			max_value,
			position: 0,
			start: Instant::now(),
			visible: io::stderr().is_terminal(),
		};
		progress.redraw();
		progress
	}

	pub fn set_position(&mut self, value: u64) {
		self.position = value.min(self.max_value);
		self.redraw();
	}

	pub fn inc(&mut self, value: u64) {
		self.position = self.position.saturating_add(value).min(self.max_value);
		self.redraw();
	}

	/// Completes the bar and terminates the line.
	pub fn finish(&mut self) {
		self.position = self.max_value;
		self.redraw();
		if self.visible {
			let mut stderr = io::stderr();
			let _ = stderr.write_all(b"\n");
			let _ = stderr.flush();
		}
	}

	fn redraw(&self) {
		if !self.visible {
			return;
		}
		let len = self.max_value.max(1);
		let percent = self.position * 100 / len;
		let elapsed = self.start.elapsed().as_secs_f64();
		let per_sec = if elapsed > 0.0 {
			self.position as f64 / elapsed
		} else {
			0.0
		};

		let mut stderr = io::stderr();
		let _ = write!(
			stderr,
			"\r\x1b[2K{}: {}/{} ({percent:>3}%) {per_sec:.0}/s",
			self.message, self.position, self.max_value
		);
		let _ = stderr.flush();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn positions_are_clamped() {
		let mut progress = ProgressBar::new("test", 10);
		progress.set_position(25);
		assert_eq!(progress.position, 10);
		progress.set_position(3);
		progress.inc(100);
		assert_eq!(progress.position, 10);
		progress.finish();
	}

	#[test]
	fn zero_length_does_not_panic() {
		let mut progress = ProgressBar::new("empty", 0);
		progress.inc(1);
		progress.finish();
	}
}
