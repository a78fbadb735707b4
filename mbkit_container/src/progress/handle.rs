use crate::{EventBus, ProgressId, ProgressState};
use std::{
	io::Write,
	sync::{Arc, Mutex},
	time::{Duration, Instant},
};

/// Handle for tracking progress of an operation
///
/// Clones share the same state and emit to the same event bus.
#[derive(Clone)]
pub struct ProgressHandle {
	state: Arc<Mutex<ProgressState>>,
	event_bus: EventBus,
	stderr: bool,
}

impl ProgressHandle {
	pub fn new(id: ProgressId, message: String, total: u64, event_bus: EventBus, stderr: bool) -> Self {
		let start = Instant::now();
		let handle = Self {
			state: Arc::new(Mutex::new(ProgressState {
				id,
				message,
				position: 0,
				total,
				start,
				next_draw: start,
				finished: false,
			})),
			event_bus,
			stderr,
		};
		handle.emit_update();
		handle
	}

	/// Increment position by delta, clamped to the total
	pub fn inc(&self, delta: u64) {
		self.update(|state| state.position = state.position.saturating_add(delta).min(state.total));
	}

	/// Change the total; a position beyond the new total is clamped
	pub fn set_max_value(&self, total: u64) {
		self.update(|state| {
			state.total = total;
			state.position = state.position.min(total);
		});
	}

	/// Set position to total and mark as complete
	pub fn finish(&self) {
		self.update(|state| {
			state.position = state.total;
			state.finished = true;
		});
		if self.stderr {
			eprintln!();
		}
	}

	fn update(&self, change: impl FnOnce(&mut ProgressState)) {
		let mut state = self.state.lock().unwrap();
		change(&mut state);
		self.redraw(&mut state);
		let snapshot = state.clone();
		drop(state);
		self.event_bus.progress(snapshot);
	}

	fn emit_update(&self) {
		let state = self.state.lock().unwrap().clone();
		self.event_bus.progress(state);
	}

	fn redraw(&self, state: &mut ProgressState) {
		if !self.stderr {
			return;
		}
		let now = Instant::now();
		if now < state.next_draw && !state.finished {
			return;
		}
		state.next_draw = now + Duration::from_millis(500);

		let total = state.total.max(1);
		let pos = state.position.min(total);
		let elapsed = state.start.elapsed().as_secs_f64();
		let per_sec = if elapsed > 0.0 { pos as f64 / elapsed } else { 0.0 };
		let eta_secs = if pos > 0 {
			elapsed * ((total - pos) as f64 / pos as f64)
		} else {
			0.0
		};

		let msg = &state.message;
		let percent = state.percent();
		let rate = format_rate(per_sec);
		let eta = format_eta(Duration::from_secs_f64(eta_secs));
		let get_line = |bar: &str| format!("{msg}▕{bar}▏{pos}/{total} ({percent:>3}%) {rate:>5} {eta:>5}");

		let available = terminal_width().saturating_sub(get_line("").chars().count());
		let line = get_line(&make_bar(pos, total, available));

		let mut output = std::io::stderr();
		let _ = write!(output, "\r\x1b[2K{line}");
		let _ = output.flush();
	}
}

fn format_rate(per_sec: f64) -> String {
	if !per_sec.is_finite() {
		return "--/s".to_string();
	}
	let text = if per_sec >= 1_000_000.0 {
		format!("{:.1}M", per_sec / 1_000_000.0)
	} else if per_sec >= 1_000.0 {
		format!("{:.1}k", per_sec / 1_000.0)
	} else {
		format!("{per_sec:.0}")
	};
	text + "/s"
}

fn format_eta(d: Duration) -> String {
	let total = d.as_secs();
	let hours = total / 3_600;
	let minutes = (total % 3_600) / 60;
	let seconds = total % 60;

	if total < 60 {
		format!("{seconds}s")
	} else if total < 3_600 {
		format!("{minutes:02}:{seconds:02}")
	} else {
		format!("{hours}:{minutes:02}:{seconds:02}")
	}
}

fn terminal_width() -> usize {
	match terminal_size::terminal_size() {
		Some((width, _)) => width.0.max(10) as usize,
		None => 80,
	}
}

fn make_bar(pos: u64, len: u64, width: usize) -> String {
	let width = width.max(1);
	let frac = (pos as f64 / len.max(1) as f64).clamp(0.0, 1.0);
	let exact = frac * width as f64;
	let whole = exact.floor() as usize;
	// thickest first
	let partials = ["█", "▉", "▊", "▋", "▌", "▍", "▎", "▏"];

	let mut bar = "█".repeat(whole.min(width));
	if whole < width {
		let rem = exact - whole as f64;
		let index = ((1.0 - rem) * partials.len() as f64).floor() as usize;
		if rem > 0.0 && index < partials.len() {
			bar.push_str(partials[index]);
		} else {
			bar.push(' ');
		}
		bar.push_str(&" ".repeat(width - whole - 1));
	}
	bar
}
