use pretty_assertions::assert_eq;
use vigil_primitives::{Context, ProducerId};

use crate::common::{console, warning};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn sweep_results_land_after_drain() {
	let (mut console, _) = console();
	let mut sweep = console.begin_sweep("validator");
	sweep.clear(Context::Validate).unwrap();

	let report = sweep
		.spawn(0..5u32, |n| (n % 2 == 0).then(|| warning(Context::Validate, &format!("item {n}"))))
		.await
		.unwrap();

	assert_eq!(report.checked, 5);
	assert_eq!(report.handed_off, 3);
	assert_eq!(console.count_all(), 0);
	assert_eq!(console.drain_handoffs(), 3);
	assert_eq!(console.count(Context::Validate), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn superseded_sweep_keeps_handed_off_entries() {
	let (mut console, _) = console();
	let first = console.begin_sweep("validator");
	let token = first.token().clone();

	// Chunk size 32: flush the first batch by hand, then get superseded.
	let report = vigil_worker::spawn_blocking("test.sweep", move || {
		let mut sweep = first;
		sweep.push(warning(Context::Validate, "kept")).unwrap();
		sweep.flush().unwrap();
		token.cancel();
		let _ = sweep.push(warning(Context::Validate, "dropped"));
		sweep.finish()
	})
	.await
	.unwrap();

	assert!(report.cancelled);
	assert_eq!(report.handed_off, 1);
	assert_eq!(console.drain_handoffs(), 1);
	assert_eq!(console.flatten().len(), 0);
	assert_eq!(console.count(Context::Validate), 1);
}

#[test]
fn beginning_a_new_sweep_cancels_the_previous_one() {
	let (mut console, _) = console();
	let first = console.begin_sweep("validator");
	let second = console.begin_sweep("validator");
	let other = console.begin_sweep("importer");

	assert!(first.is_cancelled());
	assert!(!second.is_cancelled());
	assert!(second.token().generation() > first.token().generation());
	assert!(!other.is_cancelled());

	console.cancel_sweep(&ProducerId::from_static("validator"));
	assert!(second.is_cancelled());
	assert!(!other.is_cancelled());
}

#[test]
fn clear_handoff_drops_only_that_producer() {
	let (mut console, _) = console();
	console.submit(warning(Context::Validate, "old"));
	console.submit(vigil_console::Entry::builder(Context::Validate, "importer").message("kept"));

	let mut sweep = console.begin_sweep("validator");
	sweep.clear(Context::Validate).unwrap();
	let report = sweep.finish();

	assert_eq!(report.handed_off, 0);
	assert_eq!(console.drain_handoffs(), 0);
	assert_eq!(console.count(Context::Validate), 1);
}

#[test]
fn reset_cuts_off_sweeps_from_the_previous_session() {
	let (mut console, _) = console();
	let mut host = crate::common::RecordingHost::new(Context::Home);
	let mut old = console.begin_sweep("validator");
	old.push(warning(Context::Validate, "queued before reset")).unwrap();
	old.flush().unwrap();

	console.reset(&mut host);
	let new = console.begin_sweep("validator");

	assert!(new.token().generation() > old.token().generation());
	assert_eq!(old.clear(Context::Validate), Err(vigil_console::ConsoleError::SweepCancelled(old.token().generation())));
	assert_eq!(console.drain_handoffs(), 0);
	assert_eq!(console.count_all(), 0);
}
