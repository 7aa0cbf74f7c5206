//! End-to-end checks of the console's core guarantees through the public API.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use rstest::rstest;
use vigil_console::{LockAware, SelectOutcome};
use vigil_primitives::{Context, ProducerId, Scope};

use crate::common::{RecordingHost, console, warning};

#[test]
fn logging_twice_keeps_one_entry_with_latest_time() {
	let (mut console, ids) = console();
	let first = Utc.timestamp_opt(100, 0).unwrap();
	let second = Utc.timestamp_opt(200, 0).unwrap();

	let handle = console
		.submit(warning(Context::Creator, "Field 'Name' is null or empty").at(first))
		.unwrap();
	assert_eq!(console.submit(warning(Context::Creator, "Field 'Name' is null or empty").at(second)), None);

	assert_eq!(console.count_all(), 1);
	assert_eq!(console.get(&handle).map(|e| e.time()), Some(second));
	// The duplicate's id went back to the registry; only the stored one is live.
	assert_eq!(ids.live_count(), 1);
}

#[test]
fn freed_slot_is_reused_before_growth() {
	let (mut console, _) = console();
	let producer = ProducerId::from_static("validator");
	let a = console.submit(warning(Context::Creator, "a")).unwrap();
	let _b = console.submit(warning(Context::Creator, "b")).unwrap();
	assert_eq!(console.store().capacity(Context::Creator, &producer), Some(2));

	console.force_resolve(&a).unwrap();
	let c = console.submit(warning(Context::Creator, "c")).unwrap();

	assert_eq!(c.slot.index(), a.slot.index());
	assert_eq!(console.store().capacity(Context::Creator, &producer), Some(2));
	// The old handle no longer reaches the reused slot.
	assert!(console.get(&a).is_none());
}

#[test]
fn bucket_grows_by_doubling() {
	let (mut console, _) = console();
	let producer = ProducerId::from_static("validator");
	let mut seen = Vec::new();
	for n in 0..3 {
		console.submit(warning(Context::Validate, &format!("issue {n}")));
		seen.push(console.store().capacity(Context::Validate, &producer).unwrap());
	}
	assert_eq!(seen, vec![1, 2, 4]);
}

#[test]
fn lock_aware_entries_wait_for_unlock_but_force_ignores_lock() {
	let (mut console, _) = console();
	let mut host = RecordingHost::new(Context::Home);
	host.locked = true;
	let policy = Arc::new(LockAware);

	console.submit(warning(Context::Develop, "build running").policy(policy.clone()));
	console.submit(warning(Context::Develop, "publish pending").policy(policy));

	assert_eq!(console.try_resolve_all(Scope::All, &host), 0);
	assert_eq!(console.count(Context::Develop), 2);

	host.locked = false;
	assert_eq!(console.try_resolve_all(Context::Develop, &host), 2);

	console.submit(warning(Context::Develop, "again").policy(Arc::new(LockAware)));
	host.locked = true;
	assert_eq!(console.force_resolve_context(Context::Develop), 1);
	assert_eq!(console.count_all(), 0);
}

#[test]
fn selection_traces_are_exclusive_and_ordered() {
	let (mut console, _) = console();
	let mut host = RecordingHost::new(Context::Creator);
	let a = console.submit(warning(Context::Creator, "a")).unwrap();
	let b = console.submit(warning(Context::Creator, "b")).unwrap();
	let (id_a, id_b) = (console.get(&a).unwrap().id(), console.get(&b).unwrap().id());

	assert_eq!(console.select(&a, &mut host), Some(SelectOutcome::Selected));
	assert_eq!(console.select(&b, &mut host), Some(SelectOutcome::Selected));
	assert_eq!(console.select(&b, &mut host), Some(SelectOutcome::Deselected));
	assert!(!console.reset_selection(&mut host));

	assert_eq!(host.traces(), vec![(id_a, true), (id_a, false), (id_b, true), (id_b, false)]);
}

#[rstest]
#[case(Context::Home, false)]
#[case(Context::Creator, false)]
#[case(Context::Analytics, true)]
fn context_removal_guard(#[case] target: Context, #[case] removable: bool) {
	let (mut console, _) = console();
	console.set_primary(Context::Creator);
	console.contexts_mut().activate(Context::Analytics);

	assert_eq!(console.contexts_mut().deactivate(target, Context::Home), removable);
	assert_eq!(console.contexts().is_active(target), !removable);
}
