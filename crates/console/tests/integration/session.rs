use std::sync::Arc;

use pretty_assertions::assert_eq;
use vigil_console::{ConsoleConfig, ContextualFocus, ErrorService};
use vigil_primitives::{Context, Severity};

use crate::common::{Call, RecordingHost, console, console_with, warning};

#[test]
fn off_screen_entries_raise_the_unseen_indicator() {
	let (mut console, _) = console();
	console.submit(warning(Context::Validate, "a"));
	console.submit(warning(Context::Validate, "b").severity(Severity::Error));
	console.submit(warning(Context::Home, "c").severity(Severity::Error));

	assert_eq!(console.contexts().indicator(Context::Validate), Some(Severity::Error));
	assert_eq!(console.contexts().indicator(Context::Home), None);

	console.set_primary(Context::Validate);
	assert_eq!(console.contexts().indicator(Context::Validate), None);
	assert_eq!(console.flatten().len(), 2);
}

#[test]
fn config_controls_dedupe_and_primary() {
	let config = ConsoleConfig::parse(
		r#"
		primary-context = "creator"
		dedupe = false
		"#,
	)
	.unwrap();
	let (mut console, ids) = console_with(config);

	console.submit(warning(Context::Creator, "same"));
	console.submit(warning(Context::Creator, "same"));

	assert_eq!(console.contexts().primary(), Context::Creator);
	assert_eq!(console.count(Context::Creator), 2);
	assert_eq!(ids.live_count(), 2);
}

#[test]
fn contextual_focus_link_navigates_then_focuses() {
	let (mut console, _) = console();
	let mut host = RecordingHost::new(Context::Validate);
	host.known.push("ability/fireball".into());

	let handle = console
		.submit(
			warning(Context::Validate, "Ability 'Fireball' has no cost")
				.user_data(String::from("ability/fireball"))
				.policy(Arc::new(ContextualFocus::new(Context::Creator))),
		)
		.unwrap();
	let id = console.get(&handle).unwrap().id();

	assert!(console.link(&handle, &mut host));
	assert_eq!(
		host.calls,
		vec![Call::Navigate(Context::Creator, id), Call::Focus("ability/fireball".into())]
	);

	// Still on the validate tab, so the entry cannot be re-checked yet.
	assert_eq!(console.try_resolve_all(Context::Validate, &host), 0);
	host.primary = Context::Creator;
	assert_eq!(console.try_resolve_all(Context::Validate, &host), 1);
}

#[test]
fn error_service_entries_have_no_link() {
	let (mut console, _) = console();
	let mut host = RecordingHost::new(Context::Home);
	let handle = console
		.submit(
			warning(Context::Home, "Failed to write project file")
				.severity(Severity::Error)
				.policy(Arc::new(ErrorService)),
		)
		.unwrap();

	assert!(!console.link(&handle, &mut host));
	assert!(host.calls.is_empty());
}

#[test]
fn force_resolve_entry_uses_cached_origin() {
	let (mut console, _) = console();
	let handle = console.submit(warning(Context::Analytics, "stale report")).unwrap();
	let stored = console.get(&handle).unwrap().clone();

	assert_eq!(stored.origin(), Some(&handle));
	assert!(console.force_resolve_entry(&stored));
	assert!(!console.force_resolve_entry(&stored));
	assert_eq!(console.count_all(), 0);
}

#[test]
fn structural_remove_matches_by_content() {
	let (mut console, _) = console();
	console.submit(warning(Context::Creator, "Field 'Name' is null or empty"));
	let probe = console.create(warning(Context::Creator, "Field 'Name' is null or empty"));

	assert!(console.exists(&probe, false));
	assert!(console.remove(&probe));
	assert!(!console.exists(&probe, false));
}

#[test]
fn reset_clears_session_and_traces_off_selection() {
	let (mut console, _) = console();
	let mut host = RecordingHost::new(Context::Home);
	let handle = console.submit(warning(Context::Home, "a")).unwrap();
	console.submit(warning(Context::Settings, "b"));
	console.select(&handle, &mut host);
	let id = console.selected().unwrap().id();

	console.reset(&mut host);

	assert_eq!(console.count_all(), 0);
	assert!(console.selected().is_none());
	assert_eq!(console.contexts().indicator(Context::Settings), None);
	assert_eq!(host.traces(), vec![(id, true), (id, false)]);
}

#[test]
fn resolved_selection_still_traces_off_once() {
	let (mut console, _) = console();
	let mut host = RecordingHost::new(Context::Creator);
	let handle = console.submit(warning(Context::Creator, "a")).unwrap();
	console.select(&handle, &mut host);
	let id = console.selected().unwrap().id();

	assert!(console.force_resolve(&handle).is_some());
	assert_eq!(console.count_all(), 0);
	assert_eq!(console.selected().map(|e| e.id()), Some(id));

	assert!(console.reset_selection(&mut host));
	assert!(!console.reset_selection(&mut host));
	assert_eq!(host.traces(), vec![(id, true), (id, false)]);
}

#[test]
fn selection_resolved_in_bulk_traces_off_when_switching() {
	let (mut console, _) = console();
	let mut host = RecordingHost::new(Context::Creator);
	let a = console.submit(warning(Context::Creator, "a")).unwrap();
	console.select(&a, &mut host);
	let id_a = console.selected().unwrap().id();

	assert_eq!(console.try_resolve_all(Context::Creator, &host), 1);
	let b = console.submit(warning(Context::Creator, "b")).unwrap();
	console.select(&b, &mut host);
	let id_b = console.selected().unwrap().id();

	assert_eq!(host.traces(), vec![(id_a, true), (id_a, false), (id_b, true)]);
}
