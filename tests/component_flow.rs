//! A component built only from the facade: keyboard shortcut, form, parent
//! listener.

use rstest::rstest;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use wireform::forms::spawn;
use wireform::prelude::*;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Settings {
	nickname: String,
	volume: Option<i64>,
	notifications: bool,
}

fn settings_view(form: &FormBinding<Settings>) -> View {
	View::element("form")
		.child(form.text_input("nickname"))
		.child(form.range_input("volume"))
		.child(form.checkbox("notifications"))
		.into_view()
}

#[rstest]
fn edits_reach_the_parent_scope_and_shortcuts_stay_local() {
	let app = Scope::root();
	let panel = app.child();
	let state = StateCell::new(Settings {
		nickname: "neo".into(),
		volume: Some(5),
		notifications: false,
	});
	let form = FormBinding::bound(state.clone(), &panel);
	let root = Element::new("div");
	form.mount(&root);
	form.render(settings_view(&form)).unwrap();

	let saved = Rc::new(RefCell::new(Vec::new()));
	let sink = Rc::clone(&saved);
	app.on_message(EventType::Change, &form.data_changed_key(), move |s: &Settings, _| {
		sink.borrow_mut().push(s.clone())
	});

	let undo = Rc::new(RefCell::new(0));
	let counter = Rc::clone(&undo);
	panel.on_key_press(&KeyPress::parse("ctrl+z").unwrap(), move |_| {
		*counter.borrow_mut() += 1
	});

	let controls = root.query_by_class(form.tag_class());
	controls[1].set_value("11");
	controls[2].set_checked(true);
	controls[2].dispatch_event(EventType::Change);
	spawn::run_until_stalled();

	assert_eq!(saved.borrow().len(), 1);
	assert_eq!(
		state.get(),
		Settings {
			nickname: "neo".into(),
			volume: Some(11),
			notifications: true,
		}
	);

	let pressed = KeyPress::from_keyboard("z", false, true, false, false);
	assert_eq!(panel.emit_key_press(&pressed, None, EmitScope::Bubble), 1);
	assert_eq!(app.emit_key_press(&pressed, None, EmitScope::Bubble), 0);
	assert_eq!(*undo.borrow(), 1);
}

#[rstest]
fn detaching_a_scope_silences_its_form() {
	let scope = Scope::root();
	let form = FormBinding::detached(Settings::default(), &scope);
	let root = Element::new("div");
	form.mount(&root);
	form.render(settings_view(&form)).unwrap();

	let hits = Rc::new(RefCell::new(0));
	let sink = Rc::clone(&hits);
	scope.on_message(EventType::Change, &form.data_changed_key(), move |_, _| {
		*sink.borrow_mut() += 1
	});
	scope.detach();

	let nickname = root.query_by_class(form.tag_class()).remove(0);
	nickname.set_value("trinity");
	nickname.dispatch_event(EventType::Change);
	spawn::run_until_stalled();

	// data still merges; nobody is listening any more
	assert_eq!(form.data().nickname, "trinity");
	assert_eq!(*hits.borrow(), 0);
}
