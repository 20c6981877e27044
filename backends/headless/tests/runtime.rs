//! End-to-end tests driving the engine against the headless backend.

use std::cell::Cell as StdCell;
use std::rc::Rc;

use kawa_core::widgets::{Anchor, Button, Entry, EntryPurpose, Grid, Item, Label, Position, Span, Window};
use kawa_core::{
    AnyState, App, BuildCtx, Error, EventPayload, Handler, Key, MethodHandler, NativeEvent,
    Propagation, Runtime, RuntimeConfig, State, StateRef, StatefulWidget, StatelessWidget, Widget,
};
use kawa_headless::{HeadlessBackend, ObjectId};

fn started(app: App) -> Runtime<HeadlessBackend> {
    let mut runtime = Runtime::new(app, HeadlessBackend::new());
    runtime.start().expect("initial build pass");
    runtime
}

fn only_button(runtime: &Runtime<HeadlessBackend>) -> ObjectId {
    let mut buttons = runtime.backend().buttons();
    let (id, _) = buttons.next().expect("a button");
    assert!(buttons.next().is_none(), "expected exactly one button");
    id
}

// ---------------------------------------------------------------------------
// Counter app: the canonical stateful widget.
// ---------------------------------------------------------------------------

struct CounterState {
    count: u32,
}

fn on_click(this: &StateRef<CounterState>, (): ()) -> Propagation {
    this.update(|state| state.count += 1);
    Propagation::Continue
}

const ON_CLICK: MethodHandler<CounterState, ()> = MethodHandler::new(on_click);

impl State for CounterState {
    fn build(&mut self, this: &StateRef<Self>, _ctx: &mut BuildCtx) -> Widget {
        Button::new(format!("pressed {} times", self.count))
            .connect(Button::CLICKED, this.bind(ON_CLICK))
            .into()
    }
}

#[derive(Debug)]
struct Counter;

impl StatefulWidget for Counter {
    fn key(&self) -> Key {
        Key::auto::<Self, _>(&"counter")
    }

    fn create_state(&self, ctx: &mut BuildCtx) -> AnyState {
        AnyState::new(ctx, CounterState { count: 0 })
    }
}

fn counter_app() -> App {
    App::new(
        "org.kawa.tests.counter",
        Window::new("Counter", Widget::stateful(Counter)).size(200, 100),
    )
}

#[test]
fn application_id_reaches_the_backend() {
    let runtime = started(counter_app());
    assert_eq!(runtime.backend().app_id(), Some("org.kawa.tests.counter"));
}

#[test]
fn initial_pass_mounts_and_presents_the_window() {
    let runtime = started(counter_app());
    let root = runtime.root_handle().expect("mounted root");
    let window = runtime.backend().window(root).expect("live window");
    assert_eq!(window.title, "Counter");
    assert_eq!(window.default_size, (200, 100));
    assert!(window.presented);
    assert_eq!(window.child, Some(only_button(&runtime)));
}

#[test]
fn click_updates_the_button_in_place() {
    let mut runtime = started(counter_app());
    let button = only_button(&runtime);
    runtime.backend_mut().reset_counters();

    assert!(runtime
        .backend_mut()
        .emit(button, NativeEvent::Clicked, EventPayload::None));
    runtime.pump().unwrap();

    assert_eq!(only_button(&runtime), button, "button node must be reused");
    assert_eq!(
        runtime.backend().button(button).unwrap().label,
        "pressed 1 times"
    );
    let counters = runtime.backend().counters();
    assert_eq!(counters.created, 0);
    assert_eq!(counters.destroyed, 0);
}

#[test]
fn state_survives_many_rebuilds() {
    let mut runtime = started(counter_app());
    let button = only_button(&runtime);

    for _ in 0..5 {
        runtime
            .backend_mut()
            .emit(button, NativeEvent::Clicked, EventPayload::None);
        runtime.pump().unwrap();
    }

    assert_eq!(
        runtime.backend().button(button).unwrap().label,
        "pressed 5 times"
    );
}

#[test]
fn update_requests_coalesce_into_one_pass() {
    let mut runtime = started(counter_app());
    let button = only_button(&runtime);
    assert_eq!(runtime.passes(), 1);

    runtime
        .backend_mut()
        .emit(button, NativeEvent::Clicked, EventPayload::None);
    runtime
        .backend_mut()
        .emit(button, NativeEvent::Clicked, EventPayload::None);
    runtime.pump().unwrap();

    assert_eq!(runtime.passes(), 2, "two updates must share one pass");
    assert_eq!(
        runtime.backend().button(button).unwrap().label,
        "pressed 2 times"
    );
    assert!(!runtime.has_pending_render());
}

#[test]
fn unchanged_tree_reconciles_without_structural_traffic() {
    let mut runtime = started(counter_app());
    runtime.backend_mut().reset_counters();

    runtime.render_pass().unwrap();

    let counters = runtime.backend().counters();
    assert_eq!(counters.created, 0);
    assert_eq!(counters.destroyed, 0);
    assert_eq!(counters.attaches, 0);
    assert_eq!(counters.detaches, 0);
    assert!(counters.property_sets > 0, "property sets may fire redundantly");
}

#[test]
fn shutdown_releases_every_native_object() {
    let runtime = started(counter_app());
    let backend = runtime.shutdown();
    assert!(backend.is_torn_down());
    assert_eq!(backend.live_objects(), 0);
    assert_eq!(backend.counters().created, backend.counters().destroyed);
}

// ---------------------------------------------------------------------------
// Kind changes and state lifetime.
// ---------------------------------------------------------------------------

struct ToggleState {
    on: bool,
}

fn flip(this: &StateRef<ToggleState>, (): ()) -> Propagation {
    this.update(|state| state.on = !state.on);
    Propagation::Continue
}

const FLIP: MethodHandler<ToggleState, ()> = MethodHandler::new(flip);

impl State for ToggleState {
    fn build(&mut self, this: &StateRef<Self>, _ctx: &mut BuildCtx) -> Widget {
        if self.on {
            Label::new("on").into()
        } else {
            Button::new("turn on")
                .connect(Button::CLICKED, this.bind(FLIP))
                .into()
        }
    }
}

#[derive(Debug)]
struct Toggle;

impl StatefulWidget for Toggle {
    fn key(&self) -> Key {
        Key::auto::<Self, _>(&"toggle")
    }

    fn create_state(&self, ctx: &mut BuildCtx) -> AnyState {
        AnyState::new(ctx, ToggleState { on: false })
    }
}

#[test]
fn kind_change_replaces_the_node_and_releases_the_old_handle() {
    let mut runtime = started(App::new(
        "org.kawa.tests.toggle",
        Window::new("Toggle", Widget::stateful(Toggle)),
    ));
    let button = only_button(&runtime);
    runtime.backend_mut().reset_counters();

    runtime
        .backend_mut()
        .emit(button, NativeEvent::Clicked, EventPayload::None);
    runtime.pump().unwrap();

    assert!(!runtime.backend().is_alive(button));
    assert_eq!(runtime.backend().buttons().count(), 0);
    assert!(
        runtime
            .backend()
            .labels()
            .any(|(_, label)| label.text == "on")
    );
    let counters = runtime.backend().counters();
    assert_eq!(counters.created, 1);
    assert_eq!(counters.destroyed, 1);

    let root = runtime.root_handle().unwrap();
    let child = runtime.backend().window(root).unwrap().child.unwrap();
    assert!(runtime.backend().label(child).is_some());
}

struct HostState {
    show_guest: bool,
    guest_drops: Rc<StdCell<u32>>,
}

fn evict(this: &StateRef<HostState>, (): ()) -> Propagation {
    this.update(|state| state.show_guest = false);
    Propagation::Continue
}

const EVICT: MethodHandler<HostState, ()> = MethodHandler::new(evict);

impl State for HostState {
    fn build(&mut self, this: &StateRef<Self>, _ctx: &mut BuildCtx) -> Widget {
        let guest: Widget = if self.show_guest {
            Widget::stateful(Guest {
                drops: Rc::clone(&self.guest_drops),
            })
        } else {
            Label::new("vacant").into()
        };
        Grid::column(vec![
            Item::new(
                Button::new("evict").connect(Button::CLICKED, this.bind(EVICT)),
            ),
            Item::new(guest),
        ])
        .into()
    }
}

#[derive(Debug)]
struct Host {
    guest_drops: Rc<StdCell<u32>>,
}

impl StatefulWidget for Host {
    fn key(&self) -> Key {
        Key::auto::<Self, _>(&"host")
    }

    fn create_state(&self, ctx: &mut BuildCtx) -> AnyState {
        AnyState::new(
            ctx,
            HostState {
                show_guest: true,
                guest_drops: Rc::clone(&self.guest_drops),
            },
        )
    }
}

struct GuestState {
    drops: Rc<StdCell<u32>>,
}

impl State for GuestState {
    fn build(&mut self, _this: &StateRef<Self>, _ctx: &mut BuildCtx) -> Widget {
        Label::new("guest").into()
    }
}

impl Drop for GuestState {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

#[derive(Debug)]
struct Guest {
    drops: Rc<StdCell<u32>>,
}

impl StatefulWidget for Guest {
    fn key(&self) -> Key {
        Key::auto::<Self, _>(&"guest")
    }

    fn create_state(&self, ctx: &mut BuildCtx) -> AnyState {
        AnyState::new(
            ctx,
            GuestState {
                drops: Rc::clone(&self.drops),
            },
        )
    }
}

#[test]
fn state_whose_key_disappears_is_dropped_exactly_once() {
    let drops = Rc::new(StdCell::new(0));
    let mut runtime = started(App::new(
        "org.kawa.tests.lifetime",
        Window::new(
            "Lifetime",
            Widget::stateful(Host {
                guest_drops: Rc::clone(&drops),
            }),
        ),
    ));
    assert_eq!(drops.get(), 0);

    let evict_button = runtime
        .backend()
        .buttons()
        .find(|(_, state)| state.label == "evict")
        .map(|(id, _)| id)
        .unwrap();
    runtime
        .backend_mut()
        .emit(evict_button, NativeEvent::Clicked, EventPayload::None);
    runtime.pump().unwrap();
    assert_eq!(drops.get(), 1);

    // Further passes must not re-drop.
    runtime.render_pass().unwrap();
    assert_eq!(drops.get(), 1);
}

// ---------------------------------------------------------------------------
// Grid placement.
// ---------------------------------------------------------------------------

fn grid_cells(runtime: &Runtime<HeadlessBackend>) -> Vec<(i32, i32, i32, i32)> {
    let (_, grid) = runtime.backend().grids().next().expect("a grid");
    grid.children
        .iter()
        .map(|(_, cell)| (cell.x, cell.y, cell.width, cell.height))
        .collect()
}

#[test]
fn flow_positions_walk_around_the_grid() {
    let grid = Grid::column(vec![
        Item::new(Label::new("first")),
        Item::new(Label::new("second")).position(Position::Right),
        Item::new(Label::new("third")).position(Position::Below),
        Item::new(Label::new("fourth")).position(Position::Left),
    ]);
    let runtime = started(App::new(
        "org.kawa.tests.grid",
        Window::new("Grid", grid),
    ));

    assert_eq!(
        grid_cells(&runtime),
        vec![(0, 0, 1, 1), (1, 0, 1, 1), (1, 1, 1, 1), (0, 1, 1, 1)]
    );
}

#[test]
fn relative_anchor_resolves_against_the_previous_item() {
    let grid = Grid::column(vec![
        Item::new(Label::new("wide"))
            .at(Anchor::absolute(1, 2))
            .span(Span::new(2, 2)),
        Item::new(Label::new("beside")).at(Anchor::relative(-1, 0)),
    ]);
    let runtime = started(App::new(
        "org.kawa.tests.anchors",
        Window::new("Anchors", grid),
    ));

    assert_eq!(
        grid_cells(&runtime),
        vec![(1, 2, 2, 2), (0, 2, 1, 1)]
    );
}

#[test]
fn unresolved_grid_position_is_fatal() {
    let grid = Grid::new(vec![Item::new(Label::new("floating"))]);
    let mut runtime = Runtime::new(
        App::new("org.kawa.tests.badgrid", Window::new("Bad", grid)),
        HeadlessBackend::new(),
    );
    assert_eq!(
        runtime.start().unwrap_err(),
        Error::UnresolvedGridPosition { index: 0 }
    );
}

// ---------------------------------------------------------------------------
// Entries and event payloads.
// ---------------------------------------------------------------------------

struct NameState {
    greeting: String,
}

fn on_name(this: &StateRef<NameState>, text: String) -> Propagation {
    this.update(|state| state.greeting = format!("hello {text}"));
    Propagation::Continue
}

const ON_NAME: MethodHandler<NameState, String> = MethodHandler::new(on_name);

impl State for NameState {
    fn build(&mut self, this: &StateRef<Self>, _ctx: &mut BuildCtx) -> Widget {
        Grid::column(vec![
            Item::new(
                Entry::new()
                    .placeholder("your name")
                    .connect(Entry::CHANGED, this.bind(ON_NAME)),
            ),
            Item::new(
                Entry::new()
                    .placeholder("your password")
                    .purpose(EntryPurpose::Password),
            ),
            Item::new(Label::new(self.greeting.clone())),
        ])
        .into()
    }
}

#[derive(Debug)]
struct NameBox;

impl StatefulWidget for NameBox {
    fn key(&self) -> Key {
        Key::auto::<Self, _>(&"name-box")
    }

    fn create_state(&self, ctx: &mut BuildCtx) -> AnyState {
        AnyState::new(
            ctx,
            NameState {
                greeting: String::from("hello stranger"),
            },
        )
    }
}

#[test]
fn changed_event_delivers_its_text_payload() {
    let mut runtime = started(App::new(
        "org.kawa.tests.entry",
        Window::new("Entry", Widget::stateful(NameBox)),
    ));
    let name_entry = runtime
        .backend()
        .entries()
        .find(|(_, state)| state.placeholder == "your name")
        .map(|(id, _)| id)
        .unwrap();

    runtime.backend_mut().emit(
        name_entry,
        NativeEvent::Changed,
        EventPayload::Text("alice".into()),
    );
    runtime.pump().unwrap();

    assert!(
        runtime
            .backend()
            .labels()
            .any(|(_, label)| label.text == "hello alice")
    );
}

#[test]
fn password_entries_ask_for_masked_contents() {
    let runtime = started(App::new(
        "org.kawa.tests.password",
        Window::new("Entry", Widget::stateful(NameBox)),
    ));
    let password = runtime
        .backend()
        .entries()
        .find(|(_, state)| state.placeholder == "your password")
        .map(|(_, state)| state.clone())
        .unwrap();
    assert!(!password.visible);
}

#[test]
fn events_without_subscription_are_discarded() {
    let mut runtime = started(App::new(
        "org.kawa.tests.nosub",
        Window::new("Plain", Label::new("static")),
    ));
    let (label, _) = runtime.backend().labels().next().unwrap();
    assert!(!runtime
        .backend_mut()
        .emit(label, NativeEvent::Clicked, EventPayload::None));
    runtime.pump().unwrap();
    assert_eq!(runtime.passes(), 1);
}

// ---------------------------------------------------------------------------
// Dispatch order and short-circuiting.
// ---------------------------------------------------------------------------

#[test]
fn stop_short_circuits_later_handlers() {
    let first = Rc::new(StdCell::new(0u32));
    let second = Rc::new(StdCell::new(0u32));

    let button = Button::new("both")
        .connect(
            Button::CLICKED,
            Handler::new({
                let first = Rc::clone(&first);
                move |(): ()| {
                    first.set(first.get() + 1);
                    Propagation::Stop
                }
            }),
        )
        .connect(
            Button::CLICKED,
            Handler::new({
                let second = Rc::clone(&second);
                move |(): ()| {
                    second.set(second.get() + 1);
                    Propagation::Continue
                }
            }),
        );

    let mut runtime = started(App::new(
        "org.kawa.tests.stop",
        Window::new("Stop", button),
    ));
    let handle = only_button(&runtime);
    runtime
        .backend_mut()
        .emit(handle, NativeEvent::Clicked, EventPayload::None);
    runtime.pump().unwrap();

    assert_eq!(first.get(), 1);
    assert_eq!(second.get(), 0);
}

// ---------------------------------------------------------------------------
// Configuration errors and preconditions.
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Forever;

impl StatelessWidget for Forever {
    fn key(&self) -> Key {
        Key::Null
    }

    fn build(&self, _ctx: &mut BuildCtx) -> Widget {
        Widget::stateless(Self)
    }
}

#[test]
fn root_must_resolve_to_a_window() {
    let mut runtime = Runtime::new(
        App::new("org.kawa.tests.badroot", Label::new("not a window")),
        HeadlessBackend::new(),
    );
    assert_eq!(
        runtime.start().unwrap_err(),
        Error::RootNotWindow { found: "label" }
    );
}

#[test]
fn runaway_build_chain_hits_the_iteration_bound() {
    let mut runtime = Runtime::with_config(
        App::new("org.kawa.tests.runaway", Widget::stateless(Forever)),
        HeadlessBackend::new(),
        RuntimeConfig {
            max_build_iterations: 25,
        },
    );
    assert_eq!(
        runtime.start().unwrap_err(),
        Error::TooManyBuildIterations { limit: 25 }
    );
}

struct ReentrantState;

impl State for ReentrantState {
    fn build(&mut self, this: &StateRef<Self>, _ctx: &mut BuildCtx) -> Widget {
        this.update(|_| {});
        Label::new("unreachable").into()
    }
}

#[derive(Debug)]
struct Reentrant;

impl StatefulWidget for Reentrant {
    fn key(&self) -> Key {
        Key::auto::<Self, _>(&"reentrant")
    }

    fn create_state(&self, ctx: &mut BuildCtx) -> AnyState {
        AnyState::new(ctx, ReentrantState)
    }
}

#[test]
#[should_panic(expected = "state must not be mutated during an active build pass")]
fn mutating_state_during_a_pass_is_a_precondition_violation() {
    let mut runtime = Runtime::new(
        App::new(
            "org.kawa.tests.reentrant",
            Window::new("Reentrant", Widget::stateful(Reentrant)),
        ),
        HeadlessBackend::new(),
    );
    let _ = runtime.start();
}
