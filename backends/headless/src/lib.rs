//! An in-memory [`Backend`] implementation.
//!
//! The headless backend keeps every "native" object in an id-keyed table and
//! records the structural traffic the reconciler generates (creations,
//! destroys, attaches, detaches, property sets). It exists to drive the
//! engine end-to-end without a display server: integration tests and demos
//! inspect the tables to assert what a real toolkit would have been asked to
//! do, and feed native events back in with [`HeadlessBackend::emit`].

use std::collections::{HashMap, VecDeque};

use tracing::trace;

use kawa_core::backend::{Backend, FiredEvent};
use kawa_core::signal::{EventPayload, NativeEvent};
use kawa_core::widgets::{Cell, Justify};

/// Opaque handle to one headless native object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

/// Counters over the structural and property traffic seen so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpCounters {
    /// Native objects created.
    pub created: usize,
    /// Native objects released.
    pub destroyed: usize,
    /// Property setter invocations, including redundant ones.
    pub property_sets: usize,
    /// Child attachments (grid cells and window children).
    pub attaches: usize,
    /// Child detachments.
    pub detaches: usize,
}

/// Recorded state of a native window.
#[derive(Debug, Clone, Default)]
pub struct WindowState {
    /// Current title.
    pub title: String,
    /// Default size in pixels.
    pub default_size: (i32, i32),
    /// Whether the title bar is shown.
    pub decorated: bool,
    /// The window's single child, if attached.
    pub child: Option<ObjectId>,
    /// Whether the window has been presented.
    pub presented: bool,
}

/// Recorded state of a native label.
#[derive(Debug, Clone, Default)]
pub struct LabelState {
    /// Current text.
    pub text: String,
    /// Current justification.
    pub justify: Justify,
}

/// Recorded state of a native button.
#[derive(Debug, Clone, Default)]
pub struct ButtonState {
    /// Current label text.
    pub label: String,
}

/// Recorded state of a native text entry.
#[derive(Debug, Clone, Default)]
pub struct EntryState {
    /// Current placeholder hint.
    pub placeholder: String,
    /// Whether the contents are visible (false for password entries).
    pub visible: bool,
}

/// Recorded state of a native grid.
#[derive(Debug, Clone, Default)]
pub struct GridState {
    /// Whether rows are homogeneous.
    pub homogeneous_rows: bool,
    /// Whether columns are homogeneous.
    pub homogeneous_columns: bool,
    /// Attached children with their cell rectangles, in attach order.
    pub children: Vec<(ObjectId, Cell)>,
}

/// The in-memory toolkit.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    app_id: Option<String>,
    next_id: u64,
    windows: HashMap<ObjectId, WindowState>,
    labels: HashMap<ObjectId, LabelState>,
    buttons: HashMap<ObjectId, ButtonState>,
    entries: HashMap<ObjectId, EntryState>,
    grids: HashMap<ObjectId, GridState>,
    subscriptions: HashMap<ObjectId, Vec<NativeEvent>>,
    queue: VecDeque<FiredEvent<ObjectId>>,
    counters: OpCounters,
    torn_down: bool,
}

impl HeadlessBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The application id handed over at runtime construction, if any.
    #[must_use]
    pub fn app_id(&self) -> Option<&str> {
        self.app_id.as_deref()
    }

    /// The traffic counters accumulated so far.
    #[must_use]
    pub const fn counters(&self) -> OpCounters {
        self.counters
    }

    /// Resets the traffic counters, e.g. between two passes under test.
    pub fn reset_counters(&mut self) {
        self.counters = OpCounters::default();
    }

    /// Returns `true` while the object behind `id` is alive.
    #[must_use]
    pub fn is_alive(&self, id: ObjectId) -> bool {
        self.windows.contains_key(&id)
            || self.labels.contains_key(&id)
            || self.buttons.contains_key(&id)
            || self.entries.contains_key(&id)
            || self.grids.contains_key(&id)
    }

    /// Total number of live objects.
    #[must_use]
    pub fn live_objects(&self) -> usize {
        self.windows.len() + self.labels.len() + self.buttons.len() + self.entries.len() + self.grids.len()
    }

    /// Returns `true` after [`Backend::teardown`] ran.
    #[must_use]
    pub const fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Looks up a live window.
    #[must_use]
    pub fn window(&self, id: ObjectId) -> Option<&WindowState> {
        self.windows.get(&id)
    }

    /// Looks up a live label.
    #[must_use]
    pub fn label(&self, id: ObjectId) -> Option<&LabelState> {
        self.labels.get(&id)
    }

    /// Looks up a live button.
    #[must_use]
    pub fn button(&self, id: ObjectId) -> Option<&ButtonState> {
        self.buttons.get(&id)
    }

    /// Looks up a live entry.
    #[must_use]
    pub fn entry(&self, id: ObjectId) -> Option<&EntryState> {
        self.entries.get(&id)
    }

    /// Looks up a live grid.
    #[must_use]
    pub fn grid(&self, id: ObjectId) -> Option<&GridState> {
        self.grids.get(&id)
    }

    /// Iterates over live windows.
    pub fn windows(&self) -> impl Iterator<Item = (ObjectId, &WindowState)> {
        self.windows.iter().map(|(id, state)| (*id, state))
    }

    /// Iterates over live labels.
    pub fn labels(&self) -> impl Iterator<Item = (ObjectId, &LabelState)> {
        self.labels.iter().map(|(id, state)| (*id, state))
    }

    /// Iterates over live buttons.
    pub fn buttons(&self) -> impl Iterator<Item = (ObjectId, &ButtonState)> {
        self.buttons.iter().map(|(id, state)| (*id, state))
    }

    /// Iterates over live entries.
    pub fn entries(&self) -> impl Iterator<Item = (ObjectId, &EntryState)> {
        self.entries.iter().map(|(id, state)| (*id, state))
    }

    /// Iterates over live grids.
    pub fn grids(&self) -> impl Iterator<Item = (ObjectId, &GridState)> {
        self.grids.iter().map(|(id, state)| (*id, state))
    }

    /// Fires a native event on a handle, as the real toolkit would.
    ///
    /// The event is queued for the runtime's next pump. Returns `false`
    /// when nothing subscribed to the event on this handle, in which case
    /// the event is discarded.
    pub fn emit(&mut self, handle: ObjectId, event: NativeEvent, payload: EventPayload) -> bool {
        let subscribed = self
            .subscriptions
            .get(&handle)
            .is_some_and(|events| events.contains(&event));
        if subscribed {
            self.queue.push_back(FiredEvent {
                handle,
                event,
                payload,
            });
        } else {
            trace!(?handle, ?event, "event emitted without a subscription");
        }
        subscribed
    }

    fn alloc(&mut self) -> ObjectId {
        self.next_id += 1;
        self.counters.created += 1;
        ObjectId(self.next_id)
    }

    fn release(&mut self, id: ObjectId) {
        self.subscriptions.remove(&id);
        if let Some(window) = self.windows.remove(&id) {
            self.counters.destroyed += 1;
            if let Some(child) = window.child {
                self.release(child);
            }
        } else if let Some(grid) = self.grids.remove(&id) {
            self.counters.destroyed += 1;
            for (child, _) in grid.children {
                self.release(child);
            }
        } else if self.labels.remove(&id).is_some()
            || self.buttons.remove(&id).is_some()
            || self.entries.remove(&id).is_some()
        {
            self.counters.destroyed += 1;
        } else {
            trace!(?id, "destroy on an unknown handle");
        }
    }
}

impl Backend for HeadlessBackend {
    type Handle = ObjectId;

    fn init_application(&mut self, id: &str) {
        self.app_id = Some(id.to_owned());
    }

    fn teardown(&mut self) {
        self.torn_down = true;
    }

    fn create_window(&mut self) -> ObjectId {
        let id = self.alloc();
        self.windows.insert(id, WindowState::default());
        id
    }

    fn create_label(&mut self) -> ObjectId {
        let id = self.alloc();
        self.labels.insert(id, LabelState::default());
        id
    }

    fn create_button(&mut self) -> ObjectId {
        let id = self.alloc();
        self.buttons.insert(id, ButtonState::default());
        id
    }

    fn create_entry(&mut self) -> ObjectId {
        let id = self.alloc();
        self.entries.insert(id, EntryState::default());
        id
    }

    fn create_grid(&mut self) -> ObjectId {
        let id = self.alloc();
        self.grids.insert(id, GridState::default());
        id
    }

    fn set_window_title(&mut self, window: ObjectId, title: &str) {
        self.counters.property_sets += 1;
        if let Some(state) = self.windows.get_mut(&window) {
            state.title = title.to_owned();
        }
    }

    fn set_window_default_size(&mut self, window: ObjectId, width: i32, height: i32) {
        self.counters.property_sets += 1;
        if let Some(state) = self.windows.get_mut(&window) {
            state.default_size = (width, height);
        }
    }

    fn set_window_decorated(&mut self, window: ObjectId, decorated: bool) {
        self.counters.property_sets += 1;
        if let Some(state) = self.windows.get_mut(&window) {
            state.decorated = decorated;
        }
    }

    fn set_window_child(&mut self, window: ObjectId, child: Option<ObjectId>) {
        match child {
            Some(_) => self.counters.attaches += 1,
            None => self.counters.detaches += 1,
        }
        if let Some(state) = self.windows.get_mut(&window) {
            state.child = child;
        }
    }

    fn present_window(&mut self, window: ObjectId) {
        if let Some(state) = self.windows.get_mut(&window) {
            state.presented = true;
        }
    }

    fn set_label_text(&mut self, label: ObjectId, text: &str) {
        self.counters.property_sets += 1;
        if let Some(state) = self.labels.get_mut(&label) {
            state.text = text.to_owned();
        }
    }

    fn set_label_justify(&mut self, label: ObjectId, justify: Justify) {
        self.counters.property_sets += 1;
        if let Some(state) = self.labels.get_mut(&label) {
            state.justify = justify;
        }
    }

    fn set_button_label(&mut self, button: ObjectId, label: &str) {
        self.counters.property_sets += 1;
        if let Some(state) = self.buttons.get_mut(&button) {
            state.label = label.to_owned();
        }
    }

    fn set_entry_placeholder(&mut self, entry: ObjectId, placeholder: &str) {
        self.counters.property_sets += 1;
        if let Some(state) = self.entries.get_mut(&entry) {
            state.placeholder = placeholder.to_owned();
        }
    }

    fn set_entry_visibility(&mut self, entry: ObjectId, visible: bool) {
        self.counters.property_sets += 1;
        if let Some(state) = self.entries.get_mut(&entry) {
            state.visible = visible;
        }
    }

    fn set_grid_homogeneity(&mut self, grid: ObjectId, rows: bool, columns: bool) {
        self.counters.property_sets += 1;
        if let Some(state) = self.grids.get_mut(&grid) {
            state.homogeneous_rows = rows;
            state.homogeneous_columns = columns;
        }
    }

    fn grid_attach(
        &mut self,
        grid: ObjectId,
        child: ObjectId,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) {
        self.counters.attaches += 1;
        if let Some(state) = self.grids.get_mut(&grid) {
            state.children.push((
                child,
                Cell {
                    x,
                    y,
                    width,
                    height,
                },
            ));
        }
    }

    fn grid_detach(&mut self, grid: ObjectId, child: ObjectId) {
        self.counters.detaches += 1;
        if let Some(state) = self.grids.get_mut(&grid) {
            state.children.retain(|(id, _)| *id != child);
        }
    }

    fn destroy(&mut self, handle: ObjectId) {
        self.release(handle);
    }

    fn subscribe(&mut self, handle: ObjectId, event: NativeEvent) {
        let events = self.subscriptions.entry(handle).or_default();
        if !events.contains(&event) {
            events.push(event);
        }
    }

    fn poll_event(&mut self) -> Option<FiredEvent<ObjectId>> {
        self.queue.pop_front()
    }
}
