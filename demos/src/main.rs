//! A small application exercising the whole engine: a counter button, a
//! grid with anchored and flowing items, and a two-entry form. Runs against
//! the headless backend and prints what a real toolkit would have shown.

use kawa::prelude::*;
use kawa_headless::HeadlessBackend;

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
        Button::new(format!("You have pressed this {} times.", self.count))
            .connect(Button::CLICKED, this.bind(ON_CLICK))
            .into()
    }
}

#[derive(Debug)]
struct IncButton;

impl StatefulWidget for IncButton {
    fn key(&self) -> Key {
        Key::auto::<Self, _>(&"inc-button")
    }

    fn create_state(&self, ctx: &mut BuildCtx) -> AnyState {
        AnyState::new(ctx, CounterState { count: 0 })
    }
}

struct NameBoxState {
    name: String,
}

fn on_changed(this: &StateRef<NameBoxState>, text: String) -> Propagation {
    tracing::info!(%text, "name changed");
    this.update(|state| state.name = text);
    Propagation::Continue
}

const ON_CHANGED: MethodHandler<NameBoxState, String> = MethodHandler::new(on_changed);

impl State for NameBoxState {
    fn build(&mut self, this: &StateRef<Self>, _ctx: &mut BuildCtx) -> Widget {
        Grid::column(vec![
            Item::new(
                Entry::new()
                    .placeholder("Enter your name here")
                    .connect(Entry::CHANGED, this.bind(ON_CHANGED)),
            ),
            Item::new(
                Entry::new()
                    .placeholder("Enter your password here")
                    .purpose(EntryPurpose::Password),
            ),
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
            NameBoxState {
                name: String::new(),
            },
        )
    }
}

#[derive(Debug)]
struct MessyGrid;

impl StatelessWidget for MessyGrid {
    fn key(&self) -> Key {
        Key::auto::<Self, _>(&"messy-grid")
    }

    fn build(&self, _ctx: &mut BuildCtx) -> Widget {
        Grid::column(vec![
            Item::new(Label::new("This is a label.")),
            Item::new(Widget::stateful(IncButton)).position(Position::Right),
            Item::new(Button::new("This should be beneath the above")).position(Position::Below),
            Item::new(Button::new("And going full circle")).position(Position::Left),
            Item::new(Button::new("Over yonder!"))
                .at(Anchor::absolute(1, 2))
                .span(Span::new(2, 2)),
            Item::new(Button::new("...and to the left!")).at(Anchor::relative(-1, 0)),
            Item::new(Widget::stateful(NameBox)).at(Anchor::relative(0, 1)),
        ])
        .homogeneity(Homogeneity::All)
        .into()
    }
}

#[derive(Debug)]
struct Home;

impl StatelessWidget for Home {
    fn key(&self) -> Key {
        Key::auto::<Self, _>(&"home")
    }

    fn build(&self, _ctx: &mut BuildCtx) -> Widget {
        Window::new("Kawa Demo", Widget::stateless(MessyGrid))
            .size(200, 100)
            .into()
    }
}

fn main() -> Result<(), Error> {
    kawa::logging::init();

    let app = App::new("org.kawa.demo", Widget::stateless(Home));
    let mut runtime = kawa::launch(app, HeadlessBackend::new())?;

    let counter = runtime
        .backend()
        .buttons()
        .find(|(_, button)| button.label.contains("pressed"))
        .map(|(id, _)| id)
        .expect("counter button is mounted");
    for _ in 0..3 {
        runtime
            .backend_mut()
            .emit(counter, NativeEvent::Clicked, EventPayload::None);
        runtime.pump()?;
    }

    let name_entry = runtime
        .backend()
        .entries()
        .find(|(_, entry)| entry.placeholder.contains("name"))
        .map(|(id, _)| id)
        .expect("name entry is mounted");
    runtime.backend_mut().emit(
        name_entry,
        NativeEvent::Changed,
        EventPayload::Text("refi".into()),
    );
    runtime.pump()?;

    let root = runtime.root_handle().expect("mounted root window");
    let window = runtime.backend().window(root).expect("live root window");
    println!("window: {:?} ({}x{})", window.title, window.default_size.0, window.default_size.1);
    for (_, grid) in runtime.backend().grids() {
        for (child, cell) in &grid.children {
            let description = runtime
                .backend()
                .label(*child)
                .map(|label| format!("label {:?}", label.text))
                .or_else(|| {
                    runtime
                        .backend()
                        .button(*child)
                        .map(|button| format!("button {:?}", button.label))
                })
                .or_else(|| {
                    runtime
                        .backend()
                        .entry(*child)
                        .map(|entry| format!("entry {:?}", entry.placeholder))
                })
                .unwrap_or_else(|| "container".into());
            println!(
                "  cell ({}, {}) {}x{}: {description}",
                cell.x, cell.y, cell.width, cell.height
            );
        }
    }

    runtime.shutdown();
    Ok(())
}
