#![doc = include_str!("../README.md")]

pub mod logging;

#[doc(inline)]
pub use kawa_core::{
    AnyState, App, Backend, BuildCtx, Error, EventPayload, FiredEvent, Handler, Key,
    MethodHandler, NativeEvent, Propagation, RenderNode, Runtime, RuntimeConfig, SignalArg,
    SignalConnection, SignalConnectionGroup, SignalId, State, StateRef, StatefulWidget,
    StatelessWidget, Widget,
};

#[doc(inline)]
pub use kawa_core::widgets::{
    Anchor, Button, Cell, Entry, EntryPurpose, Grid, Homogeneity, Item, Justify, Label, Position,
    Span, Window,
};

pub use tracing as log;

pub mod prelude {
    //! Commonly used traits and types, importable with a single `use`.

    pub use kawa_core::widgets::{
        Anchor, Button, Entry, EntryPurpose, Grid, Homogeneity, Item, Justify, Label, Position,
        Span, Window,
    };
    pub use kawa_core::{
        AnyState, App, Backend, BuildCtx, Error, EventPayload, Handler, Key, MethodHandler,
        NativeEvent, Propagation, Runtime, RuntimeConfig, State, StateRef, StatefulWidget,
        StatelessWidget, Widget,
    };
}

/// Builds a [`Runtime`] for `app` over `backend` and runs the initial build
/// pass, leaving the root window mounted and presented.
///
/// # Errors
///
/// Propagates any configuration error raised by the first pass.
pub fn launch<B: Backend>(app: App, backend: B) -> Result<Runtime<B>, Error> {
    let mut runtime = Runtime::new(app, backend);
    runtime.start()?;
    Ok(runtime)
}
