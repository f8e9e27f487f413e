//! Desktop window manager runtime: state model, reducer, app registry, and
//! the shell UI that renders managed windows with taskbar integration.

pub mod app_runtime;
pub mod apps;
pub mod components;
pub mod model;
pub mod reducer;
pub mod window_manager;

mod runtime_context;

pub use components::DesktopShell;
pub use model::*;
pub use reducer::{reduce_desktop, DesktopAction, ReducerError, RuntimeEffect};
pub use runtime_context::{use_desktop_runtime, DesktopProvider, DesktopRuntimeContext};
