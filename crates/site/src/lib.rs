//! Browser entry layer for the desktop shell.

use desktop_runtime::{DesktopProvider, DesktopShell};
use leptos::*;

#[component]
pub fn SiteApp() -> impl IntoView {
    view! {
        <DesktopProvider>
            <DesktopShell />
        </DesktopProvider>
    }
}

#[cfg(all(feature = "csr", target_arch = "wasm32"))]
pub fn mount() {
    console_error_panic_hook::set_once();
    leptos::mount_to_body(|| leptos::view! { <SiteApp /> })
}
