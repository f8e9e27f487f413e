//! App registry: launch metadata for every hosted application and the mount
//! dispatch for window contents.

use desktop_app_contract::AppMountContext;
use leptos::*;

use crate::model::{AppId, OpenWindowRequest, WindowRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppDescriptor {
    pub app_id: AppId,
    pub launcher_label: &'static str,
    pub window_width: i32,
    pub window_height: i32,
    pub resizable: bool,
    pub show_on_desktop: bool,
}

const APP_REGISTRY: [AppDescriptor; 5] = [
    AppDescriptor {
        app_id: AppId::Solitaire,
        launcher_label: "Solitaire",
        window_width: 700,
        window_height: 560,
        resizable: true,
        show_on_desktop: true,
    },
    AppDescriptor {
        app_id: AppId::Blockfall,
        launcher_label: "Blockfall",
        window_width: 600,
        window_height: 600,
        resizable: false,
        show_on_desktop: true,
    },
    AppDescriptor {
        app_id: AppId::Minesweeper,
        launcher_label: "Minesweeper",
        window_width: 280,
        window_height: 380,
        resizable: false,
        show_on_desktop: false,
    },
    AppDescriptor {
        app_id: AppId::Calculator,
        launcher_label: "Calculator",
        window_width: 260,
        window_height: 340,
        resizable: false,
        show_on_desktop: false,
    },
    AppDescriptor {
        app_id: AppId::Browser,
        launcher_label: "Netscope Navigator",
        window_width: 640,
        window_height: 480,
        resizable: true,
        show_on_desktop: true,
    },
];

pub fn app_registry() -> &'static [AppDescriptor] {
    &APP_REGISTRY
}

pub fn desktop_icon_apps() -> Vec<AppDescriptor> {
    app_registry()
        .iter()
        .copied()
        .filter(|entry| entry.show_on_desktop)
        .collect()
}

pub fn app_descriptor(app_id: AppId) -> &'static AppDescriptor {
    app_registry()
        .iter()
        .find(|entry| entry.app_id == app_id)
        .expect("every AppId has a registry entry")
}

/// Builds the default open request for an app: registry title/icon/geometry,
/// position left to the window cascade.
pub fn launch_request(app_id: AppId) -> OpenWindowRequest {
    let descriptor = app_descriptor(app_id);
    let mut req = OpenWindowRequest::new(app_id);
    req.title = Some(app_id.title().to_string());
    req.icon_glyph = Some(app_id.icon_glyph().to_string());
    req.width = Some(descriptor.window_width);
    req.height = Some(descriptor.window_height);
    req.resizable = descriptor.resizable;
    req
}

/// Resolves a launch request from a string identifier.
///
/// Unknown identifiers are reported and dropped; the caller sees `None` and
/// the desktop state is untouched.
pub fn launch_request_by_slug(slug: &str) -> Option<OpenWindowRequest> {
    match AppId::from_slug(slug) {
        Some(app_id) => Some(launch_request(app_id)),
        None => {
            logging::warn!("ignoring launch request for unknown app `{slug}`");
            None
        }
    }
}

/// Mounts the app view for a managed window.
pub fn render_window_contents(window: &WindowRecord, context: AppMountContext) -> View {
    match window.app_id {
        AppId::Solitaire => desktop_app_solitaire::app_module().mount(context),
        AppId::Blockfall => desktop_app_blockfall::app_module().mount(context),
        AppId::Minesweeper => render_minesweeper_placeholder(),
        AppId::Calculator => render_calculator_placeholder(),
        AppId::Browser => render_browser_placeholder(),
    }
}

fn render_minesweeper_placeholder() -> View {
    view! {
        <div class="app app-placeholder">
            <p><strong>"Minesweeper"</strong></p>
            <p>"The mine field ships separately from the shell core."</p>
        </div>
    }
    .into_view()
}

fn render_calculator_placeholder() -> View {
    view! {
        <div class="app app-placeholder">
            <p><strong>"Calculator"</strong></p>
            <p>"0."</p>
        </div>
    }
    .into_view()
}

fn render_browser_placeholder() -> View {
    view! {
        <div class="app app-placeholder">
            <p><strong>"Netscope Navigator"</strong></p>
            <p>"Dialing up... 56k handshake in progress."</p>
            <progress max="100" value="45"></progress>
        </div>
    }
    .into_view()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn every_app_id_resolves_a_descriptor_and_round_trips_its_slug() {
        for entry in app_registry() {
            assert_eq!(app_descriptor(entry.app_id).app_id, entry.app_id);
            assert_eq!(AppId::from_slug(entry.app_id.slug()), Some(entry.app_id));
        }
    }

    #[test]
    fn unknown_slug_is_dropped() {
        assert_eq!(launch_request_by_slug("defrag-wizard"), None);
    }

    #[test]
    fn launch_request_carries_registry_geometry() {
        let req = launch_request(AppId::Blockfall);
        assert_eq!(req.width, Some(600));
        assert_eq!(req.height, Some(600));
        assert!(!req.resizable);
        assert_eq!(req.title.as_deref(), Some("Blockfall"));
        assert_eq!(req.x, None);
        assert_eq!(req.y, None);
    }
}
