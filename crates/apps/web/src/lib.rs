use console_error_panic_hook::set_once;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, HtmlInputElement};

use session::event_bus::kind;
use session::{
    ClientConfig, EXAMPLE_QUERIES, Event as SessionEvent, Notifier, PageController, Phase, QueuedNotifier,
    begin_query, finish_query,
};

mod dom;
mod fetch;
mod leaflet;
mod toast;

pub use dom::{DomIds, DomResults};
pub use fetch::FetchTransport;
pub use leaflet::LeafletMap;
pub use toast::ToastNotifier;

type WebPage = PageController<LeafletMap, DomResults, QueuedNotifier>;

/// Everything a DOM callback needs. Cloning shares the same page.
#[derive(Clone)]
struct App {
    page: Rc<RefCell<WebPage>>,
    transport: Rc<FetchTransport>,
    notices: QueuedNotifier,
    input: HtmlInputElement,
}

impl App {
    /// The page reaches `Loading` before this returns; only the request runs
    /// on a later task.
    fn submit(&self, text: &str) {
        let Some(ticket) = begin_query(&self.page, text) else {
            return;
        };
        self.flush();

        let app = self.clone();
        spawn_local(async move {
            finish_query(&app.page, app.transport.as_ref(), ticket).await;
            app.flush();
        });
    }

    fn select_row(&self, index: usize) -> bool {
        let selected = self.page.borrow_mut().select_row(index);
        self.flush();
        selected
    }

    fn toggle_panel(&self) -> bool {
        let flipped = self.page.borrow_mut().toggle_panel();
        self.flush();
        flipped
    }

    /// Drains the page's event log to the console, then shows queued toasts.
    /// Must run with the page unborrowed; toast listeners may call back in.
    fn flush(&self) {
        let events = self.page.borrow_mut().events_mut().drain();
        for event in &events {
            log_event(event);
        }

        let mut toasts = ToastNotifier;
        for notice in self.notices.take() {
            toasts.notify(&notice);
        }
    }
}

fn log_event(event: &SessionEvent) {
    let line = JsValue::from_str(&format!(
        "[{}] {}: {}",
        event.generation, event.kind, event.message
    ));
    match event.kind {
        kind::DROPPED | kind::ERRORED | kind::STALE => web_sys::console::warn_1(&line),
        _ => web_sys::console::log_1(&line),
    }
}

/// Handle to a mounted page, kept by the host script.
#[wasm_bindgen]
pub struct GeoQueryApp {
    app: App,
}

#[wasm_bindgen]
impl GeoQueryApp {
    pub fn submit(&self, query: &str) {
        self.app.submit(query);
    }

    pub fn select_row(&self, index: usize) -> bool {
        self.app.select_row(index)
    }

    pub fn toggle_panel(&self) -> bool {
        self.app.toggle_panel()
    }

    pub fn fill_query(&self, text: &str) {
        self.app.input.set_value(text);
    }

    pub fn is_loading(&self) -> bool {
        self.app.page.borrow().state().session.phase() == Phase::Loading
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

#[wasm_bindgen]
pub fn example_queries() -> js_sys::Array {
    EXAMPLE_QUERIES
        .iter()
        .map(|q| JsValue::from_str(q))
        .collect()
}

/// Mounts the page using the API URL baked in at build time.
#[wasm_bindgen]
pub fn mount() -> Result<GeoQueryApp, JsValue> {
    let config = ClientConfig::from_build_env().map_err(|e| JsValue::from_str(&e.to_string()))?;
    mount_with(config, DomIds::default())
}

#[wasm_bindgen]
pub fn mount_with_api_url(api_url: &str) -> Result<GeoQueryApp, JsValue> {
    let config =
        ClientConfig::with_base_url(api_url).map_err(|e| JsValue::from_str(&e.to_string()))?;
    mount_with(config, DomIds::default())
}

fn mount_with(config: ClientConfig, ids: DomIds) -> Result<GeoQueryApp, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let map = LeafletMap::mount(&ids.map, config.initial_viewport)?;
    let results = DomResults::mount(&document, &ids)?;
    let input = dom::required(&document, &ids.input)?.dyn_into::<HtmlInputElement>()?;
    let transport = Rc::new(FetchTransport::new(&config));

    web_sys::console::log_1(&JsValue::from_str(&format!(
        "geo query client using {}",
        config.query_url()
    )));

    let notices = QueuedNotifier::new();
    let mut page = PageController::new(config, map, results, notices.clone());
    page.mount();

    let app = App {
        page: Rc::new(RefCell::new(page)),
        transport,
        notices,
        input,
    };
    app.flush();
    wire_events(&document, &ids, &app)?;
    Ok(GeoQueryApp { app })
}

fn listen(
    target: &Element,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let cb = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref())?;
    // Listeners live as long as the page.
    cb.forget();
    Ok(())
}

fn wire_events(document: &Document, ids: &DomIds, app: &App) -> Result<(), JsValue> {
    let form = dom::required(document, &ids.form)?;
    let a = app.clone();
    listen(&form, "submit", move |ev| {
        ev.prevent_default();
        a.submit(&a.input.value());
    })?;

    // One delegated listener; rows are rebuilt on every render.
    let list = dom::required(document, &ids.list)?;
    let a = app.clone();
    listen(&list, "click", move |ev| {
        let index = ev
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| el.closest("[data-index]").ok().flatten())
            .and_then(|row| row.get_attribute("data-index"))
            .and_then(|v| v.parse::<usize>().ok());
        if let Some(index) = index {
            a.select_row(index);
        }
    })?;

    let header = dom::required(document, &ids.panel_header)?;
    let a = app.clone();
    listen(&header, "click", move |_| {
        a.toggle_panel();
    })?;

    let examples = dom::required(document, &ids.examples)?;
    for query in EXAMPLE_QUERIES {
        let button = document.create_element("button")?;
        button.set_attribute("type", "button")?;
        button.set_class_name("example-query");
        button.set_text_content(Some(query));
        examples.append_child(&button)?;

        let input = app.input.clone();
        listen(&button, "click", move |_| input.set_value(query))?;
    }
    Ok(())
}
