use session::{PanelSurface, ResultsListing, ResultsView};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element, HtmlButtonElement, HtmlInputElement};

/// Element ids the page shell must provide.
#[derive(Debug, Clone)]
pub struct DomIds {
    pub form: String,
    pub input: String,
    pub submit: String,
    pub examples: String,
    pub map: String,
    pub panel: String,
    pub panel_header: String,
    pub list: String,
    pub no_results: String,
}

impl Default for DomIds {
    fn default() -> Self {
        Self {
            form: "query-form".to_string(),
            input: "query-input".to_string(),
            submit: "query-submit".to_string(),
            examples: "query-examples".to_string(),
            map: "map".to_string(),
            panel: "results-panel".to_string(),
            panel_header: "results-header".to_string(),
            list: "results-list".to_string(),
            no_results: "no-results".to_string(),
        }
    }
}

pub fn required(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing element #{id}")))
}

fn set_hidden(el: &Element, hidden: bool) {
    let _ = if hidden {
        el.set_attribute("hidden", "")
    } else {
        el.remove_attribute("hidden")
    };
}

/// Results list, panel header, "no results" indicator and query form.
pub struct DomResults {
    document: Document,
    panel: Element,
    header: Element,
    list: Element,
    no_results: Element,
    input: HtmlInputElement,
    submit: HtmlButtonElement,
}

impl DomResults {
    pub fn mount(document: &Document, ids: &DomIds) -> Result<Self, JsValue> {
        Ok(Self {
            document: document.clone(),
            panel: required(document, &ids.panel)?,
            header: required(document, &ids.panel_header)?,
            list: required(document, &ids.list)?,
            no_results: required(document, &ids.no_results)?,
            input: required(document, &ids.input)?.dyn_into::<HtmlInputElement>()?,
            submit: required(document, &ids.submit)?.dyn_into::<HtmlButtonElement>()?,
        })
    }

    fn placeholder_row(&self) -> Result<Element, JsValue> {
        let row = self.document.create_element("div")?;
        row.set_class_name("result-row placeholder");
        for class in [
            "skeleton skeleton-icon",
            "skeleton skeleton-line",
            "skeleton skeleton-line short",
        ] {
            let bone = self.document.create_element("div")?;
            bone.set_class_name(class);
            row.append_child(&bone)?;
        }
        Ok(row)
    }

    fn draw(&self, listing: &ResultsListing) -> Result<(), JsValue> {
        self.list.set_inner_html("");
        match listing {
            ResultsListing::Loading { placeholder_rows } => {
                for _ in 0..*placeholder_rows {
                    let row = self.placeholder_row()?;
                    self.list.append_child(&row)?;
                }
            }
            ResultsListing::Rows(rows) => {
                for r in rows {
                    let row = self.document.create_element("div")?;
                    row.set_class_name(if r.selected {
                        "result-row selected"
                    } else {
                        "result-row"
                    });
                    row.set_attribute("data-index", &r.index.to_string())?;

                    let title = self.document.create_element("p")?;
                    title.set_class_name("result-title");
                    title.set_text_content(Some(&r.title));
                    row.append_child(&title)?;

                    let subtitle = self.document.create_element("p")?;
                    subtitle.set_class_name("result-subtitle");
                    subtitle.set_text_content(Some(&r.subtitle));
                    row.append_child(&subtitle)?;

                    self.list.append_child(&row)?;
                }
            }
        }
        Ok(())
    }
}

impl ResultsView for DomResults {
    fn render(&mut self, listing: &ResultsListing) {
        if let Err(err) = self.draw(listing) {
            web_sys::console::error_2(&JsValue::from_str("results render failed"), &err);
        }
    }

    fn show_surface(&mut self, surface: PanelSurface) {
        let loading = surface == PanelSurface::Loading;
        self.input.set_disabled(loading);
        self.submit.set_disabled(loading);

        let state = match surface {
            PanelSurface::Idle => "idle",
            PanelSurface::Loading => "loading",
            PanelSurface::NoResults => "empty",
            PanelSurface::Results { open: true, .. } => "open",
            PanelSurface::Results { open: false, .. } => "closed",
        };
        let _ = self.panel.set_attribute("data-state", state);

        // While loading the panel shows skeleton rows only; the header exists over results.
        match surface {
            PanelSurface::Idle | PanelSurface::NoResults => {
                set_hidden(&self.panel, true);
            }
            PanelSurface::Loading => {
                set_hidden(&self.panel, false);
                set_hidden(&self.header, true);
                set_hidden(&self.list, false);
            }
            PanelSurface::Results { open, .. } => {
                set_hidden(&self.panel, false);
                set_hidden(&self.header, false);
                set_hidden(&self.list, !open);
            }
        }

        set_hidden(&self.no_results, surface != PanelSurface::NoResults);
        if let Some(text) = surface.header_text() {
            let target = if surface == PanelSurface::NoResults {
                &self.no_results
            } else {
                &self.header
            };
            target.set_text_content(Some(&text));
        }
    }
}
