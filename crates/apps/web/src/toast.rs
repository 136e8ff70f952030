use session::{Notification, Notifier};
use wasm_bindgen::prelude::*;

// Presentation is left to the page shell: it listens for `geo-toast` events.
#[wasm_bindgen(inline_js = "
export function geo_toast(kind, title, description) {
    window.dispatchEvent(new CustomEvent('geo-toast', { detail: { kind, title, description } }));
}
")]
extern "C" {
    fn geo_toast(kind: &str, title: &str, description: &str);
}

#[derive(Debug, Default)]
pub struct ToastNotifier;

impl Notifier for ToastNotifier {
    fn notify(&mut self, notification: &Notification) {
        let kind = if notification.is_error() {
            "error"
        } else {
            "success"
        };
        let description = notification.description();
        web_sys::console::log_1(&JsValue::from_str(&format!(
            "{}: {description}",
            notification.title()
        )));
        geo_toast(kind, notification.title(), &description);
    }
}
