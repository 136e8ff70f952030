use foundation::Viewport;
use protocol::GeoFeature;
use serde::Serialize;
use session::MapView;
use wasm_bindgen::prelude::*;

// Thin Leaflet binding. Expects the page shell to have loaded Leaflet (`L`).
#[wasm_bindgen(inline_js = "
const __geo_maps = new Map();

export function geo_map_init(containerId, lat, lon, zoom) {
    const map = L.map(containerId).setView([lat, lon], zoom);
    L.tileLayer('https://{s}.basemaps.cartocdn.com/rastertiles/voyager/{z}/{x}/{y}{r}.png', {
        attribution: '&copy; OpenStreetMap contributors &copy; CARTO',
    }).addTo(map);
    __geo_maps.set(containerId, { map, markers: L.layerGroup().addTo(map) });
}

export function geo_map_set_markers(containerId, markersJson) {
    const entry = __geo_maps.get(containerId);
    if (!entry) return;
    entry.markers.clearLayers();
    for (const m of JSON.parse(markersJson)) {
        const popup = document.createElement('div');
        const title = document.createElement('div');
        title.className = 'popup-title';
        title.textContent = m.title;
        popup.appendChild(title);
        for (const line of [m.city_line, m.type_line]) {
            const info = document.createElement('div');
            info.className = 'popup-info';
            info.textContent = line;
            popup.appendChild(info);
        }
        L.marker([m.lat, m.lon]).bindPopup(popup).addTo(entry.markers);
    }
}

export function geo_map_fly_to(containerId, lat, lon, zoom) {
    const entry = __geo_maps.get(containerId);
    if (entry) entry.map.flyTo([lat, lon], zoom);
}
")]
extern "C" {
    #[wasm_bindgen(catch)]
    fn geo_map_init(container_id: &str, lat: f64, lon: f64, zoom: u8) -> Result<(), JsValue>;

    fn geo_map_set_markers(container_id: &str, markers_json: &str);

    fn geo_map_fly_to(container_id: &str, lat: f64, lon: f64, zoom: u8);
}

#[derive(Debug, Serialize)]
struct MarkerDto {
    lat: f64,
    lon: f64,
    title: String,
    city_line: String,
    type_line: String,
}

impl From<&GeoFeature> for MarkerDto {
    fn from(f: &GeoFeature) -> Self {
        let popup = f.popup();
        Self {
            lat: f.position.lat_deg,
            lon: f.position.lon_deg,
            title: popup.title,
            city_line: popup.city_line,
            type_line: popup.type_line,
        }
    }
}

#[derive(Debug)]
pub struct LeafletMap {
    container_id: String,
}

impl LeafletMap {
    /// Creates the Leaflet map inside `container_id` at `initial`.
    pub fn mount(container_id: &str, initial: Viewport) -> Result<Self, JsValue> {
        geo_map_init(
            container_id,
            initial.center.lat_deg,
            initial.center.lon_deg,
            initial.zoom,
        )?;
        Ok(Self {
            container_id: container_id.to_string(),
        })
    }
}

impl MapView for LeafletMap {
    fn render(&mut self, features: &[GeoFeature]) {
        let markers: Vec<MarkerDto> = features.iter().map(MarkerDto::from).collect();
        match serde_json::to_string(&markers) {
            Ok(json) => geo_map_set_markers(&self.container_id, &json),
            Err(err) => web_sys::console::error_1(&JsValue::from_str(&format!(
                "marker serialization failed: {err}"
            ))),
        }
    }

    fn center_on(&mut self, _feature: &GeoFeature, viewport: Viewport) {
        geo_map_fly_to(
            &self.container_id,
            viewport.center.lat_deg,
            viewport.center.lon_deg,
            viewport.zoom,
        );
    }
}
