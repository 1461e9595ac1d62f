//! Serializes a [`Canvas`] into a self-contained Leaflet page.

use crate::map::{
    Canvas, FIT_MAX_ZOOM, FIT_PADDING, HOVER_OPACITY, HOVER_WEIGHT, MARKER_CLASS, MARKER_ICON,
    MARKER_SIZE, TILE_ATTRIBUTION, TILE_URL,
};

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

/// Renders the canvas as one HTML page: tile layer, taxi markers with
/// their popups, the dashed route path with hover restyling, and a
/// final guarded fitBounds over the markers.
pub fn render_page(canvas: &Canvas) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Redat Route Map</title>
<link rel="stylesheet" href="{LEAFLET_CSS}">
<style>
  html, body {{ height: 100%; margin: 0; }}
  #map-container {{ width: 100%; height: 100%; position: relative; z-index: 0; }}
  .{MARKER_CLASS} {{
    display: flex;
    align-items: center;
    justify-content: center;
    font-size: {MARKER_SIZE}px;
    background: none;
    border: none;
  }}
</style>
</head>
<body>
<div id="map-container"></div>
<script src="{LEAFLET_JS}"></script>
<script>
const map = L.map('map-container', {{
  center: [{center_lat}, {center_lng}],
  zoom: {zoom},
  layers: [
    L.tileLayer({tile_url}, {{
      attribution: {attribution}
    }})
  ]
}});

const bounds = L.latLngBounds([]);
{markers}{path}
if (bounds.isValid()) {{
  map.invalidateSize();
  map.fitBounds(bounds, {{
    padding: [{padding}, {padding}],
    maxZoom: {max_zoom}
  }});
}}
</script>
</body>
</html>
"#,
        center_lat = canvas.center.latitude,
        center_lng = canvas.center.longitude,
        zoom = canvas.zoom,
        tile_url = js(TILE_URL),
        attribution = js(TILE_ATTRIBUTION),
        markers = markers_js(canvas),
        path = path_js(canvas),
        padding = FIT_PADDING,
        max_zoom = FIT_MAX_ZOOM,
    )
}

fn markers_js(canvas: &Canvas) -> String {
    let mut out = String::new();
    for marker in &canvas.markers {
        let lat = marker.coordinate.latitude;
        let lng = marker.coordinate.longitude;
        out.push_str(&format!(
            "L.marker([{lat}, {lng}], {{\n  icon: L.divIcon({{\n    html: {icon},\n    className: {class},\n    iconSize: [{size}, {size}]\n  }})\n}}).bindPopup({popup}).addTo(map);\nbounds.extend([{lat}, {lng}]);\n",
            icon = js(MARKER_ICON),
            class = js(MARKER_CLASS),
            size = MARKER_SIZE,
            popup = js(&marker.popup),
        ));
    }
    out
}

fn path_js(canvas: &Canvas) -> String {
    let Some(path) = &canvas.path else {
        return String::new();
    };

    let points = path
        .points
        .iter()
        .map(|point| format!("[{}, {}]", point.latitude, point.longitude))
        .collect::<Vec<_>>()
        .join(", ");
    let style = &path.style;
    format!(
        "const route = L.polyline([{points}], {{\n  color: {color},\n  weight: {weight},\n  opacity: {opacity},\n  lineJoin: {line_join},\n  dashArray: {dash_array},\n  lineCap: {line_cap}\n}}).addTo(map);\nroute.on('mouseover', function () {{\n  route.setStyle({{ weight: {hover_weight}, opacity: {hover_opacity} }});\n}});\nroute.on('mouseout', function () {{\n  route.setStyle({{ weight: {weight}, opacity: {opacity} }});\n}});\n",
        color = js(style.color),
        weight = style.weight,
        opacity = style.opacity,
        line_join = js(style.line_join),
        dash_array = js(style.dash_array),
        line_cap = js(style.line_cap),
        hover_weight = HOVER_WEIGHT,
        hover_opacity = HOVER_OPACITY,
    )
}

/// Escapes a string into a JS string literal. `<` becomes `\u003c` so a
/// `</script>` inside a name cannot terminate the inline script element.
fn js(value: &str) -> String {
    serde_json::to_string(value)
        .unwrap_or_default()
        .replace('<', "\\u003c")
}
