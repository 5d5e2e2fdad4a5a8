use crate::domain::{Clasificacion, Project};
use crate::view::escape::{escape_html, sanitize_terminal};
use crate::view::table::{format_units, price_label, text_or_na};

/// Cali, where the dataset lives.
pub const DEFAULT_CENTER: (f64, f64) = (3.4516, -76.5320);
pub const DEFAULT_ZOOM: f64 = 12.0;
pub const MAX_FIT_ZOOM: f64 = 15.0;
pub const FOCUS_ZOOM: f64 = 15.0;
pub const FIT_PADDING: f64 = 0.1;
pub const MARKER_TOLERANCE: f64 = 1e-4;
const MIN_ZOOM: f64 = 1.0;
const MAX_ZOOM: f64 = 18.0;

/// Popup contents for one marker.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Popup {
    pub title: String,
    pub clasificacion: Clasificacion,
    /// Header color, taken verbatim from the project.
    pub color: String,
    pub fields: Vec<(&'static str, String)>,
    pub street_view_url: String,
}

impl Popup {
    pub fn from_project(project: &Project, lat: f64, lon: f64) -> Self {
        let text = |value: &Option<String>| text_or_na(value.as_deref());
        let area = project
            .area_promedio
            .map_or_else(|| "N/A".to_string(), |area| format!("{area:.0} m²"));

        let fields = vec![
            ("Código", text(&project.codigo)),
            ("Clasificación", project.classification().as_str().to_string()),
            ("Barrio", text(&project.barrio)),
            ("Zona", text(&project.zona)),
            ("Estrato", text(&project.estrato)),
            ("Tipo VIS", text(&project.tipo_vis)),
            ("Vende", text(&project.vende)),
            ("Precio promedio", price_label(project)),
            ("Área promedio", area),
            (
                "Velocidad de ventas",
                format!("{:.1} und/mes", project.velocidad_ventas.unwrap_or(0.0)),
            ),
            ("Unidades vendidas", format_units(project.unidades_vendidas)),
            ("Unidades disponibles", format_units(project.unidades_disponibles)),
            ("Patrón de ventas", text(&project.patron_ventas)),
            ("Score de éxito", format!("{:.2}", project.score_exito.unwrap_or(0.0))),
        ];

        Self {
            title: project.display_name().to_string(),
            clasificacion: project.classification(),
            color: project.display_color().to_string(),
            fields,
            street_view_url: street_view_url(lat, lon),
        }
    }

    /// Popup text for the terminal, control characters stripped.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.fields.len() + 2);
        lines.push(sanitize_terminal(&self.title));
        lines.extend(
            self.fields
                .iter()
                .map(|(label, value)| format!("{label}: {}", sanitize_terminal(value))),
        );
        lines.push(format!("Street View: {}", self.street_view_url));
        lines
    }

    pub fn to_html(&self) -> String {
        let mut html = format!(
            "<div class=\"popup\"><h3 style=\"color: {}\">{}</h3>",
            escape_html(&self.color),
            escape_html(&self.title)
        );
        for (label, value) in &self.fields {
            html.push_str(&format!(
                "<p><strong>{}:</strong> {}</p>",
                escape_html(label),
                escape_html(value)
            ));
        }
        html.push_str(&format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener\">Ver en Street View</a></div>",
            escape_html(&self.street_view_url)
        ));
        html
    }
}

pub fn street_view_url(lat: f64, lon: f64) -> String {
    format!("https://www.google.com/maps?q=&layer=c&cbll={lat},{lon}")
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Marker {
    pub lat: f64,
    pub lon: f64,
    pub clasificacion: Clasificacion,
    pub popup: Popup,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn around<'a>(markers: impl IntoIterator<Item = &'a Marker>) -> Option<Self> {
        markers.into_iter().fold(None, |bounds, marker| {
            Some(match bounds {
                None => Self {
                    south: marker.lat,
                    west: marker.lon,
                    north: marker.lat,
                    east: marker.lon,
                },
                Some(bounds) => Self {
                    south: bounds.south.min(marker.lat),
                    west: bounds.west.min(marker.lon),
                    north: bounds.north.max(marker.lat),
                    east: bounds.east.max(marker.lon),
                },
            })
        })
    }

    /// Grows each side by `ratio` of the span.
    pub fn pad(self, ratio: f64) -> Self {
        let lat_pad = (self.north - self.south) * ratio;
        let lon_pad = (self.east - self.west) * ratio;
        Self {
            south: self.south - lat_pad,
            west: self.west - lon_pad,
            north: self.north + lat_pad,
            east: self.east + lon_pad,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.south + self.north) / 2.0, (self.west + self.east) / 2.0)
    }
}

/// Marker layer collaborator. Markers are replaced in batches so a refresh
/// never shows a half-built layer.
#[derive(Debug, Clone, Default)]
pub struct MarkerLayer {
    markers: Vec<Marker>,
}

impl MarkerLayer {
    pub fn clear_layers(&mut self) {
        self.markers.clear();
    }

    pub fn add_layers(&mut self, batch: Vec<Marker>) {
        self.markers.extend(batch);
    }

    pub fn layers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::around(&self.markers)
    }

    pub fn find_near(&self, lat: f64, lon: f64, tolerance: f64) -> Option<&Marker> {
        self.markers
            .iter()
            .find(|marker| (marker.lat - lat).abs() < tolerance && (marker.lon - lon).abs() < tolerance)
    }
}

/// Visible region. At zoom `z` the view spans `360 / 2^z` degrees of
/// longitude and half that of latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: (f64, f64),
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl Viewport {
    pub fn set_view(&mut self, center: (f64, f64), zoom: f64) {
        self.center = center;
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn zoom_by(&mut self, delta: f64) {
        self.zoom = (self.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Centers on `bounds` at the deepest whole zoom that still shows all of
    /// it, capped at `max_zoom`.
    pub fn fit(&mut self, bounds: Bounds, padding: f64, max_zoom: f64) {
        let padded = bounds.pad(padding);
        let lon_span = padded.east - padded.west;
        let lat_span = (padded.north - padded.south) * 2.0;
        let span = lon_span.max(lat_span);

        let zoom = if span > 0.0 {
            (360.0 / span).log2().floor().min(max_zoom)
        } else {
            max_zoom
        };
        self.set_view(padded.center(), zoom);
    }

    pub fn lon_span(&self) -> f64 {
        360.0 / self.zoom.exp2()
    }

    pub fn lat_span(&self) -> f64 {
        self.lon_span() / 2.0
    }

    /// `(west, east)` of the visible region.
    pub fn x_bounds(&self) -> [f64; 2] {
        let half = self.lon_span() / 2.0;
        [self.center.1 - half, self.center.1 + half]
    }

    /// `(south, north)` of the visible region.
    pub fn y_bounds(&self) -> [f64; 2] {
        let half = self.lat_span() / 2.0;
        [self.center.0 - half, self.center.0 + half]
    }
}

/// Map view model: marker layer, viewport and the open popup.
#[derive(Debug, Clone, Default)]
pub struct MapView {
    layer: MarkerLayer,
    viewport: Viewport,
    count: usize,
    last_fit: Option<Bounds>,
    popup: Option<Popup>,
}

impl MapView {
    /// Replaces every marker with one per mappable project and fits the
    /// viewport to them.
    pub fn render(&mut self, projects: &[Project]) {
        self.layer.clear_layers();
        self.popup = None;

        let batch: Vec<Marker> = projects
            .iter()
            .filter_map(|project| {
                let (lat, lon) = project.coordinates()?;
                Some(Marker {
                    lat,
                    lon,
                    clasificacion: project.classification(),
                    popup: Popup::from_project(project, lat, lon),
                })
            })
            .collect();
        let skipped = projects.len() - batch.len();
        self.layer.add_layers(batch);
        self.count = projects.len();

        if skipped > 0 {
            tracing::debug!(skipped, "projects without usable coordinates");
        }

        self.last_fit = None;
        self.fit_to_data();
    }

    /// Fits the viewport to the markers. No markers, no fit.
    pub fn fit_to_data(&mut self) -> bool {
        let Some(bounds) = self.layer.bounds() else {
            return false;
        };
        self.viewport.fit(bounds, FIT_PADDING, MAX_FIT_ZOOM);
        self.last_fit = Some(bounds);
        true
    }

    /// Centers on the project and opens its popup when its marker is found.
    pub fn focus(&mut self, project: &Project) -> bool {
        let Some((lat, lon)) = project.coordinates() else {
            return false;
        };
        let zoom = self.viewport.zoom.max(FOCUS_ZOOM);
        self.viewport.set_view((lat, lon), zoom);
        self.popup = self
            .layer
            .find_near(lat, lon, MARKER_TOLERANCE)
            .map(|marker| marker.popup.clone());
        self.popup.is_some()
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_by(1.0);
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_by(-1.0);
    }

    pub fn close_popup(&mut self) {
        self.popup = None;
    }

    pub const fn open_popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    pub fn markers(&self) -> &[Marker] {
        self.layer.layers()
    }

    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// "Mapped projects" count shown next to the map title.
    pub const fn count(&self) -> usize {
        self.count
    }

    pub const fn last_fit(&self) -> Option<Bounds> {
        self.last_fit
    }
}
