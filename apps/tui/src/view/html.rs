use crate::app::dashboard::Dashboard;
use crate::domain::{ConstructorRank, SuccessProfile};
use crate::view::escape::escape_html;
use crate::view::map::{MapView, DEFAULT_CENTER, DEFAULT_ZOOM, FIT_PADDING, MAX_FIT_ZOOM};
use crate::view::profile::profile_entries;
use crate::view::stats::StatsView;
use crate::view::table::{TableView, EMPTY_PLACEHOLDER};
use std::fmt::Write;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const CLUSTER_CSS: [&str; 2] = [
    "https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.css",
    "https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.Default.css",
];
const CLUSTER_JS: &str = "https://unpkg.com/leaflet.markercluster@1.5.3/dist/leaflet.markercluster.js";

#[derive(serde::Serialize)]
struct MarkerData<'a> {
    lat: f64,
    lon: f64,
    color: &'a str,
    popup: String,
}

/// Standalone HTML report: statistics, a clustered Leaflet map, the project
/// table, the constructor ranking and the success profile. Every
/// server-provided string goes through [`escape_html`].
pub fn render_report(dashboard: &Dashboard) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"es\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>GeoMapVal</title>\n<link rel=\"stylesheet\" href=\"{LEAFLET_CSS}\">\n\
         <link rel=\"stylesheet\" href=\"{}\">\n<link rel=\"stylesheet\" href=\"{}\">\n\
         <style>body{{font-family:sans-serif;margin:1.5rem}}#map{{height:480px}}\
         table{{border-collapse:collapse;width:100%}}td,th{{border:1px solid #ddd;padding:4px}}\
         .badge{{color:#fff;padding:2px 6px;border-radius:4px}}</style>\n</head>\n<body>\n\
         <h1>GeoMapVal</h1>\n<p>{}</p>\n",
        CLUSTER_CSS[0],
        CLUSTER_CSS[1],
        escape_html(&dashboard.filters.summary())
    );

    write_stats(&mut html, &dashboard.stats);
    write_map(&mut html, &dashboard.map);
    write_table(&mut html, &dashboard.table);
    write_ranking(&mut html, &dashboard.ranking);
    write_profile(&mut html, dashboard.profile.as_ref());

    html.push_str("</body>\n</html>\n");
    html
}

fn write_stats(html: &mut String, view: &StatsView) {
    html.push_str("<section id=\"stats\">\n<h2>Estadísticas</h2>\n");
    let Some(stats) = view.stats() else {
        html.push_str("<p>Sin estadísticas disponibles</p>\n</section>\n");
        return;
    };

    let _ = writeln!(html, "<p>Total: <strong>{}</strong></p>", stats.total);
    for share in view.shares() {
        let _ = writeln!(
            html,
            "<p><span class=\"badge\" style=\"background:{}\">{}</span> {} ({:.1}%)</p>",
            share.clasificacion.color_hex(),
            share.clasificacion.plural_label(),
            share.count,
            share.percent
        );
    }
    let _ = writeln!(html, "<p>Score promedio: {}</p>", view.score_label());
    html.push_str("</section>\n");
}

fn write_map(html: &mut String, map: &MapView) {
    let markers: Vec<MarkerData<'_>> = map
        .markers()
        .iter()
        .map(|marker| MarkerData {
            lat: marker.lat,
            lon: marker.lon,
            color: marker.clasificacion.color_hex(),
            popup: marker.popup.to_html(),
        })
        .collect();
    // `<` is escaped so popup markup cannot close the script element.
    let data = serde_json::to_string(&markers)
        .unwrap_or_else(|_| "[]".to_string())
        .replace('<', "\\u003c");

    let _ = write!(
        html,
        "<section id=\"mapa\">\n<h2>Proyectos en el mapa ({count})</h2>\n<div id=\"map\"></div>\n\
         <script src=\"{LEAFLET_JS}\"></script>\n<script src=\"{CLUSTER_JS}\"></script>\n<script>\n\
         const markers = {data};\n\
         const map = L.map('map').setView([{lat}, {lon}], {zoom});\n\
         L.tileLayer('https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', \
         {{attribution: '&copy; OpenStreetMap'}}).addTo(map);\n\
         const cluster = L.markerClusterGroup();\n\
         cluster.addLayers(markers.map(m => L.circleMarker([m.lat, m.lon], \
         {{radius: 8, color: m.color, fillColor: m.color, fillOpacity: 0.8}}).bindPopup(m.popup)));\n\
         map.addLayer(cluster);\n\
         if (markers.length > 0) {{ map.fitBounds(cluster.getBounds().pad({padding}), {{maxZoom: {max_zoom}}}); }}\n\
         </script>\n</section>\n",
        count = map.count(),
        lat = DEFAULT_CENTER.0,
        lon = DEFAULT_CENTER.1,
        zoom = DEFAULT_ZOOM,
        padding = FIT_PADDING,
        max_zoom = MAX_FIT_ZOOM,
    );
}

fn write_table(html: &mut String, table: &TableView) {
    let _ = writeln!(
        html,
        "<section id=\"tabla\">\n<h2>Proyectos {}</h2>\n<table>\n<thead><tr>",
        table.count_label()
    );
    for label in table.header() {
        let _ = write!(html, "<th>{}</th>", escape_html(&label));
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    if table.is_placeholder() {
        let _ = writeln!(
            html,
            "<tr><td colspan=\"11\" class=\"empty\">{EMPTY_PLACEHOLDER}</td></tr>"
        );
    }
    for row in table.rows() {
        html.push_str("<tr>");
        for (index, cell) in row.cells().into_iter().enumerate() {
            if index == 2 {
                let _ = write!(
                    html,
                    "<td><span class=\"badge\" style=\"background:{}\">{}</span></td>",
                    row.clasificacion.color_hex(),
                    escape_html(cell)
                );
            } else {
                let _ = write!(html, "<td>{}</td>", escape_html(cell));
            }
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n</section>\n");
}

fn write_ranking(html: &mut String, ranking: &[ConstructorRank]) {
    html.push_str("<section id=\"ranking\">\n<h2>Ranking de constructores</h2>\n");
    if ranking.is_empty() {
        html.push_str("<p>No hay datos disponibles</p>\n</section>\n");
        return;
    }

    html.push_str(
        "<table>\n<thead><tr><th>#</th><th>Vendedor</th><th>Proyectos</th><th>Exitosos</th>\
         <th>Moderados</th><th>Mejorables</th><th>% Exitosos</th><th>Score promedio</th></tr></thead>\n<tbody>\n",
    );
    for (index, rank) in ranking.iter().enumerate() {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.1}%</td><td>{:.3}</td></tr>",
            index + 1,
            escape_html(rank.display_name()),
            rank.total_proyectos,
            rank.exitosos,
            rank.moderados,
            rank.mejorables,
            rank.porcentaje_exitosos,
            rank.score_promedio
        );
    }
    html.push_str("</tbody>\n</table>\n</section>\n");
}

fn write_profile(html: &mut String, profile: Option<&SuccessProfile>) {
    let entries = profile.map(profile_entries).unwrap_or_default();
    if entries.is_empty() {
        return;
    }

    html.push_str("<section id=\"perfil\">\n<h2>Características de proyectos exitosos</h2>\n");
    for entry in entries {
        let _ = writeln!(
            html,
            "<p><strong>{}</strong>: promedio {}, mediana {}, rango {}</p>",
            entry.title,
            escape_html(&entry.promedio),
            escape_html(&entry.mediana),
            escape_html(&entry.rango)
        );
    }
    html.push_str("</section>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::dashboard::Message;
    use crate::domain::Project;

    fn loaded(projects: Vec<Project>) -> Dashboard {
        let mut dashboard = Dashboard::new();
        dashboard.dispatch(Message::Reload);
        dashboard.dispatch(Message::ProjectsLoaded {
            request: dashboard.latest_request(),
            result: Ok(projects),
        });
        dashboard
    }

    #[test]
    fn empty_report_has_one_placeholder_row() {
        let html = render_report(&loaded(Vec::new()));

        assert_eq!(html.matches("colspan=\"11\"").count(), 1);
        assert!(html.contains("Proyectos (0)"));
        assert!(html.contains("Proyectos en el mapa (0)"));
        assert!(html.contains("Ranking de constructores</h2>\n<p>No hay datos disponibles"));
    }

    #[test]
    fn table_cells_and_popups_are_escaped() {
        let project = Project {
            codigo: Some("X&1".to_string()),
            nombre: Some("</script><b>Torre</b>".to_string()),
            lat: Some(3.4),
            lon: Some(-76.5),
            ..Project::default()
        };
        let mut dashboard = loaded(vec![project]);
        dashboard.filters.zona = Some("<Sur>".to_string());

        let html = render_report(&dashboard);

        assert!(html.contains("<td>X&amp;1</td>"));
        assert!(html.contains("&lt;/script&gt;&lt;b&gt;Torre"));
        assert!(!html.contains("</script><b>"));
        assert!(html.contains("Zona: &lt;Sur&gt;"));
    }

    #[test]
    fn markers_are_clustered_and_fit_with_ratio_padding() {
        let html = render_report(&loaded(vec![Project {
            codigo: Some("A".to_string()),
            lat: Some(3.4),
            lon: Some(-76.5),
            ..Project::default()
        }]));

        assert!(html.contains("leaflet.markercluster.js"));
        assert!(html.contains("MarkerCluster.Default.css"));
        assert!(html.contains("const cluster = L.markerClusterGroup();"));
        assert!(html.contains("cluster.addLayers(markers.map("));
        assert!(html.contains("map.fitBounds(cluster.getBounds().pad(0.1), {maxZoom: 15})"));
        assert!(!html.contains("featureGroup"));
        assert!(!html.contains("padding: ["));
    }

    #[test]
    fn ranking_rows_are_escaped() {
        let mut dashboard = loaded(Vec::new());
        dashboard.ranking = vec![ConstructorRank {
            vendedor: Some("<i>Constructora</i> & Cía".to_string()),
            total_proyectos: 4,
            exitosos: 3,
            porcentaje_exitosos: 75.0,
            score_promedio: 0.8125,
            ..ConstructorRank::default()
        }];

        let html = render_report(&dashboard);

        assert!(html.contains("<td>&lt;i&gt;Constructora&lt;/i&gt; &amp; Cía</td>"));
        assert!(html.contains("<td>75.0%</td>"));
    }
}
