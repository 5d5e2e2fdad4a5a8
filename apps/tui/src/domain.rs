use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::ops::RangeInclusive;

/// Latitudes of the Cali service area.
pub const SERVICE_LAT: RangeInclusive<f64> = 3.0..=4.5;
/// Longitudes of the Cali service area.
pub const SERVICE_LON: RangeInclusive<f64> = -77.5..=-76.0;

/// Coarse success category the backend assigns to every project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Clasificacion {
    Exitoso,
    Moderado,
    Mejorable,
}

impl Clasificacion {
    pub const ALL: [Self; 3] = [Self::Exitoso, Self::Moderado, Self::Mejorable];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exitoso => "Exitoso",
            Self::Moderado => "Moderado",
            Self::Mejorable => "Mejorable",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "Exitoso" => Some(Self::Exitoso),
            "Moderado" => Some(Self::Moderado),
            "Mejorable" => Some(Self::Mejorable),
            _ => None,
        }
    }

    /// Plural label used by the statistics panel.
    pub const fn plural_label(self) -> &'static str {
        match self {
            Self::Exitoso => "Exitosos",
            Self::Moderado => "Moderados",
            Self::Mejorable => "Mejorables",
        }
    }

    pub const fn color_hex(self) -> &'static str {
        match self {
            Self::Exitoso => "#27AE60",
            Self::Moderado => "#F39C12",
            Self::Mejorable => "#E74C3C",
        }
    }

    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Exitoso => (0x27, 0xAE, 0x60),
            Self::Moderado => (0xF3, 0x9C, 0x12),
            Self::Mejorable => (0xE7, 0x4C, 0x3C),
        }
    }
}

/// One real-estate development as returned by `/api/proyectos`.
///
/// The backend is loose about types (numbers arrive as strings, `NaN`
/// becomes `null`), so every field is optional and parsed leniently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub codigo: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub nombre: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub clasificacion: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lon: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub barrio: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub zona: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub tipo_vis: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub estrato: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub patron_ventas: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub vende: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub precio_promedio: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub precio_formateado: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub area_promedio: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub velocidad_ventas: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub unidades_vendidas: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub unidades_disponibles: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub score_exito: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub color: Option<String>,
}

impl Project {
    /// Unknown or missing classifications are shown as `Moderado`.
    pub fn classification(&self) -> Clasificacion {
        self.clasificacion
            .as_deref()
            .and_then(Clasificacion::parse)
            .unwrap_or(Clasificacion::Moderado)
    }

    /// Coordinates usable for a map marker, as `(lat, lon)`.
    ///
    /// The backend reports unknown positions as `0`, so a zero on either axis
    /// disqualifies the project from the map (it stays in the table). Points
    /// must fall inside the service area; a pair that only fits once swapped
    /// was stored as `(lon, lat)` and is returned corrected.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let (lat, lon) = (self.lat?, self.lon?);
        if lat == 0.0 || lon == 0.0 {
            return None;
        }
        if in_service_area(lat, lon) {
            Some((lat, lon))
        } else if in_service_area(lon, lat) {
            Some((lon, lat))
        } else {
            None
        }
    }

    /// The server-provided popup color, or the classification color when
    /// the server sent none.
    pub fn display_color(&self) -> &str {
        self.color
            .as_deref()
            .map(str::trim)
            .filter(|color| !color.is_empty())
            .unwrap_or_else(|| self.classification().color_hex())
    }

    pub fn display_code(&self) -> &str {
        self.codigo.as_deref().unwrap_or("")
    }

    pub fn display_name(&self) -> &str {
        self.nombre.as_deref().unwrap_or("")
    }
}

fn in_service_area(lat: f64, lon: f64) -> bool {
    SERVICE_LAT.contains(&lat) && SERVICE_LON.contains(&lon)
}

/// A sortable project attribute. The first eleven make up the table header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortColumn {
    Codigo,
    Nombre,
    Clasificacion,
    Barrio,
    Zona,
    PrecioPromedio,
    AreaPromedio,
    VelocidadVentas,
    UnidadesVendidas,
    UnidadesDisponibles,
    ScoreExito,
    TipoVis,
    Estrato,
    PatronVentas,
    Vende,
}

impl SortColumn {
    /// Table columns in display order.
    pub const TABLE: [Self; 11] = [
        Self::Codigo,
        Self::Nombre,
        Self::Clasificacion,
        Self::Barrio,
        Self::Zona,
        Self::PrecioPromedio,
        Self::AreaPromedio,
        Self::VelocidadVentas,
        Self::UnidadesVendidas,
        Self::UnidadesDisponibles,
        Self::ScoreExito,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Self::Codigo => "codigo",
            Self::Nombre => "nombre",
            Self::Clasificacion => "clasificacion",
            Self::Barrio => "barrio",
            Self::Zona => "zona",
            Self::PrecioPromedio => "precio_promedio",
            Self::AreaPromedio => "area_promedio",
            Self::VelocidadVentas => "velocidad_ventas",
            Self::UnidadesVendidas => "unidades_vendidas",
            Self::UnidadesDisponibles => "unidades_disponibles",
            Self::ScoreExito => "score_exito",
            Self::TipoVis => "tipo_vis",
            Self::Estrato => "estrato",
            Self::PatronVentas => "patron_ventas",
            Self::Vende => "vende",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_lowercase();
        Self::TABLE
            .into_iter()
            .chain([Self::TipoVis, Self::Estrato, Self::PatronVentas, Self::Vende])
            .find(|column| column.key() == value)
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::TABLE.len() {
            Some(Self::TABLE[index])
        } else {
            None
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Codigo => "Código",
            Self::Nombre => "Nombre",
            Self::Clasificacion => "Clasificación",
            Self::Barrio => "Barrio",
            Self::Zona => "Zona",
            Self::PrecioPromedio => "Precio",
            Self::AreaPromedio => "Área m²",
            Self::VelocidadVentas => "Vel. ventas",
            Self::UnidadesVendidas => "Vendidas",
            Self::UnidadesDisponibles => "Disponibles",
            Self::ScoreExito => "Score",
            Self::TipoVis => "Tipo VIS",
            Self::Estrato => "Estrato",
            Self::PatronVentas => "Patrón ventas",
            Self::Vende => "Vende",
        }
    }

    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::PrecioPromedio
                | Self::AreaPromedio
                | Self::VelocidadVentas
                | Self::UnidadesVendidas
                | Self::UnidadesDisponibles
                | Self::ScoreExito
        )
    }

    pub fn text_value(self, project: &Project) -> Option<&str> {
        let value = match self {
            Self::Codigo => &project.codigo,
            Self::Nombre => &project.nombre,
            Self::Clasificacion => &project.clasificacion,
            Self::Barrio => &project.barrio,
            Self::Zona => &project.zona,
            Self::TipoVis => &project.tipo_vis,
            Self::Estrato => &project.estrato,
            Self::PatronVentas => &project.patron_ventas,
            Self::Vende => &project.vende,
            Self::PrecioPromedio
            | Self::AreaPromedio
            | Self::VelocidadVentas
            | Self::UnidadesVendidas
            | Self::UnidadesDisponibles
            | Self::ScoreExito => return None,
        };
        value.as_deref()
    }

    pub const fn numeric_value(self, project: &Project) -> Option<f64> {
        match self {
            Self::PrecioPromedio => project.precio_promedio,
            Self::AreaPromedio => project.area_promedio,
            Self::VelocidadVentas => project.velocidad_ventas,
            Self::UnidadesVendidas => project.unidades_vendidas,
            Self::UnidadesDisponibles => project.unidades_disponibles,
            Self::ScoreExito => project.score_exito,
            _ => None,
        }
    }
}

/// Option lists for the filter controls, from `/api/filtros`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    #[serde(default)]
    pub clasificaciones: Vec<String>,
    #[serde(default)]
    pub zonas: Vec<String>,
    #[serde(default)]
    pub barrios: Vec<String>,
    #[serde(default)]
    pub tipos_vis: Vec<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub precio_min: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub precio_max: Option<f64>,
}

/// Server-side aggregates for the current filters, from `/api/estadisticas`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub exitosos: u64,
    #[serde(default)]
    pub moderados: u64,
    #[serde(default)]
    pub mejorables: u64,
    #[serde(default, deserialize_with = "lenient_f64_or_zero")]
    pub score_promedio: f64,
}

impl Statistics {
    pub const fn count(&self, clasificacion: Clasificacion) -> u64 {
        match clasificacion {
            Clasificacion::Exitoso => self.exitosos,
            Clasificacion::Moderado => self.moderados,
            Clasificacion::Mejorable => self.mejorables,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn percent(&self, clasificacion: Clasificacion) -> Option<f64> {
        (self.total > 0).then(|| self.count(clasificacion) as f64 / self.total as f64 * 100.0)
    }
}

/// One seller in `/api/ranking-constructores`, ordered by the server by
/// successful projects and then `score_ranking`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstructorRank {
    #[serde(default, deserialize_with = "lenient_string")]
    pub vendedor: Option<String>,
    #[serde(default)]
    pub total_proyectos: u64,
    #[serde(default)]
    pub exitosos: u64,
    #[serde(default)]
    pub moderados: u64,
    #[serde(default)]
    pub mejorables: u64,
    #[serde(default, deserialize_with = "lenient_f64_or_zero")]
    pub score_promedio: f64,
    #[serde(default, deserialize_with = "lenient_f64_or_zero")]
    pub porcentaje_exitosos: f64,
    #[serde(default, deserialize_with = "lenient_f64_or_zero")]
    pub score_ranking: f64,
}

impl ConstructorRank {
    pub fn display_name(&self) -> &str {
        self.vendedor
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or("Vendedor Sin Nombre")
    }
}

/// Distribution of one metric over the successful projects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    #[serde(default, deserialize_with = "lenient_f64_or_zero")]
    pub promedio: f64,
    #[serde(default, deserialize_with = "lenient_f64_or_zero")]
    pub mediana: f64,
    #[serde(default, deserialize_with = "lenient_f64_or_zero")]
    pub min: f64,
    #[serde(default, deserialize_with = "lenient_f64_or_zero")]
    pub max: f64,
}

/// What successful projects have in common, from
/// `/api/caracteristicas-exitosos`. Metrics the server did not compute are
/// absent; unknown sections are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuccessProfile {
    #[serde(default)]
    pub velocidad_ventas: Option<MetricSummary>,
    #[serde(default)]
    pub meses_para_agotar: Option<MetricSummary>,
    #[serde(default)]
    pub porcentaje_vendido: Option<MetricSummary>,
    #[serde(default)]
    pub precio_promedio: Option<MetricSummary>,
    #[serde(default)]
    pub area_promedio: Option<MetricSummary>,
    #[serde(default)]
    pub precio_m2: Option<MetricSummary>,
    #[serde(default)]
    pub tamano_proyecto: Option<MetricSummary>,
}

/// Backend data-source report from `/api/diagnostico`, used to explain a
/// failed project load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    #[serde(default)]
    pub archivo_existe: bool,
    #[serde(default, deserialize_with = "lenient_string")]
    pub archivo_ruta: Option<String>,
    #[serde(default)]
    pub archivo_tamano: u64,
    #[serde(default)]
    pub df_data_vacio: bool,
    #[serde(default)]
    pub df_data_tamano: u64,
}

impl Diagnostics {
    pub fn lines(&self) -> Vec<String> {
        let yes_no = |flag: bool| if flag { "Sí" } else { "No" };
        #[allow(clippy::cast_precision_loss)]
        let megabytes = self.archivo_tamano as f64 / 1024.0 / 1024.0;
        vec![
            format!("Archivo existe: {}", yes_no(self.archivo_existe)),
            format!(
                "Ruta del archivo: {}",
                self.archivo_ruta.as_deref().unwrap_or("N/A")
            ),
            format!("Tamaño del archivo: {megabytes:.2} MB"),
            format!("Datos vacíos: {}", yes_no(self.df_data_vacio)),
            format!("Proyectos cargados: {}", self.df_data_tamano),
        ]
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    };
    Ok(parsed.filter(|value| value.is_finite()))
}

fn lenient_f64_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_f64(deserializer).map(Option::unwrap_or_default)
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_fields_are_parsed_leniently() -> Result<(), serde_json::Error> {
        let project: Project = serde_json::from_str(
            r#"{
                "codigo": 1042,
                "nombre": "Torres del Valle",
                "clasificacion": "Exitoso",
                "lat": "3.4516",
                "lon": -76.532,
                "precio_promedio": "abc",
                "score_exito": null,
                "unidades_vendidas": 12
            }"#,
        )?;

        assert_eq!(project.codigo.as_deref(), Some("1042"));
        assert_eq!(project.lat, Some(3.4516));
        assert_eq!(project.precio_promedio, None);
        assert_eq!(project.score_exito, None);
        assert_eq!(project.unidades_vendidas, Some(12.0));
        assert_eq!(project.barrio, None);
        Ok(())
    }

    #[test]
    fn unknown_classification_falls_back_to_moderado() {
        let mut project = Project {
            clasificacion: Some("Desconocido".to_string()),
            ..Project::default()
        };
        assert_eq!(project.classification(), Clasificacion::Moderado);

        project.clasificacion = Some(" Mejorable ".to_string());
        assert_eq!(project.classification(), Clasificacion::Mejorable);

        project.clasificacion = None;
        assert_eq!(project.classification(), Clasificacion::Moderado);
    }

    #[test]
    fn zero_or_missing_coordinates_are_not_mappable() {
        let mut project = Project {
            lat: Some(3.42),
            lon: Some(-76.53),
            ..Project::default()
        };
        assert_eq!(project.coordinates(), Some((3.42, -76.53)));

        project.lon = Some(0.0);
        assert_eq!(project.coordinates(), None);

        project.lon = None;
        assert_eq!(project.coordinates(), None);

        project.lat = Some(120.0);
        project.lon = Some(-76.53);
        assert_eq!(project.coordinates(), None);
    }

    #[test]
    fn swapped_coordinates_are_corrected_and_far_points_dropped() {
        let mut project = Project {
            lat: Some(-76.53),
            lon: Some(3.45),
            ..Project::default()
        };
        assert_eq!(project.coordinates(), Some((3.45, -76.53)));

        project.lat = Some(4.71);
        project.lon = Some(-74.07);
        assert_eq!(project.coordinates(), None);

        project.lat = Some(-33.9);
        project.lon = Some(151.2);
        assert_eq!(project.coordinates(), None);
    }

    #[test]
    fn server_color_wins_over_the_classification_color() {
        let mut project = Project {
            clasificacion: Some("Mejorable".to_string()),
            ..Project::default()
        };
        assert_eq!(project.display_color(), "#E74C3C");

        project.color = Some(" ".to_string());
        assert_eq!(project.display_color(), "#E74C3C");

        project.color = Some("#123456".to_string());
        assert_eq!(project.display_color(), "#123456");
    }

    #[test]
    fn ranking_and_profile_payloads_are_lenient() -> Result<(), serde_json::Error> {
        let rank: ConstructorRank = serde_json::from_str(
            r#"{"vendedor": 900123, "total_proyectos": 4, "exitosos": 3, "score_promedio": "0.71"}"#,
        )?;
        assert_eq!(rank.display_name(), "900123");
        assert!((rank.score_promedio - 0.71).abs() < f64::EPSILON);
        assert_eq!(ConstructorRank::default().display_name(), "Vendedor Sin Nombre");

        let profile: SuccessProfile = serde_json::from_str(
            r#"{"velocidad_ventas": {"promedio": 4.2, "mediana": 3.9, "min": 1, "max": 9},
                "amenidades": {"piscina": 12}}"#,
        )?;
        assert_eq!(profile.velocidad_ventas.map(|metric| metric.max), Some(9.0));
        assert_eq!(profile.area_promedio, None);
        Ok(())
    }

    #[test]
    fn sort_columns_round_trip_through_their_keys() {
        for column in SortColumn::TABLE {
            assert_eq!(SortColumn::parse(column.key()), Some(column));
        }
        assert_eq!(SortColumn::parse("VENDE"), Some(SortColumn::Vende));
        assert_eq!(SortColumn::parse("lat"), None);
        assert!(SortColumn::ScoreExito.is_numeric());
        assert!(!SortColumn::Barrio.is_numeric());
    }

    #[test]
    fn statistics_percentages_need_a_total() {
        let stats = Statistics {
            total: 4,
            exitosos: 1,
            moderados: 2,
            mejorables: 1,
            score_promedio: 0.5,
        };
        assert_eq!(stats.percent(Clasificacion::Moderado), Some(50.0));
        assert_eq!(Statistics::default().percent(Clasificacion::Exitoso), None);
    }
}
