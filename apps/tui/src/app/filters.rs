use crate::domain::FilterOptions;
use reqwest::Url;
use serde::Serialize;

/// One of the query constraints the dashboard can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Clasificacion,
    Zona,
    Barrio,
    TipoVis,
    /// Active (units left), inactive (sold out) or both.
    Estado,
    PrecioMin,
    PrecioMax,
    /// Seller, usually picked from the constructor ranking.
    Vende,
}

/// Values of [`FilterField::Estado`]; the server defaults to the first.
pub const ESTADOS: [&str; 3] = ["Activos", "Inactivos", "Todos"];

impl FilterField {
    /// Query-string order.
    pub const ALL: [Self; 8] = [
        Self::Clasificacion,
        Self::Zona,
        Self::Barrio,
        Self::TipoVis,
        Self::Estado,
        Self::PrecioMin,
        Self::PrecioMax,
        Self::Vende,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Self::Clasificacion => "clasificacion",
            Self::Zona => "zona",
            Self::Barrio => "barrio",
            Self::TipoVis => "tipo_vis",
            Self::Estado => "estado",
            Self::PrecioMin => "precio_min",
            Self::PrecioMax => "precio_max",
            Self::Vende => "vende",
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::ALL.len() {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Clasificacion => "Clasificación",
            Self::Zona => "Zona",
            Self::Barrio => "Barrio",
            Self::TipoVis => "Tipo VIS",
            Self::Estado => "Estado",
            Self::PrecioMin => "Precio mín.",
            Self::PrecioMax => "Precio máx.",
            Self::Vende => "Vende",
        }
    }

    /// The "no filter" value of a categorical field. Price fields have none.
    pub const fn sentinel(self) -> Option<&'static str> {
        match self {
            Self::Clasificacion | Self::Barrio | Self::TipoVis | Self::Estado | Self::Vende => {
                Some("Todos")
            }
            Self::Zona => Some("Todas"),
            Self::PrecioMin | Self::PrecioMax => None,
        }
    }

    /// Value a fresh or reset filter state holds. `vende` starts unset so it
    /// is left out of the query.
    pub const fn initial(self) -> Option<&'static str> {
        match self {
            Self::Estado => Some(ESTADOS[0]),
            Self::Vende | Self::PrecioMin | Self::PrecioMax => None,
            Self::Clasificacion | Self::Zona | Self::Barrio | Self::TipoVis => self.sentinel(),
        }
    }

    /// Whether `value` leaves this field without effect beyond the defaults.
    fn is_inactive(self, value: Option<&str>) -> bool {
        match value {
            None | Some("") => true,
            Some(value) => {
                Some(value) == self.initial()
                    || (self.initial().is_none() && Some(value) == self.sentinel())
            }
        }
    }

    pub const fn is_price(self) -> bool {
        matches!(self, Self::PrecioMin | Self::PrecioMax)
    }

    /// Selectable values for a categorical field: the sentinel first, then
    /// whatever `/api/filtros` reported (or the ranked sellers for `vende`).
    pub fn choices(self, options: &FilterOptions, sellers: &[String]) -> Vec<String> {
        let listed: &[String] = match self {
            Self::Clasificacion => &options.clasificaciones,
            Self::Zona => &options.zonas,
            Self::Barrio => &options.barrios,
            Self::TipoVis => &options.tipos_vis,
            Self::Vende => sellers,
            Self::Estado => return ESTADOS.iter().map(|estado| (*estado).to_string()).collect(),
            Self::PrecioMin | Self::PrecioMax => return Vec::new(),
        };

        self.sentinel()
            .map(str::to_string)
            .into_iter()
            .chain(listed.iter().cloned())
            .collect()
    }
}

/// Currently selected filter values.
///
/// Fields start at [`FilterField::initial`]. Values are
/// only changed through orchestrator messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub clasificacion: Option<String>,
    pub zona: Option<String>,
    pub barrio: Option<String>,
    pub tipo_vis: Option<String>,
    pub estado: Option<String>,
    pub precio_min: Option<String>,
    pub precio_max: Option<String>,
    pub vende: Option<String>,
}

impl Default for FilterState {
    fn default() -> Self {
        let initial = |field: FilterField| field.initial().map(str::to_string);
        Self {
            clasificacion: initial(FilterField::Clasificacion),
            zona: initial(FilterField::Zona),
            barrio: initial(FilterField::Barrio),
            tipo_vis: initial(FilterField::TipoVis),
            estado: initial(FilterField::Estado),
            precio_min: None,
            precio_max: None,
            vende: None,
        }
    }
}

impl FilterState {
    pub fn get(&self, field: FilterField) -> Option<&str> {
        match field {
            FilterField::Clasificacion => self.clasificacion.as_deref(),
            FilterField::Zona => self.zona.as_deref(),
            FilterField::Barrio => self.barrio.as_deref(),
            FilterField::TipoVis => self.tipo_vis.as_deref(),
            FilterField::Estado => self.estado.as_deref(),
            FilterField::PrecioMin => self.precio_min.as_deref(),
            FilterField::PrecioMax => self.precio_max.as_deref(),
            FilterField::Vende => self.vende.as_deref(),
        }
    }

    pub fn set(&mut self, field: FilterField, value: Option<String>) {
        let slot = match field {
            FilterField::Clasificacion => &mut self.clasificacion,
            FilterField::Zona => &mut self.zona,
            FilterField::Barrio => &mut self.barrio,
            FilterField::TipoVis => &mut self.tipo_vis,
            FilterField::Estado => &mut self.estado,
            FilterField::PrecioMin => &mut self.precio_min,
            FilterField::PrecioMax => &mut self.precio_max,
            FilterField::Vende => &mut self.vende,
        };
        *slot = value;
    }

    /// Query parameters in [`FilterField::ALL`] order.
    ///
    /// Null and empty values are omitted. Sentinels are sent verbatim; the
    /// backend treats them as "no filter".
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        FilterField::ALL
            .into_iter()
            .filter_map(|field| {
                self.get(field)
                    .filter(|value| !value.is_empty())
                    .map(|value| (field.key(), value.to_string()))
            })
            .collect()
    }

    /// Appends the query parameters to `url`, leaving it untouched when there
    /// are none.
    pub fn apply_to(&self, url: &mut Url) {
        let pairs = self.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
    }

    /// Fields narrowing the result beyond the initial state.
    pub fn active_fields(&self) -> Vec<FilterField> {
        FilterField::ALL
            .into_iter()
            .filter(|field| !field.is_inactive(self.get(*field)))
            .collect()
    }

    /// Server-side `estado` for the constructor ranking.
    pub fn estado(&self) -> &str {
        self.estado.as_deref().unwrap_or(ESTADOS[0])
    }

    pub fn summary(&self) -> String {
        let active = self.active_fields();
        if active.is_empty() {
            return "Sin filtros".to_string();
        }

        active
            .into_iter()
            .map(|field| format!("{}: {}", field.label(), self.get(field).unwrap_or_default()))
            .collect::<Vec<_>>()
            .join(" · ")
    }
}

/// Normalizes a typed price: digits only, empty means "unset".
pub fn normalize_price(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite() && *value >= 0.0)?;
    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_and_empty_filters_are_omitted_but_sentinels_are_sent() -> Result<(), Box<dyn std::error::Error>> {
        let filters = FilterState {
            clasificacion: Some("Todos".to_string()),
            zona: None,
            barrio: Some(String::new()),
            tipo_vis: None,
            estado: None,
            precio_min: None,
            precio_max: Some("500000".to_string()),
            vende: None,
        };

        let mut url = Url::parse("http://127.0.0.1:5000/api/proyectos")?;
        filters.apply_to(&mut url);

        assert_eq!(url.query(), Some("clasificacion=Todos&precio_max=500000"));
        Ok(())
    }

    #[test]
    fn empty_filter_state_leaves_url_without_query() -> Result<(), Box<dyn std::error::Error>> {
        let filters = FilterState {
            clasificacion: None,
            zona: None,
            barrio: None,
            tipo_vis: None,
            estado: None,
            precio_min: None,
            precio_max: None,
            vende: None,
        };

        let mut url = Url::parse("http://127.0.0.1:5000/api/estadisticas")?;
        filters.apply_to(&mut url);

        assert_eq!(url.as_str(), "http://127.0.0.1:5000/api/estadisticas");
        Ok(())
    }

    #[test]
    fn default_state_sends_every_sentinel_in_order() {
        let pairs = FilterState::default().query_pairs();
        let keys: Vec<_> = pairs.iter().map(|(key, _)| *key).collect();

        assert_eq!(keys, ["clasificacion", "zona", "barrio", "tipo_vis", "estado"]);
        assert_eq!(pairs[1].1, "Todas");
        assert_eq!(pairs[4].1, "Activos");
        assert!(FilterState::default().active_fields().is_empty());
    }

    #[test]
    fn choices_put_the_sentinel_first() {
        let options = FilterOptions {
            zonas: vec!["Norte".to_string(), "Sur".to_string()],
            ..FilterOptions::default()
        };

        assert_eq!(FilterField::Zona.choices(&options, &[]), ["Todas", "Norte", "Sur"]);
        assert!(FilterField::PrecioMax.choices(&options, &[]).is_empty());
        assert_eq!(FilterField::Estado.choices(&options, &[]), ESTADOS);
        assert_eq!(
            FilterField::Vende.choices(&options, &["Constructora A".to_string()]),
            ["Todos", "Constructora A"]
        );
    }

    #[test]
    fn price_input_is_validated() {
        assert_eq!(normalize_price(" 250000 "), Some("250000".to_string()));
        assert_eq!(normalize_price(""), None);
        assert_eq!(normalize_price("abc"), None);
        assert_eq!(normalize_price("-5"), None);
    }

    #[test]
    fn summary_lists_only_active_filters() {
        let mut filters = FilterState::default();
        assert_eq!(filters.summary(), "Sin filtros");

        filters.set(FilterField::Zona, Some("Sur".to_string()));
        filters.set(FilterField::PrecioMin, Some("100".to_string()));
        assert_eq!(filters.summary(), "Zona: Sur · Precio mín.: 100");
    }

    #[test]
    fn estado_and_vende_join_the_query_in_order() {
        let mut filters = FilterState::default();
        filters.set(FilterField::Estado, Some("Todos".to_string()));
        filters.set(FilterField::PrecioMax, Some("900".to_string()));
        filters.set(FilterField::Vende, Some("Constructora A".to_string()));

        let keys: Vec<_> = filters.query_pairs().into_iter().map(|(key, _)| key).collect();

        assert_eq!(
            keys,
            ["clasificacion", "zona", "barrio", "tipo_vis", "estado", "precio_max", "vende"]
        );
        assert_eq!(
            filters.active_fields(),
            [FilterField::Estado, FilterField::PrecioMax, FilterField::Vende]
        );
        assert_eq!(filters.estado(), "Todos");

        filters.set(FilterField::Vende, Some("Todos".to_string()));
        assert!(!filters.active_fields().contains(&FilterField::Vende));
    }
}
