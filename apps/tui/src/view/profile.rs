use crate::domain::{MetricSummary, SuccessProfile};
use crate::view::table::format_currency;

/// One metric of the success profile, formatted with its unit.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ProfileEntry {
    pub title: &'static str,
    pub promedio: String,
    pub mediana: String,
    pub rango: String,
}

#[derive(Clone, Copy)]
enum Unit {
    Fixed(usize, &'static str),
    Currency,
}

impl Unit {
    fn format(self, value: f64) -> String {
        match self {
            Self::Fixed(decimals, "") => format!("{value:.decimals$}"),
            Self::Fixed(decimals, "%") => format!("{value:.decimals$}%"),
            Self::Fixed(decimals, suffix) => format!("{value:.decimals$} {suffix}"),
            Self::Currency => format_currency(Some(value)),
        }
    }
}

/// Metrics the server reported, in display order. Missing ones are skipped.
pub fn profile_entries(profile: &SuccessProfile) -> Vec<ProfileEntry> {
    let metrics: [(&'static str, Option<MetricSummary>, Unit); 7] = [
        (
            "Velocidad de ventas",
            profile.velocidad_ventas,
            Unit::Fixed(2, "unidades/mes"),
        ),
        ("Meses para agotar", profile.meses_para_agotar, Unit::Fixed(1, "meses")),
        ("Porcentaje vendido", profile.porcentaje_vendido, Unit::Fixed(1, "%")),
        ("Precio promedio", profile.precio_promedio, Unit::Currency),
        ("Área promedio", profile.area_promedio, Unit::Fixed(1, "m²")),
        ("Precio por m²", profile.precio_m2, Unit::Currency),
        ("Tamaño del proyecto", profile.tamano_proyecto, Unit::Fixed(0, "unidades")),
    ];

    metrics
        .into_iter()
        .filter_map(|(title, metric, unit)| {
            let metric = metric?;
            Some(ProfileEntry {
                title,
                promedio: unit.format(metric.promedio),
                mediana: unit.format(metric.mediana),
                rango: format!("{} - {}", unit.format(metric.min), unit.format(metric.max)),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_reported_metrics_are_listed_with_units() {
        let profile = SuccessProfile {
            porcentaje_vendido: Some(MetricSummary {
                promedio: 71.26,
                mediana: 70.0,
                min: 40.0,
                max: 98.5,
            }),
            precio_promedio: Some(MetricSummary {
                promedio: 210_000_000.0,
                mediana: 195_000_000.0,
                min: 90_000_000.0,
                max: 450_000_000.0,
            }),
            ..SuccessProfile::default()
        };

        let entries = profile_entries(&profile);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Porcentaje vendido");
        assert_eq!(entries[0].promedio, "71.3%");
        assert_eq!(entries[0].rango, "40.0% - 98.5%");
        assert_eq!(entries[1].mediana, "$195,000,000 COP");
        assert!(profile_entries(&SuccessProfile::default()).is_empty());
    }
}
