use crate::app::collection::{ProjectCollection, SortState};
use crate::domain::{Clasificacion, Project, SortColumn};

pub const EMPTY_PLACEHOLDER: &str = "No hay proyectos que coincidan con los filtros";

/// One formatted table row. Text is left raw; each output medium escapes
/// it on the way out.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TableRow {
    pub codigo: String,
    pub nombre: String,
    pub clasificacion: Clasificacion,
    pub barrio: String,
    pub zona: String,
    pub precio: String,
    pub area: String,
    pub velocidad: String,
    pub vendidas: String,
    pub disponibles: String,
    pub score: String,
}

impl TableRow {
    pub fn from_project(project: &Project) -> Self {
        Self {
            codigo: project.display_code().to_string(),
            nombre: project.display_name().to_string(),
            clasificacion: project.classification(),
            barrio: text_or_na(project.barrio.as_deref()),
            zona: text_or_na(project.zona.as_deref()),
            precio: price_label(project),
            area: format_area(project.area_promedio),
            velocidad: format!("{:.1}", project.velocidad_ventas.unwrap_or(0.0)),
            vendidas: format_units(project.unidades_vendidas),
            disponibles: format_units(project.unidades_disponibles),
            score: format!("{:.2}", project.score_exito.unwrap_or(0.0)),
        }
    }

    /// Cells in [`SortColumn::TABLE`] order.
    pub fn cells(&self) -> [&str; 11] {
        [
            &self.codigo,
            &self.nombre,
            self.clasificacion.as_str(),
            &self.barrio,
            &self.zona,
            &self.precio,
            &self.area,
            &self.velocidad,
            &self.vendidas,
            &self.disponibles,
            &self.score,
        ]
    }
}

pub fn text_or_na(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => "N/A".to_string(),
    }
}

/// The server's `precio_formateado` unless blank, else [`format_currency`].
pub fn price_label(project: &Project) -> String {
    project
        .precio_formateado
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map_or_else(|| format_currency(project.precio_promedio), str::to_string)
}

/// `$1,234,567 COP`, the format the backend uses for `precio_formateado`.
pub fn format_currency(value: Option<f64>) -> String {
    let Some(value) = value.filter(|value| value.is_finite()) else {
        return "N/A".to_string();
    };

    #[allow(clippy::cast_possible_truncation)]
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded < 0 { "-" } else { "" };
    format!("{sign}${grouped} COP")
}

/// Zero counts as missing.
fn format_area(value: Option<f64>) -> String {
    match value {
        Some(area) if area != 0.0 => format!("{area:.0}"),
        _ => "N/A".to_string(),
    }
}

/// Printed as reported: `40`, `2.5`.
pub fn format_units(value: Option<f64>) -> String {
    value.unwrap_or(0.0).to_string()
}

/// Table view model: rows in effective order, header indicators and the
/// single highlighted row.
#[derive(Debug, Clone, Default)]
pub struct TableView {
    rows: Vec<TableRow>,
    sort: SortState,
    selected: Option<usize>,
}

impl TableView {
    /// Rebuilds the rows from the collection's effective order and drops the
    /// highlight.
    pub fn render(&mut self, collection: &ProjectCollection) {
        self.rows = collection
            .effective()
            .into_iter()
            .map(TableRow::from_project)
            .collect();
        self.sort = collection.sort_state();
        self.selected = None;
    }

    /// Highlights `row`, replacing any previous highlight.
    pub fn select(&mut self, row: usize) -> bool {
        if row < self.rows.len() {
            self.selected = Some(row);
            true
        } else {
            false
        }
    }

    pub const fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn is_placeholder(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn count_label(&self) -> String {
        format!("({})", self.rows.len())
    }

    /// Header labels with the active sort arrow.
    pub fn header(&self) -> Vec<String> {
        SortColumn::TABLE
            .into_iter()
            .map(|column| match self.sort.indicator(column) {
                Some(direction) => format!("{} {}", column.label(), direction.arrow()),
                None => column.label().to_string(),
            })
            .collect()
    }

    pub const fn sort_state(&self) -> SortState {
        self.sort
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_metrics_use_their_defaults() {
        let row = TableRow::from_project(&Project {
            codigo: Some("P-1".to_string()),
            area_promedio: Some(0.0),
            ..Project::default()
        });

        assert_eq!(row.area, "N/A");
        assert_eq!(row.velocidad, "0.0");
        assert_eq!(row.vendidas, "0");
        assert_eq!(row.disponibles, "0");
        assert_eq!(row.score, "0.00");
        assert_eq!(row.precio, "N/A");
        assert_eq!(row.clasificacion, Clasificacion::Moderado);
    }

    #[test]
    fn metrics_are_formatted_with_fixed_precision() {
        let row = TableRow::from_project(&Project {
            area_promedio: Some(62.4),
            velocidad_ventas: Some(3.456),
            unidades_vendidas: Some(40.0),
            score_exito: Some(0.8149),
            precio_promedio: Some(245_500_000.4),
            ..Project::default()
        });

        assert_eq!(row.area, "62");
        assert_eq!(row.velocidad, "3.5");
        assert_eq!(row.vendidas, "40");
        assert_eq!(row.score, "0.81");
        assert_eq!(row.precio, "$245,500,000 COP");
    }

    #[test]
    fn fractional_unit_counts_are_not_truncated() {
        let row = TableRow::from_project(&Project {
            unidades_vendidas: Some(2.5),
            unidades_disponibles: Some(7.0),
            ..Project::default()
        });

        assert_eq!(row.vendidas, "2.5");
        assert_eq!(row.disponibles, "7");
    }

    #[test]
    fn server_formatted_price_wins() {
        let row = TableRow::from_project(&Project {
            precio_promedio: Some(1.0),
            precio_formateado: Some("$1 COP".to_string()),
            ..Project::default()
        });
        assert_eq!(row.precio, "$1 COP");

        let blank = Project {
            precio_promedio: Some(1500.0),
            precio_formateado: Some("  ".to_string()),
            ..Project::default()
        };
        assert_eq!(price_label(&blank), "$1,500 COP");
        assert_eq!(format_currency(Some(999.0)), "$999 COP");
        assert_eq!(format_currency(Some(1000.0)), "$1,000 COP");
    }

    #[test]
    fn empty_collection_renders_the_placeholder() {
        let mut view = TableView::default();
        view.render(&ProjectCollection::default());

        assert!(view.is_placeholder());
        assert_eq!(view.count_label(), "(0)");
        assert!(!view.select(0));
    }

    #[test]
    fn header_marks_the_active_sort_column() {
        let mut collection = ProjectCollection::new(vec![Project::default()]);
        collection.sort_by(SortColumn::ScoreExito);
        collection.sort_by(SortColumn::ScoreExito);

        let mut view = TableView::default();
        view.render(&collection);
        let header = view.header();

        assert_eq!(header.len(), 11);
        assert!(header[10].ends_with('▼'));
        assert!(!header[0].contains('▲'));
    }

    #[test]
    fn rendering_clears_the_highlight() {
        let collection = ProjectCollection::new(vec![Project::default(), Project::default()]);
        let mut view = TableView::default();
        view.render(&collection);

        assert!(view.select(1));
        assert!(view.select(0));
        assert_eq!(view.selected(), Some(0));

        view.render(&collection);
        assert_eq!(view.selected(), None);
    }
}
