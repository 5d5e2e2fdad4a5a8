use crate::app::collection::SortDirection;
use crate::app::filters::{normalize_price, FilterField, FilterState, ESTADOS};
use crate::domain::SortColumn;
use clap::builder::PossibleValuesParser;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "geomapval", version, about = "GeoMapVal real-estate project dashboard")]
pub struct CliArgs {
    /// Load once, print a report and exit
    #[arg(long)]
    pub headless: bool,

    /// Print the headless report as JSON
    #[arg(long)]
    pub json: bool,

    /// Write the headless report as an HTML page
    #[arg(long, value_name = "PATH")]
    pub html: Option<PathBuf>,

    /// Also download the CSV export in headless mode
    #[arg(long)]
    pub export: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override the backend base URL
    #[arg(long = "api-url", value_name = "URL")]
    pub api_url: Option<String>,

    /// Override the CSV export directory
    #[arg(long = "export-dir", value_name = "PATH")]
    pub export_dir: Option<String>,

    /// Override the log file
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<String>,

    #[arg(long, value_name = "VALUE")]
    pub clasificacion: Option<String>,

    #[arg(long, value_name = "VALUE")]
    pub zona: Option<String>,

    #[arg(long, value_name = "VALUE")]
    pub barrio: Option<String>,

    #[arg(long = "tipo-vis", value_name = "VALUE")]
    pub tipo_vis: Option<String>,

    /// Active (units left), inactive (sold out) or all projects
    #[arg(long, value_name = "ESTADO", value_parser = PossibleValuesParser::new(ESTADOS))]
    pub estado: Option<String>,

    /// Only projects sold by this seller
    #[arg(long, value_name = "SELLER")]
    pub vende: Option<String>,

    #[arg(long = "precio-min", value_name = "COP", value_parser = parse_price)]
    pub precio_min: Option<String>,

    #[arg(long = "precio-max", value_name = "COP", value_parser = parse_price)]
    pub precio_max: Option<String>,

    /// Sort the headless table by this column (e.g. score_exito)
    #[arg(long, value_name = "COLUMN", value_parser = parse_sort_column)]
    pub sort: Option<SortColumn>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(url) = &self.api_url {
            std::env::set_var("GEOMAPVAL_API_URL", url);
        }
        if let Some(dir) = &self.export_dir {
            std::env::set_var("GEOMAPVAL_EXPORT_DIR", dir);
        }
        if let Some(path) = &self.log_file {
            std::env::set_var("GEOMAPVAL_LOG_FILE", path);
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }

    /// Starting filters: sentinels unless overridden on the command line.
    pub fn filters(&self) -> FilterState {
        let mut filters = FilterState::default();
        let overrides = [
            (FilterField::Clasificacion, &self.clasificacion),
            (FilterField::Zona, &self.zona),
            (FilterField::Barrio, &self.barrio),
            (FilterField::TipoVis, &self.tipo_vis),
            (FilterField::Estado, &self.estado),
            (FilterField::PrecioMin, &self.precio_min),
            (FilterField::PrecioMax, &self.precio_max),
            (FilterField::Vende, &self.vende),
        ];
        for (field, value) in overrides {
            if let Some(value) = value {
                filters.set(field, Some(value.clone()));
            }
        }
        filters
    }

    pub fn sort(&self) -> Option<(SortColumn, SortDirection)> {
        let direction = if self.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        self.sort.map(|column| (column, direction))
    }
}

fn parse_sort_column(value: &str) -> Result<SortColumn, String> {
    SortColumn::parse(value).ok_or_else(|| format!("unknown column: {value}"))
}

fn parse_price(value: &str) -> Result<String, String> {
    normalize_price(value).ok_or_else(|| format!("invalid price: {value}"))
}
