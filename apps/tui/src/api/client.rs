use super::{ApiError, DashboardApi};
use crate::app::filters::FilterState;
use crate::config::AppConfig;
use crate::domain::{ConstructorRank, Diagnostics, FilterOptions, Project, Statistics, SuccessProfile};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

// Relative so a base URL with a path prefix keeps it.
const FILTERS_PATH: &str = "api/filtros";
const PROJECTS_PATH: &str = "api/proyectos";
const STATISTICS_PATH: &str = "api/estadisticas";
const EXPORT_PATH: &str = "api/descargar";
const CHAT_PATH: &str = "api/chat";
const RANKING_PATH: &str = "api/ranking-constructores";
const PROFILE_PATH: &str = "api/caracteristicas-exitosos";
const DIAGNOSTICS_PATH: &str = "api/diagnostico";

/// `{success, error?, ...payload}` wrapper every JSON endpoint uses.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(flatten)]
    payload: T,
}

#[derive(Debug, Default, Deserialize)]
struct ProjectsPayload {
    #[serde(default)]
    proyectos: Vec<Project>,
}

#[derive(Debug, Default, Deserialize)]
struct RankingPayload {
    #[serde(default)]
    ranking: Vec<ConstructorRank>,
}

#[derive(Debug, Default, Deserialize)]
struct ProfilePayload {
    #[serde(default)]
    caracteristicas: SuccessProfile,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// reqwest-backed client for the dashboard backend.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpApiClient {
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            base_url: config.api_url.clone(),
            client,
        })
    }

    fn endpoint(&self, path: &str, filters: Option<&FilterState>) -> Result<Url, ApiError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        if let Some(filters) = filters {
            filters.apply_to(&mut url);
        }
        Ok(url)
    }

    async fn get_text(&self, url: Url) -> Result<(u16, String), ApiError> {
        tracing::debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        Ok((status, response.text().await?))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let (status, body) = self.get_text(url).await?;
        parse_envelope(status, &body)
    }
}

impl DashboardApi for HttpApiClient {
    async fn fetch_filter_options(&self) -> Result<FilterOptions, ApiError> {
        let url = self.endpoint(FILTERS_PATH, None)?;
        self.get_json(url).await
    }

    async fn fetch_projects(&self, filters: &FilterState) -> Result<Vec<Project>, ApiError> {
        let url = self.endpoint(PROJECTS_PATH, Some(filters))?;
        let payload: ProjectsPayload = self.get_json(url).await?;
        Ok(payload.proyectos)
    }

    async fn fetch_statistics(&self, filters: &FilterState) -> Result<Statistics, ApiError> {
        let url = self.endpoint(STATISTICS_PATH, Some(filters))?;
        self.get_json(url).await
    }

    async fn fetch_csv(&self, filters: &FilterState) -> Result<Vec<u8>, ApiError> {
        let url = self.csv_export_url(filters)?;
        tracing::debug!(%url, "GET csv");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status.as_u16(), &body));
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn fetch_ranking(&self, estado: &str) -> Result<Vec<ConstructorRank>, ApiError> {
        let mut url = self.endpoint(RANKING_PATH, None)?;
        url.query_pairs_mut().append_pair("estado", estado);
        let payload: RankingPayload = self.get_json(url).await?;
        Ok(payload.ranking)
    }

    async fn fetch_success_profile(&self) -> Result<SuccessProfile, ApiError> {
        let url = self.endpoint(PROFILE_PATH, None)?;
        let payload: ProfilePayload = self.get_json(url).await?;
        Ok(payload.caracteristicas)
    }

    async fn fetch_diagnostics(&self) -> Result<Diagnostics, ApiError> {
        let url = self.endpoint(DIAGNOSTICS_PATH, None)?;
        let (status, body) = self.get_text(url).await?;
        parse_bare(status, &body)
    }

    async fn send_chat(&self, message: &str) -> Result<String, ApiError> {
        let url = self.endpoint(CHAT_PATH, None)?;
        tracing::debug!(%url, "POST chat");
        let response = self
            .client
            .post(url)
            .json(&ChatRequest { message })
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        parse_chat_reply(status, &body)
    }

    fn csv_export_url(&self, filters: &FilterState) -> Result<Url, ApiError> {
        self.endpoint(EXPORT_PATH, Some(filters))
    }
}

fn status_error(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.error);
    ApiError::Status { status, message }
}

fn parse_envelope<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    if !(200..300).contains(&status) {
        return Err(status_error(status, body));
    }

    let envelope: Envelope<T> = serde_json::from_str(body)?;
    if envelope.success {
        Ok(envelope.payload)
    } else {
        Err(ApiError::Server(
            envelope
                .error
                .unwrap_or_else(|| "Error desconocido".to_string()),
        ))
    }
}

fn parse_bare<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    if !(200..300).contains(&status) {
        return Err(status_error(status, body));
    }
    Ok(serde_json::from_str(body)?)
}

fn parse_chat_reply(status: u16, body: &str) -> Result<String, ApiError> {
    if !(200..300).contains(&status) {
        return Err(status_error(status, body));
    }

    let reply: ChatReply = serde_json::from_str(body)?;
    match (reply.response, reply.error) {
        (Some(response), _) => Ok(response),
        (None, Some(error)) => Err(ApiError::Server(error)),
        (None, None) => Err(ApiError::Server("Respuesta vacía del asistente".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn client() -> Result<HttpApiClient, Box<dyn std::error::Error>> {
        let config = AppConfig {
            api_url: Url::parse("http://127.0.0.1:5000/")?,
            timeout: Duration::from_secs(5),
            export_dir: std::env::temp_dir(),
            log_file: std::env::temp_dir().join("geomapval-test.log"),
            debug: false,
        };
        Ok(HttpApiClient::new(&config)?)
    }

    #[test]
    fn projects_envelope_yields_the_project_list() -> Result<(), ApiError> {
        let payload: ProjectsPayload = parse_envelope(
            200,
            r#"{"success": true, "total": 2, "proyectos": [{"codigo": "A"}, {"codigo": "B"}]}"#,
        )?;

        let codes: Vec<_> = payload.proyectos.iter().map(Project::display_code).collect();
        assert_eq!(codes, ["A", "B"]);
        Ok(())
    }

    #[test]
    fn unsuccessful_payload_surfaces_the_server_error() {
        let result: Result<ProjectsPayload, _> = parse_envelope(
            200,
            r#"{"success": false, "error": "No hay datos disponibles", "proyectos": []}"#,
        );

        match result {
            Err(ApiError::Server(message)) => assert_eq!(message, "No hay datos disponibles"),
            other => panic!("expected server error, got {other:?}"),
        }
    }

    #[test]
    fn non_2xx_status_keeps_the_body_error() {
        let result: Result<Statistics, _> =
            parse_envelope(500, r#"{"success": false, "error": "boom"}"#);

        match result {
            Err(ApiError::Status { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message.as_deref(), Some("boom"));
            }
            other => panic!("expected status error, got {other:?}"),
        }

        let result: Result<Statistics, _> = parse_envelope(502, "<html>Bad gateway</html>");
        assert!(matches!(
            result,
            Err(ApiError::Status { status: 502, message: None })
        ));
    }

    #[test]
    fn statistics_envelope_is_flattened() -> Result<(), ApiError> {
        let stats: Statistics = parse_envelope(
            200,
            r#"{"success": true, "total": 10, "exitosos": 3, "moderados": 5, "mejorables": 2, "score_promedio": 0.61}"#,
        )?;

        assert_eq!(stats.total, 10);
        assert_eq!(stats.mejorables, 2);
        assert!((stats.score_promedio - 0.61).abs() < f64::EPSILON);
        Ok(())
    }

    #[test]
    fn ranking_and_profile_envelopes_unwrap_their_payload() -> Result<(), ApiError> {
        let ranking: RankingPayload = parse_envelope(
            200,
            r#"{"success": true, "estado_filtro": "Activos",
                "ranking": [{"vendedor": "Constructora A", "exitosos": 5, "porcentaje_exitosos": 62.5}]}"#,
        )?;
        assert_eq!(ranking.ranking.len(), 1);
        assert_eq!(ranking.ranking[0].exitosos, 5);

        let profile: ProfilePayload = parse_envelope(
            200,
            r#"{"success": true, "caracteristicas": {"meses_para_agotar": {"promedio": 18.5, "mediana": 16, "min": 4, "max": 40}}}"#,
        )?;
        assert_eq!(
            profile.caracteristicas.meses_para_agotar.map(|metric| metric.mediana),
            Some(16.0)
        );

        let missing: Result<ProfilePayload, _> = parse_envelope(
            404,
            r#"{"success": false, "error": "No hay características"}"#,
        );
        assert!(matches!(missing, Err(ApiError::Status { status: 404, .. })));
        Ok(())
    }

    #[test]
    fn diagnostics_are_a_bare_object() -> Result<(), ApiError> {
        let diagnostics: Diagnostics = parse_bare(
            200,
            r#"{"archivo_existe": false, "archivo_ruta": "/srv/Base Proyectos.xlsx", "df_data_vacio": true, "df_data_tamano": 0}"#,
        )?;

        assert!(!diagnostics.archivo_existe);
        assert!(diagnostics.lines().contains(&"Archivo existe: No".to_string()));
        Ok(())
    }

    #[test]
    fn garbage_body_is_a_decode_error() {
        let result: Result<FilterOptions, _> = parse_envelope(200, "not json");
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }

    #[test]
    fn chat_reply_requires_a_response() {
        assert_eq!(
            parse_chat_reply(200, r#"{"response": "Hola"}"#).ok().as_deref(),
            Some("Hola")
        );
        assert!(matches!(
            parse_chat_reply(200, r#"{"error": "sin clave"}"#),
            Err(ApiError::Server(message)) if message == "sin clave"
        ));
    }

    #[test]
    fn export_url_carries_the_filters() -> Result<(), Box<dyn std::error::Error>> {
        let client = client()?;
        let mut filters = FilterState::default();
        filters.precio_min = Some("100000".to_string());

        let url = client.csv_export_url(&filters)?;

        assert_eq!(url.path(), "/api/descargar");
        assert_eq!(
            url.query(),
            Some(
                "clasificacion=Todos&zona=Todas&barrio=Todos&tipo_vis=Todos&estado=Activos&precio_min=100000"
            )
        );
        Ok(())
    }
}
