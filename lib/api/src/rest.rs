use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpResponseBuilder, HttpServer, Result as ActixResult};
use featurefit_core::{Audience, RawInput};
use featurefit_inference::{ErrorBody, PredictionResult, ReconcileResult, SalaryBand, Session};
use featurefit_schema::{FeatureSpec, Schema};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Serialize)]
struct SchemaInfo<'a> {
    features_count: usize,
    features: &'a [FeatureSpec],
    groups: Vec<GroupInfo<'a>>,
    ordinal_maps: BTreeMap<&'a str, Vec<&'a str>>,
}

#[derive(Serialize)]
struct GroupInfo<'a> {
    name: &'a str,
    choices: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fallback: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference: Option<&'a str>,
}

impl<'a> SchemaInfo<'a> {
    fn from_schema(schema: &'a Schema) -> Self {
        let groups = schema
            .groups()
            .iter()
            .map(|g| GroupInfo {
                name: g.name(),
                choices: g.choices(),
                fallback: g.fallback().map(|m| m.category.as_str()),
                reference: g.reference(),
            })
            .collect();

        let ordinal_maps = schema
            .features()
            .iter()
            .filter_map(|f| {
                schema
                    .ordinal_labels(f.name())
                    .map(|table| (f.name(), table.keys().map(String::as_str).collect()))
            })
            .collect();

        Self {
            features_count: schema.len(),
            features: schema.features(),
            groups,
            ordinal_maps,
        }
    }
}

#[derive(Serialize)]
struct PredictResponse {
    #[serde(flatten)]
    result: PredictionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    band: Option<SalaryBand>,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(session: Arc<Session>, port: u16) -> std::io::Result<()> {
        let server = HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(session.clone()))
                .configure(RestApi::routes)
        })
        .bind(("0.0.0.0", port))
        .map_err(|e| {
            tracing::error!(port, error = %e, "failed to bind HTTP listener");
            e
        })?;

        server.run().await
    }

    pub fn routes(cfg: &mut web::ServiceConfig) {
        cfg.route("/health", web::get().to(health))
            .route("/schema", web::get().to(get_schema))
            .route("/predict", web::post().to(predict))
            .route("/reconcile", web::post().to(reconcile));
    }
}

async fn health() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({"status": "ok"})))
}

async fn get_schema(session: web::Data<Arc<Session>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(SchemaInfo::from_schema(session.schema())))
}

async fn predict(
    session: web::Data<Arc<Session>>,
    body: web::Json<serde_json::Value>,
) -> ActixResult<HttpResponse> {
    let result = match RawInput::from_json(&body) {
        Ok(input) => session.predict(&input),
        Err(err) => PredictionResult::failure(&err, Vec::new()),
    };

    let band = result.prediction.map(SalaryBand::classify);
    let mut response = status_for("/predict", result.error.as_ref());
    Ok(response.json(PredictResponse { result, band }))
}

/// Assemble the row the model would receive, without predicting
async fn reconcile(
    session: web::Data<Arc<Session>>,
    body: web::Json<serde_json::Value>,
) -> ActixResult<HttpResponse> {
    let result = match RawInput::from_json(&body) {
        Ok(input) => session.explain(&input),
        Err(err) => ReconcileResult::failure(&err),
    };

    let mut response = status_for("/reconcile", result.error.as_ref());
    Ok(response.json(result))
}

/// 422 when the caller can fix the input, 500 when only an operator can
fn status_for(route: &str, error: Option<&ErrorBody>) -> HttpResponseBuilder {
    match error {
        None => HttpResponse::Ok(),
        Some(e) if e.audience == Audience::EndUser => {
            tracing::debug!(route, kind = ?e.kind, "rejected with 422");
            HttpResponse::UnprocessableEntity()
        }
        Some(e) => {
            tracing::warn!(route, kind = ?e.kind, message = %e.message, "failed with 500");
            HttpResponse::InternalServerError()
        }
    }
}
