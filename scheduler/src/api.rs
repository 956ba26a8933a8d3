use actix_web::{App, HttpResponse, HttpServer, Responder, web};
use shared::{
    api::{BindingRequest, NormalizeRequest, ScoreRequest},
    models::NodeScore,
};
use uuid::Uuid;

use crate::{config::Config, cycle::Phase, errors::PluginError, state::State};

pub async fn run(state: State, config: &Config) -> std::io::Result<()> {
    tracing::info!(
        port = config.port,
        plugin = state.plugin.name(),
        oracle = %config.oracle_url,
        "Starting extender"
    );
    HttpServer::new(move || App::new().app_data(state.clone()).configure(routes))
        .bind(("0.0.0.0", config.port))?
        .workers(config.workers)
        .run()
        .await
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(root))
        .route("/score", web::post().to(score))
        .route("/normalize", web::post().to(normalize))
        .route("/reserve", web::post().to(reserve))
        .route("/unreserve", web::post().to(unreserve))
        .route("/cycles/{pod_id}", web::delete().to(end_cycle));
}

async fn root(state: State) -> impl Responder {
    HttpResponse::Ok().body(format!("Hello from {}", state.plugin.name()))
}

/// Score one candidate node.
///
/// A failed score fails the host's attempt, so the cycle and its score set
/// go with it. A rejected transition leaves the cycle to its owner.
async fn score(state: State, body: web::Json<ScoreRequest>) -> impl Responder {
    let ScoreRequest { pod, node_name } = body.into_inner();
    let cycle = state.cycle(pod.metadata.id, Phase::Scoring);

    match state.plugin.score(&cycle, &pod, &node_name).await {
        Ok(score) => HttpResponse::Ok().json(NodeScore {
            name: node_name,
            score,
        }),
        Err(err) => {
            tracing::warn!(pod=%pod.metadata.name, node=%node_name, error=%err, "Score failed");
            if !matches!(err, PluginError::InvalidTransition { .. }) {
                state.discard(&cycle);
            }
            err.to_http_response()
        }
    }
}

/// Normalize all candidate scores, a failure ends the cycle
async fn normalize(state: State, body: web::Json<NormalizeRequest>) -> impl Responder {
    let NormalizeRequest { pod, mut scores } = body.into_inner();
    let cycle = state.cycle(pod.metadata.id, Phase::Normalized);

    match state.plugin.normalize_score(&cycle, &pod, &mut scores) {
        Ok(()) => HttpResponse::Ok().json(scores),
        Err(err) => {
            tracing::warn!(pod=%pod.metadata.name, error=%err, "Normalize failed");
            state.discard(&cycle);
            err.to_http_response()
        }
    }
}

/// Commit the placement with the oracle, a failed report ends the cycle
async fn reserve(state: State, body: web::Json<BindingRequest>) -> impl Responder {
    let BindingRequest { pod, node_name } = body.into_inner();
    let cycle = state.cycle(pod.metadata.id, Phase::Reserved);

    match state.plugin.reserve(&cycle, &pod, &node_name).await {
        Ok(()) => HttpResponse::Ok().finish(),
        Err(err) => {
            if !matches!(err, PluginError::InvalidTransition { .. }) {
                state.discard(&cycle);
            }
            err.to_http_response()
        }
    }
}

/// Undo a committed placement.
///
/// The cycle is kept when the release failed so the host can try again.
async fn unreserve(state: State, body: web::Json<BindingRequest>) -> impl Responder {
    let BindingRequest { pod, node_name } = body.into_inner();
    let Some(cycle) = state.get_cycle(&pod.metadata.id) else {
        tracing::warn!(pod=%pod.metadata.name, "Unreserve without a running cycle");
        return HttpResponse::Ok().finish();
    };

    state.plugin.unreserve(&cycle, &pod, &node_name).await;

    if cycle.phase() == Phase::Reserved {
        return HttpResponse::BadGateway().body("Failed to release reservation");
    }
    state.discard(&cycle);
    HttpResponse::Ok().finish()
}

/// Host finished with the pod
async fn end_cycle(state: State, pod_id: web::Path<Uuid>) -> impl Responder {
    if state.end_cycle(&pod_id) {
        HttpResponse::NoContent().finish()
    } else {
        HttpResponse::NotFound().body(format!("No cycle for pod {}", pod_id))
    }
}
