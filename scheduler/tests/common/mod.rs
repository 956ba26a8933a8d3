use std::time::Duration;

use elasticmem::{
    config::Config,
    plugins::{ElasticMemory, Plugin},
    state::{ExtenderState, State},
};
use shared::models::{ContainerSpec, Metadata, Pod, PodSpec};
use std::sync::Arc;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

/// Extender state running the elastic memory plugin against `oracle_url`.
pub fn elastic_state(oracle_url: &str) -> State {
    elastic_state_with_ttl(oracle_url, Config::default().cycle_ttl)
}

pub fn elastic_state_with_ttl(oracle_url: &str, cycle_ttl: Duration) -> State {
    let config = Config {
        oracle_url: oracle_url.to_string(),
        oracle_timeout: Duration::from_millis(500),
        cycle_ttl,
        ..Default::default()
    };
    let plugin: Arc<dyn Plugin> = Arc::new(ElasticMemory::from_config(&config).unwrap());
    ExtenderState::with_ttl(plugin, config.cycle_ttl)
}

/// Oracle publishing `scores` and accepting reservations and releases.
pub async fn start_oracle(scores: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    mount_scores(&server, scores).await;

    Mock::given(method("POST"))
        .and(path("/pods"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/pods/release"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    server
}

/// Serves `scores` on `GET /scores`.
pub async fn mount_scores(server: &MockServer, scores: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/scores"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "result": scores })))
        .mount(server)
        .await;
}

/// Base url nothing listens on.
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

pub fn web_pod() -> Pod {
    Pod {
        metadata: Metadata::named("web"),
        spec: PodSpec {
            node_name: "".to_string(),
            containers: vec![
                ContainerSpec::with_memory("app", "512Mi", "1Gi"),
                ContainerSpec::with_memory("cache", "256Mi", "256Mi"),
            ],
        },
    }
}

pub async fn requests_to(server: &MockServer, method_name: &str, route: &str) -> Vec<wiremock::Request> {
    server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.method.as_str() == method_name && r.url.path() == route)
        .collect()
}
