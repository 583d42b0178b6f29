//! Tests for the backend application bootstrap, covering server creation and
//! readiness signalling.

use super::server::{ServerConfig, create_server};
use actix_web::web;
use backend::inbound::http::health::HealthState;
use rstest::{fixture, rstest};
use std::net::SocketAddr;

#[fixture]
fn health_state() -> web::Data<HealthState> {
    web::Data::new(HealthState::new())
}

#[fixture]
fn bind_address() -> SocketAddr {
    ([127, 0, 0, 1], 0).into()
}

#[rstest]
#[actix_rt::test]
async fn create_server_marks_ready(health_state: web::Data<HealthState>, bind_address: SocketAddr) {
    assert!(!health_state.is_ready(), "state should start unready");

    let config = ServerConfig::new(bind_address);
    assert_eq!(config.bind_addr(), bind_address);
    let _server = create_server(health_state.clone(), config).expect("server should bind");

    assert!(health_state.is_ready(), "state should be ready after start");
}

#[rstest]
#[actix_rt::test]
async fn create_server_reports_bind_failures(health_state: web::Data<HealthState>) {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("reserve a port");
    let taken = listener.local_addr().expect("local address");

    let result = create_server(health_state.clone(), ServerConfig::new(taken));

    assert!(result.is_err(), "binding an occupied port must fail");
    assert!(!health_state.is_ready(), "failed start must not mark ready");
}
