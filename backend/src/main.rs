//! Backend entry-point: wires the fixture adapters, the domain services, the
//! REST endpoints, and the health probes.

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::body::MessageBody;
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpServer};
use mockable::{DefaultClock, DefaultEnv};
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

use citypulse::domain::ports::{NullMapHandle, StaticAllowList};
use citypulse::domain::{
    run_auth_observer, run_live_sync, GeolocationSample, Position, Project, ProjectStatus,
    ReportingService, SessionGate,
};
use citypulse::inbound::http::health::{live, ready};
use citypulse::inbound::http::session_config::{session_settings_from_env, BuildMode};
use citypulse::inbound::http::{map, reporting, sessions, AppState, HealthState};
use citypulse::outbound::memory::{
    FixedGeolocationProvider, FixtureAuthBackend, MemoryDocumentStore,
};
use citypulse::RequestId;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        session_settings_from_env(&DefaultEnv::default(), BuildMode::from_debug_assertions())
            .map_err(std::io::Error::other)?;

    let store = Arc::new(MemoryDocumentStore::new());
    store.publish_projects(demo_projects());

    let gate = Arc::new(SessionGate::new(
        Arc::new(FixtureAuthBackend::demo()),
        Arc::new(StaticAllowList::demo()),
    ));
    let reporting = Arc::new(ReportingService::new(
        Arc::clone(&store) as Arc<dyn citypulse::domain::ports::ReportStore>,
        Arc::new(FixedGeolocationProvider::resolving(demo_location())),
        Arc::new(NullMapHandle),
        Arc::new(DefaultClock),
    ));

    let observer = run_auth_observer(Arc::clone(&gate));
    let live_sync = run_live_sync(Arc::clone(&reporting), store.as_ref());

    let state = AppState::new(gate, reporting);
    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the probes stay reachable.
    let server_health_state = health_state.clone();
    let key = settings.key;
    let cookie_secure = settings.cookie_secure;
    let same_site = settings.same_site;
    let server = HttpServer::new(move || {
        build_app(
            server_health_state.clone(),
            state.clone(),
            key.clone(),
            cookie_secure,
            same_site,
        )
    })
    .bind(("0.0.0.0", 8080))?;

    health_state.mark_ready();
    let outcome = server.run().await;

    health_state.mark_unhealthy();
    live_sync.release();
    observer.abort();
    outcome
}

fn build_app(
    health_state: web::Data<HealthState>,
    state: AppState,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(same_site)
        .build();

    let api = web::scope("/api/v1")
        .wrap(session)
        .service(sessions::sign_in)
        .service(sessions::sign_out)
        .service(sessions::sign_up)
        .service(sessions::dashboard)
        .service(map::list_projects)
        .service(map::list_markers)
        .service(reporting::list_reports)
        .service(reporting::submit_report)
        .service(reporting::list_notifications)
        .service(reporting::dismiss_notification)
        .service(reporting::resolve_location);

    App::new()
        .app_data(health_state)
        .app_data(web::Data::new(state))
        .wrap(RequestId)
        .service(api)
        .service(ready)
        .service(live)
}

/// Development projects so the map is populated before the real collection
/// is wired.
fn demo_projects() -> Vec<Project> {
    let seeds: [(&str, f64, f64, &str, ProjectStatus, &str, &str); 3] = [
        (
            "metro-purple-line",
            12.9757,
            77.6050,
            "metro",
            ProjectStatus::Ongoing,
            "Purple Line Extension",
            "New stations between Baiyappanahalli and Whitefield",
        ),
        (
            "orr-resurfacing",
            12.9352,
            77.6245,
            "road",
            ProjectStatus::Planned,
            "Outer Ring Road Resurfacing",
            "Carriageway renewal along the Sarjapur stretch",
        ),
        (
            "storm-drain-rehab",
            12.9141,
            77.6101,
            "drainage",
            ProjectStatus::Completed,
            "Storm Drain Rehabilitation",
            "Completed desilting and relining works",
        ),
    ];
    let mut projects = Vec::new();
    for (id, lat, lng, kind, status, name, description) in seeds {
        let Ok(position) = Position::new(lat, lng) else {
            continue;
        };
        projects.push(Project {
            id: id.to_owned(),
            position,
            kind: kind.to_owned(),
            status,
            name: name.to_owned(),
            description: description.to_owned(),
        });
    }
    projects
}

/// Fixed development fix near the seeded projects.
fn demo_location() -> GeolocationSample {
    GeolocationSample {
        latitude: 12.9716,
        longitude: 77.5946,
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use citypulse::domain::ports::ReportStore;

    fn demo_state() -> AppState {
        let store = Arc::new(MemoryDocumentStore::new());
        let gate = Arc::new(SessionGate::new(
            Arc::new(FixtureAuthBackend::demo()),
            Arc::new(StaticAllowList::demo()),
        ));
        let reporting = Arc::new(ReportingService::new(
            Arc::clone(&store) as Arc<dyn ReportStore>,
            Arc::new(FixedGeolocationProvider::resolving(demo_location())),
            Arc::new(NullMapHandle),
            Arc::new(DefaultClock),
        ));
        AppState::new(gate, reporting)
    }

    #[actix_web::test]
    async fn app_factory_wires_probes_and_api_routes() {
        let health_state = web::Data::new(HealthState::new());
        health_state.mark_ready();
        let app = test::init_service(build_app(
            health_state,
            demo_state(),
            Key::generate(),
            false,
            SameSite::Lax,
        ))
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/health/ready").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/projects").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[core::prelude::v1::test]
    fn seeded_projects_all_carry_valid_coordinates() {
        assert_eq!(demo_projects().len(), 3);
    }
}
