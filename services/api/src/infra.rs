use clean_route::config::CollaboratorConfig;
use clean_route::error::AppError;
use clean_route::planning::providers::{NominatimGeocoder, OsrmRouteProvider, RandomTraffic};
use clean_route::planning::{
    ConfiguredScoring, RoutePlanner, ScoringOrchestrator, TransportMode, TravelContext,
    VulnerabilityProfile,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

const COLLABORATOR_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Planner wired to the live HTTP collaborators.
pub(crate) type LivePlanner =
    RoutePlanner<NominatimGeocoder, OsrmRouteProvider, ConfiguredScoring, RandomTraffic>;

pub(crate) fn http_client(config: &CollaboratorConfig) -> Result<reqwest::Client, AppError> {
    let client = reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(COLLABORATOR_REQUEST_TIMEOUT)
        .build()?;
    Ok(client)
}

pub(crate) fn build_planner(config: &CollaboratorConfig) -> Result<LivePlanner, AppError> {
    let client = http_client(config)?;
    let scoring = ConfiguredScoring::from_endpoint(client.clone(), config.scoring_url.as_deref());

    Ok(RoutePlanner::new(
        Arc::new(NominatimGeocoder::new(client.clone(), &config.geocoder_url)),
        Arc::new(OsrmRouteProvider::new(client, &config.router_url)),
        ScoringOrchestrator::new(Arc::new(scoring), config.scoring_timeout),
        Arc::new(RandomTraffic::default()),
    ))
}

pub(crate) fn parse_mode(raw: &str) -> Result<TransportMode, String> {
    TransportMode::parse(raw)
        .ok_or_else(|| format!("unknown transport mode '{raw}' (car, bike, walk)"))
}

pub(crate) fn parse_profile(raw: &str) -> Result<VulnerabilityProfile, String> {
    VulnerabilityProfile::ordered()
        .into_iter()
        .find(|profile| profile.label().eq_ignore_ascii_case(raw.trim()))
        .ok_or_else(|| {
            format!("unknown vulnerability profile '{raw}' (normal, child, elderly, asthmatic)")
        })
}

pub(crate) fn parse_toggle(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "on" | "yes" | "true" | "1" => Ok(true),
        "off" | "no" | "false" | "0" => Ok(false),
        other => Err(format!("expected on/off, got '{other}'")),
    }
}

pub(crate) fn describe_context(context: &TravelContext) -> String {
    format!(
        "{} | {} | {}",
        context.transport_mode.label(),
        if context.is_peak { "peak hours" } else { "off-peak" },
        context.vulnerability.label()
    )
}
