use crate::infra::{build_planner, describe_context, parse_mode, parse_profile};
use chrono::Local;
use clap::Args;
use clean_route::config::AppConfig;
use clean_route::error::AppError;
use clean_route::planning::scoring::score_locally;
use clean_route::planning::{
    recompute_metrics, select_diverse_routes, simulated_pool, ExposureRating, FinalRoute,
    RoutePlanView, TransportMode, TravelContext, TripRequest, VulnerabilityProfile,
};
use clean_route::telemetry;

#[derive(Args, Debug)]
pub(crate) struct PlanArgs {
    /// Free-text origin, resolved through the geocoder
    #[arg(long)]
    pub(crate) from: String,
    /// Free-text destination, resolved through the geocoder
    #[arg(long)]
    pub(crate) to: String,
    /// Transport mode: car, bike or walk
    #[arg(long, default_value = "car", value_parser = parse_mode)]
    pub(crate) mode: TransportMode,
    /// Plan for peak-hour traffic
    #[arg(long)]
    pub(crate) peak: bool,
    /// Vulnerability profile: normal, child, elderly or asthmatic
    #[arg(long, default_value = "normal", value_parser = parse_profile)]
    pub(crate) profile: VulnerabilityProfile,
    /// Print the full plan view as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Segments per simulated route
    #[arg(long, default_value_t = 8)]
    pub(crate) segments: usize,
    /// Seed for the simulated road generator
    #[arg(long, default_value_t = 42)]
    pub(crate) seed: u64,
    /// Transport mode used for exposure weighting
    #[arg(long, default_value = "car", value_parser = parse_mode)]
    pub(crate) mode: TransportMode,
    /// Apply the peak-hour traffic factor
    #[arg(long)]
    pub(crate) peak: bool,
}

pub(crate) async fn run_plan(args: PlanArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let request = TripRequest {
        origin: args.from,
        destination: args.to,
        context: TravelContext {
            transport_mode: args.mode,
            is_peak: args.peak,
            vulnerability: args.profile,
        },
    };

    let planner = build_planner(&config.collaborators)?;
    let plan = planner.plan(&request).await?;

    if args.json {
        let view = RoutePlanView::from_plan(&plan);
        match serde_json::to_string_pretty(&view) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("plan view unavailable: {err}"),
        }
        return Ok(());
    }

    println!(
        "Route plan: {} -> {} ({})",
        request.origin,
        request.destination,
        describe_context(&request.context)
    );
    println!(
        "Scored {} candidates ({:?} costs) at {}",
        plan.candidate_count,
        plan.scoring_source,
        plan.generated_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
    );
    render_routes(&plan.routes);

    if let Some(selected) = plan.routes.get(plan.selected) {
        println!("\nSegments of the {} route:", selected.strategy.label());
        for segment in selected.segments() {
            println!(
                "  - {:<32} {:>6.2} km | density {:>4.0} | congestion x{:.1}",
                segment.name, segment.length_km, segment.density, segment.congestion
            );
        }
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        segments,
        seed,
        mode,
        peak,
    } = args;

    let context = TravelContext {
        transport_mode: mode,
        is_peak: peak,
        vulnerability: VulnerabilityProfile::Normal,
    };

    println!("Clean route demo (simulated roads, seed {seed})");
    let pool = simulated_pool(seed, segments);
    println!(
        "- {} candidates across driving, bicycle and foot profiles",
        pool.len()
    );

    let scored = score_locally(pool, &context);
    let Some(selection) = select_diverse_routes(&scored, &context) else {
        println!("No routes to select from.");
        return Ok(());
    };
    let routes = selection.into_routes();

    println!("\nSelected routes ({})", describe_context(&context));
    render_routes(&routes);

    println!("\nExposure by vulnerability profile (distance and duration unchanged)");
    for profile in VulnerabilityProfile::ordered() {
        let profiled = TravelContext {
            vulnerability: profile,
            ..context
        };
        let recomputed = recompute_metrics(&routes, &profiled);
        let cells: Vec<String> = recomputed
            .iter()
            .map(|route| {
                format!(
                    "{} {:.2} (risk {:.1})",
                    route.strategy.label(),
                    route.metrics.total_exposure,
                    route.metrics.risk_index
                )
            })
            .collect();
        println!("  - {:<9} {}", profile.label(), cells.join(" | "));
    }

    Ok(())
}

pub(crate) fn render_routes(routes: &[FinalRoute]) {
    for route in routes {
        let rating = ExposureRating::for_score(route.metrics.total_exposure);
        println!(
            "  [{}] {:<8} {:<8} {:>6.2} km | {:>4} min | exposure {:>8.2} ({}) | risk {:>4.1}/10",
            route.id,
            route.strategy.label(),
            route.route.candidate.profile.as_str(),
            route.metrics.distance_km,
            route.metrics.duration_secs / 60,
            route.metrics.total_exposure,
            rating.label(),
            route.metrics.risk_index
        );
    }
}
