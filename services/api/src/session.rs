use crate::demo::render_routes;
use crate::infra::{build_planner, describe_context, parse_mode, parse_profile, parse_toggle};
use clap::Args;
use clean_route::config::AppConfig;
use clean_route::error::AppError;
use clean_route::planning::{
    ContextChange, SessionHandle, SessionSnapshot, TransportMode, TravelContext, TripRequest,
    TripSession, VulnerabilityProfile,
};
use clean_route::telemetry;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Args, Debug)]
pub(crate) struct SessionArgs {
    /// Initial origin
    #[arg(long)]
    pub(crate) from: String,
    /// Initial destination
    #[arg(long)]
    pub(crate) to: String,
}

/// One line typed into the session prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SessionInput {
    Mode(TransportMode),
    Peak(bool),
    Profile(VulnerabilityProfile),
    From(String),
    To(String),
    Refresh,
    Show,
    Help,
    Quit,
}

pub(crate) fn parse_input(line: &str) -> Result<SessionInput, String> {
    let line = line.trim();
    let (command, argument) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let required = |what: &str| {
        if argument.is_empty() {
            Err(format!("'{command}' needs {what}"))
        } else {
            Ok(argument.to_string())
        }
    };

    match command.to_ascii_lowercase().as_str() {
        "mode" => parse_mode(argument).map(SessionInput::Mode),
        "peak" => parse_toggle(argument).map(SessionInput::Peak),
        "profile" => parse_profile(argument).map(SessionInput::Profile),
        "from" => required("a place").map(SessionInput::From),
        "to" => required("a place").map(SessionInput::To),
        "refresh" | "retry" => Ok(SessionInput::Refresh),
        "show" => Ok(SessionInput::Show),
        "help" | "?" => Ok(SessionInput::Help),
        "quit" | "exit" => Ok(SessionInput::Quit),
        "" => Err("empty command".to_string()),
        other => Err(format!("unknown command '{other}' (try 'help')")),
    }
}

/// Fold an edit into the current request; `None` for inputs that are not edits.
pub(crate) fn apply_input(request: &TripRequest, input: &SessionInput) -> Option<TripRequest> {
    let mut next = request.clone();
    match input {
        SessionInput::Mode(mode) => next.context.transport_mode = *mode,
        SessionInput::Peak(peak) => next.context.is_peak = *peak,
        SessionInput::Profile(profile) => next.context.vulnerability = *profile,
        SessionInput::From(place) => next.origin = place.clone(),
        SessionInput::To(place) => next.destination = place.clone(),
        SessionInput::Refresh | SessionInput::Show | SessionInput::Help | SessionInput::Quit => {
            return None
        }
    }
    Some(next)
}

pub(crate) async fn run_session(args: SessionArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let planner = Arc::new(build_planner(&config.collaborators)?);
    let (mut handle, task) = TripSession::spawn(planner);

    let mut request = TripRequest {
        origin: args.from,
        destination: args.to,
        context: TravelContext::default(),
    };
    dispatch(&mut handle, request.clone()).await;
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = match parse_input(&line) {
            Ok(input) => input,
            Err(message) => {
                println!("! {message}");
                continue;
            }
        };

        match input {
            SessionInput::Quit => break,
            SessionInput::Help => print_help(),
            SessionInput::Show => print_snapshot(&handle.snapshot()),
            SessionInput::Refresh => match handle.refresh().await {
                Ok(true) => settle_and_print(&mut handle).await,
                Ok(false) => println!("! nothing to refresh yet"),
                Err(err) => {
                    println!("! {err}");
                    break;
                }
            },
            edit => {
                if let Some(next) = apply_input(&request, &edit) {
                    request = next;
                    dispatch(&mut handle, request.clone()).await;
                }
            }
        }
    }

    drop(handle);
    task.abort();
    Ok(())
}

async fn dispatch(handle: &mut SessionHandle, request: TripRequest) {
    match handle.update(request).await {
        Ok(ContextChange::Full) => println!("... planning routes"),
        Ok(ContextChange::VulnerabilityOnly(profile)) => {
            println!("... recomputing exposure for {}", profile.label())
        }
        Ok(ContextChange::Unchanged) => println!("(no change)"),
        Err(err) => {
            println!("! {err}");
            return;
        }
    }
    settle_and_print(handle).await;
}

async fn settle_and_print(handle: &mut SessionHandle) {
    match handle.settled().await {
        Ok(snapshot) => print_snapshot(&snapshot),
        Err(err) => println!("! {err}"),
    }
}

fn print_snapshot(snapshot: &SessionSnapshot) {
    if let Some(request) = &snapshot.request {
        println!(
            "\n{} -> {} ({}) [generation {}]",
            request.origin,
            request.destination,
            describe_context(&request.context),
            snapshot.generation
        );
    }
    if let Some(error) = &snapshot.error {
        println!("! {error} (showing previous routes)");
    }
    if snapshot.routes.is_empty() {
        println!("  no routes yet");
    } else {
        render_routes(&snapshot.routes);
    }
}

fn print_help() {
    println!(
        "commands: mode <car|bike|walk>, peak <on|off>, profile <normal|child|elderly|asthmatic>, \
         from <place>, to <place>, refresh, show, quit"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> TripRequest {
        TripRequest {
            origin: "Pune Station".to_string(),
            destination: "Kothrud".to_string(),
            context: TravelContext::default(),
        }
    }

    #[test]
    fn parses_session_commands() {
        assert_eq!(
            parse_input("mode walk"),
            Ok(SessionInput::Mode(TransportMode::Walk))
        );
        assert_eq!(parse_input("peak on"), Ok(SessionInput::Peak(true)));
        assert_eq!(
            parse_input("  PROFILE   Child "),
            Ok(SessionInput::Profile(VulnerabilityProfile::Child))
        );
        assert_eq!(
            parse_input("to Shaniwar Wada"),
            Ok(SessionInput::To("Shaniwar Wada".to_string()))
        );
        assert_eq!(parse_input("quit"), Ok(SessionInput::Quit));
        assert!(parse_input("from").is_err());
        assert!(parse_input("teleport now").is_err());
        assert!(parse_input("   ").is_err());
    }

    #[test]
    fn edits_fold_into_the_request() {
        let base = request();

        let walked = apply_input(&base, &SessionInput::Mode(TransportMode::Walk))
            .expect("mode is an edit");
        assert_eq!(walked.context.transport_mode, TransportMode::Walk);
        assert_eq!(walked.destination, base.destination);

        let moved = apply_input(&base, &SessionInput::From("Aundh".to_string()))
            .expect("origin is an edit");
        assert_eq!(moved.origin, "Aundh");

        assert!(apply_input(&base, &SessionInput::Show).is_none());
    }
}
