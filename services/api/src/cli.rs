use crate::demo::{run_demo, run_plan, DemoArgs, PlanArgs};
use crate::server;
use crate::session::{run_session, SessionArgs};
use clap::{Args, Parser, Subcommand};
use clean_route::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Clean Route",
    about = "Plan health-aware routes that weigh travel time against pollution exposure",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Plan one trip against the configured collaborators and print the three routes
    Plan(PlanArgs),
    /// Score and select routes over simulated roads, fully offline
    Demo(DemoArgs),
    /// Interactive trip session driven by commands on stdin
    Session(SessionArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Plan(args) => run_plan(args).await,
        Command::Demo(args) => run_demo(args),
        Command::Session(args) => run_session(args).await,
    }
}
