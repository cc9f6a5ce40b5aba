mod cli;
mod demo;
mod infra;
mod routes;
mod server;
mod session;

use clean_route::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
