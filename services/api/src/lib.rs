mod admin;
mod cli;
mod infra;
mod routes;
mod server;

use reliefmap::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
