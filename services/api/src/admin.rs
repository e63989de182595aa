use clap::Args;
use reliefmap::config::AppConfig;
use reliefmap::error::AppError;
use reliefmap::locations::PlaceImporter;
use reliefmap::repository::RepositoryError;
use reliefmap::store::SqliteStore;
use reliefmap::telemetry;
use reliefmap::users::{NewUser, UserId, UserRepository};
use std::path::PathBuf;
use tracing::warn;

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    /// CSV with name,address,latitude,longitude,source_name,source_id,is_official columns
    pub(crate) csv: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct UserCreateArgs {
    /// Display name
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long)]
    pub(crate) email: Option<String>,
    /// Initial trust score (defaults to 5)
    #[arg(long)]
    pub(crate) trust: Option<i64>,
}

#[derive(Args, Debug)]
pub(crate) struct TrustArgs {
    #[arg(long)]
    pub(crate) user_id: i64,
    #[arg(long)]
    pub(crate) score: i64,
}

fn open_store() -> Result<SqliteStore, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    if config.database.is_in_memory() {
        warn!("DATABASE_PATH is :memory:; changes are discarded on exit");
    }
    Ok(SqliteStore::from_config(&config.database)?)
}

pub(crate) fn run_import(args: ImportArgs) -> Result<(), AppError> {
    let store = open_store()?;
    let summary = PlaceImporter::from_path(&store, &args.csv)?;
    println!(
        "Imported {} new locations, refreshed {} existing ones from {}",
        summary.imported,
        summary.refreshed,
        args.csv.display()
    );
    Ok(())
}

pub(crate) fn run_user_create(args: UserCreateArgs) -> Result<(), AppError> {
    let store = open_store()?;
    let user = create_user(&store, args)?;
    println!("Created user {}", user);
    Ok(())
}

pub(crate) fn run_set_trust(args: TrustArgs) -> Result<(), AppError> {
    let store = open_store()?;
    set_trust(&store, UserId(args.user_id), args.score)?;
    println!("User {} trust score set to {}", args.user_id, args.score);
    Ok(())
}

/// Emails are stored trimmed and lowercased; an address already on file is a conflict.
pub(crate) fn create_user<R: UserRepository>(
    repository: &R,
    args: UserCreateArgs,
) -> Result<UserId, RepositoryError> {
    let email = args.email.map(|email| email.trim().to_ascii_lowercase());
    if let Some(email) = &email {
        if let Some(existing) = repository.find_by_email(email)? {
            warn!(user_id = %existing.user_id, "email already registered");
            return Err(RepositoryError::Conflict);
        }
    }

    let mut user = NewUser::named(args.name);
    user.email = email;
    user.trust_score = args.trust;
    repository.create(user)
}

pub(crate) fn set_trust<R: UserRepository>(
    repository: &R,
    user_id: UserId,
    score: i64,
) -> Result<(), RepositoryError> {
    if repository.set_trust_score(user_id, score)? {
        Ok(())
    } else {
        Err(RepositoryError::NotFound)
    }
}
