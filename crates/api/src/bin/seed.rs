//! Bootstrap a fresh database: apply migrations, insert the standard
//! genres and optionally create an admin account.
//!
//! The admin is created only when `SEED_ADMIN_USERNAME`, `SEED_ADMIN_EMAIL`
//! and `SEED_ADMIN_PASSWORD` are all set. Re-running is safe.

use anyhow::{bail, Context};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinema_api::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use cinema_core::roles::ROLE_ADMIN;
use cinema_db::models::user::CreateUser;
use cinema_db::repositories::{RoleRepo, UserRepo};
use cinema_db::DbPool;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinema_db=info,cinema_seed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = cinema_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    cinema_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let summary = cinema_db::seed::seed_genres(&pool)
        .await
        .context("Failed to seed genres")?;
    println!(
        "Genres: {} created, {} already present, {} total",
        summary.created, summary.existing, summary.total
    );

    seed_admin(&pool).await?;
    Ok(())
}

async fn seed_admin(pool: &DbPool) -> anyhow::Result<()> {
    let (Ok(username), Ok(email), Ok(password)) = (
        std::env::var("SEED_ADMIN_USERNAME"),
        std::env::var("SEED_ADMIN_EMAIL"),
        std::env::var("SEED_ADMIN_PASSWORD"),
    ) else {
        tracing::info!("SEED_ADMIN_* not set, skipping admin account");
        return Ok(());
    };

    if let Some(existing) = UserRepo::find_by_username(pool, &username).await? {
        println!("Admin '{}' already exists (id {})", existing.username, existing.id);
        return Ok(());
    }

    if let Err(msg) = validate_password_strength(&password, MIN_PASSWORD_LENGTH) {
        bail!("SEED_ADMIN_PASSWORD rejected: {msg}");
    }
    let role = RoleRepo::find_by_name(pool, ROLE_ADMIN)
        .await?
        .context("admin role missing; migrations not applied?")?;
    let password_hash =
        hash_password(&password).map_err(|e| anyhow::anyhow!("Password hashing error: {e}"))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            username,
            email,
            first_name: String::new(),
            last_name: String::new(),
            password_hash,
            role_id: role.id,
        },
    )
    .await
    .context("Failed to create admin account")?;

    tracing::info!(user_id = user.id, "Admin account created");
    println!("Admin '{}' created (id {})", user.username, user.id);
    Ok(())
}
