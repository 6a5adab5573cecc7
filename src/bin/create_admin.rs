use clap::Parser;
use dotenv::dotenv;
use hbnb::api::server::{build_state, init_tracing};
use hbnb::domain::users::AdminSeed;
use hbnb::Config;
use std::env;
use tracing::{info, warn};

/// Create the first admin account against the configured store
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(long, env = "ADMIN_EMAIL", default_value = "admin@hbnb.com")]
    email: String,

    #[arg(long, env = "ADMIN_PASSWORD")]
    password: String,

    #[arg(long, default_value = "Admin")]
    first_name: String,

    #[arg(long, default_value = "User")]
    last_name: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();
    let args = Args::parse();

    // The seed comes from the arguments, not from the startup seed variables
    let config = Config::from_lookup(|key| match key {
        "ADMIN_EMAIL" | "ADMIN_PASSWORD" => None,
        _ => env::var(key).ok(),
    })?;
    if !config.is_persistent() {
        anyhow::bail!(
            "create-admin needs a file-backed database; set DATABASE_URL (e.g. sqlite://hbnb.db)"
        );
    }

    let state = build_state(&config).await?;
    let seed = AdminSeed {
        email: args.email,
        password: args.password,
        first_name: args.first_name,
        last_name: args.last_name,
    };

    let (admin, created) = state.facade.ensure_admin(&seed).await?;
    if created {
        info!(user_id = %admin.id, email = %admin.email, "Admin user created");
    } else if admin.is_admin {
        info!(user_id = %admin.id, email = %admin.email, "Admin user already exists");
    } else {
        warn!(user_id = %admin.id, email = %admin.email, "Email belongs to a non-admin account; no admin created");
    }

    Ok(())
}
