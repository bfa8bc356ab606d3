use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use registrar::cli::seed::seed_from_file;
use registrar::config::database::init_db_pool;
use registrar::grading::GradeScale;
use registrar::repo::postgres::PgRepository;
use registrar::router::init_router;
use registrar::state::init_app_state;

#[derive(Parser)]
#[command(name = "registrar", about = "University registrar API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run pending database migrations and exit
    Migrate,
    /// Wipe the database and reload it from a JSON seed file
    Seed {
        #[arg(long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // axum logs rejections from built-in extractors with the `axum::rejection`
                // target, at `TRACE` level. `axum::rejection=trace` enables showing those events
                format!(
                    "{}=debug,tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Migrate) => {
            let repo = PgRepository::new(init_db_pool());
            repo.migrate().await?;
            println!("Migrations applied");
        }
        Some(Commands::Seed { file }) => {
            let repo = PgRepository::new(init_db_pool());
            repo.migrate().await?;
            seed_from_file(&repo, &GradeScale::from_env(), &file).await?;
        }
        None => serve().await?,
    }

    Ok(())
}

async fn serve() -> anyhow::Result<()> {
    let state = init_app_state();
    let app = init_router(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    println!("🚀 Server running on http://localhost:{port}");
    println!("📚 Swagger UI available at http://localhost:{port}/swagger-ui");
    println!("📖 Scalar UI available at http://localhost:{port}/scalar");
    axum::serve(listener, app).await?;
    Ok(())
}
