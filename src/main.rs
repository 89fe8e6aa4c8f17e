use anyhow::Result;
use clap::Parser;
use tracing::info;

use workflow_admin::app::build_demo;
use workflow_admin::cli::{Cli, Command};
use workflow_admin::config::AppConfig;
use workflow_admin::error::AppError;
use workflow_admin::http::{build_router, serve};
use workflow_admin::telemetry::init_tracing;
use workflow_admin::ui::Printer;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            let app = build_demo(&config)?;
            info!(bind = %config.server.bind, admin = %app.admin.code(), "starting workflow admin");
            serve(&config.server.bind, build_router(app)).await?;
        }
        Command::Routes => {
            let app = build_demo(&config)?;
            print!("{}", Printer::default().routes(&app.routes));
        }
        Command::Menu { id, action, json } => {
            let app = build_demo(&config)?;
            let subject = app.admin.object(&id).ok_or(AppError::UnknownObject(id))?;
            let menu = app.tab_menu(&action, Some(&subject));
            if json {
                println!("{}", serde_json::to_string_pretty(&menu)?);
            } else {
                print!("{}", Printer::default().menu(&menu));
            }
        }
    }

    Ok(())
}
