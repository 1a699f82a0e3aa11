use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use lonb_webserver::{Cfg, Environment, JwtState};

mod config;
mod gateways;
mod storage;
mod transfer;

/// Backend of the Location Notebook.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Accept requests from any origin
    #[arg(long)]
    enable_cors: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the web server (default)
    Serve,
    /// Export the locations of a user as JSON
    Export {
        #[arg(long)]
        user_id: String,
        /// Write to this file instead of stdout
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Import previously exported locations of a user
    Import {
        #[arg(long)]
        user_id: String,
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match dotenv {
        Ok(path) => log::debug!("Loaded environment from {}", path.display()),
        Err(err) if err.not_found() => {}
        Err(err) => log::warn!("Unable to load .env file: {err}"),
    }

    let args = Args::parse();
    let cfg = config::Config::try_load_from_file_or_default(args.config.as_ref())?;
    log::debug!("{cfg:?}");

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(cfg, args.enable_cors),
        Command::Export { user_id, output } => {
            let storage = storage::open(&cfg.db);
            let count = transfer::export(&storage, &user_id, output.as_deref())?;
            log::info!("Exported {count} location(s) of user {user_id}");
            Ok(())
        }
        Command::Import { user_id, file } => {
            let storage = storage::open(&cfg.db);
            let summary = transfer::import(&storage, &user_id, &file)?;
            log::info!(
                "Imported {} location(s) of user {user_id} ({} new, {} updated)",
                summary.total(),
                summary.created,
                summary.updated
            );
            Ok(())
        }
    }
}

fn serve(cfg: config::Config, enable_cors: bool) -> Result<()> {
    let storage = storage::open(&cfg.db);
    let (gateways, photo_storage) = gateways::gateways(&cfg);
    let jwt_state = JwtState::new(cfg.auth.jwt_secret.as_deref());

    let config::Config {
        webserver,
        geocoding,
        ..
    } = cfg;
    let environment = match webserver.environment {
        config::Environment::Production => Environment::Production,
        config::Environment::Development => Environment::Development,
    };
    let web_cfg = Cfg {
        address: webserver.address,
        port: webserver.port,
        frontend_url: webserver.frontend_url,
        environment,
        enable_cors: enable_cors || webserver.enable_cors,
        resolve_addresses: geocoding.enabled,
        photo_storage,
    };
    log::info!(
        "Start {} server on {}:{} (storage: {})",
        if environment.is_development() {
            "development"
        } else {
            "production"
        },
        web_cfg.address,
        web_cfg.port,
        storage.source()
    );
    rocket::execute(lonb_webserver::run(web_cfg, storage, gateways, jwt_state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory as _;

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn serve_by_default() {
        let args = Args::try_parse_from(["lonb", "--enable-cors"]).unwrap();
        assert!(args.enable_cors);
        assert!(args.command.is_none());
    }

    #[test]
    fn parse_export_and_import() {
        let args =
            Args::try_parse_from(["lonb", "export", "--user-id", "42", "-o", "out.json"]).unwrap();
        assert!(matches!(
            args.command,
            Some(Command::Export { user_id, output: Some(_) }) if user_id == "42"
        ));
        let args = Args::try_parse_from(["lonb", "import", "--user-id", "42", "in.json"]).unwrap();
        assert!(matches!(args.command, Some(Command::Import { .. })));
        assert!(Args::try_parse_from(["lonb", "import", "in.json"]).is_err());
    }
}
