mod check;
mod navigate;
mod routes;
mod schema;
mod state;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use waypost_core::config::AppConfig;

#[derive(Parser)]
#[command(
    name = "waypost",
    version,
    about = "Inspect and exercise the routes and state an app assembles from its feature modules",
    long_about = "Waypost discovers feature route modules, aggregates them into one router guarded by a \
                  single navigation guard, and registers feature state slices in a shared container. \
                  This tool runs the same bootstrap and lets you look at the result."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Where the app configuration comes from.
#[derive(Args, Clone, Debug)]
pub struct AppArgs {
    /// JSON configuration file
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Feature directory to scan (overrides the configuration)
    #[arg(long, value_name = "DIR")]
    pub features: Option<PathBuf>,
    /// Base path the app is served under (overrides BASE_URL)
    #[arg(long, value_name = "PATH")]
    pub base: Option<String>,
}

impl AppArgs {
    pub fn load(&self) -> waypost_runtime::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::from_env(),
        };
        if let Some(dir) = &self.features {
            config = config.with_features_dir(dir);
        }
        if let Some(base) = &self.base {
            config = config.with_base_path(base);
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the assembled route records in match order
    Routes {
        #[command(flatten)]
        app: AppArgs,
    },
    /// Validate every route module in the feature directory
    #[command(
        long_about = "Walks the feature directory in its deterministic order, loads every route module \
                            and validates its default export. Fails on the first broken module."
    )]
    Check {
        #[command(flatten)]
        app: AppArgs,
    },
    /// Resolve a location against the route table without navigating
    Resolve {
        #[command(flatten)]
        app: AppArgs,
        /// Path, query and hash, e.g. /users/42?tab=posts
        #[arg(value_name = "LOCATION")]
        location: String,
    },
    /// Start the app on the first URL and navigate through the rest
    #[command(
        long_about = "Boots the app, runs the initial navigation for the first URL and pushes every \
                            following one. Each step goes through the global guard, so protected routes \
                            redirect to the login page unless --authenticated is given."
    )]
    Navigate {
        #[command(flatten)]
        app: AppArgs,
        /// Register a signed-in session before the first navigation
        #[arg(long)]
        authenticated: bool,
        #[arg(value_name = "URL", required = true)]
        urls: Vec<String>,
    },
    /// Print the JSON schema of a route module
    Schema,
    /// Dump the state container after bootstrap
    State {
        #[command(flatten)]
        app: AppArgs,
    },
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let _guard = waypost_runtime::init_logging("cli", false);

    let rt = tokio::runtime::Runtime::new()?;

    match cli.command {
        Commands::Routes { app } => routes::run(app.load()?),
        Commands::Check { app } => check::run(app.load()?),
        Commands::Resolve { app, location } => navigate::resolve(app.load()?, &location),
        Commands::Navigate {
            app,
            authenticated,
            urls,
        } => rt.block_on(navigate::run(app.load()?, authenticated, urls)),
        Commands::Schema => schema::run(),
        Commands::State { app } => state::run(app.load()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_app_args_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("waypost.json");
        std::fs::write(&file, r#"{ "featuresDir": "from/file", "basePath": "/file" }"#).unwrap();

        let cli = Cli::try_parse_from([
            "waypost",
            "routes",
            "--config",
            file.to_str().unwrap(),
            "--features",
            "from/flag",
        ])
        .unwrap();
        let Commands::Routes { app } = cli.command else {
            panic!("expected the routes command");
        };
        let config = app.load().unwrap();
        assert_eq!(config.features_dir, PathBuf::from("from/flag"));
        assert_eq!(config.base_path, "/file");
    }

    #[test]
    fn test_navigate_requires_a_url() {
        assert!(Cli::try_parse_from(["waypost", "navigate"]).is_err());
        assert!(Cli::try_parse_from(["waypost", "navigate", "--authenticated", "/"]).is_ok());
    }
}
