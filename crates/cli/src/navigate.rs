use serde::{Deserialize, Serialize};
use std::sync::Arc;
use waypost_api::{Location, NavigationService, ResolvedRoute};
use waypost_core::config::AppConfig;
use waypost_plugin::{DynSlice, SliceDefinition};
use waypost_runtime::App;

/// Stand-in for the auth feature when running from the command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CliSession {
    signed_in: bool,
}

fn session_slice(config: &AppConfig, signed_in: bool) -> Arc<dyn DynSlice> {
    Arc::new(
        SliceDefinition::new(config.auth.slice.clone(), CliSession { signed_in })
            .accessor(config.auth.accessor.clone(), |s: &CliSession| s.signed_in)
            .build(),
    )
}

pub fn resolve(config: AppConfig, location: &str) -> Result<(), Box<dyn std::error::Error>> {
    let app = App::builder(config).build()?;
    let route = app.router().resolve(&Location::from(location))?;
    println!("{}", serde_json::to_string_pretty(&route)?);
    Ok(())
}

pub async fn run(
    config: AppConfig,
    authenticated: bool,
    urls: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = App::builder(config.clone());
    if authenticated {
        builder = builder.with_slice(session_slice(&config, true));
    }
    let app = builder.build()?;
    let router = app.router();

    for (step, url) in urls.iter().enumerate() {
        let outcome = if step == 0 {
            router.start(url).await
        } else {
            router.push(Location::from(url.as_str())).await
        };

        match outcome {
            Ok(route) => print_route(step + 1, url, &route, &router.url_for(&route)),
            Err(err) if err.is_recoverable() => {
                println!("{:>2}. {} -> blocked: {}", step + 1, url, err);
            }
            Err(err) => return Err(err.into()),
        }
    }

    let current = router.current_route();
    println!("\nCurrent route: {}", current.full_path);
    println!("History: {}", router.history_entries().join(" | "));
    Ok(())
}

fn print_route(step: usize, requested: &str, route: &ResolvedRoute, url: &str) {
    let component = route
        .component()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "<no match>".to_string());
    match &route.redirected_from {
        Some(origin) => println!(
            "{:>2}. {} -> {} (redirected from {}) [{}]",
            step, requested, url, origin, component
        ),
        None => println!("{:>2}. {} -> {} [{}]", step, requested, url, component),
    }
}
