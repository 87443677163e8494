use tabled::{Table, Tabled};
use waypost_core::config::AppConfig;

#[derive(Tabled)]
struct RouteRow {
    #[tabled(rename = "#")]
    order: usize,
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Meta")]
    meta: String,
}

pub fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let app = waypost_runtime::App::builder(config).build()?;
    let router = app.router();

    let rows: Vec<RouteRow> = router
        .routes()
        .enumerate()
        .map(|(i, record)| RouteRow {
            order: i + 1,
            path: record.path().to_string(),
            name: record.name.clone().unwrap_or_default(),
            target: match (&record.component, &record.redirect) {
                (_, Some(redirect)) => format!("-> {}", redirect),
                (Some(component), None) => component.to_string(),
                (None, None) => String::new(),
            },
            meta: if record.meta.is_empty() {
                String::new()
            } else {
                serde_json::Value::Object(record.meta.clone()).to_string()
            },
        })
        .collect();

    if rows.is_empty() {
        println!("No routes found under {}.", app.config().features_dir.display());
        return Ok(());
    }

    println!("{}", Table::new(rows));
    println!(
        "{} fragments from {} source(s), base '{}'",
        app.table().len(),
        app.table()
            .entries()
            .iter()
            .map(|e| e.source.to_string())
            .collect::<std::collections::BTreeSet<_>>()
            .len(),
        router.base_path()
    );
    Ok(())
}
