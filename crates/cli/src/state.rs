use tabled::{Table, Tabled};
use waypost_core::config::AppConfig;
use waypost_core::store::diagnostic_snapshot;

#[derive(Tabled)]
struct SliceRow {
    #[tabled(rename = "Slice")]
    name: String,
    #[tabled(rename = "Mutations")]
    mutations: String,
    #[tabled(rename = "Accessors")]
    accessors: String,
}

pub fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let app = waypost_runtime::App::builder(config)
        .expose_diagnostics()
        .build()?;
    let store = app.store();

    let mut rows = Vec::new();
    for name in store.names() {
        let slice = store.get_slice(&name)?;
        rows.push(SliceRow {
            name,
            mutations: slice.mutations().join(", "),
            accessors: slice.accessors().join(", "),
        });
    }
    println!("{}", Table::new(rows));

    let snapshot = diagnostic_snapshot().unwrap_or_else(|| store.snapshot());
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
