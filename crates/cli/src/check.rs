use std::sync::Arc;
use tabled::{Table, Tabled};
use waypost_core::config::AppConfig;
use waypost_core::features::FeatureScanner;
use waypost_plugin::FileNameMatcher;

#[derive(Tabled)]
struct ModuleRow {
    #[tabled(rename = "Module")]
    module: String,
    #[tabled(rename = "Fragments")]
    fragments: usize,
    #[tabled(rename = "Paths")]
    paths: String,
}

pub fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let matcher = FileNameMatcher::new(&config.route_file_pattern)?;
    let scanner = FeatureScanner::new(&config.features_dir).with_matcher(Arc::new(matcher));

    let result = scanner.scan()?;
    let rows: Vec<ModuleRow> = result
        .features
        .iter()
        .map(|feature| ModuleRow {
            module: feature
                .source
                .strip_prefix(scanner.root())
                .unwrap_or(&feature.source)
                .display()
                .to_string(),
            fragments: feature.fragments.iter().map(|f| f.subtree_len()).sum(),
            paths: feature
                .fragments
                .iter()
                .map(|f| f.path.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect();

    if rows.is_empty() {
        println!(
            "No route modules matching '{}' under {}.",
            config.route_file_pattern,
            config.features_dir.display()
        );
        return Ok(());
    }

    println!("{}", Table::new(rows));
    println!(
        "{} module(s), {} top-level fragment(s), scanned in {:?}",
        result.features.len(),
        result.total_fragments(),
        result.duration
    );
    Ok(())
}
