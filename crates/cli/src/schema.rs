use waypost_plugin::RouteExport;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("Route module (router.json) format:");
    println!("==================================");
    println!("The whole document is the module's default export: one route or an array of routes.");
    println!("A route needs a component, a redirect or children.\n");

    let example = serde_json::json!([
        {
            "path": "/admin",
            "component": "admin/Layout",
            "meta": { "requiresAuth": true },
            "children": [
                { "path": "users/:id", "name": "admin-user", "component": "admin/User" }
            ]
        },
        { "path": "/old-admin", "redirect": "/admin" }
    ]);
    println!("Example:");
    println!("{}", serde_json::to_string_pretty(&example)?);

    println!("\nJSON schema:");
    let schema = schemars::schema_for!(RouteExport);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
