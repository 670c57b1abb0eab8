//! Logic import example
//!
//! This example demonstrates:
//! - Building an Importer from a schema file
//! - Attaching a custom function importer
//! - Converting logic expressions into query trees
//! - Reading the diagnostics of a partial import

use qtree_sdk::{ImporterBuilder, ImporterHook};
use serde_json::json;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    println!("=== Logic Import Example ===\n");

    // `{"now": []}` is the NOW function
    let now = ImporterHook::from_fn(|expr| {
        Ok(expr
            .get("now")
            .filter(|args| args.as_array().map_or(false, Vec::is_empty))
            .map(|_| Vec::new()))
    });

    let importer = ImporterBuilder::new()
        .with_schema_file("demos/schema.yaml")
        .with_func_importer("NOW", now)
        .deterministic_ids(true)
        .build()?;

    let expressions = vec![
        (
            "Range and list",
            json!({"and": [
                {"<=": [18, {"var": "age"}, 65]},
                {"in": [{"var": "country"}, ["FR", "DE"]]}
            ]}),
        ),
        (
            "Nested collection",
            json!({"and": [
                {"==": [{"var": "cars.vendor"}, "Toyota"]},
                {">": [{"var": "cars.year"}, 2010]}
            ]}),
        ),
        (
            "Count with filter",
            json!({">": [
                {"reduce": [
                    {"filter": [{"var": "cars"}, {"==": [{"var": "vendor"}, "Fiat"]}]},
                    {"+": [1, {"var": "accumulator"}]},
                    0
                ]},
                2
            ]}),
        ),
        (
            "Negation and functions",
            json!({"or": [
                {"!": {"==": [{"var": "name"}, "Bob"]}},
                {"<": [{"var": "signup"}, {"now": []}]}
            ]}),
        ),
        (
            "Partial import",
            json!({"and": [
                {"==": [{"var": "name"}, "Alice"]},
                {"==": [{"var": "nickname"}, "Al"]},
                {"foo": [1, 2, 3]}
            ]}),
        ),
    ];

    for (title, expr) in expressions {
        println!("--- {} ---", title);
        println!("Input: {}", expr);

        let outcome = importer.import(&expr);
        match &outcome.tree {
            Some(tree) => {
                println!("Nodes: {}", tree.node_count());
                println!("{}", serde_json::to_string_pretty(tree)?);
            }
            None => println!("No tree"),
        }

        if !outcome.is_clean() {
            println!("Diagnostics:");
            for diagnostic in &outcome.diagnostics {
                println!("  {}", diagnostic);
            }
        }
        println!();
    }

    Ok(())
}
