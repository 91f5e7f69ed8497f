use anyhow::{Context, bail};
use log::*;

use shader_argument_paths::address::{resolve_local_offset, resolve_local_slot};
use shader_argument_paths::path_index::describe_categories;
use shader_argument_paths::reflection::{ReflectedFunction, load_reflection_json};
use shader_argument_paths::{PathIndex, SymbolicPath};

const USAGE: &str = "usage: inspect_bindings <reflection.json> [function] [path]";

/// Lists the binding paths of reflected functions, or resolves one path to its
/// slot index and byte offset.
pub fn main() -> Result<(), anyhow::Error> {
    pretty_env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(json_path) = args.next() else {
        bail!(USAGE);
    };
    let function_name = args.next();
    let path = args.next();

    let reflection = load_reflection_json(&json_path)?;
    info!(
        "loaded {} functions from {}",
        reflection.functions.len(),
        reflection.source_file_name
    );

    let Some(function_name) = function_name else {
        for function in &reflection.functions {
            list_paths(function)?;
        }
        return Ok(());
    };

    let function = reflection
        .function(&function_name)
        .with_context(|| format!("no function named '{function_name}' in {json_path}"))?;

    match path {
        None => list_paths(function),
        Some(path) => resolve_path(function, &path),
    }
}

fn list_paths(function: &ReflectedFunction) -> Result<(), anyhow::Error> {
    let index = PathIndex::new(&function.arguments)
        .with_context(|| format!("failed to index function '{}'", function.name))?;

    println!("{} ({:?})", function.name, function.stage);
    for (path, categories) in index.paths() {
        println!("  {path}: {}", describe_categories(categories));
    }

    Ok(())
}

fn resolve_path(function: &ReflectedFunction, path: &str) -> Result<(), anyhow::Error> {
    let index = PathIndex::new(&function.arguments)
        .with_context(|| format!("failed to index function '{}'", function.name))?;
    let path: SymbolicPath = path.parse()?;

    let categories = index
        .resolve(&path)
        .with_context(|| format!("cannot resolve '{path}' in '{}'", function.name))?;
    let slot = resolve_local_slot(path.tokens(), categories)?;
    let (offset, anchor) = resolve_local_offset(path.tokens(), categories)?;

    println!("{path}");
    println!("  categories: {}", describe_categories(categories));
    match slot {
        Some(slot) => println!("  slot index: {slot}"),
        None => println!("  slot index: none (plain data in a buffer)"),
    }
    println!("  byte offset: {offset} (from {})", categories[anchor]);

    Ok(())
}
