//! FBX CLI - Tool for inspecting binary FBX files.

use fbx::binary::{ArrayValue, PropertyValue};
use fbx::geom::MeshGeometry;
use fbx::scene::object_name;
use fbx::{Document, Node, Value};
use rayon::prelude::*;
use std::env;
use std::path::Path;
use std::time::Instant;

/// Longest string shown verbatim in tree output.
const MAX_STRING_PREVIEW: usize = 48;

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut level = "info";
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => level = "debug",
            "-vv" | "--trace" => level = "trace",
            "-q" | "--quiet" => level = "warn",
            _ => filtered_args.push(arg),
        }
    }
    init_logging(level);

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    match filtered_args[0] {
        // Info command - show file summary
        "info" | "i" => {
            let files = require_files(&filtered_args, "info <file.fbx>...");
            for path in files {
                cmd_info(path);
            }
        }

        // Tree command - show record hierarchy
        "tree" | "t" => {
            let files = require_files(&filtered_args, "tree <file.fbx>");
            cmd_tree(files[0]);
        }

        // Stats command - mesh statistics, files parsed in parallel
        "stats" | "s" => {
            let files = require_files(&filtered_args, "stats <file.fbx>...");
            cmd_stats(files);
        }

        // Json command - dump the record tree
        "json" | "j" => {
            let files = require_files(&filtered_args, "json <file.fbx>");
            cmd_json(files[0]);
        }

        "version" | "-V" | "--version" => print_version(),

        // Help
        "help" | "h" | "-h" | "--help" => print_help(),

        // Default: if file exists, show info; otherwise error
        _ => {
            if Path::new(filtered_args[0]).exists() {
                cmd_info(filtered_args[0]);
            } else {
                eprintln!("Unknown command: {}", filtered_args[0]);
                eprintln!();
                print_help();
                std::process::exit(1);
            }
        }
    }
}

/// Install the log subscriber. `RUST_LOG` takes precedence over `level`.
fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn require_files<'a>(args: &[&'a str], usage: &str) -> Vec<&'a str> {
    if args.len() < 2 {
        eprintln!("Error: missing file argument");
        eprintln!("Usage: fbx-cli {}", usage);
        std::process::exit(1);
    }
    args[1..].to_vec()
}

fn print_help() {
    println!("fbx-cli - binary FBX inspection tool");
    println!();
    println!("USAGE:");
    println!("    fbx-cli [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    i, info   <file>...           Show version, top-level records and object counts");
    println!("    t, tree   <file>              Show full record hierarchy");
    println!("    s, stats  <file>...           Show per-mesh statistics (files parsed in parallel)");
    println!("    j, json   <file>              Dump the record tree as JSON");
    println!("    version                       Show version and build date");
    println!("    h, help                       Show this help");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose    Show debug output");
    println!("    -vv, --trace     Show trace output (very verbose)");
    println!("    -q, --quiet      Only show warnings and errors");
    println!();
    println!("EXAMPLES:");
    println!("    fbx-cli info cube.fbx                 # Quick overview");
    println!("    fbx-cli tree character.fbx            # See hierarchy");
    println!("    fbx-cli stats *.fbx                   # Mesh counts for many files");
    println!("    fbx-cli -q json scene.fbx > tree.json");
    println!();
    println!("NOTES:");
    println!("    - Passing a .fbx file directly is equivalent to 'info'");
    println!("    - RUST_LOG overrides the -q/-v/-vv level");
}

fn print_version() {
    println!(
        "fbx-cli {} (built {} {})",
        env!("CARGO_PKG_VERSION"),
        env!("FBX_BUILD_DATE"),
        env!("FBX_BUILD_TIME")
    );
}

fn open_or_exit(path: &str) -> Document {
    tracing::info!("Opening file: {}", path);
    match Document::open(path) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("Failed to open {}: {}", path, e);
            std::process::exit(1);
        }
    }
}

fn cmd_info(path: &str) {
    let doc = open_or_exit(path);

    println!("File: {}", path);
    println!("Version: {}", doc.version());
    println!("Records: {}", doc.len() - 1);
    println!();

    println!("Top-level records:");
    for child in doc.root().children() {
        println!("  {:<24} {} children", child.name(), child.num_children());
    }
    println!();

    let objects = doc.objects().map(|o| o.num_children()).unwrap_or(0);
    println!("Objects:     {}", objects);
    println!("Geometries:  {}", doc.geometries().len());
    println!("Connections: {}", doc.connections().len());
}

fn cmd_tree(path: &str) {
    let doc = open_or_exit(path);

    println!("File: {} (version {})", path, doc.version());
    println!();

    for child in doc.root().children() {
        print_tree(child, 0);
    }
}

fn print_tree(node: Node<'_>, depth: usize) {
    let indent = "  ".repeat(depth);

    let attributes: Vec<String> = node.attributes().iter().map(summarize).collect();
    if attributes.is_empty() {
        println!("{}{}", indent, node.name());
    } else {
        println!("{}{} [{}]", indent, node.name(), attributes.join(", "));
    }

    for property in node.properties() {
        println!("{}  {} = {}", indent, property.name, summarize_value(&property.value));
    }

    for child in node.children() {
        print_tree(child, depth + 1);
    }
}

fn summarize_value(value: &Value) -> String {
    match value {
        Value::Single(v) => summarize(v),
        Value::List(values) => {
            let parts: Vec<String> = values.iter().map(summarize).collect();
            format!("[{}]", parts.join(", "))
        }
    }
}

/// Short one-line rendering of a value.
fn summarize(value: &PropertyValue) -> String {
    match value {
        PropertyValue::Bool(v) => v.to_string(),
        PropertyValue::Int16(v) => v.to_string(),
        PropertyValue::Int32(v) => v.to_string(),
        PropertyValue::Int64(v) => v.to_string(),
        PropertyValue::Float32(v) => v.to_string(),
        PropertyValue::Float64(v) => v.to_string(),
        PropertyValue::String(s) => {
            let s = s.replace("\u{0}\u{1}", "::");
            if s.chars().count() > MAX_STRING_PREVIEW {
                let head: String = s.chars().take(MAX_STRING_PREVIEW).collect();
                format!("\"{}...\"", head)
            } else {
                format!("\"{}\"", s)
            }
        }
        PropertyValue::Raw(bytes) => format!("<{} bytes>", bytes.len()),
        PropertyValue::Array(array) => {
            format!("{}[{}]", array.type_name().trim_end_matches("[]"), array.len())
        }
    }
}

/// Per-file result of the stats command.
struct FileStats {
    version: u32,
    records: usize,
    meshes: Vec<MeshGeometry>,
    elapsed_ms: f64,
}

fn collect_stats(path: &str) -> fbx::Result<FileStats> {
    let start = Instant::now();
    let doc = Document::open(path)?;
    let meshes = doc.meshes()?;
    Ok(FileStats {
        version: doc.version(),
        records: doc.len() - 1,
        meshes,
        elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
    })
}

fn cmd_stats(paths: Vec<&str>) {
    // Each parse owns its buffer and tree, nothing is shared between files
    let results: Vec<(&str, fbx::Result<FileStats>)> = paths
        .par_iter()
        .map(|&path| (path, collect_stats(path)))
        .collect();

    let mut failed = false;
    for (path, result) in results {
        match result {
            Ok(stats) => print_stats(path, &stats),
            Err(e) => {
                eprintln!("Failed to read {}: {}", path, e);
                failed = true;
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
}

fn print_stats(path: &str, stats: &FileStats) {
    println!("File: {}", path);
    println!("Version: {}  Records: {}  Parsed in {:.2} ms", stats.version, stats.records, stats.elapsed_ms);

    let mut total_vertices = 0;
    let mut total_triangles = 0;
    for mesh in &stats.meshes {
        total_vertices += mesh.num_vertices();
        total_triangles += mesh.num_triangles();

        let mut extras = Vec::new();
        if mesh.has_normals() {
            extras.push("normals");
        }
        if mesh.has_uvs() {
            extras.push("uvs");
        }

        let bounds = match mesh.bounds() {
            Some((min, max)) => format!(
                " bounds ({:.3}, {:.3}, {:.3})..({:.3}, {:.3}, {:.3})",
                min.x, min.y, min.z, max.x, max.y, max.z
            ),
            None => String::new(),
        };

        println!(
            "  {:<24} {} verts, {} polys, {} tris{}{}",
            mesh.name,
            mesh.num_vertices(),
            mesh.num_polygons(),
            mesh.num_triangles(),
            if extras.is_empty() { String::new() } else { format!(" [{}]", extras.join(", ")) },
            bounds
        );
    }
    println!(
        "  Total: {} meshes, {} vertices, {} triangles",
        stats.meshes.len(),
        total_vertices,
        total_triangles
    );
    println!();
}

fn cmd_json(path: &str) {
    let doc = open_or_exit(path);

    let children: Vec<serde_json::Value> = doc.root().children().map(node_to_json).collect();
    let out = serde_json::json!({
        "file": path,
        "version": doc.version(),
        "children": children,
    });

    match serde_json::to_string_pretty(&out) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Failed to serialize {}: {}", path, e);
            std::process::exit(1);
        }
    }
}

fn node_to_json(node: Node<'_>) -> serde_json::Value {
    let mut out = serde_json::json!({
        "name": node.name(),
        "attributes": node.attributes().iter().map(value_to_json).collect::<Vec<_>>(),
    });

    if let Some(name) = object_name(node) {
        out["object"] = serde_json::json!(name);
    }

    if !node.properties().is_empty() {
        let properties: Vec<serde_json::Value> = node
            .properties()
            .iter()
            .map(|p| {
                let value = match &p.value {
                    Value::Single(v) => value_to_json(v),
                    Value::List(values) => values.iter().map(value_to_json).collect(),
                };
                serde_json::json!({ "name": p.name, "value": value })
            })
            .collect();
        out["properties"] = serde_json::Value::Array(properties);
    }

    if node.num_children() > 0 {
        out["children"] = node.children().map(node_to_json).collect();
    }

    out
}

fn value_to_json(value: &PropertyValue) -> serde_json::Value {
    match value {
        PropertyValue::Bool(v) => serde_json::json!(v),
        PropertyValue::Int16(v) => serde_json::json!(v),
        PropertyValue::Int32(v) => serde_json::json!(v),
        PropertyValue::Int64(v) => serde_json::json!(v),
        PropertyValue::Float32(v) => serde_json::json!(v),
        PropertyValue::Float64(v) => serde_json::json!(v),
        PropertyValue::String(s) => serde_json::json!(s),
        PropertyValue::Raw(bytes) => serde_json::json!({ "raw": bytes.len() }),
        PropertyValue::Array(array) => match array {
            ArrayValue::Bool(v) => serde_json::json!(v),
            ArrayValue::Int32(v) => serde_json::json!(v),
            ArrayValue::Int64(v) => serde_json::json!(v),
            ArrayValue::Float32(v) => serde_json::json!(v),
            ArrayValue::Float64(v) => serde_json::json!(v),
            ArrayValue::Untyped => serde_json::Value::Null,
        },
    }
}
