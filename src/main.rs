use anyhow::{Context, Result};
use catalog_bundle::bundle::write_json;
use catalog_bundle::index::{write_chunks, NodeLabel};
use catalog_bundle::{
    build_graph_payload, dump_bundle, load_bundle, parse_documents, vector_chunks, PipelineConfig,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(
    name = "catalog-bundle",
    version,
    about = "Extract a typed JSON bundle from the scripting API catalogs"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse both catalogs and write the bundle and its payloads
    Parse {
        /// JSON config file; flags and environment override its values
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Method catalog (api.txt)
        #[arg(long, env = "CATALOG_API_DOC")]
        api_doc: Option<PathBuf>,

        /// Type catalog (api_arg.txt)
        #[arg(long, env = "CATALOG_API_ARG")]
        api_arg: Option<PathBuf>,

        /// Output directory for generated artifacts
        #[arg(short, long, env = "CATALOG_OUTPUT_DIR")]
        output_dir: Option<PathBuf>,

        /// Skip the graph payload and vector chunks
        #[arg(long)]
        no_index: bool,

        /// Print the resolved configuration without reading or writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// Summarize a previously written bundle
    Inspect {
        /// Path to structured_api.json
        bundle: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Parse {
            config,
            api_doc,
            api_arg,
            output_dir,
            no_index,
            dry_run,
        } => {
            let base = match config {
                Some(path) => PipelineConfig::from_file(&path)?,
                None => PipelineConfig::default(),
            };
            let config = base.with_overrides(api_doc, api_arg, output_dir);
            if dry_run {
                let preview = serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
                println!("{}", preview);
                return Ok(());
            }
            run_parse(&config, !no_index)
        }
        Command::Inspect { bundle } => run_inspect(&bundle),
    }
}

fn run_parse(config: &PipelineConfig, with_index: bool) -> Result<()> {
    let start_time = Instant::now();
    println!("=== catalog-bundle: API catalog extraction ===\n");

    // Step 1: Parse both catalogs
    let step1_start = Instant::now();
    println!("Step 1: Parsing catalogs...");
    println!("  method catalog: {}", config.api_doc_path.display());
    println!("  type catalog:   {}", config.api_arg_path.display());
    let report = parse_documents(&config.api_doc_path, &config.api_arg_path)?;
    let bundle = &report.bundle;
    println!(
        "✓ {} type definitions, {} API entries, {} diagnostics [{:.2}s]\n",
        bundle.type_definitions.len(),
        bundle.api_entries.len(),
        report.diagnostics.len(),
        step1_start.elapsed().as_secs_f64()
    );

    for diagnostic in report.diagnostics.iter().take(5) {
        println!("  skipped {}", diagnostic);
    }
    if report.diagnostics.len() > 5 {
        println!("  ... and {} more\n", report.diagnostics.len() - 5);
    }

    // Step 2: Write bundle and diagnostics
    let step2_start = Instant::now();
    println!("Step 2: Writing bundle...");
    dump_bundle(bundle, &config.structured_output())?;
    write_json(&report.diagnostics, &config.diagnostics_output())?;
    println!(
        "✓ {} [{:.2}s]\n",
        config.structured_output().display(),
        step2_start.elapsed().as_secs_f64()
    );

    // Step 3: Index payloads
    if with_index {
        let step3_start = Instant::now();
        println!("Step 3: Building index payloads...");
        let payload = build_graph_payload(bundle);
        write_json(&payload, &config.graph_output())?;
        let chunks = vector_chunks(&bundle.api_entries);
        write_chunks(&chunks, &config.vector_output())?;
        println!(
            "✓ {} nodes, {} relationships, {} vector chunks [{:.2}s]\n",
            payload.nodes.len(),
            payload.relationships.len(),
            chunks.len(),
            step3_start.elapsed().as_secs_f64()
        );
    }

    println!(
        "=== Done in {:.2}s ===",
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}

fn run_inspect(path: &Path) -> Result<()> {
    let bundle = load_bundle(path)?;

    println!("Bundle: {}", path.display());
    println!("  checklist: {}", bundle.checklist.join(", "));
    println!("  API entries: {}", bundle.api_entries.len());
    for (object, count) in bundle.entries_per_object() {
        let object = if object.is_empty() { "(no object)" } else { object };
        println!("    {:<24} {}", object, count);
    }

    println!("  type definitions: {}", bundle.type_definitions.len());
    for type_def in &bundle.type_definitions {
        println!("    {}", type_def.name);
    }

    let payload = build_graph_payload(&bundle);
    println!(
        "  graph: {} methods, {} parameters, {} types",
        payload.count_label(NodeLabel::Method),
        payload.count_label(NodeLabel::Parameter),
        payload.count_label(NodeLabel::Type) + payload.count_label(NodeLabel::TypeDef)
    );
    Ok(())
}
