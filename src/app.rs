use crate::cli::{Cli, Commands, FormatArg, ReportFormat};
use crate::errors::GraphError;
use crate::graph::GraphModel;
use crate::parser::RecordParser;
use crate::processor::{compare_graphs, squash_versions, Comparison, GraphProcessor, ProcessOptions, StyleRule, VersionSquash};
use crate::utils::config::{load_config_at, load_config_near, Config};
use crate::visualization::{
    DotFormatter, GraphFormatter, GraphmlFormatter, OutputFormat, RenderOptions, TraversalRenderer,
};
use clap::CommandFactory;
use clap_complete::generate;
use std::collections::HashSet;
use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

/// Run the CLI logic in-process.
///
/// Returns an exit code (0 = success). Errors are reported on stderr.
#[must_use]
pub fn run_cli(cli: Cli) -> i32 {
    let result = match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = crate::cli::Cli::command();
            let bin_name = env!("CARGO_PKG_NAME");
            let mut out = io::stdout();
            generate(shell, &mut cmd, bin_name, &mut out);
            Ok(())
        }
        Commands::Render { input, output, root, suppress_roots, format, config } => {
            run_render(&input, output.as_deref(), RenderOptions { root, suppress_roots }, format, config.as_deref())
        }
        Commands::Merge {
            inputs,
            output,
            squash_versions,
            squash_components,
            analyze,
            highlight_pattern,
            styles,
            format,
            config,
        } => run_merge(&MergeArgs {
            inputs: &inputs,
            output: output.as_deref(),
            squash_versions,
            squash_components: squash_components.map(usize::from),
            analyze,
            highlight_pattern: highlight_pattern.as_deref(),
            styles: styles.as_deref(),
            format,
            config: config.as_deref(),
        }),
        Commands::Compare { inputs, squash_versions, squash_components, format, config } => run_compare(
            &inputs,
            squash_versions,
            squash_components.map(usize::from),
            format,
            config.as_deref(),
        ),
    };
    match result {
        Ok(()) => 0,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("Error: {e}");
            1
        }
    }
}

struct MergeArgs<'a> {
    inputs: &'a [PathBuf],
    output: Option<&'a Path>,
    squash_versions: bool,
    squash_components: Option<usize>,
    analyze: bool,
    highlight_pattern: Option<&'a str>,
    styles: Option<&'a Path>,
    format: Option<FormatArg>,
    config: Option<&'a Path>,
}

fn run_render(
    input: &Path,
    output: Option<&Path>,
    options: RenderOptions,
    format: Option<FormatArg>,
    config: Option<&Path>,
) -> Result<(), GraphError> {
    let cfg = resolve_config(config)?;
    ensure_distinct(std::slice::from_ref(&input.to_path_buf()), output)?;
    let graph = RecordParser::parse_file(input)?;
    let formatter = make_formatter(resolve_format(format, &cfg), &cfg);
    let rendered = TraversalRenderer::new(options).render(&graph, formatter.as_ref());
    write_output(output, &rendered)
}

fn run_merge(args: &MergeArgs<'_>) -> Result<(), GraphError> {
    let cfg = resolve_config(args.config)?;
    let opts = ProcessOptions {
        squash_versions: args.squash_versions,
        analyze: args.analyze,
        squash: squash_settings(args.squash_components, &cfg),
    };
    opts.validate(args.inputs.len())?;
    ensure_distinct(args.inputs, args.output)?;

    let mut rules = match args.styles {
        Some(path) => StyleRule::from_json_file(path)?,
        None => Vec::new(),
    };
    // highlighting always runs after every other rule
    if let Some(pattern) = args.highlight_pattern {
        rules.push(StyleRule::highlight(pattern)?);
    }

    let graphs = parse_all(args.inputs)?;
    let merged = GraphProcessor::new(rules).process(graphs, &opts)?;
    let formatter = make_formatter(resolve_format(args.format, &cfg), &cfg);
    let rendered = TraversalRenderer::render_flat(&merged, formatter.as_ref());
    write_output(args.output, &rendered)
}

fn run_compare(
    inputs: &[PathBuf],
    squash: bool,
    squash_components: Option<usize>,
    format: ReportFormat,
    config: Option<&Path>,
) -> Result<(), GraphError> {
    let cfg = resolve_config(config)?;
    if inputs.len() < 2 {
        return Err(GraphError::TooFewInputs { flag: "compare" });
    }
    let mut graphs = parse_all(inputs)?;
    let mut seen = HashSet::new();
    if let Some(dup) = graphs.iter().find(|g| !seen.insert(g.name.as_str())) {
        return Err(GraphError::DuplicateGraph(dup.name.clone()));
    }
    if squash {
        let settings = squash_settings(squash_components, &cfg);
        for g in &mut graphs {
            squash_versions(g, &settings);
        }
    }
    let cmp = compare_graphs(&graphs);
    let report = match format {
        ReportFormat::Json => serde_json::to_string_pretty(&cmp)?,
        ReportFormat::Text => comparison_table(&cmp, &graphs),
    };
    write_output(None, &report)
}

fn comparison_table(cmp: &Comparison, graphs: &[GraphModel]) -> String {
    let rows: Vec<Vec<String>> = graphs
        .iter()
        .map(|g| {
            let unique = cmp.unique.get(&g.name).map_or(0, |s| s.len());
            vec![g.name.clone(), g.touched_nodes().len().to_string(), unique.to_string()]
        })
        .collect();
    let mut out = crate::utils::table::render(&["Graph", "Nodes", "Unique"], &rows);
    let _ = writeln!(out, "\n\nShared by all ({}):", cmp.intersection.len());
    for name in &cmp.intersection {
        let _ = writeln!(out, "  {name}");
    }
    for (graph, names) in cmp.unique.iter().filter(|(_, names)| !names.is_empty()) {
        let _ = writeln!(out, "\nOnly in {graph}:");
        for name in names {
            let _ = writeln!(out, "  {name}");
        }
    }
    out
}

fn resolve_config(explicit: Option<&Path>) -> Result<Config, GraphError> {
    if let Some(path) = explicit {
        return load_config_at(path);
    }
    let cwd = std::env::current_dir()?;
    Ok(load_config_near(&cwd)?.unwrap_or_default())
}

fn resolve_format(flag: Option<FormatArg>, cfg: &Config) -> OutputFormat {
    flag.map(OutputFormat::from).or_else(|| cfg.default_format()).unwrap_or_default()
}

fn squash_settings(components: Option<usize>, cfg: &Config) -> VersionSquash {
    let mut squash = VersionSquash::default();
    if let Some(n) = components.or_else(|| cfg.squash_components()) {
        squash.components = n.max(1);
    }
    squash
}

fn make_formatter(format: OutputFormat, cfg: &Config) -> Box<dyn GraphFormatter> {
    match format {
        OutputFormat::Dot => Box::new(DotFormatter::new(cfg.dot_options())),
        OutputFormat::Graphml => Box::new(GraphmlFormatter::new(cfg.graphml_options())),
    }
}

fn parse_all(inputs: &[PathBuf]) -> Result<Vec<GraphModel>, GraphError> {
    inputs.iter().map(|p| RecordParser::parse_file(p)).collect()
}

// Compares canonical paths when both exist so `./a.txt` and `a.txt` collide.
fn ensure_distinct(inputs: &[PathBuf], output: Option<&Path>) -> Result<(), GraphError> {
    let Some(output) = output else {
        return Ok(());
    };
    let out_canon = fs::canonicalize(output).ok();
    for input in inputs {
        let same = input.as_path() == output
            || (out_canon.is_some() && fs::canonicalize(input).ok() == out_canon);
        if same {
            return Err(GraphError::SameInputOutput(output.to_path_buf()));
        }
    }
    Ok(())
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), GraphError> {
    match output {
        Some(path) => {
            fs::write(path, content)?;
            tracing::info!(path = %path.display(), bytes = content.len(), "wrote output");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
