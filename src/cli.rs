use std::path::Path;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::{error, info, warn};

use circuitview::{
    draw_circuit, generate_dataset, load_dataset, preset, presets, CircuitStyle, DatasetWriter,
    parse_head_list, EdgeColoring, EdgeFilter, GraphDataset, HeadBounds, RenderOptions,
    SampleConfig, SvgSurface, Theme, ThemeManager,
};

/// Define the render subcommand.
fn render_subcommand() -> Command {
    Command::new("render")
        .about("Render an attention dataset (JSON or .json.br) to an SVG file")
        .arg(Arg::new("INPUT")
            .help("Attention dataset file")
            .required(true)
            .index(1))
        .arg(Arg::new("OUTPUT")
            .help("Output SVG file")
            .required(true)
            .index(2))
        .arg(Arg::new("width")
            .long("width")
            .short('W')
            .value_name("PX")
            .help("Canvas width in pixels")
            .default_value("1000")
            .value_parser(clap::value_parser!(u32)))
        .arg(Arg::new("height")
            .long("height")
            .short('H')
            .value_name("PX")
            .help("Canvas height in pixels")
            .default_value("700")
            .value_parser(clap::value_parser!(u32)))
        .arg(Arg::new("threshold")
            .long("threshold")
            .short('t')
            .value_name("FLOAT")
            .help("Hide edges with a weight below this value")
            .default_value("0.0")
            .value_parser(clap::value_parser!(f64)))
        .arg(Arg::new("model")
            .long("model")
            .short('m')
            .value_name("NAME")
            .help("Model preset providing head groups (see `models`)"))
        .arg(Arg::new("coloring")
            .long("coloring")
            .short('c')
            .value_name("MODE")
            .help("Edge coloring: uniform|head|group")
            .default_value("uniform")
            .value_parser(["uniform", "head", "group"]))
        .arg(Arg::new("heads")
            .long("heads")
            .value_name("LIST")
            .help("Only draw these heads plus the --model groups, e.g. 9.9,10.0 or 10.: for a whole layer"))
        .arg(Arg::new("legend")
            .long("legend")
            .help("Draw a legend of head groups and --heads (with --coloring head|group)")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("theme")
            .long("theme")
            .value_name("NAME")
            .help("Color theme: Light|Dark|Dracula")
            .default_value("Light"))
}

/// Define the generate subcommand.
fn generate_subcommand() -> Command {
    Command::new("generate")
        .about("Generate a synthetic attention dataset")
        .arg(Arg::new("OUTPUT")
            .help("Output dataset file; a .br suffix enables brotli compression")
            .required(true)
            .index(1))
        .arg(Arg::new("model")
            .long("model")
            .short('m')
            .value_name("NAME")
            .help("Model preset providing layers, heads and the default prompt"))
        .arg(Arg::new("text")
            .long("text")
            .value_name("STRING")
            .help("Prompt whose whitespace-separated words become the tokens"))
        .arg(Arg::new("layers")
            .long("layers")
            .short('l')
            .value_name("INT")
            .help("Number of layers")
            .value_parser(clap::value_parser!(i64)))
        .arg(Arg::new("heads")
            .long("heads")
            .value_name("INT")
            .help("Number of heads per layer")
            .value_parser(clap::value_parser!(i64)))
        .arg(Arg::new("seed")
            .long("seed")
            .short('s')
            .value_name("INT")
            .help("Random seed")
            .default_value("42")
            .value_parser(clap::value_parser!(u64)))
}

fn models_subcommand() -> Command {
    Command::new("models").about("List the built-in model presets")
}

fn edge_coloring(mode: &str, model: Option<&String>) -> Result<EdgeColoring> {
    match mode {
        "head" => Ok(EdgeColoring::ByHead),
        "group" => {
            let name = model.context("--coloring group requires --model")?;
            let preset = preset(name)
                .with_context(|| format!("Unknown model preset: {name}"))?;
            Ok(EdgeColoring::ByGroup(preset.groups.clone()))
        }
        _ => Ok(EdgeColoring::Uniform),
    }
}

/// Build the render options for `dataset` from the render arguments.
fn render_options(matches: &ArgMatches, dataset: &GraphDataset, theme: &Theme) -> Result<RenderOptions> {
    let threshold = *matches.get_one::<f64>("threshold").context("missing threshold")?;
    let mode = matches.get_one::<String>("coloring").context("missing coloring")?;
    let coloring = edge_coloring(mode, matches.get_one::<String>("model"))?;

    let mut filter = EdgeFilter::with_threshold(threshold);
    let mut individual_heads = Vec::new();
    if let Some(spec) = matches.get_one::<String>("heads") {
        individual_heads = parse_head_list(spec, HeadBounds::of_dataset(dataset))
            .context("Invalid --heads")?;

        let mut visible = individual_heads.clone();
        if let Some(model) = matches.get_one::<String>("model").and_then(|name| preset(name)) {
            visible.extend(model.groups.iter().flat_map(|g| g.heads.iter().copied()));
        }
        info!("🔎 Showing {} heads", visible.len());
        filter = filter.with_visible_heads(visible);
    }

    Ok(RenderOptions {
        filter,
        coloring,
        legend: matches.get_flag("legend"),
        individual_heads,
        style: CircuitStyle::from_theme(theme),
        ..Default::default()
    })
}

/// Run the render command with the provided arguments
fn run_render_command(matches: &ArgMatches) -> Result<()> {
    let input = matches.get_one::<String>("INPUT").context("missing INPUT")?;
    let output = matches.get_one::<String>("OUTPUT").context("missing OUTPUT")?;
    let width = *matches.get_one::<u32>("width").context("missing width")?;
    let height = *matches.get_one::<u32>("height").context("missing height")?;
    let theme_name = matches.get_one::<String>("theme").context("missing theme")?;

    let themes = ThemeManager::new();
    let theme = themes
        .get_theme(theme_name)
        .with_context(|| format!("Unknown theme: {theme_name}"))?;

    info!("📁 Dataset: {input}");
    let dataset = load_dataset(input)?;
    let options = render_options(matches, &dataset, theme)?;

    let mut surface = SvgSurface::new(width, height).with_background(theme.colors.background);
    let stats = draw_circuit(&mut surface, &dataset, width, height, &options)?;

    if stats.edges_skipped > 0 {
        warn!("{} edges reference positions outside the {}x{} grid and were skipped",
            stats.edges_skipped, dataset.num_layers, dataset.num_tokens);
    }

    let mut writer = DatasetWriter::new(output)?;
    writer.write_str(&surface.to_svg())?;

    info!("🖼  Wrote {output} ({width}x{height}): {} nodes, {} edges, {} filtered",
        stats.nodes, stats.edges_drawn, stats.edges_filtered);
    Ok(())
}

/// Run the generate command with the provided arguments
fn run_generate_command(matches: &ArgMatches) -> Result<()> {
    let output = matches.get_one::<String>("OUTPUT").context("missing OUTPUT")?;
    let seed = *matches.get_one::<u64>("seed").context("missing seed")?;

    let mut config = match matches.get_one::<String>("model") {
        Some(name) => {
            let preset = preset(name)
                .with_context(|| format!("Unknown model preset: {name}"))?;
            SampleConfig::from_preset(preset, seed)
        }
        None => SampleConfig { seed, ..SampleConfig::default() },
    };

    if let Some(text) = matches.get_one::<String>("text") {
        config.tokens = text.split_whitespace().map(str::to_string).collect();
    }
    if let Some(layers) = matches.get_one::<i64>("layers") {
        config.num_layers = *layers;
    }
    if let Some(heads) = matches.get_one::<i64>("heads") {
        config.num_heads = *heads;
    }
    if config.tokens.is_empty() {
        anyhow::bail!("At least one token is required");
    }

    let dataset = generate_dataset(&config);

    if let Some(parent) = Path::new(output).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            anyhow::bail!("Output directory does not exist: {}", parent.display());
        }
    }

    let mut writer = DatasetWriter::new(output)?;
    writer.write_json(&dataset)?;

    info!("🎲 Wrote {output}: {} layers, {} tokens, {} edges (seed {seed})",
        dataset.num_layers, dataset.num_tokens, dataset.attention_patterns.len());
    Ok(())
}

fn run_models_command() -> Result<()> {
    for preset in presets() {
        info!("{} ({} layers, {} heads)", preset.name, preset.num_layers, preset.num_heads);
        for group in &preset.groups {
            let heads: Vec<String> = group.heads.iter()
                .map(|h| format!("{}.{}", h.layer, h.head))
                .collect();
            info!("  {:<18} {}", group.name, heads.join(" "));
        }
    }
    Ok(())
}

fn execute_commands() -> Result<()> {
    // Initialize logger with clean format (no timestamp/module prefix)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "{}", record.args())
        })
        .init();

    let matches = Command::new("circuit")
        .about("Circuit view: render transformer attention patterns as layer/token graphs")
        .subcommand(render_subcommand())
        .subcommand(generate_subcommand())
        .subcommand(models_subcommand())
        .get_matches();

    match matches.subcommand() {
        Some(("render", matches)) => run_render_command(matches),
        Some(("generate", matches)) => run_generate_command(matches),
        Some(("models", _)) => run_models_command(),
        _ => anyhow::bail!("No subcommand specified. Use -h to print help information."),
    }
}

fn main() {
    if let Err(e) = execute_commands() {
        error!("Error: {e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use circuitview::HeadPair;

    fn options_for(args: &[&str], dataset: &GraphDataset) -> Result<RenderOptions> {
        let matches = render_subcommand()
            .try_get_matches_from(["render", "in.json", "out.svg"].iter().chain(args).copied())?;
        let themes = ThemeManager::new();
        render_options(&matches, dataset, themes.get_theme("Light").context("no Light theme")?)
    }

    fn gpt2_sized() -> GraphDataset {
        let mut dataset = GraphDataset::new(12, 3);
        dataset.num_heads = Some(12);
        dataset
    }

    #[test]
    fn test_heads_restrict_visible_set() {
        let options = options_for(&["--heads", "9.9,10.0"], &gpt2_sized()).unwrap();
        let visible = options.filter.visible_heads.unwrap();
        assert_eq!(visible.len(), 2);
        assert!(visible.contains(&HeadPair::new(10, 0)));
        assert_eq!(options.individual_heads, vec![HeadPair::new(9, 9), HeadPair::new(10, 0)]);
    }

    #[test]
    fn test_heads_join_model_groups() {
        let options = options_for(
            &["--heads", "1.1", "--model", "gpt2-small", "--coloring", "group", "--legend"],
            &gpt2_sized(),
        ).unwrap();
        let visible = options.filter.visible_heads.unwrap();
        assert!(visible.contains(&HeadPair::new(1, 1)));
        assert!(visible.contains(&HeadPair::new(9, 9)));
        assert!(!visible.contains(&HeadPair::new(1, 2)));
        assert!(options.legend);
    }

    #[test]
    fn test_without_heads_nothing_is_hidden() {
        let options = options_for(&["--model", "gpt2-small"], &gpt2_sized()).unwrap();
        assert!(options.filter.visible_heads.is_none());
        assert!(options.individual_heads.is_empty());
    }

    #[test]
    fn test_out_of_range_heads_rejected() {
        let err = options_for(&["--heads", "12.0"], &gpt2_sized()).unwrap_err();
        assert!(format!("{:#}", err).contains("layer 12 out of range"));
    }
}
