use anyhow::{bail, Context};
use slidemap::{
    convert_presentation, init_logging, write_outputs, Config, OutputFormat, Presentation,
    BUILD_DATE, VERSION,
};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Default)]
struct Args {
    svg: bool,
    slides: Vec<usize>,
    config: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    document: Option<PathBuf>,
}

enum Parsed {
    Run(Args),
    Help,
    Version,
}

fn usage() -> &'static str {
    "slidemap\n\
\n\
USAGE:\n\
  slidemap [--svg] [--slide <n>]... [--config <file>] <output-dir> <document.json>\n\
\n\
OPTIONS:\n\
  --svg             Write one SVG per slide instead of GeoJSON layers\n\
  --slide <n>       Convert only slide <n> (1-based); may be repeated\n\
  --config <file>   Settings file (.toml or .json)\n\
  --version         Print version and build date\n\
  -h, --help        Print this help\n"
}

fn parse_args(argv: &[String]) -> anyhow::Result<Parsed> {
    let mut args = Args::default();
    let mut positional = Vec::new();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Ok(Parsed::Help),
            "--version" | "-V" => return Ok(Parsed::Version),
            "--svg" => args.svg = true,
            "--slide" => {
                let Some(n) = it.next() else {
                    bail!("--slide needs a slide number\n\n{}", usage());
                };
                let number: usize = n
                    .parse()
                    .with_context(|| format!("Invalid slide number '{}'", n))?;
                if number == 0 {
                    bail!("Slide numbers start at 1");
                }
                args.slides.push(number);
            }
            "--config" => {
                let Some(path) = it.next() else {
                    bail!("--config needs a file\n\n{}", usage());
                };
                args.config = Some(PathBuf::from(path));
            }
            other if other.starts_with('-') => bail!("Unknown option '{}'\n\n{}", other, usage()),
            other => positional.push(PathBuf::from(other)),
        }
    }

    let mut positional = positional.into_iter();
    args.output_dir = positional.next();
    args.document = positional.next();
    if args.output_dir.is_none() || args.document.is_none() || positional.next().is_some() {
        bail!("Expected an output directory and a document\n\n{}", usage());
    }
    Ok(Parsed::Run(args))
}

fn run(args: Args) -> anyhow::Result<()> {
    let (Some(output_dir), Some(document)) = (args.output_dir, args.document) else {
        bail!("{}", usage());
    };

    let mut config = Config::load_or_default(args.config.as_deref())
        .context("Failed to load settings")?;
    if args.svg {
        config.output.format = OutputFormat::Svg;
    }

    let content = std::fs::read_to_string(&document)
        .with_context(|| format!("Failed to read {}", document.display()))?;
    let presentation = Presentation::from_json(&content)?;

    let results = convert_presentation(&presentation, &args.slides, &config);
    let report = write_outputs(&results, &output_dir, &config)?;

    let failed: Vec<usize> = results
        .iter()
        .filter(|r| r.outcome.is_err())
        .map(|r| r.slide)
        .chain(report.errors.iter().map(|(slide, _)| *slide))
        .collect();
    for (slide, err) in &report.errors {
        warn!("Slide {}: {}", slide, err);
    }
    info!(
        "Wrote {} files to {}",
        report.written.len(),
        output_dir.display()
    );

    if !failed.is_empty() {
        bail!("{} slide problem(s), see log for details", failed.len());
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let argv: Vec<String> = std::env::args().collect();
    match parse_args(&argv)? {
        Parsed::Help => {
            print!("{}", usage());
            Ok(())
        }
        Parsed::Version => {
            println!("slidemap {} ({})", VERSION, BUILD_DATE);
            Ok(())
        }
        Parsed::Run(args) => {
            init_logging()?;
            run(args)
        }
    }
}
