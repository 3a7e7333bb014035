use anyhow::{Context, Result, bail};
use markup_node_config::Config;
use markup_node_engine::{Declaration, Indent, MarkupNode, OptionsOverride};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::{env, fs, io, process};

const USAGE: &str = "Usage: markup-node-cli [--extract] [--config PATH] [--indent N|TEXT] \
[--newline lf|crlf|none] [--declaration] [--no-self-close] <FILE|->";

/// What to print for the loaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    Markup,
    Extract,
}

#[derive(Debug, PartialEq)]
struct CliArgs {
    input: String,
    output: Output,
    config_path: Option<PathBuf>,
    overrides: OptionsOverride,
}

impl CliArgs {
    fn parse(args: &[String]) -> Result<Self> {
        let mut input = None;
        let mut output = Output::Markup;
        let mut config_path = None;
        let mut overrides = OptionsOverride::new();

        let mut args = args.iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--extract" => output = Output::Extract,
                "--declaration" => overrides.declaration = Some(Declaration::Standard),
                "--no-self-close" => overrides.self_close = Some(false),
                "--config" => {
                    let path = args.next().context("--config needs a path")?;
                    config_path = Some(PathBuf::from(path));
                }
                "--indent" => {
                    let value = args.next().context("--indent needs a value")?;
                    overrides.indent = Some(parse_indent(value));
                }
                "--newline" => {
                    let value = args.next().context("--newline needs a value")?;
                    overrides.new_line = Some(parse_new_line(value)?);
                }
                flag if flag.starts_with("--") => bail!("Unknown flag: {flag}"),
                path => {
                    if input.replace(path.to_string()).is_some() {
                        bail!("Only one input file may be given");
                    }
                }
            }
        }

        Ok(Self {
            input: input.context("No input file given")?,
            output,
            config_path,
            overrides,
        })
    }
}

fn parse_indent(value: &str) -> Indent {
    match value.parse::<usize>() {
        Ok(width) => Indent::Width(width),
        Err(_) => Indent::Text(value.replace("\\t", "\t")),
    }
}

fn parse_new_line(value: &str) -> Result<String> {
    match value {
        "lf" => Ok("\n".to_string()),
        "crlf" => Ok("\r\n".to_string()),
        "none" => Ok(String::new()),
        other => bail!("Unknown newline style: {other} (expected lf, crlf or none)"),
    }
}

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let loaded = match config_path {
        Some(path) => {
            let path = Config::expand_path(path).unwrap_or_else(|| path.to_path_buf());
            log::debug!("Loading config from {}", path.display());
            Config::load_from_path(&path)?
        }
        None => Config::load()?,
    };
    if loaded.is_none() {
        log::debug!("No config file found, using built-in defaults");
    }
    Ok(loaded.unwrap_or_default())
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read document from stdin")?;
        return Ok(content);
    }
    fs::read_to_string(input).with_context(|| format!("Failed to read document at {input}"))
}

fn run(args: &CliArgs) -> Result<String> {
    let config = load_config(args.config_path.as_deref())?;
    let options = config.options.overlay(&args.overrides);

    let content = read_input(&args.input)?;
    let document: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON in {}", args.input))?;

    let node = MarkupNode::from_root_with_options(document, &options)?;
    log::debug!("Built tree rooted at {:?}", node.name());

    match args.output {
        Output::Markup => Ok(node.render()),
        Output::Extract => Ok(serde_json::to_string_pretty(&node.extract())?),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let cli_args = match CliArgs::parse(&args) {
        Ok(cli_args) => cli_args,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{USAGE}");
            process::exit(1);
        }
    };

    let output = run(&cli_args)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{output}")?;
    Ok(())
}
