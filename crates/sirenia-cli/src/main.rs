use serde::Serialize;
use serde_json::Value;
use sirenia::{AsciiCaseInsensitive, Node, PriorityGraph, SuppressedEdge};
use std::io::{Read, Write};
use std::str::FromStr;
use tracing::debug;

type DocNode = Node<String, Value, f64>;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Sort(sirenia::Error),
    Json(serde_json::Error),
    Yaml(serde_yaml::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Sort(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Yaml(err) => write!(f, "YAML error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<sirenia::Error> for CliError {
    fn from(value: sirenia::Error) -> Self {
        Self::Sort(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Yaml(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputFormat {
    Json,
    Yaml,
}

impl FromStr for InputFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    input: Option<String>,
    format: Option<InputFormat>,
    allow_multiple_key: bool,
    allow_circle: bool,
    descending: bool,
    ignore_case: bool,
    with_keys: bool,
    pretty: bool,
}

#[derive(Serialize)]
struct KeyedOut {
    key: Option<String>,
    value: Value,
}

#[derive(Serialize)]
struct SortOut<T> {
    order: Vec<T>,
    cycles_suppressed: bool,
    suppressed: Vec<SuppressedEdge>,
}

fn usage() -> &'static str {
    "sirenia-cli\n\
\n\
USAGE:\n\
  sirenia-cli [--allow-multiple-key] [--allow-circle] [--descending] [--ignore-case] [--format json|yaml] [--keys] [--pretty] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - Input is an array of nodes: {key?, value, priority?, after?, before?, nodes_after?, nodes_before?}.\n\
  - Nodes without a priority sort as priority 0.\n\
  - The format defaults to YAML for .yaml/.yml paths and JSON otherwise.\n\
  - --keys prints {key, value} entries instead of bare values.\n\
  - Set SIRENIA_LOG (e.g. SIRENIA_LOG=debug) to log to stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "--allow-multiple-key" => args.allow_multiple_key = true,
            "--allow-circle" => args.allow_circle = true,
            "--descending" => args.descending = true,
            "--ignore-case" => args.ignore_case = true,
            "--keys" => args.with_keys = true,
            "--pretty" => args.pretty = true,
            "--format" => {
                let Some(fmt) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.format = Some(
                    fmt.parse::<InputFormat>()
                        .map_err(|_| CliError::Usage(usage()))?,
                );
            }
            "-" => args.input = None,
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(path: Option<&str>) -> Result<String, CliError> {
    match path {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn infer_format(args: &Args) -> InputFormat {
    if let Some(format) = args.format {
        return format;
    }
    match args.input.as_deref() {
        Some(path) if path.ends_with(".yaml") || path.ends_with(".yml") => InputFormat::Yaml,
        _ => InputFormat::Json,
    }
}

fn parse_nodes(text: &str, format: InputFormat) -> Result<Vec<DocNode>, CliError> {
    Ok(match format {
        InputFormat::Json => serde_json::from_str(text)?,
        InputFormat::Yaml => serde_yaml::from_str(text)?,
    })
}

fn build_graph(args: &Args) -> PriorityGraph<String, Value, f64> {
    let graph: PriorityGraph<String, Value, f64> = if args.descending {
        PriorityGraph::ordered_by(|a: &f64, b: &f64| b.total_cmp(a))
    } else {
        PriorityGraph::ordered_by(f64::total_cmp)
    };
    let graph = graph
        .with_allow_multiple_key(args.allow_multiple_key)
        .with_allow_circle(args.allow_circle)
        .with_priority_selector(|_: &Value| 0.0);
    if args.ignore_case {
        graph.with_key_comparer(AsciiCaseInsensitive)
    } else {
        graph
    }
}

fn write_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let format = infer_format(&args);
    let nodes = parse_nodes(&text, format)?;
    debug!(nodes = nodes.len(), ?format, "parsed input");

    let keys: Vec<Option<String>> = nodes.iter().map(|n| n.key.clone()).collect();
    let sorted = build_graph(&args).sort_detailed(nodes)?;
    let cycles_suppressed = sorted.cycles_suppressed();

    if args.with_keys {
        let order: Vec<KeyedOut> = sorted
            .indices
            .iter()
            .zip(sorted.values)
            .map(|(&ix, value)| KeyedOut {
                key: keys.get(ix).cloned().flatten(),
                value,
            })
            .collect();
        write_json(
            &SortOut {
                order,
                cycles_suppressed,
                suppressed: sorted.suppressed,
            },
            args.pretty,
        )
    } else {
        write_json(
            &SortOut {
                order: sorted.values,
                cycles_suppressed,
                suppressed: sorted.suppressed,
            },
            args.pretty,
        )
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("SIRENIA_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() {
    init_tracing();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("sirenia-cli")
            .chain(args.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn parses_flags_and_path() {
        let args = parse_args(&argv(&[
            "--allow-circle",
            "--format",
            "yaml",
            "--keys",
            "nodes.txt",
        ]))
        .unwrap();
        assert!(args.allow_circle);
        assert!(args.with_keys);
        assert!(!args.allow_multiple_key);
        assert_eq!(args.format, Some(InputFormat::Yaml));
        assert_eq!(args.input.as_deref(), Some("nodes.txt"));
    }

    #[test]
    fn rejects_unknown_flags_and_bad_formats() {
        assert!(matches!(
            parse_args(&argv(&["--bogus"])),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            parse_args(&argv(&["--format", "toml"])),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            parse_args(&argv(&["--format"])),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            parse_args(&argv(&["a.json", "b.json"])),
            Err(CliError::Usage(_))
        ));
    }

    #[test]
    fn format_follows_extension_unless_forced() {
        let yaml = parse_args(&argv(&["nodes.yml"])).unwrap();
        assert_eq!(infer_format(&yaml), InputFormat::Yaml);

        let forced = parse_args(&argv(&["--format", "json", "nodes.yaml"])).unwrap();
        assert_eq!(infer_format(&forced), InputFormat::Json);

        let stdin = parse_args(&argv(&["-"])).unwrap();
        assert_eq!(infer_format(&stdin), InputFormat::Json);
    }

    #[test]
    fn nodes_parse_with_optional_fields() {
        let nodes = parse_nodes(
            r#"[{"value": 1}, {"key": "b", "value": {"x": true}, "priority": 2.5, "after": ["a"]}]"#,
            InputFormat::Json,
        )
        .unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].key, None);
        assert_eq!(nodes[0].priority, None);
        assert_eq!(nodes[1].priority, Some(2.5));
        assert_eq!(nodes[1].after, vec!["a".to_string()]);
    }
}
