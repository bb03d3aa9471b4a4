//! explore a graphql schema from the terminal
//!
//! - `types` writes typescript declarations for every schema type
//! - `tree` prints the request tree
//! - `run` selects fields, prompts for variables, and optionally executes

pub const CLI_HELP: &str = "\
usage: graphql-explorer <command> [options]

commands:
  types                 write types.ts with a declaration for every schema type
  tree                  print the request tree
  run <request>         build an operation for <request>, collect its variables,
                        and execute it when --url is given

schema source (one is required):
  --schema <path>       sdl file, or an introspection result as json
  --url <endpoint>      graphql endpoint, the schema is introspected

options:
  --token <token>       bearer token for --url
  --header <k: v>       extra request header, repeatable
  --out <dir>           output directory for `types`
  --depth <n>           request tree depth (default 5)
  --select <a.b>        field path below the request to select, repeatable
  --name <Name>         operation name for `run`
  -h, --help            show this help

environment:
  RUST_LOG              log filter (default graphql_explorer=info)
";

use graphql_explorer::arguments::ArgumentKind;
use graphql_explorer::{
    collect_variables, ArgumentSession, Choice, Client, ClientConfig, Error, ListView, Prompter,
    RequestNode, SchemaRegistry, ValuePrompt, DEFAULT_MAX_DEPTH,
};
use reqwest::header::{HeaderName, HeaderValue};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::EnvFilter;

#[derive(Debug, PartialEq)]
enum Command {
    Types,
    Tree,
    Run { request: String },
}

#[derive(Debug)]
struct Args {
    command: Command,
    schema_path: Option<PathBuf>,
    url: Option<String>,
    token: Option<String>,
    headers: Vec<(String, String)>,
    out_dir: Option<PathBuf>,
    depth: usize,
    select: Vec<String>,
    name: Option<String>,
}

enum ParseArgsError {
    Help,
    Message(String),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("graphql_explorer=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let args = match parse_args(std::env::args().collect()) {
        Ok(args) => args,
        Err(ParseArgsError::Help) => {
            print!("{CLI_HELP}");
            return;
        }
        Err(ParseArgsError::Message(err)) => {
            eprintln!("{err}\n\n{CLI_HELP}");
            std::process::exit(1);
        }
    };

    let client = match args.url.as_ref().map(|url| build_client(url, &args)).transpose() {
        Ok(client) => client,
        Err(err) => {
            eprintln!("invalid client configuration: {err}");
            std::process::exit(1);
        }
    };

    let mut registry = match load_registry(&args, client.as_ref()).await {
        Ok(registry) => registry,
        Err(err) => {
            eprintln!("failed to load schema: {err}");
            std::process::exit(1);
        }
    };

    let result = match &args.command {
        Command::Types => write_types(&args, &registry),
        Command::Tree => {
            print_tree(registry.build_tree(args.depth));
            Ok(())
        }
        Command::Run { request } => run(&args, request, &mut registry, client.as_ref()).await,
    };

    if let Err(err) = result {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn parse_args(args: Vec<String>) -> Result<Args, ParseArgsError> {
    let mut command = None;
    let mut schema_path = None;
    let mut url = None;
    let mut token = None;
    let mut headers = Vec::new();
    let mut out_dir = None;
    let mut depth = DEFAULT_MAX_DEPTH;
    let mut select = Vec::new();
    let mut name = None;

    let mut iter = args.into_iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--schema" => schema_path = iter.next().map(PathBuf::from),
            "--url" => url = iter.next(),
            "--token" => token = iter.next(),
            "--header" => {
                let raw = iter.next().unwrap_or_default();
                let (key, value) = raw.split_once(':').ok_or_else(|| {
                    ParseArgsError::Message(format!("header must look like `name: value`: {raw}"))
                })?;
                headers.push((key.trim().to_string(), value.trim().to_string()));
            }
            "--out" => out_dir = iter.next().map(PathBuf::from),
            "--depth" => {
                let raw = iter.next().unwrap_or_default();
                depth = raw.parse().map_err(|_| {
                    ParseArgsError::Message(format!("--depth expects a number, got {raw:?}"))
                })?;
            }
            "--select" => select.extend(iter.next()),
            "--name" => name = iter.next(),
            "--help" | "-h" => return Err(ParseArgsError::Help),
            "types" if command.is_none() => command = Some(Command::Types),
            "tree" if command.is_none() => command = Some(Command::Tree),
            "run" if command.is_none() => {
                let request = iter.next().ok_or_else(|| {
                    ParseArgsError::Message("run needs a request name".to_string())
                })?;
                command = Some(Command::Run { request });
            }
            _ => return Err(ParseArgsError::Message(format!("unknown argument: {arg}"))),
        }
    }

    let command = command.ok_or_else(|| ParseArgsError::Message("missing command".to_string()))?;

    if url.is_none() && schema_path.is_none() {
        return Err(ParseArgsError::Message(
            "--url or --schema is required".to_string(),
        ));
    }

    if command == Command::Types && out_dir.is_none() {
        return Err(ParseArgsError::Message(
            "--out is required for types".to_string(),
        ));
    }

    Ok(Args {
        command,
        schema_path,
        url,
        token,
        headers,
        out_dir,
        depth,
        select,
        name,
    })
}

fn build_client(url: &str, args: &Args) -> graphql_explorer::Result<Client> {
    let mut config = ClientConfig::new(url);
    if let Some(token) = &args.token {
        config = config.with_token(token.clone());
    }
    for (key, value) in &args.headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|err| Error::Config(format!("invalid header name {key:?}: {err}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|err| Error::Config(format!("invalid header value for {key}: {err}")))?;
        config = config.with_header(name, value);
    }
    Client::new(config)
}

async fn load_registry(
    args: &Args,
    client: Option<&Client>,
) -> graphql_explorer::Result<SchemaRegistry> {
    let mut registry = SchemaRegistry::new();
    if let Some(schema_path) = &args.schema_path {
        let text = fs::read_to_string(schema_path).map_err(|err| {
            Error::Config(format!("failed to read {}: {err}", schema_path.display()))
        })?;
        registry.load_str(&text)?;
    } else if let Some(client) = client {
        client.load_schema(&mut registry).await?;
    }
    Ok(registry)
}

fn write_types(args: &Args, registry: &SchemaRegistry) -> graphql_explorer::Result<()> {
    let out_dir = args
        .out_dir
        .as_ref()
        .ok_or_else(|| Error::Config("--out is required for types".to_string()))?;
    let path = out_dir.join("types.ts");
    fs::create_dir_all(out_dir)
        .and_then(|_| fs::write(&path, registry.render_declarations()))
        .map_err(|err| Error::Config(format!("failed to write {}: {err}", path.display())))?;
    println!("wrote {}", path.display());
    Ok(())
}

fn print_tree(tree: &[RequestNode]) {
    fn walk(node: &RequestNode, indent: usize) {
        let list = if node.returns_list { "[]" } else { "" };
        let mark = if node.is_selected() { " *" } else { "" };
        let args = if node.arguments.is_empty() {
            String::new()
        } else {
            let names: Vec<_> = node
                .arguments
                .iter()
                .map(|a| format!("{}: {}", a.name, a.type_ref))
                .collect();
            format!("({})", names.join(", "))
        };
        println!(
            "{:indent$}{}{}: {}{}{}",
            "",
            node.label,
            args,
            node.type_name,
            list,
            mark,
            indent = indent * 2
        );
        for child in &node.children {
            walk(child, indent + 1);
        }
    }
    for root in tree {
        walk(root, 0);
    }
}

async fn run(
    args: &Args,
    request: &str,
    registry: &mut SchemaRegistry,
    client: Option<&Client>,
) -> graphql_explorer::Result<()> {
    registry.build_tree(args.depth);
    if registry.node(&[request]).is_none() {
        return Err(Error::UnknownRequest(request.to_string()));
    }
    for path in &args.select {
        let mut full = vec![request];
        full.extend(path.split('.'));
        if !registry.select(full.as_slice(), true) {
            return Err(Error::Config(format!(
                "cannot select {path:?}: not a leaf field of {request}"
            )));
        }
    }

    let name = args.name.clone().unwrap_or_else(|| operation_name(request));
    let saved = registry.save_request(&name, request)?;
    println!("{}", saved.operation);

    let mut session = ArgumentSession::new(registry, &saved.arguments);
    let mut prompter = TerminalPrompter::new();
    let Some(variables) = collect_variables(&mut session, &mut prompter).await else {
        eprintln!("cancelled");
        return Ok(());
    };
    println!("{}", serde_json::to_string_pretty(&variables)?);

    if let Some(client) = client {
        let response = client.execute_saved(&saved, Some(variables)).await?;
        println!("{}", serde_json::to_string_pretty(&response.data)?);
    }
    Ok(())
}

/// `pokemon` -> `Pokemon`
fn operation_name(request: &str) -> String {
    let mut chars = request.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

const CANCEL: &str = ":q";

/// line-based prompter on stdin; end of input dismisses every prompt
struct TerminalPrompter {
    lines: Lines<BufReader<Stdin>>,
}

impl TerminalPrompter {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    async fn read_line(&mut self, prompt: &str) -> Option<String> {
        print!("{prompt}");
        let _ = std::io::stdout().flush();
        match self.lines.next_line().await {
            Ok(line) => line,
            Err(err) => {
                tracing::warn!(%err, "failed to read stdin");
                None
            }
        }
    }
}

impl Prompter for TerminalPrompter {
    async fn pick(&mut self, view: &ListView) -> Option<Choice> {
        println!();
        if !view.path.is_empty() {
            println!("{}", view.path.join("/"));
        }
        for item in &view.items {
            let set = if item.is_set { "*" } else { " " };
            let value = item
                .preview
                .as_deref()
                .map(|v| format!(" = {v}"))
                .unwrap_or_default();
            let detail = if item.kind == ArgumentKind::EnumValue {
                String::new()
            } else {
                format!(": {}", item.detail)
            };
            println!("  [{}] {} {}{}{}", item.index, set, item.label, detail, value);
        }
        let back = if view.can_go_back { ", b back" } else { "" };
        let filter = if view.hide_optional { "show all" } else { "required only" };
        loop {
            let line = self
                .read_line(&format!("<n> pick, r run, f {filter}{back}, {CANCEL} cancel> "))
                .await?;
            match line.trim() {
                "r" => return Some(Choice::Run),
                "f" => return Some(Choice::ToggleFilter),
                "b" if view.can_go_back => return Some(Choice::Back),
                CANCEL => return None,
                other => match other.parse::<usize>() {
                    Ok(index) if view.items.iter().any(|i| i.index == index) => {
                        return Some(Choice::Item(index))
                    }
                    _ => println!("unknown choice: {other}"),
                },
            }
        }
    }

    async fn input(&mut self, prompt: &ValuePrompt) -> Option<String> {
        if let Some(error) = &prompt.error {
            println!("  {error}");
        }
        if let Some(description) = &prompt.description {
            println!("  {description}");
        }
        let current = prompt
            .current
            .as_deref()
            .map(|c| format!(" [{c}]"))
            .unwrap_or_default();
        let line = self
            .read_line(&format!("{} ({}){current}: ", prompt.key, prompt.type_ref))
            .await?;
        if line.trim() == CANCEL {
            return None;
        }
        Some(line)
    }

    async fn confirm(&mut self, message: &str) -> Option<bool> {
        println!("{message}");
        loop {
            let line = self.read_line("send these variables? [y/n] ").await?;
            match line.trim() {
                "y" | "yes" => return Some(true),
                "n" | "no" => return Some(false),
                CANCEL => return None,
                _ => {}
            }
        }
    }

    async fn notify(&mut self, message: &str) {
        eprintln!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("graphql-explorer")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_run() {
        let Ok(parsed) = parse_args(args(&[
            "run",
            "pokemon",
            "--schema",
            "schema.graphql",
            "--select",
            "name",
            "--select",
            "stats.hp",
            "--header",
            "x-trace: 1",
        ])) else {
            panic!("expected args");
        };
        assert_eq!(
            parsed.command,
            Command::Run {
                request: "pokemon".to_string()
            }
        );
        assert_eq!(parsed.select, vec!["name", "stats.hp"]);
        assert_eq!(parsed.headers, vec![("x-trace".to_string(), "1".to_string())]);
        assert_eq!(parsed.depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_args(args(&["types", "--schema", "s.graphql"])),
            Err(ParseArgsError::Message(_))
        ));
        assert!(matches!(
            parse_args(args(&["tree"])),
            Err(ParseArgsError::Message(_))
        ));
        assert!(matches!(
            parse_args(args(&["tree", "--schema", "s", "--depth", "x"])),
            Err(ParseArgsError::Message(_))
        ));
        assert!(matches!(
            parse_args(args(&["--help"])),
            Err(ParseArgsError::Help)
        ));
    }

    #[test]
    fn test_operation_name() {
        assert_eq!(operation_name("pokemon"), "Pokemon");
        assert_eq!(operation_name(""), "");
    }
}
