use clap::{Parser, Subcommand};
use kumitate::dispatch::{HumanChannel, MarkdownFileSink};
use kumitate::prelude::*;
use serde_json::Value;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Inspect an integration catalog and replay scripted tool calls against it
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the agent YAML config
    #[arg(short, long, global = true, default_value = "agent.yaml")]
    config: PathBuf,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the numbered tool list
    Tools,
    /// Print the parameter descriptions of one operation
    Describe {
        integration: String,
        resource: String,
        operation: String,
        /// Depth below which optional composites are collapsed (defaults to the config value)
        #[arg(long)]
        max_depth: Option<usize>,
    },
    /// Run a JSON script of [tool_name, input] calls through the dispatcher
    Replay {
        #[arg(short, long)]
        script: PathBuf,
        /// Where task_submit writes its summary
        #[arg(short, long, default_value = "result.md")]
        out: PathBuf,
    },
    /// Save the resolved catalog as a binary snapshot
    Snapshot {
        #[arg(short, long)]
        out: PathBuf,
    },
}

/// Answers help requests from stdin.
struct StdinHuman;

impl HumanChannel for StdinHuman {
    fn ask_for_help(&mut self, problems: &str) -> String {
        println!("The agent asks for help: {}", problems);
        print!("> ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(_) => line.trim_end().to_string(),
            Err(_) => String::new(),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = AgentConfig::from_file(&cli.config)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load config: {}", e)));
    let catalog = ToolCatalog::from_config(&config)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to resolve catalog: {}", e)));

    match cli.command {
        Command::Tools => println!("{}", catalog.describe_tools(&config)),
        Command::Describe {
            integration,
            resource,
            operation,
            max_depth,
        } => {
            let meta = catalog
                .lookup(&integration, &resource, &operation)
                .unwrap_or_else(|e| exit_with_error(&e.to_string()));
            let node = NodeInstance::new(0, meta.clone(), catalog.compile_shape(meta));
            let depth = max_depth.unwrap_or(config.description_max_depth);
            for line in node.render_with_descriptions(depth) {
                println!("{}", line);
            }
        }
        Command::Replay { script, out } => run_replay(&catalog, &config, &script, out),
        Command::Snapshot { out } => {
            catalog
                .save_snapshot(&out)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to save snapshot: {}", e)));
            println!("Snapshot written to {}", out.display());
        }
    }
}

fn run_replay(catalog: &ToolCatalog, config: &AgentConfig, script: &Path, out: PathBuf) {
    let text = fs::read_to_string(script).unwrap_or_else(|e| {
        exit_with_error(&format!("Could not read script '{}': {}", script.display(), e))
    });
    let calls: Vec<(String, Value)> = serde_json::from_str(&text)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse script JSON: {}", e)));

    let mut program = Program::new();
    let mut dispatcher = ToolDispatcher::new(catalog, config)
        .with_human(StdinHuman)
        .with_sink(MarkdownFileSink::new(out));

    for (k, (tool_name, input)) in calls.into_iter().enumerate() {
        let record = dispatcher.handle(&mut program, "", &tool_name, input);
        println!("[{}] {} -> {}", k, tool_name, record.status);
        println!("    {}", record.tool_output);
    }

    println!("\n--- Program ---");
    println!("{}", program.render());
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
