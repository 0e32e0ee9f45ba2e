//! flowlink CLI — entry point.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use flowlink::{resolve_display_text, DocumentContext, FlowClient, FlowConfig};

mod repl;

#[derive(Parser)]
#[command(
    name = "flowlink",
    about = "Command-line client for Langflow-style workflow-execution services",
    version
)]
struct Cli {
    /// Path to a flowlink config file (JSON).
    #[arg(short, long)]
    config: Option<String>,

    /// Workflow server base URL (overrides config).
    #[arg(long)]
    url: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a flow once and print its response text.
    Run {
        /// Flow id to execute.
        #[arg(short, long)]
        flow: String,

        /// Input text passed to the flow.
        input: String,

        /// Session id for conversational flows.
        #[arg(short, long)]
        session: Option<String>,

        /// Print the full JSON response instead of the extracted text.
        #[arg(long)]
        raw: bool,
    },

    /// Analyze a document with the configured document flow.
    Ask {
        /// Document type (e.g. "Customer").
        #[arg(short, long)]
        doctype: String,

        /// Document name (e.g. "CUST-0001").
        #[arg(short, long)]
        name: String,

        /// JSON file holding the document's field values.
        #[arg(short = 'F', long)]
        fields: String,

        /// What to ask about the document.
        #[arg(short, long, default_value = "Analyze this document and give recommendations")]
        prompt: String,

        /// Flow id, overriding the configured document flow.
        #[arg(long)]
        flow: Option<String>,

        /// Only include these fields (repeatable).
        #[arg(long = "include")]
        include: Vec<String>,

        /// Print the full JSON response instead of the extracted text.
        #[arg(long)]
        raw: bool,
    },

    /// Start an interactive chat session with the configured chat flow.
    Chat {
        /// Scope the conversation to one document: "Doctype/Name".
        #[arg(long)]
        document: Option<String>,

        /// Scope the conversation to a document type's list view.
        #[arg(long)]
        list: Option<String>,
    },

    /// Check connectivity to the workflow server.
    Health,

    /// Print the resolved configuration (API key redacted).
    Config,

    /// Generate shell completion scripts.
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let runtime = tokio::runtime::Runtime::new()?;

    let mut config = FlowConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.url {
        config.base_url = url;
    }

    match cli.command {
        Commands::Run {
            flow,
            input,
            session,
            raw,
        } => {
            let client = FlowClient::new(config)?;
            let outcome =
                runtime.block_on(client.run_flow(&flow, &input, session.as_deref(), None))?;
            print_outcome(&client, &outcome.data, raw)?;
        }

        Commands::Ask {
            doctype,
            name,
            fields,
            prompt,
            flow,
            include,
            raw,
        } => {
            let flow_id = flow
                .or_else(|| config.document_flow.clone())
                .ok_or_else(|| {
                    anyhow::anyhow!("no document flow configured; pass --flow or set document_flow")
                })?;

            let text = std::fs::read_to_string(&fields)?;
            let values: serde_json::Value = serde_json::from_str(&text)?;
            let serde_json::Value::Object(map) = values else {
                anyhow::bail!("{fields}: expected a JSON object of field values");
            };

            let mut document = DocumentContext::new(doctype, name, map);
            if !include.is_empty() {
                document.retain_fields(&include);
            }

            let client = FlowClient::new(config)?;
            let input = document.prompt_text(&prompt);
            let outcome = runtime.block_on(client.run_flow(&flow_id, &input, None, None))?;
            print_outcome(&client, &outcome.data, raw)?;
        }

        Commands::Chat { document, list } => {
            let context = repl::parse_context(document.as_deref(), list.as_deref())?;
            let client = FlowClient::new(config)?;
            repl::run(&runtime, client, context)?;
        }

        Commands::Health => {
            let client = FlowClient::new(config)?;
            match runtime.block_on(client.health()) {
                Ok(()) => println!("Connected to {}", client.config().base_url),
                Err(e) => {
                    eprintln!("Cannot reach {}: {e}", client.config().base_url);
                    std::process::exit(1);
                }
            }
        }

        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config.summary())?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "flowlink", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn print_outcome(
    client: &FlowClient,
    data: &serde_json::Value,
    raw: bool,
) -> anyhow::Result<()> {
    if raw {
        println!("{}", serde_json::to_string_pretty(data)?);
    } else {
        let resolved = resolve_display_text(data, &client.config().extract);
        println!("{}", resolved.text);
    }
    Ok(())
}
