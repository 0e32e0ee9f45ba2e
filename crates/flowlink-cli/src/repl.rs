//! Interactive chat REPL.
//!
//! Launch with `flowlink chat` to talk to the configured chat flow.
//! Plain lines are sent as chat turns; `/help` lists commands, Tab completes.

use rustyline::completion::{Completer, Pair};
use rustyline::config::CompletionType;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{
    Cmd, ConditionalEventHandler, Config, Editor, Event, EventContext, EventHandler, Helper,
    KeyEvent, RepeatCount,
};
use tokio::runtime::Runtime;

use flowlink::{resolve_display_text, ChatContext, ChatSession, FlowClient, TextSource};

/// Available REPL commands.
const COMMANDS: &[(&str, &str)] = &[
    ("/session", "Start a fresh conversation"),
    ("/context", "Set scope: doc <Type>/<Name>, list <Type>, off"),
    ("/raw", "Toggle raw JSON responses"),
    ("/health", "Check the workflow server connection"),
    ("/clear", "Clear the screen"),
    ("/help", "Show available commands"),
    ("/exit", "Quit the chat"),
];

/// Arguments accepted by /context.
const CONTEXT_MODES: &[&str] = &["doc ", "list ", "off"];

/// REPL helper for tab completion.
struct FlowHelper;

impl Completer for FlowHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let input = &line[..pos];

        if input.starts_with('/') && !input.contains(' ') {
            let matches: Vec<Pair> = COMMANDS
                .iter()
                .filter(|(cmd, _)| cmd.starts_with(input))
                .map(|(cmd, desc)| Pair {
                    display: format!("{cmd:<12} {desc}"),
                    replacement: format!("{cmd} "),
                })
                .collect();
            return Ok((0, matches));
        }

        if let Some(args) = input.strip_prefix("/context ") {
            let matches: Vec<Pair> = CONTEXT_MODES
                .iter()
                .filter(|mode| mode.starts_with(args.trim_start()))
                .map(|mode| Pair {
                    display: mode.trim().to_string(),
                    replacement: mode.to_string(),
                })
                .collect();
            return Ok((input.len() - args.trim_start().len(), matches));
        }

        Ok((pos, Vec::new()))
    }
}

impl Hinter for FlowHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        if pos < line.len() || line.is_empty() {
            return None;
        }
        if line.starts_with('/') && !line.contains(' ') {
            for (cmd, _) in COMMANDS {
                if cmd.starts_with(line) && *cmd != line {
                    return Some(cmd[line.len()..].to_string());
                }
            }
        }
        None
    }
}

impl Highlighter for FlowHelper {}
impl Validator for FlowHelper {}
impl Helper for FlowHelper {}

struct TabCompleteOrAcceptHint;

impl ConditionalEventHandler for TabCompleteOrAcceptHint {
    fn handle(
        &self,
        _evt: &Event,
        _n: RepeatCount,
        _positive: bool,
        ctx: &EventContext<'_>,
    ) -> Option<Cmd> {
        if ctx.has_hint() {
            Some(Cmd::CompleteHint)
        } else {
            Some(Cmd::Complete)
        }
    }
}

/// Session state.
struct ReplState {
    session: ChatSession,
    raw: bool,
}

/// Parse the --document / --list flags into a chat context.
pub fn parse_context(document: Option<&str>, list: Option<&str>) -> anyhow::Result<ChatContext> {
    match (document, list) {
        (Some(_), Some(_)) => anyhow::bail!("--document and --list are mutually exclusive"),
        (Some(spec), None) => {
            let (doctype, name) = spec
                .split_once('/')
                .ok_or_else(|| anyhow::anyhow!("--document expects \"Doctype/Name\""))?;
            Ok(ChatContext::Document {
                doctype: doctype.to_string(),
                name: name.to_string(),
            })
        }
        (None, Some(doctype)) => Ok(ChatContext::List {
            doctype: doctype.to_string(),
        }),
        (None, None) => Ok(ChatContext::Plain),
    }
}

/// Run the interactive chat REPL.
pub fn run(runtime: &Runtime, client: FlowClient, context: ChatContext) -> anyhow::Result<()> {
    eprintln!();
    eprintln!(
        "  \x1b[32m\u{25c9}\x1b[0m \x1b[1mflowlink v{}\x1b[0m \x1b[90m\u{2014} {}\x1b[0m",
        env!("CARGO_PKG_VERSION"),
        client.config().base_url
    );
    eprintln!();
    eprintln!(
        "    Type a message to chat, \x1b[36m/\x1b[0m to browse commands, \x1b[90m/exit\x1b[0m to quit."
    );
    eprintln!();

    if client.config().chat_flow.is_none() {
        eprintln!("  \x1b[33mwarning:\x1b[0m no chat flow configured (set chat_flow or FLOWLINK_CHAT_FLOW)");
        eprintln!();
    }

    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .completion_type(CompletionType::List)
        .completion_prompt_limit(20)
        .build();

    let mut rl: Editor<FlowHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(config)?;
    rl.set_helper(Some(FlowHelper));
    rl.bind_sequence(
        KeyEvent::from('\t'),
        EventHandler::Conditional(Box::new(TabCompleteOrAcceptHint)),
    );

    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    let hist_path = std::path::PathBuf::from(&home).join(".flowlink_history");
    if hist_path.exists() {
        let _ = rl.load_history(&hist_path);
    }

    let mut state = ReplState {
        session: ChatSession::new(context),
        raw: false,
    };
    let prompt = " \x1b[36mflow>\x1b[0m ";

    loop {
        match rl.readline(prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                if let Some(input) = line.strip_prefix('/') {
                    let mut parts = input.splitn(2, ' ');
                    let cmd = parts.next().unwrap_or("");
                    let args = parts.next().unwrap_or("").trim();

                    match cmd {
                        "exit" | "quit" => {
                            eprintln!("  \x1b[90m\u{2728}\x1b[0m Goodbye!");
                            break;
                        }
                        "help" | "h" | "?" | "" => cmd_help(),
                        "clear" | "cls" => eprint!("\x1b[2J\x1b[H"),
                        "session" => cmd_session(&mut state),
                        "context" => cmd_context(args, &mut state),
                        "raw" => {
                            state.raw = !state.raw;
                            eprintln!(
                                "  Raw responses {}.",
                                if state.raw { "on" } else { "off" }
                            );
                        }
                        "health" => cmd_health(runtime, &client),
                        _ => {
                            eprintln!("  Unknown command '/{cmd}'. Type /help for commands.");
                        }
                    }
                } else {
                    send_turn(runtime, &client, &mut state, line);
                }
            }
            Err(ReadlineError::Interrupted) => {
                eprintln!("  \x1b[90m(Ctrl+C)\x1b[0m Type \x1b[1m/exit\x1b[0m to quit.");
            }
            Err(ReadlineError::Eof) => {
                eprintln!("  \x1b[90m\u{2728}\x1b[0m Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("  Error: {err}");
                break;
            }
        }
    }

    let _ = rl.save_history(&hist_path);

    Ok(())
}

fn send_turn(runtime: &Runtime, client: &FlowClient, state: &mut ReplState, message: &str) {
    let Some(flow_id) = client.config().chat_flow.clone() else {
        eprintln!("  No chat flow configured (set chat_flow or FLOWLINK_CHAT_FLOW).");
        return;
    };

    let input = state.session.context_message(message);
    let result = runtime.block_on(client.run_flow(
        &flow_id,
        &input,
        Some(state.session.id.as_str()),
        None,
    ));

    match result {
        Ok(outcome) => {
            // The server may assign its own session id; adopt it so the
            // conversation stays on one thread.
            if let Some(sid) = outcome.session_id {
                state.session.id = sid;
            }

            if state.raw {
                match serde_json::to_string_pretty(&outcome.data) {
                    Ok(dump) => println!("{dump}"),
                    Err(e) => eprintln!("  Error: {e}"),
                }
                return;
            }

            let resolved = resolve_display_text(&outcome.data, &client.config().extract);
            println!("{}", resolved.text);
            if resolved.source == TextSource::RawDump {
                eprintln!("  \x1b[90m(no message text found; showing the raw response)\x1b[0m");
            }
        }
        Err(e) => eprintln!("  Error: {e}"),
    }
}

fn cmd_help() {
    eprintln!();
    eprintln!("  Commands:");
    eprintln!();
    for (cmd, desc) in COMMANDS {
        eprintln!("    {cmd:<12} {desc}");
    }
    eprintln!();
    eprintln!("  Anything else is sent to the chat flow.");
    eprintln!();
}

fn cmd_session(state: &mut ReplState) {
    state.session.reset();
    eprintln!("  Started a fresh conversation.");
}

fn cmd_context(args: &str, state: &mut ReplState) {
    let context = match args.split_once(' ') {
        Some(("doc", spec)) => match spec.trim().split_once('/') {
            Some((doctype, name)) => Some(ChatContext::Document {
                doctype: doctype.to_string(),
                name: name.to_string(),
            }),
            None => {
                eprintln!("  Usage: /context doc <Doctype>/<Name>");
                return;
            }
        },
        Some(("list", doctype)) => Some(ChatContext::List {
            doctype: doctype.trim().to_string(),
        }),
        _ if args == "off" => Some(ChatContext::Plain),
        _ => None,
    };

    match context {
        Some(context) => {
            state.session = ChatSession::new(context);
            eprintln!("  Context set; started a fresh conversation.");
        }
        None => {
            eprintln!("  Usage: /context doc <Doctype>/<Name> | list <Doctype> | off");
        }
    }
}

fn cmd_health(runtime: &Runtime, client: &FlowClient) {
    match runtime.block_on(client.health()) {
        Ok(()) => eprintln!("  Connected to {}", client.config().base_url),
        Err(e) => eprintln!("  Cannot reach {}: {e}", client.config().base_url),
    }
}
