//! Callboard CLI - Call review and agent management
//!
//! Terminal front end for the clinic call dashboard backend.

use anyhow::{bail, Context, Result};
use callboard::domain::format::truncate_text;
use callboard::{
    CallFilter, Dashboard, DateFilter, HttpMethod, KnowledgeBaseDraft, StatusFilter, Transport,
    UpdateAgentConfig,
};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use dialoguer::{Confirm, Editor, Input};
use std::fs;
use tracing_subscriber::EnvFilter;

use callboard_cli::api::{HttpTransport, Services};
use callboard_cli::config::{Config, BASE_URL_ENV};
use callboard_cli::render;

#[derive(Parser)]
#[command(name = "callboard")]
#[command(about = "Callboard CLI - Review agent calls and manage agent settings", long_about = None)]
#[command(version)]
struct Cli {
    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inbound calls handled by the agent
    Calls {
        #[command(subcommand)]
        action: CallsAction,
    },

    /// Agent configuration
    Agent {
        #[command(subcommand)]
        action: AgentAction,
    },

    /// Knowledge base files
    Kb {
        #[command(subcommand)]
        action: KbAction,
    },

    /// Probe the backend endpoints
    Check,

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Args)]
struct FilterArgs {
    /// Match patient name, phone number or reason
    #[arg(short, long, default_value = "")]
    search: String,
    /// all, attention, approved, completed
    #[arg(long, default_value = "all")]
    status: String,
    /// all, today, week, custom
    #[arg(long, default_value = "all")]
    date: String,
}

impl FilterArgs {
    fn into_filter(self) -> CallFilter {
        CallFilter::new(
            self.search,
            StatusFilter::from(self.status.as_str()),
            DateFilter::from(self.date.as_str()),
        )
    }
}

#[derive(Subcommand)]
enum CallsAction {
    /// List calls matching the filters
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Show one call with transcript and AI decisions
    Show {
        id: i64,
    },
    /// Flag a call for staff follow-up
    Escalate {
        id: i64,
        /// Why the call needs attention
        #[arg(short, long)]
        reason: Option<String>,
    },
    /// Keep the list on screen, refreshing on every poll
    Watch {
        #[command(flatten)]
        filter: FilterArgs,
    },
}

#[derive(Subcommand)]
enum AgentAction {
    /// Show agent settings
    Show,
    /// Change agent settings (prompts when no flags are given)
    Update {
        #[arg(long)]
        first_message: Option<String>,
        #[arg(long)]
        system_prompt: Option<String>,
        #[arg(long)]
        phone_number: Option<String>,
    },
    /// Re-read agent settings from the backend
    Refresh,
}

#[derive(Subcommand)]
enum KbAction {
    /// List knowledge base files
    List,
    /// Print a file's full content
    Show {
        file_id: String,
    },
    /// Upload a new file
    Add {
        /// File name shown to staff
        #[arg(short, long)]
        name: Option<String>,
        /// Content text (or use --file)
        #[arg(short, long, conflicts_with = "file")]
        content: Option<String>,
        /// Read content from a local file
        #[arg(short, long)]
        file: Option<String>,
    },
    /// Replace a file's content (opens $EDITOR when no content is given)
    Edit {
        file_id: String,
        #[arg(short, long, conflicts_with = "file")]
        content: Option<String>,
        #[arg(short, long)]
        file: Option<String>,
    },
    /// Delete a file
    Delete {
        file_id: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Store the backend base URL
    SetBaseUrl {
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Calls { action } => cmd_calls(action).await,
        Commands::Agent { action } => cmd_agent(action).await,
        Commands::Kb { action } => cmd_kb(action).await,
        Commands::Check => cmd_check().await,
        Commands::Config { action } => cmd_config(action.unwrap_or(ConfigAction::Show)),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn connect() -> Result<(Config, Services)> {
    let config = Config::load()?;
    tracing::debug!(base_url = %config.base_url, "Using backend");
    let services = Services::connect(&config);
    Ok((config, services))
}

/// Content from a flag, a local file, or the editor
fn read_content(content: Option<String>, file: Option<String>, initial: &str) -> Result<Option<String>> {
    match (content, file) {
        (Some(c), _) => Ok(Some(c)),
        (None, Some(f)) => {
            let text = fs::read_to_string(&f).with_context(|| format!("Failed to read file: {}", f))?;
            Ok(Some(text))
        }
        (None, None) => Editor::new().edit(initial).context("Failed to open editor"),
    }
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_calls(action: CallsAction) -> Result<()> {
    let (config, services) = connect()?;

    match action {
        CallsAction::List { filter } => {
            let mut dashboard = Dashboard::with_filter(filter.into_filter());
            match services.calls.list().await {
                Ok(calls) => dashboard.set_calls(calls),
                Err(e) => {
                    print!("{}", render::load_error_panel(&e));
                    return Ok(());
                }
            }

            let now = Local::now();
            let visible = dashboard.visible_at(&now);
            println!("{}", render::filter_summary(dashboard.filter(), visible.len()));
            print!("{}", render::call_table(&visible, &now));
        }

        CallsAction::Show { id } => {
            let mut dashboard = Dashboard::new();
            match services.calls.list().await {
                Ok(calls) => dashboard.set_calls(calls),
                Err(e) => {
                    print!("{}", render::load_error_panel(&e));
                    return Ok(());
                }
            }
            dashboard.select(id);

            let Some(call) = dashboard.selected_call() else {
                bail!("Call {} not found", id);
            };
            print!("{}", render::call_detail(call, &Local::now()));
        }

        CallsAction::Escalate { id, reason } => {
            let mut dashboard = Dashboard::new();
            match services.calls.list().await {
                Ok(calls) => {
                    dashboard.set_calls(calls);
                    dashboard.select(id);
                    if !dashboard.is_detail_open() {
                        println!("{} Call {} is not in the current list", "!".yellow(), id);
                    }
                }
                Err(e) => tracing::warn!(error = %e, "Could not load calls before escalating"),
            }

            let updated = dashboard
                .escalate(&services.calls, id, reason)
                .await
                .with_context(|| format!("Failed to escalate call {}", id))?;

            println!("{} Call {} escalated", "✓".green(), id.to_string().cyan());
            if let Some(reason) = updated.and_then(|call| call.attention_reason) {
                println!("  {}", reason.dimmed());
            }
        }

        CallsAction::Watch { filter } => {
            let mut dashboard = Dashboard::with_filter(filter.into_filter());
            let mut subscription = services.calls.watch(Some(config.poller_config()));

            loop {
                tokio::select! {
                    update = subscription.next() => {
                        let Some(update) = update else { break };
                        clear_screen();
                        match update {
                            Ok(calls) => {
                                dashboard.set_calls(calls.unwrap_or_default());
                                let now = Local::now();
                                let visible = dashboard.visible_at(&now);
                                println!("{}", render::filter_summary(dashboard.filter(), visible.len()));
                                print!("{}", render::call_table(&visible, &now));
                            }
                            Err(e) => print!("{}", render::load_error_panel(&e)),
                        }
                        println!(
                            "\n{}",
                            format!(
                                "Updated {} · refreshing every {}s · Ctrl-C to quit",
                                Local::now().format("%-I:%M:%S %P"),
                                config.poll_interval_secs
                            )
                            .dimmed()
                        );
                    }
                    _ = tokio::signal::ctrl_c() => break,
                }
            }

            subscription.stop();
        }
    }

    Ok(())
}

fn print_agent_config(config: Option<callboard::AgentConfig>) {
    match config {
        Some(config) => print!("{}", render::agent_config(&config)),
        None => println!("{}", "No agent configuration available.".yellow()),
    }
}

fn clear_screen() {
    print!("\x1B[2J\x1B[1;1H");
}

async fn cmd_agent(action: AgentAction) -> Result<()> {
    let (_, services) = connect()?;

    match action {
        AgentAction::Show => print_agent_config(services.agent.config().await?),

        AgentAction::Update { first_message, system_prompt, phone_number } => {
            let mut update = UpdateAgentConfig {
                first_message,
                system_prompt,
                phone_number,
            };

            if update.is_empty() {
                let current = services
                    .agent
                    .config()
                    .await?
                    .context("No agent configuration available (unauthorized)")?;
                update.first_message = Some(
                    Input::new()
                        .with_prompt("First message")
                        .with_initial_text(current.first_message.clone())
                        .interact_text()
                        .context("Failed to read input")?,
                );
                update.phone_number = Some(
                    Input::new()
                        .with_prompt("Phone number")
                        .with_initial_text(current.phone_number.clone())
                        .interact_text()
                        .context("Failed to read input")?,
                );
                if Confirm::new()
                    .with_prompt("Edit system prompt?")
                    .default(false)
                    .interact()?
                {
                    update.system_prompt = Editor::new()
                        .edit(&current.system_prompt)
                        .context("Failed to open editor")?;
                }
            }

            match services.agent.update(update).await? {
                Some(updated) => println!("{} Agent '{}' saved", "✓".green(), updated.name.cyan()),
                None => println!("{} Agent settings saved", "✓".green()),
            }
        }

        AgentAction::Refresh => {
            services.agent.refresh().await;
            print_agent_config(services.agent.config().await?);
        }
    }

    Ok(())
}

async fn cmd_kb(action: KbAction) -> Result<()> {
    let (_, services) = connect()?;
    let kb = &services.knowledge_base;

    match action {
        KbAction::List => {
            let files = kb.list().await?;
            println!("{} ({})", "Knowledge Base".bold(), files.len());
            print!("{}", render::knowledge_base_list(&files));
        }

        KbAction::Show { file_id } => {
            let file = kb.find(&file_id).await?;
            let editor = kb.open_for_edit(&file).await;
            print!("{}", render::file_content(&editor));
        }

        KbAction::Add { name, content, file } => {
            let name = match name {
                Some(n) => n,
                None => Input::new()
                    .with_prompt("File name")
                    .interact_text()
                    .context("Failed to read input")?,
            };
            let content = read_content(content, file, "")?.unwrap_or_default();

            let mut draft = KnowledgeBaseDraft::new(name.clone(), content);
            match kb.add(&mut draft).await? {
                Some(created) => println!(
                    "{} Added {} {}",
                    "✓".green(),
                    created.name.cyan(),
                    created.file_id.dimmed()
                ),
                None => println!("{} Added {}", "✓".green(), name.cyan()),
            }
        }

        KbAction::Edit { file_id, content, file } => {
            let current = kb.find(&file_id).await?;
            let editor = kb.open_for_edit(&current).await;

            let Some(content) = read_content(content, file, &editor.content)? else {
                println!("Edit aborted, nothing saved.");
                return Ok(());
            };
            if content == editor.content {
                println!("No changes.");
                return Ok(());
            }

            kb.update(&file_id, &content).await?;
            println!("{} Saved {}", "✓".green(), current.name.cyan());
        }

        KbAction::Delete { file_id, yes } => {
            let file = kb.find(&file_id).await?;

            if !yes
                && !Confirm::new()
                    .with_prompt(format!("Delete '{}'?", file.name))
                    .default(false)
                    .interact()?
            {
                println!("Cancelled.");
                return Ok(());
            }

            kb.delete(&file_id).await?;
            println!("{} Deleted {}", "✓".green(), file.name.cyan());
        }
    }

    Ok(())
}

async fn cmd_check() -> Result<()> {
    let config = Config::load()?;
    let transport = HttpTransport::new(&config.base_url);

    println!("{} {}", "Backend:".bold(), transport.base_url());

    let mut failures = 0;
    for path in ["/", callboard::endpoints::CALLS, callboard::endpoints::AGENT_CONFIG] {
        print!("  GET {:<20} ", path);
        match transport.send(HttpMethod::Get, path, None).await {
            Ok(resp) => {
                let status = format!("{} {}", resp.status, resp.status_text);
                if resp.is_success() {
                    println!("{}", status.green());
                } else {
                    failures += 1;
                    println!("{}", status.red());
                }
                if !resp.body.is_empty() {
                    println!("    {}", truncate_text(&resp.body.replace('\n', " "), 100).dimmed());
                }
            }
            Err(e) => {
                failures += 1;
                println!("{}", "unreachable".red());
                println!("    {}", e.to_string().dimmed());
            }
        }
    }

    if failures > 0 {
        println!("\n{}", format!("Check your API configuration ({}).", BASE_URL_ENV).yellow());
    }

    Ok(())
}

fn cmd_config(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            let overridden = std::env::var(BASE_URL_ENV).is_ok_and(|v| !v.trim().is_empty());

            println!("{}", "Configuration:".bold());
            println!("  Path: {:?}", Config::config_path()?);
            println!(
                "  Base URL: {}{}",
                config.base_url,
                if overridden {
                    format!(" (from {})", BASE_URL_ENV).dimmed().to_string()
                } else {
                    String::new()
                }
            );
            println!("  Poll Interval: {}s", config.poll_interval_secs);
            println!("  KB Refresh Delay: {}ms", config.kb_refresh_delay_ms);
            println!("  On 401: {:?}", config.on_unauthorized);
        }

        ConfigAction::SetBaseUrl { url } => {
            let mut config = Config::load_file()?;
            config.set_base_url(url.trim().to_string());
            config.save()?;
            println!(
                "{} Base URL set to {} ({:?})",
                "✓".green(),
                config.base_url.cyan(),
                Config::config_path()?
            );
        }
    }

    Ok(())
}
