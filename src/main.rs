//! Swotting terminal chat
//!
//! Main application entry point

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use swotting::{
    config::Settings,
    flow::ScriptRegistry,
    models::CompletionOutcome,
    session::{ChatSession, CompletionDispatcher, PrintHandler, SessionEvent},
    utils::{helpers::describe_question, logging},
    SwottingError,
};

/// Course recommendation chat in the terminal
#[derive(Parser, Debug)]
#[command(name = "swotting", version, about)]
struct Args {
    /// Flow to start right away, by id or alias
    #[arg(short, long)]
    flow: Option<String>,

    /// Configuration file, extension optional
    #[arg(short, long, env = "SWOTTING_CONFIG", default_value = "config")]
    config: String,

    /// Directory of additional `*.toml` scripts
    #[arg(short, long)]
    scripts: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    // Load configuration
    let settings = Settings::load(&args.config).context("Failed to load configuration")?;
    settings.validate()?;

    // Initialize logging
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", swotting::info());

    let mut registry = ScriptRegistry::new();
    let script_dir = args
        .scripts
        .or_else(|| settings.scripts.directory.as_ref().map(PathBuf::from));
    if let Some(dir) = script_dir {
        registry
            .load_dir(&dir)
            .await
            .with_context(|| format!("Failed to load scripts from {}", dir.display()))?;
    }
    info!(flows = ?registry.ids(), "Script registry ready");

    let dispatcher = CompletionDispatcher::spawn(Arc::new(PrintHandler::new()), &settings.dispatcher);
    let mut session = ChatSession::new(dispatcher, settings.conversation.retry_policy);

    match &args.flow {
        Some(flow) => {
            let script = registry
                .resolve(flow)
                .ok_or_else(|| SwottingError::UnknownFlow(flow.clone()))?;
            let event = session.start(script)?;
            settle(&mut session, event).await?;
        }
        None => print_help(&registry),
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            "" => continue,
            "/quit" => break,
            "/reset" => {
                session.reset();
                println!("Conversation reset.");
                print_help(&registry);
                continue;
            }
            _ => {}
        }

        // Without an open question the line picks a mode
        if session.current_question().is_none() {
            if line.eq_ignore_ascii_case("help") {
                print_help(&registry);
                continue;
            }

            if let Some(script) = registry.resolve(line) {
                let event = session.start(script)?;
                settle(&mut session, event).await?;
                continue;
            }

            let script = registry.require(&settings.conversation.default_flow)?;
            session.start(script)?;
        }

        match session.submit(line).await {
            Ok(event) => settle(&mut session, event).await?,
            Err(e) if e.is_answer_rejection() => println!("{}", e),
            Err(e) => {
                warn!(error = %e, "Submission failed");
                println!("{}", e);
            }
        }
    }

    info!("Shutting down");
    Ok(())
}

/// Show an event and wait out any completion it started
async fn settle(session: &mut ChatSession, event: SessionEvent) -> Result<()> {
    let mut event = event;
    loop {
        match event {
            SessionEvent::Prompt(question) => {
                println!("{}", describe_question(&question));
                return Ok(());
            }
            SessionEvent::AwaitingCompletion { .. } => {
                println!("Thanks! Putting your results together...");
                event = session.next_response().await?;
            }
            SessionEvent::Delivered(outcome) => {
                print_outcome(&outcome);
                println!("Pick another mode, or /quit.");
                return Ok(());
            }
            SessionEvent::CompletionFailed { error, retry } => {
                println!("Something went wrong: {}", error);
                match retry {
                    Some(question) => println!("{}", describe_question(&question)),
                    None => println!("Type /reset to start over."),
                }
                return Ok(());
            }
            SessionEvent::Discarded { .. } => {
                if !session.is_awaiting_completion() {
                    return Ok(());
                }
                event = session.next_response().await?;
            }
        }
    }
}

fn print_outcome(outcome: &CompletionOutcome) {
    match outcome {
        CompletionOutcome::Courses(results) => {
            println!("{} course(s) for \"{}\":", results.length, results.query);
            for course in &results.results {
                println!("  - {} <{}>", course.title, course.link);
            }
        }
        CompletionOutcome::LearningPlan(plan) => {
            for step in &plan.steps {
                println!("{}. {}", step.step_number, step.title);
                for course in &step.recommended_courses {
                    println!("     - {} <{}>", course.title, course.link);
                }
            }
        }
        CompletionOutcome::Acknowledged => println!("Done."),
    }
}

fn print_help(registry: &ScriptRegistry) {
    println!("Available modes:");
    for id in registry.ids() {
        let Some(script) = registry.get(&id) else {
            continue;
        };
        let mut names = vec![script.id.clone()];
        names.extend(script.aliases.iter().cloned());
        println!("  {:<32} {}", names.join(", "), script.description);
    }
    println!("Anything else starts a conversation. /reset starts over, /quit exits.");
}
