//! Voice Shopping Demo Application
//!
//! Runs spoken (or typed) shopping commands through the full pipeline:
//! Transcript → Cleanup → Intent Parsing → Product Match → Cart

mod config;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use cart_session::{
    format_cents, init as init_cart_session, CheckoutOutcome, SessionHandle, Turn, VoiceSession,
};
use config::VoiceShopConfig;
use intent_parser::{init as init_intent_parser, Size};
use shop_services::{
    create_checkout_client, create_disambiguator, init as init_shop_services, BackendKind,
};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Backend {
    /// Offline: every remote lookup is unavailable
    Mock,
    /// Web service proxy (normalize, embeddings-match, checkout routes)
    Http,
    /// Gemini API directly, checkout via the service proxy
    Gemini,
}

impl From<Backend> for BackendKind {
    fn from(backend: Backend) -> Self {
        match backend {
            Backend::Mock => BackendKind::Mock,
            Backend::Http => BackendKind::Http,
            Backend::Gemini => BackendKind::Gemini,
        }
    }
}

#[derive(Parser)]
#[command(name = "voice-shop")]
#[command(about = "Voice Shopping Command Demo")]
struct Args {
    /// YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Disambiguation backend (overrides the config file)
    #[arg(long, value_enum)]
    backend: Option<Backend>,

    /// Interactive mode (read commands from stdin)
    #[arg(long)]
    interactive: bool,

    /// Test specific command
    #[arg(long)]
    test_command: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();

    let args = Args::parse();

    info!("🛒 Starting Voice Shopping Demo");

    init_intent_parser()?;
    init_shop_services()?;
    init_cart_session()?;

    let mut config = match &args.config {
        Some(path) => VoiceShopConfig::load(path)?,
        None => VoiceShopConfig::default(),
    };
    if let Some(backend) = args.backend {
        config.backend = backend.into();
    }

    let handle = build_session(&config)?;

    if let Some(test_cmd) = args.test_command {
        test_single_command(&test_cmd, &handle).await;
    } else if args.interactive {
        run_interactive_demo(&handle).await?;
    } else {
        run_demo_commands(&handle).await;
    }

    info!("✅ Voice shop demo completed");
    Ok(())
}

fn build_session(config: &VoiceShopConfig) -> Result<SessionHandle> {
    let catalog = Arc::new(config.catalog()?);
    let remote = create_disambiguator(config.backend, &config.services, &config.gemini)
        .with_context(|| format!("Failed to create {:?} backend", config.backend))?;
    info!(
        backend = remote.name(),
        products = catalog.products().len(),
        "session ready"
    );

    let mut session = VoiceSession::new(catalog, remote, config.session.clone());
    match create_checkout_client(config.backend, &config.services) {
        Ok(client) => session = session.with_checkout(client),
        Err(e) => warn!("Checkout disabled: {}", e),
    }
    Ok(SessionHandle::new(session))
}

async fn test_single_command(command: &str, handle: &SessionHandle) {
    println!("🎤 Heard: \"{}\"", command);
    match handle.submit(command).await {
        Some(turn) => print_turn(&turn),
        None => println!("⚠️  Nothing to interpret"),
    }
}

fn print_turn(turn: &Turn) {
    let command = &turn.command;
    println!("✅ Parsed: {} → {}", command.action, command.object);
    println!("   Intent: {}", command.intent);
    println!("   Status: {}", command.status);
    for toast in &turn.toasts {
        println!("🔔 {}", toast);
    }
}

async fn print_cart(handle: &SessionHandle) {
    let snapshot = handle.snapshot().await;
    if snapshot.cart.is_empty() {
        println!("🛒 Cart is empty");
    } else {
        println!("🛒 Cart:");
        for line in &snapshot.cart {
            println!(
                "   {} ({}) x{}  {}",
                line.name,
                line.size,
                line.qty,
                format_cents(line.subtotal_cents())
            );
        }
        println!("   Total: {}", format_cents(snapshot.total_cents));
    }
    if let Some(pending) = &snapshot.pending {
        println!("   Waiting for a size for {}", pending.product_name);
    }
}

async fn print_log(handle: &SessionHandle) {
    let snapshot = handle.snapshot().await;
    if snapshot.log.is_empty() {
        println!("📜 No actions yet");
        return;
    }
    println!("📜 Action log:");
    for entry in &snapshot.log {
        println!(
            "   {}  {}  {}  {}",
            entry.clock_label(),
            entry.action,
            entry.object,
            entry.status
        );
    }
}

async fn checkout(handle: &SessionHandle) {
    match handle.checkout().await {
        CheckoutOutcome::Redirect(url) => println!("💳 Continue to checkout: {}", url),
        CheckoutOutcome::Failed(message) => println!("🔔 {}", message),
    }
}

/// Handle a `:`-prefixed REPL command.
async fn run_meta_command(line: &str, handle: &SessionHandle) -> Result<()> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.as_slice() {
        [":cart"] => print_cart(handle).await,
        [":log"] => print_log(handle).await,
        [":checkout"] => checkout(handle).await,
        [":qty", product_id, size, delta] => {
            let name = product_name(handle, product_id).await?;
            let size: Size = size.parse()?;
            let delta: i64 = delta
                .parse()
                .with_context(|| format!("Invalid quantity change '{}'", delta))?;
            let toast = handle.adjust_quantity(&name, size, delta).await?;
            println!("🔔 {}", toast);
        }
        [":size", product_id, from, to] => {
            let name = product_name(handle, product_id).await?;
            let from: Size = from.parse()?;
            let to: Size = to.parse()?;
            if let Some(toast) = handle.change_size(&name, from, to).await? {
                println!("🔔 {}", toast);
            }
        }
        _ => {
            return Err(anyhow!(
                "Unknown command '{}' (try :cart, :log, :checkout, :qty, :size)",
                line
            ))
        }
    }
    Ok(())
}

async fn product_name(handle: &SessionHandle, product_id: &str) -> Result<String> {
    let name = handle
        .with_session(|s| s.product(product_id).map(|p| p.name.clone()))
        .await?;
    Ok(name)
}

async fn run_interactive_demo(handle: &SessionHandle) -> Result<()> {
    println!("🎤 Interactive Voice Shopping Demo");
    println!("Type shopping commands and press Enter (or 'quit' to exit):");
    println!("Examples:");
    println!("  - 'add to cart the stadium mesh pants'");
    println!("  - 'medium'");
    println!("  - 'buy two velocity track jacket size large'");
    println!("  - 'open size guide for studio cargo shorts'");
    println!("  - 'remove the velocity track jacket'");
    println!("  - 'clear cart'");
    println!("Meta commands: :cart, :log, :checkout, :qty <product-id> <size> <delta>, :size <product-id> <from> <to>");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("🎤 Command: ");
        stdout.flush()?;

        let mut input = String::new();
        if stdin.read_line(&mut input)? == 0 {
            break;
        }
        let command = input.trim();

        if command.eq_ignore_ascii_case("quit") || command.eq_ignore_ascii_case("exit") {
            break;
        }

        if command.starts_with(':') {
            if let Err(e) = run_meta_command(command, handle).await {
                error!("{:#}", e);
                println!("❌ {:#}", e);
            }
        } else if !command.is_empty() {
            test_single_command(command, handle).await;
        }
        println!();
    }

    Ok(())
}

async fn run_demo_commands(handle: &SessionHandle) {
    let demo_commands = vec![
        "add to cart the stadium mesh pants",
        "medium",
        "add to cart the velocity track jacket size medium",
        "buy two velocity track jacket size medium",
        "remove the velocity track jacket",
        "open size guide for studio cargo shorts",
        "clear cart",
    ];

    println!(
        "🎤 Running Voice Shopping Demo with {} commands",
        demo_commands.len()
    );
    println!();

    for (i, command) in demo_commands.iter().enumerate() {
        println!("{}/{}: {}", i + 1, demo_commands.len(), command);
        test_single_command(command, handle).await;
        print_cart(handle).await;
        println!();
    }

    print_log(handle).await;
    println!("🎉 Demo completed! All commands processed.");
}

fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
