//! Voice Price Kiosk Demo Application
//!
//! Drives the kiosk controller end to end with scripted speech engines:
//! Toggle → Recognizer → Intent Matching → Price Catalog → Response → Synthesizer

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::info;

use intent_parser::Commodity;
use kiosk_core::controller::describe_error;
use kiosk_core::{
    assemble_controller, build_controller, ChannelSink, KioskConfig, KioskController, KioskEvent,
    KioskUpdate, Phase,
};
use voice_local::plugin::SpeechBackendKind;
use voice_local::{
    MockOutcome, MockRecognizer, MockRecognizerHandle, MockSynthesizer, MockSynthesizerHandle,
    RecognitionErrorKind,
};

#[derive(Parser)]
#[command(name = "kiosk", version, about = "Marathi voice kiosk for market prices")]
struct Cli {
    /// Config file (YAML or JSON); missing file means defaults
    #[arg(long, global = true, default_value = "kiosk.yaml")]
    config: PathBuf,

    /// YAML price catalog overriding the built-in prices
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Pin today's date (YYYY-MM-DD)
    #[arg(long, global = true)]
    date: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one listen/answer cycle with the given transcript
    Ask {
        #[arg(long)]
        text: String,
    },
    /// Read transcripts from stdin, one per line
    Interactive,
    /// Run one cycle that ends in a recognition error
    SimulateError {
        /// Engine error code, e.g. not-allowed, no-speech, language-not-supported
        #[arg(long, default_value = "no-speech")]
        kind: String,
    },
    /// Print the price catalog
    Catalog,
    /// List synthesizer voices and the one selected
    Voices,
}

/// Controller plus handles onto its mock engines.
struct Kiosk {
    controller: KioskController,
    tx: mpsc::UnboundedSender<KioskEvent>,
    rx: mpsc::UnboundedReceiver<KioskEvent>,
    updates: mpsc::UnboundedReceiver<KioskUpdate>,
    rec: Option<MockRecognizerHandle>,
    tts: Option<MockSynthesizerHandle>,
}

impl Kiosk {
    fn new(config: &KioskConfig) -> Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let (update_tx, updates) = mpsc::unbounded_channel();
        let sink = ChannelSink::shared(tx.clone());

        if config.backend != SpeechBackendKind::Mock {
            let controller = build_controller(config, sink)?.with_observer(update_tx);
            return Ok(Self {
                controller,
                tx,
                rx,
                updates,
                rec: None,
                tts: None,
            });
        }

        let recognizer = MockRecognizer::new(config.recognition.clone(), sink.clone());
        let synthesizer = MockSynthesizer::new(sink);
        let rec = recognizer.handle();
        let tts = synthesizer.handle();
        let controller = assemble_controller(
            config,
            Some(Box::new(recognizer)),
            Some(Box::new(synthesizer)),
        )?
        .with_observer(update_tx);
        Ok(Self {
            controller,
            tx,
            rx,
            updates,
            rec: Some(rec),
            tts: Some(tts),
        })
    }

    /// Press the button with `outcome` scripted, then let any answer finish.
    fn cycle(&mut self, outcome: MockOutcome) -> Result<()> {
        let Some(rec) = &self.rec else {
            println!("⚠️  {}", self.controller.status());
            return Ok(());
        };
        rec.push(outcome);

        self.tx.send(KioskEvent::Toggle)?;
        self.controller.process_pending(&mut self.rx);
        while let Ok(update) = self.updates.try_recv() {
            if report(&update) {
                if let Some(tts) = &self.tts {
                    tts.finish();
                }
                self.controller.process_pending(&mut self.rx);
            }
        }
        Ok(())
    }
}

/// Print one controller update. Returns `true` when an answer started playing.
fn report(update: &KioskUpdate) -> bool {
    match update {
        KioskUpdate::Status(status) => println!("📟 {}", status),
        KioskUpdate::Speaking(text) => {
            println!("🔊 {}", text);
            return true;
        }
        KioskUpdate::Phase(_) => {}
    }
    false
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();

    let cli = Cli::parse();
    kiosk_core::init();

    let mut config = KioskConfig::load(&cli.config)?;
    if cli.catalog.is_some() {
        config.catalog_file = cli.catalog.clone();
    }
    if cli.date.is_some() {
        config.date = cli.date.clone();
    }

    info!("🎤 Starting kiosk ({:?} backend)", config.backend);

    match cli.command {
        Commands::Ask { text } => {
            let mut kiosk = Kiosk::new(&config)?;
            println!("🎤 \"{}\"", text);
            kiosk.cycle(MockOutcome::Transcript(text))?;
        }
        Commands::SimulateError { kind } => {
            let kind = RecognitionErrorKind::from_code(&kind);
            let mut kiosk = Kiosk::new(&config)?;
            println!("🎤 simulating {}", describe_error(&kind));
            kiosk.cycle(MockOutcome::Error(kind))?;
        }
        Commands::Interactive => run_interactive(&config).await?,
        Commands::Catalog => print_catalog(&config)?,
        Commands::Voices => {
            let kiosk = Kiosk::new(&config)?;
            print_voices(&kiosk);
        }
    }

    Ok(())
}

/// Feed typed transcripts to a controller running on its own thread.
async fn run_interactive(config: &KioskConfig) -> Result<()> {
    let Kiosk {
        mut controller,
        tx,
        rx,
        mut updates,
        rec,
        tts,
    } = Kiosk::new(config)?;

    let (Some(rec), Some(tts)) = (rec, tts) else {
        println!("⚠️  {}", controller.status());
        return Ok(());
    };

    // Catalog lookups may block, so the controller gets its own thread.
    let task = tokio::task::spawn_blocking(move || {
        controller.run_blocking(rx);
        controller
    });

    println!("🎤 Interactive kiosk");
    println!("Type what the farmer says and press Enter (or 'quit' to exit):");
    println!("Examples:");
    println!("  - 'आज कांदा भाव काय आहे'");
    println!("  - 'वाटाणा भाव'");
    println!("  - 'kanda'");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("🎤 ");
        stdout.flush()?;

        let mut input = String::new();
        if stdin.read_line(&mut input)? == 0 {
            break;
        }
        let line = input.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }
        if line.is_empty() {
            continue;
        }

        rec.push(MockOutcome::Transcript(line.to_string()));
        tx.send(KioskEvent::Toggle)?;

        // One cycle ends when the controller settles back to idle.
        while let Some(update) = updates.recv().await {
            if update == KioskUpdate::Phase(Phase::Idle) {
                break;
            }
            if report(&update) {
                tts.finish();
            }
        }
    }

    tx.send(KioskEvent::Shutdown)?;
    let controller = task.await?;
    println!();
    println!("Status log:");
    for status in controller.history() {
        println!("  📟 {}", status);
    }
    Ok(())
}

fn print_catalog(config: &KioskConfig) -> Result<()> {
    let catalog = kiosk_core::build_catalog(config)?;
    println!("Catalog: {}", catalog.name());
    for commodity in Commodity::ALL {
        println!("{} ({})", commodity.native_name(), commodity);
        match catalog.lookup(commodity) {
            Ok(records) if records.is_empty() => println!("  (no records)"),
            Ok(records) => {
                for r in records {
                    println!(
                        "  {:<12} {:>6} - {:<6} ₹/quintal",
                        r.location, r.min_price, r.max_price
                    );
                }
            }
            Err(e) => println!("  ❌ {}", e),
        }
    }
    Ok(())
}

fn print_voices(kiosk: &Kiosk) {
    let selected = kiosk.controller.selected_voice().map(|v| v.name.clone());
    match &kiosk.tts {
        Some(tts) => {
            for v in tts.voices() {
                let mark = if selected.as_deref() == Some(v.name.as_str()) {
                    "*"
                } else {
                    " "
                };
                println!("{} {:<16} {}", mark, v.name, v.language);
            }
        }
        None => println!("⚠️  {}", kiosk.controller.status()),
    }
    if selected.is_none() {
        println!("(no Marathi voice, engine default will be used)");
    }
}

fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
