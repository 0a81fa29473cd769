//! `doorlock`: run the door lock nodes on a host.
//!
//! `sim` runs both nodes in one process over an in-memory link. `control`
//! and `hmi` run one node each and carry the link over TCP.

mod console;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use structopt::StructOpt;
use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};
use tracing::info;
use tracing_subscriber::EnvFilter;

use doorlock_control::ControlNode;
use doorlock_core::LockConfig;
use doorlock_hardware::devices::AnyStore;
use doorlock_hardware::eeprom::FileEeprom;
use doorlock_hardware::mock::{MockBuzzer, MockEeprom, MockKeypad, MockMotor, VirtualLcd};
use doorlock_hmi::HmiNode;
use doorlock_protocol::SerialLink;

#[derive(StructOpt, Debug)]
#[structopt(name = "doorlock", about = "Two-node keypad door lock")]
struct Opt {
    /// JSON configuration file; both nodes must use the same timing.
    #[structopt(long, global = true, parse(from_os_str))]
    config: Option<PathBuf>,

    #[structopt(subcommand)]
    command: SubCommand,
}

#[derive(StructOpt, Debug)]
#[structopt(rename_all = "kebab-case")]
enum SubCommand {
    /// Run both nodes in this process, keys from stdin.
    Sim {
        /// Persist the password store to this image file.
        #[structopt(long, parse(from_os_str))]
        eeprom: Option<PathBuf>,
    },
    /// Run the Control node and wait for one HMI connection.
    Control {
        #[structopt(long)]
        listen: SocketAddr,

        /// Persist the password store to this image file.
        #[structopt(long, parse(from_os_str))]
        eeprom: Option<PathBuf>,
    },
    /// Run the HMI node against a remote Control node, keys from stdin.
    Hmi {
        #[structopt(long)]
        connect: SocketAddr,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let opt = Opt::from_args();
    info!("doorlock {}", doorlock_core::VERSION);
    let config = match &opt.config {
        Some(path) => LockConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => LockConfig::default(),
    };

    match opt.command {
        SubCommand::Sim { eeprom } => simulate(config, eeprom).await,
        SubCommand::Control { listen, eeprom } => control(config, listen, eeprom).await,
        SubCommand::Hmi { connect } => hmi(config, connect).await,
    }
}

async fn open_store(eeprom: Option<PathBuf>) -> Result<AnyStore> {
    let store = match eeprom {
        Some(path) => AnyStore::File(
            FileEeprom::open(&path)
                .await
                .with_context(|| format!("opening EEPROM image {}", path.display()))?,
        ),
        None => AnyStore::Memory(MockEeprom::new().0),
    };
    info!("Password store: {}", store.describe());
    Ok(store)
}

async fn simulate(config: LockConfig, eeprom: Option<PathBuf>) -> Result<()> {
    let (control_end, hmi_end) = SerialLink::pair();
    let store = open_store(eeprom).await?;
    let (motor, _motor) = MockMotor::new();
    let (buzzer, _buzzer) = MockBuzzer::new();
    let (keypad, keys) = MockKeypad::new();
    let (lcd, screen) = VirtualLcd::new();

    let mut control = ControlNode::new(control_end, store, motor, buzzer, config.clone())?;
    let mut hmi = HmiNode::new(hmi_end, keypad, lcd, config)?;

    info!("Simulator running; type keys (0-9 = + - * / c) and press Enter");
    tokio::select! {
        result = control.run() => result?,
        result = hmi.run() => result?,
        result = console::keypad_input(BufReader::new(tokio::io::stdin()), &keys) => result?,
        _ = console::render_screen(screen) => {}
        _ = tokio::signal::ctrl_c() => info!("Interrupted"),
    }
    Ok(())
}

async fn control(config: LockConfig, listen: SocketAddr, eeprom: Option<PathBuf>) -> Result<()> {
    let store = open_store(eeprom).await?;
    let (motor, _motor) = MockMotor::new();
    let (buzzer, _buzzer) = MockBuzzer::new();

    let listener = TcpListener::bind(listen)
        .await
        .with_context(|| format!("binding {}", listen))?;
    info!("Waiting for the HMI node on {}", listener.local_addr()?);
    let (stream, peer) = listener.accept().await?;
    stream.set_nodelay(true)?;
    info!(%peer, "HMI node connected");

    let link = SerialLink::with_name(stream, "tcp");
    let mut node = ControlNode::new(link, store, motor, buzzer, config)?;
    tokio::select! {
        result = node.run() => result?,
        _ = tokio::signal::ctrl_c() => info!("Interrupted"),
    }
    Ok(())
}

async fn hmi(config: LockConfig, connect: SocketAddr) -> Result<()> {
    let stream = TcpStream::connect(connect)
        .await
        .with_context(|| format!("connecting to the Control node at {}", connect))?;
    stream.set_nodelay(true)?;
    info!(%connect, "Connected to the Control node");

    let (keypad, keys) = MockKeypad::new();
    let (lcd, screen) = VirtualLcd::new();
    let link = SerialLink::with_name(stream, "tcp");
    let mut node = HmiNode::new(link, keypad, lcd, config)?;

    tokio::select! {
        result = node.run() => result?,
        result = console::keypad_input(BufReader::new(tokio::io::stdin()), &keys) => result?,
        _ = console::render_screen(screen) => {}
        _ = tokio::signal::ctrl_c() => info!("Interrupted"),
    }
    Ok(())
}
