use clap::Parser;
use hm_switch_bridge::config::{self, Config};
use hm_switch_bridge::device::DeviceRegistry;
use hm_switch_bridge::device::mqtt::MqttDevice;
use hm_switch_bridge::entity::{Dispatcher, setup_switches};
use hm_switch_bridge::input::mqtt::{MqttClient, MqttIntegration, topics};
use log::{error, info};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;

#[derive(Parser, Debug)]
#[command(version, about = "Expose Homematic switches and dimmers as switch entities")]
struct Args {
    /// Path to the JSON configuration file
    #[arg(short, long, env = "HM_BRIDGE_CONFIG")]
    config: Option<PathBuf>,
}

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    // .env must be applied while the process is still single-threaded
    config::load_dotenv();
    init_logger();
    let args = Args::parse();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to start tokio runtime: {}", e);
            std::process::exit(1);
        }
    };
    runtime.block_on(run(args));
}

async fn run(args: Args) {
    let path = args.config.unwrap_or_else(Config::default_path);

    info!("Starting Homematic switch bridge");
    let config = match Config::load(&path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration from {}: {}", path.display(), e);
            std::process::exit(1);
        }
    };
    info!("Configuration loaded from {}:", path.display());
    info!(
        "  MQTT broker: {}:{}",
        config.mqtt.broker_host, config.mqtt.broker_port
    );
    info!("  Topic prefix: {}", config.mqtt.topic_prefix);

    let mqtt_client = MqttClient::new(&config.mqtt);

    let registry = DeviceRegistry::new();
    for device in &config.devices {
        registry.register(Arc::new(MqttDevice::new(
            device,
            config.mqtt.topic_prefix.clone(),
            mqtt_client.client(),
        )));
    }
    if registry.is_empty() {
        error!("No devices configured");
        std::process::exit(1);
    }
    info!("  Devices: {}", registry.len());

    let switches = setup_switches(&config.switches, &registry);
    if switches.is_empty() {
        error!("No usable switches configured");
        std::process::exit(1);
    }

    let integration = MqttIntegration::new(
        config.mqtt.topic_prefix.clone(),
        Dispatcher::new(switches.iter().cloned()),
    )
    .with_publisher(mqtt_client.client());
    let tasks = integration.start(mqtt_client);

    info!("Homematic switch bridge is running");
    info!(
        "  - Entity commands: {}",
        topics::entity_command_filter(&config.mqtt.topic_prefix)
    );
    info!("  - Press Ctrl+C to exit");

    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Received shutdown signal");
        }
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
        }
    }

    tasks.abort();
    info!("Homematic switch bridge stopped");
}
