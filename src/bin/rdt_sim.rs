//! Reliable data transfer simulation
//!
//! Runs one unidirectional A -> B transfer with the alternating-bit, go-back-N
//! or selective-repeat protocol over a lossy, corrupting channel and prints a
//! summary line.

use clap::Parser;
use rdt_sim::error::ConfigError;
use rdt_sim::net::{Entity, NetWorld, schedule_workload};
use rdt_sim::proto::Protocol;
use rdt_sim::sim::{RunSpec, Simulator};
use rdt_sim::viz::VizLogger;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "rdt-sim", about = "Simulate reliable data transfer (abt / gbn / sr) over a lossy channel")]
struct Args {
    /// JSON run spec; flags given on the command line override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Protocol: abt, gbn or sr
    #[arg(long)]
    protocol: Option<String>,

    /// Number of application messages to send
    #[arg(long)]
    messages: Option<u64>,

    /// Packet loss probability
    #[arg(long)]
    loss: Option<f64>,

    /// Packet corruption probability
    #[arg(long)]
    corrupt: Option<f64>,

    /// Gap between application messages (ms)
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Retransmission timeout (ms)
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Window size (ignored by abt)
    #[arg(long)]
    window: Option<usize>,

    /// Give up after this many retransmission rounds without progress
    #[arg(long)]
    max_retransmits: Option<u32>,

    /// RNG seed for the channel
    #[arg(long)]
    seed: Option<u64>,

    /// Stop the simulation at this time (ms); default runs to completion
    #[arg(long)]
    until_ms: Option<u64>,

    /// Write trace events as JSON to this file
    #[arg(long)]
    trace_json: Option<PathBuf>,
}

impl Args {
    fn into_spec(self) -> Result<(RunSpec, Option<PathBuf>), ConfigError> {
        let mut spec = match &self.config {
            Some(path) => RunSpec::from_json_file(path)?,
            None => RunSpec::default(),
        };
        if let Some(p) = &self.protocol {
            spec.protocol = p.parse::<Protocol>()?;
        }
        if let Some(v) = self.messages {
            spec.messages = v;
        }
        if let Some(v) = self.loss {
            spec.loss_prob = v;
        }
        if let Some(v) = self.corrupt {
            spec.corrupt_prob = v;
        }
        if let Some(v) = self.interval_ms {
            spec.interval_ms = v;
        }
        if let Some(v) = self.timeout_ms {
            spec.timeout_ms = v;
        }
        if let Some(v) = self.window {
            spec.window_size = v;
        }
        if self.max_retransmits.is_some() {
            spec.max_retransmits = self.max_retransmits;
        }
        if let Some(v) = self.seed {
            spec.seed = v;
        }
        if self.until_ms.is_some() {
            spec.until_ms = self.until_ms;
        }
        spec.validate()?;
        Ok((spec, self.trace_json))
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let (spec, trace_json) = match Args::parse().into_spec() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };

    let mut world = match NetWorld::new(&spec) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };
    if trace_json.is_some() {
        world.net.viz = Some(VizLogger::default());
        world.emit_meta(&spec);
    }

    let mut sim = Simulator::default();
    world.init(&mut sim);
    schedule_workload(&mut sim, &spec);
    match spec.until() {
        Some(until) => sim.run_until(until, &mut world),
        None => sim.run(&mut world),
    }

    if let Some(path) = trace_json {
        if let Some(v) = world.net.viz.take() {
            let written = serde_json::to_string_pretty(&v.events)
                .map_err(|e| e.to_string())
                .and_then(|json| fs::write(&path, json).map_err(|e| e.to_string()));
            match written {
                Ok(()) => eprintln!("wrote trace events to {}", path.display()),
                Err(e) => {
                    eprintln!("error: writing {}: {e}", path.display());
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    let s = world.sender.stats();
    let net = &world.net.stats;
    println!(
        "done @ {}\n  {}: delivered={}/{} sent={} retransmitted={} timeouts={} state={:?}\n  channel: data_tx={} data_lost={} data_corrupted={} ack_tx={} ack_lost={} ack_corrupted={}",
        sim.now(),
        spec.protocol,
        world.receiver.delivered_count(),
        spec.messages,
        s.sent,
        s.retransmitted,
        s.timeouts,
        world.sender.state(),
        net.dir(Entity::A).transmitted,
        net.dir(Entity::A).lost,
        net.dir(Entity::A).corrupted,
        net.dir(Entity::B).transmitted,
        net.dir(Entity::B).lost,
        net.dir(Entity::B).corrupted,
    );
    ExitCode::SUCCESS
}
