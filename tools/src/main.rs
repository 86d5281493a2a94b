//! churnwatch-runner: headless churn-risk analysis over order histories.
//!
//! Usage:
//!   churnwatch-runner --input histories.json [--now 2025-06-30] [--config cfg.json] [--json]
//!   churnwatch-runner --synthetic 40 --seed 12345 [--now 2025-06-30]
//!   churnwatch-runner --ipc-mode [--config cfg.json]

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use churnwatch_core::{
    clock::{Clock, FixedClock, SystemClock},
    config::EngineConfig,
    synth,
    types::parse_ledger_date,
    ChurnEngine, ChurnPrediction, OrderHistory,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcRequest {
    Analyze {
        history: OrderHistory,
        #[serde(default)]
        now: Option<String>,
    },
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let json_out = args.iter().any(|a| a == "--json");
    let seed = parse_arg(&args, "--seed", 42u64);
    let synthetic = parse_arg(&args, "--synthetic", 0usize);

    let config = match string_arg(&args, "--config") {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let engine = ChurnEngine::new(config)?;

    let clock: Box<dyn Clock> = match string_arg(&args, "--now") {
        Some(raw) => Box::new(FixedClock::new(parse_now(raw)?)),
        None => Box::new(SystemClock),
    };

    if ipc_mode {
        return run_ipc_loop(&engine, clock.as_ref());
    }

    let now = clock.now();
    let histories = if synthetic > 0 {
        synth::generate_population(seed, synthetic, now)
    } else {
        let path = string_arg(&args, "--input")
            .ok_or_else(|| anyhow!("one of --input, --synthetic or --ipc-mode is required"))?;
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Cannot read {path}"))?;
        serde_json::from_str::<Vec<OrderHistory>>(&content)
            .with_context(|| format!("Cannot parse order histories in {path}"))?
    };

    let outcome = engine.analyze_batch(&histories, now);

    if json_out {
        println!("{}", serde_json::to_string_pretty(&outcome.predictions)?);
    } else {
        println!("churnwatch — {} customers, now = {now}", histories.len());
        println!();
        for p in &outcome.predictions {
            print_prediction(p);
        }
    }

    for (customer_id, e) in &outcome.failures {
        eprintln!("skipped {customer_id}: {e}");
    }

    Ok(())
}

fn run_ipc_loop(engine: &ChurnEngine, clock: &dyn Clock) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let request: IpcRequest = match serde_json::from_str(&buffer) {
            Ok(r) => r,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        match request {
            IpcRequest::Quit => break,
            IpcRequest::Analyze { history, now } => {
                let now = match now.as_deref().map(parse_now).transpose() {
                    Ok(n) => n.unwrap_or_else(|| clock.now()),
                    Err(e) => {
                        write_error(&mut stdout, &e.to_string())?;
                        continue;
                    }
                };
                match engine.analyze(&history, now) {
                    Ok(prediction) => {
                        writeln!(stdout, "{}", serde_json::to_string(&prediction)?)?;
                    }
                    Err(e) => write_error(&mut stdout, &e.to_string())?,
                }
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn write_error(stdout: &mut io::Stdout, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(stdout, "{}", err_json)?;
    stdout.flush()?;
    Ok(())
}

fn print_prediction(p: &ChurnPrediction) {
    println!(
        "  {:<8} {:<36} {:<9} score={:>3} confidence={:>2} at_risk=${:.0}",
        p.customer_id, p.display_name, p.risk_level, p.risk_score, p.confidence_level, p.revenue_at_risk,
    );
    println!("           {}", p.narrative);
    println!("           → {}", p.recommended_action);
    println!();
}

fn parse_now(raw: &str) -> Result<DateTime<Utc>> {
    parse_ledger_date(raw).ok_or_else(|| anyhow!("Cannot parse --now value '{raw}'"))
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
