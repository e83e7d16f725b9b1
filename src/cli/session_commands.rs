// Session command implementations: interactive run and non-interactive replay

use std::io::{self, BufRead, Write};

use serde::Serialize;
use tracing::{info, warn};

use exchange_sim::{
    load_order_records, parse_order_fields, Config, OrderRecord, OwnerId, Side, SimResult,
    SimSession,
};

/// Replay artifact written by `replay --report`.
#[derive(Debug, Serialize)]
struct ReplayReport {
    steps: usize,
    total_trades: usize,
    trades: Vec<OrderRecord>,
    ledger: Vec<(String, f64)>,
}

fn build_session(config: &Config) -> SimResult<SimSession> {
    let report = load_order_records(&config.data.csv_path)?;
    if report.skipped > 0 {
        warn!("{} malformed records skipped", report.skipped);
    }

    let opening: Vec<(String, f64)> = config
        .session
        .opening_balances
        .iter()
        .map(|(asset, amount)| (asset.clone(), *amount))
        .collect();

    SimSession::new(
        report.records,
        OwnerId::new(config.session.participant.clone()),
        &opening,
    )
}

/// Drive `steps` time steps without user interaction, optionally writing a
/// JSON report of the trades and the final ledger.
pub fn run_replay(config: &Config, steps: usize, report_path: Option<&str>) -> SimResult<()> {
    let mut session = build_session(config)?;
    let mut all_trades = Vec::new();

    for step in 1..=steps {
        let trades = session.step();
        info!("step {}/{}: {} sales", step, steps, trades.len());
        if config.logging.log_trades {
            for trade in &trades {
                info!(
                    "  {} {} {} @ {} ({})",
                    trade.side.as_str(),
                    trade.amount,
                    trade.product,
                    trade.price,
                    trade.owner
                );
            }
        }
        all_trades.extend(trades);
    }

    info!("replay complete: {} sales over {} steps", all_trades.len(), steps);
    print!("{}", session.ledger());

    if let Some(path) = report_path {
        let report = ReplayReport {
            steps,
            total_trades: all_trades.len(),
            trades: all_trades,
            ledger: session
                .ledger()
                .balances()
                .map(|(asset, amount)| (asset.to_string(), amount))
                .collect(),
        };
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| exchange_sim::SimError::BadInput(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| exchange_sim::SimError::DataFile {
            path: path.to_string(),
            source: e,
        })?;
        info!("report written to {}", path);
    }

    Ok(())
}

/// Interactive session: menu loop over stdin until the user quits.
pub fn run_interactive(config: &Config) -> SimResult<()> {
    let mut session = build_session(config)?;
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print_menu(session.current_time());
        let Some(Ok(choice)) = lines.next() else {
            break;
        };

        match choice.trim() {
            "1" => print_help(),
            "2" => print_market_stats(&session),
            "3" => enter_order(&mut session, Side::Ask, &mut lines, config),
            "4" => enter_order(&mut session, Side::Bid, &mut lines, config),
            "5" => print!("{}", session.ledger()),
            "6" => {
                println!("Going to next time frame.");
                let trades = session.step();
                for trade in &trades {
                    println!(
                        "Sale price: {} amount {}",
                        trade.price, trade.amount
                    );
                }
            }
            "7" => break,
            other => println!("Invalid choice: {}. Choose 1-7", other),
        }
    }

    Ok(())
}

fn print_menu(current_time: &str) {
    println!("1: Print help");
    println!("2: Print exchange stats");
    println!("3: Make an offer");
    println!("4: Make a bid");
    println!("5: Print wallet");
    println!("6: Continue");
    println!("7: Quit");
    println!("==============");
    println!("Current time is: {}", current_time);
}

fn print_help() {
    println!("Help - your aim is to make money. Analyse the market and make bids and offers.");
}

fn print_market_stats(session: &SimSession) {
    for stats in session.market_stats() {
        println!("Product: {}", stats.product);
        println!("Asks seen: {}", stats.asks_seen);
        match (stats.max_ask, stats.min_ask) {
            (Some(max), Some(min)) => {
                println!("Max ask: {}", max);
                println!("Min ask: {}", min);
            }
            _ => println!("No asks at this time"),
        }
    }
}

fn enter_order(
    session: &mut SimSession,
    side: Side,
    lines: &mut impl Iterator<Item = io::Result<String>>,
    config: &Config,
) {
    let verb = match side {
        Side::Ask => "an ask",
        _ => "a bid",
    };
    println!(
        "Make {} - enter: product,price,amount, eg ETH/BTC,200,0.5",
        verb
    );
    let _ = io::stdout().flush();

    let Some(Ok(line)) = lines.next() else {
        return;
    };

    let tokens = exchange_sim::data::tokenise(&line, ',');
    if tokens.len() != 3 {
        println!("Bad input: {}", line);
        return;
    }

    let parsed = parse_order_fields(&tokens[0], &tokens[1], &tokens[2]);
    let (product, price, amount) = match parsed {
        Ok(fields) => fields,
        Err(e) => {
            println!("Bad input: {}", e);
            return;
        }
    };

    match session.submit_order(side, &product, price, amount) {
        Ok(()) => println!("Wallet looks good."),
        Err(e) => {
            if config.logging.log_rejections {
                warn!("order rejected: {}", e);
            }
            println!("Wallet has insufficient funds: {}", e);
        }
    }
}
