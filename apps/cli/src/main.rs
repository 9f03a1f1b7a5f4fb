#![deny(warnings)]

//! Interactive terminal frontend for Statecraft.
//!
//! Replaces the dashboard/input/modal surface of the game: prints the
//! indicator dashboard each turn, takes one free-text policy action per
//! year, and drives the year loop with `:commands`.

use anyhow::Result;
use sim_core::{EffectDelta, EndingKind, EndingReport, GameState};
use sim_oracle::{GenerativeClient, NullOracle, Oracle, OracleConfig};
use sim_runtime::{ActionOutcome, ElectionResult, Session, SessionError, YearOutcome};
use std::io::{self, Write};
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

struct Args {
    db: Option<String>,
    seed: Option<u64>,
    offline: bool,
    version: bool,
}

fn parse_args() -> Args {
    let mut args = Args {
        db: None,
        seed: None,
        offline: false,
        version: false,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--db" => args.db = it.next(),
            "--seed" => args.seed = it.next().and_then(|s| s.parse().ok()),
            "--offline" => args.offline = true,
            "--version" => args.version = true,
            _ => {}
        }
    }
    args
}

fn read_line(prompt: &str) -> Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None); // EOF
    }
    Ok(Some(line.trim().to_string()))
}

fn print_dashboard(state: &GameState) {
    let ind = &state.indicators;
    println!();
    println!(
        "=== {} | President {} | overall score {:.0} ===",
        state.year, state.president_name, ind.overall_score
    );
    println!(
        "approval {:>5.1}%   | net assets {:>6.0}T | competitiveness {:>5.1}",
        ind.approval, ind.national_wealth, ind.competitiveness
    );
    println!(
        "technology {:>5.1} | econ health {:>5.1}  | unemployment {:>4.1}%",
        ind.technology, ind.economic_health, ind.unemployment
    );
    println!(
        "satisfaction {:>5.1} | relations {:>5.1}",
        ind.satisfaction, ind.relations
    );
    if state.action_taken_this_year() {
        println!("({}'s action is in; use :next to advance)", state.year);
    }
}

fn print_effects(label: &str, effects: &EffectDelta) {
    if effects.is_empty() {
        println!("{label}: no measurable effect");
        return;
    }
    let parts: Vec<String> = effects
        .entries()
        .into_iter()
        .map(|(name, v)| format!("{name} {v:+.1}"))
        .collect();
    println!("{label}: {}", parts.join(", "));
}

fn print_action_outcome(outcome: &ActionOutcome) {
    if outcome.fell_back {
        println!("(scoring service unavailable; used the built-in analyst)");
    }
    if let Some(analysis) = &outcome.record.analysis {
        println!("--- Policy analysis ---");
        println!("category: {} | feasibility: {}/10 | takes effect: {}",
            analysis.category,
            analysis.feasibility,
            analysis.timeframe.as_str()
        );
        println!("{}", analysis.reasoning);
    }
    print_effects("effects", &outcome.record.effects);
}

fn print_election(result: &ElectionResult) {
    println!("--- Election of {} ---", result.year);
    println!(
        "approval {:.1}% vs draw {:.1} -> {}",
        result.approval,
        result.roll,
        if result.won { "re-elected" } else { "defeated" }
    );
}

fn print_ending(ending: &EndingReport) {
    println!();
    println!("****** {} ******", ending.title);
    println!("{}", ending.description);
    println!("{}", ending.reason);
}

fn start_new_game(session: &mut Session) -> Result<bool> {
    loop {
        let Some(name) = read_line("president name> ")? else {
            return Ok(false);
        };
        match session.new_game(&name) {
            Ok(state) => {
                println!("Welcome, President {}. It is {}.", state.president_name, state.year);
                return Ok(true);
            }
            Err(e) => println!("{e}"),
        }
    }
}

/// Returns false when the player is done.
async fn handle_ending(
    session: &mut Session,
    store: &persistence::SaveStore,
    ending: &EndingReport,
) -> Result<bool> {
    print_ending(ending);
    session.save(store).await?;
    if ending.kind == EndingKind::Defeat {
        println!("The presidency is over. Starting fresh.");
        session.reset();
        store.clear().await?;
        return start_new_game(session);
    }
    loop {
        let Some(choice) = read_line("continue playing this game? [y/n]> ")? else {
            return Ok(false);
        };
        match choice.as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => {
                session.reset();
                store.clear().await?;
                return start_new_game(session);
            }
            _ => {}
        }
    }
}

async fn advance(session: &mut Session, store: &persistence::SaveStore) -> Result<bool> {
    let year = match session.game() {
        Some(state) => state.year,
        None => return Ok(true),
    };
    println!("... the year turns to {} ...", year + 1);
    match session.advance_year().await {
        Ok(YearOutcome::ElectionLost(result)) => {
            print_election(&result);
            println!("The voters have spoken; the presidency ends here.");
            store.clear().await?;
            start_new_game(session)
        }
        Ok(YearOutcome::Advanced {
            election,
            event,
            ending,
        }) => {
            if let Some(result) = &election {
                print_election(result);
            }
            match &event {
                Some(record) => {
                    println!("--- {} ---", record.title);
                    println!("{}", record.description);
                    print_effects("impact", &record.effects);
                }
                None => println!("A quiet year; nothing of note happened."),
            }
            session.save(store).await?;
            match &ending {
                Some(report) => handle_ending(session, store, report).await,
                None => Ok(true),
            }
        }
        Err(e) => {
            println!("{e}");
            Ok(true)
        }
    }
}

async fn submit(session: &mut Session, store: &persistence::SaveStore, text: &str) -> Result<bool> {
    match session.submit_action(text).await {
        Ok(outcome) => {
            print_action_outcome(&outcome);
            session.save(store).await?;
            match &outcome.ending {
                Some(report) => handle_ending(session, store, report).await,
                None => Ok(true),
            }
        }
        Err(e @ (SessionError::EmptyAction
        | SessionError::ActionTooLong(_)
        | SessionError::ActionAlreadyTaken(_))) => {
            println!("{e}");
            Ok(true)
        }
        Err(e) => Err(e.into()),
    }
}

fn print_help() {
    println!("Type a policy action for the year, or one of:");
    println!("  :next   advance to the next year");
    println!("  :save   save the game");
    println!("  :load   reload the saved game");
    println!("  :reset  abandon the game and start over");
    println!("  :help   this message");
    println!("  :quit   save and exit");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .init();

    let args = parse_args();
    if args.version {
        println!("statecraft {} ({})", env!("GIT_SHA"), env!("BUILD_DATE"));
        return Ok(());
    }

    let oracle: Box<dyn Oracle> = if args.offline {
        info!("running offline; the built-in analyst scores all actions");
        Box::new(NullOracle)
    } else {
        match std::env::var("GEMINI_API_KEY") {
            Ok(key) if !key.trim().is_empty() => {
                Box::new(GenerativeClient::new(OracleConfig::new(key.trim())))
            }
            _ => {
                warn!("GEMINI_API_KEY not set; running on the built-in analyst");
                Box::new(NullOracle)
            }
        }
    };

    let url = args
        .db
        .unwrap_or_else(|| persistence::default_sqlite_url().to_string());
    if let Some(path) = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
    {
        if let Some(parent) = std::path::Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let store = persistence::SaveStore::open(&url).await?;

    let mut session = match args.seed {
        Some(seed) => Session::with_seed(oracle, seed),
        None => Session::new(oracle),
    };

    match session.resume(&store).await? {
        Some(state) => println!(
            "Resumed {}'s presidency in {}.",
            state.president_name, state.year
        ),
        None => {
            if !start_new_game(&mut session)? {
                return Ok(());
            }
            session.save(&store).await?;
        }
    }
    print_help();

    loop {
        let Some(state) = session.game() else {
            break;
        };
        print_dashboard(state);
        let prompt = if state.action_taken_this_year() {
            "command> "
        } else {
            "action> "
        };
        let Some(line) = read_line(prompt)? else {
            break;
        };
        let keep_going = match line.as_str() {
            "" => true,
            ":quit" => {
                session.save(&store).await?;
                false
            }
            ":help" => {
                print_help();
                true
            }
            ":save" => {
                session.save(&store).await?;
                println!("game saved");
                true
            }
            ":load" => match session.resume(&store).await? {
                Some(state) => {
                    println!("loaded {}'s game in {}", state.president_name, state.year);
                    true
                }
                None => {
                    println!("no saved game");
                    true
                }
            },
            ":reset" => {
                session.reset();
                store.clear().await?;
                start_new_game(&mut session)?
            }
            ":next" => advance(&mut session, &store).await?,
            other if other.starts_with(':') => {
                println!("unknown command {other}; try :help");
                true
            }
            action => submit(&mut session, &store, action).await?,
        };
        if !keep_going {
            break;
        }
    }

    println!("Goodbye.");
    Ok(())
}
