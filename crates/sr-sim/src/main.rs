//! SpinRig batch spin simulator
//!
//! Drives whole sessions headlessly, fast-forwarding each cycle's virtual
//! clock, and reports the aggregate statistics. Per-session seeds are drawn
//! from one ChaCha8 master stream, so a run is fully determined by `--seed`
//! regardless of platform.
//!
//! Usage:
//!   sr-sim run --spins 10000 --seed 7
//!   sr-sim run --sessions 4 --mode paylines --json
//!   sr-sim paytable
//!   sr-sim config

use clap::{Parser, Subcommand, ValueEnum};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use sr_core::{GameConfig, SpinSchedule, TimingConfig, WinMode};
use sr_engine::{GameSession, SessionStats, SpinError};

#[derive(Parser)]
#[command(name = "sr-sim", about = "SpinRig batch spin simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a batch of spins and report session statistics
    Run {
        /// Spins per session
        #[arg(long, default_value_t = 10_000)]
        spins: u64,
        /// Bet per spin (clamped to the config bounds)
        #[arg(long, default_value_t = 1.0)]
        bet: f64,
        /// Independent sessions to run
        #[arg(long, default_value_t = 1)]
        sessions: u32,
        /// Master seed for the whole run
        #[arg(long, default_value_t = 0xC0FFEE)]
        seed: u64,
        /// Win-evaluation mode
        #[arg(long, value_enum, default_value_t = ModeArg::ReelHorizontal)]
        mode: ModeArg,
        /// Timing profile (the sim fast-forwards virtual time either way)
        #[arg(long, value_enum, default_value_t = TimingArg::Instant)]
        timing: TimingArg,
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the symbol catalog and payline set
    Paytable,
    /// Print the default game config as JSON
    Config,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    ReelHorizontal,
    Paylines,
}

impl From<ModeArg> for WinMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::ReelHorizontal => WinMode::ReelHorizontal,
            ModeArg::Paylines => WinMode::Paylines,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TimingArg {
    Instant,
    Normal,
    Turbo,
}

impl From<TimingArg> for TimingConfig {
    fn from(arg: TimingArg) -> Self {
        match arg {
            TimingArg::Instant => TimingConfig::instant(),
            TimingArg::Normal => TimingConfig::normal(),
            TimingArg::Turbo => TimingConfig::turbo(),
        }
    }
}

/// One session's report
#[derive(Debug, Serialize)]
struct SessionReport {
    seed: u64,
    spins_completed: u64,
    final_balance: f64,
    total_winnings: f64,
    stats: SessionStats,
}

/// Whole-run report
#[derive(Debug, Serialize)]
struct RunReport {
    master_seed: u64,
    sessions: Vec<SessionReport>,
    combined: SessionStats,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            spins,
            bet,
            sessions,
            seed,
            mode,
            timing,
            json,
        } => run_batch(spins, bet, sessions, seed, mode.into(), timing.into(), json),
        Commands::Paytable => print_paytable(),
        Commands::Config => println!("{}", GameConfig::classic().export_json()),
    }
}

fn run_batch(
    spins: u64,
    bet: f64,
    sessions: u32,
    master_seed: u64,
    mode: WinMode,
    timing: TimingConfig,
    json: bool,
) {
    log::info!(
        "starting batch: {} session(s) × {} spins, master seed {}",
        sessions,
        spins,
        master_seed
    );

    let config = GameConfig {
        win_mode: mode,
        ..GameConfig::classic()
    };

    let mut master = ChaCha8Rng::seed_from_u64(master_seed);
    let mut reports = Vec::with_capacity(sessions as usize);

    for _ in 0..sessions.max(1) {
        let session_seed: u64 = master.random();
        reports.push(run_session(&config, &timing, session_seed, spins, bet));
    }

    let combined = combine(&reports);
    let report = RunReport {
        master_seed,
        sessions: reports,
        combined,
    };

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(out) => println!("{out}"),
            Err(err) => log::error!("failed to serialize report: {err}"),
        }
    } else {
        print_report(&report);
    }
}

fn run_session(
    config: &GameConfig,
    timing: &TimingConfig,
    seed: u64,
    spins: u64,
    bet: f64,
) -> SessionReport {
    let mut session = GameSession::with_timing(config.clone(), timing.clone())
        .expect("classic config is valid");
    session.seed(seed);
    session.set_bet(bet);

    let mut completed = 0u64;
    let mut clock = 0.0;
    for _ in 0..spins {
        match session.spin(clock) {
            Ok(()) => {
                // Jump the virtual clock to the end of this cycle's plan
                clock = SpinSchedule::generate(timing, config.reels, clock).end();
                session.fast_forward();
                completed += 1;
            }
            Err(SpinError::InsufficientBalance { balance, bet }) => {
                log::warn!(
                    "session {seed}: bust after {completed} spins (balance {balance}, bet {bet})"
                );
                break;
            }
            Err(err) => {
                log::error!("session {seed}: unexpected rejection: {err}");
                break;
            }
        }
    }

    SessionReport {
        seed,
        spins_completed: completed,
        final_balance: session.state().balance,
        total_winnings: session.state().total_winnings,
        stats: session.stats().clone(),
    }
}

fn combine(reports: &[SessionReport]) -> SessionStats {
    let mut combined = SessionStats::default();
    for report in reports {
        let stats = &report.stats;
        combined.total_spins += stats.total_spins;
        combined.total_bet += stats.total_bet;
        combined.total_win += stats.total_win;
        combined.wins += stats.wins;
        combined.losses += stats.losses;
        if stats.max_win_ratio > combined.max_win_ratio {
            combined.max_win_ratio = stats.max_win_ratio;
        }
    }
    combined
}

fn print_report(report: &RunReport) {
    for session in &report.sessions {
        println!(
            "session {:>20}  spins {:>8}  hit {:>6.2}%  rtp {:>10.2}%  balance {:>12.2}",
            session.seed,
            session.spins_completed,
            session.stats.hit_rate(),
            session.stats.rtp(),
            session.final_balance,
        );
    }

    let combined = &report.combined;
    println!("---");
    println!("spins        {}", combined.total_spins);
    println!("total bet    {:.2}", combined.total_bet);
    println!("total win    {:.2}", combined.total_win);
    println!("hit rate     {:.2}%", combined.hit_rate());
    println!("rtp          {:.2}%", combined.rtp());
    println!("max ratio    {:.2}x", combined.max_win_ratio);
}

fn print_paytable() {
    let config = GameConfig::classic();

    println!("symbols:");
    for symbol in &config.symbols.symbols {
        println!(
            "  {:>2}  {:<8} {:<8} value {:>6.0}  {}",
            symbol.id, symbol.slug, symbol.glyph, symbol.value, symbol.color
        );
    }

    println!("paylines (legacy mode):");
    for line in &config.pay_lines {
        println!(
            "  line {}  positions {:?}  ×{}",
            line.index, line.positions, line.multiplier
        );
    }
}
