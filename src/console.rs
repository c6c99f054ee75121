//! Colorful console output for the server and solver runs.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;

use crate::config::AppConfig;
use crate::solvers::ProblemKind;

/// ASCII art banner for server startup.
pub fn print_banner() {
    let banner = r#"
   ____                _     _             _             _
  / ___|___  _ __ ___ | |__ (_)_ __   __ _| |_ ___  _ __(_) ___ ___
 | |   / _ \| '_ ` _ \| '_ \| | '_ \ / _` | __/ _ \| '__| |/ __/ __|
 | |__| (_) | | | | | | |_) | | | | | (_| | || (_) | |  | | (__\__ \
  \____\___/|_| |_| |_|_.__/|_|_| |_|\__,_|\__\___/|_|  |_|\___|___/
"#;
    println!("{}", banner.cyan().bold());
    println!(
        "  {} {}\n",
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black(),
        "Combinatorics Solver".bright_cyan()
    );
}

/// Prints the effective configuration and the served problems.
pub fn print_config(config: &AppConfig) {
    let oauth = match &config.oauth {
        Some(oauth) => oauth.domain.as_str().bright_green().to_string(),
        None => "disabled".bright_red().to_string(),
    };
    println!(
        "{} {} {} OAuth ({}), session ttl ({}), tsp max cities ({}), knapsack max capacity ({}), knapsack max cells ({}), hamiltonian max nodes ({}), partitions max number ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Config]".bright_cyan(),
        oauth,
        format_duration(config.session_ttl.to_std().unwrap_or_default()).yellow(),
        config.limits.tsp_max_cities.to_formatted_string(&Locale::en).bright_yellow(),
        config.limits.knapsack_max_capacity.to_formatted_string(&Locale::en).bright_yellow(),
        config.limits.knapsack_max_cells.to_formatted_string(&Locale::en).bright_yellow(),
        config.limits.hamiltonian_max_nodes.to_formatted_string(&Locale::en).bright_yellow(),
        config.limits.partitions_max_number.to_formatted_string(&Locale::en).bright_yellow(),
    );
    for problem in ProblemKind::ALL {
        println!(
            "    {} POST /{:<18} {}",
            "→".bright_blue(),
            problem.as_str().white().bold(),
            problem.algorithm().bright_black()
        );
    }
}

/// Prints the listening address.
pub fn print_listening(addr: SocketAddr) {
    println!(
        "{} {} {} Server listening on {}",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Server]".bright_cyan(),
        format!("http://{}", addr).bright_white().bold()
    );
}

/// Prints a one-line summary of a finished solve.
pub fn print_solve_finished(problem: ProblemKind, input_size: usize, elapsed: Duration, outcome: &str) {
    println!(
        "{} {} {} input size ({}), time spent ({}), result ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        format!("[{}]", problem).bright_cyan(),
        input_size.to_formatted_string(&Locale::en).bright_yellow(),
        format_duration(elapsed).yellow(),
        outcome.white().bold()
    );
}

/// Prints a rejected solve request.
pub fn print_solve_rejected(problem: ProblemKind, reason: &str) {
    println!(
        "{} {} {} rejected: {}",
        timestamp().bright_black(),
        "WARN".bright_yellow(),
        format!("[{}]", problem).bright_cyan(),
        reason.bright_red()
    );
}

/// Formats a duration nicely.
///
/// ```
/// use std::time::Duration;
/// use combinatorics_solver::console::format_duration;
///
/// assert_eq!(format_duration(Duration::from_micros(250)), "250µs");
/// assert_eq!(format_duration(Duration::from_millis(12)), "12ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
/// ```
pub fn format_duration(d: Duration) -> String {
    let total_ms = d.as_millis();
    if total_ms == 0 {
        format!("{}µs", d.as_micros())
    } else if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", d.as_secs_f64())
    } else {
        let mins = total_ms / 60_000;
        let secs = (total_ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

/// Returns a timestamp string.
fn timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| {
            let secs = d.as_secs();
            let millis = d.subsec_millis();
            format!("{}.{:03}", secs, millis)
        })
        .unwrap_or_else(|_| "0.000".to_string())
}

/// Measures one solver run and reports it on completion.
pub struct SolveTimer {
    start: Instant,
    problem: ProblemKind,
    input_size: usize,
}

impl SolveTimer {
    pub fn start(problem: ProblemKind, input_size: usize) -> Self {
        Self {
            start: Instant::now(),
            problem,
            input_size,
        }
    }

    /// Prints the summary and returns the elapsed time.
    pub fn finish(self, outcome: &str) -> Duration {
        let elapsed = self.start.elapsed();
        print_solve_finished(self.problem, self.input_size, elapsed, outcome);
        elapsed
    }
}
