use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use std::time::Duration;

use clicker_sim::Termination;

use super::StrategyRun;
use crate::common::util::format_amount;

fn termination_label(termination: &Termination) -> String {
    match termination {
        Termination::NoTime => "no time to simulate".to_string(),
        Termination::Elapsed => "duration elapsed".to_string(),
        Termination::PolicyDeclined => "policy stopped buying".to_string(),
        Termination::Unreachable { item } => format!("{item} out of reach"),
        Termination::PurchaseLimit => "purchase limit reached".to_string(),
    }
}

pub fn generate_console_report(
    out: &mut dyn Write,
    runs: &[StrategyRun],
    duration: f64,
    total_duration: Duration,
    verbose: bool,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Strategy Results Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "===========================".cyan())?;
    writeln!(out, "Simulated time: {}", format_amount(duration))?;
    writeln!(out, "Strategies: {}", runs.len())?;
    writeln!(out)?;

    for run in runs {
        writeln!(out, "{}", run.label.bold())?;
        writeln!(
            out,
            "   Total produced: {}",
            format_amount(run.state.total_produced()).green()
        )?;
        writeln!(out, "   Balance: {}", format_amount(run.state.balance()))?;
        writeln!(out, "   Rate: {}", format_amount(run.state.rate()))?;
        writeln!(out, "   Purchases: {}", run.purchases)?;
        writeln!(out, "   Stopped: {}", termination_label(&run.termination))?;
        writeln!(out, "   Wall time: {:?}", run.elapsed)?;

        if verbose {
            writeln!(out, "   History:")?;
            for entry in run.state.history().iter().skip(1) {
                writeln!(
                    out,
                    "     • t={:.0} {} for {} (produced {})",
                    entry.time,
                    entry.item.as_deref().unwrap_or("-"),
                    format_amount(entry.cost),
                    format_amount(entry.total_produced)
                )?;
            }
        }
        writeln!(out)?;
    }

    let best = runs
        .iter()
        .max_by(|a, b| a.state.total_produced().total_cmp(&b.state.total_produced()));
    if let Some(best) = best {
        writeln!(out, "{}", "🏆 Best Strategy".bright_yellow().bold())?;
        writeln!(out, "{}", "================".yellow())?;
        writeln!(
            out,
            "{} ({} produced)",
            best.label.green(),
            format_amount(best.state.total_produced())
        )?;
        writeln!(out)?;
    }

    writeln!(out, "🏁 Total time: {total_duration:?}")?;
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, runs: &[StrategyRun]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, runs)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report(
    out: &mut dyn Write,
    runs: &[StrategyRun],
    duration: f64,
) -> Result<()> {
    writeln!(out, "# Clicker Strategy Results\n")?;
    writeln!(out, "- **Simulated time**: {duration}")?;
    writeln!(out, "- **Strategies**: {}\n", runs.len())?;

    writeln!(out, "| Strategy | Total produced | Balance | Rate | Purchases | Stopped |")?;
    writeln!(out, "|---|---:|---:|---:|---:|---|")?;
    for run in runs {
        writeln!(
            out,
            "| {} | {:.2} | {:.2} | {:.2} | {} | {} |",
            run.label,
            run.state.total_produced(),
            run.state.balance(),
            run.state.rate(),
            run.purchases,
            termination_label(&run.termination)
        )?;
    }
    Ok(())
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Purchase history of every run, one row per entry (sentinel included).
pub fn generate_csv_report(out: &mut dyn Write, runs: &[StrategyRun]) -> Result<()> {
    writeln!(out, "strategy,time,item,cost,total_produced")?;
    for run in runs {
        for entry in run.state.history() {
            writeln!(
                out,
                "{},{},{},{},{}",
                run.strategy.key(),
                entry.time,
                csv_field(entry.item.as_deref().unwrap_or("")),
                entry.cost,
                entry.total_produced
            )?;
        }
    }
    Ok(())
}
