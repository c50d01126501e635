//! Savings objective command implementations

use anyhow::Result;
use carnet_core::budget::format_money;
use carnet_core::models::NewObjective;
use carnet_core::Ledger;

const BAR_WIDTH: usize = 20;

fn progress_bar(progress: f64) -> String {
    let filled = ((progress.clamp(0.0, 1.0) * BAR_WIDTH as f64).round()) as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

pub fn cmd_objectives_list(ledger: &Ledger) -> Result<()> {
    let objectives = ledger.objectives().all();

    if objectives.is_empty() {
        println!("No objectives yet. Add one with:");
        println!("  carnet objectives add \"Fonds d'urgence\" 3000");
        return Ok(());
    }

    println!();
    println!("🎯 Objectives");
    println!("   ─────────────────────────────────────────────────────────────");

    for o in objectives {
        println!(
            "   {} {:>4.0}% │ {} / {} │ {} (#{})",
            progress_bar(o.progress()),
            o.progress() * 100.0,
            format_money(o.saved),
            format_money(o.target),
            o.name,
            o.id
        );
    }
    Ok(())
}

pub fn cmd_objectives_add(
    ledger: &mut Ledger,
    name: &str,
    target: f64,
    saved: Option<f64>,
) -> Result<()> {
    let objective = ledger.add_objective(NewObjective {
        name: name.to_string(),
        target,
        saved,
    })?;
    println!(
        "✅ Objective \"{}\" {} (#{})",
        objective.name,
        format_money(objective.target),
        objective.id
    );
    Ok(())
}

pub fn cmd_objectives_contribute(ledger: &mut Ledger, id: i64, delta: f64) -> Result<()> {
    match ledger.contribute(id, delta)? {
        Some(o) => println!(
            "✅ {}: {} / {} ({:.0}%)",
            o.name,
            format_money(o.saved),
            format_money(o.target),
            o.progress() * 100.0
        ),
        None => println!("Nothing to do: amount is zero"),
    }
    Ok(())
}

pub fn cmd_objectives_delete(ledger: &mut Ledger, id: i64) -> Result<()> {
    ledger.remove_objective(id)?;
    println!("🗑️  Deleted objective #{}", id);
    Ok(())
}
