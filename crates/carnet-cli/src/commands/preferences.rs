//! Theme command implementations

use anyhow::Result;
use carnet_core::models::Theme;
use carnet_core::Ledger;

pub fn cmd_theme_show(ledger: &Ledger) -> Result<()> {
    println!("{}", ledger.theme());
    Ok(())
}

pub fn cmd_theme_set(ledger: &Ledger, theme: Theme) -> Result<()> {
    ledger.set_theme(theme)?;
    println!("✅ Theme: {}", theme);
    Ok(())
}

pub fn cmd_theme_toggle(ledger: &Ledger) -> Result<()> {
    let theme = ledger.toggle_theme()?;
    println!("✅ Theme: {}", theme);
    Ok(())
}
