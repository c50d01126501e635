//! CSV export for transactions and objectives
//!
//! Fields containing a comma, a quote or a line break are quoted, with
//! embedded quotes doubled.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::{Error, Result};
use crate::models::{Objective, Transaction};

pub const TRANSACTION_HEADERS: [&str; 6] =
    ["id", "type", "description", "montant", "date", "categorie"];

pub const OBJECTIVE_HEADERS: [&str; 4] = ["id", "nom", "cible", "epargne"];

fn write_csv<I>(headers: &[&str], rows: I) -> Result<String>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Render transactions with the `id,type,description,montant,date,categorie` header
pub fn transactions_to_csv(transactions: &[Transaction]) -> Result<String> {
    write_csv(
        &TRANSACTION_HEADERS,
        transactions.iter().map(|t| {
            vec![
                t.id.to_string(),
                t.kind.as_str().to_string(),
                t.description.clone(),
                t.amount.to_string(),
                t.date.format("%Y-%m-%d").to_string(),
                t.category.clone(),
            ]
        }),
    )
}

/// Render objectives with the `id,nom,cible,epargne` header
pub fn objectives_to_csv(objectives: &[Objective]) -> Result<String> {
    write_csv(
        &OBJECTIVE_HEADERS,
        objectives.iter().map(|o| {
            vec![
                o.id.to_string(),
                o.name.clone(),
                o.target.to_string(),
                o.saved.to_string(),
            ]
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionKind;
    use chrono::NaiveDate;

    #[test]
    fn test_transactions_csv_quotes_when_needed() {
        let txs = vec![
            Transaction {
                id: 1,
                kind: TransactionKind::Expense,
                description: "Café, croissant".into(),
                amount: -4.5,
                date: NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
                category: "Alimentation".into(),
            },
            Transaction {
                id: 2,
                kind: TransactionKind::Income,
                description: "Prime \"été\"\nbonus".into(),
                amount: 300.0,
                date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
                category: "Salaire".into(),
            },
        ];

        let csv = transactions_to_csv(&txs).unwrap();
        assert_eq!(
            csv,
            "id,type,description,montant,date,categorie\n\
             1,Dépense,\"Café, croissant\",-4.5,2025-03-02,Alimentation\n\
             2,Revenu,\"Prime \"\"été\"\"\nbonus\",300,2025-03-03,Salaire\n"
        );
    }

    #[test]
    fn test_objectives_csv() {
        let csv = objectives_to_csv(&[Objective {
            id: 7,
            name: "Voyage".into(),
            target: 2000.0,
            saved: 150.25,
        }])
        .unwrap();
        assert_eq!(csv, "id,nom,cible,epargne\n7,Voyage,2000,150.25\n");
    }

    #[test]
    fn test_empty_export_has_header_only() {
        assert_eq!(objectives_to_csv(&[]).unwrap(), "id,nom,cible,epargne\n");
    }
}
