//! Stock report generation.
//!
//! This module classifies every medicine against its thresholds and produces a summary of
//! what needs restocking. The functions return structured data and plain strings so any
//! front end (or the start-up log) can present them.

use crate::{
    core::medicine::get_all_medicines, entities::medicine, errors::Result, models::StockLevel,
};
use sea_orm::DatabaseConnection;

/// Summary of the inventory's stock levels.
#[derive(Debug, Clone, Default)]
pub struct StockReport {
    /// Number of medicines inspected
    pub total: usize,
    /// Medicines with no stock left
    pub empty: Vec<medicine::Model>,
    /// Medicines at or below their alert threshold (but not empty)
    pub alerts: Vec<medicine::Model>,
    /// Medicines at or below their warning threshold but above alert
    pub warnings: Vec<medicine::Model>,
}

impl StockReport {
    /// Whether every medicine is above its warning threshold.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.empty.is_empty() && self.alerts.is_empty() && self.warnings.is_empty()
    }
}

/// Builds a stock report from an already loaded list of medicines.
#[must_use]
pub fn build_stock_report(medicines: &[medicine::Model]) -> StockReport {
    let mut report = StockReport {
        total: medicines.len(),
        ..StockReport::default()
    };

    for medicine in medicines {
        match StockLevel::classify(medicine) {
            StockLevel::Empty => report.empty.push(medicine.clone()),
            StockLevel::Alert => report.alerts.push(medicine.clone()),
            StockLevel::Warning => report.warnings.push(medicine.clone()),
            StockLevel::Normal => {}
        }
    }

    report
}

/// Generates a stock report over every stored medicine.
///
/// # Returns
/// A `StockReport` with medicines grouped by severity, each group sorted by name
pub async fn generate_stock_report(db: &DatabaseConnection) -> Result<StockReport> {
    let medicines = get_all_medicines(db).await?;
    Ok(build_stock_report(&medicines))
}

/// Stock as a percentage of the normal stock level.
///
/// A normal stock of zero or less yields 0.
#[must_use]
pub fn calculate_stock_percent(stock: i32, normal_stock: i32) -> f64 {
    if normal_stock <= 0 {
        return 0.0;
    }

    f64::from(stock) / f64::from(normal_stock) * 100.0
}

/// Generates a text bar for a stock percentage, like `[████░░░░░░] 40.0%`.
///
/// # Arguments
/// * `percent` - Stock percentage; the bar is clamped to 0-100
/// * `bar_length` - Length of the bar in characters (default 10)
#[must_use]
pub fn format_stock_bar(percent: f64, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped = percent.clamp(0.0, 100.0);

    // clamped is within [0, 100] so the product stays within [0, length]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let filled = ((clamped / 100.0) * length as f64).round() as usize;
    let empty = length.saturating_sub(filled);

    format!("[{}{}] {percent:.1}%", "█".repeat(filled), "░".repeat(empty))
}

/// One-line description of a medicine's stock.
///
/// Formatted as `name | aisle | stock/normal [bar] percent`.
#[must_use]
pub fn format_stock_line(medicine: &medicine::Model) -> String {
    let percent = calculate_stock_percent(medicine.stock, medicine.normal_stock);
    format!(
        "{} | {} | {}/{} {}",
        medicine.name,
        medicine.aisle,
        medicine.stock,
        medicine.normal_stock,
        format_stock_bar(percent, None)
    )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    fn with_stock(id: &str, stock: i32) -> medicine::Model {
        let mut medicine = test_medicine(id, &format!("Medicine {id}"), "Pills");
        medicine.stock = stock;
        medicine
    }

    #[test]
    fn test_build_stock_report_groups_by_level() {
        // test_medicine thresholds: warning 8, alert 3
        let medicines = vec![
            with_stock("1", 0),
            with_stock("2", 3),
            with_stock("3", 8),
            with_stock("4", 9),
            with_stock("5", 1),
        ];

        let report = build_stock_report(&medicines);
        assert_eq!(report.total, 5);
        assert_eq!(report.empty.len(), 1);
        assert_eq!(report.alerts.len(), 2);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].id, "3");
        assert!(!report.is_healthy());
    }

    #[test]
    fn test_empty_inventory_is_healthy() {
        let report = build_stock_report(&[]);
        assert_eq!(report.total, 0);
        assert!(report.is_healthy());
    }

    #[test]
    fn test_calculate_stock_percent() {
        assert_eq!(calculate_stock_percent(10, 20), 50.0);
        assert_eq!(calculate_stock_percent(30, 20), 150.0);
        assert_eq!(calculate_stock_percent(5, 0), 0.0);
    }

    #[test]
    fn test_format_stock_bar() {
        assert_eq!(format_stock_bar(100.0, Some(10)), "[██████████] 100.0%");
        assert_eq!(format_stock_bar(50.0, Some(10)), "[█████░░░░░] 50.0%");
        assert_eq!(format_stock_bar(150.0, Some(4)), "[████] 150.0%");
        assert_eq!(format_stock_bar(0.0, Some(4)), "[░░░░] 0.0%");
    }

    #[test]
    fn test_format_stock_line() {
        let medicine = with_stock("1", 5);
        assert_eq!(
            format_stock_line(&medicine),
            "Medicine 1 | Pills | 5/25 [██░░░░░░░░] 20.0%"
        );
    }

    #[tokio::test]
    async fn test_generate_stock_report_integration() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_medicine(&db, "1", "Doliprane", "Pills").await?;
        let mut low = test_medicine("2", "Advil", "Pills");
        low.stock = 2;
        crate::core::medicine::add_medicine(&db, &low).await?;

        let report = generate_stock_report(&db).await?;
        assert_eq!(report.total, 2);
        assert_eq!(report.alerts.len(), 1);
        assert_eq!(report.alerts[0].name, "Advil");
        Ok(())
    }
}
