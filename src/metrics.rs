//! Summary metrics over the current (possibly filtered) table.
//!
//! Pure computation, no I/O. Column access goes through the table's typed
//! accessors, so a missing column yields a zero component instead of an
//! error: supply data sources are heterogeneous and partial schemas are
//! expected.

use serde::Serialize;

use crate::{schema::DateField, table::Table};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub total_pedidos: usize,
    pub pedidos_entregues: usize,
    pub pedidos_pendentes: usize,
    /// Total quantity truncated for display. The untruncated sum stays in
    /// `quantidade_total_exata`; fractional input is dirty but not fatal.
    pub quantidade_total: i64,
    pub quantidade_total_exata: f64,
    /// Delivered percentage of the total, 0 for an empty table.
    pub taxa_entrega: f64,
}

impl MetricsSnapshot {
    pub fn zero() -> Self {
        MetricsSnapshot {
            total_pedidos: 0,
            pedidos_entregues: 0,
            pedidos_pendentes: 0,
            quantidade_total: 0,
            quantidade_total_exata: 0.0,
            taxa_entrega: 0.0,
        }
    }
}

/// Percentage with zero/NaN-safe division: 0 whenever the denominator is
/// zero or either operand is non-finite.
pub fn safe_percentage(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() || !numerator.is_finite() {
        0.0
    } else {
        (numerator / denominator) * 100.0
    }
}

pub fn compute(table: &Table) -> MetricsSnapshot {
    if table.is_empty() {
        return MetricsSnapshot::zero();
    }

    let total_pedidos = table.row_count();

    let pedidos_entregues = table
        .date_column(DateField::Entregue)
        .map(|dates| dates.iter().flatten().count())
        .unwrap_or(0);

    let quantidade_total_exata = table
        .quantity_column()
        .map(|quantities| quantities.iter().sum())
        .unwrap_or(0.0);

    let pedidos_pendentes = total_pedidos - pedidos_entregues;
    let taxa_entrega = safe_percentage(pedidos_entregues as f64, total_pedidos as f64);

    MetricsSnapshot {
        total_pedidos,
        pedidos_entregues,
        pedidos_pendentes,
        quantidade_total: quantidade_total_exata.trunc() as i64,
        quantidade_total_exata,
        taxa_entrega,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Cell;
    use crate::table::Table;
    use proptest::prelude::*;

    fn table_with(entregue: &[&str], quantities: &[&str]) -> Table {
        let rows = entregue
            .iter()
            .zip(quantities)
            .map(|(date, qty)| {
                vec![
                    Cell::Text((*date).to_string()),
                    Cell::Text((*qty).to_string()),
                ]
            })
            .collect();
        Table::new(
            vec!["Entregue".to_string(), "QuantidadeProduto".to_string()],
            rows,
        )
    }

    #[test]
    fn empty_table_short_circuits_to_zero() {
        assert_eq!(compute(&Table::empty()), MetricsSnapshot::zero());
    }

    #[test]
    fn safe_percentage_never_divides_by_zero() {
        assert_eq!(safe_percentage(0.0, 0.0), 0.0);
        assert_eq!(safe_percentage(5.0, 0.0), 0.0);
        assert_eq!(safe_percentage(3.0, 6.0), 50.0);
        assert_eq!(safe_percentage(f64::NAN, 6.0), 0.0);
        assert_eq!(safe_percentage(3.0, f64::NAN), 0.0);
    }

    #[test]
    fn delivered_counts_valid_dates_only() {
        let table = table_with(&["2024-03-01", "not a date", ""], &["1", "1", "1"]);
        let snapshot = compute(&table);
        assert_eq!(snapshot.total_pedidos, 3);
        assert_eq!(snapshot.pedidos_entregues, 1);
        assert_eq!(snapshot.pedidos_pendentes, 2);
    }

    #[test]
    fn all_invalid_delivery_dates_yield_zero_not_error() {
        let table = table_with(&["??", "pending", "-"], &["1", "2", "3"]);
        let snapshot = compute(&table);
        assert_eq!(snapshot.pedidos_entregues, 0);
        assert_eq!(snapshot.pedidos_pendentes, 3);
        assert_eq!(snapshot.taxa_entrega, 0.0);
    }

    #[test]
    fn quantity_sum_keeps_exact_value_and_truncates_display() {
        let table = table_with(
            &["", "", "", "", ""],
            &["10", "abc", "", "N/A", "5.5"],
        );
        let snapshot = compute(&table);
        assert_eq!(snapshot.quantidade_total_exata, 15.5);
        assert_eq!(snapshot.quantidade_total, 15);
    }

    #[test]
    fn missing_columns_contribute_zero_components() {
        let table = Table::new(
            vec!["NumeroPedido".to_string()],
            vec![
                vec![Cell::Text("P-1".to_string())],
                vec![Cell::Text("P-2".to_string())],
            ],
        );
        let snapshot = compute(&table);
        assert_eq!(snapshot.total_pedidos, 2);
        assert_eq!(snapshot.pedidos_entregues, 0);
        assert_eq!(snapshot.pedidos_pendentes, 2);
        assert_eq!(snapshot.quantidade_total, 0);
    }

    proptest! {
        #[test]
        fn pending_and_delivered_always_partition_total(
            delivered in proptest::collection::vec(any::<bool>(), 0..64)
        ) {
            let rows = delivered
                .iter()
                .map(|is_delivered| {
                    let cell = if *is_delivered {
                        Cell::Text("01/02/2024".to_string())
                    } else {
                        Cell::Missing
                    };
                    vec![cell]
                })
                .collect::<Vec<_>>();
            let table = Table::new(vec!["Entregue".to_string()], rows);
            let snapshot = compute(&table);

            prop_assert_eq!(
                snapshot.pedidos_entregues + snapshot.pedidos_pendentes,
                snapshot.total_pedidos
            );
            prop_assert!(snapshot.taxa_entrega >= 0.0);
            prop_assert!(snapshot.taxa_entrega <= 100.0);
            prop_assert!(snapshot.taxa_entrega.is_finite());
        }
    }
}
