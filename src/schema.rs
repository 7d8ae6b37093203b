//! Fixed schema of known supply-tracking columns.
//!
//! Uploads carry arbitrary columns, but a fixed set receives typed handling
//! during normalization. Everything else is treated as text and only gets the
//! missing-value fill. Downstream consumers resolve columns through this
//! module instead of ad hoc name checks, so a renamed column fails in one
//! place rather than drifting silently.

use std::fmt;

/// Fill value for missing cells in text columns.
pub const PLACEHOLDER: &str = "Não informado";

/// Column holding the order quantity; coerced to a non-negative number.
pub const QUANTITY_COLUMN: &str = "QuantidadeProduto";

/// Columns projected on export, in declared order. Absent columns are
/// omitted from the projection, never invented.
pub const EXPORT_COLUMNS: [&str; 11] = [
    "NumeroPedido",
    "DataPedido",
    "ModeloProduto",
    "TipoProduto",
    "QuantidadeProduto",
    "OrdemServico",
    "NumeroSerie",
    "ApelidoDoEquipamento",
    "StatusAtual",
    "PrevisaoEntrega",
    "Entregue",
];

/// The three known date columns, parsed day-first during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    /// Date the order was placed.
    DataPedido,
    /// Forecast delivery date.
    PrevisaoEntrega,
    /// Actual delivery date; a present value means "delivered".
    Entregue,
}

impl DateField {
    pub const ALL: [DateField; 3] = [
        DateField::DataPedido,
        DateField::PrevisaoEntrega,
        DateField::Entregue,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DateField::DataPedido => "DataPedido",
            DateField::PrevisaoEntrega => "PrevisaoEntrega",
            DateField::Entregue => "Entregue",
        }
    }
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Normalization policy for one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Semantic {
    Date(DateField),
    Quantity,
    Text,
}

impl Semantic {
    pub fn describe(self) -> &'static str {
        match self {
            Semantic::Date(_) => "date (day-first, unparsable -> absent)",
            Semantic::Quantity => "quantity (non-numeric -> 0)",
            Semantic::Text => "text (missing -> \"Não informado\")",
        }
    }
}

pub fn semantic_of(column: &str) -> Semantic {
    for field in DateField::ALL {
        if column == field.name() {
            return Semantic::Date(field);
        }
    }
    if column == QUANTITY_COLUMN {
        return Semantic::Quantity;
    }
    Semantic::Text
}
