//! Board columns, stages and the column-to-stage classifier.
//!
//! The board is a fixed grid: twelve calendar months for order intake,
//! three pre-production queues, eight production steps and a single done
//! column. Every column belongs to exactly one [`Stage`].

use super::{ParseColumnError, ParseStageError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Finest-grained board location of a work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Column {
    /// January intake.
    January,
    /// February intake.
    February,
    /// March intake.
    March,
    /// April intake.
    April,
    /// May intake.
    May,
    /// June intake.
    June,
    /// July intake.
    July,
    /// August intake.
    August,
    /// September intake.
    September,
    /// October intake.
    October,
    /// November intake.
    November,
    /// December intake.
    December,
    /// Waiting for raw material.
    AwaitingMaterial,
    /// Waiting for cutting.
    AwaitingCutting,
    /// Purchase order to be generated.
    GenerateOrder,
    /// Production planning and control.
    Planning,
    /// Distribution to workshops.
    Distribution,
    /// Sewing.
    Sewing,
    /// Painting.
    Painting,
    /// Screen or film printing.
    PrintFilm,
    /// Finishing touches.
    Finishing,
    /// Packaging.
    Packaging,
    /// Shipping.
    Shipping,
    /// Finished orders.
    Completed,
}

impl Column {
    /// Every column in board order.
    pub const ALL: [Self; 24] = [
        Self::January,
        Self::February,
        Self::March,
        Self::April,
        Self::May,
        Self::June,
        Self::July,
        Self::August,
        Self::September,
        Self::October,
        Self::November,
        Self::December,
        Self::AwaitingMaterial,
        Self::AwaitingCutting,
        Self::GenerateOrder,
        Self::Planning,
        Self::Distribution,
        Self::Sewing,
        Self::Painting,
        Self::PrintFilm,
        Self::Finishing,
        Self::Packaging,
        Self::Shipping,
        Self::Completed,
    ];

    /// Returns the canonical storage code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::January => "JAN",
            Self::February => "FEV",
            Self::March => "MAR",
            Self::April => "ABR",
            Self::May => "MAI",
            Self::June => "JUN",
            Self::July => "JUL",
            Self::August => "AGO",
            Self::September => "SET",
            Self::October => "OUT",
            Self::November => "NOV",
            Self::December => "DEZ",
            Self::AwaitingMaterial => "AG_MP",
            Self::AwaitingCutting => "AG_CORTE",
            Self::GenerateOrder => "GERAR_PED",
            Self::Planning => "PCP",
            Self::Distribution => "DISTRIBUICAO",
            Self::Sewing => "COSTURA",
            Self::Painting => "PINTURA",
            Self::PrintFilm => "ESTAMPA_FILME",
            Self::Finishing => "ARREMATE",
            Self::Packaging => "EMBALAGEM",
            Self::Shipping => "EXPEDICAO",
            Self::Completed => "CONCLUIDO",
        }
    }

    /// Returns the header title shown on the board.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::AwaitingMaterial => "Aguardando MP",
            Self::AwaitingCutting => "Aguardando Corte",
            Self::GenerateOrder => "Gerar Pedido",
            Self::Distribution => "Distribuição",
            Self::Sewing => "Costura",
            Self::Painting => "Pintura",
            Self::PrintFilm => "Estampa/Filme",
            Self::Finishing => "Arremate",
            Self::Packaging => "Embalagem",
            Self::Shipping => "Expedição",
            Self::Completed => "Concluído",
            other => other.as_str(),
        }
    }

    /// Returns the stage this column belongs to.
    #[must_use]
    pub const fn stage(self) -> Stage {
        classify(self)
    }

    /// Returns `true` for the terminal done column.
    #[must_use]
    pub const fn is_done(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl TryFrom<&str> for Column {
    type Error = ParseColumnError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|column| column.as_str() == normalized)
            .ok_or_else(|| ParseColumnError(value.to_owned()))
    }
}

impl TryFrom<String> for Column {
    type Error = ParseColumnError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Column> for String {
    fn from(value: Column) -> Self {
        value.as_str().to_owned()
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse grouping of board columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Stage {
    /// Monthly order intake.
    Calendar,
    /// Pre-production queues.
    PreProduction,
    /// Production steps.
    Production,
    /// Finished orders.
    Done,
}

impl Stage {
    /// Every stage in board order.
    pub const ALL: [Self; 4] = [
        Self::Calendar,
        Self::PreProduction,
        Self::Production,
        Self::Done,
    ];

    /// Returns the canonical storage code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Calendar => "CALENDARIO",
            Self::PreProduction => "PRE",
            Self::Production => "PROD",
            Self::Done => "DONE",
        }
    }

    /// Returns the section title shown on the board.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Calendar => "Calendário de Pedidos",
            Self::PreProduction => "Etapas Intermediárias (Pré-Produção)",
            Self::Production => "Etapa de Produção",
            Self::Done => "Concluído",
        }
    }

    /// Returns the columns of this stage in board order.
    #[must_use]
    pub const fn columns(self) -> &'static [Column] {
        match self {
            Self::Calendar => &[
                Column::January,
                Column::February,
                Column::March,
                Column::April,
                Column::May,
                Column::June,
                Column::July,
                Column::August,
                Column::September,
                Column::October,
                Column::November,
                Column::December,
            ],
            Self::PreProduction => &[
                Column::AwaitingMaterial,
                Column::AwaitingCutting,
                Column::GenerateOrder,
            ],
            Self::Production => &[
                Column::Planning,
                Column::Distribution,
                Column::Sewing,
                Column::Painting,
                Column::PrintFilm,
                Column::Finishing,
                Column::Packaging,
                Column::Shipping,
            ],
            Self::Done => &[Column::Completed],
        }
    }
}

impl TryFrom<&str> for Stage {
    type Error = ParseStageError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "CALENDARIO" => Ok(Self::Calendar),
            "PRE" => Ok(Self::PreProduction),
            "PROD" => Ok(Self::Production),
            "DONE" => Ok(Self::Done),
            _ => Err(ParseStageError(value.to_owned())),
        }
    }
}

impl TryFrom<String> for Stage {
    type Error = ParseStageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Stage> for String {
    fn from(value: Stage) -> Self {
        value.as_str().to_owned()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a column to its stage.
#[must_use]
pub const fn classify(column: Column) -> Stage {
    match column {
        Column::January
        | Column::February
        | Column::March
        | Column::April
        | Column::May
        | Column::June
        | Column::July
        | Column::August
        | Column::September
        | Column::October
        | Column::November
        | Column::December => Stage::Calendar,
        Column::AwaitingMaterial | Column::AwaitingCutting | Column::GenerateOrder => {
            Stage::PreProduction
        }
        Column::Planning
        | Column::Distribution
        | Column::Sewing
        | Column::Painting
        | Column::PrintFilm
        | Column::Finishing
        | Column::Packaging
        | Column::Shipping => Stage::Production,
        Column::Completed => Stage::Done,
    }
}
