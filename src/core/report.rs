//! Display-side figures derived from an [`ExpenseSummary`].
//!
//! The calculator reports savings as signed numbers. Screens and exports that
//! only want to show "how much you save" go through [`Savings::clamped`] and
//! [`Savings::has_savings`] instead of clamping ad hoc.

use crate::domain::model::{Category, ExpenseSummary};
use serde::Serialize;

/// Years used by the long-term savings projection.
pub const PROJECTION_YEARS: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    pub category: Category,
    pub monthly: f64,
    /// Share of the monthly total, 0-100.
    pub percentage: f64,
}

pub fn category_breakdown(summary: &ExpenseSummary) -> Vec<CategoryShare> {
    let total = summary.total_expense;
    Category::ALL
        .into_iter()
        .map(|category| {
            let monthly = summary.category_expense(category);
            CategoryShare {
                category,
                monthly,
                percentage: percentage_of(monthly, total),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Savings {
    pub money: f64,
    pub water: f64,
    pub time: f64,
}

impl Savings {
    pub fn from_summary(summary: &ExpenseSummary) -> Self {
        Self {
            money: summary.saved_money,
            water: summary.saved_water,
            time: summary.saved_time,
        }
    }

    /// 負值一律顯示為 0
    pub fn clamped(&self) -> Self {
        Self {
            money: self.money.max(0.0),
            water: self.water.max(0.0),
            time: self.time.max(0.0),
        }
    }

    pub fn of(&self, kind: ComparisonKind) -> f64 {
        match kind {
            ComparisonKind::Money => self.money,
            ComparisonKind::Water => self.water,
            ComparisonKind::Time => self.time,
        }
    }

    pub fn has_savings(&self) -> bool {
        self.money > 0.0 || self.water > 0.0 || self.time > 0.0
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            money: self.money * factor,
            water: self.water * factor,
            time: self.time * factor,
        }
    }
}

/// Savings as a percentage of the current yearly figure, 0 when nothing is spent.
pub fn savings_percentages(summary: &ExpenseSummary) -> Savings {
    Savings {
        money: percentage_of(summary.saved_money, summary.yearly_expense),
        water: percentage_of(summary.saved_water, summary.yearly_water_usage),
        time: percentage_of(summary.saved_time, summary.yearly_time_spent),
    }
}

pub fn five_year_projection(summary: &ExpenseSummary) -> Savings {
    Savings::from_summary(summary)
        .clamped()
        .scaled(PROJECTION_YEARS)
}

/// What the current products would cost over the projection period.
pub fn five_year_expense(summary: &ExpenseSummary) -> f64 {
    summary.yearly_expense * PROJECTION_YEARS
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonKind {
    Money,
    Water,
    Time,
}

impl ComparisonKind {
    pub fn title(&self) -> &'static str {
        match self {
            ComparisonKind::Money => "Ahorro Económico",
            ComparisonKind::Water => "Consumo de Agua",
            ComparisonKind::Time => "Tiempo Invertido",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            ComparisonKind::Money => "$",
            ComparisonKind::Water => "L",
            ComparisonKind::Time => "hrs",
        }
    }
}

/// One traditional-vs-GECO line of the comparison screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
    pub kind: ComparisonKind,
    pub traditional: f64,
    pub geco: f64,
    pub savings: f64,
}

impl ComparisonRow {
    /// 長條圖高度 (0-100)，以兩者中較大者為 100
    pub fn traditional_bar_percentage(&self) -> f64 {
        percentage_of(self.traditional, self.bar_max())
    }

    pub fn geco_bar_percentage(&self) -> f64 {
        percentage_of(self.geco, self.bar_max())
    }

    fn bar_max(&self) -> f64 {
        self.traditional.max(self.geco)
    }

    pub fn savings_percentage(&self) -> f64 {
        percentage_of(self.savings, self.traditional)
    }
}

pub fn comparison_rows(summary: &ExpenseSummary) -> [ComparisonRow; 3] {
    [
        ComparisonRow {
            kind: ComparisonKind::Money,
            traditional: summary.yearly_expense,
            geco: summary.geco_yearly_expense,
            savings: summary.saved_money,
        },
        ComparisonRow {
            kind: ComparisonKind::Water,
            traditional: summary.yearly_water_usage,
            geco: summary.geco_yearly_water_usage,
            savings: summary.saved_water,
        },
        ComparisonRow {
            kind: ComparisonKind::Time,
            traditional: summary.yearly_time_spent,
            geco: summary.geco_yearly_time_spent,
            savings: summary.saved_time,
        },
    ]
}

fn percentage_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        (part / whole) * 100.0
    } else {
        0.0
    }
}
