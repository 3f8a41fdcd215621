use crate::domain::model::{LaundryStats, Product};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minimum number of products before the user can configure them.
pub const MIN_SELECTED_PRODUCTS: usize = 2;

/// 引導流程的步驟，依序進行
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlowStep {
    Welcome,
    LaundryHabits,
    ProductSelection,
    ProductConfig,
    ResultsReveal,
    Comparison,
}

pub const FLOW_STEPS: [FlowStep; 6] = [
    FlowStep::Welcome,
    FlowStep::LaundryHabits,
    FlowStep::ProductSelection,
    FlowStep::ProductConfig,
    FlowStep::ResultsReveal,
    FlowStep::Comparison,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepValidation {
    pub is_valid: bool,
    pub message: Option<&'static str>,
}

impl StepValidation {
    fn valid() -> Self {
        Self {
            is_valid: true,
            message: None,
        }
    }

    fn check(is_valid: bool, message: &'static str) -> Self {
        Self {
            is_valid,
            message: (!is_valid).then_some(message),
        }
    }
}

impl FlowStep {
    pub fn index(&self) -> usize {
        FLOW_STEPS
            .iter()
            .position(|step| step == self)
            .unwrap_or_default()
    }

    pub fn next(&self) -> Option<FlowStep> {
        FLOW_STEPS.get(self.index() + 1).copied()
    }

    pub fn previous(&self) -> Option<FlowStep> {
        self.index().checked_sub(1).map(|i| FLOW_STEPS[i])
    }

    /// Completed share of the flow (0-100), counting the current step.
    pub fn progress(&self) -> f64 {
        ((self.index() + 1) as f64 / FLOW_STEPS.len() as f64) * 100.0
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FlowStep::Welcome => "welcome",
            FlowStep::LaundryHabits => "laundry-habits",
            FlowStep::ProductSelection => "product-selection",
            FlowStep::ProductConfig => "product-config",
            FlowStep::ResultsReveal => "results-reveal",
            FlowStep::Comparison => "comparison",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            FlowStep::Welcome => "¡Bienvenido!",
            FlowStep::LaundryHabits => "Tus Hábitos de Lavado",
            FlowStep::ProductSelection => "Selecciona tus Productos",
            FlowStep::ProductConfig => "Configura tus Productos",
            FlowStep::ResultsReveal => "Tus Gastos Actuales",
            FlowStep::Comparison => "Comparación con GECO",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FlowStep::Welcome => "¿Sabías que puedes ahorrar hasta 60% en gastos de lavandería?",
            FlowStep::LaundryHabits => {
                "Cuéntanos sobre tus hábitos de lavado para calcular tus gastos"
            }
            FlowStep::ProductSelection => {
                "Selecciona los productos que usas actualmente (mínimo 2)"
            }
            FlowStep::ProductConfig => "Completa la información de cada producto",
            FlowStep::ResultsReveal => "Veamos cuánto gastas actualmente...",
            FlowStep::Comparison => "Descubre cuánto podrías ahorrar con GECO",
        }
    }

    /// 檢查目前資料是否足以離開此步驟
    pub fn validate(&self, products: &[Product], stats: &LaundryStats) -> StepValidation {
        match self {
            FlowStep::Welcome | FlowStep::ResultsReveal | FlowStep::Comparison => {
                StepValidation::valid()
            }
            FlowStep::LaundryHabits => StepValidation::check(
                stats.loads_per_week > 0,
                "Debes ingresar al menos 1 carga por semana",
            ),
            FlowStep::ProductSelection => StepValidation::check(
                products.len() >= MIN_SELECTED_PRODUCTS,
                "Selecciona al menos 2 productos para continuar",
            ),
            FlowStep::ProductConfig => StepValidation::check(
                products
                    .iter()
                    .all(|p| p.price > 0.0 && p.duration.is_some() && !p.name.trim().is_empty()),
                "Completa la información de todos los productos",
            ),
        }
    }
}

impl fmt::Display for FlowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlowStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FLOW_STEPS
            .into_iter()
            .find(|step| step.as_str() == s.trim())
            .ok_or_else(|| format!("Paso no válido: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Category, ProductDuration};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_navigation() {
        assert_eq!(FlowStep::Welcome.index(), 0);
        assert_eq!(FlowStep::Welcome.previous(), None);
        assert_eq!(FlowStep::Welcome.next(), Some(FlowStep::LaundryHabits));
        assert_eq!(FlowStep::ResultsReveal.next(), Some(FlowStep::Comparison));
        assert_eq!(FlowStep::Comparison.next(), None);
        assert_eq!(FlowStep::Comparison.previous(), Some(FlowStep::ResultsReveal));
        assert_abs_diff_eq!(FlowStep::Welcome.progress(), 16.67, epsilon = 0.01);
        assert_eq!(FlowStep::ProductSelection.progress(), 50.0);
        assert_eq!(FlowStep::Comparison.progress(), 100.0);
    }

    #[test]
    fn test_parse_step() {
        assert_eq!("product-config".parse::<FlowStep>().unwrap(), FlowStep::ProductConfig);
        assert!("checkout".parse::<FlowStep>().is_err());
    }

    #[test]
    fn test_habits_validation() {
        let mut stats = LaundryStats::default();
        assert!(FlowStep::LaundryHabits.validate(&[], &stats).is_valid);

        stats.loads_per_week = 0;
        let result = FlowStep::LaundryHabits.validate(&[], &stats);
        assert!(!result.is_valid);
        assert_eq!(result.message, Some("Debes ingresar al menos 1 carga por semana"));
    }

    #[test]
    fn test_selection_needs_two_products() {
        let stats = LaundryStats::default();
        let one = vec![Product::new("A", 10.0, Category::Detergent)];
        assert!(!FlowStep::ProductSelection.validate(&one, &stats).is_valid);

        let two = vec![
            Product::new("A", 10.0, Category::Detergent),
            Product::new("B", 10.0, Category::Softener),
        ];
        assert!(FlowStep::ProductSelection.validate(&two, &stats).is_valid);
    }

    #[test]
    fn test_config_requires_duration_price_and_name() {
        let stats = LaundryStats::default();
        let configured = vec![
            Product::new("A", 10.0, Category::Detergent).with_duration(ProductDuration::OneMonth),
        ];
        assert!(FlowStep::ProductConfig.validate(&configured, &stats).is_valid);

        let no_duration = vec![Product::new("A", 10.0, Category::Detergent)];
        assert!(!FlowStep::ProductConfig.validate(&no_duration, &stats).is_valid);

        let blank_name =
            vec![Product::new("  ", 10.0, Category::Detergent).with_duration(ProductDuration::OneWeek)];
        let result = FlowStep::ProductConfig.validate(&blank_name, &stats);
        assert_eq!(result.message, Some("Completa la información de todos los productos"));
    }

    #[test]
    fn test_terminal_steps_always_valid() {
        let stats = LaundryStats {
            loads_per_week: 0,
            ..LaundryStats::default()
        };
        assert!(FlowStep::Welcome.validate(&[], &stats).is_valid);
        assert!(FlowStep::ResultsReveal.validate(&[], &stats).is_valid);
        assert!(FlowStep::Comparison.validate(&[], &stats).is_valid);
    }
}
