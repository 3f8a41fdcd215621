//! Expense and savings calculation.
//!
//! Everything here is pure: the same products and habits always produce the
//! same [`ExpenseSummary`], regardless of the order of the product list.

use crate::domain::model::{Category, ExpenseSummary, LaundryStats, Product, ProductDuration};

pub const WEEKS_PER_YEAR: f64 = 52.0;
pub const MONTHS_PER_YEAR: f64 = 12.0;
const MINUTES_PER_HOUR: f64 = 60.0;

/// Weeks used for a duration that is unknown or missing.
pub const DEFAULT_DURATION_WEEKS: f64 = 4.33;

/// GECO 固定參數
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GecoPolicy {
    /// 每次洗衣成本（2 錠 x $10）
    pub price_per_load: f64,
    /// 每次洗衣節省的分鐘數
    pub time_saved_per_load: f64,
    /// 用水減量係數
    pub water_reduction_factor: f64,
}

pub const GECO: GecoPolicy = GecoPolicy {
    price_per_load: 20.0,
    time_saved_per_load: 30.0,
    water_reduction_factor: 0.5,
};

impl Default for GecoPolicy {
    fn default() -> Self {
        GECO
    }
}

impl ProductDuration {
    pub fn weeks(&self) -> f64 {
        match self {
            ProductDuration::OneWeek => 1.0,
            ProductDuration::TwoWeeks => 2.0,
            ProductDuration::OneMonth => 4.33,
            ProductDuration::TwoMonths => 8.66,
            ProductDuration::ThreeMonths => 13.0,
            ProductDuration::SixMonths => 26.0,
            ProductDuration::OneYear => 52.0,
        }
    }
}

/// Week length of a raw duration value, falling back to one month.
pub fn duration_in_weeks(duration: &str) -> f64 {
    duration
        .parse::<ProductDuration>()
        .map(|d| d.weeks())
        .unwrap_or(DEFAULT_DURATION_WEEKS)
}

/// Yearly spend on one product.
///
/// With a duration the package price is multiplied by the number of
/// repurchases per year; otherwise the cost per use times the monthly uses.
pub fn product_yearly_cost(product: &Product) -> f64 {
    match product.duration {
        Some(duration) => {
            let replacements_per_year = WEEKS_PER_YEAR / duration.weeks();
            product.price * replacements_per_year
        }
        None => {
            let monthly = (product.price / f64::from(product.quantity))
                * f64::from(product.usage_frequency);
            monthly * MONTHS_PER_YEAR
        }
    }
}

/// 先算年費再除以 12，兩種計算方式統一成月費
pub fn product_monthly_cost(product: &Product) -> f64 {
    product_yearly_cost(product) / MONTHS_PER_YEAR
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExpenseCalculator {
    policy: GecoPolicy,
}

impl ExpenseCalculator {
    pub fn new() -> Self {
        Self { policy: GECO }
    }

    pub fn with_policy(policy: GecoPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &GecoPolicy {
        &self.policy
    }

    pub fn calculate(&self, products: &[Product], stats: Option<&LaundryStats>) -> ExpenseSummary {
        let mut buckets: [Vec<f64>; 4] = Default::default();
        for product in products {
            buckets[category_slot(product.category)].push(product_monthly_cost(product));
        }

        // 依數值排序後加總，確保結果與清單順序無關
        let [detergent, softener, disinfectant, enhancer] = buckets.map(|mut costs| {
            costs.sort_by(f64::total_cmp);
            costs.into_iter().sum::<f64>()
        });

        let mut summary = ExpenseSummary {
            detergent_expense: detergent,
            softener_expense: softener,
            disinfectant_expense: disinfectant,
            enhancer_expense: enhancer,
            total_expense: detergent + softener + disinfectant + enhancer,
            ..ExpenseSummary::default()
        };
        summary.yearly_expense = summary.total_expense * MONTHS_PER_YEAR;

        if let Some(stats) = stats {
            self.apply_laundry_stats(&mut summary, stats);
        }

        tracing::debug!(
            products = products.len(),
            monthly = summary.total_expense,
            yearly = summary.yearly_expense,
            "Expense summary calculated"
        );

        summary
    }

    fn apply_laundry_stats(&self, summary: &mut ExpenseSummary, stats: &LaundryStats) {
        let loads_per_week = f64::from(stats.loads_per_week);
        let yearly_loads = loads_per_week * WEEKS_PER_YEAR;

        summary.yearly_water_usage = yearly_loads * stats.water_per_load;
        summary.yearly_time_spent = (yearly_loads * stats.time_per_load) / MINUTES_PER_HOUR;

        summary.geco_yearly_expense = self.policy.price_per_load * loads_per_week * WEEKS_PER_YEAR;
        let reduced_time_per_load = (stats.time_per_load - self.policy.time_saved_per_load).max(0.0);
        summary.geco_yearly_time_spent = (yearly_loads * reduced_time_per_load) / MINUTES_PER_HOUR;
        summary.geco_yearly_water_usage =
            summary.yearly_water_usage * self.policy.water_reduction_factor;

        summary.saved_money = summary.yearly_expense - summary.geco_yearly_expense;
        summary.saved_water = summary.yearly_water_usage - summary.geco_yearly_water_usage;
        summary.saved_time = summary.yearly_time_spent - summary.geco_yearly_time_spent;
    }
}

fn category_slot(category: Category) -> usize {
    match category {
        Category::Detergent => 0,
        Category::Softener => 1,
        Category::Disinfectant => 2,
        Category::Enhancer => 3,
    }
}

/// Shorthand for `ExpenseCalculator::new().calculate(..)`.
pub fn calculate(products: &[Product], stats: Option<&LaundryStats>) -> ExpenseSummary {
    ExpenseCalculator::new().calculate(products, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn habits(loads_per_week: u32, time_per_load: f64, water_per_load: f64) -> LaundryStats {
        LaundryStats {
            loads_per_week,
            time_per_load,
            water_per_load,
        }
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        let summary = calculate(&[], None);
        assert_eq!(summary, ExpenseSummary::default());
    }

    #[test]
    fn test_legacy_sizing() {
        let product = Product::new("Detergente", 30.0, Category::Detergent);
        let summary = calculate(&[product], None);

        assert_eq!(summary.detergent_expense, 30.0);
        assert_eq!(summary.total_expense, 30.0);
        assert_eq!(summary.yearly_expense, 360.0);
        assert_eq!(summary.softener_expense, 0.0);
    }

    #[test]
    fn test_legacy_sizing_uses_cost_per_use() {
        // $90 for 30 uses, 10 uses a month -> $30 a month
        let product = Product::new("Suavizante", 90.0, Category::Softener).with_usage(30, 10);
        let summary = calculate(&[product], None);
        assert_abs_diff_eq!(summary.softener_expense, 30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_duration_sizing() {
        let product = Product::new("Cloro", 100.0, Category::Disinfectant)
            .with_duration(ProductDuration::OneMonth);

        assert_abs_diff_eq!(product_yearly_cost(&product), 1200.92, epsilon = 0.01);

        let summary = calculate(&[product], None);
        assert_abs_diff_eq!(summary.disinfectant_expense, 100.08, epsilon = 0.01);
        assert_abs_diff_eq!(summary.total_expense, 100.08, epsilon = 0.01);
    }

    #[test]
    fn test_duration_supersedes_legacy_fields() {
        let product = Product::new("Oxi", 52.0, Category::Enhancer)
            .with_usage(2, 40)
            .with_duration(ProductDuration::OneYear);
        let summary = calculate(&[product], None);
        assert_abs_diff_eq!(summary.yearly_expense, 52.0, epsilon = 1e-9);
    }

    #[test]
    fn test_duration_lookup() {
        assert_eq!(duration_in_weeks("1week"), 1.0);
        assert_eq!(duration_in_weeks("2weeks"), 2.0);
        assert_eq!(duration_in_weeks("1month"), 4.33);
        assert_eq!(duration_in_weeks("2months"), 8.66);
        assert_eq!(duration_in_weeks("3months"), 13.0);
        assert_eq!(duration_in_weeks("6months"), 26.0);
        assert_eq!(duration_in_weeks("1year"), 52.0);
        assert_eq!(duration_in_weeks("someday"), DEFAULT_DURATION_WEEKS);
        assert_eq!(duration_in_weeks(""), DEFAULT_DURATION_WEEKS);
        assert!(ProductDuration::ALL.iter().all(|d| d.weeks() > 0.0));
    }

    #[test]
    fn test_categories_do_not_mix() {
        let products = vec![
            Product::new("A", 30.0, Category::Detergent),
            Product::new("B", 12.0, Category::Softener),
        ];
        let summary = calculate(&products, None);

        assert_eq!(summary.detergent_expense, 30.0);
        assert_eq!(summary.softener_expense, 12.0);
        assert_eq!(summary.disinfectant_expense, 0.0);
        assert_eq!(summary.enhancer_expense, 0.0);
        assert_eq!(summary.total_expense, 42.0);
    }

    #[test]
    fn test_total_equals_sum_of_categories() {
        let products = vec![
            Product::new("A", 34.5, Category::Detergent).with_duration(ProductDuration::TwoWeeks),
            Product::new("B", 72.0, Category::Detergent).with_duration(ProductDuration::TwoMonths),
            Product::new("C", 19.9, Category::Softener).with_usage(7, 3),
            Product::new("D", 45.1, Category::Disinfectant).with_duration(ProductDuration::SixMonths),
            Product::new("E", 99.99, Category::Enhancer).with_duration(ProductDuration::ThreeMonths),
        ];
        let s = calculate(&products, None);
        assert_eq!(
            s.total_expense,
            s.detergent_expense + s.softener_expense + s.disinfectant_expense + s.enhancer_expense
        );
        assert_eq!(s.yearly_expense, s.total_expense * 12.0);
    }

    #[test]
    fn test_habit_only_computation() {
        let stats = habits(3, 80.0, 60.0);
        let s = calculate(&[], Some(&stats));

        assert_eq!(s.yearly_water_usage, 9360.0);
        assert_abs_diff_eq!(s.yearly_time_spent, 208.0, epsilon = 1e-9);
        assert_eq!(s.geco_yearly_expense, 3120.0);
        assert_abs_diff_eq!(s.geco_yearly_time_spent, 130.0, epsilon = 1e-9);
        assert_eq!(s.geco_yearly_water_usage, 4680.0);
        assert_abs_diff_eq!(s.saved_time, 78.0, epsilon = 1e-9);
        assert_eq!(s.saved_water, 4680.0);
        assert_eq!(s.saved_money, -3120.0);
    }

    #[test]
    fn test_short_cycles_never_go_below_zero_time() {
        let stats = habits(2, 20.0, 40.0);
        let s = calculate(&[], Some(&stats));
        assert_eq!(s.geco_yearly_time_spent, 0.0);
        assert_abs_diff_eq!(s.saved_time, s.yearly_time_spent, epsilon = 1e-9);
    }

    #[test]
    fn test_negative_savings_are_not_clamped() {
        let products = vec![Product::new("Barato", 10.0, Category::Detergent)];
        let stats = habits(1, 10.0, 5.0);
        let s = calculate(&products, Some(&stats));

        // 120 a year on products vs 1040 with GECO
        assert_abs_diff_eq!(s.saved_money, 120.0 - 1040.0, epsilon = 1e-9);
        assert!(s.saved_money < 0.0);
    }

    #[test]
    fn test_without_stats_leaves_comparison_at_zero() {
        let products = vec![Product::new("A", 30.0, Category::Detergent)];
        let s = calculate(&products, None);
        assert_eq!(s.yearly_water_usage, 0.0);
        assert_eq!(s.yearly_time_spent, 0.0);
        assert_eq!(s.geco_yearly_expense, 0.0);
        assert_eq!(s.geco_yearly_water_usage, 0.0);
        assert_eq!(s.geco_yearly_time_spent, 0.0);
        assert_eq!(s.saved_money, 0.0);
        assert_eq!(s.saved_water, 0.0);
        assert_eq!(s.saved_time, 0.0);
    }

    #[test]
    fn test_idempotent() {
        let products = vec![
            Product::new("A", 33.3, Category::Detergent).with_duration(ProductDuration::OneMonth),
            Product::new("B", 17.7, Category::Enhancer).with_usage(9, 4),
        ];
        let stats = habits(4, 75.0, 55.5);
        let first = calculate(&products, Some(&stats));
        let second = calculate(&products, Some(&stats));
        assert_eq!(first, second);
    }

    #[test]
    fn test_order_independent() {
        let mut products = vec![
            Product::new("A", 0.1, Category::Detergent).with_duration(ProductDuration::OneMonth),
            Product::new("B", 0.2, Category::Detergent).with_duration(ProductDuration::TwoMonths),
            Product::new("C", 0.3, Category::Detergent).with_duration(ProductDuration::TwoWeeks),
            Product::new("D", 45.0, Category::Softener).with_usage(3, 7),
            Product::new("E", 1e-3, Category::Detergent).with_usage(7, 1),
        ];
        let stats = habits(5, 90.0, 70.0);
        let expected = calculate(&products, Some(&stats));

        products.reverse();
        assert_eq!(calculate(&products, Some(&stats)), expected);

        products.rotate_left(2);
        assert_eq!(calculate(&products, Some(&stats)), expected);
    }

    #[test]
    fn test_custom_policy() {
        let calculator = ExpenseCalculator::with_policy(GecoPolicy {
            price_per_load: 10.0,
            ..GECO
        });
        let s = calculator.calculate(&[], Some(&habits(2, 60.0, 50.0)));
        assert_eq!(s.geco_yearly_expense, 1040.0);
        assert_eq!(calculator.policy().water_reduction_factor, 0.5);
    }
}
