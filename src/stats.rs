// 📊 Derived Statistics - Dashboard figures recomputed from current state
//
// Every function here is pure: pass the current collections in, get the
// figures out. Nothing is cached, so results always match the inputs.

use crate::config::TrackerConfig;
use crate::entities::{PaymentType, Transaction};
use serde::{Deserialize, Serialize};

pub const CHART_COLORS: [&str; 6] = [
    "#10b981", "#3b82f6", "#f59e0b", "#8b5cf6", "#ef4444", "#64748b",
];

/// Placeholder ring color when there is nothing to chart.
pub const EMPTY_CHART_LIGHT: &str = "#f1f5f9";
pub const EMPTY_CHART_DARK: &str = "#334155";

/// Sum of amounts, saturating at `u64::MAX` instead of overflowing.
pub fn total_collected(transactions: &[Transaction]) -> u64 {
    saturating_sum(transactions.iter().map(|tx| tx.amount))
}

fn saturating_sum(amounts: impl Iterator<Item = u64>) -> u64 {
    amounts.fold(0, u64::saturating_add)
}

pub fn total_transactions(transactions: &[Transaction]) -> usize {
    transactions.len()
}

// ============================================================================
// MONTHLY STATISTICS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStats {
    pub monthly_target: u64,
    #[serde(rename = "currentMonthSPP")]
    pub current_month_spp: u64,
    /// Whole percent of the target collected; 0 when there is no target
    pub percentage: u64,
    /// Collected tuition expressed as a number of full monthly fees
    pub paid_count: u64,
}

pub fn monthly_stats(
    student_count: usize,
    transactions: &[Transaction],
    config: &TrackerConfig,
) -> MonthlyStats {
    let monthly_target = (student_count as u64).saturating_mul(config.monthly_fee);

    let current_month_spp = saturating_sum(
        transactions
            .iter()
            .filter(|tx| tx.payment_type == PaymentType::Spp && tx.month == config.reference_month)
            .map(|tx| tx.amount),
    );

    MonthlyStats {
        monthly_target,
        current_month_spp,
        percentage: rounded_ratio(u128::from(current_month_spp) * 100, monthly_target.into()),
        paid_count: rounded_ratio(current_month_spp.into(), config.monthly_fee.into()),
    }
}

/// round(numerator / denominator), defined as 0 for a zero denominator.
/// Results past `u64::MAX` clamp to it.
fn rounded_ratio(numerator: u128, denominator: u128) -> u64 {
    if denominator == 0 {
        return 0;
    }
    (numerator as f64 / denominator as f64).round() as u64
}

/// Palette color for the chart group at `index`; wraps after the last color.
pub fn chart_color(index: usize) -> &'static str {
    CHART_COLORS[index % CHART_COLORS.len()]
}

// ============================================================================
// CATEGORY BREAKDOWN (donut chart)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSlice {
    pub label: String,
    pub payment_type: PaymentType,
    pub value: u64,
    pub percentage: f64,
    pub color: String,
    pub start_deg: f64,
    pub end_deg: f64,
}

impl ChartSlice {
    /// CSS conic-gradient stop list entry, e.g. `#10b981 0deg 140.8deg`.
    pub fn segment(&self) -> String {
        format!("{} {}deg {}deg", self.color, self.start_deg, self.end_deg)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSegment {
    pub color: String,
    pub start_deg: f64,
    pub end_deg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub data: Vec<ChartSlice>,
    pub gradient: String,
    pub total: u64,
    /// Ring color used when `total` is 0
    pub empty_color: String,
}

impl ChartData {
    pub fn is_placeholder(&self) -> bool {
        self.total == 0
    }

    /// Visual segments around the full circle. A zero total yields one
    /// placeholder segment from 0 to 360 degrees.
    pub fn segments(&self) -> Vec<ChartSegment> {
        if self.is_placeholder() {
            return vec![ChartSegment {
                color: self.empty_color.clone(),
                start_deg: 0.0,
                end_deg: 360.0,
            }];
        }

        self.data
            .iter()
            .map(|slice| ChartSegment {
                color: slice.color.clone(),
                start_deg: slice.start_deg,
                end_deg: slice.end_deg,
            })
            .collect()
    }

    pub fn slice(&self, payment_type: PaymentType) -> Option<&ChartSlice> {
        self.data.iter().find(|s| s.payment_type == payment_type)
    }
}

pub fn chart_data(transactions: &[Transaction], dark_mode: bool) -> ChartData {
    // Group in order of first appearance
    let mut groups: Vec<(PaymentType, u64)> = Vec::new();
    for tx in transactions {
        match groups.iter_mut().find(|(t, _)| *t == tx.payment_type) {
            Some((_, value)) => *value = value.saturating_add(tx.amount),
            None => groups.push((tx.payment_type, tx.amount)),
        }
    }

    let total = saturating_sum(groups.iter().map(|(_, v)| *v));
    let mut current_deg = 0.0;

    let data: Vec<ChartSlice> = groups
        .into_iter()
        .enumerate()
        .map(|(index, (payment_type, value))| {
            let share = if total > 0 {
                value as f64 / total as f64
            } else {
                0.0
            };
            let deg = share * 360.0;
            let slice = ChartSlice {
                label: payment_type.label().to_string(),
                payment_type,
                value,
                percentage: share * 100.0,
                color: chart_color(index).to_string(),
                start_deg: current_deg,
                end_deg: current_deg + deg,
            };
            current_deg += deg;
            slice
        })
        .collect();

    let empty_color = if dark_mode {
        EMPTY_CHART_DARK
    } else {
        EMPTY_CHART_LIGHT
    };

    let gradient = if total > 0 {
        let stops: Vec<String> = data.iter().map(|s| s.segment()).collect();
        format!("conic-gradient({})", stops.join(", "))
    } else {
        format!("conic-gradient({} 0deg 360deg)", empty_color)
    };

    ChartData {
        data,
        gradient,
        total,
        empty_color: empty_color.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{NewTransaction, PaymentStatus};

    fn tx(id: u64, payment_type: PaymentType, month: &str, amount: u64) -> Transaction {
        NewTransaction {
            student_id: 1,
            payment_type,
            month: month.to_string(),
            year: "2024".to_string(),
            amount,
            date: "2024-01-10".to_string(),
            status: PaymentStatus::Paid,
        }
        .into_transaction(id)
    }

    #[test]
    fn test_total_collected() {
        assert_eq!(total_collected(&[]), 0);

        let txs = vec![
            tx(1, PaymentType::Spp, "Januari", 150_000),
            tx(2, PaymentType::Materials, "-", 200_000),
        ];
        assert_eq!(total_collected(&txs), 350_000);
        assert_eq!(total_transactions(&txs), 2);
    }

    #[test]
    fn test_monthly_stats_without_students() {
        let txs = vec![tx(1, PaymentType::Spp, "Januari", 150_000)];
        let stats = monthly_stats(0, &txs, &TrackerConfig::default());

        assert_eq!(stats.monthly_target, 0);
        assert_eq!(stats.percentage, 0);
        assert_eq!(stats.current_month_spp, 150_000);
        assert_eq!(stats.paid_count, 1);
    }

    #[test]
    fn test_monthly_stats_fully_paid() {
        let txs: Vec<Transaction> = (1..=4)
            .map(|i| tx(i, PaymentType::Spp, "Januari", 150_000))
            .collect();
        let stats = monthly_stats(4, &txs, &TrackerConfig::default());

        assert_eq!(stats.monthly_target, 600_000);
        assert_eq!(stats.percentage, 100);
        assert_eq!(stats.paid_count, 4);
    }

    #[test]
    fn test_monthly_stats_only_counts_reference_month_tuition() {
        let txs = vec![
            tx(1, PaymentType::Spp, "Januari", 150_000),
            tx(2, PaymentType::Spp, "Februari", 150_000),
            tx(3, PaymentType::BuildingFund, "-", 500_000),
        ];
        let stats = monthly_stats(3, &txs, &TrackerConfig::default());

        assert_eq!(stats.current_month_spp, 150_000);
        assert_eq!(stats.percentage, 33);
        assert_eq!(stats.paid_count, 1);
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        // 75_000 of 150_000 * 1 student = 50%; 1/8 of 600_000 = 12.5% -> 13
        let txs = vec![tx(1, PaymentType::Spp, "Januari", 75_000)];
        assert_eq!(monthly_stats(1, &txs, &TrackerConfig::default()).percentage, 50);
        assert_eq!(monthly_stats(4, &txs, &TrackerConfig::default()).percentage, 13);
    }

    #[test]
    fn test_monthly_stats_zero_fee() {
        let config = TrackerConfig {
            monthly_fee: 0,
            ..TrackerConfig::default()
        };
        let txs = vec![tx(1, PaymentType::Spp, "Januari", 10_000)];
        let stats = monthly_stats(5, &txs, &config);

        assert_eq!(stats.monthly_target, 0);
        assert_eq!(stats.percentage, 0);
        assert_eq!(stats.paid_count, 0);
    }

    #[test]
    fn test_monthly_stats_huge_amounts_do_not_overflow() {
        let txs = vec![
            tx(1, PaymentType::Spp, "Januari", 200_000_000_000_000_000),
            tx(2, PaymentType::Spp, "Januari", u64::MAX),
        ];
        let stats = monthly_stats(5, &txs, &TrackerConfig::default());

        assert_eq!(stats.current_month_spp, u64::MAX);
        assert_eq!(stats.monthly_target, 750_000);
        assert!(stats.percentage > 100);
        assert!(stats.paid_count > 5);

        let config = TrackerConfig {
            monthly_fee: u64::MAX,
            ..TrackerConfig::default()
        };
        assert_eq!(monthly_stats(3, &[], &config).monthly_target, u64::MAX);
    }

    #[test]
    fn test_totals_saturate() {
        let txs = vec![
            tx(1, PaymentType::Spp, "Januari", u64::MAX),
            tx(2, PaymentType::Spp, "Januari", 150_000),
            tx(3, PaymentType::Materials, "-", 1),
        ];

        assert_eq!(total_collected(&txs), u64::MAX);

        let chart = chart_data(&txs, false);
        assert_eq!(chart.total, u64::MAX);
        assert_eq!(chart.data[0].value, u64::MAX);
        assert!(!chart.is_placeholder());
    }

    #[test]
    fn test_chart_empty_is_placeholder() {
        let chart = chart_data(&[], false);

        assert!(chart.data.is_empty());
        assert!(chart.is_placeholder());
        assert_eq!(chart.gradient, "conic-gradient(#f1f5f9 0deg 360deg)");

        let segments = chart.segments();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].start_deg, 0.0);
        assert_eq!(segments[0].end_deg, 360.0);
    }

    #[test]
    fn test_chart_placeholder_follows_dark_mode() {
        let chart = chart_data(&[], true);
        assert_eq!(chart.gradient, "conic-gradient(#334155 0deg 360deg)");
        assert_eq!(chart.segments()[0].color, EMPTY_CHART_DARK);
    }

    #[test]
    fn test_chart_groups_in_first_seen_order() {
        let txs = vec![
            tx(1, PaymentType::Materials, "-", 100_000),
            tx(2, PaymentType::Spp, "Januari", 200_000),
            tx(3, PaymentType::Materials, "-", 100_000),
        ];
        let chart = chart_data(&txs, false);

        assert_eq!(chart.total, 400_000);
        assert_eq!(chart.data.len(), 2);
        assert_eq!(chart.data[0].label, "LKS");
        assert_eq!(chart.data[0].value, 200_000);
        assert_eq!(chart.data[0].color, "#10b981");
        assert_eq!(chart.data[1].label, "SPP");
        assert_eq!(chart.data[1].color, "#3b82f6");

        assert_eq!(chart.data[0].start_deg, 0.0);
        assert_eq!(chart.data[0].end_deg, 180.0);
        assert_eq!(chart.data[1].start_deg, 180.0);
        assert_eq!(chart.data[1].end_deg, 360.0);
        assert_eq!(
            chart.gradient,
            "conic-gradient(#10b981 0deg 180deg, #3b82f6 180deg 360deg)"
        );
    }

    #[test]
    fn test_chart_percentages_sum_to_hundred() {
        let txs = vec![
            tx(1, PaymentType::Spp, "Januari", 150_000),
            tx(2, PaymentType::Materials, "-", 200_000),
            tx(3, PaymentType::BuildingFund, "-", 500_000),
            tx(4, PaymentType::Charity, "-", 33_333),
        ];
        let chart = chart_data(&txs, false);

        let sum: f64 = chart.data.iter().map(|s| s.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9);

        let last = chart.data.last().unwrap();
        assert!((last.end_deg - 360.0).abs() < 1e-9);
        assert!(!chart.is_placeholder());
        assert_eq!(chart.segments().len(), 4);
    }

    #[test]
    fn test_chart_palette_covers_every_type() {
        let txs: Vec<Transaction> = PaymentType::ALL
            .iter()
            .enumerate()
            .map(|(i, t)| tx(i as u64, *t, "-", 10_000))
            .collect();
        let chart = chart_data(&txs, false);

        assert_eq!(chart.data.len(), 6);
        assert_eq!(chart.data[5].color, "#64748b");
        assert_eq!(
            chart.slice(PaymentType::Other).map(|s| s.color.as_str()),
            Some("#64748b")
        );
    }

    #[test]
    fn test_chart_colors_wrap_after_six_groups() {
        assert_eq!(chart_color(0), "#10b981");
        assert_eq!(chart_color(5), "#64748b");
        assert_eq!(chart_color(6), "#10b981");
        assert_eq!(chart_color(13), "#3b82f6");
    }

    #[test]
    fn test_chart_all_zero_amounts() {
        let txs = vec![tx(1, PaymentType::Spp, "Januari", 0)];
        let chart = chart_data(&txs, false);

        assert!(chart.is_placeholder());
        assert_eq!(chart.data.len(), 1);
        assert_eq!(chart.data[0].percentage, 0.0);
        assert_eq!(chart.segments().len(), 1);
    }
}
