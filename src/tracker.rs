use crate::models::{
    GoalReport, HitRate, PeriodConfig, ProductRule, ProductTotal, SaleRecord, SaleStatus,
    WeeklyPoint,
};
use chrono::{Datelike, Local};
use std::collections::BTreeMap;

pub fn build_report(
    records: &[SaleRecord],
    period: &PeriodConfig,
    rules: &[ProductRule],
    top_n: usize,
) -> GoalReport {
    build_report_at(
        Local::now().date_naive().iso_week().week(),
        records,
        period,
        rules,
        top_n,
    )
}

/// Assemble the full report for a given reference week. Takes the raw
/// snapshot; every aggregate below works on the period-filtered subset.
pub fn build_report_at(
    current_week: u32,
    records: &[SaleRecord],
    period: &PeriodConfig,
    rules: &[ProductRule],
    top_n: usize,
) -> GoalReport {
    let filtered = filter_period(records, period);
    let (total, percent) = total_and_percent(&filtered, period.goal_amount);

    GoalReport {
        year: period.year,
        start_week: period.start_week,
        end_week: period.end_week,
        current_week,
        goal_amount: period.goal_amount,
        total,
        percent,
        weekly_goal: weekly_goal_line(period),
        remaining_weekly_target: remaining_weekly_target(
            total,
            period.goal_amount,
            current_week,
            period,
        ),
        weekly: bucket_by_week(&filtered, period),
        hit_rate: hit_rate(&filtered),
        products: top_products(&filtered, rules, top_n),
    }
}

/// Records with a present price and date whose ISO week and ISO year fall
/// inside the configured period. Everything downstream assumes this subset.
pub fn filter_period(records: &[SaleRecord], period: &PeriodConfig) -> Vec<SaleRecord> {
    records
        .iter()
        .filter(|record| record.price.is_some())
        .filter(|record| match record.sale_date {
            Some(date) => {
                let iso = date.iso_week();
                iso.year() == period.year && period.contains(iso.week())
            }
            None => false,
        })
        .cloned()
        .collect()
}

/// Won revenue per week over the whole period, zero-filled so the series
/// always has `week_count()` ascending entries.
pub fn bucket_by_week(records: &[SaleRecord], period: &PeriodConfig) -> Vec<WeeklyPoint> {
    let mut sums: BTreeMap<u32, f64> = BTreeMap::new();
    for record in records {
        if record.status != SaleStatus::Won {
            continue;
        }
        if let (Some(price), Some(date)) = (record.price, record.sale_date) {
            *sums.entry(date.iso_week().week()).or_insert(0.0) += price;
        }
    }

    (period.start_week..=period.end_week)
        .map(|week| WeeklyPoint {
            week,
            total: sums.get(&week).copied().unwrap_or(0.0),
        })
        .collect()
}

/// Sum of Won prices and the fraction of the goal reached. A zero goal
/// yields a zero percent rather than a division error.
pub fn total_and_percent(records: &[SaleRecord], goal_amount: f64) -> (f64, f64) {
    let total: f64 = records
        .iter()
        .filter(|record| record.status == SaleStatus::Won)
        .filter_map(|record| record.price)
        .sum();

    let percent = if goal_amount == 0.0 {
        0.0
    } else {
        total / goal_amount
    };

    (total, percent)
}

/// What each remaining week has to bring in to still reach the goal:
/// the outstanding amount spread over the weeks strictly after
/// `current_week` within the period. Zero once no weeks remain or the
/// goal is already met.
pub fn remaining_weekly_target(
    current_total: f64,
    goal_amount: f64,
    current_week: u32,
    period: &PeriodConfig,
) -> f64 {
    let first_remaining = current_week.saturating_add(1).max(period.start_week);
    if first_remaining > period.end_week {
        return 0.0;
    }
    let weeks_left = period.end_week - first_remaining + 1;

    let outstanding = (goal_amount - current_total).max(0.0);
    outstanding / f64::from(weeks_left)
}

/// The flat per-week goal line the chart draws next to realized revenue.
pub fn weekly_goal_line(period: &PeriodConfig) -> f64 {
    period.goal_amount / f64::from(period.week_count())
}

/// Won / Offered / Rejected counts and the share of resolved offers that
/// were won. `Unknown` records never enter the denominator.
pub fn hit_rate(records: &[SaleRecord]) -> HitRate {
    let mut won = 0u64;
    let mut offered = 0u64;
    let mut rejected = 0u64;
    for record in records {
        match record.status {
            SaleStatus::Won => won += 1,
            SaleStatus::Offered => offered += 1,
            SaleStatus::Rejected => rejected += 1,
            SaleStatus::Unknown => {}
        }
    }

    let denominator = won + offered + rejected;
    let rate = if denominator == 0 {
        0.0
    } else {
        won as f64 / denominator as f64
    };

    HitRate {
        won,
        offered,
        rejected,
        rate,
    }
}

/// Won revenue grouped into product categories, unmatched products under
/// "Other", sorted by revenue descending (name ascending on ties), top `n`.
pub fn top_products(
    records: &[SaleRecord],
    rules: &[ProductRule],
    n: usize,
) -> Vec<ProductTotal> {
    let mut groups: BTreeMap<String, (f64, u64)> = BTreeMap::new();
    for record in records {
        if record.status != SaleStatus::Won {
            continue;
        }
        let Some(price) = record.price else { continue };
        let name = rules
            .iter()
            .find(|rule| rule.matches(&record.product))
            .map(|rule| rule.name.clone())
            .unwrap_or_else(|| "Other".to_string());
        let entry = groups.entry(name).or_insert((0.0, 0));
        entry.0 += price;
        entry.1 += 1;
    }

    let mut totals: Vec<ProductTotal> = groups
        .into_iter()
        .map(|(name, (total, count))| ProductTotal { name, total, count })
        .collect();
    totals.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    totals.truncate(n);
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn period(start_week: u32, end_week: u32, goal_amount: f64) -> PeriodConfig {
        PeriodConfig {
            start_week,
            end_week,
            year: 2025,
            goal_amount,
        }
    }

    // Monday of the given ISO week of 2025.
    fn date_in_week(week: u32) -> NaiveDate {
        NaiveDate::from_isoywd_opt(2025, week, chrono::Weekday::Mon).unwrap()
    }

    fn record(product: &str, price: f64, week: u32, status: SaleStatus) -> SaleRecord {
        SaleRecord {
            product: product.to_string(),
            price: Some(price),
            sale_date: Some(date_in_week(week)),
            status,
        }
    }

    fn rules() -> Vec<ProductRule> {
        vec![
            ProductRule::new("Microsoft Ads", &["microsoft ads"]),
            ProductRule::new("Youtube", &["youtube"]),
            ProductRule::new("Leadpage", &["leadpage"]),
            ProductRule::new("SST", &["sst", "server-side", "server side"]),
        ]
    }

    #[test]
    fn filter_period_drops_missing_fields_and_out_of_range() {
        let mut records = vec![
            record("a", 100.0, 27, SaleStatus::Won),
            record("b", 200.0, 41, SaleStatus::Won),
        ];
        records.push(SaleRecord {
            product: "no price".to_string(),
            price: None,
            sale_date: Some(date_in_week(28)),
            status: SaleStatus::Won,
        });
        records.push(SaleRecord {
            product: "no date".to_string(),
            price: Some(50.0),
            sale_date: None,
            status: SaleStatus::Won,
        });

        let kept = filter_period(&records, &period(27, 40, 1000.0));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].product, "a");
    }

    #[test]
    fn filter_period_matches_iso_year() {
        let mut other_year = record("a", 100.0, 27, SaleStatus::Won);
        other_year.sale_date = NaiveDate::from_isoywd_opt(2024, 27, chrono::Weekday::Mon);

        let kept = filter_period(&[other_year], &period(27, 40, 1000.0));
        assert!(kept.is_empty());
    }

    #[test]
    fn bucket_covers_every_week_zero_filled() {
        let records = vec![
            record("a", 100.0, 27, SaleStatus::Won),
            record("b", 200.0, 28, SaleStatus::Won),
        ];
        let buckets = bucket_by_week(&records, &period(27, 30, 1000.0));

        assert_eq!(buckets.len(), 4);
        let weeks: Vec<u32> = buckets.iter().map(|point| point.week).collect();
        assert_eq!(weeks, vec![27, 28, 29, 30]);
        assert_eq!(buckets[0].total, 100.0);
        assert_eq!(buckets[1].total, 200.0);
        assert_eq!(buckets[2].total, 0.0);
        assert_eq!(buckets[3].total, 0.0);
    }

    #[test]
    fn bucket_ignores_non_won_records() {
        let records = vec![
            record("a", 100.0, 27, SaleStatus::Won),
            record("b", 999.0, 27, SaleStatus::Offered),
            record("c", 999.0, 27, SaleStatus::Rejected),
        ];
        let buckets = bucket_by_week(&records, &period(27, 27, 1000.0));
        assert_eq!(buckets[0].total, 100.0);
    }

    #[test]
    fn total_and_percent_worked_example() {
        let records = vec![
            record("a", 100.0, 27, SaleStatus::Won),
            record("b", 200.0, 28, SaleStatus::Won),
        ];
        let (total, percent) = total_and_percent(&records, 200.0);
        assert_eq!(total, 300.0);
        assert_eq!(percent, 1.5);
    }

    #[test]
    fn total_and_percent_zero_goal_is_zero_percent() {
        let records = vec![record("a", 100.0, 27, SaleStatus::Won)];
        let (total, percent) = total_and_percent(&records, 0.0);
        assert_eq!(total, 100.0);
        assert_eq!(percent, 0.0);
    }

    #[test]
    fn remaining_target_worked_example() {
        let target = remaining_weekly_target(300.0, 1000.0, 28, &period(27, 40, 1000.0));
        assert!((target - 700.0 / 12.0).abs() < 1e-9);
    }

    #[test]
    fn remaining_target_zero_when_no_weeks_left() {
        assert_eq!(
            remaining_weekly_target(300.0, 1000.0, 40, &period(27, 40, 1000.0)),
            0.0
        );
        assert_eq!(
            remaining_weekly_target(300.0, 1000.0, 45, &period(27, 40, 1000.0)),
            0.0
        );
    }

    #[test]
    fn remaining_target_clamps_overshoot_to_zero() {
        assert_eq!(
            remaining_weekly_target(1200.0, 1000.0, 28, &period(27, 40, 1000.0)),
            0.0
        );
    }

    #[test]
    fn remaining_target_before_period_spreads_over_full_range() {
        let target = remaining_weekly_target(0.0, 1400.0, 10, &period(27, 40, 1400.0));
        assert!((target - 100.0).abs() < 1e-9);
    }

    #[test]
    fn remaining_target_monotone_in_current_total() {
        let config = period(27, 40, 1000.0);
        let mut previous = f64::MAX;
        for total in [0.0, 250.0, 500.0, 999.0, 1000.0, 2000.0] {
            let target = remaining_weekly_target(total, 1000.0, 28, &config);
            assert!(target <= previous);
            previous = target;
        }
    }

    #[test]
    fn hit_rate_counts_and_rate() {
        let records = vec![
            record("a", 1.0, 27, SaleStatus::Won),
            record("b", 1.0, 27, SaleStatus::Won),
            record("c", 1.0, 27, SaleStatus::Offered),
            record("d", 1.0, 27, SaleStatus::Rejected),
        ];
        let hits = hit_rate(&records);
        assert_eq!(hits.won, 2);
        assert_eq!(hits.offered, 1);
        assert_eq!(hits.rejected, 1);
        assert_eq!(hits.rate, 0.5);
    }

    #[test]
    fn hit_rate_excludes_unknown_from_denominator() {
        let records = vec![
            record("a", 1.0, 27, SaleStatus::Won),
            record("b", 1.0, 27, SaleStatus::Unknown),
        ];
        assert_eq!(hit_rate(&records).rate, 1.0);
    }

    #[test]
    fn hit_rate_empty_is_zero() {
        assert_eq!(hit_rate(&[]).rate, 0.0);
    }

    #[test]
    fn top_products_groups_sorts_and_buckets_other() {
        let records = vec![
            record("Youtube kampagne", 100.0, 27, SaleStatus::Won),
            record("Youtube retargeting", 50.0, 28, SaleStatus::Won),
            record("Microsoft Ads opsætning", 400.0, 27, SaleStatus::Won),
            record("Konsulenttimer", 75.0, 28, SaleStatus::Won),
            record("Leadpage", 999.0, 27, SaleStatus::Offered),
        ];
        let totals = top_products(&records, &rules(), 5);

        assert_eq!(totals.len(), 3);
        assert_eq!(totals[0].name, "Microsoft Ads");
        assert_eq!(totals[0].total, 400.0);
        assert_eq!(totals[0].count, 1);
        assert_eq!(totals[1].name, "Youtube");
        assert_eq!(totals[1].total, 150.0);
        assert_eq!(totals[1].count, 2);
        assert_eq!(totals[2].name, "Other");
        assert_eq!(totals[2].total, 75.0);
    }

    #[test]
    fn top_products_truncates_to_n() {
        let records = vec![
            record("Youtube", 100.0, 27, SaleStatus::Won),
            record("Microsoft Ads", 400.0, 27, SaleStatus::Won),
            record("Leadpage", 200.0, 27, SaleStatus::Won),
        ];
        let totals = top_products(&records, &rules(), 2);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].name, "Microsoft Ads");
        assert_eq!(totals[1].name, "Leadpage");
    }

    #[test]
    fn report_composes_all_series() {
        let records = vec![
            record("Youtube kampagne", 100.0, 27, SaleStatus::Won),
            record("Microsoft Ads", 200.0, 28, SaleStatus::Won),
            record("Leadpage", 50.0, 28, SaleStatus::Offered),
        ];
        let config = period(27, 30, 1000.0);
        let report = build_report_at(28, &records, &config, &rules(), 5);

        assert_eq!(report.current_week, 28);
        assert_eq!(report.total, 300.0);
        assert_eq!(report.percent, 0.3);
        assert_eq!(report.weekly.len(), 4);
        assert_eq!(report.weekly_goal, 250.0);
        assert_eq!(report.remaining_weekly_target, 350.0);
        assert_eq!(report.hit_rate.won, 2);
        assert_eq!(report.hit_rate.offered, 1);
        assert_eq!(report.products.len(), 2);
    }
}
