//! 报表聚合
//!
//! 对已按租户加载完成的销售/台账行做纯折叠：按期间分桶、收入/成本/利润、
//! 毛利率。不触数据库，不依赖系统时钟（`now` 由调用方传入），便于测试。
//!
//! 周期以周六为一周起点（波斯历商业周）。

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::db::models::{InventoryLogDetail, PaymentMethod, SaleItemDetail, SaleWithItems};

/// 分桶粒度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
}

/// 分桶方式：滚动 N 桶，或自最早一笔销售起的完整历史
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketMode {
    Rolling { count: u32 },
    Historical,
}

/// 报表时间范围预设
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    /// 7 日桶
    Week,
    /// 4 周桶
    Month,
    /// 6 月桶
    SixMonths,
    /// 12 月桶
    Year,
    /// 自最早销售起按年分桶
    All,
}

impl Timeframe {
    pub fn period(&self) -> Period {
        match self {
            Timeframe::Week => Period::Day,
            Timeframe::Month => Period::Week,
            Timeframe::SixMonths | Timeframe::Year => Period::Month,
            Timeframe::All => Period::Year,
        }
    }

    pub fn mode(&self) -> BucketMode {
        match self {
            Timeframe::Week => BucketMode::Rolling { count: 7 },
            Timeframe::Month => BucketMode::Rolling { count: 4 },
            Timeframe::SixMonths => BucketMode::Rolling { count: 6 },
            Timeframe::Year => BucketMode::Rolling { count: 12 },
            Timeframe::All => BucketMode::Historical,
        }
    }
}

/// 带成本信息的销售行
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedSale {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub revenue: f64,
    pub expense: f64,
    pub profit: f64,
}

/// 单个期间桶
#[derive(Debug, Clone, Serialize)]
pub struct Bucket {
    pub label: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub revenue: f64,
    pub expense: f64,
    pub profit: f64,
    pub orders: usize,
}

/// 桶合计
#[derive(Debug, Clone, Default, Serialize)]
pub struct Totals {
    pub revenue: f64,
    pub expense: f64,
    pub profit: f64,
    pub orders: usize,
}

/// 时间范围报表：有序、不重叠、连续的桶加上合计与毛利率
#[derive(Debug, Clone, Serialize)]
pub struct TimeframeReport {
    pub timeframe: Timeframe,
    pub buckets: Vec<Bucket>,
    pub totals: Totals,
    /// 收入为 0 时为 None，呈现为「暂无数据」，永不除零
    pub margin: Option<f64>,
}

/// 原料采购聚合行（正向台账条目）
#[derive(Debug, Clone, Serialize)]
pub struct MaterialsRow {
    pub product_id: i64,
    pub product_name: String,
    pub stock_unit: Option<String>,
    pub entries: usize,
    pub total_qty: i64,
    pub total_amount: f64,
    pub last_purchase: i64,
}

/// 行成本：菜单成本优先，其次关联原料单价，都缺失记 0
pub fn line_cost(item: &SaleItemDetail) -> f64 {
    item.menu_cost.or(item.product_price).unwrap_or(0.0)
}

/// 毛利率（百分比）。收入为 0 时无定义。
pub fn margin(revenue: f64, profit: f64) -> Option<f64> {
    if revenue > 0.0 {
        Some(profit / revenue * 100.0)
    } else {
        None
    }
}

/// 把销售与行项折叠成带收入/成本/利润的行
pub fn enrich(sales: &[SaleWithItems]) -> Vec<EnrichedSale> {
    sales
        .iter()
        .map(|s| {
            let revenue = s.sale.total;
            let expense: f64 = s
                .items
                .iter()
                .map(|item| line_cost(item) * item.qty as f64)
                .sum();
            EnrichedSale {
                id: s.sale.id,
                created_at: DateTime::from_timestamp_millis(s.sale.created_at)
                    .unwrap_or_else(Utc::now),
                payment_method: s.sale.payment_method,
                revenue,
                expense,
                profit: revenue - expense,
            }
        })
        .collect()
}

/// 构建时间范围报表
pub fn build_report(
    sales: &[EnrichedSale],
    timeframe: Timeframe,
    now: DateTime<Utc>,
) -> TimeframeReport {
    let buckets = build_buckets(sales, timeframe.period(), timeframe.mode(), now);
    let totals = buckets.iter().fold(Totals::default(), |mut acc, b| {
        acc.revenue += b.revenue;
        acc.expense += b.expense;
        acc.profit += b.profit;
        acc.orders += b.orders;
        acc
    });
    let margin = margin(totals.revenue, totals.profit);
    TimeframeReport {
        timeframe,
        buckets,
        totals,
        margin,
    }
}

/// 生成有序、不重叠、连续的期间桶并聚合销售
pub fn build_buckets(
    sales: &[EnrichedSale],
    period: Period,
    mode: BucketMode,
    now: DateTime<Utc>,
) -> Vec<Bucket> {
    let mut descriptors: Vec<(DateTime<Utc>, DateTime<Utc>)> = Vec::new();

    match mode {
        BucketMode::Historical => {
            let earliest = sales
                .iter()
                .map(|s| s.created_at)
                .min()
                .unwrap_or(now);
            let mut cursor = period_start(period, earliest);
            let last = period_start(period, now);
            while cursor <= last {
                descriptors.push((cursor, period_end(period, cursor)));
                cursor = shift_period(period, cursor, 1);
            }
            if descriptors.is_empty() {
                let start = period_start(period, now);
                descriptors.push((start, period_end(period, start)));
            }
        }
        BucketMode::Rolling { count } => {
            let base = period_start(period, now);
            let count = count.max(1) as i32;
            for i in (0..count).rev() {
                let start = shift_period(period, base, -i);
                descriptors.push((start, period_end(period, start)));
            }
        }
    }

    descriptors
        .into_iter()
        .map(|(start, end)| {
            let in_bucket: Vec<&EnrichedSale> = sales
                .iter()
                .filter(|s| s.created_at >= start && s.created_at <= end)
                .collect();
            let revenue: f64 = in_bucket.iter().map(|s| s.revenue).sum();
            let expense: f64 = in_bucket.iter().map(|s| s.expense).sum();
            Bucket {
                label: period_label(period, start),
                start,
                end,
                revenue,
                expense,
                profit: revenue - expense,
                orders: in_bucket.len(),
            }
        })
        .collect()
}

/// 正向台账条目按原料聚合为采购报表，按总额降序
pub fn materials_report(logs: &[InventoryLogDetail]) -> Vec<MaterialsRow> {
    let mut rows: Vec<MaterialsRow> = Vec::new();
    for log in logs.iter().filter(|l| l.change > 0) {
        match rows.iter_mut().find(|r| r.product_id == log.product_id) {
            Some(row) => {
                row.entries += 1;
                row.total_qty += log.change;
                row.total_amount += log.product_price * log.change as f64;
                row.last_purchase = row.last_purchase.max(log.created_at);
            }
            None => rows.push(MaterialsRow {
                product_id: log.product_id,
                product_name: log.product_name.clone(),
                stock_unit: log.stock_unit.clone(),
                entries: 1,
                total_qty: log.change,
                total_amount: log.product_price * log.change as f64,
                last_purchase: log.created_at,
            }),
        }
    }
    rows.sort_by(|a, b| {
        b.total_amount
            .partial_cmp(&a.total_amount)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    rows
}

// ── Period arithmetic ───────────────────────────────────────────────

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .expect("midnight is always valid")
        .and_utc()
}

fn period_start(period: Period, at: DateTime<Utc>) -> DateTime<Utc> {
    let date = at.date_naive();
    let start = match period {
        Period::Day => date,
        Period::Week => {
            // Saturday week start: Sat=0 .. Fri=6
            let days_since_sat = (date.weekday().num_days_from_monday() + 2) % 7;
            date - Days::new(days_since_sat as u64)
        }
        Period::Month => NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
            .expect("first of month is always valid"),
        Period::Year => {
            NaiveDate::from_ymd_opt(date.year(), 1, 1).expect("January 1st is always valid")
        }
    };
    start_of_day(start)
}

/// End of the period that begins at `start`: one tick before the next start
fn period_end(period: Period, start: DateTime<Utc>) -> DateTime<Utc> {
    shift_period(period, start, 1) - chrono::Duration::milliseconds(1)
}

fn shift_period(period: Period, start: DateTime<Utc>, n: i32) -> DateTime<Utc> {
    let date = start.date_naive();
    let shifted = match period {
        Period::Day => {
            if n >= 0 {
                date + Days::new(n as u64)
            } else {
                date - Days::new((-n) as u64)
            }
        }
        Period::Week => {
            let days = 7 * n;
            if days >= 0 {
                date + Days::new(days as u64)
            } else {
                date - Days::new((-days) as u64)
            }
        }
        Period::Month => {
            if n >= 0 {
                date + Months::new(n as u32)
            } else {
                date - Months::new((-n) as u32)
            }
        }
        Period::Year => {
            if n >= 0 {
                date + Months::new(12 * n as u32)
            } else {
                date - Months::new(12 * (-n) as u32)
            }
        }
    };
    start_of_day(shifted)
}

fn period_label(period: Period, start: DateTime<Utc>) -> String {
    match period {
        Period::Day | Period::Week => start.format("%Y-%m-%d").to_string(),
        Period::Month => start.format("%Y-%m").to_string(),
        Period::Year => start.format("%Y").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sale_at(ts: DateTime<Utc>, revenue: f64, expense: f64) -> EnrichedSale {
        EnrichedSale {
            id: ts.timestamp_millis(),
            created_at: ts,
            payment_method: PaymentMethod::Pos,
            revenue,
            expense,
            profit: revenue - expense,
        }
    }

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn margin_is_undefined_without_revenue() {
        assert_eq!(margin(0.0, 0.0), None);
        assert_eq!(margin(200.0, 50.0), Some(25.0));
    }

    #[test]
    fn line_cost_falls_back_from_menu_cost_to_product_price_to_zero() {
        let mut item = SaleItemDetail {
            id: 1,
            sale_id: 1,
            menu_item_id: Some(1),
            product_id: None,
            qty: 2,
            price: 100.0,
            name: None,
            menu_cost: Some(40.0),
            product_price: Some(25.0),
        };
        assert_eq!(line_cost(&item), 40.0);
        item.menu_cost = None;
        assert_eq!(line_cost(&item), 25.0);
        item.product_price = None;
        assert_eq!(line_cost(&item), 0.0);
    }

    #[test]
    fn rolling_buckets_are_ordered_contiguous_and_non_overlapping() {
        let now = utc(2025, 3, 14, 15);
        let buckets = build_buckets(&[], Period::Day, BucketMode::Rolling { count: 7 }, now);
        assert_eq!(buckets.len(), 7);
        for pair in buckets.windows(2) {
            assert!(pair[0].end < pair[1].start);
            // contiguous: next start is exactly one tick after previous end
            assert_eq!(
                pair[1].start - pair[0].end,
                chrono::Duration::milliseconds(1)
            );
        }
        assert_eq!(buckets.last().unwrap().start, utc(2025, 3, 14, 0));
    }

    #[test]
    fn weeks_start_on_saturday() {
        // 2025-03-14 is a Friday; its week began Saturday 2025-03-08
        let now = utc(2025, 3, 14, 10);
        let buckets = build_buckets(&[], Period::Week, BucketMode::Rolling { count: 1 }, now);
        assert_eq!(buckets[0].start, utc(2025, 3, 8, 0));
    }

    #[test]
    fn sales_land_in_their_bucket() {
        let now = utc(2025, 3, 14, 23);
        let sales = vec![
            sale_at(utc(2025, 3, 14, 9), 130_000.0, 50_000.0),
            sale_at(utc(2025, 3, 13, 9), 70_000.0, 20_000.0),
            sale_at(utc(2025, 3, 1, 9), 999.0, 0.0), // outside the 7-day window
        ];
        let buckets = build_buckets(&sales, Period::Day, BucketMode::Rolling { count: 7 }, now);
        let today = buckets.last().unwrap();
        assert_eq!(today.orders, 1);
        assert_eq!(today.revenue, 130_000.0);
        assert_eq!(today.profit, 80_000.0);
        let yesterday = &buckets[buckets.len() - 2];
        assert_eq!(yesterday.orders, 1);
        assert_eq!(yesterday.revenue, 70_000.0);
    }

    #[test]
    fn historical_mode_spans_from_earliest_sale() {
        let now = utc(2025, 6, 1, 0);
        let sales = vec![
            sale_at(utc(2023, 2, 10, 12), 100.0, 10.0),
            sale_at(utc(2025, 1, 5, 12), 300.0, 30.0),
        ];
        let buckets = build_buckets(&sales, Period::Year, BucketMode::Historical, now);
        assert_eq!(buckets.len(), 3); // 2023, 2024, 2025
        assert_eq!(buckets[0].orders, 1);
        assert_eq!(buckets[1].orders, 0);
        assert_eq!(buckets[2].orders, 1);
    }

    #[test]
    fn historical_mode_without_sales_yields_one_empty_bucket() {
        let now = utc(2025, 6, 1, 0);
        let report = build_report(&[], Timeframe::All, now);
        assert_eq!(report.buckets.len(), 1);
        assert_eq!(report.totals.orders, 0);
        assert_eq!(report.margin, None);
    }

    #[test]
    fn report_totals_and_margin_fold_over_buckets() {
        let now = utc(2025, 3, 14, 23);
        let sales = vec![
            sale_at(utc(2025, 3, 14, 9), 200.0, 50.0),
            sale_at(utc(2025, 3, 12, 9), 100.0, 25.0),
        ];
        let report = build_report(&sales, Timeframe::Week, now);
        assert_eq!(report.totals.revenue, 300.0);
        assert_eq!(report.totals.expense, 75.0);
        assert_eq!(report.totals.orders, 2);
        assert_eq!(report.margin, Some(75.0));
    }

    #[test]
    fn month_buckets_handle_year_boundaries() {
        let now = utc(2025, 1, 15, 0);
        let buckets = build_buckets(&[], Period::Month, BucketMode::Rolling { count: 3 }, now);
        assert_eq!(buckets[0].start, utc(2024, 11, 1, 0));
        assert_eq!(buckets[1].start, utc(2024, 12, 1, 0));
        assert_eq!(buckets[2].start, utc(2025, 1, 1, 0));
    }

    #[test]
    fn materials_report_aggregates_positive_entries_only() {
        let logs = vec![
            InventoryLogDetail {
                id: 1,
                product_id: 10,
                change: 5,
                reason: "initial stock".into(),
                created_at: 1000,
                product_name: "Beans".into(),
                product_price: 200.0,
                stock_unit: Some("kg".into()),
            },
            InventoryLogDetail {
                id: 2,
                product_id: 10,
                change: -2,
                reason: "breakage".into(),
                created_at: 2000,
                product_name: "Beans".into(),
                product_price: 200.0,
                stock_unit: Some("kg".into()),
            },
            InventoryLogDetail {
                id: 3,
                product_id: 10,
                change: 3,
                reason: "restock".into(),
                created_at: 3000,
                product_name: "Beans".into(),
                product_price: 200.0,
                stock_unit: Some("kg".into()),
            },
        ];
        let rows = materials_report(&logs);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].entries, 2);
        assert_eq!(rows[0].total_qty, 8);
        assert_eq!(rows[0].total_amount, 1600.0);
        assert_eq!(rows[0].last_purchase, 3000);
    }
}
