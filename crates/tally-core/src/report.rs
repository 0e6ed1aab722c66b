//! # Sales Reports
//!
//! Read-only summaries over the ledger for the reports screen.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────────┐
//! │  transactions ──┐                                                      │
//! │                 ├──► filter by period ──► SalesReport                 │
//! │  refunds ───────┘    (today / month / all)   ├── headline figures     │
//! │                                              ├── top products         │
//! │                                              ├── tax by rate          │
//! │                                              ├── by payment method    │
//! │                                              └── by category          │
//! └────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Figures are the settled amounts recorded at checkout. Revenue is gross of
//! refunds; refunds are reported alongside, not netted out.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use ts_rs::TS;

use crate::ledger::Transaction;
use crate::money::{Money, PreciseMoney};
use crate::refund::RefundRecord;
use crate::types::{PaymentMethod, TaxRate, TransactionStatus};

/// How many products the top-products table lists.
pub const TOP_PRODUCTS_LIMIT: usize = 5;

/// How many transactions the recent-sales table lists.
pub const RECENT_TRANSACTIONS_LIMIT: usize = 10;

// =============================================================================
// Period
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ReportPeriod {
    /// Since midnight (UTC) of the current day.
    Today,
    /// Since the first of the current month.
    Month,
    All,
}

impl ReportPeriod {
    /// First instant inside the period, or `None` for all time.
    pub fn start(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let day = match self {
            ReportPeriod::Today => now.date_naive(),
            ReportPeriod::Month => now.date_naive().with_day(1)?,
            ReportPeriod::All => return None,
        };
        Some(Utc.from_utc_datetime(&day.and_hms_opt(0, 0, 0)?))
    }

    pub fn contains(&self, at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self.start(now).map_or(true, |start| at >= start)
    }
}

// =============================================================================
// Report Rows
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductSales {
    pub product_id: String,
    pub name: String,
    pub quantity: i64,
    /// Σ line subtotal, before tax.
    pub revenue: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxBreakdown {
    pub rate: TaxRate,
    pub taxable: Money,
    pub tax: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBreakdown {
    pub method: PaymentMethod,
    pub orders: usize,
    pub revenue: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub category: String,
    /// Σ line total with tax.
    pub revenue: Money,
    pub profit: Money,
}

// =============================================================================
// Sales Report
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub period: ReportPeriod,
    pub revenue: Money,
    pub tax: Money,
    pub profit: Money,
    pub cost_of_goods: Money,
    pub orders: usize,
    pub average_order_value: Money,
    /// Σ refunds dated inside the period.
    pub refunds_total: Money,
    pub refunded_orders: usize,
    pub partially_refunded_orders: usize,
    pub unique_customers: usize,
    pub top_products: Vec<ProductSales>,
    pub tax_breakdown: Vec<TaxBreakdown>,
    pub payment_breakdown: Vec<PaymentBreakdown>,
    pub category_breakdown: Vec<CategoryBreakdown>,
    /// Newest first.
    pub recent_transaction_ids: Vec<String>,
}

impl SalesReport {
    pub fn build(
        transactions: &[Transaction],
        refunds: &[RefundRecord],
        period: ReportPeriod,
        now: DateTime<Utc>,
    ) -> Self {
        let in_period: Vec<&Transaction> = transactions
            .iter()
            .filter(|t| period.contains(t.created_at, now))
            .collect();

        let revenue: Money = in_period.iter().map(|t| t.total).sum();
        let orders = in_period.len();

        let count_status = |status: TransactionStatus| {
            in_period.iter().filter(|t| t.status == status).count()
        };

        let unique_customers = in_period
            .iter()
            .filter_map(|t| t.customer_id())
            .collect::<HashSet<_>>()
            .len();

        let mut recent = in_period.clone();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        SalesReport {
            period,
            revenue,
            tax: in_period.iter().map(|t| t.total_tax).sum(),
            profit: in_period.iter().map(|t| t.profit).sum(),
            cost_of_goods: in_period.iter().map(|t| t.cost_of_goods()).sum(),
            orders,
            average_order_value: average(revenue, orders),
            refunds_total: refunds
                .iter()
                .filter(|r| period.contains(r.date, now))
                .map(|r| r.amount)
                .sum(),
            refunded_orders: count_status(TransactionStatus::Refunded),
            partially_refunded_orders: count_status(TransactionStatus::PartiallyRefunded),
            unique_customers,
            top_products: top_products(&in_period),
            tax_breakdown: tax_breakdown(&in_period),
            payment_breakdown: payment_breakdown(&in_period),
            category_breakdown: category_breakdown(&in_period),
            recent_transaction_ids: recent
                .iter()
                .take(RECENT_TRANSACTIONS_LIMIT)
                .map(|t| t.id.clone())
                .collect(),
        }
    }

    /// Profit as a percentage of revenue, 0 when nothing was sold.
    pub fn profit_margin(&self) -> f64 {
        if self.revenue.is_positive() {
            self.profit.cents() as f64 / self.revenue.cents() as f64 * 100.0
        } else {
            0.0
        }
    }
}

/// `total / count`, rounded half away from zero.
fn average(total: Money, count: usize) -> Money {
    if count == 0 {
        return Money::zero();
    }
    let n = count as i64;
    let cents = total.cents();
    let rounded = if cents >= 0 {
        (cents + n / 2) / n
    } else {
        (cents - n / 2) / n
    };
    Money::from_cents(rounded)
}

/// Best sellers by revenue, ties broken by quantity.
fn top_products(transactions: &[&Transaction]) -> Vec<ProductSales> {
    let mut by_product: BTreeMap<&str, ProductSales> = BTreeMap::new();
    for line in transactions.iter().flat_map(|t| &t.items) {
        let entry = by_product
            .entry(line.product_id())
            .or_insert_with(|| ProductSales {
                product_id: line.product.id.clone(),
                name: line.product.name.clone(),
                quantity: 0,
                revenue: Money::zero(),
            });
        entry.quantity += line.quantity;
        entry.revenue += line.subtotal;
    }

    let mut sales: Vec<ProductSales> = by_product.into_values().collect();
    sales.sort_by(|a, b| {
        b.revenue
            .cmp(&a.revenue)
            .then_with(|| b.quantity.cmp(&a.quantity))
    });
    sales.truncate(TOP_PRODUCTS_LIMIT);
    sales
}

fn tax_breakdown(transactions: &[&Transaction]) -> Vec<TaxBreakdown> {
    let mut by_rate: BTreeMap<u32, (Money, PreciseMoney)> = BTreeMap::new();
    for line in transactions.iter().flat_map(|t| &t.items) {
        let entry = by_rate.entry(line.product.tax_rate_bps).or_default();
        entry.0 += line.subtotal;
        entry.1 += line.tax;
    }

    by_rate
        .into_iter()
        .map(|(bps, (taxable, tax))| TaxBreakdown {
            rate: TaxRate::from_bps(bps),
            taxable,
            tax: tax.round_to_cents(),
        })
        .collect()
}

fn payment_breakdown(transactions: &[&Transaction]) -> Vec<PaymentBreakdown> {
    [PaymentMethod::Cash, PaymentMethod::Card, PaymentMethod::Upi]
        .into_iter()
        .map(|method| {
            let matching = transactions.iter().filter(|t| t.payment_method == method);
            PaymentBreakdown {
                method,
                orders: matching.clone().count(),
                revenue: matching.map(|t| t.total).sum(),
            }
        })
        .collect()
}

fn category_breakdown(transactions: &[&Transaction]) -> Vec<CategoryBreakdown> {
    let mut by_category: BTreeMap<&str, (PreciseMoney, Money)> = BTreeMap::new();
    for line in transactions.iter().flat_map(|t| &t.items) {
        let entry = by_category.entry(line.product.category.as_str()).or_default();
        entry.0 += line.total_with_tax;
        entry.1 += line.profit();
    }

    by_category
        .into_iter()
        .map(|(category, (revenue, profit))| CategoryBreakdown {
            category: category.to_string(),
            revenue: revenue.round_to_cents(),
            profit,
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartLine;
    use crate::types::{CustomerRef, Product};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
    }

    fn line(id: &str, category: &str, price_cents: i64, bps: u32, qty: i64) -> CartLine {
        CartLine::new(
            Product {
                id: id.to_string(),
                name: format!("Product {}", id),
                price_cents,
                cost_cents: price_cents / 2,
                stock: 100,
                tax_rate_bps: bps,
                category: category.to_string(),
                barcode: None,
                hsn_code: None,
                is_active: true,
            },
            qty,
        )
        .unwrap()
    }

    fn transaction(
        id: &str,
        created_at: DateTime<Utc>,
        items: Vec<CartLine>,
        method: PaymentMethod,
        customer: Option<&str>,
    ) -> Transaction {
        let subtotal: Money = items.iter().map(|l| l.subtotal).sum();
        let tax: PreciseMoney = items.iter().map(|l| l.tax).sum();
        let total_tax = tax.round_to_cents();
        Transaction {
            id: id.to_string(),
            receipt_number: format!("r-{}", id),
            created_at,
            profit: items.iter().map(CartLine::profit).sum(),
            items,
            subtotal,
            total_tax,
            discount: Money::zero(),
            total: subtotal + total_tax,
            payment_method: method,
            customer: customer.map(|c| CustomerRef {
                id: c.to_string(),
                name: c.to_string(),
            }),
            cashier_id: "u-1".to_string(),
            status: TransactionStatus::Completed,
            refund_amount: Money::zero(),
            refund_date: None,
            refund_reason: None,
            refunded_by: None,
        }
    }

    fn history() -> Vec<Transaction> {
        vec![
            transaction(
                "t1",
                at(1, 9),
                vec![line("a", "Electronics", 1000, 1800, 2)],
                PaymentMethod::Cash,
                Some("c1"),
            ),
            transaction(
                "t2",
                at(9, 10),
                vec![
                    line("a", "Electronics", 1000, 1800, 1),
                    line("b", "Stationery", 500, 1200, 4),
                ],
                PaymentMethod::Card,
                Some("c1"),
            ),
            transaction(
                "t3",
                at(9, 11),
                vec![line("c", "Home & Garden", 2500, 0, 1)],
                PaymentMethod::Upi,
                None,
            ),
        ]
    }

    #[test]
    fn test_period_start() {
        let now = at(9, 15);
        assert_eq!(ReportPeriod::Today.start(now), Some(at(9, 0)));
        assert_eq!(ReportPeriod::Month.start(now), Some(at(1, 0)));
        assert_eq!(ReportPeriod::All.start(now), None);
    }

    #[test]
    fn test_today_report() {
        let report = SalesReport::build(&history(), &[], ReportPeriod::Today, at(9, 15));

        assert_eq!(report.orders, 2);
        // t2: 1180 + 2240, t3: 2500
        assert_eq!(report.revenue, Money::from_cents(5920));
        assert_eq!(report.tax, Money::from_cents(420));
        assert_eq!(report.unique_customers, 1);
        assert_eq!(report.recent_transaction_ids, vec!["t3", "t2"]);
    }

    #[test]
    fn test_all_time_report() {
        let report = SalesReport::build(&history(), &[], ReportPeriod::All, at(9, 15));

        assert_eq!(report.orders, 3);
        assert_eq!(report.revenue, Money::from_cents(8280));
        assert_eq!(report.average_order_value, Money::from_cents(2760));
        assert_eq!(report.cost_of_goods, Money::from_cents(1500 + 1000 + 1250));
        assert_eq!(report.profit, Money::from_cents(3750));
    }

    #[test]
    fn test_top_products_by_revenue() {
        let report = SalesReport::build(&history(), &[], ReportPeriod::All, at(9, 15));

        let ids: Vec<&str> = report
            .top_products
            .iter()
            .map(|p| p.product_id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
        assert_eq!(report.top_products[0].quantity, 3);
        assert_eq!(report.top_products[0].revenue, Money::from_cents(3000));
    }

    #[test]
    fn test_breakdowns() {
        let report = SalesReport::build(&history(), &[], ReportPeriod::All, at(9, 15));

        let rates: Vec<u32> = report.tax_breakdown.iter().map(|t| t.rate.bps()).collect();
        assert_eq!(rates, vec![0, 1200, 1800]);
        assert_eq!(report.tax_breakdown[2].taxable, Money::from_cents(3000));
        assert_eq!(report.tax_breakdown[2].tax, Money::from_cents(540));

        let cash = &report.payment_breakdown[0];
        assert_eq!(cash.method, PaymentMethod::Cash);
        assert_eq!(cash.orders, 1);
        assert_eq!(cash.revenue, Money::from_cents(2360));

        let electronics = report
            .category_breakdown
            .iter()
            .find(|c| c.category == "Electronics")
            .unwrap();
        assert_eq!(electronics.revenue, Money::from_cents(3540));
        assert_eq!(electronics.profit, Money::from_cents(1500));
    }

    #[test]
    fn test_refunds_counted_in_period() {
        let mut transactions = history();
        transactions[1].status = TransactionStatus::PartiallyRefunded;
        transactions[0].status = TransactionStatus::Refunded;

        let refund = |id: &str, day: u32, cents: i64| RefundRecord {
            id: id.to_string(),
            transaction_id: "t".to_string(),
            date: at(day, 12),
            amount: Money::from_cents(cents),
            reason: "Returned".to_string(),
            refunded_by: "u-1".to_string(),
            payment_method: PaymentMethod::Cash,
        };
        let refunds = vec![refund("r1", 2, 2360), refund("r2", 9, 500)];

        let today = SalesReport::build(&transactions, &refunds, ReportPeriod::Today, at(9, 15));
        assert_eq!(today.refunds_total, Money::from_cents(500));
        assert_eq!(today.partially_refunded_orders, 1);
        assert_eq!(today.refunded_orders, 0);

        let month = SalesReport::build(&transactions, &refunds, ReportPeriod::Month, at(9, 15));
        assert_eq!(month.refunds_total, Money::from_cents(2860));
        assert_eq!(month.refunded_orders, 1);
    }

    #[test]
    fn test_empty_report() {
        let report = SalesReport::build(&[], &[], ReportPeriod::Today, at(9, 15));

        assert_eq!(report.orders, 0);
        assert_eq!(report.average_order_value, Money::zero());
        assert_eq!(report.profit_margin(), 0.0);
        assert!(report.top_products.is_empty());
        assert_eq!(report.payment_breakdown.len(), 3);
    }
}
