//! Report builder
//!
//! Reconciles one outlet's values across the four source collections into
//! per-day records with derived financial fields, then summarizes. Every
//! call re-fetches and recomputes; there is no caching at this layer.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::time::Instant;

use shared::util::round2;
use shared::{ReconciledDay, ReportResponse, SourceCounts, SourceDoc};

use super::date_key::date_key;
use super::source::{Source, SourceFetcher};
use crate::utils::{AppError, AppResult};

/// Substitute bounds for a half-open date-range request.
const RANGE_MIN: (i32, u32, u32) = (2000, 1, 1);
const RANGE_MAX: (i32, u32, u32) = (2100, 12, 31);

/// Per-day accumulator: the reconciled record plus the parsed calendar
/// day used for sorting and range filtering.
struct DayAcc {
    day: Option<NaiveDate>,
    rec: ReconciledDay,
}

/// The base fields a source document contributes to.
#[derive(Clone, Copy)]
enum Field {
    SalesQty,
    DigitalPay,
    CashPay,
}

/// Build the reconciled report for one outlet.
///
/// `date_from` / `date_to` are inclusive calendar-day bounds, each applied
/// independently. Validation happens before any fetch is issued.
pub async fn build_report(
    fetcher: &dyn SourceFetcher,
    outlet_id: &str,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
    sample_limit: usize,
) -> AppResult<ReportResponse> {
    let outlet_id = outlet_id.trim();
    if outlet_id.is_empty() {
        return Err(AppError::validation("Outlet ID is required"));
    }

    let started = Instant::now();

    let (sales, digital, cash, rates) = tokio::try_join!(
        fetcher.fetch_recent(Source::DailySales, sample_limit),
        fetcher.fetch_recent(Source::DigitalPayments, sample_limit),
        fetcher.fetch_recent(Source::CashPayments, sample_limit),
        fetcher.fetch_recent(Source::NeccRate, sample_limit),
    )
    .map_err(|e| AppError::source_fetch(e.to_string()))?;

    let records_scanned = SourceCounts {
        sales: sales.len(),
        digital_payments: digital.len(),
        cash_payments: cash.len(),
        necc_rate: rates.len(),
    };

    let mut days: HashMap<String, DayAcc> = HashMap::new();

    // Additive passes: documents sharing a date key combine by summing,
    // never by overwriting.
    accumulate(&mut days, &sales, outlet_id, Field::SalesQty);
    accumulate(&mut days, &digital, outlet_id, Field::DigitalPay);
    accumulate(&mut days, &cash, outlet_id, Field::CashPay);

    // Rates attach to already-known days only; a rate for a day no sales
    // or payment record touched is dropped. A per-outlet rate wins over a
    // flat one, and rates set rather than add.
    for doc in &rates {
        let (key, _) = date_key(doc.date.as_deref());
        let Some(acc) = days.get_mut(&key) else {
            continue;
        };
        if let Some(rate) = doc.outlet_value(outlet_id) {
            acc.rec.necc_rate = rate;
        } else if let Some(rate) = doc.rate {
            acc.rec.necc_rate = rate;
        }
    }

    for acc in days.values_mut() {
        // Back-fill heuristic: with sales but no explicit rate, infer one
        // from collections. Not a source of truth - the inferred rate is
        // only as good as the assumption that the day was fully paid.
        let rec = &mut acc.rec;
        if rec.necc_rate == 0.0 && rec.sales_qty > 0.0 {
            let collected = rec.digital_pay + rec.cash_pay;
            if collected > 0.0 {
                rec.necc_rate = round2(collected / rec.sales_qty);
            }
        }
        rec.finalize();
    }

    let mut rows: Vec<DayAcc> = days.into_values().collect();
    // Most recent first; rows without a parseable day sort last, ordered
    // by key for determinism.
    rows.sort_by(|a, b| match (a.day, b.day) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.rec.date.cmp(&b.rec.date),
    });

    if date_from.is_some() || date_to.is_some() {
        let from = date_from.unwrap_or_else(|| ymd(RANGE_MIN));
        let to = date_to.unwrap_or_else(|| ymd(RANGE_MAX));
        rows.retain(|acc| acc.day.is_some_and(|d| d >= from && d <= to));
    }

    let transactions: Vec<ReconciledDay> = rows.into_iter().map(|acc| acc.rec).collect();

    let total_sales_quantity = round2(transactions.iter().map(|t| t.sales_qty).sum());
    let total_amount = round2(transactions.iter().map(|t| t.total_amount).sum());
    let total_difference = round2(transactions.iter().map(|t| t.difference).sum());
    let average_necc_rate = if transactions.is_empty() {
        0.0
    } else {
        round2(transactions.iter().map(|t| t.necc_rate).sum::<f64>() / transactions.len() as f64)
    };

    let elapsed_ms = started.elapsed().as_millis() as u64;
    tracing::debug!(
        outlet = outlet_id,
        days = transactions.len(),
        elapsed_ms,
        "Report built"
    );

    Ok(ReportResponse {
        outlet_id: outlet_id.to_string(),
        total_sales_quantity,
        average_necc_rate,
        total_amount,
        total_difference,
        transactions,
        records_scanned,
        elapsed_ms,
    })
}

fn ymd((y, m, d): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("static bound is a valid date")
}

fn accumulate(days: &mut HashMap<String, DayAcc>, docs: &[SourceDoc], outlet: &str, field: Field) {
    for doc in docs {
        // Presence, not truthiness: an explicit zero is a recorded value.
        let Some(value) = doc.outlet_value(outlet) else {
            continue;
        };
        let (key, day) = date_key(doc.date.as_deref());
        let acc = days.entry(key.clone()).or_insert_with(|| DayAcc {
            day,
            rec: ReconciledDay {
                date: key,
                ..ReconciledDay::default()
            },
        });
        match field {
            Field::SalesQty => acc.rec.sales_qty += value,
            Field::DigitalPay => acc.rec.digital_pay += value,
            Field::CashPay => acc.rec.cash_pay += value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::source::FetchError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MapFetcher {
        docs: HashMap<&'static str, Vec<SourceDoc>>,
        fetches: AtomicUsize,
    }

    impl MapFetcher {
        fn new() -> Self {
            Self {
                docs: HashMap::new(),
                fetches: AtomicUsize::new(0),
            }
        }

        fn with(mut self, source: Source, docs: Vec<SourceDoc>) -> Self {
            self.docs.insert(source.table(), docs);
            self
        }

        fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SourceFetcher for MapFetcher {
        async fn fetch_recent(
            &self,
            source: Source,
            _limit: usize,
        ) -> Result<Vec<SourceDoc>, FetchError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.docs.get(source.table()).cloned().unwrap_or_default())
        }
    }

    fn doc(date: &str, outlets: &[(&str, f64)]) -> SourceDoc {
        SourceDoc {
            date: Some(date.to_string()),
            outlets: Some(
                outlets
                    .iter()
                    .map(|(k, v)| (k.to_string(), *v))
                    .collect(),
            ),
            rate: None,
            created_at: Some(1),
        }
    }

    fn flat_rate_doc(date: &str, rate: f64) -> SourceDoc {
        SourceDoc {
            date: Some(date.to_string()),
            outlets: None,
            rate: Some(rate),
            created_at: Some(1),
        }
    }

    async fn build(fetcher: &MapFetcher, outlet: &str) -> ReportResponse {
        build_report(fetcher, outlet, None, None, 100).await.unwrap()
    }

    fn assert_invariants(rec: &ReconciledDay) {
        assert_eq!(rec.total_amount, round2(rec.sales_qty * rec.necc_rate));
        assert_eq!(rec.total_recv, round2(rec.digital_pay + rec.cash_pay));
        assert_eq!(rec.difference, round2(rec.total_recv - rec.total_amount));
    }

    #[tokio::test]
    async fn reconciles_all_four_sources_for_one_day() {
        let fetcher = MapFetcher::new()
            .with(Source::DailySales, vec![doc("2026-01-03", &[("A", 100.0)])])
            .with(Source::NeccRate, vec![doc("2026-01-03", &[("A", 5.0)])])
            .with(Source::DigitalPayments, vec![doc("2026-01-03", &[("A", 300.0)])])
            .with(Source::CashPayments, vec![doc("2026-01-03", &[("A", 250.0)])]);

        let report = build(&fetcher, "A").await;
        assert_eq!(report.transactions.len(), 1);
        let rec = &report.transactions[0];
        assert_eq!(rec.date, "Jan 03, 2026");
        assert_eq!(rec.sales_qty, 100.0);
        assert_eq!(rec.necc_rate, 5.0);
        assert_eq!(rec.total_amount, 500.0);
        assert_eq!(rec.digital_pay, 300.0);
        assert_eq!(rec.cash_pay, 250.0);
        assert_eq!(rec.total_recv, 550.0);
        assert_eq!(rec.difference, 50.0);
        assert_invariants(rec);
    }

    #[tokio::test]
    async fn missing_rate_is_back_filled_from_collections() {
        let fetcher = MapFetcher::new()
            .with(Source::DailySales, vec![doc("2026-01-03", &[("A", 100.0)])])
            .with(Source::DigitalPayments, vec![doc("2026-01-03", &[("A", 300.0)])])
            .with(Source::CashPayments, vec![doc("2026-01-03", &[("A", 250.0)])]);

        let report = build(&fetcher, "A").await;
        let rec = &report.transactions[0];
        assert_eq!(rec.necc_rate, 5.5);
        assert_eq!(rec.total_amount, 550.0);
        assert_eq!(rec.difference, 0.0);
        assert_invariants(rec);
    }

    #[tokio::test]
    async fn missing_outlet_id_fails_before_any_fetch() {
        let fetcher = MapFetcher::new();
        let err = build_report(&fetcher, "  ", None, None, 100)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(fetcher.fetch_count(), 0);
    }

    #[tokio::test]
    async fn docs_sharing_a_day_combine_additively() {
        let fetcher = MapFetcher::new().with(
            Source::DailySales,
            vec![
                doc("2026-01-03", &[("A", 40.0)]),
                doc("2026-01-03", &[("A", 60.0)]),
            ],
        );

        let report = build(&fetcher, "A").await;
        assert_eq!(report.transactions.len(), 1);
        assert_eq!(report.transactions[0].sales_qty, 100.0);
    }

    #[tokio::test]
    async fn different_spellings_of_one_day_join() {
        let fetcher = MapFetcher::new()
            .with(Source::DailySales, vec![doc("2026-01-03", &[("A", 100.0)])])
            .with(
                Source::DigitalPayments,
                vec![doc("2026-01-03T10:30:00+00:00", &[("A", 300.0)])],
            );

        let report = build(&fetcher, "A").await;
        assert_eq!(report.transactions.len(), 1);
        let rec = &report.transactions[0];
        assert_eq!(rec.sales_qty, 100.0);
        assert_eq!(rec.digital_pay, 300.0);
    }

    #[tokio::test]
    async fn explicit_per_outlet_rate_overrides_back_fill() {
        // Collections imply 5.5, the rate document says 6. The explicit
        // rate must win no matter what.
        let fetcher = MapFetcher::new()
            .with(Source::DailySales, vec![doc("2026-01-03", &[("A", 100.0)])])
            .with(Source::DigitalPayments, vec![doc("2026-01-03", &[("A", 550.0)])])
            .with(Source::NeccRate, vec![doc("2026-01-03", &[("A", 6.0)])]);

        let report = build(&fetcher, "A").await;
        let rec = &report.transactions[0];
        assert_eq!(rec.necc_rate, 6.0);
        assert_eq!(rec.total_amount, 600.0);
        assert_eq!(rec.difference, -50.0);
        assert_invariants(rec);
    }

    #[tokio::test]
    async fn per_outlet_rate_wins_over_flat_rate() {
        let fetcher = MapFetcher::new()
            .with(Source::DailySales, vec![doc("2026-01-03", &[("A", 10.0)])])
            .with(Source::NeccRate, vec![SourceDoc {
                date: Some("2026-01-03".to_string()),
                outlets: Some([("A".to_string(), 6.0)].into_iter().collect()),
                rate: Some(4.0),
                created_at: Some(1),
            }]);

        let report = build(&fetcher, "A").await;
        assert_eq!(report.transactions[0].necc_rate, 6.0);
    }

    #[tokio::test]
    async fn flat_rate_applies_when_no_per_outlet_value() {
        let fetcher = MapFetcher::new()
            .with(Source::DailySales, vec![doc("2026-01-03", &[("A", 10.0)])])
            .with(Source::NeccRate, vec![flat_rate_doc("2026-01-03", 4.5)]);

        let report = build(&fetcher, "A").await;
        assert_eq!(report.transactions[0].necc_rate, 4.5);
        assert_eq!(report.transactions[0].total_amount, 45.0);
    }

    #[tokio::test]
    async fn rate_for_untouched_day_is_dropped() {
        let fetcher = MapFetcher::new()
            .with(Source::DailySales, vec![doc("2026-01-03", &[("A", 10.0)])])
            .with(Source::NeccRate, vec![flat_rate_doc("2026-01-04", 4.5)]);

        let report = build(&fetcher, "A").await;
        assert_eq!(report.transactions.len(), 1);
        assert_eq!(report.transactions[0].necc_rate, 0.0);
    }

    #[tokio::test]
    async fn explicit_zero_counts_as_presence() {
        let fetcher = MapFetcher::new()
            .with(Source::DailySales, vec![doc("2026-01-03", &[("A", 0.0)])]);

        let report = build(&fetcher, "A").await;
        assert_eq!(report.transactions.len(), 1);
        assert_eq!(report.transactions[0].sales_qty, 0.0);
        // zero sales, zero collections: the back-fill must not divide
        assert_eq!(report.transactions[0].necc_rate, 0.0);
    }

    #[tokio::test]
    async fn other_outlets_do_not_leak_in() {
        let fetcher = MapFetcher::new().with(
            Source::DailySales,
            vec![doc("2026-01-03", &[("A", 40.0), ("B", 999.0)])],
        );

        let report = build(&fetcher, "A").await;
        assert_eq!(report.transactions[0].sales_qty, 40.0);
    }

    #[tokio::test]
    async fn sorts_most_recent_first_with_dateless_rows_last() {
        let fetcher = MapFetcher::new().with(
            Source::DailySales,
            vec![
                doc("2026-01-01", &[("A", 1.0)]),
                doc("2026-01-05", &[("A", 2.0)]),
                SourceDoc {
                    date: None,
                    outlets: Some([("A".to_string(), 3.0)].into_iter().collect()),
                    rate: None,
                    created_at: Some(1),
                },
                doc("2026-01-03", &[("A", 4.0)]),
            ],
        );

        let report = build(&fetcher, "A").await;
        let dates: Vec<&str> = report.transactions.iter().map(|t| t.date.as_str()).collect();
        assert_eq!(
            dates,
            vec!["Jan 05, 2026", "Jan 03, 2026", "Jan 01, 2026", "Unknown Date"]
        );
    }

    #[tokio::test]
    async fn range_bounds_are_inclusive() {
        let fetcher = MapFetcher::new().with(
            Source::DailySales,
            vec![
                doc("2026-01-01", &[("A", 1.0)]),
                doc("2026-01-03", &[("A", 2.0)]),
                doc("2026-01-05", &[("A", 3.0)]),
            ],
        );

        let from = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2026, 1, 3).unwrap();
        let report = build_report(&fetcher, "A", Some(from), Some(to), 100)
            .await
            .unwrap();

        let dates: Vec<&str> = report.transactions.iter().map(|t| t.date.as_str()).collect();
        assert_eq!(dates, vec!["Jan 03, 2026", "Jan 01, 2026"]);
    }

    #[tokio::test]
    async fn bounds_apply_independently() {
        let fetcher = MapFetcher::new().with(
            Source::DailySales,
            vec![
                doc("2026-01-01", &[("A", 1.0)]),
                doc("2026-01-05", &[("A", 3.0)]),
            ],
        );

        let from = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        let report = build_report(&fetcher, "A", Some(from), None, 100)
            .await
            .unwrap();
        assert_eq!(report.transactions.len(), 1);
        assert_eq!(report.transactions[0].date, "Jan 05, 2026");

        let to = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        let report = build_report(&fetcher, "A", None, Some(to), 100)
            .await
            .unwrap();
        assert_eq!(report.transactions.len(), 1);
        assert_eq!(report.transactions[0].date, "Jan 01, 2026");
    }

    #[tokio::test]
    async fn dateless_rows_are_excluded_when_filtering() {
        let fetcher = MapFetcher::new().with(
            Source::DailySales,
            vec![
                doc("2026-01-03", &[("A", 2.0)]),
                SourceDoc {
                    date: Some("not a date".to_string()),
                    outlets: Some([("A".to_string(), 9.0)].into_iter().collect()),
                    rate: None,
                    created_at: Some(1),
                },
            ],
        );

        let from = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let report = build_report(&fetcher, "A", Some(from), None, 100)
            .await
            .unwrap();
        assert_eq!(report.transactions.len(), 1);
        assert_eq!(report.transactions[0].date, "Jan 03, 2026");
    }

    #[tokio::test]
    async fn summary_totals_and_average() {
        let fetcher = MapFetcher::new()
            .with(
                Source::DailySales,
                vec![
                    doc("2026-01-03", &[("A", 100.0)]),
                    doc("2026-01-04", &[("A", 50.0)]),
                ],
            )
            .with(
                Source::NeccRate,
                vec![
                    doc("2026-01-03", &[("A", 5.0)]),
                    doc("2026-01-04", &[("A", 6.0)]),
                ],
            )
            .with(
                Source::CashPayments,
                vec![doc("2026-01-03", &[("A", 520.0)])],
            );

        let report = build(&fetcher, "A").await;
        assert_eq!(report.total_sales_quantity, 150.0);
        assert_eq!(report.average_necc_rate, 5.5);
        // 100*5 + 50*6
        assert_eq!(report.total_amount, 800.0);
        // (520 - 500) + (0 - 300)
        assert_eq!(report.total_difference, -280.0);
        assert_eq!(report.records_scanned.sales, 2);
    }

    #[tokio::test]
    async fn empty_report_has_zero_summary() {
        let fetcher = MapFetcher::new();
        let report = build(&fetcher, "A").await;
        assert!(report.transactions.is_empty());
        assert_eq!(report.total_sales_quantity, 0.0);
        assert_eq!(report.average_necc_rate, 0.0);
        assert_eq!(report.total_amount, 0.0);
        assert_eq!(report.total_difference, 0.0);
    }

    #[tokio::test]
    async fn identical_inputs_build_identical_reports() {
        let fetcher = MapFetcher::new()
            .with(
                Source::DailySales,
                vec![
                    doc("2026-01-03", &[("A", 100.0)]),
                    doc("2026-01-01", &[("A", 25.0)]),
                ],
            )
            .with(Source::NeccRate, vec![flat_rate_doc("2026-01-03", 5.0)])
            .with(Source::DigitalPayments, vec![doc("2026-01-03", &[("A", 300.0)])]);

        let first = build(&fetcher, "A").await;
        let second = build(&fetcher, "A").await;
        assert_eq!(first.transactions, second.transactions);
        assert_eq!(first.total_amount, second.total_amount);
        assert_eq!(first.average_necc_rate, second.average_necc_rate);
    }
}
