use pricingengine::{
    CSV_COLUMNS, EngineConfig, FixedSeeding, HeuristicPricing, MarketSnapshot, Merchant,
    Orchestrator, PriceStatus, PriceTable, PricingError, PricingFunction, PricingOutcome, Product,
};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[cfg(test)]
mod integration_tests {
    use super::*;

    fn quiet_config() -> EngineConfig {
        EngineConfig::default().with_latency(0, 0)
    }

    fn engine_with_seed(seed: f64) -> Orchestrator {
        Orchestrator::builder(quiet_config())
            .seeding(FixedSeeding(seed))
            .log_writer(std::io::sink())
            .build()
            .unwrap()
    }

    fn markup() -> Arc<dyn PricingFunction> {
        Arc::new(
            |product: &Product, _: &MarketSnapshot| -> Result<PricingOutcome, PricingError> {
                Ok(PricingOutcome::new(
                    product.base_price * 1.1,
                    product.base_price,
                    "markup 10%",
                ))
            },
        )
    }

    fn reject(bad_product: &'static str) -> Arc<dyn PricingFunction> {
        Arc::new(
            move |product: &Product, _: &MarketSnapshot| -> Result<PricingOutcome, PricingError> {
                if product.id == bad_product {
                    Err(PricingError::PricingFailed {
                        product: product.id.clone(),
                        message: "rejected".to_string(),
                    })
                } else {
                    Ok(PricingOutcome::new(
                        product.base_price * 1.1,
                        product.base_price,
                        "markup 10%",
                    ))
                }
            },
        )
    }

    #[test]
    fn test_two_merchants_share_one_product() {
        let engine = engine_with_seed(100.0);
        engine
            .start_fixed(
                vec![Merchant::new("A", ["P1"]), Merchant::new("B", ["P1"])],
                markup(),
            )
            .unwrap();
        engine.wait_all();

        let price = engine.snapshot()["P1"];
        assert!(
            (price - 110.0).abs() < 1e-9 || (price - 121.0).abs() < 1e-9,
            "unexpected final price {price}"
        );

        let records = engine.ledger().records_for("P1");
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.status == PriceStatus::Success));

        let report = engine.statistics();
        assert_eq!(report.total_tasks, 2);
        assert_eq!(report.successful, 2);
        assert_eq!(report.failed, 0);
    }

    #[test]
    fn test_pool_ledger_has_one_record_per_task() {
        let engine = engine_with_seed(50.0);
        engine.start_pool(4, markup()).unwrap();

        for i in 0..200 {
            engine.submit("pool", &format!("P{}", i % 10));
        }
        engine.request_stop();
        engine.wait_all();

        assert_eq!(engine.ledger().len(), 200);
        assert_eq!(engine.pending_tasks(), 0);
        let report = engine.statistics();
        assert_eq!(report.total_tasks, 200);
        assert_eq!(report.unique_products, 10);
        assert!(report.is_consistent());
    }

    #[test]
    fn test_fixed_ledger_has_one_record_per_task() {
        let engine = engine_with_seed(50.0);
        let merchants = (0..8)
            .map(|m| Merchant::new(format!("M{m}"), (0..25).map(|p| format!("P{}", p % 7))))
            .collect();
        engine.start_fixed(merchants, markup()).unwrap();
        engine.wait_all();

        assert_eq!(engine.ledger().len(), 200);
        assert_eq!(engine.statistics().total_tasks, 200);
        assert_eq!(engine.price_table().size(), 7);
    }

    #[test]
    fn test_failures_never_touch_the_table() {
        let engine = engine_with_seed(100.0);
        engine
            .start_fixed(
                vec![
                    Merchant::new("A", ["BAD", "P1", "BAD"]),
                    Merchant::new("B", ["P2", "BAD"]),
                ],
                reject("BAD"),
            )
            .unwrap();
        engine.wait_all();

        let snapshot = engine.snapshot();
        assert!(!snapshot.contains_key("BAD"));
        assert_eq!(snapshot.len(), 2);

        let report = engine.statistics();
        assert_eq!(report.total_tasks, 5);
        assert_eq!(report.successful, 2);
        assert_eq!(report.failed, 3);

        for record in engine.ledger().records_for("BAD") {
            assert_eq!(record.status, PriceStatus::Failed);
            assert_eq!(record.adjusted_price, record.original_price);
        }
    }

    #[test]
    fn test_many_merchants_with_heuristic_pricing() {
        let engine = Orchestrator::builder(quiet_config())
            .log_writer(std::io::sink())
            .build()
            .unwrap();
        let catalog = ["iPhone-15-Pro", "MacBook-Pro-14", "RTX-4090", "Galaxy-S24"];
        let merchants = (0..50)
            .map(|m| {
                Merchant::new(
                    format!("shop-{m}"),
                    (0..10).map(|p| catalog[(m + p) % catalog.len()]),
                )
            })
            .collect();

        engine
            .start_fixed(merchants, Arc::new(HeuristicPricing::new()))
            .unwrap();
        engine.wait_all();

        let report = engine.statistics();
        assert_eq!(report.total_tasks, 500);
        assert_eq!(report.successful + report.failed, 500);
        assert_eq!(engine.ledger().len(), 500);
        assert!(engine.snapshot().values().all(|price| *price > 0.0));
    }

    #[test]
    fn test_request_stop_ends_fixed_mode_early() {
        let engine = Orchestrator::builder(EngineConfig::default().with_latency(10, 10))
            .seeding(FixedSeeding(10.0))
            .log_writer(std::io::sink())
            .build()
            .unwrap();
        let products: Vec<String> = (0..500).map(|p| format!("P{p}")).collect();
        engine
            .start_fixed(vec![Merchant::new("slow", products)], markup())
            .unwrap();

        thread::sleep(Duration::from_millis(50));
        engine.request_stop();
        engine.wait_all();

        let report = engine.statistics();
        assert!(report.total_tasks < 500);
        assert_eq!(engine.ledger().len() as u64, report.total_tasks);
        assert!(report.is_consistent());
    }

    #[test]
    fn test_queued_work_survives_stop() {
        let engine = engine_with_seed(10.0);
        for i in 0..30 {
            engine.submit("late", &format!("P{}", i % 3));
        }
        engine.request_stop();
        engine.start_pool(3, markup()).unwrap();
        engine.request_stop();
        engine.wait_all();

        assert_eq!(engine.statistics().total_tasks, 30);
    }

    #[test]
    fn test_export_price_trend_writes_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("price_trend.csv");

        let engine = engine_with_seed(100.0);
        engine
            .start_fixed(vec![Merchant::new("A", ["P1", "P2", "P1"])], markup())
            .unwrap();
        engine.wait_all();

        assert_eq!(engine.export_price_trend(&path).unwrap(), 3);
        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], CSV_COLUMNS.join(","));
        assert!(lines[1].contains(",A,P1,100.00,110.00,10.00%,"));
        assert!(lines[1].ends_with(",SUCCESS"));
        assert!(lines[3].contains(",A,P1,110.00,121.00,10.00%,"));
    }

    #[test]
    fn test_history_export_survives_separators_in_names() {
        let engine = engine_with_seed(100.0);
        engine
            .start_fixed(vec![Merchant::new("Acme, Inc.", ["P1"])], markup())
            .unwrap();
        engine.wait_all();

        let mut out = Vec::new();
        assert_eq!(engine.export_history_to(&mut out).unwrap(), 1);

        let mut reader = csv::Reader::from_reader(out.as_slice());
        let rows: Vec<csv::StringRecord> = reader.records().map(|row| row.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), CSV_COLUMNS.len());
        assert_eq!(&rows[0][1], "Acme, Inc.");
        assert_eq!(&rows[0][3], "100.00");
        assert_eq!(&rows[0][4], "110.00");
        assert_eq!(&rows[0][7], "SUCCESS");
    }

    #[test]
    fn test_log_file_is_drained_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pricing.log");

        {
            let engine = Orchestrator::builder(quiet_config().with_log_path(&path))
                .seeding(FixedSeeding(100.0))
                .build()
                .unwrap();
            assert!(!engine.log_degraded());
            engine.start_pool(2, markup()).unwrap();
            for i in 0..40 {
                engine.submit("M", &format!("P{}", i % 4));
            }
            // dropped without an explicit stop or join
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.first(), Some(&"=== Pricing System Started ==="));
        assert_eq!(lines.iter().filter(|line| line.contains(" -> ")).count(), 40);
        assert!(lines.last().unwrap().starts_with("=== Pricing System Stopped ==="));
    }

    #[test]
    fn test_snapshot_json_restores_table() {
        let engine = engine_with_seed(100.0);
        engine
            .start_fixed(vec![Merchant::new("A", ["P1", "P2"])], markup())
            .unwrap();
        engine.wait_all();

        let restored = PriceTable::from_snapshot_json(&engine.snapshot_json().unwrap()).unwrap();
        assert_eq!(restored.snapshot(), engine.snapshot());
    }

    #[test]
    fn test_observers_run_alongside_units() {
        let engine = Arc::new(engine_with_seed(100.0));
        engine.start_pool(2, markup()).unwrap();

        let observer = {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for _ in 0..50 {
                    let report = engine.statistics();
                    assert!(report.successful + report.failed <= report.total_tasks);
                    let _ = engine.snapshot();
                }
            })
        };

        for i in 0..100 {
            engine.submit("M", &format!("P{}", i % 5));
        }
        observer.join().unwrap();
        engine.request_stop();
        engine.wait_all();
        assert_eq!(engine.statistics().total_tasks, 100);
    }
}
