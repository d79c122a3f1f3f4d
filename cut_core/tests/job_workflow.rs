//! End-to-end tests for the counter workflow: stock a shop, take orders in
//! both unit systems, persist, reload and keep working.

use cut_core::file_io::{load_shop, save_shop, FileLock};
use cut_core::{
    format_measurement, JobRequest, JobStatus, Material, MaterialType, MeasurementUnit, Shop,
    StockStatus,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use uuid::Uuid;

fn stocked_shop() -> (Shop, Uuid, Uuid) {
    let mut shop = Shop::new("Main St Hardware");
    let pine = shop
        .add_material(
            Material::new("2x4 SPF Stud", MaterialType::Wood, MeasurementUnit::Imperial)
                .with_unit_cost(0.85)
                .with_stock(96.0, 24.0)
                .with_supplier("Northern Lumber"),
        )
        .unwrap();
    let rod = shop
        .add_material(
            Material::new("M10 Threaded Rod", MaterialType::Metal, MeasurementUnit::Metric)
                .with_unit_cost(4.0)
                .with_stock(6.0, 2.0)
                .with_supplier("Fastenal"),
        )
        .unwrap();
    (shop, pine, rod)
}

#[test]
fn orders_in_both_unit_systems() {
    let (mut shop, pine, rod) = stocked_shop();

    let pine_job = shop
        .create_job(&JobRequest::new("Dana Reyes", "2x4 SPF Stud", "7' 6\"", 4))
        .unwrap();
    let rod_job = shop
        .create_job(
            &JobRequest::new("Lee Park", rod.to_string(), "1m 25cm", 2).with_unit(MeasurementUnit::Metric),
        )
        .unwrap();

    assert_eq!(shop.materials[&pine].current_stock, 66.0);
    assert!((shop.materials[&rod].current_stock - 3.5).abs() < 1e-9);

    let job = &shop.jobs[&pine_job];
    assert_eq!(job.length_display(), "7' 6\"");
    assert_eq!(job.measurement_unit, MeasurementUnit::Imperial);
    // 0.85 * 7.5 * 4 = 25.5; labor 1.0; waste 3.825; subtotal 30.325; markup 7.58125
    assert!((job.cost.subtotal - 30.325).abs() < 1e-9);
    assert!((job.total_cost() - 37.90625).abs() < 1e-9);

    let job = &shop.jobs[&rod_job];
    assert_eq!(format_measurement(job.length, job.measurement_unit), "1m 25cm");
}

#[test]
fn imperial_order_against_metric_material() {
    let (shop, _, rod) = stocked_shop();

    let quote = shop
        .quote(&JobRequest::new("Lee Park", rod.to_string(), "10'", 1).with_unit(MeasurementUnit::Imperial))
        .unwrap();

    assert!((quote.length - 3.048).abs() < 1e-9);
    assert_eq!(quote.measurement_unit, MeasurementUnit::Metric);
    assert_eq!(quote.stock.status, StockStatus::Sufficient);
}

#[test]
fn stock_runs_low_then_out() {
    let (mut shop, pine, _) = stocked_shop();

    // 96 - 72 = 24, right at the threshold
    shop.create_job(&JobRequest::new("Dana Reyes", "2x4 SPF Stud", "8'", 9)).unwrap();
    let names: Vec<&str> = shop.materials_needing_reorder().iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["2x4 SPF Stud"]);

    let low = shop.quote(&JobRequest::new("Sam", "2x4 SPF Stud", "8'", 1)).unwrap();
    assert_eq!(low.stock.status, StockStatus::Low);

    let err = shop.create_job(&JobRequest::new("Sam", "2x4 SPF Stud", "8'", 4)).unwrap_err();
    assert_eq!(err.error_code(), "INSUFFICIENT_STOCK");

    shop.restock(&pine, 96.0).unwrap();
    assert!(shop.materials_needing_reorder().is_empty());
}

#[test]
fn persisted_shop_keeps_working() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("main-st.cuts");

    let (mut shop, _, _) = stocked_shop();
    let id = shop.create_job(&JobRequest::new("Dana Reyes", "2x4 SPF Stud", "3'", 2)).unwrap();

    {
        let _lock = FileLock::acquire(&path, "counter-1").unwrap();
        save_shop(&shop, &path).unwrap();
    }

    let mut reloaded = load_shop(&path).unwrap();
    assert_eq!(reloaded.jobs[&id], shop.jobs[&id]);
    assert_eq!(reloaded.materials.len(), 2);

    let code = reloaded.jobs[&id].order_code.clone().unwrap();
    let found = reloaded.find_job(&code).unwrap().id;
    reloaded.set_job_status(&found, JobStatus::Completed).unwrap();
    reloaded.create_job(&JobRequest::new("Sam", "2x4 SPF Stud", "3'", 1)).unwrap();
    save_shop(&reloaded, &path).unwrap();

    let again = load_shop(&path).unwrap();
    assert_eq!(again.jobs.len(), 2);
    assert_eq!(again.jobs_by_status(JobStatus::Completed).len(), 1);
    assert_eq!(again.jobs_by_status(JobStatus::Pending).len(), 1);
}

#[test]
fn second_lock_is_refused() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("main-st.cuts");
    save_shop(&Shop::new("Main St Hardware"), &path).unwrap();

    let _first = FileLock::acquire(&path, "counter-1").unwrap();
    let err = FileLock::acquire(&path, "counter-2").err().unwrap();
    assert_eq!(err.error_code(), "FILE_LOCKED");
    assert!(err.is_recoverable());
}
