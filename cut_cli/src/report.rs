//! Terminal output for shop records.

use anyhow::Result;
use serde::Serialize;

use cut_core::format_measurement;
use cut_core::jobs::{CutJob, JobStatus};
use cut_core::materials::Material;
use cut_core::pricing::format_currency;
use cut_core::shop::{JobQuote, ShopSettings};

const RULE: &str = "═══════════════════════════════════════";

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_settings(settings: &ShopSettings) {
    println!("Labor per cut:   {}", format_currency(settings.pricing.labor_rate_per_cut));
    println!("Waste allowance: {}%", settings.pricing.waste_allowance_percent);
    println!("Markup:          {}%", settings.pricing.markup_percent);
    println!("Default unit:    {}", settings.default_unit.display_name());
    println!("Order codes:     {}", if settings.order_codes { "on" } else { "off" });
}

pub fn print_materials(materials: &[&Material]) {
    if materials.is_empty() {
        println!("No materials.");
        return;
    }
    println!(
        "{:<28} {:<6} {:>12} {:>12} {:>12}  {}",
        "NAME", "TYPE", "COST", "STOCK", "REORDER AT", "SUPPLIER"
    );
    for m in materials {
        let flag = if m.needs_reorder() { " [REORDER]" } else { "" };
        println!(
            "{:<28} {:<6} {:>12} {:>12} {:>12}  {}{}",
            m.name,
            m.material_type.display_name(),
            format!("{}/{}", format_currency(m.unit_cost), m.measurement_unit.canonical_symbol()),
            m.stock_display(),
            format_measurement(m.reorder_threshold, m.measurement_unit),
            m.supplier,
            flag
        );
    }
}

pub fn print_reorder(materials: &[&Material]) {
    if materials.is_empty() {
        println!("Nothing to reorder.");
        return;
    }
    println!("{:<28} {:>12} {:>12}  {}", "NAME", "STOCK", "REORDER AT", "SUPPLIER");
    for m in materials {
        println!(
            "{:<28} {:>12} {:>12}  {}",
            m.name,
            m.stock_display(),
            format_measurement(m.reorder_threshold, m.measurement_unit),
            m.supplier
        );
    }
}

pub fn print_quote(quote: &JobQuote, material: &Material) {
    println!("{}", RULE);
    println!("  QUOTE: {}", material.name);
    println!("{}", RULE);
    println!(
        "  {} x {}",
        quote.quantity,
        format_measurement(quote.length, quote.measurement_unit)
    );
    println!(
        "  Stock: [{}] {}",
        quote.stock.status,
        quote.stock.message
    );
    if let Some(left) = quote.stock.remaining() {
        println!("  Left after cut: {}", format_measurement(left, quote.measurement_unit));
    }
    println!();
    for line in quote.cost.to_string().lines() {
        println!("  {}", line);
    }
    println!("{}", RULE);
}

pub fn print_job(job: &CutJob) {
    println!("{}", RULE);
    println!("  ORDER {}  ({})", job.label(), job.status);
    println!("{}", RULE);
    println!("  Customer: {}", job.customer_name);
    println!("  Material: {}", job.material.name);
    println!("  Cut:      {} x {}", job.quantity, job.length_display());
    println!("  Created:  {}", job.created_at.format("%Y-%m-%d %H:%M"));
    if let Some(done) = job.completed_at {
        println!("  Done:     {}", done.format("%Y-%m-%d %H:%M"));
    }
    if let Some(notes) = &job.notes {
        println!("  Notes:    {}", notes);
    }
    println!();
    for line in job.cost.to_string().lines() {
        println!("  {}", line);
    }
    println!("{}", RULE);
}

pub fn print_jobs(jobs: &[&CutJob]) {
    if jobs.is_empty() {
        println!("No jobs.");
        return;
    }
    println!(
        "{:<8} {:<10} {:<20} {:<24} {:>14} {:>10}",
        "ORDER", "STATUS", "CUSTOMER", "MATERIAL", "CUT", "TOTAL"
    );
    for job in jobs {
        println!(
            "{:<8} {:<10} {:<20} {:<24} {:>14} {:>10}",
            job.label(),
            job.status.to_string(),
            job.customer_name,
            job.material.name,
            format!("{} x {}", job.quantity, job.length_display()),
            format_currency(job.total_cost())
        );
    }

    let counts: Vec<String> = JobStatus::ALL
        .iter()
        .map(|status| format!("{} {}", jobs.iter().filter(|j| j.status == *status).count(), status))
        .collect();
    println!();
    println!("{} jobs: {}", jobs.len(), counts.join(", "));
}
