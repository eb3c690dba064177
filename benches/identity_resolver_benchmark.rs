//! Identity resolution and ledger merge throughput
//!
//! - resolution: one listing per storefront layout
//! - upsert: a day's observations merged into a 200-row ledger

use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use price_tracker_lib::domain::{Ledger, PriceObservation, PriceStatus, ScrapedListing, Store};
use price_tracker_lib::infrastructure::resolve_listing;

fn sample_listings() -> Vec<ScrapedListing> {
    vec![
        ScrapedListing::new(
            Store::Amazon,
            "Apple iPhone 14 Pro (128 GB) - Deep Purple",
            None,
            "https://www.amazon.in/Apple-iPhone-14-Pro-128/dp/B0BDJ",
        ),
        ScrapedListing::new(
            Store::Flipkart,
            "Apple iPhone 15 Plus (Pink, 256 GB)",
            None,
            "https://www.flipkart.com/apple-iphone-15-plus-pink-256-gb/p/itm",
        ),
        ScrapedListing::new(
            Store::Cashify,
            "Apple iPhone iPhone 13 - Refurbished",
            Some("4 GB RAM / 128 GB, Midnight".to_string()),
            "https://www.cashify.in/buy-refurbished-iphone-13",
        ),
        ScrapedListing::new(
            Store::Controlz,
            "",
            None,
            "https://controlz.world/products/iphone-12-mini-blue",
        ),
    ]
}

fn resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_listing");
    for listing in sample_listings() {
        group.bench_with_input(
            BenchmarkId::from_parameter(listing.store),
            &listing,
            |b, listing| b.iter(|| resolve_listing(black_box(listing))),
        );
    }
    group.finish();
}

fn upsert(c: &mut Criterion) {
    let day = |d: u64| {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .and_then(|start| start.checked_add_days(chrono::Days::new(d)))
            .unwrap_or_default()
    };

    let mut ledger = Ledger::new();
    for model in 0..200u64 {
        for d in 0..30 {
            ledger = ledger.upsert(&PriceObservation::new(
                format!("iPhone {} (128GB)", model),
                &PriceStatus::Price((40_000 + model * 10 + d).to_string()),
                Store::Amazon,
                day(d),
            ));
        }
    }
    let grid = ledger.to_grid();
    let observation = PriceObservation::new(
        "Apple iPhone 150 (128GB)",
        &PriceStatus::OutOfStock,
        Store::Amazon,
        day(30),
    );

    c.bench_function("parse_upsert_render_200x30", |b| {
        b.iter(|| {
            Ledger::from_grid(black_box(&grid))
                .upsert(black_box(&observation))
                .to_grid()
        })
    });
}

criterion_group!(benches, resolution, upsert);
criterion_main!(benches);
