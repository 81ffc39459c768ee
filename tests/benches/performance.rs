use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fake::faker::address::en::StreetName;
use fake::{Fake, Faker};
use feed_core::{
    assemble, filter_listings, parse_monthly_cost, Coordinates, Criteria, Enrichment, Progress,
    RawDetail, RawListing, DEFAULT_SITE_ORIGIN,
};
use rand::Rng;
use std::time::Duration;

const LABELS: [&str; 9] = ["A+++", "A+", "A", "B", "C", "D", "E", "G", "unknown"];

// Helper function to generate fake listings
fn generate_fake_listings(count: usize) -> Vec<RawListing> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| RawListing {
            bedrooms: Some(rng.gen_range(0..6)),
            living_area: Some(rng.gen_range(30.0..200.0)),
            energy_label: Some(LABELS[rng.gen_range(0..LABELS.len())].to_string()),
            price: Some(rng.gen_range(400_000.0..600_000.0)),
            title: Some(StreetName().fake()),
            detail_url: Some(format!("/detail/koop/amsterdam/{}/{}/", Faker.fake::<u32>(), i)),
            ..RawListing::new(i.to_string())
        })
        .collect()
}

fn generate_enrichment(listings: &[RawListing]) -> Enrichment {
    let mut rng = rand::thread_rng();
    let mut enrichment = Enrichment::default();
    for listing in listings {
        if !rng.gen_bool(0.8) {
            continue;
        }
        let coordinates = Coordinates {
            lat: rng.gen_range(52.29..52.43),
            lng: rng.gen_range(4.75..5.02),
        };
        let mut detail = RawDetail {
            latitude: Some(coordinates.lat),
            longitude: Some(coordinates.lng),
            photo_urls: vec!["https://cloud.funda.nl/1.jpg".to_string(); 3],
            ..Default::default()
        };
        detail
            .characteristics
            .insert("Bijdrage VvE".to_string(), "€ 1.800,- per jaar".to_string());
        enrichment.insert(listing.global_id.clone(), coordinates, detail);
    }
    enrichment
}

fn bench_pipeline_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("stages");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(5));

    for size in [100, 1000, 10000].iter() {
        let listings = generate_fake_listings(*size);
        let enrichment = generate_enrichment(&listings);

        group.bench_with_input(BenchmarkId::new("filter", size), &listings, |b, listings| {
            b.iter(|| {
                black_box(filter_listings(
                    listings.clone(),
                    &Criteria::default(),
                    &Progress::silent(),
                ))
            });
        });

        group.bench_with_input(BenchmarkId::new("assemble", size), &listings, |b, listings| {
            b.iter(|| black_box(assemble(listings, &enrichment, DEFAULT_SITE_ORIGIN)));
        });
    }

    group.finish();
}

fn bench_cost_parsing(c: &mut Criterion) {
    let inputs = ["€ 121,00 per maand", "€ 1.800,- per jaar", "€ 1.800 per jaar", "n.v.t."];
    c.bench_function("parse_monthly_cost", |b| {
        b.iter(|| {
            for input in &inputs {
                black_box(parse_monthly_cost(input));
            }
        });
    });
}

criterion_group!(benches, bench_pipeline_stages, bench_cost_parsing);
criterion_main!(benches);
