//! Benchmarks for the Hospimap cleaning pipeline and queries
//!
//! Run with: cargo bench

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use hospimap::dataset::{transform, Dataset, Metric};
use hospimap::loader::{read_records, Boundaries, RawData};
use hospimap::query::{MapQuery, TrendQuery};

const DEPARTMENTS: usize = 95;

fn department_code(i: usize) -> String {
    format!("{:02}", i + 1)
}

fn create_geojson() -> String {
    let features: Vec<String> = (0..DEPARTMENTS)
        .map(|i| {
            format!(
                r#"{{"type":"Feature","properties":{{"code":"{}","nom":"Departement {}"}},"geometry":null}}"#,
                department_code(i),
                i + 1
            )
        })
        .collect();
    format!(
        r#"{{"type":"FeatureCollection","features":[{}]}}"#,
        features.join(",")
    )
}

/// Feed with every department and sex for `days` consecutive days
fn create_feed(days: usize) -> String {
    let start = NaiveDate::from_ymd_opt(2020, 3, 18).unwrap();
    let mut feed = String::from("dep;sexe;jour;hosp;rea;rad;dc\n");

    for d in 0..days {
        let day = start + Duration::days(d as i64);
        for i in 0..DEPARTMENTS {
            let male = (d * 3 + i) as u64;
            let female = (d * 2 + i) as u64;
            for (sex, v) in [(0, male + female), (1, male), (2, female)] {
                feed.push_str(&format!(
                    "{};{};{};{};{};{};{}\n",
                    department_code(i),
                    sex,
                    day.format("%Y-%m-%d"),
                    v,
                    v / 4,
                    v * 2,
                    v / 10
                ));
            }
        }
        // Overseas rows are filtered out by the pipeline
        feed.push_str(&format!("971;0;{};5;1;3;0\n", day.format("%Y-%m-%d")));
    }

    feed
}

fn create_dataset(days: usize) -> Dataset {
    let raw = RawData {
        records: read_records(create_feed(days).as_bytes()).unwrap(),
        boundaries: Boundaries::from_slice(create_geojson().as_bytes()).unwrap(),
    };
    Dataset::build(raw).unwrap()
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let boundaries = Boundaries::from_slice(create_geojson().as_bytes()).unwrap();

    for days in [30, 365] {
        let feed = create_feed(days);
        let rows = read_records(feed.as_bytes()).unwrap();

        group.throughput(Throughput::Elements(rows.len() as u64));

        group.bench_function(format!("read_csv_{}_days", days), |b| {
            b.iter(|| read_records(black_box(feed.as_bytes())).unwrap())
        });

        group.bench_function(format!("transform_{}_days", days), |b| {
            b.iter(|| transform(black_box(rows.clone()), &boundaries).unwrap())
        });
    }

    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");
    let dataset = create_dataset(365);

    group.bench_function("map_last_day", |b| {
        let query = MapQuery::new(Metric::Deaths, dataset.last_day());
        b.iter(|| query.execute(black_box(&dataset)).unwrap())
    });

    group.bench_function("trend_national", |b| {
        let query = TrendQuery::national(Metric::Hospitalised);
        b.iter(|| query.execute(black_box(&dataset)).unwrap())
    });

    group.bench_function("trend_department", |b| {
        let query = TrendQuery::department(Metric::IntensiveCare, "75");
        b.iter(|| query.execute(black_box(&dataset)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_pipeline, bench_queries);
criterion_main!(benches);
