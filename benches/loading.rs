use std::hint::black_box;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use criterion::{Criterion, criterion_group, criterion_main};
use table_loader::ingestion::sniffer::sniff_delimiter;
use table_loader::ingestion::{LoadOptions, load_from_path};
use table_loader::processing::{describe, normalize};
use table_loader::types::{Schema, Table, Value};

const ROWS: usize = 10_000;

fn tmp_csv() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("table-loader-bench-{nanos}.csv"))
}

fn write_csv(path: &PathBuf) {
    let mut text = String::from("id,name,score,flag\n");
    for i in 0..ROWS {
        let score = if i % 97 == 0 {
            "NA".to_string()
        } else {
            format!("{}.5", i % 100)
        };
        text.push_str(&format!("{i},name{i},{score},{}\n", i % 2 == 0));
    }
    std::fs::write(path, text).unwrap();
}

fn raw_table() -> Table {
    let rows = (0..ROWS)
        .map(|i| {
            vec![
                Value::Utf8(i.to_string()),
                Value::Utf8(format!("{}.25", i % 50)),
                Value::Utf8(if i % 10 == 0 { "n/a".into() } else { i.to_string() }),
            ]
        })
        .collect();
    Table::new(Schema::utf8(["id", "score", "mixed"]), rows)
}

fn bench_loading(c: &mut Criterion) {
    let path = tmp_csv();
    write_csv(&path);
    let opts = LoadOptions::default();

    c.bench_function("load_csv_10k", |b| {
        b.iter(|| load_from_path(black_box(&path), &opts).unwrap())
    });

    let _ = std::fs::remove_file(&path);
}

fn bench_processing(c: &mut Criterion) {
    let raw = raw_table();
    c.bench_function("normalize_10k", |b| b.iter(|| normalize(black_box(&raw))));

    let typed = normalize(&raw);
    c.bench_function("describe_10k", |b| b.iter(|| describe(black_box(&typed))));

    let header = "subject id;visit;arm;value;unit;flag;comment\n";
    c.bench_function("sniff_header", |b| {
        b.iter(|| sniff_delimiter(black_box(header)))
    });
}

criterion_group!(benches, bench_loading, bench_processing);
criterion_main!(benches);
