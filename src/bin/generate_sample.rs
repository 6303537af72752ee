use std::sync::Arc;

use arrow::array::{BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let n_rows = 500;

    // More than ten cities so the pie chart's top-10 reduction kicks in.
    let cities = [
        "New York", "London", "Paris", "Berlin", "Madrid", "Rome", "Vienna",
        "Lisbon", "Dublin", "Oslo", "Helsinki", "Prague",
    ];
    // (segment, mean age, mean income)
    let segments = [
        ("Retail", 38.0, 42_000.0),
        ("Enterprise", 47.0, 95_000.0),
        ("Startup", 31.0, 58_000.0),
    ];

    let mut ids: Vec<i64> = Vec::with_capacity(n_rows);
    let mut ages: Vec<f64> = Vec::with_capacity(n_rows);
    let mut incomes: Vec<Option<f64>> = Vec::with_capacity(n_rows);
    let mut scores: Vec<f64> = Vec::with_capacity(n_rows);
    let mut city_col: Vec<String> = Vec::with_capacity(n_rows);
    let mut segment_col: Vec<String> = Vec::with_capacity(n_rows);
    let mut subscribed: Vec<bool> = Vec::with_capacity(n_rows);

    for id in 0..n_rows as i64 {
        let &(segment, mean_age, mean_income) = rng.pick(&segments);
        let age = rng.gauss(mean_age, 8.0).clamp(18.0, 80.0).round();
        // Income correlates with age; ~5% of cells are missing.
        let income = if rng.next_f64() < 0.05 {
            None
        } else {
            Some((mean_income + (age - mean_age) * 900.0 + rng.gauss(0.0, 6_000.0)).max(12_000.0))
        };
        let score = rng.gauss(7.0 - (age - 40.0).abs() / 20.0, 1.2).clamp(0.0, 10.0);

        ids.push(id);
        ages.push(age);
        incomes.push(income);
        scores.push(score);
        city_col.push(rng.pick(&cities).to_string());
        segment_col.push(segment.to_string());
        subscribed.push(rng.next_f64() < 0.6);
    }

    write_csv(&ids, &ages, &incomes, &scores, &city_col, &segment_col, &subscribed);
    write_parquet(&ids, &ages, &incomes, &scores, &city_col, &segment_col, &subscribed);

    println!("Wrote {n_rows} rows to sample_data.csv and sample_data.parquet");
}

#[allow(clippy::too_many_arguments)]
fn write_csv(
    ids: &[i64],
    ages: &[f64],
    incomes: &[Option<f64>],
    scores: &[f64],
    cities: &[String],
    segments: &[String],
    subscribed: &[bool],
) {
    let mut writer = csv::Writer::from_path("sample_data.csv").expect("creating CSV file");
    writer
        .write_record([
            "customer_id",
            "age",
            "income",
            "satisfaction",
            "city",
            "segment",
            "subscribed",
        ])
        .expect("writing CSV header");

    for i in 0..ids.len() {
        writer
            .write_record([
                ids[i].to_string(),
                format!("{}", ages[i]),
                incomes[i].map(|v| format!("{v:.0}")).unwrap_or_default(),
                format!("{:.2}", scores[i]),
                cities[i].clone(),
                segments[i].clone(),
                subscribed[i].to_string(),
            ])
            .expect("writing CSV row");
    }
    writer.flush().expect("flushing CSV");
}

#[allow(clippy::too_many_arguments)]
fn write_parquet(
    ids: &[i64],
    ages: &[f64],
    incomes: &[Option<f64>],
    scores: &[f64],
    cities: &[String],
    segments: &[String],
    subscribed: &[bool],
) {
    let schema = Arc::new(Schema::new(vec![
        Field::new("customer_id", DataType::Int64, false),
        Field::new("age", DataType::Float64, false),
        Field::new("income", DataType::Float64, true),
        Field::new("satisfaction", DataType::Float64, false),
        Field::new("city", DataType::Utf8, false),
        Field::new("segment", DataType::Utf8, false),
        Field::new("subscribed", DataType::Boolean, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(ids.to_vec())),
            Arc::new(Float64Array::from(ages.to_vec())),
            Arc::new(Float64Array::from(incomes.to_vec())),
            Arc::new(Float64Array::from(scores.to_vec())),
            Arc::new(StringArray::from(
                cities.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                segments.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(BooleanArray::from(subscribed.to_vec())),
        ],
    )
    .expect("Failed to create RecordBatch");

    let file = std::fs::File::create("sample_data.parquet").expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}
