use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Date32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, Days, NaiveDate};
use parquet::arrow::ArrowWriter;

const REGIONS: [&str; 5] = ["SP", "RJ", "MG", "PR", "BA"];
const STORES: [(&str, f64); 6] = [
    ("Mercado Central", 1.4),
    ("Super Bom Preço", 1.1),
    ("Mercadinho da Praça", 0.6),
    ("Atacadão Norte", 1.8),
    ("Empório Sul", 0.8),
    ("Feira Nova", 1.0),
];

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

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

struct Sale {
    date: NaiveDate,
    region: &'static str,
    store: &'static str,
    amount: f64,
    quantity: i64,
}

/// Busier towards the end of the year, like real retail.
fn seasonal_factor(date: NaiveDate) -> f64 {
    1.0 + 0.04 * date.month0() as f64
}

fn generate(rng: &mut SimpleRng, n: usize) -> Result<Vec<Sale>> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).context("start date")?;

    (0..n)
        .map(|_| {
            let date = start
                .checked_add_days(Days::new(rng.below(366) as u64))
                .context("sale date out of range")?;
            let (store, weight) = STORES[rng.below(STORES.len())];
            let region = REGIONS[rng.below(REGIONS.len())];
            let quantity = 1 + rng.below(12) as i64;
            let unit_price = 5.0 + rng.next_f64() * 45.0;
            let amount = (unit_price * quantity as f64 * weight * seasonal_factor(date) * 100.0)
                .round()
                / 100.0;
            Ok(Sale {
                date,
                region,
                store,
                amount,
                quantity,
            })
        })
        .collect()
}

fn write_parquet(sales: &[Sale], path: &str) -> Result<()> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).context("epoch")?;

    let schema = Arc::new(Schema::new(vec![
        Field::new("Data da Venda", DataType::Date32, false),
        Field::new("UF da Compra", DataType::Utf8, false),
        Field::new("Nome da Loja", DataType::Utf8, false),
        Field::new("Valor da Venda", DataType::Float64, false),
        Field::new("Quantidade", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Date32Array::from(
                sales
                    .iter()
                    .map(|s| (s.date - epoch).num_days() as i32)
                    .collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(sales.iter().map(|s| s.region).collect::<Vec<_>>())),
            Arc::new(StringArray::from(sales.iter().map(|s| s.store).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(sales.iter().map(|s| s.amount).collect::<Vec<_>>())),
            Arc::new(Int64Array::from(sales.iter().map(|s| s.quantity).collect::<Vec<_>>())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn write_csv(sales: &[Sale], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record([
        "Data da Venda",
        "UF da Compra",
        "Nome da Loja",
        "Valor da Venda",
        "Quantidade",
    ])?;
    for s in sales {
        writer.write_record([
            s.date.format("%Y-%m-%d").to_string(),
            s.region.to_string(),
            s.store.to_string(),
            format!("{:.2}", s.amount),
            s.quantity.to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SimpleRng::new(42);
    let sales = generate(&mut rng, 5000)?;

    write_parquet(&sales, "sample_sales.parquet")?;
    write_csv(&sales, "sample_sales.csv")?;

    log::info!("Generated {} sales", sales.len());
    println!("Wrote {} sales to sample_sales.parquet and sample_sales.csv", sales.len());
    Ok(())
}
