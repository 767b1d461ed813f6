use anyhow::{Context, Result};
use serde::Serialize;

/// One row in the layout the directory expects. Blank fields are written as
/// empty cells so the fallback values can be exercised.
#[derive(Serialize)]
struct SampleRow<'a> {
    #[serde(rename = "Industry Type")]
    industry_type: &'a str,
    #[serde(rename = "Company Name")]
    company_name: String,
    #[serde(rename = "Product Name")]
    product_name: &'a str,
    #[serde(rename = "Location")]
    location: &'a str,
    #[serde(rename = "Established Year")]
    established_year: Option<i32>,
    #[serde(rename = "Product Link")]
    product_link: String,
    #[serde(rename = "Trust Status")]
    trust_status: &'a str,
}

/// Minimal deterministic PRNG (splitmix64)
struct SimpleRng(u64);

impl SimpleRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

const INDUSTRIES: [&str; 8] = [
    "Automotive",
    "Lighting",
    "Construction",
    "Agriculture",
    "Oil & Gas",
    "Renewable Energy",
    "Heavy Machinery",
    "",
];

const PRODUCTS: [&str; 6] = [
    "Hydraulic Pump",
    "LED Flood Light",
    "Steel Coupler",
    "Drip Irrigation Kit",
    "Solar Inverter",
    "Brake Assembly",
];

const LOCATIONS: [&str; 8] = [
    "Pune, Maharashtra",
    "Ahmedabad, Gujarat",
    "Chennai, Tamil Nadu",
    "Ludhiana, Punjab",
    "Springfield, IL",
    "Austin, TX",
    "Coimbatore, Tamil Nadu",
    "New Delhi, Delhi",
];

const TRUST: [&str; 3] = ["Trusted Seller", "Trusted Seller", "Pending"];

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_data.csv".to_string());
    let rows: usize = 60;

    let mut rng = SimpleRng(42);
    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;

    for i in 0..rows {
        // Every ninth supplier has no known founding year.
        let established_year = (i % 9 != 4).then(|| 1935 + (rng.next_u64() % 90) as i32);
        let row = SampleRow {
            industry_type: *rng.pick(&INDUSTRIES),
            company_name: format!("Supplier {:03}", i + 1),
            product_name: *rng.pick(&PRODUCTS),
            location: *rng.pick(&LOCATIONS),
            established_year,
            product_link: format!("https://www.example.com/products/{}", i + 1),
            trust_status: *rng.pick(&TRUST),
        };
        writer
            .serialize(&row)
            .with_context(|| format!("writing row {i}"))?;
    }
    writer.flush().context("flushing CSV")?;

    println!("Wrote {rows} suppliers to {output_path}");
    Ok(())
}
