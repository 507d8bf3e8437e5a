//! Seeded sample dataset generator.
//!
//! Produces company records shaped like the clustering pipeline's output:
//! - `uuid`, `name`, `description`, `coarse_label`, `fine_label` columns
//! - A skewed coarse distribution so counts and ordering are interesting
//! - The `Unclustered` sentinel at both levels, as real exports contain it
//!
//! The same seed always yields the same dataset.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use uuid::Builder;

use crate::data::{Dataset, Record};
use crate::labels::UNCLUSTERED;

/// Column order of generated datasets.
pub const SAMPLE_COLUMNS: [&str; 5] = ["uuid", "name", "description", "coarse_label", "fine_label"];

/// (coarse label, relative weight, fine labels)
const TAXONOMY: &[(&str, u32, &[&str])] = &[
    (
        "Technology Services",
        6,
        &[
            "Services and Products",
            "Business Solutions",
            "Healthcare Technology",
            "Digital Services Marketing",
            UNCLUSTERED,
        ],
    ),
    (
        "Financial Services",
        3,
        &["Payments", "Lending Platforms", "Insurance Technology"],
    ),
    (
        "Consumer Goods",
        2,
        &["Food and Beverage", "Apparel", "Home Products"],
    ),
    (UNCLUSTERED, 2, &[UNCLUSTERED]),
];

const NAME_PREFIXES: &[&str] = &[
    "Blue", "North", "Apex", "Bright", "Cedar", "Nova", "Quant", "Silver", "Harbor", "Vertex",
];

const NAME_SUFFIXES: &[&str] = &[
    "Labs", "Systems", "Partners", "Works", "Group", "Dynamics", "Networks", "Holdings",
];

/// Generate `rows` records from `seed`.
pub fn generate(rows: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let total_weight: u32 = TAXONOMY.iter().map(|(_, w, _)| w).sum();

    let records = (0..rows)
        .map(|_| {
            let (coarse, fines) = pick_coarse(&mut rng, total_weight);
            let fine = fines.choose(&mut rng).copied().unwrap_or(UNCLUSTERED);
            let name = company_name(&mut rng);
            let description = describe(&name, coarse, fine);
            Record::new(vec![random_id(&mut rng), name, description, coarse.to_string(), fine.to_string()])
        })
        .collect();

    let columns = SAMPLE_COLUMNS.iter().map(|c| c.to_string()).collect();
    match Dataset::new(columns, records) {
        Ok(ds) => ds,
        // SAMPLE_COLUMNS always carries both label columns.
        Err(e) => unreachable!("sample columns failed validation: {e}"),
    }
}

fn pick_coarse(rng: &mut StdRng, total_weight: u32) -> (&'static str, &'static [&'static str]) {
    let mut roll = rng.gen_range(0..total_weight);
    for (coarse, weight, fines) in TAXONOMY {
        if roll < *weight {
            return (*coarse, *fines);
        }
        roll -= weight;
    }
    let (coarse, _, fines) = TAXONOMY[TAXONOMY.len() - 1];
    (coarse, fines)
}

fn company_name(rng: &mut StdRng) -> String {
    let prefix = NAME_PREFIXES.choose(rng).copied().unwrap_or("Acme");
    let suffix = NAME_SUFFIXES.choose(rng).copied().unwrap_or("Co");
    format!("{prefix} {suffix}")
}

fn describe(name: &str, coarse: &str, fine: &str) -> String {
    if fine == UNCLUSTERED {
        format!("{name} operates across several markets.")
    } else {
        format!("{name} focuses on {} within {}.", fine.to_lowercase(), coarse.to_lowercase())
    }
}

/// Random (v4) id drawn from the seeded generator so ids repeat per seed.
fn random_id(rng: &mut StdRng) -> String {
    Builder::from_random_bytes(rng.gen()).into_uuid().to_string()
}
