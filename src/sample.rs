use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::{RawListing, Source};

const MODELS: &[(&str, &str)] = &[
    ("Toyota", "Camry"),
    ("Toyota", "Corolla"),
    ("Honda", "Civic"),
    ("Honda", "Accord"),
    ("Ford", "F-150"),
    ("Chevy", "Silverado"),
    ("Nissan", "Altima"),
    ("Subaru", "Outback"),
    ("Mazda", "CX-5"),
    ("Hyundai", "Elantra"),
];

const TRIM_NOTES: &[&str] = &[
    "low miles",
    "one owner",
    "clean title",
    "well maintained",
    "runs great",
    "new tires",
];

/// Generates demo listings for dry runs, including a share of malformed
/// ones (missing year, garbage price, missing URL) so the validation and
/// rejection paths get exercised end to end.
pub fn generate_listings(count: usize) -> Vec<RawListing> {
    let mut rng = rand::thread_rng();
    let mut listings = Vec::with_capacity(count);

    for i in 0..count {
        let (make, model) = *MODELS.choose(&mut rng).unwrap();
        let note = *TRIM_NOTES.choose(&mut rng).unwrap();
        let year: u16 = rng.gen_range(2012..=2025);
        let price: u32 = rng.gen_range(4..40) * 500;

        // Every fifth listing is deliberately broken in some way.
        let (title, raw_price, listing_url) = match i % 5 {
            4 if i % 2 == 0 => (
                format!("Selling my {} {}", make, model),
                format!("${}", price),
                format!("https://craigslist.org/cto/{}", 7000 + i),
            ),
            4 => (
                format!("{} {} {} - {}", year, make, model, note),
                "call for price".to_string(),
                String::new(),
            ),
            _ => (
                format!("{} {} {} - {}", year, make, model, note),
                if i % 3 == 0 {
                    format!("${} obo", price)
                } else {
                    format!("${}", price)
                },
                format!("https://craigslist.org/cto/{}", 7000 + i),
            ),
        };

        listings.push(RawListing {
            source: if i % 4 == 0 {
                Source::FacebookMarketplace
            } else {
                Source::Craigslist
            },
            listing_url,
            title,
            description: format!("{} {} in good shape, {}", make, model, note),
            raw_price,
            raw_posted_date: Some(format!("{} days ago", rng.gen_range(0..10))),
            raw_location: Some("Honolulu".to_string()),
            raw_contact: if rng.gen_bool(0.6) {
                Some(format!(
                    "call or text 808-555-{:04}",
                    rng.gen_range(0..10000)
                ))
            } else {
                None
            },
        });
    }

    listings
}
