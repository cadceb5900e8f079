//! Incremental persistence: one CSV row per scraped product, flushed as soon
//! as it is written so partial progress survives a crash. Structured reviews
//! optionally go to a JSON-lines side-channel next to the flattened column.

use crate::error::Result;
use crate::types::ProductRecord;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

pub trait RecordSink {
    fn append(&mut self, record: &ProductRecord) -> Result<()>;
}

/// CSV column order mirrors `ProductRecord` field order; `reviews` carries
/// the flattened summary string.
const COLUMNS: [&str; 12] = [
    "url",
    "name",
    "price",
    "type",
    "shades",
    "image",
    "ingredients",
    "number_of_reviews",
    "bestseller",
    "stock_status",
    "reviews",
    "scraped_at",
];

pub struct CsvStore {
    writer: csv::Writer<File>,
    reviews_out: Option<File>,
}

impl CsvStore {
    /// Open for appending. The header is written only when the file is new
    /// or empty, so reopening mid-batch never duplicates it.
    pub fn open(path: &Path, reviews_path: Option<&Path>) -> Result<Self> {
        ensure_parent(path)?;
        let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if size == 0 {
            writer.write_record(COLUMNS)?;
            writer.flush()?;
        }

        let reviews_out = match reviews_path {
            Some(p) => {
                ensure_parent(p)?;
                Some(OpenOptions::new().create(true).append(true).open(p)?)
            }
            None => None,
        };

        Ok(Self {
            writer,
            reviews_out,
        })
    }
}

impl RecordSink for CsvStore {
    fn append(&mut self, r: &ProductRecord) -> Result<()> {
        let shades = r.shades.join("; ");
        let bestseller = r.bestseller.to_string();
        let stock = r.stock_status.to_string();
        let scraped_at = r.scraped_at.to_rfc3339();
        self.writer.write_record([
            r.url.as_str(),
            r.name.as_str(),
            r.price.as_str(),
            r.product_type.as_str(),
            shades.as_str(),
            r.image.as_str(),
            r.ingredients.as_str(),
            r.number_of_reviews.as_str(),
            bestseller.as_str(),
            stock.as_str(),
            r.reviews_summary.as_str(),
            scraped_at.as_str(),
        ])?;
        self.writer.flush()?;

        if let Some(f) = &mut self.reviews_out {
            serde_json::to_writer(&mut *f, r)?;
            f.write_all(b"\n")?;
            f.flush()?;
        }
        Ok(())
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
