//! Product aggregator: runs every extractor against one parsed document and
//! composes the results into a [`ProductRecord`]. Pure composition: all
//! failure is absorbed by the extractors returning sentinels.

use crate::dom::Dom;
use crate::engine::Scraper as ScraperT;
use crate::error::Result;
use crate::services::extract;
use crate::types::*;

pub struct ProductScraper;

impl ScraperT for ProductScraper {
    fn name(&self) -> &'static str {
        "heuristic-product-scraper"
    }

    fn scrape(&self, url: &str, html: &str) -> Result<ProductRecord> {
        let dom = Dom::parse(html);
        let signals = extract::sales_signals(&dom);
        let reviews = extract::reviews(&dom);

        Ok(ProductRecord {
            url: url.to_string(),
            name: extract::name(&dom),
            price: extract::price(&dom),
            product_type: PRODUCT_TYPE.to_string(),
            shades: extract::shades(&dom),
            image: extract::image(&dom),
            ingredients: extract::ingredients(&dom),
            number_of_reviews: signals.number_of_reviews,
            bestseller: signals.bestseller,
            stock_status: signals.stock_status,
            reviews_summary: flatten_reviews(&reviews),
            reviews,
            scraped_at: chrono::Utc::now(),
        })
    }
}

/// Render each review as a fixed pipe-delimited snippet and join with `" || "`.
/// Text is capped at 100 chars for the tabular channel; the structured
/// records stay on the record untouched.
pub fn flatten_reviews(reviews: &[ReviewRecord]) -> String {
    if reviews.is_empty() {
        return NOT_FOUND.to_string();
    }
    reviews
        .iter()
        .map(|r| {
            format!(
                "{} | {} | {} | Verified: {} | Helpful: {}",
                r.star_rating,
                truncate_chars(&r.review_text, 100),
                r.review_date,
                r.verified_purchase,
                r.helpful_votes
            )
        })
        .collect::<Vec<_>>()
        .join(" || ")
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <h1>Velvet Matte Foundation</h1>
          <span class="price">$24.00</span>
          <img src="/img/product-velvet.jpg">
          <section>Ingredients: Aqua, Dimethicone</section>
          <ul class="shade-selector"><li>110 Porcelain</li><li>220 Natural Beige</li></ul>
          <span>4.8 stars (1,234 Reviews)</span>
          <em>Bestseller</em>
          <div class="review">
            <span aria-label="5 out of 5 stars"></span>
            <span class="date">March 3, 2024</span>
            <span class="name">Riley</span>
            Silky finish. Verified Purchase. 8 people found this helpful.
          </div>
        </body></html>
    "#;

    #[test]
    fn aggregates_every_field_from_one_document() {
        let rec = ProductScraper.scrape("https://shop.example.com/velvet", PAGE).unwrap();
        assert_eq!(rec.name, "Velvet Matte Foundation");
        assert_eq!(rec.price, "$24.00");
        assert_eq!(rec.product_type, "Foundation");
        assert_eq!(rec.image, "/img/product-velvet.jpg");
        assert_eq!(rec.ingredients, "Ingredients: Aqua, Dimethicone");
        assert!(rec.shades.contains(&"110 Porcelain".to_string()));
        assert!(rec.shades.contains(&"220 Natural Beige".to_string()));
        assert_eq!(rec.number_of_reviews, "1234");
        assert!(rec.bestseller);
        assert_eq!(rec.stock_status, StockStatus::InStock);
        assert_eq!(rec.reviews.len(), 1);
        let r = &rec.reviews[0];
        assert_eq!(r.star_rating, "5 out of 5 stars");
        assert_eq!(r.review_date, "March 3, 2024");
        assert_eq!(r.reviewer, "Riley");
        assert!(r.verified_purchase);
        assert_eq!(r.helpful_votes, "8");
        assert!(rec.reviews_summary.starts_with("5 out of 5 stars | "));
        assert!(rec.reviews_summary.contains("| Verified: true | Helpful: 8"));
    }

    #[test]
    fn scalar_fields_are_value_or_sentinel_never_empty() {
        let rec = ProductScraper.scrape("https://shop.example.com/x", "<html></html>").unwrap();
        for field in [
            &rec.name,
            &rec.price,
            &rec.image,
            &rec.ingredients,
            &rec.number_of_reviews,
            &rec.reviews_summary,
        ] {
            assert_eq!(field.as_str(), NOT_FOUND);
        }
        assert_eq!(rec.shades, vec![NOT_FOUND.to_string()]);
        assert!(rec.reviews.is_empty());
    }

    #[test]
    fn empty_review_list_flattens_to_sentinel() {
        assert_eq!(flatten_reviews(&[]), NOT_FOUND);
    }

    #[test]
    fn summary_joins_multiple_reviews_with_double_pipe() {
        let r = ReviewRecord {
            star_rating: "5 stars".into(),
            review_text: "Nice.".into(),
            review_date: "N/A".into(),
            reviewer: "N/A".into(),
            verified_purchase: false,
            helpful_votes: "N/A".into(),
        };
        let flat = flatten_reviews(&[r.clone(), r]);
        assert_eq!(
            flat,
            "5 stars | Nice. | N/A | Verified: false | Helpful: N/A || \
             5 stars | Nice. | N/A | Verified: false | Helpful: N/A"
        );
    }

    #[test]
    fn summary_truncation_respects_char_boundaries() {
        let long = "é".repeat(150);
        let r = ReviewRecord {
            star_rating: "4 stars".into(),
            review_text: long,
            review_date: "N/A".into(),
            reviewer: "N/A".into(),
            verified_purchase: true,
            helpful_votes: "2".into(),
        };
        let flat = flatten_reviews(&[r]);
        assert!(flat.contains(&"é".repeat(100)));
        assert!(!flat.contains(&"é".repeat(101)));
    }
}
