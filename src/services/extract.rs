//! The heuristic extraction engine.
//!
//! Each function is one independent, best-effort rule for locating a single
//! semantic field in markup that was never designed for machine consumption.
//! A miss returns [`NOT_FOUND`] (or an empty list for reviews), never an
//! error. Scans are first-match-wins over document order, so iteration order
//! decides which candidate wins when several qualify.

use crate::dom::{self, Dom};
use crate::types::{ReviewRecord, SalesSignals, StockStatus, NOT_FOUND};
use regex::Regex;
use scraper::ElementRef;
use std::collections::BTreeSet;

/// First heading (`h1`/`h2`) whose stripped text is longer than 4 chars.
/// The length gate rejects near-empty decorative headings.
pub fn name(dom: &Dom) -> String {
    for el in dom.select("h1, h2") {
        let text = dom::collapsed_text(el);
        if text.chars().count() > 4 {
            return text;
        }
    }
    NOT_FOUND.to_string()
}

/// First `span`/`div` whose lower-cased text carries a currency marker.
/// Returned unparsed (and lower-cased, as matched); downstream consumers
/// parse currency themselves. Broad scan with no length cap; a large page may
/// yield an unrelated section. Known weakness, kept deliberately.
pub fn price(dom: &Dom) -> String {
    for el in dom.select("span, div") {
        let txt = dom::collapsed_text(el).to_lowercase();
        if txt.contains('$') || txt.contains("usd") {
            return txt;
        }
    }
    NOT_FOUND.to_string()
}

/// `src` of the first image whose source mentions "product".
pub fn image(dom: &Dom) -> String {
    dom.select_first(r#"img[src*="product"]"#)
        .and_then(|img| img.value().attr("src"))
        .map(str::to_string)
        .unwrap_or_else(|| NOT_FOUND.to_string())
}

/// Full text of the first `div`/`section`/`p` mentioning "ingredient".
/// Frequently over-matches (returns a whole section that merely mentions the
/// word). Documented heuristic limitation, kept deliberately.
pub fn ingredients(dom: &Dom) -> String {
    for el in dom.select("div, section, p") {
        let txt = dom::collapsed_text(el);
        if txt.to_lowercase().contains("ingredient") {
            return txt;
        }
    }
    NOT_FOUND.to_string()
}

/// Two-phase shade harvest: candidate elements from four independent
/// attribute scans (class tokens, id, aria-label, title each containing
/// "shade"), then every descendant contributes its stripped text or, when
/// textless, its alt/title attribute. Set semantics dedupe the haul; the
/// sentinel singleton stands in for an empty result.
pub fn shades(dom: &Dom) -> Vec<String> {
    let mut candidates: Vec<ElementRef<'_>> = Vec::new();
    candidates.extend(dom.by_class_token_contains("shade"));
    candidates.extend(dom.by_attr_contains("id", "shade"));
    candidates.extend(dom.by_attr_contains("aria-label", "shade"));
    candidates.extend(dom.by_attr_contains("title", "shade"));

    let mut found = BTreeSet::new();
    for el in candidates {
        for d in dom::descendant_elements(el) {
            let txt = dom::collapsed_text(d);
            if !txt.is_empty() {
                found.insert(txt);
            } else if let Some(v) = dom::attr_chain(d, &["alt", "title"]) {
                found.insert(v.trim().to_string());
            }
        }
    }
    found.retain(|s| !s.trim().is_empty());

    if found.is_empty() {
        vec![NOT_FOUND.to_string()]
    } else {
        found.into_iter().collect()
    }
}

const STOCK_OUT_PHRASES: [&str; 3] = ["out of stock", "sold out", "unavailable"];

/// Three independent popularity proxies over the full page text.
pub fn sales_signals(dom: &Dom) -> SalesSignals {
    let strings = dom.stripped_strings();

    // Review count: first review/rating-flavored string that yields a digit
    // run wins; grouping commas stripped.
    let mut number_of_reviews = NOT_FOUND.to_string();
    if let Ok(re) = Regex::new(r"\d[\d,]*") {
        for s in &strings {
            let lower = s.to_lowercase();
            if !lower.contains("review") && !lower.contains("rating") {
                continue;
            }
            if let Some(count) = first_count_run(s, &re) {
                number_of_reviews = count;
                break;
            }
        }
    }

    let bestseller = strings
        .iter()
        .any(|s| s.to_lowercase().contains("bestseller"));

    let page_text = strings.join(" ").to_lowercase();
    let mut stock_status = StockStatus::InStock;
    for phrase in STOCK_OUT_PHRASES {
        if page_text.contains(phrase) {
            stock_status = StockStatus::OutOfStock;
            break;
        }
    }

    SalesSignals {
        number_of_reviews,
        bestseller,
        stock_status,
    }
}

/// First digit run in `s` that is not part of a decimal, commas stripped.
/// "4.8 stars (1,234 Reviews)" must yield the count, not the star average,
/// so runs touching a `.` are passed over.
fn first_count_run(s: &str, re: &Regex) -> Option<String> {
    for m in re.find_iter(s) {
        let before = s[..m.start()].chars().next_back();
        let after = s[m.end()..].chars().next();
        if before == Some('.') || after == Some('.') {
            continue;
        }
        return Some(m.as_str().replace(',', ""));
    }
    None
}

/// One record per element carrying a "review"-flavored class token. Nested
/// containers are not deduplicated; each produces its own record.
pub fn reviews(dom: &Dom) -> Vec<ReviewRecord> {
    let digit_run = Regex::new(r"\d+").ok();
    dom.by_class_token_contains("review")
        .into_iter()
        .map(|container| review_from_container(container, digit_run.as_ref()))
        .collect()
}

fn review_from_container(container: ElementRef<'_>, digit_run: Option<&Regex>) -> ReviewRecord {
    let star_rating = dom::descendant_elements(container)
        .find(|el| attr_value_contains(*el, "aria-label", "star"))
        .and_then(|el| el.value().attr("aria-label"))
        .or_else(|| {
            dom::descendant_elements(container)
                .find(|el| el.value().name() == "img" && attr_value_contains(*el, "alt", "star"))
                .and_then(|el| el.value().attr("alt"))
        })
        .map(str::to_string)
        .unwrap_or_else(|| NOT_FOUND.to_string());

    let review_text = dom::collapsed_text(container);

    // Only the first class token is inspected for date/reviewer. Narrow,
    // matching the behavior this replaces.
    let review_date = first_descendant_by_leading_class(container, &["date"]);
    let reviewer = first_descendant_by_leading_class(container, &["author", "name", "location"]);

    let strings = dom::stripped_strings_within(container);
    let verified_purchase = strings
        .iter()
        .any(|s| s.to_lowercase().contains("verified purchase"));

    let mut helpful_votes = NOT_FOUND.to_string();
    if let Some(re) = digit_run {
        for s in &strings {
            if s.to_lowercase().contains("found this helpful") {
                if let Some(m) = re.find(s) {
                    helpful_votes = m.as_str().to_string();
                    break;
                }
            }
        }
    }

    ReviewRecord {
        star_rating,
        review_text,
        review_date,
        reviewer,
        verified_purchase,
        helpful_votes,
    }
}

fn attr_value_contains(el: ElementRef<'_>, attr: &str, needle: &str) -> bool {
    el.value()
        .attr(attr)
        .map(|v| v.to_lowercase().contains(needle))
        .unwrap_or(false)
}

/// Stripped text of the first descendant whose *first* class token contains
/// any of `needles`, or the sentinel.
fn first_descendant_by_leading_class(container: ElementRef<'_>, needles: &[&str]) -> String {
    dom::descendant_elements(container)
        .find(|el| {
            dom::first_class_token(*el)
                .map(|tok| {
                    let tok = tok.to_lowercase();
                    needles.iter().any(|n| tok.contains(n))
                })
                .unwrap_or(false)
        })
        .map(|el| dom::collapsed_text(el))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| NOT_FOUND.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_takes_first_heading_over_four_chars() {
        let dom = Dom::parse("<h1>Velvet Matte Foundation</h1><h2>Also here</h2>");
        assert_eq!(name(&dom), "Velvet Matte Foundation");
    }

    #[test]
    fn name_rejects_short_decorative_headings() {
        let dom = Dom::parse("<h1>SPF</h1>");
        assert_eq!(name(&dom), NOT_FOUND);

        let dom = Dom::parse("<h1>SPF</h1><h2>Dewy Glow Serum</h2>");
        assert_eq!(name(&dom), "Dewy Glow Serum");
    }

    #[test]
    fn price_matches_dollar_or_usd_marker() {
        let dom = Dom::parse("<span>Free shipping</span><span>$12.99</span>");
        assert_eq!(price(&dom), "$12.99");

        let dom = Dom::parse("<div>14.50 USD</div>");
        assert_eq!(price(&dom), "14.50 usd");

        let dom = Dom::parse("<span>no currency here</span>");
        assert_eq!(price(&dom), NOT_FOUND);
    }

    #[test]
    fn image_requires_product_in_src() {
        let dom = Dom::parse(r#"<img src="/assets/hero.jpg"><img src="/assets/product-123.jpg">"#);
        assert_eq!(image(&dom), "/assets/product-123.jpg");

        let dom = Dom::parse(r#"<img src="/assets/banner.jpg">"#);
        assert_eq!(image(&dom), NOT_FOUND);
    }

    #[test]
    fn ingredients_returns_whole_matching_container() {
        let dom = Dom::parse("<p>About us</p><section>Ingredients: water,\n glycerin</section>");
        assert_eq!(ingredients(&dom), "Ingredients: water, glycerin");
    }

    #[test]
    fn shades_union_all_four_attribute_scans() {
        let html = r#"
            <ul class="shade-picker"><li>Warm Beige</li><li>Cool Ivory</li></ul>
            <div id="shadeList"><span>Honey</span></div>
            <div aria-label="shade options"><img alt="Espresso"></div>
            <div title="Shade chart"><span>Honey</span></div>
        "#;
        let got = shades(&Dom::parse(html));
        assert_eq!(got, vec!["Cool Ivory", "Espresso", "Honey", "Warm Beige"]);
    }

    #[test]
    fn shades_are_idempotent_and_fall_back_to_sentinel() {
        let html = r#"<div class="shades"><b>Fair</b><b>Fair</b></div>"#;
        let dom = Dom::parse(html);
        let first = shades(&dom);
        assert_eq!(first, vec!["Fair"]);
        assert_eq!(shades(&dom), first);

        let empty = shades(&Dom::parse("<div class='swatch'>x</div>"));
        assert_eq!(empty, vec![NOT_FOUND]);
    }

    #[test]
    fn review_count_strips_grouping_commas() {
        let dom = Dom::parse("<span>4.8 stars (1,234 Reviews)</span>");
        assert_eq!(sales_signals(&dom).number_of_reviews, "1234");
    }

    #[test]
    fn review_count_skips_digitless_candidates() {
        let dom = Dom::parse("<span>Read reviews</span><span>Rating: 17</span>");
        assert_eq!(sales_signals(&dom).number_of_reviews, "17");

        let dom = Dom::parse("<span>Read reviews</span>");
        assert_eq!(sales_signals(&dom).number_of_reviews, NOT_FOUND);
    }

    #[test]
    fn review_count_is_not_the_star_average() {
        let dom = Dom::parse("<span>Rated 4.5 by 87 reviewers</span>");
        assert_eq!(sales_signals(&dom).number_of_reviews, "87");
    }

    #[test]
    fn bestseller_is_a_substring_test_anywhere() {
        let dom = Dom::parse("<em>#1 Bestseller in Face Makeup</em>");
        assert!(sales_signals(&dom).bestseller);

        let dom = Dom::parse("<em>best selling</em>");
        assert!(!sales_signals(&dom).bestseller);
    }

    #[test]
    fn stock_downgrades_on_any_out_phrase() {
        let dom = Dom::parse("<p>Temporarily Out Of Stock</p>");
        assert_eq!(sales_signals(&dom).stock_status, StockStatus::OutOfStock);

        let dom = Dom::parse("<p>Currently Sold Out online</p>");
        assert_eq!(sales_signals(&dom).stock_status, StockStatus::OutOfStock);

        let dom = Dom::parse("<p>Ships in 2 days</p>");
        assert_eq!(sales_signals(&dom).stock_status, StockStatus::InStock);
    }

    #[test]
    fn no_review_containers_means_empty_sequence() {
        let dom = Dom::parse("<div class='summary'>4.8 stars</div>");
        assert!(reviews(&dom).is_empty());
    }

    #[test]
    fn review_verified_and_helpful_votes() {
        let dom = Dom::parse(
            r#"<div class="review-item">Great product! Verified Purchase. 12 people found this helpful.</div>"#,
        );
        let got = reviews(&dom);
        assert_eq!(got.len(), 1);
        assert!(got[0].verified_purchase);
        assert_eq!(got[0].helpful_votes, "12");
        assert_eq!(got[0].star_rating, NOT_FOUND);
    }

    #[test]
    fn review_star_rating_prefers_aria_label_over_img_alt() {
        let dom = Dom::parse(
            r#"<div class="review">
                 <span aria-label="4 out of 5 stars"></span>
                 <img alt="4 stars" src="s.png">
               </div>"#,
        );
        assert_eq!(reviews(&dom)[0].star_rating, "4 out of 5 stars");

        let dom = Dom::parse(r#"<div class="review"><img alt="3 stars" src="s.png"></div>"#);
        assert_eq!(reviews(&dom)[0].star_rating, "3 stars");
    }

    #[test]
    fn review_date_and_reviewer_inspect_first_class_token_only() {
        let dom = Dom::parse(
            r#"<div class="review">
                 <span class="meta review-date">May 2024</span>
                 <span class="date-posted">June 2024</span>
                 <span class="author-name">Dana</span>
               </div>"#,
        );
        let got = &reviews(&dom)[0];
        // "meta" is the first token of the first span, so it does not match.
        assert_eq!(got.review_date, "June 2024");
        assert_eq!(got.reviewer, "Dana");
    }

    // Nested review-class containers are not deduplicated: both the outer
    // and inner element produce a record. Possibly a latent duplication bug,
    // possibly intentional (reply threads); pinned here so a deliberate
    // change trips this test.
    #[test]
    fn nested_review_containers_each_extracted() {
        let dom = Dom::parse(
            r#"<div class="review-list">
                 <div class="review">Lovely texture.</div>
               </div>"#,
        );
        let got = reviews(&dom);
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].review_text, "Lovely texture.");
        assert_eq!(got[1].review_text, "Lovely texture.");
    }
}
