use serde_json::json;

use super::*;

fn normalize_one(value: serde_json::Value) -> CanonicalProduct {
    normalize_item(&RawListingItem::from(value), &LinkResolver::default())
}

fn response(value: serde_json::Value) -> RawShoppingResponse {
    serde_json::from_value(value).expect("valid response fixture")
}

fn titled(n: usize) -> Vec<serde_json::Value> {
    (0..n).map(|i| json!({ "title": format!("item {i}") })).collect()
}

// -----------------------------------------------------------------------
// normalize_item
// -----------------------------------------------------------------------

#[test]
fn full_item_normalizes_to_expected_product() {
    let product = normalize_one(json!({
        "title": "WH-1000XM4",
        "brand": "Sony",
        "price": "$348.00",
        "extracted_price": 348,
        "source": "Amazon",
        "product_link": "https://www.amazon.com/dp/X"
    }));

    assert_eq!(product.name, "Sony WH-1000XM4");
    assert!((product.price.value - 348.0).abs() < f64::EPSILON);
    assert_eq!(product.price.currency, Currency::Usd);
    assert_eq!(product.price.formatted, "$348.00");
    assert_eq!(product.seller, "Amazon");
    assert_eq!(product.platform, "Amazon");
    assert_eq!(product.link, "https://www.amazon.com/dp/X");
    assert_eq!(product.image, "");
    assert!(product.rating.is_none());
    assert_eq!(product.shipping.as_deref(), Some("N/A"));
    assert_eq!(product.condition.as_deref(), Some("New"));
}

#[test]
fn empty_item_gets_all_defaults() {
    let product = normalize_one(json!({}));
    assert_eq!(product.name, "No Title");
    assert!(product.price.value.abs() < f64::EPSILON);
    assert_eq!(product.price.formatted, "$0");
    assert_eq!(product.price.currency, Currency::Usd);
    assert_eq!(product.seller, "Unknown Seller");
    assert_eq!(product.link, "https://www.amazon.com/s?k=No%20Title");
    assert_eq!(product.platform, "GoogleShopping");
}

#[test]
fn platform_comes_from_merchant_name() {
    let product = normalize_one(json!({ "source": "Best Buy Canada" }));
    assert_eq!(product.platform, "Best Buy");

    let product = normalize_one(json!({ "source": "eBay - techdeals" }));
    assert_eq!(product.platform, "eBay");
}

#[test]
fn platform_falls_back_to_link_host() {
    let product = normalize_one(json!({
        "source": "Joe's Electronics",
        "product_link": "https://www.newegg.com/p/N82E1"
    }));
    assert_eq!(product.seller, "Joe's Electronics");
    assert_eq!(product.platform, "Newegg");
}

#[test]
fn unknown_merchant_keeps_integration_platform() {
    let product = normalize_one(json!({
        "source": "Target",
        "product_link": "https://www.target.com/p/3"
    }));
    assert_eq!(product.platform, "GoogleShopping");
}

#[test]
fn fallback_search_link_does_not_set_platform() {
    let product = normalize_one(json!({
        "title": "MX Master 3S",
        "source": "Staples",
        "link": "https://www.google.com/shopping/product/77"
    }));
    assert!(product.link.starts_with("https://www.amazon.com/s?k="));
    assert_eq!(product.platform, "GoogleShopping");
}

#[test]
fn brand_already_in_title_is_not_repeated() {
    let product = normalize_one(json!({ "title": "SONY WH-1000XM5 Headphones", "brand": "Sony" }));
    assert_eq!(product.name, "SONY WH-1000XM5 Headphones");
}

#[test]
fn blank_title_and_brand_are_treated_as_missing() {
    let product = normalize_one(json!({ "title": "   ", "brand": "" }));
    assert_eq!(product.name, "No Title");
}

#[test]
fn non_string_title_is_treated_as_missing() {
    let product = normalize_one(json!({ "title": 1234, "brand": "Logitech" }));
    assert_eq!(product.name, "Logitech No Title");
}

#[test]
fn synthesized_price_uses_extracted_value() {
    let product = normalize_one(json!({ "extracted_price": 12.5 }));
    assert_eq!(product.price.formatted, "$12.5");
    assert_eq!(product.price.currency, Currency::Usd);
}

#[test]
fn price_without_dollar_sign_is_cad() {
    let product = normalize_one(json!({ "price": "349,99 CAD", "extracted_price": 349.99 }));
    assert_eq!(product.price.currency, Currency::Cad);
    assert_eq!(product.price.formatted, "349,99 CAD");
}

#[test]
fn positive_rating_is_kept_with_review_count() {
    let product = normalize_one(json!({ "rating": 4.7, "reviews": 1523 }));
    let rating = product.rating.expect("rating should be present");
    assert!((rating.value - 4.7).abs() < f64::EPSILON);
    assert_eq!(rating.count, 1523);
}

#[test]
fn zero_or_missing_rating_is_omitted() {
    for rating in [json!(0), json!(-1.0), json!("4.5"), json!(null)] {
        let product = normalize_one(json!({ "rating": rating, "reviews": 10 }));
        assert!(product.rating.is_none(), "rating {rating} kept");
    }
}

#[test]
fn rating_without_reviews_counts_zero() {
    let product = normalize_one(json!({ "rating": 3.9 }));
    assert_eq!(product.rating.map(|r| r.count), Some(0));
}

#[test]
fn delivery_takes_precedence_over_shipping() {
    let product = normalize_one(json!({ "delivery": "Free delivery", "shipping": "$5 shipping" }));
    assert_eq!(product.shipping.as_deref(), Some("Free delivery"));

    let product = normalize_one(json!({ "shipping": "$5 shipping" }));
    assert_eq!(product.shipping.as_deref(), Some("$5 shipping"));
}

#[test]
fn second_hand_condition_is_used_when_condition_is_empty() {
    let product = normalize_one(json!({ "condition": "", "second_hand_condition": "refurbished" }));
    assert_eq!(product.condition.as_deref(), Some("refurbished"));
}

#[test]
fn thumbnail_becomes_image() {
    let product = normalize_one(json!({ "thumbnail": "https://encrypted-tbn0.gstatic.com/x.jpg" }));
    assert_eq!(product.image, "https://encrypted-tbn0.gstatic.com/x.jpg");
}

#[test]
fn fallback_link_uses_brand_prefixed_name() {
    let product = normalize_one(json!({
        "title": "MX Master 3S",
        "brand": "Logitech",
        "link": "https://www.google.com/shopping/product/77"
    }));
    assert_eq!(
        product.link,
        "https://www.amazon.com/s?k=Logitech%20MX%20Master%203S"
    );
}

// -----------------------------------------------------------------------
// normalize_response
// -----------------------------------------------------------------------

#[test]
fn empty_response_normalizes_to_empty_list() {
    let raw = response(json!({
        "shopping_results": [],
        "inline_shopping_results": [],
        "featured_shopping_results": []
    }));
    assert!(normalize_response(&raw).is_empty());
    assert!(normalize_value(json!({})).is_empty());
}

#[test]
fn output_length_matches_merged_item_count() {
    let raw = response(json!({
        "shopping_results": titled(3),
        "featured_shopping_results": titled(2)
    }));
    assert_eq!(normalize_response(&raw).len(), 5);

    let raw = response(json!({ "inline_shopping_results": titled(4) }));
    assert_eq!(normalize_response(&raw).len(), 4);
}

#[test]
fn items_missing_everything_are_not_dropped() {
    let raw = response(json!({
        "shopping_results": [{}, null, 7],
        "inline_shopping_results": [{ "title": "real" }]
    }));
    let products = normalize_response(&raw);
    assert_eq!(products.len(), 4);
    assert!(products[..3].iter().all(|p| p.name == "No Title"));
    assert_eq!(products[3].name, "real");
}

#[test]
fn output_preserves_merge_order() {
    let products = normalize_value(json!({
        "featured_shopping_results": [{ "title": "f1" }],
        "inline_shopping_results": [{ "title": "i1" }, { "title": "i2" }],
        "shopping_results": [{ "title": "p1" }, { "title": "p2" }]
    }));
    let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["p1", "p2", "i1", "i2", "f1"]);
}

#[test]
fn every_normalized_link_avoids_provider_domain() {
    let products = normalize_value(json!({
        "shopping_results": [
            { "title": "a", "link": "https://www.google.com/shopping/product/1" },
            {
                "title": "b",
                "product_link": "https://www.google.com/url?url=https%3A%2F%2Fwalmart.com%2Fitem%2F1"
            },
            { "title": "c", "product_link": "https://www.target.com/p/3" }
        ]
    }));
    let resolver = LinkResolver::default();
    assert!(products.iter().all(|p| resolver.accepts(&p.link)));
    assert_eq!(products[1].link, "https://walmart.com/item/1");
}
