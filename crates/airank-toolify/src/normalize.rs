//! Raw ranking item → [`CanonicalRecord`]
//!
//! The four endpoints return overlapping but inconsistent shapes: growth and
//! region fields live either at the root or under a nested `traffic` object,
//! numbers may arrive as strings, and optional fields are often `null`.
//! Normalization never fails; anything missing becomes a zero value.
//!
//! Metric fields keep the API's JSON number as-is, so integers stay integers
//! in the written file (`500`, not `500.0`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::ranking::RankingType;

/// One ranked tool, identical in shape across ranking types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub id: String,
    pub rank: u64,
    pub name: String,
    pub website: String,
    pub logo: String,
    pub description: String,
    pub monthly_visits: u64,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub growth: Number,
    pub growth_rate: Number,
    pub top_region: String,
    pub top_region_value: Number,
    /// Untouched growth values (monthly only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_growth_data: Option<RawGrowth>,
    pub is_free: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_income: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_platform: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawGrowth {
    pub growth: Value,
    pub growth_rate: Value,
}

/// Where growth and region fields are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SignalSource {
    /// Root growth fields only, no region
    Monthly,
    /// Every field from the root, falling back to `traffic`
    Region,
    /// Growth from root then `traffic`, region from `traffic` only
    Traffic,
}

impl SignalSource {
    fn for_ranking(ranking: RankingType) -> Self {
        match ranking {
            RankingType::Monthly => Self::Monthly,
            RankingType::Region => Self::Region,
            RankingType::Total | RankingType::Income => Self::Traffic,
        }
    }

    fn resolve(self, item: &Map<String, Value>) -> Signals {
        let traffic = item.get("traffic").and_then(Value::as_object);
        let nested = |key: &str| traffic.and_then(|t| present(t, key));
        let root_or_nested = |key: &str| present(item, key).or_else(|| nested(key));

        match self {
            Self::Monthly => Signals {
                growth: metric(present(item, "growth")),
                growth_rate: metric(present(item, "growth_rate")),
                top_region: String::new(),
                top_region_value: zero(),
            },
            Self::Region => Signals {
                growth: metric(root_or_nested("growth")),
                growth_rate: metric(root_or_nested("growth_rate")),
                top_region: root_or_nested("top_region").and_then(text).unwrap_or_default(),
                top_region_value: metric(root_or_nested("top_region_value")),
            },
            Self::Traffic => Signals {
                growth: metric(root_or_nested("growth")),
                growth_rate: metric(root_or_nested("growth_rate")),
                top_region: nested("top_region").and_then(text).unwrap_or_default(),
                top_region_value: metric(nested("top_region_value")),
            },
        }
    }
}

struct Signals {
    growth: Number,
    growth_rate: Number,
    top_region: String,
    top_region_value: Number,
}

/// Build the canonical record for item `index` (0-based) of `page` (1-based).
///
/// Non-object items still produce a record carrying only rank and id.
pub fn normalize(
    raw: &Value,
    ranking: RankingType,
    page: u32,
    index: usize,
    per_page: u32,
) -> CanonicalRecord {
    let empty = Map::new();
    let item = raw.as_object().unwrap_or(&empty);

    let rank = u64::from(page.saturating_sub(1)) * u64::from(per_page) + index as u64 + 1;
    let id = present(item, "id")
        .and_then(text)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| format!("{}_{rank}", ranking.name()));

    let signals = SignalSource::for_ranking(ranking).resolve(item);

    let raw_growth_data = (ranking == RankingType::Monthly).then(|| RawGrowth {
        growth: item.get("growth").cloned().unwrap_or(Value::Null),
        growth_rate: item.get("growth_rate").cloned().unwrap_or(Value::Null),
    });

    let (estimated_income, payment_platform) = if ranking == RankingType::Income {
        let income = metric(present(item, "estimated_revenue"));
        let platform = present(item, "payment_platform")
            .and_then(text)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "unknown".to_string());
        (Some(income), Some(platform))
    } else {
        (None, None)
    };

    CanonicalRecord {
        id,
        rank,
        name: string_field(item, "name"),
        website: website(item),
        logo: first_text(item, &["website_logo", "image", "logo"]),
        description: string_field(item, "description"),
        monthly_visits: ["month_visited_count", "monthly_visits"]
            .iter()
            .filter_map(|key| present(item, key).and_then(count))
            .find(|&n| n > 0)
            .unwrap_or(0),
        categories: categories(item),
        tags: tags(item),
        growth: signals.growth,
        growth_rate: signals.growth_rate,
        top_region: signals.top_region,
        top_region_value: signals.top_region_value,
        raw_growth_data,
        is_free: present(item, "is_free").is_some_and(truthy),
        estimated_income,
        payment_platform,
    }
}

/// Tracking suffix stripped from tool links
const UTM_MARKER: &str = "?utm_source=";

fn website(item: &Map<String, Value>) -> String {
    let site = present(item, "website").and_then(text).unwrap_or_default();
    let site = match site.find(UTM_MARKER) {
        Some(pos) => site[..pos].to_string(),
        None => site,
    };
    if site.is_empty() {
        string_field(item, "url")
    } else {
        site
    }
}

fn categories(item: &Map<String, Value>) -> Vec<String> {
    match item.get("categories") {
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(|c| c.get("name").and_then(Value::as_str))
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn tags(item: &Map<String, Value>) -> Vec<String> {
    match item.get("tags") {
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(|t| match t {
                Value::String(s) => Some(s.clone()),
                Value::Object(o) => o.get("name").and_then(Value::as_str).map(str::to_string),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Field value, treating explicit `null` as absent
fn present<'a>(item: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    item.get(key).filter(|v| !v.is_null())
}

fn string_field(item: &Map<String, Value>, key: &str) -> String {
    present(item, key).and_then(text).unwrap_or_default()
}

fn first_text(item: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| present(item, key).and_then(text))
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

fn text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn zero() -> Number {
    Number::from(0)
}

/// Numeric field value, zero when absent or unparseable
fn metric(v: Option<&Value>) -> Number {
    v.and_then(number).unwrap_or_else(zero)
}

/// Numbers or numeric strings ("1,234" included), integers kept integral
fn number(v: &Value) -> Option<Number> {
    match v {
        Value::Number(n) => Some(n.clone()),
        Value::String(s) => serde_json::from_str(&s.trim().replace(',', "")).ok(),
        _ => None,
    }
}

fn count(v: &Value) -> Option<u64> {
    let n = number(v)?;
    n.as_u64()
        .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
}

fn truthy(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn norm(raw: Value, ranking: RankingType) -> CanonicalRecord {
        normalize(&raw, ranking, 1, 0, ranking.spec().per_page)
    }

    #[test]
    fn rank_formula() {
        let raw = json!({"name": "x"});
        assert_eq!(normalize(&raw, RankingType::Total, 1, 0, 100).rank, 1);
        assert_eq!(normalize(&raw, RankingType::Total, 2, 0, 100).rank, 101);
        assert_eq!(normalize(&raw, RankingType::Monthly, 3, 49, 50).rank, 150);
    }

    #[test]
    fn rank_strictly_increasing_across_pages() {
        let raw = json!({});
        let mut last = 0;
        for page in 1..=3 {
            for index in 0..50 {
                let rank = normalize(&raw, RankingType::Region, page, index, 50).rank;
                assert_eq!(rank, last + 1);
                last = rank;
            }
        }
    }

    #[test]
    fn website_utm_truncated() {
        let rec = norm(
            json!({"website": "https://ex.com/?utm_source=foo"}),
            RankingType::Total,
        );
        assert_eq!(rec.website, "https://ex.com/");
    }

    #[test]
    fn website_without_tracking_suffix_unchanged() {
        let rec = norm(json!({"website": "https://ex.com/path?ref=x"}), RankingType::Total);
        assert_eq!(rec.website, "https://ex.com/path?ref=x");
    }

    #[test]
    fn website_falls_back_to_url() {
        let rec = norm(json!({"website": "", "url": "https://u.io"}), RankingType::Total);
        assert_eq!(rec.website, "https://u.io");
        let rec = norm(json!({"url": "https://u.io"}), RankingType::Total);
        assert_eq!(rec.website, "https://u.io");
    }

    #[test]
    fn logo_chain() {
        let rec = norm(json!({"image": "i.png", "logo": "l.png"}), RankingType::Total);
        assert_eq!(rec.logo, "i.png");
        let rec = norm(json!({"website_logo": "", "logo": "l.png"}), RankingType::Total);
        assert_eq!(rec.logo, "l.png");
        assert_eq!(norm(json!({}), RankingType::Total).logo, "");
    }

    #[test]
    fn visits_fallback_and_strings() {
        let rec = norm(json!({"monthly_visits": 42}), RankingType::Total);
        assert_eq!(rec.monthly_visits, 42);
        let rec = norm(
            json!({"month_visited_count": 0, "monthly_visits": "1,500"}),
            RankingType::Total,
        );
        assert_eq!(rec.monthly_visits, 1500);
        let rec = norm(json!({"month_visited_count": "n/a"}), RankingType::Total);
        assert_eq!(rec.monthly_visits, 0);
    }

    #[test]
    fn categories_and_tags() {
        let rec = norm(
            json!({
                "categories": [{"name": "Chat"}, {"id": 3}, {"name": "Writing"}],
                "tags": ["free", {"name": "api"}, 7]
            }),
            RankingType::Total,
        );
        assert_eq!(rec.categories, vec!["Chat", "Writing"]);
        assert_eq!(rec.tags, vec!["free", "api"]);

        let rec = norm(json!({"categories": "Chat", "tags": null}), RankingType::Total);
        assert!(rec.categories.is_empty());
        assert!(rec.tags.is_empty());
    }

    #[test]
    fn monthly_ignores_traffic() {
        let rec = norm(
            json!({
                "growth": 1200,
                "growth_rate": "0.35",
                "traffic": {"top_region": "US", "top_region_value": 0.4, "growth": 9}
            }),
            RankingType::Monthly,
        );
        assert_eq!(json!(rec.growth), json!(1200));
        assert_eq!(json!(rec.growth_rate), json!(0.35));
        assert_eq!(rec.top_region, "");
        assert_eq!(json!(rec.top_region_value), json!(0));
        let raw = rec.raw_growth_data.unwrap();
        assert_eq!(raw.growth, json!(1200));
        assert_eq!(raw.growth_rate, json!("0.35"));
    }

    #[test]
    fn monthly_raw_growth_null_when_absent() {
        let raw = norm(json!({}), RankingType::Monthly).raw_growth_data.unwrap();
        assert_eq!(raw.growth, Value::Null);
        assert_eq!(raw.growth_rate, Value::Null);
    }

    #[test]
    fn region_root_then_traffic() {
        let rec = norm(
            json!({
                "top_region": "JP",
                "traffic": {
                    "top_region": "US",
                    "top_region_value": 0.25,
                    "growth": 10,
                    "growth_rate": 0.1
                }
            }),
            RankingType::Region,
        );
        assert_eq!(rec.top_region, "JP");
        assert_eq!(json!(rec.top_region_value), json!(0.25));
        assert_eq!(json!(rec.growth), json!(10));
        assert_eq!(json!(rec.growth_rate), json!(0.1));
    }

    #[test]
    fn total_region_only_from_traffic() {
        let rec = norm(
            json!({
                "growth": 5,
                "top_region": "JP",
                "traffic": {"top_region": "US", "top_region_value": 0.6, "growth": 99}
            }),
            RankingType::Total,
        );
        assert_eq!(json!(rec.growth), json!(5));
        assert_eq!(rec.top_region, "US");
        assert_eq!(json!(rec.top_region_value), json!(0.6));
        assert!(rec.raw_growth_data.is_none());
    }

    #[test]
    fn null_root_value_falls_back_to_traffic() {
        let rec = norm(
            json!({"growth": null, "traffic": {"growth": 3}}),
            RankingType::Income,
        );
        assert_eq!(json!(rec.growth), json!(3));
    }

    #[test]
    fn income_fields() {
        let rec = norm(
            json!({"estimated_revenue": 500, "payment_platform": ""}),
            RankingType::Income,
        );
        assert_eq!(rec.estimated_income, Some(Number::from(500)));
        assert_eq!(rec.payment_platform.as_deref(), Some("unknown"));

        let rec = norm(json!({"payment_platform": "Stripe"}), RankingType::Income);
        assert_eq!(rec.estimated_income, Some(Number::from(0)));
        assert_eq!(rec.payment_platform.as_deref(), Some("Stripe"));
    }

    #[test]
    fn integer_metrics_serialize_as_integers() {
        let rec = norm(
            json!({
                "estimated_revenue": 500,
                "traffic": {"growth": 12, "growth_rate": "1,250", "top_region_value": 0.5}
            }),
            RankingType::Income,
        );
        let text = serde_json::to_string(&rec).unwrap();
        assert!(text.contains(r#""estimated_income":500,"#));
        assert!(text.contains(r#""growth":12,"#));
        assert!(text.contains(r#""growth_rate":1250,"#));
        assert!(text.contains(r#""top_region_value":0.5,"#));
        assert!(!text.contains("500.0"));
    }

    #[test]
    fn income_fields_omitted_elsewhere() {
        let rec = norm(json!({"estimated_revenue": 500}), RankingType::Total);
        let value = serde_json::to_value(&rec).unwrap();
        assert!(value.get("estimated_income").is_none());
        assert!(value.get("payment_platform").is_none());
        assert!(value.get("raw_growth_data").is_none());
    }

    #[test]
    fn id_fallback_and_numeric_id() {
        assert_eq!(norm(json!({}), RankingType::Region).id, "region_rank_1");
        assert_eq!(norm(json!({"id": 9182}), RankingType::Region).id, "9182");
        assert_eq!(norm(json!({"id": "abc"}), RankingType::Region).id, "abc");
    }

    #[test]
    fn is_free_variants() {
        assert!(norm(json!({"is_free": true}), RankingType::Total).is_free);
        assert!(norm(json!({"is_free": 1}), RankingType::Total).is_free);
        assert!(!norm(json!({"is_free": "yes"}), RankingType::Total).is_free);
        assert!(!norm(json!({}), RankingType::Total).is_free);
    }

    #[test]
    fn non_object_item_never_fails() {
        let rec = normalize(&json!("garbage"), RankingType::Total, 2, 4, 100);
        assert_eq!(rec.rank, 105);
        assert_eq!(rec.id, "total_rank_105");
        assert_eq!(rec.name, "");
        assert_eq!(rec.monthly_visits, 0);
    }
}
