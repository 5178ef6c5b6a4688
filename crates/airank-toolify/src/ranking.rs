//! Ranking types, languages and their endpoint table

use crate::headers;

/// Selector names that were not recognised
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankingError {
    UnsupportedRanking(String),
    UnsupportedLanguage(String),
}

impl std::fmt::Display for RankingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedRanking(name) => write!(
                f,
                "unsupported ranking type: {name} (expected one of {})",
                RankingType::ALL.map(RankingType::name).join(", ")
            ),
            Self::UnsupportedLanguage(name) => {
                write!(f, "unsupported language: {name} (expected en or zh)")
            }
        }
    }
}

impl std::error::Error for RankingError {}

/// The four leaderboards. Closed set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RankingType {
    /// Monthly growth
    Monthly,
    /// Total traffic
    Total,
    /// Estimated revenue
    Income,
    /// Regional traffic
    Region,
}

/// Endpoint parameters for one ranking type
#[derive(Debug, PartialEq, Eq)]
pub struct RankingRequestSpec {
    /// Path relative to the API base URL
    pub path: &'static str,
    /// `order_by` query value; the revenue endpoint takes none
    pub order_by: Option<&'static str>,
    pub per_page: u32,
}

static MONTHLY: RankingRequestSpec = RankingRequestSpec {
    path: "month-top",
    order_by: Some("growth"),
    per_page: 50,
};

static TOTAL: RankingRequestSpec = RankingRequestSpec {
    path: "category-v1",
    order_by: Some("month_visited_count"),
    per_page: 100,
};

static INCOME: RankingRequestSpec = RankingRequestSpec {
    path: "high-revenue",
    order_by: None,
    per_page: 50,
};

static REGION: RankingRequestSpec = RankingRequestSpec {
    path: "region-v1",
    order_by: Some("month_visited_count"),
    per_page: 50,
};

impl RankingType {
    pub const ALL: [Self; 4] = [Self::Monthly, Self::Total, Self::Income, Self::Region];

    /// Parse CLI/config string into enum
    pub fn from_name(s: &str) -> Result<Self, RankingError> {
        match s {
            "monthly_rank" => Ok(Self::Monthly),
            "total_rank" => Ok(Self::Total),
            "income_rank" => Ok(Self::Income),
            "region_rank" => Ok(Self::Region),
            _ => Err(RankingError::UnsupportedRanking(s.to_string())),
        }
    }

    /// Name used in output paths and metadata
    pub fn name(self) -> &'static str {
        match self {
            Self::Monthly => "monthly_rank",
            Self::Total => "total_rank",
            Self::Income => "income_rank",
            Self::Region => "region_rank",
        }
    }

    pub fn spec(self) -> &'static RankingRequestSpec {
        match self {
            Self::Monthly => &MONTHLY,
            Self::Total => &TOTAL,
            Self::Income => &INCOME,
            Self::Region => &REGION,
        }
    }
}

impl std::fmt::Display for RankingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl RankingRequestSpec {
    /// Query parameters for `page` (1-based)
    pub fn params(&self, page: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", page.to_string()),
            ("per_page", self.per_page.to_string()),
            ("direction", "desc".to_string()),
        ];
        if let Some(order_by) = self.order_by {
            params.push(("order_by", order_by.to_string()));
        }
        params
    }
}

/// Content language of a ranking run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Language {
    En,
    Zh,
}

impl Language {
    pub const ALL: [Self; 2] = [Self::En, Self::Zh];

    /// Strict parse for user input
    pub fn from_name(s: &str) -> Result<Self, RankingError> {
        match s {
            "en" => Ok(Self::En),
            "zh" => Ok(Self::Zh),
            _ => Err(RankingError::UnsupportedLanguage(s.to_string())),
        }
    }

    /// Lenient parse: `zh` is Chinese, anything else is the English default
    pub fn from_code_or_default(s: &str) -> Self {
        if s == "zh" {
            Self::Zh
        } else {
            Self::En
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Zh => "zh",
        }
    }

    /// Request headers for this language
    pub fn headers(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::En => headers::EN,
            Self::Zh => headers::ZH,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
