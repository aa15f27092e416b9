use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use validator::Validate;

use crate::utils::{ApiError, ApiResult};

pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2100;

pub const DEFAULT_YEAR: i32 = 2025;
pub const DEFAULT_CATEGORY: &str = "朋友圈";
pub const DEFAULT_STYLE: &str = "传统风格";

/// Lunar facts for a Gregorian year
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearFact {
    pub year: i32,
    pub lunar_year_name: String,
    pub zodiac: String,
}

/// Where the blessing will be posted; decides the length constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    MomentsPost,
    Microblog,
    NewYearGreeting,
    NewYearWish,
    /// Any label the UI sends that we do not recognize
    Other(String),
}

impl Category {
    pub fn label(&self) -> &str {
        match self {
            Self::MomentsPost => "朋友圈",
            Self::Microblog => "微博",
            Self::NewYearGreeting => "新春贺词",
            Self::NewYearWish => "新年祝福",
            Self::Other(label) => label,
        }
    }

    pub fn is_microblog(&self) -> bool {
        matches!(self, Self::Microblog)
    }
}

impl From<&str> for Category {
    fn from(label: &str) -> Self {
        match label {
            "朋友圈" => Self::MomentsPost,
            "微博" => Self::Microblog,
            "新春贺词" => Self::NewYearGreeting,
            "新年祝福" => Self::NewYearWish,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tone of the blessing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Style {
    Modern,
    Classical,
    Traditional,
    Other(String),
}

impl Style {
    pub fn label(&self) -> &str {
        match self {
            Self::Modern => "现代创新风格",
            Self::Classical => "古色古香风格",
            Self::Traditional => "传统风格",
            Self::Other(label) => label,
        }
    }
}

impl From<&str> for Style {
    fn from(label: &str) -> Self {
        match label {
            "现代创新风格" => Self::Modern,
            "古色古香风格" => Self::Classical,
            "传统风格" => Self::Traditional,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A validated generation request
#[derive(Debug, Clone, Validate)]
pub struct GenerationRequest {
    #[validate(range(min = 1900, max = 2100))]
    pub year: i32,
    pub category: Category,
    pub style: Style,
    pub keyword: Option<String>,
}

/// Output of one generation; never stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub blessing_text: String,
    pub lunar_year_name: String,
    pub zodiac: String,
}

// ============================================================================
// Wire types
// ============================================================================

/// POST /generate body. Every field is optional.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct GenerateRequest {
    /// Integer, float or numeric string; defaults to 2025
    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<i32>, example = 2025)]
    pub year: Option<serde_json::Value>,
    #[schema(example = "朋友圈")]
    pub category: Option<String>,
    #[schema(example = "传统风格")]
    pub style: Option<String>,
    #[schema(example = "")]
    pub keyword: Option<String>,
}

// Keeps an explicit `null` distinguishable from a missing field
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

impl GenerateRequest {
    /// Apply defaults, parse the year and validate its range
    pub fn into_generation_request(self) -> ApiResult<GenerationRequest> {
        let year = match &self.year {
            None => i64::from(DEFAULT_YEAR),
            Some(raw) => parse_year(raw)?,
        };

        let year = i32::try_from(year).map_err(|_| ApiError::year_out_of_range(year))?;

        let keyword = self
            .keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string);

        let request = GenerationRequest {
            year,
            category: Category::from(self.category.as_deref().unwrap_or(DEFAULT_CATEGORY)),
            style: Style::from(self.style.as_deref().unwrap_or(DEFAULT_STYLE)),
            keyword,
        };

        request.validate().map_err(|_| ApiError::year_out_of_range(i64::from(year)))?;

        Ok(request)
    }
}

fn parse_year(raw: &serde_json::Value) -> ApiResult<i64> {
    match raw {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .ok_or_else(|| ApiError::invalid_year(n.to_string())),
        serde_json::Value::String(s) => {
            s.trim().parse::<i64>().map_err(|_| ApiError::invalid_year(s.clone()))
        },
        other => Err(ApiError::invalid_year(other.to_string())),
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateResponse {
    /// Generated text, or a readable failure message when the upstream call failed
    pub blessing: String,
    #[schema(example = "乙巳年")]
    pub lunar_year: String,
    #[schema(example = "蛇")]
    pub zodiac: String,
}

impl From<GenerationResult> for GenerateResponse {
    fn from(result: GenerationResult) -> Self {
        Self {
            blessing: result.blessing_text,
            lunar_year: result.lunar_year_name,
            zodiac: result.zodiac,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: &'static str,
}
