/// Menu data model shared by the client and the screen controller
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::MenuError;

/// Placeholder for a meal the server did not report.
pub const NOT_AVAILABLE: &str = "N/A";

/// Value sent in `newMeal` to ask the server for a random pick.
pub const RANDOM_MEAL: &str = "random";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealCategory {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealCategory {
    /// Row order on screen, top to bottom.
    pub const ALL: [MealCategory; 3] = [
        MealCategory::Breakfast,
        MealCategory::Lunch,
        MealCategory::Dinner,
    ];

    /// Wire name used by the menu server.
    pub fn as_str(self) -> &'static str {
        match self {
            MealCategory::Breakfast => "breakfast",
            MealCategory::Lunch => "lunch",
            MealCategory::Dinner => "dinner",
        }
    }

    /// Row label drawn at the left margin.
    pub fn label(self) -> &'static str {
        match self {
            MealCategory::Breakfast => "Breakfast:",
            MealCategory::Lunch => "Lunch:",
            MealCategory::Dinner => "Dinner:",
        }
    }

    pub fn index(self) -> usize {
        match self {
            MealCategory::Breakfast => 0,
            MealCategory::Lunch => 1,
            MealCategory::Dinner => 2,
        }
    }
}

impl std::fmt::Display for MealCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three meals served on one date.
///
/// Only ever built whole from a parsed server response, never patched field
/// by field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOfDay {
    pub date: String,
    pub breakfast: String,
    pub lunch: String,
    pub dinner: String,
}

impl MenuOfDay {
    pub fn meal(&self, category: MealCategory) -> &str {
        match category {
            MealCategory::Breakfast => &self.breakfast,
            MealCategory::Lunch => &self.lunch,
            MealCategory::Dinner => &self.dinner,
        }
    }
}

/// Parse a `/getMenu` response body for `date`.
///
/// Missing, null or non-string fields fall back to [`NOT_AVAILABLE`]. A body
/// that is not valid JSON, or whose top level is not an object, is a parse
/// error.
pub fn parse_menu(date: &str, body: &[u8]) -> Result<MenuOfDay, MenuError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| MenuError::Parse(e.to_string()))?;
    let fields = value
        .as_object()
        .ok_or_else(|| MenuError::Parse("expected a JSON object".to_string()))?;

    let field = |category: MealCategory| {
        fields
            .get(category.as_str())
            .and_then(Value::as_str)
            .unwrap_or(NOT_AVAILABLE)
            .to_string()
    };

    Ok(MenuOfDay {
        date: date.to_string(),
        breakfast: field(MealCategory::Breakfast),
        lunch: field(MealCategory::Lunch),
        dinner: field(MealCategory::Dinner),
    })
}

/// Body of a `/changeMeal` request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeMealRequest<'a> {
    pub date: &'a str,
    pub category: MealCategory,
    pub new_meal: &'a str,
}

impl<'a> ChangeMealRequest<'a> {
    pub fn random(date: &'a str, category: MealCategory) -> Self {
        Self {
            date,
            category,
            new_meal: RANDOM_MEAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_menu() {
        let body = br#"{"breakfast":"Pancakes","lunch":"Soup","dinner":"Curry"}"#;
        let menu = parse_menu("2024-06-01", body).unwrap();
        assert_eq!(menu.date, "2024-06-01");
        assert_eq!(menu.breakfast, "Pancakes");
        assert_eq!(menu.lunch, "Soup");
        assert_eq!(menu.dinner, "Curry");
    }

    #[test]
    fn test_missing_fields_default() {
        let body = br#"{"breakfast":"Oatmeal","lunch":"Salad"}"#;
        let menu = parse_menu("2024-06-01", body).unwrap();
        assert_eq!(menu.breakfast, "Oatmeal");
        assert_eq!(menu.lunch, "Salad");
        assert_eq!(menu.dinner, NOT_AVAILABLE);

        let empty = parse_menu("2024-06-01", b"{}").unwrap();
        for category in MealCategory::ALL {
            assert_eq!(empty.meal(category), NOT_AVAILABLE);
        }
    }

    #[test]
    fn test_null_and_non_string_fields_default() {
        let body = br#"{"breakfast":null,"lunch":42,"dinner":"Stew","extra":"ignored"}"#;
        let menu = parse_menu("2024-06-01", body).unwrap();
        assert_eq!(menu.breakfast, NOT_AVAILABLE);
        assert_eq!(menu.lunch, NOT_AVAILABLE);
        assert_eq!(menu.dinner, "Stew");
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(
            parse_menu("2024-06-01", br#"{"breakfast": "Eggs""#),
            Err(MenuError::Parse(_))
        ));
        assert!(matches!(
            parse_menu("2024-06-01", b"<html>oops</html>"),
            Err(MenuError::Parse(_))
        ));
        assert!(matches!(
            parse_menu("2024-06-01", b"[1,2,3]"),
            Err(MenuError::Parse(_))
        ));
    }

    #[test]
    fn test_change_request_body() {
        let req = ChangeMealRequest::random("2024-06-01", MealCategory::Lunch);
        let json: Value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "date": "2024-06-01",
                "category": "lunch",
                "newMeal": "random"
            })
        );
    }

    #[test]
    fn test_category_names() {
        assert_eq!(MealCategory::Breakfast.to_string(), "breakfast");
        assert_eq!(MealCategory::Dinner.label(), "Dinner:");
        let indices: Vec<usize> = MealCategory::ALL.iter().map(|c| c.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }
}
