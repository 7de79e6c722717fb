use fd_db::models::{DeckChanges, NewDeck};
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDeckRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be between 1 and 100 characters"))]
    pub title: String,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

impl From<CreateDeckRequest> for NewDeck {
    fn from(req: CreateDeckRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            is_public: req.is_public,
        }
    }
}

/// Partial update; omitted fields keep their value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateDeckRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be between 1 and 100 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

impl From<UpdateDeckRequest> for DeckChanges {
    fn from(req: UpdateDeckRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            is_public: req.is_public,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_defaults_to_private() {
        let req: CreateDeckRequest = serde_json::from_str(r#"{"title":"Spanish"}"#).unwrap();
        assert!(!req.is_public);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_title_bounds() {
        let empty = CreateDeckRequest {
            title: String::new(),
            description: None,
            is_public: false,
        };
        assert!(empty.validate().is_err());

        let long = CreateDeckRequest {
            title: "x".repeat(101),
            ..empty.clone()
        };
        assert!(long.validate().is_err());

        let max = CreateDeckRequest {
            title: "é".repeat(100),
            ..empty
        };
        assert!(max.validate().is_ok(), "length counts characters, not bytes");
    }

    #[test]
    fn test_description_bound() {
        let req = CreateDeckRequest {
            title: "Deck".into(),
            description: Some("d".repeat(501)),
            is_public: false,
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("description"));
    }

    #[test]
    fn test_update_only_checks_present_fields() {
        assert!(UpdateDeckRequest::default().validate().is_ok());

        let blank_title = UpdateDeckRequest {
            title: Some(String::new()),
            ..UpdateDeckRequest::default()
        };
        assert!(blank_title.validate().is_err());
    }
}
