use fd_db::models::{CardChanges, NewCard};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCardRequest {
    #[validate(length(min = 1, max = 1000, message = "Front side must be between 1 and 1000 characters"))]
    pub front: String,
    #[validate(length(min = 1, max = 1000, message = "Back side must be between 1 and 1000 characters"))]
    pub back: String,
    #[serde(default)]
    pub order: Option<i32>,
}

impl From<CreateCardRequest> for NewCard {
    fn from(req: CreateCardRequest) -> Self {
        Self {
            front: req.front,
            back: req.back,
            order: req.order,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BatchCreateCardsRequest {
    #[validate(length(min = 1, message = "At least one card is required"), nested)]
    pub cards: Vec<CreateCardRequest>,
}

/// Partial update; omitted fields keep their value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCardRequest {
    #[validate(length(min = 1, max = 1000, message = "Front side must be between 1 and 1000 characters"))]
    pub front: Option<String>,
    #[validate(length(min = 1, max = 1000, message = "Back side must be between 1 and 1000 characters"))]
    pub back: Option<String>,
    pub order: Option<i32>,
}

impl From<UpdateCardRequest> for CardChanges {
    fn from(req: UpdateCardRequest) -> Self {
        Self {
            front: req.front,
            back: req.back,
            order: req.order,
        }
    }
}

/// Response for batch inserts
#[derive(Debug, Clone, Serialize)]
pub struct BatchCreated<T> {
    pub count: usize,
    pub cards: Vec<T>,
}
