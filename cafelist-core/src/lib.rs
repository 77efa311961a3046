//! cafelist-core: domain logic for the café listing service
//!
//! Pure, synchronous building blocks shared by the server and CLI:
//! validated domain newtypes, the category-association consistency
//! validator, and the TF-IDF similarity recommender. No I/O lives here.

pub mod association;
pub mod domain;
pub mod recommend;
pub mod text;
pub mod validation;

pub use association::{plan_associations, AssociationError, AssociationPlan};
pub use domain::{CafeTitle, CategoryName, CityName, ImageUrl};
pub use recommend::{recommend_similar, CafeDoc, RecommendError};
pub use validation::ValidationError;
