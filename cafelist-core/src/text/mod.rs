//! Text vectorization and similarity metrics

pub mod similarity;
pub mod tfidf;

pub use similarity::cosine_similarity;
pub use tfidf::TfidfVectorizer;
