pub mod feed_entry;
pub mod article;
pub mod keywords;
pub mod match_record;

pub use feed_entry::FeedEntry;
pub use article::ArticleDocument;
pub use keywords::{Category, KeywordList};
pub use match_record::{MatchRecord, KEYWORD_SEPARATOR};
