//! Keyword scanner for news feeds.
//!
//! Reads an RSS/Atom feed, downloads each linked article, reduces it to plain
//! text and records the articles that mention any configured mental-health or
//! LGBT keyword in a CSV summary plus one text file per article.

pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod extract;
pub mod matcher;
pub mod services;
pub mod sources;
pub mod storage;
