use url::Url;

/// A downloaded article, alive for one pipeline iteration.
#[derive(Debug, Clone)]
pub struct ArticleDocument {
    pub url: Url,
    pub raw_html: String,
    pub plain_text: String,
}

impl ArticleDocument {
    pub fn new(url: Url, raw_html: String, plain_text: String) -> Self {
        Self {
            url,
            raw_html,
            plain_text,
        }
    }
}
