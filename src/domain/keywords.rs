use std::collections::BTreeSet;

pub const MENTAL_HEALTH_KEYWORDS: &[&str] = &[
    "mental", "mentally", "behavioural", "behavioral", "emotional", "psychiatry",
    "psychiatric", "psychiatrist", "psychology", "psychological", "psychologist",
    "counselling", "counseling", "counsellor", "counselor", "therapy", "therapist",
    "therapeutic", "psychotherapy", "psychotherapeutic", "psychotherapists", "depression",
    "depressed", "suicide", "suicidal", "anxiety", "anxious", "stress", "stressed", "trauma",
    "traumatised", "traumatized", "self-harm", "addiction", "addictive", "substance abuse",
    "alcoholism", "bipolar", "schizophrenia", "schizophrenic", "ocd",
    "obsessive compulsive disorder", "ptsd", "post-traumatic stress disorder", "adhd",
    "attention deficit hyperactivity disorder", "autism", "autistic", "isolation",
    "loneliness", "lonely", "wellbeing", "well-being", "mindfulness", "stressful", "coping",
    "cope", "stigma", "resilience", "discriminate", "discrimination", "discriminated",
];

pub const LGBT_KEYWORDS: &[&str] = &[
    "lgb", "lgbt", "lgbtq", "lgbtq+", "lgbtqia", "lgbtqia+", "lesbian", "gay", "homosexual",
    "homosexuality", "bisexual", "bisexuality", "transgender", "trans", "transwoman",
    "transwomen", "transman", "transmen", "transsexual", "transvestite", "non-binary",
    "nonbinary", "queer", "intersex", "sogie", "sogiesc", "sex", "sexual", "sexuality",
    "gender", "masculine", "masculinity", "feminine", "femininity",
];

/// Which keyword lists an article hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    MentalHealth,
    Lgbt,
    Both,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::MentalHealth => "mental-health",
            Category::Lgbt => "lgbt",
            Category::Both => "both",
        }
    }

    /// `None` when neither list hit
    pub fn from_hits(mental_health: bool, lgbt: bool) -> Option<Self> {
        match (mental_health, lgbt) {
            (true, true) => Some(Category::Both),
            (true, false) => Some(Category::MentalHealth),
            (false, true) => Some(Category::Lgbt),
            (false, false) => None,
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mental-health" | "mental_health" => Ok(Category::MentalHealth),
            "lgbt" => Ok(Category::Lgbt),
            "both" => Ok(Category::Both),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable, normalised set of search terms.
///
/// Terms are trimmed and lowercased; blanks and duplicates are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordList {
    terms: BTreeSet<String>,
}

impl KeywordList {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        Self { terms }
    }

    pub fn mental_health() -> Self {
        Self::new(MENTAL_HEALTH_KEYWORDS)
    }

    pub fn lgbt() -> Self {
        Self::new(LGBT_KEYWORDS)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
