//! Vocabulary tagging - find known country and UN body names in raw text.
//!
//! Independent of the recognition model: a case-sensitive, word-bounded
//! regex scan over a fixed vocabulary.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use crate::error::{DigestError, Result};

/// UN member states.
pub const COUNTRIES: &[&str] = &[
    "Afghanistan", "Albania", "Algeria", "Andorra", "Angola", "Antigua and Barbuda",
    "Argentina", "Armenia", "Australia", "Austria", "Azerbaijan", "Bahamas", "Bahrain",
    "Bangladesh", "Barbados", "Belarus", "Belgium", "Belize", "Benin", "Bhutan", "Bolivia",
    "Bosnia and Herzegovina", "Botswana", "Brazil", "Brunei Darussalam", "Bulgaria",
    "Burkina Faso", "Burundi", "Cabo Verde", "Cambodia", "Cameroon", "Canada",
    "Central African Republic", "Chad", "Chile", "China", "Colombia", "Comoros", "Congo",
    "Costa Rica", "Côte d'Ivoire", "Croatia", "Cuba", "Cyprus", "Czechia",
    "Democratic People's Republic of Korea", "Democratic Republic of the Congo", "Denmark",
    "Djibouti", "Dominica", "Dominican Republic", "Ecuador", "Egypt", "El Salvador",
    "Equatorial Guinea", "Eritrea", "Estonia", "Eswatini", "Ethiopia", "Fiji", "Finland",
    "France", "Gabon", "Gambia", "Georgia", "Germany", "Ghana", "Greece", "Grenada",
    "Guatemala", "Guinea", "Guinea-Bissau", "Guyana", "Haiti", "Honduras", "Hungary",
    "Iceland", "India", "Indonesia", "Iran", "Iraq", "Ireland", "Israel", "Italy", "Jamaica",
    "Japan", "Jordan", "Kazakhstan", "Kenya", "Kiribati", "Kuwait", "Kyrgyzstan",
    "Lao People's Democratic Republic", "Latvia", "Lebanon", "Lesotho", "Liberia", "Libya",
    "Liechtenstein", "Lithuania", "Luxembourg", "Madagascar", "Malawi", "Malaysia",
    "Maldives", "Mali", "Malta", "Marshall Islands", "Mauritania", "Mauritius", "Mexico",
    "Micronesia", "Monaco", "Mongolia", "Montenegro", "Morocco", "Mozambique", "Myanmar",
    "Namibia", "Nauru", "Nepal", "Netherlands", "New Zealand", "Nicaragua", "Niger",
    "Nigeria", "North Macedonia", "Norway", "Oman", "Pakistan", "Palau", "Panama",
    "Papua New Guinea", "Paraguay", "Peru", "Philippines", "Poland", "Portugal", "Qatar",
    "Republic of Korea", "Republic of Moldova", "Romania", "Russian Federation", "Rwanda",
    "Saint Kitts and Nevis", "Saint Lucia", "Saint Vincent and the Grenadines", "Samoa",
    "San Marino", "Sao Tome and Principe", "Saudi Arabia", "Senegal", "Serbia", "Seychelles",
    "Sierra Leone", "Singapore", "Slovakia", "Slovenia", "Solomon Islands", "Somalia",
    "South Africa", "South Sudan", "Spain", "Sri Lanka", "Sudan", "Suriname", "Sweden",
    "Switzerland", "Syrian Arab Republic", "Tajikistan", "Thailand", "Timor-Leste", "Togo",
    "Tonga", "Trinidad and Tobago", "Tunisia", "Türkiye", "Turkmenistan", "Tuvalu", "Uganda",
    "Ukraine", "United Arab Emirates", "United Kingdom", "United Republic of Tanzania",
    "United States", "Uruguay", "Uzbekistan", "Vanuatu", "Venezuela", "Viet Nam", "Yemen",
    "Zambia", "Zimbabwe",
];

/// Principal organs, funds, programmes and specialized agencies.
pub const UN_BODIES: &[&str] = &[
    "General Assembly", "Security Council", "Economic and Social Council",
    "Trusteeship Council", "International Court of Justice", "Secretariat",
    "Human Rights Council", "UNICEF", "UNDP", "UNEP", "UNFPA", "UNHCR", "UNRWA", "UN-Habitat",
    "UN Women", "WFP", "World Food Programme", "WHO", "World Health Organization", "UNESCO",
    "FAO", "Food and Agriculture Organization", "ILO", "IMF", "World Bank", "IAEA", "UNCTAD",
    "OHCHR", "UNODC", "UNOPS", "UNIDO", "IFAD", "ITU", "UPU", "WMO", "WIPO", "ICAO", "IMO",
    "UNWTO", "UNAIDS", "OCHA", "UNITAR", "UNU",
];

static COUNTRY_TAGGER: LazyLock<TagExtractor> =
    LazyLock::new(|| TagExtractor::new(COUNTRIES).expect("country vocabulary compiles"));

static UN_BODY_TAGGER: LazyLock<TagExtractor> =
    LazyLock::new(|| TagExtractor::new(UN_BODIES).expect("UN body vocabulary compiles"));

/// Finds vocabulary terms in text.
#[derive(Debug, Clone)]
pub struct TagExtractor {
    pattern: Option<Regex>,
}

impl TagExtractor {
    /// Build an extractor for a vocabulary.
    ///
    /// Longer names are tried first so "South Sudan" is not reported as
    /// "Sudan".
    pub fn new<S: AsRef<str>>(vocabulary: &[S]) -> Result<Self> {
        let mut names: Vec<&str> = vocabulary
            .iter()
            .map(AsRef::as_ref)
            .filter(|n| !n.is_empty())
            .collect();
        if names.is_empty() {
            return Ok(Self { pattern: None });
        }
        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        names.dedup();

        let alternation = names
            .iter()
            .map(|n| regex::escape(n))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"\b(?:{alternation})\b"))
            .map_err(|e| DigestError::Config(format!("invalid tag vocabulary: {e}")))?;

        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// Shared extractor over [`COUNTRIES`].
    pub fn countries() -> &'static TagExtractor {
        &COUNTRY_TAGGER
    }

    /// Shared extractor over [`UN_BODIES`].
    pub fn un_bodies() -> &'static TagExtractor {
        &UN_BODY_TAGGER
    }

    /// Sorted, deduplicated vocabulary terms found in `text`.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let Some(pattern) = &self.pattern else {
            return Vec::new();
        };

        pattern
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_sorted_unique_countries() {
        let text = "Mali and Chad signed; Mali later joined Niger, not Nigeria.";
        assert_eq!(
            TagExtractor::countries().extract(text),
            vec!["Chad", "Mali", "Niger", "Nigeria"]
        );
    }

    #[test]
    fn test_prefers_longest_name() {
        let text = "Aid reached South Sudan and Papua New Guinea.";
        assert_eq!(
            TagExtractor::countries().extract(text),
            vec!["Papua New Guinea", "South Sudan"]
        );
    }

    #[test]
    fn test_word_boundaries_and_case() {
        let tagger = TagExtractor::un_bodies();
        // "WHO" must be uppercase, "WFPs" is not a whole word
        assert_eq!(tagger.extract("who said WFPs would help"), Vec::<String>::new());
        assert_eq!(
            tagger.extract("WHO and UNICEF briefed the Security Council."),
            vec!["Security Council", "UNICEF", "WHO"]
        );
    }

    #[test]
    fn test_punctuated_names() {
        let text = "Côte d'Ivoire and Guinea-Bissau hosted UN-Habitat.";
        assert_eq!(
            TagExtractor::countries().extract(text),
            vec!["Côte d'Ivoire", "Guinea-Bissau"]
        );
        assert_eq!(TagExtractor::un_bodies().extract(text), vec!["UN-Habitat"]);
    }

    #[test]
    fn test_custom_and_empty_vocabulary() {
        let tagger = TagExtractor::new(&["Geneva", "Nairobi"]).unwrap();
        assert_eq!(tagger.extract("From Nairobi to Geneva"), vec!["Geneva", "Nairobi"]);

        let empty = TagExtractor::new::<&str>(&[]).unwrap();
        assert!(empty.extract("Geneva").is_empty());
    }
}
