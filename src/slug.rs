//! Lookup URL derivation for codigo-postal.co
//!
//! The site names its pages `<base>/<state>/<city>/` using lower-case,
//! hyphenated names. A handful of places are spelled differently on the site
//! than in the reference table; those are handled by [`SLUG_RULES`].

/// Which half of the (state, city) pair a rule inspects and rewrites
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlugPart {
    State,
    City,
}

/// A rewrite applied when the normalized value contains `pattern`
#[derive(Debug, Clone, Copy)]
pub struct SlugRule {
    pub part: SlugPart,
    pub pattern: &'static str,
    pub replacement: &'static str,
}

/// Site naming quirks, applied in order
pub const SLUG_RULES: &[SlugRule] = &[
    SlugRule {
        part: SlugPart::State,
        pattern: "washington-dc",
        replacement: "district-of-columbia",
    },
    SlugRule {
        part: SlugPart::State,
        pattern: "virgin-islands",
        replacement: "united-states-virgin-islands",
    },
    SlugRule {
        part: SlugPart::City,
        pattern: "deptford",
        replacement: "deptford-township",
    },
    SlugRule {
        part: SlugPart::City,
        pattern: "dewey-beach",
        replacement: "dewey-bch",
    },
    SlugRule {
        part: SlugPart::City,
        pattern: "luke-air",
        replacement: "luke-afb",
    },
];

/// Lower-case, drop punctuation other than `-`, and hyphenate spaces
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| *c == '-' || !c.is_ascii_punctuation())
        .map(|c| if c == ' ' { '-' } else { c })
        .collect()
}

/// Derive the lookup page URL for a city. `base` is expected to end in `/`.
pub fn url_for(base: &str, city: &str, state_full: &str) -> String {
    let mut city = slugify(city);
    let mut state = slugify(state_full);

    for rule in SLUG_RULES {
        let target = match rule.part {
            SlugPart::State => &mut state,
            SlugPart::City => &mut city,
        };
        if target.contains(rule.pattern) {
            *target = rule.replacement.to_string();
        }
    }

    format!("{}{}/{}/", base, state, city)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://codigo-postal.co/eeuu/";

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("New York"), "new-york");
        assert_eq!(slugify("St. Mary's"), "st-marys");
        assert_eq!(slugify("Wilkes-Barre"), "wilkes-barre");
        assert_eq!(slugify("Winston-Salem (Twin City)"), "winston-salem-twin-city");
    }

    #[test]
    fn test_url_for_plain_city() {
        assert_eq!(
            url_for(BASE, "Holtsville", "New York"),
            "https://codigo-postal.co/eeuu/new-york/holtsville/"
        );
    }

    #[test]
    fn test_url_for_is_deterministic() {
        let first = url_for(BASE, "Coeur d'Alene", "Idaho");
        let second = url_for(BASE, "Coeur d'Alene", "Idaho");
        assert_eq!(first, second);
        assert_eq!(first, "https://codigo-postal.co/eeuu/idaho/coeur-dalene/");
    }

    #[test]
    fn test_url_for_state_rules() {
        assert_eq!(
            url_for(BASE, "Washington", "Washington Dc"),
            "https://codigo-postal.co/eeuu/district-of-columbia/washington/"
        );
        assert_eq!(
            url_for(BASE, "Charlotte Amalie", "Virgin Islands"),
            "https://codigo-postal.co/eeuu/united-states-virgin-islands/charlotte-amalie/"
        );
    }

    #[test]
    fn test_url_for_city_rules() {
        assert_eq!(
            url_for(BASE, "Deptford", "New Jersey"),
            "https://codigo-postal.co/eeuu/new-jersey/deptford-township/"
        );
        assert_eq!(
            url_for(BASE, "Dewey Beach", "Delaware"),
            "https://codigo-postal.co/eeuu/delaware/dewey-bch/"
        );
        assert_eq!(
            url_for(BASE, "Luke Air Force Base", "Arizona"),
            "https://codigo-postal.co/eeuu/arizona/luke-afb/"
        );
    }

    #[test]
    fn test_rules_match_substrings() {
        // "West Deptford" contains "deptford", so the whole city is replaced
        assert_eq!(
            url_for(BASE, "West Deptford", "New Jersey"),
            "https://codigo-postal.co/eeuu/new-jersey/deptford-township/"
        );
    }
}
