use super::StopsError;
use regex::Regex;

/// street type spellings in bylaw text and their centreline abbreviations.
const STREET_TYPES: [(&str, &str); 19] = [
    (r"\s[Rr]oad", " Rd"),
    (r"\s[Ss]treet", " St"),
    (r"\s[Aa]venue", " Ave"),
    (r"\s[Bb]oulevard", " Blvd"),
    (r"\s[Pp]lace", " Pl"),
    (r"\s[Cc]ircle", " Crcl"),
    (r"\s[Dd]rive", " Dr"),
    (r"\s[Gg]ate$", " Gt"),
    (r"\s[Cc]rescent$", " Cres"),
    (r"\s[Cc]ourt$", " Crt"),
    (r"\s[Gg]rove$", " Grv"),
    (r"\s[Tt]errace$", " Ter"),
    (r"\s[Gg]ardens$", " Gdns"),
    (r"\s[Ss]quare$", " Sq"),
    (r"\s[Ll]awn$", " Lwn"),
    (r"\s[Tt]rail", " Trl"),
    (r"\s[Hh]eights$", " Hts"),
    (r"\s[Pp]ark$", " Pk"),
    (r"\s[Pp]arkway$", " Pkwy"),
];

const DIRECTIONS: [(&str, &str); 4] = [
    ("[Nn]orth$", "N"),
    ("[Ss]outh$", "S"),
    ("[Ee]ast$", "E"),
    ("[Ww]est$", "W"),
];

/// rewrites bylaw street names into the abbreviated form used by the
/// centreline intersection names. rules apply in order.
pub struct StreetNameNormalizer {
    rules: Vec<(Regex, &'static str)>,
}

impl StreetNameNormalizer {
    pub fn new() -> Result<StreetNameNormalizer, StopsError> {
        let rules = STREET_TYPES
            .iter()
            .chain(DIRECTIONS.iter())
            .chain([(r"St\.", "St")].iter())
            .map(|(pattern, replacement)| -> Result<_, StopsError> {
                Ok((Regex::new(pattern)?, *replacement))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(StreetNameNormalizer { rules })
    }

    pub fn normalize(&self, street_name: &str) -> String {
        self.rules
            .iter()
            .fold(street_name.to_string(), |name, (re, replacement)| {
                re.replace_all(&name, *replacement).into_owned()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::StreetNameNormalizer;

    #[test]
    fn abbreviates_street_types() {
        let n = StreetNameNormalizer::new().expect("valid rules");
        assert_eq!(n.normalize("Millwood Road"), "Millwood Rd");
        assert_eq!(n.normalize("Acheson Boulevard"), "Acheson Blvd");
        assert_eq!(n.normalize("Bayview Avenue"), "Bayview Ave");
        assert_eq!(n.normalize("Glen Park"), "Glen Pk");
    }

    #[test]
    fn abbreviates_trailing_direction() {
        let n = StreetNameNormalizer::new().expect("valid rules");
        assert_eq!(n.normalize("Yonge Street North"), "Yonge St N");
        assert_eq!(n.normalize("Queen Street West"), "Queen St W");
        assert_eq!(n.normalize("Northcliffe Boulevard"), "Northcliffe Blvd");
    }

    #[test]
    fn anchored_types_only_at_end() {
        let n = StreetNameNormalizer::new().expect("valid rules");
        assert_eq!(n.normalize("Court Gate"), "Court Gt");
        assert_eq!(n.normalize("Crescent Town Road"), "Crescent Town Rd");
        assert_eq!(n.normalize("St. Clair Avenue"), "St Clair Ave");
    }
}
