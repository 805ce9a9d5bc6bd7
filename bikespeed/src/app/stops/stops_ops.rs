use super::{IntersectionLookup, IntersectionQuery, StopSignRecord, StopsError, StreetNameNormalizer};
use kdam::tqdm;
use regex::Regex;
use roxmltree::Document;
use std::path::Path;

pub const STOP_SIGN_TAG: &str = "Ch_950_Sch_27_CompulsoryStops";
pub const INTERSECTION_TAG: &str = "Intersection";
pub const STOP_STREET_TAG: &str = "Stop_Street_or_Highway";

const DETAIL_PATTERN: &str = r"\s*\((.+)\)\s*";

/// a compulsory stop as listed in the bylaw schedule.
#[derive(Clone, Debug, PartialEq)]
pub struct StopSignEntry {
    /// both streets of the intersection, joined by "and"
    pub intersection: String,
    /// the street traffic must stop on
    pub stop_street: String,
}

/// stop street and cross street names with their parenthesised details
/// removed.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitIntersection {
    pub stop_street: String,
    pub cross_street: String,
    pub stop_street_details: String,
    pub cross_street_details: String,
}

/// reads every stop sign entry of the bylaw schedule. entries missing the
/// intersection or the stop street are skipped.
pub fn read_stop_entries(xml: &str, filename: &str) -> Result<Vec<StopSignEntry>, StopsError> {
    let doc = Document::parse(xml).map_err(|e| StopsError::XmlError(filename.to_string(), e))?;
    let child_text = |node: &roxmltree::Node, tag: &str| {
        node.children()
            .find(|n| n.has_tag_name(tag))
            .and_then(|n| n.text())
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    };
    let mut entries = vec![];
    for (idx, node) in doc
        .root_element()
        .children()
        .filter(|n| n.has_tag_name(STOP_SIGN_TAG))
        .enumerate()
    {
        match (
            child_text(&node, INTERSECTION_TAG),
            child_text(&node, STOP_STREET_TAG),
        ) {
            (Some(intersection), Some(stop_street)) => entries.push(StopSignEntry {
                intersection,
                stop_street,
            }),
            _ => log::debug!("{filename} entry {idx} is missing a street, skipped"),
        }
    }
    Ok(entries)
}

/// separates the cross street from the intersection text and splits the
/// parenthesised details off both streets.
///
/// the cross street is the intersection with the stop street, its details
/// and the joining "and" removed, whichever side the stop street is on.
pub fn split_intersection(entry: &StopSignEntry) -> Result<SplitIntersection, StopsError> {
    let details = Regex::new(DETAIL_PATTERN)?;
    let detail_of = |s: &str| {
        details
            .captures(s)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    };

    let stop_street = details.replace_all(&entry.stop_street, "").into_owned();
    let stop_street_details = detail_of(&entry.stop_street);

    let escaped = regex::escape(&stop_street);
    let stop_first = Regex::new(&format!(r"{escaped}(\s*\(.*\))?\s*[Aa][Nn][Dd]\s*"))?;
    let stop_last = Regex::new(&format!(r"\s*[Aa][Nn][Dd]\s*{escaped}\s*(\(.*\))?"))?;
    let cross = stop_first.replace_all(&entry.intersection, "");
    let cross = stop_last.replace_all(&cross, "").into_owned();
    let cross_street_details = detail_of(&cross);
    let cross_street = details.replace_all(&cross, "").into_owned();

    Ok(SplitIntersection {
        stop_street,
        cross_street,
        stop_street_details,
        cross_street_details,
    })
}

/// builds the output record of one stop sign, locating it when the
/// intersection is in the lookup.
fn locate(
    entry: &StopSignEntry,
    normalizer: &StreetNameNormalizer,
    intersections: &IntersectionLookup,
) -> Result<StopSignRecord, StopsError> {
    let split = split_intersection(entry)?;
    let stop_street = normalizer.normalize(&split.stop_street);
    let cross_street = normalizer.normalize(&split.cross_street);
    let query = IntersectionQuery::new(&stop_street, &cross_street);
    let found = intersections.find(&query)?;
    if found.is_none() {
        log::debug!(
            "can't find intersection {stop_street} - {cross_street} ({} / {})",
            entry.intersection,
            entry.stop_street
        );
    }
    Ok(StopSignRecord {
        stop_street,
        cross_street,
        stop_street_details: split.stop_street_details,
        cross_street_details: split.cross_street_details,
        has_coordinates: found.is_some(),
        longitude: found.map(|r| r.longitude),
        latitude: found.map(|r| r.latitude),
    })
}

/// extracts the compulsory stops of a bylaw schedule into a CSV, geocoded
/// against the centreline intersections when given.
///
/// # Returns
///
/// the number of stop signs written
pub fn run(
    xml_file: &Path,
    intersection_file: Option<&Path>,
    output_file: &Path,
) -> Result<usize, StopsError> {
    let filename = xml_file.to_string_lossy().to_string();
    let xml = std::fs::read_to_string(xml_file)?;
    let entries = read_stop_entries(&xml, &filename)?;
    let intersections = match intersection_file {
        Some(f) => IntersectionLookup::from_csv(f)?,
        None => {
            log::warn!("no intersection file provided, stop signs will not be located");
            IntersectionLookup::default()
        }
    };
    let normalizer = StreetNameNormalizer::new()?;

    let out_filename = output_file.to_string_lossy().to_string();
    let mut writer = csv::Writer::from_path(output_file)
        .map_err(|e| StopsError::CsvWriteError(out_filename.clone(), e))?;
    let mut located = 0;
    for entry in tqdm!(entries.iter(), desc = "locate stop signs") {
        let record = locate(entry, &normalizer, &intersections)?;
        if record.has_coordinates {
            located += 1;
        }
        writer
            .serialize(&record)
            .map_err(|e| StopsError::CsvWriteError(out_filename.clone(), e))?;
    }
    writer.flush()?;
    eprintln!();
    log::info!(
        "wrote {} stop signs to {out_filename}, {located} located",
        entries.len()
    );
    Ok(entries.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::stops::IntersectionRow;

    fn entry(intersection: &str, stop_street: &str) -> StopSignEntry {
        StopSignEntry {
            intersection: intersection.to_string(),
            stop_street: stop_street.to_string(),
        }
    }

    #[test]
    fn cross_street_after_stop_street() {
        let split = split_intersection(&entry(
            "Acacia Road and Millwood Road (south intersection)",
            "Acacia Road",
        ))
        .expect("split");
        assert_eq!(split.stop_street, "Acacia Road");
        assert_eq!(split.cross_street, "Millwood Road");
        assert_eq!(split.stop_street_details, "");
        assert_eq!(split.cross_street_details, "south intersection");
    }

    #[test]
    fn same_street_with_details() {
        let split = split_intersection(&entry(
            "Acheson Boulevard (southern east-west leg) and Acheson Boulevard (north-south leg)",
            "Acheson Boulevard (southern east-west leg)",
        ))
        .expect("split");
        assert_eq!(split.stop_street, "Acheson Boulevard");
        assert_eq!(split.stop_street_details, "southern east-west leg");
        assert_eq!(split.cross_street, "Acheson Boulevard");
        assert_eq!(split.cross_street_details, "north-south leg");
    }

    #[test]
    fn cross_street_before_stop_street() {
        let split = split_intersection(&entry("Bayview Avenue and Millwood Road", "Millwood Road"))
            .expect("split");
        assert_eq!(split.cross_street, "Bayview Avenue");
    }

    #[test]
    fn skips_incomplete_entries() {
        let xml = format!(
            "<DATA>\
               <{STOP_SIGN_TAG}><{INTERSECTION_TAG}>Acacia Road and Millwood Road</{INTERSECTION_TAG}>\
                 <{STOP_STREET_TAG}>Acacia Road</{STOP_STREET_TAG}></{STOP_SIGN_TAG}>\
               <{STOP_SIGN_TAG}><{INTERSECTION_TAG}>Main Street and Gerrard Street East</{INTERSECTION_TAG}></{STOP_SIGN_TAG}>\
               <{STOP_SIGN_TAG}><{INTERSECTION_TAG}>A and B</{INTERSECTION_TAG}><{STOP_STREET_TAG}/></{STOP_SIGN_TAG}>\
             </DATA>"
        );
        let entries = read_stop_entries(&xml, "stops.xml").expect("valid xml");
        assert_eq!(entries, vec![entry("Acacia Road and Millwood Road", "Acacia Road")]);
    }

    #[test]
    fn locates_normalized_names() {
        let intersections = IntersectionLookup::new(vec![IntersectionRow {
            name: String::from("Millwood Rd / Acacia Rd"),
            longitude: -79.37,
            latitude: 43.70,
        }]);
        let normalizer = StreetNameNormalizer::new().expect("rules");
        let record = locate(
            &entry("Acacia Road and Millwood Road (south intersection)", "Acacia Road"),
            &normalizer,
            &intersections,
        )
        .expect("locate");
        assert_eq!(record.stop_street, "Acacia Rd");
        assert_eq!(record.cross_street, "Millwood Rd");
        assert!(record.has_coordinates);
        assert_eq!(record.longitude, Some(-79.37));
    }

    #[test]
    fn run_writes_named_headers() {
        let dir = tempfile::tempdir().expect("temp dir");
        let xml_file = dir.path().join("stops.xml");
        std::fs::write(
            &xml_file,
            format!(
                "<DATA><{STOP_SIGN_TAG}><{INTERSECTION_TAG}>Bayview Avenue and Millwood Road</{INTERSECTION_TAG}>\
                 <{STOP_STREET_TAG}>Millwood Road</{STOP_STREET_TAG}></{STOP_SIGN_TAG}></DATA>"
            ),
        )
        .expect("write xml");
        let output_file = dir.path().join("Stop Signs.csv");
        let written = run(&xml_file, None, &output_file).expect("run");
        assert_eq!(written, 1);
        let contents = std::fs::read_to_string(&output_file).expect("read output");
        let mut lines = contents.lines();
        assert_eq!(
            lines.next(),
            Some("Stop Street,Cross Street,Stop Street Location Details,Cross Street Location Details,Has lat/lon coordinates,Longitude,Latitude")
        );
        assert_eq!(lines.next(), Some("Millwood Rd,Bayview Ave,,,false,,"));
    }
}
