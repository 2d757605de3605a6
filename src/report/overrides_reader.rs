// Manual institute classifications, maintained by hand next to the summary.
//
// The file is a flat JSON object mapping an institute label to one of
// "Scuola", "Università", "ITS" or "Altro". It is optional: any problem
// reading it is logged and the heuristic is used alone.

use crate::report::*;

pub fn load_overrides(path: Option<&str>) -> Option<InstituteOverrideTable> {
    let path = path?;
    info!("Attempting to read institute overrides {:?}", path);
    let contents = match fs::read_to_string(path) {
        Ok(x) => x,
        Err(e) => {
            warn!("load_overrides: cannot open {:?}: {}", path, e);
            return None;
        }
    };
    match serde_json::from_str::<JSMap<String, JSValue>>(&contents) {
        Ok(js) => Some(parse_overrides(&js)),
        Err(e) => {
            warn!("load_overrides: cannot parse {:?}: {}", path, e);
            None
        }
    }
}

pub fn parse_overrides(js: &JSMap<String, JSValue>) -> InstituteOverrideTable {
    let mut table = InstituteOverrideTable::new();
    for (label, value) in js.iter() {
        let parsed = value
            .as_str()
            .map(|s| s.parse::<Category>().map_err(|e| e.to_string()))
            .unwrap_or_else(|| Err(format!("not a string: {}", value)));
        match parsed {
            Ok(cat) => table.insert(label, cat),
            Err(e) => warn!("parse_overrides: skipping {:?}: {}", label, e),
        }
    }
    debug!("parse_overrides: {} entries", table.len());
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_unknown_categories() {
        let js: JSMap<String, JSValue> = serde_json::from_str(
            r#"{"Liceo Galilei": "Università", "ITS Kennedy": "its", "Boh": "Palestra", "X": 3}"#,
        )
        .unwrap();
        let table = parse_overrides(&js);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("liceo galilei"), Some(Category::Universita));
        assert_eq!(table.get("ITS Kennedy"), Some(Category::Its));
        assert_eq!(table.get("Boh"), None);
    }

    #[test]
    fn missing_file_is_not_an_error() {
        assert!(load_overrides(None).is_none());
        assert!(load_overrides(Some("/nonexistent/overrides.json")).is_none());
    }
}
