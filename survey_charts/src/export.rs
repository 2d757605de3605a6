use crate::config::StatsModel;

pub const CSV_HEADER: [&str; 6] = ["codice", "label", "media", "count", "min", "max"];

/// One row per question: key, label, average (two decimals), count, min and max.
pub fn to_csv(model: &StatsModel) -> String {
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(model.questions.len() + 1);
    rows.push(CSV_HEADER.iter().map(|s| s.to_string()).collect());
    for q in model.questions.iter() {
        rows.push(vec![
            q.key.clone(),
            q.display_label().to_string(),
            format!("{:.2}", q.avg),
            q.count.to_string(),
            q.min.to_string(),
            q.max.to_string(),
        ]);
    }

    let mut csv = String::new();
    for row in rows {
        let line = row
            .iter()
            .map(|field| escape_csv(field))
            .collect::<Vec<_>>()
            .join(",");
        csv.push_str(&line);
        csv.push('\n');
    }
    csv
}

fn escape_csv(value: &str) -> String {
    let needs_quotes = value.contains(',') || value.contains('"') || value.contains('\n');
    if needs_quotes {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::*;

    fn question(key: &str, label: Option<&str>, avg: f64, count: u64) -> QuestionStat {
        QuestionStat {
            key: key.to_string(),
            label: label.map(|s| s.to_string()),
            count,
            avg,
            min: 1,
            max: 5,
            std: None,
            median: None,
            distribution: Distribution::new(),
        }
    }

    #[test]
    fn two_questions_three_lines() {
        let model = StatsModel {
            total_responses: 50,
            questions: vec![
                question("q_utilita", Some("Utilità"), 4.2, 50),
                question("q_chiarezza", Some("Chiarezza"), 3.456, 48),
            ],
            ..StatsModel::default()
        };
        let csv = to_csv(&model);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "codice,label,media,count,min,max");
        assert_eq!(lines[1], "q_utilita,Utilità,4.20,50,1,5");
        assert_eq!(lines[2], "q_chiarezza,Chiarezza,3.46,48,1,5");
    }

    #[test]
    fn labels_are_escaped_and_default_to_key() {
        let model = StatsModel {
            questions: vec![
                question("q1", Some("Tempi, modi e \"qualità\""), 3.0, 2),
                question("q2", None, 1.0, 1),
            ],
            ..StatsModel::default()
        };
        let csv = to_csv(&model);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[1], "q1,\"Tempi, modi e \"\"qualità\"\"\",3.00,2,1,5");
        assert_eq!(lines[2], "q2,q2,1.00,1,1,5");
    }

    #[test]
    fn empty_model_has_header_only() {
        assert_eq!(to_csv(&StatsModel::default()), "codice,label,media,count,min,max\n");
    }
}
