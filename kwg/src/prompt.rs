use kwg_core::topics::{exclude, format_topics, parse_exclusion};
use kwg_core::Topic;
use std::io::{self, BufRead, Write};

/// Lists the topics and reads the numbers to exclude, asking again after
/// invalid input. End of input keeps every topic.
pub fn ask_exclusion<R: BufRead, W: Write>(topics: Vec<Topic>, input: &mut R, out: &mut W) -> io::Result<Vec<Topic>> {
    writeln!(out, "Topics generated:")?;
    write!(out, "{}", format_topics(&topics))?;
    loop {
        write!(out, "Enter topics to exclude, separated by commas: ")?;
        out.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(topics);
        }
        match parse_exclusion(&line).and_then(|idx| exclude(topics.clone(), &idx)) {
            Ok(kept) => return Ok(kept),
            Err(err) => writeln!(out, "{err}")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn topics() -> Vec<Topic> {
        ["a", "b", "c"].iter().map(|t| Topic::new(vec![(t.to_string(), 0.5)])).collect()
    }

    #[test]
    fn invalid_index_asks_again() {
        let mut input = Cursor::new("7\nx\n2\n");
        let mut out = Vec::new();
        let kept = ask_exclusion(topics(), &mut input, &mut out).unwrap();
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[1].terms[0].0, "c");
        let shown = String::from_utf8(out).unwrap();
        assert!(shown.starts_with("Topics generated:\n(1) a\n(2) b\n(3) c\n"));
        assert_eq!(shown.matches("Enter topics to exclude").count(), 3);
        assert!(shown.contains("out of range"));
    }

    #[test]
    fn empty_line_keeps_all() {
        let kept = ask_exclusion(topics(), &mut Cursor::new("\n"), &mut Vec::new()).unwrap();
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn end_of_input_keeps_all() {
        let kept = ask_exclusion(topics(), &mut Cursor::new(""), &mut Vec::new()).unwrap();
        assert_eq!(kept.len(), 3);
    }
}
