//! Commands typed at the `:` prompt.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Help,
    Theme(String),
    /// Title may be empty; the note is created in the selected category
    /// and opened in the editor.
    New(String),
    /// Open the selected note in the editor.
    Edit,
    /// Applies to the selected note.
    Delete,
    Category(String),
    Timestamps,
}

impl Command {
    /// Parse the text after `:`. A blank line is `Ok(None)`: the prompt
    /// closes without doing anything. The error is shown in the prompt.
    pub fn parse(input: &str) -> Result<Option<Command>, String> {
        let mut parts = input.trim().splitn(2, char::is_whitespace);
        let Some(word) = parts.next().filter(|w| !w.is_empty()) else {
            return Ok(None);
        };
        let arg = parts.next().map(str::trim).unwrap_or_default();

        let command = match (word, arg) {
            ("q" | "quit", _) => Command::Quit,
            ("help", _) => Command::Help,
            ("ts" | "timestamps", _) => Command::Timestamps,
            ("rm" | "delete", _) => Command::Delete,
            ("e" | "edit", _) => Command::Edit,
            ("new", title) => Command::New(title.to_string()),
            ("theme", "") => return Err("usage: theme <default|gruvbox>".to_string()),
            ("theme", name) => Command::Theme(name.to_string()),
            ("cat" | "category", "") => return Err("usage: cat <category>".to_string()),
            ("cat" | "category", label) => Command::Category(label.to_string()),
            (other, _) => return Err(format!("unknown command: {other}")),
        };
        Ok(Some(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(input: &str) -> Command {
        match Command::parse(input) {
            Ok(Some(cmd)) => cmd,
            other => panic!("{input:?} parsed to {other:?}"),
        }
    }

    #[test]
    fn aliases() {
        assert_eq!(ok("q"), Command::Quit);
        assert_eq!(ok("  quit  "), Command::Quit);
        assert_eq!(ok("timestamps"), Command::Timestamps);
        assert_eq!(ok("delete"), Command::Delete);
        assert_eq!(ok("e"), Command::Edit);
        assert_eq!(ok("edit"), Command::Edit);
    }

    #[test]
    fn new_title_keeps_inner_spaces() {
        assert_eq!(ok("new  Q3 planning notes "), Command::New("Q3 planning notes".to_string()));
        assert_eq!(ok("new"), Command::New(String::new()));
    }

    #[test]
    fn arguments_required_where_meaningful() {
        assert_eq!(ok("cat 工作"), Command::Category("工作".to_string()));
        assert_eq!(ok("theme gruvbox"), Command::Theme("gruvbox".to_string()));
        assert!(Command::parse("cat").unwrap_err().starts_with("usage"));
        assert!(Command::parse("theme  ").unwrap_err().starts_with("usage"));
    }

    #[test]
    fn blank_input_is_nothing() {
        assert_eq!(Command::parse(""), Ok(None));
        assert_eq!(Command::parse("   "), Ok(None));
    }

    #[test]
    fn unknown_word_is_named() {
        assert_eq!(
            Command::parse("frobnicate now"),
            Err("unknown command: frobnicate".to_string())
        );
    }
}
